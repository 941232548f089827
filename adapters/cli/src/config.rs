//! Session settings read from a TOML file.

use std::{fs, path::Path, time::Duration};

use anyhow::{Context, Result};
use dungeonion_system_enemy_ai as enemy_ai;
use dungeonion_system_round_director as round_director;
use serde::Deserialize;

/// Settings a TOML file may provide. Every key is optional.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct FileConfig {
    pub(crate) seed: Option<u64>,
    pub(crate) class: Option<String>,
    pub(crate) frames: Option<u32>,
    pub(crate) frame_ms: Option<u64>,
    pub(crate) director: DirectorSection,
    pub(crate) enemy_ai: EnemyAiSection,
}

/// `[director]` table.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct DirectorSection {
    pub(crate) final_round: Option<u32>,
    pub(crate) between_rounds_ms: Option<u64>,
    pub(crate) expansion_cost: Option<u32>,
    pub(crate) expansion_growth: Option<f64>,
    pub(crate) expansion_amount: Option<u32>,
    pub(crate) wave_size: Option<u32>,
    pub(crate) spawn_attempts: Option<u32>,
}

/// `[enemy_ai]` table.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct EnemyAiSection {
    pub(crate) pursuit_interval_ms: Option<u64>,
    pub(crate) step_fraction: Option<f32>,
    pub(crate) max_step: Option<f32>,
    pub(crate) detour_degrees: Option<f32>,
}

impl FileConfig {
    /// Reads and parses the file at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub(crate) fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

impl DirectorSection {
    /// Overlays the keys present in the table on `config`.
    pub(crate) fn apply(&self, config: round_director::Config) -> round_director::Config {
        let mut config = config.with_rounds(
            self.final_round.unwrap_or(config.final_round()),
            self.between_rounds_ms
                .map_or(config.between_rounds(), Duration::from_millis),
        );
        config = config.with_expansion(
            self.expansion_cost.unwrap_or(config.expansion_cost()),
            self.expansion_growth.unwrap_or(config.expansion_growth()),
            self.expansion_amount.unwrap_or(config.expansion_amount()),
        );
        if let Some(wave_size) = self.wave_size {
            config = config.with_wave_size(wave_size);
        }
        if let Some(spawn_attempts) = self.spawn_attempts {
            config = config.with_spawn_attempts(spawn_attempts);
        }
        config
    }
}

impl EnemyAiSection {
    /// Overlays the keys present in the table on `config`.
    pub(crate) fn apply(&self, config: enemy_ai::Config) -> enemy_ai::Config {
        let mut config = config.with_step(
            self.step_fraction.unwrap_or(config.step_fraction()),
            self.max_step.unwrap_or(config.max_step()),
        );
        if let Some(interval) = self.pursuit_interval_ms {
            config = config.with_pursuit_interval(Duration::from_millis(interval));
        }
        if let Some(degrees) = self.detour_degrees {
            config = config.with_detour_angle(degrees.to_radians());
        }
        config
    }
}
