#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Enemy behaviour system emitting pursuit and strike commands.
//!
//! Enemies re-plan their pursuit on a fixed cadence rather than every tick:
//! each plan covers a bounded step toward the player's last known position,
//! and a single randomised detour is attempted when the direct step ends in
//! a blocked cell. Strikes are requested whenever a living enemy is within
//! melee range with its attack cooldown ready; the world validates them.

use std::{f32::consts::FRAC_PI_4, time::Duration};

use dungeonion_core::{
    ArenaDimensions, Command, EnemySnapshot, EnemyView, Event, PlayerSnapshot, MELEE_RADIUS,
};
use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const DEFAULT_PURSUIT_INTERVAL: Duration = Duration::from_millis(2_000);
const DEFAULT_ENGAGE_DISTANCE: f32 = 16.0;
const DEFAULT_MAX_STEP: f32 = 24.0;
const DEFAULT_STEP_FRACTION: f32 = 0.5;
const DEFAULT_SEED: u64 = 0x00c0_ffee_c4ab_5eed;

/// Configuration parameters required to construct the enemy AI system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    pursuit_interval: Duration,
    engage_distance: f32,
    max_step: f32,
    step_fraction: f32,
    detour_angle: f32,
    melee_radius: f32,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided pursuit cadence and
    /// seed, with the stock movement constants.
    #[must_use]
    pub const fn new(pursuit_interval: Duration, rng_seed: u64) -> Self {
        Self {
            pursuit_interval,
            engage_distance: DEFAULT_ENGAGE_DISTANCE,
            max_step: DEFAULT_MAX_STEP,
            step_fraction: DEFAULT_STEP_FRACTION,
            detour_angle: FRAC_PI_4,
            melee_radius: MELEE_RADIUS,
            rng_seed,
        }
    }

    /// Overrides the bounds of a single pursuit step: the fraction of the
    /// remaining distance covered and its cap in pixels.
    #[must_use]
    pub const fn with_step(mut self, step_fraction: f32, max_step: f32) -> Self {
        self.step_fraction = step_fraction;
        self.max_step = max_step;
        self
    }

    /// Overrides the largest deviation, in radians, of an obstacle detour.
    #[must_use]
    pub const fn with_detour_angle(mut self, detour_angle: f32) -> Self {
        self.detour_angle = detour_angle;
        self
    }

    /// Replaces the seed of the detour generator.
    #[must_use]
    pub const fn with_seed(mut self, rng_seed: u64) -> Self {
        self.rng_seed = rng_seed;
        self
    }

    /// Overrides the interval between two pursuit plans.
    #[must_use]
    pub const fn with_pursuit_interval(mut self, pursuit_interval: Duration) -> Self {
        self.pursuit_interval = pursuit_interval;
        self
    }

    /// Interval between two pursuit plans.
    #[must_use]
    pub const fn pursuit_interval(&self) -> Duration {
        self.pursuit_interval
    }

    /// Fraction of the remaining distance a pursuit step covers.
    #[must_use]
    pub const fn step_fraction(&self) -> f32 {
        self.step_fraction
    }

    /// Longest pursuit step in pixels.
    #[must_use]
    pub const fn max_step(&self) -> f32 {
        self.max_step
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_PURSUIT_INTERVAL, DEFAULT_SEED)
    }
}

/// Pure system that steers enemies toward the player and requests strikes.
#[derive(Debug)]
pub struct EnemyAi {
    config: Config,
    pursuit_timer: Duration,
    rng: ChaCha8Rng,
}

impl EnemyAi {
    /// Creates a new enemy AI system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            pursuit_timer: Duration::ZERO,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Restarts the pursuit cadence, as when a new round begins.
    pub fn reset(&mut self) {
        self.pursuit_timer = Duration::ZERO;
    }

    /// Consumes world events and immutable views to emit enemy commands.
    ///
    /// `is_blocked` reports whether a world position is impassable for solid
    /// bodies.
    pub fn handle<F>(
        &mut self,
        events: &[Event],
        enemies: &EnemyView,
        player: &PlayerSnapshot,
        arena: ArenaDimensions,
        is_blocked: F,
        out: &mut Vec<Command>,
    ) where
        F: Fn(Vec2) -> bool,
    {
        let mut elapsed = Duration::ZERO;
        for event in events {
            if let Event::TimeAdvanced { dt } = event {
                elapsed = elapsed.saturating_add(*dt);
            }
        }
        if elapsed.is_zero() {
            return;
        }

        self.pursuit_timer = self.pursuit_timer.saturating_add(elapsed);
        let replan = self.pursuit_timer >= self.config.pursuit_interval;
        if replan {
            self.pursuit_timer = Duration::ZERO;
        }

        if !player.alive {
            return;
        }

        for enemy in enemies.iter().filter(|enemy| enemy.is_alive()) {
            if self.can_strike(enemy, player) {
                out.push(Command::StrikePlayer { enemy: enemy.id });
            }

            if replan && enemy.destination.is_none() {
                if let Some(destination) = self.plan_pursuit(enemy, player, arena, &is_blocked) {
                    out.push(Command::PursueTarget {
                        enemy: enemy.id,
                        destination,
                    });
                }
            }
        }
    }

    fn can_strike(&self, enemy: &EnemySnapshot, player: &PlayerSnapshot) -> bool {
        enemy.attack_cooldown.is_zero()
            && enemy.position.distance(player.position) < self.config.melee_radius
    }

    fn plan_pursuit<F>(
        &mut self,
        enemy: &EnemySnapshot,
        player: &PlayerSnapshot,
        arena: ArenaDimensions,
        is_blocked: &F,
    ) -> Option<Vec2>
    where
        F: Fn(Vec2) -> bool,
    {
        let offset = player.position - enemy.position;
        let distance = offset.length();
        if distance <= self.config.engage_distance {
            return None;
        }

        let step = (distance * self.config.step_fraction).min(self.config.max_step);
        let direct = arena.clamp_position(enemy.position + offset / distance * step);
        if !is_blocked(direct) {
            return Some(direct);
        }

        let spread = self.config.detour_angle;
        let deviation = if spread > 0.0 {
            self.rng.gen_range(-spread..spread)
        } else {
            0.0
        };
        let heading = offset.y.atan2(offset.x) + deviation;
        let detour = arena.clamp_position(enemy.position + Vec2::from_angle(heading) * step);
        (!is_blocked(detour)).then_some(detour)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dungeonion_core::{EnemyBehavior, EnemyId, EnemyKind, Health, PlayerClass};

    const ARENA: ArenaDimensions = ArenaDimensions::new(32, 20, 16);

    fn player_at(position: Vec2) -> PlayerSnapshot {
        PlayerSnapshot {
            class: PlayerClass::Wizard,
            position,
            heading: (0, 0),
            health: Health::new(100),
            max_health: Health::new(100),
            alive: true,
            fire_cooldown: Duration::ZERO,
            knockback: Vec2::ZERO,
        }
    }

    fn crab_at(id: u32, position: Vec2) -> EnemySnapshot {
        EnemySnapshot {
            id: EnemyId::new(id),
            kind: EnemyKind::Crab,
            position,
            destination: None,
            health: Health::new(10),
            max_health: Health::new(10),
            behavior: EnemyBehavior::Idle,
            attack_cooldown: Duration::ZERO,
            respawn_in: Duration::ZERO,
            death_animation: Duration::ZERO,
            hurt_flash: Duration::ZERO,
            knockback: Vec2::ZERO,
        }
    }

    fn tick(millis: u64) -> Vec<Event> {
        vec![Event::TimeAdvanced {
            dt: Duration::from_millis(millis),
        }]
    }

    #[test]
    fn waits_for_pursuit_interval() {
        let mut ai = EnemyAi::new(Config::default());
        let view = EnemyView::from_snapshots(vec![crab_at(0, Vec2::new(100.0, 160.0))]);
        let player = player_at(Vec2::new(256.0, 160.0));
        let mut commands = Vec::new();

        ai.handle(&tick(1_999), &view, &player, ARENA, |_| false, &mut commands);
        assert!(commands.is_empty());

        ai.handle(&tick(1), &view, &player, ARENA, |_| false, &mut commands);
        assert_eq!(
            commands,
            vec![Command::PursueTarget {
                enemy: EnemyId::new(0),
                destination: Vec2::new(124.0, 160.0),
            }]
        );
    }

    #[test]
    fn ignores_batches_without_time() {
        let mut ai = EnemyAi::new(Config::new(Duration::ZERO, 1));
        let view = EnemyView::from_snapshots(vec![crab_at(0, Vec2::new(256.0, 160.0))]);
        let mut commands = Vec::new();
        ai.handle(
            &[],
            &view,
            &player_at(Vec2::new(256.0, 160.0)),
            ARENA,
            |_| false,
            &mut commands,
        );
        assert!(commands.is_empty());
    }

    #[test]
    fn step_halves_short_distances() {
        let mut ai = EnemyAi::new(Config::default());
        let view = EnemyView::from_snapshots(vec![crab_at(3, Vec2::new(200.0, 160.0))]);
        let mut commands = Vec::new();
        ai.handle(
            &tick(2_000),
            &view,
            &player_at(Vec2::new(230.0, 160.0)),
            ARENA,
            |_| false,
            &mut commands,
        );
        assert_eq!(
            commands,
            vec![Command::PursueTarget {
                enemy: EnemyId::new(3),
                destination: Vec2::new(215.0, 160.0),
            }]
        );
    }

    #[test]
    fn close_enemies_strike_instead_of_moving() {
        let mut ai = EnemyAi::new(Config::default());
        let mut cooling = crab_at(1, Vec2::new(262.0, 160.0));
        cooling.attack_cooldown = Duration::from_millis(300);
        let view = EnemyView::from_snapshots(vec![crab_at(0, Vec2::new(260.0, 164.0)), cooling]);
        let mut commands = Vec::new();
        ai.handle(
            &tick(2_000),
            &view,
            &player_at(Vec2::new(256.0, 160.0)),
            ARENA,
            |_| false,
            &mut commands,
        );
        assert_eq!(
            commands,
            vec![Command::StrikePlayer {
                enemy: EnemyId::new(0)
            }]
        );
    }

    #[test]
    fn blocked_step_tries_a_detour_within_spread() {
        let mut ai = EnemyAi::new(Config::default());
        let start = Vec2::new(100.0, 160.0);
        let direct = Vec2::new(124.0, 160.0);
        let view = EnemyView::from_snapshots(vec![crab_at(0, start)]);
        let mut commands = Vec::new();
        ai.handle(
            &tick(2_000),
            &view,
            &player_at(Vec2::new(256.0, 160.0)),
            ARENA,
            |point| point == direct,
            &mut commands,
        );

        let [Command::PursueTarget { destination, .. }] = commands.as_slice() else {
            panic!("expected a detour, got {commands:?}");
        };
        assert!((destination.distance(start) - 24.0).abs() < 1e-3);
        let angle = (*destination - start).y.atan2((*destination - start).x);
        assert!(angle.abs() <= FRAC_PI_4 + 1e-4);
    }

    #[test]
    fn fully_blocked_enemy_stays_put() {
        let mut ai = EnemyAi::new(Config::default());
        let view = EnemyView::from_snapshots(vec![crab_at(0, Vec2::new(100.0, 160.0))]);
        let mut commands = Vec::new();
        ai.handle(
            &tick(2_000),
            &view,
            &player_at(Vec2::new(256.0, 160.0)),
            ARENA,
            |_| true,
            &mut commands,
        );
        assert!(commands.is_empty());
    }

    #[test]
    fn dead_enemies_and_moving_enemies_are_skipped() {
        let mut ai = EnemyAi::new(Config::default());
        let mut dead = crab_at(0, Vec2::new(100.0, 160.0));
        dead.behavior = EnemyBehavior::Dead;
        let mut moving = crab_at(1, Vec2::new(100.0, 100.0));
        moving.destination = Some(Vec2::new(110.0, 100.0));
        moving.behavior = EnemyBehavior::Pursuing;
        let view = EnemyView::from_snapshots(vec![dead, moving]);
        let mut commands = Vec::new();
        ai.handle(
            &tick(2_000),
            &view,
            &player_at(Vec2::new(256.0, 160.0)),
            ARENA,
            |_| false,
            &mut commands,
        );
        assert!(commands.is_empty());
    }
}
