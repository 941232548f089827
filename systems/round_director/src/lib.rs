#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Round director that paces enemy waves and the map expansion economy.
//!
//! The director owns the round state. It tops up the current wave with spawn
//! commands, grants respawn slots to dead enemies only when a new round
//! starts, credits kills to the score and drives the
//! `Playing → BetweenRounds → Playing | Won` phase machine from the tick
//! deltas it observes.

use std::time::Duration;

use dungeonion_core::{
    ArenaDimensions, Command, EnemyKind, EnemySnapshot, EnemyView, Event, Health, PlayerSnapshot,
    RoundPhase,
};
use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

const DEFAULT_FINAL_ROUND: u32 = 14;
const DEFAULT_BETWEEN_ROUNDS: Duration = Duration::from_millis(3_000);
const DEFAULT_EXPANSION_COST: u32 = 500;
const DEFAULT_EXPANSION_GROWTH: f64 = 1.8;
const DEFAULT_EXPANSION_AMOUNT: u32 = 10;
const DEFAULT_WAVE_SIZE: u32 = 3;
const DEFAULT_BASE_ENEMIES: u32 = 5;
const DEFAULT_ENEMY_CAP: u32 = 10;
const DEFAULT_HEALTH_GROWTH: f64 = 0.1;
const DEFAULT_SPAWN_ATTEMPTS: u32 = 100;
const DEFAULT_SPAWN_DISTANCE: f32 = 128.0;
const DEFAULT_SEED: u64 = 0x0d1e_c7ed_0000_0001;

/// Configuration parameters required to construct the round director.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    final_round: u32,
    between_rounds: Duration,
    expansion_cost: u32,
    expansion_growth: f64,
    expansion_amount: u32,
    wave_size: u32,
    base_enemies: u32,
    enemy_cap: u32,
    health_growth: f64,
    spawn_attempts: u32,
    fallback_spawn_distance: f32,
    enemy_kind: EnemyKind,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration with the stock pacing constants.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self {
            final_round: DEFAULT_FINAL_ROUND,
            between_rounds: DEFAULT_BETWEEN_ROUNDS,
            expansion_cost: DEFAULT_EXPANSION_COST,
            expansion_growth: DEFAULT_EXPANSION_GROWTH,
            expansion_amount: DEFAULT_EXPANSION_AMOUNT,
            wave_size: DEFAULT_WAVE_SIZE,
            base_enemies: DEFAULT_BASE_ENEMIES,
            enemy_cap: DEFAULT_ENEMY_CAP,
            health_growth: DEFAULT_HEALTH_GROWTH,
            spawn_attempts: DEFAULT_SPAWN_ATTEMPTS,
            fallback_spawn_distance: DEFAULT_SPAWN_DISTANCE,
            enemy_kind: EnemyKind::Crab,
            rng_seed,
        }
    }

    /// Sets the last round and the pause that follows every cleared round.
    #[must_use]
    pub const fn with_rounds(mut self, final_round: u32, between_rounds: Duration) -> Self {
        self.final_round = final_round;
        self.between_rounds = between_rounds;
        self
    }

    /// Sets the expansion economy: the first price, the factor applied to the
    /// price after each purchase and the tiles added per purchase.
    #[must_use]
    pub const fn with_expansion(mut self, cost: u32, growth: f64, amount: u32) -> Self {
        self.expansion_cost = cost;
        self.expansion_growth = growth;
        self.expansion_amount = amount;
        self
    }

    /// Sets how many enemies make up a wave.
    #[must_use]
    pub const fn with_wave_size(mut self, wave_size: u32) -> Self {
        self.wave_size = wave_size;
        self
    }

    /// Sets the number of placement attempts made per enemy.
    #[must_use]
    pub const fn with_spawn_attempts(mut self, spawn_attempts: u32) -> Self {
        self.spawn_attempts = spawn_attempts;
        self
    }

    /// Replaces the seed of the placement generator.
    #[must_use]
    pub const fn with_seed(mut self, rng_seed: u64) -> Self {
        self.rng_seed = rng_seed;
        self
    }

    /// Last round of a session.
    #[must_use]
    pub const fn final_round(&self) -> u32 {
        self.final_round
    }

    /// Pause that follows every cleared round.
    #[must_use]
    pub const fn between_rounds(&self) -> Duration {
        self.between_rounds
    }

    /// Price of the first expansion.
    #[must_use]
    pub const fn expansion_cost(&self) -> u32 {
        self.expansion_cost
    }

    /// Factor applied to the price after each purchase.
    #[must_use]
    pub const fn expansion_growth(&self) -> f64 {
        self.expansion_growth
    }

    /// Tiles added to each axis by one expansion.
    #[must_use]
    pub const fn expansion_amount(&self) -> u32 {
        self.expansion_amount
    }

    /// Upper bound on living enemies during `round`.
    #[must_use]
    pub fn max_enemies_for(&self, round: u32) -> u32 {
        self.base_enemies
            .saturating_add(round.saturating_sub(1))
            .min(self.enemy_cap)
    }

    /// Maximum health granted to an enemy of `kind` spawned during `round`.
    #[must_use]
    pub fn scaled_health(&self, kind: EnemyKind, round: u32) -> Health {
        let base = kind.stats().max_health.get();
        let bonus = (f64::from(base) * self.health_growth * f64::from(round.saturating_sub(1)))
            .floor()
            .max(0.0) as u32;
        Health::new(base.saturating_add(bonus))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

/// Observable state of the current round.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoundState {
    round: u32,
    score: u32,
    phase: RoundPhase,
    max_enemies_allowed: u32,
    expansion_cost: u32,
    phase_timer: Duration,
}

impl RoundState {
    /// Current round number, starting at one.
    #[must_use]
    pub const fn round(&self) -> u32 {
        self.round
    }

    /// Points accumulated from kills, minus expansion purchases.
    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// Current phase of the round machine.
    #[must_use]
    pub const fn phase(&self) -> RoundPhase {
        self.phase
    }

    /// Upper bound on living enemies this round.
    #[must_use]
    pub const fn max_enemies_allowed(&self) -> u32 {
        self.max_enemies_allowed
    }

    /// Price of the next map expansion.
    #[must_use]
    pub const fn expansion_cost(&self) -> u32 {
        self.expansion_cost
    }

    /// Reports whether the score covers the next map expansion.
    #[must_use]
    pub const fn can_afford_expansion(&self) -> bool {
        self.score >= self.expansion_cost
    }

    /// Time left before the next round starts while between rounds.
    #[must_use]
    pub const fn time_until_next_round(&self) -> Duration {
        self.phase_timer
    }
}

/// Pure system that owns the round state and paces enemy waves.
#[derive(Debug)]
pub struct RoundDirector {
    config: Config,
    state: RoundState,
    wave_spawned: u32,
    rng: ChaCha8Rng,
}

impl RoundDirector {
    /// Creates a new round director positioned at the start of round one.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            state: RoundState {
                round: 1,
                score: 0,
                phase: RoundPhase::Playing,
                max_enemies_allowed: config.max_enemies_for(1),
                expansion_cost: config.expansion_cost,
                phase_timer: Duration::ZERO,
            },
            wave_spawned: 0,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            config,
        }
    }

    /// Snapshot of the round state.
    #[must_use]
    pub const fn state(&self) -> RoundState {
        self.state
    }

    /// Configuration the director was built with.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Number of enemies the current wave consists of.
    #[must_use]
    pub fn wave_quota(&self) -> u32 {
        self.config.wave_size.min(self.state.max_enemies_allowed)
    }

    /// Forgets the enemies issued for the current wave so it is repopulated
    /// from scratch, as after the arena was cleared.
    pub fn restart_wave(&mut self) {
        self.wave_spawned = 0;
    }

    /// Buys a map expansion when the score covers its price.
    ///
    /// On success the price is deducted, an expansion command is emitted and
    /// the next price grows; it never decreases.
    pub fn request_map_expansion(&mut self, out: &mut Vec<Command>) -> bool {
        let cost = self.state.expansion_cost;
        if self.state.score < cost {
            return false;
        }

        self.state.score -= cost;
        let grown = (f64::from(cost) * self.config.expansion_growth).floor();
        self.state.expansion_cost = if grown >= f64::from(u32::MAX) {
            u32::MAX
        } else {
            (grown.max(0.0) as u32).max(cost)
        };
        out.push(Command::ExpandMap {
            amount: self.config.expansion_amount,
        });
        info!(
            paid = cost,
            next_cost = self.state.expansion_cost,
            "map expansion purchased"
        );
        true
    }

    /// Consumes world events and immutable views to emit spawn commands and
    /// advance the round machine.
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
            match event {
                Event::TimeAdvanced { dt } => elapsed = elapsed.saturating_add(*dt),
                Event::EnemyDied { enemy, kind } => {
                    let reward = kind.stats().kill_reward.saturating_mul(self.state.round);
                    self.state.score = self.state.score.saturating_add(reward);
                    debug!(enemy = enemy.get(), reward, score = self.state.score, "enemy defeated");
                }
                Event::EnemyRespawnRejected { enemy } => {
                    self.wave_spawned = self.wave_spawned.saturating_sub(1);
                    debug!(enemy = enemy.get(), "respawn slot refused");
                }
                _ => {}
            }
        }
        if elapsed.is_zero() {
            return;
        }

        let mut issued = 0;
        match self.state.phase {
            RoundPhase::Won => return,
            RoundPhase::BetweenRounds => {
                self.state.phase_timer = self.state.phase_timer.saturating_sub(elapsed);
                if !self.state.phase_timer.is_zero() {
                    return;
                }
                if self.state.round >= self.config.final_round {
                    self.state.phase = RoundPhase::Won;
                    info!(round = self.state.round, score = self.state.score, "final round cleared");
                    return;
                }
                self.begin_next_round();
                issued += self.grant_respawns(enemies, player, arena, &is_blocked, out);
            }
            RoundPhase::Playing => {}
        }

        issued += self.top_up_wave(enemies, player, arena, &is_blocked, out);

        let wave_complete = self.wave_spawned >= self.wave_quota();
        if wave_complete && issued == 0 && enemies.alive_count() == 0 {
            self.state.phase = RoundPhase::BetweenRounds;
            self.state.phase_timer = self.config.between_rounds;
            info!(round = self.state.round, score = self.state.score, "round cleared");
        }
    }

    fn begin_next_round(&mut self) {
        self.state.round += 1;
        self.state.phase = RoundPhase::Playing;
        self.state.max_enemies_allowed = self.config.max_enemies_for(self.state.round);
        self.wave_spawned = 0;
        info!(
            round = self.state.round,
            max_enemies = self.state.max_enemies_allowed,
            "round started"
        );
    }

    fn grant_respawns<F>(
        &mut self,
        enemies: &EnemyView,
        player: &PlayerSnapshot,
        arena: ArenaDimensions,
        is_blocked: &F,
        out: &mut Vec<Command>,
    ) -> u32
    where
        F: Fn(Vec2) -> bool,
    {
        let mut granted = 0;
        let ready: Vec<&EnemySnapshot> = enemies.iter().filter(|enemy| enemy.respawn_ready()).collect();
        for enemy in ready {
            if self.wave_spawned >= self.wave_quota() {
                break;
            }
            let Some(position) = self.find_spawn_position(enemy.kind, player, arena, is_blocked)
            else {
                continue;
            };
            out.push(Command::RespawnEnemy {
                enemy: enemy.id,
                position,
                max_health: self.config.scaled_health(enemy.kind, self.state.round),
            });
            self.wave_spawned += 1;
            granted += 1;
            debug!(enemy = enemy.id.get(), x = position.x, y = position.y, "respawn slot granted");
        }
        granted
    }

    fn top_up_wave<F>(
        &mut self,
        enemies: &EnemyView,
        player: &PlayerSnapshot,
        arena: ArenaDimensions,
        is_blocked: &F,
        out: &mut Vec<Command>,
    ) -> u32
    where
        F: Fn(Vec2) -> bool,
    {
        let kind = self.config.enemy_kind;
        let mut alive = u32::try_from(enemies.alive_count()).unwrap_or(u32::MAX);
        let mut issued = 0;
        while self.wave_spawned < self.wave_quota() && alive < self.state.max_enemies_allowed {
            let Some(position) = self.find_spawn_position(kind, player, arena, is_blocked) else {
                warn!(
                    attempts = self.config.spawn_attempts,
                    round = self.state.round,
                    "no valid spawn position; retrying next tick"
                );
                break;
            };
            out.push(Command::SpawnEnemy {
                kind,
                position,
                max_health: self.config.scaled_health(kind, self.state.round),
            });
            self.wave_spawned += 1;
            alive += 1;
            issued += 1;
            debug!(%kind, x = position.x, y = position.y, "enemy spawn issued");
        }
        issued
    }

    fn find_spawn_position<F>(
        &mut self,
        kind: EnemyKind,
        player: &PlayerSnapshot,
        arena: ArenaDimensions,
        is_blocked: &F,
    ) -> Option<Vec2>
    where
        F: Fn(Vec2) -> bool,
    {
        let min_distance = kind
            .stats()
            .min_spawn_distance
            .unwrap_or(self.config.fallback_spawn_distance);
        let max = arena.max_position();
        (0..self.config.spawn_attempts).find_map(|_| {
            let candidate = Vec2::new(
                self.rng.gen_range(0.0..=max.x),
                self.rng.gen_range(0.0..=max.y),
            );
            let acceptable =
                candidate.distance(player.position) >= min_distance && !is_blocked(candidate);
            acceptable.then_some(candidate)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dungeonion_core::{EnemyBehavior, EnemyId, PlayerClass};

    const ARENA: ArenaDimensions = ArenaDimensions::new(32, 20, 16);

    fn player() -> PlayerSnapshot {
        PlayerSnapshot {
            class: PlayerClass::Wizard,
            position: Vec2::new(256.0, 160.0),
            heading: (0, 0),
            health: Health::new(100),
            max_health: Health::new(100),
            alive: true,
            fire_cooldown: Duration::ZERO,
            knockback: Vec2::ZERO,
        }
    }

    fn tick(millis: u64) -> Vec<Event> {
        vec![Event::TimeAdvanced {
            dt: Duration::from_millis(millis),
        }]
    }

    fn crab(id: u32, behavior: EnemyBehavior) -> EnemySnapshot {
        EnemySnapshot {
            id: EnemyId::new(id),
            kind: EnemyKind::Crab,
            position: Vec2::new(32.0, 32.0),
            destination: None,
            health: if behavior == EnemyBehavior::Dead {
                Health::ZERO
            } else {
                Health::new(10)
            },
            max_health: Health::new(10),
            behavior,
            attack_cooldown: Duration::ZERO,
            respawn_in: Duration::ZERO,
            death_animation: Duration::ZERO,
            hurt_flash: Duration::ZERO,
            knockback: Vec2::ZERO,
        }
    }

    #[test]
    fn enemy_cap_grows_with_round_up_to_ten() {
        let config = Config::default();
        assert_eq!(config.max_enemies_for(1), 5);
        assert_eq!(config.max_enemies_for(4), 8);
        assert_eq!(config.max_enemies_for(14), 10);
    }

    #[test]
    fn health_grows_ten_percent_per_round() {
        let config = Config::default();
        assert_eq!(config.scaled_health(EnemyKind::Crab, 1), Health::new(10));
        assert_eq!(config.scaled_health(EnemyKind::Crab, 2), Health::new(11));
        assert_eq!(config.scaled_health(EnemyKind::Crab, 14), Health::new(23));
    }

    #[test]
    fn first_tick_spawns_initial_wave_away_from_player() {
        let mut director = RoundDirector::new(Config::default());
        let mut commands = Vec::new();
        director.handle(
            &tick(16),
            &EnemyView::default(),
            &player(),
            ARENA,
            |_| false,
            &mut commands,
        );

        assert_eq!(commands.len(), 3);
        for command in &commands {
            let Command::SpawnEnemy {
                kind,
                position,
                max_health,
            } = command
            else {
                panic!("unexpected command {command:?}");
            };
            assert_eq!(*kind, EnemyKind::Crab);
            assert_eq!(*max_health, Health::new(10));
            assert!(position.distance(player().position) >= 100.0);
            assert!(position.x <= 496.0 && position.y <= 304.0);
        }
        assert_eq!(director.state().phase(), RoundPhase::Playing);
    }

    #[test]
    fn exhausted_placement_skips_and_retries() {
        let mut director = RoundDirector::new(Config::default());
        let mut commands = Vec::new();
        director.handle(
            &tick(16),
            &EnemyView::default(),
            &player(),
            ARENA,
            |_| true,
            &mut commands,
        );
        assert!(commands.is_empty());
        assert_eq!(director.state().phase(), RoundPhase::Playing);

        director.handle(
            &tick(16),
            &EnemyView::default(),
            &player(),
            ARENA,
            |_| false,
            &mut commands,
        );
        assert_eq!(commands.len(), 3);
    }

    #[test]
    fn round_clears_once_and_advances_after_delay() {
        let mut director = RoundDirector::new(Config::default());
        let mut commands = Vec::new();
        let alive = EnemyView::from_snapshots(vec![
            crab(0, EnemyBehavior::Idle),
            crab(1, EnemyBehavior::Idle),
            crab(2, EnemyBehavior::Idle),
        ]);
        director.handle(&tick(16), &EnemyView::default(), &player(), ARENA, |_| false, &mut commands);
        director.handle(&tick(16), &alive, &player(), ARENA, |_| false, &mut commands);
        assert_eq!(director.state().phase(), RoundPhase::Playing);

        let mut dead = vec![
            crab(0, EnemyBehavior::Dead),
            crab(1, EnemyBehavior::Dead),
            crab(2, EnemyBehavior::Dead),
        ];
        for enemy in &mut dead {
            enemy.respawn_in = Duration::from_secs(10);
        }
        let dead = EnemyView::from_snapshots(dead);
        let kills: Vec<Event> = (0..3)
            .map(|id| Event::EnemyDied {
                enemy: EnemyId::new(id),
                kind: EnemyKind::Crab,
            })
            .chain(tick(16))
            .collect();
        director.handle(&kills, &dead, &player(), ARENA, |_| false, &mut commands);
        assert_eq!(director.state().phase(), RoundPhase::BetweenRounds);
        assert_eq!(director.state().score(), 30);

        director.handle(&tick(1_000), &dead, &player(), ARENA, |_| false, &mut commands);
        assert_eq!(director.state().phase(), RoundPhase::BetweenRounds);
        assert_eq!(director.state().round(), 1);

        commands.clear();
        director.handle(&tick(2_000), &dead, &player(), ARENA, |_| false, &mut commands);
        assert_eq!(director.state().round(), 2);
        assert_eq!(director.state().phase(), RoundPhase::Playing);
        assert_eq!(director.state().max_enemies_allowed(), 6);
        assert_eq!(commands.len(), 3, "fresh wave while respawns are pending");
        assert!(commands
            .iter()
            .all(|command| matches!(command, Command::SpawnEnemy { max_health, .. } if *max_health == Health::new(11))));
    }

    #[test]
    fn ready_dead_enemies_take_respawn_slots_at_round_start() {
        let config = Config::default().with_rounds(14, Duration::from_millis(100));
        let mut director = RoundDirector::new(config);
        let mut commands = Vec::new();
        director.handle(&tick(16), &EnemyView::default(), &player(), ARENA, |_| false, &mut commands);

        let dead = EnemyView::from_snapshots(vec![
            crab(0, EnemyBehavior::Dead),
            crab(1, EnemyBehavior::Dead),
            crab(2, EnemyBehavior::Dead),
        ]);
        director.handle(&tick(16), &dead, &player(), ARENA, |_| false, &mut commands);
        assert_eq!(director.state().phase(), RoundPhase::BetweenRounds);

        commands.clear();
        director.handle(&tick(100), &dead, &player(), ARENA, |_| false, &mut commands);
        let respawned: Vec<EnemyId> = commands
            .iter()
            .filter_map(|command| match command {
                Command::RespawnEnemy { enemy, .. } => Some(*enemy),
                _ => None,
            })
            .collect();
        assert_eq!(respawned, vec![EnemyId::new(0), EnemyId::new(1), EnemyId::new(2)]);
        assert_eq!(commands.len(), 3);

        commands.clear();
        let rejected = vec![
            Event::EnemyRespawnRejected {
                enemy: EnemyId::new(2),
            },
            Event::TimeAdvanced {
                dt: Duration::from_millis(16),
            },
        ];
        let partly = EnemyView::from_snapshots(vec![
            crab(0, EnemyBehavior::Idle),
            crab(1, EnemyBehavior::Idle),
            crab(2, EnemyBehavior::Dead),
        ]);
        director.handle(&rejected, &partly, &player(), ARENA, |_| false, &mut commands);
        assert!(matches!(commands.as_slice(), [Command::SpawnEnemy { .. }]));
    }

    #[test]
    fn final_round_leads_to_terminal_win() {
        let config = Config::default().with_rounds(1, Duration::from_millis(100));
        let mut director = RoundDirector::new(config);
        let mut commands = Vec::new();
        director.handle(&tick(16), &EnemyView::default(), &player(), ARENA, |_| false, &mut commands);
        let dead = EnemyView::from_snapshots(vec![crab(0, EnemyBehavior::Dead)]);
        director.handle(&tick(16), &dead, &player(), ARENA, |_| false, &mut commands);
        director.handle(&tick(100), &dead, &player(), ARENA, |_| false, &mut commands);
        assert_eq!(director.state().phase(), RoundPhase::Won);

        commands.clear();
        director.handle(&tick(10_000), &EnemyView::default(), &player(), ARENA, |_| false, &mut commands);
        assert!(commands.is_empty());
        assert_eq!(director.state().phase(), RoundPhase::Won);
    }

    #[test]
    fn expansion_is_gated_and_ratchets_cost() {
        let mut director = RoundDirector::new(Config::default());
        let mut commands = Vec::new();
        assert!(!director.request_map_expansion(&mut commands));
        assert!(commands.is_empty());

        director.state.score = 1_000;
        assert!(director.request_map_expansion(&mut commands));
        assert_eq!(commands, vec![Command::ExpandMap { amount: 10 }]);
        assert_eq!(director.state().score(), 500);
        assert_eq!(director.state().expansion_cost(), 900);
        assert!(!director.state().can_afford_expansion());
        assert!(!director.request_map_expansion(&mut commands));
        assert_eq!(director.state().expansion_cost(), 900);
    }
}
