#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Dungeonion.

mod actors;
mod combat;
mod grid;
mod layout;
pub mod motion;
mod tiles;

use std::time::Duration;

use dungeonion_core::{
    Channel, Command, EnemyId, Event, PlayerClass, ProjectileOutcome, PLAYER_START,
    WELCOME_BANNER,
};
use glam::Vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use actors::{Enemy, Player, Projectile};

pub use grid::TileWorld;
pub use tiles::{TileProperties, TilePropertyTable};

const WORLD_SEED: u64 = 0x5eed_d0e0_4a11_c0de;

/// Projectiles are only launched at targets farther than this from the
/// player centre.
const MIN_AIM_DISTANCE: f32 = 10.0;

/// Represents the authoritative Dungeonion world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    grid: TileWorld,
    player: Player,
    enemies: Vec<Enemy>,
    projectiles: Vec<Projectile>,
    next_enemy_id: u32,
    rng: ChaCha8Rng,
    tick_index: u64,
}

impl World {
    /// Creates a new world holding the default dungeon and a wizard at the
    /// start position.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(WORLD_SEED)
    }

    /// Creates a new world whose respawn delays are drawn from `seed`.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        let grid = TileWorld::default_dungeon();
        let start = grid.dimensions().clamp_position(PLAYER_START);
        Self {
            banner: WELCOME_BANNER,
            grid,
            player: Player::new(PlayerClass::default(), start),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            next_enemy_id: 0,
            rng: ChaCha8Rng::seed_from_u64(seed),
            tick_index: 0,
        }
    }

    fn enemy_mut(&mut self, enemy: EnemyId) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|candidate| candidate.id == enemy)
    }

    fn allocate_enemy_id(&mut self) -> EnemyId {
        let id = EnemyId::new(self.next_enemy_id);
        self.next_enemy_id = self.next_enemy_id.saturating_add(1);
        id
    }

    fn advance(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        self.tick_index = self.tick_index.saturating_add(1);
        for enemy in &mut self.enemies {
            enemy.striking = false;
        }

        self.advance_player(dt, out_events);
        self.advance_projectiles(dt, out_events);
        self.advance_enemies(dt, out_events);

        out_events.push(Event::TimeAdvanced { dt });
    }

    fn advance_player(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let player = &mut self.player;
        player.fire_cooldown = player.fire_cooldown.saturating_sub(dt);
        if !player.vitals.alive {
            return;
        }

        let from = player.position;
        motion::integrate_knockback(
            &self.grid,
            &mut player.position,
            &mut player.vitals.knockback,
            dt,
        );

        let (dx, dy) = player.heading;
        if (dx, dy) != (0, 0) {
            let delta =
                Vec2::new(f32::from(dx), f32::from(dy)) * player.stats.move_speed * dt.as_secs_f32();
            player.position = motion::resolve(&self.grid, player.position, delta, Channel::Physical)
                .position;
        }

        if player.position != from {
            out_events.push(Event::PlayerMoved {
                from,
                to: player.position,
            });
        }
    }

    fn advance_projectiles(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let arena = self.grid.dimensions();
        let seconds = dt.as_secs_f32();
        let mut index = 0;
        while index < self.projectiles.len() {
            let projectile = &mut self.projectiles[index];
            let next = projectile.position + projectile.direction * projectile.speed * seconds;

            let outcome = if !arena.contains(next) {
                Some(ProjectileOutcome::OutOfBounds)
            } else if self.grid.collides(next, Channel::Magic) {
                Some(ProjectileOutcome::Blocked)
            } else {
                projectile.position = next;
                let (damage, source) = (projectile.damage, projectile.position);
                match combat::resolve_projectile_contact(projectile, &self.enemies, arena) {
                    Some(target) => {
                        let enemy = &mut self.enemies[target];
                        if let Some(hit) =
                            combat::damage_enemy(enemy, arena, damage, source, &mut self.rng)
                        {
                            out_events.push(Event::EnemyDamaged {
                                enemy: enemy.id,
                                amount: hit.dealt,
                                health: hit.health,
                            });
                            if hit.killed {
                                debug!(
                                    enemy = enemy.id.get(),
                                    respawn_ms = enemy.respawn_in.as_millis() as u64,
                                    "enemy killed"
                                );
                                out_events.push(Event::EnemyDied {
                                    enemy: enemy.id,
                                    kind: enemy.kind,
                                });
                            }
                        }
                        Some(ProjectileOutcome::HitEnemy(enemy.id))
                    }
                    None => None,
                }
            };

            match outcome {
                Some(reason) => {
                    let consumed = self.projectiles.remove(index);
                    out_events.push(Event::ProjectileConsumed {
                        position: consumed.position,
                        reason,
                    });
                }
                None => index += 1,
            }
        }
    }

    fn advance_enemies(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        for enemy in &mut self.enemies {
            if !enemy.vitals.alive {
                enemy.death_animation = enemy.death_animation.saturating_sub(dt);
                if !enemy.respawn_in.is_zero() {
                    enemy.respawn_in = enemy.respawn_in.saturating_sub(dt);
                    if enemy.respawn_in.is_zero() {
                        out_events.push(Event::EnemyRespawnReady { enemy: enemy.id });
                    }
                }
                continue;
            }

            enemy.hurt_flash = enemy.hurt_flash.saturating_sub(dt);
            enemy.attack_cooldown = enemy.attack_cooldown.saturating_sub(dt);
            if enemy.vitals.knockback != Vec2::ZERO {
                motion::integrate_knockback(
                    &self.grid,
                    &mut enemy.position,
                    &mut enemy.vitals.knockback,
                    dt,
                );
                if let Some(destination) = enemy.destination.as_mut() {
                    *destination = enemy.position;
                }
            }
            motion::glide(
                &self.grid,
                &mut enemy.position,
                &mut enemy.destination,
                enemy.stats.move_speed,
                dt,
            );
        }
    }

    fn fire(&mut self, target: Vec2, out_events: &mut Vec<Event>) {
        let player = &mut self.player;
        if !player.vitals.alive || !player.fire_cooldown.is_zero() {
            return;
        }

        let origin = player.position + self.grid.dimensions().half_tile();
        let aim = target - origin;
        let distance = aim.length();
        if distance <= MIN_AIM_DISTANCE {
            return;
        }

        let direction = aim / distance;
        self.projectiles.push(Projectile {
            position: origin,
            direction,
            speed: player.stats.projectile_speed,
            damage: player.stats.projectile_damage,
            sprite: player.stats.projectile_sprite,
        });
        player.fire_cooldown = player.stats.fire_interval;
        out_events.push(Event::ProjectileFired { origin, direction });
    }

    fn strike(&mut self, enemy: EnemyId, out_events: &mut Vec<Event>) {
        let arena = self.grid.dimensions();
        let Some(attacker) = self.enemies.iter_mut().find(|candidate| candidate.id == enemy) else {
            return;
        };
        let Some(hit) = combat::resolve_melee_contact(attacker, &mut self.player, arena) else {
            return;
        };

        out_events.push(Event::PlayerDamaged {
            source: enemy,
            amount: hit.dealt,
            health: hit.health,
        });
        if hit.killed {
            debug!(enemy = enemy.get(), "player defeated");
            self.player.heading = (0, 0);
            out_events.push(Event::PlayerDefeated);
        }
    }

    fn expand(&mut self, amount: u32, out_events: &mut Vec<Event>) {
        let offset = self.grid.expand(amount);
        let shift = Vec2::splat((offset * self.grid.tile_size()) as f32);

        self.player.position += shift;
        for enemy in &mut self.enemies {
            enemy.position += shift;
            if let Some(destination) = enemy.destination.as_mut() {
                *destination += shift;
            }
        }
        for projectile in &mut self.projectiles {
            projectile.position += shift;
        }

        info!(
            columns = self.grid.columns(),
            rows = self.grid.rows(),
            offset,
            "arena expanded"
        );
        out_events.push(Event::MapExpanded {
            arena: self.grid.dimensions(),
        });
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureArena { map } => {
            world.grid.load_from(&map);
            world.enemies.clear();
            world.projectiles.clear();
            let arena = world.grid.dimensions();
            info!(
                columns = arena.columns(),
                rows = arena.rows(),
                tile_size = arena.tile_size(),
                "arena configured"
            );
            world.player.position = arena.clamp_position(PLAYER_START);
            world.player.vitals.knockback = Vec2::ZERO;
            out_events.push(Event::ArenaConfigured { arena });
        }
        Command::Tick { dt } => world.advance(dt, out_events),
        Command::SteerPlayer { dx, dy } => {
            world.player.heading = (dx.signum(), dy.signum());
        }
        Command::FireProjectile { target } => world.fire(target, out_events),
        Command::SwitchPlayerClass { class } => {
            if world.player.class == class {
                return;
            }
            world.player = Player::new(class, world.player.position);
            world.projectiles.clear();
            out_events.push(Event::PlayerClassChanged { class });
        }
        Command::ResetPlayer => {
            let start = world.grid.dimensions().clamp_position(PLAYER_START);
            world.player = Player::new(world.player.class, start);
            world.projectiles.clear();
            out_events.push(Event::PlayerReset);
        }
        Command::SpawnEnemy {
            kind,
            position,
            max_health,
        } => {
            let id = world.allocate_enemy_id();
            let position = world.grid.dimensions().clamp_position(position);
            let max_health = if max_health.is_zero() {
                kind.stats().max_health
            } else {
                max_health
            };
            world.enemies.push(Enemy::new(id, kind, position, max_health));
            out_events.push(Event::EnemySpawned {
                enemy: id,
                kind,
                position,
            });
        }
        Command::RespawnEnemy {
            enemy,
            position,
            max_health,
        } => {
            let position = world.grid.dimensions().clamp_position(position);
            let granted = match world.enemy_mut(enemy) {
                Some(record) if !record.vitals.alive && record.respawn_in.is_zero() => {
                    let max_health = if max_health.is_zero() {
                        record.stats.max_health
                    } else {
                        max_health
                    };
                    record.revive(position, max_health);
                    true
                }
                _ => false,
            };
            if granted {
                out_events.push(Event::EnemyRespawned { enemy, position });
            } else {
                out_events.push(Event::EnemyRespawnRejected { enemy });
            }
        }
        Command::PursueTarget { enemy, destination } => {
            let destination = world.grid.dimensions().clamp_position(destination);
            if let Some(record) = world.enemy_mut(enemy) {
                if record.vitals.alive {
                    record.destination = Some(destination);
                }
            }
        }
        Command::StrikePlayer { enemy } => world.strike(enemy, out_events),
        Command::RelocateEnemy { enemy, position } => {
            let position = world.grid.dimensions().clamp_position(position);
            if let Some(record) = world.enemy_mut(enemy) {
                record.position = position;
                record.destination = None;
            }
        }
        Command::ClearEnemies => {
            world.enemies.clear();
            out_events.push(Event::EnemiesCleared);
        }
        Command::ExpandMap { amount } => world.expand(amount, out_events),
        Command::PaintTile { row, column, tile } => {
            if world.grid.paint(row, column, tile) {
                out_events.push(Event::TileEdited { row, column });
            }
        }
        Command::ClearCell { row, column } => {
            if world.grid.clear_cell(row, column) {
                out_events.push(Event::TileEdited { row, column });
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use dungeonion_core::{
        ArenaDimensions, Channel, EnemyView, MapSnapshot, PlayerSnapshot, ProjectileSnapshot,
    };
    use glam::Vec2;

    use super::{TileWorld, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the world's tile grid.
    #[must_use]
    pub fn tile_world(world: &World) -> &TileWorld {
        &world.grid
    }

    /// Dimensions of the arena.
    #[must_use]
    pub fn arena(world: &World) -> ArenaDimensions {
        world.grid.dimensions()
    }

    /// Reports whether a point is blocked for the given channel.
    #[must_use]
    pub fn is_blocked(world: &World, point: Vec2, channel: Channel) -> bool {
        world.grid.collides(point, channel)
    }

    /// Captures the state of the player.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        world.player.snapshot()
    }

    /// Captures a read-only view of the enemies inhabiting the arena.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(world.enemies.iter().map(|enemy| enemy.snapshot()).collect())
    }

    /// Captures every projectile in flight.
    #[must_use]
    pub fn projectiles(world: &World) -> Vec<ProjectileSnapshot> {
        world
            .projectiles
            .iter()
            .map(|projectile| projectile.snapshot())
            .collect()
    }

    /// Serialises the tile grid.
    #[must_use]
    pub fn map_snapshot(world: &World) -> MapSnapshot {
        world.grid.to_snapshot()
    }

    /// Number of ticks processed since the world was created.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }
}
