#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Dungeonion arena engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! for systems to react to deterministically. Systems consume event streams,
//! query immutable snapshots, and respond exclusively with new command batches.

use std::{fmt, str::FromStr, time::Duration};

use glam::Vec2;
use serde::{de::IgnoredAny, Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Dungeonion.";

/// Edge length of a tile in world pixels when a map does not specify one.
pub const DEFAULT_TILE_SIZE: u32 = 16;

/// Column count used when a map snapshot omits its width.
pub const DEFAULT_MAP_COLUMNS: u32 = 32;

/// Row count used when a map snapshot omits its height.
pub const DEFAULT_MAP_ROWS: u32 = 20;

/// Largest number of columns or rows a tile grid may have.
pub const MAX_MAP_SIDE: u32 = 1_024;

/// Largest tile edge length accepted from a map snapshot.
pub const MAX_TILE_SIZE: u32 = 256;

/// Position the player occupies when a session starts or is reset.
pub const PLAYER_START: Vec2 = Vec2::new(256.0, 160.0);

/// Centre distance below which an enemy can strike the player.
pub const MELEE_RADIUS: f32 = 16.0;

/// Centre distance below which a projectile hits an enemy.
pub const PROJECTILE_HIT_RADIUS: f32 = 12.0;

/// How long an enemy flashes after taking damage.
pub const HURT_FLASH: Duration = Duration::from_millis(150);

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces the tile grid with the provided snapshot and clears all actors
    /// except the player, who returns to the start position.
    ConfigureArena {
        /// Snapshot describing the tile grid to load.
        map: MapSnapshot,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Sets the movement heading the player follows on subsequent ticks.
    SteerPlayer {
        /// Horizontal heading component in `-1..=1`.
        dx: i8,
        /// Vertical heading component in `-1..=1`.
        dy: i8,
    },
    /// Requests that the player launch a projectile toward a world position.
    FireProjectile {
        /// World-space point the projectile should travel toward.
        target: Vec2,
    },
    /// Rebuilds the player with another class while keeping its position.
    SwitchPlayerClass {
        /// Class the player should adopt.
        class: PlayerClass,
    },
    /// Restores the player to full health at the start position.
    ResetPlayer,
    /// Creates a new enemy at the provided position.
    SpawnEnemy {
        /// Type of enemy to construct.
        kind: EnemyKind,
        /// World position the enemy starts at.
        position: Vec2,
        /// Maximum health granted to the enemy, already scaled by the caller.
        max_health: Health,
    },
    /// Returns a dead enemy to the arena once its respawn delay elapsed.
    RespawnEnemy {
        /// Identifier of the dead enemy.
        enemy: EnemyId,
        /// World position the enemy reappears at.
        position: Vec2,
        /// Maximum health granted for the new life.
        max_health: Health,
    },
    /// Orders an enemy to walk toward the provided destination.
    PursueTarget {
        /// Identifier of the enemy receiving the order.
        enemy: EnemyId,
        /// World position the enemy should glide toward.
        destination: Vec2,
    },
    /// Requests that an enemy hit the player with a melee attack.
    StrikePlayer {
        /// Identifier of the attacking enemy.
        enemy: EnemyId,
    },
    /// Moves an enemy directly to a new position, cancelling its movement.
    RelocateEnemy {
        /// Identifier of the enemy to move.
        enemy: EnemyId,
        /// Destination of the relocation.
        position: Vec2,
    },
    /// Removes every enemy from the arena.
    ClearEnemies,
    /// Grows the tile grid on every side, keeping existing tiles centred.
    ExpandMap {
        /// Number of tiles added to both the width and the height.
        amount: u32,
    },
    /// Pushes a tile onto the top of a cell stack.
    PaintTile {
        /// Row of the edited cell.
        row: u32,
        /// Column of the edited cell.
        column: u32,
        /// Tile placed on top of the stack.
        tile: TileId,
    },
    /// Removes every tile from a cell stack.
    ClearCell {
        /// Row of the edited cell.
        row: u32,
        /// Column of the edited cell.
        column: u32,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a new tile grid was loaded.
    ArenaConfigured {
        /// Dimensions of the loaded grid.
        arena: ArenaDimensions,
    },
    /// Confirms that the tile grid grew.
    MapExpanded {
        /// Dimensions of the grid after expansion.
        arena: ArenaDimensions,
    },
    /// Reports that a cell stack was edited.
    TileEdited {
        /// Row of the edited cell.
        row: u32,
        /// Column of the edited cell.
        column: u32,
    },
    /// Confirms that the player changed position during a tick.
    PlayerMoved {
        /// Position before the tick.
        from: Vec2,
        /// Position after the tick.
        to: Vec2,
    },
    /// Announces that the player adopted a new class.
    PlayerClassChanged {
        /// Class that became active.
        class: PlayerClass,
    },
    /// Reports that the player lost health to an enemy strike.
    PlayerDamaged {
        /// Enemy that landed the strike.
        source: EnemyId,
        /// Health removed by the strike.
        amount: u32,
        /// Health remaining after the strike.
        health: Health,
    },
    /// Announces that the player's health reached zero.
    PlayerDefeated,
    /// Confirms that the player was restored to the start position.
    PlayerReset,
    /// Confirms that the player launched a projectile.
    ProjectileFired {
        /// Point the projectile starts from.
        origin: Vec2,
        /// Unit direction of travel.
        direction: Vec2,
    },
    /// Reports that a projectile was removed from the arena.
    ProjectileConsumed {
        /// Last position of the projectile.
        position: Vec2,
        /// Why the projectile was removed.
        reason: ProjectileOutcome,
    },
    /// Confirms that a new enemy entered the arena.
    EnemySpawned {
        /// Identifier allocated to the enemy.
        enemy: EnemyId,
        /// Type of the enemy.
        kind: EnemyKind,
        /// Position the enemy starts at.
        position: Vec2,
    },
    /// Confirms that a dead enemy returned to the arena.
    EnemyRespawned {
        /// Identifier of the returning enemy.
        enemy: EnemyId,
        /// Position the enemy reappeared at.
        position: Vec2,
    },
    /// Reports that a respawn request was refused.
    EnemyRespawnRejected {
        /// Identifier named in the request.
        enemy: EnemyId,
    },
    /// Reports that a dead enemy's respawn delay elapsed.
    EnemyRespawnReady {
        /// Identifier of the enemy that may now be granted a respawn slot.
        enemy: EnemyId,
    },
    /// Reports that an enemy lost health.
    EnemyDamaged {
        /// Identifier of the wounded enemy.
        enemy: EnemyId,
        /// Health removed by the hit.
        amount: u32,
        /// Health remaining after the hit.
        health: Health,
    },
    /// Announces that an enemy's health reached zero.
    EnemyDied {
        /// Identifier of the defeated enemy.
        enemy: EnemyId,
        /// Type of the defeated enemy.
        kind: EnemyKind,
    },
    /// Announces that all enemies were removed from the arena.
    EnemiesCleared,
}

/// Reason a projectile left the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProjectileOutcome {
    /// The projectile struck an enemy.
    HitEnemy(EnemyId),
    /// The projectile entered a cell that blocks magic.
    Blocked,
    /// The projectile left the arena bounds.
    OutOfBounds,
}

/// Passability category used when querying the tile grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Solid bodies such as the player and enemies.
    Physical,
    /// Projectiles and other magical effects.
    Magic,
}

/// Index into the tile property table and sprite atlas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileId(u32);

impl TileId {
    /// Floor tile used to fill cells exposed by map expansion.
    pub const DEFAULT_FLOOR: TileId = TileId(51);

    /// Creates a new tile identifier.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric tile index.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Whole hit points carried by an actor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Health(u32);

impl Health {
    /// Health value representing a dead actor.
    pub const ZERO: Health = Health(0);

    /// Creates a new health value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric health value.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Reports whether no hit points remain.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Removes damage, stopping at zero.
    #[must_use]
    pub const fn saturating_sub(self, amount: u32) -> Self {
        Self(self.0.saturating_sub(amount))
    }

    /// Fraction of `max` remaining, in `0.0..=1.0`.
    #[must_use]
    pub fn ratio_of(self, max: Health) -> f32 {
        if max.0 == 0 {
            return 0.0;
        }
        (self.0 as f32 / max.0 as f32).clamp(0.0, 1.0)
    }
}

/// Size of the tile grid, used for clamping and spawn placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ArenaDimensions {
    columns: u32,
    rows: u32,
    tile_size: u32,
}

impl ArenaDimensions {
    /// Creates a new dimension descriptor.
    #[must_use]
    pub const fn new(columns: u32, rows: u32, tile_size: u32) -> Self {
        Self {
            columns,
            rows,
            tile_size,
        }
    }

    /// Number of tile columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of tile rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Edge length of a tile in world pixels.
    #[must_use]
    pub const fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Total width of the grid in world pixels.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.columns as f32 * self.tile_size as f32
    }

    /// Total height of the grid in world pixels.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.rows as f32 * self.tile_size as f32
    }

    /// Largest position an actor may occupy; actors span a whole tile.
    #[must_use]
    pub fn max_position(&self) -> Vec2 {
        let tile = self.tile_size as f32;
        Vec2::new(
            (self.width() - tile).max(0.0),
            (self.height() - tile).max(0.0),
        )
    }

    /// Clamps an actor position into `[0, width - tile] × [0, height - tile]`.
    #[must_use]
    pub fn clamp_position(&self, position: Vec2) -> Vec2 {
        position.clamp(Vec2::ZERO, self.max_position())
    }

    /// Reports whether a point lies within the grid's pixel extent.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= 0.0 && point.y >= 0.0 && point.x < self.width() && point.y < self.height()
    }

    /// Offset from an actor's position to its centre.
    #[must_use]
    pub fn half_tile(&self) -> Vec2 {
        Vec2::splat(self.tile_size as f32 / 2.0)
    }
}

/// Error returned when a type table is asked for a name it does not contain.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum UnknownTypeError {
    /// No enemy type is registered under the name.
    #[error("enemy type \"{name}\" not found")]
    Enemy {
        /// Name that failed to resolve.
        name: String,
    },
    /// No player class is registered under the name.
    #[error("player class \"{name}\" not found")]
    PlayerClass {
        /// Name that failed to resolve.
        name: String,
    },
}

/// Types of enemies that can inhabit the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EnemyKind {
    /// Scuttling melee enemy.
    Crab,
}

impl EnemyKind {
    /// Every registered enemy type.
    pub const ALL: [EnemyKind; 1] = [EnemyKind::Crab];

    /// Lower-case name used by configuration files.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Crab => "crab",
        }
    }

    /// Immutable statistics for the enemy type.
    #[must_use]
    pub const fn stats(self) -> EnemyStats {
        match self {
            Self::Crab => EnemyStats {
                sprite: TileId::new(110),
                max_health: Health::new(10),
                move_speed: 40.0,
                damage: 10,
                min_spawn_distance: Some(100.0),
                attack_interval: Duration::from_millis(1_000),
                knockback_force: 120.0,
                respawn_delay_min: Duration::from_millis(3_000),
                respawn_delay_max: Duration::from_millis(8_000),
                death_animation: Duration::from_millis(500),
                kill_reward: 10,
            },
        }
    }
}

impl fmt::Display for EnemyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EnemyKind {
    type Err = UnknownTypeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| UnknownTypeError::Enemy {
                name: value.to_owned(),
            })
    }
}

/// Statistics shared by every enemy of one type.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyStats {
    /// Sprite drawn for the enemy.
    pub sprite: TileId,
    /// Health granted at round one.
    pub max_health: Health,
    /// Gliding speed in pixels per second.
    pub move_speed: f32,
    /// Health removed from the player per strike.
    pub damage: u32,
    /// Minimum distance from the player at spawn, if the type sets one.
    pub min_spawn_distance: Option<f32>,
    /// Delay between two strikes.
    pub attack_interval: Duration,
    /// Speed of the impulse received when hit, in pixels per second.
    pub knockback_force: f32,
    /// Shortest delay before a dead enemy may return.
    pub respawn_delay_min: Duration,
    /// Longest delay before a dead enemy may return.
    pub respawn_delay_max: Duration,
    /// Length of the death animation.
    pub death_animation: Duration,
    /// Score credited per kill before round scaling.
    pub kill_reward: u32,
}

/// Classes the player can choose from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PlayerClass {
    /// Nimble spellcaster hurling potions at a high rate.
    Wizard,
    /// Armoured guardian trading speed for durability.
    Paladin,
}

impl PlayerClass {
    /// Every registered player class.
    pub const ALL: [PlayerClass; 2] = [PlayerClass::Wizard, PlayerClass::Paladin];

    /// Lower-case name used by configuration files.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Wizard => "wizard",
            Self::Paladin => "paladin",
        }
    }

    /// Immutable statistics for the class.
    #[must_use]
    pub const fn stats(self) -> PlayerStats {
        match self {
            Self::Wizard => PlayerStats {
                sprite: TileId::new(84),
                max_health: Health::new(100),
                move_speed: 120.0,
                projectile_damage: 5,
                projectile_speed: 250.0,
                fire_interval: Duration::from_millis(200),
                projectile_sprite: TileId::new(115),
                knockback_force: 0.0,
            },
            Self::Paladin => PlayerStats {
                sprite: TileId::new(72),
                max_health: Health::new(150),
                move_speed: 90.0,
                projectile_damage: 8,
                projectile_speed: 220.0,
                fire_interval: Duration::from_millis(320),
                projectile_sprite: TileId::new(117),
                knockback_force: 0.0,
            },
        }
    }
}

impl Default for PlayerClass {
    fn default() -> Self {
        Self::Wizard
    }
}

impl fmt::Display for PlayerClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PlayerClass {
    type Err = UnknownTypeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|class| class.name().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| UnknownTypeError::PlayerClass {
                name: value.to_owned(),
            })
    }
}

/// Statistics attached to a player class.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerStats {
    /// Sprite drawn for the player.
    pub sprite: TileId,
    /// Health at full strength.
    pub max_health: Health,
    /// Walking speed in pixels per second.
    pub move_speed: f32,
    /// Health removed from an enemy per projectile.
    pub projectile_damage: u32,
    /// Projectile travel speed in pixels per second.
    pub projectile_speed: f32,
    /// Delay between two shots.
    pub fire_interval: Duration,
    /// Sprite drawn for the class's projectiles.
    pub projectile_sprite: TileId,
    /// Speed of the impulse received when hit, in pixels per second.
    pub knockback_force: f32,
}

/// Lifecycle phase of the round director.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RoundPhase {
    /// Enemies are active and the wave is being fought.
    Playing,
    /// The wave was cleared and the next round is pending.
    BetweenRounds,
    /// The final round was cleared.
    Won,
}

/// Behaviour state of a single enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnemyBehavior {
    /// Freshly spawned or respawned, waiting for a pursuit order.
    Idle,
    /// Following the last known player position.
    Pursuing,
    /// Landed a strike during the current tick.
    Attacking,
    /// Health reached zero; waiting for a respawn slot.
    Dead,
}

/// Immutable representation of the player used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// Active class.
    pub class: PlayerClass,
    /// Top-left position in world pixels.
    pub position: Vec2,
    /// Current movement heading.
    pub heading: (i8, i8),
    /// Remaining health.
    pub health: Health,
    /// Health at full strength.
    pub max_health: Health,
    /// Whether the player is still standing.
    pub alive: bool,
    /// Time left before the player may fire again.
    pub fire_cooldown: Duration,
    /// Current knockback velocity.
    pub knockback: Vec2,
}

/// Immutable representation of a single enemy used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Type of the enemy.
    pub kind: EnemyKind,
    /// Top-left position in world pixels.
    pub position: Vec2,
    /// Destination of the current glide, if any.
    pub destination: Option<Vec2>,
    /// Remaining health.
    pub health: Health,
    /// Health at full strength for the current life.
    pub max_health: Health,
    /// Behaviour state.
    pub behavior: EnemyBehavior,
    /// Time left before the enemy may strike again.
    pub attack_cooldown: Duration,
    /// Time left before a dead enemy may be granted a respawn slot.
    pub respawn_in: Duration,
    /// Remaining length of the death animation.
    pub death_animation: Duration,
    /// Remaining length of the hurt flash.
    pub hurt_flash: Duration,
    /// Current knockback velocity.
    pub knockback: Vec2,
}

impl EnemySnapshot {
    /// Reports whether the enemy is alive.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.behavior != EnemyBehavior::Dead
    }

    /// Reports whether a dead enemy's respawn delay elapsed.
    #[must_use]
    pub fn respawn_ready(&self) -> bool {
        !self.is_alive() && self.respawn_in.is_zero()
    }
}

/// Read-only snapshot describing all enemies within the arena.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Retrieves the snapshot of a single enemy.
    #[must_use]
    pub fn get(&self, enemy: EnemyId) -> Option<&EnemySnapshot> {
        self.snapshots
            .binary_search_by_key(&enemy, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Number of enemies that are still alive.
    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.snapshots.iter().filter(|enemy| enemy.is_alive()).count()
    }

    /// Total number of enemies, dead or alive.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no enemies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a projectile in flight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Current position in world pixels.
    pub position: Vec2,
    /// Unit direction of travel.
    pub direction: Vec2,
    /// Sprite drawn for the projectile.
    pub sprite: TileId,
}

/// Serialisable layout of the tile grid.
///
/// Deserialisation never fails on malformed content: missing, zero or
/// oversized dimensions fall back to the defaults and any cell that is not a
/// list of tile indices loads as an empty stack.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapSnapshot {
    /// Number of tile columns.
    #[serde(
        default = "default_map_columns",
        deserialize_with = "lenient_columns"
    )]
    pub width: u32,
    /// Number of tile rows.
    #[serde(default = "default_map_rows", deserialize_with = "lenient_rows")]
    pub height: u32,
    /// Edge length of a tile in world pixels.
    #[serde(default = "default_tile_size", deserialize_with = "lenient_tile_size")]
    pub tile_size: u32,
    /// Row-major cell stacks, bottom layer first.
    #[serde(default, deserialize_with = "lenient_grid")]
    pub grid: Vec<Vec<Vec<TileId>>>,
}

impl MapSnapshot {
    /// Creates a snapshot of a grid filled with a single tile.
    #[must_use]
    pub fn filled(width: u32, height: u32, tile_size: u32, tile: TileId) -> Self {
        let row = vec![vec![tile]; width as usize];
        Self {
            width,
            height,
            tile_size,
            grid: vec![row; height as usize],
        }
    }

    /// Dimensions described by the snapshot.
    #[must_use]
    pub const fn dimensions(&self) -> ArenaDimensions {
        ArenaDimensions::new(self.width, self.height, self.tile_size)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient<T> {
    Value(T),
    Malformed(IgnoredAny),
}

impl<T> Lenient<T> {
    fn into_option(self) -> Option<T> {
        match self {
            Self::Value(value) => Some(value),
            Self::Malformed(_) => None,
        }
    }
}

fn default_map_columns() -> u32 {
    DEFAULT_MAP_COLUMNS
}

fn default_map_rows() -> u32 {
    DEFAULT_MAP_ROWS
}

fn default_tile_size() -> u32 {
    DEFAULT_TILE_SIZE
}

fn lenient_dimension<'de, D>(deserializer: D, fallback: u32, max: u32) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Lenient::<u32>::deserialize(deserializer)?.into_option();
    Ok(value
        .filter(|value| (1..=max).contains(value))
        .unwrap_or(fallback))
}

fn lenient_columns<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_dimension(deserializer, DEFAULT_MAP_COLUMNS, MAX_MAP_SIDE)
}

fn lenient_rows<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_dimension(deserializer, DEFAULT_MAP_ROWS, MAX_MAP_SIDE)
}

fn lenient_tile_size<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_dimension(deserializer, DEFAULT_TILE_SIZE, MAX_TILE_SIZE)
}

fn lenient_grid<'de, D>(deserializer: D) -> Result<Vec<Vec<Vec<TileId>>>, D::Error>
where
    D: Deserializer<'de>,
{
    let rows = Lenient::<Vec<Lenient<Vec<Lenient<Vec<TileId>>>>>>::deserialize(deserializer)?
        .into_option()
        .unwrap_or_default();

    Ok(rows
        .into_iter()
        .map(|row| {
            row.into_option()
                .unwrap_or_default()
                .into_iter()
                .map(|cell| cell.into_option().unwrap_or_default())
                .collect()
        })
        .collect())
}
