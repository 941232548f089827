#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Tick driver that owns the Dungeonion world and its systems.
//!
//! A [`Session`] runs one update pass per [`Session::step`]: player input is
//! turned into commands, time advances inside the world, the enemy AI reacts,
//! and the round director paces the waves. Render and UI sinks read frozen
//! scenes built after the pass completes.

use std::time::Duration;

use dungeonion_core::{
    Channel, Command, Event, MapSnapshot, PlayerClass, RoundPhase, UnknownTypeError, HURT_FLASH,
    MAX_MAP_SIDE,
};
use dungeonion_rendering::{
    ActorPresentation, ActorRole, FrameInput, HudPresentation, ProjectilePresentation,
    RenderingError, Scene, TileLayerPresentation,
};
use dungeonion_system_enemy_ai::{self as enemy_ai, EnemyAi};
use dungeonion_system_player_control::{PlayerControl, PlayerInput};
use dungeonion_system_round_director::{self as round_director, RoundDirector, RoundState};
use dungeonion_world::{self as world, query, World};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

/// Parameters used to build a [`Session`].
#[derive(Clone, Debug, PartialEq)]
pub struct SessionConfig {
    /// Seed every random stream of the session is derived from.
    pub seed: u64,
    /// Class the player starts as.
    pub player_class: PlayerClass,
    /// Map loaded instead of the default dungeon.
    pub map: Option<MapSnapshot>,
    /// Round director tuning. Its seed is replaced by one derived from `seed`.
    pub director: round_director::Config,
    /// Enemy AI tuning. Its seed is replaced by one derived from `seed`.
    pub enemy_ai: enemy_ai::Config,
}

impl SessionConfig {
    /// Creates a configuration with default tuning and the provided seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            player_class: PlayerClass::default(),
            map: None,
            director: round_director::Config::default(),
            enemy_ai: enemy_ai::Config::default(),
        }
    }

    /// Selects the starting player class.
    #[must_use]
    pub fn with_class(mut self, player_class: PlayerClass) -> Self {
        self.player_class = player_class;
        self
    }

    /// Selects the starting player class by its registered name.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownTypeError::PlayerClass`] when no class carries `name`.
    pub fn with_class_name(self, name: &str) -> Result<Self, UnknownTypeError> {
        let class = name.parse::<PlayerClass>()?;
        Ok(self.with_class(class))
    }

    /// Loads the provided map instead of the default dungeon.
    #[must_use]
    pub fn with_map(mut self, map: MapSnapshot) -> Self {
        self.map = Some(map);
        self
    }

    /// Replaces the round director tuning.
    #[must_use]
    pub fn with_director(mut self, director: round_director::Config) -> Self {
        self.director = director;
        self
    }

    /// Replaces the enemy AI tuning.
    #[must_use]
    pub fn with_enemy_ai(mut self, enemy_ai: enemy_ai::Config) -> Self {
        self.enemy_ai = enemy_ai;
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Running arena session.
#[derive(Debug)]
pub struct Session {
    world: World,
    player_control: PlayerControl,
    enemy_ai: EnemyAi,
    director: RoundDirector,
    paused: bool,
    events: Vec<Event>,
}

impl Session {
    /// Builds a session from the provided configuration.
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        let mut seeder = ChaCha8Rng::seed_from_u64(config.seed);
        let world_seed = seeder.next_u64();
        let director_seed = seeder.next_u64();
        let ai_seed = seeder.next_u64();

        let mut session = Self {
            world: World::with_seed(world_seed),
            player_control: PlayerControl::new(),
            enemy_ai: EnemyAi::new(config.enemy_ai.with_seed(ai_seed)),
            director: RoundDirector::new(config.director.with_seed(director_seed)),
            paused: false,
            events: Vec::new(),
        };

        if let Some(map) = config.map {
            let _ = session.submit(Command::ConfigureArena { map });
        }
        let _ = session.submit(Command::SwitchPlayerClass {
            class: config.player_class,
        });

        let arena = query::arena(&session.world);
        info!(
            seed = config.seed,
            columns = arena.columns(),
            rows = arena.rows(),
            class = %config.player_class,
            "session ready"
        );
        session
    }

    /// Runs one update pass and returns every event it produced.
    ///
    /// Nothing happens while the session is paused.
    pub fn step(&mut self, input: &PlayerInput, dt: Duration) -> &[Event] {
        self.events.clear();
        if self.paused {
            return &self.events;
        }

        let phase = self.director.state().phase();
        let mut commands = Vec::new();
        let player = query::player(&self.world);
        self.player_control
            .handle(input, &player, phase, &mut commands);
        commands.push(Command::Tick { dt });
        for command in commands {
            world::apply(&mut self.world, command, &mut self.events);
        }

        let mut ai_commands = Vec::new();
        {
            let world = &self.world;
            let enemies = query::enemy_view(world);
            let player = query::player(world);
            self.enemy_ai.handle(
                &self.events,
                &enemies,
                &player,
                query::arena(world),
                |point| query::is_blocked(world, point, Channel::Physical),
                &mut ai_commands,
            );
        }
        for command in ai_commands {
            world::apply(&mut self.world, command, &mut self.events);
        }

        let mut director_commands = Vec::new();
        {
            let world = &self.world;
            let enemies = query::enemy_view(world);
            let player = query::player(world);
            self.director.handle(
                &self.events,
                &enemies,
                &player,
                query::arena(world),
                |point| query::is_blocked(world, point, Channel::Physical),
                &mut director_commands,
            );
        }
        let mut outcomes = Vec::new();
        for command in director_commands {
            world::apply(&mut self.world, command, &mut outcomes);
        }
        if !outcomes.is_empty() {
            let world = &self.world;
            let mut ignored = Vec::new();
            self.director.handle(
                &outcomes,
                &query::enemy_view(world),
                &query::player(world),
                query::arena(world),
                |point| query::is_blocked(world, point, Channel::Physical),
                &mut ignored,
            );
        }
        self.events.append(&mut outcomes);

        let next_phase = self.director.state().phase();
        if phase == RoundPhase::BetweenRounds && next_phase == RoundPhase::Playing {
            self.enemy_ai.reset();
        }
        if next_phase == RoundPhase::Won {
            self.paused = true;
        }

        &self.events
    }

    /// Applies a host frame: toggles, reset and expansion requests first,
    /// then one update pass driven by the frame's movement and aim.
    pub fn handle_frame(&mut self, dt: Duration, frame: FrameInput) -> &[Event] {
        if frame.pause_toggled {
            if self.paused {
                self.resume();
            } else {
                self.pause();
            }
        }
        if frame.reset_requested {
            self.reset();
        }
        if frame.expand_requested {
            let _ = self.expand_map();
        }
        let input = player_input(&frame);
        self.step(&input, dt)
    }

    /// Applies a single command outside the update pass, as the map editor
    /// and debugging tools do.
    pub fn submit(&mut self, command: Command) -> Vec<Event> {
        let restarts_wave = matches!(
            command,
            Command::ConfigureArena { .. } | Command::ClearEnemies
        );
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        if restarts_wave {
            self.director.restart_wave();
            self.enemy_ai.reset();
        }
        events
    }

    /// Suspends update passes. Scenes can still be read.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resumes update passes unless the session has been won.
    pub fn resume(&mut self) {
        self.paused = self.director.state().phase() == RoundPhase::Won;
    }

    /// Reports whether update passes are suspended.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Snapshot of the round state.
    #[must_use]
    pub const fn round_state(&self) -> RoundState {
        self.director.state()
    }

    /// Read-only access to the world.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Buys a map expansion when the score covers it and the grid can still
    /// grow.
    pub fn expand_map(&mut self) -> bool {
        let arena = query::arena(&self.world);
        if arena.columns().max(arena.rows()) >= MAX_MAP_SIDE {
            debug!(
                columns = arena.columns(),
                rows = arena.rows(),
                "arena already at maximum size"
            );
            return false;
        }

        let mut commands = Vec::new();
        if !self.director.request_map_expansion(&mut commands) {
            debug!(
                score = self.director.state().score(),
                cost = self.director.state().expansion_cost(),
                "map expansion unaffordable"
            );
            return false;
        }
        for command in commands {
            let _ = self.submit(command);
        }
        true
    }

    /// Switches the player to another class. Returns `false` when the player
    /// already had that class.
    pub fn switch_player_class(&mut self, class: PlayerClass) -> bool {
        let events = self.submit(Command::SwitchPlayerClass { class });
        events
            .iter()
            .any(|event| matches!(event, Event::PlayerClassChanged { .. }))
    }

    /// Restores the player, removes every enemy and repopulates the current
    /// wave from scratch. Round number and score are kept.
    pub fn reset(&mut self) {
        let _ = self.submit(Command::ResetPlayer);
        let _ = self.submit(Command::ClearEnemies);
        info!(round = self.director.state().round(), "session reset");
    }

    /// Serialises the current map.
    #[must_use]
    pub fn map_snapshot(&self) -> MapSnapshot {
        query::map_snapshot(&self.world)
    }

    /// Replaces the map, clearing enemies and projectiles.
    pub fn load_map(&mut self, snapshot: MapSnapshot) {
        let events = self.submit(Command::ConfigureArena { map: snapshot });
        for event in events {
            if let Event::ArenaConfigured { arena } = event {
                info!(
                    columns = arena.columns(),
                    rows = arena.rows(),
                    tile_size = arena.tile_size(),
                    "map loaded"
                );
            }
        }
    }

    /// Values shown by the UI sink.
    #[must_use]
    pub fn hud(&self) -> HudPresentation {
        let state = self.director.state();
        let player = query::player(&self.world);
        let enemies = query::enemy_view(&self.world);
        HudPresentation {
            round: state.round(),
            score: state.score(),
            enemies_alive: u32::try_from(enemies.alive_count()).unwrap_or(u32::MAX),
            expansion_cost: state.expansion_cost(),
            can_afford_expansion: state.can_afford_expansion(),
            player_health_ratio: player.health.ratio_of(player.max_health),
            player_class: player.class,
            phase: state.phase(),
            paused: self.paused,
        }
    }

    /// Frozen copy of everything the render sink draws.
    ///
    /// # Errors
    ///
    /// Propagates [`RenderingError`] when the tile grid cannot be described.
    pub fn scene(&self) -> Result<Scene, RenderingError> {
        let grid = query::tile_world(&self.world);
        let cells = grid
            .iter_cells()
            .map(|(_, _, stack)| stack.to_vec())
            .collect();
        let tiles =
            TileLayerPresentation::new(grid.columns(), grid.rows(), grid.tile_size(), cells)?;

        let enemies = query::enemy_view(&self.world);
        let mut actors = Vec::with_capacity(enemies.len() + 1);
        for enemy in enemies.iter() {
            let stats = enemy.kind.stats();
            let dying = (!enemy.is_alive()).then(|| {
                fraction(enemy.death_animation, stats.death_animation)
            });
            actors.push(ActorPresentation {
                role: ActorRole::Enemy,
                position: enemy.position,
                sprite: stats.sprite,
                health_ratio: enemy.health.ratio_of(enemy.max_health),
                hurt: fraction(enemy.hurt_flash, HURT_FLASH),
                dying,
            });
        }

        let player = query::player(&self.world);
        actors.push(ActorPresentation {
            role: ActorRole::Player,
            position: player.position,
            sprite: player.class.stats().sprite,
            health_ratio: player.health.ratio_of(player.max_health),
            hurt: 0.0,
            dying: (!player.alive).then_some(1.0),
        });

        let projectiles = query::projectiles(&self.world)
            .into_iter()
            .map(|projectile| ProjectilePresentation {
                position: projectile.position,
                sprite: projectile.sprite,
            })
            .collect();

        Ok(Scene::new(tiles, actors, projectiles, self.hud()))
    }
}

/// Translates a host frame into the input consumed by player control.
#[must_use]
pub fn player_input(frame: &FrameInput) -> PlayerInput {
    PlayerInput {
        dx: frame.movement.0.signum(),
        dy: frame.movement.1.signum(),
        fire_triggered: frame.fire_triggered,
        cursor_world: frame.cursor_world_space,
    }
}

fn fraction(remaining: Duration, total: Duration) -> f32 {
    if total.is_zero() {
        return 0.0;
    }
    (remaining.as_secs_f32() / total.as_secs_f32()).clamp(0.0, 1.0)
}
