#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Dungeonion adapters.
//!
//! Scenes are frozen copies of the simulation taken after an update pass.
//! Backends only draw them; nothing here feeds back into simulation logic.

use anyhow::Result as AnyResult;
use dungeonion_core::{PlayerClass, RoundPhase, TileId};
use glam::Vec2;
use std::{error::Error, fmt, time::Duration};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Movement intent with both components in `-1..=1`.
    pub movement: (i8, i8),
    /// Whether the fire action was newly triggered on this frame.
    pub fire_triggered: bool,
    /// Cursor position expressed in world pixels.
    pub cursor_world_space: Option<Vec2>,
    /// Whether the adapter detected a map expansion request on this frame.
    pub expand_requested: bool,
    /// Whether the adapter detected a reset request on this frame.
    pub reset_requested: bool,
    /// Whether the adapter detected a pause toggle on this frame.
    pub pause_toggled: bool,
}

/// Tile grid prepared for drawing.
#[derive(Clone, Debug, PartialEq)]
pub struct TileLayerPresentation {
    /// Number of columns contained in the grid.
    pub columns: u32,
    /// Number of rows contained in the grid.
    pub rows: u32,
    /// Edge length of a tile in world pixels.
    pub tile_size: u32,
    /// Row-major cell stacks, drawn bottom to top.
    pub cells: Vec<Vec<TileId>>,
}

impl TileLayerPresentation {
    /// Creates a new tile layer descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`RenderingError::InvalidTileSize`] when `tile_size` is zero
    /// and [`RenderingError::CellCountMismatch`] when `cells` does not hold
    /// one stack per grid cell.
    pub fn new(
        columns: u32,
        rows: u32,
        tile_size: u32,
        cells: Vec<Vec<TileId>>,
    ) -> Result<Self, RenderingError> {
        if tile_size == 0 {
            return Err(RenderingError::InvalidTileSize { tile_size });
        }
        let expected = columns as usize * rows as usize;
        if cells.len() != expected {
            return Err(RenderingError::CellCountMismatch {
                expected,
                received: cells.len(),
            });
        }
        Ok(Self {
            columns,
            rows,
            tile_size,
            cells,
        })
    }

    /// Total width of the layer in world pixels.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.columns as f32 * self.tile_size as f32
    }

    /// Total height of the layer in world pixels.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.rows as f32 * self.tile_size as f32
    }

    /// Stack drawn at the provided cell, if it lies inside the layer.
    #[must_use]
    pub fn stack(&self, row: u32, column: u32) -> Option<&[TileId]> {
        if row >= self.rows || column >= self.columns {
            return None;
        }
        self.cells
            .get(row as usize * self.columns as usize + column as usize)
            .map(Vec::as_slice)
    }
}

/// Role an actor plays in the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActorRole {
    /// The player character.
    Player,
    /// A hostile enemy.
    Enemy,
}

/// Actor prepared for drawing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActorPresentation {
    /// Role of the actor.
    pub role: ActorRole,
    /// Top-left position in world pixels.
    pub position: Vec2,
    /// Sprite drawn for the actor.
    pub sprite: TileId,
    /// Remaining health as a fraction of maximum health.
    pub health_ratio: f32,
    /// Strength of the hurt flash in `0.0..=1.0`.
    pub hurt: f32,
    /// Opacity left in the death fade; `None` while alive.
    pub dying: Option<f32>,
}

impl ActorPresentation {
    /// Reports whether the actor should be drawn at all.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.dying.map_or(true, |opacity| opacity > 0.0)
    }
}

/// Projectile prepared for drawing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectilePresentation {
    /// Current position in world pixels.
    pub position: Vec2,
    /// Sprite drawn for the projectile.
    pub sprite: TileId,
}

/// Values shown by the UI sink.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HudPresentation {
    /// Current round number.
    pub round: u32,
    /// Current score.
    pub score: u32,
    /// Number of enemies still alive.
    pub enemies_alive: u32,
    /// Price of the next map expansion.
    pub expansion_cost: u32,
    /// Whether the score covers the next map expansion.
    pub can_afford_expansion: bool,
    /// Player health as a fraction of maximum health.
    pub player_health_ratio: f32,
    /// Active player class.
    pub player_class: PlayerClass,
    /// Phase of the round machine.
    pub phase: RoundPhase,
    /// Whether the simulation is paused.
    pub paused: bool,
}

impl HudPresentation {
    /// Short status line describing the round, as shown between rounds.
    #[must_use]
    pub fn banner(&self) -> Option<String> {
        match self.phase {
            RoundPhase::Playing if self.paused => Some("Paused".to_owned()),
            RoundPhase::Playing => None,
            RoundPhase::BetweenRounds => Some(format!("Round {} Clear!", self.round)),
            RoundPhase::Won => Some("YOU WIN!".to_owned()),
        }
    }
}

/// Describes the complete scene that should be rendered for the current frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Tile grid drawn beneath everything else.
    pub tiles: TileLayerPresentation,
    /// Player and enemies in draw order.
    pub actors: Vec<ActorPresentation>,
    /// Projectiles in flight.
    pub projectiles: Vec<ProjectilePresentation>,
    /// Values displayed by the UI sink.
    pub hud: HudPresentation,
}

impl Scene {
    /// Creates a new scene descriptor.
    #[must_use]
    pub fn new(
        tiles: TileLayerPresentation,
        actors: Vec<ActorPresentation>,
        projectiles: Vec<ProjectilePresentation>,
        hud: HudPresentation,
    ) -> Self {
        Self {
            tiles,
            actors,
            projectiles,
            hud,
        }
    }

    /// Player entry of the scene, if present.
    #[must_use]
    pub fn player(&self) -> Option<&ActorPresentation> {
        self.actors
            .iter()
            .find(|actor| actor.role == ActorRole::Player)
    }
}

/// Describes how a scene should be presented by a backend.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Dungeonion scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the simulated frame delta,
    /// per-frame input captured by the adapter, and may mutate the scene before
    /// it is rendered, allowing adapters to animate world snapshots
    /// deterministically.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq, Eq)]
pub enum RenderingError {
    /// Tiles must have a positive edge length.
    InvalidTileSize {
        /// Provided tile size that failed validation.
        tile_size: u32,
    },
    /// A tile layer must hold exactly one stack per cell.
    CellCountMismatch {
        /// Number of cells implied by the dimensions.
        expected: usize,
        /// Number of stacks provided.
        received: usize,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTileSize { tile_size } => {
                write!(f, "tile_size must be positive (received {tile_size})")
            }
            Self::CellCountMismatch { expected, received } => {
                write!(f, "tile layer expects {expected} cells (received {received})")
            }
        }
    }
}

impl Error for RenderingError {}
