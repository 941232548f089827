//! Window-less rendering backend driven by a scripted autopilot.

use std::time::Duration;

use anyhow::Result as AnyResult;
use dungeonion_rendering::{ActorRole, FrameInput, Presentation, RenderingBackend, Scene};
use glam::Vec2;
use tracing::{debug, info};

/// Headings walked in turn by the autopilot.
const PATROL: [(i8, i8); 4] = [(1, 0), (0, 1), (-1, 0), (0, -1)];
/// Frames spent on each patrol heading.
const PATROL_LEG: u32 = 45;
/// Frames between two shots.
const FIRE_EVERY: u32 = 6;

/// Produces deterministic input from the last presented scene.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Autopilot {
    expand_when_affordable: bool,
}

impl Autopilot {
    pub(crate) const fn new(expand_when_affordable: bool) -> Self {
        Self {
            expand_when_affordable,
        }
    }

    /// Patrols a square and shoots at the nearest living enemy.
    pub(crate) fn input(&self, frame: u32, scene: &Scene) -> FrameInput {
        let heading = PATROL[(frame / PATROL_LEG) as usize % PATROL.len()];
        let mut input = FrameInput {
            movement: heading,
            expand_requested: self.expand_when_affordable && scene.hud.can_afford_expansion,
            ..FrameInput::default()
        };

        if frame % FIRE_EVERY == 0 {
            if let Some(target) = nearest_enemy(scene) {
                input.fire_triggered = true;
                input.cursor_world_space = Some(target);
            }
        }
        input
    }
}

fn nearest_enemy(scene: &Scene) -> Option<Vec2> {
    let origin = scene.player()?.position;
    let half_tile = Vec2::splat(scene.tiles.tile_size as f32 / 2.0);
    scene
        .actors
        .iter()
        .filter(|actor| actor.role == ActorRole::Enemy && actor.dying.is_none())
        .map(|actor| actor.position)
        .min_by(|a, b| a.distance(origin).total_cmp(&b.distance(origin)))
        .map(|position| position + half_tile)
}

/// Backend that advances a fixed number of frames without drawing.
#[derive(Debug)]
pub(crate) struct HeadlessBackend {
    frames: u32,
    frame_time: Duration,
    autopilot: Autopilot,
}

impl HeadlessBackend {
    pub(crate) const fn new(frames: u32, frame_time: Duration, autopilot: Autopilot) -> Self {
        Self {
            frames,
            frame_time,
            autopilot,
        }
    }
}

impl RenderingBackend for HeadlessBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Presentation {
            window_title,
            scene,
            ..
        } = presentation;
        let mut scene = scene;
        info!(title = %window_title, frames = self.frames, "headless run started");

        for frame in 0..self.frames {
            let input = self.autopilot.input(frame, &scene);
            update_scene(self.frame_time, input, &mut scene);
            if let Some(banner) = scene.hud.banner() {
                debug!(frame, %banner, "status");
            }
        }

        info!(
            round = scene.hud.round,
            score = scene.hud.score,
            enemies_alive = scene.hud.enemies_alive,
            "headless run finished"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dungeonion_core::{PlayerClass, RoundPhase, TileId};
    use dungeonion_rendering::{ActorPresentation, HudPresentation, TileLayerPresentation};

    fn actor(role: ActorRole, position: Vec2, dying: Option<f32>) -> ActorPresentation {
        ActorPresentation {
            role,
            position,
            sprite: TileId::new(0),
            health_ratio: 1.0,
            hurt: 0.0,
            dying,
        }
    }

    fn scene(actors: Vec<ActorPresentation>, can_afford_expansion: bool) -> Scene {
        let tiles = TileLayerPresentation::new(1, 1, 16, vec![Vec::new()]).expect("valid layer");
        Scene::new(
            tiles,
            actors,
            Vec::new(),
            HudPresentation {
                round: 1,
                score: 0,
                enemies_alive: 0,
                expansion_cost: 500,
                can_afford_expansion,
                player_health_ratio: 1.0,
                player_class: PlayerClass::Wizard,
                phase: RoundPhase::Playing,
                paused: false,
            },
        )
    }

    #[test]
    fn autopilot_aims_at_the_nearest_living_enemy_centre() {
        let scene = scene(
            vec![
                actor(ActorRole::Enemy, Vec2::new(10.0, 0.0), Some(0.5)),
                actor(ActorRole::Enemy, Vec2::new(100.0, 0.0), None),
                actor(ActorRole::Enemy, Vec2::new(40.0, 0.0), None),
                actor(ActorRole::Player, Vec2::ZERO, None),
            ],
            false,
        );
        let input = Autopilot::new(false).input(0, &scene);
        assert!(input.fire_triggered);
        assert_eq!(input.cursor_world_space, Some(Vec2::new(48.0, 8.0)));
        assert_eq!(input.movement, (1, 0));

        let idle = Autopilot::new(false).input(1, &scene);
        assert!(!idle.fire_triggered);
    }

    #[test]
    fn autopilot_buys_expansions_only_when_enabled() {
        let affordable = scene(vec![actor(ActorRole::Player, Vec2::ZERO, None)], true);
        assert!(Autopilot::new(true).input(3, &affordable).expand_requested);
        assert!(!Autopilot::new(false).input(3, &affordable).expand_requested);
    }

    #[test]
    fn autopilot_patrols_a_square() {
        let scene = scene(vec![actor(ActorRole::Player, Vec2::ZERO, None)], false);
        let pilot = Autopilot::default();
        assert_eq!(pilot.input(PATROL_LEG, &scene).movement, (0, 1));
        assert_eq!(pilot.input(PATROL_LEG * 4, &scene).movement, (1, 0));
    }
}
