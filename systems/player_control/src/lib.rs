#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Translates host input into player commands.

use dungeonion_core::{Command, PlayerSnapshot, RoundPhase};
use glam::Vec2;

/// Input sampled from the host for a single frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlayerInput {
    /// Horizontal movement intent in `-1..=1`.
    pub dx: i8,
    /// Vertical movement intent in `-1..=1`.
    pub dy: i8,
    /// Whether the fire action was newly triggered this frame.
    pub fire_triggered: bool,
    /// World position under the cursor, if the host tracks one.
    pub cursor_world: Option<Vec2>,
}

impl PlayerInput {
    /// Input describing a player standing still.
    pub const IDLE: PlayerInput = PlayerInput {
        dx: 0,
        dy: 0,
        fire_triggered: false,
        cursor_world: None,
    };

    /// Creates input that only moves along the provided heading.
    #[must_use]
    pub const fn moving(dx: i8, dy: i8) -> Self {
        Self {
            dx,
            dy,
            fire_triggered: false,
            cursor_world: None,
        }
    }

    /// Adds a fire action aimed at `target`.
    #[must_use]
    pub const fn firing_at(mut self, target: Vec2) -> Self {
        self.fire_triggered = true;
        self.cursor_world = Some(target);
        self
    }
}

/// Pure system turning [`PlayerInput`] into world commands.
#[derive(Debug, Default)]
pub struct PlayerControl;

impl PlayerControl {
    /// Creates a new player control system.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Emits the commands implied by the frame's input.
    ///
    /// Steering is only issued when the heading changes. Fire actions are
    /// dropped outside the playing phase or once the player has fallen.
    pub fn handle(
        &self,
        input: &PlayerInput,
        player: &PlayerSnapshot,
        phase: RoundPhase,
        out: &mut Vec<Command>,
    ) {
        if phase == RoundPhase::Won {
            return;
        }

        let heading = (input.dx.signum(), input.dy.signum());
        if heading != player.heading {
            out.push(Command::SteerPlayer {
                dx: heading.0,
                dy: heading.1,
            });
        }

        if !input.fire_triggered || !player.alive || phase != RoundPhase::Playing {
            return;
        }
        if let Some(target) = input.cursor_world {
            out.push(Command::FireProjectile { target });
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use dungeonion_core::{Health, PlayerClass};

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

    #[test]
    fn steering_is_emitted_only_on_change() {
        let control = PlayerControl::new();
        let mut commands = Vec::new();
        control.handle(&PlayerInput::IDLE, &player(), RoundPhase::Playing, &mut commands);
        assert!(commands.is_empty());

        control.handle(&PlayerInput::moving(5, -1), &player(), RoundPhase::Playing, &mut commands);
        assert_eq!(commands, vec![Command::SteerPlayer { dx: 1, dy: -1 }]);
    }

    #[test]
    fn fire_requires_playing_phase_and_cursor() {
        let control = PlayerControl::new();
        let target = Vec2::new(400.0, 160.0);
        let mut commands = Vec::new();

        control.handle(
            &PlayerInput::IDLE.firing_at(target),
            &player(),
            RoundPhase::BetweenRounds,
            &mut commands,
        );
        assert!(commands.is_empty());

        let mut blind = PlayerInput::IDLE;
        blind.fire_triggered = true;
        control.handle(&blind, &player(), RoundPhase::Playing, &mut commands);
        assert!(commands.is_empty());

        control.handle(
            &PlayerInput::IDLE.firing_at(target),
            &player(),
            RoundPhase::Playing,
            &mut commands,
        );
        assert_eq!(commands, vec![Command::FireProjectile { target }]);
    }

    #[test]
    fn fallen_player_cannot_fire() {
        let control = PlayerControl::new();
        let mut fallen = player();
        fallen.alive = false;
        let mut commands = Vec::new();
        control.handle(
            &PlayerInput::IDLE.firing_at(Vec2::new(400.0, 160.0)),
            &fallen,
            RoundPhase::Playing,
            &mut commands,
        );
        assert!(commands.is_empty());
    }

    #[test]
    fn won_session_ignores_input() {
        let control = PlayerControl::new();
        let mut commands = Vec::new();
        control.handle(
            &PlayerInput::moving(1, 0).firing_at(Vec2::ZERO),
            &player(),
            RoundPhase::Won,
            &mut commands,
        );
        assert!(commands.is_empty());
    }
}
