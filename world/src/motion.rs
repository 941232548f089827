//! Axis-independent movement against the tile grid.
//!
//! Both axes are probed from the original position: the horizontal probe is
//! `(x + dx, y)` and the vertical probe `(x, y + dy)`. Accepted axes are
//! applied together and the result is clamped into the arena, so corner
//! sliding never depends on which axis is tested first.

use std::time::Duration;

use dungeonion_core::Channel;
use glam::Vec2;

use crate::grid::TileWorld;

/// Exponential friction applied to knockback velocity, per second.
pub const KNOCKBACK_FRICTION: f32 = 8.0;

/// Knockback slower than this, in pixels per second, stops entirely.
pub const KNOCKBACK_EPSILON: f32 = 1.0;

/// Remaining glide distance treated as arrival.
pub const ARRIVAL_TOLERANCE: f32 = 0.5;

/// Result of resolving one displacement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionOutcome {
    /// Position after resolution and clamping.
    pub position: Vec2,
    /// Whether the horizontal component was discarded.
    pub blocked_x: bool,
    /// Whether the vertical component was discarded.
    pub blocked_y: bool,
}

impl MotionOutcome {
    /// Reports whether neither axis could move.
    #[must_use]
    pub const fn fully_blocked(&self) -> bool {
        self.blocked_x && self.blocked_y
    }
}

/// Moves a point by `delta`, discarding each axis that would enter a cell
/// blocked for `channel`.
#[must_use]
pub fn resolve(grid: &TileWorld, position: Vec2, delta: Vec2, channel: Channel) -> MotionOutcome {
    let blocked_x = delta.x != 0.0
        && grid.collides(Vec2::new(position.x + delta.x, position.y), channel);
    let blocked_y = delta.y != 0.0
        && grid.collides(Vec2::new(position.x, position.y + delta.y), channel);

    let mut next = position;
    if !blocked_x {
        next.x += delta.x;
    }
    if !blocked_y {
        next.y += delta.y;
    }

    MotionOutcome {
        position: grid.dimensions().clamp_position(next),
        blocked_x,
        blocked_y,
    }
}

/// Integrates a knockback impulse and applies friction.
///
/// A blocked axis loses its component of the impulse.
pub(crate) fn integrate_knockback(
    grid: &TileWorld,
    position: &mut Vec2,
    velocity: &mut Vec2,
    dt: Duration,
) {
    if *velocity == Vec2::ZERO {
        return;
    }
    let seconds = dt.as_secs_f32();
    let outcome = resolve(grid, *position, *velocity * seconds, Channel::Physical);
    *position = outcome.position;
    if outcome.blocked_x {
        velocity.x = 0.0;
    }
    if outcome.blocked_y {
        velocity.y = 0.0;
    }

    *velocity *= (-KNOCKBACK_FRICTION * seconds).exp();
    if velocity.length() < KNOCKBACK_EPSILON {
        *velocity = Vec2::ZERO;
    }
}

/// Advances a smoothed mover toward its destination at `speed` pixels per
/// second.
///
/// Arrival snaps to the destination and clears it. A blocked axis snaps the
/// destination to the current position on that axis; when both axes are
/// blocked the move is abandoned.
pub(crate) fn glide(
    grid: &TileWorld,
    position: &mut Vec2,
    destination: &mut Option<Vec2>,
    speed: f32,
    dt: Duration,
) {
    let Some(target) = *destination else {
        return;
    };
    let step = speed * dt.as_secs_f32();
    if step <= 0.0 {
        return;
    }

    let remaining = target - *position;
    let distance = remaining.length();
    if distance <= ARRIVAL_TOLERANCE || step >= distance {
        *position = grid.dimensions().clamp_position(target);
        *destination = None;
        return;
    }

    let outcome = resolve(grid, *position, remaining / distance * step, Channel::Physical);
    *position = outcome.position;
    if outcome.fully_blocked() {
        *destination = None;
        return;
    }

    let mut target = target;
    if outcome.blocked_x {
        target.x = position.x;
    }
    if outcome.blocked_y {
        target.y = position.y;
    }
    *destination = Some(target);
}

#[cfg(test)]
mod tests {
    use super::*;
    use dungeonion_core::TileId;

    const WALL: TileId = TileId::new(1);

    fn open_grid() -> TileWorld {
        TileWorld::filled(32, 20, 16, TileId::DEFAULT_FLOOR)
    }

    #[test]
    fn open_ground_moves_diagonally() {
        let outcome = resolve(
            &open_grid(),
            Vec2::new(100.0, 100.0),
            Vec2::new(3.0, -2.0),
            Channel::Physical,
        );
        assert_eq!(outcome.position, Vec2::new(103.0, 98.0));
        assert!(!outcome.blocked_x && !outcome.blocked_y);
    }

    #[test]
    fn wall_slides_along_free_axis() {
        let mut grid = open_grid();
        assert!(grid.paint(6, 7, WALL));
        let outcome = resolve(
            &grid,
            Vec2::new(110.0, 100.0),
            Vec2::new(4.0, 3.0),
            Channel::Physical,
        );
        assert!(outcome.blocked_x);
        assert!(!outcome.blocked_y);
        assert_eq!(outcome.position, Vec2::new(110.0, 103.0));
    }

    #[test]
    fn both_axes_probe_from_original_position() {
        let mut grid = open_grid();
        // Only the diagonal cell is walled; each single-axis probe is open.
        assert!(grid.paint(7, 7, WALL));
        let outcome = resolve(
            &grid,
            Vec2::new(110.0, 110.0),
            Vec2::new(4.0, 4.0),
            Channel::Physical,
        );
        assert!(!outcome.fully_blocked());
        assert_eq!(outcome.position, Vec2::new(114.0, 114.0));
    }

    #[test]
    fn result_is_clamped_inside_arena() {
        let outcome = resolve(
            &open_grid(),
            Vec2::new(495.0, 1.0),
            Vec2::new(0.5, -3.0),
            Channel::Physical,
        );
        assert!(outcome.blocked_y);
        assert_eq!(outcome.position, Vec2::new(495.5, 1.0));

        let outcome = resolve(
            &open_grid(),
            Vec2::new(495.0, 100.0),
            Vec2::new(5.0, 0.0),
            Channel::Physical,
        );
        assert_eq!(outcome.position.x, 496.0);
    }

    #[test]
    fn knockback_decays_and_stops() {
        let grid = open_grid();
        let mut position = Vec2::new(200.0, 100.0);
        let mut velocity = Vec2::new(120.0, 0.0);
        integrate_knockback(&grid, &mut position, &mut velocity, Duration::from_millis(100));
        assert!((position.x - 212.0).abs() < 1e-3);
        assert!(velocity.x < 120.0 * 0.5);

        for _ in 0..20 {
            integrate_knockback(&grid, &mut position, &mut velocity, Duration::from_millis(100));
        }
        assert_eq!(velocity, Vec2::ZERO);
    }

    #[test]
    fn knockback_into_wall_loses_that_axis() {
        let mut grid = open_grid();
        assert!(grid.paint(6, 7, WALL));
        let mut position = Vec2::new(110.0, 100.0);
        let mut velocity = Vec2::new(100.0, 50.0);
        integrate_knockback(&grid, &mut position, &mut velocity, Duration::from_millis(50));
        assert_eq!(position.x, 110.0);
        assert_eq!(velocity.x, 0.0);
        assert!(velocity.y > 0.0);
    }

    #[test]
    fn glide_snaps_on_arrival() {
        let grid = open_grid();
        let mut position = Vec2::new(100.0, 100.0);
        let mut destination = Some(Vec2::new(110.0, 100.0));
        glide(&grid, &mut position, &mut destination, 40.0, Duration::from_millis(100));
        assert_eq!(position, Vec2::new(104.0, 100.0));
        assert_eq!(destination, Some(Vec2::new(110.0, 100.0)));

        glide(&grid, &mut position, &mut destination, 40.0, Duration::from_millis(500));
        assert_eq!(position, Vec2::new(110.0, 100.0));
        assert!(destination.is_none());
    }

    #[test]
    fn glide_abandons_fully_blocked_move() {
        let mut grid = open_grid();
        assert!(grid.paint(6, 7, WALL));
        assert!(grid.paint(7, 6, WALL));
        let mut position = Vec2::new(110.0, 110.0);
        let mut destination = Some(Vec2::new(130.0, 130.0));
        glide(&grid, &mut position, &mut destination, 40.0, Duration::from_millis(100));
        assert_eq!(position, Vec2::new(110.0, 110.0));
        assert!(destination.is_none());
    }
}
