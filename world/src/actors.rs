//! Mutable actor records owned by the world.

use std::time::Duration;

use dungeonion_core::{
    EnemyBehavior, EnemyId, EnemyKind, EnemySnapshot, EnemyStats, Health, PlayerClass,
    PlayerSnapshot, PlayerStats, ProjectileSnapshot, TileId,
};
use glam::Vec2;

/// Hit points and knockback shared by every combatant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Vitals {
    pub(crate) health: Health,
    pub(crate) max_health: Health,
    pub(crate) alive: bool,
    pub(crate) knockback: Vec2,
}

impl Vitals {
    pub(crate) fn full(max_health: Health) -> Self {
        Self {
            health: max_health,
            max_health,
            alive: !max_health.is_zero(),
            knockback: Vec2::ZERO,
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Player {
    pub(crate) class: PlayerClass,
    pub(crate) stats: PlayerStats,
    pub(crate) position: Vec2,
    pub(crate) heading: (i8, i8),
    pub(crate) vitals: Vitals,
    pub(crate) fire_cooldown: Duration,
}

impl Player {
    pub(crate) fn new(class: PlayerClass, position: Vec2) -> Self {
        let stats = class.stats();
        Self {
            class,
            stats,
            position,
            heading: (0, 0),
            vitals: Vitals::full(stats.max_health),
            fire_cooldown: Duration::ZERO,
        }
    }

    pub(crate) fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            class: self.class,
            position: self.position,
            heading: self.heading,
            health: self.vitals.health,
            max_health: self.vitals.max_health,
            alive: self.vitals.alive,
            fire_cooldown: self.fire_cooldown,
            knockback: self.vitals.knockback,
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    pub(crate) id: EnemyId,
    pub(crate) kind: EnemyKind,
    pub(crate) stats: EnemyStats,
    pub(crate) position: Vec2,
    pub(crate) destination: Option<Vec2>,
    pub(crate) vitals: Vitals,
    pub(crate) striking: bool,
    pub(crate) attack_cooldown: Duration,
    pub(crate) respawn_in: Duration,
    pub(crate) death_animation: Duration,
    pub(crate) hurt_flash: Duration,
}

impl Enemy {
    pub(crate) fn new(id: EnemyId, kind: EnemyKind, position: Vec2, max_health: Health) -> Self {
        let stats = kind.stats();
        Self {
            id,
            kind,
            stats,
            position,
            destination: None,
            vitals: Vitals::full(max_health),
            striking: false,
            attack_cooldown: Duration::ZERO,
            respawn_in: Duration::ZERO,
            death_animation: Duration::ZERO,
            hurt_flash: Duration::ZERO,
        }
    }

    /// Brings a dead enemy back for a new life.
    pub(crate) fn revive(&mut self, position: Vec2, max_health: Health) {
        self.position = position;
        self.destination = None;
        self.vitals = Vitals::full(max_health);
        self.striking = false;
        self.attack_cooldown = Duration::ZERO;
        self.respawn_in = Duration::ZERO;
        self.death_animation = Duration::ZERO;
        self.hurt_flash = Duration::ZERO;
    }

    pub(crate) fn behavior(&self) -> EnemyBehavior {
        if !self.vitals.alive {
            EnemyBehavior::Dead
        } else if self.striking {
            EnemyBehavior::Attacking
        } else if self.destination.is_some() {
            EnemyBehavior::Pursuing
        } else {
            EnemyBehavior::Idle
        }
    }

    pub(crate) fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            kind: self.kind,
            position: self.position,
            destination: self.destination,
            health: self.vitals.health,
            max_health: self.vitals.max_health,
            behavior: self.behavior(),
            attack_cooldown: self.attack_cooldown,
            respawn_in: self.respawn_in,
            death_animation: self.death_animation,
            hurt_flash: self.hurt_flash,
            knockback: self.vitals.knockback,
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Projectile {
    pub(crate) position: Vec2,
    pub(crate) direction: Vec2,
    pub(crate) speed: f32,
    pub(crate) damage: u32,
    pub(crate) sprite: TileId,
}

impl Projectile {
    pub(crate) fn snapshot(&self) -> ProjectileSnapshot {
        ProjectileSnapshot {
            position: self.position,
            direction: self.direction,
            sprite: self.sprite,
        }
    }
}
