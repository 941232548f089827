//! Damage, melee contact and projectile hit resolution.

use std::time::Duration;

use dungeonion_core::{ArenaDimensions, Health, HURT_FLASH, MELEE_RADIUS, PROJECTILE_HIT_RADIUS};
use glam::Vec2;
use rand::Rng;

use crate::actors::{Enemy, Player, Projectile, Vitals};

/// Speed of the impulse pushing an attacker off its victim after a strike.
pub(crate) const SEPARATION_FORCE: f32 = 50.0;

/// Health change produced by a single hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct DamageOutcome {
    pub(crate) dealt: u32,
    pub(crate) health: Health,
    pub(crate) killed: bool,
}

/// Subtracts `amount` from a living combatant and pushes it away from
/// `source`.
///
/// The knockback overwrites any impulse already in flight. Returns `None`
/// when the combatant was already dead.
pub(crate) fn apply_damage(
    vitals: &mut Vitals,
    centre: Vec2,
    amount: u32,
    source: Vec2,
    knockback_force: f32,
) -> Option<DamageOutcome> {
    if !vitals.alive {
        return None;
    }

    let before = vitals.health;
    vitals.health = before.saturating_sub(amount).min(vitals.max_health);

    let away = centre - source;
    if away.length_squared() > 0.0 {
        vitals.knockback = away.normalize() * knockback_force;
    }

    let killed = vitals.health.is_zero();
    if killed {
        vitals.alive = false;
    }

    Some(DamageOutcome {
        dealt: before.get() - vitals.health.get(),
        health: vitals.health,
        killed,
    })
}

/// Hurts an enemy and performs death bookkeeping when the hit is fatal.
pub(crate) fn damage_enemy<R: Rng>(
    enemy: &mut Enemy,
    arena: ArenaDimensions,
    amount: u32,
    source: Vec2,
    rng: &mut R,
) -> Option<DamageOutcome> {
    let centre = enemy.position + arena.half_tile();
    let outcome = apply_damage(
        &mut enemy.vitals,
        centre,
        amount,
        source,
        enemy.stats.knockback_force,
    )?;

    enemy.hurt_flash = HURT_FLASH;
    if outcome.killed {
        enemy.destination = None;
        enemy.striking = false;
        enemy.attack_cooldown = Duration::ZERO;
        enemy.hurt_flash = Duration::ZERO;
        enemy.death_animation = enemy.stats.death_animation;
        enemy.respawn_in = rng.gen_range(enemy.stats.respawn_delay_min..=enemy.stats.respawn_delay_max);
    }
    Some(outcome)
}

/// Lets an enemy strike the player when both live, the enemy is within melee
/// range and its attack cooldown is ready.
///
/// A landed strike resets the cooldown to the enemy's attack interval and
/// pushes the attacker away from the player.
pub(crate) fn resolve_melee_contact(
    attacker: &mut Enemy,
    defender: &mut Player,
    arena: ArenaDimensions,
) -> Option<DamageOutcome> {
    if !attacker.vitals.alive || !defender.vitals.alive || !attacker.attack_cooldown.is_zero() {
        return None;
    }

    let half = arena.half_tile();
    let offset = (attacker.position + half) - (defender.position + half);
    let distance = offset.length();
    if distance >= MELEE_RADIUS {
        return None;
    }

    let outcome = apply_damage(
        &mut defender.vitals,
        defender.position + half,
        attacker.stats.damage,
        attacker.position + half,
        defender.stats.knockback_force,
    )?;

    attacker.attack_cooldown = attacker.stats.attack_interval;
    attacker.striking = true;
    if distance > 0.0 {
        attacker.vitals.knockback = offset / distance * SEPARATION_FORCE;
    }
    Some(outcome)
}

/// Finds the living enemy a projectile hits, if any.
///
/// When several enemies are within the hit radius the nearest one is chosen,
/// with ties going to the lower identifier.
pub(crate) fn resolve_projectile_contact(
    projectile: &Projectile,
    enemies: &[Enemy],
    arena: ArenaDimensions,
) -> Option<usize> {
    let half = arena.half_tile();
    enemies
        .iter()
        .enumerate()
        .filter(|(_, enemy)| enemy.vitals.alive)
        .map(|(index, enemy)| {
            let distance = projectile.position.distance(enemy.position + half);
            (index, enemy.id, distance)
        })
        .filter(|(_, _, distance)| *distance < PROJECTILE_HIT_RADIUS)
        .min_by(|a, b| a.2.total_cmp(&b.2).then(a.1.cmp(&b.1)))
        .map(|(index, _, _)| index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dungeonion_core::{EnemyId, EnemyKind, PlayerClass, TileId};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const ARENA: ArenaDimensions = ArenaDimensions::new(32, 20, 16);

    fn crab(id: u32, position: Vec2) -> Enemy {
        Enemy::new(EnemyId::new(id), EnemyKind::Crab, position, Health::new(10))
    }

    fn potion(position: Vec2) -> Projectile {
        Projectile {
            position,
            direction: Vec2::X,
            speed: 250.0,
            damage: 5,
            sprite: TileId::new(115),
        }
    }

    #[test]
    fn damage_clamps_at_zero_and_kills_once() {
        let mut vitals = Vitals::full(Health::new(10));
        let first = apply_damage(&mut vitals, Vec2::ZERO, 7, Vec2::ZERO, 0.0);
        assert_eq!(
            first,
            Some(DamageOutcome {
                dealt: 7,
                health: Health::new(3),
                killed: false
            })
        );

        let second = apply_damage(&mut vitals, Vec2::ZERO, 7, Vec2::ZERO, 0.0);
        assert_eq!(
            second,
            Some(DamageOutcome {
                dealt: 3,
                health: Health::ZERO,
                killed: true
            })
        );
        assert!(!vitals.alive);
        assert_eq!(apply_damage(&mut vitals, Vec2::ZERO, 7, Vec2::ZERO, 0.0), None);
    }

    #[test]
    fn knockback_points_away_from_source_and_overwrites() {
        let mut vitals = Vitals::full(Health::new(10));
        vitals.knockback = Vec2::new(0.0, 999.0);
        let _ = apply_damage(
            &mut vitals,
            Vec2::new(10.0, 0.0),
            1,
            Vec2::new(0.0, 0.0),
            120.0,
        );
        assert_eq!(vitals.knockback, Vec2::new(120.0, 0.0));
    }

    #[test]
    fn fatal_hit_schedules_respawn_within_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut enemy = crab(0, Vec2::new(100.0, 100.0));
        enemy.destination = Some(Vec2::new(120.0, 100.0));
        enemy.attack_cooldown = Duration::from_millis(400);

        let outcome = damage_enemy(&mut enemy, ARENA, 50, Vec2::ZERO, &mut rng);
        assert!(outcome.is_some_and(|outcome| outcome.killed));
        assert!(enemy.destination.is_none());
        assert!(enemy.attack_cooldown.is_zero());
        assert_eq!(enemy.death_animation, Duration::from_millis(500));
        assert!(enemy.respawn_in >= Duration::from_millis(3_000));
        assert!(enemy.respawn_in <= Duration::from_millis(8_000));
    }

    #[test]
    fn melee_requires_range_and_ready_cooldown() {
        let arena = ARENA;
        let mut player = Player::new(PlayerClass::Wizard, Vec2::new(256.0, 160.0));
        let mut enemy = crab(0, Vec2::new(300.0, 160.0));
        assert!(resolve_melee_contact(&mut enemy, &mut player, arena).is_none());

        enemy.position = Vec2::new(260.0, 164.0);
        let outcome = resolve_melee_contact(&mut enemy, &mut player, arena);
        assert_eq!(outcome.map(|outcome| outcome.dealt), Some(10));
        assert_eq!(player.vitals.health, Health::new(90));
        assert_eq!(enemy.attack_cooldown, Duration::from_millis(1_000));
        assert!(enemy.vitals.knockback.x > 0.0);

        assert!(resolve_melee_contact(&mut enemy, &mut player, arena).is_none());
        assert_eq!(player.vitals.health, Health::new(90));
    }

    #[test]
    fn projectile_hits_nearest_enemy_first() {
        let enemies = vec![
            crab(0, Vec2::new(100.0, 100.0)),
            crab(1, Vec2::new(104.0, 100.0)),
        ];
        // Centres at (108, 108) and (112, 108).
        assert_eq!(
            resolve_projectile_contact(&potion(Vec2::new(111.0, 108.0)), &enemies, ARENA),
            Some(1)
        );
        assert_eq!(
            resolve_projectile_contact(&potion(Vec2::new(110.0, 108.0)), &enemies, ARENA),
            Some(0)
        );
        assert_eq!(
            resolve_projectile_contact(&potion(Vec2::new(200.0, 108.0)), &enemies, ARENA),
            None
        );
    }

    #[test]
    fn projectiles_pass_through_dead_enemies() {
        let mut enemies = vec![crab(0, Vec2::new(100.0, 100.0))];
        enemies[0].vitals.alive = false;
        assert_eq!(
            resolve_projectile_contact(&potion(Vec2::new(108.0, 108.0)), &enemies, ARENA),
            None
        );
    }
}
