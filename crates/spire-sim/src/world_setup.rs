//! Entity spawn factories for setting up the simulation world.
//!
//! Every factory creates the physics body first and then the hecs entity
//! that refers to it, so an entity never exists without its body.

use std::f64::consts::TAU;

use glam::DVec3;
use hecs::World;
use rand::Rng;

use spire_core::components::*;
use spire_core::constants::*;
use spire_core::enums::*;
use spire_core::tuning::{BallisticTuning, EnemyTuning, HomingTuning, MinionTuning, Tuning};
use spire_core::types::{EntityId, IdAllocator};
use spire_physics::{BodyHandle, PhysicsWorld, RigidBody, Shape};

/// Build an empty physics world with the ground plane.
pub fn physics_world(tuning: &Tuning) -> PhysicsWorld {
    PhysicsWorld::new(tuning.physics.gravity).with_ground(
        GROUP_GROUND,
        GROUP_ENEMY | GROUP_PROJECTILE | GROUP_MINION,
    )
}

/// Place the tower's static collision column at the origin.
pub fn setup_arena(physics: &mut PhysicsWorld, tuning: &Tuning) -> BodyHandle {
    let column = RigidBody::fixed(Shape::Column {
        radius: tuning.tower.radius,
        half_height: tuning.tower.half_height,
    })
    .with_collision(GROUP_TOWER, GROUP_ENEMY)
    .with_position(DVec3::new(0.0, tuning.tower.half_height, 0.0));
    physics.insert(column)
}

/// Point on a ring of `radius` around the origin at a random bearing.
fn random_ring_point<R: Rng>(rng: &mut R, radius: f64, height: f64) -> DVec3 {
    let angle = rng.gen::<f64>() * TAU;
    DVec3::new(angle.cos() * radius, height, angle.sin() * radius)
}

/// Spawn a wave enemy on the spawn ring with wave-scaled hit points.
pub fn spawn_enemy<R: Rng>(
    world: &mut World,
    physics: &mut PhysicsWorld,
    rng: &mut R,
    ids: &mut IdAllocator,
    tuning: &EnemyTuning,
    wave_number: u32,
) -> (EntityId, DVec3) {
    let position = random_ring_point(rng, tuning.spawn_radius, tuning.spawn_height);
    let speed = rng.gen_range(tuning.speed_min..=tuning.speed_max);
    let leg_phase = rng.gen::<f64>() * TAU;
    let hp = tuning.hp_for_wave(wave_number);
    let id = spawn_enemy_at(world, physics, ids, tuning, position, hp, speed, leg_phase);
    (id, position)
}

/// Spawn an enemy with explicit stats.
#[allow(clippy::too_many_arguments)]
pub fn spawn_enemy_at(
    world: &mut World,
    physics: &mut PhysicsWorld,
    ids: &mut IdAllocator,
    tuning: &EnemyTuning,
    position: DVec3,
    hp: f64,
    speed: f64,
    leg_phase: f64,
) -> EntityId {
    let body = RigidBody::dynamic(
        tuning.mass,
        Shape::Column {
            radius: tuning.radius,
            half_height: tuning.half_height,
        },
    )
    .with_damping(tuning.linear_damping, tuning.angular_damping)
    .with_collision(
        GROUP_ENEMY,
        GROUP_GROUND | GROUP_TOWER | GROUP_ENEMY | GROUP_PROJECTILE,
    )
    .with_position(position);
    let handle = physics.insert(body);

    let id = ids.next();
    world.spawn((
        id,
        Enemy {
            hp,
            max_hp: hp,
            speed,
            damage_per_sec: tuning.damage_per_sec,
            alive: true,
            stun_timer: 0.0,
            slow_factor: 1.0,
            slow_timer: 0.0,
            leg_phase,
        },
        handle,
    ));
    id
}

/// Spawn an arcing fireball or arrow.
pub fn spawn_ballistic(
    world: &mut World,
    physics: &mut PhysicsWorld,
    ids: &mut IdAllocator,
    kind: ProjectileKind,
    tuning: &BallisticTuning,
    origin: DVec3,
    velocity: DVec3,
) -> EntityId {
    // Only fireballs are heavy enough to bowl minions over.
    let mask = match kind {
        ProjectileKind::Fireball => GROUP_GROUND | GROUP_ENEMY | GROUP_MINION,
        _ => GROUP_GROUND | GROUP_ENEMY,
    };
    let body = RigidBody::dynamic(
        tuning.mass,
        Shape::Sphere {
            radius: tuning.radius,
        },
    )
    .with_damping(tuning.linear_damping, 0.01)
    .with_collision(GROUP_PROJECTILE, mask)
    .with_position(origin)
    .with_velocity(velocity);
    let handle = physics.insert(body);

    let id = ids.next();
    world.spawn((
        id,
        Projectile {
            kind,
            alive: true,
            damage: tuning.damage,
            knockback: tuning.knockback,
            age: 0.0,
            max_age: tuning.max_age,
            splash_radius: tuning.splash_radius,
            splash_force: tuning.splash_force,
            splash_damage_mult: tuning.splash_damage_mult,
            hit_radius: tuning.hit_radius,
            target: None,
            integrated: false,
        },
        handle,
    ));
    id
}

/// Spawn a homing arcane bolt locked on `target`.
pub fn spawn_homing(
    world: &mut World,
    physics: &mut PhysicsWorld,
    ids: &mut IdAllocator,
    tuning: &HomingTuning,
    origin: DVec3,
    velocity: DVec3,
    target: EntityId,
) -> EntityId {
    let body = RigidBody::dynamic(
        tuning.mass,
        Shape::Sphere {
            radius: tuning.radius,
        },
    )
    .with_damping(tuning.linear_damping, 0.01)
    .with_collision(GROUP_PROJECTILE, GROUP_ENEMY)
    .with_position(origin)
    .with_velocity(velocity);
    let handle = physics.insert(body);

    let id = ids.next();
    world.spawn((
        id,
        Projectile {
            kind: ProjectileKind::Arcane,
            alive: true,
            damage: tuning.damage,
            knockback: tuning.knockback,
            age: 0.0,
            max_age: tuning.max_age,
            splash_radius: 0.0,
            splash_force: 0.0,
            splash_damage_mult: 1.0,
            hit_radius: tuning.hit_radius,
            target: Some(target),
            integrated: false,
        },
        handle,
    ));
    id
}

/// Spawn one minion at a random point near the tower.
pub fn spawn_minion<R: Rng>(
    world: &mut World,
    physics: &mut PhysicsWorld,
    rng: &mut R,
    ids: &mut IdAllocator,
    tuning: &MinionTuning,
) -> EntityId {
    let position = random_ring_point(rng, tuning.spawn_radius, tuning.spawn_height);
    let body = RigidBody::dynamic(
        tuning.mass,
        Shape::Column {
            radius: tuning.radius,
            half_height: tuning.half_height,
        },
    )
    // Same footing as the enemies.
    .with_damping(ENEMY_LINEAR_DAMPING, ENEMY_ANGULAR_DAMPING)
    .with_collision(GROUP_MINION, GROUP_GROUND | GROUP_PROJECTILE)
    .with_position(position);
    let handle = physics.insert(body);

    let id = ids.next();
    world.spawn((
        id,
        Minion {
            state: MinionState::Roaming,
            state_timer: 0.0,
            target: None,
            leg_phase: rng.gen::<f64>() * TAU,
        },
        handle,
    ));
    id
}
