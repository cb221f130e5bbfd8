//! Tests for integration, contacts and collision filtering.

use glam::DVec3;

use crate::body::{RigidBody, Shape};
use crate::world::PhysicsWorld;

const DT: f64 = 1.0 / 60.0;
const GROUND: u32 = 1;
const A: u32 = 2;
const B: u32 = 4;

fn ball(mass: f64) -> RigidBody {
    RigidBody::dynamic(mass, Shape::Sphere { radius: 0.5 }).with_damping(0.0, 0.0)
}

#[test]
fn test_free_fall_matches_gravity() {
    let mut world = PhysicsWorld::new(20.0);
    let h = world.insert(ball(1.0).with_position(DVec3::new(0.0, 100.0, 0.0)));

    for _ in 0..60 {
        world.step(DT);
    }

    let body = world.get(h).unwrap();
    assert!(
        (body.velocity.y + 20.0).abs() < 1e-9,
        "after 1s of fall vy should be -20, got {:.3}",
        body.velocity.y
    );
    // Semi-implicit Euler lands slightly below the analytic 90.0.
    assert!(body.position.y < 90.0 && body.position.y > 89.5);
}

#[test]
fn test_body_rests_on_ground() {
    let mut world = PhysicsWorld::new(20.0).with_ground(GROUND, A);
    let h = world.insert(
        ball(2.0)
            .with_collision(A, GROUND)
            .with_position(DVec3::new(0.0, 3.0, 0.0)),
    );

    for _ in 0..300 {
        world.step(DT);
    }

    let body = world.get(h).unwrap();
    assert!(
        (body.position.y - 0.5).abs() < 0.05,
        "ball should settle on its radius, got y={:.3}",
        body.position.y
    );
    assert!(body.velocity.y.abs() < 1.0);
}

#[test]
fn test_ground_filter_lets_body_fall_through() {
    let mut world = PhysicsWorld::new(20.0).with_ground(GROUND, A);
    let h = world.insert(
        ball(1.0)
            .with_collision(B, GROUND)
            .with_position(DVec3::new(0.0, 1.0, 0.0)),
    );

    for _ in 0..60 {
        world.step(DT);
    }

    assert!(world.get(h).unwrap().position.y < -1.0);
}

#[test]
fn test_ground_friction_slows_sliding() {
    let mut world = PhysicsWorld::new(20.0).with_ground(GROUND, A);
    let h = world.insert(
        ball(1.0)
            .with_collision(A, GROUND)
            .with_position(DVec3::new(0.0, 0.5, 0.0))
            .with_velocity(DVec3::new(5.0, 0.0, 0.0)),
    );

    for _ in 0..120 {
        world.step(DT);
    }

    let vx = world.get(h).unwrap().velocity.x;
    assert!(vx < 1.0, "friction should bleed off slide speed, vx={vx:.3}");
    assert!(vx >= 0.0, "friction must not reverse motion, vx={vx:.3}");
}

#[test]
fn test_impulse_scales_with_inverse_mass() {
    let mut light = ball(0.5);
    let mut heavy = ball(5.0);
    light.apply_impulse(DVec3::X * 5.0);
    heavy.apply_impulse(DVec3::X * 5.0);
    assert!((light.velocity.x - 10.0).abs() < 1e-12);
    assert!((heavy.velocity.x - 1.0).abs() < 1e-12);
}

#[test]
fn test_force_is_cleared_after_step() {
    let mut world = PhysicsWorld::new(0.0);
    let h = world.insert(ball(2.0));
    world.get_mut(h).unwrap().apply_force(DVec3::X * 120.0);
    world.step(DT);

    let body = world.get(h).unwrap();
    assert!((body.velocity.x - 1.0).abs() < 1e-9, "a = F/m for one tick");
    assert_eq!(body.force(), DVec3::ZERO);

    world.step(DT);
    assert!((world.get(h).unwrap().velocity.x - 1.0).abs() < 1e-9);
}

#[test]
fn test_linear_damping_decays_velocity() {
    let mut world = PhysicsWorld::new(0.0);
    let h = world.insert(ball(1.0).with_damping(0.4, 0.0).with_velocity(DVec3::X * 10.0));
    for _ in 0..60 {
        world.step(DT);
    }
    let vx = world.get(h).unwrap().velocity.x;
    assert!((vx - 6.0).abs() < 1e-6, "(1 - 0.4)^1s * 10 = 6, got {vx:.4}");
}

#[test]
fn test_static_column_blocks_body() {
    let mut world = PhysicsWorld::new(0.0);
    world.insert(
        RigidBody::fixed(Shape::Column {
            radius: 1.5,
            half_height: 3.0,
        })
        .with_collision(A, B)
        .with_position(DVec3::new(0.0, 3.0, 0.0)),
    );
    let h = world.insert(
        ball(5.0)
            .with_collision(B, A)
            .with_position(DVec3::new(-5.0, 1.0, 0.0))
            .with_velocity(DVec3::X * 4.0),
    );

    for _ in 0..180 {
        world.step(DT);
    }

    let x = world.get(h).unwrap().position.x;
    assert!(x < -1.5, "body should be held outside the column, x={x:.3}");
}

#[test]
fn test_mask_mismatch_passes_through() {
    let mut world = PhysicsWorld::new(0.0);
    world.insert(
        ball(1.0)
            .with_collision(A, GROUND)
            .with_position(DVec3::ZERO),
    );
    let h = world.insert(
        ball(1.0)
            .with_collision(B, A)
            .with_position(DVec3::new(-3.0, 0.0, 0.0))
            .with_velocity(DVec3::X * 6.0),
    );

    for _ in 0..60 {
        world.step(DT);
    }

    let x = world.get(h).unwrap().position.x;
    assert!(x > 2.5, "filters must agree both ways to collide, x={x:.3}");
}

#[test]
fn test_head_on_collision_conserves_momentum() {
    let mut world = PhysicsWorld::new(0.0);
    let a = world.insert(
        ball(1.0)
            .with_collision(A, A)
            .with_position(DVec3::new(-0.6, 0.0, 0.0))
            .with_velocity(DVec3::X * 2.0),
    );
    let b = world.insert(
        ball(1.0)
            .with_collision(A, A)
            .with_position(DVec3::new(0.3, 0.0, 0.0)),
    );

    world.step(DT);

    let pa = world.get(a).unwrap().velocity.x;
    let pb = world.get(b).unwrap().velocity.x;
    assert!((pa + pb - 2.0).abs() < 1e-9, "momentum drifted: {pa} + {pb}");
    assert!(pb > 0.0, "struck ball should move off");
}

#[test]
fn test_spin_rotates_orientation() {
    let mut world = PhysicsWorld::new(0.0);
    let h = world.insert(ball(1.0));
    world.get_mut(h).unwrap().angular_velocity = DVec3::Y * std::f64::consts::PI;
    for _ in 0..30 {
        world.step(DT);
    }
    let forward = world.get(h).unwrap().orientation * DVec3::Z;
    assert!(
        (forward.x - 1.0).abs() < 0.05,
        "half a second at pi rad/s is a quarter turn, forward={forward:?}"
    );
}

#[test]
fn test_removed_handle_is_gone() {
    let mut world = PhysicsWorld::new(20.0);
    let h = world.insert(ball(1.0));
    assert!(world.remove(h).is_some());
    assert!(world.get(h).is_none());
    let next = world.insert(ball(1.0));
    assert_ne!(h, next, "handles are never reused");
}
