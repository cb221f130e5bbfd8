//! Walking on the ground plane, shared by enemies and minions.

use glam::DVec3;

use spire_core::constants::MIN_STEER_DISTANCE;
use spire_core::types::Planar;
use spire_physics::RigidBody;

use crate::ballistics::clamp_horizontal_speed;

/// Push `body` toward `destination` at up to `speed`, turning it to face the
/// way it walks. Returns false without touching the body when it is already
/// standing on the destination.
pub fn walk_toward(body: &mut RigidBody, destination: DVec3, speed: f64, force_mult: f64) -> bool {
    let offset = (destination - body.position).flat();
    let distance = offset.length();
    if distance < MIN_STEER_DISTANCE {
        return false;
    }

    let dir = offset / distance;
    let force = dir * speed * body.mass() * force_mult;
    body.apply_force(force);
    body.velocity = clamp_horizontal_speed(body.velocity, speed);
    body.set_yaw(dir.yaw());
    true
}

/// Turn `body` to look at `point` without moving it.
pub fn face(body: &mut RigidBody, point: DVec3) {
    let offset = (point - body.position).flat();
    if offset.length() >= MIN_STEER_DISTANCE {
        body.set_yaw(offset.yaw());
    }
}
