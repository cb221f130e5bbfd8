//! Projectile upkeep: homing steering, aging, and the post-step
//! integration flag.

use glam::DVec3;
use hecs::World;
use tracing::trace;

use spire_core::components::Projectile;
use spire_core::constants::AIM_HEIGHT_OFFSET;
use spire_core::tuning::HomingTuning;
use spire_physics::{BodyHandle, PhysicsWorld};

use crate::ballistics;
use crate::targeting;

/// Steer every live homing bolt toward its target.
///
/// Bolts float: a lift equal to their weight cancels gravity. A bolt whose
/// target has died picks the nearest living enemy and resumes steering on
/// the following tick. Speed is capped after the bolt's last integration.
pub fn steer_homing(world: &mut World, physics: &mut PhysicsWorld, tuning: &HomingTuning, gravity: f64) {
    let living = targeting::living_enemies(world, physics);

    for (_entity, (projectile, handle)) in world.query_mut::<(&mut Projectile, &BodyHandle)>() {
        if !projectile.alive || !projectile.kind.is_homing() {
            continue;
        }
        let Some(body) = physics.get_mut(*handle) else {
            continue;
        };

        body.apply_force(DVec3::Y * gravity * body.mass());

        let target = projectile
            .target
            .and_then(|id| living.iter().find(|c| c.id == id));
        let Some(target) = target else {
            projectile.target = targeting::nearest_3d(&living, body.position).map(|c| c.id);
            trace!(target = ?projectile.target, "homing bolt retargeted");
            continue;
        };

        let aim = target.position + DVec3::Y * AIM_HEIGHT_OFFSET;
        if let Some(force) = ballistics::homing_steer_force(body.position, aim, tuning.steer_force) {
            body.apply_force(force);
        }
        body.velocity = ballistics::clamp_speed(body.velocity, tuning.max_speed);
    }
}

/// Age live projectiles and expire the ones past their lifetime.
pub fn age(world: &mut World, dt: f64) {
    for (_entity, projectile) in world.query_mut::<&mut Projectile>() {
        if !projectile.alive {
            continue;
        }
        projectile.age += dt;
        if projectile.age > projectile.max_age {
            projectile.alive = false;
        }
    }
}

/// Flag every projectile as having been through a physics step.
pub fn mark_integrated(world: &mut World) {
    for (_entity, projectile) in world.query_mut::<&mut Projectile>() {
        projectile.integrated = true;
    }
}
