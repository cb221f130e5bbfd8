//! Cleanup system: removes dead enemies and spent projectiles.

use hecs::{Entity, World};

use spire_core::components::{Enemy, FadeHold, Projectile};
use spire_physics::{BodyHandle, PhysicsWorld};

/// Despawn every dead enemy and projectile, together with its body.
///
/// Entities carrying `FadeHold` are left alone until the renderer releases
/// them. Uses a pre-allocated buffer to avoid per-tick allocation.
pub fn run(world: &mut World, physics: &mut PhysicsWorld, despawn_buffer: &mut Vec<(Entity, BodyHandle)>) {
    despawn_buffer.clear();

    for (entity, (enemy, handle, hold)) in
        world.query_mut::<(&Enemy, &BodyHandle, Option<&FadeHold>)>()
    {
        if !enemy.alive && hold.is_none() {
            despawn_buffer.push((entity, *handle));
        }
    }

    for (entity, (projectile, handle, hold)) in
        world.query_mut::<(&Projectile, &BodyHandle, Option<&FadeHold>)>()
    {
        if !projectile.alive && hold.is_none() {
            despawn_buffer.push((entity, *handle));
        }
    }

    for (entity, handle) in despawn_buffer.drain(..) {
        physics.remove(handle);
        let _ = world.despawn(entity);
    }
}
