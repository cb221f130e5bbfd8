//! Damage resolution: projectile hits, splash, and the shared kill routine.
//!
//! Projectiles are checked against enemies in id order. A projectile that
//! has not yet been through a physics step is skipped so a shot spawned
//! this tick cannot hit from inside the muzzle.

use glam::DVec3;
use hecs::{Entity, World};
use rand::Rng;
use tracing::debug;

use spire_core::components::{Enemy, Projectile};
use spire_core::constants::{DISTANCE_FALLBACK, SPEED_FALLBACK};
use spire_core::enums::KillCause;
use spire_core::events::SimEvent;
use spire_core::tuning::{DeathTuning, Tuning};
use spire_core::types::EntityId;
use spire_physics::{BodyHandle, PhysicsWorld, RigidBody};

use crate::tower::WaveState;

/// Upward bias of a direct-hit knock before normalising.
const DIRECT_HIT_LIFT: f64 = 0.4;
/// Upward bias of a splash shove before normalising.
const SPLASH_LIFT: f64 = 0.6;

/// Mark an enemy dead and count the kill.
///
/// Not idempotent: callers check `alive` first. Calling it twice on the
/// same enemy counts two kills.
pub fn record_kill(enemy: &mut Enemy, wave: &mut WaveState) {
    enemy.alive = false;
    wave.kills += 1;
    wave.enemies_remaining = wave.enemies_remaining.saturating_sub(1);
}

/// Kill an enemy and launch its body: a big upward pop, sideways along
/// `knock`, a random tumble, and almost no air drag so it sails.
pub fn kill_enemy<R: Rng>(
    enemy: &mut Enemy,
    body: &mut RigidBody,
    knock: DVec3,
    death: &DeathTuning,
    wave: &mut WaveState,
    rng: &mut R,
) {
    record_kill(enemy, wave);

    let up = rng.gen_range(death.launch_up_min..=death.launch_up_max);
    body.apply_impulse(DVec3::new(
        knock.x * death.launch_side_mult,
        up,
        knock.z * death.launch_side_mult,
    ));
    body.angular_velocity = DVec3::new(
        (rng.gen::<f64>() - 0.5) * death.spin,
        (rng.gen::<f64>() - 0.5) * death.spin,
        (rng.gen::<f64>() - 0.5) * death.spin,
    );
    body.linear_damping = death.linear_damping;
}

/// Knock impulse for a direct hit from a projectile moving at `velocity`.
pub fn direct_hit_knock(velocity: DVec3, knockback: f64) -> DVec3 {
    let speed = match velocity.length() {
        s if s > 0.0 => s,
        _ => SPEED_FALLBACK,
    };
    DVec3::new(velocity.x / speed, DIRECT_HIT_LIFT, velocity.z / speed).normalize() * knockback
}

/// Apply a direct hit. Returns the knock impulse that was applied, which
/// doubles as the death launch direction.
pub fn apply_direct_hit(
    enemy: &mut Enemy,
    body: &mut RigidBody,
    projectile: &Projectile,
    projectile_velocity: DVec3,
) -> DVec3 {
    enemy.hp -= projectile.damage;
    let knock = direct_hit_knock(projectile_velocity, projectile.knockback);
    body.apply_impulse(knock);
    knock
}

/// Splash every living enemy (except `exclude`) within the projectile's
/// splash radius of `center`, measured in 3D. Damage and shove fall off
/// linearly to zero at the edge.
#[allow(clippy::too_many_arguments)]
pub fn apply_splash<R: Rng>(
    world: &mut World,
    physics: &mut PhysicsWorld,
    rng: &mut R,
    wave: &mut WaveState,
    death: &DeathTuning,
    events: &mut Vec<SimEvent>,
    center: DVec3,
    projectile: &Projectile,
    exclude: Option<EntityId>,
) {
    let mut targets: Vec<(EntityId, Entity, BodyHandle)> = world
        .query::<(&EntityId, &Enemy, &BodyHandle)>()
        .iter()
        .filter(|(_, (id, enemy, _))| enemy.alive && Some(**id) != exclude)
        .map(|(entity, (id, _, handle))| (*id, entity, *handle))
        .collect();
    targets.sort_by_key(|(id, _, _)| *id);

    for (id, entity, handle) in targets {
        let Some(body) = physics.get_mut(handle) else {
            continue;
        };
        let offset = body.position - center;
        let dist = offset.length();
        if dist >= projectile.splash_radius {
            continue;
        }
        let Ok(mut enemy) = world.get::<&mut Enemy>(entity) else {
            continue;
        };

        let falloff = 1.0 - dist / projectile.splash_radius;
        enemy.hp -= projectile.damage * projectile.splash_damage_mult * falloff;

        let d = if dist > 0.0 { dist } else { DISTANCE_FALLBACK };
        let push = DVec3::new(offset.x / d, SPLASH_LIFT, offset.z / d).normalize()
            * projectile.splash_force
            * falloff;
        body.apply_impulse(push);

        if enemy.hp <= 0.0 {
            kill_enemy(&mut enemy, body, push, death, wave, rng);
            debug!(?id, "enemy killed by splash");
            events.push(SimEvent::EnemyKilled {
                id,
                cause: KillCause::Splash,
            });
        }
    }
}

/// A live projectile that is ready for hit checks.
struct Shot {
    entity: Entity,
    projectile: Projectile,
    position: DVec3,
    velocity: DVec3,
}

/// Check every live projectile for ground detonation or a direct hit.
pub fn resolve_projectile_hits<R: Rng>(
    world: &mut World,
    physics: &mut PhysicsWorld,
    rng: &mut R,
    wave: &mut WaveState,
    tuning: &Tuning,
    events: &mut Vec<SimEvent>,
) {
    let mut shots: Vec<(EntityId, Shot)> = world
        .query::<(&EntityId, &Projectile, &BodyHandle)>()
        .iter()
        .filter(|(_, (_, projectile, _))| projectile.alive && projectile.integrated)
        .filter_map(|(entity, (id, projectile, handle))| {
            let body = physics.get(*handle)?;
            Some((
                *id,
                Shot {
                    entity,
                    projectile: projectile.clone(),
                    position: body.position,
                    velocity: body.velocity,
                },
            ))
        })
        .collect();
    shots.sort_by_key(|(id, _)| *id);

    for (_, shot) in shots {
        let projectile = &shot.projectile;

        let grounded = !projectile.kind.is_homing()
            && shot.position.y < tuning.physics.ground_detonation_height
            && shot.velocity.y < 0.0;
        if grounded {
            if projectile.splash_radius > 0.0 {
                apply_splash(
                    world,
                    physics,
                    rng,
                    wave,
                    &tuning.death,
                    events,
                    shot.position,
                    projectile,
                    None,
                );
            }
            expire(world, shot.entity);
            continue;
        }

        let Some((target_id, target_entity, target_handle)) =
            first_enemy_within(world, physics, shot.position, projectile.hit_radius)
        else {
            continue;
        };

        if let (Ok(mut enemy), Some(body)) = (
            world.get::<&mut Enemy>(target_entity),
            physics.get_mut(target_handle),
        ) {
            let knock = apply_direct_hit(&mut enemy, body, projectile, shot.velocity);
            if enemy.hp <= 0.0 {
                kill_enemy(&mut enemy, body, knock, &tuning.death, wave, rng);
                debug!(id = ?target_id, kind = ?projectile.kind, "enemy killed by direct hit");
                events.push(SimEvent::EnemyKilled {
                    id: target_id,
                    cause: KillCause::DirectHit(projectile.kind),
                });
            }
        }

        if projectile.splash_radius > 0.0 {
            apply_splash(
                world,
                physics,
                rng,
                wave,
                &tuning.death,
                events,
                shot.position,
                projectile,
                Some(target_id),
            );
        }
        expire(world, shot.entity);
    }
}

/// First living enemy (by id) whose centre is strictly within `radius`.
fn first_enemy_within(
    world: &World,
    physics: &PhysicsWorld,
    point: DVec3,
    radius: f64,
) -> Option<(EntityId, Entity, BodyHandle)> {
    let radius_sq = radius * radius;
    let mut hits: Vec<(EntityId, Entity, BodyHandle)> = world
        .query::<(&EntityId, &Enemy, &BodyHandle)>()
        .iter()
        .filter(|(_, (_, enemy, _))| enemy.alive)
        .filter(|(_, (_, _, handle))| {
            physics
                .get(**handle)
                .is_some_and(|body| body.position.distance_squared(point) < radius_sq)
        })
        .map(|(entity, (id, _, handle))| (*id, entity, *handle))
        .collect();
    hits.sort_by_key(|(id, _, _)| *id);
    hits.into_iter().next()
}

fn expire(world: &mut World, entity: Entity) {
    if let Ok(mut projectile) = world.get::<&mut Projectile>(entity) {
        projectile.alive = false;
    }
}
