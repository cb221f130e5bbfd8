//! Minion system: feeds each melee ally through the behaviour FSM and
//! applies the resulting action to its body and its target.

use glam::DVec3;
use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

use spire_core::components::{Enemy, Minion};
use spire_core::constants::DISTANCE_FALLBACK;
use spire_core::enums::KillCause;
use spire_core::events::SimEvent;
use spire_core::tuning::{DeathTuning, MinionTuning};
use spire_core::types::{EntityId, IdAllocator, Planar};
use spire_minion_ai::fsm::{self, MinionAction, MinionContext, Sighting};
use spire_minion_ai::profiles::MinionProfile;
use spire_physics::{BodyHandle, PhysicsWorld};

use crate::locomotion;
use crate::systems::damage;
use crate::targeting::{self, Candidate};
use crate::tower::WaveState;
use crate::world_setup;

/// Run every minion for one tick.
#[allow(clippy::too_many_arguments)]
pub fn run(
    world: &mut World,
    physics: &mut PhysicsWorld,
    rng: &mut ChaCha8Rng,
    wave: &mut WaveState,
    tuning: &MinionTuning,
    death: &DeathTuning,
    profile: &MinionProfile,
    events: &mut Vec<SimEvent>,
    dt: f64,
) {
    let mut living = targeting::living_enemies(world, physics);

    let mut roster: Vec<(EntityId, Entity, Minion, BodyHandle)> = world
        .query::<(&EntityId, &Minion, &BodyHandle)>()
        .iter()
        .map(|(entity, (id, minion, handle))| (*id, entity, minion.clone(), *handle))
        .collect();
    roster.sort_by_key(|(id, _, _, _)| *id);

    for (id, entity, mut minion, handle) in roster {
        let Some(body) = physics.get(handle) else {
            continue;
        };

        let sighting = |c: &Candidate| Sighting {
            id: c.id,
            position: c.position,
        };
        let ctx = MinionContext {
            state: minion.state,
            state_timer: minion.state_timer,
            target: minion.target,
            position: body.position,
            velocity: body.velocity,
            nearest_enemy: targeting::nearest(&living, body.position).map(sighting),
            target_sighting: minion
                .target
                .and_then(|t| living.iter().find(|c| c.id == t))
                .map(sighting),
            dt,
        };

        let update = fsm::evaluate(&ctx, profile);
        if update.state_changed {
            trace!(?id, from = ?minion.state, to = ?update.state, "minion state");
        }
        minion.state = update.state;
        minion.state_timer = update.state_timer;
        minion.target = update.target;

        match update.action {
            MinionAction::Idle => {}
            MinionAction::MoveToward(point) => {
                if let Some(body) = physics.get_mut(handle) {
                    if locomotion::walk_toward(body, point, tuning.speed, tuning.force_mult) {
                        minion.leg_phase += dt * tuning.speed * tuning.leg_rate;
                    }
                }
            }
            MinionAction::Face(point) => {
                if let Some(body) = physics.get_mut(handle) {
                    locomotion::face(body, point);
                }
            }
            MinionAction::Strike(target_id) => {
                let from = ctx.position;
                if strike(world, physics, rng, wave, tuning, death, &living, from, target_id, events) {
                    living.retain(|c| c.id != target_id);
                }
                events.push(SimEvent::MinionStrike {
                    minion: id,
                    target: target_id,
                });
            }
            MinionAction::Tumble => {
                if let Some(body) = physics.get_mut(handle) {
                    body.velocity.x *= tuning.recovery_damping;
                    body.velocity.z *= tuning.recovery_damping;
                }
            }
        }

        if let Ok(mut stored) = world.get::<&mut Minion>(entity) {
            *stored = minion;
        }
    }
}

/// Land a blow: damage plus a shove away from the minion with a little
/// lift. Returns true if the blow killed the target.
#[allow(clippy::too_many_arguments)]
fn strike(
    world: &mut World,
    physics: &mut PhysicsWorld,
    rng: &mut ChaCha8Rng,
    wave: &mut WaveState,
    tuning: &MinionTuning,
    death: &DeathTuning,
    living: &[Candidate],
    from: DVec3,
    target_id: EntityId,
    events: &mut Vec<SimEvent>,
) -> bool {
    let Some(target) = living.iter().find(|c| c.id == target_id) else {
        return false;
    };
    let (Ok(mut enemy), Some(body)) = (
        world.get::<&mut Enemy>(target.entity),
        physics.get_mut(target.body),
    ) else {
        return false;
    };

    enemy.hp -= tuning.damage;

    let offset = (body.position - from).flat();
    let dist = match offset.length() {
        d if d > 0.0 => d,
        _ => DISTANCE_FALLBACK,
    };
    let push = DVec3::new(offset.x / dist, tuning.push_lift, offset.z / dist).normalize()
        * tuning.push_force;
    body.apply_impulse(push);

    if enemy.hp <= 0.0 && enemy.alive {
        damage::kill_enemy(&mut enemy, body, push, death, wave, rng);
        debug!(id = ?target_id, "enemy killed by minion");
        events.push(SimEvent::EnemyKilled {
            id: target_id,
            cause: KillCause::Minion,
        });
        return true;
    }
    false
}

/// Spawn `count` fresh minions.
pub fn spawn_roster(
    world: &mut World,
    physics: &mut PhysicsWorld,
    rng: &mut ChaCha8Rng,
    ids: &mut IdAllocator,
    tuning: &MinionTuning,
    count: usize,
) {
    for _ in 0..count {
        let id = world_setup::spawn_minion(world, physics, rng, ids, tuning);
        debug!(?id, "minion spawned");
    }
}

/// Remove every minion and its body immediately.
pub fn despawn_all(world: &mut World, physics: &mut PhysicsWorld) {
    let roster: Vec<(Entity, BodyHandle)> = world
        .query::<(&Minion, &BodyHandle)>()
        .iter()
        .map(|(entity, (_, handle))| (entity, *handle))
        .collect();
    for (entity, handle) in roster {
        physics.remove(handle);
        let _ = world.despawn(entity);
    }
}

/// Remove the `count` most recently spawned minions.
pub fn despawn_newest(world: &mut World, physics: &mut PhysicsWorld, count: usize) {
    let mut roster: Vec<(EntityId, Entity, BodyHandle)> = world
        .query::<(&EntityId, &Minion, &BodyHandle)>()
        .iter()
        .map(|(entity, (id, _, handle))| (*id, entity, *handle))
        .collect();
    roster.sort_by_key(|(id, _, _)| std::cmp::Reverse(*id));
    for (id, entity, handle) in roster.into_iter().take(count) {
        physics.remove(handle);
        let _ = world.despawn(entity);
        debug!(?id, "minion despawned");
    }
}

/// Number of minions currently in the world.
pub fn count(world: &World) -> usize {
    world.query::<&Minion>().iter().count()
}
