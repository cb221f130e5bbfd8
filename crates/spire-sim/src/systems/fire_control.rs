//! Fire control: ticks each timed attack and launches it when ready.
//!
//! Timers only run while at least one enemy is alive, so a fresh wave is
//! met with whatever stagger was left over from the last one.

use glam::DVec3;
use hecs::World;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use spire_core::enums::{AttackKind, ProjectileKind};
use spire_core::events::SimEvent;
use spire_core::tuning::{BallisticTuning, HomingTuning, Tuning};
use spire_core::types::{IdAllocator, Planar};
use spire_physics::PhysicsWorld;

use crate::ballistics;
use crate::systems::frost::{self, FrostPulse};
use crate::systems::lightning::{self, ChainArc};
use crate::targeting::{self, Candidate};
use crate::tower::{TowerState, WaveState};
use crate::world_setup;

/// Run fire control for one tick.
#[allow(clippy::too_many_arguments)]
pub fn run(
    world: &mut World,
    physics: &mut PhysicsWorld,
    rng: &mut ChaCha8Rng,
    ids: &mut IdAllocator,
    tower: &mut TowerState,
    wave: &mut WaveState,
    arcs: &mut Vec<ChainArc>,
    pulses: &mut Vec<FrostPulse>,
    tuning: &Tuning,
    events: &mut Vec<SimEvent>,
    dt: f64,
) {
    if tower.is_destroyed() {
        return;
    }
    if targeting::living_enemies(world, physics).is_empty() {
        return;
    }

    let origin = tower.position;
    let muzzle = tower.muzzle();

    // Resolved in declaration order: fireball, arrow, arcane, lightning, frost.
    for kind in AttackKind::ALL.into_iter().filter(|kind| kind.is_timed()) {
        let Some(attack) = tower.attacks.get_mut(&kind) else {
            continue;
        };
        if !attack.enabled {
            continue;
        }
        attack.fire_timer -= dt;
        if attack.fire_timer > 0.0 {
            continue;
        }

        // Earlier attacks this tick may have killed the nearest enemy.
        let living = targeting::living_enemies(world, physics);
        let fired = match kind {
            AttackKind::Fireball => targeting::cluster_biased(&living, origin, &tuning.targeting)
                .map(|target| {
                    fire_ballistic(
                        world,
                        physics,
                        ids,
                        ProjectileKind::Fireball,
                        &tuning.fireball,
                        target,
                        muzzle,
                        tuning.physics.gravity,
                        events,
                    )
                })
                .is_some(),
            AttackKind::Arrow => targeting::nearest(&living, origin)
                .map(|target| {
                    fire_ballistic(
                        world,
                        physics,
                        ids,
                        ProjectileKind::Arrow,
                        &tuning.arrow,
                        target,
                        muzzle,
                        tuning.physics.gravity,
                        events,
                    )
                })
                .is_some(),
            AttackKind::Arcane => targeting::farthest(&living, origin)
                .map(|target| fire_arcane(world, physics, ids, &tuning.arcane, target, muzzle, events))
                .is_some(),
            AttackKind::Lightning => lightning::fire(
                world,
                physics,
                rng,
                wave,
                arcs,
                &tuning.lightning,
                origin,
                muzzle,
                events,
            ),
            AttackKind::Frost => frost::fire(
                world,
                physics,
                rng,
                wave,
                pulses,
                &tuning.frost,
                &tuning.death,
                origin,
                events,
            ),
            AttackKind::Minions => false,
        };

        if fired {
            attack.fire_timer += 1.0 / attack.fire_rate;
        } else {
            // Hold the shot until something is in reach.
            attack.fire_timer = 0.0;
        }
    }
}

/// Launch an arcing shot at `target`, leading it by its ground velocity.
#[allow(clippy::too_many_arguments)]
fn fire_ballistic(
    world: &mut World,
    physics: &mut PhysicsWorld,
    ids: &mut IdAllocator,
    kind: ProjectileKind,
    tuning: &BallisticTuning,
    target: &Candidate,
    muzzle: DVec3,
    gravity: f64,
    events: &mut Vec<SimEvent>,
) {
    let distance = muzzle.horizontal_distance(target.position);
    let angle = ballistics::launch_angle(distance, tuning.angle_min, tuning.angle_max);
    let aim = ballistics::predict_intercept(
        muzzle,
        target.position,
        target.velocity,
        tuning.speed,
        angle,
        gravity,
    );
    let velocity = ballistics::ballistic_launch_velocity(muzzle, aim, tuning.speed, angle);

    let id = world_setup::spawn_ballistic(world, physics, ids, kind, tuning, muzzle, velocity);
    debug!(?id, ?kind, target = ?target.id, angle, "projectile fired");
    events.push(SimEvent::AttackFired {
        kind,
        id,
        target: Some(target.id),
    });
}

/// Lob a homing bolt toward `target`; steering takes over from there.
fn fire_arcane(
    world: &mut World,
    physics: &mut PhysicsWorld,
    ids: &mut IdAllocator,
    tuning: &HomingTuning,
    target: &Candidate,
    muzzle: DVec3,
    events: &mut Vec<SimEvent>,
) {
    let velocity = ballistics::homing_launch_velocity(
        muzzle,
        target.position,
        tuning.max_speed,
        tuning.launch_horizontal,
        tuning.launch_up,
    );
    let id = world_setup::spawn_homing(world, physics, ids, tuning, muzzle, velocity, target.id);
    debug!(?id, target = ?target.id, "arcane bolt fired");
    events.push(SimEvent::AttackFired {
        kind: ProjectileKind::Arcane,
        id,
        target: Some(target.id),
    });
}
