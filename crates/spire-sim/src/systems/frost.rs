//! Frost pulse: an instant ring around the tower that chips and slows
//! every enemy inside it.

use glam::DVec3;
use hecs::World;
use rand::Rng;
use tracing::debug;

use spire_core::components::Enemy;
use spire_core::enums::KillCause;
use spire_core::events::SimEvent;
use spire_core::state::FrostPulseView;
use spire_core::tuning::{DeathTuning, FrostTuning};
use spire_core::types::Planar;
use spire_physics::PhysicsWorld;

use crate::systems::damage;
use crate::targeting;
use crate::tower::WaveState;

/// An expanding ring for the renderer.
#[derive(Debug, Clone)]
pub struct FrostPulse {
    pub radius: f64,
    pub age: f64,
    pub max_age: f64,
}

impl FrostPulse {
    pub fn view(&self) -> FrostPulseView {
        FrostPulseView {
            radius: self.radius,
            fade: (self.age / self.max_age).clamp(0.0, 1.0),
        }
    }
}

/// Pulse around `center`. Returns false, without spending the shot, when no
/// living enemy is inside the radius.
#[allow(clippy::too_many_arguments)]
pub fn fire<R: Rng>(
    world: &mut World,
    physics: &mut PhysicsWorld,
    rng: &mut R,
    wave: &mut WaveState,
    pulses: &mut Vec<FrostPulse>,
    tuning: &FrostTuning,
    death: &DeathTuning,
    center: DVec3,
    events: &mut Vec<SimEvent>,
) -> bool {
    let radius_sq = tuning.radius * tuning.radius;
    let caught: Vec<_> = targeting::living_enemies(world, physics)
        .into_iter()
        .filter(|c| center.horizontal_distance_squared(c.position) < radius_sq)
        .collect();
    if caught.is_empty() {
        return false;
    }

    for target in &caught {
        let (Ok(mut enemy), Some(body)) = (
            world.get::<&mut Enemy>(target.entity),
            physics.get_mut(target.body),
        ) else {
            continue;
        };

        enemy.hp -= tuning.damage;
        enemy.slow_factor = enemy.slow_factor.min(tuning.slow_factor);
        enemy.slow_timer = enemy.slow_timer.max(tuning.slow_duration);

        if enemy.hp <= 0.0 && enemy.alive {
            let outward = (body.position - center).flat().normalize_or_zero();
            damage::kill_enemy(&mut enemy, body, outward, death, wave, rng);
            debug!(id = ?target.id, "enemy killed by frost");
            events.push(SimEvent::EnemyKilled {
                id: target.id,
                cause: KillCause::Frost,
            });
        }
    }

    debug!(affected = caught.len(), "frost pulse");
    events.push(SimEvent::FrostPulse {
        affected: caught.len(),
    });
    pulses.push(FrostPulse {
        radius: tuning.radius,
        age: 0.0,
        max_age: tuning.pulse_lifetime,
    });
    true
}

/// Age pulses and drop the ones that have faded out.
pub fn age_pulses(pulses: &mut Vec<FrostPulse>, dt: f64) {
    for pulse in pulses.iter_mut() {
        pulse.age += dt;
    }
    pulses.retain(|pulse| pulse.age < pulse.max_age);
}
