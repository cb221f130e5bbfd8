//! Chain lightning: an instant zap that hops between nearby enemies.
//!
//! No physics projectile. Each link takes damage and a short stun; the arc
//! is kept only as a fading visual.

use glam::DVec3;
use hecs::World;
use rand::Rng;
use tracing::debug;

use spire_core::components::Enemy;
use spire_core::enums::KillCause;
use spire_core::events::SimEvent;
use spire_core::state::ChainArcView;
use spire_core::tuning::LightningTuning;
use spire_physics::PhysicsWorld;

use crate::systems::damage;
use crate::targeting;
use crate::tower::WaveState;

/// A drawn lightning arc: muzzle first, then each link in order.
#[derive(Debug, Clone)]
pub struct ChainArc {
    pub points: Vec<DVec3>,
    pub age: f64,
    pub max_age: f64,
}

impl ChainArc {
    pub fn view(&self) -> ChainArcView {
        ChainArcView {
            points: self.points.clone(),
            fade: (self.age / self.max_age).clamp(0.0, 1.0),
        }
    }
}

/// Zap a chain starting from the enemy nearest `origin`. Returns false when
/// there was nothing to hit.
#[allow(clippy::too_many_arguments)]
pub fn fire<R: Rng>(
    world: &mut World,
    physics: &mut PhysicsWorld,
    rng: &mut R,
    wave: &mut WaveState,
    arcs: &mut Vec<ChainArc>,
    tuning: &LightningTuning,
    origin: DVec3,
    muzzle: DVec3,
    events: &mut Vec<SimEvent>,
) -> bool {
    let living = targeting::living_enemies(world, physics);
    let chain = targeting::select_chain(&living, origin, tuning.chains, tuning.chain_range);
    if chain.is_empty() {
        return false;
    }

    let mut points = Vec::with_capacity(chain.len() + 1);
    points.push(muzzle);

    for link in &chain {
        let (Ok(mut enemy), Some(body)) = (
            world.get::<&mut Enemy>(link.entity),
            physics.get_mut(link.body),
        ) else {
            continue;
        };
        points.push(body.position);

        enemy.hp -= tuning.damage;
        enemy.stun_timer = enemy.stun_timer.max(tuning.stun);

        if enemy.hp <= 0.0 && enemy.alive {
            damage::record_kill(&mut enemy, wave);
            // A small hop rather than the full death launch.
            body.velocity = DVec3::new(
                rng.gen_range(-tuning.zap_side..=tuning.zap_side),
                tuning.zap_up,
                rng.gen_range(-tuning.zap_side..=tuning.zap_side),
            );
            debug!(id = ?link.id, "enemy killed by lightning");
            events.push(SimEvent::EnemyKilled {
                id: link.id,
                cause: KillCause::Lightning,
            });
        }
    }

    events.push(SimEvent::ChainLightning {
        targets: chain.iter().map(|link| link.id).collect(),
    });
    arcs.push(ChainArc {
        points,
        age: 0.0,
        max_age: tuning.arc_lifetime,
    });
    true
}

/// Age arcs and drop the ones that have faded out.
pub fn age_arcs(arcs: &mut Vec<ChainArc>, dt: f64) {
    for arc in arcs.iter_mut() {
        arc.age += dt;
    }
    arcs.retain(|arc| arc.age < arc.max_age);
}
