//! Enemy AI: walk at the tower, chew on it when in reach.
//!
//! Movement is force-based so knockback from hits and splash carries
//! through instead of being overwritten every tick.

use glam::DVec3;
use hecs::World;
use tracing::trace;

use spire_core::components::Enemy;
use spire_core::events::SimEvent;
use spire_core::tuning::EnemyTuning;
use spire_core::types::Planar;
use spire_physics::{BodyHandle, PhysicsWorld, RigidBody};

use crate::locomotion;
use crate::tower::TowerState;

/// Run enemy AI for one tick and apply any melee damage to the tower.
pub fn run(
    world: &mut World,
    physics: &mut PhysicsWorld,
    tower: &mut TowerState,
    tuning: &EnemyTuning,
    events: &mut Vec<SimEvent>,
    dt: f64,
) {
    let mut damage = 0.0;
    for (_entity, (enemy, handle)) in world.query_mut::<(&mut Enemy, &BodyHandle)>() {
        let Some(body) = physics.get_mut(*handle) else {
            continue;
        };
        damage += advance(enemy, body, tower.position, tuning, dt);
    }

    if damage > 0.0 && !tower.is_destroyed() {
        tower.hp = (tower.hp - damage).max(0.0);
        trace!(damage, hp = tower.hp, "tower damaged");
        events.push(SimEvent::TowerDamaged {
            amount: damage,
            hp: tower.hp,
        });
    }
}

/// Advance one enemy by `dt`. Returns the damage it dealt to the tower.
pub fn advance(
    enemy: &mut Enemy,
    body: &mut RigidBody,
    tower_position: DVec3,
    tuning: &EnemyTuning,
    dt: f64,
) -> f64 {
    if !enemy.alive {
        return 0.0;
    }

    if enemy.stun_timer > 0.0 {
        enemy.stun_timer = (enemy.stun_timer - dt).max(0.0);
        body.velocity.x *= tuning.stun_damping;
        body.velocity.z *= tuning.stun_damping;
        return 0.0;
    }

    let mut speed = enemy.speed;
    if enemy.slow_timer > 0.0 {
        enemy.slow_timer -= dt;
        if enemy.slow_timer <= 0.0 {
            enemy.slow_timer = 0.0;
            enemy.slow_factor = 1.0;
        } else {
            speed *= enemy.slow_factor;
        }
    }

    let offset = tower_position - body.position;
    if offset.horizontal_length() < tuning.tower_range {
        // Bounce back off the wall, keep any vertical motion.
        body.velocity = DVec3::new(
            -offset.x * tuning.tower_pushback,
            body.velocity.y,
            -offset.z * tuning.tower_pushback,
        );
        return enemy.damage_per_sec * dt;
    }

    locomotion::walk_toward(body, tower_position, speed, tuning.force_mult);
    enemy.leg_phase += dt * speed * tuning.leg_rate;
    0.0
}
