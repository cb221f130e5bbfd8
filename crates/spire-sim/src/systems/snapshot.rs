//! Snapshot builder: queries the ECS world and assembles a GameStateSnapshot.

use hecs::World;

use spire_core::components::{Enemy, Minion, Projectile};
use spire_core::enums::SessionPhase;
use spire_core::events::SimEvent;
use spire_core::state::*;
use spire_core::types::{EntityId, SimTime};
use spire_physics::{BodyHandle, PhysicsWorld};

use crate::systems::frost::FrostPulse;
use crate::systems::lightning::ChainArc;
use crate::tower::{TowerState, WaveState};

/// Build a complete snapshot of the current game state. Entity lists are
/// ordered by id.
#[allow(clippy::too_many_arguments)]
pub fn build_snapshot(
    world: &World,
    physics: &PhysicsWorld,
    time: &SimTime,
    phase: SessionPhase,
    tower: &TowerState,
    wave: &WaveState,
    arcs: &[ChainArc],
    pulses: &[FrostPulse],
    events: Vec<SimEvent>,
) -> GameStateSnapshot {
    GameStateSnapshot {
        time: *time,
        phase,
        tower: tower.view(),
        wave: wave.view(),
        enemies: build_enemy_views(world, physics),
        projectiles: build_projectile_views(world, physics),
        minions: build_minion_views(world, physics),
        arcs: arcs.iter().map(ChainArc::view).collect(),
        frost_pulses: pulses.iter().map(FrostPulse::view).collect(),
        events,
    }
}

fn build_enemy_views(world: &World, physics: &PhysicsWorld) -> Vec<EnemyView> {
    let mut views: Vec<EnemyView> = world
        .query::<(&EntityId, &Enemy, &BodyHandle)>()
        .iter()
        .filter_map(|(_, (id, enemy, handle))| {
            let body = physics.get(*handle)?;
            Some(EnemyView {
                id: *id,
                position: body.position,
                orientation: body.orientation,
                hp: enemy.hp,
                max_hp: enemy.max_hp,
                alive: enemy.alive,
                stunned: enemy.stun_timer > 0.0,
                slowed: enemy.slow_timer > 0.0,
                leg_phase: enemy.leg_phase,
            })
        })
        .collect();
    views.sort_by_key(|v| v.id);
    views
}

fn build_projectile_views(world: &World, physics: &PhysicsWorld) -> Vec<ProjectileView> {
    let mut views: Vec<ProjectileView> = world
        .query::<(&EntityId, &Projectile, &BodyHandle)>()
        .iter()
        .filter_map(|(_, (id, projectile, handle))| {
            let body = physics.get(*handle)?;
            Some(ProjectileView {
                id: *id,
                kind: projectile.kind,
                position: body.position,
                velocity: body.velocity,
                alive: projectile.alive,
            })
        })
        .collect();
    views.sort_by_key(|v| v.id);
    views
}

fn build_minion_views(world: &World, physics: &PhysicsWorld) -> Vec<MinionView> {
    let mut views: Vec<MinionView> = world
        .query::<(&EntityId, &Minion, &BodyHandle)>()
        .iter()
        .filter_map(|(_, (id, minion, handle))| {
            let body = physics.get(*handle)?;
            Some(MinionView {
                id: *id,
                position: body.position,
                orientation: body.orientation,
                state: minion.state,
                leg_phase: minion.leg_phase,
            })
        })
        .collect();
    views.sort_by_key(|v| v.id);
    views
}
