//! Game state snapshot: the complete visible state handed to the renderer.

use glam::{DQuat, DVec3};
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::SimEvent;
use crate::types::{EntityId, SimTime};

/// Complete game state produced after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    pub phase: SessionPhase,
    pub tower: TowerView,
    pub wave: WaveView,
    pub enemies: Vec<EnemyView>,
    pub projectiles: Vec<ProjectileView>,
    pub minions: Vec<MinionView>,
    pub arcs: Vec<ChainArcView>,
    pub frost_pulses: Vec<FrostPulseView>,
    pub events: Vec<SimEvent>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TowerView {
    pub hp: f64,
    pub max_hp: f64,
    pub attacks: Vec<AttackView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttackView {
    pub kind: AttackKind,
    pub enabled: bool,
    /// Seconds until the next shot. Zero for untimed attacks.
    pub fire_timer: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WaveView {
    pub number: u32,
    pub enemies_spawned: u32,
    pub enemies_total: u32,
    pub enemies_remaining: u32,
    pub in_reprieve: bool,
    pub reprieve_timer: f64,
    /// Kills across the whole session.
    pub kills: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyView {
    pub id: EntityId,
    pub position: DVec3,
    pub orientation: DQuat,
    pub hp: f64,
    pub max_hp: f64,
    pub alive: bool,
    pub stunned: bool,
    pub slowed: bool,
    pub leg_phase: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileView {
    pub id: EntityId,
    pub kind: ProjectileKind,
    pub position: DVec3,
    pub velocity: DVec3,
    pub alive: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinionView {
    pub id: EntityId,
    pub position: DVec3,
    pub orientation: DQuat,
    pub state: MinionState,
    pub leg_phase: f64,
}

/// A lightning arc for the renderer to draw and fade.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChainArcView {
    pub points: Vec<DVec3>,
    /// 0.0 = fresh, 1.0 = gone.
    pub fade: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrostPulseView {
    pub radius: f64,
    pub fade: f64,
}
