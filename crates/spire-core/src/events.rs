//! Events emitted by the simulation for audio and UI feedback.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::EntityId;

/// Something worth a sound or a flash on screen. Drained into each snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimEvent {
    /// A new enemy appeared on the spawn ring.
    EnemySpawned { id: EntityId, position: DVec3 },
    /// An enemy died.
    EnemyKilled { id: EntityId, cause: KillCause },
    /// A physical projectile left the muzzle.
    AttackFired {
        kind: ProjectileKind,
        id: EntityId,
        target: Option<EntityId>,
    },
    /// Lightning zapped a chain of enemies.
    ChainLightning { targets: Vec<EntityId> },
    /// A frost pulse went off.
    FrostPulse { affected: usize },
    /// A minion's swing connected.
    MinionStrike { minion: EntityId, target: EntityId },
    WaveStarted { number: u32, enemies_total: u32 },
    WaveCleared { number: u32 },
    /// Enemies chewed on the tower this tick.
    TowerDamaged { amount: f64, hp: f64 },
    TowerDestroyed,
}
