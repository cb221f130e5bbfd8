//! Player commands sent from the frontend to the simulation.
//!
//! Commands are queued and processed at the next tick boundary.

use serde::{Deserialize, Serialize};

use crate::enums::AttackKind;

/// All possible player actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    // --- Loadout ---
    /// Switch an attack on or off. Disabling minions despawns them at once.
    SetAttackEnabled { kind: AttackKind, enabled: bool },
    /// Change the size of the minion roster (clamped to the maximum).
    SetMinionCount { count: usize },

    // --- Simulation control ---
    /// Pause the simulation.
    Pause,
    /// Resume from pause.
    Resume,
    /// Throw the session away and start again from wave 1.
    Reset,
}
