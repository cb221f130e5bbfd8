//! Behaviour profile for melee allies.
//!
//! Consolidates the FSM's parameters so the state machine never reads the
//! tuning table directly.

use spire_core::tuning::MinionTuning;

/// Behavioural profile for a minion.
#[derive(Debug, Clone)]
pub struct MinionProfile {
    /// Horizontal distance at which a swing starts.
    pub attack_range: f64,
    pub windup_secs: f64,
    /// Length of the swing frame.
    pub bonk_secs: f64,
    pub cooldown_secs: f64,
    /// Time spent tumbling after being flung.
    pub recovery_secs: f64,
    /// Speed magnitude that counts as being flung.
    pub fling_threshold: f64,
}

impl MinionProfile {
    pub fn from_tuning(tuning: &MinionTuning) -> Self {
        Self {
            attack_range: tuning.attack_range,
            windup_secs: tuning.windup_secs,
            bonk_secs: tuning.bonk_secs,
            cooldown_secs: tuning.cooldown_secs,
            recovery_secs: tuning.recovery_secs,
            fling_threshold: tuning.fling_threshold,
        }
    }
}

impl Default for MinionProfile {
    fn default() -> Self {
        Self::from_tuning(&MinionTuning::default())
    }
}
