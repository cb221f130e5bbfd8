//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Every attack the tower can have switched on.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum AttackKind {
    /// Arcing shot aimed at clusters, splashes on impact.
    #[default]
    Fireball,
    /// Fast, flat shot at the nearest enemy.
    Arrow,
    /// Slow homing bolt aimed at the farthest enemy.
    Arcane,
    /// Instant chain zap with a short stun.
    Lightning,
    /// Instant pulse around the tower that slows everything it touches.
    Frost,
    /// Persistent melee allies rather than a timed shot.
    Minions,
}

impl AttackKind {
    pub const ALL: [AttackKind; 6] = [
        AttackKind::Fireball,
        AttackKind::Arrow,
        AttackKind::Arcane,
        AttackKind::Lightning,
        AttackKind::Frost,
        AttackKind::Minions,
    ];

    /// Whether this attack fires on a timer.
    pub fn is_timed(self) -> bool {
        !matches!(self, AttackKind::Minions)
    }
}

/// Physical projectile flavours.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectileKind {
    #[default]
    Fireball,
    Arrow,
    Arcane,
}

impl ProjectileKind {
    /// Homing projectiles float and never detonate on the ground.
    pub fn is_homing(self) -> bool {
        matches!(self, ProjectileKind::Arcane)
    }
}

/// Melee ally behaviour state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MinionState {
    /// Looking for (and walking to) the nearest enemy.
    #[default]
    Roaming,
    /// Committed to a swing, facing the target.
    Windup,
    /// The swing frame. Damage lands here.
    Bonk,
    /// Resting after a swing.
    Cooldown,
    /// Tumbling after being flung.
    Recovery,
}

/// Session phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Systems run every tick.
    #[default]
    Active,
    /// Time frozen by the player.
    Paused,
    /// Tower destroyed. Nothing runs until reset.
    Defeated,
}

/// What finished an enemy off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KillCause {
    DirectHit(ProjectileKind),
    Splash,
    Lightning,
    Frost,
    Minion,
}
