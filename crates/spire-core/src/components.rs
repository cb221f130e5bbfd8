//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Physical state (position, velocity, orientation) lives in the physics
//! world; these carry only the game-side state.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::EntityId;

/// An attacker walking on the tower.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub hp: f64,
    pub max_hp: f64,
    /// Base walking speed before slows.
    pub speed: f64,
    /// Damage per second dealt to the tower in melee range.
    pub damage_per_sec: f64,
    /// False from the moment of death. The entity lingers until swept.
    pub alive: bool,
    /// Seconds of stun remaining.
    pub stun_timer: f64,
    /// Multiplier on speed while `slow_timer > 0`.
    pub slow_factor: f64,
    pub slow_timer: f64,
    /// Cosmetic walk cycle phase.
    pub leg_phase: f64,
}

/// A physical shot in flight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub kind: ProjectileKind,
    pub alive: bool,
    pub damage: f64,
    pub knockback: f64,
    /// Seconds since launch.
    pub age: f64,
    pub max_age: f64,
    /// Zero means no splash.
    pub splash_radius: f64,
    pub splash_force: f64,
    pub splash_damage_mult: f64,
    /// Direct hit detection radius.
    pub hit_radius: f64,
    /// Homing target, if any.
    pub target: Option<EntityId>,
    /// Set once the body has been through a physics step.
    #[serde(default)]
    pub integrated: bool,
}

/// A melee ally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Minion {
    pub state: MinionState,
    pub state_timer: f64,
    pub target: Option<EntityId>,
    pub leg_phase: f64,
}

/// Marker: the renderer is still fading this entity out, do not sweep it.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct FadeHold;
