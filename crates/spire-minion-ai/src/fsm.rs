//! Minion behaviour finite state machine.
//!
//! Pure functions that compute state transitions and the physical action a
//! minion should take this tick. No ECS or physics dependency: the sim
//! gathers a `MinionContext`, calls `evaluate`, and applies the result.

use glam::DVec3;

use spire_core::enums::MinionState;
use spire_core::types::{EntityId, Planar};

use crate::profiles::MinionProfile;

/// Where an enemy is, as seen by a minion.
#[derive(Debug, Clone, Copy)]
pub struct Sighting {
    pub id: EntityId,
    pub position: DVec3,
}

/// Input to the minion FSM for a single entity.
#[derive(Debug, Clone)]
pub struct MinionContext {
    pub state: MinionState,
    pub state_timer: f64,
    pub target: Option<EntityId>,
    pub position: DVec3,
    pub velocity: DVec3,
    /// Nearest living enemy on the ground plane.
    pub nearest_enemy: Option<Sighting>,
    /// The current target, present only while it is still alive.
    pub target_sighting: Option<Sighting>,
    pub dt: f64,
}

/// What the minion's body should do this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MinionAction {
    /// Stand still.
    Idle,
    /// Walk toward a point.
    MoveToward(DVec3),
    /// Turn to face a point.
    Face(DVec3),
    /// Land a blow on the target.
    Strike(EntityId),
    /// Lie on the ground bleeding off momentum.
    Tumble,
}

/// Output from the minion FSM.
#[derive(Debug, Clone)]
pub struct MinionUpdate {
    pub state: MinionState,
    pub state_timer: f64,
    pub target: Option<EntityId>,
    pub action: MinionAction,
    pub state_changed: bool,
}

/// Evaluate the FSM for one minion.
pub fn evaluate(ctx: &MinionContext, profile: &MinionProfile) -> MinionUpdate {
    if ctx.state != MinionState::Recovery && ctx.velocity.length() > profile.fling_threshold {
        return transition(MinionState::Recovery, profile.recovery_secs, None, MinionAction::Idle);
    }

    match ctx.state {
        MinionState::Roaming => evaluate_roaming(ctx, profile),
        MinionState::Windup => evaluate_windup(ctx, profile),
        MinionState::Bonk => evaluate_bonk(ctx, profile),
        MinionState::Cooldown => evaluate_timed(ctx, MinionAction::Idle),
        MinionState::Recovery => evaluate_timed(ctx, MinionAction::Tumble),
    }
}

fn evaluate_roaming(ctx: &MinionContext, profile: &MinionProfile) -> MinionUpdate {
    let Some(enemy) = ctx.nearest_enemy else {
        return stay(ctx, ctx.state_timer, MinionAction::Idle);
    };

    if ctx.position.horizontal_distance(enemy.position) < profile.attack_range {
        return transition(
            MinionState::Windup,
            profile.windup_secs,
            Some(enemy.id),
            MinionAction::Idle,
        );
    }

    stay(ctx, ctx.state_timer, MinionAction::MoveToward(enemy.position))
}

fn evaluate_windup(ctx: &MinionContext, profile: &MinionProfile) -> MinionUpdate {
    let timer = ctx.state_timer - ctx.dt;

    // Target died mid-swing.
    let Some(target) = ctx.target_sighting else {
        return transition(MinionState::Roaming, 0.0, None, MinionAction::Idle);
    };

    if timer <= 0.0 {
        return MinionUpdate {
            state: MinionState::Bonk,
            state_timer: profile.bonk_secs,
            target: ctx.target,
            action: MinionAction::Face(target.position),
            state_changed: true,
        };
    }

    stay(ctx, timer, MinionAction::Face(target.position))
}

fn evaluate_bonk(ctx: &MinionContext, profile: &MinionProfile) -> MinionUpdate {
    // The cooldown is spent whether or not the blow lands.
    let action = match ctx.target_sighting {
        Some(target) => MinionAction::Strike(target.id),
        None => MinionAction::Idle,
    };
    transition(MinionState::Cooldown, profile.cooldown_secs, None, action)
}

fn evaluate_timed(ctx: &MinionContext, action: MinionAction) -> MinionUpdate {
    let timer = ctx.state_timer - ctx.dt;
    if timer <= 0.0 {
        return MinionUpdate {
            state: MinionState::Roaming,
            state_timer: timer,
            target: ctx.target,
            action,
            state_changed: true,
        };
    }
    stay(ctx, timer, action)
}

fn stay(ctx: &MinionContext, state_timer: f64, action: MinionAction) -> MinionUpdate {
    MinionUpdate {
        state: ctx.state,
        state_timer,
        target: ctx.target,
        action,
        state_changed: false,
    }
}

fn transition(
    state: MinionState,
    state_timer: f64,
    target: Option<EntityId>,
    action: MinionAction,
) -> MinionUpdate {
    MinionUpdate {
        state,
        state_timer,
        target,
        action,
        state_changed: true,
    }
}
