//! Session-level state that is not an ECS entity: the tower, its attack
//! timers, and the wave director's bookkeeping.
//!
//! Stored directly on `SimulationEngine`, NOT in the hecs world.

use std::collections::BTreeMap;

use glam::DVec3;

use spire_core::enums::AttackKind;
use spire_core::state::{AttackView, TowerView, WaveView};
use spire_core::tuning::{Tuning, WaveTuning};
use spire_physics::BodyHandle;

/// One attack slot on the tower.
#[derive(Debug, Clone)]
pub struct AttackState {
    pub enabled: bool,
    /// Shots per second. Zero for untimed attacks.
    pub fire_rate: f64,
    /// Seconds until the next shot.
    pub fire_timer: f64,
}

/// The defended structure at the origin.
#[derive(Debug, Clone)]
pub struct TowerState {
    pub position: DVec3,
    pub hp: f64,
    pub max_hp: f64,
    /// Height shots leave from.
    pub muzzle_height: f64,
    pub attacks: BTreeMap<AttackKind, AttackState>,
    /// Static collision column.
    pub body: Option<BodyHandle>,
}

impl TowerState {
    /// A fresh tower with every attack enabled and the opening stagger
    /// applied to the fire timers.
    pub fn new(tuning: &Tuning) -> Self {
        let attacks = AttackKind::ALL
            .into_iter()
            .map(|kind| {
                let state = AttackState {
                    enabled: true,
                    fire_rate: tuning.fire_rate(kind).unwrap_or(0.0),
                    fire_timer: tuning.fire_offset(kind),
                };
                (kind, state)
            })
            .collect();

        Self {
            position: DVec3::ZERO,
            hp: tuning.tower.max_hp,
            max_hp: tuning.tower.max_hp,
            muzzle_height: tuning.tower.muzzle_height,
            attacks,
            body: None,
        }
    }

    pub fn muzzle(&self) -> DVec3 {
        self.position + DVec3::Y * self.muzzle_height
    }

    pub fn is_destroyed(&self) -> bool {
        self.hp <= 0.0
    }

    pub fn is_enabled(&self, kind: AttackKind) -> bool {
        self.attacks.get(&kind).is_some_and(|a| a.enabled)
    }

    pub fn set_enabled(&mut self, kind: AttackKind, enabled: bool) {
        if let Some(attack) = self.attacks.get_mut(&kind) {
            attack.enabled = enabled;
        }
    }

    pub fn view(&self) -> TowerView {
        TowerView {
            hp: self.hp,
            max_hp: self.max_hp,
            attacks: self
                .attacks
                .iter()
                .map(|(kind, attack)| AttackView {
                    kind: *kind,
                    enabled: attack.enabled,
                    fire_timer: attack.fire_timer,
                })
                .collect(),
        }
    }
}

/// Wave director bookkeeping.
#[derive(Debug, Clone, Default)]
pub struct WaveState {
    /// 1-based wave number.
    pub number: u32,
    pub enemies_spawned: u32,
    pub enemies_total: u32,
    /// Spawned this wave and not yet killed.
    pub enemies_remaining: u32,
    pub spawn_timer: f64,
    pub spawn_interval: f64,
    pub in_reprieve: bool,
    pub reprieve_timer: f64,
    /// Kills across the whole session.
    pub kills: u32,
}

impl WaveState {
    /// Wave 1, using the unscaled opening size and interval. The first
    /// enemy spawns on the first tick.
    pub fn opening(tuning: &WaveTuning) -> Self {
        Self {
            number: 1,
            enemies_total: tuning.opening_total(),
            spawn_interval: tuning.spawn_interval,
            ..Default::default()
        }
    }

    pub fn view(&self) -> WaveView {
        WaveView {
            number: self.number,
            enemies_spawned: self.enemies_spawned,
            enemies_total: self.enemies_total,
            enemies_remaining: self.enemies_remaining,
            in_reprieve: self.in_reprieve,
            reprieve_timer: self.reprieve_timer,
            kills: self.kills,
        }
    }
}
