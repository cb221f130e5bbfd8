//! Tunable game parameters, grouped per attack and per archetype.
//!
//! `Tuning::default()` reproduces the shipped balance from [`crate::constants`].
//! A JSON override can be loaded with [`Tuning::from_json`]; every table is
//! checked by [`Tuning::validate`] before an engine accepts it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::*;
use crate::enums::AttackKind;

/// Reasons a tuning table is rejected.
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: String, value: f64 },
    #[error("{field} must not be negative, got {value}")]
    Negative { field: String, value: f64 },
    #[error("splash damage multiplier must be in (0, 1], got {0}")]
    SplashMultOutOfRange(f64),
    #[error("frost slow factor must be in (0, 1], got {0}")]
    SlowFactorOutOfRange(f64),
    #[error("{field}: minimum {min} exceeds maximum {max}")]
    InvertedRange {
        field: String,
        min: f64,
        max: f64,
    },
    #[error("invalid tuning json: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TowerTuning {
    pub max_hp: f64,
    pub muzzle_height: f64,
    pub radius: f64,
    pub half_height: f64,
}

/// An arcing, non-homing projectile (fireball, arrow).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BallisticTuning {
    pub fire_rate: f64,
    /// Initial fire timer, staggers the first shot.
    pub fire_offset: f64,
    pub damage: f64,
    pub speed: f64,
    pub knockback: f64,
    pub splash_radius: f64,
    pub splash_force: f64,
    pub splash_damage_mult: f64,
    pub radius: f64,
    pub mass: f64,
    pub angle_min: f64,
    pub angle_max: f64,
    pub max_age: f64,
    pub hit_radius: f64,
    pub linear_damping: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomingTuning {
    pub fire_rate: f64,
    pub fire_offset: f64,
    pub damage: f64,
    pub max_speed: f64,
    pub steer_force: f64,
    pub knockback: f64,
    pub radius: f64,
    pub mass: f64,
    pub max_age: f64,
    pub hit_radius: f64,
    pub linear_damping: f64,
    pub launch_horizontal: f64,
    pub launch_up: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LightningTuning {
    pub fire_rate: f64,
    pub fire_offset: f64,
    pub damage: f64,
    pub chains: usize,
    pub chain_range: f64,
    pub stun: f64,
    pub arc_lifetime: f64,
    pub zap_up: f64,
    pub zap_side: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrostTuning {
    pub fire_rate: f64,
    pub fire_offset: f64,
    pub damage: f64,
    pub radius: f64,
    pub slow_factor: f64,
    pub slow_duration: f64,
    pub pulse_lifetime: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetingTuning {
    pub cluster_radius: f64,
    pub neighbor_weight: f64,
    pub distance_weight: f64,
    pub cluster_min_enemies: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyTuning {
    pub base_hp: f64,
    pub hp_scale_per_wave: f64,
    pub speed_min: f64,
    pub speed_max: f64,
    pub damage_per_sec: f64,
    pub spawn_radius: f64,
    pub spawn_height: f64,
    pub mass: f64,
    pub radius: f64,
    pub half_height: f64,
    pub tower_range: f64,
    pub force_mult: f64,
    pub stun_damping: f64,
    pub tower_pushback: f64,
    pub linear_damping: f64,
    pub angular_damping: f64,
    pub leg_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveTuning {
    pub base_enemies: f64,
    pub linear_scale: f64,
    pub quadratic_scale: f64,
    pub spawn_interval: f64,
    pub interval_decay: f64,
    pub interval_floor: f64,
    pub spawn_ramp: f64,
    pub reprieve_secs: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeathTuning {
    pub launch_up_min: f64,
    pub launch_up_max: f64,
    pub launch_side_mult: f64,
    pub spin: f64,
    pub linear_damping: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinionTuning {
    pub count: usize,
    pub max_count: usize,
    pub damage: f64,
    pub attack_range: f64,
    pub windup_secs: f64,
    pub bonk_secs: f64,
    pub cooldown_secs: f64,
    pub speed: f64,
    pub mass: f64,
    pub radius: f64,
    pub half_height: f64,
    pub force_mult: f64,
    pub recovery_secs: f64,
    pub fling_threshold: f64,
    pub push_force: f64,
    pub push_lift: f64,
    pub spawn_radius: f64,
    pub spawn_height: f64,
    pub recovery_damping: f64,
    pub leg_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicsTuning {
    pub gravity: f64,
    pub ground_detonation_height: f64,
}

/// The full balance table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub tower: TowerTuning,
    pub fireball: BallisticTuning,
    pub arrow: BallisticTuning,
    pub arcane: HomingTuning,
    pub lightning: LightningTuning,
    pub frost: FrostTuning,
    pub targeting: TargetingTuning,
    pub enemy: EnemyTuning,
    pub wave: WaveTuning,
    pub death: DeathTuning,
    pub minion: MinionTuning,
    pub physics: PhysicsTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            tower: TowerTuning::default(),
            fireball: BallisticTuning::fireball(),
            arrow: BallisticTuning::arrow(),
            arcane: HomingTuning::default(),
            lightning: LightningTuning::default(),
            frost: FrostTuning::default(),
            targeting: TargetingTuning::default(),
            enemy: EnemyTuning::default(),
            wave: WaveTuning::default(),
            death: DeathTuning::default(),
            minion: MinionTuning::default(),
            physics: PhysicsTuning::default(),
        }
    }
}

impl Default for TowerTuning {
    fn default() -> Self {
        Self {
            max_hp: TOWER_MAX_HP,
            muzzle_height: TOWER_MUZZLE_HEIGHT,
            radius: TOWER_RADIUS,
            half_height: TOWER_HALF_HEIGHT,
        }
    }
}

impl BallisticTuning {
    pub fn fireball() -> Self {
        Self {
            fire_rate: FIREBALL_FIRE_RATE,
            fire_offset: FIREBALL_FIRE_OFFSET,
            damage: FIREBALL_DAMAGE,
            speed: FIREBALL_SPEED,
            knockback: FIREBALL_KNOCKBACK,
            splash_radius: FIREBALL_SPLASH_RADIUS,
            splash_force: FIREBALL_SPLASH_FORCE,
            splash_damage_mult: FIREBALL_SPLASH_DAMAGE_MULT,
            radius: FIREBALL_RADIUS,
            mass: FIREBALL_MASS,
            angle_min: FIREBALL_ANGLE_MIN,
            angle_max: FIREBALL_ANGLE_MAX,
            max_age: FIREBALL_MAX_AGE,
            hit_radius: FIREBALL_HIT_RADIUS,
            linear_damping: FIREBALL_DAMPING,
        }
    }

    pub fn arrow() -> Self {
        Self {
            fire_rate: ARROW_FIRE_RATE,
            fire_offset: ARROW_FIRE_OFFSET,
            damage: ARROW_DAMAGE,
            speed: ARROW_SPEED,
            knockback: ARROW_KNOCKBACK,
            splash_radius: 0.0,
            splash_force: 0.0,
            // Unused without a splash radius, kept valid.
            splash_damage_mult: FIREBALL_SPLASH_DAMAGE_MULT,
            radius: ARROW_RADIUS,
            mass: ARROW_MASS,
            angle_min: ARROW_ANGLE_MIN,
            angle_max: ARROW_ANGLE_MAX,
            max_age: ARROW_MAX_AGE,
            hit_radius: ARROW_HIT_RADIUS,
            linear_damping: ARROW_DAMPING,
        }
    }
}

impl Default for HomingTuning {
    fn default() -> Self {
        Self {
            fire_rate: ARCANE_FIRE_RATE,
            fire_offset: ARCANE_FIRE_OFFSET,
            damage: ARCANE_DAMAGE,
            max_speed: ARCANE_MAX_SPEED,
            steer_force: ARCANE_STEER_FORCE,
            knockback: ARCANE_KNOCKBACK,
            radius: ARCANE_RADIUS,
            mass: ARCANE_MASS,
            max_age: ARCANE_MAX_AGE,
            hit_radius: ARCANE_HIT_RADIUS,
            linear_damping: ARCANE_DAMPING,
            launch_horizontal: ARCANE_LAUNCH_HORIZONTAL,
            launch_up: ARCANE_LAUNCH_UP,
        }
    }
}

impl Default for LightningTuning {
    fn default() -> Self {
        Self {
            fire_rate: LIGHTNING_FIRE_RATE,
            fire_offset: LIGHTNING_FIRE_OFFSET,
            damage: LIGHTNING_DAMAGE,
            chains: LIGHTNING_CHAINS,
            chain_range: LIGHTNING_CHAIN_RANGE,
            stun: LIGHTNING_STUN,
            arc_lifetime: LIGHTNING_ARC_LIFETIME,
            zap_up: LIGHTNING_ZAP_UP,
            zap_side: LIGHTNING_ZAP_SIDE,
        }
    }
}

impl Default for FrostTuning {
    fn default() -> Self {
        Self {
            fire_rate: FROST_FIRE_RATE,
            fire_offset: FROST_FIRE_OFFSET,
            damage: FROST_DAMAGE,
            radius: FROST_RADIUS,
            slow_factor: FROST_SLOW_FACTOR,
            slow_duration: FROST_SLOW_DURATION,
            pulse_lifetime: FROST_PULSE_LIFETIME,
        }
    }
}

impl Default for TargetingTuning {
    fn default() -> Self {
        Self {
            cluster_radius: CLUSTER_RADIUS,
            neighbor_weight: CLUSTER_NEIGHBOR_WEIGHT,
            distance_weight: CLUSTER_DISTANCE_WEIGHT,
            cluster_min_enemies: CLUSTER_MIN_ENEMIES,
        }
    }
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            base_hp: ENEMY_BASE_HP,
            hp_scale_per_wave: ENEMY_HP_SCALE_PER_WAVE,
            speed_min: ENEMY_SPEED_MIN,
            speed_max: ENEMY_SPEED_MAX,
            damage_per_sec: ENEMY_DAMAGE,
            spawn_radius: ENEMY_SPAWN_RADIUS,
            spawn_height: ENEMY_SPAWN_HEIGHT,
            mass: ENEMY_MASS,
            radius: ENEMY_RADIUS,
            half_height: ENEMY_HALF_HEIGHT,
            tower_range: ENEMY_TOWER_RANGE,
            force_mult: ENEMY_FORCE_MULT,
            stun_damping: ENEMY_STUN_DAMPING,
            tower_pushback: ENEMY_TOWER_PUSHBACK,
            linear_damping: ENEMY_LINEAR_DAMPING,
            angular_damping: ENEMY_ANGULAR_DAMPING,
            leg_rate: ENEMY_LEG_RATE,
        }
    }
}

impl EnemyTuning {
    /// Hit points for an enemy spawned during wave `n`.
    pub fn hp_for_wave(&self, n: u32) -> f64 {
        self.base_hp * (1.0 + n.saturating_sub(1) as f64 * self.hp_scale_per_wave)
    }
}

impl Default for WaveTuning {
    fn default() -> Self {
        Self {
            base_enemies: WAVE_BASE_ENEMIES,
            linear_scale: WAVE_LINEAR_SCALE,
            quadratic_scale: WAVE_QUADRATIC_SCALE,
            spawn_interval: WAVE_SPAWN_INTERVAL,
            interval_decay: WAVE_INTERVAL_DECAY,
            interval_floor: WAVE_INTERVAL_FLOOR,
            spawn_ramp: WAVE_SPAWN_RAMP,
            reprieve_secs: WAVE_REPRIEVE_SECS,
        }
    }
}

impl WaveTuning {
    /// Enemies in wave `n` once the director has advanced to it.
    pub fn enemies_total(&self, n: u32) -> u32 {
        let n = n as f64;
        (self.base_enemies + n * self.linear_scale + n * n * self.quadratic_scale).floor() as u32
    }

    /// Enemies in the opening wave, before any scaling is applied.
    pub fn opening_total(&self) -> u32 {
        self.base_enemies.floor() as u32
    }

    /// Base spawn interval for wave `n`.
    pub fn spawn_interval(&self, n: u32) -> f64 {
        (self.spawn_interval - n as f64 * self.interval_decay).max(self.interval_floor)
    }

    /// Delay before the next spawn once `spawned` of `total` are out.
    pub fn next_spawn_delay(&self, interval: f64, spawned: u32, total: u32) -> f64 {
        let progress = if total == 0 {
            1.0
        } else {
            spawned as f64 / total as f64
        };
        interval * (1.0 - progress * self.spawn_ramp)
    }
}

impl Default for DeathTuning {
    fn default() -> Self {
        Self {
            launch_up_min: DEATH_LAUNCH_UP_MIN,
            launch_up_max: DEATH_LAUNCH_UP_MAX,
            launch_side_mult: DEATH_LAUNCH_SIDE_MULT,
            spin: DEATH_SPIN,
            linear_damping: DEATH_LINEAR_DAMPING,
        }
    }
}

impl Default for MinionTuning {
    fn default() -> Self {
        Self {
            count: MINION_COUNT,
            max_count: MINION_MAX_COUNT,
            damage: MINION_DAMAGE,
            attack_range: MINION_ATTACK_RANGE,
            windup_secs: MINION_WINDUP_SECS,
            bonk_secs: MINION_BONK_SECS,
            cooldown_secs: MINION_COOLDOWN_SECS,
            speed: MINION_SPEED,
            mass: MINION_MASS,
            radius: MINION_RADIUS,
            half_height: MINION_HALF_HEIGHT,
            force_mult: MINION_FORCE_MULT,
            recovery_secs: MINION_RECOVERY_SECS,
            fling_threshold: MINION_FLING_THRESHOLD,
            push_force: MINION_PUSH_FORCE,
            push_lift: MINION_PUSH_LIFT,
            spawn_radius: MINION_SPAWN_RADIUS,
            spawn_height: MINION_SPAWN_HEIGHT,
            recovery_damping: MINION_RECOVERY_DAMPING,
            leg_rate: MINION_LEG_RATE,
        }
    }
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            ground_detonation_height: GROUND_DETONATION_HEIGHT,
        }
    }
}

impl Tuning {
    /// Parse an override table. Missing sections fall back to defaults;
    /// a section that is present must be complete.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject tables that would stall or invert the simulation.
    pub fn validate(&self) -> Result<(), TuningError> {
        positive("tower.max_hp", self.tower.max_hp)?;

        for (name, ballistic) in [("fireball", &self.fireball), ("arrow", &self.arrow)] {
            positive(&format!("{name}.fire_rate"), ballistic.fire_rate)?;
            positive(&format!("{name}.speed"), ballistic.speed)?;
            positive(&format!("{name}.mass"), ballistic.mass)?;
            positive(&format!("{name}.max_age"), ballistic.max_age)?;
            positive(&format!("{name}.hit_radius"), ballistic.hit_radius)?;
            ordered(&format!("{name}.angle"), ballistic.angle_min, ballistic.angle_max)?;
            let mult = ballistic.splash_damage_mult;
            if !(mult > 0.0 && mult <= 1.0) {
                return Err(TuningError::SplashMultOutOfRange(mult));
            }
        }

        positive("arcane.fire_rate", self.arcane.fire_rate)?;
        positive("arcane.max_speed", self.arcane.max_speed)?;
        positive("arcane.mass", self.arcane.mass)?;
        positive("arcane.max_age", self.arcane.max_age)?;
        positive("arcane.hit_radius", self.arcane.hit_radius)?;

        positive("lightning.fire_rate", self.lightning.fire_rate)?;
        positive("lightning.chains", self.lightning.chains as f64)?;
        positive("lightning.arc_lifetime", self.lightning.arc_lifetime)?;
        non_negative("lightning.zap_side", self.lightning.zap_side)?;

        positive("frost.fire_rate", self.frost.fire_rate)?;
        positive("frost.radius", self.frost.radius)?;
        let slow = self.frost.slow_factor;
        if !(slow > 0.0 && slow <= 1.0) {
            return Err(TuningError::SlowFactorOutOfRange(slow));
        }

        positive("enemy.base_hp", self.enemy.base_hp)?;
        positive("enemy.speed_min", self.enemy.speed_min)?;
        positive("enemy.mass", self.enemy.mass)?;
        ordered("enemy.speed", self.enemy.speed_min, self.enemy.speed_max)?;
        non_negative("enemy.spawn_radius", self.enemy.spawn_radius)?;

        positive("wave.base_enemies", self.wave.base_enemies)?;
        positive("wave.spawn_interval", self.wave.spawn_interval)?;
        positive("wave.interval_floor", self.wave.interval_floor)?;

        ordered(
            "death.launch_up",
            self.death.launch_up_min,
            self.death.launch_up_max,
        )?;

        positive("minion.mass", self.minion.mass)?;
        positive("minion.speed", self.minion.speed)?;
        positive("minion.attack_range", self.minion.attack_range)?;
        positive("minion.fling_threshold", self.minion.fling_threshold)?;
        non_negative("minion.spawn_radius", self.minion.spawn_radius)?;

        positive("physics.gravity", self.physics.gravity)?;
        Ok(())
    }

    /// Fire rate of a timed attack. Minions have none.
    pub fn fire_rate(&self, kind: AttackKind) -> Option<f64> {
        match kind {
            AttackKind::Fireball => Some(self.fireball.fire_rate),
            AttackKind::Arrow => Some(self.arrow.fire_rate),
            AttackKind::Arcane => Some(self.arcane.fire_rate),
            AttackKind::Lightning => Some(self.lightning.fire_rate),
            AttackKind::Frost => Some(self.frost.fire_rate),
            AttackKind::Minions => None,
        }
    }

    /// Initial fire timer of a timed attack.
    pub fn fire_offset(&self, kind: AttackKind) -> f64 {
        match kind {
            AttackKind::Fireball => self.fireball.fire_offset,
            AttackKind::Arrow => self.arrow.fire_offset,
            AttackKind::Arcane => self.arcane.fire_offset,
            AttackKind::Lightning => self.lightning.fire_offset,
            AttackKind::Frost => self.frost.fire_offset,
            AttackKind::Minions => 0.0,
        }
    }
}

fn positive(field: &str, value: f64) -> Result<(), TuningError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(TuningError::NonPositive {
            field: field.to_string(),
            value,
        })
    }
}

fn non_negative(field: &str, value: f64) -> Result<(), TuningError> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(TuningError::Negative {
            field: field.to_string(),
            value,
        })
    }
}

fn ordered(field: &str, min: f64, max: f64) -> Result<(), TuningError> {
    if min <= max {
        Ok(())
    } else {
        Err(TuningError::InvertedRange {
            field: field.to_string(),
            min,
            max,
        })
    }
}
