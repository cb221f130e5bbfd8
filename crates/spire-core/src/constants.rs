//! Simulation constants and default tuning values.
//!
//! The `Tuning` defaults in [`crate::tuning`] are built from these.

use std::f64::consts::PI;

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

/// Longest wall-clock frame fed to the fixed-step accumulator (seconds).
pub const MAX_FRAME_SECS: f64 = 0.1;

// --- Physics ---

/// Gravity magnitude (units/s², pointing down -Y).
pub const GRAVITY: f64 = 20.0;

/// Height below which a descending non-homing projectile detonates.
pub const GROUND_DETONATION_HEIGHT: f64 = 0.3;

/// Fallback for a zero speed when normalising a projectile's travel direction.
pub const SPEED_FALLBACK: f64 = 1.0;

/// Fallback for a zero distance in splash and push directions.
pub const DISTANCE_FALLBACK: f64 = 0.1;

/// Steering and facing is skipped below this distance.
pub const MIN_STEER_DISTANCE: f64 = 0.1;

// --- Collision groups ---

pub const GROUP_GROUND: u32 = 1;
pub const GROUP_TOWER: u32 = 2;
pub const GROUP_ENEMY: u32 = 4;
pub const GROUP_PROJECTILE: u32 = 8;
pub const GROUP_MINION: u32 = 16;

// --- Tower ---

/// Tower hit points at the start of a session.
pub const TOWER_MAX_HP: f64 = 10.0;

/// Height of the muzzle all projectiles and arcs originate from.
pub const TOWER_MUZZLE_HEIGHT: f64 = 6.5;

/// Collision radius of the tower column.
pub const TOWER_RADIUS: f64 = 1.5;

/// Half the height of the tower column (the column is centred at this height).
pub const TOWER_HALF_HEIGHT: f64 = 3.0;

// --- Fireball ---

pub const FIREBALL_FIRE_RATE: f64 = 1.0;
pub const FIREBALL_DAMAGE: f64 = 2.5;
pub const FIREBALL_SPEED: f64 = 20.0;
pub const FIREBALL_KNOCKBACK: f64 = 22.0;
pub const FIREBALL_SPLASH_RADIUS: f64 = 5.0;
pub const FIREBALL_SPLASH_FORCE: f64 = 14.0;
/// Splash damage = damage * this * falloff.
pub const FIREBALL_SPLASH_DAMAGE_MULT: f64 = 0.5;
pub const FIREBALL_RADIUS: f64 = 0.35;
pub const FIREBALL_MASS: f64 = 2.0;
pub const FIREBALL_ANGLE_MIN: f64 = PI / 5.0;
pub const FIREBALL_ANGLE_MAX: f64 = PI / 3.0;
pub const FIREBALL_MAX_AGE: f64 = 6.0;
pub const FIREBALL_HIT_RADIUS: f64 = 1.0;
pub const FIREBALL_DAMPING: f64 = 0.01;

// --- Arrow ---

pub const ARROW_FIRE_RATE: f64 = 2.5;
pub const ARROW_DAMAGE: f64 = 1.0;
pub const ARROW_SPEED: f64 = 45.0;
pub const ARROW_KNOCKBACK: f64 = 8.0;
pub const ARROW_RADIUS: f64 = 0.1;
pub const ARROW_MASS: f64 = 0.3;
pub const ARROW_ANGLE_MIN: f64 = PI / 12.0;
pub const ARROW_ANGLE_MAX: f64 = PI / 5.0;
pub const ARROW_MAX_AGE: f64 = 4.0;
pub const ARROW_HIT_RADIUS: f64 = 0.7;
pub const ARROW_DAMPING: f64 = 0.005;

/// Horizontal distance at which the launch angle reaches its maximum.
pub const LAUNCH_ANGLE_FULL_RANGE: f64 = 50.0;

/// Lead prediction refinement passes.
pub const LEAD_ITERATIONS: usize = 3;

/// Height above the target's body centre that ballistic shots aim for.
pub const AIM_HEIGHT_OFFSET: f64 = 0.5;

// --- Arcane bolt ---

pub const ARCANE_FIRE_RATE: f64 = 0.8;
pub const ARCANE_DAMAGE: f64 = 1.8;
/// Homing speed cap.
pub const ARCANE_MAX_SPEED: f64 = 12.0;
pub const ARCANE_STEER_FORCE: f64 = 280.0;
pub const ARCANE_KNOCKBACK: f64 = 6.0;
pub const ARCANE_RADIUS: f64 = 0.2;
pub const ARCANE_MASS: f64 = 0.5;
pub const ARCANE_MAX_AGE: f64 = 8.0;
pub const ARCANE_HIT_RADIUS: f64 = 1.0;
pub const ARCANE_DAMPING: f64 = 0.05;
/// Fraction of the speed cap used for the initial horizontal launch.
pub const ARCANE_LAUNCH_HORIZONTAL: f64 = 0.4;
/// Fraction of the speed cap used for the initial upward launch.
pub const ARCANE_LAUNCH_UP: f64 = 0.6;

// --- Lightning ---

pub const LIGHTNING_FIRE_RATE: f64 = 0.6;
pub const LIGHTNING_DAMAGE: f64 = 0.8;
pub const LIGHTNING_CHAINS: usize = 3;
pub const LIGHTNING_CHAIN_RANGE: f64 = 8.0;
pub const LIGHTNING_STUN: f64 = 0.4;
pub const LIGHTNING_ARC_LIFETIME: f64 = 0.25;
/// Upward velocity given to an enemy killed by lightning.
pub const LIGHTNING_ZAP_UP: f64 = 6.0;
/// Half-range of the random sideways zap velocity.
pub const LIGHTNING_ZAP_SIDE: f64 = 2.0;

// --- Frost ---

pub const FROST_FIRE_RATE: f64 = 0.25;
pub const FROST_DAMAGE: f64 = 0.5;
pub const FROST_RADIUS: f64 = 12.0;
pub const FROST_SLOW_FACTOR: f64 = 0.5;
pub const FROST_SLOW_DURATION: f64 = 2.0;
pub const FROST_PULSE_LIFETIME: f64 = 0.5;

// --- Fire timer offsets (staggers the first shots) ---

pub const FIREBALL_FIRE_OFFSET: f64 = 0.0;
pub const ARROW_FIRE_OFFSET: f64 = 0.3;
pub const ARCANE_FIRE_OFFSET: f64 = 0.6;
pub const LIGHTNING_FIRE_OFFSET: f64 = 0.9;
pub const FROST_FIRE_OFFSET: f64 = 1.2;

// --- Fireball targeting ---

/// Neighbour radius used by the cluster score.
pub const CLUSTER_RADIUS: f64 = 5.0;
pub const CLUSTER_NEIGHBOR_WEIGHT: f64 = 3.0;
pub const CLUSTER_DISTANCE_WEIGHT: f64 = 0.1;
/// At or below this many living enemies the cluster heuristic falls back to nearest.
pub const CLUSTER_MIN_ENEMIES: usize = 2;

// --- Enemies ---

pub const ENEMY_BASE_HP: f64 = 3.0;
pub const ENEMY_HP_SCALE_PER_WAVE: f64 = 0.15;
pub const ENEMY_SPEED_MIN: f64 = 3.0;
pub const ENEMY_SPEED_MAX: f64 = 4.5;
/// Damage per second dealt to the tower while in melee range.
pub const ENEMY_DAMAGE: f64 = 1.0;
pub const ENEMY_SPAWN_RADIUS: f64 = 45.0;
pub const ENEMY_SPAWN_HEIGHT: f64 = 1.2;
pub const ENEMY_MASS: f64 = 5.0;
pub const ENEMY_RADIUS: f64 = 0.4;
pub const ENEMY_HALF_HEIGHT: f64 = 0.6;
pub const ENEMY_TOWER_RANGE: f64 = 2.5;
pub const ENEMY_FORCE_MULT: f64 = 3.0;
/// Horizontal velocity multiplier per tick while stunned.
pub const ENEMY_STUN_DAMPING: f64 = 0.92;
/// Outward velocity per unit of offset when pushed off the tower.
pub const ENEMY_TOWER_PUSHBACK: f64 = 0.5;
pub const ENEMY_LINEAR_DAMPING: f64 = 0.4;
pub const ENEMY_ANGULAR_DAMPING: f64 = 0.8;
pub const ENEMY_LEG_RATE: f64 = 2.5;

// --- Waves ---

pub const WAVE_BASE_ENEMIES: f64 = 5.0;
pub const WAVE_LINEAR_SCALE: f64 = 3.0;
pub const WAVE_QUADRATIC_SCALE: f64 = 0.5;
pub const WAVE_SPAWN_INTERVAL: f64 = 1.5;
pub const WAVE_INTERVAL_DECAY: f64 = 0.08;
pub const WAVE_INTERVAL_FLOOR: f64 = 0.3;
/// Spawn interval shrinks by up to this fraction as the wave progresses.
pub const WAVE_SPAWN_RAMP: f64 = 0.6;
pub const WAVE_REPRIEVE_SECS: f64 = 3.0;

// --- Death effects ---

pub const DEATH_LAUNCH_UP_MIN: f64 = 15.0;
pub const DEATH_LAUNCH_UP_MAX: f64 = 25.0;
pub const DEATH_LAUNCH_SIDE_MULT: f64 = 2.0;
/// Full range of the random spin on each axis.
pub const DEATH_SPIN: f64 = 20.0;
pub const DEATH_LINEAR_DAMPING: f64 = 0.01;

// --- Minions ---

pub const MINION_COUNT: usize = 1;
pub const MINION_MAX_COUNT: usize = 6;
pub const MINION_DAMAGE: f64 = 1.5;
pub const MINION_ATTACK_RANGE: f64 = 1.8;
pub const MINION_WINDUP_SECS: f64 = 0.4;
pub const MINION_BONK_SECS: f64 = 0.1;
pub const MINION_COOLDOWN_SECS: f64 = 0.6;
pub const MINION_SPEED: f64 = 5.0;
pub const MINION_MASS: f64 = 1.5;
pub const MINION_RADIUS: f64 = 0.2;
pub const MINION_HALF_HEIGHT: f64 = 0.35;
pub const MINION_FORCE_MULT: f64 = 4.0;
pub const MINION_RECOVERY_SECS: f64 = 1.2;
/// Speed above which a minion counts as flung.
pub const MINION_FLING_THRESHOLD: f64 = 8.0;
pub const MINION_PUSH_FORCE: f64 = 3.0;
/// Upward component of the bonk push before normalisation.
pub const MINION_PUSH_LIFT: f64 = 0.2;
pub const MINION_SPAWN_RADIUS: f64 = 4.0;
pub const MINION_SPAWN_HEIGHT: f64 = 0.5;
/// Horizontal velocity multiplier per tick while recovering.
pub const MINION_RECOVERY_DAMPING: f64 = 0.95;
pub const MINION_LEG_RATE: f64 = 3.0;
