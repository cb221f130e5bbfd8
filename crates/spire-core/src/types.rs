//! Fundamental identity, time and geometry helpers.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Stable identity of a simulation entity (enemy, projectile or minion).
///
/// Ids are never reused within a session. Components refer to each other by
/// id rather than by ECS handle so that a stale reference is detectable.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct EntityId(pub u32);

/// Monotonic id source owned by the engine.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Hand out the next id.
    pub fn next(&mut self) -> EntityId {
        let id = EntityId(self.next.max(1));
        self.next = id.0 + 1;
        id
    }
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl SimTime {
    /// Seconds per tick at the default tick rate.
    pub fn dt(&self) -> f64 {
        crate::constants::DT
    }

    /// Advance by one tick.
    pub fn advance(&mut self) {
        self.tick += 1;
        self.elapsed_secs += self.dt();
    }
}

/// Horizontal-plane helpers for y-up vectors.
pub trait Planar {
    /// The vector with its vertical component zeroed.
    fn flat(self) -> DVec3;
    /// Length in the xz plane.
    fn horizontal_length(self) -> f64;
    /// Distance to `other` in the xz plane.
    fn horizontal_distance(self, other: DVec3) -> f64;
    /// Squared distance to `other` in the xz plane.
    fn horizontal_distance_squared(self, other: DVec3) -> f64;
    /// Yaw (radians) that faces along this vector, 0 = +Z.
    fn yaw(self) -> f64;
}

impl Planar for DVec3 {
    fn flat(self) -> DVec3 {
        DVec3::new(self.x, 0.0, self.z)
    }

    fn horizontal_length(self) -> f64 {
        (self.x * self.x + self.z * self.z).sqrt()
    }

    fn horizontal_distance(self, other: DVec3) -> f64 {
        self.horizontal_distance_squared(other).sqrt()
    }

    fn horizontal_distance_squared(self, other: DVec3) -> f64 {
        let dx = other.x - self.x;
        let dz = other.z - self.z;
        dx * dx + dz * dz
    }

    fn yaw(self) -> f64 {
        self.x.atan2(self.z)
    }
}
