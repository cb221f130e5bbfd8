//! Rigid bodies and their collision shapes.

use glam::{DQuat, DVec3};
use serde::{Deserialize, Serialize};

/// Handle to a body stored in a [`crate::PhysicsWorld`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BodyHandle(pub u32);

/// Collision shape, always axis-aligned with world up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Sphere { radius: f64 },
    /// Upright column with rounded ends, `half_height` from centre to top.
    Column { radius: f64, half_height: f64 },
}

impl Shape {
    pub fn radius(&self) -> f64 {
        match *self {
            Shape::Sphere { radius } | Shape::Column { radius, .. } => radius,
        }
    }

    /// Half-length of the vertical core segment swept by `radius`.
    pub fn half_segment(&self) -> f64 {
        match *self {
            Shape::Sphere { .. } => 0.0,
            Shape::Column {
                radius,
                half_height,
            } => (half_height - radius).max(0.0),
        }
    }

    /// Distance from the centre down to the lowest point.
    pub fn bottom_extent(&self) -> f64 {
        self.half_segment() + self.radius()
    }
}

/// A single body. Zero mass means static: never integrated, infinite inertia.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RigidBody {
    pub position: DVec3,
    pub velocity: DVec3,
    pub angular_velocity: DVec3,
    pub orientation: DQuat,
    /// Fraction of linear velocity lost per second.
    pub linear_damping: f64,
    /// Fraction of angular velocity lost per second.
    pub angular_damping: f64,
    pub shape: Shape,
    /// Collision group bits this body belongs to.
    pub group: u32,
    /// Groups this body is willing to collide with.
    pub mask: u32,
    mass: f64,
    inv_mass: f64,
    force: DVec3,
}

impl RigidBody {
    /// A body that moves under gravity, forces and impulses.
    pub fn dynamic(mass: f64, shape: Shape) -> Self {
        let inv_mass = if mass > 0.0 { 1.0 / mass } else { 0.0 };
        Self {
            position: DVec3::ZERO,
            velocity: DVec3::ZERO,
            angular_velocity: DVec3::ZERO,
            orientation: DQuat::IDENTITY,
            linear_damping: 0.01,
            angular_damping: 0.01,
            shape,
            group: 1,
            mask: u32::MAX,
            mass: mass.max(0.0),
            inv_mass,
            force: DVec3::ZERO,
        }
    }

    /// An immovable body.
    pub fn fixed(shape: Shape) -> Self {
        Self::dynamic(0.0, shape)
    }

    pub fn with_position(mut self, position: DVec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_velocity(mut self, velocity: DVec3) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_damping(mut self, linear: f64, angular: f64) -> Self {
        self.linear_damping = linear;
        self.angular_damping = angular;
        self
    }

    pub fn with_collision(mut self, group: u32, mask: u32) -> Self {
        self.group = group;
        self.mask = mask;
        self
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn inv_mass(&self) -> f64 {
        self.inv_mass
    }

    pub fn is_static(&self) -> bool {
        self.inv_mass == 0.0
    }

    /// Force accumulated since the last step.
    pub fn force(&self) -> DVec3 {
        self.force
    }

    /// Add a force for the next step. Cleared after integration.
    pub fn apply_force(&mut self, force: DVec3) {
        if !self.is_static() {
            self.force += force;
        }
    }

    /// Instantaneous change of momentum.
    pub fn apply_impulse(&mut self, impulse: DVec3) {
        self.velocity += impulse * self.inv_mass;
    }

    /// Face the given yaw about world up (0 = +Z).
    pub fn set_yaw(&mut self, yaw: f64) {
        self.orientation = DQuat::from_rotation_y(yaw);
    }

    /// Whether the two filters accept each other.
    pub fn accepts(&self, group: u32, mask: u32) -> bool {
        self.group & mask != 0 && group & self.mask != 0
    }

    pub(crate) fn clear_force(&mut self) {
        self.force = DVec3::ZERO;
    }

    /// Advance position, velocity and orientation by `dt` under `gravity`.
    pub(crate) fn integrate(&mut self, gravity: DVec3, dt: f64) {
        if self.is_static() {
            self.clear_force();
            return;
        }

        self.velocity *= (1.0 - self.linear_damping).max(0.0).powf(dt);
        self.angular_velocity *= (1.0 - self.angular_damping).max(0.0).powf(dt);

        self.velocity += (gravity + self.force * self.inv_mass) * dt;
        self.position += self.velocity * dt;

        let w = self.angular_velocity;
        if w.length_squared() > 0.0 {
            let spin = DQuat::from_xyzw(w.x, w.y, w.z, 0.0) * self.orientation;
            self.orientation = (self.orientation + spin * (0.5 * dt)).normalize();
        }

        self.clear_force();
    }
}
