//! Rigid-body world for SPIRE.
//!
//! A deliberately small engine: spheres and upright columns, gravity,
//! per-body damping, group/mask collision filtering against each other and
//! a ground plane at y = 0. The simulation owns every body's lifetime and
//! talks to it through handles.

pub mod body;
pub mod contact;
pub mod world;

pub use body::{BodyHandle, RigidBody, Shape};
pub use world::PhysicsWorld;

#[cfg(test)]
mod tests;
