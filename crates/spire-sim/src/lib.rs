//! Simulation engine for the spire defence game.
//!
//! Owns the hecs ECS world and the physics world, runs systems at a fixed
//! tick rate, and produces `GameStateSnapshot`s for the renderer.

pub mod ballistics;
pub mod clock;
pub mod engine;
pub mod locomotion;
pub mod systems;
pub mod targeting;
pub mod tower;
pub mod world_setup;

pub use engine::{SimConfig, SimError, SimulationEngine};
pub use spire_core as core;

#[cfg(test)]
mod tests;
