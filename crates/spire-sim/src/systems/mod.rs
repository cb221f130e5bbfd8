//! ECS systems that operate on the simulation world each tick.
//!
//! Systems are free functions over `&mut World` and the physics world. They
//! do not own state; entity state lives in components and session state is
//! passed in from the engine.

pub mod cleanup;
pub mod damage;
pub mod enemy_ai;
pub mod fire_control;
pub mod frost;
pub mod lightning;
pub mod minions;
pub mod projectiles;
pub mod snapshot;
pub mod wave_director;
