//! Core types and definitions for the SPIRE tower-defense simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! tuning tables, components, commands, state snapshots, events, and constants.
//! It has no dependency on the ECS, the physics world, or any runtime framework.

pub mod commands;
pub mod components;
pub mod constants;
pub mod enums;
pub mod events;
pub mod state;
pub mod tuning;
pub mod types;
