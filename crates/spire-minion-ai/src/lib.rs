//! Minion AI for SPIRE.
//!
//! Implements the melee ally state machine and its behaviour profile.

pub mod fsm;
pub mod profiles;

pub use spire_core as core;
