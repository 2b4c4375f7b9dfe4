//! Core types and definitions for the DUET boss-battle simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! enums, value types, cue events, inputs, snapshot views, tuning and
//! the combat capability shared by players and bosses.
//! It has no dependency on the ECS or any runtime framework.

pub mod combat;
pub mod commands;
pub mod components;
pub mod config;
pub mod constants;
pub mod enums;
pub mod events;
pub mod state;
pub mod types;
