//! Encounter simulation for the duet boss fights.
//!
//! Owns the hecs ECS world, runs systems at a fixed tick rate,
//! and produces EncounterSnapshots for presentation layers.

pub mod boss;
pub mod engine;
pub mod pool;
pub mod projectile;
pub mod session;
pub mod systems;
pub mod world_setup;

pub use duet_core as core;
pub use engine::{EncounterEngine, SimConfig};

#[cfg(test)]
mod tests;
