//! Host for the duet boss encounters.
//!
//! Wires the simulation to a fixed-rate game loop thread and exposes
//! a small control surface for whatever drives it (the CLI, a scripted
//! autopilot, or a future frontend).

pub mod autopilot;
pub mod control;
pub mod game_loop;
pub mod state;

pub use duet_core as core;
