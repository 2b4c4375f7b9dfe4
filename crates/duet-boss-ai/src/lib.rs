//! Boss brains for DUET.
//!
//! Per-boss phase tables, the phase scheduler, desperation curves,
//! the focus-fire targeting rule and scripted intros. No ECS dependency;
//! everything here operates on plain data and a caller-supplied RNG.

pub mod desperation;
pub mod fsm;
pub mod intro;
pub mod profiles;
pub mod selection;
pub mod targeting;

pub use duet_core as core;

#[cfg(test)]
mod tests;
