//! ECS systems that operate on the encounter world each tick.
//!
//! Systems are free functions that take `&mut World` (or `&World` for read-only).
//! Session-level state is passed in by the engine; per-entity state lives in components.

pub mod bosses;
pub mod collision;
pub mod game_over;
pub mod intro;
pub mod player;
pub mod projectiles;
pub mod snapshot;
