//! ECS components shared across crates.
//!
//! Plain data, no ECS dependency. Boss and projectile components live in
//! the sim crate because they carry entity handles and AI state.

use serde::{Deserialize, Serialize};

use crate::combat::{Combatant, Vitals};
use crate::config::Tuning;
use crate::enums::PlayerSlot;
use crate::types::Vec2;

/// World position of any entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position(pub Vec2);

/// Circular collision shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hitbox {
    pub radius: f32,
}

/// Marks an entity hidden for the game-over sequence.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Hidden;

/// A player character.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerState {
    pub slot: PlayerSlot,
    /// False in solo mode for the unused character.
    pub active: bool,
    pub vitals: Vitals,
    pub spawn: Vec2,

    // --- Movement ---
    pub velocity: Vec2,
    pub moving: bool,
    pub move_speed: f32,
    pub direction_time: f32,

    // --- Resource ---
    pub resource: f32,
    pub max_resource: f32,
    pub resource_regen: f32,
    pub exchanging: bool,
    /// Exchange key state on the previous tick, for press detection.
    pub exchange_was_held: bool,
    pub exchange_speed: f32,
    pub exchange_rate: f32,

    // --- Damage immunity ---
    /// Damage is dropped until this time.
    pub hurt_until: f32,
    pub hurt_cooldown: f32,

    // --- Attacks ---
    pub light_cost: f32,
    pub heavy_cost: f32,
    pub light_fire_rate: f32,
    pub heavy_fire_rate: f32,
    pub next_light_at: f32,
    pub next_heavy_at: f32,
    pub light_attacking: bool,
    pub heavy_attacking: bool,
}

impl PlayerState {
    pub fn new(slot: PlayerSlot, spawn: Vec2, active: bool, tuning: &Tuning) -> Self {
        Self {
            slot,
            active,
            vitals: Vitals::new(tuning.player_max_health),
            spawn,
            velocity: Vec2::ZERO,
            moving: false,
            move_speed: tuning.player_move_speed,
            direction_time: tuning.player_direction_time,
            resource: tuning.max_resource,
            max_resource: tuning.max_resource,
            resource_regen: tuning.resource_regen,
            exchanging: false,
            exchange_was_held: false,
            exchange_speed: tuning.exchange_speed,
            exchange_rate: tuning.exchange_rate,
            hurt_until: 0.0,
            hurt_cooldown: tuning.hurt_cooldown,
            light_cost: tuning.light_cost,
            heavy_cost: tuning.heavy_cost,
            light_fire_rate: tuning.light_fire_rate,
            heavy_fire_rate: tuning.heavy_fire_rate,
            next_light_at: 0.0,
            next_heavy_at: 0.0,
            light_attacking: false,
            heavy_attacking: false,
        }
    }

    pub fn resource_ratio(&self) -> f32 {
        if self.max_resource <= 0.0 {
            return 0.0;
        }
        self.resource / self.max_resource
    }

    /// Add resource from the partner, clamped to the maximum.
    pub fn give_resource(&mut self, amount: f32) {
        self.resource = (self.resource + amount).clamp(0.0, self.max_resource);
    }

    /// Within the post-hit immunity window.
    pub fn is_hurt(&self, now: f32) -> bool {
        now < self.hurt_until
    }
}

impl Combatant for PlayerState {
    fn vitals(&self) -> &Vitals {
        &self.vitals
    }

    fn vitals_mut(&mut self) -> &mut Vitals {
        &mut self.vitals
    }

    fn spawn_point(&self) -> Vec2 {
        self.spawn
    }

    fn accepts_damage(&self, now: f32) -> bool {
        self.active && !self.is_hurt(now)
    }

    fn on_damage(&mut self, now: f32) {
        self.hurt_until = now + self.hurt_cooldown;
    }

    fn on_death(&mut self) {
        self.velocity = Vec2::ZERO;
        self.moving = false;
        self.exchanging = false;
    }

    fn reset(&mut self) {
        self.vitals.restore();
        self.resource = self.max_resource;
        self.velocity = Vec2::ZERO;
        self.moving = false;
        self.exchanging = false;
        self.exchange_was_held = false;
        self.hurt_until = 0.0;
        self.next_light_at = 0.0;
        self.next_heavy_at = 0.0;
        self.light_attacking = false;
        self.heavy_attacking = false;
    }
}
