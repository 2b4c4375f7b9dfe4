//! Runtime tuning, loadable from JSON.
//!
//! Every field defaults to the value in [`crate::constants`], so a document
//! only needs to name what it overrides.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::*;
use crate::enums::BossKind;

/// Errors raised while loading tuning.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field} must be positive")]
    NonPositive { field: &'static str },
    #[error("{field} is out of range: {value}")]
    OutOfRange { field: &'static str, value: f32 },
}

/// Numeric parameters for players and bosses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub player_max_health: f32,
    pub hurt_cooldown: f32,
    pub player_move_speed: f32,
    pub player_direction_time: f32,
    pub max_resource: f32,
    pub resource_regen: f32,
    pub light_cost: f32,
    pub heavy_cost: f32,
    pub light_fire_rate: f32,
    pub heavy_fire_rate: f32,
    pub exchange_speed: f32,
    pub exchange_rate: f32,
    pub byle_slime_max_health: f32,
    pub giant_crab_max_health: f32,
    pub possessed_king_max_health: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_max_health: PLAYER_MAX_HEALTH,
            hurt_cooldown: PLAYER_HURT_COOLDOWN,
            player_move_speed: PLAYER_MOVE_SPEED,
            player_direction_time: PLAYER_DIRECTION_TIME,
            max_resource: PLAYER_MAX_RESOURCE,
            resource_regen: RESOURCE_REGEN_PER_SEC,
            light_cost: LIGHT_ATTACK_COST,
            heavy_cost: HEAVY_ATTACK_COST,
            light_fire_rate: LIGHT_FIRE_RATE,
            heavy_fire_rate: HEAVY_FIRE_RATE,
            exchange_speed: EXCHANGE_SPEED,
            exchange_rate: EXCHANGE_RATE,
            byle_slime_max_health: BYLE_SLIME_MAX_HEALTH,
            giant_crab_max_health: GIANT_CRAB_MAX_HEALTH,
            possessed_king_max_health: POSSESSED_KING_MAX_HEALTH,
        }
    }
}

impl Tuning {
    /// Parse a JSON document and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values that would start an encounter with a dead entity
    /// or make the economy meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("player_max_health", self.player_max_health),
            ("player_move_speed", self.player_move_speed),
            ("player_direction_time", self.player_direction_time),
            ("max_resource", self.max_resource),
            ("light_fire_rate", self.light_fire_rate),
            ("heavy_fire_rate", self.heavy_fire_rate),
            ("byle_slime_max_health", self.byle_slime_max_health),
            ("giant_crab_max_health", self.giant_crab_max_health),
            ("possessed_king_max_health", self.possessed_king_max_health),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::NonPositive { field });
            }
        }

        let non_negative = [
            ("hurt_cooldown", self.hurt_cooldown),
            ("resource_regen", self.resource_regen),
            ("light_cost", self.light_cost),
            ("heavy_cost", self.heavy_cost),
            ("exchange_speed", self.exchange_speed),
            ("exchange_rate", self.exchange_rate),
        ];
        for (field, value) in non_negative {
            if !(value >= 0.0) {
                return Err(ConfigError::OutOfRange { field, value });
            }
        }

        if self.light_cost > self.max_resource {
            return Err(ConfigError::OutOfRange {
                field: "light_cost",
                value: self.light_cost,
            });
        }
        if self.heavy_cost > self.max_resource {
            return Err(ConfigError::OutOfRange {
                field: "heavy_cost",
                value: self.heavy_cost,
            });
        }

        Ok(())
    }

    pub fn boss_max_health(&self, kind: BossKind) -> f32 {
        match kind {
            BossKind::ByleSlime => self.byle_slime_max_health,
            BossKind::GiantCrab => self.giant_crab_max_health,
            BossKind::PossessedKing => self.possessed_king_max_health,
        }
    }

    /// Override one boss's max health.
    pub fn with_boss_max_health(mut self, kind: BossKind, max_health: f32) -> Self {
        match kind {
            BossKind::ByleSlime => self.byle_slime_max_health = max_health,
            BossKind::GiantCrab => self.giant_crab_max_health = max_health,
            BossKind::PossessedKing => self.possessed_king_max_health = max_health,
        }
        self
    }
}
