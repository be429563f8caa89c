//! Tuning configuration (arena, movement, combat, AI, spawn points).
//!
//! Все константы симуляции живут здесь, а не в системах.
//! Defaults = значения оригинальной игры; RON файл может переопределить любое поле.

use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result alias for config loading.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors raised while loading or validating a [`SimulationConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// RON syntax or schema error.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Values parsed but break a simulation invariant.
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Полный набор tuning параметров симуляции.
#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub arena: ArenaConfig,
    pub movement: MovementTuning,
    pub combat: CombatTuning,
    pub ai: AiTuning,
    pub spawn: SpawnConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Half the side length of the square arena (20x20 plane → 10)
    pub half_size: f32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self { half_size: 10.0 }
    }
}

/// Player movement constants (world units per tick).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementTuning {
    pub max_speed: f32,
    pub acceleration: f32,
    pub deceleration: f32,
    /// Maximum facing change per tick (radians)
    pub turn_rate_cap: f32,
    /// Fraction of the remaining angle covered per tick
    pub turn_gain: f32,
    /// Pointer closer than this does not turn the player
    pub pointer_deadzone: f32,
    pub dodge_speed: f32,
}

impl Default for MovementTuning {
    fn default() -> Self {
        Self {
            max_speed: 0.15,
            acceleration: 0.01,
            deceleration: 0.02,
            turn_rate_cap: 0.15,
            turn_gain: 0.3,
            pointer_deadzone: 0.5,
            dodge_speed: 0.4,
        }
    }
}

/// Combat state machine timings (ticks), hit radii and damage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatTuning {
    pub max_health: u32,

    pub basic_attack_duration: u32,
    pub heavy_attack_duration: u32,
    pub dodge_duration: u32,

    pub basic_attack_cooldown: u32,
    pub heavy_attack_cooldown: u32,
    pub dodge_cooldown: u32,

    pub basic_hit_radius: f32,
    pub heavy_hit_radius: f32,
    pub basic_damage: u32,
    pub heavy_damage: u32,
}

impl Default for CombatTuning {
    fn default() -> Self {
        Self {
            max_health: 100,
            basic_attack_duration: 20,
            heavy_attack_duration: 40,
            dodge_duration: 15,
            basic_attack_cooldown: 0,
            heavy_attack_cooldown: 0,
            dodge_cooldown: 45,
            basic_hit_radius: 2.5,
            heavy_hit_radius: 3.0,
            basic_damage: 10,
            heavy_damage: 25,
        }
    }
}

/// AI decision thresholds and steering speeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiTuning {
    /// Base steering speed (units per tick)
    pub speed: f32,
    /// Health fraction at or below which the AI turns defensive
    pub low_health_threshold: f32,
    /// Defensive: closer than this → retreat
    pub retreat_distance: f32,
    /// Defensive: closer than this (and not retreating) → circle
    pub circle_distance: f32,

    pub aggress_speed_factor: f32,
    pub retreat_speed_factor: f32,
    pub circle_speed_factor: f32,
    pub cautious_speed_factor: f32,

    /// Aggressive AI attacks unconditionally inside this distance
    pub aggress_attack_distance: f32,
    /// Defensive AI may attack inside this distance
    pub defensive_attack_distance: f32,
    /// Per-tick Bernoulli probability of a defensive attack
    pub defensive_attack_chance: f32,
    /// Aggressive AI stops chasing closer than this
    pub min_chase_distance: f32,
}

impl Default for AiTuning {
    fn default() -> Self {
        Self {
            speed: 0.08,
            low_health_threshold: 0.5,
            retreat_distance: 4.0,
            circle_distance: 7.0,
            aggress_speed_factor: 1.0,
            retreat_speed_factor: 0.7,
            circle_speed_factor: 0.8,
            cautious_speed_factor: 0.5,
            aggress_attack_distance: 2.0,
            defensive_attack_distance: 3.0,
            defensive_attack_chance: 0.02,
            min_chase_distance: 0.1,
        }
    }
}

/// Spawn points on the arena plane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    pub player: SpawnPoint,
    pub opponent: SpawnPoint,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            player: SpawnPoint { x: 0.0, z: 0.0 },
            opponent: SpawnPoint { x: 3.0, z: 3.0 },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnPoint {
    pub x: f32,
    pub z: f32,
}

impl SpawnPoint {
    pub fn to_plane(self) -> Vec2 {
        Vec2::new(self.x, self.z)
    }
}

impl SimulationConfig {
    /// Parse and validate a RON document.
    pub fn from_ron_str(source: &str) -> Result<Self> {
        let config: SimulationConfig = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a RON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_ron_str(&contents)
    }

    /// Check the invariants the simulation relies on.
    pub fn validate(&self) -> Result<()> {
        let half_size = self.arena.half_size;
        if !half_size.is_finite() || half_size <= 1.0 {
            return Err(ConfigError::Invalid(format!(
                "arena.half_size must be finite and > 1.0 (got {})",
                half_size
            )));
        }

        let combat = &self.combat;
        if combat.max_health == 0 {
            return Err(ConfigError::Invalid("combat.max_health must be > 0".into()));
        }
        for (name, ticks) in [
            ("basic_attack_duration", combat.basic_attack_duration),
            ("heavy_attack_duration", combat.heavy_attack_duration),
            ("dodge_duration", combat.dodge_duration),
        ] {
            if ticks == 0 {
                return Err(ConfigError::Invalid(format!("combat.{} must be > 0", name)));
            }
        }
        non_negative(
            "combat",
            &[
                ("basic_hit_radius", combat.basic_hit_radius),
                ("heavy_hit_radius", combat.heavy_hit_radius),
            ],
        )?;

        let chance = self.ai.defensive_attack_chance;
        if !(0.0..=1.0).contains(&chance) {
            return Err(ConfigError::Invalid(format!(
                "ai.defensive_attack_chance must be within [0, 1] (got {})",
                chance
            )));
        }
        let ai = &self.ai;
        non_negative(
            "ai",
            &[
                ("speed", ai.speed),
                ("low_health_threshold", ai.low_health_threshold),
                ("retreat_distance", ai.retreat_distance),
                ("circle_distance", ai.circle_distance),
                ("aggress_speed_factor", ai.aggress_speed_factor),
                ("retreat_speed_factor", ai.retreat_speed_factor),
                ("circle_speed_factor", ai.circle_speed_factor),
                ("cautious_speed_factor", ai.cautious_speed_factor),
                ("aggress_attack_distance", ai.aggress_attack_distance),
                ("defensive_attack_distance", ai.defensive_attack_distance),
                ("min_chase_distance", ai.min_chase_distance),
            ],
        )?;
        if ai.retreat_distance > ai.circle_distance {
            return Err(ConfigError::Invalid(
                "ai.retreat_distance must not exceed ai.circle_distance".into(),
            ));
        }

        let movement = &self.movement;
        non_negative(
            "movement",
            &[
                ("max_speed", movement.max_speed),
                ("acceleration", movement.acceleration),
                ("deceleration", movement.deceleration),
                ("turn_rate_cap", movement.turn_rate_cap),
                ("turn_gain", movement.turn_gain),
                ("pointer_deadzone", movement.pointer_deadzone),
                ("dodge_speed", movement.dodge_speed),
            ],
        )?;

        for (name, point) in [("player", self.spawn.player), ("opponent", self.spawn.opponent)] {
            if !point.to_plane().is_finite() {
                return Err(ConfigError::Invalid(format!("spawn.{} must be finite", name)));
            }
        }

        Ok(())
    }
}

/// Every value must be finite and >= 0 (NaN fails both).
fn non_negative(section: &str, values: &[(&str, f32)]) -> Result<()> {
    for (name, value) in values {
        if !value.is_finite() || *value < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "{}.{} must be finite and >= 0 (got {})",
                section, name, value
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.arena.half_size, 10.0);
        assert_eq!(config.combat.dodge_cooldown, 45);
        assert_eq!(config.ai.defensive_attack_chance, 0.02);
    }

    #[test]
    fn test_partial_ron_override() {
        let config = SimulationConfig::from_ron_str(
            "(arena: (half_size: 15.0), combat: (heavy_damage: 40))",
        )
        .unwrap();

        assert_eq!(config.arena.half_size, 15.0);
        assert_eq!(config.combat.heavy_damage, 40);
        // Остальное из defaults
        assert_eq!(config.combat.basic_damage, 10);
        assert_eq!(config.movement, MovementTuning::default());
    }

    #[test]
    fn test_invalid_half_size_rejected() {
        let err = SimulationConfig::from_ron_str("(arena: (half_size: 1.0))").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "got {:?}", err);
    }

    #[test]
    fn test_invalid_chance_rejected() {
        let err = SimulationConfig::from_ron_str("(ai: (defensive_attack_chance: 1.5))").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_non_finite_half_size_rejected() {
        for half_size in [f32::INFINITY, f32::NAN] {
            let mut config = SimulationConfig::default();
            config.arena.half_size = half_size;
            let err = config.validate().unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)), "got {:?}", err);
        }

        let err = SimulationConfig::from_ron_str("(arena: (half_size: inf))").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "got {:?}", err);
    }

    #[test]
    fn test_negative_radius_rejected() {
        let err = SimulationConfig::from_ron_str("(combat: (basic_hit_radius: -1.0))").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(ref msg) if msg.contains("basic_hit_radius")));
    }

    #[test]
    fn test_bad_ai_and_steering_values_rejected() {
        let mut config = SimulationConfig::default();
        config.ai.speed = f32::INFINITY;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.ai.min_chase_distance = -0.1;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.movement.turn_gain = f32::NAN;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.movement.pointer_deadzone = -0.5;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.spawn.opponent = SpawnPoint { x: f32::NEG_INFINITY, z: 0.0 };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_error() {
        let err = SimulationConfig::from_ron_str("(arena: (half_size: \"big\"))").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = SimulationConfig::load("/definitely/not/here.ron").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
