//! Simulation tuning and difficulty presets
//!
//! Every constant the simulation reads lives in [`SimConfig`]. Configs are
//! validated once when a round is built; the tick path assumes a valid config.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("`{field}` must be finite")]
    NonFinite { field: &'static str },
    #[error("`{field}` must be positive, got {value}")]
    NotPositive { field: &'static str, value: f32 },
    #[error("`{field}` must not be negative, got {value}")]
    Negative { field: &'static str, value: f32 },
    #[error("spawn bounds are inverted: left {left} >= right {right}")]
    InvertedSpawnBounds { left: f32, right: f32 },
    #[error("despawn depth {despawn} must lie beyond spawn depth {spawn}")]
    DespawnBeforeSpawn { spawn: f32, despawn: f32 },
    #[error("avatar start {start} lies outside the movement bounds")]
    StartOutOfBounds { start: Vec3 },
    #[error("variant distribution is empty")]
    EmptyVariantDistribution,
    #[error("max spawn interval reduction {max} must stay below the base spawn interval {base}")]
    ReductionTooLarge { max: f32, base: f32 },
}

/// Difficulty preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DifficultyPreset {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl DifficultyPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyPreset::Easy => "Easy",
            DifficultyPreset::Normal => "Normal",
            DifficultyPreset::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(DifficultyPreset::Easy),
            "normal" | "norm" => Some(DifficultyPreset::Normal),
            "hard" => Some(DifficultyPreset::Hard),
            _ => None,
        }
    }

    /// Base obstacle speed (units/s)
    pub fn obstacle_speed(&self) -> f32 {
        match self {
            DifficultyPreset::Easy => 4.0,
            DifficultyPreset::Normal => 5.0,
            DifficultyPreset::Hard => 6.5,
        }
    }

    /// Obstacle speed gained per second of round time
    pub fn obstacle_acceleration(&self) -> f32 {
        match self {
            DifficultyPreset::Easy => 0.05,
            DifficultyPreset::Normal => 0.1,
            DifficultyPreset::Hard => 0.15,
        }
    }

    /// Seconds between spawns before any ramp
    pub fn spawn_interval(&self) -> f32 {
        match self {
            DifficultyPreset::Easy => 1.25,
            DifficultyPreset::Normal => 1.0,
            DifficultyPreset::Hard => 0.8,
        }
    }

    /// Spawn interval reduction per ramp step
    pub fn difficulty_step(&self) -> f32 {
        match self {
            DifficultyPreset::Easy => 0.05,
            DifficultyPreset::Normal => 0.1,
            DifficultyPreset::Hard => 0.15,
        }
    }
}

/// Fixed parameter set for one simulation instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // === Avatar ===
    /// Avatar movement speed (units/s)
    pub avatar_speed: f32,
    /// Avatar sphere radius
    pub avatar_radius: f32,
    /// Position the avatar returns to at every round start
    pub avatar_start: Vec3,
    /// Lateral bound; x stays in [-lateral_bound, lateral_bound]
    pub lateral_bound: f32,
    /// Forward bound; z stays >= -forward_bound
    pub forward_bound: f32,
    /// Backward bound; z stays <= backward_bound
    pub backward_bound: f32,

    // === Obstacles ===
    /// Half size of each obstacle cube
    pub obstacle_half_extent: f32,
    pub spawn_bound_left: f32,
    pub spawn_bound_right: f32,
    pub spawn_height: f32,
    pub spawn_depth: f32,
    /// Obstacles with z beyond this are reaped as passed
    pub despawn_depth: f32,
    /// Seconds between spawns before any ramp
    pub base_spawn_interval: f32,
    pub base_obstacle_speed: f32,
    /// Obstacle speed gained per second of round time
    pub obstacle_acceleration: f32,
    /// Relative weights of variants A, B, C
    pub variant_weights: [u32; 3],

    // === Difficulty ramp ===
    pub difficulty_step: f32,
    pub difficulty_threshold_increment: u64,
    pub max_spawn_interval_reduction: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            avatar_speed: 7.0,
            avatar_radius: 1.0,
            avatar_start: Vec3::new(0.0, 0.0, 10.0),
            lateral_bound: 10.0,
            forward_bound: 0.0,
            backward_bound: 10.0,

            obstacle_half_extent: 1.0,
            spawn_bound_left: -10.0,
            spawn_bound_right: 10.0,
            spawn_height: 0.0,
            spawn_depth: -20.0,
            despawn_depth: 20.0,
            base_spawn_interval: 1.0,
            base_obstacle_speed: 5.0,
            obstacle_acceleration: 0.1,
            variant_weights: [6, 3, 1],

            difficulty_step: 0.1,
            difficulty_threshold_increment: 10,
            max_spawn_interval_reduction: 0.6,
        }
    }
}

impl SimConfig {
    /// Create a config from a difficulty preset (applies preset values)
    pub fn from_preset(preset: DifficultyPreset) -> Self {
        let mut config = Self::default();
        config.apply_preset(preset);
        config
    }

    /// Apply a difficulty preset (updates speed and spawn parameters)
    pub fn apply_preset(&mut self, preset: DifficultyPreset) {
        self.base_obstacle_speed = preset.obstacle_speed();
        self.obstacle_acceleration = preset.obstacle_acceleration();
        self.base_spawn_interval = preset.spawn_interval();
        self.difficulty_step = preset.difficulty_step();
        // Keep the interval floor at 40% of the base interval
        self.max_spawn_interval_reduction = self.base_spawn_interval * 0.6;
    }

    /// Parse a (possibly partial) JSON config over the defaults, then validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        log::info!("Loaded config from {}", path.as_ref().display());
        Self::from_json(&json)
    }

    /// Smallest spawn interval the ramp can reach
    pub fn min_spawn_interval(&self) -> f32 {
        self.base_spawn_interval - self.max_spawn_interval_reduction
    }

    /// Check every invariant the simulation relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        let scalars = [
            ("avatar_speed", self.avatar_speed),
            ("avatar_radius", self.avatar_radius),
            ("lateral_bound", self.lateral_bound),
            ("forward_bound", self.forward_bound),
            ("backward_bound", self.backward_bound),
            ("obstacle_half_extent", self.obstacle_half_extent),
            ("spawn_bound_left", self.spawn_bound_left),
            ("spawn_bound_right", self.spawn_bound_right),
            ("spawn_height", self.spawn_height),
            ("spawn_depth", self.spawn_depth),
            ("despawn_depth", self.despawn_depth),
            ("base_spawn_interval", self.base_spawn_interval),
            ("base_obstacle_speed", self.base_obstacle_speed),
            ("obstacle_acceleration", self.obstacle_acceleration),
            ("difficulty_step", self.difficulty_step),
            ("max_spawn_interval_reduction", self.max_spawn_interval_reduction),
        ];
        for (field, value) in scalars {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { field });
            }
        }
        if !self.avatar_start.is_finite() {
            return Err(ConfigError::NonFinite {
                field: "avatar_start",
            });
        }

        for (field, value) in [
            ("avatar_radius", self.avatar_radius),
            ("obstacle_half_extent", self.obstacle_half_extent),
            ("base_spawn_interval", self.base_spawn_interval),
        ] {
            if value <= 0.0 {
                return Err(ConfigError::NotPositive { field, value });
            }
        }

        for (field, value) in [
            ("avatar_speed", self.avatar_speed),
            ("lateral_bound", self.lateral_bound),
            ("forward_bound", self.forward_bound),
            ("backward_bound", self.backward_bound),
            ("base_obstacle_speed", self.base_obstacle_speed),
            ("obstacle_acceleration", self.obstacle_acceleration),
            ("difficulty_step", self.difficulty_step),
            ("max_spawn_interval_reduction", self.max_spawn_interval_reduction),
        ] {
            if value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }

        if self.spawn_bound_left >= self.spawn_bound_right {
            return Err(ConfigError::InvertedSpawnBounds {
                left: self.spawn_bound_left,
                right: self.spawn_bound_right,
            });
        }
        if self.despawn_depth <= self.spawn_depth {
            return Err(ConfigError::DespawnBeforeSpawn {
                spawn: self.spawn_depth,
                despawn: self.despawn_depth,
            });
        }

        let start = self.avatar_start;
        if start.x.abs() > self.lateral_bound
            || start.z < -self.forward_bound
            || start.z > self.backward_bound
        {
            return Err(ConfigError::StartOutOfBounds { start });
        }

        if self.variant_weights.iter().all(|&w| w == 0) {
            return Err(ConfigError::EmptyVariantDistribution);
        }

        if self.max_spawn_interval_reduction >= self.base_spawn_interval {
            return Err(ConfigError::ReductionTooLarge {
                max: self.max_spawn_interval_reduction,
                base: self.base_spawn_interval,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn test_presets_are_valid() {
        for preset in [
            DifficultyPreset::Easy,
            DifficultyPreset::Normal,
            DifficultyPreset::Hard,
        ] {
            let config = SimConfig::from_preset(preset);
            assert!(config.validate().is_ok(), "{} preset invalid", preset.as_str());
            assert!(config.min_spawn_interval() > 0.0);
        }
    }

    #[test]
    fn test_preset_from_str() {
        assert_eq!(DifficultyPreset::from_str("HARD"), Some(DifficultyPreset::Hard));
        assert_eq!(DifficultyPreset::from_str("norm"), Some(DifficultyPreset::Normal));
        assert_eq!(DifficultyPreset::from_str("insane"), None);
    }

    #[test]
    fn test_rejects_non_positive_half_extent() {
        let config = SimConfig {
            obstacle_half_extent: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotPositive {
                field: "obstacle_half_extent",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_empty_variant_distribution() {
        let config = SimConfig {
            variant_weights: [0, 0, 0],
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyVariantDistribution)
        ));
    }

    #[test]
    fn test_rejects_nan() {
        let config = SimConfig {
            avatar_speed: f32::NAN,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonFinite {
                field: "avatar_speed"
            })
        ));
    }

    #[test]
    fn test_rejects_reduction_reaching_interval() {
        let config = SimConfig {
            max_spawn_interval_reduction: 1.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ReductionTooLarge { .. })
        ));
    }

    #[test]
    fn test_rejects_start_outside_bounds() {
        let config = SimConfig {
            avatar_start: Vec3::new(0.0, 0.0, 11.0),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::StartOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_partial_json_overrides_defaults() {
        let json = r#"{ "avatar_speed": 9.5, "variant_weights": [1, 1, 1] }"#;
        let config = SimConfig::from_json(json).expect("valid json");
        assert_eq!(config.avatar_speed, 9.5);
        assert_eq!(config.variant_weights, [1, 1, 1]);
        assert_eq!(config.despawn_depth, SimConfig::default().despawn_depth);
    }

    #[test]
    fn test_json_is_validated() {
        let err = SimConfig::from_json(r#"{ "spawn_bound_left": 5.0, "spawn_bound_right": -5.0 }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvertedSpawnBounds { .. }));

        let err = SimConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = SimConfig::load("/nonexistent/cube-dodge.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
