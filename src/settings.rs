//! Game settings and tuning
//!
//! Stored as JSON next to the executable. Every field has a default, so a
//! partial file only overrides what it names.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SettingsError;

/// Tunables for one match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    /// Lives at the start of a match
    pub max_lives: u32,

    // === Calibration ===
    /// Seconds the config marker must stay visible and still
    pub config_hold_secs: f32,
    /// Seconds to wait for a valid wall layout before erroring out
    pub wall_search_timeout_secs: f32,
    /// Minimum distance between any two walls (mm)
    pub min_wall_separation: f32,
    /// Minimum sine of the corner angles of the wall layout
    pub min_corner_sine: f32,
    /// Maximum config marker drift between ticks before the hold restarts (mm)
    pub config_stability_tolerance: f32,

    // === Difficulty ===
    /// Config marker distance for the easiest setting (mm)
    pub near_distance: f32,
    /// Config marker distance for the hardest setting (mm)
    pub far_distance: f32,
    /// Round length at the easiest setting (seconds)
    pub easy_action_secs: f32,
    /// Round length at the hardest setting (seconds)
    pub hard_action_secs: f32,

    // === Rounds ===
    /// Shield-to-target distance that counts as a block (mm)
    pub shield_acceptance_distance: f32,
    /// Optional yaw agreement between shield and target (degrees)
    pub shield_yaw_tolerance_deg: Option<f32>,

    /// RNG seed for objective selection; random when unset
    pub seed: Option<u64>,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            max_lives: DEFAULT_MAX_LIVES,

            config_hold_secs: CONFIG_HOLD_SECS,
            wall_search_timeout_secs: WALL_SEARCH_TIMEOUT_SECS,
            min_wall_separation: MIN_WALL_SEPARATION,
            min_corner_sine: MIN_CORNER_SINE,
            config_stability_tolerance: CONFIG_STABILITY_TOLERANCE,

            near_distance: NEAR_DISTANCE,
            far_distance: FAR_DISTANCE,
            easy_action_secs: EASY_ACTION_SECS,
            hard_action_secs: HARD_ACTION_SECS,

            shield_acceptance_distance: SHIELD_ACCEPTANCE_DISTANCE,
            shield_yaw_tolerance_deg: None,

            seed: None,
        }
    }
}

impl GameSettings {
    /// Parse and validate settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Write settings to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Settings saved to {}", path.as_ref().display());
        Ok(())
    }

    /// Reject values the game cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.max_lives == 0 {
            return Err(SettingsError::Invalid("max_lives must be at least 1"));
        }
        if !(self.config_hold_secs > 0.0) {
            return Err(SettingsError::Invalid("config_hold_secs must be positive"));
        }
        if !(self.wall_search_timeout_secs > 0.0) {
            return Err(SettingsError::Invalid(
                "wall_search_timeout_secs must be positive",
            ));
        }
        if self.min_wall_separation < 0.0 || self.config_stability_tolerance < 0.0 {
            return Err(SettingsError::Invalid("tolerances must not be negative"));
        }
        if !(0.0..=1.0).contains(&self.min_corner_sine) {
            return Err(SettingsError::Invalid("min_corner_sine must be within [0, 1]"));
        }
        if !(self.near_distance >= 0.0 && self.far_distance > self.near_distance) {
            return Err(SettingsError::Invalid(
                "far_distance must be greater than near_distance",
            ));
        }
        if !(self.hard_action_secs > 0.0 && self.easy_action_secs >= self.hard_action_secs) {
            return Err(SettingsError::Invalid(
                "action times must be positive with easy >= hard",
            ));
        }
        if !(self.shield_acceptance_distance > 0.0) {
            return Err(SettingsError::Invalid(
                "shield_acceptance_distance must be positive",
            ));
        }
        if self.shield_yaw_tolerance_deg.is_some_and(|t| t < 0.0) {
            return Err(SettingsError::Invalid(
                "shield_yaw_tolerance_deg must not be negative",
            ));
        }
        Ok(())
    }
}
