//! Difficulty from the config marker
//!
//! The player picks the difficulty by holding the config marker at some
//! distance from the camera: close is easy, far is hard. The mapping is
//! linear between the near and far distances and clamped outside them.

use crate::settings::GameSettings;

/// Normalized difficulty in [0, 1] for a config marker distance
pub fn difficulty_level(distance: f32, settings: &GameSettings) -> f32 {
    let span = settings.far_distance - settings.near_distance;
    if span <= 0.0 {
        return 0.0;
    }
    ((distance - settings.near_distance) / span).clamp(0.0, 1.0)
}

/// Seconds the player has to react in each round
pub fn action_time(distance: f32, settings: &GameSettings) -> f32 {
    let t = difficulty_level(distance, settings);
    settings.easy_action_secs + (settings.hard_action_secs - settings.easy_action_secs) * t
}
