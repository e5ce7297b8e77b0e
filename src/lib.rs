//! AR Walls - an augmented-reality tabletop reflex game
//!
//! Core modules:
//! - `sim`: Deterministic game state machine (walls, difficulty, rounds, lives)
//! - `marker`: Tracked fiducial contract and the session marker registry
//! - `renderer`: Primitive renderer boundary and visual feedback
//! - `settings`: Data-driven game tuning

pub mod error;
pub mod marker;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::{SettingsError, TrackingError};
pub use marker::{Marker, MarkerId, MarkerPose, MarkerRegistry, MarkerSource, TrackedMarker};
pub use settings::GameSettings;
pub use sim::{GameMode, GameSnapshot, GameState, MarkerSet, WallPosition};

/// Default tuning constants
pub mod consts {
    /// Lives the player starts a match with
    pub const DEFAULT_MAX_LIVES: u32 = 3;
    /// Seconds the config marker must be held still to lock in the difficulty
    pub const CONFIG_HOLD_SECS: f32 = 3.0;
    /// Seconds to wait for the four walls before giving up
    pub const WALL_SEARCH_TIMEOUT_SECS: f32 = 60.0;

    /// Minimum distance between any two wall markers (mm)
    pub const MIN_WALL_SEPARATION: f32 = 40.0;
    /// Minimum sine of any corner angle in the wall layout (~5.7 degrees)
    pub const MIN_CORNER_SINE: f32 = 0.1;
    /// Maximum config marker drift between two ticks (mm)
    pub const CONFIG_STABILITY_TOLERANCE: f32 = 30.0;

    /// Config marker distance that selects the easiest difficulty (mm)
    pub const NEAR_DISTANCE: f32 = 300.0;
    /// Config marker distance that selects the hardest difficulty (mm)
    pub const FAR_DISTANCE: f32 = 1200.0;
    /// Seconds per round at the easiest difficulty
    pub const EASY_ACTION_SECS: f32 = 6.0;
    /// Seconds per round at the hardest difficulty
    pub const HARD_ACTION_SECS: f32 = 1.5;

    /// Shield-to-wall distance that counts as a block (mm)
    pub const SHIELD_ACCEPTANCE_DISTANCE: f32 = 120.0;

    /// Default physical marker width (mm)
    pub const MARKER_WIDTH: f32 = 120.0;
}

/// Normalize an angle in degrees to [-180, 180)
#[inline]
pub fn normalize_degrees(mut angle: f32) -> f32 {
    while angle >= 180.0 {
        angle -= 360.0;
    }
    while angle < -180.0 {
        angle += 360.0;
    }
    angle
}
