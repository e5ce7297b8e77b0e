//! Game mode state and core types
//!
//! `GameMode` owns everything a match needs except the markers themselves,
//! which live in the session `MarkerRegistry` and are referenced by handle.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::error::TrackingError;
use crate::marker::MarkerId;
use crate::settings::GameSettings;

/// Current state of the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameState {
    /// Waiting for all four walls to be visible in a usable layout
    FindingWalls,
    /// Waiting for the config marker to be held still long enough
    SelectingDifficulty,
    /// Rounds are running
    Playing,
    /// Out of lives (terminal)
    GameLost,
    /// Tracking never converged or a marker disappeared (terminal)
    Error,
}

impl GameState {
    /// Terminal states never change again
    pub fn is_terminal(&self) -> bool {
        matches!(self, GameState::GameLost | GameState::Error)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameState::FindingWalls => "FindingWalls",
            GameState::SelectingDifficulty => "SelectingDifficulty",
            GameState::Playing => "Playing",
            GameState::GameLost => "GameLost",
            GameState::Error => "Error",
        }
    }
}

/// Corner of the play field a wall marker stands on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WallPosition {
    TopLeft = 0,
    TopRight = 1,
    BottomLeft = 2,
    BottomRight = 3,
}

impl WallPosition {
    pub const COUNT: usize = 4;

    pub const ALL: [WallPosition; 4] = [
        WallPosition::TopLeft,
        WallPosition::TopRight,
        WallPosition::BottomLeft,
        WallPosition::BottomRight,
    ];

    /// Corners in the order they are walked around the field edge
    pub const BOUNDARY: [WallPosition; 4] = [
        WallPosition::TopLeft,
        WallPosition::TopRight,
        WallPosition::BottomRight,
        WallPosition::BottomLeft,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// Handles of the markers a match is played with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerSet {
    /// Indexed by `WallPosition`
    pub walls: [MarkerId; 4],
    pub shield: MarkerId,
    pub config: MarkerId,
}

impl MarkerSet {
    pub fn wall(&self, position: WallPosition) -> MarkerId {
        self.walls[position.index()]
    }
}

/// Per-frame view for the UI layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub state: GameState,
    pub lives: u32,
    pub max_lives: u32,
    pub score: u64,
    /// Only set while playing
    pub target_wall: Option<WallPosition>,
    /// Seconds left in the current round, only set while playing
    pub round_time_left: Option<f32>,
    /// Progress of the config hold in [0, 1]
    pub config_progress: f32,
    /// Cause of the `Error` state
    pub error: Option<String>,
}

/// The match state machine
///
/// Call [`GameMode::update`] once per frame after the tracker has refreshed
/// the registry. Everything else is a read except [`GameMode::set_lives`].
#[derive(Debug, Clone)]
pub struct GameMode {
    pub(super) settings: GameSettings,
    pub(super) markers: MarkerSet,
    pub(super) state: GameState,
    /// Continuous seconds the config marker has been held still
    pub(super) config_time: f32,
    /// Where the config marker was on the previous tick
    pub(super) config_last_location: Option<glam::Vec3>,
    pub(super) current_lives: u32,
    pub(super) max_lives: u32,
    /// Elapsed time at the last state transition or round start
    pub(super) time_stamp: f32,
    /// Elapsed time of the previous tick
    pub(super) last_tick: f32,
    pub(super) time_to_carry_on_action: f32,
    pub(super) next_objective: WallPosition,
    pub(super) score: u64,
    pub(super) error: Option<TrackingError>,
    pub(super) rng: Pcg32,
}

impl GameMode {
    /// Create a match with the given settings.
    ///
    /// The RNG seed comes from `settings.seed`, or from the OS if unset.
    pub fn new(markers: MarkerSet, settings: GameSettings) -> Self {
        let seed = settings.seed.unwrap_or_else(rand::random);
        Self::with_seed(markers, settings, seed)
    }

    /// Create a match with an explicit RNG seed
    pub fn with_seed(markers: MarkerSet, settings: GameSettings, seed: u64) -> Self {
        let max_lives = settings.max_lives;
        log::info!("New match: {} lives, seed {}", max_lives, seed);
        Self {
            settings,
            markers,
            state: GameState::FindingWalls,
            config_time: 0.0,
            config_last_location: None,
            current_lives: max_lives,
            max_lives,
            time_stamp: 0.0,
            last_tick: 0.0,
            time_to_carry_on_action: 0.0,
            next_objective: WallPosition::TopLeft,
            score: 0,
            error: None,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Set the player's lives, clamped to `[0, max_lives]`.
    ///
    /// Ignored once the match is lost.
    pub fn set_lives(&mut self, lives: i32) {
        if self.state == GameState::GameLost {
            log::debug!("Ignoring set_lives({}) after game lost", lives);
            return;
        }
        self.current_lives = (lives.max(0) as u32).min(self.max_lives);
    }

    pub fn lives(&self) -> u32 {
        self.current_lives
    }

    pub fn max_lives(&self) -> u32 {
        self.max_lives
    }

    /// Wall the player must currently block. Only meaningful while playing.
    pub fn target_wall(&self) -> WallPosition {
        self.next_objective
    }

    pub fn game_state(&self) -> GameState {
        self.state
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    /// Seconds per round picked during difficulty selection
    pub fn time_to_carry_on_action(&self) -> f32 {
        self.time_to_carry_on_action
    }

    pub fn config_time(&self) -> f32 {
        self.config_time
    }

    /// Elapsed time at which the current state or round started
    pub fn time_stamp(&self) -> f32 {
        self.time_stamp
    }

    /// Cause of the `Error` state
    pub fn error(&self) -> Option<&TrackingError> {
        self.error.as_ref()
    }

    pub fn markers(&self) -> &MarkerSet {
        &self.markers
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    /// Everything the UI needs for this frame
    pub fn snapshot(&self, elapsed_time: f32) -> GameSnapshot {
        let playing = self.state == GameState::Playing;
        GameSnapshot {
            state: self.state,
            lives: self.current_lives,
            max_lives: self.max_lives,
            score: self.score,
            target_wall: playing.then_some(self.next_objective),
            round_time_left: playing.then(|| {
                (self.time_to_carry_on_action - (elapsed_time - self.time_stamp)).max(0.0)
            }),
            config_progress: (self.config_time / self.settings.config_hold_secs).clamp(0.0, 1.0),
            error: self.error.as_ref().map(ToString::to_string),
        }
    }
}
