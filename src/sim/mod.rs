//! Game mode simulation
//!
//! All game rules live here. This module must stay deterministic:
//! - Time comes only from the caller's `elapsed_time`
//! - Seeded RNG only
//! - Marker state is read, never written
//! - No rendering or platform dependencies

pub mod difficulty;
pub mod field;
pub mod state;
pub mod tick;

pub use difficulty::{action_time, difficulty_level};
pub use field::{FieldDefect, check_field, field_area};
pub use state::{GameMode, GameSnapshot, GameState, MarkerSet, WallPosition};
