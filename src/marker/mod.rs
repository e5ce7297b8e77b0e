//! Tracked marker contract
//!
//! The tracker owns marker detection. Each frame it refreshes the
//! `MarkerRegistry`, and only then does the game read it. The game never
//! writes marker state; it only holds `MarkerId` handles into the registry.

pub mod pose;
pub mod registry;

pub use pose::MarkerPose;
pub use registry::{Marker, MarkerId, MarkerRegistry, MarkerSource, TrackedMarker};
