//! Session marker registry
//!
//! Markers are created once per session and outlive any `GameMode`. The
//! registry is the only owner; everything else refers to markers by
//! `MarkerId`.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::pose::MarkerPose;
use crate::consts::MARKER_WIDTH;

/// Read-only view of a tracked fiducial, refreshed by the tracker each frame
pub trait TrackedMarker {
    /// Stable pattern id
    fn id(&self) -> i32;

    /// Whether the marker was detected in the current frame
    fn is_visible(&self) -> bool;

    /// Marker centre in camera space (last known if not visible)
    fn location(&self) -> Vec3;

    fn yaw(&self) -> f32;
    fn pitch(&self) -> f32;
    fn roll(&self) -> f32;

    fn distance_to_camera(&self) -> f32;

    /// Distance between marker centres
    fn distance(&self, other: &dyn TrackedMarker) -> f32 {
        self.location().distance(other.location())
    }
}

/// Non-owning handle to a marker in a `MarkerRegistry`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarkerId(pub usize);

impl std::fmt::Display for MarkerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Anything that can resolve marker handles
pub trait MarkerSource {
    type Marker: TrackedMarker;

    fn marker(&self, id: MarkerId) -> Option<&Self::Marker>;
}

/// A fiducial as last seen by the tracker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Marker {
    /// Pattern id assigned by the tracker
    pub id: i32,
    /// Physical width of the printed pattern (mm)
    pub width: f32,
    pub pose: MarkerPose,
    pub visible: bool,
}

impl Marker {
    pub fn new(id: i32) -> Self {
        Self::with_width(id, MARKER_WIDTH)
    }

    pub fn with_width(id: i32, width: f32) -> Self {
        Self {
            id,
            width,
            pose: MarkerPose::default(),
            visible: false,
        }
    }

    /// Record a detection for this frame
    pub fn observe(&mut self, pose: MarkerPose) {
        self.pose = pose;
        self.visible = true;
    }

    /// Mark as not detected this frame, keeping the last pose
    pub fn lose(&mut self) {
        self.visible = false;
    }
}

impl TrackedMarker for Marker {
    fn id(&self) -> i32 {
        self.id
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn location(&self) -> Vec3 {
        self.pose.location()
    }

    fn yaw(&self) -> f32 {
        self.pose.yaw()
    }

    fn pitch(&self) -> f32 {
        self.pose.pitch()
    }

    fn roll(&self) -> f32 {
        self.pose.roll()
    }

    fn distance_to_camera(&self) -> f32 {
        self.pose.distance_to_camera()
    }
}

/// Owner of every marker in a session
#[derive(Debug, Clone, Default)]
pub struct MarkerRegistry {
    slots: Vec<Option<Marker>>,
}

impl MarkerRegistry {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Add a marker and return its handle
    pub fn register(&mut self, marker: Marker) -> MarkerId {
        let id = MarkerId(self.slots.len());
        self.slots.push(Some(marker));
        id
    }

    /// Drop a marker. Its handle stays dangling and is never reused.
    pub fn unregister(&mut self, id: MarkerId) -> Option<Marker> {
        self.slots.get_mut(id.0).and_then(Option::take)
    }

    pub fn get(&self, id: MarkerId) -> Option<&Marker> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: MarkerId) -> Option<&mut Marker> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Tracker entry point: the marker was detected with this pose
    pub fn observe(&mut self, id: MarkerId, pose: MarkerPose) {
        if let Some(marker) = self.get_mut(id) {
            marker.observe(pose);
        }
    }

    /// Tracker entry point: the marker was not detected this frame
    pub fn lose(&mut self, id: MarkerId) {
        if let Some(marker) = self.get_mut(id) {
            marker.lose();
        }
    }

    /// Start a new detection frame: nothing is visible until observed again
    pub fn begin_frame(&mut self) {
        for marker in self.slots.iter_mut().flatten() {
            marker.lose();
        }
    }

    /// Number of live markers
    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live markers with their handles, in registration order
    pub fn iter(&self) -> impl Iterator<Item = (MarkerId, &Marker)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|m| (MarkerId(i), m)))
    }
}

impl MarkerSource for MarkerRegistry {
    type Marker = Marker;

    fn marker(&self, id: MarkerId) -> Option<&Marker> {
        self.get(id)
    }
}
