//! Marker pose in camera space
//!
//! AR trackers report each marker as a 4x4 model-view transform in the
//! OpenGL column-major layout. Units are millimetres, the camera sits at the
//! origin.

use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Rigid transform of a marker relative to the camera
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkerPose {
    pub transform: Mat4,
}

impl Default for MarkerPose {
    fn default() -> Self {
        Self {
            transform: Mat4::IDENTITY,
        }
    }
}

impl MarkerPose {
    pub fn new(transform: Mat4) -> Self {
        Self { transform }
    }

    /// Build from a column-major OpenGL matrix as handed out by the tracker
    pub fn from_gl_matrix(m: &[f32; 16]) -> Self {
        Self::new(Mat4::from_cols_array(m))
    }

    /// Pose with no rotation at the given location
    pub fn from_translation(location: Vec3) -> Self {
        Self::new(Mat4::from_translation(location))
    }

    pub fn from_rotation_translation(rotation: Quat, location: Vec3) -> Self {
        Self::new(Mat4::from_rotation_translation(rotation, location))
    }

    /// Position of the marker centre
    #[inline]
    pub fn location(&self) -> Vec3 {
        self.transform.w_axis.truncate()
    }

    /// Euclidean distance between two marker centres
    #[inline]
    pub fn distance(&self, other: &MarkerPose) -> f32 {
        self.location().distance(other.location())
    }

    /// Distance from the camera (origin) to the marker centre
    #[inline]
    pub fn distance_to_camera(&self) -> f32 {
        self.location().length()
    }

    /// Rotation angles (x, y, z) in degrees
    fn euler_degrees(&self) -> (f32, f32, f32) {
        let (_, rotation, _) = self.transform.to_scale_rotation_translation();
        let (x, y, z) = rotation.to_euler(EulerRot::XYZ);
        (x.to_degrees(), y.to_degrees(), z.to_degrees())
    }

    /// Rotation around the X axis in degrees
    pub fn yaw(&self) -> f32 {
        self.euler_degrees().0
    }

    /// Rotation around the Y axis in degrees
    pub fn pitch(&self) -> f32 {
        self.euler_degrees().1
    }

    /// Rotation around the Z axis in degrees
    pub fn roll(&self) -> f32 {
        self.euler_degrees().2
    }
}
