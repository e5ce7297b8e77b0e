//! Vertex types for primitive rendering

use bytemuck::{Pod, Zeroable};

/// RGBA color, components in [0, 1]
pub type Color = [f32; 4];

/// Camera-space vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: Color,
}

impl Vertex {
    pub const fn new(x: f32, y: f32, z: f32, color: Color) -> Self {
        Self {
            position: [x, y, z],
            color,
        }
    }

    /// Byte stride of one vertex in a packed buffer
    pub const STRIDE: usize = std::mem::size_of::<Vertex>();
}

/// Linear blend between two colors
pub fn mix(a: Color, b: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    std::array::from_fn(|i| a[i] * (1.0 - t) + b[i] * t)
}

/// Colors for game elements
pub mod colors {
    use super::Color;

    pub const WHITE: Color = [1.0, 1.0, 1.0, 1.0];
    pub const SEARCHING: Color = [0.9, 0.85, 0.3, 1.0];
    pub const FIELD: Color = [0.3, 0.6, 1.0, 0.8];
    pub const WALL: Color = [0.4, 0.7, 1.0, 1.0];
    pub const TARGET: Color = [1.0, 0.3, 0.2, 1.0];
    pub const SHIELD: Color = [0.2, 0.8, 0.4, 0.6];
    pub const EASY: Color = [0.2, 0.9, 0.3, 1.0];
    pub const HARD: Color = [1.0, 0.2, 0.1, 1.0];
    pub const LOST: Color = [0.4, 0.4, 0.45, 1.0];
    pub const ERROR: Color = [0.8, 0.0, 0.6, 1.0];
}
