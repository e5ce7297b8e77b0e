//! Triangle meshes for the game's primitives
//!
//! `MeshRecorder` turns each primitive request into camera-space triangles,
//! ready to be uploaded as a vertex buffer.

use glam::{Mat4, Vec3};
use std::f32::consts::TAU;

use super::PrimitiveRenderer;
use super::vertex::{Color, Vertex, colors};

/// Segments used for circles
pub const CIRCLE_SEGMENTS: u32 = 32;
/// Length of the arrow primitive (mm)
pub const ARROW_LENGTH: f32 = 100.0;
/// Thickness of walls and the arrow shaft (mm)
pub const LINE_THICKNESS: f32 = 4.0;
/// Ring width relative to its radius
const RING_WIDTH: f32 = 0.15;

/// Records primitives as a flat triangle list
#[derive(Debug, Clone)]
pub struct MeshRecorder {
    vertices: Vec<Vertex>,
    transform: Mat4,
    color: Color,
    primitives: usize,
}

impl Default for MeshRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl MeshRecorder {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            transform: Mat4::IDENTITY,
            color: colors::WHITE,
            primitives: 0,
        }
    }

    /// Triangles recorded so far, three vertices each
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Number of primitives drawn this frame
    pub fn primitive_count(&self) -> usize {
        self.primitives
    }

    /// Packed vertex data for upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    fn push(&mut self, local: Vec3) {
        let p = self.transform.transform_point3(local);
        self.vertices.push(Vertex::new(p.x, p.y, p.z, self.color));
    }

    fn triangle(&mut self, a: Vec3, b: Vec3, c: Vec3) {
        self.push(a);
        self.push(b);
        self.push(c);
    }

    fn quad(&mut self, a: Vec3, b: Vec3, c: Vec3, d: Vec3) {
        self.triangle(a, b, c);
        self.triangle(a, c, d);
    }

    /// Box between two corners in local space
    fn cuboid(&mut self, min: Vec3, max: Vec3) {
        let corner = |x: bool, y: bool, z: bool| {
            Vec3::new(
                if x { max.x } else { min.x },
                if y { max.y } else { min.y },
                if z { max.z } else { min.z },
            )
        };
        let c = [
            corner(false, false, false),
            corner(true, false, false),
            corner(true, true, false),
            corner(false, true, false),
            corner(false, false, true),
            corner(true, false, true),
            corner(true, true, true),
            corner(false, true, true),
        ];
        // bottom, top, front, back, left, right
        self.quad(c[0], c[3], c[2], c[1]);
        self.quad(c[4], c[5], c[6], c[7]);
        self.quad(c[0], c[1], c[5], c[4]);
        self.quad(c[3], c[7], c[6], c[2]);
        self.quad(c[0], c[4], c[7], c[3]);
        self.quad(c[1], c[2], c[6], c[5]);
    }
}

impl PrimitiveRenderer for MeshRecorder {
    fn prepare_next_frame(&mut self) {
        self.vertices.clear();
        self.transform = Mat4::IDENTITY;
        self.color = colors::WHITE;
        self.primitives = 0;
    }

    fn buffer_transform(&mut self, transform: Mat4) {
        self.transform = transform;
    }

    fn buffer_color(&mut self, color: Color) {
        self.color = color;
    }

    fn draw_arrow(&mut self) {
        let half = LINE_THICKNESS / 2.0;
        let shaft_end = ARROW_LENGTH * 0.8;
        self.quad(
            Vec3::new(0.0, -half, 0.0),
            Vec3::new(shaft_end, -half, 0.0),
            Vec3::new(shaft_end, half, 0.0),
            Vec3::new(0.0, half, 0.0),
        );
        self.triangle(
            Vec3::new(shaft_end, -half * 4.0, 0.0),
            Vec3::new(ARROW_LENGTH, 0.0, 0.0),
            Vec3::new(shaft_end, half * 4.0, 0.0),
        );
        self.primitives += 1;
    }

    fn draw_whole_circle(&mut self, radius: f32) {
        for i in 0..CIRCLE_SEGMENTS {
            let theta1 = (i as f32 / CIRCLE_SEGMENTS as f32) * TAU;
            let theta2 = ((i + 1) as f32 / CIRCLE_SEGMENTS as f32) * TAU;
            self.triangle(
                Vec3::ZERO,
                Vec3::new(radius * theta1.cos(), radius * theta1.sin(), 0.0),
                Vec3::new(radius * theta2.cos(), radius * theta2.sin(), 0.0),
            );
        }
        self.primitives += 1;
    }

    fn draw_empty_circle(&mut self, radius: f32) {
        let inner_radius = radius * (1.0 - RING_WIDTH);
        for i in 0..CIRCLE_SEGMENTS {
            let theta1 = (i as f32 / CIRCLE_SEGMENTS as f32) * TAU;
            let theta2 = ((i + 1) as f32 / CIRCLE_SEGMENTS as f32) * TAU;
            let (s1, c1) = theta1.sin_cos();
            let (s2, c2) = theta2.sin_cos();
            self.quad(
                Vec3::new(inner_radius * c1, inner_radius * s1, 0.0),
                Vec3::new(radius * c1, radius * s1, 0.0),
                Vec3::new(radius * c2, radius * s2, 0.0),
                Vec3::new(inner_radius * c2, inner_radius * s2, 0.0),
            );
        }
        self.primitives += 1;
    }

    fn draw_wall(&mut self, angle: f32, length: f32, height: f32) {
        let saved = self.transform;
        self.transform = saved * Mat4::from_rotation_z(angle);
        let half = LINE_THICKNESS / 2.0;
        self.cuboid(Vec3::new(0.0, -half, 0.0), Vec3::new(length, half, height));
        self.transform = saved;
        self.primitives += 1;
    }

    fn draw_cube(&mut self, size: f32) {
        let half = size / 2.0;
        self.cuboid(Vec3::new(-half, -half, 0.0), Vec3::new(half, half, size));
        self.primitives += 1;
    }
}
