//! Primitive rendering boundary
//!
//! The game only ever asks for a handful of primitives, drawn in the frame
//! of whatever transform was buffered last. Rasterization belongs to the
//! implementor; nothing in the game reads back what was drawn.

pub mod feedback;
pub mod shapes;
pub mod vertex;

pub use feedback::draw_feedback;
pub use shapes::MeshRecorder;
pub use vertex::{Color, Vertex, colors};

use glam::Mat4;

/// Something that can draw simple primitives
pub trait PrimitiveRenderer {
    /// Start a new frame, dropping anything buffered
    fn prepare_next_frame(&mut self);

    /// Frame the following primitives are drawn in
    fn buffer_transform(&mut self, transform: Mat4);

    /// Color of the following primitives
    fn buffer_color(&mut self, color: Color);

    /// Arrow along +X, 100 mm long
    fn draw_arrow(&mut self);

    /// Filled disc in the XY plane
    fn draw_whole_circle(&mut self, radius: f32);

    /// Outline ring in the XY plane
    fn draw_empty_circle(&mut self, radius: f32);

    /// Upright wall starting at the origin, heading `angle` radians from +X
    fn draw_wall(&mut self, angle: f32, length: f32, height: f32);

    /// Axis-aligned cube resting on the XY plane
    fn draw_cube(&mut self, size: f32);
}
