//! Visual feedback for the current match
//!
//! Walls are drawn in the frame of the marker they start from, so they sit
//! on the table even when the camera looks at it at an angle.

use glam::{Mat4, Vec3};

use super::PrimitiveRenderer;
use super::vertex::{Color, colors, mix};
use crate::marker::{Marker, MarkerRegistry};
use crate::sim::{GameMode, GameState, WallPosition, difficulty_level};

/// Height of the field boundary walls (mm)
pub const WALL_HEIGHT: f32 = 30.0;
/// Size of the cube marking each wall marker (mm)
pub const CORNER_CUBE: f32 = 40.0;

fn visible_wall<'a>(
    game: &GameMode,
    registry: &'a MarkerRegistry,
    position: WallPosition,
) -> Option<&'a Marker> {
    registry
        .get(game.markers().wall(position))
        .filter(|m| m.visible)
}

/// Wall from `from` to `to`, drawn in `from`'s frame
fn draw_edge<R: PrimitiveRenderer>(renderer: &mut R, from: &Marker, to: &Marker) {
    let frame = from.pose.transform;
    let local: Vec3 = frame.inverse().transform_point3(to.pose.location());
    let length = local.truncate().length();
    if length <= f32::EPSILON {
        return;
    }
    renderer.buffer_transform(frame);
    renderer.draw_wall(local.y.atan2(local.x), length, WALL_HEIGHT);
}

fn draw_field<R: PrimitiveRenderer>(
    game: &GameMode,
    registry: &MarkerRegistry,
    renderer: &mut R,
    edge_color: Color,
) {
    let boundary = WallPosition::BOUNDARY.map(|p| visible_wall(game, registry, p));

    renderer.buffer_color(edge_color);
    for i in 0..boundary.len() {
        if let (Some(from), Some(to)) = (boundary[i], boundary[(i + 1) % boundary.len()]) {
            draw_edge(renderer, from, to);
        }
    }

    let target = (game.game_state() == GameState::Playing).then(|| game.target_wall());
    for position in WallPosition::ALL {
        if let Some(wall) = visible_wall(game, registry, position) {
            let color = if target == Some(position) {
                colors::TARGET
            } else {
                edge_color
            };
            renderer.buffer_color(color);
            renderer.buffer_transform(wall.pose.transform);
            renderer.draw_cube(CORNER_CUBE);
        }
    }
}

/// Ask the renderer to draw everything the player needs to see this frame
pub fn draw_feedback<R: PrimitiveRenderer>(game: &GameMode, registry: &MarkerRegistry, renderer: &mut R) {
    match game.game_state() {
        GameState::FindingWalls => {
            // Rings on whatever walls are already in sight
            renderer.buffer_color(colors::SEARCHING);
            for position in WallPosition::ALL {
                if let Some(wall) = visible_wall(game, registry, position) {
                    renderer.buffer_transform(wall.pose.transform);
                    renderer.draw_empty_circle(wall.width / 2.0);
                }
            }
        }
        GameState::SelectingDifficulty => {
            draw_field(game, registry, renderer, colors::FIELD);
            if let Some(config) = registry.get(game.markers().config).filter(|m| m.visible) {
                let level = difficulty_level(config.pose.distance_to_camera(), game.settings());
                let hold = (game.config_time() / game.settings().config_hold_secs).clamp(0.0, 1.0);
                renderer.buffer_color(mix(colors::EASY, colors::HARD, level));
                renderer.buffer_transform(config.pose.transform);
                renderer.draw_arrow();
                renderer.draw_empty_circle(config.width / 2.0 * (1.0 + hold));
            }
        }
        GameState::Playing => {
            draw_field(game, registry, renderer, colors::WALL);
            if let Some(shield) = registry.get(game.markers().shield).filter(|m| m.visible) {
                renderer.buffer_color(colors::SHIELD);
                renderer.buffer_transform(shield.pose.transform);
                renderer.draw_whole_circle(game.settings().shield_acceptance_distance);
            }
        }
        GameState::GameLost => draw_field(game, registry, renderer, colors::LOST),
        GameState::Error => {
            renderer.buffer_color(colors::ERROR);
            renderer.buffer_transform(Mat4::IDENTITY);
            renderer.draw_cube(CORNER_CUBE);
        }
    }
}
