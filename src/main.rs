//! AR Walls demo host
//!
//! Runs a whole match against a scripted tracker: the walls show up, the
//! config marker is held at arm's length, and a simulated player chases
//! targets with a reaction time that keeps getting worse until the match is
//! lost. Pass a settings JSON path as the first argument to override tuning.

use std::error::Error;

use glam::Vec3;

use ar_walls::renderer::{MeshRecorder, PrimitiveRenderer, draw_feedback};
use ar_walls::{
    GameMode, GameSettings, GameState, Marker, MarkerPose, MarkerRegistry, MarkerSet, WallPosition,
};

/// Tracker refresh rate
const FRAME_DT: f32 = 1.0 / 30.0;
/// Give up on the demo after this long
const MAX_SECS: f32 = 300.0;

const WALL_SPOTS: [Vec3; 4] = [
    Vec3::new(-250.0, 180.0, 900.0),
    Vec3::new(250.0, 180.0, 900.0),
    Vec3::new(-250.0, -180.0, 900.0),
    Vec3::new(250.0, -180.0, 900.0),
];

/// Stands in for the camera tracker
struct ScriptedTracker {
    markers: MarkerSet,
    /// Target the player is currently reacting to, and since when
    chasing: Option<(WallPosition, f32)>,
    rounds_seen: u32,
}

impl ScriptedTracker {
    fn new(registry: &mut MarkerRegistry) -> Self {
        let walls = [0, 1, 2, 3].map(|i| registry.register(Marker::new(i)));
        let shield = registry.register(Marker::new(10));
        let config = registry.register(Marker::new(20));
        Self {
            markers: MarkerSet {
                walls,
                shield,
                config,
            },
            chasing: None,
            rounds_seen: 0,
        }
    }

    /// Seconds the simulated player needs to reach a new target
    fn reaction_time(&self) -> f32 {
        0.6 + 0.45 * self.rounds_seen as f32
    }

    /// Refresh every marker for time `t`, as seen after the previous update
    fn refresh(&mut self, registry: &mut MarkerRegistry, game: &GameMode, t: f32) {
        registry.begin_frame();

        if t >= 0.5 {
            for position in WallPosition::ALL {
                registry.observe(
                    self.markers.wall(position),
                    MarkerPose::from_translation(WALL_SPOTS[position.index()]),
                );
            }
        }

        if game.game_state() == GameState::SelectingDifficulty && t >= 1.0 {
            registry.observe(
                self.markers.config,
                MarkerPose::from_translation(Vec3::new(30.0, -20.0, 650.0)),
            );
        }

        let home = Vec3::new(0.0, 0.0, 880.0);
        let shield_at = if game.game_state() == GameState::Playing {
            let target = game.target_wall();
            let chasing = self.chasing;
            let started = match chasing {
                Some((chased, since)) if chased == target && since >= game.time_stamp() => since,
                _ => {
                    self.rounds_seen += 1;
                    self.chasing = Some((target, t));
                    t
                }
            };
            if t - started >= self.reaction_time() {
                WALL_SPOTS[target.index()] + Vec3::new(0.0, 0.0, -20.0)
            } else {
                home
            }
        } else {
            home
        };
        registry.observe(self.markers.shield, MarkerPose::from_translation(shield_at));
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    log::info!("AR Walls (demo) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => GameSettings::load(path)?,
        None => GameSettings {
            seed: Some(7),
            ..Default::default()
        },
    };

    let mut registry = MarkerRegistry::new();
    let mut tracker = ScriptedTracker::new(&mut registry);
    if registry.is_empty() {
        return Err("tracker registered no markers".into());
    }
    log::info!("Tracking {} markers", registry.len());
    for (handle, marker) in registry.iter() {
        log::debug!("Marker {} -> pattern {} ({} mm)", handle, marker.id, marker.width);
    }

    let mut game = GameMode::new(tracker.markers, settings);
    let mut mesh = MeshRecorder::new();

    let mut t = 0.0;
    let mut frames = 0u64;
    while !game.game_state().is_terminal() && t < MAX_SECS {
        // Tracker refresh happens before the game reads the markers
        tracker.refresh(&mut registry, &game, t);
        game.update(&registry, t);

        mesh.prepare_next_frame();
        draw_feedback(&game, &registry, &mut mesh);

        frames += 1;
        if frames % 30 == 0 {
            log::debug!(
                "t={:.1}s state={} lives={} score={} triangles={}",
                t,
                game.game_state().as_str(),
                game.lives(),
                game.score(),
                mesh.triangle_count()
            );
        }
        t += FRAME_DT;
    }

    let snapshot = game.snapshot(t);
    println!("{}", serde_json::to_string_pretty(&snapshot)?);

    if let Some(error) = game.error() {
        return Err(error.clone().into());
    }
    Ok(())
}
