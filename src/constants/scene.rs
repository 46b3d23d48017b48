//! Layout of the authored scene and the obstacle template. Scene space is y-up with the
//! origin in the bottom-left corner; node positions are the centers of their sprites.

use glam::Vec2;
use ratatui::style::Color;

pub const SCENE_SIZE: Vec2 = Vec2::new(320.0, 568.0);
pub const GRAVITY: Vec2 = Vec2::new(0.0, -1200.0);

pub const PIPE_LAYER: &str = "pipeLayer";
pub const SCROLL_LAYER: &str = "scrollLayer";
pub const BIRD_REFERENCE: &str = "bird";
pub const BIRD: &str = "flappybird";
pub const SCORE_LABEL: &str = "scoreLabel";
pub const GROUND: &str = "ground";
pub const OBSTACLE: &str = "obstacle";
pub const PIPE_TOP: &str = "pipeTop";
pub const PIPE_BOTTOM: &str = "pipeBottom";
pub const GOAL: &str = "goal";

pub const BIRD_POSITION: Vec2 = Vec2::new(80.0, 320.0);
pub const BIRD_SIZE: Vec2 = Vec2::new(34.0, 24.0);
pub const BIRD_MASS: f32 = 0.5;
pub const BIRD_INERTIA: f32 = 0.25;
pub const BIRD_FRAME_TIME: f32 = 0.1;

pub const GROUND_SIZE: Vec2 = Vec2::new(320.0, 80.0);
pub const GROUND_TILES: usize = 2;

pub const SCORE_POSITION: Vec2 = Vec2::new(160.0, 500.0);

pub const PIPE_SIZE: Vec2 = Vec2::new(52.0, 400.0);
pub const PIPE_GAP: f32 = 120.0;
pub const GOAL_SIZE: Vec2 = Vec2::new(8.0, PIPE_GAP);
/// The goal sits just behind the pipes so it is reached once they are cleared.
pub const GOAL_OFFSET_X: f32 = 40.0;

pub const SHAKE_STEP: f32 = 0.04;
pub const SHAKE_OFFSETS: [Vec2; 8] = [
    Vec2::new(-6.0, 0.0),
    Vec2::new(6.0, 4.0),
    Vec2::new(-4.0, -4.0),
    Vec2::new(4.0, 2.0),
    Vec2::new(-3.0, 0.0),
    Vec2::new(3.0, -2.0),
    Vec2::new(-1.0, 1.0),
    Vec2::new(1.0, 0.0),
];

// Sprites are rasterised onto half-block cells, two pixels per terminal cell.
pub const PIXEL_GLYPH: &str = "▀";
pub const BIRD_FRAMES: usize = 2;
pub const BIRD_COLOR: Color = Color::Yellow;
pub const WING_COLOR: Color = Color::Rgb(250, 250, 220);
pub const BEAK_COLOR: Color = Color::LightRed;
pub const PIPE_COLOR: Color = Color::Green;
pub const PIPE_EDGE_COLOR: Color = Color::LightGreen;
pub const GROUND_COLOR: Color = Color::Rgb(222, 216, 149);
pub const GRASS_COLOR: Color = Color::LightGreen;
/// Share of a ground tile's height drawn as grass.
pub const GRASS_DEPTH: f32 = 0.125;
pub const SKY_COLOR: Color = Color::Rgb(78, 192, 202);
pub const SCORE_COLOR: Color = Color::White;
