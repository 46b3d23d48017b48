pub mod game;
pub mod scene;

/// Smallest terminal area the scene can be drawn into.
pub const MIN_WIDTH: u16 = 30;
pub const MIN_HEIGHT: u16 = 24;

pub const TITLE: &str = " Flappy ";
