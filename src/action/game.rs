use serde::Deserialize;
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Deserialize)]
pub enum GameAction {
    /// Tap: flap while playing, start a new session after game over.
    Flap,
}
