use strum::Display;

/// Lifecycle of one play session. Only `Active` runs any frame logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum GameState {
    #[default]
    Active,
    GameOver,
    /// A replacement session has been requested; this one is about to be dropped.
    Wait,
}
