mod game;

use serde::Deserialize;
use strum::Display;

pub use crate::action::game::GameAction;

#[derive(Debug, Clone, PartialEq, Eq, Display, Deserialize, Default)]
pub enum ActionState {
    #[default]
    Start,
    Repeat,
    End,
}

#[derive(Debug, Clone, PartialEq, Eq, Display, Deserialize)]
pub enum Command {
    Tick,
    Render,
    Resize(u16, u16),
    Suspend,
    Resume,
    Quit,
    Error(String),
    ToggleShowHelp,
    // Page commands
    Game(GameAction),
}

impl Command {
    /// Name shown to the player, e.g. in the help overlay.
    pub fn label(&self) -> String {
        match self {
            Command::Game(action) => action.to_string(),
            command => command.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub command: Command,
    pub state: ActionState,
}

/// Wraps a command into an [`Action`], defaulting to [`ActionState::Start`].
macro_rules! act {
    ($command:expr) => {
        $crate::action::Action { command: $command, state: $crate::action::ActionState::default() }
    };
    ($command:expr, $state:expr) => {
        $crate::action::Action { command: $command, state: $state }
    };
}

pub(crate) use act;

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_act_defaults_to_start() {
        let action = act!(Command::Game(GameAction::Flap));
        assert_eq!(action.state, ActionState::Start);
        assert_eq!(action.command, Command::Game(GameAction::Flap));
    }

    #[test]
    fn test_command_from_yaml() {
        let command: Command = serde_yaml::from_str("Quit").unwrap();
        assert_eq!(command, Command::Quit);
        let action: GameAction = serde_yaml::from_str("Flap").unwrap();
        assert_eq!(action, GameAction::Flap);
    }

    #[test]
    fn test_command_label() {
        assert_eq!(Command::ToggleShowHelp.label(), "ToggleShowHelp");
        assert_eq!(Command::Game(GameAction::Flap).label(), "Flap");
    }
}
