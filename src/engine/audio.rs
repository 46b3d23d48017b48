use std::io::{stdout, Write};

use strum::{AsRefStr, Display};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
pub enum Sound {
    #[strum(serialize = "sfx_flap")]
    Flap,
}

/// Fire-and-forget sound playback.
pub trait Audio {
    fn play(&mut self, sound: Sound);
}

/// Terminals have no mixer; a sound is logged and optionally rung on the bell.
#[derive(Debug, Clone, Default)]
pub struct TerminalAudio {
    bell: bool,
}

impl TerminalAudio {
    pub fn new(bell: bool) -> Self {
        Self { bell }
    }
}

impl Audio for TerminalAudio {
    fn play(&mut self, sound: Sound) {
        debug!(%sound, "play");
        if !self.bell {
            return;
        }
        let mut out = stdout();
        if let Err(err) = out.write_all(b"\x07").and_then(|_| out.flush()) {
            warn!(%sound, "bell failed: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_sound_resource_name() {
        assert_eq!(Sound::Flap.to_string(), "sfx_flap");
        assert_eq!(Sound::Flap.as_ref(), "sfx_flap");
    }
}
