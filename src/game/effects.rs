use color_eyre::eyre::Result;

use crate::engine::{NodeId, Sound};

/// One-shot presentation intents queued by the session and played by the stage owner.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Sound(Sound),
    /// Tip the dead bird nose-down and let it drop through everything.
    DeathPose { bird: NodeId },
    Shake { nodes: Vec<NodeId> },
}

pub trait EffectDispatcher {
    fn dispatch(&mut self, effect: Effect) -> Result<()>;

    fn dispatch_all(&mut self, effects: Vec<Effect>) -> Result<()> {
        effects.into_iter().try_for_each(|effect| self.dispatch(effect))
    }
}
