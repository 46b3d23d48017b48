//! Engine-agnostic game rules: bird dynamics, the ground conveyor, pipe spawning and the
//! session lifecycle. Everything here reaches the scene through [`crate::engine::Stage`].

mod bird;
mod effects;
mod pipes;
mod scroll;
mod session;
mod state;
#[cfg(test)]
pub(crate) mod testing;

pub use self::{
    bird::Bird,
    effects::{Effect, EffectDispatcher},
    pipes::PipeLayer,
    scroll::ScrollLayer,
    session::Session,
    state::GameState,
};
