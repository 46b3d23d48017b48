use color_eyre::eyre::{bail, Result};
use tracing::debug;

use crate::{
    constants::game::DEATH_ROTATION_DEGREES,
    engine::{Audio, Category, NodeAction, Physics, SceneGraph, World},
    game::{Effect, EffectDispatcher},
};

/// Plays session effects on the live world.
pub struct StageEffects<'a> {
    world: &'a mut World,
    audio: &'a mut dyn Audio,
}

impl<'a> StageEffects<'a> {
    pub fn new(world: &'a mut World, audio: &'a mut dyn Audio) -> Self {
        Self { world, audio }
    }
}

impl EffectDispatcher for StageEffects<'_> {
    fn dispatch(&mut self, effect: Effect) -> Result<()> {
        match effect {
            Effect::Sound(sound) => self.audio.play(sound),
            Effect::DeathPose { bird } => {
                if !self.world.has_body(bird) {
                    bail!("death pose for {bird:?} which has no physics body");
                }
                self.world.set_rotation(bird, DEATH_ROTATION_DEGREES.to_radians());
                self.world.set_collision_mask(bird, Category::empty());
            },
            Effect::Shake { nodes } => {
                debug!(nodes = nodes.len(), "shake");
                for node in nodes {
                    self.world.run_action(node, NodeAction::shake());
                }
            },
        }
        Ok(())
    }
}
