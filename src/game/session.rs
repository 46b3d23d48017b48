use color_eyre::eyre::{bail, eyre, Result};
use rand::rngs::StdRng;
use tracing::{debug, info, trace};

use super::{Bird, Effect, GameState, PipeLayer, ScrollLayer};
use crate::{
    constants::{
        game::{FIXED_DELTA, SCROLL_SPEED},
        scene::{BIRD, GOAL, GROUND, PIPE_LAYER, SCORE_LABEL, SCROLL_LAYER},
    },
    engine::{Contact, NodeId, Physics, SceneGraph, Sound, Stage},
};

/// One play session over a stage. Every node it touches is resolved up front.
#[derive(Debug, Clone)]
pub struct Session {
    state: GameState,
    score: u32,
    bird: Bird,
    scroll: ScrollLayer,
    pipes: PipeLayer,
    score_label: NodeId,
    effects: Vec<Effect>,
}

impl Session {
    pub fn new<S: SceneGraph + Physics + ?Sized>(stage: &S, rng: StdRng) -> Result<Self> {
        let pipe_layer = lookup(stage, PIPE_LAYER)?;
        let scroll_layer = lookup(stage, SCROLL_LAYER)?;
        let bird = lookup(stage, &format!("//{BIRD}"))?;
        if !stage.has_body(bird) {
            bail!("{BIRD} has no physics body");
        }
        let score_label = lookup(stage, SCORE_LABEL)?;
        let tiles: Vec<NodeId> =
            stage.children(scroll_layer).into_iter().filter(|tile| stage.name(*tile) == Some(GROUND)).collect();

        info!(tiles = tiles.len(), "session started");
        Ok(Self {
            state: GameState::Active,
            score: 0,
            bird: Bird::new(bird),
            scroll: ScrollLayer::new(scroll_layer, tiles),
            pipes: PipeLayer::new(pipe_layer, rng),
            score_label,
            effects: Vec::new(),
        })
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn bird(&self) -> &Bird {
        &self.bird
    }

    pub fn tap<S: Stage + ?Sized>(&mut self, stage: &mut S) {
        match self.state {
            GameState::Active => {
                self.bird.flap(stage);
                self.effects.push(Effect::Sound(Sound::Flap));
            },
            GameState::GameOver => {
                info!(score = self.score, "restarting");
                self.state = GameState::Wait;
                stage.present_new_session();
            },
            GameState::Wait => trace!("tap ignored while waiting for a new session"),
        }
    }

    /// Advances one fixed-timestep frame. Does nothing unless the session is active.
    pub fn update<S: Stage + ?Sized>(&mut self, stage: &mut S) -> Result<()> {
        if self.state != GameState::Active {
            return Ok(());
        }

        self.bird.shape(stage, FIXED_DELTA);
        let dx = SCROLL_SPEED * FIXED_DELTA;
        self.scroll.scroll(stage, dx);
        self.pipes.advance(stage, dx, FIXED_DELTA)?;
        Ok(())
    }

    pub fn on_contact<S: Stage + ?Sized>(&mut self, stage: &mut S, contact: Contact) {
        if self.state != GameState::Active {
            return;
        }

        if [contact.a, contact.b].into_iter().any(|node| stage.name(node) == Some(GOAL)) {
            self.score += 1;
            stage.set_text(self.score_label, self.score.to_string());
            debug!(score = self.score, "scored");
            return;
        }

        info!(score = self.score, "game over");
        self.state = GameState::GameOver;
        self.bird.die(stage);
        self.effects.push(Effect::DeathPose { bird: self.bird.node() });
        self.effects.push(Effect::Shake { nodes: stage.root_children() });
    }

    pub fn drain_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }
}

fn lookup<S: SceneGraph + ?Sized>(stage: &S, path: &str) -> Result<NodeId> {
    stage.find_node(path).ok_or_else(|| eyre!("scene has no node at {path}"))
}
