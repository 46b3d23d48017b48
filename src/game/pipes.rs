use color_eyre::eyre::Result;
use glam::Vec2;
use rand::{rngs::StdRng, Rng};
use tracing::debug;

use crate::{
    constants::game::{SPAWN_INTERVAL, SPAWN_X, SPAWN_Y, TIME_EPSILON},
    engine::{NodeId, SceneGraph, Template},
};

#[derive(Debug, Clone)]
pub struct PipeLayer {
    node: NodeId,
    timer: f32,
    rng: StdRng,
}

impl PipeLayer {
    pub fn new(node: NodeId, rng: StdRng) -> Self {
        Self { node, timer: 0.0, rng }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn timer(&self) -> f32 {
        self.timer
    }

    /// Slides the layer, drops obstacles that left the screen and spawns a new one when
    /// the timer runs out. Returns the spawned obstacle, if any.
    pub fn advance<S: SceneGraph + ?Sized>(&mut self, scene: &mut S, dx: f32, dt: f32) -> Result<Option<NodeId>> {
        let position = scene.position(self.node);
        scene.set_position(self.node, position - Vec2::new(dx, 0.0));

        for obstacle in scene.children(self.node) {
            if scene.convert_to_scene(scene.position(obstacle), self.node).x <= 0.0 {
                scene.remove_from_parent(obstacle);
                debug!(?obstacle, "obstacle removed");
            }
        }

        self.timer += dt;
        if self.timer < SPAWN_INTERVAL - TIME_EPSILON {
            return Ok(None);
        }
        self.timer = 0.0;

        let at = Vec2::new(SPAWN_X, self.rng.gen_range(SPAWN_Y));
        let obstacle = scene.instantiate(Template::Obstacle, self.node)?;
        let local = scene.convert_from_scene(at, self.node);
        scene.set_position(obstacle, local);
        debug!(?obstacle, y = at.y, "obstacle spawned");
        Ok(Some(obstacle))
    }
}
