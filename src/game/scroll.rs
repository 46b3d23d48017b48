use glam::Vec2;
use tracing::trace;

use crate::engine::{NodeId, SceneGraph};

/// Endless ground: a fixed set of tiles leapfrogging each other as the layer slides left.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollLayer {
    node: NodeId,
    tiles: Vec<NodeId>,
}

impl ScrollLayer {
    pub fn new(node: NodeId, tiles: Vec<NodeId>) -> Self {
        Self { node, tiles }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn tiles(&self) -> &[NodeId] {
        &self.tiles
    }

    pub fn scroll<S: SceneGraph + ?Sized>(&self, scene: &mut S, dx: f32) {
        let position = scene.position(self.node);
        scene.set_position(self.node, position - Vec2::new(dx, 0.0));

        let scene_width = scene.scene_size().x;
        for tile in &self.tiles {
            let width = scene.size(*tile).x;
            let at = scene.convert_to_scene(scene.position(*tile), self.node);
            if at.x <= -width / 2.0 {
                let target = Vec2::new(scene_width / 2.0 + width, at.y);
                scene.set_position(*tile, scene.convert_from_scene(target, self.node));
                trace!(?tile, x = target.x, "ground tile recycled");
            }
        }
    }
}
