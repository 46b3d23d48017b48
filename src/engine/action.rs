use glam::Vec2;

use super::node::Node;
use crate::constants::scene::{SHAKE_OFFSETS, SHAKE_STEP};

/// Timed behaviour attached to a node and advanced by the stage every frame.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeAction {
    /// Cycles through `frames` texture frames forever.
    Animate { frames: usize, frame_time: f32, elapsed: f32 },
    /// Jitters the node's render offset, then settles back to zero.
    Shake { elapsed: f32 },
}

impl NodeAction {
    pub fn animate(frames: usize, frame_time: f32) -> Self {
        Self::Animate { frames, frame_time, elapsed: 0.0 }
    }

    pub fn shake() -> Self {
        Self::Shake { elapsed: 0.0 }
    }

    /// Advances the action by `dt`. Returns `false` once it has finished.
    pub fn step(&mut self, node: &mut Node, dt: f32) -> bool {
        match self {
            Self::Animate { frames, frame_time, elapsed } => {
                if *frames == 0 || *frame_time <= 0.0 {
                    return false;
                }
                *elapsed += dt;
                node.frame = (*elapsed / *frame_time) as usize % *frames;
                true
            },
            Self::Shake { elapsed } => {
                *elapsed += dt;
                match SHAKE_OFFSETS.get((*elapsed / SHAKE_STEP) as usize) {
                    Some(offset) => {
                        node.offset = *offset;
                        true
                    },
                    None => {
                        node.offset = Vec2::ZERO;
                        false
                    },
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::engine::node::Sprite;

    #[test]
    fn test_animate_wraps_frames() {
        let mut node = Node::sprite("bird", Sprite::Bird, Vec2::ONE);
        let mut action = NodeAction::animate(2, 0.1);
        assert!(action.step(&mut node, 0.15));
        assert_eq!(node.frame, 1);
        assert!(action.step(&mut node, 0.1));
        assert_eq!(node.frame, 0);
    }

    #[test]
    fn test_shake_settles() {
        let mut node = Node::container("layer");
        let mut action = NodeAction::shake();
        assert!(action.step(&mut node, 0.01));
        assert_eq!(node.offset, SHAKE_OFFSETS[0]);

        let mut steps = 0;
        while action.step(&mut node, 1.0 / 60.0) {
            steps += 1;
            assert!(steps < 60);
        }
        assert_eq!(node.offset, Vec2::ZERO);
    }
}
