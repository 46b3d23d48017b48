use glam::Vec2;

use crate::{
    constants::game::*,
    engine::{NodeId, Physics, SceneGraph},
};

#[derive(Debug, Clone, PartialEq)]
pub struct Bird {
    node: NodeId,
    since_tap: f32,
}

impl Bird {
    pub fn new(node: NodeId) -> Self {
        Self { node, since_tap: 0.0 }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn since_tap(&self) -> f32 {
        self.since_tap
    }

    /// Replaces the current vertical speed with a fresh upward kick.
    pub fn flap<P: Physics + ?Sized>(&mut self, physics: &mut P) {
        let velocity = physics.velocity(self.node);
        physics.set_velocity(self.node, Vec2::new(velocity.x, 0.0));
        physics.apply_impulse(self.node, Vec2::new(0.0, FLAP_IMPULSE));
        physics.apply_angular_impulse(self.node, FLAP_ANGULAR_IMPULSE);
        self.since_tap = 0.0;
    }

    /// Caps rise speed, tilts the bird down while it free-falls and keeps the tilt in range.
    pub fn shape<S: SceneGraph + Physics + ?Sized>(&mut self, stage: &mut S, dt: f32) {
        let velocity = stage.velocity(self.node);
        if velocity.y > MAX_VERTICAL_VELOCITY {
            stage.set_velocity(self.node, Vec2::new(velocity.x, MAX_VERTICAL_VELOCITY));
        }

        if self.since_tap > FALL_TILT_DELAY {
            stage.apply_angular_impulse(self.node, FALL_ANGULAR_IMPULSE * FIXED_DELTA);
        }

        let rotation =
            stage.rotation(self.node).clamp(MIN_ROTATION_DEGREES.to_radians(), MAX_ROTATION_DEGREES.to_radians());
        stage.set_rotation(self.node, rotation);

        let angular_velocity = stage.angular_velocity(self.node).clamp(-MAX_ANGULAR_VELOCITY, MAX_ANGULAR_VELOCITY);
        stage.set_angular_velocity(self.node, angular_velocity);

        self.since_tap += dt;
    }

    pub fn die<S: SceneGraph + Physics + ?Sized>(&self, stage: &mut S) {
        stage.set_allows_rotation(self.node, false);
        stage.set_angular_velocity(self.node, 0.0);
        stage.remove_all_actions(self.node);
    }
}
