//! A small 2D scene/physics stage. The game session only talks to it through the
//! [`SceneGraph`], [`Physics`] and [`Presenter`] traits.

mod action;
mod audio;
mod node;
mod physics;
mod world;

use color_eyre::eyre::Result;
use glam::Vec2;
use strum::Display;

pub use self::{
    action::NodeAction,
    audio::{Audio, Sound, TerminalAudio},
    node::{Node, NodeId, NodeKind, SceneTree, Sprite},
    physics::{Aabb, Category, Contact, PhysicsBody, PhysicsBodyBuilder, PhysicsWorld},
    world::World,
};

/// Authored resources that can be instantiated at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Template {
    Obstacle,
}

/// Node lookup, hierarchy and coordinate spaces.
///
/// Unknown handles read as zero and writes to them are ignored.
pub trait SceneGraph {
    /// Finds a top-level node by name, or any descendant with a `//name` path.
    fn find_node(&self, path: &str) -> Option<NodeId>;
    fn name(&self, node: NodeId) -> Option<&str>;
    fn children(&self, node: NodeId) -> Vec<NodeId>;
    /// Direct children of the scene itself.
    fn root_children(&self) -> Vec<NodeId>;

    fn position(&self, node: NodeId) -> Vec2;
    fn set_position(&mut self, node: NodeId, position: Vec2);
    fn size(&self, node: NodeId) -> Vec2;
    fn rotation(&self, node: NodeId) -> f32;
    fn set_rotation(&mut self, node: NodeId, rotation: f32);
    fn scene_size(&self) -> Vec2;

    /// Converts a point expressed in `from`'s coordinate space into scene space.
    fn convert_to_scene(&self, point: Vec2, from: NodeId) -> Vec2;
    /// Converts a scene-space point into `to`'s coordinate space.
    fn convert_from_scene(&self, point: Vec2, to: NodeId) -> Vec2;

    fn instantiate(&mut self, template: Template, parent: NodeId) -> Result<NodeId>;
    fn remove_from_parent(&mut self, node: NodeId);
    fn remove_all_actions(&mut self, node: NodeId);
    fn set_text(&mut self, node: NodeId, text: String);
}

/// Bodies attached to scene nodes.
pub trait Physics {
    fn has_body(&self, node: NodeId) -> bool;
    fn velocity(&self, node: NodeId) -> Vec2;
    fn set_velocity(&mut self, node: NodeId, velocity: Vec2);
    fn angular_velocity(&self, node: NodeId) -> f32;
    fn set_angular_velocity(&mut self, node: NodeId, angular_velocity: f32);
    fn apply_impulse(&mut self, node: NodeId, impulse: Vec2);
    fn apply_angular_impulse(&mut self, node: NodeId, impulse: f32);
    fn set_allows_rotation(&mut self, node: NodeId, allows_rotation: bool);
    fn set_collision_mask(&mut self, node: NodeId, mask: Category);
}

/// Replaces the displayed session.
pub trait Presenter {
    fn present_new_session(&mut self);
}

pub trait Stage: SceneGraph + Physics + Presenter {}

impl<T: SceneGraph + Physics + Presenter> Stage for T {}
