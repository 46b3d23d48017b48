use color_eyre::eyre::{eyre, Result};
use glam::Vec2;
use tracing::{debug, info};

use super::{
    action::NodeAction,
    node::{Node, NodeId, NodeKind, SceneTree, Sprite},
    physics::{Category, Contact, PhysicsBody, PhysicsBodyBuilder, PhysicsWorld},
    Physics, Presenter, SceneGraph, Template,
};
use crate::constants::{game::FIXED_DELTA, scene::*};

/// The concrete stage: the authored scene plus its physics simulation.
#[derive(Debug, Clone)]
pub struct World {
    tree: SceneTree,
    physics: PhysicsWorld,
    restart_requested: bool,
}

impl World {
    /// Builds the authored scene: pipe layer, scrolling ground, bird and score label.
    pub fn new() -> Result<Self> {
        let mut tree = SceneTree::new(SCENE_SIZE);

        tree.insert(Node::container(PIPE_LAYER), SceneTree::ROOT);

        let scroll_layer = tree.insert(Node::container(SCROLL_LAYER), SceneTree::ROOT);
        for i in 0..GROUND_TILES {
            let body = PhysicsBodyBuilder::default().category(Category::GROUND).build()?;
            let x = GROUND_SIZE.x * (i as f32 + 0.5);
            let tile = Node::sprite(GROUND, Sprite::Ground, GROUND_SIZE).at(Vec2::new(x, GROUND_SIZE.y / 2.0));
            tree.insert(tile.with_body(body), scroll_layer);
        }

        let reference = tree.insert(Node::container(BIRD_REFERENCE).at(BIRD_POSITION), SceneTree::ROOT);
        let body = PhysicsBodyBuilder::default()
            .dynamic(true)
            .mass(BIRD_MASS)
            .inertia(BIRD_INERTIA)
            .category(Category::BIRD)
            .collision(Category::GROUND)
            .contact_test(Category::OBSTACLE | Category::GROUND | Category::GOAL)
            .build()?;
        let bird = Node::sprite(BIRD, Sprite::Bird, BIRD_SIZE)
            .with_body(body)
            .with_action(NodeAction::animate(BIRD_FRAMES, BIRD_FRAME_TIME));
        tree.insert(bird, reference);

        tree.insert(Node::label(SCORE_LABEL, "0").at(SCORE_POSITION), SceneTree::ROOT);

        debug!(nodes = tree.len(), "scene loaded");
        Ok(Self { tree, physics: PhysicsWorld::new(GRAVITY), restart_requested: false })
    }

    pub fn tree(&self) -> &SceneTree {
        &self.tree
    }

    /// Runs node actions, then the physics step. Returns the contacts that began.
    pub fn step(&mut self, dt: f32) -> Vec<Contact> {
        self.tree.run_actions(dt);
        self.physics.step(&mut self.tree, dt)
    }

    pub fn frame(&mut self) -> Vec<Contact> {
        self.step(FIXED_DELTA)
    }

    pub fn run_action(&mut self, node: NodeId, action: NodeAction) {
        if let Some(node) = self.tree.get_mut(node) {
            node.actions.push(action);
        }
    }

    pub fn take_restart_request(&mut self) -> bool {
        std::mem::take(&mut self.restart_requested)
    }

    fn obstacle(&mut self, parent: NodeId) -> Result<NodeId> {
        let obstacle = self.tree.insert(Node::container(OBSTACLE), parent);

        let offset = (PIPE_GAP + PIPE_SIZE.y) / 2.0;
        for (name, y) in [(PIPE_TOP, offset), (PIPE_BOTTOM, -offset)] {
            let body = PhysicsBodyBuilder::default().category(Category::OBSTACLE).build()?;
            let pipe = Node::sprite(name, Sprite::Pipe, PIPE_SIZE).at(Vec2::new(0.0, y)).with_body(body);
            self.tree.insert(pipe, obstacle);
        }

        let body = PhysicsBodyBuilder::default().category(Category::GOAL).build()?;
        let goal = Node::sprite(GOAL, Sprite::Invisible, GOAL_SIZE).at(Vec2::new(GOAL_OFFSET_X, 0.0)).with_body(body);
        self.tree.insert(goal, obstacle);

        Ok(obstacle)
    }

    fn body(&self, node: NodeId) -> Option<&PhysicsBody> {
        self.tree.get(node).and_then(|node| node.body.as_ref())
    }

    fn body_mut(&mut self, node: NodeId) -> Option<&mut PhysicsBody> {
        self.tree.get_mut(node).and_then(|node| node.body.as_mut())
    }
}

impl SceneGraph for World {
    fn find_node(&self, path: &str) -> Option<NodeId> {
        self.tree.find(path)
    }

    fn name(&self, node: NodeId) -> Option<&str> {
        self.tree.get(node).and_then(|node| node.name.as_deref())
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.tree.children(node).to_vec()
    }

    fn root_children(&self) -> Vec<NodeId> {
        self.tree.children(SceneTree::ROOT).to_vec()
    }

    fn position(&self, node: NodeId) -> Vec2 {
        self.tree.get(node).map(|node| node.position).unwrap_or_default()
    }

    fn set_position(&mut self, node: NodeId, position: Vec2) {
        if let Some(node) = self.tree.get_mut(node) {
            node.position = position;
        }
    }

    fn size(&self, node: NodeId) -> Vec2 {
        self.tree.get(node).map(|node| node.size).unwrap_or_default()
    }

    fn rotation(&self, node: NodeId) -> f32 {
        self.tree.get(node).map(|node| node.rotation).unwrap_or_default()
    }

    fn set_rotation(&mut self, node: NodeId, rotation: f32) {
        if let Some(node) = self.tree.get_mut(node) {
            node.rotation = rotation;
        }
    }

    fn scene_size(&self) -> Vec2 {
        self.tree.size()
    }

    fn convert_to_scene(&self, point: Vec2, from: NodeId) -> Vec2 {
        point + self.tree.origin(from)
    }

    fn convert_from_scene(&self, point: Vec2, to: NodeId) -> Vec2 {
        point - self.tree.origin(to)
    }

    fn instantiate(&mut self, template: Template, parent: NodeId) -> Result<NodeId> {
        if !self.tree.contains(parent) {
            return Err(eyre!("cannot instantiate {template}: parent {parent:?} is not in the scene"));
        }
        match template {
            Template::Obstacle => self.obstacle(parent),
        }
    }

    fn remove_from_parent(&mut self, node: NodeId) {
        self.tree.remove(node);
    }

    fn remove_all_actions(&mut self, node: NodeId) {
        if let Some(node) = self.tree.get_mut(node) {
            node.actions.clear();
            node.offset = Vec2::ZERO;
        }
    }

    fn set_text(&mut self, node: NodeId, text: String) {
        if let Some(NodeKind::Label(label)) = self.tree.get_mut(node).map(|node| &mut node.kind) {
            *label = text;
        }
    }
}

impl Physics for World {
    fn has_body(&self, node: NodeId) -> bool {
        self.body(node).is_some()
    }

    fn velocity(&self, node: NodeId) -> Vec2 {
        self.body(node).map(|body| body.velocity).unwrap_or_default()
    }

    fn set_velocity(&mut self, node: NodeId, velocity: Vec2) {
        if let Some(body) = self.body_mut(node) {
            body.velocity = velocity;
        }
    }

    fn angular_velocity(&self, node: NodeId) -> f32 {
        self.body(node).map(|body| body.angular_velocity).unwrap_or_default()
    }

    fn set_angular_velocity(&mut self, node: NodeId, angular_velocity: f32) {
        if let Some(body) = self.body_mut(node) {
            body.angular_velocity = angular_velocity;
        }
    }

    fn apply_impulse(&mut self, node: NodeId, impulse: Vec2) {
        if let Some(body) = self.body_mut(node) {
            body.apply_impulse(impulse);
        }
    }

    fn apply_angular_impulse(&mut self, node: NodeId, impulse: f32) {
        if let Some(body) = self.body_mut(node) {
            body.apply_angular_impulse(impulse);
        }
    }

    fn set_allows_rotation(&mut self, node: NodeId, allows_rotation: bool) {
        if let Some(body) = self.body_mut(node) {
            body.allows_rotation = allows_rotation;
        }
    }

    fn set_collision_mask(&mut self, node: NodeId, mask: Category) {
        if let Some(body) = self.body_mut(node) {
            body.collision = mask;
        }
    }
}

impl Presenter for World {
    fn present_new_session(&mut self) {
        info!("new session requested");
        self.restart_requested = true;
    }
}
