//! In-memory stage used to drive a [`Session`](super::Session) without the engine.

use std::collections::BTreeMap;

use color_eyre::eyre::{bail, eyre, Result};
use glam::Vec2;

use crate::{
    constants::scene::*,
    engine::{Category, NodeId, Physics, Presenter, SceneGraph, Template},
};

#[derive(Debug, Clone)]
pub struct FakeNode {
    pub name: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub position: Vec2,
    pub size: Vec2,
    pub rotation: f32,
    pub body: bool,
    pub velocity: Vec2,
    pub angular_velocity: f32,
    pub allows_rotation: bool,
    pub collision_mask: Category,
    pub running_actions: bool,
    pub text: String,
}

impl FakeNode {
    fn new(name: &str, position: Vec2, size: Vec2) -> Self {
        Self {
            name: name.to_string(),
            parent: None,
            children: Vec::new(),
            position,
            size,
            rotation: 0.0,
            body: false,
            velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            allows_rotation: true,
            collision_mask: Category::empty(),
            running_actions: false,
            text: String::new(),
        }
    }

    fn with_body(self) -> Self {
        Self { body: true, ..self }
    }
}

/// Unit mass and inertia, translation-only coordinate spaces and no simulation of its own.
#[derive(Debug, Clone)]
pub struct FakeStage {
    nodes: BTreeMap<NodeId, FakeNode>,
    next: usize,
    pub pipe_layer: NodeId,
    pub scroll_layer: NodeId,
    pub bird: NodeId,
    pub score_label: NodeId,
    pub tiles: Vec<NodeId>,
    pub presented: usize,
    pub instantiated: usize,
    pub fail_templates: bool,
}

impl FakeStage {
    const ROOT: NodeId = NodeId(0);

    pub fn new() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(Self::ROOT, FakeNode::new("", Vec2::ZERO, SCENE_SIZE));
        let mut stage = Self {
            nodes,
            next: 1,
            pipe_layer: Self::ROOT,
            scroll_layer: Self::ROOT,
            bird: Self::ROOT,
            score_label: Self::ROOT,
            tiles: Vec::new(),
            presented: 0,
            instantiated: 0,
            fail_templates: false,
        };

        stage.pipe_layer = stage.add(Self::ROOT, FakeNode::new(PIPE_LAYER, Vec2::ZERO, Vec2::ZERO));
        stage.scroll_layer = stage.add(Self::ROOT, FakeNode::new(SCROLL_LAYER, Vec2::ZERO, Vec2::ZERO));
        for i in 0..GROUND_TILES {
            let at = Vec2::new(GROUND_SIZE.x * (i as f32 + 0.5), GROUND_SIZE.y / 2.0);
            let tile = stage.add(stage.scroll_layer, FakeNode::new(GROUND, at, GROUND_SIZE).with_body());
            stage.tiles.push(tile);
        }
        let reference = stage.add(Self::ROOT, FakeNode::new(BIRD_REFERENCE, BIRD_POSITION, Vec2::ZERO));
        let mut bird = FakeNode::new(BIRD, Vec2::ZERO, BIRD_SIZE).with_body();
        bird.collision_mask = Category::GROUND;
        bird.running_actions = true;
        stage.bird = stage.add(reference, bird);
        let mut label = FakeNode::new(SCORE_LABEL, SCORE_POSITION, Vec2::ZERO);
        label.text = "0".to_string();
        stage.score_label = stage.add(Self::ROOT, label);
        stage
    }

    /// Drops every node named `name` together with its subtree.
    pub fn without(mut self, name: &str) -> Self {
        let doomed: Vec<NodeId> =
            self.nodes.iter().filter(|(_, node)| node.name == name).map(|(id, _)| *id).collect();
        for id in doomed {
            self.remove_from_parent(id);
        }
        self
    }

    pub fn node(&self, id: NodeId) -> &FakeNode {
        &self.nodes[&id]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut FakeNode {
        self.nodes.get_mut(&id).expect("unknown node")
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(|node| node.parent)
    }

    pub fn child_named(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.children(parent).into_iter().find(|child| self.name(*child) == Some(name))
    }

    fn add(&mut self, parent: NodeId, mut node: FakeNode) -> NodeId {
        let id = NodeId(self.next);
        self.next += 1;
        node.parent = Some(parent);
        self.nodes.insert(id, node);
        if let Some(parent) = self.nodes.get_mut(&parent) {
            parent.children.push(id);
        }
        id
    }

    fn origin(&self, id: NodeId) -> Vec2 {
        let mut origin = Vec2::ZERO;
        let mut current = Some(id);
        while let Some(node) = current.and_then(|id| self.nodes.get(&id)) {
            origin += node.position;
            current = node.parent;
        }
        origin
    }

    fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut found = Vec::new();
        for child in self.children(id) {
            found.push(child);
            found.extend(self.descendants(child));
        }
        found
    }
}

impl SceneGraph for FakeStage {
    fn find_node(&self, path: &str) -> Option<NodeId> {
        match path.strip_prefix("//") {
            Some(name) => self.descendants(Self::ROOT).into_iter().find(|id| self.name(*id) == Some(name)),
            None => self.child_named(Self::ROOT, path),
        }
    }

    fn name(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(&node).map(|node| node.name.as_str())
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes.get(&node).map(|node| node.children.clone()).unwrap_or_default()
    }

    fn root_children(&self) -> Vec<NodeId> {
        self.children(Self::ROOT)
    }

    fn position(&self, node: NodeId) -> Vec2 {
        self.nodes.get(&node).map(|node| node.position).unwrap_or_default()
    }

    fn set_position(&mut self, node: NodeId, position: Vec2) {
        self.node_mut(node).position = position;
    }

    fn size(&self, node: NodeId) -> Vec2 {
        self.nodes.get(&node).map(|node| node.size).unwrap_or_default()
    }

    fn rotation(&self, node: NodeId) -> f32 {
        self.nodes.get(&node).map(|node| node.rotation).unwrap_or_default()
    }

    fn set_rotation(&mut self, node: NodeId, rotation: f32) {
        self.node_mut(node).rotation = rotation;
    }

    fn scene_size(&self) -> Vec2 {
        self.size(Self::ROOT)
    }

    fn convert_to_scene(&self, point: Vec2, from: NodeId) -> Vec2 {
        point + self.origin(from)
    }

    fn convert_from_scene(&self, point: Vec2, to: NodeId) -> Vec2 {
        point - self.origin(to)
    }

    fn instantiate(&mut self, template: Template, parent: NodeId) -> Result<NodeId> {
        if self.fail_templates {
            bail!("template {template} is unavailable");
        }
        if !self.contains(parent) {
            return Err(eyre!("no parent {parent:?}"));
        }
        self.instantiated += 1;
        let obstacle = self.add(parent, FakeNode::new(OBSTACLE, Vec2::ZERO, Vec2::ZERO));
        let offset = (PIPE_GAP + PIPE_SIZE.y) / 2.0;
        self.add(obstacle, FakeNode::new(PIPE_TOP, Vec2::new(0.0, offset), PIPE_SIZE).with_body());
        self.add(obstacle, FakeNode::new(PIPE_BOTTOM, Vec2::new(0.0, -offset), PIPE_SIZE).with_body());
        self.add(obstacle, FakeNode::new(GOAL, Vec2::new(GOAL_OFFSET_X, 0.0), GOAL_SIZE).with_body());
        Ok(obstacle)
    }

    fn remove_from_parent(&mut self, node: NodeId) {
        if let Some(parent) = self.parent(node) {
            self.node_mut(parent).children.retain(|child| *child != node);
        }
        for id in self.descendants(node) {
            self.nodes.remove(&id);
        }
        self.nodes.remove(&node);
    }

    fn remove_all_actions(&mut self, node: NodeId) {
        self.node_mut(node).running_actions = false;
    }

    fn set_text(&mut self, node: NodeId, text: String) {
        self.node_mut(node).text = text;
    }
}

impl Physics for FakeStage {
    fn has_body(&self, node: NodeId) -> bool {
        self.nodes.get(&node).is_some_and(|node| node.body)
    }

    fn velocity(&self, node: NodeId) -> Vec2 {
        self.nodes.get(&node).map(|node| node.velocity).unwrap_or_default()
    }

    fn set_velocity(&mut self, node: NodeId, velocity: Vec2) {
        self.node_mut(node).velocity = velocity;
    }

    fn angular_velocity(&self, node: NodeId) -> f32 {
        self.nodes.get(&node).map(|node| node.angular_velocity).unwrap_or_default()
    }

    fn set_angular_velocity(&mut self, node: NodeId, angular_velocity: f32) {
        self.node_mut(node).angular_velocity = angular_velocity;
    }

    fn apply_impulse(&mut self, node: NodeId, impulse: Vec2) {
        self.node_mut(node).velocity += impulse;
    }

    fn apply_angular_impulse(&mut self, node: NodeId, impulse: f32) {
        let node = self.node_mut(node);
        if node.allows_rotation {
            node.angular_velocity += impulse;
        }
    }

    fn set_allows_rotation(&mut self, node: NodeId, allows_rotation: bool) {
        self.node_mut(node).allows_rotation = allows_rotation;
    }

    fn set_collision_mask(&mut self, node: NodeId, mask: Category) {
        self.node_mut(node).collision_mask = mask;
    }
}

impl Presenter for FakeStage {
    fn present_new_session(&mut self) {
        self.presented += 1;
    }
}
