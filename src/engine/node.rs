use glam::Vec2;

use super::{action::NodeAction, physics::PhysicsBody};

/// Handle to a node in a [`SceneTree`]. Handles are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sprite {
    Bird,
    Pipe,
    Ground,
    Invisible,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Container,
    Sprite(Sprite),
    Label(String),
}

#[derive(Debug, Clone)]
pub struct Node {
    pub name: Option<String>,
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Translation relative to the parent.
    pub position: Vec2,
    pub size: Vec2,
    pub rotation: f32,
    pub body: Option<PhysicsBody>,
    pub actions: Vec<NodeAction>,
    /// Render-only displacement written by running actions.
    pub offset: Vec2,
    pub frame: usize,
}

impl Node {
    fn new(name: Option<&str>, kind: NodeKind, size: Vec2) -> Self {
        Self {
            name: name.map(str::to_string),
            kind,
            parent: None,
            children: Vec::new(),
            position: Vec2::ZERO,
            size,
            rotation: 0.0,
            body: None,
            actions: Vec::new(),
            offset: Vec2::ZERO,
            frame: 0,
        }
    }

    pub fn container(name: &str) -> Self {
        Self::new(Some(name), NodeKind::Container, Vec2::ZERO)
    }

    pub fn sprite(name: &str, sprite: Sprite, size: Vec2) -> Self {
        Self::new(Some(name), NodeKind::Sprite(sprite), size)
    }

    pub fn label(name: &str, text: &str) -> Self {
        Self::new(Some(name), NodeKind::Label(text.to_string()), Vec2::ZERO)
    }

    pub fn at(self, position: Vec2) -> Self {
        Self { position, ..self }
    }

    pub fn with_body(self, body: PhysicsBody) -> Self {
        Self { body: Some(body), ..self }
    }

    pub fn with_action(mut self, action: NodeAction) -> Self {
        self.actions.push(action);
        self
    }

    pub fn is_named(&self, name: &str) -> bool {
        self.name.as_deref() == Some(name)
    }
}

/// Arena-backed scene graph. Slot 0 is the scene itself, anchored at the origin.
#[derive(Debug, Clone)]
pub struct SceneTree {
    nodes: Vec<Option<Node>>,
}

impl SceneTree {
    pub const ROOT: NodeId = NodeId(0);

    pub fn new(size: Vec2) -> Self {
        let root = Node::new(None, NodeKind::Container, size);
        Self { nodes: vec![Some(root)] }
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0).and_then(Option::as_mut)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn size(&self) -> Vec2 {
        self.get(Self::ROOT).map(|root| root.size).unwrap_or_default()
    }

    /// Attaches `node` as the last child of `parent`. Detached nodes go under the root.
    pub fn insert(&mut self, mut node: Node, parent: NodeId) -> NodeId {
        let parent = if self.contains(parent) { parent } else { Self::ROOT };
        let id = NodeId(self.nodes.len());
        node.parent = Some(parent);
        node.children.clear();
        self.nodes.push(Some(node));
        if let Some(parent) = self.get_mut(parent) {
            parent.children.push(id);
        }
        id
    }

    /// Removes `id` and its whole subtree. The root cannot be removed.
    pub fn remove(&mut self, id: NodeId) {
        if id == Self::ROOT {
            return;
        }
        let Some(parent) = self.get(id).and_then(|node| node.parent) else {
            return;
        };
        if let Some(parent) = self.get_mut(parent) {
            parent.children.retain(|child| *child != id);
        }

        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get_mut(current.0).and_then(Option::take) {
                stack.extend(node.children);
            }
        }
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|node| node.children.as_slice()).unwrap_or_default()
    }

    /// `name` matches direct children of the scene, `//name` searches every descendant.
    pub fn find(&self, path: &str) -> Option<NodeId> {
        match path.strip_prefix("//") {
            Some(name) => self.walk().into_iter().find(|id| self.get(*id).is_some_and(|node| node.is_named(name))),
            None => {
                self.children(Self::ROOT).iter().copied().find(|id| self.get(*id).is_some_and(|node| node.is_named(path)))
            },
        }
    }

    /// Scene-space origin of the coordinate space `id` defines for its children.
    pub fn origin(&self, id: NodeId) -> Vec2 {
        self.ancestry(id).filter_map(|id| self.get(id)).map(|node| node.position).sum()
    }

    /// Accumulated render offset of `id` and its ancestors.
    pub fn offset(&self, id: NodeId) -> Vec2 {
        self.ancestry(id).filter_map(|id| self.get(id)).map(|node| node.offset).sum()
    }

    fn ancestry(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.contains(id).then_some(id), |id| self.get(*id).and_then(|node| node.parent))
    }

    /// Live descendants of the root in depth-first draw order.
    pub fn walk(&self) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack: Vec<NodeId> = self.children(Self::ROOT).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.children(id).iter().rev());
        }
        order
    }

    pub fn run_actions(&mut self, dt: f32) {
        for node in self.nodes.iter_mut().flatten() {
            if node.actions.is_empty() {
                continue;
            }
            let mut actions = std::mem::take(&mut node.actions);
            actions.retain_mut(|action| action.step(node, dt));
            node.actions = actions;
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn tree() -> (SceneTree, NodeId, NodeId) {
        let mut tree = SceneTree::new(Vec2::new(320.0, 568.0));
        let layer = tree.insert(Node::container("layer").at(Vec2::new(-10.0, 5.0)), SceneTree::ROOT);
        let tile = tree.insert(Node::sprite("tile", Sprite::Ground, Vec2::new(4.0, 4.0)).at(Vec2::new(30.0, 1.0)), layer);
        (tree, layer, tile)
    }

    #[test]
    fn test_origin_accumulates_ancestors() {
        let (tree, layer, tile) = tree();
        assert_eq!(tree.origin(SceneTree::ROOT), Vec2::ZERO);
        assert_eq!(tree.origin(layer), Vec2::new(-10.0, 5.0));
        assert_eq!(tree.origin(tile), Vec2::new(20.0, 6.0));
    }

    #[test]
    fn test_find_top_level_and_recursive() {
        let (tree, layer, tile) = tree();
        assert_eq!(tree.find("layer"), Some(layer));
        assert_eq!(tree.find("tile"), None);
        assert_eq!(tree.find("//tile"), Some(tile));
        assert_eq!(tree.find("//missing"), None);
    }

    #[test]
    fn test_remove_drops_subtree() {
        let (mut tree, layer, tile) = tree();
        assert_eq!(tree.len(), 3);
        tree.remove(layer);
        assert!(!tree.contains(layer));
        assert!(!tree.contains(tile));
        assert!(tree.children(SceneTree::ROOT).is_empty());
        assert!(tree.is_empty());
    }

    #[test]
    fn test_root_is_not_removable() {
        let (mut tree, _, _) = tree();
        tree.remove(SceneTree::ROOT);
        assert!(tree.contains(SceneTree::ROOT));
    }

    #[test]
    fn test_handles_are_not_reused() {
        let (mut tree, layer, tile) = tree();
        tree.remove(tile);
        let other = tree.insert(Node::container("other"), layer);
        assert!(other != tile);
        assert_eq!(tree.children(layer), &[other]);
    }

    #[test]
    fn test_walk_is_depth_first() {
        let (mut tree, layer, tile) = tree();
        let label = tree.insert(Node::label("label", "0"), SceneTree::ROOT);
        assert_eq!(tree.walk(), vec![layer, tile, label]);
    }
}
