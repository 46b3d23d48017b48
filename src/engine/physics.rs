use std::collections::HashSet;

use bitflags::bitflags;
use derive_builder::Builder;
use glam::Vec2;

use super::node::{NodeId, SceneTree};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Category: u32 {
        const BIRD = 1 << 0;
        const OBSTACLE = 1 << 1;
        const GROUND = 1 << 2;
        const GOAL = 1 << 3;
    }
}

#[derive(Debug, Clone, PartialEq, Builder)]
#[builder(default, pattern = "owned")]
pub struct PhysicsBody {
    /// Static bodies never move on their own and only take part in contacts.
    pub dynamic: bool,
    pub mass: f32,
    pub inertia: f32,
    pub velocity: Vec2,
    pub angular_velocity: f32,
    pub allows_rotation: bool,
    pub category: Category,
    /// Categories this body is pushed out of.
    pub collision: Category,
    /// Categories that produce contact notifications.
    pub contact_test: Category,
}

impl Default for PhysicsBody {
    fn default() -> Self {
        Self {
            dynamic: false,
            mass: 1.0,
            inertia: 1.0,
            velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            allows_rotation: true,
            category: Category::empty(),
            collision: Category::empty(),
            contact_test: Category::empty(),
        }
    }
}

impl PhysicsBody {
    pub fn apply_impulse(&mut self, impulse: Vec2) {
        if self.dynamic && self.mass > 0.0 {
            self.velocity += impulse / self.mass;
        }
    }

    pub fn apply_angular_impulse(&mut self, impulse: f32) {
        if self.dynamic && self.allows_rotation && self.inertia > 0.0 {
            self.angular_velocity += impulse / self.inertia;
        }
    }

    fn reports(&self, other: &PhysicsBody) -> bool {
        self.contact_test.intersects(other.category) || other.contact_test.intersects(self.category)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size / 2.0;
        Self { min: center - half, max: center + half }
    }

    /// Touching edges do not count as an intersection.
    pub fn intersects(&self, other: &Aabb) -> bool {
        overlaps(self.min.x, self.max.x, other.min.x, other.max.x)
            && overlaps(self.min.y, self.max.y, other.min.y, other.max.y)
    }

    /// Smallest translation that moves `self` out of `other`.
    pub fn separation(&self, other: &Aabb) -> Vec2 {
        let x = shortest(other.min.x - self.max.x, other.max.x - self.min.x);
        let y = shortest(other.min.y - self.max.y, other.max.y - self.min.y);
        if x.abs() < y.abs() {
            Vec2::new(x, 0.0)
        } else {
            Vec2::new(0.0, y)
        }
    }
}

fn overlaps(l1: f32, r1: f32, l2: f32, r2: f32) -> bool {
    !(r1 <= l2 || l1 >= r2)
}

fn shortest(a: f32, b: f32) -> f32 {
    if a.abs() < b.abs() {
        a
    } else {
        b
    }
}

/// A pair of nodes whose bodies started touching during the last step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Contact {
    pub a: NodeId,
    pub b: NodeId,
}

impl Contact {
    pub fn new(a: NodeId, b: NodeId) -> Self {
        if a <= b {
            Self { a, b }
        } else {
            Self { a: b, b: a }
        }
    }

    pub fn involves(&self, node: NodeId) -> bool {
        self.a == node || self.b == node
    }
}

#[derive(Debug, Clone)]
pub struct PhysicsWorld {
    pub gravity: Vec2,
    touching: HashSet<Contact>,
}

impl PhysicsWorld {
    pub fn new(gravity: Vec2) -> Self {
        Self { gravity, touching: HashSet::new() }
    }

    /// Integrates dynamic bodies, resolves collisions and returns contacts that began.
    pub fn step(&mut self, tree: &mut SceneTree, dt: f32) -> Vec<Contact> {
        let bodies: Vec<NodeId> =
            tree.walk().into_iter().filter(|id| tree.get(*id).is_some_and(|node| node.body.is_some())).collect();

        self.integrate(tree, &bodies, dt);
        self.resolve(tree, &bodies);
        self.detect(tree, &bodies)
    }

    fn integrate(&self, tree: &mut SceneTree, bodies: &[NodeId], dt: f32) {
        for id in bodies {
            let Some(node) = tree.get_mut(*id) else { continue };
            let Some(body) = node.body.as_mut() else { continue };
            if !body.dynamic {
                continue;
            }
            body.velocity += self.gravity * dt;
            if !body.allows_rotation {
                body.angular_velocity = 0.0;
            }
            node.position += body.velocity * dt;
            node.rotation += body.angular_velocity * dt;
        }
    }

    fn resolve(&self, tree: &mut SceneTree, bodies: &[NodeId]) {
        for id in bodies {
            let Some((dynamic, collision)) =
                tree.get(*id).and_then(|node| node.body.as_ref()).map(|body| (body.dynamic, body.collision))
            else {
                continue;
            };
            if !dynamic || collision.is_empty() {
                continue;
            }

            for other in bodies.iter().filter(|other| *other != id) {
                let blocks = tree
                    .get(*other)
                    .and_then(|node| node.body.as_ref())
                    .is_some_and(|body| !body.dynamic && collision.intersects(body.category));
                if !blocks {
                    continue;
                }
                let (Some(ours), Some(theirs)) = (aabb(tree, *id), aabb(tree, *other)) else { continue };
                if !ours.intersects(&theirs) {
                    continue;
                }

                let push = ours.separation(&theirs);
                let Some(node) = tree.get_mut(*id) else { continue };
                node.position += push;
                if let Some(body) = node.body.as_mut() {
                    if push.x != 0.0 {
                        body.velocity.x = 0.0;
                    }
                    if push.y != 0.0 {
                        body.velocity.y = 0.0;
                    }
                }
            }
        }
    }

    fn detect(&mut self, tree: &SceneTree, bodies: &[NodeId]) -> Vec<Contact> {
        let mut touching = HashSet::new();
        let mut began = Vec::new();
        for (i, a) in bodies.iter().enumerate() {
            for b in &bodies[i + 1..] {
                let (Some(first), Some(second)) =
                    (tree.get(*a).and_then(|n| n.body.as_ref()), tree.get(*b).and_then(|n| n.body.as_ref()))
                else {
                    continue;
                };
                if !first.reports(second) {
                    continue;
                }
                let (Some(ours), Some(theirs)) = (aabb(tree, *a), aabb(tree, *b)) else { continue };
                // Resolved bodies end up edge to edge, so touching counts here.
                if !(ours.intersects(&theirs) || touches(&ours, &theirs)) {
                    continue;
                }
                let contact = Contact::new(*a, *b);
                if !self.touching.contains(&contact) {
                    began.push(contact);
                }
                touching.insert(contact);
            }
        }
        self.touching = touching;
        began
    }
}

const CONTACT_SLOP: f32 = 0.01;

fn touches(a: &Aabb, b: &Aabb) -> bool {
    a.min.x <= b.max.x + CONTACT_SLOP
        && b.min.x <= a.max.x + CONTACT_SLOP
        && a.min.y <= b.max.y + CONTACT_SLOP
        && b.min.y <= a.max.y + CONTACT_SLOP
}

fn aabb(tree: &SceneTree, id: NodeId) -> Option<Aabb> {
    let node = tree.get(id)?;
    Some(Aabb::from_center(tree.origin(id), node.size))
}
