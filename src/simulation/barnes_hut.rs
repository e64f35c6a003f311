//! Barnes-Hut quadtree over a bounded 2D domain
//!
//! The tree recursively partitions the domain into quadrants. An external
//! node holds a single real body; an internal node holds the aggregate
//! center of mass of everything below it. The force query walks the tree
//! and, for nodes subtending a small enough angle (`width / distance <
//! theta`), substitutes the aggregate for the whole subtree, giving the
//! usual O(N log N) behavior instead of the all-pairs O(N^2).
//!
//! Each node exclusively owns its four children; dropping the root frees
//! the tree. A fresh tree is built every step.

use crate::simulation::forces::add_force;
use crate::simulation::params::MAX_DEPTH;
use crate::simulation::states::{combine, Body, NVec2};

/// Axis-aligned rectangle, origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Containment is closed on all four edges, so a point on a shared
    /// internal edge belongs to every adjacent quadrant; insertion breaks
    /// the tie by checking quadrants in a fixed order.
    pub fn contains(&self, p: NVec2) -> bool {
        p.x >= self.x
            && p.x <= self.x + self.width
            && p.y >= self.y
            && p.y <= self.y + self.height
    }

    /// The four equal quadrants as `[nw, ne, sw, se]`.
    fn quadrants(&self) -> [Rect; 4] {
        let w = self.width / 2.0;
        let h = self.height / 2.0;

        [
            Rect::new(self.x, self.y, w, h),
            Rect::new(self.x + w, self.y, w, h),
            Rect::new(self.x, self.y + h, w, h),
            Rect::new(self.x + w, self.y + h, w, h),
        ]
    }
}

/// What a node currently holds.
enum NodeKind {
    /// No body has reached this region yet
    Empty,
    /// Exactly one real body, or an aggregate once the depth limit is hit
    External(Body),
    /// Aggregate center of mass of all descendants, plus four children
    Internal { com: Body, children: Box<Quadrants> },
}

struct Quadrants {
    nw: BHTree,
    ne: BHTree,
    sw: BHTree,
    se: BHTree,
}

impl Quadrants {
    fn new(parent: Rect) -> Self {
        let [nw, ne, sw, se] = parent.quadrants();

        Self {
            nw: BHTree::new(nw),
            ne: BHTree::new(ne),
            sw: BHTree::new(sw),
            se: BHTree::new(se),
        }
    }

    /// Route a body into the first quadrant containing it, NW -> NE -> SW,
    /// falling through to SE. The fallback also catches bodies that have
    /// drifted outside the domain entirely.
    fn route(&mut self, body: Body, depth: u32) {
        if self.nw.boundary.contains(body.position) {
            self.nw.insert(body, depth);
        } else if self.ne.boundary.contains(body.position) {
            self.ne.insert(body, depth);
        } else if self.sw.boundary.contains(body.position) {
            self.sw.insert(body, depth);
        } else {
            self.se.insert(body, depth);
        }
    }
}

/// Barnes-Hut quadtree node; the root doubles as the tree handle.
pub struct BHTree {
    boundary: Rect,
    kind: NodeKind,
}

impl BHTree {
    /// Empty node spanning `boundary`
    pub fn new(boundary: Rect) -> Self {
        Self {
            boundary,
            kind: NodeKind::Empty,
        }
    }

    /// Insert a body. Call with `depth = 0` at the root.
    pub fn insert(&mut self, body: Body, depth: u32) {
        let depth = depth + 1;

        match &mut self.kind {
            NodeKind::Empty => {
                // Becomes an external node
                self.kind = NodeKind::External(body);
            }
            NodeKind::Internal { com, children } => {
                // Fold the new body into this subtree's aggregate, then
                // send it down to the quadrant it belongs to
                *com = combine(com, &body);
                children.route(body, depth);
            }
            NodeKind::External(existing) => {
                let existing = *existing;
                let com = combine(&existing, &body);

                if depth < MAX_DEPTH {
                    let mut children = Box::new(Quadrants::new(self.boundary));
                    children.route(body, depth);
                    children.route(existing, depth);
                    self.kind = NodeKind::Internal { com, children };
                } else {
                    // Depth limit: keep the node external and let the two
                    // bodies share it as an aggregate
                    self.kind = NodeKind::External(com);
                }
            }
        }
    }

    /// Accumulate into `body.force` the pull from everything in this
    /// subtree, approximating clusters whose angular size drops below
    /// `theta` by their center of mass.
    pub fn compute_forces(&self, body: &mut Body, theta: f32) {
        match &self.kind {
            NodeKind::Empty => {}
            NodeKind::External(other) => {
                // A body never pulls on itself
                if other.id != body.id {
                    add_force(body, other);
                }
            }
            NodeKind::Internal { com, children } => {
                let s = self.boundary.width;
                let d = (com.position - body.position).norm();

                if s / d < theta {
                    // Far enough away to stand in for the whole subtree
                    add_force(body, com);
                } else {
                    children.nw.compute_forces(body, theta);
                    children.ne.compute_forces(body, theta);
                    children.sw.compute_forces(body, theta);
                    children.se.compute_forces(body, theta);
                }
            }
        }
    }

    pub fn boundary(&self) -> Rect {
        self.boundary
    }

    /// The body this node stands for: the held body of an external node or
    /// the aggregate of an internal one. `None` for empty nodes.
    pub fn body(&self) -> Option<&Body> {
        match &self.kind {
            NodeKind::Empty => None,
            NodeKind::External(body) => Some(body),
            NodeKind::Internal { com, .. } => Some(com),
        }
    }

    pub fn is_divided(&self) -> bool {
        matches!(self.kind, NodeKind::Internal { .. })
    }

    /// Children as `[nw, ne, sw, se]`, if this node has subdivided.
    pub fn children(&self) -> Option<[&BHTree; 4]> {
        match &self.kind {
            NodeKind::Internal { children, .. } => {
                Some([&children.nw, &children.ne, &children.sw, &children.se])
            }
            _ => None,
        }
    }
}
