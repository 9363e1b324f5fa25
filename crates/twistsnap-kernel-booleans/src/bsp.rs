//! Arena-allocated BSP trees over convex polygons.
//!
//! Each node holds a splitting plane, the polygons coplanar with it, and
//! indices of its front and back children. Nodes never move once pushed,
//! so children are plain `usize` indices into `nodes`.

use twistsnap_kernel_math::Tolerance;
use twistsnap_kernel_mesh::{Plane, Polygon, Split};

#[derive(Debug, Clone, Default)]
struct Node {
    plane: Option<Plane>,
    polygons: Vec<Polygon>,
    front: Option<usize>,
    back: Option<usize>,
}

/// A BSP tree representing a closed solid.
#[derive(Debug, Clone)]
pub struct BspTree {
    nodes: Vec<Node>,
    eps: f64,
}

/// Polygons routed to either side of a plane.
#[derive(Default)]
struct Sides {
    coplanar: Vec<Polygon>,
    front: Vec<Polygon>,
    back: Vec<Polygon>,
}

impl Sides {
    /// Partition `polygons` by `plane`. With `keep_coplanar` set, coplanar
    /// polygons of either orientation are collected separately (tree
    /// building); otherwise they follow their facing (clipping).
    fn partition(polygons: Vec<Polygon>, plane: &Plane, eps: f64, keep_coplanar: bool) -> Self {
        let mut sides = Sides::default();
        for poly in polygons {
            match poly.split(plane, eps) {
                Split::CoplanarFront(p) if keep_coplanar => sides.coplanar.push(p),
                Split::CoplanarBack(p) if keep_coplanar => sides.coplanar.push(p),
                Split::CoplanarFront(p) | Split::Front(p) => sides.front.push(p),
                Split::CoplanarBack(p) | Split::Back(p) => sides.back.push(p),
                Split::Spanning { front, back } => {
                    sides.front.extend(front);
                    sides.back.extend(back);
                }
            }
        }
        sides
    }
}

impl BspTree {
    /// Build a tree from the polygons of a closed solid.
    pub fn new(polygons: Vec<Polygon>) -> Self {
        let mut tree = Self {
            nodes: vec![Node::default()],
            eps: Tolerance::CSG.linear,
        };
        tree.build(polygons);
        tree
    }

    /// Insert polygons into the tree, splitting as needed.
    pub fn build(&mut self, polygons: Vec<Polygon>) {
        let mut stack = vec![(0usize, polygons)];

        while let Some((idx, polys)) = stack.pop() {
            if polys.is_empty() {
                continue;
            }
            let plane = match self.nodes[idx].plane {
                Some(p) => p,
                None => {
                    let p = *polys[0].plane();
                    self.nodes[idx].plane = Some(p);
                    p
                }
            };

            let sides = Sides::partition(polys, &plane, self.eps, true);
            self.nodes[idx].polygons.extend(sides.coplanar);

            if !sides.front.is_empty() {
                let child = self.child(idx, true);
                stack.push((child, sides.front));
            }
            if !sides.back.is_empty() {
                let child = self.child(idx, false);
                stack.push((child, sides.back));
            }
        }
    }

    /// Index of the front or back child of `idx`, created on demand.
    fn child(&mut self, idx: usize, front: bool) -> usize {
        let slot = if front {
            self.nodes[idx].front
        } else {
            self.nodes[idx].back
        };
        if let Some(c) = slot {
            return c;
        }
        let c = self.nodes.len();
        self.nodes.push(Node::default());
        if front {
            self.nodes[idx].front = Some(c);
        } else {
            self.nodes[idx].back = Some(c);
        }
        c
    }

    /// Turn the solid inside out.
    pub fn invert(&mut self) {
        for node in &mut self.nodes {
            for poly in &mut node.polygons {
                poly.flip();
            }
            node.plane = node.plane.map(|p| p.flip());
            std::mem::swap(&mut node.front, &mut node.back);
        }
    }

    /// Remove the parts of `polygons` that lie inside this tree's solid.
    pub fn clip_polygons(&self, polygons: Vec<Polygon>) -> Vec<Polygon> {
        let mut result = Vec::new();
        let mut stack = vec![(0usize, polygons)];

        while let Some((idx, polys)) = stack.pop() {
            if polys.is_empty() {
                continue;
            }
            let node = &self.nodes[idx];
            let Some(plane) = node.plane else {
                result.extend(polys);
                continue;
            };

            let sides = Sides::partition(polys, &plane, self.eps, false);
            match node.front {
                Some(f) => stack.push((f, sides.front)),
                None => result.extend(sides.front),
            }
            // Without a back subtree the back side is solid: discard.
            if let Some(b) = node.back {
                stack.push((b, sides.back));
            }
        }

        result
    }

    /// Remove every polygon of this tree that lies inside `other`.
    pub fn clip_to(&mut self, other: &BspTree) {
        for node in &mut self.nodes {
            if !node.polygons.is_empty() {
                node.polygons = other.clip_polygons(std::mem::take(&mut node.polygons));
            }
        }
    }

    /// Clone out every polygon in the tree.
    pub fn all_polygons(&self) -> Vec<Polygon> {
        self.nodes
            .iter()
            .flat_map(|n| n.polygons.iter().cloned())
            .collect()
    }

    /// Move every polygon out of the tree.
    pub fn into_polygons(self) -> Vec<Polygon> {
        self.nodes.into_iter().flat_map(|n| n.polygons).collect()
    }

    /// Number of polygons stored in the tree.
    pub fn polygon_count(&self) -> usize {
        self.nodes.iter().map(|n| n.polygons.len()).sum()
    }

    /// Number of nodes in the arena.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}
