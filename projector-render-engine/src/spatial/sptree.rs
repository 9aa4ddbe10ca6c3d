//! Space-partitioning tree over a fixed-dimension point set.
//!
//! Each node owns one point and a cube-shaped cell (shared half-extent on
//! every axis). Children are addressed by a D-bit sign mask of the point
//! against the node centre, so a node has exactly `2^D` child slots. Built
//! once from an immutable point array; insert-only, no deletion.

use super::SpatialError;

#[derive(Debug)]
pub struct SpNode {
    pub center: Vec<f64>,
    pub half_dim: f64,
    pub point: Vec<f64>,
    /// Position of `point` in the original input array.
    pub index: usize,
    children: Vec<Option<Box<SpNode>>>,
}

impl SpNode {
    fn new(center: Vec<f64>, half_dim: f64, point: Vec<f64>, index: usize) -> Self {
        let slots = 1usize << center.len();
        Self {
            center,
            half_dim,
            point,
            index,
            children: (0..slots).map(|_| None).collect(),
        }
    }

    pub fn children(&self) -> impl Iterator<Item = &SpNode> {
        self.children.iter().filter_map(|c| c.as_deref())
    }

    /// Lower and upper corners of this node's cell.
    pub fn cell_corners(&self) -> (Vec<f64>, Vec<f64>) {
        let low = self.center.iter().map(|c| c - self.half_dim).collect();
        let high = self.center.iter().map(|c| c + self.half_dim).collect();
        (low, high)
    }
}

#[derive(Debug)]
pub struct SPTree {
    root: SpNode,
    dim: usize,
}

impl SPTree {
    /// Builds the tree over `points`. The cell of the root is a cube centred
    /// on the per-axis midpoints with a half-extent taken from the axis of
    /// largest span.
    pub fn new(points: &[Vec<f64>]) -> Result<Self, SpatialError> {
        let first = points.first().ok_or(SpatialError::EmptyPointSet)?;
        let dim = first.len();
        for p in points {
            if p.len() != dim {
                return Err(SpatialError::DimensionMismatch {
                    expected: dim,
                    found: p.len(),
                });
            }
        }

        let mut min = vec![f64::INFINITY; dim];
        let mut max = vec![f64::NEG_INFINITY; dim];
        for p in points {
            for d in 0..dim {
                min[d] = min[d].min(p[d]);
                max[d] = max[d].max(p[d]);
            }
        }
        let center: Vec<f64> = (0..dim).map(|d| (min[d] + max[d]) * 0.5).collect();
        let span = (0..dim).map(|d| max[d] - min[d]).fold(0.0, f64::max);
        // Tiny epsilon keeps boundary points strictly inside the root cell.
        let half_dim = span * 0.5 + 1e-9;

        let mut tree = Self {
            root: SpNode::new(center, half_dim, first.clone(), 0),
            dim,
        };
        for (i, p) in points.iter().enumerate().skip(1) {
            tree.insert(p.clone(), i);
        }
        Ok(tree)
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn root(&self) -> &SpNode {
        &self.root
    }

    fn insert(&mut self, point: Vec<f64>, index: usize) {
        Self::insert_rec(&mut self.root, point, index);
    }

    fn insert_rec(node: &mut SpNode, point: Vec<f64>, index: usize) {
        // Bit d set iff the point sits above the centre on axis d.
        let mut slot = 0usize;
        for d in 0..point.len() {
            if point[d] > node.center[d] {
                slot |= 1 << d;
            }
        }
        let half = node.half_dim * 0.5;
        let parent_center = node.center.clone();
        match &mut node.children[slot] {
            Some(child) => Self::insert_rec(child, point, index),
            empty => {
                let center: Vec<f64> = parent_center
                    .iter()
                    .enumerate()
                    .map(|(d, c)| if slot & (1 << d) != 0 { c + half } else { c - half })
                    .collect();
                *empty = Some(Box::new(SpNode::new(center, half, point, index)));
            }
        }
    }

    /// Depth-first traversal. The accessor receives each node with the low
    /// and high corners of its cell; returning `true` prunes the subtree.
    pub fn visit<F>(&self, accessor: &mut F)
    where
        F: FnMut(&SpNode, &[f64], &[f64]) -> bool,
    {
        Self::visit_rec(&self.root, accessor);
    }

    /// Traversal variant without the cell-corner computation.
    pub fn visit_nodes<F>(&self, accessor: &mut F)
    where
        F: FnMut(&SpNode) -> bool,
    {
        Self::visit_nodes_rec(&self.root, accessor);
    }

    fn visit_rec<F>(node: &SpNode, accessor: &mut F)
    where
        F: FnMut(&SpNode, &[f64], &[f64]) -> bool,
    {
        let (low, high) = node.cell_corners();
        if accessor(node, &low, &high) {
            return;
        }
        for child in node.children() {
            Self::visit_rec(child, accessor);
        }
    }

    fn visit_nodes_rec<F>(node: &SpNode, accessor: &mut F)
    where
        F: FnMut(&SpNode) -> bool,
    {
        if accessor(node) {
            return;
        }
        for child in node.children() {
            Self::visit_nodes_rec(child, accessor);
        }
    }
}
