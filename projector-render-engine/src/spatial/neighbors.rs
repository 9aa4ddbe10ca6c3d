//! Nearest-neighbour queries over an [`SPTree`], used to surface the
//! neighbourhood of a locked or selected point.

use super::heap::KMin;
use super::sptree::SPTree;

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// Squared distance from `point` to the axis-aligned cell `[low, high]`.
/// Zero when the point is inside the cell.
fn squared_cell_distance(point: &[f64], low: &[f64], high: &[f64]) -> f64 {
    point
        .iter()
        .zip(low.iter().zip(high))
        .map(|(&p, (&lo, &hi))| {
            let d = if p < lo {
                lo - p
            } else if p > hi {
                p - hi
            } else {
                0.0
            };
            d * d
        })
        .sum()
}

/// Indices of the `k` points nearest to `query`, ascending by distance.
/// `skip` excludes the query point itself when it is part of the tree.
/// Subtrees are pruned once their cell lies beyond the current k-th best
/// distance.
pub fn find_k_nearest(tree: &SPTree, query: &[f64], k: usize, skip: Option<usize>) -> Vec<usize> {
    let mut kmin = KMin::new(k);
    tree.visit(&mut |node, low, high| {
        if kmin.size() == k {
            if let Some(largest) = kmin.get_largest_key() {
                if squared_cell_distance(query, low, high) > largest {
                    return true;
                }
            }
        }
        if skip != Some(node.index) {
            kmin.add(squared_distance(query, &node.point), node.index);
        }
        false
    });
    kmin.get_min_k_items()
}
