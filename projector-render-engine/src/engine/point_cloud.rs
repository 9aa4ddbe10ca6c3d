//! CPU-side point buffers. Positions, colours, sizes and visibility live in
//! parallel arrays of length N; index i means the same logical point in all
//! of them. Hover and highlight styling mutates colours/sizes in place and
//! is reverted from a snapshot taken at load time.

use bevy::prelude::*;
use constants::{DEFAULT_POINT_SIZE, NEIGHBOR_COUNT};

use super::assets::ProjectionResult;
use crate::spatial::neighbors::find_k_nearest;
use crate::spatial::sptree::SPTree;

/// Marker for the per-view point cloud entity.
#[derive(Component)]
pub struct PointCloud;

#[derive(Component, Debug, Default)]
pub struct PointCloudBuffer {
    positions: Vec<[f32; 3]>,
    colors: Vec<[f32; 3]>,
    sizes: Vec<f32>,
    alphas: Vec<f32>,
    original_colors: Vec<[f32; 3]>,
    original_sizes: Vec<f32>,
}

impl PointCloudBuffer {
    /// Builds a fresh buffer for one payload. Replacing a dataset always
    /// goes through here; buffers are never partially resized.
    ///
    /// # Panics
    /// Panics when a label indexes past `color_list`. Callers run
    /// [`ProjectionResult::validate`] first; a payload that fails it never
    /// reaches a buffer.
    pub fn from_result(result: &ProjectionResult) -> Self {
        let positions = result
            .result
            .iter()
            .map(|p| [p[0], p[1], 0.0])
            .collect::<Vec<_>>();
        let colors = result
            .label_list
            .iter()
            .map(|&label| result.color_list[label as usize])
            .collect::<Vec<_>>();
        let n = positions.len();
        let mut buffer = Self {
            positions,
            colors,
            sizes: vec![DEFAULT_POINT_SIZE; n],
            alphas: vec![1.0; n],
            original_colors: Vec::new(),
            original_sizes: Vec::new(),
        };
        buffer.save_settings();
        buffer
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    pub fn colors(&self) -> &[[f32; 3]] {
        &self.colors
    }

    pub fn sizes(&self) -> &[f32] {
        &self.sizes
    }

    pub fn alphas(&self) -> &[f32] {
        &self.alphas
    }

    /// Snapshot the current colours/sizes as the revert target.
    pub fn save_settings(&mut self) {
        self.original_colors = self.colors.clone();
        self.original_sizes = self.sizes.clone();
    }

    /// Restores the snapshot taken by [`PointCloudBuffer::save_settings`].
    pub fn reset_to_original(&mut self) {
        self.colors.copy_from_slice(&self.original_colors);
        self.sizes.copy_from_slice(&self.original_sizes);
    }

    /// Applies one highlight set. `color: None` keeps the point's current
    /// colour (hover only resizes). Callers apply sets weakest first; the
    /// last write wins on overlap. Out-of-range indices are skipped: remote
    /// hover indices may not exist in this view's dataset.
    pub fn apply_highlight(
        &mut self,
        indices: impl IntoIterator<Item = usize>,
        color: Option<[f32; 3]>,
        size: f32,
    ) {
        for i in indices {
            if i >= self.len() {
                continue;
            }
            if let Some(color) = color {
                self.colors[i] = color;
            }
            self.sizes[i] = size;
        }
    }

    pub fn set_visible(&mut self, index: usize, visible: bool) {
        if let Some(alpha) = self.alphas.get_mut(index) {
            *alpha = if visible { 1.0 } else { 0.0 };
        }
    }

    /// Visibility gate shared by rendering and hit-testing.
    pub fn is_visible(&self, index: usize) -> bool {
        self.alphas.get(index).is_some_and(|&a| a > 0.0)
    }
}

/// Read-only embedding-space index over one view's points, rebuilt with the
/// buffer on every dataset load.
#[derive(Component)]
pub struct NeighborIndex {
    tree: Option<SPTree>,
}

impl NeighborIndex {
    pub fn from_result(result: &ProjectionResult) -> Self {
        Self {
            tree: SPTree::new(&result.points_f64()).ok(),
        }
    }

    /// Nearest neighbours of point `index`, excluding the point itself.
    pub fn neighbors_of(&self, index: usize, buffer: &PointCloudBuffer) -> Vec<usize> {
        let Some(tree) = &self.tree else {
            return Vec::new();
        };
        let Some(p) = buffer.positions().get(index) else {
            return Vec::new();
        };
        find_k_nearest(
            tree,
            &[p[0] as f64, p[1] as f64],
            NEIGHBOR_COUNT,
            Some(index),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::assets::ProjectionResult;

    fn result_of(points: &[[f32; 2]]) -> ProjectionResult {
        ProjectionResult {
            grid_index: [0.0, 0.0, 1.0, 1.0],
            grid_color: String::new(),
            result: points.to_vec(),
            label_list: vec![0; points.len()],
            color_list: vec![[0.5, 0.5, 0.5]],
        }
    }

    #[test]
    fn buffers_stay_parallel() {
        let buffer = PointCloudBuffer::from_result(&result_of(&[[0.0, 0.0], [1.0, 2.0]]));
        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.positions().len(), 2);
        assert_eq!(buffer.colors().len(), 2);
        assert_eq!(buffer.sizes().len(), 2);
        assert_eq!(buffer.alphas().len(), 2);
        assert_eq!(buffer.positions()[1], [1.0, 2.0, 0.0]);
    }

    #[test]
    fn highlight_then_reset_restores_the_snapshot() {
        let mut buffer =
            PointCloudBuffer::from_result(&result_of(&[[0.0, 0.0], [1.0, 0.0], [2.0, 0.0]]));
        let colors = buffer.colors().to_vec();
        let sizes = buffer.sizes().to_vec();

        buffer.apply_highlight([0, 2], Some([1.0, 0.0, 0.0]), 9.0);
        buffer.apply_highlight([1], None, 4.0);
        assert_eq!(buffer.colors()[0], [1.0, 0.0, 0.0]);
        assert_eq!(buffer.sizes()[1], 4.0);

        buffer.reset_to_original();
        assert_eq!(buffer.colors(), colors.as_slice());
        assert_eq!(buffer.sizes(), sizes.as_slice());
    }

    #[test]
    fn later_sets_win_on_overlap() {
        let mut buffer =
            PointCloudBuffer::from_result(&result_of(&[[0.0, 0.0], [1.0, 0.0]]));
        buffer.apply_highlight([0, 1], Some([0.0, 0.0, 1.0]), 5.0);
        buffer.apply_highlight([1], Some([1.0, 1.0, 0.0]), 8.0);
        assert_eq!(buffer.colors()[0], [0.0, 0.0, 1.0]);
        assert_eq!(buffer.colors()[1], [1.0, 1.0, 0.0]);
        assert_eq!(buffer.sizes()[1], 8.0);
    }

    #[test]
    #[should_panic]
    fn unvalidated_out_of_range_label_panics() {
        let mut result = result_of(&[[0.0, 0.0]]);
        result.label_list[0] = 9;
        let _ = PointCloudBuffer::from_result(&result);
    }

    #[test]
    fn out_of_range_writes_are_silent_noops() {
        let mut buffer = PointCloudBuffer::from_result(&result_of(&[[0.0, 0.0]]));
        buffer.apply_highlight([7], Some([1.0, 0.0, 0.0]), 9.0);
        buffer.set_visible(7, false);
        assert_eq!(buffer.sizes()[0], DEFAULT_POINT_SIZE);
        assert!(!buffer.is_visible(7));
    }

    #[test]
    fn hidden_points_fail_the_visibility_gate() {
        let mut buffer = PointCloudBuffer::from_result(&result_of(&[[0.0, 0.0], [1.0, 0.0]]));
        assert!(buffer.is_visible(0));
        buffer.set_visible(0, false);
        assert!(!buffer.is_visible(0));
        assert!(buffer.is_visible(1));
    }

    #[test]
    fn neighbor_index_tracks_embedding_distance() {
        let result = result_of(&[[0.0, 0.0], [0.1, 0.0], [5.0, 5.0], [0.2, 0.0]]);
        let buffer = PointCloudBuffer::from_result(&result);
        let index = NeighborIndex::from_result(&result);
        let neighbors = index.neighbors_of(0, &buffer);
        assert_eq!(neighbors.first(), Some(&1));
        assert!(!neighbors.contains(&0));
    }
}
