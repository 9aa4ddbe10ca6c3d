//! Persistent multi-select, attribute-driven highlight sets, and the one
//! place point styling is computed.
//!
//! Styling is always a full pass: reset to the load-time snapshot, then
//! apply every active set weakest first per `HIGHLIGHT_PRECEDENCE`. There is
//! deliberately no incremental path, so single and paired views can never
//! disagree on precedence.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use constants::{
    ALL_HIGHLIGHTED_COLOR, BLUE_HIGHLIGHT_COLOR, DOUBLE_CLICK_SECS, GREEN_HIGHLIGHT_COLOR,
    HIGHLIGHT_POINT_SIZE, HIGHLIGHT_PRECEDENCE, HOVER_POINT_SIZE, HighlightKind, NEIGHBOR_COLOR,
    NEIGHBOR_POINT_SIZE, SELECTED_POINT_SIZE, SELECTION_COLOR, VISUALIZATION_ERROR_COLOR,
    YELLOW_HIGHLIGHT_COLOR,
};

use super::hover::HoverState;
use super::picking::pick_at_cursor;
use crate::engine::camera::PanZoomCamera;
use crate::engine::point_cloud::{NeighborIndex, PointCloudBuffer};
use crate::engine::sync::{HoverSyncEvent, ViewId, ViewLayout};

/// Named index sets pushed in by the host application (search results,
/// error analysis, comparison marks). Membership is a set; styling order is
/// fixed by `HIGHLIGHT_PRECEDENCE`, not by mutation order.
#[derive(Resource, Debug, Default, Clone, PartialEq)]
pub struct HighlightAttributes {
    pub yellow: Vec<usize>,
    pub blue: Vec<usize>,
    pub green: Vec<usize>,
    pub all_highlighted: Vec<usize>,
    pub visualization_error: Vec<usize>,
}

/// Per-view persistent selection plus the derived neighbour set.
#[derive(Component, Debug, Default, Clone)]
pub struct SelectionState {
    pub selected: Vec<usize>,
    /// Viewport-space anchors for the label overlay, parallel to `selected`.
    pub label_anchors: Vec<Vec2>,
    /// Nearest neighbours of the current lock/selection anchor.
    pub neighbors: Vec<usize>,
    last_click_at: Option<f32>,
}

impl SelectionState {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn register_click(&mut self, now: f32) -> bool {
        let double = self
            .last_click_at
            .is_some_and(|t| now - t < DOUBLE_CLICK_SECS);
        self.last_click_at = Some(now);
        double
    }
}

/// Recomputes colours and sizes for one view from scratch.
pub fn refresh_styles(
    buffer: &mut PointCloudBuffer,
    highlights: &HighlightAttributes,
    hover: &HoverState,
    selection: &SelectionState,
) {
    buffer.reset_to_original();
    for kind in HIGHLIGHT_PRECEDENCE {
        match kind {
            HighlightKind::Green => buffer.apply_highlight(
                highlights.green.iter().copied(),
                Some(GREEN_HIGHLIGHT_COLOR),
                HIGHLIGHT_POINT_SIZE,
            ),
            HighlightKind::Blue => buffer.apply_highlight(
                highlights.blue.iter().copied(),
                Some(BLUE_HIGHLIGHT_COLOR),
                HIGHLIGHT_POINT_SIZE,
            ),
            HighlightKind::Yellow => buffer.apply_highlight(
                highlights.yellow.iter().copied(),
                Some(YELLOW_HIGHLIGHT_COLOR),
                HIGHLIGHT_POINT_SIZE,
            ),
            HighlightKind::AllHighlighted => buffer.apply_highlight(
                highlights.all_highlighted.iter().copied(),
                Some(ALL_HIGHLIGHTED_COLOR),
                HIGHLIGHT_POINT_SIZE,
            ),
            HighlightKind::VisualizationError => buffer.apply_highlight(
                highlights.visualization_error.iter().copied(),
                Some(VISUALIZATION_ERROR_COLOR),
                HIGHLIGHT_POINT_SIZE,
            ),
            // Hover resizes without recolouring, so the point keeps its
            // identity while enlarged.
            HighlightKind::Hover => buffer.apply_highlight(
                hover.synced.into_iter().chain(hover.hovered).chain(hover.locked),
                None,
                HOVER_POINT_SIZE,
            ),
            HighlightKind::Neighbor => buffer.apply_highlight(
                selection.neighbors.iter().copied(),
                Some(NEIGHBOR_COLOR),
                NEIGHBOR_POINT_SIZE,
            ),
            HighlightKind::Selection => buffer.apply_highlight(
                selection.selected.iter().copied(),
                Some(SELECTION_COLOR),
                SELECTED_POINT_SIZE,
            ),
        }
    }
}

/// Click and double-click handling. A release that travelled less than the
/// drag tolerance is a click: single clicks toggle the hover lock, double
/// clicks append to the persistent selection and record a label anchor.
/// Either way the anchor's nearest neighbours light up.
pub fn handle_clicks(
    windows: Query<&Window, With<PrimaryWindow>>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    time: Res<Time>,
    layout: Res<ViewLayout>,
    cameras: Query<(&Camera, &GlobalTransform, &PanZoomCamera, &ViewId)>,
    mut clouds: Query<(
        &ViewId,
        &PointCloudBuffer,
        &NeighborIndex,
        &mut HoverState,
        &mut SelectionState,
    )>,
    mut sync: EventWriter<HoverSyncEvent>,
) {
    if !mouse_button.just_released(MouseButton::Left) {
        return;
    }
    let Ok(window) = windows.single() else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        return;
    };

    for (camera, camera_transform, pz, camera_view) in &cameras {
        let Some(rect) = camera.logical_viewport_rect() else {
            continue;
        };
        if !pz.is_click(rect.contains(cursor)) {
            continue;
        }

        for (view, buffer, neighbor_index, mut hover, mut selection) in &mut clouds {
            if view != camera_view {
                continue;
            }
            let hit = pick_at_cursor(camera, camera_transform, pz, cursor, buffer);
            let double = selection.register_click(time.elapsed_secs());

            let mut hover_changed = false;
            if double {
                let Some(index) = hit else {
                    continue;
                };
                if !selection.selected.contains(&index) {
                    let p = buffer.positions()[index];
                    let anchor = camera
                        .world_to_viewport(camera_transform, Vec3::from(p))
                        .unwrap_or(cursor - rect.min);
                    selection.selected.push(index);
                    selection.label_anchors.push(anchor);
                    info!("{} view: selected point {}", view.label(), index);
                }
                selection.neighbors = neighbor_index.neighbors_of(index, buffer);
                // The first click of the pair took a lock; a double-click
                // leaves hover as it found it.
                if hover.locked.is_some() {
                    hover_changed = hover.toggle_lock(hit);
                }
            } else if hover.toggle_lock(hit) {
                hover_changed = true;
                match hover.locked {
                    Some(anchor) => {
                        selection.neighbors = neighbor_index.neighbors_of(anchor, buffer);
                    }
                    None if selection.selected.is_empty() => selection.neighbors.clear(),
                    None => {}
                }
            }

            // The mouse-move path only emits when the raycast hit changes,
            // so lock transitions broadcast their own hover updates here.
            if hover_changed && layout.pair {
                sync.write(HoverSyncEvent {
                    view: *view,
                    index: hover.hovered,
                });
            }
        }
    }
}

/// Restyles any view whose inputs changed this frame: highlight sets, hover
/// machine, or selection.
pub fn apply_point_styles(
    highlights: Res<HighlightAttributes>,
    mut clouds: Query<(&mut PointCloudBuffer, Ref<HoverState>, Ref<SelectionState>)>,
) {
    for (mut buffer, hover, selection) in &mut clouds {
        if !(highlights.is_changed() || hover.is_changed() || selection.is_changed()) {
            continue;
        }
        refresh_styles(&mut buffer, &highlights, &hover, &selection);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::assets::ProjectionResult;
    use constants::DEFAULT_POINT_SIZE;

    fn buffer_of(n: usize) -> PointCloudBuffer {
        PointCloudBuffer::from_result(&ProjectionResult {
            grid_index: [0.0, 0.0, 1.0, 1.0],
            grid_color: String::new(),
            result: (0..n).map(|i| [i as f32, 0.0]).collect(),
            label_list: vec![0; n],
            color_list: vec![[0.5, 0.5, 0.5]],
        })
    }

    #[test]
    fn hover_resizes_exactly_one_point() {
        let mut buffer = buffer_of(3);
        let mut hover = HoverState::default();
        hover.apply_hit(Some(1));
        refresh_styles(
            &mut buffer,
            &HighlightAttributes::default(),
            &hover,
            &SelectionState::default(),
        );
        assert_eq!(
            buffer.sizes(),
            &[DEFAULT_POINT_SIZE, HOVER_POINT_SIZE, DEFAULT_POINT_SIZE]
        );

        hover.apply_hit(None);
        refresh_styles(
            &mut buffer,
            &HighlightAttributes::default(),
            &hover,
            &SelectionState::default(),
        );
        assert_eq!(buffer.sizes(), &[DEFAULT_POINT_SIZE; 3]);
    }

    #[test]
    fn selection_outranks_every_highlight_set() {
        let mut buffer = buffer_of(2);
        let highlights = HighlightAttributes {
            yellow: vec![0],
            visualization_error: vec![0],
            ..Default::default()
        };
        let selection = SelectionState {
            selected: vec![0],
            ..Default::default()
        };
        refresh_styles(&mut buffer, &highlights, &HoverState::default(), &selection);
        assert_eq!(buffer.colors()[0], SELECTION_COLOR);
        assert_eq!(buffer.sizes()[0], SELECTED_POINT_SIZE);
    }

    #[test]
    fn error_outranks_color_sets_and_hover_keeps_color() {
        let mut buffer = buffer_of(2);
        let base = buffer.colors()[1];
        let highlights = HighlightAttributes {
            green: vec![0],
            visualization_error: vec![0],
            ..Default::default()
        };
        let mut hover = HoverState::default();
        hover.apply_hit(Some(1));
        refresh_styles(&mut buffer, &highlights, &hover, &SelectionState::default());
        assert_eq!(buffer.colors()[0], VISUALIZATION_ERROR_COLOR);
        // Hovered point grows but keeps its base colour.
        assert_eq!(buffer.colors()[1], base);
        assert_eq!(buffer.sizes()[1], HOVER_POINT_SIZE);
    }

    #[test]
    fn restyle_after_clearing_everything_restores_the_snapshot() {
        let mut buffer = buffer_of(4);
        let before_colors = buffer.colors().to_vec();
        let before_sizes = buffer.sizes().to_vec();

        let highlights = HighlightAttributes {
            blue: vec![0, 1],
            all_highlighted: vec![2],
            ..Default::default()
        };
        let mut hover = HoverState::default();
        hover.apply_hit(Some(3));
        refresh_styles(&mut buffer, &highlights, &hover, &SelectionState::default());
        assert_ne!(buffer.colors(), before_colors.as_slice());

        refresh_styles(
            &mut buffer,
            &HighlightAttributes::default(),
            &HoverState::default(),
            &SelectionState::default(),
        );
        assert_eq!(buffer.colors(), before_colors.as_slice());
        assert_eq!(buffer.sizes(), before_sizes.as_slice());
    }

    #[test]
    fn double_click_window_is_tracked_per_view() {
        let mut selection = SelectionState::default();
        assert!(!selection.register_click(10.0));
        assert!(selection.register_click(10.0 + DOUBLE_CLICK_SECS * 0.5));
        assert!(!selection.register_click(20.0));
    }
}
