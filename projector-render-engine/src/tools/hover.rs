//! Hover/lock state machine. Three states per view: idle, hovering an
//! index, or locked on an index. A lock freezes hover updates until the
//! next click releases it. Dataset reload discards everything.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::engine::camera::PanZoomCamera;
use crate::engine::point_cloud::PointCloudBuffer;
use crate::engine::sync::{HoverSyncEvent, ViewId, ViewLayout};
use super::picking::pick_at_cursor;

#[derive(Component, Debug, Default, Clone, PartialEq, Eq)]
pub struct HoverState {
    /// Point under the cursor, at most one per view.
    pub hovered: Option<usize>,
    /// Lock anchor; suppresses hover updates while set.
    pub locked: Option<usize>,
    /// Hover mirrored from the partner view, managed by the sync channel
    /// only.
    pub synced: Option<usize>,
}

impl HoverState {
    /// Would a mouse-move hit change anything? Split from [`apply_hit`] so
    /// systems can skip the mutable borrow (and its change tick) on no-ops.
    ///
    /// [`apply_hit`]: HoverState::apply_hit
    pub fn hit_would_change(&self, hit: Option<usize>) -> bool {
        self.locked.is_none() && self.hovered != hit
    }

    /// Mouse-move transition: idle/hovering follow the hit; locked ignores
    /// it. Returns `true` when the hovered index changed.
    pub fn apply_hit(&mut self, hit: Option<usize>) -> bool {
        if !self.hit_would_change(hit) {
            return false;
        }
        self.hovered = hit;
        true
    }

    /// Click transition. A set lock always releases (falling back to the
    /// current hit); otherwise a hit becomes the new lock. Returns `true`
    /// when the state changed.
    pub fn toggle_lock(&mut self, hit: Option<usize>) -> bool {
        if self.locked.is_some() {
            self.locked = None;
            self.hovered = hit;
            true
        } else if hit.is_some() {
            self.locked = hit;
            self.hovered = hit;
            true
        } else {
            false
        }
    }

    /// Dataset reload: back to idle, nothing survives.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Raycasts the view under the cursor and walks the hover machine. Views
/// the cursor left get their hover cleared; locked views ignore both.
pub fn hover_system(
    windows: Query<&Window, With<PrimaryWindow>>,
    layout: Res<ViewLayout>,
    cameras: Query<(&Camera, &GlobalTransform, &PanZoomCamera, &ViewId)>,
    mut clouds: Query<(&ViewId, &PointCloudBuffer, &mut HoverState)>,
    mut sync: EventWriter<HoverSyncEvent>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let cursor = window.cursor_position();

    for (camera, camera_transform, pz, camera_view) in &cameras {
        for (view, buffer, mut hover) in &mut clouds {
            if view != camera_view {
                continue;
            }
            let hit = cursor
                .and_then(|c| pick_at_cursor(camera, camera_transform, pz, c, buffer));
            if !hover.hit_would_change(hit) {
                continue;
            }
            hover.apply_hit(hit);
            if layout.pair {
                sync.write(HoverSyncEvent {
                    view: *view,
                    index: hover.hovered,
                });
            }
        }
    }
}
