//! Orthographic pan/zoom control for one or two letterboxed views.
//!
//! One zoom law everywhere: wheel delta maps through an exponential
//! re-parameterisation (`ZOOM_WHEEL_BASE^-delta`) onto a multiplicative
//! zoom, clamped to `[MIN_ZOOM_SCALE, MAX_ZOOM_SCALE]`. Pan converts pixel
//! deltas to world units through the visible world extent, so it tracks the
//! cursor at any zoom.

use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::render::camera::Viewport;
use bevy::window::PrimaryWindow;
use bevy::prelude::*;
use constants::{
    CLICK_DRAG_TOLERANCE, MAX_ZOOM_SCALE, MIN_ZOOM_SCALE, ZOOM_LINE_TO_PIXEL, ZOOM_WHEEL_BASE,
};

use crate::engine::sync::{ViewId, ViewLayout};

/// Viewer-facing camera options. Bounds clamping is deliberately a flag, not
/// an invariant: free panning past the data edge is allowed by default.
#[derive(Resource, Debug, Clone, Copy)]
pub struct CameraSettings {
    pub clamp_to_bounds: bool,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            clamp_to_bounds: false,
        }
    }
}

/// Per-view camera state. One instance per camera entity; event handlers
/// receive it by query instead of reaching for ambient globals.
#[derive(Component, Debug, Clone)]
pub struct PanZoomCamera {
    pub zoom: f32,
    /// Visible world extent at zoom 1.0, fixed when the view is framed.
    pub world_size: Vec2,
    /// Data extent of the loaded projection.
    pub bounds: Rect,
    pub panning: bool,
    /// Whether the most recent press landed inside this view's viewport.
    pub press_in_view: bool,
    pub press_position: Vec2,
    /// Cursor travel since the last press, used to tell clicks from drags.
    pub drag_distance: f32,
}

impl PanZoomCamera {
    pub fn new(bounds: Rect) -> Self {
        Self {
            zoom: 1.0,
            world_size: bounds.size(),
            bounds,
            panning: false,
            press_in_view: false,
            press_position: Vec2::ZERO,
            drag_distance: 0.0,
        }
    }

    /// Visible world extent at the current zoom.
    pub fn visible_world(&self) -> Vec2 {
        self.world_size / self.zoom
    }

    /// A press/release pair is a click only when the press began in this
    /// view, the release ended in it, and the cursor barely travelled in
    /// between.
    pub fn is_click(&self, release_in_view: bool) -> bool {
        self.press_in_view && release_in_view && self.drag_distance < CLICK_DRAG_TOLERANCE
    }
}

impl Default for PanZoomCamera {
    fn default() -> Self {
        Self::new(Rect::new(-1.0, -1.0, 1.0, 1.0))
    }
}

/// The one zoom law. Positive wheel delta (scroll down) zooms out.
pub fn zoom_after_wheel(zoom: f32, wheel_delta: f32) -> f32 {
    (zoom * ZOOM_WHEEL_BASE.powf(-wheel_delta)).clamp(MIN_ZOOM_SCALE, MAX_ZOOM_SCALE)
}

/// Clamps a camera centre so the visible rect stays inside `bounds`. When
/// the view is wider than the data, the centre pins to the bounds centre.
pub fn clamp_center(center: Vec2, bounds: Rect, half_visible: Vec2) -> Vec2 {
    let clamp_axis = |c: f32, min: f32, max: f32, half: f32| {
        if max - min <= 2.0 * half {
            (min + max) * 0.5
        } else {
            c.clamp(min + half, max - half)
        }
    };
    Vec2::new(
        clamp_axis(center.x, bounds.min.x, bounds.max.x, half_visible.x),
        clamp_axis(center.y, bounds.min.y, bounds.max.y, half_visible.y),
    )
}

/// Wheel zoom and left-drag pan for whichever view the cursor is over.
pub fn camera_controller(
    windows: Query<&Window, With<PrimaryWindow>>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut scroll_events: EventReader<MouseWheel>,
    settings: Res<CameraSettings>,
    mut cameras: Query<(&Camera, &mut Transform, &mut Projection, &mut PanZoomCamera)>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let cursor = window.cursor_position();

    let mouse_delta: Vec2 = mouse_motion.read().map(|m| m.delta).sum();

    let mut scroll_accum = 0.0;
    for ev in scroll_events.read() {
        scroll_accum += match ev.unit {
            MouseScrollUnit::Line => ev.y * ZOOM_LINE_TO_PIXEL,
            MouseScrollUnit::Pixel => ev.y,
        };
    }

    for (camera, mut transform, mut projection, mut pz) in &mut cameras {
        let Some(rect) = camera.logical_viewport_rect() else {
            continue;
        };
        let cursor_in_view = cursor.is_some_and(|c| rect.contains(c));

        if mouse_button.just_pressed(MouseButton::Left) {
            pz.panning = cursor_in_view;
            pz.press_in_view = cursor_in_view;
            pz.press_position = cursor.unwrap_or_default();
            pz.drag_distance = 0.0;
        }
        if mouse_button.just_released(MouseButton::Left) {
            pz.panning = false;
        }

        if cursor_in_view && scroll_accum.abs() > f32::EPSILON {
            pz.zoom = zoom_after_wheel(pz.zoom, scroll_accum);
            if let Projection::Orthographic(ortho) = projection.as_mut() {
                ortho.scale = 1.0 / pz.zoom;
            }
        }

        if pz.panning && mouse_button.pressed(MouseButton::Left) && mouse_delta != Vec2::ZERO {
            pz.drag_distance += mouse_delta.length();
            let world_per_pixel = pz.visible_world() / rect.size();
            // Screen y grows downwards, world y upwards.
            transform.translation.x -= mouse_delta.x * world_per_pixel.x;
            transform.translation.y += mouse_delta.y * world_per_pixel.y;
        }

        if settings.clamp_to_bounds {
            let clamped = clamp_center(
                transform.translation.truncate(),
                pz.bounds,
                pz.visible_world() * 0.5,
            );
            transform.translation.x = clamped.x;
            transform.translation.y = clamped.y;
        }
    }
}

/// Recomputes the letterboxed square viewport of each view on every frame,
/// so window resizes are picked up immediately. Single view: one centred
/// square. Pair: two squares, reference left, target right.
pub fn update_view_viewports(
    windows: Query<&Window, With<PrimaryWindow>>,
    layout: Res<ViewLayout>,
    mut cameras: Query<(&mut Camera, &ViewId)>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let width = window.physical_width();
    let height = window.physical_height();
    if width == 0 || height == 0 {
        return;
    }

    for (mut camera, view) in &mut cameras {
        let (position, side) = if layout.pair {
            let half = width / 2;
            let side = half.min(height);
            let x = match view {
                ViewId::Reference => (half - side) / 2,
                ViewId::Target => half + (half - side) / 2,
            };
            (UVec2::new(x, (height - side) / 2), side)
        } else {
            let side = width.min(height);
            (UVec2::new((width - side) / 2, (height - side) / 2), side)
        };
        if side == 0 {
            continue;
        }
        camera.viewport = Some(Viewport {
            physical_position: position,
            physical_size: UVec2::splat(side),
            ..default()
        });
    }
}
