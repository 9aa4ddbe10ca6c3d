//! Hit-testing: cursor position to nearest visible point.
//!
//! The cursor is mapped through the camera's letterboxed viewport (not the
//! raw window rect) into a world ray, intersected with the z = 0 embedding
//! plane, and matched against the buffer within a zoom-scaled radius.

use bevy::prelude::*;
use constants::PICK_THRESHOLD;

use crate::engine::camera::PanZoomCamera;
use crate::engine::point_cloud::PointCloudBuffer;

/// Intersection of a ray with the embedding plane (z = 0). `None` for rays
/// parallel to the plane or pointing away from it.
pub fn intersect_embedding_plane(origin: Vec3, direction: Vec3) -> Option<Vec2> {
    if direction.z.abs() < 1e-6 {
        return None;
    }
    let t = -origin.z / direction.z;
    if t < 0.0 {
        return None;
    }
    Some((origin + direction * t).truncate())
}

/// Nearest visible point within `threshold` of `target`, by in-plane
/// distance. Hidden points keep their buffer slot but never hit.
pub fn nearest_visible_point(
    buffer: &PointCloudBuffer,
    target: Vec2,
    threshold: f32,
) -> Option<usize> {
    let threshold_sq = threshold * threshold;
    let mut best: Option<(usize, f32)> = None;
    for (i, p) in buffer.positions().iter().enumerate() {
        if !buffer.is_visible(i) {
            continue;
        }
        let d = Vec2::new(p[0], p[1]).distance_squared(target);
        if d <= threshold_sq && best.is_none_or(|(_, bd)| d < bd) {
            best = Some((i, d));
        }
    }
    best.map(|(i, _)| i)
}

/// The hit radius shrinks as the view zooms in.
pub fn pick_threshold(zoom: f32) -> f32 {
    PICK_THRESHOLD / zoom
}

/// Full cursor-to-point pick for one view. Any missing piece (cursor outside
/// the viewport, no viewport yet, degenerate ray) is a `None`, not an error;
/// mouse events keep arriving during teardown.
pub fn pick_at_cursor(
    camera: &Camera,
    camera_transform: &GlobalTransform,
    pz: &PanZoomCamera,
    cursor: Vec2,
    buffer: &PointCloudBuffer,
) -> Option<usize> {
    let rect = camera.logical_viewport_rect()?;
    if !rect.contains(cursor) {
        return None;
    }
    let ray = camera
        .viewport_to_world(camera_transform, cursor - rect.min)
        .ok()?;
    let target = intersect_embedding_plane(ray.origin, ray.direction.as_vec3())?;
    nearest_visible_point(buffer, target, pick_threshold(pz.zoom))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::assets::ProjectionResult;

    fn buffer_of(points: &[[f32; 2]]) -> PointCloudBuffer {
        PointCloudBuffer::from_result(&ProjectionResult {
            grid_index: [0.0, 0.0, 1.0, 1.0],
            grid_color: String::new(),
            result: points.to_vec(),
            label_list: vec![0; points.len()],
            color_list: vec![[1.0, 1.0, 1.0]],
        })
    }

    #[test]
    fn vertical_ray_hits_the_plane() {
        let hit = intersect_embedding_plane(Vec3::new(0.3, -0.2, 10.0), Vec3::NEG_Z).unwrap();
        assert!((hit - Vec2::new(0.3, -0.2)).length() < 1e-6);
    }

    #[test]
    fn parallel_and_backwards_rays_miss() {
        assert_eq!(intersect_embedding_plane(Vec3::new(0.0, 0.0, 1.0), Vec3::X), None);
        assert_eq!(intersect_embedding_plane(Vec3::new(0.0, 0.0, 1.0), Vec3::Z), None);
    }

    #[test]
    fn nearest_point_wins() {
        let buffer = buffer_of(&[[0.0, 0.0], [0.05, 0.0], [1.0, 1.0]]);
        assert_eq!(
            nearest_visible_point(&buffer, Vec2::new(0.04, 0.0), 0.15),
            Some(1)
        );
    }

    #[test]
    fn hits_outside_the_threshold_are_none() {
        let buffer = buffer_of(&[[0.0, 0.0]]);
        assert_eq!(nearest_visible_point(&buffer, Vec2::new(1.0, 0.0), 0.15), None);
    }

    #[test]
    fn hidden_points_are_not_pickable() {
        let mut buffer = buffer_of(&[[0.0, 0.0], [0.3, 0.0]]);
        assert_eq!(nearest_visible_point(&buffer, Vec2::ZERO, 0.15), Some(0));
        buffer.set_visible(0, false);
        assert_eq!(nearest_visible_point(&buffer, Vec2::ZERO, 0.15), None);
    }

    #[test]
    fn threshold_shrinks_with_zoom() {
        assert!(pick_threshold(10.0) < pick_threshold(1.0));
        let buffer = buffer_of(&[[0.1, 0.0]]);
        // In range at zoom 1, out of range once zoomed in.
        assert_eq!(nearest_visible_point(&buffer, Vec2::ZERO, pick_threshold(1.0)), Some(0));
        assert_eq!(nearest_visible_point(&buffer, Vec2::ZERO, pick_threshold(4.0)), None);
    }
}
