//! The projection "result" payload: one 2-D embedding of a dataset epoch,
//! loaded as a JSON asset.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum PayloadError {
    #[error("label_list has {labels} entries for {points} points")]
    LabelCountMismatch { labels: usize, points: usize },
    #[error("label {label} at point {index} exceeds color_list of {colors} entries")]
    LabelOutOfRange {
        index: usize,
        label: u32,
        colors: usize,
    },
}

/// One epoch of projected points plus its display metadata.
///
/// `result` carries the 2-D positions, `label_list[i]` indexes into
/// `color_list` for the base colour of point i, `grid_index` is the world
/// extent `[xmin, ymin, xmax, ymax]` and `grid_color` names the background
/// density image.
#[derive(Debug, Clone, Serialize, Deserialize, Asset, TypePath)]
pub struct ProjectionResult {
    pub grid_index: [f32; 4],
    #[serde(default)]
    pub grid_color: String,
    pub result: Vec<[f32; 2]>,
    pub label_list: Vec<u32>,
    pub color_list: Vec<[f32; 3]>,
}

impl ProjectionResult {
    /// Rejects payloads whose parallel arrays disagree. A rejected payload
    /// leaves the previous dataset in place.
    pub fn validate(&self) -> Result<(), PayloadError> {
        if self.label_list.len() != self.result.len() {
            return Err(PayloadError::LabelCountMismatch {
                labels: self.label_list.len(),
                points: self.result.len(),
            });
        }
        for (index, &label) in self.label_list.iter().enumerate() {
            if label as usize >= self.color_list.len() {
                return Err(PayloadError::LabelOutOfRange {
                    index,
                    label,
                    colors: self.color_list.len(),
                });
            }
        }
        Ok(())
    }

    pub fn bounds(&self) -> ProjectionBounds {
        ProjectionBounds {
            min_x: self.grid_index[0],
            min_y: self.grid_index[1],
            max_x: self.grid_index[2],
            max_y: self.grid_index[3],
        }
    }

    /// Positions as f64 rows for the spatial structures.
    pub fn points_f64(&self) -> Vec<Vec<f64>> {
        self.result
            .iter()
            .map(|p| vec![p[0] as f64, p[1] as f64])
            .collect()
    }
}

/// World extent of one projection, from the payload's `grid_index`.
#[derive(Debug, Clone, Copy, Component)]
pub struct ProjectionBounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl ProjectionBounds {
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            (self.min_x + self.max_x) * 0.5,
            (self.min_y + self.max_y) * 0.5,
        )
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.max_x - self.min_x, self.max_y - self.min_y)
    }

    pub fn as_rect(&self) -> Rect {
        Rect::new(self.min_x, self.min_y, self.max_x, self.max_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> ProjectionResult {
        ProjectionResult {
            grid_index: [-1.0, -2.0, 3.0, 4.0],
            grid_color: String::new(),
            result: vec![[0.0, 0.0], [1.0, 1.0]],
            label_list: vec![0, 1],
            color_list: vec![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
        }
    }

    #[test]
    fn valid_payload_passes() {
        assert!(payload().validate().is_ok());
    }

    #[test]
    fn label_count_mismatch_is_rejected() {
        let mut p = payload();
        p.label_list.pop();
        assert_eq!(
            p.validate().unwrap_err(),
            PayloadError::LabelCountMismatch {
                labels: 1,
                points: 2
            }
        );
    }

    #[test]
    fn out_of_range_label_is_rejected() {
        let mut p = payload();
        p.label_list[1] = 9;
        assert!(matches!(
            p.validate().unwrap_err(),
            PayloadError::LabelOutOfRange { index: 1, label: 9, .. }
        ));
    }

    #[test]
    fn parses_a_payload_without_a_density_image() {
        let json = r#"{
            "grid_index": [-1.0, -1.0, 1.0, 1.0],
            "result": [[0.1, -0.2]],
            "label_list": [0],
            "color_list": [[1.0, 0.5, 0.0]]
        }"#;
        let p: ProjectionResult = serde_json::from_str(json).unwrap();
        assert!(p.grid_color.is_empty());
        assert!(p.validate().is_ok());
        assert_eq!(p.result, vec![[0.1, -0.2]]);
    }

    #[test]
    fn bounds_derive_from_grid_index() {
        let b = payload().bounds();
        assert_eq!(b.center(), Vec2::new(1.0, 1.0));
        assert_eq!(b.size(), Vec2::new(4.0, 6.0));
    }
}
