use bevy::color::{Color, Srgba};

/// Base display size of an unstyled point, in shader size units.
pub const DEFAULT_POINT_SIZE: f32 = 2.0;
/// Size applied to the point under the cursor.
pub const HOVER_POINT_SIZE: f32 = 10.0;
/// Size applied to points in the persistent multi-select list.
pub const SELECTED_POINT_SIZE: f32 = 10.0;
/// Size applied to points in any attribute-driven highlight set.
pub const HIGHLIGHT_POINT_SIZE: f32 = 6.0;
/// Size applied to nearest neighbours of the selection anchor.
pub const NEIGHBOR_POINT_SIZE: f32 = 6.0;

pub const MIN_ZOOM_SCALE: f32 = 0.5;
pub const MAX_ZOOM_SCALE: f32 = 30.0;

/// Multiplicative zoom law: one wheel unit scales zoom by `base^(-delta)`.
pub const ZOOM_WHEEL_BASE: f32 = 1.0015;
/// Line-scroll wheels report whole notches; convert to pixel-ish deltas.
pub const ZOOM_LINE_TO_PIXEL: f32 = 53.0;

/// World-space pick radius at zoom 1.0. Effective radius is this over zoom,
/// so the hit area shrinks as the view zooms in.
pub const PICK_THRESHOLD: f32 = 0.15;

/// Mouse travel (logical px) below which a press/release pair counts as a click.
pub const CLICK_DRAG_TOLERANCE: f32 = 4.0;
/// Two clicks closer together than this are one double-click.
pub const DOUBLE_CLICK_SECS: f32 = 0.3;

/// Neighbours pulled into the neighbour highlight set when a point is
/// locked or selected.
pub const NEIGHBOR_COUNT: usize = 16;

pub const BACKGROUND_CLEAR_COLOR: Color = Color::Srgba(Srgba {
    red: 0.10,
    green: 0.10,
    blue: 0.12,
    alpha: 1.0,
});

/// Background plane tint while (or if) the density texture never loads.
pub const BACKGROUND_PLANE_COLOR: Color = Color::Srgba(Srgba {
    red: 0.18,
    green: 0.18,
    blue: 0.20,
    alpha: 1.0,
});

/// Framed world extent relative to the payload's grid extent, leaving a
/// small border around the data.
pub const FRAME_MARGIN: f32 = 1.05;

pub const REFERENCE_RESULT_PATH: &str = "projections/reference.json";
/// Set to `Some(path)` to run two synced views (reference against target).
pub const TARGET_RESULT_PATH: Option<&str> = Some("projections/target.json");
