//! Highlight styling lives in one place so every view applies the same
//! precedence. Sets later in [`HIGHLIGHT_PRECEDENCE`] overwrite earlier ones
//! on overlap.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HighlightKind {
    Green,
    Blue,
    Yellow,
    AllHighlighted,
    VisualizationError,
    Hover,
    Neighbor,
    Selection,
}

/// Canonical application order, weakest first. Selection always wins.
pub const HIGHLIGHT_PRECEDENCE: &[HighlightKind] = &[
    HighlightKind::Green,
    HighlightKind::Blue,
    HighlightKind::Yellow,
    HighlightKind::AllHighlighted,
    HighlightKind::VisualizationError,
    HighlightKind::Hover,
    HighlightKind::Neighbor,
    HighlightKind::Selection,
];

pub const GREEN_HIGHLIGHT_COLOR: [f32; 3] = [0.13, 0.70, 0.30];
pub const BLUE_HIGHLIGHT_COLOR: [f32; 3] = [0.16, 0.44, 0.87];
pub const YELLOW_HIGHLIGHT_COLOR: [f32; 3] = [0.95, 0.77, 0.06];
pub const ALL_HIGHLIGHTED_COLOR: [f32; 3] = [0.90, 0.49, 0.13];
pub const VISUALIZATION_ERROR_COLOR: [f32; 3] = [0.86, 0.21, 0.27];
pub const NEIGHBOR_COLOR: [f32; 3] = [0.55, 0.36, 0.96];
pub const SELECTION_COLOR: [f32; 3] = [1.00, 0.27, 0.50];
