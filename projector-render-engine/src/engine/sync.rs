//! Cross-view hover synchronisation. Paired views exchange only point
//! indices over a typed event channel; each view mutates its own buffer.

use bevy::prelude::*;
use bevy::render::view::RenderLayers;

use super::point_cloud::PointCloudBuffer;
use crate::tools::hover::HoverState;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewId {
    Reference,
    Target,
}

impl ViewId {
    pub fn opposite(self) -> Self {
        match self {
            Self::Reference => Self::Target,
            Self::Target => Self::Reference,
        }
    }

    /// Each view renders on its own layer so paired cameras only see their
    /// own cloud and background.
    pub fn render_layers(self) -> RenderLayers {
        match self {
            Self::Reference => RenderLayers::layer(1),
            Self::Target => RenderLayers::layer(2),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Reference => "reference",
            Self::Target => "target",
        }
    }
}

/// One view, or a reference/target pair with synced hover.
#[derive(Resource, Debug, Clone, Copy)]
pub struct ViewLayout {
    pub pair: bool,
}

/// Hover change broadcast by the view that ran the raycast.
#[derive(Event, Debug, Clone, Copy)]
pub struct HoverSyncEvent {
    pub view: ViewId,
    pub index: Option<usize>,
}

/// Applies a partner view's hover index locally, without raycasting. An
/// index beyond this view's point count is dropped: paired datasets are not
/// guaranteed to be the same size.
pub fn apply_remote_hover(
    mut events: EventReader<HoverSyncEvent>,
    mut clouds: Query<(&ViewId, &PointCloudBuffer, &mut HoverState)>,
) {
    for event in events.read() {
        let remote = event.view.opposite();
        for (view, buffer, mut hover) in &mut clouds {
            if *view != remote {
                continue;
            }
            let index = event.index.filter(|&i| i < buffer.len());
            if hover.synced != index {
                hover.synced = index;
            }
        }
    }
}
