pub mod engine;
pub mod spatial;
pub mod tools;

use bevy::asset::AssetMetaCheck;
use bevy::prelude::*;
use bevy::window::PresentMode;
use bevy_common_assets::json::JsonAssetPlugin;
use constants::{BACKGROUND_CLEAR_COLOR, TARGET_RESULT_PATH};

use engine::assets::ProjectionResult;
use engine::camera::{CameraSettings, camera_controller, update_view_viewports};
use engine::mesh::sync_buffer_to_mesh;
use engine::scene::{apply_background_texture, rebuild_views, setup};
use engine::shaders::PointSpriteMaterial;
use engine::sync::{HoverSyncEvent, ViewLayout, apply_remote_hover};
use tools::hover::hover_system;
use tools::selection::{HighlightAttributes, apply_point_styles, handle_clicks};

/// Assembles the projector application: one view, or a synced
/// reference/target pair when a target payload is configured.
pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .add_plugins(MaterialPlugin::<PointSpriteMaterial>::default())
        .add_plugins(JsonAssetPlugin::<ProjectionResult>::new(&["json"]))
        .add_event::<HoverSyncEvent>()
        .insert_resource(ClearColor(BACKGROUND_CLEAR_COLOR))
        .insert_resource(ViewLayout {
            pair: TARGET_RESULT_PATH.is_some(),
        })
        .init_resource::<CameraSettings>()
        .init_resource::<HighlightAttributes>()
        .add_systems(Startup, setup)
        .add_systems(
            Update,
            (rebuild_views, apply_background_texture, update_view_viewports),
        )
        .add_systems(
            Update,
            (
                camera_controller,
                hover_system,
                apply_remote_hover,
                handle_clicks,
                apply_point_styles,
                sync_buffer_to_mesh,
            )
                .chain()
                .after(rebuild_views),
        );

    app
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}

fn create_window_config() -> Window {
    #[cfg(target_arch = "wasm32")]
    return Window {
        title: "Embedding Projector".into(),
        canvas: Some("#projector".into()),
        fit_canvas_to_parent: true,
        prevent_default_event_handling: false,
        present_mode: PresentMode::AutoVsync,
        ..default()
    };

    #[cfg(not(target_arch = "wasm32"))]
    Window {
        title: "Embedding Projector".into(),
        present_mode: PresentMode::AutoVsync,
        ..default()
    }
}
