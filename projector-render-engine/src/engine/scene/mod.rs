//! View lifecycle: loading projection payloads and (re)building the scene
//! entities for each view.
//!
//! A rebuild always tears the previous entities down first, inside the same
//! system invocation, so there is never a frame where two generations of a
//! view coexist (the stale-render-loop hazard of the original design).

use bevy::asset::LoadState;
use bevy::prelude::*;
use bevy::render::camera::ScalingMode;
use bevy::render::view::NoFrustumCulling;
use constants::{
    BACKGROUND_PLANE_COLOR, FRAME_MARGIN, REFERENCE_RESULT_PATH, TARGET_RESULT_PATH,
};

use super::assets::ProjectionResult;
use super::camera::PanZoomCamera;
use super::mesh::create_point_cloud_mesh;
use super::point_cloud::{NeighborIndex, PointCloud, PointCloudBuffer};
use super::shaders::PointSpriteMaterial;
use super::sync::ViewId;
use crate::tools::hover::HoverState;
use crate::tools::selection::SelectionState;

/// Payload handles per view, consumed by the rebuild system.
#[derive(Resource, Default)]
pub struct ProjectionLoader {
    pub views: Vec<(ViewId, Handle<ProjectionResult>)>,
}

/// Background density plane; its texture is applied once loaded and simply
/// stays absent when the image never arrives.
#[derive(Component)]
pub struct BackgroundPlane {
    texture: Option<Handle<Image>>,
    applied: bool,
}

/// Spawns the per-view cameras and kicks off the payload loads.
pub fn setup(mut commands: Commands, asset_server: Res<AssetServer>) {
    let mut loader = ProjectionLoader::default();

    info!("Loading reference projection from: {}", REFERENCE_RESULT_PATH);
    loader.views.push((
        ViewId::Reference,
        asset_server.load(REFERENCE_RESULT_PATH),
    ));
    spawn_view_camera(&mut commands, ViewId::Reference, 0);

    if let Some(target_path) = TARGET_RESULT_PATH {
        info!("Loading target projection from: {}", target_path);
        loader
            .views
            .push((ViewId::Target, asset_server.load(target_path)));
        spawn_view_camera(&mut commands, ViewId::Target, 1);
    }

    commands.insert_resource(loader);
}

fn spawn_view_camera(commands: &mut Commands, view: ViewId, order: isize) {
    commands.spawn((
        Camera3d::default(),
        Camera {
            order,
            ..default()
        },
        Projection::Orthographic(OrthographicProjection::default_3d()),
        Transform::from_xyz(0.0, 0.0, 10.0),
        view,
        view.render_layers(),
        PanZoomCamera::default(),
    ));
}

/// Rebuilds a view whenever its payload arrives or is replaced. All four
/// point buffers are reallocated at the new N; hover, lock and selection
/// state never survive a reload.
pub fn rebuild_views(
    mut commands: Commands,
    mut events: EventReader<AssetEvent<ProjectionResult>>,
    results: Res<Assets<ProjectionResult>>,
    loader: Res<ProjectionLoader>,
    asset_server: Res<AssetServer>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<PointSpriteMaterial>>,
    mut standard_materials: ResMut<Assets<StandardMaterial>>,
    mut cameras: Query<
        (&ViewId, &mut Transform, &mut Projection, &mut PanZoomCamera),
        With<Camera>,
    >,
    existing: Query<(Entity, &ViewId), Or<(With<PointCloud>, With<BackgroundPlane>)>>,
) {
    for event in events.read() {
        let (AssetEvent::Added { id } | AssetEvent::Modified { id }) = event else {
            continue;
        };
        let Some((view, _)) = loader.views.iter().find(|(_, handle)| handle.id() == *id)
        else {
            continue;
        };
        let Some(result) = results.get(*id) else {
            continue;
        };
        if let Err(err) = result.validate() {
            warn!("{} view: rejecting projection payload: {err}", view.label());
            continue;
        }

        // Teardown before rebuild.
        for (entity, entity_view) in &existing {
            if entity_view == view {
                commands.entity(entity).despawn();
            }
        }

        let buffer = PointCloudBuffer::from_result(result);
        let mesh = create_point_cloud_mesh(&buffer);
        commands.spawn((
            Mesh3d(meshes.add(mesh)),
            MeshMaterial3d(materials.add(PointSpriteMaterial::default())),
            Transform::IDENTITY,
            NoFrustumCulling,
            *view,
            view.render_layers(),
            PointCloud,
            buffer,
            NeighborIndex::from_result(result),
            HoverState::default(),
            SelectionState::default(),
        ));

        spawn_background_plane(
            &mut commands,
            *view,
            result,
            &asset_server,
            &mut meshes,
            &mut standard_materials,
        );

        for (camera_view, mut transform, mut projection, mut pz) in &mut cameras {
            if camera_view == view {
                frame_camera(result, &mut transform, &mut projection, &mut pz);
            }
        }

        info!(
            "{} view rebuilt: {} points, {} label classes",
            view.label(),
            result.result.len(),
            result.color_list.len()
        );
    }
}

/// Re-centres the camera on the payload's grid extent and resets zoom.
fn frame_camera(
    result: &ProjectionResult,
    transform: &mut Transform,
    projection: &mut Projection,
    pz: &mut PanZoomCamera,
) {
    let bounds = result.bounds();
    let center = bounds.center();
    let world_size = bounds.size() * FRAME_MARGIN;

    *pz = PanZoomCamera::new(bounds.as_rect());
    pz.world_size = world_size;
    transform.translation = center.extend(10.0);
    *projection = Projection::Orthographic(OrthographicProjection {
        scale: 1.0,
        scaling_mode: ScalingMode::Fixed {
            width: world_size.x,
            height: world_size.y,
        },
        ..OrthographicProjection::default_3d()
    });
}

fn spawn_background_plane(
    commands: &mut Commands,
    view: ViewId,
    result: &ProjectionResult,
    asset_server: &AssetServer,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) {
    let bounds = result.bounds();
    let size = bounds.size();
    let texture = (!result.grid_color.is_empty())
        .then(|| asset_server.load(result.grid_color.clone()));

    commands.spawn((
        Mesh3d(meshes.add(Rectangle::new(size.x, size.y))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: BACKGROUND_PLANE_COLOR,
            unlit: true,
            ..default()
        })),
        // Just behind the embedding plane.
        Transform::from_translation(bounds.center().extend(-0.1)),
        view,
        view.render_layers(),
        BackgroundPlane {
            texture,
            applied: false,
        },
    ));
}

/// Swaps the density texture in once it finishes loading. A failed or
/// missing image leaves the plane untextured, which is not an error.
pub fn apply_background_texture(
    asset_server: Res<AssetServer>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut planes: Query<(&mut BackgroundPlane, &MeshMaterial3d<StandardMaterial>)>,
) {
    for (mut plane, material_handle) in &mut planes {
        if plane.applied {
            continue;
        }
        let Some(texture) = plane.texture.clone() else {
            continue;
        };
        if matches!(
            asset_server.get_load_state(&texture),
            Some(LoadState::Loaded)
        ) {
            if let Some(material) = materials.get_mut(&material_handle.0) {
                material.base_color = Color::WHITE;
                material.base_color_texture = Some(texture);
            }
            plane.applied = true;
        }
    }
}
