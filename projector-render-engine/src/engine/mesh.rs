//! Mesh surface for the point buffers. One `PointList` mesh per view;
//! colour+alpha ride in the vertex colour attribute and per-point size in
//! UV.x, which the sprite shader consumes directly.

use bevy::prelude::*;
use bevy::render::mesh::PrimitiveTopology;
use bevy::render::render_asset::RenderAssetUsages;

use super::point_cloud::PointCloudBuffer;

pub fn create_point_cloud_mesh(buffer: &PointCloudBuffer) -> Mesh {
    let mut mesh = Mesh::new(
        PrimitiveTopology::PointList,
        RenderAssetUsages::RENDER_WORLD,
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, buffer.positions().to_vec());
    mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, pack_colors(buffer));
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, pack_size_uv(buffer));
    mesh
}

/// Re-uploads colour/size/visibility attributes after any buffer mutation.
/// Bevy's change detection is the "needs update" flag: this runs after the
/// interaction systems in the same frame, so a hover and its upload are
/// never split across frames.
pub fn sync_buffer_to_mesh(
    clouds: Query<(&PointCloudBuffer, &Mesh3d), Changed<PointCloudBuffer>>,
    mut meshes: ResMut<Assets<Mesh>>,
) {
    for (buffer, mesh_handle) in &clouds {
        let Some(mesh) = meshes.get_mut(&mesh_handle.0) else {
            continue;
        };
        mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, pack_colors(buffer));
        mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, pack_size_uv(buffer));
    }
}

fn pack_colors(buffer: &PointCloudBuffer) -> Vec<[f32; 4]> {
    buffer
        .colors()
        .iter()
        .zip(buffer.alphas())
        .map(|(c, &a)| [c[0], c[1], c[2], a])
        .collect()
}

fn pack_size_uv(buffer: &PointCloudBuffer) -> Vec<[f32; 2]> {
    buffer.sizes().iter().map(|&s| [s, 0.0]).collect()
}
