use bevy::{
    prelude::*,
    reflect::TypePath,
    render::render_resource::{AsBindGroup, ShaderRef},
};

/// Point sprite material. The fragment stage discards fully transparent
/// (filtered-out) points before blending.
#[derive(Asset, TypePath, AsBindGroup, Debug, Clone, Default)]
pub struct PointSpriteMaterial {}

impl Material for PointSpriteMaterial {
    fn vertex_shader() -> ShaderRef {
        "shaders/point_sprite.wgsl".into()
    }

    fn fragment_shader() -> ShaderRef {
        "shaders/point_sprite.wgsl".into()
    }

    fn alpha_mode(&self) -> AlphaMode {
        AlphaMode::Blend
    }
}
