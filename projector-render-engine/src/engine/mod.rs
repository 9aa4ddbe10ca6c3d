pub mod assets;
pub mod camera;
pub mod mesh;
pub mod point_cloud;
pub mod scene;
pub mod shaders;
pub mod sync;
