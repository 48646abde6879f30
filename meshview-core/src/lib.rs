/// Meshview Core Library - CPU rendering pipeline for polygonal meshes
///
/// This library provides the algebra kernel, camera and transform math,
/// mesh storage with triangulation and face normals, mesh text I/O, and a
/// software rasterizer with depth buffering, flat shading and nearest
/// texture sampling.

pub mod algebra;
pub mod camera;
pub mod color;
pub mod config;
pub mod error;
pub mod mesh;
pub mod normals;
pub mod obj;
pub mod raster;
pub mod texture;
pub mod transform;
pub mod triangulate;

// Re-export commonly used types
pub use algebra::{Matrix3, Matrix4, Vector2, Vector3, Vector4};
pub use camera::Camera;
pub use color::Color;
pub use config::RenderConfig;
pub use error::{ArgumentError, ArithmeticError, Error, ParseError, ValidationError};
pub use mesh::{Mesh, Polygon, Vertex};
pub use raster::{FrameStats, Rasterizer, RenderSettings, SceneObject, TextureSampling};
pub use texture::{Texture, TextureCache};
pub use transform::{Rotation, Transform};

/// Canonicalizes a freshly loaded mesh for rendering: triangulates every
/// polygon, then caches a face normal on each triangle.
pub fn prepare_mesh(mesh: &mut Mesh) -> Result<(), Error> {
    triangulate::triangulate_model(mesh)?;
    normals::compute_normals(mesh)
}
