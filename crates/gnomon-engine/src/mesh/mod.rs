//! GPU geometry and texture resources.
//!
//! CPU-side data (parsed OBJ models, decoded images) is produced elsewhere;
//! this module owns the upload into wgpu buffers/textures and the handles
//! the renderer consumes.

mod mesh;
mod texture;
mod vertex;

pub use mesh::Mesh;
pub use texture::Texture;
pub use vertex::Vertex3d;
