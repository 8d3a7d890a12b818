//! Rendering layer.
//!
//! Responsibilities:
//! - renderer-facing per-frame context types
//! - textured-mesh pipeline with per-object model transforms
//! - explicit depth policy (scoped to the pass, never a global toggle)

mod ctx;
mod mesh_renderer;

pub use ctx::{RenderCtx, RenderTarget};
pub use mesh_renderer::{MeshDraw, MeshRenderer, TextureBinding};

/// Depth-test policy for a renderer.
///
/// Making this an explicit per-renderer setting (rather than enabling and
/// disabling a global flag around each frame) keeps draw correctness
/// independent of call-site ordering.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum DepthPolicy {
    /// Depth test + write enabled; draw order does not matter.
    ReadWrite,
    /// Depth ignored; objects composite strictly in submission order.
    Disabled,
}
