/// A single deduplicated vertex ready for GPU upload.
///
/// Layout mirrors the engine's vertex format (position / normal / uv) so the
/// caller can cast directly without a repacking pass.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ObjVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// A parsed OBJ model: a flat vertex list plus triangle indices.
///
/// Faces with more than three corners are fan-triangulated during parsing,
/// so `indices.len()` is always a multiple of three.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjModel {
    pub vertices: Vec<ObjVertex>,
    pub indices: Vec<u32>,
}

impl ObjModel {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}
