//! Wavefront **OBJ** parser producing render-ready vertex/index data.
//!
//! This crate is intentionally dependency-free so it can be consumed by
//! asset tooling and build scripts without pulling in any engine or GPU
//! code.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`model`] | `ObjModel`, `ObjVertex` |
//! | [`error`] | `ObjError` |
//! | [`parser`] | `parse_str` entry point |
//!
//! # Quick start
//!
//! ```rust
//! use gnomon_obj::parse_str;
//!
//! let src = "
//!     v 0 0 0
//!     v 1 0 0
//!     v 0 1 0
//!     vn 0 0 1
//!     f 1//1 2//1 3//1
//! ";
//!
//! let model = parse_str(src).unwrap();
//! assert_eq!(model.triangle_count(), 1);
//! ```

pub mod error;
pub mod model;
pub mod parser;

pub use error::ObjError;
pub use model::{ObjModel, ObjVertex};
pub use parser::parse_str;

#[cfg(test)]
mod parse_tests {
    use super::*;

    fn ok(src: &str) -> ObjModel { parse_str(src).unwrap() }
    fn err(src: &str) -> ObjError { parse_str(src).unwrap_err() }

    const TRI: &str = "v 0 0 0\nv 1 0 0\nv 0 0 1\nf 1 2 3\n";

    #[test] fn empty_source() { assert_eq!(ok("").triangle_count(), 0); }
    #[test] fn comments_and_blanks() { ok("# header\n\n  # indented\n"); }
    #[test] fn ignored_statements() {
        ok("o dial\ng hands\ns off\nmtllib clock.mtl\nusemtl brass\n");
    }

    #[test]
    fn unknown_statements_are_skipped() {
        // Exporters emit statements outside our vocabulary (polylines,
        // free-form geometry); they must not poison the surrounding faces.
        let m = ok("v 0 0 0\nv 1 0 0\nv 0 0 1\nl 1 2\ncurv 0 1\nf 1 2 3\n");
        assert_eq!(m.triangle_count(), 1);
    }

    #[test]
    fn bare_triangle_gets_flat_normal() {
        let m = ok(TRI);
        assert_eq!(m.triangle_count(), 1);
        // CCW in the XZ plane viewed from -Y: the flat normal points down.
        for v in &m.vertices {
            assert_eq!(v.normal, [0.0, -1.0, 0.0]);
        }
    }

    #[test]
    fn quad_fan_triangulates() {
        let m = ok("v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n");
        assert_eq!(m.triangle_count(), 2);
        assert_eq!(m.indices[..3], [0, 1, 2]);
    }

    #[test]
    fn full_corner_form() {
        let m = ok("v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nvt 1 0\nvt 0 1\nvn 0 0 1\n\
                    f 1/1/1 2/2/1 3/3/1\n");
        assert_eq!(m.vertices[1].uv, [1.0, 0.0]);
        assert_eq!(m.vertices[2].normal, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn corners_with_normals_deduplicate() {
        let m = ok("v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nvn 0 0 1\n\
                    f 1//1 2//1 3//1\nf 1//1 3//1 4//1\n");
        // Two triangles sharing an edge: 4 unique vertices, not 6.
        assert_eq!(m.vertices.len(), 4);
        assert_eq!(m.indices.len(), 6);
    }

    #[test]
    fn negative_indices_resolve_from_end() {
        let m = ok("v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\n");
        assert_eq!(m.vertices[0].position, [0.0, 0.0, 0.0]);
        assert_eq!(m.vertices[2].position, [0.0, 1.0, 0.0]);
    }

    #[test]
    fn extra_vertex_fields_ignored() {
        // `v` with w component, `vt` with a third coordinate.
        ok("v 0 0 0 1.0\nv 1 0 0 1.0\nv 0 1 0 1.0\nvt 0 0 0\nf 1/1 2/1 3/1\n");
    }

    #[test] fn err_bad_float() { err("v 0 zero 0\n"); }
    #[test] fn err_short_vertex() { err("v 0 1\n"); }
    #[test] fn err_face_two_corners() { err("v 0 0 0\nv 1 0 0\nf 1 2\n"); }
    #[test] fn err_zero_index() { err("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 0 1 2\n"); }
    #[test] fn err_index_out_of_range() {
        let e = err("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 4\n");
        assert_eq!(e.line, 4);
    }
    #[test] fn err_negative_out_of_range() { err("v 0 0 0\nv 1 0 0\nv 0 1 0\nf -4 -2 -1\n"); }
    #[test] fn err_malformed_corner() { err("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1/1/1/1 2 3\n"); }
}
