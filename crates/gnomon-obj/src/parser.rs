use std::collections::HashMap;

use crate::error::ObjError;
use crate::model::{ObjModel, ObjVertex};

/// Parses Wavefront OBJ source text into an [`ObjModel`].
///
/// Supported statements: `v`, `vt`, `vn`, `f` (with `v`, `v/t`, `v/t/n` and
/// `v//n` corner forms, 1-based or negative indices). All other statements
/// (`o`, `g`, `s`, `mtllib`, `usemtl`, `l`, ...) are skipped, as are comments
/// and blank lines. Faces with more than three corners are fan-triangulated.
pub fn parse_str(src: &str) -> Result<ObjModel, ObjError> {
    let mut parser = Parser::default();
    for (idx, raw) in src.lines().enumerate() {
        parser.line(idx + 1, raw)?;
    }
    Ok(parser.model)
}

/// Corner of a face after index resolution.
///
/// `uv` and `normal` are indices into the parser's attribute pools; a missing
/// normal is filled with the flat triangle normal at emission time.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
struct Corner {
    position: usize,
    uv: Option<usize>,
    normal: Option<usize>,
}

#[derive(Default)]
struct Parser {
    positions: Vec<[f32; 3]>,
    uvs: Vec<[f32; 2]>,
    normals: Vec<[f32; 3]>,

    model: ObjModel,

    /// Corners already emitted, for index reuse across faces.
    /// Corners without an explicit normal are never deduplicated because
    /// their flat normal depends on the emitting triangle.
    dedup: HashMap<Corner, u32>,
}

impl Parser {
    fn line(&mut self, line_no: usize, raw: &str) -> Result<(), ObjError> {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(());
        }

        let mut fields = line.split_whitespace();
        // Non-empty after trim, so a keyword is always present.
        let keyword = fields.next().unwrap_or_default();
        let rest: Vec<&str> = fields.collect();

        match keyword {
            "v" => {
                let p = self.floats::<3>(line_no, &rest, "v")?;
                self.positions.push(p);
            }
            "vt" => {
                let t = self.floats::<2>(line_no, &rest, "vt")?;
                self.uvs.push(t);
            }
            "vn" => {
                let n = self.floats::<3>(line_no, &rest, "vn")?;
                self.normals.push(n);
            }
            "f" => self.face(line_no, &rest)?,

            // Everything else (grouping, materials, lines, free-form
            // geometry, ...) carries nothing this renderer draws; skip it
            // rather than rejecting files exported with such statements.
            _ => {}
        }
        Ok(())
    }

    /// Parses the first `N` whitespace-separated floats; extra fields
    /// (e.g. the optional `w` of `v`, the third coordinate of `vt`) are
    /// accepted and ignored.
    fn floats<const N: usize>(
        &self,
        line_no: usize,
        fields: &[&str],
        keyword: &str,
    ) -> Result<[f32; N], ObjError> {
        if fields.len() < N {
            return Err(ObjError::new(
                format!("'{keyword}' expects at least {N} values, got {}", fields.len()),
                line_no,
            ));
        }
        let mut out = [0.0f32; N];
        for (slot, field) in out.iter_mut().zip(fields) {
            *slot = field
                .parse()
                .map_err(|_| ObjError::new(format!("invalid number '{field}'"), line_no))?;
        }
        Ok(out)
    }

    fn face(&mut self, line_no: usize, fields: &[&str]) -> Result<(), ObjError> {
        if fields.len() < 3 {
            return Err(ObjError::new(
                format!("face needs at least 3 corners, got {}", fields.len()),
                line_no,
            ));
        }

        let mut corners = Vec::with_capacity(fields.len());
        for field in fields {
            corners.push(self.corner(line_no, field)?);
        }

        // Fan triangulation around the first corner.
        for i in 1..corners.len() - 1 {
            self.triangle(corners[0], corners[i], corners[i + 1]);
        }
        Ok(())
    }

    fn corner(&self, line_no: usize, field: &str) -> Result<Corner, ObjError> {
        let mut parts = field.split('/');
        let position = self.resolve(line_no, parts.next(), self.positions.len(), field)?;

        let uv = match parts.next() {
            None | Some("") => None,
            some => Some(self.resolve(line_no, some, self.uvs.len(), field)?),
        };
        let normal = match parts.next() {
            None | Some("") => None,
            some => Some(self.resolve(line_no, some, self.normals.len(), field)?),
        };

        if parts.next().is_some() {
            return Err(ObjError::new(format!("malformed face corner '{field}'"), line_no));
        }

        Ok(Corner { position, uv, normal })
    }

    /// Resolves a 1-based (or negative, end-relative) OBJ index against a
    /// pool of `len` elements.
    fn resolve(
        &self,
        line_no: usize,
        part: Option<&str>,
        len: usize,
        field: &str,
    ) -> Result<usize, ObjError> {
        let text = part.filter(|p| !p.is_empty()).ok_or_else(|| {
            ObjError::new(format!("malformed face corner '{field}'"), line_no)
        })?;
        let value: i64 = text
            .parse()
            .map_err(|_| ObjError::new(format!("invalid index '{text}'"), line_no))?;

        let resolved = if value > 0 {
            (value - 1) as usize
        } else if value < 0 {
            let back = (-value) as usize;
            if back > len {
                return Err(ObjError::new(format!("index {value} out of range"), line_no));
            }
            len - back
        } else {
            return Err(ObjError::new("index 0 is not valid in OBJ", line_no));
        };

        if resolved >= len {
            return Err(ObjError::new(format!("index {value} out of range"), line_no));
        }
        Ok(resolved)
    }

    fn triangle(&mut self, a: Corner, b: Corner, c: Corner) {
        let flat = flat_normal(
            self.positions[a.position],
            self.positions[b.position],
            self.positions[c.position],
        );
        for corner in [a, b, c] {
            let index = self.emit(corner, flat);
            self.model.indices.push(index);
        }
    }

    fn emit(&mut self, corner: Corner, flat: [f32; 3]) -> u32 {
        if corner.normal.is_some() {
            if let Some(&index) = self.dedup.get(&corner) {
                return index;
            }
        }

        let vertex = ObjVertex {
            position: self.positions[corner.position],
            normal: corner.normal.map_or(flat, |n| self.normals[n]),
            uv: corner.uv.map_or([0.0, 0.0], |t| self.uvs[t]),
        };

        let index = self.model.vertices.len() as u32;
        self.model.vertices.push(vertex);
        if corner.normal.is_some() {
            self.dedup.insert(corner, index);
        }
        index
    }
}

/// Unit normal of the triangle `(a, b, c)`, counter-clockwise winding.
fn flat_normal(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> [f32; 3] {
    let u = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
    let v = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
    let n = [
        u[1] * v[2] - u[2] * v[1],
        u[2] * v[0] - u[0] * v[2],
        u[0] * v[1] - u[1] * v[0],
    ];
    let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
    if len <= f32::EPSILON {
        // Degenerate triangle; any unit vector is as good as another.
        [0.0, 1.0, 0.0]
    } else {
        [n[0] / len, n[1] / len, n[2] / len]
    }
}
