//! Wavefront OBJ subset for quadrilateral scenes.
//!
//! Only `v`, `vn` and 4-corner `f` records are interpreted. Corner records
//! may be `a`, `a/t`, `a//n` or `a/t/n` with 1-based indices. Comments,
//! texture coordinates, groups, smoothing and material records are skipped.

use crate::{Point, Quad, Vector};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;

/// Errors raised while interpreting a quad mesh.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("line {line}: malformed record '{record}'")]
    MalformedRecord { line: usize, record: String },

    #[error("line {line}: vertex index {index} does not refer to a loaded position")]
    DanglingVertexReference { line: usize, index: usize },

    #[error("line {line}: normal index {index} does not refer to a loaded normal")]
    DanglingNormalReference { line: usize, index: usize },

    #[error("line {line}: face has {corners} corners, expected 4")]
    IncompleteFace { line: usize, corners: usize },
}

/// One quadrilateral face. Indices are 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuadFace {
    pub vertices: [usize; 4],
    pub normal: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuadMesh {
    pub positions: Vec<Point>,
    pub normals: Vec<Vector>,
    pub faces: Vec<QuadFace>,
}

impl QuadMesh {
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Corner positions of a face, in record order.
    pub fn face_quad(&self, face: usize) -> Quad {
        let f = &self.faces[face];
        Quad::new(f.vertices.map(|i| self.positions[i]))
    }

    /// Normal of every position, taken from the first face that uses it.
    ///
    /// Positions that no face references (or whose first face carries no
    /// normal) get None.
    pub fn vertex_normals(&self) -> Vec<Option<Vector>> {
        let mut out = vec![None; self.positions.len()];
        let mut seen = vec![false; self.positions.len()];
        for face in &self.faces {
            for &vi in &face.vertices {
                if !seen[vi] {
                    seen[vi] = true;
                    out[vi] = face.normal.map(|ni| self.normals[ni]);
                }
            }
        }
        out
    }
}

/// Parses OBJ text into a quad mesh.
pub fn parse_obj(text: &str) -> Result<QuadMesh, GeometryError> {
    let mut mesh = QuadMesh::default();
    // Line number of every face, kept for reference checks after parsing
    let mut face_lines: Vec<usize> = Vec::new();

    for (i, raw) in text.lines().enumerate() {
        let line = i + 1;
        let trimmed = raw.trim();
        let mut parts = trimmed.split_whitespace();
        let Some(tag) = parts.next() else {
            continue;
        };
        let malformed = || GeometryError::MalformedRecord {
            line,
            record: trimmed.to_string(),
        };

        match tag {
            "v" => {
                let [x, y, z] = parse_triplet(parts).ok_or_else(malformed)?;
                mesh.positions.push(Point::new(x, y, z));
            }
            "vn" => {
                let [x, y, z] = parse_triplet(parts).ok_or_else(malformed)?;
                mesh.normals.push(Vector::new(x, y, z));
            }
            "f" => {
                let corners: Vec<&str> = parts.collect();
                if corners.len() < 4 {
                    return Err(GeometryError::IncompleteFace {
                        line,
                        corners: corners.len(),
                    });
                }
                if corners.len() > 4 {
                    return Err(malformed());
                }
                let mut vertices = [0; 4];
                let mut normal = None;
                for (slot, corner) in vertices.iter_mut().zip(&corners) {
                    let (vi, ni) = parse_corner(corner).ok_or_else(malformed)?;
                    *slot = vi;
                    if normal.is_none() {
                        normal = ni;
                    }
                }
                mesh.faces.push(QuadFace { vertices, normal });
                face_lines.push(line);
            }
            _ => {}
        }
    }

    for (face, &line) in mesh.faces.iter().zip(&face_lines) {
        if let Some(&index) = face.vertices.iter().find(|&&vi| vi >= mesh.positions.len()) {
            return Err(GeometryError::DanglingVertexReference {
                line,
                index: index + 1,
            });
        }
        if let Some(ni) = face.normal
            && ni >= mesh.normals.len()
        {
            return Err(GeometryError::DanglingNormalReference {
                line,
                index: ni + 1,
            });
        }
    }

    Ok(mesh)
}

fn parse_triplet<'a>(mut parts: impl Iterator<Item = &'a str>) -> Option<[f64; 3]> {
    let x = parts.next()?.parse().ok()?;
    let y = parts.next()?.parse().ok()?;
    let z = parts.next()?.parse().ok()?;
    Some([x, y, z])
}

/// Parses `a`, `a/t`, `a//n` or `a/t/n` into 0-based (vertex, normal).
fn parse_corner(corner: &str) -> Option<(usize, Option<usize>)> {
    let mut fields = corner.split('/');
    let vi = one_based(fields.next()?)?;
    let _texture = fields.next();
    let ni = match fields.next() {
        Some(s) if !s.is_empty() => Some(one_based(s)?),
        _ => None,
    };
    if fields.next().is_some() {
        return None;
    }
    Some((vi, ni))
}

fn one_based(s: &str) -> Option<usize> {
    let idx: usize = s.parse().ok()?;
    idx.checked_sub(1)
}

/// Reads a quad mesh from an OBJ file.
pub fn read_obj(path: &Path) -> Result<QuadMesh> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to open file: {}", path.display()))?;
    let mesh = parse_obj(&text)
        .with_context(|| format!("Failed to parse quad mesh: {}", path.display()))?;
    Ok(mesh)
}

/// Writes a quad mesh as OBJ text (`f a//n ...` when a face has a normal).
pub fn write_obj(path: &Path, mesh: &QuadMesh) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    for p in &mesh.positions {
        writeln!(writer, "v {} {} {}", p.x, p.y, p.z)?;
    }
    for n in &mesh.normals {
        writeln!(writer, "vn {} {} {}", n.dx, n.dy, n.dz)?;
    }
    for face in &mesh.faces {
        let corners: Vec<String> = face
            .vertices
            .iter()
            .map(|&vi| match face.normal {
                Some(ni) => format!("{}//{}", vi + 1, ni + 1),
                None => format!("{}", vi + 1),
            })
            .collect();
        writeln!(writer, "f {}", corners.join(" "))?;
    }
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const FLOOR: &str = "\
# a single floor tile
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vn 0 0 1
vt 0 0
f 1/1/1 2/1/1 3/1/1 4/1/1
";

    #[test]
    fn test_parse_single_face() {
        let mesh = parse_obj(FLOOR).unwrap();
        assert_eq!(mesh.positions.len(), 4);
        assert_eq!(mesh.normals.len(), 1);
        assert_eq!(mesh.face_count(), 1);
        assert_eq!(mesh.faces[0].vertices, [0, 1, 2, 3]);
        assert_eq!(mesh.faces[0].normal, Some(0));
        let quad = mesh.face_quad(0);
        assert!((quad.area() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_corner_variants() {
        assert_eq!(parse_corner("3"), Some((2, None)));
        assert_eq!(parse_corner("3/7"), Some((2, None)));
        assert_eq!(parse_corner("3//2"), Some((2, Some(1))));
        assert_eq!(parse_corner("3/7/2"), Some((2, Some(1))));
        assert_eq!(parse_corner("0"), None);
        assert_eq!(parse_corner("x"), None);
        assert_eq!(parse_corner("1/2/3/4"), None);
    }

    #[test]
    fn test_vertex_normals() {
        let text = format!("{FLOOR}v 5 5 5\n");
        let mesh = parse_obj(&text).unwrap();
        let normals = mesh.vertex_normals();
        assert_eq!(normals.len(), 5);
        assert_eq!(normals[0], Some(Vector::new(0., 0., 1.)));
        assert_eq!(normals[4], None);
    }

    #[test]
    fn test_malformed_vertex() {
        let err = parse_obj("v 0 0\n").unwrap_err();
        assert_eq!(
            err,
            GeometryError::MalformedRecord {
                line: 1,
                record: "v 0 0".to_string()
            }
        );
    }

    #[test]
    fn test_incomplete_face() {
        let text = "v 0 0 0\nv 1 0 0\nv 1 1 0\nf 1 2 3\n";
        let err = parse_obj(text).unwrap_err();
        assert_eq!(err, GeometryError::IncompleteFace { line: 4, corners: 3 });
    }

    #[test]
    fn test_dangling_normal() {
        let text = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1//2 2//2 3//2 4//2\n";
        let err = parse_obj(text).unwrap_err();
        assert_eq!(err, GeometryError::DanglingNormalReference { line: 5, index: 2 });
    }

    #[test]
    fn test_dangling_vertex() {
        let text = "v 0 0 0\nf 1 2 3 4\n";
        let err = parse_obj(text).unwrap_err();
        assert_eq!(err, GeometryError::DanglingVertexReference { line: 2, index: 2 });
    }

    #[test]
    fn test_write_and_read_obj() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("floor.obj");

        let original = parse_obj(FLOOR)?;
        write_obj(&path, &original)?;
        let loaded = read_obj(&path)?;

        assert_eq!(loaded, original);
        Ok(())
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_obj(Path::new("/nonexistent/room.obj")).unwrap_err();
        assert!(err.to_string().contains("Failed to open file"));
    }
}
