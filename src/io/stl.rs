use super::{IoError, MeshData};
use crate::float_types::Real;
use nalgebra::{Point3, Vector3};
use std::fs::File;
use std::io::{BufReader, Cursor};
use std::path::Path;

/// Read an ASCII or binary STL file; coincident vertices are merged by `stl_io`.
#[allow(clippy::unnecessary_cast)]
pub fn read_stl(path: &Path) -> Result<MeshData, IoError> {
    let mut reader = BufReader::new(File::open(path)?);
    let indexed = stl_io::read_stl(&mut reader)?;

    let positions: Vec<Point3<Real>> = indexed
        .vertices
        .iter()
        .map(|v| Point3::new(v[0] as Real, v[1] as Real, v[2] as Real))
        .collect();

    let faces: Vec<[usize; 3]> = indexed.faces.iter().map(|f| f.vertices).collect();
    if faces.iter().flatten().any(|&i| i >= positions.len()) {
        return Err(IoError::MalformedInput(format!(
            "{} references a vertex out of range",
            path.display()
        )));
    }

    Ok(MeshData {
        positions,
        faces,
        colors: None,
        alpha: None,
    })
}

/// Export to BINARY STL (returns `Vec<u8>`)
///
/// Facet normals are recomputed from the winding of each face; degenerate
/// faces get a zero normal.
pub fn to_stl_binary(positions: &[Point3<Real>], faces: &[[usize; 3]]) -> std::io::Result<Vec<u8>> {
    use stl_io::{Normal, Triangle, Vertex, write_stl};

    let mut triangles = Vec::<Triangle>::with_capacity(faces.len());

    for face in faces {
        let [a, b, c] = face.map(|i| positions[i]);
        let n = (b - a).cross(&(c - a));
        let n = n.try_normalize(0.0).unwrap_or_else(Vector3::zeros);
        #[allow(clippy::unnecessary_cast)]
        {
            triangles.push(Triangle {
                normal: Normal::new([n.x as f32, n.y as f32, n.z as f32]),
                vertices: [a, b, c].map(|p| Vertex::new([p.x as f32, p.y as f32, p.z as f32])),
            });
        }
    }

    let mut cursor = Cursor::new(Vec::new());
    write_stl(&mut cursor, triangles.iter())?;
    Ok(cursor.into_inner())
}
