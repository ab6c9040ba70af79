//! Legacy ASCII VTK polydata with per-point scalar arrays.

use super::IoError;
use crate::float_types::Real;
use nalgebra::Point3;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write `positions`/`faces` as VTK polydata and attach every entry of
/// `arrays` as a `SCALARS` point-data block.
///
/// Array lengths are expected to match `positions.len()`; names have their
/// whitespace replaced by `_` because the legacy format splits on it.
pub fn write_vtk_polydata(
    path: &Path,
    title: &str,
    positions: &[Point3<Real>],
    faces: &[[usize; 3]],
    arrays: &BTreeMap<String, Vec<Real>>,
) -> Result<(), IoError> {
    if let Some((name, _)) = arrays.iter().find(|(_, a)| a.len() != positions.len()) {
        return Err(IoError::MalformedInput(format!(
            "array `{name}` does not match the {} points",
            positions.len()
        )));
    }

    let mut out = BufWriter::new(File::create(path)?);
    let title: String = title.chars().filter(|c| *c != '\n').take(255).collect();

    writeln!(out, "# vtk DataFile Version 3.0")?;
    writeln!(out, "{title}")?;
    writeln!(out, "ASCII")?;
    writeln!(out, "DATASET POLYDATA")?;

    writeln!(out, "POINTS {} double", positions.len())?;
    for p in positions {
        writeln!(out, "{} {} {}", p.x, p.y, p.z)?;
    }

    if !faces.is_empty() {
        writeln!(out, "POLYGONS {} {}", faces.len(), faces.len() * 4)?;
        for [a, b, c] in faces {
            writeln!(out, "3 {a} {b} {c}")?;
        }
    }

    if !arrays.is_empty() {
        writeln!(out, "POINT_DATA {}", positions.len())?;
        for (name, values) in arrays {
            let name: String = name
                .chars()
                .map(|c| if c.is_whitespace() { '_' } else { c })
                .collect();
            writeln!(out, "SCALARS {name} double 1")?;
            writeln!(out, "LOOKUP_TABLE default")?;
            for v in values {
                writeln!(out, "{v}")?;
            }
        }
    }

    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_points_faces_and_scalars() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tri.vtk");
        let positions = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let mut arrays = BTreeMap::new();
        arrays.insert("my ones".to_string(), vec![1.0; 3]);
        write_vtk_polydata(&path, "tri", &positions, &[[0, 1, 2]], &arrays).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("POINTS 3 double"));
        assert!(text.contains("POLYGONS 1 4"));
        assert!(text.contains("3 0 1 2"));
        assert!(text.contains("SCALARS my_ones double 1"));
    }

    #[test]
    fn rejects_short_arrays() {
        let dir = tempfile::tempdir().unwrap();
        let mut arrays = BTreeMap::new();
        arrays.insert("short".to_string(), vec![1.0]);
        let err = write_vtk_polydata(
            &dir.path().join("bad.vtk"),
            "bad",
            &[Point3::origin(), Point3::origin()],
            &[],
            &arrays,
        );
        assert!(err.is_err());
    }
}
