//! Triangulated surfaces.

use crate::aabb;
use crate::errors::SpaceError;
use crate::float_types::Real;
use crate::float_types::parry3d::bounding_volume::Aabb;
use crate::io::{self, MeshData};
use crate::sampling::take_each_n;
use crate::traits::GeometricNode;
use nalgebra::{Matrix4, Point3};
use std::collections::BTreeMap;
use std::path::Path;

/// Per-point colors of a surface.
#[derive(Clone, Debug, PartialEq)]
pub struct PointColor {
    /// RGB in `[0, 1]`, if the asset had colors.
    pub rgb: Option<Vec<[Real; 3]>>,
    /// Opacity, `1` for every point when the asset had none.
    pub alpha: Vec<Real>,
}

/// A triangulated surface with optional per-point color attributes.
#[derive(Clone, Debug)]
pub struct MeshRepresentation {
    positions: Vec<Point3<Real>>,
    faces: Vec<[usize; 3]>,
    colors: Option<Vec<[Real; 3]>>,
    alpha: Option<Vec<Real>>,
    bbox: Aabb,
}

impl MeshRepresentation {
    /// Build from loaded data, applying `transform` to every vertex first.
    ///
    /// Fails with [`SpaceError::DegenerateBox`] for a surface without points,
    /// with [`SpaceError::ShapeMismatch`] when an attribute does not cover
    /// every point, and with [`SpaceError::InvalidArgument`] for a face
    /// referencing a missing vertex.
    pub fn from_data(data: MeshData, transform: Option<&Matrix4<Real>>) -> Result<Self, SpaceError> {
        let MeshData {
            mut positions,
            faces,
            colors,
            alpha,
        } = data;

        if let Some(m) = transform {
            for p in &mut positions {
                *p = m.transform_point(p);
            }
        }

        let n = positions.len();
        if let Some(colors) = &colors {
            check_len("colors", n, colors.len())?;
        }
        if let Some(alpha) = &alpha {
            check_len("alpha", n, alpha.len())?;
        }
        if let Some(face) = faces.iter().find(|f| f.iter().any(|&i| i >= n)) {
            return Err(SpaceError::invalid(format!(
                "face {face:?} references a vertex beyond the {n} points"
            )));
        }

        let bbox = aabb::from_points(positions.iter()).ok_or_else(|| {
            SpaceError::degenerate("surface has no finite points to bound")
        })?;

        Ok(Self {
            positions,
            faces,
            colors,
            alpha,
            bbox,
        })
    }

    #[inline]
    pub fn point_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn positions(&self) -> &[Point3<Real>] {
        &self.positions
    }

    #[inline]
    pub fn faces(&self) -> &[[usize; 3]] {
        &self.faces
    }

    /// `count` vertices at indices `(shift + k * step) mod point_count`,
    /// returned as `(indices, positions)`.
    pub fn sampling_each_n(
        &self,
        count: usize,
        step: usize,
        shift: usize,
    ) -> Result<(Vec<usize>, Vec<Point3<Real>>), SpaceError> {
        take_each_n(&self.positions, count, step, shift)
    }

    pub fn point_color(&self) -> PointColor {
        PointColor {
            rgb: self.colors.clone(),
            alpha: self
                .alpha
                .clone()
                .unwrap_or_else(|| vec![1.0; self.positions.len()]),
        }
    }

    /// Write the surface with the named per-point arrays attached.
    ///
    /// Every array must hold exactly one value per point.
    pub fn save_mesh(
        &self,
        path: impl AsRef<Path>,
        arrays: &BTreeMap<String, Vec<Real>>,
    ) -> Result<(), SpaceError> {
        for (name, values) in arrays {
            check_len(name, self.positions.len(), values.len())?;
        }
        let path = path.as_ref();
        let title = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("surface");
        io::write_vtk_polydata(path, title, &self.positions, &self.faces, arrays).map_err(
            |source| SpaceError::Export {
                path: path.display().to_string(),
                source,
            },
        )
    }

    /// Convert this surface to a **binary STL** byte vector.
    #[cfg(feature = "stl-io")]
    pub fn to_stl_binary(&self) -> std::io::Result<Vec<u8>> {
        io::to_stl_binary(&self.positions, &self.faces)
    }
}

fn check_len(name: &str, expected: usize, found: usize) -> Result<(), SpaceError> {
    if expected != found {
        return Err(SpaceError::ShapeMismatch {
            name: name.to_string(),
            expected,
            found,
        });
    }
    Ok(())
}

impl GeometricNode for MeshRepresentation {
    fn bounding_box(&self) -> Result<Aabb, SpaceError> {
        Ok(self.bbox)
    }
}
