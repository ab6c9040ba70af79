//! Runtime settings of a [`Space`](crate::space::Space).

use crate::float_types::Real;
use nalgebra::{Matrix4, Point3, Vector3};

/// How lattice indices of a field map onto world coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FieldFrame {
    /// Every axis of the lattice is stretched onto `[-1, 1]`.
    Normalized,
    /// Sample `(i, j, k)` sits at `origin + (i, j, k) * spacing`.
    Physical {
        origin: Point3<Real>,
        spacing: Vector3<Real>,
    },
}

impl FieldFrame {
    /// Origin and per-axis spacing of a lattice with `dims` samples.
    ///
    /// Returns `None` when the frame cannot place the lattice: a normalized
    /// axis with fewer than two samples, or a non-positive physical spacing.
    pub fn resolve(&self, dims: [usize; 3]) -> Option<(Point3<Real>, Vector3<Real>)> {
        match *self {
            FieldFrame::Normalized => {
                if dims.iter().any(|&n| n < 2) {
                    return None;
                }
                let spacing = Vector3::new(
                    2.0 / (dims[0] - 1) as Real,
                    2.0 / (dims[1] - 1) as Real,
                    2.0 / (dims[2] - 1) as Real,
                );
                Some((Point3::new(-1.0, -1.0, -1.0), spacing))
            },
            FieldFrame::Physical { origin, spacing } => spacing
                .iter()
                .all(|&s| s > 0.0 && s.is_finite())
                .then_some((origin, spacing)),
        }
    }
}

/// Units of mesh vertex coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MeshFrame {
    /// Vertices are already expressed in the field frame.
    #[default]
    AsIs,
    /// Vertices are lattice indices of the field source of the same object,
    /// and are placed through that field's origin and spacing.
    Lattice,
}

/// Settings shared by every node of a space.
#[derive(Clone, Debug, PartialEq)]
pub struct SpaceConfig {
    /// Placement of field lattices.
    pub field_frame: FieldFrame,
    /// Units of mesh vertices.
    pub mesh_frame: MeshFrame,
    /// Transform applied to mesh vertices right after loading. Under
    /// [`MeshFrame::Lattice`] it runs before the lattice placement.
    pub mesh_transform: Option<Matrix4<Real>>,
    /// Samples at or below this value are inside a field.
    pub iso_level: Real,
    /// Seed of the train/test partition built by `load_data`.
    pub split_seed: u64,
}

impl Default for SpaceConfig {
    fn default() -> Self {
        Self {
            field_frame: FieldFrame::Normalized,
            mesh_frame: MeshFrame::AsIs,
            mesh_transform: None,
            iso_level: 0.0,
            split_seed: 0,
        }
    }
}
