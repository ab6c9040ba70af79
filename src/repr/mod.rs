//! Materialized geometry: surface meshes and sampled fields.

mod field;
mod mesh;

#[cfg(feature = "sdf")]
mod surface;

pub use field::FieldRepresentation;
pub use mesh::{MeshRepresentation, PointColor};

use crate::errors::SpaceError;
use crate::float_types::parry3d::bounding_volume::Aabb;
use crate::traits::GeometricNode;
use std::fmt;

/// Kind of asset a source points at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Mesh,
    Field,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Mesh => write!(f, "mesh"),
            SourceKind::Field => write!(f, "field"),
        }
    }
}

/// Geometry built from one source.
#[derive(Clone, Debug)]
pub enum Representation {
    Mesh(MeshRepresentation),
    Field(FieldRepresentation),
}

impl Representation {
    pub const fn kind(&self) -> SourceKind {
        match self {
            Representation::Mesh(_) => SourceKind::Mesh,
            Representation::Field(_) => SourceKind::Field,
        }
    }

    pub const fn as_mesh(&self) -> Option<&MeshRepresentation> {
        match self {
            Representation::Mesh(mesh) => Some(mesh),
            Representation::Field(_) => None,
        }
    }

    pub const fn as_field(&self) -> Option<&FieldRepresentation> {
        match self {
            Representation::Field(field) => Some(field),
            Representation::Mesh(_) => None,
        }
    }
}

impl GeometricNode for Representation {
    fn bounding_box(&self) -> Result<Aabb, SpaceError> {
        match self {
            Representation::Mesh(mesh) => mesh.bounding_box(),
            Representation::Field(field) => field.bounding_box(),
        }
    }
}
