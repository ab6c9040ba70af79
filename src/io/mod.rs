//! Asset loading and export.
//!
//! The space model only sees [`MeshData`] and [`FieldData`]; where they come
//! from is decided by an [`AssetLoader`]. [`FileLoader`] reads them from disk
//! by file extension.

#[cfg(feature = "obj-io")]
mod obj;

#[cfg(feature = "stl-io")]
mod stl;

mod npy;
mod vtk;

#[cfg(feature = "stl-io")]
pub use stl::to_stl_binary;

pub use npy::read_npy;
pub use vtk::write_vtk_polydata;

use crate::float_types::Real;
use nalgebra::Point3;
use std::path::Path;

/// Generic I/O and format‑conversion errors.
///
/// Many I/O features are behind cargo feature‑flags.
/// When a feature is disabled the corresponding variant is *not*
/// constructed in user code.
#[derive(Debug)]
pub enum IoError {
    StdIo(std::io::Error),

    MalformedInput(String),
    MalformedPath(String),
    Unimplemented(String),

    #[cfg(feature = "obj-io")]
    /// Error bubbled up from the `tobj` crate during parsing.
    ObjParsing(::tobj::LoadError),
}

impl std::fmt::Display for IoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use IoError::*;

        match self {
            StdIo(error) => write!(f, "std::io::Error: {error}"),

            MalformedInput(msg) => write!(f, "Input is malformed: {msg}"),
            MalformedPath(msg) => write!(f, "The path is malformed: {msg}"),
            Unimplemented(msg) => write!(f, "Feature is not implemented: {msg}"),

            #[cfg(feature = "obj-io")]
            ObjParsing(error) => write!(f, "OBJ parsing error: {error}"),
        }
    }
}

impl std::error::Error for IoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IoError::StdIo(error) => Some(error),
            #[cfg(feature = "obj-io")]
            IoError::ObjParsing(error) => Some(error),
            _ => None,
        }
    }
}

impl From<std::io::Error> for IoError {
    fn from(value: std::io::Error) -> Self {
        Self::StdIo(value)
    }
}

#[cfg(feature = "obj-io")]
impl From<::tobj::LoadError> for IoError {
    fn from(value: ::tobj::LoadError) -> Self {
        Self::ObjParsing(value)
    }
}

/// A triangulated surface as read from disk.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<Point3<Real>>,
    pub faces: Vec<[usize; 3]>,
    /// Per-point RGB in `[0, 1]`, when the asset carries colors.
    pub colors: Option<Vec<[Real; 3]>>,
    /// Per-point opacity, when the asset carries it.
    pub alpha: Option<Vec<Real>>,
}

/// A dense scalar lattice as read from disk, row-major with the first axis
/// varying slowest.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldData {
    pub dims: [usize; 3],
    pub values: Vec<Real>,
}

/// Produces raw geometry for the sources of a space.
///
/// Loaders are called at most once per source; the space caches the result.
pub trait AssetLoader: Send + Sync {
    fn load_mesh(&self, path: &Path) -> Result<MeshData, IoError>;
    fn load_field(&self, path: &Path) -> Result<FieldData, IoError>;
}

/// Reads assets from the filesystem, choosing the parser by file extension:
/// `.obj` and `.stl` meshes, `.npy` fields.
#[derive(Clone, Copy, Debug, Default)]
pub struct FileLoader;

fn extension(path: &Path) -> Result<String, IoError> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .ok_or_else(|| IoError::MalformedPath(format!("{} has no extension", path.display())))
}

impl AssetLoader for FileLoader {
    fn load_mesh(&self, path: &Path) -> Result<MeshData, IoError> {
        match extension(path)?.as_str() {
            #[cfg(feature = "obj-io")]
            "obj" => obj::read_obj(path),
            #[cfg(feature = "stl-io")]
            "stl" => stl::read_stl(path),
            other => Err(IoError::Unimplemented(format!("mesh format `.{other}`"))),
        }
    }

    fn load_field(&self, path: &Path) -> Result<FieldData, IoError> {
        match extension(path)?.as_str() {
            "npy" => read_npy(path),
            other => Err(IoError::Unimplemented(format!("field format `.{other}`"))),
        }
    }
}
