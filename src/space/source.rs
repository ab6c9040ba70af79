use super::{NodeId, NodeKind, Space};
use crate::config::MeshFrame;
use crate::errors::SpaceError;
use crate::float_types::Real;
use crate::io::IoError;
use crate::repr::{FieldRepresentation, MeshRepresentation, Representation, SourceKind};
use nalgebra::Matrix4;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// A lazy reference to one asset.
///
/// The representation is built on first access and kept for the lifetime of
/// the space; later accesses never touch the file again.
#[derive(Debug)]
pub struct Source {
    kind: SourceKind,
    path: PathBuf,
    repr: OnceLock<Representation>,
}

impl Source {
    pub(crate) const fn new(kind: SourceKind, path: PathBuf) -> Self {
        Self {
            kind,
            path,
            repr: OnceLock::new(),
        }
    }

    #[inline]
    pub const fn kind(&self) -> SourceKind {
        self.kind
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline]
    pub fn is_loaded(&self) -> bool {
        self.repr.get().is_some()
    }

    /// The representation, if it has been loaded already.
    #[inline]
    pub fn cached(&self) -> Option<&Representation> {
        self.repr.get()
    }
}

impl Space {
    /// Representation of the source behind `id` (a source node or its
    /// representation child), loading the asset on first call.
    ///
    /// A failed load caches nothing, so the error is reported again on the
    /// next call.
    pub fn representation(&self, id: NodeId) -> Result<&Representation, SpaceError> {
        let (sid, source) = self.source_of(id).ok_or_else(|| SpaceError::NotFound {
            path: format!("{}/{}", self.display_path(id), super::REPRESENTATION_NAME),
        })?;
        if let Some(repr) = source.repr.get() {
            return Ok(repr);
        }

        let repr = self.load_representation(sid, source)?;
        Ok(source.repr.get_or_init(|| repr))
    }

    fn load_representation(&self, sid: NodeId, source: &Source) -> Result<Representation, SpaceError> {
        let load_failure = |err: IoError| SpaceError::LoadFailure {
            node: self.display_path(sid),
            asset: source.path.display().to_string(),
            source: err,
        };

        let repr = match source.kind {
            SourceKind::Mesh => {
                let transform = self.mesh_placement(sid)?;
                let data = self.loader.load_mesh(&source.path).map_err(load_failure)?;
                Representation::Mesh(MeshRepresentation::from_data(data, transform.as_ref())?)
            },
            SourceKind::Field => {
                let data = self.loader.load_field(&source.path).map_err(load_failure)?;
                Representation::Field(FieldRepresentation::from_data(
                    data,
                    &self.config.field_frame,
                    self.config.iso_level,
                )?)
            },
        };

        tracing::debug!(
            node = %self.display_path(sid),
            asset = %source.path.display(),
            kind = %source.kind,
            "loaded representation"
        );
        Ok(repr)
    }

    /// Transform taking the vertices of mesh source `sid` into the field
    /// frame. Under [`MeshFrame::Lattice`] this loads the sibling field.
    fn mesh_placement(&self, sid: NodeId) -> Result<Option<Matrix4<Real>>, SpaceError> {
        let transform = self.config.mesh_transform;
        match self.config.mesh_frame {
            MeshFrame::AsIs => Ok(transform),
            MeshFrame::Lattice => {
                let field = self.sibling_field(sid)?;
                let lattice = Matrix4::new_translation(&field.origin().coords)
                    * Matrix4::new_nonuniform_scaling(&field.spacing());
                Ok(Some(transform.map_or(lattice, |m| lattice * m)))
            },
        }
    }

    /// The field representation sharing a parent with `sid`.
    fn sibling_field(&self, sid: NodeId) -> Result<&FieldRepresentation, SpaceError> {
        let no_field = || {
            SpaceError::invalid(format!(
                "mesh `{}` is in lattice units but has no field sibling",
                self.display_path(sid)
            ))
        };
        let parent = self.node(sid).parent().ok_or_else(no_field)?;
        let field = self
            .node(parent)
            .children()
            .iter()
            .copied()
            .find(|&c| matches!(self.node(c).kind(), NodeKind::Source(s) if s.kind() == SourceKind::Field))
            .ok_or_else(no_field)?;
        self.representation(field)?.as_field().ok_or_else(no_field)
    }
}
