use super::{NodeId, NodeKind, Resolved, Space};
use crate::errors::SpaceError;
use crate::float_types::Real;
use crate::float_types::parry3d::bounding_volume::Aabb;
use crate::lattice::{PointGrid, ScalarGrid};
use crate::repr::{FieldRepresentation, MeshRepresentation, PointColor, Representation};
use crate::traits::GeometricNode;
use nalgebra::Point3;
use std::collections::BTreeMap;
use std::path::Path;

/// A node of a [`Space`] together with the space it lives in.
///
/// Every node answers the [`GeometricNode`] contract over its own box.
/// Mesh sources additionally answer [`sampling_each_n`](Self::sampling_each_n),
/// [`point_color`](Self::point_color) and [`save_mesh`](Self::save_mesh);
/// field sources answer [`xyz2local_sdt`](Self::xyz2local_sdt).
#[derive(Clone, Copy, Debug)]
pub struct NodeRef<'a> {
    space: &'a Space,
    id: NodeId,
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.space, other.space) && self.id == other.id
    }
}

impl<'a> NodeRef<'a> {
    pub(crate) const fn new(space: &'a Space, id: NodeId) -> Self {
        Self { space, id }
    }

    #[inline]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    #[inline]
    pub const fn space(&self) -> &'a Space {
        self.space
    }

    #[inline]
    pub fn name(&self) -> &'a str {
        self.space.node(self.id).name()
    }

    #[inline]
    pub fn kind(&self) -> &'a NodeKind {
        self.space.node(self.id).kind()
    }

    #[inline]
    pub fn path(&self) -> String {
        self.space.path_of(self.id)
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.space.is_root(self.id)
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.space
            .node(self.id)
            .parent()
            .map(|p| NodeRef::new(self.space, p))
    }

    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a>> + use<'a> {
        let space = self.space;
        space
            .node(self.id)
            .children()
            .iter()
            .map(move |&c| NodeRef::new(space, c))
    }

    /// Resolve `path` relative to this node.
    pub fn resolve(&self, path: &str) -> Result<Resolved<'a>, SpaceError> {
        self.space.resolve_from(self.id, path)
    }

    /// Resolve `path` relative to this node and insist on a node.
    pub fn child(&self, path: &str) -> Result<NodeRef<'a>, SpaceError> {
        self.resolve(path)?.into_node()
    }

    /// Representation of this source or representation node.
    pub fn representation(&self) -> Result<&'a Representation, SpaceError> {
        self.space.representation(self.id)
    }

    pub fn mesh(&self) -> Result<&'a MeshRepresentation, SpaceError> {
        self.representation()?.as_mesh().ok_or_else(|| self.unsupported("mesh"))
    }

    pub fn field(&self) -> Result<&'a FieldRepresentation, SpaceError> {
        self.representation()?.as_field().ok_or_else(|| self.unsupported("field"))
    }

    fn unsupported(&self, what: &str) -> SpaceError {
        SpaceError::NotFound {
            path: format!("{} ({what})", self.space.display_path(self.id)),
        }
    }

    /// See [`MeshRepresentation::sampling_each_n`].
    pub fn sampling_each_n(
        &self,
        count: usize,
        step: usize,
        shift: usize,
    ) -> Result<(Vec<usize>, Vec<Point3<Real>>), SpaceError> {
        self.mesh()?.sampling_each_n(count, step, shift)
    }

    /// See [`MeshRepresentation::point_color`].
    pub fn point_color(&self) -> Result<PointColor, SpaceError> {
        Ok(self.mesh()?.point_color())
    }

    /// See [`MeshRepresentation::save_mesh`].
    pub fn save_mesh(
        &self,
        path: impl AsRef<Path>,
        arrays: &BTreeMap<String, Vec<Real>>,
    ) -> Result<(), SpaceError> {
        self.mesh()?.save_mesh(path, arrays)
    }

    /// See [`FieldRepresentation::xyz2local_sdt`].
    pub fn xyz2local_sdt(
        &self,
        center: &Point3<Real>,
        spacing: [usize; 3],
        scale: Real,
    ) -> Result<(PointGrid, ScalarGrid), SpaceError> {
        self.field()?.xyz2local_sdt(center, spacing, scale)
    }
}

impl GeometricNode for NodeRef<'_> {
    fn bounding_box(&self) -> Result<Aabb, SpaceError> {
        self.space.bounding_box(self.id)
    }
}
