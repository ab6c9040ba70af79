use crate::aabb;
use crate::errors::SpaceError;
use crate::float_types::Real;
use crate::float_types::parry3d::bounding_volume::Aabb;
use crate::lattice::PointGrid;
use crate::sampling::{gaussian_shackle, grid_in_cube2, uniform_in_cube};
use nalgebra::Point3;

/// Bounding box and box-scoped sampling, answered the same way by
/// representations and by every node of a space.
///
/// Implementors only provide [`bounding_box`](Self::bounding_box); the samplers
/// are derived from it.
pub trait GeometricNode {
    /// Tight box of the geometry below this node.
    fn bounding_box(&self) -> Result<Aabb, SpaceError>;

    /// Center of [`bounding_box`](Self::bounding_box).
    fn center(&self) -> Result<Point3<Real>, SpaceError> {
        Ok(self.bounding_box()?.center())
    }

    /// Regular lattice of shape `spacing + (3,)` whose corners are the box
    /// corners.
    fn sampling_grid(&self, spacing: [usize; 3]) -> Result<PointGrid, SpaceError> {
        let bbox = self.bounding_box()?;
        grid_in_cube2(spacing, bbox.mins, bbox.maxs)
    }

    /// `count` points drawn uniformly inside the box.
    ///
    /// A box that is flat along some axis is refused with
    /// [`SpaceError::DegenerateBox`].
    fn sampling_uniform(&self, seed: u64, count: usize) -> Result<Vec<Point3<Real>>, SpaceError> {
        let bbox = self.bounding_box()?;
        aabb::ensure_volume(&bbox, "uniform sampling box")?;
        uniform_in_cube(seed, count, bbox.mins, bbox.maxs)
    }

    /// [`sampling_grid`](Self::sampling_grid) with `N(0, sigma^2)` jitter on
    /// every coordinate. The jittered points may leave the box.
    fn sampling_grid_with_shackle(
        &self,
        seed: u64,
        spacing: [usize; 3],
        sigma: Real,
    ) -> Result<PointGrid, SpaceError> {
        gaussian_shackle(self.sampling_grid(spacing)?, seed, sigma)
    }
}
