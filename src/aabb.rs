//! Axis-aligned bounding box helpers on top of parry's [`Aabb`]

use crate::errors::SpaceError;
use crate::float_types::parry3d::bounding_volume::{Aabb, BoundingVolume};
use crate::float_types::{Real, tolerance};
use nalgebra::{Point3, Vector3};

/// Tight box of a point set, or `None` when the set is empty or holds a
/// non-finite coordinate.
pub fn from_points<'a, I>(points: I) -> Option<Aabb>
where
    I: IntoIterator<Item = &'a Point3<Real>>,
{
    let mut iter = points.into_iter();
    let first = iter.next()?;
    let mut mins = *first;
    let mut maxs = *first;
    for p in iter {
        mins = mins.inf(p);
        maxs = maxs.sup(p);
    }
    let finite = mins.coords.iter().chain(maxs.coords.iter()).all(|c| c.is_finite());
    finite.then(|| Aabb::new(mins, maxs))
}

/// Component-wise union (min of mins, max of maxes), `None` for no boxes.
pub fn union<I>(boxes: I) -> Option<Aabb>
where
    I: IntoIterator<Item = Aabb>,
{
    boxes.into_iter().reduce(|acc, b| acc.merged(&b))
}

/// Edge lengths of the box.
#[inline]
pub fn extents(aabb: &Aabb) -> Vector3<Real> {
    aabb.maxs - aabb.mins
}

/// True when some edge is not longer than [`tolerance`].
#[inline]
pub fn is_degenerate(aabb: &Aabb) -> bool {
    extents(aabb).iter().any(|&e| !(e > tolerance()))
}

/// Rejects boxes that cannot host a volumetric sample.
pub fn ensure_volume(aabb: &Aabb, what: &str) -> Result<(), SpaceError> {
    if is_degenerate(aabb) {
        return Err(SpaceError::degenerate(format!(
            "{what} has zero extent: mins {:?}, maxs {:?}",
            aabb.mins.coords.as_slice(),
            aabb.maxs.coords.as_slice()
        )));
    }
    Ok(())
}

/// Maximum per-corner deviation between two boxes.
pub fn max_corner_distance(a: &Aabb, b: &Aabb) -> Real {
    let lo = (a.mins - b.mins).abs().max();
    let hi = (a.maxs - b.maxs).abs().max();
    lo.max(hi)
}
