use super::check_spacing;
use crate::errors::SpaceError;
use crate::float_types::Real;
use crate::lattice::PointGrid;
use nalgebra::{Point3, Vector3};

/// `n` evenly spaced values from `lo` to `hi`, both ends included.
///
/// A single value collapses onto `lo`. The last value is exactly `hi`.
pub fn linspace(lo: Real, hi: Real, n: usize) -> Vec<Real> {
    match n {
        0 => Vec::new(),
        1 => vec![lo],
        _ => {
            let step = (hi - lo) / (n - 1) as Real;
            let mut out: Vec<Real> = (0..n).map(|k| lo + step * k as Real).collect();
            out[n - 1] = hi;
            out
        },
    }
}

/// Lattice of shape `spacing + (3,)` spanning `[0, scale]` on every axis, then
/// shifted by `-center_shift`.
///
/// The resulting coordinates lie in `[-center_shift, scale - center_shift]`
/// componentwise. `spacing = (1, 1, 1)` yields the single point `-center_shift`.
pub fn grid_in_cube(
    spacing: [usize; 3],
    scale: Real,
    center_shift: Vector3<Real>,
) -> Result<PointGrid, SpaceError> {
    if !scale.is_finite() {
        return Err(SpaceError::invalid(format!("grid scale must be finite, got {scale}")));
    }
    let lower = Point3::from(-center_shift);
    let upper = Point3::from(Vector3::repeat(scale) - center_shift);
    grid_in_cube2(spacing, lower, upper)
}

/// Lattice of shape `spacing + (3,)`; axis `i` runs from `lower[i]` to
/// `upper[i]`, both ends included.
pub fn grid_in_cube2(
    spacing: [usize; 3],
    lower: Point3<Real>,
    upper: Point3<Real>,
) -> Result<PointGrid, SpaceError> {
    check_spacing(spacing)?;
    let xs = linspace(lower.x, upper.x, spacing[0]);
    let ys = linspace(lower.y, upper.y, spacing[1]);
    let zs = linspace(lower.z, upper.z, spacing[2]);
    Ok(PointGrid::from_fn(spacing, |i, j, k| Point3::new(xs[i], ys[j], zs[k])))
}
