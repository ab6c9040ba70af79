use crate::errors::SpaceError;
use crate::float_types::Real;
use crate::lattice::PointGrid;
use nalgebra::Point3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;

/// Generator used by every sampler of the crate.
#[inline]
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// `count` points drawn independently and uniformly per axis in
/// `[lower[i], upper[i]]`, shape `(count, 3)`.
pub fn uniform_in_cube(
    seed: u64,
    count: usize,
    lower: Point3<Real>,
    upper: Point3<Real>,
) -> Result<Vec<Point3<Real>>, SpaceError> {
    for axis in 0..3 {
        let (lo, hi) = (lower[axis], upper[axis]);
        if !(lo.is_finite() && hi.is_finite()) || lo > hi {
            return Err(SpaceError::invalid(format!(
                "uniform sampling needs finite bounds with lower <= upper, axis {axis}: [{lo}, {hi}]"
            )));
        }
    }
    let extent = upper - lower;
    let mut rng = seeded_rng(seed);
    let points = (0..count)
        .map(|_| {
            let x = lower.x + extent.x * rng.random::<Real>();
            let y = lower.y + extent.y * rng.random::<Real>();
            let z = lower.z + extent.z * rng.random::<Real>();
            Point3::new(x, y, z)
        })
        .collect();
    Ok(points)
}

/// Adds independent `N(0, sigma^2)` noise to every coordinate of `grid`.
///
/// The jittered points are not clamped to the original extent.
pub fn gaussian_shackle(grid: PointGrid, seed: u64, sigma: Real) -> Result<PointGrid, SpaceError> {
    if !sigma.is_finite() || sigma < 0.0 {
        return Err(SpaceError::invalid(format!(
            "shackle sigma must be finite and non-negative, got {sigma}"
        )));
    }
    let mut grid = grid;
    let mut rng = seeded_rng(seed);
    for p in grid.points_mut() {
        for c in p.coords.iter_mut() {
            let noise: Real = rng.sample(StandardNormal);
            *c += sigma * noise;
        }
    }
    Ok(grid)
}
