//! Shaped containers for sampled coordinates and field values.
//!
//! Both containers store their entries in row-major `(i, j, k)` order with the
//! first axis varying slowest, so entry `(i, j, k)` lives at
//! `(i * ny + j) * nz + k`.

use crate::float_types::Real;
use nalgebra::{Point3, Vector3};

/// Number of entries of a `(nx, ny, nz)` lattice.
#[inline]
pub const fn cell_count(dims: [usize; 3]) -> usize {
    dims[0] * dims[1] * dims[2]
}

/// Linear offset of `(i, j, k)` inside a `(nx, ny, nz)` lattice.
#[inline]
pub const fn linear_index(dims: [usize; 3], i: usize, j: usize, k: usize) -> usize {
    (i * dims[1] + j) * dims[2] + k
}

/// A lattice of points, shape `dims + (3,)`.
#[derive(Clone, Debug, PartialEq)]
pub struct PointGrid {
    dims: [usize; 3],
    points: Vec<Point3<Real>>,
}

impl PointGrid {
    pub(crate) fn from_fn<F>(dims: [usize; 3], mut f: F) -> Self
    where
        F: FnMut(usize, usize, usize) -> Point3<Real>,
    {
        let mut points = Vec::with_capacity(cell_count(dims));
        for i in 0..dims[0] {
            for j in 0..dims[1] {
                for k in 0..dims[2] {
                    points.push(f(i, j, k));
                }
            }
        }
        Self { dims, points }
    }

    /// Lattice dimensions `(nx, ny, nz)`.
    #[inline]
    pub const fn dims(&self) -> [usize; 3] {
        self.dims
    }

    /// Full array shape, `dims + (3,)`.
    #[inline]
    pub const fn shape(&self) -> [usize; 4] {
        [self.dims[0], self.dims[1], self.dims[2], 3]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize, k: usize) -> Option<&Point3<Real>> {
        if i >= self.dims[0] || j >= self.dims[1] || k >= self.dims[2] {
            return None;
        }
        self.points.get(linear_index(self.dims, i, j, k))
    }

    #[inline]
    pub fn points(&self) -> &[Point3<Real>] {
        &self.points
    }

    pub fn points_mut(&mut self) -> &mut [Point3<Real>] {
        &mut self.points
    }

    pub fn into_points(self) -> Vec<Point3<Real>> {
        self.points
    }

    /// Flattened coordinates, `x0, y0, z0, x1, ...`.
    pub fn to_flat(&self) -> Vec<Real> {
        self.points.iter().flat_map(|p| [p.x, p.y, p.z]).collect()
    }

    /// Smallest coordinate over every point and axis.
    pub fn min(&self) -> Real {
        self.points
            .iter()
            .map(|p| p.coords.min())
            .fold(Real::INFINITY, Real::min)
    }

    /// Largest coordinate over every point and axis.
    pub fn max(&self) -> Real {
        self.points
            .iter()
            .map(|p| p.coords.max())
            .fold(Real::NEG_INFINITY, Real::max)
    }

    /// Translate every point by `offset`.
    pub fn translated(mut self, offset: &Vector3<Real>) -> Self {
        for p in &mut self.points {
            *p += offset;
        }
        self
    }
}

/// A lattice of scalars co-indexed with a [`PointGrid`], shape `dims + (1,)`.
#[derive(Clone, Debug, PartialEq)]
pub struct ScalarGrid {
    dims: [usize; 3],
    values: Vec<Real>,
}

impl ScalarGrid {
    pub(crate) fn new(dims: [usize; 3], values: Vec<Real>) -> Self {
        debug_assert_eq!(cell_count(dims), values.len());
        Self { dims, values }
    }

    #[inline]
    pub const fn dims(&self) -> [usize; 3] {
        self.dims
    }

    /// Full array shape, `dims + (1,)`.
    #[inline]
    pub const fn shape(&self) -> [usize; 4] {
        [self.dims[0], self.dims[1], self.dims[2], 1]
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize, k: usize) -> Option<Real> {
        if i >= self.dims[0] || j >= self.dims[1] || k >= self.dims[2] {
            return None;
        }
        self.values.get(linear_index(self.dims, i, j, k)).copied()
    }

    #[inline]
    pub fn values(&self) -> &[Real] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Real> {
        self.values
    }
}
