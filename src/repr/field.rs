//! Scalar fields sampled on a regular lattice.

use crate::config::FieldFrame;
use crate::errors::SpaceError;
use crate::float_types::Real;
use crate::float_types::parry3d::bounding_volume::Aabb;
use crate::io::FieldData;
use crate::lattice::{PointGrid, ScalarGrid, cell_count, linear_index};
use crate::sampling::grid_in_cube;
use crate::traits::GeometricNode;
use nalgebra::{Point3, Vector3};

/// A signed distance field: negative inside, positive outside.
///
/// Sample `(i, j, k)` sits at `origin + (i, j, k) * spacing`.
#[derive(Clone, Debug)]
pub struct FieldRepresentation {
    dims: [usize; 3],
    origin: Point3<Real>,
    spacing: Vector3<Real>,
    values: Vec<Real>,
    iso_level: Real,
    bbox: Aabb,
}

impl FieldRepresentation {
    /// Place `data` with `frame` and bound the samples at or below `iso_level`.
    pub fn from_data(data: FieldData, frame: &FieldFrame, iso_level: Real) -> Result<Self, SpaceError> {
        let FieldData { dims, values } = data;
        if cell_count(dims) != values.len() {
            return Err(SpaceError::ShapeMismatch {
                name: "field values".to_string(),
                expected: cell_count(dims),
                found: values.len(),
            });
        }
        let (origin, spacing) = frame.resolve(dims).ok_or_else(|| {
            SpaceError::degenerate(format!("field lattice {dims:?} cannot be placed in {frame:?}"))
        })?;
        let bbox = interior_box(dims, &origin, &spacing, &values, iso_level).ok_or_else(|| {
            SpaceError::degenerate(format!("field has no sample at or below level {iso_level}"))
        })?;

        Ok(Self {
            dims,
            origin,
            spacing,
            values,
            iso_level,
            bbox,
        })
    }

    #[inline]
    pub const fn dims(&self) -> [usize; 3] {
        self.dims
    }

    #[inline]
    pub const fn origin(&self) -> Point3<Real> {
        self.origin
    }

    #[inline]
    pub const fn spacing(&self) -> Vector3<Real> {
        self.spacing
    }

    #[inline]
    pub const fn iso_level(&self) -> Real {
        self.iso_level
    }

    #[inline]
    pub fn values(&self) -> &[Real] {
        &self.values
    }

    /// Stored sample at lattice index `(i, j, k)`.
    #[inline]
    pub fn value_at_index(&self, i: usize, j: usize, k: usize) -> Option<Real> {
        if i >= self.dims[0] || j >= self.dims[1] || k >= self.dims[2] {
            return None;
        }
        Some(self.values[linear_index(self.dims, i, j, k)])
    }

    /// World position of lattice index `(i, j, k)`.
    #[inline]
    pub fn position_of(&self, i: usize, j: usize, k: usize) -> Point3<Real> {
        self.origin + Vector3::new(i as Real, j as Real, k as Real).component_mul(&self.spacing)
    }

    /// Trilinear interpolation at `p`; positions outside the lattice take the
    /// value of the nearest border.
    pub fn value_at(&self, p: &Point3<Real>) -> Real {
        let [(i0, i1, tx), (j0, j1, ty), (k0, k1, tz)] =
            [0, 1, 2].map(|axis| self.axis_cell(axis, p[axis]));

        let v = |i, j, k| self.values[linear_index(self.dims, i, j, k)];
        let lerp = |a: Real, b: Real, t: Real| a + (b - a) * t;

        let c00 = lerp(v(i0, j0, k0), v(i1, j0, k0), tx);
        let c10 = lerp(v(i0, j1, k0), v(i1, j1, k0), tx);
        let c01 = lerp(v(i0, j0, k1), v(i1, j0, k1), tx);
        let c11 = lerp(v(i0, j1, k1), v(i1, j1, k1), tx);
        let c0 = lerp(c00, c10, ty);
        let c1 = lerp(c01, c11, ty);
        lerp(c0, c1, tz)
    }

    /// Lower index, upper index and fraction of `coord` along `axis`.
    fn axis_cell(&self, axis: usize, coord: Real) -> (usize, usize, Real) {
        let n = self.dims[axis];
        if n < 2 {
            return (0, 0, 0.0);
        }
        let u = ((coord - self.origin[axis]) / self.spacing[axis]).clamp(0.0, (n - 1) as Real);
        let u = if u.is_nan() { 0.0 } else { u };
        let lo = (u.floor() as usize).min(n - 2);
        (lo, lo + 1, u - lo as Real)
    }

    /// Local patch around `center`: a lattice of shape `spacing + (3,)` with
    /// edge length `scale`, spanning `[center - scale/2, center + scale/2]`
    /// per axis, and the field interpolated at every lattice point
    /// (shape `spacing + (1,)`).
    pub fn xyz2local_sdt(
        &self,
        center: &Point3<Real>,
        spacing: [usize; 3],
        scale: Real,
    ) -> Result<(PointGrid, ScalarGrid), SpaceError> {
        if !(scale >= 0.0) {
            return Err(SpaceError::invalid(format!("patch scale must be non-negative, got {scale}")));
        }
        let local = grid_in_cube(spacing, scale, Vector3::repeat(scale / 2.0))?.translated(&center.coords);
        let values = local.points().iter().map(|p| self.value_at(p)).collect();
        let sdt = ScalarGrid::new(local.dims(), values);
        Ok((local, sdt))
    }
}

impl GeometricNode for FieldRepresentation {
    fn bounding_box(&self) -> Result<Aabb, SpaceError> {
        Ok(self.bbox)
    }
}

/// Box of the samples at or below `iso`, pushed outwards on every face to
/// where the field crosses `iso` between the outermost inside sample and its
/// outside neighbour.
fn interior_box(
    dims: [usize; 3],
    origin: &Point3<Real>,
    spacing: &Vector3<Real>,
    values: &[Real],
    iso: Real,
) -> Option<Aabb> {
    let inside = |v: Real| v <= iso;

    let mut lo = dims;
    let mut hi = [0usize; 3];
    let mut any = false;
    for i in 0..dims[0] {
        for j in 0..dims[1] {
            for k in 0..dims[2] {
                if inside(values[linear_index(dims, i, j, k)]) {
                    any = true;
                    for (axis, c) in [i, j, k].into_iter().enumerate() {
                        lo[axis] = lo[axis].min(c);
                        hi[axis] = hi[axis].max(c);
                    }
                }
            }
        }
    }
    if !any {
        return None;
    }

    let coord = |axis: usize, c: usize| origin[axis] + c as Real * spacing[axis];
    let mut mins = Point3::new(coord(0, lo[0]), coord(1, lo[1]), coord(2, lo[2]));
    let mut maxs = Point3::new(coord(0, hi[0]), coord(1, hi[1]), coord(2, hi[2]));

    // Linear estimate of the crossing between an inside sample and its
    // outside neighbour, as a fraction of one lattice step.
    let crossing = |v_in: Real, v_out: Real| {
        let t = (v_in - iso) / ((v_in - iso) - (v_out - iso));
        if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 }
    };

    for i in 0..dims[0] {
        for j in 0..dims[1] {
            for k in 0..dims[2] {
                let v_in = values[linear_index(dims, i, j, k)];
                if !inside(v_in) {
                    continue;
                }
                let c = [i, j, k];
                for axis in 0..3 {
                    if c[axis] == lo[axis] && c[axis] > 0 {
                        let mut n = c;
                        n[axis] -= 1;
                        let t = crossing(v_in, values[linear_index(dims, n[0], n[1], n[2])]);
                        mins[axis] = mins[axis].min(coord(axis, c[axis]) - t * spacing[axis]);
                    }
                    if c[axis] == hi[axis] && c[axis] + 1 < dims[axis] {
                        let mut n = c;
                        n[axis] += 1;
                        let t = crossing(v_in, values[linear_index(dims, n[0], n[1], n[2])]);
                        maxs[axis] = maxs[axis].max(coord(axis, c[axis]) + t * spacing[axis]);
                    }
                }
            }
        }
    }

    Some(Aabb::new(mins, maxs))
}
