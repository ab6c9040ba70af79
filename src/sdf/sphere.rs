use super::{PrimitiveFns, vectorize};
use crate::float_types::Real;
use nalgebra::{Point3, Vector3};

/// Sphere of `radius` around `center`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SphereSdf {
    pub center: Point3<Real>,
    pub radius: Real,
}

impl SphereSdf {
    pub const fn new(center: Point3<Real>, radius: Real) -> Self {
        Self { center, radius }
    }

    /// Quadratic field `|p - c|^2 - r^2`: negative inside, zero on the surface.
    #[inline]
    pub fn value(&self, p: &Point3<Real>) -> Real {
        (p - self.center).norm_squared() - self.radius * self.radius
    }

    /// Gradient of [`value`](Self::value), `2 (p - c)`.
    #[inline]
    pub fn gradient(&self, p: &Point3<Real>) -> Vector3<Real> {
        (p - self.center) * 2.0
    }

    /// Euclidean signed distance `|p - c| - r`.
    #[inline]
    pub fn distance(&self, p: &Point3<Real>) -> Real {
        (p - self.center).norm() - self.radius
    }

    /// Gradient of [`distance`](Self::distance), `(p - c) / |p - c|`.
    ///
    /// At the center the gradient is singular and evaluates to zero.
    pub fn distance_gradient(&self, p: &Point3<Real>) -> Vector3<Real> {
        let d = p - self.center;
        let n = d.norm();
        if n > 0.0 { d / n } else { Vector3::zeros() }
    }
}

/// Four vectorized functions of `(xs, ys, zs)`: the sphere field
/// `|p - c|^2 - r^2` followed by its partial derivatives along x, y and z.
///
/// ```
/// # use shapespace::sdf::sdf_primitive_sphere;
/// # use nalgebra::Point3;
/// let (f, _, _, fz) = sdf_primitive_sphere(Point3::origin(), 1.0);
/// assert_eq!(f(&[0.0, 0.0], &[0.0, 0.0], &[0.0, 2.0]).unwrap(), vec![-1.0, 3.0]);
/// assert_eq!(fz(&[0.0], &[0.0], &[1.0]).unwrap(), vec![2.0]);
/// ```
pub fn sdf_primitive_sphere(center: Point3<Real>, radius: Real) -> PrimitiveFns {
    let sphere = SphereSdf::new(center, radius);
    (
        vectorize(move |x, y, z| sphere.value(&Point3::new(x, y, z))),
        vectorize(move |x, _, _| 2.0 * (x - sphere.center.x)),
        vectorize(move |_, y, _| 2.0 * (y - sphere.center.y)),
        vectorize(move |_, _, z| 2.0 * (z - sphere.center.z)),
    )
}
