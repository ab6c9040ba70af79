//! Analytic signed-distance primitives with closed-form gradients.

mod sphere;

pub use sphere::{SphereSdf, sdf_primitive_sphere};

use crate::errors::SpaceError;
use crate::float_types::Real;

/// A field evaluated elementwise over coordinate columns `(xs, ys, zs)`.
///
/// The three columns must have the same length.
pub type VectorizedFn =
    Box<dyn Fn(&[Real], &[Real], &[Real]) -> Result<Vec<Real>, SpaceError> + Send + Sync>;

/// Field value and its three partial derivatives, in that order.
pub type PrimitiveFns = (VectorizedFn, VectorizedFn, VectorizedFn, VectorizedFn);

pub(crate) fn vectorize<F>(f: F) -> VectorizedFn
where
    F: Fn(Real, Real, Real) -> Real + Send + Sync + 'static,
{
    Box::new(move |xs: &[Real], ys: &[Real], zs: &[Real]| {
        for (name, column) in [("ys", ys), ("zs", zs)] {
            if column.len() != xs.len() {
                return Err(SpaceError::ShapeMismatch {
                    name: name.to_string(),
                    expected: xs.len(),
                    found: column.len(),
                });
            }
        }
        Ok(xs.iter()
            .zip(ys)
            .zip(zs)
            .map(|((&x, &y), &z)| f(x, y, z))
            .collect())
    })
}
