//! Stateless point generators: regular lattices, seeded random clouds and
//! cyclic strided subsampling.
//!
//! Every randomized function takes an explicit `u64` seed and draws from its
//! own [`ChaCha8Rng`](rand_chacha::ChaCha8Rng); nothing here touches process-wide
//! random state, so the same seed always reproduces the same output.

mod grid;
mod random;
mod strided;

pub use grid::{grid_in_cube, grid_in_cube2, linspace};
pub use random::{gaussian_shackle, seeded_rng, uniform_in_cube};
pub use strided::{take_each_n, take_each_n_indices};

use crate::errors::SpaceError;

pub(crate) fn check_spacing(spacing: [usize; 3]) -> Result<(), SpaceError> {
    if spacing.iter().any(|&n| n == 0) {
        return Err(SpaceError::invalid(format!(
            "lattice spacing must be positive along every axis, got {spacing:?}"
        )));
    }
    Ok(())
}
