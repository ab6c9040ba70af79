//! An addressable, lazily loaded **shape space** over surface meshes and
//! signed distance fields, with a uniform sampling API at every level of the
//! hierarchy.
//!
//! A [`Space`] holds groups of objects; every object holds sources pointing at
//! asset files, and every source materializes a [`Representation`] on first
//! access. Any node answers [`GeometricNode`] queries (bounding box, regular
//! grids, uniform and jittered samples) over the union of the geometry below
//! it, and any node can be reached by a `/`-separated path.
//!
//! ```no_run
//! use shapespace::{GeometricNode, load_data};
//!
//! let space = load_data(
//!     &["p1", "p2"],
//!     &["p1.obj", "p2.obj"],
//!     &["p1.npy", "p2.npy"],
//!     None,
//! )?;
//! space.preload_all_possible()?;
//! let grid = space.node_at("p1/mesh")?.sampling_grid([8, 8, 8])?;
//! assert_eq!(grid.shape(), [8, 8, 8, 3]);
//! # Ok::<(), shapespace::SpaceError>(())
//! ```
//!
//! # Features
//! #### Default
//! - **f64**: use f64 as Real
//! - [**obj-io**](https://en.wikipedia.org/wiki/Wavefront_.obj_file): `.obj` mesh import, with per-vertex colors
//! - [**stl-io**](https://en.wikipedia.org/wiki/STL_(file_format)): `.stl` mesh import and binary export
//! - **sdf**: iso-surface extraction from fields using [fast-surface-nets](https://crates.io/crates/fast-surface-nets)
//!
//! #### Optional
//! - **f32**: use f32 as Real, this conflicts with f64

#![forbid(unsafe_code)]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod aabb;
pub mod config;
pub mod errors;
pub mod float_types;
pub mod io;
pub mod lattice;
pub mod repr;
pub mod sampling;
pub mod sdf;
pub mod space;
pub mod traits;

#[cfg(any(all(feature = "f64", feature = "f32"), not(any(feature = "f64", feature = "f32"))))]
compile_error!("Either 'f64' or 'f32' feature must be specified, but not both");

pub use config::{FieldFrame, MeshFrame, SpaceConfig};
pub use errors::SpaceError;
pub use float_types::Real;
pub use lattice::{PointGrid, ScalarGrid};
pub use repr::{FieldRepresentation, MeshRepresentation, Representation, SourceKind};
pub use sdf::sdf_primitive_sphere;
pub use space::{
    BoundMethod, Method, MethodCall, MethodOutput, NodeId, NodeKind, NodeRef, Resolved, Space,
    load_data, load_data_with, train_test_split,
};
pub use traits::GeometricNode;
