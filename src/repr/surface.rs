//! Iso-surface extraction from a field with surface nets.

use super::{FieldRepresentation, MeshRepresentation};
use crate::errors::SpaceError;
use crate::float_types::Real;
use crate::io::MeshData;
use fast_surface_nets::{SurfaceNetsBuffer, surface_nets};
use nalgebra::Point3;

/// The shape describing the field lattice for Surface Nets, linearized with
/// the first axis varying slowest like the field storage.
#[derive(Clone, Copy)]
struct GridShape {
    nx: u32,
    ny: u32,
    nz: u32,
}

impl fast_surface_nets::ndshape::Shape<3> for GridShape {
    type Coord = u32;

    #[inline]
    fn as_array(&self) -> [Self::Coord; 3] {
        [self.nx, self.ny, self.nz]
    }

    fn size(&self) -> Self::Coord {
        self.nx * self.ny * self.nz
    }

    fn usize(&self) -> usize {
        (self.nx * self.ny * self.nz) as usize
    }

    fn linearize(&self, coords: [Self::Coord; 3]) -> u32 {
        let [x, y, z] = coords;
        (x * self.ny + y) * self.nz + z
    }

    fn delinearize(&self, i: u32) -> [Self::Coord; 3] {
        let z = i % self.nz;
        let xy = i / self.nz;
        let y = xy % self.ny;
        let x = xy / self.ny;
        [x, y, z]
    }
}

impl FieldRepresentation {
    /// Mesh the iso-surface of this field in world coordinates.
    ///
    /// Non-finite samples are treated as far outside.
    #[allow(clippy::unnecessary_cast)]
    pub fn extract_surface(&self) -> Result<MeshRepresentation, SpaceError> {
        let [nx, ny, nz] = self.dims();
        let total = nx.checked_mul(ny).and_then(|v| v.checked_mul(nz));
        let too_small = nx < 2 || ny < 2 || nz < 2;
        if too_small || total.is_none_or(|v| v > u32::MAX as usize) {
            return Err(SpaceError::invalid(format!(
                "surface extraction needs at least 2 samples per axis and fewer than 2^32 in total, got {:?}",
                self.dims()
            )));
        }

        let iso = self.iso_level();
        let field_values: Vec<f32> = self
            .values()
            .iter()
            .map(|&v| if v.is_finite() { (v - iso) as f32 } else { 1e10_f32 })
            .collect();

        let shape = GridShape {
            nx: nx as u32,
            ny: ny as u32,
            nz: nz as u32,
        };
        let mut sn_buffer = SurfaceNetsBuffer::default();
        surface_nets(
            &field_values,
            &shape,
            [0, 0, 0],
            [shape.nx - 1, shape.ny - 1, shape.nz - 1],
            &mut sn_buffer,
        );

        let origin = self.origin();
        let spacing = self.spacing();
        let positions: Vec<Point3<Real>> = sn_buffer
            .positions
            .iter()
            .map(|p| {
                Point3::new(
                    origin.x + p[0] as Real * spacing.x,
                    origin.y + p[1] as Real * spacing.y,
                    origin.z + p[2] as Real * spacing.z,
                )
            })
            .collect();
        let faces: Vec<[usize; 3]> = sn_buffer
            .indices
            .chunks_exact(3)
            .map(|tri| [tri[0] as usize, tri[1] as usize, tri[2] as usize])
            .collect();

        MeshRepresentation::from_data(
            MeshData {
                positions,
                faces,
                colors: None,
                alpha: None,
            },
            None,
        )
    }
}
