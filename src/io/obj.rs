//! Wavefront OBJ meshes, including the `v x y z r g b` color extension.

use super::{IoError, MeshData};
use crate::float_types::Real;
use nalgebra::Point3;
use std::path::Path;

/// Read every model of an OBJ file into one triangulated surface.
///
/// Models are concatenated in file order; their face indices are offset
/// accordingly. Colors are kept only when every model carries them.
#[allow(clippy::unnecessary_cast)]
pub fn read_obj(path: &Path) -> Result<MeshData, IoError> {
    let options = tobj::LoadOptions {
        triangulate: true,
        single_index: false,
        ..Default::default()
    };
    let (models, _materials) = tobj::load_obj(path, &options)?;

    let mut data = MeshData::default();
    let mut colors = Vec::new();
    let mut all_colored = !models.is_empty();

    for model in &models {
        let mesh = &model.mesh;
        if mesh.positions.len() % 3 != 0 || mesh.indices.len() % 3 != 0 {
            return Err(IoError::MalformedInput(format!(
                "model `{}` has a dangling coordinate or index",
                model.name
            )));
        }
        let offset = data.positions.len();
        let count = mesh.positions.len() / 3;

        data.positions.extend(
            mesh.positions
                .chunks_exact(3)
                .map(|c| Point3::new(c[0] as Real, c[1] as Real, c[2] as Real)),
        );

        for tri in mesh.indices.chunks_exact(3) {
            let face = [
                offset + tri[0] as usize,
                offset + tri[1] as usize,
                offset + tri[2] as usize,
            ];
            if face.iter().any(|&i| i >= offset + count) {
                return Err(IoError::MalformedInput(format!(
                    "model `{}` references a vertex out of range",
                    model.name
                )));
            }
            data.faces.push(face);
        }

        if mesh.vertex_color.len() == mesh.positions.len() {
            colors.extend(
                mesh.vertex_color
                    .chunks_exact(3)
                    .map(|c| [c[0] as Real, c[1] as Real, c[2] as Real]),
            );
        } else {
            all_colored = false;
        }
    }

    if all_colored {
        data.colors = Some(colors);
    }
    Ok(data)
}
