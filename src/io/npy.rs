//! NumPy `.npy` fields.

use super::{FieldData, IoError};
use crate::float_types::Real;
use npyz::{DType, NpyFile, Order};
use std::path::Path;

/// Read a 3-D array, or a 4-D array whose last axis holds channels (only the
/// first channel is kept). Floating point and integer element types are
/// converted to [`Real`]; both C and Fortran layouts are accepted.
#[allow(clippy::unnecessary_cast)]
pub fn read_npy(path: &Path) -> Result<FieldData, IoError> {
    let bytes = std::fs::read(path)?;
    let npy = NpyFile::new(&bytes[..])?;

    let shape: Vec<usize> = npy.shape().iter().map(|&n| n as usize).collect();
    let order = npy.order();
    let type_str = match npy.dtype() {
        DType::Plain(ts) => ts.to_string(),
        other => {
            return Err(IoError::MalformedInput(format!(
                "{}: structured dtype {other:?} is not a scalar field",
                path.display()
            )));
        },
    };

    let (dims, channels) = match shape.as_slice() {
        [x, y, z] => ([*x, *y, *z], 1),
        [x, y, z, c] if *c > 0 => ([*x, *y, *z], *c),
        _ => {
            return Err(IoError::MalformedInput(format!(
                "{}: expected a 3-D array (optionally with a channel axis), got shape {shape:?}",
                path.display()
            )));
        },
    };

    let raw: Vec<Real> = match type_str.get(1..).unwrap_or_default() {
        "f8" => npy.into_vec::<f64>()?.into_iter().map(|v| v as Real).collect(),
        "f4" => npy.into_vec::<f32>()?.into_iter().map(|v| v as Real).collect(),
        "i8" => npy.into_vec::<i64>()?.into_iter().map(|v| v as Real).collect(),
        "i4" => npy.into_vec::<i32>()?.into_iter().map(|v| v as Real).collect(),
        "i2" => npy.into_vec::<i16>()?.into_iter().map(|v| v as Real).collect(),
        "u2" => npy.into_vec::<u16>()?.into_iter().map(|v| v as Real).collect(),
        "u1" => npy.into_vec::<u8>()?.into_iter().map(|v| v as Real).collect(),
        other => {
            return Err(IoError::MalformedInput(format!(
                "{}: unsupported element type `{other}`",
                path.display()
            )));
        },
    };

    let [nx, ny, nz] = dims;
    if raw.len() != nx * ny * nz * channels {
        return Err(IoError::MalformedInput(format!(
            "{}: header announces {} elements, found {}",
            path.display(),
            nx * ny * nz * channels,
            raw.len()
        )));
    }

    let mut values = Vec::with_capacity(nx * ny * nz);
    for i in 0..nx {
        for j in 0..ny {
            for k in 0..nz {
                let offset = match order {
                    Order::C => ((i * ny + j) * nz + k) * channels,
                    Order::Fortran => i + nx * (j + ny * k),
                };
                values.push(raw[offset]);
            }
        }
    }

    Ok(FieldData { dims, values })
}
