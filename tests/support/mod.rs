//! Test support library
//! Fixture writers and comparison helpers shared by the integration tests.

#![allow(dead_code)]

use nalgebra::Point3;
use npyz::WriterBuilder;
use shapespace::float_types::Real;
use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Quick helper to compare floating-point results with an acceptable tolerance.
pub fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
    (a - b).abs() < eps
}

/// Componentwise [`approx_eq`] for points.
pub fn approx_point(a: &Point3<Real>, b: &Point3<Real>, eps: Real) -> bool {
    (0..3).all(|i| approx_eq(a[i], b[i], eps))
}

/// Vertices and faces of a UV sphere with 16 segments and 8 rings, so the
/// poles and the four axis points of the equator lie exactly on the box.
pub fn uv_sphere(center: Point3<Real>, radius: Real) -> (Vec<Point3<Real>>, Vec<[usize; 3]>) {
    const SEGMENTS: usize = 16;
    const RINGS: usize = 8;
    let pi = std::f64::consts::PI;

    let mut positions = vec![center + nalgebra::Vector3::new(0.0, 0.0, radius)];
    for ring in 1..RINGS {
        let theta = pi * ring as f64 / RINGS as f64;
        for seg in 0..SEGMENTS {
            let phi = 2.0 * pi * seg as f64 / SEGMENTS as f64;
            let (x, y, z) = (theta.sin() * phi.cos(), theta.sin() * phi.sin(), theta.cos());
            // snap the axis points so they are exact in both float widths
            let snap = |v: f64| if v.abs() < 1e-12 { 0.0 } else { v };
            positions.push(Point3::new(
                center.x + radius * snap(x) as Real,
                center.y + radius * snap(y) as Real,
                center.z + radius * snap(z) as Real,
            ));
        }
    }
    positions.push(center - nalgebra::Vector3::new(0.0, 0.0, radius));

    let ring_start = |ring: usize| 1 + (ring - 1) * SEGMENTS;
    let bottom = positions.len() - 1;
    let mut faces = Vec::new();
    for seg in 0..SEGMENTS {
        let next = (seg + 1) % SEGMENTS;
        faces.push([0, ring_start(1) + seg, ring_start(1) + next]);
        faces.push([bottom, ring_start(RINGS - 1) + next, ring_start(RINGS - 1) + seg]);
    }
    for ring in 1..RINGS - 1 {
        for seg in 0..SEGMENTS {
            let next = (seg + 1) % SEGMENTS;
            let (a, b) = (ring_start(ring) + seg, ring_start(ring) + next);
            let (c, d) = (ring_start(ring + 1) + seg, ring_start(ring + 1) + next);
            faces.push([a, c, d]);
            faces.push([a, d, b]);
        }
    }
    (positions, faces)
}

/// Write a UV sphere as OBJ, with `v x y z r g b` lines when `rgb` is given.
pub fn write_sphere_obj(path: &Path, center: Point3<Real>, radius: Real, rgb: Option<[Real; 3]>) {
    let (positions, faces) = uv_sphere(center, radius);
    let mut out = String::from("o sphere\n");
    for p in &positions {
        match rgb {
            Some([r, g, b]) => out.push_str(&format!("v {} {} {} {r} {g} {b}\n", p.x, p.y, p.z)),
            None => out.push_str(&format!("v {} {} {}\n", p.x, p.y, p.z)),
        }
    }
    for f in &faces {
        out.push_str(&format!("f {} {} {}\n", f[0] + 1, f[1] + 1, f[2] + 1));
    }
    fs::write(path, out).unwrap();
}

/// Exact signed distance to a sphere sampled on a lattice of `dims` points
/// spanning `[-1, 1]` per axis, first axis slowest.
pub fn sphere_sdf_values(dims: [usize; 3], center: Point3<Real>, radius: Real) -> Vec<Real> {
    let coord = |c: usize, n: usize| -1.0 + 2.0 * c as Real / (n - 1) as Real;
    let mut values = Vec::with_capacity(dims[0] * dims[1] * dims[2]);
    for i in 0..dims[0] {
        for j in 0..dims[1] {
            for k in 0..dims[2] {
                let p = Point3::new(coord(i, dims[0]), coord(j, dims[1]), coord(k, dims[2]));
                values.push((p - center).norm() - radius);
            }
        }
    }
    values
}

/// Write `values` as a `.npy` array of `shape`, laid out in `order`.
pub fn write_npy<T: npyz::AutoSerialize>(
    path: &Path,
    shape: &[usize],
    order: npyz::Order,
    values: impl IntoIterator<Item = T>,
) {
    let shape: Vec<u64> = shape.iter().map(|&n| n as u64).collect();
    let file = BufWriter::new(fs::File::create(path).unwrap());
    let mut writer = npyz::WriteOptions::<T>::new()
        .default_dtype()
        .shape(&shape)
        .order(order)
        .writer(file)
        .begin_nd()
        .unwrap();
    writer.extend(values).unwrap();
    writer.finish().unwrap();
}

/// Lattice resolution of the fixture fields.
pub const FIELD_DIMS: [usize; 3] = [41, 41, 41];

/// Center and radius of fixture subject `i`; always well inside `[-1, 1]`.
pub fn subject_sphere(i: usize) -> (Point3<Real>, Real) {
    let t = i as Real;
    (Point3::new(-0.2 + 0.1 * t, 0.05 * t, -0.03 * t), 0.5 + 0.05 * t)
}

/// A manifest of `n` sphere subjects written to `dir`, as
/// `(names, mesh paths, field paths)`.
pub fn write_manifest(dir: &Path, n: usize) -> (Vec<String>, Vec<PathBuf>, Vec<PathBuf>) {
    let mut names = Vec::new();
    let mut meshes = Vec::new();
    let mut fields = Vec::new();
    for i in 0..n {
        let name = format!("patient{i}");
        let (center, radius) = subject_sphere(i);

        let mesh = dir.join(format!("{name}.obj"));
        write_sphere_obj(&mesh, center, radius, None);

        let field = dir.join(format!("{name}.npy"));
        let values = sphere_sdf_values(FIELD_DIMS, center, radius);
        write_npy(&field, &FIELD_DIMS, npyz::Order::C, values.into_iter().map(|v| v as f64));

        names.push(name);
        meshes.push(mesh);
        fields.push(field);
    }
    (names, meshes, fields)
}
