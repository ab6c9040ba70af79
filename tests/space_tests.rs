use nalgebra::{Point3, Vector3};
use shapespace::{
    GeometricNode, MeshFrame, Method, MethodCall, MethodOutput, Resolved, SpaceConfig, SpaceError,
    aabb,
    float_types::Real,
    io::FileLoader,
    load_data, load_data_with,
    space::{DEFAULT_GROUP, FIELD_SOURCE, MESH_SOURCE, TEST_GROUP, TRAIN_GROUP},
};
use std::collections::BTreeMap;

mod support;
use support::{FIELD_DIMS, approx_eq, approx_point, subject_sphere, write_manifest, write_sphere_obj};

fn five_subjects(test_size: Option<Real>) -> (tempfile::TempDir, shapespace::Space) {
    let dir = tempfile::tempdir().unwrap();
    let (names, meshes, fields) = write_manifest(dir.path(), 5);
    let space = load_data(&names, &meshes, &fields, test_size).unwrap();
    (dir, space)
}

#[test]
fn manifest_builds_default_group() {
    let (_dir, space) = five_subjects(None);
    let root = space.get(space.root());
    assert!(root.is_root());

    let groups: Vec<_> = root.children().collect();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].name(), DEFAULT_GROUP);

    let subjects: Vec<_> = groups[0].children().map(|c| c.name().to_string()).collect();
    assert_eq!(subjects, ["patient0", "patient1", "patient2", "patient3", "patient4"]);

    let subject = space.node_at("default/patient3").unwrap();
    let sources: Vec<_> = subject.children().map(|c| c.name().to_string()).collect();
    assert_eq!(sources, [MESH_SOURCE, FIELD_SOURCE]);
    assert_eq!(subject.path(), "default/patient3");
    assert!(!subject.is_root());
    assert_eq!(subject.parent().unwrap().name(), DEFAULT_GROUP);
}

#[test]
fn nothing_is_loaded_before_first_access() {
    let (_dir, space) = five_subjects(None);
    assert!(!space.explore().contains("[loaded]"));

    let mesh = space.node_at("patient1/mesh").unwrap();
    mesh.bounding_box().unwrap();
    let rendered = space.explore();
    assert_eq!(rendered.matches("[loaded]").count(), 1);
    assert!(rendered.starts_with("space (space)\n└── default (group)\n"));
}

#[test]
fn short_and_long_paths_name_the_same_node() {
    let (_dir, space) = five_subjects(None);
    let long = space.node_at("default/patient2").unwrap();
    let short = space.node_at("patient2").unwrap();
    assert_eq!(long, short);

    let long = space.node_at("default/patient2/sdt/repr").unwrap();
    let short = space.node_at("patient2/sdt/repr").unwrap();
    assert_eq!(long.id(), short.id());

    // empty segments are ignored
    assert_eq!(space.node_at("default/").unwrap().name(), DEFAULT_GROUP);
    assert_eq!(space.node_at("").unwrap().id(), space.root());
}

#[test]
fn relative_resolution_starts_at_the_node() {
    let (_dir, space) = five_subjects(None);
    let group = space.node_at(DEFAULT_GROUP).unwrap();
    let mesh = group.child("patient0/mesh").unwrap();
    assert_eq!(mesh.path(), "default/patient0/mesh");
    assert!(matches!(group.child("mesh"), Err(SpaceError::NotFound { .. })));
}

#[test]
fn unknown_paths_are_not_found() {
    let (_dir, space) = five_subjects(None);
    for path in ["patient9", "default/patient9", "patient0/mesh/repr/nope", "patient0/nope"] {
        let err = space.resolve(path).unwrap_err();
        assert!(matches!(err, SpaceError::NotFound { .. }), "{path}: {err}");
    }
}

#[test]
fn short_path_under_two_groups_is_ambiguous() {
    let mut space = shapespace::Space::new("space");
    let root = space.root();
    for group in ["left", "right"] {
        let g = space.add_group(root, group).unwrap();
        space.add_object(g, "shared").unwrap();
    }
    match space.resolve("shared") {
        Err(SpaceError::Ambiguous { candidates, .. }) => {
            assert_eq!(candidates, ["left/shared", "right/shared"]);
        },
        other => panic!("expected ambiguity, got {other:?}"),
    }
    assert_eq!(space.node_at("left/shared").unwrap().path(), "left/shared");
}

#[test]
fn methods_resolve_as_terminal_segments() {
    let (_dir, space) = five_subjects(None);

    let bound = space.resolve("patient0/mesh/sampling_eachN").unwrap().into_method().unwrap();
    assert_eq!(bound.method(), Method::SamplingEachN);
    assert_eq!(bound.node().path(), "default/patient0/mesh");

    // box samplers answer everywhere, mesh-only methods only on meshes
    assert!(space.resolve("sampling_grid").is_ok());
    assert!(space.resolve("default/sampling_uniform").is_ok());
    assert!(matches!(
        space.resolve("patient0/sdt/point_color"),
        Err(SpaceError::NotFound { .. })
    ));
    assert!(matches!(
        space.resolve("patient0/mesh/xyz2local_sdt"),
        Err(SpaceError::NotFound { .. })
    ));
    assert!(matches!(
        space.resolve("patient0/sampling_grid/mesh"),
        Err(SpaceError::NotFound { .. })
    ));

    // the root's own method wins over the group fallback
    let Resolved::Method(root_grid) = space.resolve("sampling_grid").unwrap() else {
        panic!("expected a method");
    };
    assert!(root_grid.node().is_root());
}

#[test]
fn bound_methods_check_their_arguments() {
    let (_dir, space) = five_subjects(None);
    let bound = space.resolve("patient0/sampling_grid").unwrap().into_method().unwrap();
    let err = bound.call(MethodCall::SamplingUniform { seed: 0, count: 3 }).unwrap_err();
    assert!(matches!(err, SpaceError::InvalidArgument(_)));

    let grid = bound
        .call(MethodCall::SamplingGrid { spacing: [3, 3, 3] })
        .unwrap()
        .into_grid()
        .unwrap();
    assert_eq!(grid.shape(), [3, 3, 3, 3]);
}

#[test]
fn preload_aggregates_boxes_bottom_up() {
    let (_dir, space) = five_subjects(None);
    let summary = space.preload_all_possible().unwrap();
    assert_eq!(summary.sources, 10);
    // 10 sources, 5 objects, the group and the root
    assert_eq!(summary.boxes, 17);

    let group = space.node_at(DEFAULT_GROUP).unwrap();
    let subject_boxes: Vec<_> = group.children().map(|s| s.bounding_box().unwrap()).collect();
    let union = aabb::union(subject_boxes).unwrap();
    let group_box = group.bounding_box().unwrap();
    assert!(aabb::max_corner_distance(&union, &group_box) < 1e-2);
    assert_eq!(space.get(space.root()).bounding_box().unwrap(), group_box);

    for id in space.pre_order(space.root()) {
        let node = space.node(id);
        if space.has_geometry(id) {
            assert!(node.cached_bbox().is_some(), "{}", space.path_of(id));
        }
    }
}

#[test]
fn object_box_is_union_of_mesh_and_field() {
    let (_dir, space) = five_subjects(None);
    let subject = space.node_at("patient4").unwrap();
    let mesh = subject.child("mesh").unwrap().bounding_box().unwrap();
    let field = subject.child("sdt").unwrap().bounding_box().unwrap();
    let both = subject.bounding_box().unwrap();
    assert_eq!(Some(both), aabb::union([mesh, field]));
}

#[test]
fn mesh_and_field_boxes_agree() {
    let (_dir, space) = five_subjects(None);
    for i in 0..5 {
        let (center, radius) = subject_sphere(i);
        let mesh = space.node_at(&format!("patient{i}/mesh")).unwrap().bounding_box().unwrap();
        let field = space.node_at(&format!("patient{i}/sdt")).unwrap().bounding_box().unwrap();
        assert!(
            aabb::max_corner_distance(&mesh, &field) < 0.01,
            "patient{i}: {mesh:?} vs {field:?}"
        );
        let expected_min = center - Vector3::repeat(radius);
        assert!(approx_point(&mesh.mins, &expected_min, 1e-9));
    }
}

#[test]
fn voxel_unit_meshes_agree_with_their_fields() {
    let dir = tempfile::tempdir().unwrap();
    let (names, meshes, fields) = write_manifest(dir.path(), 3);
    // voxels per unit of the normalized frame
    let per_unit = (FIELD_DIMS[0] - 1) as Real / 2.0;
    for (i, mesh) in meshes.iter().enumerate() {
        let (center, radius) = subject_sphere(i);
        let voxel_center = Point3::from((center.coords + Vector3::repeat(1.0)) * per_unit);
        write_sphere_obj(mesh, voxel_center, radius * per_unit, None);
    }

    let config = SpaceConfig {
        mesh_frame: MeshFrame::Lattice,
        ..Default::default()
    };
    let space = load_data_with(config, Box::new(FileLoader), &names, &meshes, &fields, None).unwrap();
    space.preload_all_possible().unwrap();
    for i in 0..3 {
        let (center, radius) = subject_sphere(i);
        let mesh = space.node_at(&format!("patient{i}/mesh")).unwrap().bounding_box().unwrap();
        let field = space.node_at(&format!("patient{i}/sdt")).unwrap().bounding_box().unwrap();
        assert!(
            aabb::max_corner_distance(&mesh, &field) < 0.01,
            "patient{i}: {mesh:?} vs {field:?}"
        );
        assert!(approx_point(&mesh.maxs, &(center + Vector3::repeat(radius)), 1e-9));
    }
}

#[test]
fn sampling_grid_spans_each_node_box() {
    let (_dir, space) = five_subjects(None);
    for path in ["", DEFAULT_GROUP, "patient1", "patient1/mesh", "patient1/sdt/repr"] {
        let node = space.node_at(path).unwrap();
        let bbox = node.bounding_box().unwrap();
        let grid = node.sampling_grid([4, 5, 6]).unwrap();
        assert_eq!(grid.shape(), [4, 5, 6, 3]);
        assert!(approx_point(grid.get(0, 0, 0).unwrap(), &bbox.mins, 1e-12), "{path}");
        assert!(approx_point(grid.get(3, 4, 5).unwrap(), &bbox.maxs, 1e-12), "{path}");
    }
}

#[test]
fn uniform_samples_stay_in_the_box_and_repeat_with_the_seed() {
    let (_dir, space) = five_subjects(None);
    let node = space.node_at("patient2").unwrap();
    let bbox = node.bounding_box().unwrap();

    let a = node.sampling_uniform(5, 200).unwrap();
    let b = node.sampling_uniform(5, 200).unwrap();
    let c = node.sampling_uniform(6, 200).unwrap();
    assert_eq!(a.len(), 200);
    assert_eq!(a, b);
    assert_ne!(a, c);
    for p in &a {
        for i in 0..3 {
            assert!(p[i] >= bbox.mins[i] && p[i] <= bbox.maxs[i]);
        }
    }
}

#[test]
fn shackle_jitters_around_the_grid() {
    let (_dir, space) = five_subjects(None);
    let node = space.node_at("patient0/mesh").unwrap();
    let grid = node.sampling_grid([6, 6, 6]).unwrap();

    let calm = node.sampling_grid_with_shackle(1, [6, 6, 6], 1e-6).unwrap();
    for (p, q) in grid.points().iter().zip(calm.points()) {
        assert!(approx_point(p, q, 1e-4));
    }

    let wild = node.sampling_grid_with_shackle(1, [6, 6, 6], 10.0).unwrap();
    assert!(wild.min() < grid.min());
    assert!(wild.max() > grid.max());
}

#[test]
fn each_n_wraps_over_mesh_points() {
    let (_dir, space) = five_subjects(None);
    let mesh = space.node_at("patient0/mesh").unwrap();
    let n = mesh.mesh().unwrap().point_count();
    assert_eq!(n, 114);

    let (indices, points) = mesh.sampling_each_n(4, 40, 100).unwrap();
    assert_eq!(indices, [100, 26, 66, 106]);
    assert_eq!(points[1], mesh.mesh().unwrap().positions()[26]);

    let via_path = space
        .resolve("patient0/mesh/repr/sampling_eachN")
        .unwrap()
        .into_method()
        .unwrap()
        .call(MethodCall::SamplingEachN { count: 4, step: 40, shift: 100 })
        .unwrap();
    match via_path {
        MethodOutput::Indexed { indices: via, .. } => assert_eq!(via, indices),
        other => panic!("unexpected output {other:?}"),
    }
}

#[test]
fn point_color_defaults_alpha_to_one() {
    let (_dir, space) = five_subjects(None);
    let colors = space.node_at("patient0/mesh").unwrap().point_color().unwrap();
    assert!(colors.rgb.is_none());
    assert_eq!(colors.alpha.len(), 114);
    assert!(colors.alpha.iter().all(|&a| a == 1.0));
}

#[test]
fn save_mesh_checks_array_lengths() {
    let (dir, space) = five_subjects(None);
    let mesh = space.node_at("patient0/mesh").unwrap();
    let out = dir.path().join("patient0_error.vtk");

    let mut arrays = BTreeMap::new();
    arrays.insert("error".to_string(), vec![0.5; 114]);
    mesh.save_mesh(&out, &arrays).unwrap();
    let text = std::fs::read_to_string(&out).unwrap();
    assert!(text.starts_with("# vtk DataFile Version"));
    assert!(text.contains("POINTS 114"));
    assert!(text.contains("SCALARS error"));

    arrays.insert("short".to_string(), vec![0.0; 3]);
    match mesh.save_mesh(&out, &arrays) {
        Err(SpaceError::ShapeMismatch { name, expected, found }) => {
            assert_eq!((name.as_str(), expected, found), ("short", 114, 3));
        },
        other => panic!("expected a shape mismatch, got {other:?}"),
    }
}

#[test]
fn local_patch_around_a_surface_point() {
    let (_dir, space) = five_subjects(None);
    let (center, radius) = subject_sphere(0);
    let field = space.node_at("patient0/sdt").unwrap();

    let on_surface = center + Vector3::new(radius, 0.0, 0.0);
    let (local, sdt) = field.xyz2local_sdt(&on_surface, [5, 5, 5], 0.1).unwrap();
    assert_eq!(local.shape(), [5, 5, 5, 3]);
    assert_eq!(sdt.shape(), [5, 5, 5, 1]);
    assert!(approx_point(local.get(2, 2, 2).unwrap(), &on_surface, 1e-12));
    assert!(approx_eq(local.get(0, 2, 2).unwrap().x, on_surface.x - 0.05, 1e-12));
    assert!(sdt.get(2, 2, 2).unwrap().abs() < 1e-3);
    assert!(sdt.get(0, 2, 2).unwrap() < 0.0);
    assert!(sdt.get(4, 2, 2).unwrap() > 0.0);

    let (local, _) = field.xyz2local_sdt(&Point3::origin(), [5, 5, 5], 10.0).unwrap();
    assert_eq!(local.min(), -5.0);
    assert_eq!(local.max(), 5.0);
}

#[test]
fn split_manifest_fills_train_and_test() {
    let (_dir, space) = five_subjects(Some(0.4));
    let train = space.node_at(TRAIN_GROUP).unwrap();
    let test = space.node_at(TEST_GROUP).unwrap();
    assert_eq!(train.children().count(), 3);
    assert_eq!(test.children().count(), 2);
    assert!(space.node_at(DEFAULT_GROUP).is_err());

    // every subject is still reachable by its short name
    for i in 0..5 {
        let node = space.node_at(&format!("patient{i}")).unwrap();
        let group = node.parent().unwrap().name().to_string();
        assert!(group == TRAIN_GROUP || group == TEST_GROUP);
    }

    let (_dir2, again) = five_subjects(Some(0.4));
    let names = |s: &shapespace::Space| -> Vec<String> {
        s.node_at(TEST_GROUP).unwrap().children().map(|c| c.name().to_string()).collect()
    };
    assert_eq!(names(&space), names(&again));
}

#[test]
fn manifest_lists_must_align() {
    let err = load_data(&["a", "b"], &["a.obj"], &["a.npy", "b.npy"], None).unwrap_err();
    assert!(matches!(err, SpaceError::InvalidManifest(_)));
    let err = load_data(&["a", "a"], &["a.obj", "b.obj"], &["a.npy", "b.npy"], None).unwrap_err();
    assert!(matches!(err, SpaceError::InvalidManifest(_)));
}

#[test]
fn load_failure_is_scoped_to_its_branch() {
    let dir = tempfile::tempdir().unwrap();
    let (names, mut meshes, fields) = write_manifest(dir.path(), 3);
    meshes[1] = dir.path().join("missing.obj");
    let space = load_data(&names, &meshes, &fields, None).unwrap();

    match space.preload_all_possible() {
        Err(SpaceError::Preload { failures }) => {
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].0, "default/patient1/mesh");
            assert!(matches!(failures[0].1, SpaceError::LoadFailure { .. }));
        },
        other => panic!("expected a preload failure, got {other:?}"),
    }

    let cached = |path: &str| {
        let id = space.node_at(path).unwrap().id();
        space.node(id).cached_bbox().is_some()
    };
    assert!(cached("patient0"));
    assert!(cached("patient2"));
    assert!(cached("patient1/sdt"));
    assert!(!cached("patient1"));
    assert!(!cached(DEFAULT_GROUP));

    // the failure surfaces again instead of an empty box
    let err = space.node_at("patient1").unwrap().bounding_box().unwrap_err();
    assert!(matches!(err, SpaceError::LoadFailure { ref node, .. } if node == "default/patient1/mesh"));
    assert!(space.node_at("").unwrap().sampling_grid([2, 2, 2]).is_err());
}

#[test]
fn empty_space_has_no_box() {
    let space = shapespace::Space::new("empty");
    assert!(space.has_no_children());
    assert_eq!(space.node_count(), 1);
    let err = space.get(space.root()).bounding_box().unwrap_err();
    assert!(matches!(err, SpaceError::DegenerateBox(_)));
    assert_eq!(space.preload_all_possible().unwrap().boxes, 0);
}
