//! Building a space from a list of subjects.

use super::{NodeId, Space, train_test_split};
use crate::config::SpaceConfig;
use crate::errors::SpaceError;
use crate::float_types::Real;
use crate::io::{AssetLoader, FileLoader};
use crate::repr::SourceKind;
use std::collections::HashSet;
use std::path::Path;

pub const DEFAULT_GROUP: &str = "default";
pub const TRAIN_GROUP: &str = "train";
pub const TEST_GROUP: &str = "test";

/// Name of the mesh source under every subject.
pub const MESH_SOURCE: &str = "mesh";
/// Name of the field source under every subject.
pub const FIELD_SOURCE: &str = "sdt";

/// Build a space reading assets from disk with the default configuration.
///
/// See [`load_data_with`].
pub fn load_data<S, M, F>(
    names: &[S],
    mesh_paths: &[M],
    sdt_paths: &[F],
    test_size: Option<Real>,
) -> Result<Space, SpaceError>
where
    S: AsRef<str>,
    M: AsRef<Path>,
    F: AsRef<Path>,
{
    load_data_with(
        SpaceConfig::default(),
        Box::new(FileLoader),
        names,
        mesh_paths,
        sdt_paths,
        test_size,
    )
}

/// Build a space with one object per name, each holding a [`MESH_SOURCE`]
/// and a [`FIELD_SOURCE`].
///
/// Without `test_size` every object lands in the [`DEFAULT_GROUP`]. With it
/// the objects are split by [`train_test_split`] (seeded with
/// [`SpaceConfig::split_seed`]) into [`TRAIN_GROUP`] and [`TEST_GROUP`].
/// Nothing is loaded yet.
pub fn load_data_with<S, M, F>(
    config: SpaceConfig,
    loader: Box<dyn AssetLoader>,
    names: &[S],
    mesh_paths: &[M],
    sdt_paths: &[F],
    test_size: Option<Real>,
) -> Result<Space, SpaceError>
where
    S: AsRef<str>,
    M: AsRef<Path>,
    F: AsRef<Path>,
{
    if names.len() != mesh_paths.len() || names.len() != sdt_paths.len() {
        return Err(SpaceError::InvalidManifest(format!(
            "{} names, {} mesh paths and {} field paths",
            names.len(),
            mesh_paths.len(),
            sdt_paths.len()
        )));
    }
    let mut seen = HashSet::new();
    if let Some(dup) = names.iter().map(|n| n.as_ref()).find(|n| !seen.insert(*n)) {
        return Err(SpaceError::InvalidManifest(format!("subject `{dup}` is listed twice")));
    }

    let split_seed = config.split_seed;
    let mut space = Space::with_config("space", config).with_loader(loader);
    let root = space.root();

    let groups: Vec<(NodeId, Vec<usize>)> = match test_size {
        None => vec![(space.add_group(root, DEFAULT_GROUP)?, (0..names.len()).collect())],
        Some(size) => {
            let (train, test) = train_test_split(names, split_seed, size)?;
            vec![
                (space.add_group(root, TRAIN_GROUP)?, train),
                (space.add_group(root, TEST_GROUP)?, test),
            ]
        },
    };

    for (group, members) in groups {
        for i in members {
            let object = space.add_object(group, names[i].as_ref()).map_err(|err| {
                SpaceError::InvalidManifest(format!("subject `{}`: {err}", names[i].as_ref()))
            })?;
            space.add_source(object, MESH_SOURCE, SourceKind::Mesh, mesh_paths[i].as_ref())?;
            space.add_source(object, FIELD_SOURCE, SourceKind::Field, sdt_paths[i].as_ref())?;
        }
    }

    tracing::info!(
        subjects = names.len(),
        split = test_size.is_some(),
        "built space from manifest"
    );
    Ok(space)
}
