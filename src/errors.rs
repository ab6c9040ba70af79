//! Errors raised while building, addressing, loading and sampling a [`Space`](crate::space::Space)

use crate::io::IoError;

/// All the possible failures of the space model
#[derive(Debug, thiserror::Error)]
pub enum SpaceError {
    /// (NotFound) The path resolves to no node or method
    #[error("(NotFound) nothing matches `{path}`")]
    NotFound { path: String },

    /// (Ambiguous) A shortened path matches under more than one group
    #[error("(Ambiguous) `{path}` matches under several groups: {candidates:?}")]
    Ambiguous {
        path: String,
        candidates: Vec<String>,
    },

    /// (LoadFailure) An asset is missing or corrupt
    #[error("(LoadFailure) cannot load `{node}` from {asset}")]
    LoadFailure {
        node: String,
        asset: String,
        #[source]
        source: IoError,
    },

    /// (Export) Writing a representation to disk failed
    #[error("(Export) cannot write `{path}`")]
    Export {
        path: String,
        #[source]
        source: IoError,
    },

    /// (ShapeMismatch) An array length disagrees with the expected count
    #[error("(ShapeMismatch) `{name}` has {found} entries, expected {expected}")]
    ShapeMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    /// (DegenerateBox) A box cannot be used for the requested operation
    #[error("(DegenerateBox) {0}")]
    DegenerateBox(String),

    /// (InvalidArgument) An argument is outside of its domain
    #[error("(InvalidArgument) {0}")]
    InvalidArgument(String),

    /// (InvalidManifest) The name/mesh/field lists do not line up
    #[error("(InvalidManifest) {0}")]
    InvalidManifest(String),

    /// (Preload) One or more branches failed to materialize
    #[error("(Preload) {} branch(es) failed, first: {}", .failures.len(), first_failure(.failures))]
    Preload { failures: Vec<(String, SpaceError)> },
}

fn first_failure(failures: &[(String, SpaceError)]) -> String {
    failures
        .first()
        .map(|(path, err)| format!("{path}: {err}"))
        .unwrap_or_default()
}

impl SpaceError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub(crate) fn degenerate(msg: impl Into<String>) -> Self {
        Self::DegenerateBox(msg.into())
    }
}
