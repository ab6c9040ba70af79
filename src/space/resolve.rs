//! Path addressing: `"default/subject/mesh/repr/sampling_grid"` style queries.

use super::{NodeId, NodeKind, NodeRef, Space};
use crate::errors::SpaceError;
use crate::float_types::Real;
use crate::lattice::{PointGrid, ScalarGrid};
use crate::repr::{PointColor, SourceKind};
use crate::traits::GeometricNode;
use nalgebra::Point3;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// A terminal path segment naming a query instead of a child.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    SamplingGrid,
    SamplingEachN,
    SamplingUniform,
    SamplingGridWithShackle,
    SaveMesh,
    Xyz2LocalSdt,
    PointColor,
}

impl Method {
    pub const ALL: [Method; 7] = [
        Method::SamplingGrid,
        Method::SamplingEachN,
        Method::SamplingUniform,
        Method::SamplingGridWithShackle,
        Method::SaveMesh,
        Method::Xyz2LocalSdt,
        Method::PointColor,
    ];

    pub fn from_segment(segment: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.segment() == segment)
    }

    /// The path segment addressing this method.
    pub const fn segment(self) -> &'static str {
        match self {
            Method::SamplingGrid => "sampling_grid",
            Method::SamplingEachN => "sampling_eachN",
            Method::SamplingUniform => "sampling_uniform",
            Method::SamplingGridWithShackle => "sampling_grid_with_shackle",
            Method::SaveMesh => "save_mesh",
            Method::Xyz2LocalSdt => "xyz2local_sdt",
            Method::PointColor => "point_color",
        }
    }

    /// Box-scoped samplers are answered by every node; the rest need a
    /// source of the matching kind.
    fn supported_by(self, space: &Space, id: NodeId) -> bool {
        let source_kind = space.source_of(id).map(|(_, source)| source.kind());
        match self {
            Method::SamplingGrid | Method::SamplingUniform | Method::SamplingGridWithShackle => true,
            Method::SamplingEachN | Method::SaveMesh | Method::PointColor => {
                source_kind == Some(SourceKind::Mesh)
            },
            Method::Xyz2LocalSdt => source_kind == Some(SourceKind::Field),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.segment())
    }
}

/// Arguments of a [`BoundMethod`] call, one variant per [`Method`].
#[derive(Clone, Debug)]
pub enum MethodCall<'c> {
    SamplingGrid {
        spacing: [usize; 3],
    },
    SamplingEachN {
        count: usize,
        step: usize,
        shift: usize,
    },
    SamplingUniform {
        seed: u64,
        count: usize,
    },
    SamplingGridWithShackle {
        seed: u64,
        spacing: [usize; 3],
        sigma: Real,
    },
    SaveMesh {
        path: &'c Path,
        arrays: &'c BTreeMap<String, Vec<Real>>,
    },
    Xyz2LocalSdt {
        center: Point3<Real>,
        spacing: [usize; 3],
        scale: Real,
    },
    PointColor,
}

impl MethodCall<'_> {
    pub const fn method(&self) -> Method {
        match self {
            MethodCall::SamplingGrid { .. } => Method::SamplingGrid,
            MethodCall::SamplingEachN { .. } => Method::SamplingEachN,
            MethodCall::SamplingUniform { .. } => Method::SamplingUniform,
            MethodCall::SamplingGridWithShackle { .. } => Method::SamplingGridWithShackle,
            MethodCall::SaveMesh { .. } => Method::SaveMesh,
            MethodCall::Xyz2LocalSdt { .. } => Method::Xyz2LocalSdt,
            MethodCall::PointColor => Method::PointColor,
        }
    }
}

/// Result of a [`BoundMethod`] call.
#[derive(Clone, Debug)]
pub enum MethodOutput {
    Grid(PointGrid),
    Indexed {
        indices: Vec<usize>,
        points: Vec<Point3<Real>>,
    },
    Points(Vec<Point3<Real>>),
    Saved,
    LocalSdt {
        local: PointGrid,
        sdt: ScalarGrid,
    },
    PointColor(PointColor),
}

impl MethodOutput {
    pub fn into_grid(self) -> Option<PointGrid> {
        match self {
            MethodOutput::Grid(grid) => Some(grid),
            _ => None,
        }
    }

    pub fn into_points(self) -> Option<Vec<Point3<Real>>> {
        match self {
            MethodOutput::Points(points) | MethodOutput::Indexed { points, .. } => Some(points),
            _ => None,
        }
    }
}

/// A method bound to the node it was addressed on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundMethod<'a> {
    node: NodeRef<'a>,
    method: Method,
}

impl<'a> BoundMethod<'a> {
    #[inline]
    pub const fn node(&self) -> NodeRef<'a> {
        self.node
    }

    #[inline]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Run the method; `call` must carry the arguments of the bound method.
    pub fn call(&self, call: MethodCall<'_>) -> Result<MethodOutput, SpaceError> {
        if call.method() != self.method {
            return Err(SpaceError::invalid(format!(
                "`{}` is bound to {}, called with arguments of {}",
                self.node.space().display_path(self.node.id()),
                self.method,
                call.method()
            )));
        }

        let node = &self.node;
        let out = match call {
            MethodCall::SamplingGrid { spacing } => MethodOutput::Grid(node.sampling_grid(spacing)?),
            MethodCall::SamplingEachN { count, step, shift } => {
                let (indices, points) = node.sampling_each_n(count, step, shift)?;
                MethodOutput::Indexed { indices, points }
            },
            MethodCall::SamplingUniform { seed, count } => {
                MethodOutput::Points(node.sampling_uniform(seed, count)?)
            },
            MethodCall::SamplingGridWithShackle { seed, spacing, sigma } => {
                MethodOutput::Grid(node.sampling_grid_with_shackle(seed, spacing, sigma)?)
            },
            MethodCall::SaveMesh { path, arrays } => {
                node.save_mesh(path, arrays)?;
                MethodOutput::Saved
            },
            MethodCall::Xyz2LocalSdt {
                center,
                spacing,
                scale,
            } => {
                let (local, sdt) = node.xyz2local_sdt(&center, spacing, scale)?;
                MethodOutput::LocalSdt { local, sdt }
            },
            MethodCall::PointColor => MethodOutput::PointColor(node.point_color()?),
        };
        Ok(out)
    }
}

/// What a path names: a node, or a method bound to a node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Resolved<'a> {
    Node(NodeRef<'a>),
    Method(BoundMethod<'a>),
}

impl<'a> Resolved<'a> {
    pub fn into_node(self) -> Result<NodeRef<'a>, SpaceError> {
        match self {
            Resolved::Node(node) => Ok(node),
            Resolved::Method(bound) => Err(SpaceError::NotFound {
                path: format!(
                    "{}/{} (a method, not a node)",
                    bound.node.space().display_path(bound.node.id()),
                    bound.method
                ),
            }),
        }
    }

    pub fn into_method(self) -> Result<BoundMethod<'a>, SpaceError> {
        match self {
            Resolved::Method(bound) => Ok(bound),
            Resolved::Node(node) => Err(SpaceError::NotFound {
                path: format!("{} (a node, not a method)", node.space().display_path(node.id())),
            }),
        }
    }
}

impl Space {
    /// Resolve `path` from the root.
    pub fn resolve(&self, path: &str) -> Result<Resolved<'_>, SpaceError> {
        self.resolve_from(self.root(), path)
    }

    /// Resolve `path` from the root and insist on a node.
    pub fn node_at(&self, path: &str) -> Result<NodeRef<'_>, SpaceError> {
        self.resolve(path)?.into_node()
    }

    /// Resolve the `/`-separated `path` relative to `start`.
    ///
    /// Each segment names a child; the last one may instead name a [`Method`]
    /// supported by the node reached so far (children win on a name clash).
    /// When the first segment names neither a child nor a method of `start`,
    /// the whole path is retried below every group child of `start`, so the
    /// `default/` prefix may be omitted. More than one match is
    /// [`SpaceError::Ambiguous`].
    pub fn resolve_from(&self, start: NodeId, path: &str) -> Result<Resolved<'_>, SpaceError> {
        let tokens: Vec<&str> = path.split('/').filter(|t| !t.is_empty()).collect();
        let Some(&first) = tokens.first() else {
            return Ok(Resolved::Node(self.get(start)));
        };

        let direct = self.find_child(start, first).is_some()
            || (tokens.len() == 1 && Method::from_segment(first).is_some_and(|m| m.supported_by(self, start)));
        if direct {
            return self.walk(start, &tokens).ok_or_else(|| self.not_found(start, path));
        }

        let hits: Vec<Resolved<'_>> = self
            .node(start)
            .children()
            .iter()
            .filter(|&&c| matches!(self.node(c).kind(), NodeKind::Group))
            .filter_map(|&group| self.walk(group, &tokens))
            .collect();

        match hits.as_slice() {
            [] => Err(self.not_found(start, path)),
            [hit] => Ok(*hit),
            _ => Err(SpaceError::Ambiguous {
                path: path.to_string(),
                candidates: hits.iter().map(|hit| self.describe(hit)).collect(),
            }),
        }
    }

    /// Plain walk without the group fallback.
    fn walk(&self, start: NodeId, tokens: &[&str]) -> Option<Resolved<'_>> {
        let mut cur = start;
        for (pos, token) in tokens.iter().enumerate() {
            if let Some(child) = self.find_child(cur, token) {
                cur = child;
                continue;
            }
            let method = Method::from_segment(token).filter(|m| m.supported_by(self, cur))?;
            if pos + 1 != tokens.len() {
                return None;
            }
            return Some(Resolved::Method(BoundMethod {
                node: self.get(cur),
                method,
            }));
        }
        Some(Resolved::Node(self.get(cur)))
    }

    fn not_found(&self, start: NodeId, path: &str) -> SpaceError {
        let path = if self.is_root(start) {
            path.to_string()
        } else {
            format!("{}/{path}", self.path_of(start))
        };
        SpaceError::NotFound { path }
    }

    fn describe(&self, resolved: &Resolved<'_>) -> String {
        match resolved {
            Resolved::Node(node) => self.path_of(node.id()),
            Resolved::Method(bound) => format!("{}/{}", self.path_of(bound.node.id()), bound.method),
        }
    }
}
