//! The hierarchical space model.
//!
//! A [`Space`] is an arena of nodes addressed by [`NodeId`]. Ownership flows
//! from the root to the leaves; parents are stored as indices. The tree is
//! built once and is read-only afterwards, except for two kinds of
//! single-assignment caches: the representation of every source, and the
//! bounding box of every node. Both are filled on first use (or eagerly by
//! [`Space::preload_all_possible`]) and never change afterwards.
//!
//! Concurrent *first* access to a source is outside of the contract: call
//! [`Space::preload_all_possible`] before sharing a space between threads.

mod manifest;
mod node;
mod preload;
mod resolve;
mod source;
mod split;

pub use manifest::{
    DEFAULT_GROUP, FIELD_SOURCE, MESH_SOURCE, TEST_GROUP, TRAIN_GROUP, load_data, load_data_with,
};
pub use node::NodeRef;
pub use preload::PreloadSummary;
pub use resolve::{BoundMethod, Method, MethodCall, MethodOutput, Resolved};
pub use source::Source;
pub use split::train_test_split;

use crate::aabb;
use crate::config::SpaceConfig;
use crate::errors::SpaceError;
use crate::float_types::parry3d::bounding_volume::Aabb;
use crate::io::{AssetLoader, FileLoader};
use crate::repr::SourceKind;
use crate::traits::GeometricNode;
use std::fmt;
use std::path::PathBuf;
use std::sync::OnceLock;

/// Name of the representation child every source carries.
pub const REPRESENTATION_NAME: &str = "repr";

/// Handle of a node inside its [`Space`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// What a node stands for.
#[derive(Debug)]
pub enum NodeKind {
    /// The unique root.
    Space,
    /// A named partition such as `default`, `train` or `test`.
    Group,
    /// One subject.
    Object,
    /// A lazy reference to one asset file.
    Source(Source),
    /// The geometry materialized from the parent source.
    Representation,
}

impl NodeKind {
    pub const fn label(&self) -> &'static str {
        match self {
            NodeKind::Space => "space",
            NodeKind::Group => "group",
            NodeKind::Object => "object",
            NodeKind::Source(_) => "source",
            NodeKind::Representation => "representation",
        }
    }
}

/// One element of the tree.
#[derive(Debug)]
pub struct Node {
    name: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: NodeKind,
    bbox: OnceLock<Aabb>,
}

impl Node {
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[inline]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    #[inline]
    pub const fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// The cached bounding box, if it has been computed.
    #[inline]
    pub fn cached_bbox(&self) -> Option<&Aabb> {
        self.bbox.get()
    }
}

/// An addressable tree of groups, objects and lazily loaded sources.
pub struct Space {
    nodes: Vec<Node>,
    config: SpaceConfig,
    loader: Box<dyn AssetLoader>,
}

impl fmt::Debug for Space {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Space")
            .field("nodes", &self.nodes.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Space {
    /// An empty space whose root is called `name`, reading assets from disk.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(name, SpaceConfig::default())
    }

    pub fn with_config(name: impl Into<String>, config: SpaceConfig) -> Self {
        let root = Node {
            name: name.into(),
            parent: None,
            children: Vec::new(),
            kind: NodeKind::Space,
            bbox: OnceLock::new(),
        };
        Self {
            nodes: vec![root],
            config,
            loader: Box::new(FileLoader),
        }
    }

    /// Replace the asset loader used by sources that are not loaded yet.
    pub fn with_loader(mut self, loader: Box<dyn AssetLoader>) -> Self {
        self.loader = loader;
        self
    }

    #[inline]
    pub const fn root(&self) -> NodeId {
        NodeId(0)
    }

    #[inline]
    pub const fn config(&self) -> &SpaceConfig {
        &self.config
    }

    /// Number of nodes, root and representations included.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Whether nothing has been added below the root.
    #[inline]
    pub fn has_no_children(&self) -> bool {
        self.node(self.root()).children.is_empty()
    }

    /// The node behind `id`.
    ///
    /// # Panics
    /// If `id` was issued by another space.
    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// A handle exposing the sampling contract of `id`.
    #[inline]
    pub fn get(&self, id: NodeId) -> NodeRef<'_> {
        NodeRef::new(self, id)
    }

    #[inline]
    pub fn is_root(&self, id: NodeId) -> bool {
        self.node(id).parent.is_none()
    }

    pub fn find_child(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.node(parent)
            .children
            .iter()
            .copied()
            .find(|&c| self.node(c).name == name)
    }

    /// Slash-separated names from below the root down to `id`; empty for the
    /// root itself.
    pub fn path_of(&self, id: NodeId) -> String {
        let mut names = Vec::new();
        let mut cur = id;
        while let Some(parent) = self.node(cur).parent {
            names.push(self.node(cur).name.as_str());
            cur = parent;
        }
        names.reverse();
        names.join("/")
    }

    /// `id` followed by all of its descendants, parents before children.
    pub fn pre_order(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            out.push(cur);
            stack.extend(self.node(cur).children.iter().rev().copied());
        }
        out
    }

    /// All descendants of `id` followed by `id`, children before parents.
    pub fn post_order(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = self.pre_order(id);
        out.reverse();
        out
    }

    pub fn add_group(&mut self, parent: NodeId, name: impl Into<String>) -> Result<NodeId, SpaceError> {
        self.push_node(parent, name.into(), NodeKind::Group)
    }

    pub fn add_object(&mut self, parent: NodeId, name: impl Into<String>) -> Result<NodeId, SpaceError> {
        self.push_node(parent, name.into(), NodeKind::Object)
    }

    /// Attach a lazy source and its representation child.
    pub fn add_source(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        kind: SourceKind,
        path: impl Into<PathBuf>,
    ) -> Result<NodeId, SpaceError> {
        let id = self.push_node(parent, name.into(), NodeKind::Source(Source::new(kind, path.into())))?;
        self.push_node(id, REPRESENTATION_NAME.to_string(), NodeKind::Representation)?;
        Ok(id)
    }

    fn push_node(&mut self, parent: NodeId, name: String, kind: NodeKind) -> Result<NodeId, SpaceError> {
        if parent.0 >= self.nodes.len() {
            return Err(SpaceError::invalid(format!("unknown parent node {}", parent.0)));
        }
        if name.is_empty() || name.contains('/') {
            return Err(SpaceError::invalid(format!("`{name}` is not a valid node name")));
        }
        let parent_kind = &self.node(parent).kind;
        let allowed = match (&kind, parent_kind) {
            (NodeKind::Representation, NodeKind::Source(_)) => {
                self.node(parent).children.is_empty()
            },
            (_, NodeKind::Source(_) | NodeKind::Representation) => false,
            (NodeKind::Space, _) => false,
            _ => true,
        };
        if !allowed {
            return Err(SpaceError::invalid(format!(
                "a {} cannot be placed under the {} `{}`",
                kind.label(),
                parent_kind.label(),
                self.path_of(parent)
            )));
        }
        if self.find_child(parent, &name).is_some() {
            return Err(SpaceError::invalid(format!(
                "`{}` already has a child named `{name}`",
                self.path_of(parent)
            )));
        }

        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            name,
            parent: Some(parent),
            children: Vec::new(),
            kind,
            bbox: OnceLock::new(),
        });
        self.nodes[parent.0].children.push(id);
        self.invalidate_path_to_root(parent);
        Ok(id)
    }

    /// Adding a node changes the union of every ancestor.
    fn invalidate_path_to_root(&mut self, id: NodeId) {
        let mut cur = Some(id);
        while let Some(c) = cur {
            let node = &mut self.nodes[c.0];
            node.bbox.take();
            cur = node.parent;
        }
    }

    /// Drop every cached bounding box; loaded representations stay cached.
    pub fn invalidate_bounding_boxes(&mut self) {
        for node in &mut self.nodes {
            node.bbox.take();
        }
    }

    /// The source behind `id`: the node itself, or the parent of a
    /// representation node.
    pub fn source_of(&self, id: NodeId) -> Option<(NodeId, &Source)> {
        let node = self.node(id);
        let sid = match node.kind {
            NodeKind::Source(_) => id,
            NodeKind::Representation => node.parent?,
            _ => return None,
        };
        match &self.node(sid).kind {
            NodeKind::Source(source) => Some((sid, source)),
            _ => None,
        }
    }

    /// Whether a source sits at or below `id`.
    pub fn has_geometry(&self, id: NodeId) -> bool {
        self.pre_order(id)
            .into_iter()
            .any(|n| matches!(self.node(n).kind, NodeKind::Source(_)))
    }

    /// Bounding box of `id`, computed on first use and cached.
    ///
    /// Sources and representations answer with the box of their geometry,
    /// loading it if needed; every other node answers with the union of the
    /// children that carry geometry. Any failure below `id` is returned and
    /// nothing is cached for `id`.
    pub fn bounding_box(&self, id: NodeId) -> Result<Aabb, SpaceError> {
        let node = self.node(id);
        if let Some(bbox) = node.bbox.get() {
            return Ok(*bbox);
        }

        let bbox = match node.kind {
            NodeKind::Source(_) | NodeKind::Representation => {
                self.representation(id)?.bounding_box()?
            },
            _ => {
                let boxes = node
                    .children
                    .iter()
                    .filter(|&&c| self.has_geometry(c))
                    .map(|&c| self.bounding_box(c))
                    .collect::<Result<Vec<_>, _>>()?;
                aabb::union(boxes).ok_or_else(|| {
                    SpaceError::degenerate(format!(
                        "`{}` has no geometry below it",
                        self.display_path(id)
                    ))
                })?
            },
        };

        tracing::debug!(node = %self.display_path(id), mins = ?bbox.mins, maxs = ?bbox.maxs, "bounding box");
        Ok(*node.bbox.get_or_init(|| bbox))
    }

    /// [`path_of`](Self::path_of), with the root rendered by its name.
    pub(crate) fn display_path(&self, id: NodeId) -> String {
        if self.is_root(id) {
            self.node(id).name.clone()
        } else {
            self.path_of(id)
        }
    }

    /// Render the tree, one node per line.
    pub fn explore(&self) -> String {
        let mut out = String::new();
        self.explore_into(self.root(), "", "", &mut out);
        out
    }

    fn explore_into(&self, id: NodeId, lead: &str, child_lead: &str, out: &mut String) {
        let node = self.node(id);
        let detail = match &node.kind {
            NodeKind::Source(source) => format!(
                "{} source: {}{}",
                source.kind(),
                source.path().display(),
                if source.is_loaded() { " [loaded]" } else { "" }
            ),
            kind => kind.label().to_string(),
        };
        out.push_str(&format!("{lead}{} ({detail})\n", node.name));

        let last = node.children.len().saturating_sub(1);
        for (pos, &child) in node.children.iter().enumerate() {
            let (branch, cont) = if pos == last { ("└── ", "    ") } else { ("├── ", "│   ") };
            self.explore_into(
                child,
                &format!("{child_lead}{branch}"),
                &format!("{child_lead}{cont}"),
                out,
            );
        }
    }
}

impl fmt::Display for Space {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.explore())
    }
}
