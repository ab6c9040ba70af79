use super::{NodeId, NodeKind, Space};
use crate::errors::SpaceError;

/// Counts reported by a successful [`Space::preload_all_possible`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PreloadSummary {
    /// Sources whose representation is loaded.
    pub sources: usize,
    /// Nodes whose bounding box is cached.
    pub boxes: usize,
}

impl Space {
    /// Load every source, then compute every bounding box bottom-up.
    ///
    /// A failing source taints its ancestors: their boxes are left
    /// uncomputed, while sibling branches are loaded and boxed as usual.
    /// Every failure is collected into [`SpaceError::Preload`].
    ///
    /// Calling this before sharing the space between threads makes every
    /// later access read-only.
    pub fn preload_all_possible(&self) -> Result<PreloadSummary, SpaceError> {
        let mut summary = PreloadSummary::default();
        let mut failures = Vec::new();
        let mut tainted = vec![false; self.node_count()];

        for id in self.pre_order(self.root()) {
            if !matches!(self.node(id).kind(), NodeKind::Source(_)) {
                continue;
            }
            match self.representation(id) {
                Ok(_) => summary.sources += 1,
                Err(err) => {
                    tracing::warn!(node = %self.display_path(id), error = %err, "source failed to load");
                    self.taint(id, &mut tainted);
                    failures.push((self.display_path(id), err));
                },
            }
        }

        // children come before parents, so every union reads cached boxes
        for id in self.post_order(self.root()) {
            if tainted[id.index()] || !self.has_geometry(id) {
                continue;
            }
            match self.bounding_box(id) {
                Ok(_) => summary.boxes += 1,
                Err(err) => {
                    tracing::warn!(node = %self.display_path(id), error = %err, "bounding box failed");
                    self.taint(id, &mut tainted);
                    failures.push((self.display_path(id), err));
                },
            }
        }

        if !failures.is_empty() {
            return Err(SpaceError::Preload { failures });
        }
        tracing::info!(sources = summary.sources, boxes = summary.boxes, "preload complete");
        Ok(summary)
    }

    fn taint(&self, id: NodeId, tainted: &mut [bool]) {
        let mut cur = Some(id);
        while let Some(c) = cur {
            tainted[c.index()] = true;
            cur = self.node(c).parent();
        }
    }
}
