//! The renderer abstraction and the function types injected into renderers.

use std::sync::Arc;

use topo_report::{EdgeMetadata, Networks, NodeMetadata, Report};

use crate::node::RenderableNodes;

/// Something that can render a report into a set of renderable nodes.
///
/// Both operations are total: input that cannot be interpreted is dropped,
/// never turned into an error. Implementations are pure; every call starts
/// from the report and keeps no state between calls.
pub trait Renderer: Send + Sync {
    fn render(&self, report: &Report) -> RenderableNodes;

    /// Metrics of the edge `local_id -> remote_id` between two rendered nodes.
    ///
    /// Returns empty metadata when no such edge exists.
    fn edge_metadata(&self, report: &Report, local_id: &str, remote_id: &str) -> EdgeMetadata;
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn render(&self, report: &Report) -> RenderableNodes {
        (**self).render(report)
    }

    fn edge_metadata(&self, report: &Report, local_id: &str, remote_id: &str) -> EdgeMetadata {
        (**self).edge_metadata(report, local_id, remote_id)
    }
}

impl<R: Renderer + ?Sized> Renderer for Arc<R> {
    fn render(&self, report: &Report) -> RenderableNodes {
        (**self).render(report)
    }

    fn edge_metadata(&self, report: &Report, local_id: &str, remote_id: &str) -> EdgeMetadata {
        (**self).edge_metadata(report, local_id, remote_id)
    }
}

/// Classifies one raw node; `None` drops it.
pub type LeafMapFunc =
    Arc<dyn Fn(&NodeMetadata) -> Option<crate::RenderableNode> + Send + Sync>;

/// Re-classifies one rendered node; `None` drops it.
pub type MapFunc =
    Arc<dyn Fn(&crate::RenderableNode) -> Option<crate::RenderableNode> + Send + Sync>;

/// Builds a pseudo node for a raw endpoint nobody classified.
///
/// Arguments are `(src, dst, src_is_client, local_networks)`, where `src` is
/// the unclassified raw node and `dst` the raw node on the other end of the
/// edge (empty when none is known).
pub type PseudoFunc =
    Arc<dyn Fn(&str, &str, bool, &Networks) -> Option<crate::RenderableNode> + Send + Sync>;
