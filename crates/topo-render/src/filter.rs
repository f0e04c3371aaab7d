//! Removal of nodes that carry no connectivity.

use std::collections::HashSet;

use topo_report::{EdgeMetadata, Report};

use crate::node::RenderableNodes;
use crate::renderer::Renderer;

/// Drops unconnected nodes from an inner renderer's output.
pub struct FilterUnconnected {
    renderer: Box<dyn Renderer>,
}

impl FilterUnconnected {
    pub fn new<R: Renderer + 'static>(renderer: R) -> Self {
        Self {
            renderer: Box::new(renderer),
        }
    }
}

impl Renderer for FilterUnconnected {
    #[tracing::instrument(skip_all)]
    fn render(&self, report: &Report) -> RenderableNodes {
        only_connected(self.renderer.render(report))
    }

    fn edge_metadata(&self, report: &Report, local_id: &str, remote_id: &str) -> EdgeMetadata {
        self.renderer.edge_metadata(report, local_id, remote_id)
    }
}

/// Keep nodes with outgoing adjacency, plus the nodes they point at.
///
/// One hop only: a kept target's own targets are not pulled in unless they
/// qualify by themselves.
pub fn only_connected(input: RenderableNodes) -> RenderableNodes {
    let mut keep: HashSet<String> = HashSet::new();
    for (id, node) in input.iter() {
        if node.adjacency.is_empty() {
            continue;
        }
        keep.insert(id.to_string());
        keep.extend(
            node.adjacency
                .iter()
                .filter(|target| input.contains(target))
                .map(str::to_string),
        );
    }

    let before = input.len();
    let output: RenderableNodes = input
        .into_iter()
        .filter(|(id, _)| keep.contains(id))
        .map(|(_, node)| node)
        .collect();
    tracing::trace!(before, after = output.len(), "filtered unconnected nodes");
    output
}
