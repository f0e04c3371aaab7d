//! Extraction of renderable nodes straight from a raw topology.

use std::collections::HashMap;
use std::sync::Arc;

use topo_report::{
    EdgeMetadata, Networks, NodeMetadata, Report, THE_INTERNET, Topology, TopologySelector, keys,
    make_edge_id, parse_adjacency_id, parse_edge_id,
};

use crate::diagnostics::{DiagnosticSink, TracingSink};
use crate::node::{RenderableNode, RenderableNodes};
use crate::renderer::{LeafMapFunc, PseudoFunc, Renderer};

/// Renders one topology view of a report.
///
/// Raw nodes are classified by the mapper; raw nodes mapping to the same ID
/// are merged. Edge endpoints the mapper does not know about become pseudo
/// nodes, when the pseudo function agrees to make one.
pub struct LeafMap {
    selector: TopologySelector,
    mapper: LeafMapFunc,
    pseudo: PseudoFunc,
    sink: Arc<dyn DiagnosticSink>,
}

impl LeafMap {
    pub fn new<M, P>(selector: TopologySelector, mapper: M, pseudo: P) -> Self
    where
        M: Fn(&NodeMetadata) -> Option<RenderableNode> + Send + Sync + 'static,
        P: Fn(&str, &str, bool, &Networks) -> Option<RenderableNode> + Send + Sync + 'static,
    {
        Self {
            selector,
            mapper: Arc::new(mapper),
            pseudo: Arc::new(pseudo),
            sink: Arc::new(TracingSink),
        }
    }

    /// Route malformed-ID reports to `sink` instead of `tracing`.
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Create (or merge) the pseudo node for `src`; returns its ID.
    fn make_pseudo_node(
        &self,
        nodes: &mut RenderableNodes,
        src: &str,
        dst: &str,
        src_is_client: bool,
        local_networks: &Networks,
    ) -> Option<String> {
        let mut pseudo = (self.pseudo)(src, dst, src_is_client, local_networks)?;
        pseudo.origins.add(src);
        let id = pseudo.id.clone();
        nodes.merge_node(pseudo);
        Some(id)
    }

    /// Rendered ID of a raw node, computed through the mapper.
    fn mapped_id(&self, topology: &Topology, raw_id: &str) -> Option<String> {
        if raw_id == THE_INTERNET {
            return Some(raw_id.to_string());
        }
        let metadata = topology.node_metadatas.get(raw_id)?;
        (self.mapper)(metadata).map(|node| node.id)
    }
}

impl Renderer for LeafMap {
    #[tracing::instrument(skip_all)]
    fn render(&self, report: &Report) -> RenderableNodes {
        let topology = (self.selector)(report);
        let local_networks = report.local_networks(|e| {
            self.sink.report(&e.with_operation("render::LeafMap::render"));
        });
        let mut nodes = RenderableNodes::new();

        // raw node ID -> rendered node ID; several raw nodes may share one.
        let mut source2mapped: HashMap<&str, String> = HashMap::new();
        for (node_id, metadata) in &topology.node_metadatas {
            let Some(mut mapped) = (self.mapper)(metadata) else {
                continue;
            };
            mapped.origins.add(node_id.as_str());
            if let Some(host_node_id) = metadata.get(keys::HOST_NODE_ID) {
                mapped.origins.add(host_node_id);
            }
            source2mapped.insert(node_id, mapped.id.clone());
            nodes.merge_node(mapped);
        }

        for (adjacency_id, dsts) in &topology.adjacency {
            let src_node_id = match parse_adjacency_id(adjacency_id) {
                Ok(id) => id,
                Err(e) => {
                    self.sink.report(&e.with_operation("render::LeafMap::render"));
                    continue;
                }
            };

            let src_render_id = match source2mapped.get(src_node_id) {
                Some(id) => id.clone(),
                None => {
                    let known_dst = dsts
                        .iter()
                        .find(|dst| source2mapped.contains_key(dst))
                        .unwrap_or("");
                    match self.make_pseudo_node(
                        &mut nodes,
                        src_node_id,
                        known_dst,
                        true,
                        &local_networks,
                    ) {
                        Some(id) => id,
                        None => continue,
                    }
                }
            };

            for dst_node_id in dsts.iter() {
                let dst_render_id = match source2mapped.get(dst_node_id) {
                    Some(id) => id.clone(),
                    None => match self.make_pseudo_node(
                        &mut nodes,
                        dst_node_id,
                        src_node_id,
                        false,
                        &local_networks,
                    ) {
                        Some(id) => id,
                        None => continue,
                    },
                };

                // Raw nodes collapsing onto one rendered node do not link it
                // to itself; a raw self-link does.
                if (dst_render_id != src_render_id || dst_node_id == src_node_id)
                    && let Some(src_node) = nodes.get_mut(&src_render_id)
                {
                    src_node.adjacency.add(dst_render_id.as_str());
                }

                // Metrics land on both ends unchanged; ingress/egress is not
                // swapped for the destination side.
                let Some(edge_metadata) = topology
                    .edge_metadatas
                    .get(&make_edge_id(src_node_id, dst_node_id))
                else {
                    continue;
                };
                if let Some(src_node) = nodes.get_mut(&src_render_id) {
                    src_node.edge_metadata = src_node.edge_metadata.merge(*edge_metadata);
                }
                if dst_render_id != src_render_id
                    && let Some(dst_node) = nodes.get_mut(&dst_render_id)
                {
                    dst_node.edge_metadata = dst_node.edge_metadata.merge(*edge_metadata);
                }
            }
        }

        tracing::debug!(nodes = nodes.len(), "leaf map rendered");
        nodes
    }

    fn edge_metadata(&self, report: &Report, src_id: &str, dst_id: &str) -> EdgeMetadata {
        let topology = (self.selector)(report);
        let mut metadata = EdgeMetadata::default();
        for (edge_id, edge_metadata) in &topology.edge_metadatas {
            let (src, dst) = match parse_edge_id(edge_id) {
                Ok(pair) => pair,
                Err(e) => {
                    self.sink
                        .report(&e.with_operation("render::LeafMap::edge_metadata"));
                    continue;
                }
            };
            let (Some(src), Some(dst)) = (
                self.mapped_id(topology, src),
                self.mapped_id(topology, dst),
            ) else {
                continue;
            };
            if src == src_id && dst == dst_id {
                metadata = metadata.flatten(*edge_metadata);
            }
        }
        metadata
    }
}
