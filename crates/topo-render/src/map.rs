//! Re-classification of another renderer's output.

use std::collections::HashMap;
use std::sync::Arc;

use topo_report::{EdgeMetadata, IdList, Report};

use crate::node::{RenderableNode, RenderableNodes};
use crate::renderer::{MapFunc, Renderer};

/// Maps every node rendered by an inner renderer through a transform.
///
/// Nodes transformed onto the same ID are merged, and adjacency is rewritten
/// in terms of the new IDs. No pseudo nodes are made at this level: links to
/// nodes the transform dropped are dropped too, and so are links between
/// nodes that collapse onto the same ID.
pub struct Map {
    map_func: MapFunc,
    renderer: Box<dyn Renderer>,
}

impl Map {
    pub fn new<F, R>(map_func: F, renderer: R) -> Self
    where
        F: Fn(&RenderableNode) -> Option<RenderableNode> + Send + Sync + 'static,
        R: Renderer + 'static,
    {
        Self {
            map_func: Arc::new(map_func),
            renderer: Box::new(renderer),
        }
    }

    /// Render, also returning the input ID -> output ID mapping.
    pub fn render_with_mapping(&self, report: &Report) -> (RenderableNodes, HashMap<String, String>) {
        let input = self.renderer.render(report);
        let mut output = RenderableNodes::new();
        let mut mapped: HashMap<String, String> = HashMap::new();
        // output node ID -> input nodes that collapsed onto it
        let mut collapsed: HashMap<String, Vec<(&str, &RenderableNode)>> = HashMap::new();

        for (in_id, in_node) in input.iter() {
            let Some(mut out_node) = (self.map_func)(in_node) else {
                continue;
            };
            out_node.origins.merge(&in_node.origins);
            let out_id = out_node.id.clone();

            output.merge_node(out_node);
            mapped.insert(in_id.to_string(), out_id.clone());
            collapsed.entry(out_id).or_default().push((in_id, in_node));
        }

        for (out_id, in_nodes) in collapsed {
            let mut out_adjacency = IdList::new();
            for (in_id, in_node) in in_nodes {
                for in_adjacent in in_node.adjacency.iter() {
                    let Some(out_adjacent) = mapped.get(in_adjacent) else {
                        continue;
                    };
                    // A link between two nodes that collapsed together is
                    // dropped; a node's own self-link is kept.
                    if *out_adjacent == out_id && in_adjacent != in_id {
                        continue;
                    }
                    out_adjacency.add(out_adjacent.as_str());
                }
            }
            if let Some(out_node) = output.get_mut(&out_id) {
                out_node.adjacency = out_adjacency;
            }
        }

        tracing::debug!(
            input = input.len(),
            output = output.len(),
            "map rendered"
        );
        (output, mapped)
    }
}

impl Renderer for Map {
    #[tracing::instrument(skip_all)]
    fn render(&self, report: &Report) -> RenderableNodes {
        self.render_with_mapping(report).0
    }

    /// Merges the inner renderer's metrics over every pair of input nodes
    /// that feed `src_id` and `dst_id`. Re-renders the inner pipeline.
    fn edge_metadata(&self, report: &Report, src_id: &str, dst_id: &str) -> EdgeMetadata {
        let (_, mapped) = self.render_with_mapping(report);

        // output ID -> input IDs
        let mut inverted: HashMap<&str, Vec<&str>> = HashMap::new();
        for (in_id, out_id) in &mapped {
            inverted
                .entry(out_id.as_str())
                .or_default()
                .push(in_id.as_str());
        }

        let srcs = inverted.get(src_id).map(Vec::as_slice).unwrap_or_default();
        let dsts = inverted.get(dst_id).map(Vec::as_slice).unwrap_or_default();

        let mut metadata = EdgeMetadata::default();
        for in_src in srcs {
            for in_dst in dsts {
                metadata = metadata.merge(self.renderer.edge_metadata(report, in_src, in_dst));
            }
        }
        metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Renders a fixed node set; edge metrics come from a fixed table.
    struct Static {
        nodes: RenderableNodes,
        edges: Vec<(&'static str, &'static str, EdgeMetadata)>,
    }

    impl Renderer for Static {
        fn render(&self, _report: &Report) -> RenderableNodes {
            self.nodes.clone()
        }

        fn edge_metadata(&self, _report: &Report, src: &str, dst: &str) -> EdgeMetadata {
            self.edges
                .iter()
                .filter(|(s, d, _)| *s == src && *d == dst)
                .fold(EdgeMetadata::default(), |acc, (_, _, md)| acc.merge(*md))
        }
    }

    fn chain() -> Static {
        Static {
            nodes: [
                RenderableNode::new("a", "", "", "").with_adjacent("b").with_origin("raw-a"),
                RenderableNode::new("b", "", "", "").with_adjacent("c").with_origin("raw-b"),
                RenderableNode::new("c", "", "", "").with_origin("raw-c"),
            ]
            .into_iter()
            .collect(),
            edges: vec![
                ("a", "b", EdgeMetadata::new().with_bytes(1, 0)),
                ("b", "c", EdgeMetadata::new().with_bytes(2, 0)),
                ("a", "c", EdgeMetadata::new().with_bytes(4, 0)),
            ],
        }
    }

    fn to_group(node: &RenderableNode) -> Option<RenderableNode> {
        let group = match node.id.as_str() {
            "a" | "b" => "group1",
            "c" => "group2",
            _ => return None,
        };
        Some(RenderableNode::new(group, group, "", ""))
    }

    fn ids(list: &IdList) -> Vec<&str> {
        list.iter().collect()
    }

    #[test]
    fn test_collapses_nodes_and_rewrites_adjacency() {
        let map = Map::new(to_group, chain());
        let nodes = map.render(&Report::default());

        assert_eq!(nodes.len(), 2);
        let group1 = nodes.get("group1").unwrap();
        assert_eq!(ids(&group1.adjacency), vec!["group2"]);
        assert_eq!(ids(&group1.origins), vec!["raw-a", "raw-b"]);
        let group2 = nodes.get("group2").unwrap();
        assert!(group2.adjacency.is_empty());
        assert_eq!(ids(&group2.origins), vec!["raw-c"]);
    }

    #[test]
    fn test_dropped_nodes_take_their_links_along() {
        let drop_b = |node: &RenderableNode| (node.id != "b").then(|| node.clone());
        let nodes = Map::new(drop_b, chain()).render(&Report::default());

        assert_eq!(nodes.ids().collect::<Vec<_>>(), vec!["a", "c"]);
        assert!(nodes.get("a").unwrap().adjacency.is_empty());
        assert!(nodes.get("c").unwrap().adjacency.is_empty());
    }

    #[test]
    fn test_identity_leaves_nodes_unchanged() {
        let inner = chain();
        let expected = inner.nodes.clone();
        let identity = |node: &RenderableNode| Some(node.clone());
        assert_eq!(Map::new(identity, inner).render(&Report::default()), expected);
    }

    #[test]
    fn test_identity_keeps_existing_self_links() {
        let inner = Static {
            nodes: [
                RenderableNode::new("a", "", "", "").with_adjacent("a").with_adjacent("b"),
                RenderableNode::new("b", "", "", ""),
            ]
            .into_iter()
            .collect(),
            edges: Vec::new(),
        };
        let expected = inner.nodes.clone();
        let identity = |node: &RenderableNode| Some(node.clone());
        let nodes = Map::new(identity, inner).render(&Report::default());

        assert_eq!(nodes, expected);
        assert_eq!(ids(&nodes.get("a").unwrap().adjacency), vec!["a", "b"]);
    }

    #[test]
    fn test_collapse_keeps_self_link_of_a_member() {
        let inner = Static {
            nodes: [
                RenderableNode::new("a", "", "", "").with_adjacent("a").with_adjacent("b"),
                RenderableNode::new("b", "", "", "").with_adjacent("c"),
                RenderableNode::new("c", "", "", ""),
            ]
            .into_iter()
            .collect(),
            edges: Vec::new(),
        };
        let nodes = Map::new(to_group, inner).render(&Report::default());

        assert_eq!(
            ids(&nodes.get("group1").unwrap().adjacency),
            vec!["group1", "group2"]
        );
    }

    #[test]
    fn test_edge_metadata_merges_cross_product() {
        let map = Map::new(to_group, chain());
        let report = Report::default();

        // (a,c) and (b,c) feed group1 -> group2
        assert_eq!(
            map.edge_metadata(&report, "group1", "group2"),
            EdgeMetadata::new().with_bytes(6, 0)
        );
        assert!(map.edge_metadata(&report, "group2", "group1").is_empty());
        assert!(map.edge_metadata(&report, "missing", "group2").is_empty());
    }

    #[test]
    fn test_mapping_is_exposed() {
        let (nodes, mapped) = Map::new(to_group, chain()).render_with_mapping(&Report::default());
        assert_eq!(nodes.len(), 2);
        assert_eq!(mapped["a"], "group1");
        assert_eq!(mapped["b"], "group1");
        assert_eq!(mapped["c"], "group2");
    }
}
