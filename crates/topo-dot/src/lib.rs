//! DOT output for rendered topologies.
//!
//! Every node becomes one DOT node labelled with its major and minor labels,
//! and every adjacency entry one edge. Pseudo nodes are drawn dashed.

mod dot;

pub use dot::{DotBuilder, escape_label, quote_id};

use topo_render::{RenderableNode, RenderableNodes};

fn label(node: &RenderableNode) -> String {
    let major = if node.label_major.is_empty() {
        node.id.as_str()
    } else {
        node.label_major.as_str()
    };
    if node.label_minor.is_empty() {
        major.to_string()
    } else {
        format!("{major}\n{}", node.label_minor)
    }
}

/// Render a node set as a `digraph`.
///
/// Output is deterministic: nodes and edges follow node ID order.
#[tracing::instrument(skip_all, fields(nodes = nodes.len()))]
pub fn render_dot(nodes: &RenderableNodes) -> String {
    let mut dot = DotBuilder::new("topology");
    dot.attr("rankdir", "LR")
        .node_defaults(&[("shape", "box"), ("style", "rounded")])
        .blank();

    for node in nodes.values() {
        let label = label(node);
        if node.pseudo {
            dot.node(&node.id, &[("label", &label), ("style", "dashed")]);
        } else {
            dot.node(&node.id, &[("label", &label)]);
        }
    }

    dot.blank();
    let mut edges = 0usize;
    for node in nodes.values() {
        for target in node.adjacency.iter() {
            dot.edge(&node.id, target, &[]);
            edges += 1;
        }
    }
    tracing::debug!(edges, "rendered dot");
    dot.build()
}
