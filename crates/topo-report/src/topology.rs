//! One view of a snapshot: raw nodes, raw adjacency, raw edge metrics.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::edge_metadata::EdgeMetadata;
use crate::id::{IdList, make_adjacency_id, make_edge_id};

/// Well-known node metadata keys.
pub mod keys {
    /// Host node ID of the host a node was observed on.
    pub const HOST_NODE_ID: &str = "host_node_id";
    pub const HOST_NAME: &str = "host_name";
    /// Whitespace separated CIDRs considered local, set on host nodes.
    pub const LOCAL_NETWORKS: &str = "local_networks";
    pub const PID: &str = "pid";
    /// Process command name.
    pub const COMM: &str = "comm";
    pub const ADDR: &str = "addr";
    pub const PORT: &str = "port";
}

/// String key/value metadata describing one raw node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeMetadata(BTreeMap<String, String>);

impl NodeMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Value for `key`, or the empty string.
    pub fn get_or_empty(&self, key: &str) -> &str {
        self.get(key).unwrap_or("")
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for NodeMetadata {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// A raw topology view.
///
/// `adjacency` is keyed by adjacency ID (`>` + source node ID) and lists raw
/// destination node IDs. `edge_metadatas` is keyed by edge ID (`src|dst`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topology {
    #[serde(default)]
    pub adjacency: BTreeMap<String, IdList>,
    #[serde(default)]
    pub edge_metadatas: BTreeMap<String, EdgeMetadata>,
    #[serde(default)]
    pub node_metadatas: BTreeMap<String, NodeMetadata>,
}

impl Topology {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_node(mut self, node_id: impl Into<String>, metadata: NodeMetadata) -> Self {
        self.node_metadatas.insert(node_id.into(), metadata);
        self
    }

    /// Record a raw edge `src -> dst` in the adjacency.
    pub fn with_edge(mut self, src: &str, dst: &str) -> Self {
        self.adjacency
            .entry(make_adjacency_id(src))
            .or_default()
            .add(dst);
        self
    }

    /// Record a raw edge together with its metrics.
    pub fn with_edge_metadata(self, src: &str, dst: &str, metadata: EdgeMetadata) -> Self {
        let mut topology = self.with_edge(src, dst);
        topology
            .edge_metadatas
            .insert(make_edge_id(src, dst), metadata);
        topology
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty() && self.edge_metadatas.is_empty() && self.node_metadatas.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builder_records_adjacency_and_metrics() {
        let md = EdgeMetadata::new().with_bytes(1, 2);
        let topology = Topology::new()
            .with_node("h;a", NodeMetadata::new().with(keys::PID, "1"))
            .with_edge("h;a", "h;c")
            .with_edge_metadata("h;a", "h;b", md);

        let dsts: Vec<&str> = topology.adjacency[">h;a"].iter().collect();
        assert_eq!(dsts, vec!["h;b", "h;c"]);
        assert_eq!(topology.edge_metadatas["h;a|h;b"], md);
        assert_eq!(topology.node_metadatas["h;a"].get(keys::PID), Some("1"));
    }

    #[test]
    fn test_node_metadata_lookup() {
        let md: NodeMetadata = [(keys::ADDR, "10.0.0.1"), (keys::PORT, "80")]
            .into_iter()
            .collect();
        assert_eq!(md.get(keys::ADDR), Some("10.0.0.1"));
        assert_eq!(md.get_or_empty(keys::PID), "");
        assert_eq!(md.len(), 2);
    }
}
