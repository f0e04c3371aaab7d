//! Renderable nodes and the aggregate node set.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use serde::{Deserialize, Serialize};
use topo_report::{EdgeMetadata, IdList, NodeMetadata};

/// One node of a rendered graph.
///
/// A renderable node may stand for many raw nodes (see `origins`). Its
/// `adjacency` only ever names nodes of the same [`RenderableNodes`] set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderableNode {
    pub id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub label_major: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub label_minor: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub rank: String,
    /// Synthetic node standing in for an endpoint nobody classified.
    pub pseudo: bool,
    pub adjacency: IdList,
    /// Raw node IDs (and host node IDs) that contributed to this node.
    pub origins: IdList,
    #[serde(skip_serializing_if = "EdgeMetadata::is_empty")]
    pub edge_metadata: EdgeMetadata,
    /// Classification attributes copied from raw metadata, read by transforms.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

impl RenderableNode {
    pub fn new(
        id: impl Into<String>,
        label_major: impl Into<String>,
        label_minor: impl Into<String>,
        rank: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label_major: label_major.into(),
            label_minor: label_minor.into(),
            rank: rank.into(),
            ..Self::default()
        }
    }

    pub fn new_pseudo(
        id: impl Into<String>,
        label_major: impl Into<String>,
        label_minor: impl Into<String>,
    ) -> Self {
        let mut node = Self::new(id, label_major, label_minor, "");
        node.pseudo = true;
        node
    }

    /// Copy every key of `metadata` onto the node.
    pub fn with_metadata(mut self, metadata: &NodeMetadata) -> Self {
        for (key, value) in metadata.iter() {
            self.metadata.insert(key.to_string(), value.to_string());
        }
        self
    }

    /// Copy only the listed keys of `metadata` that are present.
    pub fn with_metadata_keys(mut self, metadata: &BTreeMap<String, String>, keys: &[&str]) -> Self {
        for key in keys {
            if let Some(value) = metadata.get(*key) {
                self.metadata.insert(key.to_string(), value.clone());
            }
        }
        self
    }

    pub fn with_adjacent(mut self, id: impl Into<String>) -> Self {
        self.adjacency.add(id);
        self
    }

    pub fn with_origin(mut self, id: impl Into<String>) -> Self {
        self.origins.add(id);
        self
    }

    pub fn with_edge_metadata(mut self, metadata: EdgeMetadata) -> Self {
        self.edge_metadata = metadata;
        self
    }

    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    /// Fold `other` into this node.
    ///
    /// Commutative and associative on every field: ID lists take the union,
    /// edge metrics use [`EdgeMetadata::merge`], `pseudo` is or-ed, and text
    /// attributes keep the smallest non-empty value so that neither side wins
    /// by argument order.
    pub fn merge(&mut self, other: &RenderableNode) {
        merge_text(&mut self.label_major, &other.label_major);
        merge_text(&mut self.label_minor, &other.label_minor);
        merge_text(&mut self.rank, &other.rank);
        self.pseudo |= other.pseudo;
        self.adjacency.merge(&other.adjacency);
        self.origins.merge(&other.origins);
        self.edge_metadata = self.edge_metadata.merge(other.edge_metadata);
        for (key, value) in &other.metadata {
            match self.metadata.entry(key.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(value.clone());
                }
                Entry::Occupied(mut slot) => merge_text(slot.get_mut(), value),
            }
        }
    }
}

fn merge_text(mine: &mut String, theirs: &str) {
    if theirs.is_empty() {
        return;
    }
    if mine.is_empty() || theirs < mine.as_str() {
        *mine = theirs.to_string();
    }
}

/// The aggregate node set: node ID to node, ordered by ID.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RenderableNodes(BTreeMap<String, RenderableNode>);

impl RenderableNodes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `node`, merging it into an existing node with the same ID.
    pub fn merge_node(&mut self, node: RenderableNode) {
        match self.0.entry(node.id.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(node);
            }
            Entry::Occupied(mut slot) => slot.get_mut().merge(&node),
        }
    }

    /// Merge every node of `other` into this set.
    pub fn merge(&mut self, other: RenderableNodes) {
        if self.0.is_empty() {
            *self = other;
            return;
        }
        for node in other.0.into_values() {
            self.merge_node(node);
        }
    }

    pub fn get(&self, id: &str) -> Option<&RenderableNode> {
        self.0.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut RenderableNode> {
        self.0.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RenderableNode)> {
        self.0.iter().map(|(id, node)| (id.as_str(), node))
    }

    pub fn values(&self) -> impl Iterator<Item = &RenderableNode> {
        self.0.values()
    }
}

impl FromIterator<RenderableNode> for RenderableNodes {
    fn from_iter<I: IntoIterator<Item = RenderableNode>>(iter: I) -> Self {
        let mut nodes = RenderableNodes::new();
        for node in iter {
            nodes.merge_node(node);
        }
        nodes
    }
}

impl IntoIterator for RenderableNodes {
    type Item = (String, RenderableNode);
    type IntoIter = std::collections::btree_map::IntoIter<String, RenderableNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
