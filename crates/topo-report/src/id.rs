//! Raw identifiers.
//!
//! Node IDs are scoped by host: `<host>;<rest>`. Adjacency keys prefix the
//! source node ID with `>`, edge keys join source and destination with `|`.

use std::fmt;

use serde::{Deserialize, Serialize};
use topo_error::{Error, Result};

/// Separates the host scope from the rest of a node ID.
pub const SCOPE_DELIM: char = ';';

/// Separates source and destination in an edge ID.
pub const EDGE_DELIM: char = '|';

/// Prefix marking an adjacency key.
pub const ADJACENCY_PREFIX: char = '>';

/// Raw node ID standing for everything outside the monitored world.
pub const THE_INTERNET: &str = "theinternet";

pub fn make_endpoint_node_id(host_id: &str, address: &str, port: &str) -> String {
    format!("{host_id}{SCOPE_DELIM}{address}{SCOPE_DELIM}{port}")
}

pub fn make_address_node_id(host_id: &str, address: &str) -> String {
    format!("{host_id}{SCOPE_DELIM}{address}")
}

pub fn make_process_node_id(host_id: &str, pid: &str) -> String {
    format!("{host_id}{SCOPE_DELIM}{pid}")
}

pub fn make_host_node_id(host_id: &str) -> String {
    format!("{host_id}{SCOPE_DELIM}<host>")
}

/// Split a node ID into its host scope and the remainder.
pub fn parse_node_id(node_id: &str) -> Option<(&str, &str)> {
    node_id.split_once(SCOPE_DELIM)
}

/// Host ID part of a host node ID, or the whole string if it has no scope.
pub fn extract_host_id(host_node_id: &str) -> &str {
    parse_node_id(host_node_id).map_or(host_node_id, |(host, _)| host)
}

pub fn make_adjacency_id(node_id: &str) -> String {
    format!("{ADJACENCY_PREFIX}{node_id}")
}

/// Recover the source node ID from an adjacency key.
pub fn parse_adjacency_id(adjacency_id: &str) -> Result<&str> {
    match adjacency_id.strip_prefix(ADJACENCY_PREFIX) {
        Some(node_id) if !node_id.is_empty() => Ok(node_id),
        _ => Err(Error::malformed_id("adjacency ID", adjacency_id)
            .with_operation("report::parse_adjacency_id")),
    }
}

pub fn make_edge_id(src: &str, dst: &str) -> String {
    format!("{src}{EDGE_DELIM}{dst}")
}

/// Split an edge key into `(src, dst)`.
pub fn parse_edge_id(edge_id: &str) -> Result<(&str, &str)> {
    match edge_id.split_once(EDGE_DELIM) {
        Some((src, dst)) if !src.is_empty() && !dst.is_empty() => Ok((src, dst)),
        _ => Err(Error::malformed_id("edge ID", edge_id).with_operation("report::parse_edge_id")),
    }
}

/// Sorted, de-duplicated list of IDs.
///
/// Used for adjacency and origins alike, so equality never depends on the
/// order IDs were added in.
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct IdList(Vec<String>);

impl IdList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `id`, keeping the list sorted. Returns false if already present.
    pub fn add(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        match self.0.binary_search(&id) {
            Ok(_) => false,
            Err(pos) => {
                self.0.insert(pos, id);
                true
            }
        }
    }

    /// Set union with `other`.
    pub fn merge(&mut self, other: &IdList) {
        if other.is_empty() {
            return;
        }
        if self.is_empty() {
            self.0 = other.0.clone();
            return;
        }
        let mut merged = Vec::with_capacity(self.0.len() + other.0.len());
        let (mut left, mut right) = (self.0.iter().peekable(), other.0.iter().peekable());
        loop {
            let next = match (left.peek(), right.peek()) {
                (Some(l), Some(r)) => match l.cmp(r) {
                    std::cmp::Ordering::Less => left.next(),
                    std::cmp::Ordering::Greater => right.next(),
                    std::cmp::Ordering::Equal => {
                        right.next();
                        left.next()
                    }
                },
                (Some(_), None) => left.next(),
                (None, Some(_)) => right.next(),
                (None, None) => break,
            };
            if let Some(id) = next {
                merged.push(id.clone());
            }
        }
        self.0 = merged;
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.binary_search_by(|entry| entry.as_str().cmp(id)).is_ok()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Debug for IdList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.0.iter()).finish()
    }
}

impl From<Vec<String>> for IdList {
    fn from(mut ids: Vec<String>) -> Self {
        ids.sort_unstable();
        ids.dedup();
        Self(ids)
    }
}

impl From<IdList> for Vec<String> {
    fn from(list: IdList) -> Self {
        list.0
    }
}

impl<S: Into<String>> FromIterator<S> for IdList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        iter.into_iter().map(Into::into).collect::<Vec<String>>().into()
    }
}

impl<'a> IntoIterator for &'a IdList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
