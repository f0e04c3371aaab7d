//! The snapshot itself and the selectors that pick views out of it.

use std::io::Read;

use serde::{Deserialize, Serialize};
use topo_error::{Error, Result};

use crate::networks::{IpNet, Networks};
use crate::topology::{Topology, keys};

/// One immutable capture of the monitored system.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    #[serde(default)]
    pub endpoint: Topology,
    #[serde(default)]
    pub address: Topology,
    #[serde(default)]
    pub process: Topology,
    #[serde(default)]
    pub host: Topology,
}

/// Picks one topology view out of a report. Must be deterministic.
pub type TopologySelector = fn(&Report) -> &Topology;

pub fn select_endpoint(report: &Report) -> &Topology {
    &report.endpoint
}

pub fn select_address(report: &Report) -> &Topology {
    &report.address
}

pub fn select_process(report: &Report) -> &Topology {
    &report.process
}

pub fn select_host(report: &Report) -> &Topology {
    &report.host
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(input: &str) -> Result<Self> {
        serde_json::from_str(input)
            .map_err(|e| Error::from(e).with_operation("report::from_json"))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        serde_json::from_reader(reader)
            .map_err(|e| Error::from(e).with_operation("report::from_reader"))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            Error::serialization_failed(e.to_string())
                .with_operation("report::to_json")
                .set_source(e)
        })
    }

    /// Address ranges the monitored hosts declared as local.
    ///
    /// Collected from the `local_networks` metadata of every host node.
    /// Entries that fail to parse are handed to `on_error` and skipped.
    pub fn local_networks(&self, mut on_error: impl FnMut(Error)) -> Networks {
        let mut networks = Networks::new();
        for (node_id, metadata) in &self.host.node_metadatas {
            let Some(cidrs) = metadata.get(keys::LOCAL_NETWORKS) else {
                continue;
            };
            for cidr in cidrs.split_whitespace() {
                match cidr.parse::<IpNet>() {
                    Ok(net) => networks.add(net),
                    Err(e) => on_error(
                        e.with_operation("report::local_networks")
                            .with_context("node_id", node_id.as_str()),
                    ),
                }
            }
        }
        networks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge_metadata::EdgeMetadata;
    use crate::id::make_host_node_id;
    use crate::topology::NodeMetadata;
    use pretty_assertions::assert_eq;
    use topo_error::ErrorKind;

    #[test]
    fn test_local_networks_skip_garbage() {
        let mut report = Report::new();
        report.host = Topology::new()
            .with_node(
                make_host_node_id("h1"),
                NodeMetadata::new().with(keys::LOCAL_NETWORKS, "10.0.0.0/8 bogus 192.168.0.0/16"),
            )
            .with_node(
                make_host_node_id("h2"),
                NodeMetadata::new().with(keys::LOCAL_NETWORKS, "10.0.0.0/8"),
            );

        let mut errors = Vec::new();
        let networks = report.local_networks(|e| errors.push(e));
        assert_eq!(networks.len(), 2);
        assert!(networks.contains(&"192.168.3.4".parse().unwrap()));

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind(), ErrorKind::MalformedNetwork);
        assert_eq!(errors[0].operation(), "report::local_networks");
        assert_eq!(
            errors[0].context(),
            &[
                ("cidr", "bogus".to_string()),
                ("called", "report::IpNet::from_str".to_string()),
                ("node_id", make_host_node_id("h1")),
            ]
        );
    }

    #[test]
    fn test_json_round_trip() {
        let mut report = Report::new();
        report.endpoint = Topology::new().with_edge_metadata(
            "h;1.2.3.4;80",
            "h;5.6.7.8;443",
            EdgeMetadata::new().with_bytes(3, 4),
        );
        let json = report.to_json().unwrap();
        assert_eq!(Report::from_json(&json).unwrap(), report);
    }

    #[test]
    fn test_missing_views_default_to_empty() {
        let report = Report::from_json(r#"{"endpoint": {"node_metadatas": {}}}"#).unwrap();
        assert!(report.process.is_empty());
        assert!(report.endpoint.is_empty());
    }

    #[test]
    fn test_bad_json_is_deserialization_error() {
        let err = Report::from_json("[1, 2").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DeserializationFailed);
        assert_eq!(err.operation(), "report::from_json");
        assert_eq!(err.context()[0], ("called", "json".to_string()));
    }

    #[test]
    fn test_selectors_pick_views() {
        let mut report = Report::new();
        report.process = Topology::new().with_node("h;1", NodeMetadata::new());
        assert_eq!(select_process(&report).node_metadatas.len(), 1);
        assert!(select_endpoint(&report).is_empty());
        assert!(select_address(&report).is_empty());
        assert!(select_host(&report).is_empty());
    }
}
