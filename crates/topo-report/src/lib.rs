//! Raw topology snapshots.
//!
//! A [`Report`] is one immutable capture of a monitored system. It carries a
//! handful of [`Topology`] views (endpoints, addresses, processes, hosts),
//! each made of raw node metadata, raw adjacency and per-edge traffic
//! metrics. The render engine in `topo-render` reads these views through
//! [`TopologySelector`]s and never mutates them.
//!
//! # Module Structure
//!
//! - [`id`]: ID construction/parsing and the sorted [`IdList`]
//! - [`edge_metadata`]: [`EdgeMetadata`] with its `merge` and `flatten` operators
//! - [`networks`]: CIDR ranges used to decide what counts as "local"
//! - [`topology`]: [`Topology`] and [`NodeMetadata`]
//! - [`report`]: [`Report`] and the topology selectors

pub mod edge_metadata;
pub mod id;
pub mod networks;
pub mod report;
pub mod topology;

pub use edge_metadata::EdgeMetadata;
pub use id::{
    IdList, THE_INTERNET, extract_host_id, make_address_node_id, make_adjacency_id,
    make_edge_id, make_endpoint_node_id, make_host_node_id, make_process_node_id,
    parse_adjacency_id, parse_edge_id, parse_node_id,
};
pub use networks::{IpNet, Networks};
pub use report::{
    Report, TopologySelector, select_address, select_endpoint, select_host, select_process,
};
pub use topology::{NodeMetadata, Topology, keys};
