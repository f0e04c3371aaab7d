//! Stock classifiers, transforms and pseudo-node constructors.
//!
//! Rendered IDs are `<kind>:<parts..>`, e.g. `process:host1:4242`; pseudo
//! nodes use the `pseudo` prefix and the Internet is [`THE_INTERNET_ID`].

use std::net::IpAddr;

use topo_report::{
    Networks, NodeMetadata, THE_INTERNET, extract_host_id, keys, parse_node_id,
};

use crate::node::RenderableNode;

pub const THE_INTERNET_ID: &str = THE_INTERNET;
pub const THE_INTERNET_MAJOR: &str = "the Internet";

const ID_DELIM: char = ':';

fn make_id(prefix: &str, parts: &[&str]) -> String {
    let mut id = String::from(prefix);
    for part in parts {
        id.push(ID_DELIM);
        id.push_str(part);
    }
    id
}

pub fn make_endpoint_id(host_id: &str, addr: &str, port: &str) -> String {
    make_id("endpoint", &[host_id, addr, port])
}

pub fn make_address_id(host_id: &str, addr: &str) -> String {
    make_id("address", &[host_id, addr])
}

pub fn make_process_id(host_id: &str, pid: &str) -> String {
    make_id("process", &[host_id, pid])
}

pub fn make_process_name_id(comm: &str) -> String {
    make_id("process_name", &[comm])
}

pub fn make_host_id(host_id: &str) -> String {
    make_id("host", &[host_id])
}

pub fn make_pseudo_node_id(parts: &[&str]) -> String {
    make_id("pseudo", parts)
}

fn host_id_of(metadata: &NodeMetadata) -> &str {
    extract_host_id(metadata.get_or_empty(keys::HOST_NODE_ID))
}

// ============================================================================
// Leaf classifiers
// ============================================================================

/// One node per `(host, addr, port)` endpoint.
pub fn map_endpoint_identity(metadata: &NodeMetadata) -> Option<RenderableNode> {
    let addr = metadata.get(keys::ADDR)?;
    let port = metadata.get(keys::PORT)?;
    let host_id = host_id_of(metadata);

    let major = format!("{addr}:{port}");
    let minor = match metadata.get(keys::PID) {
        Some(pid) => format!("{host_id} ({pid})"),
        None => host_id.to_string(),
    };
    let id = make_endpoint_id(host_id, addr, port);
    Some(RenderableNode::new(id, major.clone(), minor, major).with_metadata(metadata))
}

/// One node per `(host, addr)`.
pub fn map_address_identity(metadata: &NodeMetadata) -> Option<RenderableNode> {
    let addr = metadata.get(keys::ADDR)?;
    let host_id = host_id_of(metadata);
    let id = make_address_id(host_id, addr);
    Some(RenderableNode::new(id, addr, host_id, addr).with_metadata(metadata))
}

/// One node per `(host, pid)`.
pub fn map_process_identity(metadata: &NodeMetadata) -> Option<RenderableNode> {
    let pid = metadata.get(keys::PID)?;
    let host_id = host_id_of(metadata);
    let major = metadata.get(keys::COMM).unwrap_or("(unknown)");
    let minor = format!("{host_id} ({pid})");
    let id = make_process_id(host_id, pid);
    Some(RenderableNode::new(id, major, minor, pid).with_metadata(metadata))
}

/// One node per host.
pub fn map_host_identity(metadata: &NodeMetadata) -> Option<RenderableNode> {
    let host_id = extract_host_id(metadata.get(keys::HOST_NODE_ID)?);
    let major = metadata.get(keys::HOST_NAME).unwrap_or(host_id);
    let id = make_host_id(host_id);
    Some(RenderableNode::new(id, major, "", host_id).with_metadata(metadata))
}

// ============================================================================
// Transforms
// ============================================================================

/// Endpoints to the process that owns them. Endpoints without a pid are dropped.
pub fn map_endpoint2process(node: &RenderableNode) -> Option<RenderableNode> {
    if node.pseudo {
        return Some(node.clone());
    }
    let pid = node.metadata_value(keys::PID)?;
    let host_id = extract_host_id(node.metadata_value(keys::HOST_NODE_ID).unwrap_or(""));
    let id = make_process_id(host_id, pid);
    let major = node.metadata_value(keys::COMM).unwrap_or("");
    Some(
        RenderableNode::new(id, major, format!("{host_id} ({pid})"), pid)
            .with_metadata_keys(&node.metadata, &[keys::HOST_NODE_ID, keys::PID, keys::COMM])
            .with_edge_metadata(node.edge_metadata),
    )
}

/// Processes grouped by command name.
pub fn map_process2name(node: &RenderableNode) -> Option<RenderableNode> {
    if node.pseudo {
        return Some(node.clone());
    }
    let comm = node.metadata_value(keys::COMM)?;
    Some(
        RenderableNode::new(make_process_name_id(comm), comm, "", comm)
            .with_metadata_keys(&node.metadata, &[keys::COMM])
            .with_edge_metadata(node.edge_metadata),
    )
}

/// Addresses to the host they were seen on.
///
/// The label is left to the host classifier, which knows the host name.
pub fn map_address2host(node: &RenderableNode) -> Option<RenderableNode> {
    if node.pseudo {
        return Some(node.clone());
    }
    let host_id = extract_host_id(node.metadata_value(keys::HOST_NODE_ID)?);
    Some(
        RenderableNode::new(make_host_id(host_id), "", "", host_id)
            .with_metadata_keys(&node.metadata, &[keys::HOST_NODE_ID])
            .with_edge_metadata(node.edge_metadata),
    )
}

// ============================================================================
// Pseudo nodes
// ============================================================================

/// Extracts the IP address a raw node ID refers to.
pub type Addresser = fn(&str) -> Option<IpAddr>;

/// Address of a raw endpoint ID (`host;addr;port`).
pub fn endpoint_address(raw_id: &str) -> Option<IpAddr> {
    let (_, rest) = parse_node_id(raw_id)?;
    let (addr, _port) = rest.rsplit_once(';')?;
    addr.parse().ok()
}

/// Address of a raw address ID (`host;addr`).
pub fn address_address(raw_id: &str) -> Option<IpAddr> {
    let (_, addr) = parse_node_id(raw_id)?;
    addr.parse().ok()
}

/// Split a raw ID into `(addr, port)`, dropping the host scope.
fn split_addr(raw_id: &str) -> (&str, &str) {
    let rest = parse_node_id(raw_id).map_or(raw_id, |(_, rest)| rest);
    rest.rsplit_once(';').unwrap_or((rest, ""))
}

pub fn the_internet_node() -> RenderableNode {
    RenderableNode::new_pseudo(THE_INTERNET_ID, THE_INTERNET_MAJOR, "")
}

fn is_outside(src: &str, addresser: Addresser, local_networks: &Networks) -> bool {
    src == THE_INTERNET || addresser(src).is_some_and(|ip| !local_networks.contains(&ip))
}

/// Pseudo nodes for unclassified endpoints.
///
/// Addresses outside the local networks collapse into the Internet node.
/// Otherwise a missing client becomes one node per (client ip, server ip,
/// server port) and a missing server one node per (server ip, server port).
pub fn generic_pseudo_node(
    addresser: Addresser,
) -> impl Fn(&str, &str, bool, &Networks) -> Option<RenderableNode> + Send + Sync + 'static {
    move |src, dst, src_is_client, local_networks| {
        if is_outside(src, addresser, local_networks) {
            return Some(the_internet_node());
        }
        if src_is_client {
            let client = addresser(src).map_or_else(|| split_addr(src).0.to_string(), |ip| ip.to_string());
            let (server_addr, server_port) = split_addr(dst);
            let id = make_pseudo_node_id(&[&client, server_addr, server_port]);
            return Some(RenderableNode::new_pseudo(id, client, ""));
        }
        let (server_addr, server_port) = split_addr(src);
        let id = make_pseudo_node_id(&[server_addr, server_port]);
        let major = if server_port.is_empty() {
            server_addr.to_string()
        } else {
            format!("{server_addr}:{server_port}")
        };
        Some(RenderableNode::new_pseudo(id, major, ""))
    }
}

/// Only the Internet node; unclassified local endpoints are dropped.
pub fn internet_only_pseudo_node(
    addresser: Addresser,
) -> impl Fn(&str, &str, bool, &Networks) -> Option<RenderableNode> + Send + Sync + 'static {
    move |src, _dst, _src_is_client, local_networks| {
        is_outside(src, addresser, local_networks).then(the_internet_node)
    }
}

/// Never makes a pseudo node.
pub fn no_pseudo_node(
    _src: &str,
    _dst: &str,
    _src_is_client: bool,
    _local_networks: &Networks,
) -> Option<RenderableNode> {
    None
}
