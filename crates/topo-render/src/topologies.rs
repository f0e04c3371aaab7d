//! Stock rendering pipelines.

use std::sync::Arc;

use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};
use topo_error::{Error, Result};
use topo_report::{select_address, select_endpoint, select_host, select_process};

use crate::diagnostics::{DiagnosticSink, TracingSink};
use crate::filter::FilterUnconnected;
use crate::leaf_map::LeafMap;
use crate::map::Map;
use crate::mapping::{
    address_address, endpoint_address, generic_pseudo_node, map_address2host,
    map_address_identity, map_endpoint2process, map_endpoint_identity, map_host_identity,
    map_process2name, map_process_identity, no_pseudo_node,
};
use crate::reduce::Reduce;
use crate::renderer::Renderer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter, EnumString, IntoStaticStr, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum TopologyKind {
    #[default]
    Endpoints,
    Processes,
    ProcessNames,
    Addresses,
    Hosts,
}

impl TopologyKind {
    pub fn parse(name: &str) -> Result<Self> {
        name.parse()
            .map_err(|_| Error::unknown_topology(name).with_operation("topologies::parse"))
    }

    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

#[derive(Clone)]
pub struct RenderOptions {
    /// Keep nodes without any connectivity.
    pub show_unconnected: bool,
    pub sink: Arc<dyn DiagnosticSink>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            show_unconnected: false,
            sink: Arc::new(TracingSink),
        }
    }
}

fn endpoints(options: &RenderOptions) -> LeafMap {
    LeafMap::new(
        select_endpoint,
        map_endpoint_identity,
        generic_pseudo_node(endpoint_address),
    )
    .with_sink(options.sink.clone())
}

fn processes(options: &RenderOptions) -> Reduce {
    Reduce::default()
        .with(Map::new(map_endpoint2process, endpoints(options)))
        .with(
            LeafMap::new(select_process, map_process_identity, no_pseudo_node)
                .with_sink(options.sink.clone()),
        )
}

fn addresses(options: &RenderOptions) -> LeafMap {
    LeafMap::new(
        select_address,
        map_address_identity,
        generic_pseudo_node(address_address),
    )
    .with_sink(options.sink.clone())
}

fn hosts(options: &RenderOptions) -> Reduce {
    Reduce::default()
        .with(Map::new(map_address2host, addresses(options)))
        .with(
            LeafMap::new(select_host, map_host_identity, no_pseudo_node)
                .with_sink(options.sink.clone()),
        )
}

/// Build the renderer for one topology view.
#[tracing::instrument(skip(options), fields(show_unconnected = options.show_unconnected))]
pub fn renderer_for(kind: TopologyKind, options: &RenderOptions) -> Box<dyn Renderer> {
    let renderer: Box<dyn Renderer> = match kind {
        TopologyKind::Endpoints => Box::new(endpoints(options)),
        TopologyKind::Processes => Box::new(processes(options)),
        TopologyKind::ProcessNames => Box::new(Map::new(map_process2name, processes(options))),
        TopologyKind::Addresses => Box::new(addresses(options)),
        TopologyKind::Hosts => Box::new(hosts(options)),
    };
    if options.show_unconnected {
        renderer
    } else {
        Box::new(FilterUnconnected::new(renderer))
    }
}
