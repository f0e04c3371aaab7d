//! Renderer composition engine.
//!
//! Turns a raw [`Report`](topo_report::Report) into a graph of
//! [`RenderableNode`]s. Renderers are small and composable: a [`LeafMap`]
//! classifies raw nodes of one topology, a [`Map`] re-classifies the output of
//! another renderer, a [`Reduce`] unions several renderers and a
//! [`FilterUnconnected`] drops nodes with no connectivity. Every renderer can
//! also answer "what traffic flowed between these two rendered nodes" through
//! [`Renderer::edge_metadata`].
//!
//! # Module Structure
//!
//! - [`mapping`]: stock classifiers, transforms and pseudo-node constructors
//! - [`topologies`]: stock pipelines selected by [`TopologyKind`]

mod diagnostics;
mod filter;
mod leaf_map;
mod map;
pub mod mapping;
mod node;
mod reduce;
mod renderer;
pub mod topologies;

pub use diagnostics::{CollectingSink, Diagnostic, DiagnosticSink, TracingSink};
pub use filter::{FilterUnconnected, only_connected};
pub use leaf_map::LeafMap;
pub use map::Map;
pub use node::{RenderableNode, RenderableNodes};
pub use reduce::Reduce;
pub use renderer::{LeafMapFunc, MapFunc, PseudoFunc, Renderer};
pub use topologies::{RenderOptions, TopologyKind, renderer_for};
