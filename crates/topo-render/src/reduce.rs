//! Union of several renderers.

use rayon::prelude::*;
use topo_report::{EdgeMetadata, Report};

use crate::node::RenderableNodes;
use crate::renderer::Renderer;

/// Merges the output of several renderers.
///
/// Members render independently on the rayon pool. Because node merging is
/// commutative and associative, neither member order nor scheduling changes
/// the result.
#[derive(Default)]
pub struct Reduce(Vec<Box<dyn Renderer>>);

impl Reduce {
    pub fn new(renderers: Vec<Box<dyn Renderer>>) -> Self {
        Self(renderers)
    }

    pub fn with<R: Renderer + 'static>(mut self, renderer: R) -> Self {
        self.0.push(Box::new(renderer));
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Renderer for Reduce {
    #[tracing::instrument(skip_all, fields(members = self.0.len()))]
    fn render(&self, report: &Report) -> RenderableNodes {
        self.0
            .par_iter()
            .map(|renderer| renderer.render(report))
            .reduce(RenderableNodes::new, |mut acc, nodes| {
                acc.merge(nodes);
                acc
            })
    }

    fn edge_metadata(&self, report: &Report, local_id: &str, remote_id: &str) -> EdgeMetadata {
        self.0
            .iter()
            .map(|renderer| renderer.edge_metadata(report, local_id, remote_id))
            .fold(EdgeMetadata::default(), EdgeMetadata::merge)
    }
}
