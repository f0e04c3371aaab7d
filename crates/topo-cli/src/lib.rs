//! topo command-line interface.
//!
//! Reads a report, renders one topology view of it and prints the result as
//! JSON or DOT, or answers an edge-metrics query.

pub mod options;

use std::fs::File;
use std::io::{self, BufReader};
use std::sync::Arc;

use topo_error::{Error, Result};
use topo_render::{CollectingSink, RenderOptions, TopologyKind, renderer_for};
use topo_report::Report;

pub use options::{OutputFormat, RenderArgs};

/// Options for running topo.
#[derive(Debug, Clone, Default)]
pub struct TopoOptions {
    /// Report path; `-` for stdin.
    pub report: String,
    pub topology: TopologyKind,
    pub show_unconnected: bool,
    pub format: OutputFormat,
    /// Query the metrics of this edge instead of rendering.
    pub edge: Option<(String, String)>,
    pub output: Option<String>,
}

impl TopoOptions {
    pub fn from_args(args: RenderArgs, output: Option<String>) -> Result<Self> {
        let edge = match args.edge {
            None => None,
            Some(ids) => match <[String; 2]>::try_from(ids) {
                Ok([src, dst]) => Some((src, dst)),
                Err(ids) => {
                    return Err(Error::invalid_argument(format!(
                        "--edge takes SRC and DST, got {} values",
                        ids.len()
                    )));
                }
            },
        };
        Ok(Self {
            report: args.report,
            topology: TopologyKind::parse(&args.topology)?,
            show_unconnected: args.show_unconnected,
            format: args.format,
            edge,
            output,
        })
    }
}

/// Read a report from `path`, or stdin when `path` is `-`.
pub fn load_report(path: &str) -> Result<Report> {
    if path == "-" {
        return Report::from_reader(io::stdin().lock());
    }
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => Error::file_not_found(path)
            .with_operation("cli::load_report")
            .set_source(e),
        _ => Error::from(e)
            .with_operation("cli::load_report")
            .with_context("path", path),
    })?;
    Report::from_reader(BufReader::new(file))
}

/// Main entry point
pub fn run_main(opts: &TopoOptions) -> Result<String> {
    let report = load_report(&opts.report)?;
    let sink = Arc::new(CollectingSink::new());
    let render_options = RenderOptions {
        show_unconnected: opts.show_unconnected,
        sink: sink.clone(),
    };
    let renderer = renderer_for(opts.topology, &render_options);

    let output = match &opts.edge {
        Some((src, dst)) => {
            let metadata = renderer.edge_metadata(&report, src, dst);
            to_json(&metadata)?
        }
        None => {
            let nodes = renderer.render(&report);
            tracing::info!(
                topology = %opts.topology,
                nodes = nodes.len(),
                "rendered"
            );
            match opts.format {
                OutputFormat::Json => to_json(&nodes)?,
                OutputFormat::Dot => topo_dot::render_dot(&nodes),
            }
        }
    };

    for diagnostic in sink.take() {
        tracing::warn!(
            kind = %diagnostic.kind,
            operation = diagnostic.operation,
            "skipped: {}",
            diagnostic.message
        );
    }
    Ok(output)
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| {
        Error::serialization_failed(e.to_string())
            .with_operation("cli::to_json")
            .set_source(e)
    })
}
