//! Command-line options for the `topo` binary.

use clap::{Args, ValueEnum};

/// How rendered output is printed.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Pretty-printed JSON node set.
    #[default]
    Json,
    /// Graphviz digraph.
    Dot,
}

/// Options selecting what to render from a report.
#[derive(Args, Debug, Clone)]
pub struct RenderArgs {
    /// Report to read, as JSON; `-` reads stdin
    #[arg(long, value_name = "FILE", default_value = "-")]
    pub report: String,

    /// Topology view: endpoints, processes, process-names, addresses, hosts
    #[arg(short = 't', long, value_name = "KIND", default_value = "endpoints")]
    pub topology: String,

    /// Keep nodes that have no connectivity
    #[arg(long, default_value_t = false)]
    pub show_unconnected: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Print the metrics of the edge SRC -> DST instead of rendering
    #[arg(long, num_args = 2, value_names = ["SRC", "DST"])]
    pub edge: Option<Vec<String>>,
}
