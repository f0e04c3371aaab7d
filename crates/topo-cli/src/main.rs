use clap::Parser;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[cfg(target_env = "msvc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use topo::{RenderArgs, TopoOptions, run_main};
use topo_error::Result;

#[derive(Parser, Debug)]
#[command(
    name = "topo",
    about = "topo: aggregate raw topology reports into renderable graphs",
    version
)]
pub struct Cli {
    #[command(flatten)]
    render: RenderArgs,

    /// Output file path (writes to file instead of stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: Option<String>,
}

pub fn run(args: Cli) -> Result<()> {
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    }

    let opts = TopoOptions::from_args(args.render, args.output)?;
    let output = run_main(&opts)?;

    if let Some(ref path) = opts.output {
        std::fs::write(path, &output)?;
        tracing::info!(path, "output written");
    } else {
        println!("{output}");
    }
    Ok(())
}

pub fn main() -> Result<()> {
    let args = Cli::parse();
    run(args)
}
