mod args;

use std::io::Write;

use anyhow::{Context, Result, bail};
use callgraph_core::dot::call_graph_dot;
use callgraph_core::model::SymbolTable;
use callgraph_core::parsers::{TraceOptions, parse_trace};
use callgraph_core::render::{GraphvizRasterizer, Rasterizer, render_image};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::args::Args;

fn main() -> Result<()> {
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    run(&args)
}

fn run(args: &Args) -> Result<()> {
    if !args.trace_file.exists() {
        bail!("trace file not found: {}", args.trace_file.display());
    }
    let symbols_path = args.symbols_path();
    if !symbols_path.exists() {
        bail!("symbols file not found: {}", symbols_path.display());
    }

    let symbols_data = std::fs::read(&symbols_path)
        .with_context(|| format!("failed to read {}", symbols_path.display()))?;
    let symbols = SymbolTable::from_json(&symbols_data)
        .with_context(|| format!("failed to parse {}", symbols_path.display()))?;
    tracing::debug!(symbols = symbols.len(), path = %symbols_path.display(), "loaded symbols");

    let trace_data = std::fs::read(&args.trace_file)
        .with_context(|| format!("failed to read {}", args.trace_file.display()))?;
    let options = TraceOptions { strict: args.strict };
    let tree = parse_trace(&trace_data, &symbols, &options)
        .with_context(|| format!("failed to process {}", args.trace_file.display()))?;

    let mut stdout = std::io::stdout().lock();
    if args.json {
        serde_json::to_writer_pretty(&mut stdout, &tree)?;
        writeln!(stdout)?;
        return Ok(());
    }

    let dot = call_graph_dot(&tree)?;
    writeln!(stdout, "{dot}")?;
    stdout.flush()?;

    let rasterizer = (!args.no_render)
        .then(|| GraphvizRasterizer::new(&args.dot_program, args.format.into()));
    render_image(
        &dot,
        &args.image_path(),
        rasterizer.as_ref().map(|r| r as &dyn Rasterizer),
    );
    Ok(())
}
