use std::path::{Path, PathBuf};

use callgraph_core::model::SymbolTable;
use callgraph_core::render::OutputFormat;
use clap::{Parser, ValueEnum};

/// Generate a call graph from a k-perf trace file.
///
/// The DOT description is written to stdout; if Graphviz is available the
/// graph is also rendered to an image next to the trace.
#[derive(Debug, Parser)]
#[command(name = "kperf-callgraph", version)]
pub struct Args {
    /// Trace file written by the instrumented program (e.g. trace_jvm_1.txt).
    pub trace_file: PathBuf,

    /// Symbols file. Defaults to the trace file name with `trace` replaced by `symbols`.
    #[arg(long)]
    pub symbols: Option<PathBuf>,

    /// Image path. Defaults to the trace path; the extension always follows --format.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = ImageFormat::Png)]
    pub format: ImageFormat,

    /// Graphviz layout program used for rendering.
    #[arg(long, default_value = "dot")]
    pub dot_program: PathBuf,

    /// Only print the DOT description.
    #[arg(long)]
    pub no_render: bool,

    /// Fail on exits that do not match the open method, and on unclosed methods.
    #[arg(long)]
    pub strict: bool,

    /// Print the aggregated call tree as JSON instead of DOT. Implies --no-render.
    #[arg(long)]
    pub json: bool,

    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ImageFormat {
    Png,
    Svg,
}

impl From<ImageFormat> for OutputFormat {
    fn from(format: ImageFormat) -> Self {
        match format {
            ImageFormat::Png => OutputFormat::Png,
            ImageFormat::Svg => OutputFormat::Svg,
        }
    }
}

impl Args {
    pub fn symbols_path(&self) -> PathBuf {
        self.symbols
            .clone()
            .unwrap_or_else(|| SymbolTable::default_path_for(&self.trace_file))
    }

    pub fn image_path(&self) -> PathBuf {
        let base: &Path = self.output.as_deref().unwrap_or(&self.trace_file);
        base.with_extension(OutputFormat::from(self.format).extension())
    }

    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}
