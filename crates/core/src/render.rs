//! Optional rasterization of DOT text through an external layout program.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
    #[error("i/o error while rendering: {0}")]
    Io(#[from] std::io::Error),
    #[error("renderer exited with {status}: {stderr}")]
    Failed { status: ExitStatus, stderr: String },
}

/// Image formats the renderer is asked to produce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Png,
    Svg,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Svg => "svg",
        }
    }
}

/// Turns a DOT description into an image file.
pub trait Rasterizer {
    /// Write the image for `dot` to `output` and return the written path.
    fn rasterize(&self, dot: &str, output: &Path) -> Result<PathBuf, RenderError>;
}

/// Pipes DOT into the Graphviz `dot` program.
#[derive(Debug, Clone)]
pub struct GraphvizRasterizer {
    pub program: PathBuf,
    pub format: OutputFormat,
}

impl GraphvizRasterizer {
    pub fn new(program: impl Into<PathBuf>, format: OutputFormat) -> Self {
        Self {
            program: program.into(),
            format,
        }
    }
}

impl Default for GraphvizRasterizer {
    fn default() -> Self {
        Self::new("dot", OutputFormat::Png)
    }
}

impl Rasterizer for GraphvizRasterizer {
    fn rasterize(&self, dot: &str, output: &Path) -> Result<PathBuf, RenderError> {
        let output = output.with_extension(self.format.extension());
        let mut child = Command::new(&self.program)
            .arg(format!("-T{}", self.format.extension()))
            .arg("-o")
            .arg(&output)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| RenderError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(dot.as_bytes())?;
        }

        let result = child.wait_with_output()?;
        if !result.status.success() {
            return Err(RenderError::Failed {
                status: result.status,
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }
        Ok(output)
    }
}

/// Rasterize `dot` to `output` if a rasterizer is available.
///
/// Never fails: a missing rasterizer or a rendering error is logged and
/// yields `None`, leaving the DOT text as the primary result.
pub fn render_image(
    dot: &str,
    output: &Path,
    rasterizer: Option<&dyn Rasterizer>,
) -> Option<PathBuf> {
    let Some(rasterizer) = rasterizer else {
        tracing::info!("no renderer configured, skipping image output");
        return None;
    };
    match rasterizer.rasterize(dot, output) {
        Ok(path) => {
            tracing::info!(path = %path.display(), "call graph saved");
            Some(path)
        }
        Err(err) => {
            tracing::warn!("could not render call graph image: {err}");
            None
        }
    }
}
