//! Rendering dispatch: DOT serialization and layout engine invocation.
//!
//! The finished [`Graph`] is translated into the engine's textual
//! graph-description language (see [`dot`]) and handed to Graphviz in a
//! single blocking call. There is no retry logic: diagram generation is
//! deterministic and idempotent, so on failure the caller fixes the
//! environment or the input and re-runs.

pub mod dot;

use std::{
    env, io,
    path::{Path, PathBuf},
};

use graphviz_rust::{
    cmd::{CommandArg, Format},
    exec, print,
    printer::PrinterContext,
};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use cumulus_core::Graph;

use crate::config::LayoutDirection;

/// Errors raised while serializing or rendering a graph.
#[derive(Debug, Error)]
pub enum Error {
    /// The external layout engine executable could not be located.
    /// Recoverable only by a caller-side environment fix; never retried.
    #[error("layout engine executable not found; searched PATH: {searched}")]
    EngineNotFound {
        /// The `PATH` value that was searched.
        searched: String,
    },

    /// The layout engine was found but failed mid-render.
    #[error("layout engine failed: {0}")]
    Engine(#[source] io::Error),

    /// The graph failed its final well-formedness check. The graph model
    /// prevents this structurally, so hitting it indicates an
    /// internal-consistency bug.
    #[error("serialization invariant violated: {0}")]
    Serialization(String),
}

/// Output image formats supported by the dispatcher.
///
/// The names match external configuration strings (snake_case).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Raster output (default).
    #[default]
    Png,
    /// Vector output.
    Svg,
    /// Print-ready vector output.
    Pdf,
}

impl OutputFormat {
    /// The file extension for this format.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Svg => "svg",
            OutputFormat::Pdf => "pdf",
        }
    }

    fn engine_format(self) -> Format {
        match self {
            OutputFormat::Png => Format::Png,
            OutputFormat::Svg => Format::Svg,
            OutputFormat::Pdf => Format::Pdf,
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "png" => Ok(Self::Png),
            "svg" => Ok(Self::Svg),
            "pdf" => Ok(Self::Pdf),
            _ => Err("Unsupported output format"),
        }
    }
}

impl From<OutputFormat> for &'static str {
    fn from(val: OutputFormat) -> Self {
        val.extension()
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Outcome of a successful render: where the image was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderResult {
    output_path: PathBuf,
}

impl RenderResult {
    /// The path of the image file that was produced.
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }
}

/// Serializes finished graphs to DOT and dispatches them to the Graphviz
/// engine.
///
/// # Examples
///
/// ```rust,no_run
/// use std::path::Path;
/// use cumulus::{Category, Diagram, GraphvizRenderer, OutputFormat};
///
/// # fn main() -> Result<(), cumulus::CumulusError> {
/// let mut diagram = Diagram::new("Minimal");
/// diagram.node("Only", Category::Service)?;
/// let graph = diagram.finish()?;
///
/// let renderer = GraphvizRenderer::new().with_format(OutputFormat::Svg);
/// println!("{}", renderer.to_dot(&graph)?);
/// renderer.render(&graph, Path::new("minimal.svg"))?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct GraphvizRenderer {
    format: OutputFormat,
    direction: LayoutDirection,
    background: Option<String>,
}

impl GraphvizRenderer {
    /// Creates a renderer with default format and direction.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the output image format.
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets the rank direction passed to the engine.
    pub fn with_direction(mut self, direction: LayoutDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Sets the diagram background color, passed through verbatim.
    pub fn with_background(mut self, color: impl Into<String>) -> Self {
        self.background = Some(color.into());
        self
    }

    /// Serializes the graph to its DOT description without invoking the
    /// engine.
    ///
    /// # Errors
    ///
    /// [`Error::Serialization`] if the graph fails the final
    /// well-formedness check.
    pub fn to_dot(&self, graph: &Graph) -> Result<String, Error> {
        let dot_graph = dot::build(graph, self.direction, self.background.as_deref())?;
        Ok(print(dot_graph, &mut PrinterContext::default()))
    }

    /// Renders the graph to exactly one image file at `output_path`,
    /// overwriting if present.
    ///
    /// The engine call is blocking and synchronous, with no timeout and
    /// no retry.
    ///
    /// # Errors
    ///
    /// - [`Error::Serialization`] if the graph fails its final
    ///   well-formedness check (no engine call is made).
    /// - [`Error::EngineNotFound`] when the engine executable is not on
    ///   the search path.
    /// - [`Error::Engine`] when the engine fails mid-render.
    pub fn render(&self, graph: &Graph, output_path: &Path) -> Result<RenderResult, Error> {
        let dot_graph = dot::build(graph, self.direction, self.background.as_deref())?;

        info!(
            output_path = output_path.display().to_string(),
            format = self.format.to_string();
            "Invoking layout engine"
        );

        exec(
            dot_graph,
            &mut PrinterContext::default(),
            vec![
                CommandArg::Format(self.format.engine_format()),
                CommandArg::Output(output_path.to_string_lossy().to_string()),
            ],
        )
        .map_err(|err| {
            if err.kind() == io::ErrorKind::NotFound {
                Error::EngineNotFound {
                    searched: searched_path(),
                }
            } else {
                Error::Engine(err)
            }
        })?;

        debug!("Layout engine finished");
        Ok(RenderResult {
            output_path: output_path.to_path_buf(),
        })
    }
}

fn searched_path() -> String {
    env::var("PATH").unwrap_or_else(|_| "<unset>".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_round_trips_through_its_name() {
        for format in [OutputFormat::Png, OutputFormat::Svg, OutputFormat::Pdf] {
            assert_eq!(format.extension().parse::<OutputFormat>(), Ok(format));
            assert_eq!(format.to_string(), format.extension());
        }
    }

    #[test]
    fn unknown_format_is_rejected() {
        assert!("gif".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn default_format_is_raster() {
        assert_eq!(OutputFormat::default(), OutputFormat::Png);
        assert_eq!(OutputFormat::default().extension(), "png");
    }
}
