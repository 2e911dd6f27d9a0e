//! CLI logic for the Cumulus diagram tool.
//!
//! This module contains the core CLI logic: it loads configuration,
//! builds the bundled showcase diagram, and renders it through the
//! library's pipeline.

mod args;
mod config;
mod showcase;

pub use args::Args;

use std::str::FromStr;

use log::info;

use cumulus::{CumulusError, OutputFormat, RenderResult};

/// Run the Cumulus CLI application
///
/// Builds the showcase diagram and renders it to the requested path and
/// format.
///
/// # Errors
///
/// Returns `CumulusError` for:
/// - Configuration loading errors
/// - Declaration errors while building the diagram
/// - Rendering errors (including a missing layout engine)
pub fn run(args: &Args) -> Result<RenderResult, CumulusError> {
    let format = OutputFormat::from_str(&args.format)
        .map_err(|err| CumulusError::Io(std::io::Error::other(err)))?;

    info!(
        output:? = args.output,
        format = format.to_string();
        "Rendering showcase diagram"
    );

    // Load configuration
    let app_config = config::load_config(args.config.as_ref())?;

    // Build and render the diagram
    let diagram = showcase::build(app_config)?;
    let result = match &args.output {
        Some(path) => diagram.render_to(path, format)?,
        None => diagram.render_as(format)?,
    };

    info!(output_file = result.output_path().display().to_string(); "Diagram rendered");
    Ok(result)
}
