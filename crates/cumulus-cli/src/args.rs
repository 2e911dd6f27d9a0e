//! Command-line argument definitions for the Cumulus CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control the output path and format,
//! configuration file selection, and logging verbosity.

use clap::Parser;

/// Command-line arguments for the Cumulus diagram tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the output image file (defaults to the slugified diagram
    /// title in the working directory)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Output format (png, svg, pdf)
    #[arg(short, long, default_value = "png")]
    pub format: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
