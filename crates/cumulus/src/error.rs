//! Error types for Cumulus operations.
//!
//! This module provides the main error type [`CumulusError`] which wraps
//! the error conditions that can occur while building and rendering a
//! diagram. Structural errors originate in `cumulus-core`; export errors
//! cover DOT serialization and layout engine invocation.

use std::io;

use thiserror::Error;

use cumulus_core::GraphError;

use crate::export;

/// The main error type for Cumulus operations.
///
/// All failures are terminal for the current build: errors propagate
/// synchronously from the point of violation and nothing is retried.
#[derive(Debug, Error)]
pub enum CumulusError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Export error: {0}")]
    Export(#[from] export::Error),
}

impl CumulusError {
    /// Whether this error is the structural cross-graph violation.
    pub fn is_cross_graph(&self) -> bool {
        matches!(
            self,
            CumulusError::Graph(GraphError::CrossGraphReference { .. })
        )
    }
}
