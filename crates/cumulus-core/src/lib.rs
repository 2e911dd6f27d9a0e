//! Cumulus Core Types and Definitions
//!
//! This crate provides the foundational types for the Cumulus diagram
//! pipeline. It includes:
//!
//! - **Identifiers**: Per-graph element identities and copyable handles
//!   ([`identifier`] module)
//! - **Categories**: The closed set of node categories and their visual
//!   style descriptors ([`category`] module)
//! - **Graph**: The containment tree of clusters and nodes plus the edge
//!   list ([`graph`] module)
//!
//! This crate performs no I/O; serialization to the layout engine's input
//! language and engine invocation live in the `cumulus` crate.

pub mod category;
pub mod graph;
pub mod identifier;

pub use category::{Category, StyleDescriptor};
pub use graph::{EdgeAttrs, EdgeStyle, Graph, GraphError};
pub use identifier::{ClusterHandle, EdgeHandle, GraphId, NodeHandle};
