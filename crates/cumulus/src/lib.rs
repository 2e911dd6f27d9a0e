//! Cumulus - a declarative builder for architecture diagrams.
//!
//! A diagram is declared as typed nodes grouped into nested clusters and
//! connected by labeled directed edges, then handed to Graphviz (consumed
//! as a black box through its DOT input language) to do the actual layout
//! and image rendering.
//!
//! # Pipeline
//!
//! ```text
//! Declarations (Diagram builder API)
//!     ↓ cluster-context stack
//! Graph model (cumulus-core)
//!     ↓ finish: seal clusters
//! Finished Graph
//!     ↓ export::dot
//! DOT description
//!     ↓ layout engine (Graphviz)
//! Image file (PNG/SVG/PDF)
//! ```
//!
//! # Examples
//!
//! ```rust,no_run
//! use cumulus::{Category, Diagram};
//!
//! # fn main() -> Result<(), cumulus::CumulusError> {
//! let mut diagram = Diagram::new("Web Shop");
//!
//! let user = diagram.node("User", Category::User)?;
//! let (app, db) = diagram.cluster("Backend", |scope| {
//!     let app = scope.node("App Server", Category::Compute)?;
//!     let db = scope.node("Orders", Category::Database)?;
//!     Ok((app, db))
//! })?;
//!
//! diagram.connect(user, app)?;
//! diagram.connect(app, db)?;
//!
//! // Writes ./web-shop.png
//! diagram.render()?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod export;

mod diagram;
mod error;

pub use cumulus_core::{
    Category, ClusterHandle, EdgeAttrs, EdgeHandle, EdgeStyle, Graph, NodeHandle, category, graph,
    identifier,
};

pub use diagram::{ClusterScope, Diagram, slugify};
pub use error::CumulusError;
pub use export::{GraphvizRenderer, OutputFormat, RenderResult};
