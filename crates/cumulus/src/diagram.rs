//! The scoped diagram builder.
//!
//! [`Diagram`] wraps a [`Graph`] under construction together with the
//! cluster-context stack that makes nesting in declaration order map to
//! containment in the model: [`Diagram::node`] always attaches to
//! whichever cluster is currently active, so callers never thread parent
//! references by hand.
//!
//! The context stack is an ordinary field of the builder, not process
//! state. Two builders never interfere, and handles from one reject use in
//! the other.
//!
//! Cluster scopes follow acquire/guaranteed-release: [`ClusterScope`]
//! seals its cluster and restores the previous context on `end()` and on
//! drop, so an early `?` return inside a scope cannot leave the stack
//! unbalanced or the cluster open.

use std::path::{Path, PathBuf};

use log::{debug, warn};

use cumulus_core::{Category, ClusterHandle, EdgeAttrs, EdgeHandle, Graph, NodeHandle};

use crate::{
    config::AppConfig,
    error::CumulusError,
    export::{GraphvizRenderer, OutputFormat, RenderResult},
};

/// Builder for one diagram: a graph under construction plus the stack of
/// currently open cluster scopes.
///
/// Consumed by [`Diagram::finish`] (returning the sealed [`Graph`]) or by
/// the [`Diagram::render`] family (finish + render in one call). A build
/// that errors mid-declaration never writes an image: rendering only
/// happens after a clean finish.
///
/// # Examples
///
/// ```rust,no_run
/// use cumulus::{Category, Diagram, EdgeAttrs};
///
/// # fn main() -> Result<(), cumulus::CumulusError> {
/// let mut diagram = Diagram::new("Checkout");
/// let gateway = diagram.node("API Gateway", Category::Gateway)?;
/// let workers = diagram.cluster("Workers", |scope| {
///     Ok(vec![
///         scope.node("Billing", Category::Function)?,
///         scope.node("Shipping", Category::Function)?,
///     ])
/// })?;
/// diagram.fan_out_with(gateway, workers, EdgeAttrs::new().with_label("invoke"))?;
/// diagram.render()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Diagram {
    graph: Graph,
    stack: Vec<ClusterHandle>,
    config: AppConfig,
}

impl Diagram {
    /// Creates a builder for a diagram with the given title and default
    /// configuration.
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_config(title, AppConfig::default())
    }

    /// Creates a builder with an explicit [`AppConfig`].
    pub fn with_config(title: impl Into<String>, config: AppConfig) -> Self {
        let graph = Graph::new(title);
        debug!(title = graph.title(); "Started diagram build");
        Diagram {
            graph,
            stack: Vec::new(),
            config,
        }
    }

    /// The graph under construction, for inspection.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// The diagram title.
    pub fn title(&self) -> &str {
        self.graph.title()
    }

    fn current(&self) -> Option<ClusterHandle> {
        self.stack.last().copied()
    }

    /// Declares a node under the currently active cluster (the diagram
    /// root when no cluster scope is open).
    ///
    /// # Errors
    ///
    /// Propagates [`GraphError`](cumulus_core::GraphError) conditions from
    /// the graph model.
    pub fn node(&mut self, label: impl Into<String>, category: Category) -> Result<NodeHandle, CumulusError> {
        Ok(self.graph.add_node(label, category, self.current())?)
    }

    /// Opens a cluster scope under the currently active cluster and makes
    /// it the new active context.
    ///
    /// The returned guard seals the cluster and restores the previous
    /// context when it ends, on every exit path. Prefer
    /// [`Diagram::cluster`] unless the imperative form is needed.
    ///
    /// # Errors
    ///
    /// Fails if the active cluster is already sealed.
    pub fn begin_cluster(&mut self, label: impl Into<String>) -> Result<ClusterScope<'_>, CumulusError> {
        let handle = self.graph.add_cluster(label, self.current())?;
        self.stack.push(handle);
        Ok(ClusterScope {
            diagram: self,
            handle,
            closed: false,
        })
    }

    /// Declares a cluster scope with a closure body.
    ///
    /// The cluster is sealed and the previous context restored when the
    /// closure returns, whether it succeeded or not.
    ///
    /// # Errors
    ///
    /// Returns the closure's error after closing the scope.
    pub fn cluster<R>(
        &mut self,
        label: impl Into<String>,
        build: impl FnOnce(&mut ClusterScope<'_>) -> Result<R, CumulusError>,
    ) -> Result<R, CumulusError> {
        let mut scope = self.begin_cluster(label)?;
        let result = build(&mut scope);
        let closed = scope.end();
        let value = result?;
        closed?;
        Ok(value)
    }

    /// Connects two nodes with a plain directed edge.
    ///
    /// # Errors
    ///
    /// Fails with the unknown-node or cross-graph condition; a failed
    /// connect never appends to the edge list.
    pub fn connect(&mut self, source: NodeHandle, destination: NodeHandle) -> Result<EdgeHandle, CumulusError> {
        self.connect_with(source, destination, EdgeAttrs::default())
    }

    /// Connects two nodes with explicit [`EdgeAttrs`].
    ///
    /// # Errors
    ///
    /// Same conditions as [`Diagram::connect`].
    pub fn connect_with(
        &mut self,
        source: NodeHandle,
        destination: NodeHandle,
        attrs: EdgeAttrs,
    ) -> Result<EdgeHandle, CumulusError> {
        Ok(self.graph.connect(source, destination, attrs)?)
    }

    /// Connects one source to each destination, in the given order.
    ///
    /// Expands to one edge per destination; the edge list keeps the
    /// left-to-right declaration order.
    ///
    /// # Errors
    ///
    /// Stops at the first failing destination; edges declared before it
    /// remain.
    pub fn fan_out(
        &mut self,
        source: NodeHandle,
        destinations: impl IntoIterator<Item = NodeHandle>,
    ) -> Result<Vec<EdgeHandle>, CumulusError> {
        self.fan_out_with(source, destinations, EdgeAttrs::default())
    }

    /// [`Diagram::fan_out`] with shared [`EdgeAttrs`] for every edge.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Diagram::fan_out`].
    pub fn fan_out_with(
        &mut self,
        source: NodeHandle,
        destinations: impl IntoIterator<Item = NodeHandle>,
        attrs: EdgeAttrs,
    ) -> Result<Vec<EdgeHandle>, CumulusError> {
        destinations
            .into_iter()
            .map(|destination| self.connect_with(source, destination, attrs.clone()))
            .collect()
    }

    /// Connects each source to one destination, in the given order.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Diagram::fan_out`].
    pub fn fan_in(
        &mut self,
        sources: impl IntoIterator<Item = NodeHandle>,
        destination: NodeHandle,
    ) -> Result<Vec<EdgeHandle>, CumulusError> {
        self.fan_in_with(sources, destination, EdgeAttrs::default())
    }

    /// [`Diagram::fan_in`] with shared [`EdgeAttrs`] for every edge.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Diagram::fan_out`].
    pub fn fan_in_with(
        &mut self,
        sources: impl IntoIterator<Item = NodeHandle>,
        destination: NodeHandle,
        attrs: EdgeAttrs,
    ) -> Result<Vec<EdgeHandle>, CumulusError> {
        sources
            .into_iter()
            .map(|source| self.connect_with(source, destination, attrs.clone()))
            .collect()
    }

    /// Finalizes the build: seals any clusters still open (innermost
    /// first) and the root, and returns the finished graph.
    ///
    /// # Errors
    ///
    /// Propagates sealing failures (not reachable through this builder's
    /// own handles).
    pub fn finish(mut self) -> Result<Graph, CumulusError> {
        while let Some(top) = self.stack.pop() {
            self.graph.seal(top)?;
        }
        let root = self.graph.root_handle();
        self.graph.seal(root)?;
        debug!(
            nodes = self.graph.nodes_count(),
            edges = self.graph.edges_count(),
            clusters = self.graph.clusters_count();
            "Diagram build finished"
        );
        Ok(self.graph)
    }

    /// Finishes the build and renders it to
    /// `<slugified-title>.<ext>` in the working directory, in the default
    /// format.
    ///
    /// # Errors
    ///
    /// Propagates finalization and rendering failures; no image is
    /// written unless finalization succeeded.
    pub fn render(self) -> Result<RenderResult, CumulusError> {
        let format = OutputFormat::default();
        self.render_inner(format, None)
    }

    /// Finishes the build and renders it in the given format to
    /// `<slugified-title>.<ext>` in the working directory.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Diagram::render`].
    pub fn render_as(self, format: OutputFormat) -> Result<RenderResult, CumulusError> {
        self.render_inner(format, None)
    }

    /// Finishes the build and renders it to an explicit path and format.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Diagram::render`].
    pub fn render_to(
        self,
        output_path: impl AsRef<Path>,
        format: OutputFormat,
    ) -> Result<RenderResult, CumulusError> {
        self.render_inner(format, Some(output_path.as_ref().to_path_buf()))
    }

    fn render_inner(
        self,
        format: OutputFormat,
        explicit_path: Option<PathBuf>,
    ) -> Result<RenderResult, CumulusError> {
        let config = self.config.clone();
        let graph = self.finish()?;

        let output_path = explicit_path.unwrap_or_else(|| {
            PathBuf::from(format!("{}.{}", slugify(graph.title()), format.extension()))
        });

        let mut renderer = GraphvizRenderer::new()
            .with_format(format)
            .with_direction(config.layout().direction());
        if let Some(color) = config.style().background_color() {
            renderer = renderer.with_background(color);
        }

        Ok(renderer.render(&graph, &output_path)?)
    }

    fn close_cluster(&mut self, handle: ClusterHandle) -> Result<(), CumulusError> {
        // Pops the context stack down to and including `handle`. Scopes
        // above it can only be left behind by a leaked guard; they get
        // sealed on the way down.
        while let Some(top) = self.stack.pop() {
            self.graph.seal(top)?;
            if top == handle {
                break;
            }
        }
        Ok(())
    }
}

/// Guard for an open cluster: exposes the declaration surface of
/// [`Diagram`] scoped to its cluster, and seals it on exit.
#[derive(Debug)]
pub struct ClusterScope<'d> {
    diagram: &'d mut Diagram,
    handle: ClusterHandle,
    closed: bool,
}

impl ClusterScope<'_> {
    /// Handle to the cluster this scope is building.
    pub fn handle(&self) -> ClusterHandle {
        self.handle
    }

    /// Declares a node inside this cluster (or an open nested scope).
    ///
    /// # Errors
    ///
    /// Same conditions as [`Diagram::node`].
    pub fn node(&mut self, label: impl Into<String>, category: Category) -> Result<NodeHandle, CumulusError> {
        self.diagram.node(label, category)
    }

    /// Opens a nested cluster scope.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Diagram::begin_cluster`].
    pub fn begin_cluster(&mut self, label: impl Into<String>) -> Result<ClusterScope<'_>, CumulusError> {
        self.diagram.begin_cluster(label)
    }

    /// Declares a nested cluster scope with a closure body.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Diagram::cluster`].
    pub fn cluster<R>(
        &mut self,
        label: impl Into<String>,
        build: impl FnOnce(&mut ClusterScope<'_>) -> Result<R, CumulusError>,
    ) -> Result<R, CumulusError> {
        self.diagram.cluster(label, build)
    }

    /// Connects two nodes; see [`Diagram::connect`].
    ///
    /// # Errors
    ///
    /// Same conditions as [`Diagram::connect`].
    pub fn connect(&mut self, source: NodeHandle, destination: NodeHandle) -> Result<EdgeHandle, CumulusError> {
        self.diagram.connect(source, destination)
    }

    /// Connects two nodes with attributes; see [`Diagram::connect_with`].
    ///
    /// # Errors
    ///
    /// Same conditions as [`Diagram::connect`].
    pub fn connect_with(
        &mut self,
        source: NodeHandle,
        destination: NodeHandle,
        attrs: EdgeAttrs,
    ) -> Result<EdgeHandle, CumulusError> {
        self.diagram.connect_with(source, destination, attrs)
    }

    /// Closes the scope: seals the cluster and restores the previous
    /// context.
    ///
    /// Dropping the guard does the same; `end` exists to surface errors.
    ///
    /// # Errors
    ///
    /// Propagates sealing failures.
    pub fn end(mut self) -> Result<(), CumulusError> {
        self.closed = true;
        self.diagram.close_cluster(self.handle)
    }
}

impl Drop for ClusterScope<'_> {
    fn drop(&mut self) {
        if !self.closed {
            if let Err(err) = self.diagram.close_cluster(self.handle) {
                warn!(err:?; "Sealing cluster on scope drop failed");
            }
        }
    }
}

/// Derives the default output file stem from a diagram title: lowercase,
/// alphanumeric runs joined by `-`.
///
/// # Examples
///
/// ```
/// assert_eq!(cumulus::slugify("Web Shop (Staging)"), "web-shop-staging");
/// ```
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_separator = false;
    for ch in title.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_separator = true;
        }
    }
    if slug.is_empty() {
        slug.push_str("diagram");
    }
    slug
}
