//! The graph model: clusters, nodes, edges, and the flat registry.
//!
//! This module provides the containment tree (clusters holding nodes and
//! sub-clusters) and the ordered edge list that together describe one
//! diagram. The structure is append-only: elements are created, never
//! removed, and a cluster can be sealed to freeze its child lists.
//!
//! # Invariants
//!
//! Enforced structurally, by construction order, never by post-hoc fixups:
//!
//! - Containment forms a tree. Every node and cluster has exactly one
//!   parent (the root cluster has none), assigned once at creation.
//! - Both endpoints of an edge exist in the registry at edge-creation
//!   time. A failed [`Graph::connect`] never mutates the edge list.
//! - Handles from a different [`Graph`] instance are rejected, so an edge
//!   can never point outside its own graph.
//!
//! Parallel edges and self-loops are permitted; insertion order of nodes,
//! clusters, and edges is preserved everywhere.

use thiserror::Error;

use crate::{
    category::Category,
    identifier::{ClusterHandle, ClusterId, EdgeHandle, EdgeId, GraphId, NodeHandle, NodeId},
};

/// Errors raised by structural graph operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// An edge declaration referenced a node identity that is not in the
    /// registry.
    #[error("unknown node {node}: not present in this graph's registry")]
    UnknownNode {
        /// The handle that failed to resolve.
        node: NodeHandle,
    },

    /// A handle minted by a different graph instance was used.
    #[error("handle belongs to graph {found}, but this graph is {expected}")]
    CrossGraphReference {
        /// The graph the operation ran against.
        expected: GraphId,
        /// The graph the offending handle belongs to.
        found: GraphId,
    },

    /// Sequential identity allocation collided. Indicates a programming
    /// error (registry exhaustion); not reachable under normal use.
    #[error("identity allocation collided: element registry is exhausted")]
    DuplicateIdentity,

    /// A node or sub-cluster was declared under a cluster whose
    /// construction scope already closed.
    #[error("cluster \"{label}\" is sealed and can no longer be extended")]
    SealedCluster {
        /// Label of the sealed cluster.
        label: String,
    },
}

/// One labeled vertex of the diagram.
///
/// Immutable after creation; the owning cluster is fixed once and never
/// reassigned.
#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    label: String,
    category: Category,
    cluster: ClusterId,
}

impl Node {
    /// This node's identity within its graph.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The display label. May contain line breaks.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The category selecting this node's visual style.
    pub fn category(&self) -> Category {
        self.category
    }

    /// Identity of the cluster this node belongs to (the root cluster for
    /// top-level nodes).
    pub fn cluster(&self) -> ClusterId {
        self.cluster
    }
}

/// A named grouping of nodes and sub-clusters.
#[derive(Debug, Clone)]
pub struct Cluster {
    id: ClusterId,
    label: String,
    parent: Option<ClusterId>,
    nodes: Vec<NodeId>,
    clusters: Vec<ClusterId>,
    sealed: bool,
}

impl Cluster {
    /// This cluster's identity within its graph.
    pub fn id(&self) -> ClusterId {
        self.id
    }

    /// The display label (empty for the root cluster).
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The parent cluster, or `None` for the root.
    pub fn parent(&self) -> Option<ClusterId> {
        self.parent
    }

    /// Direct child nodes, in declaration order.
    pub fn node_ids(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Direct sub-clusters, in declaration order.
    pub fn cluster_ids(&self) -> &[ClusterId] {
        &self.clusters
    }

    /// Whether this cluster's construction scope has closed.
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }
}

/// A directed (or undirected) relation between two nodes.
///
/// Does not own its endpoints; they are identity references into the
/// graph's node registry.
#[derive(Debug, Clone)]
pub struct Edge {
    id: EdgeId,
    source: NodeId,
    destination: NodeId,
    attrs: EdgeAttrs,
}

impl Edge {
    /// This edge's identity within its graph.
    pub fn id(&self) -> EdgeId {
        self.id
    }

    /// Identity of the origin node.
    pub fn source(&self) -> NodeId {
        self.source
    }

    /// Identity of the target node.
    pub fn destination(&self) -> NodeId {
        self.destination
    }

    /// The optional edge label.
    pub fn label(&self) -> Option<&str> {
        self.attrs.label.as_deref()
    }

    /// The line style.
    pub fn style(&self) -> EdgeStyle {
        self.attrs.style
    }

    /// Whether the edge is directed (`false` renders without arrowheads).
    pub fn directed(&self) -> bool {
        self.attrs.directed
    }
}

/// Line styles for edges.
///
/// The names match the layout engine's `style` attribute values
/// (snake_case in configuration).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeStyle {
    /// Solid line (default).
    #[default]
    Solid,
    /// Dashed line.
    Dashed,
    /// Dotted line.
    Dotted,
    /// Thick line.
    Bold,
}

impl From<EdgeStyle> for &'static str {
    fn from(val: EdgeStyle) -> Self {
        match val {
            EdgeStyle::Solid => "solid",
            EdgeStyle::Dashed => "dashed",
            EdgeStyle::Dotted => "dotted",
            EdgeStyle::Bold => "bold",
        }
    }
}

impl std::fmt::Display for EdgeStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s: &'static str = (*self).into();
        write!(f, "{s}")
    }
}

/// Declarative attributes of an edge: optional label, line style, and
/// directedness.
///
/// Follows the immutable `with_*` builder convention.
///
/// # Examples
///
/// ```
/// use cumulus_core::{EdgeAttrs, EdgeStyle};
///
/// let attrs = EdgeAttrs::new().with_label("HTTPS").with_style(EdgeStyle::Dashed);
/// assert_eq!(attrs.label(), Some("HTTPS"));
/// assert!(attrs.directed());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeAttrs {
    label: Option<String>,
    style: EdgeStyle,
    directed: bool,
}

impl Default for EdgeAttrs {
    fn default() -> Self {
        Self {
            label: None,
            style: EdgeStyle::Solid,
            directed: true,
        }
    }
}

impl EdgeAttrs {
    /// Creates default attributes: unlabeled, solid, directed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the edge label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets the line style.
    pub fn with_style(mut self, style: EdgeStyle) -> Self {
        self.style = style;
        self
    }

    /// Marks the edge as undirected (rendered without arrowheads).
    pub fn undirected(mut self) -> Self {
        self.directed = false;
        self
    }

    /// The optional label.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// The line style.
    pub fn style(&self) -> EdgeStyle {
        self.style
    }

    /// Whether the edge is directed.
    pub fn directed(&self) -> bool {
        self.directed
    }
}

/// The finished diagram artifact: the containment tree plus flat
/// registries for nodes, clusters, and edges.
///
/// The graph exclusively owns all of its elements. Handles returned by the
/// mutation methods are non-owning identity references tagged with this
/// graph's [`GraphId`], so a handle can never be replayed against another
/// graph instance.
#[derive(Debug)]
pub struct Graph {
    id: GraphId,
    title: String,
    root: ClusterId,
    nodes: Vec<Node>,
    clusters: Vec<Cluster>,
    edges: Vec<Edge>,
}

impl Graph {
    /// Creates an empty graph with an unsealed root cluster.
    pub fn new(title: impl Into<String>) -> Self {
        let root = ClusterId::new(0);
        Graph {
            id: GraphId::next(),
            title: title.into(),
            root,
            nodes: Vec::new(),
            clusters: vec![Cluster {
                id: root,
                label: String::new(),
                parent: None,
                nodes: Vec::new(),
                clusters: Vec::new(),
                sealed: false,
            }],
            edges: Vec::new(),
        }
    }

    /// This graph's process-unique identity.
    pub fn id(&self) -> GraphId {
        self.id
    }

    /// The diagram title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The root cluster.
    pub fn root(&self) -> &Cluster {
        &self.clusters[self.root.index()]
    }

    /// Handle to the root cluster.
    pub fn root_handle(&self) -> ClusterHandle {
        ClusterHandle::new(self.id, self.root)
    }

    /// Appends a new node under the given cluster (the root if `None`).
    ///
    /// # Errors
    ///
    /// - [`GraphError::CrossGraphReference`] if the cluster handle belongs
    ///   to another graph.
    /// - [`GraphError::SealedCluster`] if the cluster's scope has closed.
    /// - [`GraphError::DuplicateIdentity`] on identity allocation collision.
    pub fn add_node(
        &mut self,
        label: impl Into<String>,
        category: Category,
        cluster: Option<ClusterHandle>,
    ) -> Result<NodeHandle, GraphError> {
        let parent = self.resolve_cluster(cluster)?;
        self.ensure_open(parent)?;

        let id = NodeId::new(Self::allocate(self.nodes.len())?);
        self.nodes.push(Node {
            id,
            label: label.into(),
            category,
            cluster: parent,
        });
        self.clusters[parent.index()].nodes.push(id);

        Ok(NodeHandle::new(self.id, id))
    }

    /// Appends a new cluster under the given parent (the root if `None`).
    ///
    /// # Errors
    ///
    /// Same conditions as [`Graph::add_node`].
    pub fn add_cluster(
        &mut self,
        label: impl Into<String>,
        parent: Option<ClusterHandle>,
    ) -> Result<ClusterHandle, GraphError> {
        let parent = self.resolve_cluster(parent)?;
        self.ensure_open(parent)?;

        let id = ClusterId::new(Self::allocate(self.clusters.len())?);
        self.clusters.push(Cluster {
            id,
            label: label.into(),
            parent: Some(parent),
            nodes: Vec::new(),
            clusters: Vec::new(),
            sealed: false,
        });
        self.clusters[parent.index()].clusters.push(id);

        Ok(ClusterHandle::new(self.id, id))
    }

    /// Appends a new edge between two already-registered nodes.
    ///
    /// Self-loops and parallel edges are permitted; edges keep their
    /// insertion order.
    ///
    /// # Errors
    ///
    /// - [`GraphError::CrossGraphReference`] if either handle belongs to
    ///   another graph.
    /// - [`GraphError::UnknownNode`] if either handle does not resolve in
    ///   the registry. The edge list is left unchanged.
    pub fn connect(
        &mut self,
        source: NodeHandle,
        destination: NodeHandle,
        attrs: EdgeAttrs,
    ) -> Result<EdgeHandle, GraphError> {
        self.resolve_node(source)?;
        self.resolve_node(destination)?;

        let id = EdgeId::new(Self::allocate(self.edges.len())?);
        self.edges.push(Edge {
            id,
            source: source.id(),
            destination: destination.id(),
            attrs,
        });

        Ok(EdgeHandle::new(self.id, id))
    }

    /// Marks a cluster read-only. Idempotent.
    ///
    /// # Errors
    ///
    /// [`GraphError::CrossGraphReference`] if the handle belongs to
    /// another graph.
    pub fn seal(&mut self, cluster: ClusterHandle) -> Result<(), GraphError> {
        let id = self.resolve_cluster(Some(cluster))?;
        self.clusters[id.index()].sealed = true;
        Ok(())
    }

    /// Returns the node for a handle.
    ///
    /// # Errors
    ///
    /// [`GraphError::CrossGraphReference`] or [`GraphError::UnknownNode`]
    /// if the handle does not resolve here.
    pub fn node(&self, handle: NodeHandle) -> Result<&Node, GraphError> {
        let id = self.resolve_node(handle)?;
        Ok(&self.nodes[id.index()])
    }

    /// Returns the cluster for a handle.
    ///
    /// # Errors
    ///
    /// [`GraphError::CrossGraphReference`] if the handle belongs to
    /// another graph.
    pub fn cluster(&self, handle: ClusterHandle) -> Result<&Cluster, GraphError> {
        let id = self.resolve_cluster(Some(handle))?;
        Ok(&self.clusters[id.index()])
    }

    /// Looks up a node by its in-graph identity.
    pub fn node_by_id(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Looks up a cluster by its in-graph identity.
    pub fn cluster_by_id(&self, id: ClusterId) -> Option<&Cluster> {
        self.clusters.get(id.index())
    }

    /// Checks whether a handle resolves in this graph's registry.
    pub fn contains_node(&self, handle: NodeHandle) -> bool {
        self.resolve_node(handle).is_ok()
    }

    /// All nodes, in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// All clusters (root first), in creation order.
    pub fn clusters(&self) -> impl Iterator<Item = &Cluster> {
        self.clusters.iter()
    }

    /// All edges, in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    /// Total number of nodes.
    pub fn nodes_count(&self) -> usize {
        self.nodes.len()
    }

    /// Total number of clusters, including the root.
    pub fn clusters_count(&self) -> usize {
        self.clusters.len()
    }

    /// Total number of edges.
    pub fn edges_count(&self) -> usize {
        self.edges.len()
    }

    fn allocate(len: usize) -> Result<u32, GraphError> {
        u32::try_from(len).map_err(|_| GraphError::DuplicateIdentity)
    }

    fn check_graph(&self, found: GraphId) -> Result<(), GraphError> {
        if found == self.id {
            Ok(())
        } else {
            Err(GraphError::CrossGraphReference {
                expected: self.id,
                found,
            })
        }
    }

    fn resolve_node(&self, handle: NodeHandle) -> Result<NodeId, GraphError> {
        self.check_graph(handle.graph())?;
        if handle.id().index() < self.nodes.len() {
            Ok(handle.id())
        } else {
            Err(GraphError::UnknownNode { node: handle })
        }
    }

    fn resolve_cluster(&self, handle: Option<ClusterHandle>) -> Result<ClusterId, GraphError> {
        match handle {
            Some(handle) => {
                self.check_graph(handle.graph())?;
                Ok(handle.id())
            }
            None => Ok(self.root),
        }
    }

    fn ensure_open(&self, id: ClusterId) -> Result<(), GraphError> {
        let cluster = &self.clusters[id.index()];
        if cluster.sealed {
            Err(GraphError::SealedCluster {
                label: cluster.label.clone(),
            })
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_graph_is_empty_with_open_root() {
        let graph = Graph::new("Empty");

        assert_eq!(graph.nodes_count(), 0);
        assert_eq!(graph.edges_count(), 0);
        assert_eq!(graph.clusters_count(), 1);
        assert!(!graph.root().is_sealed());
        assert_eq!(graph.root().parent(), None);
    }

    #[test]
    fn nodes_attach_to_root_by_default() {
        let mut graph = Graph::new("Test");
        let app = graph.add_node("App", Category::Client, None).unwrap();

        let node = graph.node(app).unwrap();
        assert_eq!(node.label(), "App");
        assert_eq!(node.category(), Category::Client);
        assert_eq!(node.cluster(), graph.root().id());
        assert_eq!(graph.root().node_ids(), [node.id()]);
    }

    #[test]
    fn containment_is_a_tree() {
        let mut graph = Graph::new("Test");
        let outer = graph.add_cluster("Outer", None).unwrap();
        let inner = graph.add_cluster("Inner", Some(outer)).unwrap();
        let sibling = graph.add_cluster("Sibling", None).unwrap();
        let leaf = graph.add_node("Leaf", Category::Service, Some(inner)).unwrap();

        // Every element has exactly one parent.
        let outer_ref = graph.cluster(outer).unwrap();
        let inner_ref = graph.cluster(inner).unwrap();
        let sibling_ref = graph.cluster(sibling).unwrap();
        assert_eq!(outer_ref.parent(), Some(graph.root().id()));
        assert_eq!(inner_ref.parent(), Some(outer_ref.id()));
        assert_eq!(sibling_ref.parent(), Some(graph.root().id()));
        assert_eq!(graph.node(leaf).unwrap().cluster(), inner_ref.id());

        // Child lists mirror the parent links, in declaration order.
        assert_eq!(graph.root().cluster_ids(), [outer_ref.id(), sibling_ref.id()]);
        assert_eq!(outer_ref.cluster_ids(), [inner_ref.id()]);
        assert_eq!(inner_ref.node_ids(), [graph.node(leaf).unwrap().id()]);

        // No cycles: walking parents from any cluster terminates at the root.
        let mut current = inner_ref.id();
        let mut hops = 0;
        while let Some(parent) = graph.cluster_by_id(current).unwrap().parent() {
            current = parent;
            hops += 1;
            assert!(hops <= graph.clusters_count());
        }
        assert_eq!(current, graph.root().id());
    }

    #[test]
    fn connect_preserves_insertion_order() {
        let mut graph = Graph::new("Test");
        let a = graph.add_node("A", Category::Service, None).unwrap();
        let b = graph.add_node("B", Category::Service, None).unwrap();

        graph
            .connect(a, b, EdgeAttrs::new().with_label("first"))
            .unwrap();
        graph
            .connect(a, b, EdgeAttrs::new().with_label("second"))
            .unwrap();
        graph.connect(b, a, EdgeAttrs::new()).unwrap();

        let labels: Vec<Option<&str>> = graph.edges().map(|edge| edge.label()).collect();
        assert_eq!(labels, [Some("first"), Some("second"), None]);
    }

    #[test]
    fn self_loops_are_permitted() {
        let mut graph = Graph::new("Test");
        let a = graph.add_node("A", Category::Service, None).unwrap();

        let edge = graph.connect(a, a, EdgeAttrs::new()).unwrap();
        assert_eq!(edge.graph(), graph.id());
        assert_eq!(graph.edges_count(), 1);
    }

    #[test]
    fn unknown_node_never_mutates_the_edge_list() {
        let mut graph = Graph::new("Test");
        let a = graph.add_node("A", Category::Service, None).unwrap();
        let phantom = NodeHandle::new(graph.id(), NodeId::new(99));

        let err = graph.connect(a, phantom, EdgeAttrs::new()).unwrap_err();
        assert_eq!(err, GraphError::UnknownNode { node: phantom });
        assert_eq!(graph.edges_count(), 0);

        let err = graph.connect(phantom, a, EdgeAttrs::new()).unwrap_err();
        assert_eq!(err, GraphError::UnknownNode { node: phantom });
        assert_eq!(graph.edges_count(), 0);
    }

    #[test]
    fn foreign_handles_are_rejected() {
        let mut first = Graph::new("First");
        let mut second = Graph::new("Second");
        let in_first = first.add_node("A", Category::Service, None).unwrap();
        let in_second = second.add_node("B", Category::Service, None).unwrap();

        let err = second
            .connect(in_first, in_second, EdgeAttrs::new())
            .unwrap_err();
        assert_eq!(
            err,
            GraphError::CrossGraphReference {
                expected: second.id(),
                found: first.id(),
            }
        );
        assert_eq!(second.edges_count(), 0);

        // Cluster handles are checked the same way.
        let foreign_cluster = first.add_cluster("C", None).unwrap();
        assert!(matches!(
            second.add_node("X", Category::Service, Some(foreign_cluster)),
            Err(GraphError::CrossGraphReference { .. })
        ));

        // Including by seal, which must leave the cluster untouched in
        // its own graph.
        assert_eq!(
            second.seal(foreign_cluster).unwrap_err(),
            GraphError::CrossGraphReference {
                expected: second.id(),
                found: first.id(),
            }
        );
        assert!(!first.cluster(foreign_cluster).unwrap().is_sealed());
    }

    #[test]
    fn sealed_cluster_rejects_new_children() {
        let mut graph = Graph::new("Test");
        let cluster = graph.add_cluster("Backend", None).unwrap();
        graph.seal(cluster).unwrap();

        let err = graph
            .add_node("Late", Category::Service, Some(cluster))
            .unwrap_err();
        assert_eq!(
            err,
            GraphError::SealedCluster {
                label: "Backend".to_string(),
            }
        );
        assert!(matches!(
            graph.add_cluster("Nested", Some(cluster)),
            Err(GraphError::SealedCluster { .. })
        ));
    }

    #[test]
    fn seal_is_idempotent() {
        let mut graph = Graph::new("Test");
        let cluster = graph.add_cluster("Backend", None).unwrap();

        graph.seal(cluster).unwrap();
        graph.seal(cluster).unwrap();
        assert!(graph.cluster(cluster).unwrap().is_sealed());
    }

    #[test]
    fn sealing_a_cluster_leaves_siblings_open() {
        let mut graph = Graph::new("Test");
        let closed = graph.add_cluster("Closed", None).unwrap();
        let open = graph.add_cluster("Open", None).unwrap();
        graph.seal(closed).unwrap();

        assert!(graph.add_node("Ok", Category::Service, Some(open)).is_ok());
        assert!(graph.add_node("Top", Category::Service, None).is_ok());
    }

    #[test]
    fn multiline_labels_pass_through() {
        let mut graph = Graph::new("Test");
        let node = graph
            .add_node("React App\nVite + Tailwind", Category::Client, None)
            .unwrap();

        assert_eq!(graph.node(node).unwrap().label(), "React App\nVite + Tailwind");
    }

    #[test]
    fn contains_node_tracks_registry_membership() {
        let mut graph = Graph::new("Test");
        let a = graph.add_node("A", Category::Service, None).unwrap();

        assert!(graph.contains_node(a));
        assert!(!graph.contains_node(NodeHandle::new(graph.id(), NodeId::new(7))));
    }
}
