//! Translation of the graph model into the DOT graph-description AST.
//!
//! The finished graph becomes one `digraph`: clusters turn into nested
//! `subgraph cluster_*` blocks, nodes into identifier statements carrying
//! their category's style attributes, and edges into directed-connection
//! statements. Element identities double as DOT identifiers (`n0`, `n1`,
//! ...), so the output is deterministic for a given build sequence.
//!
//! Before emitting anything, [`build`] re-checks the graph's structural
//! invariants. The graph model enforces them by construction, so a
//! failure here is an internal-consistency bug, reported as
//! [`Error::Serialization`] rather than handed to the engine.

use dot_structures::{
    Attribute, Edge as DotEdge, EdgeTy, Graph as DotGraph, Id, Node as DotNode, NodeId, Stmt,
    Subgraph, Vertex,
};

use cumulus_core::{
    EdgeStyle, Graph,
    graph::{Cluster, Edge, Node},
};

use crate::config::LayoutDirection;

use super::Error;

/// Builds the DOT AST for a finished graph.
pub(super) fn build(
    graph: &Graph,
    direction: LayoutDirection,
    background: Option<&str>,
) -> Result<DotGraph, Error> {
    verify(graph)?;

    let mut stmts = vec![
        attr_stmt("label", quoted(graph.title())),
        attr_stmt("rankdir", plain(direction.as_rankdir())),
    ];
    if let Some(color) = background {
        stmts.push(attr_stmt("bgcolor", quoted(color)));
    }

    emit_cluster_body(graph, graph.root(), &mut stmts)?;

    // Edges come last, in insertion order.
    for edge in graph.edges() {
        stmts.push(edge_stmt(edge));
    }

    Ok(DotGraph::DiGraph {
        id: quoted(graph.title()),
        strict: false,
        stmts,
    })
}

/// Emits the nodes and sub-clusters of one cluster, in declaration order.
fn emit_cluster_body(graph: &Graph, cluster: &Cluster, stmts: &mut Vec<Stmt>) -> Result<(), Error> {
    for node_id in cluster.node_ids() {
        let node = graph
            .node_by_id(*node_id)
            .ok_or_else(|| Error::Serialization(format!("node {node_id} is not in the registry")))?;
        stmts.push(Stmt::Node(node_stmt(node)));
    }

    for cluster_id in cluster.cluster_ids() {
        let child = graph.cluster_by_id(*cluster_id).ok_or_else(|| {
            Error::Serialization(format!("cluster {cluster_id} is not in the registry"))
        })?;

        let mut inner = vec![attr_stmt("label", quoted(child.label()))];
        emit_cluster_body(graph, child, &mut inner)?;

        stmts.push(Stmt::Subgraph(Subgraph {
            id: plain(format!("cluster_{}", child.id())),
            stmts: inner,
        }));
    }

    Ok(())
}

fn node_stmt(node: &Node) -> DotNode {
    let style = node.category().style();
    DotNode {
        id: dot_node_id(node.id()),
        attributes: vec![
            attr("label", quoted(node.label())),
            attr("shape", plain(style.shape())),
            attr("style", plain("filled")),
            attr("fillcolor", quoted(style.fill_color())),
            attr("fontcolor", quoted(style.font_color())),
        ],
    }
}

fn edge_stmt(edge: &Edge) -> Stmt {
    let mut attributes = Vec::new();
    if let Some(label) = edge.label() {
        attributes.push(attr("label", quoted(label)));
    }
    if edge.style() != EdgeStyle::Solid {
        attributes.push(attr("style", plain::<&str>(edge.style().into())));
    }
    if !edge.directed() {
        attributes.push(attr("dir", plain("none")));
    }

    Stmt::Edge(DotEdge {
        ty: EdgeTy::Pair(
            Vertex::N(dot_node_id(edge.source())),
            Vertex::N(dot_node_id(edge.destination())),
        ),
        attributes,
    })
}

fn dot_node_id(id: cumulus_core::identifier::NodeId) -> NodeId {
    NodeId(plain(id.to_string()), None)
}

fn attr_stmt(key: &str, value: Id) -> Stmt {
    Stmt::Attribute(attr(key, value))
}

fn attr(key: &str, value: Id) -> Attribute {
    Attribute(plain(key), value)
}

fn plain<S: Into<String>>(value: S) -> Id {
    Id::Plain(value.into())
}

/// Quotes a string for DOT, escaping backslashes, quotes, and newlines.
fn quoted(value: &str) -> Id {
    let escaped = value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n");
    Id::Escaped(format!("\"{escaped}\""))
}

/// Final well-formedness check before handoff to the engine.
///
/// Verifies that containment links are mutual, that the containment tree
/// reaches every registered element exactly once, and that every edge
/// endpoint resolves.
fn verify(graph: &Graph) -> Result<(), Error> {
    for node in graph.nodes() {
        let owner = graph.cluster_by_id(node.cluster()).ok_or_else(|| {
            Error::Serialization(format!("node {} references a missing cluster", node.id()))
        })?;
        if !owner.node_ids().contains(&node.id()) {
            return Err(Error::Serialization(format!(
                "node {} is missing from its cluster's child list",
                node.id()
            )));
        }
    }

    for cluster in graph.clusters() {
        match cluster.parent() {
            None => {
                if cluster.id() != graph.root().id() {
                    return Err(Error::Serialization(format!(
                        "cluster {} has no parent but is not the root",
                        cluster.id()
                    )));
                }
            }
            Some(parent_id) => {
                let parent = graph.cluster_by_id(parent_id).ok_or_else(|| {
                    Error::Serialization(format!(
                        "cluster {} references a missing parent",
                        cluster.id()
                    ))
                })?;
                if !parent.cluster_ids().contains(&cluster.id()) {
                    return Err(Error::Serialization(format!(
                        "cluster {} is missing from its parent's child list",
                        cluster.id()
                    )));
                }
            }
        }
    }

    let (nodes_reached, clusters_reached) = count_reachable(graph, graph.root());
    if nodes_reached != graph.nodes_count() || clusters_reached != graph.clusters_count() {
        return Err(Error::Serialization(format!(
            "containment tree reaches {nodes_reached} nodes and {clusters_reached} clusters, \
             registry holds {} and {}",
            graph.nodes_count(),
            graph.clusters_count()
        )));
    }

    for edge in graph.edges() {
        for endpoint in [edge.source(), edge.destination()] {
            if graph.node_by_id(endpoint).is_none() {
                return Err(Error::Serialization(format!(
                    "edge {} references unknown node {endpoint}",
                    edge.id()
                )));
            }
        }
    }

    Ok(())
}

fn count_reachable(graph: &Graph, cluster: &Cluster) -> (usize, usize) {
    let mut nodes = cluster.node_ids().len();
    let mut clusters = 1;
    for child_id in cluster.cluster_ids() {
        if let Some(child) = graph.cluster_by_id(*child_id) {
            let (child_nodes, child_clusters) = count_reachable(graph, child);
            nodes += child_nodes;
            clusters += child_clusters;
        }
    }
    (nodes, clusters)
}
