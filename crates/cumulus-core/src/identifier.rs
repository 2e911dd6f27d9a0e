//! Element identities and handles.
//!
//! Every graph element gets a sequentially allocated identity at creation
//! time. Identities are meaningful only inside the graph that allocated
//! them, so the public handle types pair an element identity with the
//! [`GraphId`] of the owning graph. This is what lets a graph reject a
//! handle that was minted by a different build (see
//! [`GraphError::CrossGraphReference`](crate::graph::GraphError::CrossGraphReference)).
//!
//! Handles are small `Copy` values. They never dangle within their own
//! graph because a graph only grows during construction and elements are
//! never removed.

use std::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};

/// Counter backing [`GraphId::next`]. Process-wide so that two graphs
/// built anywhere in the same process can never share an id.
static NEXT_GRAPH_ID: AtomicU64 = AtomicU64::new(0);

/// Process-unique identity of one [`Graph`](crate::graph::Graph) instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GraphId(u64);

impl GraphId {
    /// Allocates a fresh graph id.
    pub(crate) fn next() -> Self {
        GraphId(NEXT_GRAPH_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for GraphId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}", self.0)
    }
}

macro_rules! element_id {
    ($(#[$doc:meta])* $name:ident, $prefix:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u32);

        impl $name {
            pub(crate) fn new(index: u32) -> Self {
                $name(index)
            }

            /// Returns the identity as a registry index.
            pub(crate) fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

element_id!(
    /// Identity of a node within its graph.
    NodeId,
    "n"
);
element_id!(
    /// Identity of a cluster within its graph.
    ClusterId,
    "c"
);
element_id!(
    /// Identity of an edge within its graph.
    EdgeId,
    "e"
);

macro_rules! element_handle {
    ($(#[$doc:meta])* $name:ident, $id:ident, $field:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name {
            graph: GraphId,
            $field: $id,
        }

        impl $name {
            pub(crate) fn new(graph: GraphId, $field: $id) -> Self {
                Self { graph, $field }
            }

            /// The graph this handle was minted by.
            pub fn graph(&self) -> GraphId {
                self.graph
            }

            /// The element identity inside its graph.
            pub fn id(&self) -> $id {
                self.$field
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}/{}", self.graph, self.$field)
            }
        }
    };
}

element_handle!(
    /// Copyable reference to a node of a particular graph.
    NodeHandle,
    NodeId,
    node
);
element_handle!(
    /// Copyable reference to a cluster of a particular graph.
    ClusterHandle,
    ClusterId,
    cluster
);
element_handle!(
    /// Copyable reference to an edge of a particular graph.
    EdgeHandle,
    EdgeId,
    edge
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graph_ids_are_unique() {
        let a = GraphId::next();
        let b = GraphId::next();
        let c = GraphId::next();

        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_ne!(a, c);
    }

    #[test]
    fn element_ids_compare_by_index() {
        let first = NodeId::new(0);
        let second = NodeId::new(1);
        let again = NodeId::new(0);

        assert_eq!(first, again);
        assert_ne!(first, second);
        assert!(first < second);
    }

    #[test]
    fn handles_carry_their_graph() {
        let graph_a = GraphId::next();
        let graph_b = GraphId::next();

        let in_a = NodeHandle::new(graph_a, NodeId::new(0));
        let in_b = NodeHandle::new(graph_b, NodeId::new(0));

        assert_eq!(in_a.id(), in_b.id());
        assert_ne!(in_a.graph(), in_b.graph());
        assert_ne!(in_a, in_b);
    }

    #[test]
    fn display_formats() {
        assert_eq!(NodeId::new(3).to_string(), "n3");
        assert_eq!(ClusterId::new(0).to_string(), "c0");
        assert_eq!(EdgeId::new(12).to_string(), "e12");
    }
}
