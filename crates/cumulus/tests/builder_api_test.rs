//! Integration tests for the Diagram builder API
//!
//! These tests verify that the public API works and is usable. Everything
//! here stays short of invoking the external layout engine; the DOT
//! serialization is asserted on instead.

use cumulus::{
    Category, CumulusError, Diagram, EdgeAttrs, GraphvizRenderer, graph::GraphError, slugify,
};

#[test]
fn test_builder_api_exists() {
    // Just verify the API compiles and can be constructed
    let _diagram = Diagram::new("Smoke");
}

#[test]
fn test_end_to_end_scenario() {
    let mut diagram = Diagram::new("Test Architecture");

    let (app, api, db) = diagram
        .cluster("Cloud", |cloud| {
            let app = cloud.cluster("Frontend", |frontend| {
                frontend.node("App", Category::Client)
            })?;
            let (api, db) = cloud.cluster("Backend", |backend| {
                let api = backend.node("API", Category::Gateway)?;
                let db = backend.node("DB", Category::Database)?;
                Ok((api, db))
            })?;
            Ok((app, api, db))
        })
        .expect("Failed to declare clusters");

    diagram
        .connect_with(app, api, EdgeAttrs::new().with_label("HTTPS"))
        .expect("Failed to connect App -> API");
    diagram
        .connect_with(api, db, EdgeAttrs::new().with_label("query"))
        .expect("Failed to connect API -> DB");

    let graph = diagram.finish().expect("Failed to finish diagram");

    // Exactly 3 nodes and 2 edges, in declaration order with their labels.
    assert_eq!(graph.nodes_count(), 3);
    assert_eq!(graph.edges_count(), 2);
    let labels: Vec<Option<&str>> = graph.edges().map(|edge| edge.label()).collect();
    assert_eq!(labels, [Some("HTTPS"), Some("query")]);

    // Containment: App under Frontend, API and DB under Backend.
    let app_cluster = graph.node(app).unwrap().cluster();
    let api_cluster = graph.node(api).unwrap().cluster();
    let db_cluster = graph.node(db).unwrap().cluster();
    assert_eq!(graph.cluster_by_id(app_cluster).unwrap().label(), "Frontend");
    assert_eq!(graph.cluster_by_id(api_cluster).unwrap().label(), "Backend");
    assert_eq!(api_cluster, db_cluster);

    // The DOT output reflects the same structure.
    let dot = GraphvizRenderer::new()
        .to_dot(&graph)
        .expect("Failed to serialize");
    assert!(dot.contains("digraph"), "Output should be a digraph: {dot}");
    assert!(dot.contains("HTTPS"), "Edge label should survive: {dot}");
    assert!(dot.contains("cluster_"), "Clusters should become subgraphs: {dot}");
}

#[test]
fn test_serialization_is_deterministic() {
    let build = || -> Result<String, CumulusError> {
        let mut diagram = Diagram::new("Deterministic");
        let a = diagram.node("A", Category::Service)?;
        let b = diagram.cluster("Group", |scope| scope.node("B", Category::Database))?;
        diagram.connect_with(a, b, EdgeAttrs::new().with_label("rw"))?;
        GraphvizRenderer::new()
            .to_dot(&diagram.finish()?)
            .map_err(CumulusError::from)
    };

    let first = build().expect("First build failed");
    let second = build().expect("Second build failed");
    assert_eq!(first, second, "Same build sequence must serialize identically");
}

#[test]
fn test_fan_out_produces_one_edge_per_destination() {
    let mut diagram = Diagram::new("Fan Out");
    let gateway = diagram.node("Gateway", Category::Gateway).unwrap();
    let a = diagram.node("A", Category::Function).unwrap();
    let b = diagram.node("B", Category::Function).unwrap();
    let c = diagram.node("C", Category::Function).unwrap();

    let edges = diagram.fan_out(gateway, [a, b, c]).unwrap();
    assert_eq!(edges.len(), 3);

    let graph = diagram.finish().unwrap();
    let destinations: Vec<_> = graph.edges().map(|edge| edge.destination()).collect();
    assert_eq!(destinations, [a.id(), b.id(), c.id()]);
}

#[test]
fn test_cross_graph_handles_are_rejected() {
    let mut first = Diagram::new("First");
    let foreign = first.node("Foreign", Category::Service).unwrap();

    let mut second = Diagram::new("Second");
    let local = second.node("Local", Category::Service).unwrap();

    let err = second.connect(foreign, local).unwrap_err();
    assert!(matches!(
        err,
        CumulusError::Graph(GraphError::CrossGraphReference { .. })
    ));
    assert_eq!(second.graph().edges_count(), 0, "Edge list must be unchanged");

    // The rejected handle does not poison the second build.
    let other = second.node("Other", Category::Service).unwrap();
    assert!(second.connect(local, other).is_ok());
}

#[test]
fn test_default_output_name_derives_from_the_title() {
    assert_eq!(slugify("Fan Out"), "fan-out");
    assert_eq!(slugify("Test Architecture"), "test-architecture");
}
