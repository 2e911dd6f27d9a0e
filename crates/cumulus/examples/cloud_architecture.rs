//! Example: Declaring and rendering a cloud architecture diagram
//!
//! This example builds a small serverless architecture — a user in front
//! of a single-page app, an API gateway fanning out to functions, and the
//! storage and database layers behind them — and renders it to
//! `cloud-architecture.png` in the working directory.
//!
//! Requires the Graphviz `dot` executable on the search path.

use cumulus::{Category, Diagram, EdgeAttrs, EdgeStyle};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut diagram = Diagram::new("Cloud Architecture");

    let user = diagram.node("User Browser", Category::User)?;

    let frontend = diagram.cluster("Frontend", |scope| {
        scope.node("Web App\nSPA + CDN", Category::Client)
    })?;

    let (gateway, functions, db, bucket, monitoring) = diagram.cluster("Cloud", |cloud| {
        let gateway = cloud.node("API Gateway\nREST API", Category::Gateway)?;

        let functions = cloud.cluster("Functions", |scope| {
            Ok(vec![
                scope.node("ProfileHandler", Category::Function)?,
                scope.node("UploadHandler", Category::Function)?,
                scope.node("StatsHandler", Category::Function)?,
            ])
        })?;

        let db = cloud.cluster("Database Layer", |scope| {
            scope.node("Users Table", Category::Database)
        })?;
        let bucket = cloud.cluster("Storage Layer", |scope| {
            scope.node("Uploads\n(30-day TTL)", Category::Storage)
        })?;

        let monitoring = cloud.node("Logs + Metrics + Alarms", Category::Monitoring)?;
        Ok((gateway, functions, db, bucket, monitoring))
    })?;

    // Main request flow.
    diagram.connect_with(user, frontend, EdgeAttrs::new().with_label("HTTPS"))?;
    diagram.connect_with(frontend, gateway, EdgeAttrs::new().with_label("REST"))?;
    diagram.fan_out(gateway, functions.iter().copied())?;

    // Functions to their backing stores.
    diagram.connect(functions[0], db)?;
    diagram.connect(functions[1], bucket)?;
    diagram.connect(functions[2], db)?;

    // Everything reports to monitoring.
    diagram.fan_in_with(
        functions,
        monitoring,
        EdgeAttrs::new().with_style(EdgeStyle::Dotted),
    )?;

    let result = diagram.render()?;
    println!("Diagram generated successfully: {}", result.output_path().display());
    Ok(())
}
