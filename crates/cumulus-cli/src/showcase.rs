//! The bundled showcase architecture.
//!
//! A self-contained serverless web architecture — browser user, hosted
//! single-page frontend, and a cloud boundary with an API gateway fanning
//! out to functions backed by an inference service, object storage, and a
//! database layer, all reporting to monitoring. It exists so the CLI has
//! a complete diagram to render without any input format.

use cumulus::{Category, Diagram, EdgeAttrs, EdgeStyle, config::AppConfig};

/// Builds the showcase diagram with the given configuration.
///
/// # Errors
///
/// Propagates builder errors; with a correct declaration sequence this
/// does not fail.
pub fn build(config: AppConfig) -> Result<Diagram, cumulus::CumulusError> {
    let mut diagram = Diagram::with_config("Health Monitoring System Architecture", config);

    let user = diagram.node("User Browser", Category::User)?;

    let frontend = diagram.cluster("Frontend (static hosting)", |scope| {
        scope.node("Web App\nSPA + CDN", Category::Client)
    })?;

    diagram.cluster("Cloud", |cloud| {
        let gateway = cloud.node("API Gateway\nREST API", Category::Gateway)?;

        let handlers = cloud.cluster("Handlers", |scope| {
            Ok([
                scope.node("ProfileHandler", Category::Function)?,
                scope.node("SessionHandler", Category::Function)?,
                scope.node("UploadHandler", Category::Function)?,
                scope.node("PredictionHandler", Category::Function)?,
                scope.node("RecommendationHandler", Category::Function)?,
                scope.node("StatsHandler", Category::Function)?,
            ])
        })?;
        let [profile, session, upload, prediction, recommendation, stats] = handlers;

        let inference = cloud.cluster("Inference", |scope| {
            scope.node("Model Service\nbatch scoring", Category::Compute)
        })?;

        let (samples, models, datasets) = cloud.cluster("Storage Layer", |scope| {
            Ok((
                scope.node("Samples\n(30-day TTL)", Category::Storage)?,
                scope.node("Models", Category::Storage)?,
                scope.node("Datasets", Category::Storage)?,
            ))
        })?;

        let (users_table, sessions_table, predictions_table, stats_table) =
            cloud.cluster("Database Layer", |scope| {
                Ok((
                    scope.node("Users Table", Category::Database)?,
                    scope.node("Sessions Table", Category::Database)?,
                    scope.node("Predictions Table", Category::Database)?,
                    scope.node("Regional Stats Table", Category::Database)?,
                ))
            })?;

        let monitoring = cloud.node("Logs + Metrics + Alarms", Category::Monitoring)?;

        // Main request flow.
        cloud.connect_with(user, frontend, EdgeAttrs::new().with_label("HTTPS"))?;
        cloud.connect_with(frontend, gateway, EdgeAttrs::new().with_label("REST"))?;

        // Gateway fans out to every handler.
        for handler in handlers {
            cloud.connect(gateway, handler)?;
        }

        // Handlers to their backing stores. The recommendation handler is
        // pure compute; it has no store of its own.
        cloud.connect(profile, users_table)?;
        cloud.connect(session, sessions_table)?;
        cloud.connect(upload, samples)?;
        cloud.connect(upload, sessions_table)?;
        cloud.connect(prediction, predictions_table)?;
        cloud.connect(stats, stats_table)?;

        // Prediction flow through the inference service.
        cloud.connect_with(prediction, inference, EdgeAttrs::new().with_label("invoke"))?;
        cloud.connect_with(inference, samples, EdgeAttrs::new().with_label("download"))?;
        cloud.connect_with(inference, models, EdgeAttrs::new().with_label("load model"))?;
        cloud.connect_with(inference, datasets, EdgeAttrs::new().with_label("training data"))?;

        // Everything reports to monitoring.
        for source in [
            profile,
            session,
            upload,
            prediction,
            recommendation,
            stats,
            inference,
        ] {
            cloud.connect_with(
                source,
                monitoring,
                EdgeAttrs::new().with_style(EdgeStyle::Dotted),
            )?;
        }

        Ok(())
    })?;

    Ok(diagram)
}

#[cfg(test)]
mod tests {
    use super::*;

    use cumulus::GraphvizRenderer;

    #[test]
    fn showcase_builds_and_finishes() {
        let diagram = build(AppConfig::default()).expect("Failed to build showcase");
        let graph = diagram.finish().expect("Failed to finish showcase");

        assert_eq!(graph.nodes_count(), 18);
        assert_eq!(graph.edges_count(), 25);
        // Root, frontend, cloud, handlers, inference, storage, database.
        assert_eq!(graph.clusters_count(), 7);
        assert!(graph.clusters().all(|cluster| cluster.is_sealed()));
    }

    #[test]
    fn showcase_serializes_to_dot() {
        let diagram = build(AppConfig::default()).expect("Failed to build showcase");
        let graph = diagram.finish().expect("Failed to finish showcase");

        let dot = GraphvizRenderer::new()
            .to_dot(&graph)
            .expect("Failed to serialize showcase");
        assert!(dot.contains("digraph"));
        assert!(dot.contains("ProfileHandler"));
        assert!(dot.contains("RecommendationHandler"));
        assert!(dot.contains("Regional Stats Table"));
        assert!(dot.contains("HTTPS"));
    }
}
