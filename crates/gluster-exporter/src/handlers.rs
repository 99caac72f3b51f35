//! HTTP handlers: metrics exposition and the not-found fallback.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tracing::error;

use gluster_exporter_core::Registry;
use gluster_exporter_core::metrics::TEXT_FORMAT;

pub(crate) type AppState = State<Arc<Registry>>;

const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

/// Runs a full collection cycle and renders it in the text format.
pub(crate) async fn handle_metrics(State(registry): AppState) -> Response {
    // Collection shells out to gluster and blocks until every query returns.
    match tokio::task::spawn_blocking(move || registry.render()).await {
        Ok(body) => ([(header::CONTENT_TYPE, TEXT_FORMAT)], body).into_response(),
        Err(e) => {
            error!(error = %e, "collection task failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub(crate) async fn route_not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "Route not found")
}

/// `{"error": message}` indented by one space.
fn error_response(status: StatusCode, message: &str) -> Response {
    let mut body = Vec::new();
    let mut ser =
        serde_json::Serializer::with_formatter(&mut body, PrettyFormatter::with_indent(b" "));
    if let Err(e) = serde_json::json!({ "error": message }).serialize(&mut ser) {
        error!(error = %e, "cannot encode error payload");
    }
    (status, [(header::CONTENT_TYPE, JSON_CONTENT_TYPE)], body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, Request};
    use gluster_exporter_core::cli::MockCli;
    use gluster_exporter_core::mount::RealFs;
    use gluster_exporter_core::{BuildInfoCollector, CollectorConfig, GlusterCollector};
    use tower::ServiceExt;

    use crate::middleware::ALLOWED_METHODS;

    const METRICS_PATH: &str = "/api/v1/metrics";

    fn app(mock: MockCli) -> axum::Router {
        let mut registry = Registry::new();
        let config = CollectorConfig {
            hostname: "node1".to_string(),
            ..Default::default()
        };
        registry
            .register(Box::new(GlusterCollector::new(
                mock,
                RealFs::new(),
                "gluster",
                config,
            )))
            .unwrap();
        registry
            .register(Box::new(BuildInfoCollector::default()))
            .unwrap();
        crate::router(Arc::new(registry), METRICS_PATH)
    }

    fn request(method: Method, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_metrics() {
        let dir = tempfile::tempdir().unwrap();
        let mock = MockCli::healthy_cluster(dir.path().to_str().unwrap());
        let response = app(mock)
            .oneshot(request(Method::GET, METRICS_PATH))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], TEXT_FORMAT);
        assert_eq!(response.headers()[header::CACHE_CONTROL], "no-cache");
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");

        let text = body_text(response).await;
        assert!(text.contains("gluster_up 1\n"));
        assert!(text.contains("gluster_brick_available{volume=\"gv0\"} 4\n"));
        assert!(text.contains("gluster_peers_connected 2\n"));
        assert!(text.contains("gluster_heal_info_files_count{volume=\"gv0\"} 5\n"));
        assert!(text.contains("# TYPE gluster_exporter_build_info gauge\n"));
    }

    #[tokio::test]
    async fn test_metrics_when_cluster_unreachable() {
        let response = app(MockCli::unreachable())
            .oneshot(request(Method::GET, METRICS_PATH))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let text = body_text(response).await;
        assert!(text.contains("gluster_up 0\n"));
        assert!(text.contains("gluster_peers_connected 0\n"));
        assert!(!text.contains("gluster_volumes_available"));
    }

    #[tokio::test]
    async fn test_not_found() {
        let response = app(MockCli::unreachable())
            .oneshot(request(Method::GET, "/api/v1/nope"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()[header::CONTENT_TYPE], JSON_CONTENT_TYPE);
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_METHODS],
            ALLOWED_METHODS
        );
        assert_eq!(response.headers()[header::CACHE_CONTROL], "no-cache");
        assert_eq!(
            body_text(response).await,
            "{\n \"error\": \"Route not found\"\n}"
        );
    }

    #[tokio::test]
    async fn test_options_short_circuits() {
        let mock = MockCli::healthy_cluster("/mnt/gv0");
        let calls = mock.clone();
        let response = app(mock)
            .oneshot(request(Method::OPTIONS, METRICS_PATH))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert!(body_text(response).await.is_empty());
        assert!(calls.calls().is_empty());
    }
}
