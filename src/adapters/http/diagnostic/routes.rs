//! Axum router configuration for diagnostic endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{analyze_deep_diagnostic, get_catalog, health, DiagnosticAppState};

/// Diagnostic API routes, mounted under `/api`.
///
/// # Routes
/// - `POST /diagnostico/profundo` - Analyse a questionnaire
/// - `GET /diagnostico/profundo/catalogo` - Domain catalog and prerequisites
pub fn diagnostic_routes() -> Router<DiagnosticAppState> {
    Router::new()
        .route("/diagnostico/profundo", post(analyze_deep_diagnostic))
        .route("/diagnostico/profundo/catalogo", get(get_catalog))
}

/// Complete application router: health probes plus the diagnostic API.
pub fn diagnostic_router(state: DiagnosticAppState) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .nest("/api", diagnostic_routes())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::application::handlers::diagnostic::{
        AnalyzeDeepDiagnosticHandler, NarrativeSettings,
    };
    use crate::domain::diagnostic::DiagnosticCatalog;

    fn router() -> Router {
        let handler = AnalyzeDeepDiagnosticHandler::new(
            Arc::new(DiagnosticCatalog::reference()),
            None,
            NarrativeSettings::default(),
        );
        diagnostic_router(DiagnosticAppState::new(Arc::new(handler)))
    }

    #[tokio::test]
    async fn health_routes_respond() {
        for uri in ["/", "/health"] {
            let response = router()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }
    }

    #[tokio::test]
    async fn catalog_route_responds() {
        let response = router()
            .oneshot(
                Request::builder()
                    .uri("/api/diagnostico/profundo/catalogo")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["domains"].as_array().unwrap().len(), 7);
    }

    #[tokio::test]
    async fn analysis_route_requires_post() {
        let response = router()
            .oneshot(
                Request::builder()
                    .uri("/api/diagnostico/profundo")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
