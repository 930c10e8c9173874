//! Integration tests for the deep diagnostic HTTP endpoints.
//!
//! These tests drive the full axum router:
//! 1. Health probes answer with the fixed online message
//! 2. Invalid bodies are rejected with 400 VALIDATION_FAILED
//! 3. Valid questionnaires yield the complete analysis payload
//! 4. Narratives from a provider are merged without touching scores

use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use mentor_backend::adapters::ai::{MockAIProvider, MockError};
use mentor_backend::adapters::http::{apply_middleware, diagnostic_router, DiagnosticAppState};
use mentor_backend::application::handlers::diagnostic::{
    AnalyzeDeepDiagnosticHandler, NarrativeSettings,
};
use mentor_backend::config::ServerConfig;
use mentor_backend::domain::diagnostic::DiagnosticCatalog;
use mentor_backend::ports::AIProvider;

// =============================================================================
// Test Infrastructure
// =============================================================================

fn app(provider: Option<MockAIProvider>) -> Router {
    let handler = AnalyzeDeepDiagnosticHandler::new(
        Arc::new(DiagnosticCatalog::reference()),
        provider.map(|p| Arc::new(p) as Arc<dyn AIProvider>),
        NarrativeSettings::default(),
    );
    diagnostic_router(DiagnosticAppState::new(Arc::new(handler)))
}

fn post_json(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/diagnostico/profundo")
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn weak_finances() -> Value {
    json!({
        "fa_margenGanancia": "1",
        "fa_estadosFinancierosActualizados": "1",
        "fa_presupuestosAnuales": 1,
        "fa_causaProblemasFinancieros": "Problemas de flujo de caja cada mes",
        "dg_objetivosClaros": "4",
        "extra_field": "ignored"
    })
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn health_reports_online() {
    for uri in ["/", "/health"] {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let (status, body) = send(app(None), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "ok", "msg": "MentorApp backend online."}));
    }
}

// =============================================================================
// Validation
// =============================================================================

#[tokio::test]
async fn non_object_body_is_rejected() {
    for body in ["[1, 2, 3]", "\"texto\"", "42", "null"] {
        let (status, json) = send(app(None), post_json(body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "body {body}");
        assert_eq!(json["code"], "VALIDATION_FAILED");
        assert_eq!(json["details"]["field"], "body");
    }
}

#[tokio::test]
async fn malformed_json_is_rejected() {
    let (status, json) = send(app(None), post_json("{\"fa_margenGanancia\": ")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_FAILED");
}

#[tokio::test]
async fn missing_content_type_is_rejected() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/diagnostico/profundo")
        .body(Body::from("{}"))
        .unwrap();
    let (status, json) = send(app(None), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_FAILED");
}

// =============================================================================
// Analysis
// =============================================================================

#[tokio::test]
async fn empty_questionnaire_still_analyses_every_domain() {
    let (status, json) = send(app(None), post_json("{}")).await;

    assert_eq!(status, StatusCode::OK);
    let table = json["estructura_consultiva"]["tabla_dominios"].as_array().unwrap();
    assert_eq!(table.len(), 7);
    assert!(table.iter().all(|row| row["score"] == json!(3.0)));
    assert_eq!(json["roadmap_inteligente"]["order"].as_array().unwrap().len(), 7);
}

#[tokio::test]
async fn analysis_payload_has_expected_shape() {
    let (status, json) = send(app(None), post_json(weak_finances().to_string())).await;

    assert_eq!(status, StatusCode::OK);
    for key in [
        "analisis_detallado",
        "oportunidades_estrategicas",
        "riesgos_identificados",
        "plan_accion_sugerido",
        "indicadores_clave_rendimiento",
        "estructura_consultiva",
        "roadmap_inteligente",
    ] {
        assert!(json.get(key).is_some(), "missing {key}");
    }

    let first = &json["estructura_consultiva"]["tabla_dominios"][0];
    assert_eq!(first["domain"], "finanzas");
    assert_eq!(first["severity"], "Critical");
    assert_eq!(first["priority"], "P1");

    let finanzas = &json["estructura_consultiva"]["dominios"]["finanzas"];
    assert!(finanzas["evidencias"][0]
        .as_str()
        .unwrap()
        .contains("flujo de caja"));

    let roadmap = &json["roadmap_inteligente"];
    assert_eq!(roadmap["tiempoEstimado"], "90 días");
    assert!(roadmap.get("forced").is_none());
    assert_eq!(roadmap["blockingDomains"], json!(["finanzas"]));
}

#[tokio::test]
async fn provider_narrative_is_merged() {
    let provider = MockAIProvider::new().with_response(
        json!({
            "analisis_detallado": "Las finanzas frenan el crecimiento.",
            "riesgos_identificados": ["Falta de liquidez"],
            "estructura_consultiva": {
                "dominios": {"finanzas": {"diagnostico": "Caja insuficiente"}}
            }
        })
        .to_string(),
    );

    let (status, json) = send(app(Some(provider.clone())), post_json(weak_finances().to_string())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["analisis_detallado"], "Las finanzas frenan el crecimiento.");
    assert_eq!(json["riesgos_identificados"], json!(["Falta de liquidez"]));
    assert_eq!(
        json["estructura_consultiva"]["dominios"]["finanzas"]["diagnostico"],
        "Caja insuficiente"
    );
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn request_id_is_forwarded_to_provider() {
    let provider = MockAIProvider::new();
    let request = Request::builder()
        .method("POST")
        .uri("/api/diagnostico/profundo")
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-request-id", "req-42")
        .body(Body::from("{}"))
        .unwrap();

    let (status, _) = send(app(Some(provider.clone())), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(provider.get_calls()[0].metadata.trace_id, "req-42");
}

#[tokio::test]
async fn provider_failure_keeps_scores_and_annotates() {
    let answers = weak_finances().to_string();
    let (_, plain) = send(app(None), post_json(answers.clone())).await;

    let failing = MockAIProvider::new().with_error(MockError::Unavailable {
        message: "503".to_string(),
    });
    let (status, failed) = send(app(Some(failing)), post_json(answers)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(failed["analisis_detallado"]
        .as_str()
        .unwrap()
        .starts_with("[DEMO POR ERROR: Unavailable] "));
    assert_eq!(
        plain["estructura_consultiva"]["tabla_dominios"],
        failed["estructura_consultiva"]["tabla_dominios"]
    );
    assert_eq!(plain["roadmap_inteligente"], failed["roadmap_inteligente"]);
}

#[tokio::test]
async fn slow_provider_under_request_timeout_still_returns_payload() {
    let provider = MockAIProvider::new()
        .with_response("{}")
        .with_delay(Duration::from_secs(5));
    let handler = AnalyzeDeepDiagnosticHandler::new(
        Arc::new(DiagnosticCatalog::reference()),
        Some(Arc::new(provider) as Arc<dyn AIProvider>),
        NarrativeSettings {
            timeout: Duration::from_millis(50),
            ..NarrativeSettings::default()
        },
    );
    let server = ServerConfig {
        request_timeout_secs: 1,
        ..ServerConfig::default()
    };
    let router = apply_middleware(
        diagnostic_router(DiagnosticAppState::new(Arc::new(handler))),
        &server,
    );

    let (status, json) = send(router, post_json(weak_finances().to_string())).await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["analisis_detallado"]
        .as_str()
        .unwrap()
        .starts_with("[DEMO POR ERROR: Timeout] "));
    assert_eq!(
        json["estructura_consultiva"]["tabla_dominios"]
            .as_array()
            .unwrap()
            .len(),
        7
    );
}

// =============================================================================
// Catalog
// =============================================================================

#[tokio::test]
async fn catalog_lists_domains_and_dependencies() {
    let request = Request::builder()
        .uri("/api/diagnostico/profundo/catalogo")
        .body(Body::empty())
        .unwrap();
    let (status, json) = send(app(None), request).await;

    assert_eq!(status, StatusCode::OK);
    let keys: Vec<&str> = json["domains"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["key"].as_str().unwrap())
        .collect();
    assert_eq!(
        keys,
        vec!["finanzas", "rrhh", "operaciones", "marketing_ventas", "direccion", "logistica", "innovacion"]
    );
    assert!(json["dependencies"].is_object());
}
