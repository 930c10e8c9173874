//! HTTP handlers for diagnostic endpoints.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

use crate::application::handlers::diagnostic::{
    AnalyzeDeepDiagnosticCommand, AnalyzeDeepDiagnosticHandler,
};
use crate::domain::diagnostic::{AnalysisResult, QuestionnaireAnswers};
use crate::domain::foundation::{DomainError, ErrorCode};

use super::dto::{CatalogResponse, ErrorResponse, HealthResponse};

const REQUEST_ID_HEADER: &str = "x-request-id";

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for diagnostic endpoints.
#[derive(Clone)]
pub struct DiagnosticAppState {
    pub analyze_handler: Arc<AnalyzeDeepDiagnosticHandler>,
}

impl DiagnosticAppState {
    pub fn new(analyze_handler: Arc<AnalyzeDeepDiagnosticHandler>) -> Self {
        Self { analyze_handler }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════════

/// GET / and GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::online())
}

/// POST /api/diagnostico/profundo - Analyse a deep diagnostic questionnaire
pub async fn analyze_deep_diagnostic(
    State(state): State<DiagnosticAppState>,
    headers: HeaderMap,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<AnalysisResult>, DiagnosticApiError> {
    let Json(body) =
        payload.map_err(|rejection| DomainError::validation("body", rejection.body_text()))?;
    let answers = QuestionnaireAnswers::from_value(body).map_err(DomainError::from)?;

    let trace_id = headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    tracing::info!(
        trace_id = %trace_id,
        answered = answers.len(),
        "deep diagnostic requested"
    );

    let result = state
        .analyze_handler
        .handle(AnalyzeDeepDiagnosticCommand { answers, trace_id })
        .await;

    Ok(Json(result.analysis))
}

/// GET /api/diagnostico/profundo/catalogo - Domain catalog for frontends
pub async fn get_catalog(State(state): State<DiagnosticAppState>) -> Json<CatalogResponse> {
    Json(CatalogResponse::from(state.analyze_handler.catalog()))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts domain errors to HTTP responses.
#[derive(Debug)]
pub struct DiagnosticApiError(DomainError);

impl From<DomainError> for DiagnosticApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl IntoResponse for DiagnosticApiError {
    fn into_response(self) -> Response {
        let status = match self.0.code {
            ErrorCode::ValidationFailed => StatusCode::BAD_REQUEST,
        };
        (status, Json(ErrorResponse::from(&self.0))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_bad_requests() {
        let response =
            DiagnosticApiError(DomainError::validation("body", "not an object")).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
