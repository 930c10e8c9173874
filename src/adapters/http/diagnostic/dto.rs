//! Request and response DTOs for diagnostic endpoints.

use std::collections::HashMap;

use serde::Serialize;

use crate::domain::diagnostic::{DependencyGraph, DiagnosticCatalog};
use crate::domain::foundation::DomainError;

/// Body of `GET /` and `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub msg: String,
}

impl HealthResponse {
    pub fn online() -> Self {
        Self {
            status: "ok".to_string(),
            msg: "MentorApp backend online.".to_string(),
        }
    }
}

/// Public view of one catalog domain.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogDomainResponse {
    pub key: String,
    pub label: String,
    pub likert_fields: Vec<String>,
    pub text_fields: Vec<String>,
}

/// Body of `GET /api/diagnostico/profundo/catalogo`.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogResponse {
    pub domains: Vec<CatalogDomainResponse>,
    pub dependencies: DependencyGraph,
}

impl From<&DiagnosticCatalog> for CatalogResponse {
    fn from(catalog: &DiagnosticCatalog) -> Self {
        Self {
            domains: catalog
                .domains()
                .iter()
                .map(|d| CatalogDomainResponse {
                    key: d.key.clone(),
                    label: d.label.clone(),
                    likert_fields: d.likert_fields.clone(),
                    text_fields: d.text_fields.clone(),
                })
                .collect(),
            dependencies: catalog.dependencies().clone(),
        }
    }
}

/// Standard error body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, String>>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }
}

impl From<&DomainError> for ErrorResponse {
    fn from(err: &DomainError) -> Self {
        Self {
            code: err.code.to_string(),
            message: err.message.clone(),
            details: (!err.details.is_empty()).then(|| err.details.clone()),
        }
    }
}
