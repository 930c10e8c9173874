//! HTTP adapter for the deep diagnostic endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{CatalogDomainResponse, CatalogResponse, ErrorResponse, HealthResponse};
pub use handlers::{DiagnosticApiError, DiagnosticAppState};
pub use routes::{diagnostic_router, diagnostic_routes};
