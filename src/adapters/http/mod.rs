//! HTTP adapters - REST API implementations.

pub mod diagnostic;
mod middleware;

pub use diagnostic::{diagnostic_router, DiagnosticAppState};
pub use middleware::apply_middleware;
