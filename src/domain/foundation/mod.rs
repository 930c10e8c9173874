//! Foundation module - Shared domain primitives.
//!
//! Contains the error vocabulary shared by the diagnostic domain,
//! the application handlers and the HTTP adapters.

mod errors;

pub use errors::{DomainError, ErrorCode, ValidationError};
