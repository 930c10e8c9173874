//! Application handlers.
//!
//! Command handlers that orchestrate domain operations.

pub mod diagnostic;

pub use diagnostic::{
    AnalyzeDeepDiagnosticCommand, AnalyzeDeepDiagnosticHandler, AnalyzeDeepDiagnosticResult,
    NarrativeSettings,
};
