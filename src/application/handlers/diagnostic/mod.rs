//! Diagnostic command handlers.

mod analyze_deep_diagnostic;

pub use analyze_deep_diagnostic::{
    AnalyzeDeepDiagnosticCommand, AnalyzeDeepDiagnosticHandler, AnalyzeDeepDiagnosticResult,
    NarrativeSettings,
};
