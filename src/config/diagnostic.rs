//! Diagnostic engine configuration

use serde::Deserialize;
use std::path::PathBuf;

/// Diagnostic engine configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DiagnosticConfig {
    /// YAML catalog replacing the built-in one
    pub catalog_path: Option<PathBuf>,

    /// Prefix the analysis text with the failure reason when a narrative call fails
    #[serde(default = "default_annotate_fallback")]
    pub annotate_fallback: bool,
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        Self {
            catalog_path: None,
            annotate_fallback: default_annotate_fallback(),
        }
    }
}

fn default_annotate_fallback() -> bool {
    true
}
