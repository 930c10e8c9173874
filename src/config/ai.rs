//! AI provider configuration
//!
//! The whole section is optional. Without any API key the service runs in
//! template-only mode and never calls a provider.

use serde::Deserialize;
use std::time::Duration;

use crate::adapters::ai::{OPENAI_BASE_URL, OPENAI_DEFAULT_MODEL, XAI_BASE_URL, XAI_DEFAULT_MODEL};

use super::error::ValidationError;

/// AI provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// OpenAI API key
    pub openai_api_key: Option<String>,

    /// xAI (Grok) API key
    pub xai_api_key: Option<String>,

    /// Primary AI provider
    #[serde(default)]
    pub primary_provider: AiProvider,

    /// Fallback AI provider
    pub fallback_provider: Option<AiProvider>,

    #[serde(default = "default_openai_model")]
    pub openai_model: String,

    #[serde(default = "default_xai_model")]
    pub xai_model: String,

    #[serde(default = "default_openai_base_url")]
    pub openai_base_url: String,

    #[serde(default = "default_xai_base_url")]
    pub xai_base_url: String,

    /// Upper bound for a whole narrative call, in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Retries on transient failures inside one provider
    #[serde(default)]
    pub max_retries: u32,

    /// Sampling temperature for narrative calls
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

/// AI provider type
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    #[default]
    OpenAI,
    Xai,
}

impl AiProvider {
    pub fn name(&self) -> &'static str {
        match self {
            AiProvider::OpenAI => "openai",
            AiProvider::Xai => "xai",
        }
    }
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if OpenAI is configured
    pub fn has_openai(&self) -> bool {
        self.openai_api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    /// Check if xAI is configured
    pub fn has_xai(&self) -> bool {
        self.xai_api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    /// True when any provider key is present.
    pub fn is_configured(&self) -> bool {
        self.has_openai() || self.has_xai()
    }

    /// API key for a provider, if set and non-empty.
    pub fn api_key(&self, provider: AiProvider) -> Option<&str> {
        let key = match provider {
            AiProvider::OpenAI => self.openai_api_key.as_deref(),
            AiProvider::Xai => self.xai_api_key.as_deref(),
        };
        key.filter(|k| !k.is_empty())
    }

    pub fn model(&self, provider: AiProvider) -> &str {
        match provider {
            AiProvider::OpenAI => &self.openai_model,
            AiProvider::Xai => &self.xai_model,
        }
    }

    pub fn base_url(&self, provider: AiProvider) -> &str {
        match provider {
            AiProvider::OpenAI => &self.openai_base_url,
            AiProvider::Xai => &self.xai_base_url,
        }
    }

    /// Validate AI configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.openai_model.trim().is_empty() {
            return Err(ValidationError::EmptyModel("openai"));
        }
        if self.xai_model.trim().is_empty() {
            return Err(ValidationError::EmptyModel("xai"));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ValidationError::InvalidTemperature);
        }

        // Template-only mode
        if !self.is_configured() {
            return Ok(());
        }

        if self.api_key(self.primary_provider).is_none() {
            return Err(missing_key(self.primary_provider));
        }
        if let Some(fallback) = self.fallback_provider {
            if fallback == self.primary_provider {
                return Err(ValidationError::FallbackSameAsPrimary);
            }
            if self.api_key(fallback).is_none() {
                return Err(missing_key(fallback));
            }
        }

        Ok(())
    }
}

fn missing_key(provider: AiProvider) -> ValidationError {
    match provider {
        AiProvider::OpenAI => ValidationError::MissingRequired("MENTOR__AI__OPENAI_API_KEY"),
        AiProvider::Xai => ValidationError::MissingRequired("MENTOR__AI__XAI_API_KEY"),
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            xai_api_key: None,
            primary_provider: AiProvider::default(),
            fallback_provider: None,
            openai_model: default_openai_model(),
            xai_model: default_xai_model(),
            openai_base_url: default_openai_base_url(),
            xai_base_url: default_xai_base_url(),
            timeout_secs: default_timeout(),
            max_retries: 0,
            temperature: default_temperature(),
        }
    }
}

fn default_openai_model() -> String {
    OPENAI_DEFAULT_MODEL.to_string()
}

fn default_xai_model() -> String {
    XAI_DEFAULT_MODEL.to_string()
}

fn default_openai_base_url() -> String {
    OPENAI_BASE_URL.to_string()
}

fn default_xai_base_url() -> String {
    XAI_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    120
}

fn default_temperature() -> f32 {
    0.2
}
