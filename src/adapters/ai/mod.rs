//! AI Provider Adapters.
//!
//! Implementations of the AIProvider port.
//!
//! ## Available Adapters
//!
//! - `MockAIProvider` - Configurable mock for testing
//! - `OpenAIProvider` - OpenAI-compatible chat completions (OpenAI, xAI Grok)
//! - `FailoverAIProvider` - Wrapper with automatic failover between providers

mod failover_provider;
mod mock_provider;
mod openai_provider;

pub use failover_provider::FailoverAIProvider;
pub use mock_provider::{MockAIProvider, MockError, MockResponse};
pub use openai_provider::{
    OpenAIConfig, OpenAIProvider, OPENAI_BASE_URL, OPENAI_DEFAULT_MODEL, XAI_BASE_URL,
    XAI_DEFAULT_MODEL,
};
