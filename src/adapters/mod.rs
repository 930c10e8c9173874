//! Adapters - Implementations of ports for external systems.
//!
//! - `ai` - LLM providers (OpenAI-compatible HTTP, failover, mock)
//! - `http` - Axum REST API

pub mod ai;
pub mod http;
