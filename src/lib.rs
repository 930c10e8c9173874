//! MentorApp backend - Deep business diagnostic engine
//!
//! Scores a business questionnaire across functional domains, classifies
//! each domain by severity and priority, orders the domains into a
//! dependency-aware 30/60/90-day roadmap and optionally enriches the result
//! with an LLM-written narrative.
//!
//! The scoring core is deterministic and never depends on the narrative.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
