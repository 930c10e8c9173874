//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared error vocabulary
//! - `diagnostic` - Deep diagnostic scoring, roadmap and result assembly

pub mod diagnostic;
pub mod foundation;
