//! Diagnostic Module - Deterministic scoring and remediation planning.
//!
//! Turns one questionnaire submission into domain scores, severities,
//! priorities and a dependency-aware roadmap, then assembles the consulting
//! payload with optional narrative text from an LLM.
//!
//! # Components
//!
//! - `AnswerNormalizer` - Raw answers to the 1..5 Likert scale
//! - `DiagnosticCatalog` - Domain configuration plus prerequisite graph
//! - `DomainScorer` - Per-domain score, evidence and keyword penalty
//! - `Severity` / `Priority` - Score classification
//! - `RoadmapBuilder` - Prerequisite-respecting order, phases, improvement metric
//! - `build_narrative_prompt` / `LlmNarrative` - Narrative request and reply parsing
//! - `ResultAssembler` - Final payload with template fallback
//!
//! # Design Philosophy
//!
//! Everything here is pure and synchronous. The only I/O is the narrative
//! call, which lives behind the `AIProvider` port and is driven by the
//! application layer.

mod answers;
mod assembler;
mod catalog;
mod classification;
mod dependency_graph;
mod detail;
mod narrative;
mod prompt;
mod reference_catalog;
mod roadmap;
mod scorer;

pub use answers::{normalize_likert, AnswerNormalizer, QuestionnaireAnswers, LIKERT_MAX, LIKERT_MIN};
pub use assembler::{AnalysisResult, ConsultingStructure, DomainRow, ResultAssembler};
pub use catalog::{CatalogError, DiagnosticCatalog, DomainConfig, Kpi};
pub use classification::{Priority, Severity, CRITICAL_MAX, HIGH_MAX, MEDIUM_MAX};
pub use dependency_graph::DependencyGraph;
pub use detail::{ActionPlan, DomainDetail, KpiEntry, Risk, RiskEntry};
pub use narrative::{DomainNarrative, LlmNarrative, NarrativeError, NarrativeOutcome};
pub use prompt::{active_domains, build_narrative_prompt, NarrativePrompt, NARRATIVE_SYSTEM_PROMPT};
pub use roadmap::{Roadmap, RoadmapBuilder, RoadmapPhases};
pub use scorer::{DomainResult, DomainScore, DomainScorer, KEYWORD_PENALTY, NEUTRAL_SCORE};
