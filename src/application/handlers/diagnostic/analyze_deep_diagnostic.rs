//! AnalyzeDeepDiagnosticHandler - Command handler for the deep diagnostic.
//!
//! Scores every catalog domain, builds the roadmap and assembles the result.
//! When a provider is configured, a narrative is requested under a bounded
//! timeout; any failure only removes the narrative text.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::domain::diagnostic::{
    build_narrative_prompt, AnalysisResult, DiagnosticCatalog, DomainResult, DomainScorer,
    LlmNarrative, NarrativeOutcome, QuestionnaireAnswers, ResultAssembler, RoadmapBuilder,
};
use crate::ports::{AIError, AIProvider, CompletionRequest, MessageRole, RequestMetadata};

/// Command to analyse one questionnaire submission.
#[derive(Debug, Clone)]
pub struct AnalyzeDeepDiagnosticCommand {
    pub answers: QuestionnaireAnswers,
    /// Trace id forwarded to the AI provider.
    pub trace_id: String,
}

/// Result of a deep diagnostic analysis.
#[derive(Debug, Clone)]
pub struct AnalyzeDeepDiagnosticResult {
    pub analysis: AnalysisResult,
    pub narrative: NarrativeOutcome,
}

/// Tuning of the narrative call.
#[derive(Debug, Clone, PartialEq)]
pub struct NarrativeSettings {
    /// Upper bound for the whole provider call.
    pub timeout: Duration,
    pub temperature: f32,
    /// Prefix `analisis_detallado` when the call failed.
    pub annotate_fallback: bool,
}

impl Default for NarrativeSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(120),
            temperature: 0.2,
            annotate_fallback: true,
        }
    }
}

/// Handler for deep diagnostic analyses.
pub struct AnalyzeDeepDiagnosticHandler {
    catalog: Arc<DiagnosticCatalog>,
    provider: Option<Arc<dyn AIProvider>>,
    settings: NarrativeSettings,
}

impl AnalyzeDeepDiagnosticHandler {
    pub fn new(
        catalog: Arc<DiagnosticCatalog>,
        provider: Option<Arc<dyn AIProvider>>,
        settings: NarrativeSettings,
    ) -> Self {
        Self {
            catalog,
            provider,
            settings,
        }
    }

    /// Catalog the handler scores against.
    pub fn catalog(&self) -> &DiagnosticCatalog {
        &self.catalog
    }

    pub async fn handle(&self, cmd: AnalyzeDeepDiagnosticCommand) -> AnalyzeDeepDiagnosticResult {
        // 1. Deterministic core
        let results = DomainScorer::evaluate_all(&cmd.answers, &self.catalog);
        let roadmap = RoadmapBuilder::build(&results, self.catalog.dependencies());

        for result in &results {
            debug!(
                domain = %result.domain,
                score = result.score,
                severity = result.severity.label(),
                priority = result.priority.label(),
                likert_count = result.likert_count,
                "domain scored"
            );
        }
        if !roadmap.forced.is_empty() {
            warn!(
                forced = ?roadmap.forced,
                "roadmap placed domains with unmet prerequisites"
            );
        }

        // 2. Optional narrative enrichment
        let narrative = self
            .request_narrative(&cmd.answers, &results, &cmd.trace_id)
            .await;
        if let Some(reason) = narrative.failure_reason() {
            warn!(reason, trace_id = %cmd.trace_id, "narrative unavailable, using templates");
        }

        // 3. Assemble
        let analysis = ResultAssembler::new(&self.catalog)
            .with_fallback_annotation(self.settings.annotate_fallback)
            .assemble(&results, &roadmap, &narrative);

        info!(
            domains = results.len(),
            p1 = results.iter().filter(|r| r.severity.is_urgent()).count(),
            narrative = matches!(narrative, NarrativeOutcome::Generated(_)),
            "deep diagnostic analysed"
        );

        AnalyzeDeepDiagnosticResult {
            analysis,
            narrative,
        }
    }

    async fn request_narrative(
        &self,
        answers: &QuestionnaireAnswers,
        results: &[DomainResult],
        trace_id: &str,
    ) -> NarrativeOutcome {
        let Some(provider) = &self.provider else {
            return NarrativeOutcome::NotConfigured;
        };

        let prompt = build_narrative_prompt(answers, &self.catalog, results);
        let request = CompletionRequest::new(RequestMetadata::new(trace_id))
            .with_system_prompt(prompt.system)
            .with_message(MessageRole::User, prompt.user)
            .with_temperature(self.settings.temperature)
            .with_json_response();

        let started = Instant::now();
        let completion =
            match tokio::time::timeout(self.settings.timeout, provider.complete(request)).await {
                Ok(result) => result,
                Err(_) => Err(AIError::timeout(self.settings.timeout.as_secs() as u32)),
            };
        let elapsed_ms = started.elapsed().as_millis() as u64;

        let completion = match completion {
            Ok(completion) => completion,
            Err(err) => {
                warn!(
                    provider = %provider.provider_info().name,
                    error = %err,
                    elapsed_ms,
                    "narrative call failed"
                );
                return NarrativeOutcome::failed(err.kind());
            }
        };

        debug!(
            model = %completion.model,
            total_tokens = completion.usage.total_tokens,
            elapsed_ms,
            "narrative received"
        );

        match LlmNarrative::parse(&completion.content, &self.catalog) {
            Ok(narrative) => NarrativeOutcome::Generated(narrative),
            Err(err) => {
                warn!(error = %err, "narrative reply unusable");
                NarrativeOutcome::failed(err.kind())
            }
        }
    }
}
