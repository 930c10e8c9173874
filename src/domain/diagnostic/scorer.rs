//! Domain scorer - aggregates normalized answers into one score per domain.

use serde::Serialize;

use super::answers::{AnswerNormalizer, QuestionnaireAnswers, LIKERT_MAX, LIKERT_MIN};
use super::catalog::{DiagnosticCatalog, DomainConfig};
use super::classification::{Priority, Severity};

/// Score assumed for a domain without usable Likert answers.
pub const NEUTRAL_SCORE: f64 = 3.0;

/// Deduction applied once when any risk keyword appears in the domain's text answers.
pub const KEYWORD_PENALTY: f64 = 0.5;

/// Maximum characters of a text answer kept as evidence.
pub const EVIDENCE_EXCERPT_CHARS: usize = 140;

const ELLIPSIS: char = '…';

/// Raw output of scoring one domain.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainScore {
    /// Clamped score in [1.0, 5.0].
    pub score: f64,
    /// Text excerpts in field order.
    pub evidence: Vec<String>,
    /// Usable Likert answers that fed the score.
    pub likert_count: usize,
    /// Whether a risk keyword lowered the score.
    pub keyword_hit: bool,
}

/// Classified result for one domain of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainResult {
    pub domain: String,
    pub label: String,
    pub score: f64,
    pub severity: Severity,
    pub priority: Priority,
    pub evidence: Vec<String>,
    pub likert_count: usize,
}

impl DomainResult {
    /// Score rounded to two decimals for display.
    pub fn display_score(&self) -> f64 {
        (self.score * 100.0).round() / 100.0
    }
}

/// Stateless scorer for questionnaire domains.
pub struct DomainScorer;

impl DomainScorer {
    /// Scores one domain.
    ///
    /// Mean of the usable Likert answers (neutral 3.0 when none), minus a single
    /// keyword penalty when any text answer mentions a configured keyword,
    /// clamped to the Likert scale.
    pub fn score_domain(answers: &QuestionnaireAnswers, config: &DomainConfig) -> DomainScore {
        let normalizer = AnswerNormalizer::for_letter_codes(config.letter_codes);
        let values: Vec<f64> = config
            .likert_fields
            .iter()
            .filter_map(|field| answers.get(field))
            .filter_map(|raw| normalizer.normalize(raw))
            .collect();

        let keywords: Vec<String> = config
            .keywords
            .iter()
            .filter(|k| !k.trim().is_empty())
            .map(|k| k.to_lowercase())
            .collect();

        let mut evidence = Vec::new();
        let mut keyword_hit = false;
        for field in &config.text_fields {
            let Some(text) = answers.text(field) else {
                continue;
            };
            evidence.push(format!("{}: {}", field, excerpt(&text)));
            if !keyword_hit {
                let lowered = text.to_lowercase();
                keyword_hit = keywords.iter().any(|k| lowered.contains(k.as_str()));
            }
        }

        let mut score = if values.is_empty() {
            NEUTRAL_SCORE
        } else {
            values.iter().sum::<f64>() / values.len() as f64
        };
        if keyword_hit {
            score -= KEYWORD_PENALTY;
        }

        DomainScore {
            score: score.clamp(LIKERT_MIN, LIKERT_MAX),
            evidence,
            likert_count: values.len(),
            keyword_hit,
        }
    }

    /// Scores and classifies one domain.
    pub fn evaluate(answers: &QuestionnaireAnswers, config: &DomainConfig) -> DomainResult {
        let DomainScore {
            score,
            evidence,
            likert_count,
            ..
        } = Self::score_domain(answers, config);
        let severity = Severity::from_score(score);

        DomainResult {
            domain: config.key.clone(),
            label: config.label.clone(),
            score,
            severity,
            priority: severity.priority(),
            evidence,
            likert_count,
        }
    }

    /// Evaluates every catalog domain, in enumeration order.
    pub fn evaluate_all(
        answers: &QuestionnaireAnswers,
        catalog: &DiagnosticCatalog,
    ) -> Vec<DomainResult> {
        catalog
            .domains()
            .iter()
            .map(|config| Self::evaluate(answers, config))
            .collect()
    }
}

/// Truncates a text answer to the evidence length, marking the cut.
fn excerpt(text: &str) -> String {
    let mut chars = text.char_indices();
    match chars.nth(EVIDENCE_EXCERPT_CHARS) {
        Some((cut, _)) => {
            let mut out = text[..cut].to_string();
            out.push(ELLIPSIS);
            out
        }
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::{json, Map, Value};

    fn answers(value: Value) -> QuestionnaireAnswers {
        QuestionnaireAnswers::from_value(value).unwrap()
    }

    fn finanzas() -> DomainConfig {
        DomainConfig::new("finanzas", "Finanzas")
            .with_likert_fields(["q1", "q2", "q3"])
            .with_text_fields(["t1", "t2"])
            .with_keywords(["sin liquidez", "Deuda"])
    }

    #[test]
    fn mean_of_likert_answers() {
        let result = DomainScorer::evaluate(&answers(json!({"q1": "1", "q2": "2", "q3": "3"})), &finanzas());

        assert_eq!(result.score, 2.0);
        assert_eq!(result.likert_count, 3);
        // 2.0 sits on the Critical boundary
        assert_eq!(result.severity, Severity::Critical);
        assert_eq!(result.priority, Priority::P1);
    }

    #[test]
    fn empty_answers_score_neutral() {
        let config = DomainConfig::new("d", "D").with_likert_fields(["q1"]);
        let result = DomainScorer::evaluate(&QuestionnaireAnswers::default(), &config);

        assert_eq!(result.score, 3.0);
        assert_eq!(result.likert_count, 0);
        assert!(result.evidence.is_empty());
        assert_eq!(result.severity, Severity::Medium);
        assert_eq!(result.priority, Priority::P2);
    }

    #[test]
    fn keyword_hit_lowers_score_to_medium_boundary() {
        let result = DomainScorer::evaluate(
            &answers(json!({
                "q1": "4", "q2": "4", "q3": "4",
                "t1": "Estamos sin liquidez desde marzo"
            })),
            &finanzas(),
        );

        assert_eq!(result.score, 3.5);
        // 3.5 is not above 3.5, so it stays Medium
        assert_eq!(result.severity, Severity::Medium);
        assert_eq!(result.priority, Priority::P2);
    }

    #[test]
    fn keyword_penalty_applies_once() {
        let score = DomainScorer::score_domain(
            &answers(json!({
                "q1": "4",
                "t1": "sin liquidez y mucha deuda",
                "t2": "más deuda"
            })),
            &finanzas(),
        );

        assert!(score.keyword_hit);
        assert_eq!(score.score, 3.5);
        assert_eq!(score.evidence.len(), 2);
    }

    #[test]
    fn keyword_match_is_case_insensitive() {
        let score = DomainScorer::score_domain(
            &answers(json!({"t1": "Tenemos DEUDA con proveedores"})),
            &finanzas(),
        );
        assert!(score.keyword_hit);
        assert_eq!(score.score, 2.5);
    }

    #[test]
    fn keyword_penalty_never_drops_below_one() {
        let score = DomainScorer::score_domain(
            &answers(json!({"q1": "1", "q2": "1", "t1": "deuda"})),
            &finanzas(),
        );
        assert_eq!(score.score, 1.0);
    }

    #[test]
    fn blank_keywords_never_match() {
        let config = DomainConfig::new("d", "D")
            .with_text_fields(["t1"])
            .with_keywords(["", "  "]);
        let score = DomainScorer::score_domain(&answers(json!({"t1": "todo bien"})), &config);
        assert!(!score.keyword_hit);
        assert_eq!(score.score, 3.0);
    }

    #[test]
    fn unusable_answers_are_skipped() {
        let score = DomainScorer::score_domain(
            &answers(json!({"q1": "5", "q2": "nueve", "q3": 7})),
            &finanzas(),
        );
        assert_eq!(score.likert_count, 1);
        assert_eq!(score.score, 5.0);
    }

    #[test]
    fn letter_codes_count_when_enabled() {
        let config = DomainConfig::new("d", "D")
            .with_likert_fields(["q1", "q2"])
            .with_letter_codes(true);
        let score = DomainScorer::score_domain(&answers(json!({"q1": "A", "q2": "c"})), &config);
        assert_eq!(score.likert_count, 2);
        assert_eq!(score.score, 2.0);
    }

    #[test]
    fn evidence_keeps_field_order_and_prefix() {
        let score = DomainScorer::score_domain(
            &answers(json!({"t2": "segundo", "t1": "primero"})),
            &finanzas(),
        );
        assert_eq!(score.evidence, vec!["t1: primero", "t2: segundo"]);
    }

    #[test]
    fn long_evidence_is_truncated_with_ellipsis() {
        let text = "ñ".repeat(200);
        let score = DomainScorer::score_domain(&answers(json!({"t1": text})), &finanzas());

        let expected = format!("t1: {}…", "ñ".repeat(140));
        assert_eq!(score.evidence, vec![expected]);
    }

    #[test]
    fn evidence_at_limit_is_not_marked() {
        let text = "a".repeat(140);
        let score = DomainScorer::score_domain(&answers(json!({"t1": text.clone()})), &finanzas());
        assert_eq!(score.evidence, vec![format!("t1: {}", text)]);
    }

    #[test]
    fn evaluate_all_follows_catalog_order() {
        let catalog = DiagnosticCatalog::reference();
        let results = DomainScorer::evaluate_all(&QuestionnaireAnswers::default(), &catalog);

        let keys: Vec<&str> = results.iter().map(|r| r.domain.as_str()).collect();
        assert_eq!(keys, catalog.keys().collect::<Vec<_>>());
        assert!(results.iter().all(|r| r.score == NEUTRAL_SCORE));
    }

    #[test]
    fn display_score_rounds_to_two_decimals() {
        let result = DomainScorer::evaluate(
            &answers(json!({"q1": "1", "q2": "2", "q3": "2"})),
            &finanzas(),
        );
        assert_eq!(result.display_score(), 1.67);
    }

    fn raw_answer() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            any::<i64>().prop_map(|n| json!(n)),
            any::<f64>().prop_map(|f| json!(f)),
            "[0-9]{0,3}".prop_map(Value::String),
            "\\PC{0,20}".prop_map(Value::String),
            Just(json!("sin liquidez")),
        ]
    }

    proptest! {
        #[test]
        fn score_stays_within_bounds(
            raw in proptest::collection::vec(raw_answer(), 0..6)
        ) {
            let mut map = Map::new();
            for (i, value) in raw.into_iter().enumerate() {
                let key = if i % 2 == 0 { format!("q{}", i / 2 + 1) } else { format!("t{}", i / 2 + 1) };
                map.insert(key, value);
            }
            let score = DomainScorer::score_domain(&QuestionnaireAnswers::new(map), &finanzas());
            prop_assert!((1.0..=5.0).contains(&score.score));
        }
    }
}
