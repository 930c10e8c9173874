//! Prompt construction for the narrative enrichment call.

use std::collections::BTreeMap;

use serde_json::{json, Value};

use super::answers::QuestionnaireAnswers;
use super::catalog::DiagnosticCatalog;
use super::classification::Priority;
use super::scorer::DomainResult;

/// System message sent with every narrative request.
pub const NARRATIVE_SYSTEM_PROMPT: &str =
    "Responde únicamente con JSON válido siguiendo las instrucciones.";

/// Domains included when no domain is P1 or P2.
const FALLBACK_ACTIVE_DOMAINS: usize = 2;

const INSTRUCTIONS: &str = "Eres un CONSULTOR SENIOR. Redacta con precisión, foco y priorización.\n\
Genera un JSON con las claves:\n\
1) analisis_detallado (string)\n\
2) oportunidades_estrategicas (string[])\n\
3) riesgos_identificados (string[])\n\
4) plan_accion_sugerido (string[])\n\
5) indicadores_clave_rendimiento (string[])\n\
6) estructura_consultiva (object) con:\n\
   - resumen_ejecutivo (string)\n\
   - dominios (obj por dominio activo) con: diagnostico, causas_raiz[], recomendaciones_30_60_90{30,60,90}, kpis[], riesgos[], quick_wins[]\n\
NO agregues texto fuera del JSON. Tono consultivo, metas concretas, 2-4 bullets por lista.";

/// A ready-to-send narrative request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NarrativePrompt {
    pub system: String,
    pub user: String,
}

/// Domains the narrative should focus on.
///
/// Every P1 or P2 domain in enumeration order; when there is none, the two
/// lowest-scoring domains (ties keep enumeration order).
pub fn active_domains(results: &[DomainResult]) -> Vec<&DomainResult> {
    let urgent: Vec<&DomainResult> = results
        .iter()
        .filter(|r| matches!(r.priority, Priority::P1 | Priority::P2))
        .collect();
    if !urgent.is_empty() {
        return urgent;
    }

    let mut lowest: Vec<&DomainResult> = results.iter().collect();
    lowest.sort_by(|a, b| a.score.total_cmp(&b.score));
    lowest.truncate(FALLBACK_ACTIVE_DOMAINS);
    lowest
}

/// Builds the narrative request for one analysis run.
pub fn build_narrative_prompt(
    answers: &QuestionnaireAnswers,
    catalog: &DiagnosticCatalog,
    results: &[DomainResult],
) -> NarrativePrompt {
    let active = active_domains(results);

    let table: Vec<Value> = active
        .iter()
        .map(|r| {
            json!({
                "dominio": r.domain,
                "nombre": r.label,
                "score": r.display_score(),
                "severidad": r.severity.label(),
                "prioridad": r.priority.label(),
                "evidencias": r.evidence,
            })
        })
        .collect();

    let mut relevant: BTreeMap<String, Value> = BTreeMap::new();
    for config in active.iter().filter_map(|r| catalog.domain(&r.domain)) {
        for field in config.likert_fields.iter().chain(&config.text_fields) {
            let raw = answers.get(field).cloned().unwrap_or(Value::Null);
            relevant.insert(field.clone(), raw);
        }
    }

    let user = json!({
        "contexto": {
            "dominios_activados": table,
            "campos_relevantes": relevant,
        },
        "instrucciones": INSTRUCTIONS,
    });

    NarrativePrompt {
        system: NARRATIVE_SYSTEM_PROMPT.to_string(),
        user: user.to_string(),
    }
}
