//! LLM narrative parsing and the outcome of a narrative call.
//!
//! The model is asked for a JSON object, but replies arrive in several shapes:
//! a bare object, a JSON string that itself contains the object, or an object
//! wrapped in a Markdown code fence. Whatever arrives, only well-typed narrative
//! fields survive. Scores, severities, priorities, tables and roadmaps sent by
//! the model are ignored.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

use super::catalog::DiagnosticCatalog;
use super::detail::{ActionPlan, KpiEntry, RiskEntry};

/// Reasons a model reply cannot be used as a narrative.
#[derive(Debug, Error)]
pub enum NarrativeError {
    #[error("narrative reply is empty")]
    Empty,

    #[error("narrative reply is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("narrative reply is a JSON {0}, expected an object")]
    NotAnObject(&'static str),
}

impl NarrativeError {
    /// Short machine-readable name, used in fallback annotations.
    pub fn kind(&self) -> &'static str {
        match self {
            NarrativeError::Empty => "EmptyNarrative",
            NarrativeError::InvalidJson(_) => "InvalidJson",
            NarrativeError::NotAnObject(_) => "NotAnObject",
        }
    }
}

/// Narrative overrides for one domain's detail block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DomainNarrative {
    pub diagnostico: Option<String>,
    pub causas_raiz: Option<Vec<String>>,
    pub recomendaciones_30_60_90: Option<ActionPlan>,
    pub kpis: Option<Vec<KpiEntry>>,
    pub riesgos: Option<Vec<RiskEntry>>,
    pub quick_wins: Option<Vec<String>>,
}

impl DomainNarrative {
    fn from_object(obj: &Map<String, Value>) -> Self {
        Self {
            diagnostico: text(obj, "diagnostico"),
            causas_raiz: text_list(obj, "causas_raiz"),
            recomendaciones_30_60_90: typed(obj, "recomendaciones_30_60_90"),
            kpis: typed::<Vec<KpiEntry>>(obj, "kpis").filter(|v| !v.is_empty()),
            riesgos: typed::<Vec<RiskEntry>>(obj, "riesgos").filter(|v| !v.is_empty()),
            quick_wins: text_list(obj, "quick_wins"),
        }
    }

    /// True when no field was usable.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Sanitised narrative content of a model reply.
///
/// A `None` field means the reply did not supply it in a usable form; the
/// assembler fills it from the local template.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LlmNarrative {
    pub analisis_detallado: Option<String>,
    pub oportunidades_estrategicas: Option<Vec<String>>,
    pub riesgos_identificados: Option<Vec<String>>,
    pub plan_accion_sugerido: Option<Vec<String>>,
    pub indicadores_clave_rendimiento: Option<Vec<String>>,
    pub resumen_ejecutivo: Option<String>,
    /// Detail overrides, only for domains present in the catalog.
    pub dominios: BTreeMap<String, DomainNarrative>,
}

impl LlmNarrative {
    /// Parses and sanitises a raw model reply.
    pub fn parse(raw: &str, catalog: &DiagnosticCatalog) -> Result<Self, NarrativeError> {
        let obj = parse_object(raw)?;

        let structure = obj.get("estructura_consultiva").and_then(Value::as_object);
        let dominios = structure
            .and_then(|s| s.get("dominios"))
            .and_then(Value::as_object)
            .map(|blocks| {
                blocks
                    .iter()
                    .filter(|(key, _)| catalog.domain(key).is_some())
                    .filter_map(|(key, block)| {
                        let narrative = DomainNarrative::from_object(block.as_object()?);
                        (!narrative.is_empty()).then(|| (key.clone(), narrative))
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            analisis_detallado: text(&obj, "analisis_detallado"),
            oportunidades_estrategicas: text_list(&obj, "oportunidades_estrategicas"),
            riesgos_identificados: text_list(&obj, "riesgos_identificados"),
            plan_accion_sugerido: text_list(&obj, "plan_accion_sugerido"),
            indicadores_clave_rendimiento: text_list(&obj, "indicadores_clave_rendimiento"),
            resumen_ejecutivo: structure.and_then(|s| text(s, "resumen_ejecutivo")),
            dominios,
        })
    }
}

/// Result of asking the collaborator for a narrative.
#[derive(Debug, Clone, PartialEq)]
pub enum NarrativeOutcome {
    /// The model replied with a usable narrative.
    Generated(LlmNarrative),
    /// No provider is configured; templates are the expected output.
    NotConfigured,
    /// The call or its parsing failed.
    Failed { reason: String },
}

impl NarrativeOutcome {
    pub fn failed(reason: impl Into<String>) -> Self {
        NarrativeOutcome::Failed {
            reason: reason.into(),
        }
    }

    pub fn narrative(&self) -> Option<&LlmNarrative> {
        match self {
            NarrativeOutcome::Generated(n) => Some(n),
            _ => None,
        }
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            NarrativeOutcome::Failed { reason } => Some(reason),
            _ => None,
        }
    }
}

fn parse_object(raw: &str) -> Result<Map<String, Value>, NarrativeError> {
    let body = strip_code_fence(raw.trim());
    if body.is_empty() {
        return Err(NarrativeError::Empty);
    }

    let value = match serde_json::from_str::<Value>(body)? {
        // Double-encoded: the object arrives as a JSON string.
        Value::String(inner) => serde_json::from_str::<Value>(strip_code_fence(inner.trim()))?,
        other => other,
    };

    match value {
        Value::Object(obj) => Ok(obj),
        other => Err(NarrativeError::NotAnObject(json_kind(&other))),
    }
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the info string (```json) up to the first newline.
    let rest = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn typed<T: DeserializeOwned>(obj: &Map<String, Value>, key: &str) -> Option<T> {
    obj.get(key)
        .and_then(|v| serde_json::from_value(v.clone()).ok())
}

fn text(obj: &Map<String, Value>, key: &str) -> Option<String> {
    typed::<String>(obj, key).filter(|s| !s.trim().is_empty())
}

fn text_list(obj: &Map<String, Value>, key: &str) -> Option<Vec<String>> {
    typed::<Vec<String>>(obj, key).filter(|v| !v.is_empty())
}
