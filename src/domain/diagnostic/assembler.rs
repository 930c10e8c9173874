//! Result assembler - merges local results, roadmap and optional narrative.
//!
//! Everything numeric or structural comes from local computation. The
//! narrative only replaces text, and any text it does not supply comes from
//! static templates, so a complete result is produced whether or not the
//! narrative call succeeded.

use std::collections::BTreeMap;

use serde::Serialize;

use super::catalog::{DiagnosticCatalog, DomainConfig};
use super::classification::{Priority, Severity};
use super::detail::DomainDetail;
use super::narrative::{LlmNarrative, NarrativeOutcome};
use super::roadmap::Roadmap;
use super::scorer::DomainResult;

const TEMPLATE_ANALYSIS: &str = "Diagnóstico generado en modo DEMO (sin clave OpenAI o por error).";

const TEMPLATE_OPPORTUNITIES: &[&str] = &[
    "Estandarizar procesos críticos con tableros de control",
    "Fortalecer flujo de caja y disciplina presupuestal",
    "Profesionalizar gestión de talento y liderazgo intermedio",
];

const TEMPLATE_RISKS: &[&str] = &[
    "Dependencia de pocos clientes/proveedores",
    "Tensión de liquidez por falta de presupuesto y cobranza reactiva",
];

const TEMPLATE_ACTION_PLAN: &[&str] = &[
    "Implementar presupuesto operativo y flujo semanal (30 días)",
    "Formalizar evaluación de desempeño y feedback trimestral (60 días)",
    "Definir KPIs y rutinas de revisión mensual (90 días)",
];

const TEMPLATE_KPIS: &[&str] = &[
    "Margen bruto",
    "Ciclo de caja",
    "Rotación de personal",
    "NPS",
    "OTIF",
];

const TEMPLATE_SUMMARY: &str =
    "Se priorizan los dominios con severidad Crítico/Alto. Se propone un plan 30-60-90 con KPIs claros.";

/// One row of the domain table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainRow {
    pub domain: String,
    pub name: String,
    pub score: f64,
    pub severity: Severity,
    pub priority: Priority,
}

/// Consulting structure: summary, sorted domain table and per-domain detail.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsultingStructure {
    pub resumen_ejecutivo: String,
    pub tabla_dominios: Vec<DomainRow>,
    pub dominios: BTreeMap<String, DomainDetail>,
}

/// Final payload of a deep diagnostic analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub analisis_detallado: String,
    pub oportunidades_estrategicas: Vec<String>,
    pub riesgos_identificados: Vec<String>,
    pub plan_accion_sugerido: Vec<String>,
    pub indicadores_clave_rendimiento: Vec<String>,
    pub estructura_consultiva: ConsultingStructure,
    pub roadmap_inteligente: Roadmap,
}

/// Builds `AnalysisResult`s against one catalog.
pub struct ResultAssembler<'a> {
    catalog: &'a DiagnosticCatalog,
    annotate_fallback: bool,
}

impl<'a> ResultAssembler<'a> {
    pub fn new(catalog: &'a DiagnosticCatalog) -> Self {
        Self {
            catalog,
            annotate_fallback: true,
        }
    }

    /// Whether a failed narrative call is flagged in `analisis_detallado`.
    pub fn with_fallback_annotation(mut self, enabled: bool) -> Self {
        self.annotate_fallback = enabled;
        self
    }

    /// Assembles the payload. Never fails.
    pub fn assemble(
        &self,
        results: &[DomainResult],
        roadmap: &Roadmap,
        outcome: &NarrativeOutcome,
    ) -> AnalysisResult {
        let empty = LlmNarrative::default();
        let narrative = outcome.narrative().unwrap_or(&empty);

        let analisis_detallado = match (outcome.failure_reason(), &narrative.analisis_detallado) {
            (Some(reason), _) if self.annotate_fallback => {
                format!("[DEMO POR ERROR: {}] {}", reason, TEMPLATE_ANALYSIS)
            }
            (_, Some(text)) => text.clone(),
            _ => TEMPLATE_ANALYSIS.to_string(),
        };

        AnalysisResult {
            analisis_detallado,
            oportunidades_estrategicas: or_template(
                &narrative.oportunidades_estrategicas,
                TEMPLATE_OPPORTUNITIES,
            ),
            riesgos_identificados: or_template(&narrative.riesgos_identificados, TEMPLATE_RISKS),
            plan_accion_sugerido: or_template(&narrative.plan_accion_sugerido, TEMPLATE_ACTION_PLAN),
            indicadores_clave_rendimiento: or_template(
                &narrative.indicadores_clave_rendimiento,
                TEMPLATE_KPIS,
            ),
            estructura_consultiva: self.structure(results, narrative),
            roadmap_inteligente: roadmap.clone(),
        }
    }

    fn structure(&self, results: &[DomainResult], narrative: &LlmNarrative) -> ConsultingStructure {
        let mut tabla_dominios: Vec<DomainRow> = results
            .iter()
            .map(|r| DomainRow {
                domain: r.domain.clone(),
                name: r.label.clone(),
                score: r.display_score(),
                severity: r.severity,
                priority: r.priority,
            })
            .collect();
        // Stable: ties keep enumeration order.
        tabla_dominios.sort_by_key(|row| row.priority);

        let dominios = results
            .iter()
            .map(|r| {
                let detail = match self.catalog.domain(&r.domain) {
                    Some(config) => DomainDetail::template(config, r),
                    None => DomainDetail::template(&DomainConfig::new(&r.domain, &r.label), r),
                };
                let detail = match narrative.dominios.get(&r.domain) {
                    Some(overrides) => detail.merge(overrides),
                    None => detail,
                };
                (r.domain.clone(), detail)
            })
            .collect();

        ConsultingStructure {
            resumen_ejecutivo: narrative
                .resumen_ejecutivo
                .clone()
                .unwrap_or_else(|| TEMPLATE_SUMMARY.to_string()),
            tabla_dominios,
            dominios,
        }
    }
}

fn or_template(value: &Option<Vec<String>>, template: &[&str]) -> Vec<String> {
    match value {
        Some(items) => items.clone(),
        None => template.iter().map(|s| s.to_string()).collect(),
    }
}
