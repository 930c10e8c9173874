//! Per-domain consulting detail: the local template and narrative overrides.

use serde::{Deserialize, Serialize};

use super::catalog::{DomainConfig, Kpi};
use super::narrative::DomainNarrative;
use super::scorer::DomainResult;

/// KPI line of a detail block: a named target, or free text from a narrative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KpiEntry {
    Target(Kpi),
    Text(String),
}

/// Risk with its mitigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Risk {
    pub riesgo: String,
    pub mitigacion: String,
}

/// Risk line of a detail block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RiskEntry {
    Mitigated(Risk),
    Text(String),
}

/// Actions for the 30, 60 and 90 day windows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionPlan {
    #[serde(rename = "30")]
    pub days_30: Vec<String>,
    #[serde(rename = "60")]
    pub days_60: Vec<String>,
    #[serde(rename = "90")]
    pub days_90: Vec<String>,
}

/// Detail block of one domain in the consulting structure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainDetail {
    pub diagnostico: String,
    pub causas_raiz: Vec<String>,
    pub recomendaciones_30_60_90: ActionPlan,
    pub kpis: Vec<KpiEntry>,
    pub riesgos: Vec<RiskEntry>,
    pub quick_wins: Vec<String>,
    pub evidencias: Vec<String>,
    pub likerts_utilizados: usize,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn generic_kpis() -> Vec<Kpi> {
    vec![
        Kpi::new("Cumplimiento de metas", "≥ 85% mensual"),
        Kpi::new("Tiempo de ciclo", "−20% en 90 días"),
    ]
}

impl DomainDetail {
    /// Template detail built from local data only.
    pub fn template(config: &DomainConfig, result: &DomainResult) -> Self {
        let urgency = if result.severity.is_urgent() {
            "Prioridad alta"
        } else {
            "Prioridad media"
        };
        let kpis = if config.template_kpis.is_empty() {
            generic_kpis()
        } else {
            config.template_kpis.clone()
        };

        Self {
            diagnostico: format!(
                "{}: {}. Se observan brechas que requieren intervención inmediata para estabilizar resultados.",
                result.label, urgency
            ),
            causas_raiz: strings(&[
                "Falta de estandarización y rutinas de control",
                "Datos incompletos para decidir",
                "Roles/propietarios difusos sobre los procesos clave",
            ]),
            recomendaciones_30_60_90: ActionPlan {
                days_30: strings(&[
                    "Definir objetivos claros y responsables",
                    "Establecer tablero mínimo de control",
                ]),
                days_60: strings(&[
                    "Documentar procesos críticos y capacitar al equipo",
                    "Reuniones de seguimiento quincenal",
                ]),
                days_90: strings(&[
                    "Medir impacto y ajustar metas trimestrales",
                    "Escalar mejores prácticas",
                ]),
            },
            kpis: kpis.into_iter().map(KpiEntry::Target).collect(),
            riesgos: vec![RiskEntry::Mitigated(Risk {
                riesgo: "Falta de adopción".to_string(),
                mitigacion: "Acompañamiento con responsables y quick wins tempranos".to_string(),
            })],
            quick_wins: strings(&[
                "Checklist operativo semanal",
                "Hitos quincenales con tablero visible",
            ]),
            evidencias: result.evidence.clone(),
            likerts_utilizados: result.likert_count,
        }
    }

    /// Replaces template text with the well-typed parts of a narrative block.
    ///
    /// Evidence and Likert counts always stay local.
    pub fn merge(mut self, narrative: &DomainNarrative) -> Self {
        if let Some(diagnostico) = &narrative.diagnostico {
            self.diagnostico = diagnostico.clone();
        }
        if let Some(causas) = &narrative.causas_raiz {
            self.causas_raiz = causas.clone();
        }
        if let Some(plan) = &narrative.recomendaciones_30_60_90 {
            self.recomendaciones_30_60_90 = plan.clone();
        }
        if let Some(kpis) = &narrative.kpis {
            self.kpis = kpis.clone();
        }
        if let Some(riesgos) = &narrative.riesgos {
            self.riesgos = riesgos.clone();
        }
        if let Some(quick_wins) = &narrative.quick_wins {
            self.quick_wins = quick_wins.clone();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::diagnostic::classification::Severity;
    use crate::domain::diagnostic::DiagnosticCatalog;
    use serde_json::json;

    fn result(config: &DomainConfig, score: f64) -> DomainResult {
        let severity = Severity::from_score(score);
        DomainResult {
            domain: config.key.clone(),
            label: config.label.clone(),
            score,
            severity,
            priority: severity.priority(),
            evidence: vec!["t1: algo".to_string()],
            likert_count: 4,
        }
    }

    #[test]
    fn urgent_domains_get_high_priority_wording() {
        let config = DomainConfig::new("d", "Dominio");
        let detail = DomainDetail::template(&config, &result(&config, 2.5));
        assert!(detail.diagnostico.starts_with("Dominio: Prioridad alta."));

        let detail = DomainDetail::template(&config, &result(&config, 3.0));
        assert!(detail.diagnostico.starts_with("Dominio: Prioridad media."));
    }

    #[test]
    fn template_uses_domain_kpis_when_configured() {
        let catalog = DiagnosticCatalog::reference();
        let finanzas = catalog.domain("finanzas").unwrap();
        let detail = DomainDetail::template(finanzas, &result(finanzas, 3.0));
        assert_eq!(
            detail.kpis[0],
            KpiEntry::Target(Kpi::new("Ciclo de caja", "≤ 45 días"))
        );

        let direccion = catalog.domain("direccion").unwrap();
        let detail = DomainDetail::template(direccion, &result(direccion, 3.0));
        assert_eq!(
            detail.kpis[0],
            KpiEntry::Target(Kpi::new("Cumplimiento de metas", "≥ 85% mensual"))
        );
    }

    #[test]
    fn template_carries_traceability_fields() {
        let config = DomainConfig::new("d", "D");
        let detail = DomainDetail::template(&config, &result(&config, 3.0));
        let json = serde_json::to_value(&detail).unwrap();

        assert_eq!(json["evidencias"], json!(["t1: algo"]));
        assert_eq!(json["likerts_utilizados"], json!(4));
        assert!(json["recomendaciones_30_60_90"]["30"].is_array());
        assert_eq!(json["riesgos"][0]["riesgo"], "Falta de adopción");
        assert_eq!(json["kpis"][0]["nombre"], "Cumplimiento de metas");
    }

    #[test]
    fn merge_overrides_only_supplied_fields() {
        let config = DomainConfig::new("d", "D");
        let template = DomainDetail::template(&config, &result(&config, 3.0));
        let narrative = DomainNarrative {
            diagnostico: Some("Texto del modelo".to_string()),
            quick_wins: Some(vec!["Uno".to_string()]),
            ..DomainNarrative::default()
        };

        let merged = template.clone().merge(&narrative);
        assert_eq!(merged.diagnostico, "Texto del modelo");
        assert_eq!(merged.quick_wins, vec!["Uno"]);
        assert_eq!(merged.causas_raiz, template.causas_raiz);
        assert_eq!(merged.evidencias, template.evidencias);
    }
}
