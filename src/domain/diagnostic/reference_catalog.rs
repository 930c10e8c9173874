//! Built-in catalog for the deep business diagnostic questionnaire.

use super::catalog::{DiagnosticCatalog, DomainConfig, Kpi};
use super::dependency_graph::DependencyGraph;

const KW_FINANZAS: &[&str] = &[
    "flujo de caja",
    "liquidez",
    "morosidad",
    "deuda",
    "pérdida",
    "perdida",
    "quiebra",
    "sin presupuesto",
];
const KW_RRHH: &[&str] = &[
    "conflicto",
    "rotación",
    "burnout",
    "clima",
    "falta de capacitación",
    "ausentismo",
];
const KW_OPERACIONES: &[&str] = &[
    "cuello de botella",
    "reproceso",
    "mermas",
    "retraso",
    "ineficiencia",
    "sin procesos",
    "sin documentación",
];
const KW_MARKETING: &[&str] = &[
    "baja conversión",
    "sin canal",
    "poca demanda",
    "bajo reconocimiento",
    "sin plan de marketing",
];
const KW_DIRECCION: &[&str] = &[
    "sin plan",
    "sin objetivos",
    "reactivo",
    "falta de dirección",
    "sin estrategia",
];
const KW_LOGISTICA: &[&str] = &[
    "proveedor incumple",
    "costos altos",
    "retraso entregas",
    "sin inventario",
    "faltantes",
];
const KW_INNOVACION: &[&str] = &[
    "no innova",
    "miedo al cambio",
    "desactualizado",
    "sin tecnología",
];

impl DiagnosticCatalog {
    /// The seven-domain catalog used by the deep diagnostic form.
    pub fn reference() -> Self {
        let domains = vec![
            DomainConfig::new("finanzas", "Finanzas y Administración")
                .with_likert_fields([
                    "fa_margenGanancia",
                    "fa_estadosFinancierosActualizados",
                    "fa_presupuestosAnuales",
                    "fa_liquidezCubreObligaciones",
                    "fa_gastosControlados",
                    "fa_indicadoresFinancieros",
                    "fa_analizanEstadosFinancieros",
                    "fa_herramientasSoftwareFinanciero",
                    "fa_situacionFinancieraGeneral",
                ])
                .with_text_fields(["fa_causaProblemasFinancieros", "fa_porQueNoSeAnalizan"])
                .with_keywords(KW_FINANZAS.iter().copied())
                .with_template_kpis(vec![
                    Kpi::new("Ciclo de caja", "≤ 45 días"),
                    Kpi::new("Margen bruto", "≥ 40%"),
                ]),
            DomainConfig::new("rrhh", "Recursos Humanos")
                .with_likert_fields([
                    "rh_organigramaFuncionesClaras",
                    "rh_personalCapacitado",
                    "rh_climaLaboralFavoreceProductividad",
                    "rh_programasMotivacion",
                    "rh_evaluacionesDesempeno",
                    "rh_indicadoresRotacionPersonal",
                    "rh_liderazgoJefesIntermedios",
                ])
                .with_text_fields(["rh_causaClimaLaboralComplejo", "rh_cuantasPersonasTrabajan"])
                .with_keywords(KW_RRHH.iter().copied())
                .with_template_kpis(vec![
                    Kpi::new("Rotación anualizada", "≤ 12%"),
                    Kpi::new("eNPS", "≥ 20"),
                ]),
            DomainConfig::new("operaciones", "Operaciones / Servicio")
                .with_likert_fields([
                    "op_capacidadProductivaCubreDemanda",
                    "op_procesosDocumentados",
                    "op_estandaresCalidadCumplen",
                    "op_controlesErrores",
                    "op_tiemposEntregaCumplen",
                    "op_eficienciaProcesosOptima",
                    "op_personalConoceProcedimientos",
                    "op_indicadoresOperativos",
                ])
                .with_text_fields([
                    "op_porQueNoCubreDemanda",
                    "op_porQueNoCumplen",
                    "op_porQueNoConocen",
                ])
                .with_keywords(KW_OPERACIONES.iter().copied())
                .with_template_kpis(vec![
                    Kpi::new("OTIF", "≥ 95%"),
                    Kpi::new("Productividad", "+15% en 90 días"),
                ]),
            DomainConfig::new("marketing_ventas", "Marketing y Ventas")
                .with_likert_fields([
                    "mv_clienteIdealNecesidades",
                    "mv_planEstrategiasMarketing",
                    "mv_marcaReconocida",
                    "mv_estudiosSatisfaccionCliente",
                    "mv_indicadoresDesempenoComercial",
                    "mv_equipoVentasCapacitado",
                    "mv_politicasDescuentosPromociones",
                ])
                .with_text_fields([
                    "mv_impactoCanalesVenta",
                    "mv_canalesVentaActuales",
                    "mv_porQueNoHaceEstudios",
                ])
                .with_keywords(KW_MARKETING.iter().copied()),
            DomainConfig::new("direccion", "Dirección y Planeación")
                .with_likert_fields([
                    "dg_misionVisionValores",
                    "dg_objetivosClaros",
                    "dg_planEstrategicoDocumentado",
                    "dg_revisionAvancePlan",
                    "dg_factoresExternos",
                    "dg_capacidadAdaptacion",
                    "dg_colaboradoresParticipan",
                ])
                .with_text_fields([
                    "dg_impideCumplirMetas",
                    "dg_comoSeTomanDecisiones",
                    "dg_porQueNoParticipan",
                ])
                .with_keywords(KW_DIRECCION.iter().copied()),
            DomainConfig::new("logistica", "Logística y Cadena de Suministro")
                .with_likert_fields([
                    "lcs_proveedoresCumplen",
                    "lcs_entregasClientesPuntuales",
                    "lcs_costosLogisticosCompetitivos",
                    "lcs_poderNegociacionProveedores",
                    "lcs_indicadoresLogisticos",
                ])
                .with_text_fields(["lcs_problemasLogisticosPunto"])
                .with_keywords(KW_LOGISTICA.iter().copied()),
            DomainConfig::new("innovacion", "Innovación")
                .with_likert_fields([
                    "ci_mejoranProductosServicios",
                    "ci_recogeImplementaIdeasPersonal",
                    "ci_invierteTecnologiaInnovacion",
                    "ci_dispuestoAsumirRiesgos",
                    "ci_protegePropiedadIntelectual",
                    "ci_fomentaCulturaCambio",
                ])
                .with_text_fields(["ci_porQueNoInnova"])
                .with_keywords(KW_INNOVACION.iter().copied()),
        ];

        let dependencies = DependencyGraph::new()
            .with_dependencies("direccion", Vec::<&str>::new())
            .with_dependencies("finanzas", ["direccion"])
            .with_dependencies("rrhh", ["direccion"])
            .with_dependencies("operaciones", ["direccion", "rrhh"])
            .with_dependencies("marketing_ventas", ["direccion", "finanzas"])
            .with_dependencies("logistica", ["operaciones"])
            .with_dependencies("innovacion", ["direccion", "finanzas", "rrhh"]);

        // Static data; covered by `reference_catalog_is_valid`.
        Self::new_unchecked(domains, dependencies)
    }
}
