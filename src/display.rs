use crate::aggregator::{KpiSummary, StatusBreakdown};
use crate::utils::{format_money, format_percent, format_roas};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Change indicator under a metric. Positive values render green.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MetricDelta {
    pub value: f64,
    pub text: String,
}

/// A metric tile, already formatted for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MetricCard {
    pub label: String,
    pub value: String,
    pub delta: Option<MetricDelta>,
    pub help: Option<String>,
}

impl MetricCard {
    fn new(label: &str, value: String) -> Self {
        Self {
            label: label.to_string(),
            value,
            delta: None,
            help: None,
        }
    }

    fn with_delta(mut self, value: f64, text: String) -> Self {
        self.delta = Some(MetricDelta { value, text });
        self
    }

    fn with_help(mut self, help: &str) -> Self {
        self.help = Some(help.to_string());
        self
    }
}

/// Financial row followed by the commercial efficiency row.
pub fn kpi_cards(kpis: &KpiSummary) -> Vec<MetricCard> {
    let mut roas = MetricCard::new("ROAS", format_roas(kpis.roas));
    if kpis.roas > 0.0 {
        // Break-even ROAS is 1.0.
        let delta = kpis.roas - 1.0;
        roas = roas.with_delta(delta, format!("{:.2} vs Objetivo", delta));
    }

    vec![
        MetricCard::new("Facturación", format_money(kpis.facturacion)),
        MetricCard::new("Profit", format_money(kpis.profit))
            .with_delta(kpis.profit, format_money(kpis.profit)),
        MetricCard::new("Inversión Ads", format_money(kpis.inversion_ads)),
        roas,
        MetricCard::new("Total Leads", kpis.total_leads.to_string()),
        MetricCard::new("Asistencias", kpis.total_asistencias.to_string())
            .with_help("Ventas + Seguimiento"),
        MetricCard::new("Tasa Asistencia", format_percent(kpis.tasa_asistencia)),
        MetricCard::new("Tasa Cierre", format_percent(kpis.tasa_cierre)),
    ]
}

pub fn breakdown_cards(breakdown: &StatusBreakdown) -> Vec<MetricCard> {
    vec![
        MetricCard::new("✅ Ventas", breakdown.ventas.to_string()),
        MetricCard::new("👀 Seguimiento", breakdown.seguimiento.to_string()),
        MetricCard::new("❌ No Show", breakdown.no_show.to_string()),
        MetricCard::new("🚫 Descalif.", breakdown.descalificados.to_string()),
        MetricCard::new("📅 Agend/Otro", breakdown.agendado_otro.to_string()),
    ]
}
