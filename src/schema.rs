use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const SIN_ASIGNAR: &str = "Sin Asignar";
pub const PENDIENTE: &str = "Pendiente";
pub const TODOS: &str = "Todos";

/// Simplified outcome of a lead, derived from the free-text `Resultado`.
///
/// Variant order is the display order used for grouped output.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, JsonSchema,
)]
pub enum EstadoSimple {
    #[serde(rename = "✅ Venta")]
    #[schemars(description = "The lead closed a sale")]
    Venta,

    #[serde(rename = "❌ No Show")]
    #[schemars(description = "The lead did not show up to the call")]
    NoShow,

    #[serde(rename = "🚫 Descalificado")]
    #[schemars(description = "The lead was disqualified")]
    Descalificado,

    #[serde(rename = "👀 Seguimiento")]
    #[schemars(description = "The lead attended and is in follow-up")]
    Seguimiento,

    #[serde(rename = "📅 Re-Agendado")]
    #[schemars(description = "The call was rescheduled")]
    ReAgendado,

    #[serde(rename = "Otro/Pendiente")]
    #[schemars(description = "Anything else, including pending leads")]
    OtroPendiente,
}

impl EstadoSimple {
    pub const ALL: [EstadoSimple; 6] = [
        EstadoSimple::Venta,
        EstadoSimple::NoShow,
        EstadoSimple::Descalificado,
        EstadoSimple::Seguimiento,
        EstadoSimple::ReAgendado,
        EstadoSimple::OtroPendiente,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            EstadoSimple::Venta => "✅ Venta",
            EstadoSimple::NoShow => "❌ No Show",
            EstadoSimple::Descalificado => "🚫 Descalificado",
            EstadoSimple::Seguimiento => "👀 Seguimiento",
            EstadoSimple::ReAgendado => "📅 Re-Agendado",
            EstadoSimple::OtroPendiente => "Otro/Pendiente",
        }
    }

    /// Colour of the category in the stacked daily chart.
    pub fn color(&self) -> &'static str {
        match self {
            EstadoSimple::Venta => "#00CC96",
            EstadoSimple::NoShow => "#EF553B",
            EstadoSimple::Descalificado => "#FFA15A",
            EstadoSimple::Seguimiento => "#636EFA",
            EstadoSimple::ReAgendado => "#AB63FA",
            EstadoSimple::OtroPendiente => "#d3d3d3",
        }
    }
}

impl fmt::Display for EstadoSimple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One lead from the sales feed after cleaning and classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SalesRecord {
    #[schemars(description = "Lead date; null when the sheet value could not be parsed")]
    pub fecha: Option<NaiveDate>,

    #[schemars(description = "Amount billed for the lead, never negative")]
    pub monto: f64,

    #[schemars(description = "Salesperson handling the lead ('Sin Asignar' when blank)")]
    pub closer: String,

    #[schemars(description = "Free-text outcome as typed in the sheet ('Pendiente' when blank)")]
    pub resultado: String,

    pub estado: EstadoSimple,

    #[schemars(description = "Whether the lead counts as a qualifying attendance")]
    pub es_asistencia: bool,
}

/// One ad-spend row from the expense feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ExpenseRecord {
    pub fecha: Option<NaiveDate>,
    pub gasto: f64,
}

/// The two normalized tables from one load of the feeds.
///
/// `sales_error` holds the user-visible message when the sales feed could
/// not be loaded; the sales table is empty in that case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedSnapshot {
    pub sales: Vec<SalesRecord>,
    pub expenses: Vec<ExpenseRecord>,
    pub sales_error: Option<String>,
    pub loaded_at: DateTime<Utc>,
}

impl FeedSnapshot {
    pub fn new(sales: Vec<SalesRecord>, expenses: Vec<ExpenseRecord>) -> Self {
        Self {
            sales,
            expenses,
            sales_error: None,
            loaded_at: Utc::now(),
        }
    }

    pub fn with_sales_error(mut self, message: impl Into<String>) -> Self {
        self.sales.clear();
        self.sales_error = Some(message.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estado_serializes_as_label() {
        for estado in EstadoSimple::ALL {
            let json = serde_json::to_string(&estado).unwrap();
            assert_eq!(json, format!("\"{}\"", estado.label()));

            let back: EstadoSimple = serde_json::from_str(&json).unwrap();
            assert_eq!(back, estado);
        }
    }

    #[test]
    fn test_every_estado_has_its_own_colour() {
        let colours: std::collections::HashSet<&str> =
            EstadoSimple::ALL.iter().map(|e| e.color()).collect();
        assert_eq!(colours.len(), EstadoSimple::ALL.len());
        assert_eq!(EstadoSimple::Venta.color(), "#00CC96");
    }

    #[test]
    fn test_estado_order_matches_display_order() {
        let mut sorted = EstadoSimple::ALL.to_vec();
        sorted.reverse();
        sorted.sort();
        assert_eq!(sorted, EstadoSimple::ALL.to_vec());
    }
}
