use crate::error::{DashboardError, Result};
use crate::schema::{ExpenseRecord, SalesRecord, TODOS};
use crate::utils::{days_before, first_day_of_month, start_of_week};
use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Inclusive calendar-day range. An inverted range matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DateRange {
    pub inicio: NaiveDate,
    pub fin: NaiveDate,
}

impl DateRange {
    pub fn new(inicio: NaiveDate, fin: NaiveDate) -> Self {
        Self { inicio, fin }
    }

    pub fn single_day(date: NaiveDate) -> Self {
        Self::new(date, date)
    }

    /// Rows without a date never fall inside a range.
    pub fn contains(&self, fecha: Option<NaiveDate>) -> bool {
        fecha.is_some_and(|d| d >= self.inicio && d <= self.fin)
    }

    pub fn caption(&self) -> String {
        format!("📅 Visualizando: {} al {}", self.inicio, self.fin)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum DatePreset {
    Hoy,
    Ayer,
    EstaSemana,
    Ultimos7Dias,
    EsteMes,
    Ultimos30Dias,
    Personalizado,
}

impl DatePreset {
    pub const ALL: [DatePreset; 7] = [
        DatePreset::Hoy,
        DatePreset::Ayer,
        DatePreset::EstaSemana,
        DatePreset::Ultimos7Dias,
        DatePreset::EsteMes,
        DatePreset::Ultimos30Dias,
        DatePreset::Personalizado,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DatePreset::Hoy => "Hoy",
            DatePreset::Ayer => "Ayer",
            DatePreset::EstaSemana => "Esta Semana",
            DatePreset::Ultimos7Dias => "Últimos 7 días",
            DatePreset::EsteMes => "Este Mes",
            DatePreset::Ultimos30Dias => "Últimos 30 días",
            DatePreset::Personalizado => "Personalizado",
        }
    }

    /// Resolves the preset against `today`.
    ///
    /// `custom` is only read for [`DatePreset::Personalizado`]; when it is
    /// absent both ends default to `today`. Custom ranges are taken as given.
    pub fn resolve(&self, today: NaiveDate, custom: Option<DateRange>) -> DateRange {
        match self {
            DatePreset::Hoy => DateRange::single_day(today),
            DatePreset::Ayer => DateRange::single_day(days_before(today, 1)),
            DatePreset::EstaSemana => DateRange::new(start_of_week(today), today),
            DatePreset::Ultimos7Dias => DateRange::new(days_before(today, 7), today),
            DatePreset::EsteMes => DateRange::new(first_day_of_month(today), today),
            DatePreset::Ultimos30Dias => DateRange::new(days_before(today, 30), today),
            DatePreset::Personalizado => custom.unwrap_or_else(|| DateRange::single_day(today)),
        }
    }
}

impl fmt::Display for DatePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DatePreset {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        DatePreset::ALL
            .into_iter()
            .find(|p| p.label() == s.trim())
            .ok_or_else(|| DashboardError::Config(format!("Unknown date preset '{}'", s)))
    }
}

/// Salesperson selection. `"Todos"` means no filter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub enum CloserFilter {
    #[default]
    Todos,
    Closer(String),
}

impl CloserFilter {
    pub fn is_todos(&self) -> bool {
        matches!(self, CloserFilter::Todos)
    }

    pub fn matches(&self, closer: &str) -> bool {
        match self {
            CloserFilter::Todos => true,
            CloserFilter::Closer(name) => name == closer,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            CloserFilter::Todos => TODOS,
            CloserFilter::Closer(name) => name,
        }
    }
}

impl From<&str> for CloserFilter {
    fn from(value: &str) -> Self {
        if value == TODOS {
            CloserFilter::Todos
        } else {
            CloserFilter::Closer(value.to_string())
        }
    }
}

/// What the user picked in the control panel for one render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Selection {
    pub range: DateRange,
    pub closer: CloserFilter,
}

impl Selection {
    pub fn new(range: DateRange, closer: impl Into<CloserFilter>) -> Self {
        Self {
            range,
            closer: closer.into(),
        }
    }
}

pub fn filter_sales(records: &[SalesRecord], selection: &Selection) -> Vec<SalesRecord> {
    records
        .iter()
        .filter(|r| selection.range.contains(r.fecha))
        .filter(|r| selection.closer.matches(&r.closer))
        .cloned()
        .collect()
}

/// Expenses carry no closer attribution, so only the date range applies.
pub fn filter_expenses(records: &[ExpenseRecord], range: &DateRange) -> Vec<ExpenseRecord> {
    records
        .iter()
        .filter(|r| range.contains(r.fecha))
        .cloned()
        .collect()
}

/// Options for the closer selector: `"Todos"` followed by every distinct
/// non-empty closer of the unfiltered table, sorted.
pub fn closer_options(records: &[SalesRecord]) -> Vec<String> {
    let distinct: BTreeSet<&str> = records
        .iter()
        .map(|r| r.closer.as_str())
        .filter(|c| !c.is_empty())
        .collect();

    std::iter::once(TODOS)
        .chain(distinct)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::EstadoSimple;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sale(fecha: Option<NaiveDate>, closer: &str) -> SalesRecord {
        SalesRecord {
            fecha,
            monto: 100.0,
            closer: closer.to_string(),
            resultado: "Venta".to_string(),
            estado: EstadoSimple::Venta,
            es_asistencia: true,
        }
    }

    #[test]
    fn test_presets_resolve_against_today() {
        // Thursday
        let today = date(2024, 3, 14);

        assert_eq!(DatePreset::Hoy.resolve(today, None), DateRange::single_day(today));
        assert_eq!(
            DatePreset::Ayer.resolve(today, None),
            DateRange::single_day(date(2024, 3, 13))
        );
        assert_eq!(
            DatePreset::EstaSemana.resolve(today, None),
            DateRange::new(date(2024, 3, 11), today)
        );
        assert_eq!(
            DatePreset::Ultimos7Dias.resolve(today, None),
            DateRange::new(date(2024, 3, 7), today)
        );
        assert_eq!(
            DatePreset::EsteMes.resolve(today, None),
            DateRange::new(date(2024, 3, 1), today)
        );
        assert_eq!(
            DatePreset::Ultimos30Dias.resolve(today, None),
            DateRange::new(date(2024, 2, 13), today)
        );
    }

    #[test]
    fn test_custom_range_is_not_reordered() {
        let today = date(2024, 3, 14);
        let inverted = DateRange::new(date(2024, 3, 10), date(2024, 3, 1));

        assert_eq!(
            DatePreset::Personalizado.resolve(today, Some(inverted)),
            inverted
        );
        assert_eq!(
            DatePreset::Personalizado.resolve(today, None),
            DateRange::single_day(today)
        );
        assert!(!inverted.contains(Some(date(2024, 3, 5))));
    }

    #[test]
    fn test_preset_labels_round_trip() {
        for preset in DatePreset::ALL {
            assert_eq!(preset.label().parse::<DatePreset>().unwrap(), preset);
        }
        assert!("Mañana".parse::<DatePreset>().is_err());
    }

    #[test]
    fn test_range_is_inclusive_and_drops_missing_dates() {
        let range = DateRange::new(date(2024, 3, 1), date(2024, 3, 31));
        assert!(range.contains(Some(date(2024, 3, 1))));
        assert!(range.contains(Some(date(2024, 3, 31))));
        assert!(!range.contains(Some(date(2024, 4, 1))));
        assert!(!range.contains(None));
    }

    #[test]
    fn test_null_dates_excluded_under_every_preset() {
        let today = date(2024, 3, 14);
        let records = vec![sale(None, "Ana"), sale(Some(today), "Ana")];

        for preset in DatePreset::ALL {
            let selection = Selection::new(preset.resolve(today, None), TODOS);
            let filtered = filter_sales(&records, &selection);
            assert!(filtered.iter().all(|r| r.fecha.is_some()), "{}", preset);
        }
    }

    #[test]
    fn test_filter_sales_by_closer() {
        let day = date(2024, 3, 1);
        let records = vec![
            sale(Some(day), "Ana"),
            sale(Some(day), "Luis"),
            sale(Some(date(2024, 4, 1)), "Ana"),
        ];
        let range = DateRange::new(day, date(2024, 3, 31));

        assert_eq!(filter_sales(&records, &Selection::new(range, "Todos")).len(), 2);

        let only_ana = filter_sales(&records, &Selection::new(range, "Ana"));
        assert_eq!(only_ana.len(), 1);
        assert_eq!(only_ana[0].closer, "Ana");

        assert!(filter_sales(&records, &Selection::new(range, "ana")).is_empty());
    }

    #[test]
    fn test_filter_expenses_by_range_only() {
        let records = vec![
            ExpenseRecord {
                fecha: Some(date(2024, 3, 1)),
                gasto: 50.0,
            },
            ExpenseRecord {
                fecha: None,
                gasto: 10.0,
            },
        ];
        let range = DateRange::single_day(date(2024, 3, 1));
        assert_eq!(filter_expenses(&records, &range).len(), 1);
    }

    #[test]
    fn test_closer_options() {
        let records = vec![
            sale(None, "Luis"),
            sale(None, "Ana"),
            sale(None, ""),
            sale(None, "Luis"),
            sale(None, "Sin Asignar"),
        ];
        assert_eq!(
            closer_options(&records),
            vec!["Todos", "Ana", "Luis", "Sin Asignar"]
        );
        assert_eq!(closer_options(&[]), vec!["Todos"]);
    }
}
