//! # Closer Dashboard
//!
//! Data core of a small sales dashboard. It reads two published spreadsheet
//! exports (leads/sales and ad spend), cleans and classifies every lead,
//! applies the date and salesperson ("closer") selection, and computes the
//! KPIs, rankings and daily series a presentation shell renders.
//!
//! ## Pipeline
//!
//! - **Loader** ([`loader`]): fetches the CSV exports over HTTP
//! - **Normalizers** ([`ingestion`], [`classification`]): clean dates and amounts,
//!   fill blanks, derive `Estado_Simple` and `Es_Asistencia`
//! - **Cache** ([`cache`]): one process-wide snapshot with a TTL
//! - **Filters** ([`filters`]): date presets, date range and closer selection
//! - **Aggregator** ([`aggregator`]): KPIs, status counts, ranking, daily series
//!
//! ## Example
//!
//! ```rust,ignore
//! use closer_dashboard::*;
//! use chrono::NaiveDate;
//!
//! let sales = parse_sales_csv(
//!     "Fecha,Monto ($),Closer,Resultado\n01/03/2024,\"$1,000\",Ana,Venta cerrada\n",
//! )?;
//! let snapshot = FeedSnapshot::new(sales, Vec::new());
//!
//! let today = NaiveDate::from_ymd_opt(2024, 3, 14).unwrap();
//! let selection = Selection::new(DatePreset::EsteMes.resolve(today, None), "Todos");
//!
//! let report = build_dashboard(&snapshot, &selection)?;
//! assert_eq!(report.kpis.facturacion, 1000.0);
//! ```

pub mod access;
pub mod aggregator;
pub mod classification;
pub mod config;
pub mod display;
pub mod error;
pub mod filters;
pub mod ingestion;
pub mod schema;
pub mod utils;

#[cfg(feature = "http")]
pub mod cache;
#[cfg(feature = "http")]
pub mod loader;
#[cfg(feature = "http")]
pub mod service;

pub use access::{AccessGate, AccessState, Session};
pub use aggregator::{
    closer_ranking, compute_kpis, daily_revenue, daily_spend, daily_status_counts,
    status_breakdown, CloserRanking, DailyAmount, DailyStatusCount, KpiSummary, StatusBreakdown,
};
pub use classification::{classify_estado, is_asistencia};
pub use config::DashboardConfig;
pub use display::{breakdown_cards, kpi_cards, MetricCard, MetricDelta};
pub use error::{DashboardError, Result};
pub use filters::*;
pub use ingestion::{parse_expenses_csv, parse_sales_csv};
pub use schema::*;

#[cfg(feature = "http")]
pub use cache::FeedCache;
#[cfg(feature = "http")]
pub use loader::FeedLoader;
#[cfg(feature = "http")]
pub use service::DashboardService;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const WAITING_FOR_DATA: &str = "Esperando datos... Revisa conexión.";

/// Everything one dashboard render shows.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DashboardReport {
    pub range: DateRange,
    #[schemars(description = "Caption describing the visible date range")]
    pub caption: String,
    pub closer: CloserFilter,
    #[schemars(description = "Closer selector options: 'Todos' followed by every known closer")]
    pub closer_options: Vec<String>,

    pub kpis: KpiSummary,
    pub cards: Vec<MetricCard>,
    pub breakdown: StatusBreakdown,
    pub breakdown_cards: Vec<MetricCard>,

    #[schemars(description = "Lead counts per day and status for the stacked daily chart")]
    pub daily_status: Vec<DailyStatusCount>,
    #[schemars(description = "Closers sorted by billed amount, highest first")]
    pub ranking: Vec<CloserRanking>,
    pub daily_revenue: Vec<DailyAmount>,
    #[schemars(
        description = "Daily ad spend; only present when all closers are selected and there is spend in range"
    )]
    pub daily_spend: Option<Vec<DailyAmount>>,

    #[schemars(description = "When the underlying feeds were fetched")]
    pub loaded_at: DateTime<Utc>,
}

impl DashboardReport {
    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(DashboardReport)
    }

    pub fn schema_as_json() -> Result<String> {
        let schema = Self::generate_json_schema();
        Ok(serde_json::to_string_pretty(&schema)?)
    }
}

pub struct DashboardProcessor;

impl DashboardProcessor {
    /// Filters the snapshot by `selection` and aggregates the result.
    ///
    /// Fails with [`DashboardError::NoSalesData`] when the unfiltered sales
    /// table is empty; nothing is computed in that case.
    pub fn build(snapshot: &FeedSnapshot, selection: &Selection) -> Result<DashboardReport> {
        if snapshot.sales.is_empty() {
            let message = match &snapshot.sales_error {
                Some(err) => format!("{} {}", err, WAITING_FOR_DATA),
                None => WAITING_FOR_DATA.to_string(),
            };
            warn!("Halting render: {}", message);
            return Err(DashboardError::NoSalesData(message));
        }

        info!(
            "Building dashboard for {} to {} (closer: {})",
            selection.range.inicio,
            selection.range.fin,
            selection.closer.label()
        );

        let sales = filter_sales(&snapshot.sales, selection);
        let expenses = filter_expenses(&snapshot.expenses, &selection.range);
        debug!(
            "Filtered view has {} of {} sales rows and {} of {} expense rows",
            sales.len(),
            snapshot.sales.len(),
            expenses.len(),
            snapshot.expenses.len()
        );

        let kpis = compute_kpis(&sales, &expenses, &selection.closer);
        let breakdown = status_breakdown(&sales);

        let daily_spend = if selection.closer.is_todos() && !expenses.is_empty() {
            Some(daily_spend(&expenses))
        } else {
            None
        };

        Ok(DashboardReport {
            range: selection.range,
            caption: selection.range.caption(),
            closer: selection.closer.clone(),
            closer_options: closer_options(&snapshot.sales),
            cards: kpi_cards(&kpis),
            breakdown_cards: breakdown_cards(&breakdown),
            daily_status: daily_status_counts(&sales),
            ranking: closer_ranking(&sales),
            daily_revenue: daily_revenue(&sales),
            daily_spend,
            kpis,
            breakdown,
            loaded_at: snapshot.loaded_at,
        })
    }
}

pub fn build_dashboard(snapshot: &FeedSnapshot, selection: &Selection) -> Result<DashboardReport> {
    DashboardProcessor::build(snapshot, selection)
}
