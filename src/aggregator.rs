use crate::filters::CloserFilter;
use crate::schema::{EstadoSimple, ExpenseRecord, SalesRecord};
use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Headline metrics for one filtered view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct KpiSummary {
    pub total_leads: usize,
    pub total_asistencias: usize,
    pub ventas_cerradas: usize,
    pub facturacion: f64,
    #[schemars(description = "Ad spend; always 0 when a single closer is selected")]
    pub inversion_ads: f64,
    pub profit: f64,
    pub roas: f64,
    #[schemars(description = "Attendances over leads, in percent")]
    pub tasa_asistencia: f64,
    #[schemars(description = "Sales over attendances, in percent")]
    pub tasa_cierre: f64,
}

/// Lead counts shown in the breakdown widget. Rescheduled and other leads
/// share one bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct StatusBreakdown {
    pub ventas: usize,
    pub seguimiento: usize,
    pub no_show: usize,
    pub descalificados: usize,
    pub agendado_otro: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DailyStatusCount {
    pub fecha: NaiveDate,
    pub estado: EstadoSimple,
    pub cantidad: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CloserRanking {
    pub closer: String,
    pub facturado: f64,
    pub asistencias: usize,
    pub ventas: usize,
    pub pct_cierre: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DailyAmount {
    pub fecha: NaiveDate,
    pub monto: f64,
}

fn percent(numerator: usize, denominator: usize) -> f64 {
    if denominator > 0 {
        numerator as f64 / denominator as f64 * 100.0
    } else {
        0.0
    }
}

pub fn compute_kpis(
    sales: &[SalesRecord],
    expenses: &[ExpenseRecord],
    closer: &CloserFilter,
) -> KpiSummary {
    let total_leads = sales.len();
    let total_asistencias = sales.iter().filter(|r| r.es_asistencia).count();
    let ventas_cerradas = sales
        .iter()
        .filter(|r| r.estado == EstadoSimple::Venta)
        .count();

    let facturacion: f64 = sales.iter().map(|r| r.monto).sum();
    let inversion_ads: f64 = if closer.is_todos() {
        expenses.iter().map(|e| e.gasto).sum()
    } else {
        0.0
    };

    let roas = if inversion_ads > 0.0 {
        facturacion / inversion_ads
    } else {
        0.0
    };

    KpiSummary {
        total_leads,
        total_asistencias,
        ventas_cerradas,
        facturacion,
        inversion_ads,
        profit: facturacion - inversion_ads,
        roas,
        tasa_asistencia: percent(total_asistencias, total_leads),
        tasa_cierre: percent(ventas_cerradas, total_asistencias),
    }
}

pub fn status_breakdown(sales: &[SalesRecord]) -> StatusBreakdown {
    sales
        .iter()
        .fold(StatusBreakdown::default(), |mut acc, record| {
            match record.estado {
                EstadoSimple::Venta => acc.ventas += 1,
                EstadoSimple::Seguimiento => acc.seguimiento += 1,
                EstadoSimple::NoShow => acc.no_show += 1,
                EstadoSimple::Descalificado => acc.descalificados += 1,
                EstadoSimple::ReAgendado | EstadoSimple::OtroPendiente => acc.agendado_otro += 1,
            }
            acc
        })
}

/// Row counts per (date, status), ordered by date and then status.
/// Rows without a date are skipped.
pub fn daily_status_counts(sales: &[SalesRecord]) -> Vec<DailyStatusCount> {
    let mut counts: BTreeMap<(NaiveDate, EstadoSimple), usize> = BTreeMap::new();
    for record in sales {
        if let Some(fecha) = record.fecha {
            *counts.entry((fecha, record.estado)).or_default() += 1;
        }
    }

    counts
        .into_iter()
        .map(|((fecha, estado), cantidad)| DailyStatusCount {
            fecha,
            estado,
            cantidad,
        })
        .collect()
}

/// Per-closer totals, highest billing first. Ties keep closer name order.
pub fn closer_ranking(sales: &[SalesRecord]) -> Vec<CloserRanking> {
    let mut groups: BTreeMap<&str, CloserRanking> = BTreeMap::new();
    for record in sales {
        let entry = groups
            .entry(record.closer.as_str())
            .or_insert_with(|| CloserRanking {
                closer: record.closer.clone(),
                facturado: 0.0,
                asistencias: 0,
                ventas: 0,
                pct_cierre: 0.0,
            });
        entry.facturado += record.monto;
        if record.es_asistencia {
            entry.asistencias += 1;
        }
        if record.estado == EstadoSimple::Venta {
            entry.ventas += 1;
        }
    }

    let mut ranking: Vec<CloserRanking> = groups
        .into_values()
        .map(|mut row| {
            row.pct_cierre = percent(row.ventas, row.asistencias);
            row
        })
        .collect();

    ranking.sort_by(|a, b| b.facturado.total_cmp(&a.facturado));
    ranking
}

pub fn daily_revenue(sales: &[SalesRecord]) -> Vec<DailyAmount> {
    sum_by_day(sales.iter().map(|r| (r.fecha, r.monto)))
}

pub fn daily_spend(expenses: &[ExpenseRecord]) -> Vec<DailyAmount> {
    sum_by_day(expenses.iter().map(|e| (e.fecha, e.gasto)))
}

fn sum_by_day(rows: impl Iterator<Item = (Option<NaiveDate>, f64)>) -> Vec<DailyAmount> {
    let mut totals: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for (fecha, amount) in rows {
        if let Some(fecha) = fecha {
            *totals.entry(fecha).or_default() += amount;
        }
    }

    totals
        .into_iter()
        .map(|(fecha, monto)| DailyAmount { fecha, monto })
        .collect()
}
