use crate::classification::{classify_estado, is_asistencia};
use crate::error::{DashboardError, Result};
use crate::schema::{ExpenseRecord, SalesRecord, PENDIENTE, SIN_ASIGNAR};
use crate::utils::{clean_amount, parse_sheet_date};
use csv::{ReaderBuilder, Trim};
use log::{debug, warn};

pub const SALES_FEED: &str = "ventas";
pub const EXPENSES_FEED: &str = "gastos";

pub const SALES_COLUMNS: [&str; 4] = ["Fecha", "Monto ($)", "Closer", "Resultado"];
pub const EXPENSE_COLUMNS: [&str; 2] = ["Fecha", "Gasto"];

/// Cell contents a sheet export uses for "no value". Matched after trimming,
/// case-sensitively.
pub const NA_TOKENS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn is_missing(cell: &str) -> bool {
    cell.is_empty() || NA_TOKENS.contains(&cell)
}

/// A sales row exactly as read from the sheet. Blank cells are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalesRow {
    pub fecha: Option<String>,
    pub monto: Option<String>,
    pub closer: Option<String>,
    pub resultado: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseRow {
    pub fecha: Option<String>,
    pub gasto: Option<String>,
}

impl SalesRow {
    pub fn normalize(self) -> SalesRecord {
        let closer = self.closer.unwrap_or_else(|| SIN_ASIGNAR.to_string());
        let resultado = self.resultado.unwrap_or_else(|| PENDIENTE.to_string());

        SalesRecord {
            fecha: self.fecha.as_deref().and_then(parse_sheet_date),
            monto: self.monto.as_deref().map(clean_amount).unwrap_or(0.0),
            estado: classify_estado(&resultado),
            es_asistencia: is_asistencia(&resultado),
            closer,
            resultado,
        }
    }
}

impl ExpenseRow {
    pub fn normalize(self) -> ExpenseRecord {
        ExpenseRecord {
            fecha: self.fecha.as_deref().and_then(parse_sheet_date),
            gasto: self.gasto.as_deref().map(clean_amount).unwrap_or(0.0),
        }
    }
}

pub fn normalize_sales(rows: Vec<SalesRow>) -> Vec<SalesRecord> {
    let records: Vec<SalesRecord> = rows.into_iter().map(SalesRow::normalize).collect();
    debug!(
        "Normalized {} sales rows ({} without a usable date)",
        records.len(),
        records.iter().filter(|r| r.fecha.is_none()).count()
    );
    records
}

pub fn normalize_expenses(rows: Vec<ExpenseRow>) -> Vec<ExpenseRecord> {
    let records: Vec<ExpenseRecord> = rows.into_iter().map(ExpenseRow::normalize).collect();
    debug!(
        "Normalized {} expense rows ({} without a usable date)",
        records.len(),
        records.iter().filter(|r| r.fecha.is_none()).count()
    );
    records
}

pub fn read_sales_rows(text: &str) -> Result<Vec<SalesRow>> {
    let rows = read_feed(SALES_FEED, text, SALES_COLUMNS)?;
    Ok(rows
        .into_iter()
        .map(|[fecha, monto, closer, resultado]| SalesRow {
            fecha,
            monto,
            closer,
            resultado,
        })
        .collect())
}

pub fn read_expense_rows(text: &str) -> Result<Vec<ExpenseRow>> {
    let rows = read_feed(EXPENSES_FEED, text, EXPENSE_COLUMNS)?;
    Ok(rows
        .into_iter()
        .map(|[fecha, gasto]| ExpenseRow { fecha, gasto })
        .collect())
}

/// Reads and normalizes a sales CSV export.
pub fn parse_sales_csv(text: &str) -> Result<Vec<SalesRecord>> {
    Ok(normalize_sales(read_sales_rows(text)?))
}

/// Reads and normalizes an ad-spend CSV export.
pub fn parse_expenses_csv(text: &str) -> Result<Vec<ExpenseRecord>> {
    Ok(normalize_expenses(read_expense_rows(text)?))
}

/// Extracts the named columns from a CSV export, in the order given.
/// Short rows are padded with blanks; extra columns are ignored. Blank and
/// [`NA_TOKENS`] cells come back as `None`.
fn read_feed<const N: usize>(
    feed: &str,
    text: &str,
    columns: [&str; N],
) -> Result<Vec<[Option<String>; N]>> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let mut indices = [0usize; N];
    for (slot, column) in indices.iter_mut().zip(columns) {
        *slot = headers
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| DashboardError::MissingColumn {
                feed: feed.to_string(),
                column: column.to_string(),
            })?;
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.len() != headers.len() {
            warn!(
                "Feed '{}' line {}: expected {} fields, found {}",
                feed,
                record.position().map_or(0, |p| p.line()),
                headers.len(),
                record.len()
            );
        }
        rows.push(std::array::from_fn(|i| {
            record
                .get(indices[i])
                .filter(|cell| !is_missing(cell))
                .map(str::to_string)
        }));
    }

    Ok(rows)
}
