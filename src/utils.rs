use chrono::{Datelike, Days, NaiveDate};

const DAY_FIRST_FORMATS: &[&str] = &["%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y"];
const DAY_FIRST_SHORT_YEAR_FORMATS: &[&str] = &["%d/%m/%y", "%d-%m-%y", "%d.%m.%y"];
const YEAR_FIRST_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Parses a spreadsheet date using the day-before-month convention.
///
/// A trailing time component (`"01/03/2024 10:30:00"`, `"2024-03-01T10:30"`) is
/// ignored. Values with a four digit leading segment are read as ISO dates.
/// Anything that does not parse yields `None`.
pub fn parse_sheet_date(raw: &str) -> Option<NaiveDate> {
    let date_part = raw
        .trim()
        .split(|c: char| c.is_whitespace() || c == 'T')
        .next()?;

    if date_part.is_empty() {
        return None;
    }

    let segments: Vec<&str> = date_part.split(['/', '-', '.']).collect();
    if segments.len() != 3 {
        return None;
    }

    let formats = if segments[0].len() == 4 {
        YEAR_FIRST_FORMATS
    } else if segments[2].len() == 2 {
        DAY_FIRST_SHORT_YEAR_FORMATS
    } else {
        DAY_FIRST_FORMATS
    };

    formats
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(date_part, format).ok())
}

/// Strips `$` and `,` and parses what is left as a non-negative amount.
/// Unparseable, negative or non-finite values become `0.0`.
pub fn clean_amount(raw: &str) -> f64 {
    let cleaned: String = raw.chars().filter(|c| *c != '$' && *c != ',').collect();

    match cleaned.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => value,
        _ => 0.0,
    }
}

pub fn days_before(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_sub_days(Days::new(days)).unwrap_or(date)
}

/// Most recent Monday on or before `date`.
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    days_before(date, u64::from(date.weekday().num_days_from_monday()))
}

pub fn first_day_of_month(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
}

/// Formats a currency amount with no decimals and thousands separators,
/// e.g. `$1,250` or `$-300`. Halves round to even.
pub fn format_money(value: f64) -> String {
    format!("${}", group_thousands(value.round_ties_even() as i64))
}

pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

pub fn format_roas(value: f64) -> String {
    format!("{:.2}x", value)
}

pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    if value < 0 {
        grouped.push('-');
    }

    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    grouped
}
