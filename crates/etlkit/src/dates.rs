//! Calendar date dimension table for loading into a star schema.

// dependencies
use std::collections::HashMap;
use chrono::{Datelike, NaiveDate};
use crate::table::Table;
use crate::error::{EtlError, Result};

const DAY_NAMES: [&str; 7] = ["lunes", "martes", "miércoles", "jueves", "viernes", "sábado", "domingo"];
const MONTH_NAMES: [&str; 12] = [
    "enero", "febrero", "marzo", "abril", "mayo", "junio",
    "julio", "agosto", "septiembre", "octubre", "noviembre", "diciembre",
];

/// Build one row per calendar day from January 1 of `start_year` through
/// December 31 of `end_year`, inclusive. Holidays are supplied by the caller
/// as a date to holiday name map.
///
/// Columns: `id` (1-based), `date`, `year`, `month`, `day`, `week_of_year`
/// (ISO), `day_of_week` (1 = Monday), `day_name`, `month_name`, `quarter`,
/// `is_weekend` and `is_holiday` (1/0), and `holiday_name` (missing on
/// ordinary days).
pub fn date_dimension(start_year: i32, end_year: i32, holidays: &HashMap<NaiveDate, String>) -> Result<Table> {
    if end_year < start_year {
        return Err(EtlError::shape(format!(
            "date_dimension end year {end_year} precedes start year {start_year}"
        )));
    }
    let first = NaiveDate::from_ymd_opt(start_year, 1, 1)
        .ok_or_else(|| EtlError::shape(format!("invalid start year {start_year}")))?;
    let last = NaiveDate::from_ymd_opt(end_year, 12, 31)
        .ok_or_else(|| EtlError::shape(format!("invalid end year {end_year}")))?;
    let days: Vec<NaiveDate> = first.iter_days().take_while(|d| *d <= last).collect();

    let day_of_week: Vec<i64> = days.iter().map(|d| d.weekday().number_from_monday() as i64).collect();
    let mut table = Table::new();
    table
        .add_col("id",           (1..=days.len() as i64).collect::<Vec<i64>>())?
        .add_col("date",         days.iter().map(|d| d.format("%Y-%m-%d").to_string()).collect::<Vec<String>>())?
        .add_col("year",         days.iter().map(|d| d.year() as i64).collect::<Vec<i64>>())?
        .add_col("month",        days.iter().map(|d| d.month() as i64).collect::<Vec<i64>>())?
        .add_col("day",          days.iter().map(|d| d.day() as i64).collect::<Vec<i64>>())?
        .add_col("week_of_year", days.iter().map(|d| d.iso_week().week() as i64).collect::<Vec<i64>>())?
        .add_col("day_of_week",  day_of_week.clone())?
        .add_col("day_name",     days.iter().map(|d| DAY_NAMES[d.weekday().num_days_from_monday() as usize]).collect::<Vec<&str>>())?
        .add_col("month_name",   days.iter().map(|d| MONTH_NAMES[d.month0() as usize]).collect::<Vec<&str>>())?
        .add_col("quarter",      days.iter().map(|d| (d.month0() / 3 + 1) as i64).collect::<Vec<i64>>())?
        .add_col("is_weekend",   day_of_week.iter().map(|dow| (*dow >= 6) as i64).collect::<Vec<i64>>())?
        .add_col("is_holiday",   days.iter().map(|d| holidays.contains_key(d) as i64).collect::<Vec<i64>>())?
        .add_col("holiday_name", days.iter().map(|d| holidays.get(d).cloned()).collect::<Vec<Option<String>>>())?;
    Ok(table)
}
