//! Build and load the calendar date dimension.

// dependencies
use std::collections::HashMap;
use chrono::NaiveDate;
use etlkit::prelude::*;
use crate::{load, report};

pub const TOOL: &str = "date_dimension";
pub const DEST: &str = "dim_fecha";
pub const START_YEAR: i32 = 2020;
pub const END_YEAR: i32 = 2025;

// fixed-date national holidays
static HOLIDAYS: [(u32, u32, &str); 6] = [
    (1,  1,  "Año Nuevo"),
    (5,  1,  "Día del Trabajo"),
    (7,  20, "Día de la Independencia"),
    (8,  7,  "Batalla de Boyacá"),
    (12, 8,  "Inmaculada Concepción"),
    (12, 25, "Navidad"),
];

pub fn holidays(start_year: i32, end_year: i32) -> HashMap<NaiveDate, String> {
    (start_year..=end_year)
        .flat_map(|year| HOLIDAYS.iter().filter_map(move |(month, day, name)| {
            NaiveDate::from_ymd_opt(year, *month, *day).map(|date| (date, name.to_string()))
        }))
        .collect()
}

pub fn run<L: Loader + ?Sized>(w: &mut Workflow, store: &mut L, start_year: i32, end_year: i32) -> Result<Table> {
    let dim = date_dimension(start_year, end_year, &holidays(start_year, end_year))?;
    report(w, DEST, &dim)?;
    load(w, store, &dim, DEST, LoadMode::Replace)?;
    Ok(dim)
}
