//! Appointment wait times, from request to attention, in minutes.

// dependencies
use etlkit::prelude::*;
use etlkit::table::agg::Agg;
use crate::{extract, load, report};

pub const TOOL: &str = "wait_times";
pub const DEST: &str = "dim_citas_fechas";
pub const WAIT_COL: &str = "tiempo_espera";

const REQUESTED: &str = "fechahora_solicitud";
const ATTENDED:  &str = "fechahora_atencion";

// join a date cell and a time cell into one date-time text value
fn date_and_time(row: &Row, date_col: &str, time_col: &str) -> Result<Value> {
    let date = match row.get(date_col)? {
        Value::Missing => return Ok(Value::Missing),
        Value::Timestamp(ts) => ts.date().format("%Y-%m-%d").to_string(),
        value => value.to_string(),
    };
    Ok(match row.get(time_col)? {
        Value::Missing => Value::Missing,
        time => Value::Text(format!("{date} {time}")),
    })
}

/// Add request and attention timestamps and the wait between them, then
/// drop the raw request date and time columns.
pub fn with_wait_times(citas: &Table, policy: CoercionPolicy) -> Result<Table> {
    let t = transform::add_column(citas, REQUESTED, |row| date_and_time(row, "fecha_solicitud", "hora_solicitud"))?;
    let t = transform::add_column(&t, ATTENDED, |row| date_and_time(row, "fecha_atencion", "hora_atencion"))?;
    let t = convert::convert_type(&t, &[REQUESTED, ATTENDED], DataType::Timestamp, policy)?;
    let t = transform::add_column(&t, WAIT_COL, |row| {
        Ok((row.get(ATTENDED)? - row.get(REQUESTED)?) / Value::Integer(60))
    })?;
    header::select(&t, &["fecha_solicitud", "hora_solicitud"], true)
}

/// Mean wait in minutes over appointments with a known wait.
pub fn mean_wait(table: &Table) -> Result<Option<f64>> {
    Ok(match table.column(WAIT_COL)? {
        Column::Numeric(v) => Agg::mean(v),
        Column::Integer(v) => Agg::mean_i64(v),
        _ => None,
    })
}

/// Optionally restrict to one diagnosis, e.g., `cirugia`.
pub fn run<S: Extractor + Loader>(w: &mut Workflow, store: &mut S, diagnosis: Option<&str>) -> Result<Table> {
    let mut citas = extract(w, store, "citas_generales")?;
    if let Some(diagnosis) = diagnosis {
        citas = filter::equal(&citas, "diagnostico", diagnosis, false)?;
        w.log.print(&format!("{} appointments with diagnosis {diagnosis}", citas.n_row()));
    }
    let waits = with_wait_times(&citas, w.cfg.coercion_policy()?)?;
    match mean_wait(&waits)? {
        Some(mean) => w.log.print(&format!("mean wait time: {mean:.1} minutes")),
        None => w.log.print("mean wait time: no appointments with a known wait"),
    }
    report(w, DEST, &waits)?;
    load(w, store, &waits, DEST, LoadMode::Replace)?;
    Ok(waits)
}
