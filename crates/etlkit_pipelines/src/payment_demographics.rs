//! Summarize member payments by socioeconomic stratum and education level.

// dependencies
use etlkit::prelude::*;
use crate::{extract, load, report, EXTRACTED};

pub const TOOL: &str = "payment_demographics";

const PAYMENT_QUERY: &str = "SELECT * FROM pagos";
const DEMOGRAPHICS: [&str; 6] = [
    "id_usuario", "sexo", "nivel_escolaridad", "valor_pagado", "estracto", "fecha_nacimiento",
];
const VALUE_COL: &str = "valor_pagado";

// grouping column and the destination prefix for its summaries
const BREAKDOWNS: [(&str, &str); 2] = [
    ("estracto",          "estracto"),
    ("nivel_escolaridad", "escolaridad"),
];

/// Join payments to their contributing members and keep the demographic columns.
pub fn payments_with_demographics(pagos: &Table, cotizante: &Table) -> Result<Table> {
    let joined = join::join(pagos, cotizante, &JoinKeys::pair("id_usuario", "cedula"), JoinKind::Left)?;
    header::select(&joined, &DEMOGRAPHICS, false)
}

/// Returns the loaded `(destination, table)` pairs: the sum and the mean of
/// payments for each breakdown.
pub fn run<S: Extractor + Loader>(w: &mut Workflow, store: &mut S) -> Result<Vec<(String, Table)>> {
    let pagos = store.execute_query(PAYMENT_QUERY)?;
    w.ctrs.add_to(EXTRACTED, pagos.n_row())?;
    w.log.table("extracted pagos", &pagos, w.show_rows());
    let cotizante = extract(w, store, "cotizante")?;
    let payments = payments_with_demographics(&pagos, &cotizante)?;

    let mut summaries = Vec::new();
    for (group_col, label) in BREAKDOWNS {
        summaries.push((format!("pagos_total_por_{label}"), aggregate::group_by_sum(&payments, &[group_col], VALUE_COL)?));
        summaries.push((format!("pagos_promedio_por_{label}"), aggregate::group_by_mean(&payments, &[group_col], VALUE_COL)?));
    }
    for (dest, summary) in &summaries {
        report(w, dest, summary)?;
        load(w, store, summary, dest, LoadMode::Replace)?;
    }
    Ok(summaries)
}
