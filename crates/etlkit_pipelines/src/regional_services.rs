//! Count visits of every kind per provider (IPS) and region.
//!
//! Each visit table is joined to the physician table to find the provider
//! that served it, then joined onto the provider table so that providers
//! keep their region columns. Visits are tagged by kind, stacked, and
//! counted per provider, department and municipality.

// dependencies
use etlkit::prelude::*;
use crate::{extract, load, report};

pub const TOOL: &str = "regional_services";
pub const DEST: &str = "ips_por_region";

// visit table, its visit code column, and the kind tag it receives
const VISITS: [(&str, &str, &str); 3] = [
    ("citas_generales",   "codigo_cita",            "general"),
    ("hospitalizaciones", "codigo_hospitalizacion", "hospitalizacion"),
    ("urgencias",         "codigo_urgencia",        "urgencias"),
];
const REGION_KEYS: [&str; 3] = ["id_ips", "departamento", "municipio"];

/// Tag one kind of visit with its provider's region columns.
pub fn visits_by_provider(visits: &Table, medico: &Table, ips: &Table, code_col: &str, tipo: &str) -> Result<Table> {
    let with_medico = join::join(visits, medico, &JoinKeys::pair("id_medico", "cedula"), JoinKind::Left)?;
    let selected = header::select(&with_medico, &["id_ips", code_col, "id_medico"], false)?;
    let with_ips = join::join(ips, &selected, &JoinKeys::on("id_ips"), JoinKind::Left)?;
    let tagged = transform::add_column(&with_ips, "tipo", |_| Ok(Value::from(tipo)))?;
    header::rename(&tagged, &[(code_col, "codigo")])
}

pub fn run<S: Extractor + Loader>(w: &mut Workflow, store: &mut S) -> Result<Table> {
    let medico = extract(w, store, "medico")?;
    let ips = extract(w, store, "ips")?;
    let mut tagged = Vec::with_capacity(VISITS.len());
    for (table_name, code_col, tipo) in VISITS {
        let visits = extract(w, store, table_name)?;
        tagged.push(visits_by_provider(&visits, &medico, &ips, code_col, tipo)?);
    }
    let stacked = bind::union_all(&tagged.iter().collect::<Vec<_>>())?;
    let kinds: Vec<String> = filter::unique_values(&stacked, "tipo")?.iter().map(Value::to_string).collect();
    w.log.print(&format!("visit kinds: {}", kinds.join(", ")));

    // providers without visits carry no visit code
    let with_code = filter::not_null(&stacked, "codigo", false)?;
    let without_code = filter::not_null(&stacked, "codigo", true)?;
    w.log.print(&format!("dropped {} provider rows without visits", without_code.n_row()));

    let counted = aggregate::group_by_count(&with_code, &REGION_KEYS)?;
    let sorted = transform::sort(&counted, &["departamento"], &[true])?;
    report(w, DEST, &sorted)?;
    load(w, store, &sorted, DEST, LoadMode::Replace)?;
    Ok(sorted)
}
