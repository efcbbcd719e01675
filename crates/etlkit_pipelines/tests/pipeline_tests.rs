// End-to-end pipeline runs against an in-memory store.

use etlkit::prelude::*;
use etlkit::store::{CsvStore, MemoryStore};
use etlkit_pipelines::{
    calendar, payment_demographics, pipeline_counters, regional_services, split_data_dir, wait_times,
    EXTRACTED, LOADED, LOADED_BY_TABLE,
};
use pretty_assertions::assert_eq;

fn workflow(tool: &str) -> Workflow {
    let mut cfg = Config::new();
    cfg.set_usize(etlkit::workflow::ETL_SHOW_ROWS, 0);
    Workflow::new(tool, cfg, pipeline_counters(tool))
}

fn health_store() -> MemoryStore {
    let ips = table!(
        id_ips       = vec![1, 2, 3],
        nombre       = vec!["Clinica Norte", "Hospital Sur", "IPS Centro"],
        departamento = vec!["Valle", "Nariño", "Antioquia"],
        municipio    = vec!["Cali", "Pasto", "Medellín"],
    ).unwrap();
    let medico = table!(
        cedula = vec![100, 200],
        nombre = vec!["Dra. Ruiz", "Dr. Mora"],
        id_ips = vec![1, 2],
    ).unwrap();
    let citas = table!(
        codigo_cita     = vec!["C1", "C2", "C3"],
        id_medico       = vec![100, 100, 200],
        diagnostico     = vec!["cirugia", "control", "cirugia"],
        fecha_solicitud = vec!["2024-03-01", "2024-03-02", "2024-03-03"],
        hora_solicitud  = vec!["08:00", "09:00", "10:00"],
        fecha_atencion  = vec!["2024-03-01", "2024-03-02", "2024-03-03"],
        hora_atencion   = vec![Some("08:30"), Some("10:00"), None],
    ).unwrap();
    let hosp = table!(
        codigo_hospitalizacion = vec!["H1"],
        id_medico              = vec![200],
    ).unwrap();
    let urg = table!(
        codigo_urgencia = vec!["U1", "U2"],
        id_medico       = vec![100, 999],
    ).unwrap();
    let pagos = table!(
        id_pago      = vec![1, 2, 3, 4],
        id_usuario   = vec![10, 11, 10, 12],
        valor_pagado = vec![Some(100.0), Some(300.0), Some(200.0), None],
    ).unwrap();
    let cotizante = table!(
        cedula            = vec![10, 11, 12],
        sexo              = vec!["F", "M", "F"],
        nivel_escolaridad = vec!["universitario", "secundaria", "universitario"],
        estracto          = vec![3, 2, 3],
        fecha_nacimiento  = vec!["1990-05-01", "1985-01-20", "2000-12-12"],
    ).unwrap();
    MemoryStore::new()
        .with_table("ips", ips)
        .with_table("medico", medico)
        .with_table("citas_generales", citas)
        .with_table("hospitalizaciones", hosp)
        .with_table("urgencias", urg)
        .with_table("pagos", pagos)
        .with_table("cotizante", cotizante)
}

fn texts(table: &Table, col: &str) -> Vec<Option<String>> {
    table.column(col).unwrap().values().map(|v| v.to_text()).collect()
}
fn ints(table: &Table, col: &str) -> Vec<Option<i64>> {
    table.column(col).unwrap().values().map(|v| v.as_i64()).collect()
}

#[test]
fn regional_services_counts_visits_per_provider() {
    let mut store = health_store();
    let mut w = workflow(regional_services::TOOL);
    let counted = {
        let mut session = Session::open(&mut store).unwrap();
        regional_services::run(&mut w, &mut *session).unwrap()
    };
    // providers 1 and 2 have visits; the unknown physician's visit and
    // provider 3 carry no visit code
    assert_eq!(counted.col_names(), &["id_ips", "departamento", "municipio", "count"]);
    assert_eq!(texts(&counted, "departamento"), vec![Some("Nariño".into()), Some("Valle".into())]);
    assert_eq!(ints(&counted, "count"), vec![Some(2), Some(3)]);
    assert_eq!(store.peek(regional_services::DEST).unwrap(), &counted);
    assert!(!store.is_connected());
    assert_eq!(w.ctrs.get(LOADED).unwrap(), 2);
    assert_eq!(w.ctrs.get(EXTRACTED).unwrap(), 3 + 2 + 3 + 1 + 2);
}

#[test]
fn visits_are_tagged_by_kind() {
    let mut store = health_store();
    store.connect().unwrap();
    let tagged = regional_services::visits_by_provider(
        &store.get_table("hospitalizaciones").unwrap(),
        &store.get_table("medico").unwrap(),
        &store.get_table("ips").unwrap(),
        "codigo_hospitalizacion",
        "hospitalizacion",
    ).unwrap();
    assert_eq!(tagged.n_row(), 3);
    assert_eq!(texts(&tagged, "codigo"), vec![None, Some("H1".into()), None]);
    assert_eq!(tagged.cell_string("tipo", 0).unwrap(), "hospitalizacion");
}

#[test]
fn payment_demographics_sums_and_means() {
    let mut store = health_store();
    store.connect().unwrap();
    let mut w = workflow(payment_demographics::TOOL);
    let summaries = payment_demographics::run(&mut w, &mut store).unwrap();
    let names: Vec<&str> = summaries.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, vec![
        "pagos_total_por_estracto", "pagos_promedio_por_estracto",
        "pagos_total_por_escolaridad", "pagos_promedio_por_escolaridad",
    ]);
    let totals = &summaries[0].1;
    assert_eq!(ints(totals, "estracto"), vec![Some(3), Some(2)]);
    assert_eq!(totals.cell("valor_pagado", 0).unwrap(), Value::Numeric(300.0));
    let means = &summaries[1].1;
    assert_eq!(means.cell("valor_pagado", 0).unwrap(), Value::Numeric(150.0));
    assert_eq!(w.ctrs.get_keyed(LOADED_BY_TABLE, "pagos_total_por_escolaridad").unwrap(), 2);
    assert!(store.peek("pagos_promedio_por_escolaridad").is_some());
}

#[test]
fn wait_times_in_minutes() {
    let mut store = health_store();
    store.connect().unwrap();
    let mut w = workflow(wait_times::TOOL);
    let waits = wait_times::run(&mut w, &mut store, None).unwrap();
    assert_eq!(waits.cell(wait_times::WAIT_COL, 0).unwrap(), Value::Numeric(30.0));
    assert_eq!(waits.cell(wait_times::WAIT_COL, 1).unwrap(), Value::Numeric(60.0));
    assert_eq!(waits.cell(wait_times::WAIT_COL, 2).unwrap(), Value::Missing);
    assert!(!waits.has_col("fecha_solicitud") && !waits.has_col("hora_solicitud"));
    assert!(waits.has_col("fecha_atencion"));
    assert_eq!(waits.col_type("fechahora_solicitud").unwrap(), DataType::Timestamp);
    assert_eq!(wait_times::mean_wait(&waits).unwrap(), Some(45.0));

    let surgery = wait_times::run(&mut w, &mut store, Some("cirugia")).unwrap();
    assert_eq!(surgery.n_row(), 2);
    assert_eq!(store.peek(wait_times::DEST).unwrap().n_row(), 2);
}

#[test]
fn strict_coercion_rejects_bad_times() {
    let citas = table!(
        fecha_solicitud = vec!["2024-03-01"],
        hora_solicitud  = vec!["ocho"],
        fecha_atencion  = vec!["2024-03-01"],
        hora_atencion   = vec!["08:30"],
    ).unwrap();
    let err = wait_times::with_wait_times(&citas, CoercionPolicy::Strict).unwrap_err();
    assert!(matches!(err, EtlError::Coercion { .. }));
    let permissive = wait_times::with_wait_times(&citas, CoercionPolicy::Permissive).unwrap();
    assert_eq!(permissive.cell(wait_times::WAIT_COL, 0).unwrap(), Value::Missing);
}

#[test]
fn calendar_loads_date_dimension() {
    let mut store = MemoryStore::new();
    store.connect().unwrap();
    let mut w = workflow(calendar::TOOL);
    let dim = calendar::run(&mut w, &mut store, 2024, 2025).unwrap();
    assert_eq!(dim.n_row(), 366 + 365);
    let holidays = filter::equal(&dim, "is_holiday", 1, false).unwrap();
    assert_eq!(holidays.n_row(), 12);
    assert_eq!(store.peek(calendar::DEST).unwrap().n_row(), dim.n_row());
}

#[test]
fn unreachable_store_fails_and_is_closed() {
    let mut store = MemoryStore::unreachable();
    assert!(matches!(Session::open(&mut store), Err(EtlError::Connection(_))));
    assert_eq!(store.n_closes(), 1);
}

#[test]
fn pipelines_run_over_csv_files() {
    let dir = tempfile::tempdir().unwrap();
    let mut source = health_store();
    source.connect().unwrap();
    for name in source.table_names() {
        source.get_table(&name).unwrap().write_csv_file(&dir.path().join(format!("{name}.csv"))).unwrap();
    }
    let mut store = CsvStore::new(dir.path());
    let mut w = workflow(regional_services::TOOL);
    let counted = {
        let mut session = Session::open(&mut store).unwrap();
        regional_services::run(&mut w, &mut *session).unwrap()
    };
    assert_eq!(ints(&counted, "count"), vec![Some(2), Some(3)]);
    assert!(dir.path().join("ips_por_region.csv").is_file());
}

#[test]
fn data_dir_argument_is_optional() {
    let dir = tempfile::tempdir().unwrap();
    let dir_name = dir.path().to_string_lossy().to_string();
    let args = vec![dir_name.clone(), "cirugia".to_string()];
    assert_eq!(split_data_dir(&args), (Some(dir_name.as_str()), &args[1..]));

    let args = vec!["cirugia".to_string()];
    assert_eq!(split_data_dir(&args), (None, &args[..]));
    assert_eq!(split_data_dir(&[]), (None, &[] as &[String]));
}
