//! Reporting pipelines over a health services store: visits per regional
//! provider, payments by member demographics, appointment wait times and
//! the calendar date dimension.
//!
//! Each pipeline takes a `Workflow` and a store implementing both
//! `Extractor` and `Loader`, and returns the table(s) it loaded.

// modules
pub mod regional_services;
pub mod payment_demographics;
pub mod wait_times;
pub mod calendar;

// dependencies
use std::path::Path;
use etlkit::prelude::*;
use etlkit::workflow::{ETL_OUTPUT_JSON, COUNTER_SEPARATOR};

// counter keys shared by all pipelines
etlkit::pub_key_constants!(
    EXTRACTED,
    RESULT_ROWS,
    LOADED,
    LOADED_BY_TABLE,
);

/// Counters tallied by every pipeline run.
pub fn pipeline_counters(tool: &str) -> Counters {
    let mut ctrs = Counters::new(tool, &[
        (EXTRACTED,         "rows extracted from the store"),
        (RESULT_ROWS,       "rows in the final result"),
        (COUNTER_SEPARATOR, ""),
        (LOADED,            "rows loaded into the store"),
    ]);
    ctrs.add_keyed_counters(&[(LOADED_BY_TABLE, "rows loaded per destination table")]);
    ctrs
}

/// Fetch a whole table, logging a preview and counting its rows.
pub fn extract<S: Extractor + ?Sized>(w: &mut Workflow, store: &S, name: &str) -> Result<Table> {
    let table = store.get_table(name)?;
    w.ctrs.add_to(EXTRACTED, table.n_row())?;
    w.log.table(&format!("extracted {name}"), &table, w.show_rows());
    Ok(table)
}

/// Load a result table, logging it and counting its rows.
pub fn load<S: Loader + ?Sized>(w: &mut Workflow, store: &mut S, table: &Table, dest: &str, mode: LoadMode) -> Result<()> {
    store.load_table(table, dest, mode)?;
    w.ctrs.add_to(LOADED, table.n_row())?;
    w.ctrs.add_to_keyed(LOADED_BY_TABLE, dest, table.n_row())?;
    w.log.print(&format!("loaded {dest}"));
    Ok(())
}

/// Report a final result, as JSON records on STDOUT when configured.
pub fn report(w: &mut Workflow, label: &str, table: &Table) -> Result<()> {
    w.ctrs.add_to(RESULT_ROWS, table.n_row())?;
    if w.cfg.get_bool_or(ETL_OUTPUT_JSON, false) {
        println!("{}", serde_json::to_string_pretty(&table.to_json_records())?);
    } else {
        w.log.table(label, table, w.show_rows());
    }
    Ok(())
}

/// Split command line arguments into an optional data directory and the
/// remaining tool arguments. The first argument is taken as the data
/// directory only when it names an existing directory.
pub fn split_data_dir(args: &[String]) -> (Option<&str>, &[String]) {
    match args.split_first() {
        Some((first, rest)) if Path::new(first).is_dir() => (Some(first.as_str()), rest),
        _ => (None, args),
    }
}
