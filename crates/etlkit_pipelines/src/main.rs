//! Command-line tools that run the reporting pipelines against a directory
//! of CSV tables.
//!
//! usage: etlkit_pipelines <tool> [data_dir] [tool arguments]
//!
//! `data_dir` is used when the first argument after the tool names an
//! existing directory; otherwise it defaults to environment variable
//! ETL_DATA_DIR and every argument is passed to the tool.

// dependencies
use std::env;
use std::error::Error;
use etlkit::prelude::{Session, Workflow};
use etlkit::store::CsvStore;
use etlkit::workflow::ETL_DATA_DIR;
use etlkit_pipelines::{
    calendar, payment_demographics, pipeline_counters, regional_services, split_data_dir, wait_times,
};

// constants
const TOOLS_NAME: &str = "etlkit_pipelines";

// load and process data
fn main() -> Result<(), Box<dyn Error>> {

    // read command line arguments
    let mut args: Vec<String> = env::args().skip(1).collect(); // drop executable name
    if args.is_empty() { // check for something to do, i.e., a tool to run
        eprintln!("{TOOLS_NAME}: missing tool or command");
        Err(format!("usage: {TOOLS_NAME} <tool> [data_dir] [tool arguments]"))?
    }
    let tool = args.remove(0);
    let (data_dir, tool_args) = split_data_dir(&args);

    // dispatch to tool or command
    match tool.as_str() {

        /*--------------------------------------------------------------
        visit and payment reports
        ------------------------------------------------------------- */
        // visits per provider and region
        regional_services::TOOL => run_tool(regional_services::TOOL, data_dir, |w, store| {
            regional_services::run(w, store).map(|_| ())
        }),

        // payment sums and means by stratum and education level
        payment_demographics::TOOL => run_tool(payment_demographics::TOOL, data_dir, |w, store| {
            payment_demographics::run(w, store).map(|_| ())
        }),

        // appointment wait times, optionally for one diagnosis
        wait_times::TOOL => {
            let diagnosis = tool_args.first().cloned();
            run_tool(wait_times::TOOL, data_dir, |w, store| {
                wait_times::run(w, store, diagnosis.as_deref()).map(|_| ())
            })
        },

        /*--------------------------------------------------------------
        dimensions
        ------------------------------------------------------------- */
        // calendar date dimension, optionally for a start and end year
        calendar::TOOL => {
            let start_year = tool_args.first().map_or(Ok(calendar::START_YEAR), |y| y.parse::<i32>())?;
            let end_year   = tool_args.get(1).map_or(Ok(calendar::END_YEAR),    |y| y.parse::<i32>())?;
            run_tool(calendar::TOOL, data_dir, |w, store| {
                calendar::run(w, store, start_year, end_year).map(|_| ())
            })
        },

        /*--------------------------------------------------------------
        unrecognized tool
        ------------------------------------------------------------- */
        _ => Err(format!("{TOOLS_NAME}: unknown tool or command: {tool}"))?
    }
}

// run one pipeline inside a store session, which always closes the store
fn run_tool(
    tool:     &str,
    data_dir: Option<&str>,
    pipeline: impl FnOnce(&mut Workflow, &mut CsvStore) -> etlkit::Result<()>
) -> Result<(), Box<dyn Error>> {
    let mut w = Workflow::from_env(tool, pipeline_counters(tool))?;
    w.log.initializing();
    let data_dir = match data_dir {
        Some(dir) => dir.to_string(),
        None => w.cfg.get_string(ETL_DATA_DIR)?.to_string(),
    };
    let mut store = CsvStore::new(data_dir);
    let result = Session::open(&mut store).and_then(|mut session| pipeline(&mut w, &mut *session));
    match result {
        Ok(()) => {
            w.ctrs.print_all();
            w.log.print("done");
            Ok(())
        },
        Err(e) => {
            w.log.error(&e);
            Err(e)?
        },
    }
}
