// modules
mod config;
mod counters;
mod log;

// exports
pub use config::Config;
pub use counters::{Counters, COUNTER_SEPARATOR};
pub use log::Log;

// dependencies
use crate::error::Result;

/// Declare one or more data keys as constants in form `pub const KEY: &str = "KEY";`.
/// Doing so improves code readability and helps avoid typos in string literals
/// used to access environment variables or string-keyed data structures,
/// since calls can now take the form `w.cfg.set_usize_env(&[KEY]); w.cfg.get_usize(KEY)`.
///
/// Provide keys as either space-separated or comma-separated lists.
#[macro_export]
macro_rules! pub_key_constants {
    ($($key:ident)+) => { // support space-separated keys
        $(
            pub const $key: &str = stringify!($key);
        )+
    };
    ($($key:ident),+ $(,)?) => { // support comma-separated keys
        $(
            pub const $key: &str = stringify!($key);
        )+
    };
}

// environment keys shared by all pipelines
pub_key_constants!(
    ETL_DATA_DIR,
    ETL_SHOW_ROWS,
    ETL_COERCION,
    ETL_OUTPUT_JSON,
);
const DEFAULT_SHOW_ROWS: usize = 5;

/// The Workflow structure organizes the common components of a pipeline run,
/// including configuration parameters, logging, and counters.
///
/// By convention, Workflow objects are named `w`, and elements are accessed as
/// `w.cfg`, `w.log`, and `w.ctrs`.
pub struct Workflow {
    pub cfg:  Config,
    pub ctrs: Counters,
    pub log:  Log,
}
impl Workflow {
    /// Create a new Workflow instance with specified tool name, configuration,
    /// and counters.
    pub fn new(tool: &str, cfg: Config, ctrs: Counters) -> Self {
        Self {
            cfg,
            ctrs,
            log: Log::new(tool),
        }
    }
    /// Create a Workflow whose Config holds the shared `ETL_*` keys read
    /// from the environment, with defaults for unset optional keys.
    pub fn from_env(tool: &str, ctrs: Counters) -> Result<Self> {
        let mut cfg = Config::new();
        cfg.set_usize_env_or(&[ETL_SHOW_ROWS], DEFAULT_SHOW_ROWS)?;
        cfg.set_string_env_or(&[ETL_COERCION], "permissive")?;
        cfg.set_bool_env_or(&[ETL_OUTPUT_JSON], false)?;
        if std::env::var_os(ETL_DATA_DIR).is_some() {
            cfg.set_string_env(&[ETL_DATA_DIR])?;
        }
        cfg.coercion_policy()?; // fail early on a bad policy name
        Ok(Self::new(tool, cfg, ctrs))
    }
    /// Number of preview rows to log for intermediate tables.
    pub fn show_rows(&self) -> usize {
        self.cfg.get_usize_or(ETL_SHOW_ROWS, DEFAULT_SHOW_ROWS)
    }
}
