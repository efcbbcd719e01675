//! The Config structure stores configuration values in typed hash maps
//! that can be easily passed to pipeline functions as a single variable.

// dependencies
use std::collections::HashMap;
use std::env;
use std::str::FromStr;
use crate::ops::CoercionPolicy;
use crate::error::{EtlError, Result};
use super::ETL_COERCION;

/// The Config struct gathers configuration values from environment variables
/// and can store derived configuration values in a hash map organized by data type.
#[derive(Debug, Default)]
pub struct Config {
    pub usize:  HashMap<String, usize>,
    pub string: HashMap<String, String>,
    pub bool:   HashMap<String, bool>,
}
impl Config {
    /// Create a new empty Config instance.
    pub fn new() -> Self {
        Self::default()
    }
    /* ------------------------------------------------------------------
    environment variable setters
    ------------------------------------------------------------------ */
    /// Set usize configuration values from environment variables.
    /// Fail if any of the specified keys are not set or cannot be parsed as usize.
    pub fn set_usize_env(&mut self, keys: &[&str]) -> Result<()> {
        for &key in keys {
            let value_str = Self::get_env_string(key)?;
            self.usize.insert(key.to_string(), Self::parse_env_string(key, &value_str, "usize")?);
        }
        Ok(())
    }
    /// Set String configuration values from environment variables.
    /// Fail if any of the specified keys are not set.
    pub fn set_string_env(&mut self, keys: &[&str]) -> Result<()> {
        for &key in keys {
            let value_str = Self::get_env_string(key)?;
            self.string.insert(key.to_string(), value_str);
        }
        Ok(())
    }
    /// Set bool configuration values from environment variables, accepting
    /// true/false, yes/no or 1/0.
    pub fn set_bool_env(&mut self, keys: &[&str]) -> Result<()> {
        for &key in keys {
            let value_str = Self::get_env_string(key)?;
            self.bool.insert(key.to_string(), Self::parse_env_bool(key, &value_str)?);
        }
        Ok(())
    }
    /// Set usize values from environment variables, using `default` for
    /// unset keys. Unparsable values still fail.
    pub fn set_usize_env_or(&mut self, keys: &[&str], default: usize) -> Result<()> {
        for &key in keys {
            let value = match env::var_os(key) {
                Some(_) => Self::parse_env_string(key, &Self::get_env_string(key)?, "usize")?,
                None => default,
            };
            self.usize.insert(key.to_string(), value);
        }
        Ok(())
    }
    /// Set String values from environment variables, using `default` for unset keys.
    pub fn set_string_env_or(&mut self, keys: &[&str], default: &str) -> Result<()> {
        for &key in keys {
            let value = match env::var_os(key) {
                Some(_) => Self::get_env_string(key)?,
                None => default.to_string(),
            };
            self.string.insert(key.to_string(), value);
        }
        Ok(())
    }
    /// Set bool values from environment variables, using `default` for unset keys.
    pub fn set_bool_env_or(&mut self, keys: &[&str], default: bool) -> Result<()> {
        for &key in keys {
            let value = match env::var_os(key) {
                Some(_) => Self::parse_env_bool(key, &Self::get_env_string(key)?)?,
                None => default,
            };
            self.bool.insert(key.to_string(), value);
        }
        Ok(())
    }
    /* ------------------------------------------------------------------
    environment variable helpers
    ------------------------------------------------------------------ */
    // get the initial string representation of an environment variable
    fn get_env_string(key: &str) -> Result<String> {
        match env::var_os(key) {
            Some(value) => Ok(value.to_string_lossy().to_string()),
            None => Err(EtlError::Config(format!("environment variable {key} is not set"))),
        }
    }
    // parse an environment variable string into the desired data type
    fn parse_env_string<T: FromStr>(key: &str, value: &str, data_type: &str) -> Result<T> {
        value.parse::<T>().map_err(|_| EtlError::Config(format!(
            "environment variable {key} string value '{value}' could not be parsed as {data_type}"
        )))
    }
    fn parse_env_bool(key: &str, value: &str) -> Result<bool> {
        match value.trim().to_ascii_lowercase().as_str() {
            "true"  | "yes" | "1" => Ok(true),
            "false" | "no"  | "0" => Ok(false),
            _ => Err(EtlError::Config(format!(
                "environment variable {key} string value '{value}' could not be parsed as bool"
            ))),
        }
    }
    /* ------------------------------------------------------------------
    derived variable setters
    ------------------------------------------------------------------ */
    /// Set a (derived) usize configuration value directly.
    /// Any existing value is overridden and returned as an Option.
    pub fn set_usize(&mut self, key: &str, value: usize) -> Option<usize> {
        self.usize.insert(key.to_string(), value)
    }
    /// Set a (derived) String configuration value directly.
    /// Any existing value is overridden and returned as an Option.
    pub fn set_string(&mut self, key: &str, value: String) -> Option<String> {
        self.string.insert(key.to_string(), value)
    }
    /// Set a (derived) bool configuration value directly.
    /// Any existing value is overridden and returned as an Option.
    pub fn set_bool(&mut self, key: &str, value: bool) -> Option<bool> {
        self.bool.insert(key.to_string(), value)
    }
    /* ------------------------------------------------------------------
    config variable getters
    ------------------------------------------------------------------ */
    /// Get a usize configuration value by key.
    pub fn get_usize(&self, key: &str) -> Result<usize> {
        self.usize.get(key).copied().ok_or_else(|| Self::key_not_found(key, "usize"))
    }
    /// Get a String configuration value by key.
    pub fn get_string(&self, key: &str) -> Result<&str> {
        self.string.get(key).map(String::as_str).ok_or_else(|| Self::key_not_found(key, "String"))
    }
    /// Get a bool configuration value by key.
    pub fn get_bool(&self, key: &str) -> Result<bool> {
        self.bool.get(key).copied().ok_or_else(|| Self::key_not_found(key, "bool"))
    }
    pub fn get_usize_or(&self, key: &str, default: usize) -> usize {
        self.usize.get(key).copied().unwrap_or(default)
    }
    pub fn get_string_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.string.get(key).map_or(default, String::as_str)
    }
    pub fn get_bool_or(&self, key: &str, default: bool) -> bool {
        self.bool.get(key).copied().unwrap_or(default)
    }
    /// The type coercion policy named by `ETL_COERCION`, permissive if unset.
    pub fn coercion_policy(&self) -> Result<CoercionPolicy> {
        match self.string.get(ETL_COERCION) {
            Some(policy) => policy.parse(),
            None => Ok(CoercionPolicy::default()),
        }
    }
    /* ------------------------------------------------------------------
    config getter helpers
    ------------------------------------------------------------------ */
    fn key_not_found(key: &str, data_type: &str) -> EtlError {
        EtlError::Config(format!("config key {key} not found in {data_type} value map"))
    }
}
