//! The Counters structure stores row tallies that can be passed to
//! pipeline functions as a single variable.

// dependencies
use std::collections::HashMap;
use num_format::{Locale, ToFormattedString};
use crate::error::{EtlError, Result};

// define a constant to print a separator line when printing counters
pub const COUNTER_SEPARATOR: &str = "------------------------------------------------------------";

/// The Counters struct stores keyed usize count values in a HashMap.
///
/// By convention, Counters objects are named `ctrs`.
#[derive(Debug)]
pub struct Counters {
    tool:               String,
    // regular counter fields, for things like row tallies
    keys:               Vec<String>,
    descriptions:       HashMap<String, String>,
    counts:             HashMap<String, usize>,
    // keyed counter fields, for things like per-table tallies
    keyed_keys:         Vec<String>,
    keyed_descriptions: HashMap<String, String>,
    keyed_counts:       HashMap<String, Vec<(String, usize)>>,
}
impl Counters {
    /// Create a new Counters instance with specified "regular" counter keys
    /// initialized to zero.
    ///
    /// Pass requested counters as a slice of tuples of form `&[(&str, &str)]`,
    /// where the first element of each tuple is the counter key and the second
    /// element is the counter description. Pass `(COUNTER_SEPARATOR, "")` to
    /// insert a separator line between groups of related counters.
    pub fn new(tool: &str, counters: &[(&str, &str)]) -> Self {
        let mut ctrs = Counters {
            tool:               tool.to_string(),
            keys:               Vec::new(),
            descriptions:       HashMap::new(),
            counts:             HashMap::new(),
            keyed_keys:         Vec::new(),
            keyed_descriptions: HashMap::new(),
            keyed_counts:       HashMap::new(),
        };
        ctrs.add_counters(counters);
        ctrs
    }
    /// Add one or more regular counters to the Counters instance.
    pub fn add_counters(&mut self, counters: &[(&str, &str)]) -> &mut Self {
        for (key, description) in counters {
            if *key == COUNTER_SEPARATOR {
                let final_key = format!("{COUNTER_SEPARATOR}{}", self.keys.len());
                self.descriptions.insert(final_key.clone(), COUNTER_SEPARATOR.to_string());
                self.keys.push(final_key);
            } else {
                self.descriptions.insert(key.to_string(), description.to_string());
                self.counts.insert(key.to_string(), 0);
                self.keys.push(key.to_string());
            }
        }
        self
    }
    /// Add one or more keyed counters to the Counters instance.
    pub fn add_keyed_counters(&mut self, counters: &[(&str, &str)]) -> &mut Self {
        for (key, description) in counters {
            self.keyed_keys.push(key.to_string());
            self.keyed_descriptions.insert(key.to_string(), description.to_string());
            self.keyed_counts.insert(key.to_string(), Vec::new());
        }
        self
    }
    /* ------------------------------------------------------------------
    regular counter methods
    ------------------------------------------------------------------ */
    /// Increment the count for the specified counter key by one.
    pub fn increment(&mut self, key: &str) -> Result<()> {
        self.add_to(key, 1)
    }
    /// Increment the count for the specified counter key an arbitrary amount.
    pub fn add_to(&mut self, key: &str, value: usize) -> Result<()> {
        let counter = self.counts.get_mut(key).ok_or_else(|| key_not_found("add_to", key))?;
        *counter += value;
        Ok(())
    }
    /// Get the current count for a regular counter.
    pub fn get(&self, key: &str) -> Result<usize> {
        self.counts.get(key).copied().ok_or_else(|| key_not_found("get", key))
    }
    /* ------------------------------------------------------------------
    keyed counter methods; inner keys keep first-seen order
    ------------------------------------------------------------------ */
    /// Increment the count for the specified keyed counter an arbitrary amount.
    pub fn add_to_keyed(&mut self, outer_key: &str, inner_key: &str, value: usize) -> Result<()> {
        let keyed_counter = self.keyed_counts.get_mut(outer_key)
            .ok_or_else(|| key_not_found("add_to_keyed", outer_key))?;
        match keyed_counter.iter_mut().find(|(k, _)| k == inner_key) {
            Some((_, count)) => *count += value,
            None => keyed_counter.push((inner_key.to_string(), value)),
        }
        Ok(())
    }
    /// Get the current count for one inner key of a keyed counter, zero if never counted.
    pub fn get_keyed(&self, outer_key: &str, inner_key: &str) -> Result<usize> {
        let keyed_counter = self.keyed_counts.get(outer_key)
            .ok_or_else(|| key_not_found("get_keyed", outer_key))?;
        Ok(keyed_counter.iter().find(|(k, _)| k == inner_key).map_or(0, |(_, c)| *c))
    }
    /* ------------------------------------------------------------------
    count reporting
    ------------------------------------------------------------------ */
    /// Print all counters with their descriptions to STDERR in the order
    /// they were registered, regular counters first.
    pub fn print_all(&self) {
        for key in &self.keys {
            match self.counts.get(key) {
                Some(count) => eprintln!("{}\t{}\t{}\t{}",
                    self.tool,
                    count.to_formatted_string(&Locale::en),
                    key,
                    self.descriptions.get(key).map_or("", String::as_str)
                ),
                None => eprintln!("{COUNTER_SEPARATOR}"),
            }
        }
        for outer_key in &self.keyed_keys {
            let description = self.keyed_descriptions.get(outer_key).map_or("", String::as_str);
            for (inner_key, count) in self.keyed_counts.get(outer_key).into_iter().flatten() {
                eprintln!("{}\t{}\t{}\t{}\t{}",
                    self.tool,
                    count.to_formatted_string(&Locale::en),
                    outer_key,
                    inner_key,
                    description
                );
            }
        }
    }
}

fn key_not_found(caller: &str, key: &str) -> EtlError {
    EtlError::Config(format!("Counters::{caller} error: key '{key}' not found"))
}
