//! Category columns store text values as `u32` codes into a label list.

// dependencies
use std::collections::HashMap;

/* -----------------------------------------------------------------------------
Special column data types: Category
----------------------------------------------------------------------------- */
/// `CategoryColumn` holds categorical text as codes into `labels`, with
/// `levels` as the reverse label lookup. When `ordered` is set, sorting
/// follows label order rather than text order.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct CategoryColumn {
    pub labels:  Vec<String>,
    pub levels:  HashMap<String, u32>,
    pub ordered: bool,
    pub data:    Vec<Option<u32>>,
}
impl CategoryColumn {
    /// Create an empty category column with a fixed, pre-defined label list.
    pub fn with_categories<S: AsRef<str>>(categories: &[S], ordered: bool) -> Self {
        let mut col = CategoryColumn { ordered, ..Default::default() };
        for label in categories {
            col.add_level(label.as_ref());
        }
        col
    }
    /// Create a category column whose labels are the distinct values in the
    /// order they were first encountered. Missing values stay missing.
    pub fn factorize<I, S>(values: I) -> Self
    where I: IntoIterator<Item = Option<S>>, S: AsRef<str> {
        let mut col = CategoryColumn::default();
        for value in values {
            col.push_label(value.as_ref().map(|s| s.as_ref()));
        }
        col
    }
    fn add_level(&mut self, label: &str) -> u32 {
        if let Some(level) = self.levels.get(label) {
            return *level;
        }
        let level = self.labels.len() as u32;
        self.levels.insert(label.to_string(), level);
        self.labels.push(label.to_string());
        level
    }
    /// Push a value, adding a new level for labels not yet seen.
    pub fn push_label(&mut self, label: Option<&str>) {
        let code = label.map(|label| self.add_level(label));
        self.data.push(code);
    }
    /// Push a value only if its label is a known level; unknown labels are
    /// pushed as missing. Returns false when a non-missing label was rejected.
    pub fn push_known(&mut self, label: Option<&str>) -> bool {
        match label {
            None => {
                self.data.push(None);
                true
            },
            Some(label) => {
                let code = self.levels.get(label).copied();
                self.data.push(code);
                code.is_some()
            },
        }
    }
    /// Return the label of the value at row `i`.
    pub fn label(&self, i: usize) -> Option<&str> {
        self.data.get(i)
            .copied()
            .flatten()
            .and_then(|code| self.labels.get(code as usize))
            .map(|label| label.as_str())
    }
    /// Return the code of the value at row `i`, i.e., its label rank.
    pub fn code(&self, i: usize) -> Option<u32> {
        self.data.get(i).copied().flatten()
    }
    /// Create a new category column with the same labels and the selected codes.
    pub(super) fn with_data(&self, data: Vec<Option<u32>>) -> Self {
        CategoryColumn {
            labels:  self.labels.clone(),
            levels:  self.levels.clone(),
            ordered: self.ordered,
            data,
        }
    }
}
