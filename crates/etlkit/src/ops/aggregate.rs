//! Group-by aggregation. Output rows follow the first-seen order of each
//! distinct key combination; missing key values form their own group.

// dependencies
use std::collections::HashMap;
use crate::table::{Column, Table, agg::Agg, key::row_keys};
use crate::error::{EtlError, Result};

pub const COUNT_COL: &str = "count";

// row groups in first-seen key order
struct Groups {
    first_rows: Vec<usize>,
    members:    Vec<Vec<usize>>,
}
impl Groups {
    fn new<S: AsRef<str>>(table: &Table, keys: &[S]) -> Result<Self> {
        if keys.is_empty() {
            return Err(EtlError::shape("group_by requires one or more key columns"));
        }
        let mut index = HashMap::new();
        let mut groups = Groups { first_rows: Vec::new(), members: Vec::new() };
        for (i, key) in row_keys(table, keys)?.into_iter().enumerate() {
            let group_i = *index.entry(key).or_insert_with(|| {
                groups.first_rows.push(i);
                groups.members.push(Vec::new());
                groups.members.len() - 1
            });
            groups.members[group_i].push(i);
        }
        Ok(groups)
    }
    // one output row per group holding the key column values
    fn key_table<S: AsRef<str>>(&self, table: &Table, keys: &[S]) -> Result<Table> {
        table.retain_cols(keys).map(|keyed| keyed.take_rows(&self.first_rows))
    }
    // gather the typed values of each group
    fn gather<T: Clone>(&self, data: &[Option<T>]) -> Vec<Vec<Option<T>>> {
        self.members.iter()
            .map(|rows| rows.iter().map(|&i| data[i].clone()).collect())
            .collect()
    }
}

/// Count the rows in each group, appended as an Integer `count` column.
pub fn group_by_count<S: AsRef<str>>(table: &Table, keys: &[S]) -> Result<Table> {
    let groups = Groups::new(table, keys)?;
    let counts: Vec<i64> = groups.members.iter().map(|rows| rows.len() as i64).collect();
    let mut counted = groups.key_table(table, keys)?;
    counted.add_col(COUNT_COL, counts)?;
    Ok(counted)
}

/// Sum a numeric column per group, ignoring missing values. A group with no
/// non-missing values sums to zero. Integer columns keep the Integer type
/// unless a group sum overflows i64, which widens the result to Numeric.
pub fn group_by_sum<S: AsRef<str>>(table: &Table, keys: &[S], col_name: &str) -> Result<Table> {
    let groups = Groups::new(table, keys)?;
    let sums = match table.column(col_name)? {
        Column::Integer(v) => {
            let gathered = groups.gather(v);
            match gathered.iter().map(|g| Agg::checked_sum_i64(g)).collect::<Option<Vec<i64>>>() {
                Some(sums) => Column::from(sums),
                // widen to Numeric when any group overflows i64
                None => Column::from(gathered.iter()
                    .map(|g| Agg::na_rm(g).into_iter().map(|x| x as f64).sum::<f64>())
                    .collect::<Vec<f64>>()),
            }
        },
        Column::Numeric(v) => Column::from(
            groups.gather(v).iter().map(|g| Agg::sum(g)).collect::<Vec<f64>>()
        ),
        col => return Err(not_numeric("group_by_sum", col_name, col)),
    };
    let mut summed = groups.key_table(table, keys)?;
    summed.replace_or_add_col(col_name, sums)?;
    Ok(summed)
}

/// Average a numeric column per group, ignoring missing values. A group with
/// no non-missing values yields missing.
pub fn group_by_mean<S: AsRef<str>>(table: &Table, keys: &[S], col_name: &str) -> Result<Table> {
    let groups = Groups::new(table, keys)?;
    let means: Vec<Option<f64>> = match table.column(col_name)? {
        Column::Integer(v) => groups.gather(v).iter().map(|g| Agg::mean_i64(g)).collect(),
        Column::Numeric(v) => groups.gather(v).iter().map(|g| Agg::mean(g)).collect(),
        col => return Err(not_numeric("group_by_mean", col_name, col)),
    };
    let mut averaged = groups.key_table(table, keys)?;
    averaged.replace_or_add_col(col_name, means)?;
    Ok(averaged)
}

fn not_numeric(caller: &str, col_name: &str, col: &Column) -> EtlError {
    EtlError::type_error(format!(
        "{caller} requires a numeric column, '{col_name}' is {}", col.data_type()
    ))
}
