//! `table::column::Column` defines the column type enumeration
//! and methods for matching types and dispatching actions on column data.
//!
//! Column methods generally all entail `match` statements to dispatch column
//! operations to the correct typed action. These create little overhead
//! since they are only called once per column per operation.

// modules
mod category;

// dependencies
use chrono::NaiveDateTime;
use paste::paste;
pub use category::CategoryColumn;
use super::{DataType, Value};
use super::value::NA;

/* -----------------------------------------------------------------------------
Column data type enumeration, i.e., all row values for a column as Vec<Option<T>>
----------------------------------------------------------------------------- */
/// The `Column` enum holds one typed vector per logical data type.
#[derive(Clone, Debug, PartialEq)]
pub enum Column {
    Integer(Vec<Option<i64>>),
    Numeric(Vec<Option<f64>>),
    Logical(Vec<Option<bool>>),
    Timestamp(Vec<Option<NaiveDateTime>>),
    Text(Vec<Option<String>>),
    Category(CategoryColumn),
}

// apply the same generic vector expression to every typed variant
macro_rules! map_column {
    ($col:expr, $v:ident => $vec_expr:expr, $f:ident => $cat_expr:expr) => {
        match $col {
            Column::Integer($v)   => Column::Integer($vec_expr),
            Column::Numeric($v)   => Column::Numeric($vec_expr),
            Column::Logical($v)   => Column::Logical($vec_expr),
            Column::Timestamp($v) => Column::Timestamp($vec_expr),
            Column::Text($v)      => Column::Text($vec_expr),
            Column::Category($f)  => Column::Category($cat_expr),
        }
    };
}

fn pick<T: Clone>(v: &[Option<T>], rows: &[usize]) -> Vec<Option<T>> {
    rows.iter().map(|&i| v.get(i).cloned().flatten()).collect()
}
fn pick_opt<T: Clone>(v: &[Option<T>], rows: &[Option<usize>]) -> Vec<Option<T>> {
    rows.iter().map(|i| i.and_then(|i| v.get(i).cloned().flatten())).collect()
}
fn resize_from_first<T: Clone>(v: &mut Vec<Option<T>>, new_len: usize) {
    let fill = v.first().cloned().flatten();
    v.resize(new_len, fill);
}

impl Column {
    /* -----------------------------------------------------------------------------
    column length and type
    ----------------------------------------------------------------------------- */
    pub fn len(&self) -> usize {
        match self {
            Column::Integer(v)   => v.len(),
            Column::Numeric(v)   => v.len(),
            Column::Logical(v)   => v.len(),
            Column::Timestamp(v) => v.len(),
            Column::Text(v)      => v.len(),
            Column::Category(f)  => f.data.len(),
        }
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    pub fn data_type(&self) -> DataType {
        match self {
            Column::Integer(_)   => DataType::Integer,
            Column::Numeric(_)   => DataType::Numeric,
            Column::Logical(_)   => DataType::Logical,
            Column::Timestamp(_) => DataType::Timestamp,
            Column::Text(_)      => DataType::Text,
            Column::Category(_)  => DataType::Category,
        }
    }
    /// Create a column of `n_row` missing values of a given type.
    pub fn missing(data_type: DataType, n_row: usize) -> Self {
        match data_type {
            DataType::Integer   => Column::Integer(vec![None; n_row]),
            DataType::Numeric   => Column::Numeric(vec![None; n_row]),
            DataType::Logical   => Column::Logical(vec![None; n_row]),
            DataType::Timestamp => Column::Timestamp(vec![None; n_row]),
            DataType::Text      => Column::Text(vec![None; n_row]),
            DataType::Category  => Column::Category(CategoryColumn {
                data: vec![None; n_row],
                ..Default::default()
            }),
        }
    }

    /* -----------------------------------------------------------------------------
    cell-level getters
    ----------------------------------------------------------------------------- */
    /// Return the value at row `i`; out-of-range rows are Missing.
    /// Category values are returned as Text labels.
    pub fn cell(&self, i: usize) -> Value {
        match self {
            Column::Integer(v)   => v.get(i).copied().flatten().into(),
            Column::Numeric(v)   => v.get(i).copied().flatten().into(),
            Column::Logical(v)   => v.get(i).copied().flatten().into(),
            Column::Timestamp(v) => v.get(i).copied().flatten().into(),
            Column::Text(v)      => v.get(i).cloned().flatten().into(),
            Column::Category(f)  => f.label(i).into(),
        }
    }
    /// Return the String representation of the value at row `i`.
    pub fn cell_string(&self, i: usize) -> String {
        match self {
            Column::Text(v)     => v.get(i).cloned().flatten().unwrap_or_else(|| NA.to_string()),
            Column::Category(f) => f.label(i).unwrap_or(NA).to_string(),
            _ => self.cell(i).to_string(),
        }
    }
    pub fn is_missing(&self, i: usize) -> bool {
        match self {
            Column::Integer(v)   => v.get(i).is_none_or(|x| x.is_none()),
            Column::Numeric(v)   => v.get(i).is_none_or(|x| x.is_none()),
            Column::Logical(v)   => v.get(i).is_none_or(|x| x.is_none()),
            Column::Timestamp(v) => v.get(i).is_none_or(|x| x.is_none()),
            Column::Text(v)      => v.get(i).is_none_or(|x| x.is_none()),
            Column::Category(f)  => f.code(i).is_none(),
        }
    }
    /// Iterate over all cell values in row order.
    pub fn values(&self) -> impl Iterator<Item = Value> + '_ {
        (0..self.len()).map(|i| self.cell(i))
    }

    /* -----------------------------------------------------------------------------
    building columns from dynamic values
    ----------------------------------------------------------------------------- */
    /// Build a column from dynamic values, inferring its type from the
    /// non-missing values. Integer and Numeric mixes widen to Numeric; any
    /// other mix falls back to Text. An all-missing vector becomes Text.
    pub fn from_values(values: Vec<Value>) -> Self {
        let mut inferred: Option<DataType> = None;
        for data_type in values.iter().filter_map(Value::data_type) {
            inferred = Some(match inferred {
                None => data_type,
                Some(prev) => prev.widen(data_type),
            });
            if inferred == Some(DataType::Text) { break; }
        }
        Column::from_values_as(inferred.unwrap_or(DataType::Text), values)
    }
    /// Build a column of a given type from dynamic values. Values are
    /// converted losslessly where possible (Integer to Numeric, anything to
    /// Text); values that cannot be represented become missing.
    pub fn from_values_as(data_type: DataType, values: Vec<Value>) -> Self {
        match data_type {
            DataType::Integer => Column::Integer(
                values.into_iter().map(|v| v.as_i64()).collect()
            ),
            DataType::Numeric => Column::Numeric(
                values.into_iter().map(|v| v.as_f64()).collect()
            ),
            DataType::Logical => Column::Logical(
                values.into_iter().map(|v| v.as_bool()).collect()
            ),
            DataType::Timestamp => Column::Timestamp(
                values.into_iter().map(|v| v.as_timestamp()).collect()
            ),
            DataType::Text => Column::Text(
                values.into_iter().map(|v| match v {
                    Value::Text(s) => Some(s),
                    v => v.to_text(),
                }).collect()
            ),
            DataType::Category => Column::Category(
                CategoryColumn::factorize(values.iter().map(Value::to_text))
            ),
        }
    }

    /* -----------------------------------------------------------------------------
    row selection and length management
    ----------------------------------------------------------------------------- */
    /// Return a new column with the values at `rows`, in that order.
    pub fn take(&self, rows: &[usize]) -> Self {
        map_column!(self, v => pick(v, rows), f => f.with_data(pick(&f.data, rows)))
    }
    /// Like `take`, but `None` positions produce missing values, e.g., for
    /// unmatched rows in a join.
    pub fn take_opt(&self, rows: &[Option<usize>]) -> Self {
        map_column!(self, v => pick_opt(v, rows), f => f.with_data(pick_opt(&f.data, rows)))
    }
    /// Extend a column of zero or one rows to `new_len` by repeating its
    /// single value, or missing if currently empty.
    pub(crate) fn recycle(&mut self, new_len: usize) {
        match self {
            Column::Integer(v)   => resize_from_first(v, new_len),
            Column::Numeric(v)   => resize_from_first(v, new_len),
            Column::Logical(v)   => resize_from_first(v, new_len),
            Column::Timestamp(v) => resize_from_first(v, new_len),
            Column::Text(v)      => resize_from_first(v, new_len),
            Column::Category(f)  => resize_from_first(&mut f.data, new_len),
        }
    }
    /// Vertically concatenate columns. Parts of the same type are appended
    /// as is; mixed types widen by the same rule as `from_values`.
    pub fn concat(parts: &[Column]) -> Self {
        let Some(first) = parts.first() else {
            return Column::missing(DataType::Text, 0);
        };
        let same_type = parts.iter().all(|p| p.data_type() == first.data_type());
        match (first, same_type) {
            (Column::Category(f), true) => {
                let mut out = CategoryColumn::with_categories(f.labels.as_slice(), f.ordered);
                for part in parts {
                    if let Column::Category(p) = part {
                        (0..p.data.len()).for_each(|i| out.push_label(p.label(i)));
                    }
                }
                Column::Category(out)
            },
            (_, true) => {
                let mut out = first.clone();
                parts.iter().skip(1).for_each(|part| out.extend(part));
                out
            },
            (_, false) => {
                let mut data_type = first.data_type();
                parts.iter().for_each(|p| data_type = data_type.widen(p.data_type()));
                let values = parts.iter().flat_map(|p| p.values()).collect();
                Column::from_values_as(data_type, values)
            },
        }
    }
    // append rows from a column of the same non-category type
    fn extend(&mut self, other: &Column) {
        match (self, other) {
            (Column::Integer(a), Column::Integer(b))     => a.extend_from_slice(b),
            (Column::Numeric(a), Column::Numeric(b))     => a.extend_from_slice(b),
            (Column::Logical(a), Column::Logical(b))     => a.extend_from_slice(b),
            (Column::Timestamp(a), Column::Timestamp(b)) => a.extend_from_slice(b),
            (Column::Text(a), Column::Text(b))           => a.extend_from_slice(b),
            _ => {},
        }
    }
}

/* -----------------------------------------------------------------------------
typed access and conversions from Rust vectors
----------------------------------------------------------------------------- */
macro_rules! impl_typed_column {
    ($($variant:ident: $prim:ty),+ $(,)?) => { paste! { $(
        impl Column {
            #[doc = "Return the typed data of a " $variant " column, or None for other types."]
            pub fn [<as_ $variant:lower>](&self) -> Option<&[Option<$prim>]> {
                match self {
                    Column::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }
        impl From<Vec<$prim>> for Column {
            fn from(v: Vec<$prim>) -> Self {
                Column::$variant(v.into_iter().map(Some).collect())
            }
        }
        impl From<Vec<Option<$prim>>> for Column {
            fn from(v: Vec<Option<$prim>>) -> Self {
                Column::$variant(v)
            }
        }
    )+ } };
}
impl_typed_column!(
    Integer:   i64,
    Numeric:   f64,
    Logical:   bool,
    Timestamp: NaiveDateTime,
    Text:      String,
);
impl From<Vec<&str>> for Column {
    fn from(v: Vec<&str>) -> Self {
        Column::Text(v.into_iter().map(|s| Some(s.to_string())).collect())
    }
}
impl From<Vec<Option<&str>>> for Column {
    fn from(v: Vec<Option<&str>>) -> Self {
        Column::Text(v.into_iter().map(|s| s.map(str::to_string)).collect())
    }
}
impl From<Vec<Value>> for Column {
    fn from(v: Vec<Value>) -> Self {
        Column::from_values(v)
    }
}
impl From<CategoryColumn> for Column {
    fn from(f: CategoryColumn) -> Self {
        Column::Category(f)
    }
}
