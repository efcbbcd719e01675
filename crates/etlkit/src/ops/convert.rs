//! Column type conversion and value-cleaning helpers.
//!
//! Conversions run under a `CoercionPolicy`: `Permissive` turns values that
//! cannot be represented in the target type into missing, `Strict` fails
//! with a `Coercion` error naming the column and value. Missing values stay
//! missing for every target type.

// dependencies
use std::str::FromStr;
use chrono::{Datelike, Timelike};
use serde::{Deserialize, Serialize};
use crate::table::{CategoryColumn, Column, DataType, Table, Value};
use crate::error::{EtlError, Result};

/// How per-value conversion failures are handled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoercionPolicy {
    #[default]
    Permissive,
    Strict,
}
impl FromStr for CoercionPolicy {
    type Err = EtlError;
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "permissive" => Ok(CoercionPolicy::Permissive),
            "strict"     => Ok(CoercionPolicy::Strict),
            _ => Err(EtlError::Config(format!("unknown coercion policy '{s}', expected permissive or strict"))),
        }
    }
}

/* -----------------------------------------------------------------------------
single-value coercion
----------------------------------------------------------------------------- */
fn text_to_i64(s: &str) -> Option<i64> {
    let s = s.trim();
    s.parse::<i64>().ok().or_else(|| {
        s.parse::<f64>().ok().filter(|x| x.fract() == 0.0).and_then(f64_to_i64)
    })
}
fn f64_to_i64(x: f64) -> Option<i64> {
    if x.is_finite() && x >= i64::MIN as f64 && x < i64::MAX as f64 {
        Some(x.trunc() as i64)
    } else {
        None
    }
}

/// Coerce one value to a target type, returning None when it cannot be
/// represented. Missing always coerces to Missing. Category targets coerce
/// to their Text label.
pub fn coerce_value(value: &Value, target: DataType) -> Option<Value> {
    if value.is_missing() {
        return Some(Value::Missing);
    }
    let coerced = match (target, value) {
        (DataType::Integer, Value::Integer(x))   => Value::Integer(*x),
        (DataType::Integer, Value::Numeric(x))   => Value::Integer(f64_to_i64(*x)?),
        (DataType::Integer, Value::Logical(x))   => Value::Integer(*x as i64),
        (DataType::Integer, Value::Text(s))      => Value::Integer(text_to_i64(s)?),
        (DataType::Numeric, Value::Integer(x))   => Value::Numeric(*x as f64),
        (DataType::Numeric, Value::Numeric(x))   => Value::Numeric(*x),
        (DataType::Numeric, Value::Logical(x))   => Value::Numeric(if *x { 1.0 } else { 0.0 }),
        (DataType::Numeric, Value::Text(s))      => Value::Numeric(s.trim().parse::<f64>().ok()?),
        (DataType::Logical, Value::Logical(x))   => Value::Logical(*x),
        (DataType::Logical, Value::Text(s))      => Value::Logical(Value::parse_bool(s)?),
        (DataType::Logical, v) if v.is_numeric() => Value::Logical(v.as_f64()? != 0.0),
        (DataType::Timestamp, Value::Timestamp(x)) => Value::Timestamp(*x),
        (DataType::Timestamp, Value::Text(s))      => Value::Timestamp(Value::parse_timestamp(s)?),
        (DataType::Text | DataType::Category, v) => Value::Text(v.to_string()),
        _ => return None,
    };
    Some(coerced)
}

// coerce every value of a column, applying the policy to failures
fn coerce_column(col_name: &str, col: &Column, target: DataType, policy: CoercionPolicy) -> Result<Vec<Value>> {
    col.values().map(|value| {
        match (coerce_value(&value, target), policy) {
            (Some(coerced), _) => Ok(coerced),
            (None, CoercionPolicy::Permissive) => Ok(Value::Missing),
            (None, CoercionPolicy::Strict) => Err(EtlError::Coercion {
                column: col_name.to_string(),
                value:  value.to_string(),
                target: target.to_string(),
            }),
        }
    }).collect()
}

/* -----------------------------------------------------------------------------
table-level conversions
----------------------------------------------------------------------------- */
/// Convert one or more columns to a target type under a coercion policy.
pub fn convert_type<S: AsRef<str>>(
    table:    &Table,
    names:    &[S],
    target:   DataType,
    policy:   CoercionPolicy,
) -> Result<Table> {
    let mut converted = table.clone();
    for name in names {
        let name = name.as_ref();
        let col = table.column(name)?;
        if col.data_type() == target {
            continue;
        }
        let values = coerce_column(name, col, target, policy)?;
        converted.replace_or_add_col(name, Column::from_values_as(target, values))?;
    }
    Ok(converted)
}

/// Strip every character except digits, `.` and `-` from the listed
/// columns and parse the remainder as Numeric; unparsable values become
/// missing.
pub fn clean_numeric<S: AsRef<str>>(table: &Table, names: &[S]) -> Result<Table> {
    let mut cleaned = table.clone();
    for name in names {
        let name = name.as_ref();
        let data: Vec<Option<f64>> = table.column(name)?.values().map(|value| {
            match value {
                Value::Missing => None,
                v if v.is_numeric() => v.as_f64(),
                v => {
                    let digits: String = v.to_string().chars()
                        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
                        .collect();
                    digits.parse::<f64>().ok()
                },
            }
        }).collect();
        cleaned.replace_or_add_col(name, data)?;
    }
    Ok(cleaned)
}

/// Convert a column to an ordered category with the given category order;
/// values outside the list become missing.
pub fn to_ordered_category<S: AsRef<str>>(table: &Table, name: &str, categories: &[S]) -> Result<Table> {
    let mut col = CategoryColumn::with_categories(categories, true);
    for value in table.column(name)?.values() {
        col.push_known(value.to_text().as_deref());
    }
    let mut converted = table.clone();
    converted.replace_or_add_col(name, col)?;
    Ok(converted)
}

/// Calendar and clock components that can be extracted from timestamps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DateComponent {
    Year,
    Month,
    Day,
    Weekday, // 0 = Monday
    Hour,
    Minute,
}
impl DateComponent {
    pub const ALL: [DateComponent; 6] = [
        DateComponent::Year,
        DateComponent::Month,
        DateComponent::Day,
        DateComponent::Weekday,
        DateComponent::Hour,
        DateComponent::Minute,
    ];
    pub fn suffix(&self) -> &'static str {
        match self {
            DateComponent::Year    => "year",
            DateComponent::Month   => "month",
            DateComponent::Day     => "day",
            DateComponent::Weekday => "weekday",
            DateComponent::Hour    => "hour",
            DateComponent::Minute  => "minute",
        }
    }
}

/// Add one Integer column `<name>_<component>` per requested component.
/// Text values are parsed as timestamps first; unparsable values yield
/// missing components.
pub fn extract_date_components(table: &Table, name: &str, components: &[DateComponent]) -> Result<Table> {
    let timestamps: Vec<_> = table.column(name)?.values()
        .map(|value| coerce_value(&value, DataType::Timestamp).and_then(|v| v.as_timestamp()))
        .collect();
    let mut extended = table.clone();
    for component in components {
        let data: Vec<Option<i64>> = timestamps.iter().map(|ts| ts.map(|ts| match component {
            DateComponent::Year    => ts.year() as i64,
            DateComponent::Month   => ts.month() as i64,
            DateComponent::Day     => ts.day() as i64,
            DateComponent::Weekday => ts.weekday().num_days_from_monday() as i64,
            DateComponent::Hour    => ts.hour() as i64,
            DateComponent::Minute  => ts.minute() as i64,
        })).collect();
        extended.replace_or_add_col(format!("{name}_{}", component.suffix()), data)?;
    }
    Ok(extended)
}

/// Convert boolean columns to Integer 1/0; values that are not boolean
/// become missing.
pub fn boolean_to_binary<S: AsRef<str>>(table: &Table, names: &[S]) -> Result<Table> {
    let mut converted = table.clone();
    for name in names {
        let name = name.as_ref();
        let data: Vec<Option<i64>> = table.column(name)?.values()
            .map(|value| {
                coerce_value(&value, DataType::Logical)
                    .and_then(|v| v.as_bool())
                    .map(i64::from)
            })
            .collect();
        converted.replace_or_add_col(name, data)?;
    }
    Ok(converted)
}
