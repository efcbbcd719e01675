//! `Value` is a single table cell, the unit handed to row and value functions.
//!
//! Missing is a first-class marker, distinct from zero and the empty string.
//! It propagates through arithmetic (any missing operand yields missing) and
//! through comparisons, which return `None` ("unknown") instead of a bool.

// dependencies
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::ops::{Add, Div, Mul, Sub};
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};
use super::DataType;

pub const NA: &str = "NA";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// accepted text representations of timestamps, tried in order
const DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d/%m/%Y"];

/// A single cell value of one of the supported logical types, or Missing.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Missing,
    Integer(i64),
    Numeric(f64),
    Logical(bool),
    Timestamp(NaiveDateTime),
    Text(String),
}

impl Value {
    /* -----------------------------------------------------------------------------
    type inspection
    ----------------------------------------------------------------------------- */
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }
    /// Return the logical type of a non-missing value.
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Value::Missing      => None,
            Value::Integer(_)   => Some(DataType::Integer),
            Value::Numeric(_)   => Some(DataType::Numeric),
            Value::Logical(_)   => Some(DataType::Logical),
            Value::Timestamp(_) => Some(DataType::Timestamp),
            Value::Text(_)      => Some(DataType::Text),
        }
    }
    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Integer(_) | Value::Numeric(_))
    }
    /// Return the value as f64 if it is Integer or Numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(x) => Some(*x as f64),
            Value::Numeric(x) => Some(*x),
            _ => None,
        }
    }
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(x) => Some(*x),
            _ => None,
        }
    }
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Logical(x) => Some(*x),
            _ => None,
        }
    }
    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            Value::Timestamp(x) => Some(*x),
            _ => None,
        }
    }
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(x) => Some(x.as_str()),
            _ => None,
        }
    }
    /// Coerce a non-missing value to its text representation; missing stays None.
    pub fn to_text(&self) -> Option<String> {
        if self.is_missing() { None } else { Some(self.to_string()) }
    }

    /* -----------------------------------------------------------------------------
    three-valued comparisons
    ----------------------------------------------------------------------------- */
    /// Compare two values, returning None when either is missing or the
    /// types are not comparable. Integer and Numeric compare numerically.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Missing, _) | (_, Value::Missing) => None,
            (Value::Integer(a), Value::Integer(b))     => Some(a.cmp(b)),
            (Value::Logical(a), Value::Logical(b))     => Some(a.cmp(b)),
            (Value::Timestamp(a), Value::Timestamp(b)) => Some(a.cmp(b)),
            (Value::Text(a), Value::Text(b))           => Some(a.cmp(b)),
            (a, b) => match (a.as_f64(), b.as_f64()) {
                (Some(a), Some(b)) => a.partial_cmp(&b),
                _ => None,
            },
        }
    }
    /// Test equality, returning None when either value is missing.
    /// Values of incomparable types are unequal rather than unknown.
    pub fn equals(&self, other: &Value) -> Option<bool> {
        if self.is_missing() || other.is_missing() {
            return None;
        }
        Some(self.compare(other) == Some(Ordering::Equal))
    }
    /// Total order over non-missing values used for sorting; values of
    /// different kinds order by kind rank after numbers. NaN sorts after
    /// every other number.
    pub(crate) fn sort_cmp(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Numeric(_), Value::Numeric(_) | Value::Integer(_)) |
            (Value::Integer(_), Value::Numeric(_)) => match (self.as_f64(), other.as_f64()) {
                (Some(a), Some(b)) => a.total_cmp(&b),
                _ => self.kind_rank().cmp(&other.kind_rank()),
            },
            _ => self.compare(other).unwrap_or_else(|| self.kind_rank().cmp(&other.kind_rank())),
        }
    }
    fn kind_rank(&self) -> u8 {
        match self {
            Value::Integer(_) | Value::Numeric(_) => 0,
            Value::Logical(_)   => 1,
            Value::Timestamp(_) => 2,
            Value::Text(_)      => 3,
            Value::Missing      => 4,
        }
    }

    /* -----------------------------------------------------------------------------
    parsing helpers shared by CSV inference and type conversion
    ----------------------------------------------------------------------------- */
    /// Parse a timestamp from any of the accepted date or date-time formats.
    pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
        let s = s.trim();
        DATETIME_FORMATS.iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
            .or_else(|| {
                DATE_FORMATS.iter()
                    .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            })
    }
    /// Parse a boolean from common text spellings.
    pub fn parse_bool(s: &str) -> Option<bool> {
        match s.trim().to_ascii_lowercase().as_str() {
            "true" | "t" | "yes" | "1"  => Some(true),
            "false" | "f" | "no" | "0" => Some(false),
            _ => None,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            Value::Missing      => write!(f, "{NA}"),
            Value::Integer(x)   => write!(f, "{x}"),
            Value::Numeric(x)   => write!(f, "{x}"),
            Value::Logical(x)   => write!(f, "{x}"),
            Value::Timestamp(x) => write!(f, "{}", x.format(TIMESTAMP_FORMAT)),
            Value::Text(x)      => write!(f, "{x}"),
        }
    }
}

/* -----------------------------------------------------------------------------
conversions into Value
----------------------------------------------------------------------------- */
macro_rules! impl_value_from {
    ($($prim:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$prim> for Value {
                fn from(x: $prim) -> Self { Value::$variant(x.into()) }
            }
        )+
    };
}
impl_value_from!(
    i64 => Integer,
    i32 => Integer,
    f64 => Numeric,
    bool => Logical,
    NaiveDateTime => Timestamp,
    String => Text,
    &str => Text,
);
impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(x: Option<T>) -> Self {
        x.map_or(Value::Missing, Into::into)
    }
}

/* -----------------------------------------------------------------------------
missing-propagating arithmetic
----------------------------------------------------------------------------- */
// seconds as a chrono TimeDelta, keeping millisecond precision
fn seconds_delta(secs: f64) -> Option<TimeDelta> {
    TimeDelta::try_milliseconds((secs * 1000.0).round() as i64)
}

impl Add for &Value {
    type Output = Value;
    fn add(self, rhs: &Value) -> Value {
        match (self, rhs) {
            (Value::Integer(a), Value::Integer(b)) => a.checked_add(*b)
                .map_or(Value::Numeric(*a as f64 + *b as f64), Value::Integer),
            (Value::Text(a), Value::Text(b)) => Value::Text(format!("{a}{b}")),
            (Value::Timestamp(t), n) | (n, Value::Timestamp(t)) => n.as_f64()
                .and_then(seconds_delta)
                .and_then(|d| t.checked_add_signed(d))
                .map_or(Value::Missing, Value::Timestamp),
            (a, b) => match (a.as_f64(), b.as_f64()) {
                (Some(a), Some(b)) => Value::Numeric(a + b),
                _ => Value::Missing,
            },
        }
    }
}
impl Sub for &Value {
    type Output = Value;
    fn sub(self, rhs: &Value) -> Value {
        match (self, rhs) {
            (Value::Integer(a), Value::Integer(b)) => a.checked_sub(*b)
                .map_or(Value::Numeric(*a as f64 - *b as f64), Value::Integer),
            // elapsed time between timestamps, in seconds
            (Value::Timestamp(a), Value::Timestamp(b)) => {
                Value::Numeric((*a - *b).num_milliseconds() as f64 / 1000.0)
            },
            (Value::Timestamp(t), n) => n.as_f64()
                .and_then(seconds_delta)
                .and_then(|d| t.checked_sub_signed(d))
                .map_or(Value::Missing, Value::Timestamp),
            (a, b) => match (a.as_f64(), b.as_f64()) {
                (Some(a), Some(b)) => Value::Numeric(a - b),
                _ => Value::Missing,
            },
        }
    }
}
impl Mul for &Value {
    type Output = Value;
    fn mul(self, rhs: &Value) -> Value {
        match (self, rhs) {
            (Value::Integer(a), Value::Integer(b)) => a.checked_mul(*b)
                .map_or(Value::Numeric(*a as f64 * *b as f64), Value::Integer),
            (a, b) => match (a.as_f64(), b.as_f64()) {
                (Some(a), Some(b)) => Value::Numeric(a * b),
                _ => Value::Missing,
            },
        }
    }
}
impl Div for &Value {
    type Output = Value;
    fn div(self, rhs: &Value) -> Value {
        match (self.as_f64(), rhs.as_f64()) {
            (Some(_), Some(b)) if b == 0.0 => Value::Missing,
            (Some(a), Some(b)) => Value::Numeric(a / b),
            _ => Value::Missing,
        }
    }
}
macro_rules! forward_owned_op {
    ($($trait:ident, $method:ident);+ $(;)?) => {
        $(
            impl $trait for Value {
                type Output = Value;
                fn $method(self, rhs: Value) -> Value { (&self).$method(&rhs) }
            }
        )+
    };
}
forward_owned_op!(Add, add; Sub, sub; Mul, mul; Div, div);
