//! The closed set of values a Bag node can hold.
//!
//! [`Value`] is a sum type over exactly ten kinds: string, integer, float,
//! decimal, boolean, null, date, time, datetime and nested [`Bag`]. Kinds are
//! never coerced into each other: `Integer(1)`, `Float(1.0)` and
//! `Decimal(1)` are three different values.
//!
//! Datetimes are either *naive* (no UTC offset) or *aware* (fixed offset),
//! see [`DateTimeValue`].
//!
//! ```rust
//! use tytx_bag::{Decimal, Kind, Value};
//! use chrono::NaiveDate;
//!
//! let price = Value::from("99.99".parse::<Decimal>().unwrap());
//! assert_eq!(price.kind(), Kind::Decimal);
//!
//! let day = Value::from(NaiveDate::from_ymd_opt(2025, 6, 15).unwrap());
//! assert!(day.is_scalar());
//! assert_eq!(Value::from(42).as_i64(), Some(42));
//! ```

use crate::{Bag, Decimal};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use std::fmt;

/// The kind of a [`Value`], independent of its payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    String,
    Integer,
    Float,
    Decimal,
    Boolean,
    Null,
    Date,
    Time,
    DateTime,
    Bag,
}

impl Kind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Kind::String => "string",
            Kind::Integer => "integer",
            Kind::Float => "float",
            Kind::Decimal => "decimal",
            Kind::Boolean => "boolean",
            Kind::Null => "null",
            Kind::Date => "date",
            Kind::Time => "time",
            Kind::DateTime => "datetime",
            Kind::Bag => "bag",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A calendar date plus time of day, with or without a UTC offset.
///
/// # Examples
///
/// ```rust
/// use tytx_bag::DateTimeValue;
/// use chrono::NaiveDate;
///
/// let naive = NaiveDate::from_ymd_opt(2025, 6, 15)
///     .unwrap()
///     .and_hms_opt(14, 30, 45)
///     .unwrap();
/// let value = DateTimeValue::Naive(naive);
/// assert!(value.is_naive());
/// assert_eq!(value.to_utc_aware().offset_seconds(), Some(0));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DateTimeValue {
    Naive(NaiveDateTime),
    Aware(DateTime<FixedOffset>),
}

impl DateTimeValue {
    #[inline]
    #[must_use]
    pub const fn is_naive(&self) -> bool {
        matches!(self, DateTimeValue::Naive(_))
    }

    /// Calendar/time fields as written, ignoring any offset.
    #[must_use]
    pub fn local_fields(&self) -> NaiveDateTime {
        match self {
            DateTimeValue::Naive(dt) => *dt,
            DateTimeValue::Aware(dt) => dt.naive_local(),
        }
    }

    /// Offset from UTC in seconds, `None` for naive values.
    #[must_use]
    pub fn offset_seconds(&self) -> Option<i32> {
        match self {
            DateTimeValue::Naive(_) => None,
            DateTimeValue::Aware(dt) => Some(dt.offset().local_minus_utc()),
        }
    }

    /// Interprets a naive value as UTC; aware values are returned unchanged.
    #[must_use]
    pub fn to_utc_aware(&self) -> DateTimeValue {
        match self {
            DateTimeValue::Naive(dt) => {
                DateTimeValue::Aware(DateTime::<Utc>::from_naive_utc_and_offset(*dt, Utc).fixed_offset())
            }
            aware => *aware,
        }
    }
}

impl fmt::Display for DateTimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateTimeValue::Naive(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.f")),
            DateTimeValue::Aware(dt) => write!(f, "{}", dt.to_rfc3339()),
        }
    }
}

/// Any value storable in a Bag node.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    String(String),
    Integer(i64),
    Float(f64),
    Decimal(Decimal),
    Boolean(bool),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(DateTimeValue),
    Bag(Bag),
}

impl Value {
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Value::Null => Kind::Null,
            Value::String(_) => Kind::String,
            Value::Integer(_) => Kind::Integer,
            Value::Float(_) => Kind::Float,
            Value::Decimal(_) => Kind::Decimal,
            Value::Boolean(_) => Kind::Boolean,
            Value::Date(_) => Kind::Date,
            Value::Time(_) => Kind::Time,
            Value::DateTime(_) => Kind::DateTime,
            Value::Bag(_) => Kind::Bag,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[inline]
    #[must_use]
    pub const fn is_bag(&self) -> bool {
        matches!(self, Value::Bag(_))
    }

    /// Every kind except [`Kind::Bag`] is a scalar and may be used as an attribute.
    #[inline]
    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        !self.is_bag()
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_decimal(&self) -> Option<&Decimal> {
        match self {
            Value::Decimal(d) => Some(d),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_time(&self) -> Option<NaiveTime> {
        match self {
            Value::Time(t) => Some(*t),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_datetime(&self) -> Option<&DateTimeValue> {
        match self {
            Value::DateTime(dt) => Some(dt),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_bag(&self) -> Option<&Bag> {
        match self {
            Value::Bag(bag) => Some(bag),
            _ => None,
        }
    }

    #[inline]
    pub fn as_bag_mut(&mut self) -> Option<&mut Bag> {
        match self {
            Value::Bag(bag) => Some(bag),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::String(s) => write!(f, "{}", s),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(fl) => write!(f, "{}", fl),
            Value::Decimal(d) => write!(f, "{}", d),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::Time(t) => write!(f, "{}", t.format("%H:%M:%S%.f")),
            Value::DateTime(dt) => write!(f, "{}", dt),
            Value::Bag(bag) => write!(f, "Bag[{}]", bag.len()),
        }
    }
}

// TryFrom implementations for extracting payloads from Value
impl TryFrom<Value> for i64 {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Integer(i) => Ok(i),
            other => Err(crate::Error::unsupported_kind(
                other.kind().as_str(),
                "where an integer was expected",
            )),
        }
    }
}

impl TryFrom<Value> for String {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(crate::Error::unsupported_kind(
                other.kind().as_str(),
                "where a string was expected",
            )),
        }
    }
}

impl TryFrom<Value> for Bag {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Bag(bag) => Ok(bag),
            other => Err(crate::Error::unsupported_kind(
                other.kind().as_str(),
                "where a bag was expected",
            )),
        }
    }
}

// From implementations for building values from Rust primitives
impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value as i64)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Integer(value as i64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<Decimal> for Value {
    fn from(value: Decimal) -> Self {
        Value::Decimal(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Value::Date(value)
    }
}

impl From<NaiveTime> for Value {
    fn from(value: NaiveTime) -> Self {
        Value::Time(value)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Value::DateTime(DateTimeValue::Naive(value))
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Value::DateTime(DateTimeValue::Aware(value))
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::DateTime(DateTimeValue::Aware(value.fixed_offset()))
    }
}

impl From<DateTimeValue> for Value {
    fn from(value: DateTimeValue) -> Self {
        Value::DateTime(value)
    }
}

impl From<Bag> for Value {
    fn from(value: Bag) -> Self {
        Value::Bag(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}
