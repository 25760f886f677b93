//! TyTx encoding.
//!
//! This module provides the [`Encoder`] that turns a [`Bag`] into a TyTx
//! document in either transport and either density.
//!
//! ## Overview
//!
//! Encoding happens in two steps:
//!
//! 1. The Bag is walked depth-first (node, then its children) and every node
//!    becomes one row of a transport-neutral [`WireValue`] document.
//! 2. The document is written as compact JSON (text transport, followed by
//!    the `::JS` marker) or as MessagePack (binary transport).
//!
//! Scalars the transports cannot carry natively (decimal, date, time,
//! datetime) are written as `"payload::TAG"` strings in both transports.
//!
//! ## Usage
//!
//! ```rust
//! use tytx_bag::{Bag, Decimal, Encoder, TytxOptions};
//!
//! let mut bag = Bag::new();
//! bag.set("order.total", "99.50".parse::<Decimal>().unwrap()).unwrap();
//!
//! let text = Encoder::new(TytxOptions::new()).encode_text(&bag).unwrap();
//! assert_eq!(
//!     text,
//!     r#"{"rows":[["","order","X","::X",{}],["order","total","N","99.50::N",{}]]}::JS"#
//! );
//!
//! let compact = Encoder::new(TytxOptions::compact()).encode_text(&bag).unwrap();
//! assert_eq!(
//!     compact,
//!     r#"{"rows":[[null,"order","::X"],[0,"total","99.50::N"]],"paths":{"0":"order"}}::JS"#
//! );
//! ```

use crate::registry::{tagged, TypeTag, TAG_SEPARATOR, TEXT_MARKER};
use crate::wire::{WireMap, WireValue};
use crate::{msgpack, AttrMap, Bag, DateTimeValue, Density, Error, Result, Transport, TytxOptions, Value};
use chrono::{Datelike, SecondsFormat};
use tracing::debug;

/// The TyTx encoder.
///
/// Created via [`Encoder::new`]; stateless apart from its options, so one
/// encoder can be reused for any number of Bags.
#[derive(Clone, Debug, Default)]
pub struct Encoder {
    options: TytxOptions,
}

impl Encoder {
    pub fn new(options: TytxOptions) -> Self {
        Encoder { options }
    }

    #[must_use]
    pub fn options(&self) -> &TytxOptions {
        &self.options
    }

    /// Encodes `bag` in the configured transport and density.
    ///
    /// Text output is returned as its UTF-8 bytes.
    pub fn encode(&self, bag: &Bag) -> Result<Vec<u8>> {
        match self.options.transport {
            Transport::Text => self.encode_text(bag).map(String::into_bytes),
            Transport::Binary => {
                let doc = self.document(bag)?;
                let bytes = msgpack::to_vec(&doc)?;
                debug!(
                    transport = "binary",
                    density = %self.options.density,
                    bytes = bytes.len(),
                    "encoded bag"
                );
                Ok(bytes)
            }
        }
    }

    /// Encodes `bag` as text transport, whatever transport is configured.
    pub fn encode_text(&self, bag: &Bag) -> Result<String> {
        let doc = self.document(bag)?;
        let mut text = serde_json::to_string(&doc).map_err(|e| Error::malformed(e.to_string()))?;
        if self.options.marker {
            text.push_str(TEXT_MARKER);
        }
        debug!(
            transport = "text",
            density = %self.options.density,
            bytes = text.len(),
            "encoded bag"
        );
        Ok(text)
    }

    /// Builds the transport-neutral document for `bag`.
    pub fn document(&self, bag: &Bag) -> Result<WireValue> {
        let mut doc = WireMap::new();
        match self.options.density {
            Density::Expanded => {
                let mut rows = Vec::with_capacity(bag.len());
                expanded_rows(bag, "", &mut rows)?;
                debug!(rows = rows.len(), "flattened bag into expanded rows");
                doc.insert("rows".to_string(), WireValue::Array(rows));
            }
            Density::Compact => {
                let mut flattener = CompactFlattener::default();
                flattener.flatten(bag, None, "")?;
                debug!(
                    rows = flattener.rows.len(),
                    paths = flattener.paths.len(),
                    "flattened bag into compact rows"
                );
                doc.insert("rows".to_string(), WireValue::Array(flattener.rows));
                doc.insert("paths".to_string(), WireValue::Map(flattener.paths));
            }
        }
        Ok(WireValue::Map(doc))
    }
}

fn join_path(parent: &str, label: &str) -> String {
    if parent.is_empty() {
        label.to_string()
    } else {
        format!("{}.{}", parent, label)
    }
}

/// `[parent_path, label, tag, value, attrs]` for every node.
fn expanded_rows(bag: &Bag, parent: &str, rows: &mut Vec<WireValue>) -> Result<()> {
    for node in bag {
        let path = join_path(parent, node.label());
        let context = || path.clone();
        rows.push(WireValue::Array(vec![
            WireValue::from(parent),
            WireValue::from(node.label()),
            WireValue::from(TypeTag::of(node.value()).code()),
            encode_value(node.value(), &context)?,
            encode_attrs(node.attrs(), &context)?,
        ]));
        if let Value::Bag(child) = node.value() {
            expanded_rows(child, &path, rows)?;
        }
    }
    Ok(())
}

/// Assigns path codes to Bag-valued nodes in walk order.
#[derive(Default)]
struct CompactFlattener {
    rows: Vec<WireValue>,
    paths: WireMap,
}

impl CompactFlattener {
    fn flatten(&mut self, bag: &Bag, parent_code: Option<i64>, parent: &str) -> Result<()> {
        for node in bag {
            let path = join_path(parent, node.label());
            let context = || path.clone();
            let mut row = vec![
                parent_code.map_or(WireValue::Null, WireValue::Int),
                WireValue::from(node.label()),
                encode_value(node.value(), &context)?,
            ];
            if !node.attrs().is_empty() {
                row.push(encode_attrs(node.attrs(), &context)?);
            }
            self.rows.push(WireValue::Array(row));
            if let Value::Bag(child) = node.value() {
                let code = self.paths.len() as i64;
                self.paths.insert(code.to_string(), WireValue::from(path.as_str()));
                self.flatten(child, Some(code), &path)?;
            }
        }
        Ok(())
    }
}

fn encode_attrs(attrs: &AttrMap, context: &dyn Fn() -> String) -> Result<WireValue> {
    let mut out = WireMap::with_capacity(attrs.len());
    for (key, value) in attrs {
        if value.is_bag() {
            return Err(Error::unsupported_kind(
                value.kind().as_str(),
                &format!("as attribute '{}' of '{}'", key, context()),
            ));
        }
        let attr_context = || format!("attribute '{}' of '{}'", key, context());
        out.insert(key.clone(), encode_value(value, &attr_context)?);
    }
    Ok(WireValue::Map(out))
}

/// Wire form of a single value; nested Bags become the `::X` marker.
///
/// # Errors
///
/// [`Error::UnsupportedValueKind`] for dates outside years 0000 to 9999 and
/// for aware datetimes whose offset is not a whole number of minutes, since
/// the ISO 8601 payloads cannot carry them.
pub(crate) fn encode_value(value: &Value, context: &dyn Fn() -> String) -> Result<WireValue> {
    let wire = match value {
        Value::Null => WireValue::Null,
        Value::Boolean(b) => WireValue::Bool(*b),
        Value::Integer(i) => WireValue::Int(*i),
        Value::Float(f) => encode_float(*f),
        Value::String(s) => {
            if s.contains(TAG_SEPARATOR) {
                WireValue::Str(tagged(s, TypeTag::Text))
            } else {
                WireValue::Str(s.clone())
            }
        }
        Value::Decimal(d) => WireValue::Str(tagged(&d.to_string(), TypeTag::Decimal)),
        Value::Date(d) => {
            check_year(d.year(), value, context)?;
            WireValue::Str(tagged(&d.format("%Y-%m-%d").to_string(), TypeTag::Date))
        }
        Value::Time(t) => WireValue::Str(tagged(&t.format("%H:%M:%S%.f").to_string(), TypeTag::Time)),
        Value::DateTime(DateTimeValue::Naive(dt)) => {
            check_year(dt.year(), value, context)?;
            WireValue::Str(tagged(
                &dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string(),
                TypeTag::DateTimeNaive,
            ))
        }
        Value::DateTime(DateTimeValue::Aware(dt)) => {
            check_year(dt.year(), value, context)?;
            let offset = dt.offset().local_minus_utc();
            if offset % 60 != 0 {
                return Err(Error::unsupported_kind(
                    value.kind().as_str(),
                    &format!(
                        "at '{}': UTC offset of {} seconds is not a whole number of minutes",
                        context(),
                        offset
                    ),
                ));
            }
            WireValue::Str(tagged(
                &dt.to_rfc3339_opts(SecondsFormat::AutoSi, true),
                TypeTag::DateTimeAware,
            ))
        }
        Value::Bag(_) => WireValue::Str(tagged("", TypeTag::Bag)),
    };
    Ok(wire)
}

fn check_year(year: i32, value: &Value, context: &dyn Fn() -> String) -> Result<()> {
    if (0..=9999).contains(&year) {
        Ok(())
    } else {
        Err(Error::unsupported_kind(
            value.kind().as_str(),
            &format!("at '{}': year {} is outside 0000 to 9999", context(), year),
        ))
    }
}

fn encode_float(f: f64) -> WireValue {
    if f.is_nan() {
        WireValue::Str(tagged("NaN", TypeTag::Real))
    } else if f.is_infinite() {
        let payload = if f > 0.0 { "Infinity" } else { "-Infinity" };
        WireValue::Str(tagged(payload, TypeTag::Real))
    } else {
        WireValue::Float(f)
    }
}
