//! TyTx decoding.
//!
//! This module provides the [`Decoder`] that rebuilds a [`Bag`] from a TyTx
//! document. The caller names the transport; the density is detected from
//! the document itself (compact documents carry a `paths` table).
//!
//! ## Normalisation
//!
//! - Naive datetimes (`::DH`, or `::DHZ` without an offset) decode as aware
//!   datetimes at UTC.
//! - Decimals are parsed from their digit string; no float is involved.
//! - Null may arrive as a native null or as `::NN`.
//!
//! ## Failure
//!
//! Decoding is all-or-nothing. The Bag is built privately and returned only
//! once every row has been accepted.
//!
//! ```rust
//! use tytx_bag::{Decoder, Density, Transport, Value};
//!
//! let text = r#"{"rows":[[null,"total","99.50::N"]],"paths":{}}::JS"#;
//! let (bag, density) = Decoder::new(Transport::Text)
//!     .decode_with_density(text.as_bytes())
//!     .unwrap();
//!
//! assert_eq!(density, Density::Compact);
//! assert_eq!(bag.get("total").unwrap().to_string(), "99.50");
//! ```

use crate::registry::{split_tagged, TypeTag, TEXT_MARKER};
use crate::wire::{WireMap, WireValue};
use crate::{msgpack, AttrMap, Bag, DateTimeValue, Decimal, Density, Error, Node, Result, Transport, Value};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use tracing::{debug, trace};

/// The TyTx decoder.
#[derive(Clone, Copy, Debug, Default)]
pub struct Decoder {
    transport: Transport,
}

impl Decoder {
    pub fn new(transport: Transport) -> Self {
        Decoder { transport }
    }

    #[must_use]
    pub fn transport(&self) -> Transport {
        self.transport
    }

    /// Decodes a document into a Bag.
    pub fn decode(&self, data: &[u8]) -> Result<Bag> {
        self.decode_with_density(data).map(|(bag, _)| bag)
    }

    /// Decodes a document and reports which density it used.
    pub fn decode_with_density(&self, data: &[u8]) -> Result<(Bag, Density)> {
        let doc = self.parse(data)?;
        let (bag, density) = document_to_bag(&doc)?;
        debug!(
            transport = %self.transport,
            density = %density,
            nodes = bag.len(),
            "decoded bag"
        );
        Ok((bag, density))
    }

    /// Parses the transport layer into a document tree.
    pub fn parse(&self, data: &[u8]) -> Result<WireValue> {
        match self.transport {
            Transport::Text => parse_text(data),
            Transport::Binary => parse_binary(data),
        }
    }
}

fn parse_text(data: &[u8]) -> Result<WireValue> {
    let text = std::str::from_utf8(data)
        .map_err(|e| Error::transport_mismatch("text", format!("input is not UTF-8 text ({})", e)))?;
    let trimmed = text.trim();
    let body = trimmed.strip_suffix(TEXT_MARKER).unwrap_or(trimmed).trim_end();
    if body.is_empty() {
        return Err(Error::malformed("empty document"));
    }
    if !body.starts_with('{') {
        return Err(Error::transport_mismatch(
            "text",
            "document does not start with '{'",
        ));
    }
    serde_json::from_str(body).map_err(|e| Error::malformed(format!("invalid JSON: {}", e)))
}

fn parse_binary(data: &[u8]) -> Result<WireValue> {
    let first = data.iter().find(|b| !b.is_ascii_whitespace());
    if first == Some(&b'{') {
        return Err(Error::transport_mismatch("binary", "input is JSON text"));
    }
    msgpack::from_slice(data)
}

/// Rebuilds a Bag from a parsed document.
pub fn document_to_bag(doc: &WireValue) -> Result<(Bag, Density)> {
    let map = doc.as_map().ok_or_else(|| {
        Error::malformed(format!("top-level item is {}, expected a map", doc.type_name()))
    })?;
    let rows = match map.get("rows") {
        Some(WireValue::Array(rows)) => rows,
        Some(other) => {
            return Err(Error::malformed(format!(
                "'rows' is {}, expected an array",
                other.type_name()
            )))
        }
        None => return Err(Error::malformed("missing 'rows' array")),
    };

    let mut bag = Bag::new();
    let density = match map.get("paths") {
        None => {
            for (index, row) in rows.iter().enumerate() {
                decode_expanded_row(&mut bag, index, row)?;
            }
            Density::Expanded
        }
        Some(WireValue::Map(paths)) => {
            for (index, row) in rows.iter().enumerate() {
                decode_compact_row(&mut bag, paths, index, row)?;
            }
            Density::Compact
        }
        Some(other) => {
            return Err(Error::malformed(format!(
                "'paths' is {}, expected a map",
                other.type_name()
            )))
        }
    };
    Ok((bag, density))
}

fn row_cells<'a>(row: &'a WireValue, index: usize, lengths: &[usize]) -> Result<&'a [WireValue]> {
    let cells = row.as_array().ok_or_else(|| {
        Error::malformed_at(format!("row is {}, expected an array", row.type_name()), index, None)
    })?;
    if !lengths.contains(&cells.len()) {
        return Err(Error::malformed_at(
            format!("row has {} columns, expected one of {:?}", cells.len(), lengths),
            index,
            None,
        ));
    }
    Ok(cells)
}

fn row_label(cell: &WireValue, index: usize) -> Result<&str> {
    let label = cell
        .as_str()
        .ok_or_else(|| Error::malformed_at(format!("label is {}", cell.type_name()), index, None))?;
    if label.is_empty() || label.contains('.') || label.starts_with('#') {
        return Err(Error::malformed_at(
            format!("'{}' is not a valid label", label),
            index,
            None,
        ));
    }
    Ok(label)
}

/// `[parent_path, label, tag, value(, attrs)]`
fn decode_expanded_row(bag: &mut Bag, index: usize, row: &WireValue) -> Result<()> {
    let cells = row_cells(row, index, &[4, 5])?;
    let label = row_label(&cells[1], index)?;
    let parent = cells[0].as_str().ok_or_else(|| {
        Error::malformed_at(
            format!("parent path is {}, expected a string", cells[0].type_name()),
            index,
            Some(label),
        )
    })?;
    let node = build_node(label, Some(&cells[2]), &cells[3], cells.get(4)).map_err(|e| e.in_row(index, label))?;
    let target = resolve_parent(bag, parent).map_err(|e| e.in_row(index, label))?;
    trace!(row = index, parent, label, kind = %node.value().kind(), "decoded row");
    target.push_node(node).map_err(|e| e.in_row(index, label))?;
    Ok(())
}

/// `[parent_code, label, value(, attrs)]`, or the five-column expanded layout
/// with a code in place of the parent path.
fn decode_compact_row(bag: &mut Bag, paths: &WireMap, index: usize, row: &WireValue) -> Result<()> {
    let cells = row_cells(row, index, &[3, 4, 5])?;
    let label = row_label(&cells[1], index)?;
    let (tag, value, attrs) = if cells.len() == 5 {
        (Some(&cells[2]), &cells[3], cells.get(4))
    } else {
        (None, &cells[2], cells.get(3))
    };
    let parent = match &cells[0] {
        WireValue::Null => "",
        WireValue::Int(code) => paths
            .get(&code.to_string())
            .and_then(WireValue::as_str)
            .ok_or_else(|| Error::malformed_at(format!("unknown parent code {}", code), index, Some(label)))?,
        other => {
            return Err(Error::malformed_at(
                format!("parent code is {}, expected an integer or null", other.type_name()),
                index,
                Some(label),
            ))
        }
    };
    let node = build_node(label, tag, value, attrs).map_err(|e| e.in_row(index, label))?;
    let target = resolve_parent(bag, parent).map_err(|e| e.in_row(index, label))?;
    trace!(row = index, parent, label, kind = %node.value().kind(), "decoded row");
    target.push_node(node).map_err(|e| e.in_row(index, label))?;
    Ok(())
}

fn resolve_parent<'a>(bag: &'a mut Bag, parent: &str) -> Result<&'a mut Bag> {
    if parent.is_empty() {
        return Ok(bag);
    }
    bag.get_node_mut(parent)
        .ok_or_else(|| Error::malformed(format!("parent '{}' has not been defined", parent)))?
        .value_mut()
        .as_bag_mut()
        .ok_or_else(|| Error::malformed(format!("parent '{}' is not a Bag", parent)))
}

fn build_node(label: &str, tag: Option<&WireValue>, value: &WireValue, attrs: Option<&WireValue>) -> Result<Node> {
    let value = decode_value(value)?;
    if let Some(tag) = tag {
        check_tag_column(tag, &value)?;
    }
    Ok(Node::with_attrs(label, value, decode_attrs(attrs)?))
}

fn check_tag_column(tag: &WireValue, value: &Value) -> Result<()> {
    let code = match tag {
        WireValue::Null => return Ok(()),
        WireValue::Str(code) => code,
        other => return Err(Error::malformed(format!("tag column is {}", other.type_name()))),
    };
    let tag = TypeTag::from_code(code).ok_or_else(|| Error::unknown_tag(code, None))?;
    if tag.kind() != value.kind() {
        return Err(Error::malformed(format!(
            "tag '{}' does not match a {} value",
            tag,
            value.kind()
        )));
    }
    Ok(())
}

fn decode_attrs(attrs: Option<&WireValue>) -> Result<AttrMap> {
    let mut out = AttrMap::new();
    let map = match attrs {
        None | Some(WireValue::Null) => return Ok(out),
        Some(WireValue::Map(map)) => map,
        Some(other) => {
            return Err(Error::malformed(format!(
                "attributes are {}, expected a map",
                other.type_name()
            )))
        }
    };
    for (key, raw) in map {
        let value = decode_value(raw)?;
        if value.is_bag() {
            return Err(Error::malformed(format!("attribute '{}' holds a Bag marker", key)));
        }
        out.insert(key.as_str(), value)?;
    }
    Ok(out)
}

/// Value of a wire primitive; the `::X` marker yields an empty Bag.
pub(crate) fn decode_value(raw: &WireValue) -> Result<Value> {
    match raw {
        WireValue::Null => Ok(Value::Null),
        WireValue::Bool(b) => Ok(Value::Boolean(*b)),
        WireValue::Int(i) => Ok(Value::Integer(*i)),
        WireValue::Float(f) => Ok(Value::Float(*f)),
        WireValue::Str(s) => match split_tagged(s) {
            None => Ok(Value::String(s.clone())),
            Some((payload, code)) => {
                let tag = TypeTag::from_code(code).ok_or_else(|| Error::unknown_tag(code, None))?;
                decode_tagged(payload, tag)
            }
        },
        WireValue::Array(_) | WireValue::Map(_) => Err(Error::malformed(format!(
            "value is {}, expected a scalar",
            raw.type_name()
        ))),
    }
}

fn decode_tagged(payload: &str, tag: TypeTag) -> Result<Value> {
    let invalid = |e: &dyn std::fmt::Display| {
        Error::malformed(format!("invalid {} payload '{}': {}", tag, payload, e))
    };
    match tag {
        TypeTag::Text => Ok(Value::String(payload.to_string())),
        TypeTag::Long => payload.parse::<i64>().map(Value::Integer).map_err(|e| invalid(&e)),
        TypeTag::Real => match payload {
            "NaN" => Ok(Value::Float(f64::NAN)),
            "Infinity" => Ok(Value::Float(f64::INFINITY)),
            "-Infinity" => Ok(Value::Float(f64::NEG_INFINITY)),
            _ => payload.parse::<f64>().map(Value::Float).map_err(|e| invalid(&e)),
        },
        TypeTag::Bool => match payload {
            "true" => Ok(Value::Boolean(true)),
            "false" => Ok(Value::Boolean(false)),
            _ => Err(invalid(&"expected true or false")),
        },
        TypeTag::Null => Ok(Value::Null),
        TypeTag::Decimal => payload.parse::<Decimal>().map(Value::Decimal).map_err(|e| invalid(&e)),
        TypeTag::Date => NaiveDate::parse_from_str(payload, "%Y-%m-%d")
            .map(Value::Date)
            .map_err(|e| invalid(&e)),
        TypeTag::Time => NaiveTime::parse_from_str(payload, "%H:%M:%S%.f")
            .map(Value::Time)
            .map_err(|e| invalid(&e)),
        TypeTag::DateTimeAware | TypeTag::DateTimeNaive => parse_datetime(payload)
            .map(Value::DateTime)
            .ok_or_else(|| invalid(&"expected an ISO 8601 datetime")),
        TypeTag::Bag => {
            if payload.is_empty() {
                Ok(Value::Bag(Bag::new()))
            } else {
                Err(invalid(&"the Bag marker carries no payload"))
            }
        }
    }
}

/// Parses an ISO 8601 datetime; values without an offset are taken as UTC.
fn parse_datetime(payload: &str) -> Option<DateTimeValue> {
    if let Ok(aware) = DateTime::parse_from_rfc3339(payload) {
        return Some(DateTimeValue::Aware(aware));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(payload, fmt).ok())
        .map(|naive| DateTimeValue::Naive(naive).to_utc_aware())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone, Utc};

    fn text(doc: &str) -> Result<Bag> {
        Decoder::new(Transport::Text).decode(doc.as_bytes())
    }

    #[test]
    fn test_expanded_document() {
        let bag = text(
            r#"{"rows":[["","a","X","::X",{}],["a","x","L",1,{"unit":"kg"}],["","b","N","1.50::N",{}]]}::JS"#,
        )
        .unwrap();
        assert_eq!(bag.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(bag.get("a.x"), Some(&Value::Integer(1)));
        assert_eq!(
            bag.get_node("a.x").unwrap().get_attr("unit"),
            Some(&Value::from("kg"))
        );
        assert_eq!(bag.get("b").unwrap().as_decimal().unwrap().scale(), 2);
    }

    #[test]
    fn test_compact_document() {
        let (bag, density) = Decoder::new(Transport::Text)
            .decode_with_density(
                br#"{"rows":[[null,"a","::X"],[0,"y","::X"],[1,"z",2.5,{"k":true}]],"paths":{"0":"a","1":"a.y"}}"#,
            )
            .unwrap();
        assert_eq!(density, Density::Compact);
        assert_eq!(bag.get("a.y.z"), Some(&Value::Float(2.5)));
        assert_eq!(
            bag.get_node("a.y.z").unwrap().get_attr("k"),
            Some(&Value::Boolean(true))
        );
    }

    #[test]
    fn test_compact_accepts_five_columns() {
        let bag = text(r#"{"rows":[[null,"a","X","::X",{}],[0,"b","L",7,{}]],"paths":{"0":"a"}}"#).unwrap();
        assert_eq!(bag.get("a.b"), Some(&Value::Integer(7)));
    }

    #[test]
    fn test_text_is_trimmed_and_marker_optional() {
        let with = text("  {\"rows\":[[\"\",\"a\",null,1,{}]]}::JS\n").unwrap();
        let without = text("{\"rows\":[[\"\",\"a\",null,1,{}]]}").unwrap();
        assert_eq!(with, without);
    }

    #[test]
    fn test_naive_datetime_becomes_utc() {
        let bag = text(r#"{"rows":[["","t","DH","2025-06-15T14:30:45::DH",{}]]}"#).unwrap();
        let expected = Utc.with_ymd_and_hms(2025, 6, 15, 14, 30, 45).unwrap().fixed_offset();
        assert_eq!(bag.get("t"), Some(&Value::from(expected)));
    }

    #[test]
    fn test_aware_datetime_keeps_offset() {
        let bag = text(r#"{"rows":[["","t","DHZ","2025-06-15T14:30:45+02:00::DHZ",{}]]}"#).unwrap();
        let offset = FixedOffset::east_opt(7200).unwrap();
        let expected = offset.with_ymd_and_hms(2025, 6, 15, 14, 30, 45).unwrap();
        assert_eq!(bag.get("t"), Some(&Value::from(expected)));
        assert_eq!(bag.get("t").unwrap().as_datetime().unwrap().offset_seconds(), Some(7200));
    }

    #[test]
    fn test_tagged_natives() {
        let bag = text(
            r#"{"rows":[["","n",null,"::NN",{}],["","s",null,"a::b::T",{}],["","f",null,"NaN::R",{}]]}"#,
        )
        .unwrap();
        assert_eq!(bag.get("n"), Some(&Value::Null));
        assert_eq!(bag.get("s"), Some(&Value::from("a::b")));
        assert!(bag.get("f").unwrap().as_f64().unwrap().is_nan());
    }

    #[test]
    fn test_unknown_tag_names_tag_and_row() {
        let err = text(r#"{"rows":[["","ok",null,1,{}],["","bad",null,"1::ZZ",{}]]}"#).unwrap_err();
        match err {
            Error::UnknownTypeTag { tag, context } => {
                assert_eq!(tag, "ZZ");
                assert!(context.contains("row 1"));
                assert!(context.contains("bad"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_structural_violations() {
        for doc in [
            r#"{"nodes":[]}"#,
            r#"{"rows":{}}"#,
            r#"{"rows":[["","a"]]}"#,
            r#"{"rows":[["missing","a",null,1,{}]]}"#,
            r#"{"rows":[["","a",null,1,{}],["a","b",null,2,{}]]}"#,
            r#"{"rows":[["","a",null,1,{}],["","a",null,2,{}]]}"#,
            r#"{"rows":[["","a.b",null,1,{}]]}"#,
            r#"{"rows":[["","a","L","text",{}]]}"#,
            r#"{"rows":[["","a",null,1,{"k":"::X"}]]}"#,
            r#"{"rows":[["","a",null,[1],{}]]}"#,
            r#"{"rows":[["","d",null,"2025-13-01::D",{}]]}"#,
            r#"{"rows":[[7,"a",1]],"paths":{}}"#,
            r#"{"rows":[]}trailing"#,
        ] {
            assert!(
                matches!(text(doc), Err(Error::MalformedDocument { .. })),
                "expected malformed: {}",
                doc
            );
        }
    }

    #[test]
    fn test_transport_mismatch() {
        let binary = Decoder::new(Transport::Binary);
        assert!(matches!(
            binary.decode(br#"{"rows":[]}::JS"#),
            Err(Error::TransportMismatch { .. })
        ));
        let text_decoder = Decoder::new(Transport::Text);
        assert!(matches!(
            text_decoder.decode(&[0x81, 0xa4, b'r', b'o', b'w', b's', 0x90]),
            Err(Error::TransportMismatch { .. })
        ));
        assert!(matches!(text_decoder.decode(b"[1,2]"), Err(Error::TransportMismatch { .. })));
    }

    #[test]
    fn test_binary_document() {
        let bag = Decoder::new(Transport::Binary)
            .decode(&[0x81, 0xa4, b'r', b'o', b'w', b's', 0x91, 0x95, 0xa0, 0xa1, b'a', 0xc0, 0x05, 0x80])
            .unwrap();
        assert_eq!(bag.get("a"), Some(&Value::Integer(5)));
    }
}
