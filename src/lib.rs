//! # tytx_bag
//!
//! An ordered, path-addressable, attributed nested container (the [`Bag`])
//! and TyTx, the typed serialization format that carries it between
//! implementations.
//!
//! ## What is TyTx?
//!
//! TyTx flattens a Bag into rows and writes them over a JSON text transport
//! or a MessagePack binary transport. Kinds JSON cannot express natively,
//! such as exact decimals, dates, times and datetimes, travel as
//! `"payload::TAG"` strings, so the receiving side recovers the exact kind
//! even when its own type system differs.
//!
//! ## Key Features
//!
//! - **Ten value kinds**: string, integer, float, arbitrary-precision decimal,
//!   boolean, null, date, time, naive or aware datetime, nested Bag
//! - **Two transports**: text (`::JS`-marked JSON) and binary (MessagePack)
//! - **Two densities**: expanded (self-describing) and compact (path codes,
//!   no tag column); the decoder detects which one it is reading
//! - **Attributes**: every node carries an ordered map of scalar attributes
//! - **Tolerant comparison**: [`bags_equivalent`] accepts the normalisations
//!   decoders are allowed to apply
//! - **Deterministic**: the same Bag and options always give the same bytes
//!
//! ## Quick Start
//!
//! ```rust
//! use tytx_bag::{from_str, to_string, Bag, Decimal, Value};
//!
//! let mut bag = Bag::new();
//! bag.set("order.id", 42).unwrap();
//! bag.set("order.total", "99.50".parse::<Decimal>().unwrap()).unwrap();
//! bag.set("note", "fragile").unwrap();
//!
//! let text = to_string(&bag).unwrap();
//! assert!(text.ends_with("::JS"));
//!
//! let back = from_str(&text).unwrap();
//! assert_eq!(back, bag);
//! assert_eq!(back.get("order.id"), Some(&Value::Integer(42)));
//! ```
//!
//! ### Attributes
//!
//! ```rust
//! use tytx_bag::{bag, from_str, to_string_compact, Value};
//!
//! let bag = bag! {
//!     "products.p1" => "Widget"; { "sku" => "PRD001", "stock" => 100 },
//! }
//! .unwrap();
//!
//! let back = from_str(&to_string_compact(&bag).unwrap()).unwrap();
//! let node = back.get_node("products.p1").unwrap();
//! assert_eq!(node.get_attr("stock"), Some(&Value::Integer(100)));
//! ```
//!
//! ### Binary Transport
//!
//! ```rust
//! use tytx_bag::{from_slice, to_vec, Bag};
//!
//! let mut bag = Bag::new();
//! bag.set("flag", true).unwrap();
//!
//! let bytes = to_vec(&bag).unwrap();
//! assert_eq!(from_slice(&bytes).unwrap(), bag);
//! ```
//!
//! ## Normalisation
//!
//! Not every runtime has naive datetimes, so decoders read them as UTC. A
//! decoded Bag is therefore *equivalent* to the original, not always equal:
//!
//! ```rust
//! use chrono::NaiveDate;
//! use tytx_bag::{from_str, to_string, Bag};
//!
//! let mut bag = Bag::new();
//! let naive = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap().and_hms_opt(8, 0, 0).unwrap();
//! bag.set("at", naive).unwrap();
//!
//! let back = from_str(&to_string(&bag).unwrap()).unwrap();
//! assert_ne!(back, bag);
//! assert!(back.is_equivalent(&bag));
//! ```
//!
//! ## Logging
//!
//! Encode, decode and collaborator exchanges emit [`tracing`] events. The
//! library never installs a subscriber.
//!
//! See [`format`] for the wire format reference.

pub mod bag;
pub mod de;
pub mod decimal;
pub mod equiv;
pub mod error;
pub mod format;
pub mod macros;
pub mod map;
pub mod msgpack;
pub mod options;
pub mod registry;
pub mod roundtrip;
pub mod ser;
pub mod value;
pub mod wire;

pub use bag::{Bag, Node, Position};
pub use de::Decoder;
pub use decimal::Decimal;
pub use equiv::{attrs_equivalent, bags_equivalent, values_equivalent};
pub use error::{Error, Result};
pub use map::AttrMap;
pub use options::{Density, Transport, TytxOptions};
pub use registry::TypeTag;
pub use roundtrip::{round_trip, Collaborator};
pub use ser::Encoder;
pub use value::{DateTimeValue, Kind, Value};
pub use wire::{WireMap, WireValue};

use std::io;

/// Encodes a Bag in the given transport and density.
///
/// Text output carries the `::JS` marker and is returned as UTF-8 bytes.
///
/// # Examples
///
/// ```rust
/// use tytx_bag::{decode, encode, Bag, Density, Transport};
///
/// let mut bag = Bag::new();
/// bag.set("a.b", 1).unwrap();
///
/// for transport in [Transport::Text, Transport::Binary] {
///     for density in [Density::Expanded, Density::Compact] {
///         let data = encode(&bag, transport, density).unwrap();
///         assert_eq!(decode(&data, transport).unwrap(), bag);
///     }
/// }
/// ```
///
/// # Errors
///
/// Returns [`Error::UnsupportedValueKind`] if a node carries a Bag as an
/// attribute value.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn encode(bag: &Bag, transport: Transport, density: Density) -> Result<Vec<u8>> {
    to_bytes_with_options(bag, TytxOptions::new().with_transport(transport).with_density(density))
}

/// Decodes a document in the given transport; density is detected.
///
/// # Errors
///
/// Returns [`Error::TransportMismatch`] if `data` does not look like the
/// named transport, [`Error::UnknownTypeTag`] for an unregistered tag and
/// [`Error::MalformedDocument`] for structural violations.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn decode(data: &[u8], transport: Transport) -> Result<Bag> {
    Decoder::new(transport).decode(data)
}

/// Encodes a Bag as expanded text.
///
/// # Examples
///
/// ```rust
/// use tytx_bag::{to_string, Bag};
///
/// let mut bag = Bag::new();
/// bag.set("name", "test").unwrap();
/// assert_eq!(to_string(&bag).unwrap(), r#"{"rows":[["","name","T","test",{}]]}::JS"#);
/// ```
///
/// # Errors
///
/// See [`encode`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string(bag: &Bag) -> Result<String> {
    Encoder::new(TytxOptions::new()).encode_text(bag)
}

/// Encodes a Bag as compact text.
///
/// # Errors
///
/// See [`encode`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_compact(bag: &Bag) -> Result<String> {
    Encoder::new(TytxOptions::compact()).encode_text(bag)
}

/// Encodes a Bag as expanded MessagePack.
///
/// # Errors
///
/// See [`encode`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_vec(bag: &Bag) -> Result<Vec<u8>> {
    to_bytes_with_options(bag, TytxOptions::binary())
}

/// Encodes a Bag as compact MessagePack.
///
/// # Errors
///
/// See [`encode`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_vec_compact(bag: &Bag) -> Result<Vec<u8>> {
    to_bytes_with_options(bag, TytxOptions::binary().with_density(Density::Compact))
}

/// Encodes a Bag with custom options.
///
/// # Examples
///
/// ```rust
/// use tytx_bag::{to_bytes_with_options, Bag, TytxOptions};
///
/// let mut bag = Bag::new();
/// bag.set("n", 1).unwrap();
///
/// let options = TytxOptions::compact().with_marker(false);
/// let bytes = to_bytes_with_options(&bag, options).unwrap();
/// assert_eq!(bytes, br#"{"rows":[[null,"n",1]],"paths":{}}"#);
/// ```
///
/// # Errors
///
/// See [`encode`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_bytes_with_options(bag: &Bag, options: TytxOptions) -> Result<Vec<u8>> {
    Encoder::new(options).encode(bag)
}

/// Encodes a Bag into a writer.
///
/// # Examples
///
/// ```rust
/// use tytx_bag::{to_writer, Bag, TytxOptions};
///
/// let mut bag = Bag::new();
/// bag.set("n", 1).unwrap();
///
/// let mut buffer = Vec::new();
/// to_writer(&mut buffer, &bag, TytxOptions::binary()).unwrap();
/// assert!(!buffer.is_empty());
/// ```
///
/// # Errors
///
/// Returns an error if encoding fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W>(mut writer: W, bag: &Bag, options: TytxOptions) -> Result<()>
where
    W: io::Write,
{
    let bytes = to_bytes_with_options(bag, options)?;
    writer
        .write_all(&bytes)
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}

/// Decodes text-transport TyTx; the `::JS` marker is optional.
///
/// # Errors
///
/// See [`decode`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str(s: &str) -> Result<Bag> {
    decode(s.as_bytes(), Transport::Text)
}

/// Decodes binary-transport TyTx.
///
/// # Errors
///
/// See [`decode`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice(v: &[u8]) -> Result<Bag> {
    decode(v, Transport::Binary)
}

/// Decodes TyTx read to the end of an I/O stream.
///
/// # Examples
///
/// ```rust
/// use std::io::Cursor;
/// use tytx_bag::{from_reader, Transport, Value};
///
/// let cursor = Cursor::new(br#"{"rows":[["","n","L",1,{}]]}::JS"#);
/// let bag = from_reader(cursor, Transport::Text).unwrap();
/// assert_eq!(bag.get("n"), Some(&Value::Integer(1)));
/// ```
///
/// # Errors
///
/// Returns an error if reading fails or the data does not decode.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R>(mut reader: R, transport: Transport) -> Result<Bag>
where
    R: io::Read,
{
    let mut data = Vec::new();
    reader
        .read_to_end(&mut data)
        .map_err(|e| Error::io(&e.to_string()))?;
    decode(&data, transport)
}
