//! TyTx Format Reference
//!
//! This module documents the TyTx wire format as implemented by this library.
//!
//! # Overview
//!
//! A TyTx document is a flat list of rows, one per Bag node, listed in
//! depth-first pre-order: a node, then its children, then its next sibling.
//! The same logical document is carried by two transports:
//!
//! - **Text**: compact JSON followed by the `::JS` marker
//! - **Binary**: MessagePack
//!
//! and written in one of two densities, expanded or compact.
//!
//! # Scalars
//!
//! Strings, integers, floats, booleans and null use the transport's native
//! primitives. Every other kind travels as a string of the form
//! `payload::TAG`:
//!
//! ```text
//! "123.4500::N"                  decimal, digits and scale as written
//! "2025-06-15::D"                date
//! "10:30:00::H"                  time (fraction only when non-zero)
//! "2025-06-15T10:30:00::DH"      datetime without offset
//! "2025-06-15T10:30:00Z::DHZ"    datetime with offset (Z at +00:00)
//! "::X"                          the node holds a nested Bag
//! ```
//!
//! **Rules**:
//! - The tag is whatever follows the last `::`.
//! - A plain string that contains `::` gets an extra `::T`, so `"a::b"` is
//!   written `"a::b::T"`.
//! - Non-finite floats are written `"NaN::R"`, `"Infinity::R"` and
//!   `"-Infinity::R"`.
//! - Integers are signed 64-bit. Larger literals are rejected.
//! - A string ending in an unregistered tag is an error, not a string.
//!
//! # Expanded Density
//!
//! ```text
//! {"rows":[
//!   ["",       "order", "X", "::X",       {}],
//!   ["order",  "id",    "L", 42,          {}],
//!   ["order",  "total", "N", "99.50::N",  {"currency":"EUR"}]
//! ]}::JS
//! ```
//!
//! Each row is `[parent_path, label, tag, value, attrs]`. The parent path is
//! the dotted path of the enclosing Bag, empty at the root. The tag column
//! always carries the registry code of the value's kind, so the document is
//! self-describing; readers check it against the decoded value.
//!
//! # Compact Density
//!
//! ```text
//! {"rows":[
//!   [null, "order", "::X"],
//!   [0,    "id",    42],
//!   [0,    "total", "99.50::N", {"currency":"EUR"}]
//! ],"paths":{"0":"order"}}::JS
//! ```
//!
//! Each row is `[parent_code, label, value]`, plus an attribute map only
//! when it is non-empty. Codes number the Bag-valued nodes in walk order and
//! are resolved through the `paths` table. The presence of `paths` is what
//! tells a reader the document is compact.
//!
//! # Decoding Rules
//!
//! - Surrounding whitespace and the `::JS` marker are optional on input.
//! - Datetimes without an offset are read as UTC.
//! - A row may only refer to a parent that an earlier row defined as a Bag.
//! - Labels are non-empty and contain no `.`; sibling labels are unique.
//! - Attribute values are scalars; `::X` inside an attribute map is rejected.
//! - Binary documents must not contain `bin` or `ext` items; `float32` is read
//!   as a float.
//!
//! # File Names
//!
//! `name.bag.json`, `name_compact.bag.json`, `name.bag.mp` and
//! `name_compact.bag.mp`. Files carry no `::JS` marker; see
//! [`TytxOptions::from_file_name`](crate::TytxOptions::from_file_name).

// This module contains only documentation; no implementation code
