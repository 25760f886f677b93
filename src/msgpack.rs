//! MessagePack transport for [`WireValue`] documents.
//!
//! Writing and reading go through `rmp-serde` and the serde impls on
//! [`WireValue`]. `rmp-serde` already picks the smallest header for
//! integers, strings, arrays and maps and writes every `f64` as float64, so
//! encoding is deterministic. On top of it this module requires the input to
//! be exactly one item and reports `bin` and `ext` items, which have no place
//! in a TyTx document, as a transport mismatch. `float32` items are widened.

use crate::wire::{WireValue, FOREIGN_ITEM};
use crate::{Error, Result};
use serde::Deserialize;
use std::io::Cursor;

/// Encodes a document as MessagePack.
pub fn to_vec(value: &WireValue) -> Result<Vec<u8>> {
    rmp_serde::to_vec(value).map_err(|e| Error::malformed(format!("MessagePack encoding failed: {}", e)))
}

/// Decodes a MessagePack document spanning the whole input.
pub fn from_slice(data: &[u8]) -> Result<WireValue> {
    let mut cursor = Cursor::new(data);
    let value = {
        let mut de = rmp_serde::Deserializer::new(&mut cursor);
        WireValue::deserialize(&mut de).map_err(|e| {
            let msg = e.to_string();
            if msg.contains(FOREIGN_ITEM) {
                Error::transport_mismatch("binary", msg)
            } else {
                Error::malformed(format!("invalid MessagePack: {}", msg))
            }
        })?
    };
    let consumed = cursor.position() as usize;
    if consumed != data.len() {
        return Err(Error::malformed(format!(
            "{} trailing bytes after MessagePack document",
            data.len() - consumed
        )));
    }
    Ok(value)
}
