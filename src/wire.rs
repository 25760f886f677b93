//! Transport-neutral document tree.
//!
//! Both transports carry the same logical document; [`WireValue`] is that
//! document before it is written as JSON text or MessagePack bytes. It holds
//! only the primitives both transports share, and maps keep their document
//! order.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Error text for MessagePack items outside the document model.
pub(crate) const FOREIGN_ITEM: &str = "bin and ext items are not TyTx primitives";

/// Upper bound on preallocation from a length the input declares.
const MAX_PREALLOC: usize = 4096;

/// Ordered string-keyed map of wire values.
pub type WireMap = IndexMap<String, WireValue>;

/// A primitive of the TyTx document model.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum WireValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Array(Vec<WireValue>),
    Map(WireMap),
}

impl WireValue {
    /// Short description used in error messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            WireValue::Null => "null",
            WireValue::Bool(_) => "boolean",
            WireValue::Int(_) => "integer",
            WireValue::Float(_) => "float",
            WireValue::Str(_) => "string",
            WireValue::Array(_) => "array",
            WireValue::Map(_) => "map",
        }
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            WireValue::Str(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&Vec<WireValue>> {
        match self {
            WireValue::Array(items) => Some(items),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_map(&self) -> Option<&WireMap> {
        match self {
            WireValue::Map(map) => Some(map),
            _ => None,
        }
    }
}

impl From<&str> for WireValue {
    fn from(value: &str) -> Self {
        WireValue::Str(value.to_string())
    }
}

impl From<String> for WireValue {
    fn from(value: String) -> Self {
        WireValue::Str(value)
    }
}

impl Serialize for WireValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            WireValue::Null => serializer.serialize_unit(),
            WireValue::Bool(b) => serializer.serialize_bool(*b),
            WireValue::Int(i) => serializer.serialize_i64(*i),
            WireValue::Float(f) => serializer.serialize_f64(*f),
            WireValue::Str(s) => serializer.serialize_str(s),
            WireValue::Array(arr) => {
                use serde::ser::SerializeSeq;
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for element in arr {
                    seq.serialize_element(element)?;
                }
                seq.end()
            }
            WireValue::Map(obj) => {
                use serde::ser::SerializeMap;
                let mut map = serializer.serialize_map(Some(obj.len()))?;
                for (k, v) in obj {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for WireValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct WireValueVisitor;

        impl<'de> Visitor<'de> for WireValueVisitor {
            type Value = WireValue;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("any TyTx document value")
            }

            fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E> {
                Ok(WireValue::Bool(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E> {
                Ok(WireValue::Int(value))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                i64::try_from(value)
                    .map(WireValue::Int)
                    .map_err(|_| E::custom(format!("integer {} exceeds the 64-bit signed range", value)))
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E> {
                Ok(WireValue::Float(value))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E> {
                Ok(WireValue::Str(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E> {
                Ok(WireValue::Str(value))
            }

            fn visit_bytes<E>(self, _value: &[u8]) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Err(E::custom(FOREIGN_ITEM))
            }

            fn visit_newtype_struct<D>(self, _deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Err(de::Error::custom(FOREIGN_ITEM))
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(WireValue::Null)
            }

            fn visit_none<E>(self) -> Result<Self::Value, E> {
                Ok(WireValue::Null)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut vec = Vec::with_capacity(seq.size_hint().unwrap_or(0).min(MAX_PREALLOC));
                while let Some(elem) = seq.next_element()? {
                    vec.push(elem);
                }
                Ok(WireValue::Array(vec))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut values = WireMap::with_capacity(map.size_hint().unwrap_or(0).min(MAX_PREALLOC));
                while let Some((key, value)) = map.next_entry::<String, WireValue>()? {
                    if values.insert(key.clone(), value).is_some() {
                        return Err(de::Error::custom(format!("duplicate key '{}'", key)));
                    }
                }
                Ok(WireValue::Map(values))
            }
        }

        deserializer.deserialize_any(WireValueVisitor)
    }
}
