//! The type tag registry.
//!
//! Every value kind has a stable short code. Kinds that the transports cannot
//! express natively (decimal, date, datetime, time) travel as
//! `"<payload>::<TAG>"` strings; the remaining kinds are native on the wire
//! and their tags appear only in the expanded density's tag column.
//!
//! Tags are never reused for a different kind.
//!
//! | Tag   | Kind                  |
//! |-------|-----------------------|
//! | `T`   | string                |
//! | `L`   | integer               |
//! | `R`   | float                 |
//! | `B`   | boolean               |
//! | `NN`  | null                  |
//! | `N`   | decimal               |
//! | `D`   | date                  |
//! | `DHZ` | datetime with offset  |
//! | `DH`  | naive datetime        |
//! | `H`   | time                  |
//! | `X`   | nested Bag            |

use crate::{DateTimeValue, Kind, Value};
use std::fmt;

/// Separator between a payload and its tag.
pub const TAG_SEPARATOR: &str = "::";

/// Marker appended to text-transport documents.
pub const TEXT_MARKER: &str = "::JS";

/// A registry entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Text,
    Long,
    Real,
    Bool,
    Null,
    Decimal,
    Date,
    DateTimeAware,
    DateTimeNaive,
    Time,
    Bag,
}

impl TypeTag {
    /// All registered tags.
    pub const ALL: [TypeTag; 11] = [
        TypeTag::Text,
        TypeTag::Long,
        TypeTag::Real,
        TypeTag::Bool,
        TypeTag::Null,
        TypeTag::Decimal,
        TypeTag::Date,
        TypeTag::DateTimeAware,
        TypeTag::DateTimeNaive,
        TypeTag::Time,
        TypeTag::Bag,
    ];

    /// The on-wire code.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tytx_bag::TypeTag;
    ///
    /// assert_eq!(TypeTag::Decimal.code(), "N");
    /// assert_eq!(TypeTag::from_code("DHZ"), Some(TypeTag::DateTimeAware));
    /// assert_eq!(TypeTag::from_code("ZZ"), None);
    /// ```
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            TypeTag::Text => "T",
            TypeTag::Long => "L",
            TypeTag::Real => "R",
            TypeTag::Bool => "B",
            TypeTag::Null => "NN",
            TypeTag::Decimal => "N",
            TypeTag::Date => "D",
            TypeTag::DateTimeAware => "DHZ",
            TypeTag::DateTimeNaive => "DH",
            TypeTag::Time => "H",
            TypeTag::Bag => "X",
        }
    }

    #[must_use]
    pub fn from_code(code: &str) -> Option<TypeTag> {
        TypeTag::ALL.iter().copied().find(|tag| tag.code() == code)
    }

    /// The tag describing `value`.
    #[must_use]
    pub fn of(value: &Value) -> TypeTag {
        match value {
            Value::String(_) => TypeTag::Text,
            Value::Integer(_) => TypeTag::Long,
            Value::Float(_) => TypeTag::Real,
            Value::Boolean(_) => TypeTag::Bool,
            Value::Null => TypeTag::Null,
            Value::Decimal(_) => TypeTag::Decimal,
            Value::Date(_) => TypeTag::Date,
            Value::DateTime(DateTimeValue::Aware(_)) => TypeTag::DateTimeAware,
            Value::DateTime(DateTimeValue::Naive(_)) => TypeTag::DateTimeNaive,
            Value::Time(_) => TypeTag::Time,
            Value::Bag(_) => TypeTag::Bag,
        }
    }

    /// The value kind a tag decodes to.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        match self {
            TypeTag::Text => Kind::String,
            TypeTag::Long => Kind::Integer,
            TypeTag::Real => Kind::Float,
            TypeTag::Bool => Kind::Boolean,
            TypeTag::Null => Kind::Null,
            TypeTag::Decimal => Kind::Decimal,
            TypeTag::Date => Kind::Date,
            TypeTag::DateTimeAware | TypeTag::DateTimeNaive => Kind::DateTime,
            TypeTag::Time => Kind::Time,
            TypeTag::Bag => Kind::Bag,
        }
    }

    /// Whether the transports carry this kind without a tagged string.
    #[must_use]
    pub const fn is_native(&self) -> bool {
        matches!(
            self,
            TypeTag::Text | TypeTag::Long | TypeTag::Real | TypeTag::Bool | TypeTag::Null
        )
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Splits `"payload::TAG"` at the last separator.
///
/// Returns `None` for strings without a separator; the tag half is returned
/// unvalidated.
#[must_use]
pub fn split_tagged(s: &str) -> Option<(&str, &str)> {
    s.rfind(TAG_SEPARATOR)
        .map(|pos| (&s[..pos], &s[pos + TAG_SEPARATOR.len()..]))
}

/// Appends a tag to a payload.
#[must_use]
pub fn tagged(payload: &str, tag: TypeTag) -> String {
    let mut out = String::with_capacity(payload.len() + 5);
    out.push_str(payload);
    out.push_str(TAG_SEPARATOR);
    out.push_str(tag.code());
    out
}
