//! Error types for Bag manipulation and TyTx encoding/decoding.
//!
//! Every failure carries enough context (offending path, label or tag) to be
//! actionable on its own.
//!
//! ## Error Categories
//!
//! - **Container errors**: [`Error::PathConflict`], [`Error::NotFound`], [`Error::InvalidPath`]
//! - **Decoder errors**: [`Error::UnknownTypeTag`], [`Error::MalformedDocument`],
//!   [`Error::TransportMismatch`]
//! - **Encoder errors**: [`Error::UnsupportedValueKind`]
//! - **Collaborator errors**: [`Error::RoundTrip`]
//! - **I/O errors**: reader/writer failures in the streaming helpers
//!
//! Decoding is all-or-nothing: an error means no partial Bag was produced.
//!
//! ## Examples
//!
//! ```rust
//! use tytx_bag::{from_str, Error};
//!
//! let result = from_str(r#"{"rows": [["", "x", null, "1::ZZ", {}]]}"#);
//! match result {
//!     Err(Error::UnknownTypeTag { tag, .. }) => assert_eq!(tag, "ZZ"),
//!     other => panic!("unexpected: {:?}", other),
//! }
//! ```

use std::fmt;
use thiserror::Error;

/// All errors raised by this crate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A non-terminal path segment resolves to a value that is not a Bag.
    #[error("path conflict at '{path}': segment '{segment}' does not hold a Bag")]
    PathConflict { path: String, segment: String },

    /// The path does not resolve to a node.
    #[error("node not found: '{path}'")]
    NotFound { path: String },

    /// The path itself cannot be used (empty segment, `#n` used for creation, ...).
    #[error("invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    /// A wire value carries a tag that is not in the registry.
    #[error("unknown type tag '{tag}' {context}")]
    UnknownTypeTag { tag: String, context: String },

    /// The document is structurally invalid.
    #[error("malformed TyTx document: {msg}{context}")]
    MalformedDocument { msg: String, context: String },

    /// The document's primitives are inconsistent with the declared transport.
    #[error("transport mismatch (expected {expected} transport): {msg}")]
    TransportMismatch { expected: String, msg: String },

    /// A value kind that cannot appear in the requested position.
    #[error("unsupported value kind '{kind}' {context}")]
    UnsupportedValueKind { kind: String, context: String },

    /// The external round-trip leg failed.
    #[error("round trip failed: {msg}{stderr}")]
    RoundTrip { msg: String, stderr: String },

    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),
}

impl Error {
    /// Creates a path conflict error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tytx_bag::Error;
    ///
    /// let err = Error::path_conflict("a.b.c", "b");
    /// assert!(err.to_string().contains("segment 'b'"));
    /// ```
    pub fn path_conflict(path: &str, segment: &str) -> Self {
        Error::PathConflict {
            path: path.to_string(),
            segment: segment.to_string(),
        }
    }

    pub fn not_found(path: &str) -> Self {
        Error::NotFound {
            path: path.to_string(),
        }
    }

    pub fn invalid_path(path: &str, reason: &str) -> Self {
        Error::InvalidPath {
            path: path.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Creates an unknown tag error; `context` names where the tag was found.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tytx_bag::Error;
    ///
    /// let err = Error::unknown_tag("QQ", Some("value of 'a.b'"));
    /// assert!(err.to_string().contains("'QQ'"));
    /// assert!(err.to_string().contains("a.b"));
    /// ```
    pub fn unknown_tag(tag: &str, context: Option<&str>) -> Self {
        Error::UnknownTypeTag {
            tag: tag.to_string(),
            context: context.map(|c| format!("in {}", c)).unwrap_or_default(),
        }
    }

    /// Creates a malformed document error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tytx_bag::Error;
    ///
    /// let err = Error::malformed("missing 'rows'");
    /// assert!(err.to_string().contains("missing 'rows'"));
    /// ```
    pub fn malformed<T: fmt::Display>(msg: T) -> Self {
        Error::MalformedDocument {
            msg: msg.to_string(),
            context: String::new(),
        }
    }

    /// Creates a malformed document error pointing at a row.
    pub fn malformed_at<T: fmt::Display>(msg: T, row: usize, label: Option<&str>) -> Self {
        let context = match label {
            Some(label) => format!(" (row {}, label '{}')", row, label),
            None => format!(" (row {})", row),
        };
        Error::MalformedDocument {
            msg: msg.to_string(),
            context,
        }
    }

    pub fn transport_mismatch<T: fmt::Display>(expected: &str, msg: T) -> Self {
        Error::TransportMismatch {
            expected: expected.to_string(),
            msg: msg.to_string(),
        }
    }

    pub fn unsupported_kind(kind: &str, context: &str) -> Self {
        Error::UnsupportedValueKind {
            kind: kind.to_string(),
            context: context.to_string(),
        }
    }

    /// Creates a round-trip error; captured standard error is appended when non-empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tytx_bag::Error;
    ///
    /// let err = Error::round_trip("exit status 3", "boom");
    /// assert!(err.to_string().contains("exit status 3"));
    /// assert!(err.to_string().contains("boom"));
    /// ```
    pub fn round_trip<T: fmt::Display>(msg: T, stderr: &str) -> Self {
        let stderr = stderr.trim();
        Error::RoundTrip {
            msg: msg.to_string(),
            stderr: if stderr.is_empty() {
                String::new()
            } else {
                format!("\nstderr: {}", stderr)
            },
        }
    }

    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Adds row context to a decoding error raised deeper in the value parser.
    pub(crate) fn in_row(self, row: usize, label: &str) -> Self {
        match self {
            Error::MalformedDocument { msg, context } if context.is_empty() => {
                Error::malformed_at(msg, row, Some(label))
            }
            Error::UnknownTypeTag { tag, context } if context.is_empty() => Error::UnknownTypeTag {
                tag,
                context: format!("in row {} (label '{}')", row, label),
            },
            other => other,
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::malformed(msg)
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::malformed(msg)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
