//! Configuration options for TyTx encoding.
//!
//! This module provides types to choose the encoded form of a Bag:
//!
//! - [`Transport`]: text (JSON superset) or binary (MessagePack)
//! - [`Density`]: expanded (self-describing rows) or compact (path codes, no tag column)
//! - [`TytxOptions`]: the combination, plus the text marker switch
//!
//! Decoding needs only the transport; density is detected from the document.
//!
//! ## File conventions
//!
//! | File name                | Transport | Density  |
//! |--------------------------|-----------|----------|
//! | `name.bag.json`          | text      | expanded |
//! | `name_compact.bag.json`  | text      | compact  |
//! | `name.bag.mp`            | binary    | expanded |
//! | `name_compact.bag.mp`    | binary    | compact  |
//!
//! Files rely on the extension instead of the `::JS` marker.
//!
//! ```rust
//! use tytx_bag::{Density, Transport, TytxOptions};
//!
//! let options = TytxOptions::compact().with_transport(Transport::Binary);
//! assert_eq!(options.file_name("typed"), "typed_compact.bag.mp");
//!
//! let parsed = TytxOptions::from_file_name("fixtures/typed.bag.json").unwrap();
//! assert_eq!(parsed.transport, Transport::Text);
//! assert_eq!(parsed.density, Density::Expanded);
//! assert!(!parsed.marker);
//! ```

use std::fmt;

/// Wire-level primitive encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Transport {
    /// JSON text followed by the `::JS` marker.
    #[default]
    Text,
    /// MessagePack bytes.
    Binary,
}

impl Transport {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Transport::Text => "text",
            Transport::Binary => "binary",
        }
    }

    /// File extension used by the fixture naming convention.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Transport::Text => "bag.json",
            Transport::Binary => "bag.mp",
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structural verbosity of a document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Density {
    /// One `[parent_path, label, tag, value, attrs]` row per node.
    #[default]
    Expanded,
    /// `[parent_code, label, value(, attrs)]` rows plus a `paths` table.
    Compact,
}

impl Density {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Density::Expanded => "expanded",
            Density::Compact => "compact",
        }
    }
}

impl fmt::Display for Density {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration options for TyTx encoding.
///
/// # Examples
///
/// ```rust
/// use tytx_bag::{Density, Transport, TytxOptions};
///
/// // Text, expanded, with the ::JS marker
/// let options = TytxOptions::new();
///
/// // Binary, compact
/// let options = TytxOptions::binary().with_density(Density::Compact);
/// assert_eq!(options.transport, Transport::Binary);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TytxOptions {
    pub transport: Transport,
    pub density: Density,
    /// Append the `::JS` marker to text output. Ignored for binary.
    pub marker: bool,
}

impl Default for TytxOptions {
    fn default() -> Self {
        TytxOptions {
            transport: Transport::default(),
            density: Density::default(),
            marker: true,
        }
    }
}

impl TytxOptions {
    /// Creates default options (text transport, expanded density, marker on).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Text transport, compact density.
    #[must_use]
    pub fn compact() -> Self {
        TytxOptions {
            density: Density::Compact,
            ..Default::default()
        }
    }

    /// Binary transport, expanded density.
    #[must_use]
    pub fn binary() -> Self {
        TytxOptions {
            transport: Transport::Binary,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_transport(mut self, transport: Transport) -> Self {
        self.transport = transport;
        self
    }

    #[must_use]
    pub fn with_density(mut self, density: Density) -> Self {
        self.density = density;
        self
    }

    /// Enables or disables the trailing `::JS` marker on text output.
    #[must_use]
    pub fn with_marker(mut self, marker: bool) -> Self {
        self.marker = marker;
        self
    }

    /// File name for `stem` under the fixture naming convention.
    #[must_use]
    pub fn file_name(&self, stem: &str) -> String {
        match self.density {
            Density::Expanded => format!("{}.{}", stem, self.transport.extension()),
            Density::Compact => format!("{}_compact.{}", stem, self.transport.extension()),
        }
    }

    /// Infers options from a file name; the marker is disabled because the
    /// extension already names the transport.
    #[must_use]
    pub fn from_file_name(name: &str) -> Option<TytxOptions> {
        let (stem, transport) = [Transport::Text, Transport::Binary]
            .into_iter()
            .find_map(|t| {
                name.strip_suffix(t.extension())
                    .and_then(|rest| rest.strip_suffix('.'))
                    .map(|stem| (stem, t))
            })?;
        let density = if stem.ends_with("_compact") {
            Density::Compact
        } else {
            Density::Expanded
        };
        Some(TytxOptions {
            transport,
            density,
            marker: false,
        })
    }
}
