//! Node identities
//!
//! A node is a value qualified by the field it came from. Identity is the
//! pair itself, so equal raw values from different fields never collide and
//! no separator can be forged from inside a field name.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Globally unique identity of a co-occurrence node
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeIdentity {
    field: String,
    value: String,
}

impl NodeIdentity {
    /// Encode a `(field, value)` pair. Pure and deterministic.
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        NodeIdentity {
            field: field.into(),
            value: value.into(),
        }
    }

    /// The originating field name
    pub fn field(&self) -> &str {
        &self.field
    }

    /// The raw value, used as the display label
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Renders `field::value`. Backslashes and colons inside the field name are
/// escaped with a backslash, so the text form is injective as well.
impl fmt::Display for NodeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ch in self.field.chars() {
            if ch == '\\' || ch == ':' {
                write!(f, "\\")?;
            }
            write!(f, "{ch}")?;
        }
        write!(f, "::{}", self.value)
    }
}
