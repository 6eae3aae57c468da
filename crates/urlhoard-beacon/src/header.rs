use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Marker that starts every header line.
pub const HEADER_MARKER: char = '#';

/// One `#FIELD: value` line from the header block of a dump.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct MetaField {
    pub field: String,
    pub value: String,
}

impl MetaField {
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Parse the text of a header line that follows the `#` marker.
    ///
    /// The field ends at the first colon, space, or tab and must consist of
    /// uppercase ASCII letters. Leading spaces and tabs are trimmed from the
    /// value.
    pub fn parse(raw: &str) -> Result<Self> {
        split_meta(raw).ok_or_else(|| Error::MalformedHeader {
            line: raw.to_string(),
        })
    }
}

pub(crate) fn split_meta(raw: &str) -> Option<MetaField> {
    let i = raw.find([':', ' ', '\t'])?;
    let field = &raw[..i];
    if !field.bytes().all(|b| b.is_ascii_uppercase()) {
        return None;
    }
    let value = raw[i + 1..].trim_start_matches([' ', '\t']);
    Some(MetaField::new(field, value))
}

impl FromStr for MetaField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for MetaField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{HEADER_MARKER}{}: {}", self.field, self.value)
    }
}
