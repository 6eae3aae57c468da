use std::fmt;

use crate::{Error, Result};

/// Separator between the fields of a link line.
pub const FIELD_SEPARATOR: char = '|';

/// Grammar of the link lines following the header.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Grammar {
    /// `source`, `source|target`, or `source|annotation|target`.
    #[default]
    Generic,
    /// URLTeam `shortcode|target`, where the target may itself contain bars.
    ///
    /// `width` is the declared shortcode length of the dump, if known.
    Fixed { width: Option<usize> },
}

/// A decoded link line.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum LinkRecord {
    Generic {
        source: String,
        target: String,
        annotation: String,
    },
    Fixed {
        shortcode: String,
        target: String,
    },
}

impl LinkRecord {
    /// The source identifier; the shortcode for fixed-field records.
    pub fn source(&self) -> &str {
        match self {
            Self::Generic { source, .. } => source,
            Self::Fixed { shortcode, .. } => shortcode,
        }
    }

    pub fn target(&self) -> &str {
        match self {
            Self::Generic { target, .. } | Self::Fixed { target, .. } => target,
        }
    }

    /// Empty unless the line carried three fields.
    pub fn annotation(&self) -> &str {
        match self {
            Self::Generic { annotation, .. } => annotation,
            Self::Fixed { .. } => "",
        }
    }
}

impl fmt::Display for LinkRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Generic {
                source,
                target,
                annotation,
            } if annotation.is_empty() => write!(f, "{source}{FIELD_SEPARATOR}{target}"),
            Self::Generic {
                source,
                target,
                annotation,
            } => write!(
                f,
                "{source}{FIELD_SEPARATOR}{annotation}{FIELD_SEPARATOR}{target}"
            ),
            Self::Fixed { shortcode, target } => {
                write!(f, "{shortcode}{FIELD_SEPARATOR}{target}")
            }
        }
    }
}

/// Parse a line in the generic grammar.
///
/// Two fields are taken as `source|target`. Some producers may mean
/// `source|annotation` instead; that reading is not attempted here.
pub fn parse_generic(line: &str) -> Result<LinkRecord> {
    let mut fields = line.splitn(4, FIELD_SEPARATOR);
    let source = fields.next().unwrap_or_default();
    let record = match (fields.next(), fields.next(), fields.next()) {
        (None, _, _) => LinkRecord::Generic {
            source: source.to_string(),
            target: source.to_string(),
            annotation: String::new(),
        },
        (Some(target), None, _) => LinkRecord::Generic {
            source: source.to_string(),
            target: target.to_string(),
            annotation: String::new(),
        },
        (Some(annotation), Some(target), None) => LinkRecord::Generic {
            source: source.to_string(),
            target: target.to_string(),
            annotation: annotation.to_string(),
        },
        (Some(_), Some(_), Some(_)) => {
            return Err(Error::TooManyFields {
                line: line.to_string(),
            });
        }
    };
    Ok(record)
}

/// Split a fixed-field line at its first bar.
pub fn split_fixed(line: &str) -> Option<(&str, &str)> {
    line.split_once(FIELD_SEPARATOR)
}
