//! Streaming reader for BEACON-style link dumps.
//!
//! A dump is an optional block of `#FIELD: value` header lines followed by
//! one link per line, fields separated by `|`. Two grammars are supported:
//! the generic `source|annotation|target` form and the URLTeam
//! `shortcode|target` form.
//!
//! # Example
//!
//! ```
//! use urlhoard_beacon::{DumpReader, Grammar};
//!
//! let dump = "#FORMAT: BEACON\n\nabc|https://example.com/\n";
//! let mut reader = DumpReader::new(dump.as_bytes(), Grammar::Fixed { width: Some(3) });
//!
//! assert_eq!(reader.header().unwrap()[0].value, "BEACON");
//! let link = reader.read().unwrap().unwrap();
//! assert_eq!(link.source(), "abc");
//! assert!(reader.read().unwrap().is_none());
//! ```

pub use self::error::{Error, Result};
pub use self::header::{HEADER_MARKER, MetaField};
pub use self::link::{FIELD_SEPARATOR, Grammar, LinkRecord, parse_generic, split_fixed};
pub use self::reader::{DumpReader, ReaderOptions};
pub use self::sink::{TracingSink, Warning, WarningSink};

mod error;
mod header;
mod line;
mod link;
mod reader;
mod sink;
