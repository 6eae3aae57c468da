//! Walk URL shortener releases and stream every link to a handler.
//!
//! A release is a zip holding one `<project>.meta.json.xz` metadata
//! document and link dumps named `<width>.txt.xz`. Each dump is validated
//! against its zip CRC-32 (and any caller-supplied digests), decompressed
//! and parsed in a single streaming pass.
//!
//! # Architecture
//!
//! - `member.rs` - Member classification
//! - `meta.rs` - Strict metadata decoding
//! - `format.rs` - Decompression codecs
//! - `walk.rs` - The walk itself
//! - `diagnostics.rs` - Side channel for warnings and skipped records
//! - `rules.rs` - Shortcode cleaning for handlers
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use urlhoard_archive::{TracingDiagnostics, WalkOptions, walk_release};
//!
//! let report = walk_release(
//!     Path::new("releases/urlteam_2021-01-01/isgd.zip"),
//!     &WalkOptions::default(),
//!     &mut TracingDiagnostics,
//!     |link, ctx| {
//!         println!("{} {} -> {}", ctx.meta.name, link.source(), link.target());
//!         Ok(())
//!     },
//! )?;
//! println!("{} links", report.links());
//! # Ok::<(), urlhoard_archive::Error>(())
//! ```

pub use self::diagnostics::{Diagnostic, Diagnostics, Location, TracingDiagnostics};
pub use self::error::{BoxError, Error, Result};
pub use self::format::{Compression, Decoder};
pub use self::member::{ArchiveMember, METADATA_SUFFIX, MemberKind};
pub use self::meta::ReleaseMetadata;
pub use self::options::WalkOptions;
pub use self::report::{MemberReport, ReleaseReport};
pub use self::rules::{AlphabetRules, ShortcodeRules, clean_path};
pub use self::walk::{LinkContext, walk_release, walk_release_reader, walk_releases};

pub use urlhoard_beacon::{LinkRecord, MetaField};

mod diagnostics;
mod error;
mod format;
pub mod member;
mod meta;
mod options;
mod report;
pub mod rules;
mod walk;
