//! Checksum validation for archived link dumps.
//!
//! Digests are computed incrementally while data streams through a
//! [`ValidatingReader`]; the verdict is delivered by the read that reaches
//! end of stream, so callers never buffer whole files.
//!
//! # Key Features
//!
//! - **Single pass**: MD5, SHA-1 and CRC-32 are fed from the same read
//! - **Deferred**: a mismatch surfaces only at end of stream
//! - **Listings**: Internet Archive `_files.xml` digests via [`listing`]
//!
//! # Example
//!
//! ```
//! use std::io::Read;
//! use urlhoard_verify::{Crc32Hasher, DigestSet, ValidatingReader};
//!
//! let data = b"hello world";
//! let crc = u32::from_be_bytes(Crc32Hasher::digest(data).try_into().unwrap());
//!
//! let mut reader = ValidatingReader::new(&data[..], DigestSet::new().with_crc32(crc));
//! let mut buffer = Vec::new();
//! reader.read_to_end(&mut buffer).unwrap();
//! assert!(reader.is_checked());
//! ```

pub use self::digest_set::{Algorithm, DigestSet};
pub use self::error::{Result, VerifyError};
pub use self::hasher::{Crc32Hasher, DigestHasher, Hasher, Md5Hasher, Sha1Hasher};
pub use self::listing::{FileEntry, FileListing, validate_item};
pub use self::reader::ValidatingReader;

mod digest_set;
mod error;
mod hasher;
pub mod listing;
mod reader;
