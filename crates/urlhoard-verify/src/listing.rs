//! Internet Archive item file listings (`<identifier>_files.xml`).
//!
//! Every item carries a listing of its files with the digests recorded at
//! upload time. [`validate_item`] streams each listed file through a
//! [`ValidatingReader`] and fails on the first mismatch.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{Algorithm, DigestSet, Result, ValidatingReader, VerifyError};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileListing {
    #[serde(rename = "file", default)]
    pub files: Vec<FileEntry>,
}

/// One `<file>` element of a listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileEntry {
    /// Path relative to the item root.
    #[serde(rename = "@name")]
    pub name:     String,
    /// `original`, `metadata`, or `derivative`.
    #[serde(rename = "@source", default)]
    pub source:   String,
    #[serde(default)]
    pub format:   String,
    #[serde(default)]
    pub original: Option<String>,
    /// BitTorrent info-hash.
    #[serde(default)]
    pub btih:     Option<String>,
    /// Modification time, Unix seconds.
    #[serde(default)]
    pub mtime:    Option<u64>,
    #[serde(default)]
    pub size:     Option<u64>,
    #[serde(default)]
    pub md5:      Option<String>,
    #[serde(default)]
    pub sha1:     Option<String>,
    #[serde(default)]
    pub crc32:    Option<String>,
}

impl FileEntry {
    /// Digests recorded for this file. Missing or blank digests are skipped.
    pub fn digests(&self) -> Result<DigestSet> {
        let mut set = DigestSet::new();
        for (algorithm, digest) in [
            (Algorithm::Md5, &self.md5),
            (Algorithm::Sha1, &self.sha1),
            (Algorithm::Crc32, &self.crc32),
        ] {
            if let Some(digest) = digest {
                set.set_hex(algorithm, digest)?;
            }
        }
        Ok(set)
    }

    /// Open the file below `dir`, validating it as it is read.
    pub fn open_validator(&self, dir: &Path) -> Result<ValidatingReader<File>> {
        let file = File::open(dir.join(&self.name))?;
        Ok(ValidatingReader::new(file, self.digests()?))
    }
}

impl FileListing {
    pub fn parse<R: BufRead>(reader: R) -> std::result::Result<Self, quick_xml::DeError> {
        quick_xml::de::from_reader(reader)
    }

    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Self::parse(BufReader::new(file)).map_err(|source| VerifyError::Listing {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn get(&self, name: &str) -> Option<&FileEntry> {
        self.files.iter().find(|f| f.name == name)
    }
}

/// Name of the listing file for the item stored in `dir`.
pub fn listing_path(dir: &Path) -> PathBuf {
    let identifier = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    dir.join(format!("{identifier}_files.xml"))
}

/// Validate every file of the item stored in `dir` against its listing.
///
/// The listing itself is skipped: its recorded digests predate its last
/// rewrite.
pub fn validate_item(dir: &Path) -> Result<()> {
    let listing_path = listing_path(dir);
    let listing = FileListing::open(&listing_path)?;
    let listing_name = listing_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    for entry in &listing.files {
        if entry.name == listing_name {
            continue;
        }
        let wrap = |source: VerifyError| VerifyError::File {
            name: entry.name.clone(),
            source: Box::new(source),
        };
        let bytes = entry.open_validator(dir).and_then(ValidatingReader::finish).map_err(wrap)?;
        tracing::info!(file = %entry.name, bytes, "validated");
    }
    Ok(())
}
