use std::io;
use std::path::PathBuf;

use urlhoard_verify::VerifyError;

use crate::{Compression, Location};

/// Error type returned by link handlers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("empty archive: {}", .container.display())]
    EmptyArchive { container: PathBuf },

    #[error("no metadata document in archive: {}", .container.display())]
    MissingMetadata { container: PathBuf },

    #[error("archive {} has more than one metadata document: '{first}' and '{second}'", .container.display())]
    AmbiguousMetadata {
        container: PathBuf,
        first: String,
        second: String,
    },

    #[error("archive is corrupted: {}: {source}", .container.display())]
    Corrupted {
        container: PathBuf,
        source: zip::result::ZipError,
    },

    #[error("{at}: invalid release metadata: {source}")]
    StrictDecode {
        at: Location,
        source: serde_json::Error,
    },

    #[error("{at}: failed to open member: {source}")]
    OpenMember {
        at: Location,
        source: zip::result::ZipError,
    },

    #[error("{at}: {compression} support is not compiled in")]
    UnsupportedFormat {
        at: Location,
        compression: Compression,
    },

    #[error("{at}: {source}")]
    Checksum { at: Location, source: VerifyError },

    #[error("{at}: {source}")]
    Dump {
        at: Location,
        source: urlhoard_beacon::Error,
    },

    #[error("{at}: read failed: {source}")]
    ReadMember { at: Location, source: io::Error },

    #[error("{at}: handler failed: {source}")]
    Handler { at: Location, source: BoxError },

    #[error("failed to read '{}': {source}", .path.display())]
    ReadFailed { path: PathBuf, source: io::Error },
}

impl Error {
    /// Container and member the error refers to, for member-level errors.
    pub fn location(&self) -> Option<&Location> {
        match self {
            Self::StrictDecode { at, .. }
            | Self::OpenMember { at, .. }
            | Self::UnsupportedFormat { at, .. }
            | Self::Checksum { at, .. }
            | Self::Dump { at, .. }
            | Self::ReadMember { at, .. }
            | Self::Handler { at, .. } => Some(at),
            _ => None,
        }
    }

    pub fn is_checksum(&self) -> bool {
        matches!(self, Self::Checksum { source, .. } if source.is_mismatch())
    }

    /// Classify a failure of the stream underneath a dump reader.
    ///
    /// Checksum verdicts travel up the reader stack as I/O errors and are
    /// unwrapped here.
    pub(crate) fn from_stream(at: Location, err: io::Error) -> Self {
        if VerifyError::from_io(&err).is_some() {
            return Self::from_verify(at, err.into());
        }
        Self::ReadMember { at, source: err }
    }

    pub(crate) fn from_verify(at: Location, err: VerifyError) -> Self {
        match err {
            VerifyError::Io(source) => Self::ReadMember { at, source },
            source => Self::Checksum { at, source },
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
