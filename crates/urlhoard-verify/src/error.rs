use std::io;
use std::path::PathBuf;

use crate::Algorithm;

#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error("{algorithm} sum is {} instead of {}", hex::encode(.actual), hex::encode(.expected))]
    ChecksumMismatch {
        algorithm: Algorithm,
        actual: Vec<u8>,
        expected: Vec<u8>,
    },

    #[error("{algorithm} digest must be {expected} bytes, got {actual}")]
    InvalidDigestLength {
        algorithm: Algorithm,
        expected: usize,
        actual: usize,
    },

    #[error("invalid hex digest: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("failed to read file listing '{path}': {source}")]
    Listing {
        path: PathBuf,
        source: quick_xml::DeError,
    },

    #[error("validate {name}: {source}")]
    File {
        name: String,
        source: Box<VerifyError>,
    },

    #[error(transparent)]
    Io(io::Error),
}

impl From<io::Error> for VerifyError {
    /// Unwraps verification failures that travelled through `Read`.
    fn from(err: io::Error) -> Self {
        if Self::from_io(&err).is_none() {
            return Self::Io(err);
        }
        match err.into_inner().map(|inner| inner.downcast::<VerifyError>()) {
            Some(Ok(verify)) => *verify,
            Some(Err(other)) => Self::Io(io::Error::new(io::ErrorKind::InvalidData, other)),
            None => Self::Io(io::ErrorKind::InvalidData.into()),
        }
    }
}

impl VerifyError {
    /// Recover a verification failure carried inside an `io::Error`.
    ///
    /// [`ValidatingReader`](crate::ValidatingReader) reports mismatches
    /// through `Read`, so callers further up a reader stack see them as
    /// I/O errors of kind `InvalidData`.
    pub fn from_io(err: &io::Error) -> Option<&VerifyError> {
        err.get_ref()?.downcast_ref::<VerifyError>()
    }

    pub fn is_mismatch(&self) -> bool {
        match self {
            Self::ChecksumMismatch { .. } => true,
            Self::File { source, .. } => source.is_mismatch(),
            _ => false,
        }
    }

    pub(crate) fn into_io(self) -> io::Error {
        match self {
            Self::Io(e) => e,
            other => io::Error::new(io::ErrorKind::InvalidData, other),
        }
    }
}

pub type Result<T> = std::result::Result<T, VerifyError>;
