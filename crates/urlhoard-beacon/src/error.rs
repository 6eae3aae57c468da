use std::io;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("malformed header line: {line}")]
    MalformedHeader { line: String },

    #[error("link line has too many bars: {line}")]
    TooManyFields { line: String },

    #[error("line {line}: link missing bar separator: {text}")]
    MissingSeparator { line: u64, text: String },

    #[error("line {line}: invalid UTF-8")]
    InvalidUtf8 { line: u64 },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    /// Whether the underlying stream failed, as opposed to a single bad line.
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
