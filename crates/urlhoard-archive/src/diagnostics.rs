use std::fmt;
use std::path::{Path, PathBuf};

use urlhoard_beacon::Warning;

use crate::Error;

/// A member inside a release container.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Location {
    pub container: PathBuf,
    pub member: String,
}

impl Location {
    pub fn new(container: &Path, member: &str) -> Self {
        Self {
            container: container.to_path_buf(),
            member: member.to_string(),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.container.display(), self.member)
    }
}

/// Something worth telling the caller that does not stop the walk.
#[derive(Debug)]
pub enum Diagnostic<'a> {
    /// Data-quality warning from the dump reader.
    Warning {
        at: &'a Location,
        warning: &'a Warning,
    },
    /// A line was skipped; the dump continues.
    RecordError {
        at: &'a Location,
        line: u64,
        error: &'a urlhoard_beacon::Error,
    },
    /// A member was abandoned; the release continues with the next one.
    MemberFailed { error: &'a Error },
}

impl fmt::Display for Diagnostic<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning { at, warning } => write!(f, "{at}: {warning}"),
            Self::RecordError { at, error, .. } => write!(f, "{at}: {error}"),
            Self::MemberFailed { error } => write!(f, "{error}"),
        }
    }
}

pub trait Diagnostics {
    fn report(&mut self, diagnostic: Diagnostic<'_>);
}

impl<D: Diagnostics + ?Sized> Diagnostics for &mut D {
    fn report(&mut self, diagnostic: Diagnostic<'_>) {
        (**self).report(diagnostic);
    }
}

/// Emits diagnostics as `tracing` events.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn report(&mut self, diagnostic: Diagnostic<'_>) {
        match diagnostic {
            Diagnostic::Warning { at, warning } => tracing::warn!(
                container = %at.container.display(),
                member = %at.member,
                line = warning.line(),
                "{warning}"
            ),
            Diagnostic::RecordError { at, line, error } => tracing::warn!(
                container = %at.container.display(),
                member = %at.member,
                line,
                "skipped record: {error}"
            ),
            Diagnostic::MemberFailed { error } => {
                tracing::error!(%error, "abandoned member")
            }
        }
    }
}

/// Keeps every diagnostic as its rendered message.
impl Diagnostics for Vec<String> {
    fn report(&mut self, diagnostic: Diagnostic<'_>) {
        self.push(diagnostic.to_string());
    }
}
