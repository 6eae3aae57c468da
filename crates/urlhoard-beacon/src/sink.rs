use std::fmt;

/// Data-quality problem that does not stop a record from being returned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Warning {
    /// A fixed-field line had no bar; its whole text became the target.
    MissingSeparator { line: u64, text: String },
    /// A shortcode's length differs from the width declared for its dump.
    ShortcodeWidth {
        line: u64,
        shortcode: String,
        expected: usize,
        actual: usize,
    },
}

impl Warning {
    pub fn line(&self) -> u64 {
        match self {
            Self::MissingSeparator { line, .. } | Self::ShortcodeWidth { line, .. } => *line,
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSeparator { line, text } => {
                write!(f, "line {line}: link missing bar separator: {text}")
            }
            Self::ShortcodeWidth {
                line,
                shortcode,
                expected,
                actual,
            } => write!(
                f,
                "line {line}: shortcode {shortcode:?} has length {actual}, expected {expected}"
            ),
        }
    }
}

/// Receives warnings raised while reading a dump.
pub trait WarningSink {
    fn warn(&mut self, warning: Warning);
}

impl WarningSink for Vec<Warning> {
    fn warn(&mut self, warning: Warning) {
        self.push(warning);
    }
}

impl<S: WarningSink + ?Sized> WarningSink for &mut S {
    fn warn(&mut self, warning: Warning) {
        (**self).warn(warning);
    }
}

/// Default sink: emits each warning as a `tracing` event.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl WarningSink for TracingSink {
    fn warn(&mut self, warning: Warning) {
        tracing::warn!(line = warning.line(), "{warning}");
    }
}

