use std::io::{BufRead, BufReader, Read};

use crate::header::{HEADER_MARKER, split_meta};
use crate::line::Lines;
use crate::link::{Grammar, LinkRecord, parse_generic, split_fixed};
use crate::sink::{TracingSink, Warning, WarningSink};
use crate::{Error, MetaField, Result};

/// Reader behavior that is independent of the grammar.
#[derive(Clone, Copy, Debug)]
pub struct ReaderOptions {
    pub skip_blank_lines: bool,
    pub require_separator: bool,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            skip_blank_lines: true,
            require_separator: false,
        }
    }
}

impl ReaderOptions {
    pub fn skip_blank_lines(mut self, skip: bool) -> Self {
        self.skip_blank_lines = skip;
        self
    }

    /// Turn a fixed-field line without a bar into a record error instead
    /// of a warning.
    pub fn require_separator(mut self, require: bool) -> Self {
        self.require_separator = require;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    /// Nothing consumed; the header has not been looked for.
    Start,
    /// Header handled; the current line may still need replaying.
    Streaming,
    /// End of stream or an I/O failure was seen.
    Exhausted,
}

/// Streaming reader for a single link dump.
///
/// The header block is parsed on the first call to [`DumpReader::header`]
/// or [`DumpReader::read`], whichever comes first. Records are then
/// returned one line at a time until `read` yields `Ok(None)`.
pub struct DumpReader<R, S = TracingSink> {
    lines: Lines<R>,
    grammar: Grammar,
    options: ReaderOptions,
    sink: S,
    state: State,
    header: Vec<MetaField>,
    replay: bool,
}

impl<R: Read> DumpReader<BufReader<R>> {
    pub fn new(reader: R, grammar: Grammar) -> Self {
        Self::from_buf_read(BufReader::new(reader), grammar)
    }
}

impl<R: BufRead> DumpReader<R> {
    pub fn from_buf_read(reader: R, grammar: Grammar) -> Self {
        Self {
            lines: Lines::new(reader),
            grammar,
            options: ReaderOptions::default(),
            sink: TracingSink,
            state: State::Start,
            header: Vec::new(),
            replay: false,
        }
    }
}

impl<R: BufRead, S: WarningSink> DumpReader<R, S> {
    pub fn with_options(mut self, options: ReaderOptions) -> Self {
        self.options = options;
        self
    }

    /// Route warnings to `sink` instead of the log.
    pub fn with_sink<T: WarningSink>(self, sink: T) -> DumpReader<R, T> {
        DumpReader {
            lines: self.lines,
            grammar: self.grammar,
            options: self.options,
            sink,
            state: self.state,
            header: self.header,
            replay: self.replay,
        }
    }

    pub fn grammar(&self) -> Grammar {
        self.grammar
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Number of the last line consumed from the stream.
    pub fn line_number(&self) -> u64 {
        self.lines.number()
    }

    /// Parse the header block if that has not happened yet and return it.
    ///
    /// Calling this again returns the same fields.
    pub fn header(&mut self) -> Result<&[MetaField]> {
        if self.state == State::Start {
            self.state = State::Streaming;
            self.read_header()?;
        }
        Ok(&self.header)
    }

    fn read_header(&mut self) -> Result<()> {
        if !self.lines.read_line()? {
            return Ok(());
        }
        if !self.lines.line().starts_with(&[HEADER_MARKER as u8]) {
            // Omitted header; the line is the first record candidate.
            self.replay = true;
            return Ok(());
        }
        loop {
            let number = self.lines.number();
            let line = std::str::from_utf8(self.lines.line())
                .map_err(|_| Error::InvalidUtf8 { line: number })?;
            let field = split_meta(&line[1..]).ok_or_else(|| Error::MalformedHeader {
                line: line.to_string(),
            })?;
            self.header.push(field);

            if !self.lines.read_line()? {
                return Ok(());
            }
            let next = self.lines.line();
            if next.is_empty() {
                return Ok(());
            }
            if !next.starts_with(&[HEADER_MARKER as u8]) {
                self.replay = true;
                return Ok(());
            }
        }
    }

    /// Read the next record, or `Ok(None)` once the stream is exhausted.
    ///
    /// Errors other than [`Error::Io`] concern a single line; reading may
    /// continue with the next one. After an I/O error the reader reports
    /// end of stream.
    pub fn read(&mut self) -> Result<Option<LinkRecord>> {
        if self.state == State::Start {
            self.header()?;
        }
        loop {
            if self.state == State::Exhausted {
                return Ok(None);
            }
            match self.next_line() {
                Ok(true) => {}
                Ok(false) => {
                    self.state = State::Exhausted;
                    return Ok(None);
                }
                Err(e) => {
                    self.state = State::Exhausted;
                    return Err(e);
                }
            }
            let raw = self.lines.line();
            if raw.is_empty() && self.options.skip_blank_lines {
                continue;
            }
            let number = self.lines.number();
            let line =
                std::str::from_utf8(raw).map_err(|_| Error::InvalidUtf8 { line: number })?;
            return parse_line(line, number, self.grammar, &self.options, &mut self.sink).map(Some);
        }
    }

    fn next_line(&mut self) -> Result<bool> {
        if self.replay {
            self.replay = false;
            return Ok(true);
        }
        Ok(self.lines.read_line()?)
    }

    pub fn into_inner(self) -> R {
        self.lines.into_inner()
    }
}

fn parse_line<S: WarningSink>(
    line: &str,
    number: u64,
    grammar: Grammar,
    options: &ReaderOptions,
    sink: &mut S,
) -> Result<LinkRecord> {
    let width = match grammar {
        Grammar::Generic => return parse_generic(line),
        Grammar::Fixed { width } => width,
    };

    let Some((shortcode, target)) = split_fixed(line) else {
        if options.require_separator {
            return Err(Error::MissingSeparator {
                line: number,
                text: line.to_string(),
            });
        }
        sink.warn(Warning::MissingSeparator {
            line: number,
            text: line.to_string(),
        });
        return Ok(LinkRecord::Fixed {
            shortcode: String::new(),
            target: line.to_string(),
        });
    };

    if let Some(expected) = width {
        let actual = shortcode.chars().count();
        if actual != expected {
            sink.warn(Warning::ShortcodeWidth {
                line: number,
                shortcode: shortcode.to_string(),
                expected,
                actual,
            });
        }
    }
    Ok(LinkRecord::Fixed {
        shortcode: shortcode.to_string(),
        target: target.to_string(),
    })
}

impl<R: BufRead, S: WarningSink> Iterator for DumpReader<R, S> {
    type Item = Result<LinkRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(shortcode: &str, target: &str) -> LinkRecord {
        LinkRecord::Fixed {
            shortcode: shortcode.into(),
            target: target.into(),
        }
    }

    #[test]
    fn header_then_records_then_end() {
        let data = "#FORMAT: BEACON\n#NAME: test\n\nabc|http://a.example/\nabd|http://b.example/\n";
        let mut reader = DumpReader::new(data.as_bytes(), Grammar::Fixed { width: None });
        assert_eq!(
            reader.header().unwrap(),
            &[MetaField::new("FORMAT", "BEACON"), MetaField::new("NAME", "test")]
        );
        assert_eq!(reader.read().unwrap(), Some(fixed("abc", "http://a.example/")));
        assert_eq!(reader.read().unwrap(), Some(fixed("abd", "http://b.example/")));
        assert_eq!(reader.read().unwrap(), None);
        assert_eq!(reader.read().unwrap(), None);
    }

    #[test]
    fn header_is_idempotent() {
        let mut reader = DumpReader::new(&b"#A: 1\n#A: 2\nx|y"[..], Grammar::Generic);
        assert_eq!(reader.header().unwrap().len(), 2);
        assert_eq!(reader.header().unwrap()[1], MetaField::new("A", "2"));
    }

    #[test]
    fn implicit_header_on_first_read() {
        let mut reader = DumpReader::new(&b"#PREFIX: http://x/\nq|r"[..], Grammar::Generic);
        let record = reader.read().unwrap().unwrap();
        assert_eq!(record.source(), "q");
        assert_eq!(reader.header().unwrap(), &[MetaField::new("PREFIX", "http://x/")]);
    }

    #[test]
    fn omitted_header_replays_first_line() {
        let mut reader = DumpReader::new(&b"first|one\nsecond|two\n"[..], Grammar::Generic);
        assert!(reader.header().unwrap().is_empty());
        assert_eq!(reader.read().unwrap().unwrap().source(), "first");
        assert_eq!(reader.read().unwrap().unwrap().source(), "second");
        assert!(reader.read().unwrap().is_none());
    }

    #[test]
    fn leading_blank_line_means_no_header() {
        let mut reader = DumpReader::new(&b"\n#NOT: header\n"[..], Grammar::Generic);
        assert!(reader.header().unwrap().is_empty());
        assert_eq!(reader.read().unwrap().unwrap().source(), "#NOT: header");
    }

    #[test]
    fn header_ends_at_non_header_line() {
        let mut reader = DumpReader::new(&b"#A: 1\nlink|target\n"[..], Grammar::Generic);
        assert_eq!(reader.header().unwrap().len(), 1);
        assert_eq!(reader.read().unwrap().unwrap().target(), "target");
    }

    #[test]
    fn malformed_header_line() {
        let mut reader = DumpReader::new(&b"#FORMAT\nx\n"[..], Grammar::Generic);
        match reader.header() {
            Err(Error::MalformedHeader { line }) => assert_eq!(line, "#FORMAT"),
            other => panic!("expected MalformedHeader, got {other:?}"),
        }
        let mut reader = DumpReader::new(&b"#format: beacon\n"[..], Grammar::Generic);
        assert!(matches!(reader.read(), Err(Error::MalformedHeader { .. })));
    }

    #[test]
    fn byte_order_mark_is_skipped() {
        let mut reader = DumpReader::new(&b"\xEF\xBB\xBF#FORMAT: BEACON\n\na|b"[..], Grammar::Generic);
        assert_eq!(reader.header().unwrap(), &[MetaField::new("FORMAT", "BEACON")]);
        assert_eq!(reader.read().unwrap().unwrap().source(), "a");
    }

    #[test]
    fn blank_lines_skipped_by_default() {
        let reader = DumpReader::new(&b"a\n\n\nb\n"[..], Grammar::Generic);
        let sources: Vec<String> = reader.map(|r| r.unwrap().source().to_string()).collect();
        assert_eq!(sources, ["a", "b"]);
    }

    #[test]
    fn blank_lines_kept_when_configured() {
        let reader = DumpReader::new(&b"a\n\nb"[..], Grammar::Generic)
            .with_options(ReaderOptions::default().skip_blank_lines(false));
        let sources: Vec<String> = reader.map(|r| r.unwrap().source().to_string()).collect();
        assert_eq!(sources, ["a", "", "b"]);
    }

    #[test]
    fn too_many_fields_is_recoverable() {
        let mut reader = DumpReader::new(&b"a|b|c|d\ne|f\n"[..], Grammar::Generic);
        assert!(matches!(reader.read(), Err(Error::TooManyFields { .. })));
        assert_eq!(reader.read().unwrap().unwrap().source(), "e");
        assert!(reader.read().unwrap().is_none());
    }

    #[test]
    fn invalid_utf8_is_recoverable() {
        let mut reader = DumpReader::new(&b"ok|1\n\xFF\xFE|2\nok|3"[..], Grammar::Fixed { width: None });
        assert!(reader.read().unwrap().is_some());
        match reader.read() {
            Err(Error::InvalidUtf8 { line }) => assert_eq!(line, 2),
            other => panic!("expected InvalidUtf8, got {other:?}"),
        }
        assert_eq!(reader.read().unwrap().unwrap().target(), "3");
    }

    #[test]
    fn width_mismatch_warns() {
        let data = &b"AbC123|http://example.com"[..];

        let mut warnings = Vec::new();
        let mut reader =
            DumpReader::new(data, Grammar::Fixed { width: Some(6) }).with_sink(&mut warnings);
        assert_eq!(reader.read().unwrap(), Some(fixed("AbC123", "http://example.com")));
        drop(reader);
        assert!(warnings.is_empty());

        let mut reader =
            DumpReader::new(data, Grammar::Fixed { width: Some(4) }).with_sink(&mut warnings);
        assert_eq!(reader.read().unwrap(), Some(fixed("AbC123", "http://example.com")));
        drop(reader);
        assert_eq!(
            warnings,
            [Warning::ShortcodeWidth {
                line: 1,
                shortcode: "AbC123".into(),
                expected: 4,
                actual: 6,
            }]
        );
    }

    #[test]
    fn missing_separator_warns_and_keeps_line() {
        let mut warnings = Vec::new();
        let mut reader = DumpReader::new(&b"http://lonely.example/"[..], Grammar::Fixed { width: Some(3) })
            .with_sink(&mut warnings);
        assert_eq!(reader.read().unwrap(), Some(fixed("", "http://lonely.example/")));
        drop(reader);
        assert_eq!(
            warnings,
            [Warning::MissingSeparator {
                line: 1,
                text: "http://lonely.example/".into(),
            }]
        );
    }

    #[test]
    fn missing_separator_error_when_required() {
        let mut warnings = Vec::new();
        let mut reader = DumpReader::new(&b"nobar\nab|c"[..], Grammar::Fixed { width: None })
            .with_options(ReaderOptions::default().require_separator(true))
            .with_sink(&mut warnings);
        assert!(matches!(reader.read(), Err(Error::MissingSeparator { line: 1, .. })));
        assert_eq!(reader.read().unwrap(), Some(fixed("ab", "c")));
        drop(reader);
        assert!(warnings.is_empty());
    }

    #[test]
    fn empty_stream_has_no_header_or_records() {
        let mut reader = DumpReader::new(&b""[..], Grammar::Generic);
        assert!(reader.header().unwrap().is_empty());
        assert!(reader.read().unwrap().is_none());
    }
}
