use std::io::{self, BufRead};

const BOM: &[u8] = b"\xEF\xBB\xBF";

/// Splits a buffered stream into lines terminated by LF, CRLF, or CR.
///
/// The last line is returned even without a terminator. A UTF-8 byte-order
/// mark is dropped only at the very start of the stream.
pub(crate) struct Lines<R> {
    inner: R,
    buf: Vec<u8>,
    number: u64,
    pending_cr: bool,
}

impl<R: BufRead> Lines<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: Vec::new(),
            number: 0,
            pending_cr: false,
        }
    }

    /// Advance to the next line. Returns `false` at end of stream.
    pub fn read_line(&mut self) -> io::Result<bool> {
        self.buf.clear();
        let mut terminated = false;
        loop {
            let available = match self.inner.fill_buf() {
                Ok(buf) => buf,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            if available.is_empty() {
                break;
            }
            if self.pending_cr {
                self.pending_cr = false;
                if available[0] == b'\n' {
                    self.inner.consume(1);
                    continue;
                }
            }
            match available.iter().position(|&b| b == b'\n' || b == b'\r') {
                Some(i) => {
                    self.buf.extend_from_slice(&available[..i]);
                    self.pending_cr = available[i] == b'\r';
                    self.inner.consume(i + 1);
                    terminated = true;
                    break;
                }
                None => {
                    let n = available.len();
                    self.buf.extend_from_slice(available);
                    self.inner.consume(n);
                }
            }
        }

        if !terminated && self.buf.is_empty() {
            return Ok(false);
        }
        self.number += 1;
        if self.number == 1 && self.buf.starts_with(BOM) {
            self.buf.drain(..BOM.len());
        }
        Ok(true)
    }

    /// The most recently read line, without its terminator.
    pub fn line(&self) -> &[u8] {
        &self.buf
    }

    /// 1-based number of the most recently read line.
    pub fn number(&self) -> u64 {
        self.number
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}
