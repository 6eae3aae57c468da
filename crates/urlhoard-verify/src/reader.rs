use std::io::{self, Read};

use crate::{Algorithm, Crc32Hasher, DigestSet, Hasher, Md5Hasher, Result, Sha1Hasher, VerifyError};

/// Streaming reader that hashes data as it passes through and checks the
/// expected digests once the source reports end of stream.
///
/// A mismatch replaces the final `Ok(0)` with an `InvalidData` error
/// wrapping [`VerifyError::ChecksumMismatch`]. A caller that stops reading
/// early never sees a verdict. With an empty [`DigestSet`] nothing is
/// hashed.
pub struct ValidatingReader<R> {
    reader: R,
    expected: DigestSet,
    md5: Option<Md5Hasher>,
    sha1: Option<Sha1Hasher>,
    crc32: Option<Crc32Hasher>,
    bytes: u64,
    verdict: Option<Verdict>,
}

#[derive(Clone, Debug)]
enum Verdict {
    Valid,
    Mismatch {
        algorithm: Algorithm,
        actual: Vec<u8>,
        expected: Vec<u8>,
    },
}

impl Verdict {
    fn to_error(&self) -> Option<VerifyError> {
        match self {
            Verdict::Valid => None,
            Verdict::Mismatch {
                algorithm,
                actual,
                expected,
            } => Some(VerifyError::ChecksumMismatch {
                algorithm: *algorithm,
                actual: actual.clone(),
                expected: expected.clone(),
            }),
        }
    }
}

impl<R> ValidatingReader<R> {
    pub fn new(reader: R, expected: DigestSet) -> Self {
        let md5 = expected.get(Algorithm::Md5).map(|_| Md5Hasher::new());
        let sha1 = expected.get(Algorithm::Sha1).map(|_| Sha1Hasher::new());
        let crc32 = expected.get(Algorithm::Crc32).map(|_| Crc32Hasher::new());
        Self {
            reader,
            expected,
            md5,
            sha1,
            crc32,
            bytes: 0,
            verdict: None,
        }
    }

    pub fn expected(&self) -> &DigestSet {
        &self.expected
    }

    /// Bytes delivered to the caller so far.
    pub fn bytes_read(&self) -> u64 {
        self.bytes
    }

    /// Whether end of stream has been reached and the digests checked.
    pub fn is_checked(&self) -> bool {
        self.verdict.is_some()
    }

    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    fn update(&mut self, data: &[u8]) {
        if let Some(h) = &mut self.md5 {
            h.update(data);
        }
        if let Some(h) = &mut self.sha1 {
            h.update(data);
        }
        if let Some(h) = &mut self.crc32 {
            h.update(data);
        }
    }

    fn check(&mut self) -> Verdict {
        let computed = [
            (Algorithm::Md5, self.md5.take().map(Hasher::finalize)),
            (Algorithm::Sha1, self.sha1.take().map(Hasher::finalize)),
            (Algorithm::Crc32, self.crc32.take().map(Hasher::finalize)),
        ];
        for (algorithm, actual) in computed {
            let (Some(actual), Some(expected)) = (actual, self.expected.get(algorithm)) else {
                continue;
            };
            if actual != expected {
                return Verdict::Mismatch {
                    algorithm,
                    actual,
                    expected: expected.to_vec(),
                };
            }
        }
        Verdict::Valid
    }
}

impl<R: Read> ValidatingReader<R> {
    /// Read the rest of the stream and return the verdict.
    pub fn finish(mut self) -> Result<u64> {
        io::copy(&mut self, &mut io::sink())?;
        Ok(self.bytes)
    }
}

impl<R: Read> Read for ValidatingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if let Some(verdict) = &self.verdict {
            return match verdict.to_error() {
                Some(err) => Err(err.into_io()),
                None => Ok(0),
            };
        }
        let n = self.reader.read(buf)?;
        if n > 0 {
            self.update(&buf[..n]);
            self.bytes += n as u64;
            return Ok(n);
        }
        if buf.is_empty() {
            return Ok(0);
        }

        let verdict = self.check();
        let err = verdict.to_error();
        if let Some(VerifyError::ChecksumMismatch {
            algorithm,
            actual,
            expected,
        }) = &err
        {
            tracing::debug!(
                %algorithm,
                actual = %hex::encode(actual),
                expected = %hex::encode(expected),
                bytes = self.bytes,
                "checksum mismatch at end of stream"
            );
        }
        self.verdict = Some(verdict);
        match err {
            Some(err) => Err(err.into_io()),
            None => Ok(0),
        }
    }
}
