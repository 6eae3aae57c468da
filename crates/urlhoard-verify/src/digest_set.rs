use std::fmt;

use crate::{Result, VerifyError};

/// Digest algorithms recorded by archive listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    Md5,
    Sha1,
    Crc32,
}

impl Algorithm {
    /// Checked in this order; the first mismatch wins.
    pub const ALL: [Algorithm; 3] = [Algorithm::Md5, Algorithm::Sha1, Algorithm::Crc32];

    /// Digest length in bytes.
    pub fn digest_length(&self) -> usize {
        match self {
            Algorithm::Md5 => 16,
            Algorithm::Sha1 => 20,
            Algorithm::Crc32 => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::Md5 => "MD5",
            Algorithm::Sha1 => "SHA1",
            Algorithm::Crc32 => "CRC32",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Expected digests for one file. Absent digests are not checked.
///
/// CRC-32 values are stored big-endian, the way listings print them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DigestSet {
    md5: Option<[u8; 16]>,
    sha1: Option<[u8; 20]>,
    crc32: Option<[u8; 4]>,
}

impl DigestSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_md5(mut self, digest: [u8; 16]) -> Self {
        self.md5 = Some(digest);
        self
    }

    pub fn with_sha1(mut self, digest: [u8; 20]) -> Self {
        self.sha1 = Some(digest);
        self
    }

    pub fn with_crc32(mut self, crc: u32) -> Self {
        self.crc32 = Some(crc.to_be_bytes());
        self
    }

    /// Set a digest from raw bytes. Empty input leaves the slot unset.
    pub fn set(&mut self, algorithm: Algorithm, digest: &[u8]) -> Result<()> {
        if digest.is_empty() {
            return Ok(());
        }
        let invalid = || VerifyError::InvalidDigestLength {
            algorithm,
            expected: algorithm.digest_length(),
            actual: digest.len(),
        };
        match algorithm {
            Algorithm::Md5 => self.md5 = Some(digest.try_into().map_err(|_| invalid())?),
            Algorithm::Sha1 => self.sha1 = Some(digest.try_into().map_err(|_| invalid())?),
            Algorithm::Crc32 => self.crc32 = Some(digest.try_into().map_err(|_| invalid())?),
        }
        Ok(())
    }

    /// Set a digest from its hex form. Blank input leaves the slot unset.
    pub fn set_hex(&mut self, algorithm: Algorithm, digest: &str) -> Result<()> {
        let digest = digest.trim();
        if digest.is_empty() {
            return Ok(());
        }
        self.set(algorithm, &hex::decode(digest)?)
    }

    pub fn from_hex(algorithm: Algorithm, digest: &str) -> Result<Self> {
        let mut set = Self::new();
        set.set_hex(algorithm, digest)?;
        Ok(set)
    }

    pub fn get(&self, algorithm: Algorithm) -> Option<&[u8]> {
        match algorithm {
            Algorithm::Md5 => self.md5.as_ref().map(|d| &d[..]),
            Algorithm::Sha1 => self.sha1.as_ref().map(|d| &d[..]),
            Algorithm::Crc32 => self.crc32.as_ref().map(|d| &d[..]),
        }
    }

    /// Configured digests in checking order.
    pub fn iter(&self) -> impl Iterator<Item = (Algorithm, &[u8])> + '_ {
        Algorithm::ALL
            .into_iter()
            .filter_map(|algorithm| self.get(algorithm).map(|d| (algorithm, d)))
    }

    pub fn is_empty(&self) -> bool {
        self.md5.is_none() && self.sha1.is_none() && self.crc32.is_none()
    }

    /// Fill in every digest `other` has, overriding ours.
    pub fn merge(&mut self, other: &DigestSet) {
        self.md5 = other.md5.or(self.md5);
        self.sha1 = other.sha1.or(self.sha1);
        self.crc32 = other.crc32.or(self.crc32);
    }
}
