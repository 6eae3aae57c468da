use digest::Digest;

/// Incremental hash computation.
pub trait Hasher: Send {
    fn update(&mut self, data: &[u8]);
    fn finalize(self) -> Vec<u8>;
}

/// Adapter for any RustCrypto [`Digest`].
pub struct DigestHasher<D>(D);

impl<D: Digest + Send> Hasher for DigestHasher<D> {
    fn update(&mut self, data: &[u8]) { Digest::update(&mut self.0, data); }
    fn finalize(self) -> Vec<u8> { self.0.finalize().to_vec() }
}

impl<D: Digest> Default for DigestHasher<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Digest> DigestHasher<D> {
    pub fn new() -> Self { Self(D::new()) }

    pub fn digest(data: &[u8]) -> Vec<u8> { D::digest(data).to_vec() }
}

pub type Md5Hasher = DigestHasher<md5::Md5>;

pub type Sha1Hasher = DigestHasher<sha1::Sha1>;

/// IEEE CRC-32, finalized big-endian.
#[derive(Default)]
pub struct Crc32Hasher(crc32fast::Hasher);

impl Hasher for Crc32Hasher {
    fn update(&mut self, data: &[u8]) { self.0.update(data); }
    fn finalize(self) -> Vec<u8> { self.0.finalize().to_be_bytes().to_vec() }
}

impl Crc32Hasher {
    pub fn new() -> Self { Self(crc32fast::Hasher::new()) }

    pub fn digest(data: &[u8]) -> Vec<u8> { crc32fast::hash(data).to_be_bytes().to_vec() }
}
