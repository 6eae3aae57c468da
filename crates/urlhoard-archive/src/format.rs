use std::fmt;
use std::io::{self, Read};

/// Compression codec of a release member.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Compression {
    Xz,
    Gzip,
}

impl Compression {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Xz => "xz",
            Self::Gzip => "gz",
        }
    }

    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "xz" => Some(Self::Xz),
            "gz" => Some(Self::Gzip),
            _ => None,
        }
    }

    /// Create a decoder for this codec.
    ///
    /// Returns `None` when the codec was compiled out. Both decoders accept
    /// concatenated streams and read their input to the end.
    pub fn decoder<R: Read>(self, reader: R) -> Option<Decoder<R>> {
        match self {
            Self::Xz => Some(Decoder::Xz(Box::new(
                xz2::read::XzDecoder::new_multi_decoder(reader),
            ))),
            #[cfg(feature = "gzip")]
            Self::Gzip => Some(Decoder::Gzip(Box::new(
                flate2::read::MultiGzDecoder::new(reader),
            ))),
            #[cfg(not(feature = "gzip"))]
            Self::Gzip => None,
        }
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Xz => "xz",
            Self::Gzip => "gzip",
        })
    }
}

/// Decompressing reader over a member's raw bytes.
pub enum Decoder<R: Read> {
    Xz(Box<xz2::read::XzDecoder<R>>),
    #[cfg(feature = "gzip")]
    Gzip(Box<flate2::read::MultiGzDecoder<R>>),
}

impl<R: Read> Decoder<R> {
    /// Give back the compressed stream, e.g. to drain what the decoder left.
    pub fn into_inner(self) -> R {
        match self {
            Self::Xz(d) => d.into_inner(),
            #[cfg(feature = "gzip")]
            Self::Gzip(d) => d.into_inner(),
        }
    }
}

impl<R: Read> Read for Decoder<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::Xz(d) => d.read(buf),
            #[cfg(feature = "gzip")]
            Self::Gzip(d) => d.read(buf),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    fn xz(data: &[u8]) -> Vec<u8> {
        let mut encoder = xz2::write::XzEncoder::new(Vec::new(), 6);
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn extension_round_trip() {
        for compression in [Compression::Xz, Compression::Gzip] {
            assert_eq!(
                Compression::from_extension(compression.extension()),
                Some(compression)
            );
        }
        assert_eq!(Compression::from_extension("zst"), None);
    }

    #[test]
    fn xz_decoder_reads_concatenated_streams() {
        let mut data = xz(b"abc|https://a/\n");
        data.extend(xz(b"abd|https://b/\n"));

        let mut decoder = Compression::Xz.decoder(Cursor::new(data)).unwrap();
        let mut out = String::new();
        decoder.read_to_string(&mut out).unwrap();
        assert_eq!(out, "abc|https://a/\nabd|https://b/\n");
    }

    #[test]
    fn into_inner_returns_source_at_end() {
        let data = xz(b"hello");
        let len = data.len() as u64;
        let mut decoder = Compression::Xz.decoder(Cursor::new(data)).unwrap();
        io::copy(&mut decoder, &mut io::sink()).unwrap();
        assert_eq!(decoder.into_inner().position(), len);
    }

    #[test]
    #[cfg(feature = "gzip")]
    fn gzip_decoder() {
        let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(b"abc|https://a/\n").unwrap();
        let data = encoder.finish().unwrap();

        let mut decoder = Compression::Gzip.decoder(&data[..]).unwrap();
        assert!(matches!(decoder, Decoder::Gzip(_)));
        let mut out = String::new();
        decoder.read_to_string(&mut out).unwrap();
        assert_eq!(out, "abc|https://a/\n");
    }

    #[test]
    #[cfg(not(feature = "gzip"))]
    fn gzip_unsupported() {
        assert!(Compression::Gzip.decoder(&b""[..]).is_none());
    }
}
