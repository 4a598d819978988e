//! Content codings and their single-layer decoders.

use crate::{DecompressionError, Result};
use std::fmt;
use std::io::Read;
use std::sync::OnceLock;

/// A content coding this build can decode.
///
/// Gzip and deflate are always available. Brotli is compiled in behind the
/// `brotli` feature; without it the variant does not exist, `br` parses to
/// `None`, and the token drops out of [`ACCEPTED_ENCODINGS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentEncoding {
    /// RFC 1952 gzip framing.
    Gzip,
    /// RFC 1950 zlib framing, with a raw RFC 1951 fallback.
    Deflate,
    /// Brotli.
    #[cfg(feature = "brotli")]
    Brotli,
}

/// The codings advertised on outbound requests, in registration order.
#[cfg(feature = "brotli")]
pub const ACCEPTED_ENCODINGS: &[ContentEncoding] = &[
    ContentEncoding::Gzip,
    ContentEncoding::Deflate,
    ContentEncoding::Brotli,
];

/// The codings advertised on outbound requests, in registration order.
#[cfg(not(feature = "brotli"))]
pub const ACCEPTED_ENCODINGS: &[ContentEncoding] =
    &[ContentEncoding::Gzip, ContentEncoding::Deflate];

/// The `Accept-Encoding` value derived from [`ACCEPTED_ENCODINGS`]: the
/// tokens joined with `", "`. Built once, immutable afterwards.
pub fn accept_encoding() -> &'static str {
    static VALUE: OnceLock<String> = OnceLock::new();
    VALUE.get_or_init(|| {
        ACCEPTED_ENCODINGS
            .iter()
            .map(|encoding| encoding.token())
            .collect::<Vec<_>>()
            .join(", ")
    })
}

impl ContentEncoding {
    /// Wire token for this coding.
    pub fn token(&self) -> &'static str {
        match self {
            Self::Gzip => "gzip",
            Self::Deflate => "deflate",
            #[cfg(feature = "brotli")]
            Self::Brotli => "br",
        }
    }

    /// Parse a `Content-Encoding` token, ASCII case-insensitively.
    ///
    /// `x-gzip` is accepted as an alias for gzip. Returns `None` for any
    /// coding this build cannot decode, including `br` when the `brotli`
    /// feature is off.
    pub fn from_token(token: &str) -> Option<Self> {
        let token = token.trim();
        if token.eq_ignore_ascii_case("gzip") || token.eq_ignore_ascii_case("x-gzip") {
            return Some(Self::Gzip);
        }
        if token.eq_ignore_ascii_case("deflate") {
            return Some(Self::Deflate);
        }
        #[cfg(feature = "brotli")]
        if token.eq_ignore_ascii_case("br") {
            return Some(Self::Brotli);
        }
        None
    }

    /// Decode one layer of this coding.
    pub fn decode(&self, data: &[u8]) -> Result<Vec<u8>> {
        match self {
            Self::Gzip => decode_gzip(data),
            Self::Deflate => decode_deflate(data),
            #[cfg(feature = "brotli")]
            Self::Brotli => decode_brotli(data),
        }
    }
}

impl fmt::Display for ContentEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

fn decode_gzip(data: &[u8]) -> Result<Vec<u8>> {
    let mut decoded = Vec::new();
    flate2::read::GzDecoder::new(data)
        .read_to_end(&mut decoded)
        .map_err(|e| DecompressionError::decode("gzip", e))?;
    Ok(decoded)
}

// Standard zlib-wrapped inflate first; some servers send headerless raw
// RFC 1951 streams, so a failed first attempt is retried raw before the
// error is surfaced.
fn decode_deflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut decoded = Vec::new();
    if flate2::read::ZlibDecoder::new(data)
        .read_to_end(&mut decoded)
        .is_ok()
    {
        return Ok(decoded);
    }

    decoded.clear();
    flate2::read::DeflateDecoder::new(data)
        .read_to_end(&mut decoded)
        .map_err(|e| DecompressionError::decode("deflate", e))?;
    Ok(decoded)
}

#[cfg(feature = "brotli")]
fn decode_brotli(data: &[u8]) -> Result<Vec<u8>> {
    let mut decoded = Vec::new();
    brotli::BrotliDecompress(&mut std::io::Cursor::new(data), &mut decoded)
        .map_err(|e| DecompressionError::decode("br", e))?;
    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut encoder =
            flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    fn zlib(data: &[u8]) -> Vec<u8> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    fn raw_deflate(data: &[u8]) -> Vec<u8> {
        let mut encoder =
            flate2::write::DeflateEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn token_parsing_is_case_insensitive() {
        assert_eq!(ContentEncoding::from_token("gzip"), Some(ContentEncoding::Gzip));
        assert_eq!(ContentEncoding::from_token("GZIP"), Some(ContentEncoding::Gzip));
        assert_eq!(ContentEncoding::from_token("x-gzip"), Some(ContentEncoding::Gzip));
        assert_eq!(ContentEncoding::from_token("X-Gzip"), Some(ContentEncoding::Gzip));
        assert_eq!(
            ContentEncoding::from_token(" Deflate "),
            Some(ContentEncoding::Deflate)
        );
        assert_eq!(ContentEncoding::from_token("zstd"), None);
        assert_eq!(ContentEncoding::from_token("identity"), None);
    }

    #[cfg(feature = "brotli")]
    #[test]
    fn brotli_token_parses_when_compiled_in() {
        assert_eq!(ContentEncoding::from_token("br"), Some(ContentEncoding::Brotli));
        assert_eq!(ContentEncoding::from_token("BR"), Some(ContentEncoding::Brotli));
    }

    #[cfg(not(feature = "brotli"))]
    #[test]
    fn brotli_token_is_unknown_without_the_feature() {
        assert_eq!(ContentEncoding::from_token("br"), None);
    }

    #[test]
    fn accept_encoding_joins_tokens_in_order() {
        #[cfg(feature = "brotli")]
        assert_eq!(accept_encoding(), "gzip, deflate, br");
        #[cfg(not(feature = "brotli"))]
        assert_eq!(accept_encoding(), "gzip, deflate");
    }

    #[test]
    fn gzip_round_trip() {
        let data = b"Hello, World! Hello, World! Hello, World!";
        let decoded = ContentEncoding::Gzip.decode(&gzip(data)).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn deflate_decodes_zlib_framing() {
        let data = b"zlib wrapped payload";
        let decoded = ContentEncoding::Deflate.decode(&zlib(data)).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn deflate_falls_back_to_raw_streams() {
        let data = b"headerless deflate payload";
        let decoded = ContentEncoding::Deflate.decode(&raw_deflate(data)).unwrap();
        assert_eq!(decoded, data);
    }

    #[cfg(feature = "brotli")]
    #[test]
    fn brotli_round_trip() {
        let data = b"brotli payload brotli payload";
        let mut compressed = Vec::new();
        let params = brotli::enc::BrotliEncoderParams::default();
        brotli::BrotliCompress(&mut std::io::Cursor::new(&data[..]), &mut compressed, &params)
            .unwrap();

        let decoded = ContentEncoding::Brotli.decode(&compressed).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn malformed_gzip_is_an_error() {
        let err = ContentEncoding::Gzip
            .decode(b"definitely not gzip")
            .unwrap_err();
        match err {
            DecompressionError::Decode { encoding, .. } => assert_eq!(encoding, "gzip"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn malformed_deflate_fails_after_both_framings() {
        let err = ContentEncoding::Deflate
            .decode(b"\x00garbage that is neither zlib nor raw deflate\xff\xff\xff")
            .unwrap_err();
        match err {
            DecompressionError::Decode { encoding, .. } => assert_eq!(encoding, "deflate"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
