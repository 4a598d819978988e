//! Error types for response decompression.

use thiserror::Error;
use url::Url;

/// Errors surfaced while decoding a response body.
///
/// Unknown `Content-Encoding` tokens are not errors: the body passes
/// through for a later stage to deal with.
#[derive(Error, Debug)]
pub enum DecompressionError {
    /// The decoded body exceeds the configured size ceiling. The response
    /// carrying it is dropped before anything reaches downstream stages.
    #[error(
        "uncompressed response size {size} for {url} is larger than the configured limit ({limit})"
    )]
    ResponseTooLarge {
        /// URL of the dropped response.
        url: Url,
        /// Decoded body size in bytes.
        size: usize,
        /// Configured ceiling in bytes.
        limit: usize,
    },

    /// The body does not hold a valid stream for its declared coding, even
    /// after the raw-deflate retry.
    #[error("malformed {encoding} stream: {source}")]
    Decode {
        /// The coding that failed to decode.
        encoding: &'static str,
        /// The underlying decoder error.
        #[source]
        source: std::io::Error,
    },
}

impl DecompressionError {
    pub(crate) fn decode(encoding: &'static str, source: std::io::Error) -> Self {
        Self::Decode { encoding, source }
    }
}
