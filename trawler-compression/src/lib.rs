//! # Trawler Compression
//!
//! Response decompression for the trawler crawl pipeline. The middleware
//! advertises the codings this build can decode on outbound requests,
//! transparently decodes compressed response bodies, reclassifies each
//! response once its real bytes are known, and drops responses that
//! inflate past a configured ceiling.
//!
//! # Features
//!
//! - `brotli` - decode `br` bodies and advertise `br` (enabled by default).
//!   Without it the accepted set is just gzip and deflate, and `br` bodies
//!   pass through untouched.
//!
//! # Example
//!
//! ```rust,no_run
//! use trawler_compression::{DecompressionConfig, HttpDecompressionMiddleware};
//! use trawler_core::DownloadPipeline;
//!
//! // Default: no size ceiling
//! let pipeline = DownloadPipeline::new().with_middleware(HttpDecompressionMiddleware::new());
//!
//! // Or cap decoded bodies at 10 MiB
//! let config = DecompressionConfig::builder()
//!     .max_decompressed_size(10 * 1024 * 1024)
//!     .build();
//! let middleware = HttpDecompressionMiddleware::with_config(config);
//! ```
//!
//! # One layer per pass
//!
//! `Content-Encoding` may stack codings (`gzip, br` means gzip first, then
//! brotli over the result). Each pass through the middleware peels exactly
//! one layer, the most recently applied one, and leaves the remaining
//! tokens in the header, so a pipeline can run the stage once per layer or
//! register it multiple times. A response with no `Content-Encoding` is
//! returned unchanged.

mod config;
mod encoding;
mod error;
mod middleware;

pub use config::{DecompressionConfig, DecompressionConfigBuilder};
pub use encoding::{ACCEPTED_ENCODINGS, ContentEncoding, accept_encoding};
pub use error::DecompressionError;
pub use middleware::HttpDecompressionMiddleware;

/// Result type for decompression operations.
pub type Result<T> = std::result::Result<T, DecompressionError>;
