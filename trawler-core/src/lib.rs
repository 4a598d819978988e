//! # Trawler Core
//!
//! Pipeline primitives for the trawler crawling toolkit: request and
//! response types, a case-insensitive header multi-map, response
//! classification, and the download-middleware chain every fetch passes
//! through.
//!
//! A fetch layer produces a [`Response`] and hands it to a
//! [`DownloadPipeline`]; middlewares annotate outbound [`Request`]s and
//! transform inbound responses by building replacements with
//! [`Response::replace`]. The [`classify`] function is the single policy
//! for deciding what kind of content a body holds.
//!
//! ```
//! use trawler_core::{HeaderMap, Response, ResponseKind, StatusCode, Url};
//!
//! let mut headers = HeaderMap::new();
//! headers.insert("Content-Type", "text/html; charset=utf-8");
//! let response = Response::new(
//!     Url::parse("http://example.com/").unwrap(),
//!     StatusCode::OK,
//!     headers,
//!     &b"<html></html>"[..],
//! );
//! assert_eq!(response.kind(), ResponseKind::Html);
//! ```

pub mod classify;
pub mod error;
pub mod headers;
pub mod middleware;
pub mod request;
pub mod response;

pub use classify::{ResponseKind, classify};
pub use error::{Error, Result};
pub use headers::HeaderMap;
pub use middleware::{DownloadMiddleware, DownloadPipeline, Downloaded, FetchFn};
pub use request::Request;
pub use response::{Response, ResponseBuilder};

// Re-export the wire types used throughout the API
pub use bytes::Bytes;
pub use http::{Method, StatusCode};
pub use url::Url;

/// Prelude for common imports.
pub mod prelude {
    pub use crate::classify::{ResponseKind, classify};
    pub use crate::error::{Error, Result};
    pub use crate::headers::HeaderMap;
    pub use crate::middleware::{DownloadMiddleware, DownloadPipeline, Downloaded, FetchFn};
    pub use crate::request::Request;
    pub use crate::response::{Response, ResponseBuilder};
    pub use crate::{Bytes, Method, StatusCode, Url};
}
