//! Fetched responses.
//!
//! A [`Response`] is immutable once built. Stages that need to change one
//! (decoding stages, rewriters) go through [`Response::replace`], which
//! copies every field into a builder and produces a new instance with the
//! chosen overrides, so callers never observe partial state.

use crate::{Error, HeaderMap, ResponseKind, Result, classify};
use bytes::Bytes;
use http::StatusCode;
use serde::de::DeserializeOwned;
use url::Url;

/// A fetched HTTP response.
#[derive(Debug, Clone)]
pub struct Response {
    url: Url,
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
    kind: ResponseKind,
    charset: Option<String>,
}

impl Response {
    /// Create a response, classifying its kind and declared charset from
    /// the headers, URL, and body.
    pub fn new(url: Url, status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        let body = body.into();
        let (kind, charset) = classify(&headers, &url, &body);
        Self {
            url,
            status,
            headers,
            body,
            kind,
            charset,
        }
    }

    /// Final URL of the response.
    #[inline]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// HTTP status.
    #[inline]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Whether the status is 2xx.
    #[inline]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Response headers.
    #[inline]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Response body bytes.
    #[inline]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Concrete kind of content the body holds.
    #[inline]
    pub fn kind(&self) -> ResponseKind {
        self.kind
    }

    /// Charset of a text-bearing body. `None` means unresolved: the
    /// consumer must sniff it from the decoded bytes.
    #[inline]
    pub fn charset(&self) -> Option<&str> {
        self.charset.as_deref()
    }

    /// Body as UTF-8 text. Fails for non-text kinds and invalid UTF-8.
    pub fn text(&self) -> Result<String> {
        if !self.kind.is_text() {
            return Err(Error::DecodeBody(format!(
                "{} response for {} has no text body",
                self.kind, self.url
            )));
        }
        let text = std::str::from_utf8(&self.body)
            .map_err(|e| Error::DecodeBody(format!("body is not valid UTF-8: {e}")))?;
        Ok(text.to_owned())
    }

    /// Body parsed as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|e| Error::Json(e.to_string()))
    }

    /// Begin a copy of this response with some fields replaced.
    ///
    /// Fields not overridden keep their current values; the original
    /// response is untouched.
    pub fn replace(&self) -> ResponseBuilder {
        ResponseBuilder {
            url: self.url.clone(),
            status: self.status,
            headers: self.headers.clone(),
            body: self.body.clone(),
            kind: self.kind,
            charset: self.charset.clone(),
        }
    }
}

/// Builder returned by [`Response::replace`].
#[derive(Debug)]
pub struct ResponseBuilder {
    url: Url,
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
    kind: ResponseKind,
    charset: Option<String>,
}

impl ResponseBuilder {
    /// Replace the body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Replace the header map.
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Replace the content kind.
    pub fn kind(mut self, kind: ResponseKind) -> Self {
        self.kind = kind;
        self
    }

    /// Replace the charset (`None` marks it unresolved).
    pub fn charset(mut self, charset: Option<String>) -> Self {
        self.charset = charset;
        self
    }

    /// Produce the new response.
    pub fn build(self) -> Response {
        Response {
            url: self.url,
            status: self.status,
            headers: self.headers,
            body: self.body,
            kind: self.kind,
            charset: self.charset,
        }
    }
}
