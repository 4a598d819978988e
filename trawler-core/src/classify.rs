//! Response classification.
//!
//! Derives the concrete kind of content a response carries from its
//! headers, URL, and body. The fetch layer applies this to every fresh
//! response, and decoding stages re-apply it once a body's true bytes are
//! known.

use crate::HeaderMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// The concrete kind of content a response body holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseKind {
    /// An HTML document.
    Html,
    /// An XML document (including feeds).
    Xml,
    /// A JSON document.
    Json,
    /// Some other text format.
    Text,
    /// Anything that is not text.
    Binary,
}

impl ResponseKind {
    /// Whether this kind carries text and therefore has a charset.
    #[inline]
    pub fn is_text(&self) -> bool {
        !matches!(self, Self::Binary)
    }
}

impl fmt::Display for ResponseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Html => "html",
            Self::Xml => "xml",
            Self::Json => "json",
            Self::Text => "text",
            Self::Binary => "binary",
        };
        f.write_str(name)
    }
}

/// Classify a response from its headers, URL, and body bytes.
///
/// Resolution order: `Content-Type` header, `Content-Disposition`
/// filename, URL path extension, then body sniffing. The returned charset
/// is the one declared in `Content-Type`, only kept for text-bearing
/// kinds; `None` means the charset is unresolved and must be sniffed from
/// the body.
pub fn classify(headers: &HeaderMap, url: &Url, body: &[u8]) -> (ResponseKind, Option<String>) {
    if let Some(content_type) = headers.content_type() {
        let (kind, charset) = from_content_type(content_type);
        let charset = if kind.is_text() { charset } else { None };
        return (kind, charset);
    }
    if let Some(kind) = headers.content_disposition().and_then(from_content_disposition) {
        return (kind, None);
    }
    if let Some(kind) = from_extension(url.path()) {
        return (kind, None);
    }
    (sniff(body), None)
}

/// Map a `Content-Type` value to a kind and its declared charset.
fn from_content_type(value: &str) -> (ResponseKind, Option<String>) {
    let mut parts = value.split(';');
    let mime = parts
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    let charset = parts.find_map(|param| {
        let (name, value) = param.split_once('=')?;
        if name.trim().eq_ignore_ascii_case("charset") {
            Some(value.trim().trim_matches('"').to_string())
        } else {
            None
        }
    });

    let kind = match mime.as_str() {
        "text/html" | "application/xhtml+xml" => ResponseKind::Html,
        "application/json" => ResponseKind::Json,
        "text/xml" | "application/xml" => ResponseKind::Xml,
        m if m.ends_with("+json") => ResponseKind::Json,
        m if m.ends_with("+xml") => ResponseKind::Xml,
        m if m.starts_with("text/") => ResponseKind::Text,
        _ => ResponseKind::Binary,
    };
    (kind, charset)
}

/// Classify from a `Content-Disposition` filename, when one is present.
fn from_content_disposition(value: &str) -> Option<ResponseKind> {
    let filename = value.split(';').find_map(|param| {
        let (name, value) = param.split_once('=')?;
        name.trim()
            .eq_ignore_ascii_case("filename")
            .then(|| value.trim().trim_matches('"'))
    })?;
    from_extension(filename)
}

/// Classify from a path's file extension.
fn from_extension(path: &str) -> Option<ResponseKind> {
    let (_, extension) = path.rsplit_once('.')?;
    match extension.to_ascii_lowercase().as_str() {
        "html" | "htm" | "xhtml" => Some(ResponseKind::Html),
        "xml" => Some(ResponseKind::Xml),
        "json" => Some(ResponseKind::Json),
        "txt" => Some(ResponseKind::Text),
        _ => None,
    }
}

/// Last resort: look at the bytes themselves.
fn sniff(body: &[u8]) -> ResponseKind {
    let head = body[..body.len().min(1024)].trim_ascii_start();
    if starts_with_ignore_case(head, b"<!doctype html") || starts_with_ignore_case(head, b"<html") {
        return ResponseKind::Html;
    }
    if !body.contains(&0) && std::str::from_utf8(body).is_ok() {
        ResponseKind::Text
    } else {
        ResponseKind::Binary
    }
}

fn starts_with_ignore_case(data: &[u8], prefix: &[u8]) -> bool {
    data.len() >= prefix.len() && data[..prefix.len()].eq_ignore_ascii_case(prefix)
}
