//! Response decompression middleware.

use crate::{ContentEncoding, DecompressionConfig, DecompressionError, accept_encoding};
use async_trait::async_trait;
use bytes::Bytes;
use http::Method;
use trawler_core::{DownloadMiddleware, Downloaded, Error, Request, Response, classify};

/// Decodes compressed response bodies on their way through the pipeline.
///
/// On the request side the middleware advertises the codings this build
/// accepts via `Accept-Encoding`, unless the caller already set one. On
/// the response side it peels one `Content-Encoding` layer per pass,
/// enforces the configured size ceiling, and reclassifies the response
/// from its decoded bytes.
///
/// # Example
///
/// ```rust,no_run
/// use trawler_compression::{DecompressionConfig, HttpDecompressionMiddleware};
///
/// let middleware = HttpDecompressionMiddleware::with_config(
///     DecompressionConfig::builder()
///         .max_decompressed_size(10 * 1024 * 1024)
///         .build(),
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct HttpDecompressionMiddleware {
    config: DecompressionConfig,
}

impl HttpDecompressionMiddleware {
    /// Create the middleware with default settings (no size ceiling).
    pub fn new() -> Self {
        Self {
            config: DecompressionConfig::default(),
        }
    }

    /// Create the middleware with custom configuration.
    pub fn with_config(config: DecompressionConfig) -> Self {
        Self { config }
    }

    /// Build from configuration, refusing installation when the stage is
    /// disabled.
    pub fn from_config(config: &DecompressionConfig) -> trawler_core::Result<Self> {
        if !config.enabled {
            return Err(Error::NotConfigured(
                "response decompression is disabled".to_string(),
            ));
        }
        Ok(Self::with_config(config.clone()))
    }

    /// Get a reference to the configuration.
    pub fn config(&self) -> &DecompressionConfig {
        &self.config
    }

    /// Peel one `Content-Encoding` layer off a response.
    ///
    /// The most recently applied coding (the last token) is decoded;
    /// remaining tokens stay in the header for a later pass, and the
    /// header disappears once every layer is gone. `HEAD` responses and
    /// responses without a `Content-Encoding` header come back unchanged.
    /// The kind and charset of the replacement are recomputed from the
    /// decoded bytes; a text charset guessed from the compressed body
    /// would be stale, so it is reset and sniffed again downstream.
    pub fn decode_response(
        &self,
        request: &Request,
        response: Response,
    ) -> crate::Result<Response> {
        if request.method() == Method::HEAD {
            return Ok(response);
        }

        let mut encodings = response.headers().get_comma_list("Content-Encoding");
        let Some(token) = encodings.pop() else {
            return Ok(response);
        };

        let body: Bytes = match ContentEncoding::from_token(&token) {
            Some(encoding) => encoding.decode(response.body())?.into(),
            // Unknown codings (and br without the codec compiled in) pass
            // through for another stage or the consumer.
            None => response.body().clone(),
        };

        let limit = self.config.max_decompressed_size;
        if limit > 0 && body.len() > limit {
            tracing::error!(
                url = %response.url(),
                size = body.len(),
                limit,
                "dropping response: uncompressed size over the configured limit"
            );
            return Err(DecompressionError::ResponseTooLarge {
                url: response.url().clone(),
                size: body.len(),
                limit,
            });
        }

        let mut headers = response.headers().clone();
        headers.remove_all("Content-Encoding");
        if !encodings.is_empty() {
            headers.insert("Content-Encoding", encodings.join(", "));
        }

        let (kind, _) = classify(&headers, response.url(), &body);
        Ok(response
            .replace()
            .headers(headers)
            .body(body)
            .kind(kind)
            .charset(None)
            .build())
    }
}

#[async_trait]
impl DownloadMiddleware for HttpDecompressionMiddleware {
    async fn process_request(&self, request: &mut Request) -> trawler_core::Result<()> {
        request
            .headers_mut()
            .set_default("Accept-Encoding", accept_encoding());
        Ok(())
    }

    async fn process_response(
        &self,
        request: &Request,
        downloaded: Downloaded,
    ) -> trawler_core::Result<Downloaded> {
        match downloaded {
            Downloaded::Response(response) => {
                let response = self.decode_response(request, response).map_err(|err| match err {
                    DecompressionError::ResponseTooLarge { url, size, limit } => {
                        Error::DropRequest {
                            url,
                            reason: format!(
                                "uncompressed response size {size} is larger than the configured limit ({limit})"
                            ),
                        }
                    }
                    decode @ DecompressionError::Decode { .. } => {
                        Error::DecodeBody(decode.to_string())
                    }
                })?;
                Ok(Downloaded::Response(response))
            }
            other => Ok(other),
        }
    }
}
