//! Download middleware chain.
//!
//! Every outbound request and inbound response passes through an ordered
//! list of middlewares around the download handler. Requests are seen in
//! registration order, responses in reverse, so the middleware closest to
//! the handler touches the response first.

use crate::{Request, Response, Result};
use async_trait::async_trait;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// What a download handler (or an earlier middleware) handed back.
#[derive(Debug, Clone)]
pub enum Downloaded {
    /// A fetched HTTP response.
    Response(Response),
    /// A replacement request to reschedule instead of a response (emitted
    /// by redirect-style middlewares). Body-transforming stages leave this
    /// variant untouched.
    Request(Request),
}

impl Downloaded {
    /// The response, when this is one.
    pub fn as_response(&self) -> Option<&Response> {
        match self {
            Self::Response(response) => Some(response),
            Self::Request(_) => None,
        }
    }

    /// Consume into the response, when this is one.
    pub fn into_response(self) -> Option<Response> {
        match self {
            Self::Response(response) => Some(response),
            Self::Request(_) => None,
        }
    }
}

/// Boxed download handler invoked once the request chain completes.
pub type FetchFn = Arc<
    dyn Fn(Request) -> Pin<Box<dyn Future<Output = Result<Downloaded>> + Send>> + Send + Sync,
>;

/// A stage wrapped around the download handler.
///
/// Both hooks default to the identity, so a middleware only implements the
/// side it cares about.
#[async_trait]
pub trait DownloadMiddleware: Send + Sync {
    /// Inspect or annotate an outbound request before it is fetched.
    async fn process_request(&self, _request: &mut Request) -> Result<()> {
        Ok(())
    }

    /// Transform, replace, or veto what came back from the handler.
    async fn process_response(
        &self,
        _request: &Request,
        downloaded: Downloaded,
    ) -> Result<Downloaded> {
        Ok(downloaded)
    }
}

/// An ordered set of middlewares around a download handler.
pub struct DownloadPipeline {
    middlewares: Vec<Arc<dyn DownloadMiddleware>>,
}

impl DownloadPipeline {
    /// Create an empty pipeline.
    pub fn new() -> Self {
        Self {
            middlewares: Vec::new(),
        }
    }

    /// Add a middleware, builder style. Registration order is the request
    /// processing order.
    pub fn with_middleware<M: DownloadMiddleware + 'static>(mut self, middleware: M) -> Self {
        self.middlewares.push(Arc::new(middleware));
        self
    }

    /// Number of registered middlewares.
    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    /// Whether the pipeline has no middlewares.
    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }

    /// Run a request through every middleware, the handler, and back.
    pub async fn run(&self, mut request: Request, fetch: FetchFn) -> Result<Downloaded> {
        for middleware in &self.middlewares {
            middleware.process_request(&mut request).await?;
        }

        tracing::debug!(method = %request.method(), url = %request.url(), "dispatching request");
        let mut downloaded = fetch(request.clone()).await?;

        for middleware in self.middlewares.iter().rev() {
            downloaded = middleware.process_response(&request, downloaded).await?;
        }
        Ok(downloaded)
    }
}

impl Default for DownloadPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HeaderMap, ResponseKind};
    use http::StatusCode;
    use url::Url;

    struct TagRequests {
        name: &'static str,
        value: &'static str,
    }

    #[async_trait]
    impl DownloadMiddleware for TagRequests {
        async fn process_request(&self, request: &mut Request) -> Result<()> {
            request.headers_mut().append(self.name, self.value);
            Ok(())
        }
    }

    struct StampResponses;

    #[async_trait]
    impl DownloadMiddleware for StampResponses {
        async fn process_response(
            &self,
            _request: &Request,
            downloaded: Downloaded,
        ) -> Result<Downloaded> {
            match downloaded {
                Downloaded::Response(response) => {
                    let mut headers = response.headers().clone();
                    headers.append("X-Seen", "yes");
                    Ok(Downloaded::Response(response.replace().headers(headers).build()))
                }
                other => Ok(other),
            }
        }
    }

    fn echo_fetch() -> FetchFn {
        Arc::new(|request: Request| {
            Box::pin(async move {
                let headers: HeaderMap = request.headers().iter().collect();
                Ok(Downloaded::Response(Response::new(
                    request.url().clone(),
                    StatusCode::OK,
                    headers,
                    &b"ok"[..],
                )))
            })
        })
    }

    #[tokio::test]
    async fn requests_forward_responses_backward() {
        let pipeline = DownloadPipeline::new()
            .with_middleware(TagRequests {
                name: "X-First",
                value: "1",
            })
            .with_middleware(TagRequests {
                name: "X-Second",
                value: "2",
            })
            .with_middleware(StampResponses);
        assert_eq!(pipeline.len(), 3);

        let request = Request::get(Url::parse("http://example.com/").unwrap());
        let downloaded = pipeline.run(request, echo_fetch()).await.unwrap();
        let response = downloaded.into_response().unwrap();

        // both request middlewares ran before the fetch echoed the headers
        assert_eq!(response.headers().get("X-First"), Some("1"));
        assert_eq!(response.headers().get("X-Second"), Some("2"));
        // and the response middleware ran on the way back
        assert_eq!(response.headers().get("X-Seen"), Some("yes"));
        assert_eq!(response.kind(), ResponseKind::Text);
    }

    #[tokio::test]
    async fn request_variant_passes_through() {
        let pipeline = DownloadPipeline::new().with_middleware(StampResponses);
        let request = Request::get(Url::parse("http://example.com/").unwrap());
        let rescheduled = Request::get(Url::parse("http://example.com/next").unwrap());

        let fetch: FetchFn = Arc::new(move |_request: Request| {
            let rescheduled = rescheduled.clone();
            Box::pin(async move { Ok(Downloaded::Request(rescheduled)) })
        });

        let downloaded = pipeline.run(request, fetch).await.unwrap();
        assert!(downloaded.as_response().is_none());
        match downloaded {
            Downloaded::Request(request) => assert_eq!(request.url().path(), "/next"),
            Downloaded::Response(_) => unreachable!(),
        }
    }
}
