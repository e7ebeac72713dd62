//! Transport façade.
//!
//! The [`Transport`] trait is the only capability derived clients need from an
//! HTTP stack: send one finalized [`Request`] and return the raw response.
//! [`perform_request`] and [`perform_request_no_body`] layer the client's
//! response contract on top of it (content-type parsing and status checks).
//!
//! [`ReqwestTransport`] is the production implementation.

mod reqwest_transport;

use std::future::Future;

use bytes::Bytes;
use mime::Mime;
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use tracing::{debug, Span};
use url::Url;

use crate::error::{ClientError, TransportError};
use crate::method::RestMethod;
use crate::policy::AcceptedStatus;
use crate::request::Request;

pub use reqwest_transport::{ReqwestTransport, ReqwestTransportBuilder};

/// A response as received from the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub status: u16,
    /// The response headers.
    pub headers: HeaderMap,
    /// The full response body.
    pub body: Bytes,
}

impl HttpResponse {
    /// Creates a response with no headers.
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }
}

/// A response that passed the status check, with its parsed content type.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    /// The HTTP status code.
    pub status: u16,
    /// The parsed `Content-Type`, `application/octet-stream` when absent.
    pub content_type: Mime,
    /// The response headers.
    pub headers: HeaderMap,
    /// The full response body.
    pub body: Bytes,
}

/// Sends finalized requests.
///
/// Implementations own connection management, TLS, redirects, timeouts and
/// cancellation. Dropping the returned future must abandon the request.
///
/// ## Native Async Traits
///
/// This trait uses native async functions in traits; no `async-trait` crate is
/// needed.
///
/// ## Examples
///
/// ```rust,ignore
/// use routekit::{HttpResponse, Request, Transport, TransportError};
///
/// struct AlwaysTeapot;
///
/// impl Transport for AlwaysTeapot {
///     async fn send(&self, _: Request, _: Option<&Url>) -> Result<HttpResponse, TransportError> {
///         Ok(HttpResponse::new(418, "short and stout"))
///     }
/// }
/// ```
pub trait Transport: Send + Sync {
    /// Sends `request` to `base_url` (or the transport's own default origin).
    ///
    /// ## Errors
    ///
    /// Returns a [`TransportError`] if no response could be obtained.
    fn send(
        &self,
        request: Request,
        base_url: Option<&Url>,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;
}

/// Renders the request target for span fields.
fn display_target(request: &Request, base_url: Option<&Url>) -> String {
    base_url
        .and_then(|base| request.url(base).ok())
        .map(|url| url.to_string())
        .unwrap_or_else(|| request.path_string())
}

/// Issues a request and checks the response contract.
///
/// The request is finalized with `method`. The response's `Content-Type` is
/// parsed first (absent means `application/octet-stream`), then the status is
/// checked against `accepted`.
///
/// ## Errors
///
/// - [`ClientError::Connection`] if the transport fails
/// - [`ClientError::InvalidContentTypeHeader`] if the content type is malformed
/// - [`ClientError::UnsuccessfulStatus`] if the status is not accepted
pub async fn perform_request<T: Transport>(
    transport: &T,
    method: RestMethod,
    request: Request,
    accepted: AcceptedStatus,
    base_url: Option<&Url>,
) -> Result<RawResponse, ClientError> {
    let request = request.finalize(method);
    let span = Span::current();
    span.record("http.method", method.to_string().as_str());
    span.record("http.url", display_target(&request, base_url).as_str());

    let response = transport.send(request, base_url).await?;
    span.record("http.status_code", response.status);

    let content_type = match response.headers.get(CONTENT_TYPE) {
        None => mime::APPLICATION_OCTET_STREAM,
        Some(value) => match value.to_str().ok().and_then(|s| s.parse::<Mime>().ok()) {
            Some(parsed) => parsed,
            None => {
                span.record("otel.status_code", "ERROR");
                return Err(ClientError::InvalidContentTypeHeader {
                    value: String::from_utf8_lossy(value.as_bytes()).into_owned(),
                    body: response.body,
                });
            }
        },
    };

    if !accepted.accepts(response.status) {
        let otel_status = if response.status >= 500 { "ERROR" } else { "UNSET" };
        span.record("otel.status_code", otel_status);
        debug!(status = response.status, "response status not accepted");
        return Err(ClientError::UnsuccessfulStatus {
            status: response.status,
            headers: response.headers,
            body: response.body,
        });
    }

    span.record("otel.status_code", "OK");
    Ok(RawResponse {
        status: response.status,
        content_type,
        headers: response.headers,
        body: response.body,
    })
}

/// Issues a request whose success carries no body.
///
/// ## Errors
///
/// Same as [`perform_request`].
pub async fn perform_request_no_body<T: Transport>(
    transport: &T,
    method: RestMethod,
    request: Request,
    accepted: &'static [u16],
    base_url: Option<&Url>,
) -> Result<(), ClientError> {
    perform_request(
        transport,
        method,
        request,
        AcceptedStatus::Only(accepted),
        base_url,
    )
    .await
    .map(|_| ())
}
