//! Request execution over `reqwest` with tracing instrumentation.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use tracing::{debug, instrument};
use url::Url;

use super::{HttpResponse, Transport};
use crate::error::TransportError;
use crate::request::Request;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default idle connections kept per host.
const DEFAULT_POOL_MAX_IDLE_PER_HOST: usize = 10;

fn header_name(name: &str) -> Result<HeaderName, TransportError> {
    HeaderName::try_from(name).map_err(|e| TransportError::InvalidHeader {
        name: name.to_string(),
        message: e.to_string(),
    })
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue, TransportError> {
    HeaderValue::try_from(value).map_err(|e| TransportError::InvalidHeader {
        name: name.to_string(),
        message: e.to_string(),
    })
}

/// Builder for configuring a [`ReqwestTransport`].
#[derive(Debug)]
pub struct ReqwestTransportBuilder {
    base_url: Option<Url>,
    timeout: Duration,
    default_headers: HeaderMap,
    user_agent: Option<String>,
    pool_max_idle_per_host: usize,
}

impl ReqwestTransportBuilder {
    fn new() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            default_headers: HeaderMap::new(),
            user_agent: None,
            pool_max_idle_per_host: DEFAULT_POOL_MAX_IDLE_PER_HOST,
        }
    }

    /// Sets the origin used when a client has no base URL of its own.
    pub fn base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Sets the request timeout.
    ///
    /// ## Examples
    ///
    /// ```rust,ignore
    /// use std::time::Duration;
    ///
    /// let transport = ReqwestTransport::builder()
    ///     .timeout(Duration::from_secs(60))
    ///     .build()?;
    /// ```
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Adds a header sent with every request.
    ///
    /// Headers set by an endpoint take precedence.
    ///
    /// ## Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn default_header(
        mut self,
        name: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> Result<Self, TransportError> {
        let name = name.as_ref();
        let header = header_name(name)?;
        let value = header_value(name, value.as_ref())?;
        self.default_headers.insert(header, value);
        Ok(self)
    }

    /// Sets the `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Sets the maximum idle connections kept per host.
    pub fn pool_max_idle_per_host(mut self, max: usize) -> Self {
        self.pool_max_idle_per_host = max;
        self
    }

    /// Builds the [`ReqwestTransport`].
    ///
    /// ## Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn build(self) -> Result<ReqwestTransport, TransportError> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .default_headers(self.default_headers)
            .pool_max_idle_per_host(self.pool_max_idle_per_host);
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        Ok(ReqwestTransport {
            client: builder.build()?,
            base_url: self.base_url,
        })
    }
}

/// Async HTTP transport backed by `reqwest`.
///
/// Wraps a pooled `reqwest::Client`. Timeouts and cancellation follow the
/// underlying client: a timed-out request fails with
/// [`TransportError::Request`], and dropping the send future aborts it.
///
/// ## Examples
///
/// ```rust,ignore
/// use routekit::{ClientEnv, ReqwestTransport};
///
/// let transport = ReqwestTransport::builder()
///     .default_header("X-Client", "routekit")?
///     .build()?;
/// let env = ClientEnv::new(transport);
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: Option<Url>,
}

impl ReqwestTransport {
    /// Creates a new builder for configuring a transport.
    pub fn builder() -> ReqwestTransportBuilder {
        ReqwestTransportBuilder::new()
    }

    /// Creates a transport with default settings.
    ///
    /// ## Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new() -> Result<Self, TransportError> {
        Self::builder().build()
    }

    /// Returns the fallback base URL, if configured.
    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    /// Converts a finalized request into a `reqwest` request builder.
    fn prepare(
        &self,
        request: &Request,
        base_url: Option<&Url>,
    ) -> Result<reqwest::RequestBuilder, TransportError> {
        let base = base_url
            .or(self.base_url.as_ref())
            .ok_or_else(|| TransportError::MissingBaseUrl {
                path: request.path_string(),
            })?;
        let url = request.url(base)?;
        let method = request
            .method()
            .ok_or_else(|| TransportError::MissingMethod {
                path: request.path_string(),
            })?;

        let mut headers = HeaderMap::new();
        if !request.accept().is_empty() && request.header("accept").is_none() {
            let accept = request
                .accept()
                .iter()
                .map(|m| m.as_ref())
                .collect::<Vec<_>>()
                .join(", ");
            headers.insert(ACCEPT, header_value("Accept", &accept)?);
        }
        if let Some(body) = request.body() {
            headers.insert(
                CONTENT_TYPE,
                header_value("Content-Type", body.content_type.as_ref())?,
            );
        }
        for (name, value) in request.headers() {
            headers.insert(header_name(name)?, header_value(name, value)?);
        }

        let mut builder = self.client.request(method.to_reqwest(), url).headers(headers);
        if let Some(body) = request.body() {
            builder = builder.body(body.bytes.clone());
        }
        Ok(builder)
    }
}

impl Transport for ReqwestTransport {
    #[instrument(
        name = "http_send",
        skip_all,
        fields(http.path = %request.path_string())
    )]
    async fn send(
        &self,
        request: Request,
        base_url: Option<&Url>,
    ) -> Result<HttpResponse, TransportError> {
        let response = self.prepare(&request, base_url)?.send().await?;

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes().await?;
        debug!(status, bytes = body.len(), "received response");

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
