//! Derived endpoints and the argument builder used to invoke them.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use mime::Mime;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use super::param::{Arg, Param};
use super::ClientEnv;
use crate::api::{ResultShape, Verb};
use crate::codec::CodecRegistry;
use crate::error::{ArgumentError, ClientError, CodecError};
use crate::headers::{ResponseHeaders, WithHeaders};
use crate::method::RestMethod;
use crate::policy::{decode_body, AcceptedStatus, Decoded};
use crate::render::ToHttpApiData;
use crate::request::Request;
use crate::transport::{perform_request, perform_request_no_body, RawResponse, Transport};

/// Result name of raw endpoints, used in argument errors.
const RAW_RESULT: &str = "raw response";

/// One step of the request prefix accumulated during derivation.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Step {
    /// A literal path segment.
    Segment(String),
    /// The argument at this index of the parameter list.
    Param(usize),
}

/// The request prefix seen so far on one derivation path.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Plan {
    steps: Vec<Step>,
    params: Vec<Param>,
}

impl Plan {
    pub(crate) fn push_segment(&mut self, segment: impl Into<String>) {
        self.steps.push(Step::Segment(segment.into()));
    }

    pub(crate) fn push_param(&mut self, param: Param) {
        self.steps.push(Step::Param(self.params.len()));
        self.params.push(param);
    }

    /// The path so far, with captures rendered as `:name`.
    pub(crate) fn route(&self) -> String {
        let parts: Vec<String> = self
            .steps
            .iter()
            .filter_map(|step| match step {
                Step::Segment(segment) => Some(segment.clone()),
                Step::Param(index) => match &self.params[*index] {
                    Param::Capture { name } => Some(format!(":{name}")),
                    _ => None,
                },
            })
            .collect();
        format!("/{}", parts.join("/"))
    }

    pub(crate) fn finish(self, leaf: Leaf) -> EndpointPlan {
        let label = match &leaf {
            Leaf::Verb { verb, .. } => verb.method.to_string(),
            Leaf::Raw => "RAW".to_string(),
        };
        let signature = format!("{label} {}", self.route());
        EndpointPlan {
            plan: self,
            leaf,
            signature,
        }
    }
}

/// How a leaf finalizes and interprets its request.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Leaf {
    Verb {
        verb: Verb,
        accepted: AcceptedStatus,
    },
    Raw,
}

/// Everything an endpoint needs to build requests, fixed at derivation.
#[derive(Debug)]
pub(crate) struct EndpointPlan {
    plan: Plan,
    leaf: Leaf,
    signature: String,
}

/// A derived client function.
///
/// Endpoints are cheap to clone and safe to share across tasks. Each
/// invocation starts from [`call`](Self::call), supplies one argument per
/// [`Param`] in order, and finishes with one of the `send` methods.
///
/// ## Examples
///
/// ```rust,ignore
/// let user: User = get_user.call().capture(42).send().await?;
///
/// let created: WithHeaders<User> = create_user
///     .call()
///     .body(&new_user)
///     .send_with_headers()
///     .await?;
/// let location = created.headers.value("Location");
/// ```
pub struct Endpoint<T> {
    plan: Arc<EndpointPlan>,
    env: ClientEnv<T>,
    base_url: Option<Arc<Url>>,
}

impl<T> Clone for Endpoint<T> {
    fn clone(&self) -> Self {
        Self {
            plan: Arc::clone(&self.plan),
            env: self.env.clone(),
            base_url: self.base_url.clone(),
        }
    }
}

impl<T> fmt::Debug for Endpoint<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("signature", &self.plan.signature)
            .field("params", &self.plan.plan.params)
            .field("base_url", &self.base_url.as_ref().map(|u| u.as_str()))
            .finish()
    }
}

impl<T> fmt::Display for Endpoint<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.plan.signature)
    }
}

impl<T> Endpoint<T> {
    pub(crate) fn new(plan: EndpointPlan, env: ClientEnv<T>, base_url: Option<Arc<Url>>) -> Self {
        Self {
            plan: Arc::new(plan),
            env,
            base_url,
        }
    }

    /// A short description such as `GET /users/:id`.
    pub fn signature(&self) -> &str {
        &self.plan.signature
    }

    /// The parameter list, in argument order.
    pub fn params(&self) -> &[Param] {
        &self.plan.plan.params
    }

    /// The verb's method, or `None` for raw endpoints.
    pub fn method(&self) -> Option<RestMethod> {
        match &self.plan.leaf {
            Leaf::Verb { verb, .. } => Some(verb.method),
            Leaf::Raw => None,
        }
    }

    /// The verb's result shape, or `None` for raw endpoints.
    pub fn result_shape(&self) -> Option<&ResultShape> {
        match &self.plan.leaf {
            Leaf::Verb { verb, .. } => Some(&verb.result),
            Leaf::Raw => None,
        }
    }

    /// The statuses treated as success.
    pub fn accepted(&self) -> AcceptedStatus {
        match &self.plan.leaf {
            Leaf::Verb { accepted, .. } => *accepted,
            Leaf::Raw => AcceptedStatus::Any,
        }
    }

    /// Returns `true` for raw endpoints.
    pub fn is_raw(&self) -> bool {
        matches!(self.plan.leaf, Leaf::Raw)
    }

    /// The base URL requests are sent to, if the client was given one.
    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.as_deref()
    }

    /// Starts an invocation.
    pub fn call(&self) -> Call<'_, T> {
        Call {
            endpoint: self,
            args: Vec::with_capacity(self.plan.plan.params.len()),
        }
    }

    fn result_name(&self) -> &'static str {
        self.result_shape().map_or(RAW_RESULT, ResultShape::name)
    }

    fn codecs(&self) -> &CodecRegistry {
        self.env.codecs()
    }
}

/// What a successful invocation produced, before conversion to a typed value.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// A unit verb received `204 No Content`.
    NoContent,
    /// A decoded body.
    Value(Decoded),
    /// A decoded body and the declared response headers.
    WithHeaders(Decoded, ResponseHeaders),
    /// The undecoded response of a raw endpoint.
    Raw(RawResponse),
}

/// Argument list for one invocation of an [`Endpoint`].
///
/// Arguments are checked against the endpoint's parameter list before any
/// request is built; a mismatch fails with [`ClientError::InvalidArguments`]
/// and never reaches the transport.
pub struct Call<'a, T> {
    endpoint: &'a Endpoint<T>,
    args: Vec<Arg>,
}

impl<T> fmt::Debug for Call<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Call")
            .field("endpoint", &self.endpoint.signature())
            .field("args", &self.args)
            .finish()
    }
}

impl<T> Call<'_, T> {
    /// Supplies a path capture.
    pub fn capture(mut self, value: impl ToHttpApiData) -> Self {
        self.args.push(Arg::Capture(value.to_url_piece()));
        self
    }

    /// Supplies an optional header value. `None` leaves the header unset.
    pub fn header<V: ToHttpApiData>(mut self, value: Option<V>) -> Self {
        self.args.push(Arg::Header(value.map(|v| v.to_header())));
        self
    }

    /// Supplies an optional query value. `None` omits the parameter.
    pub fn query<V: ToHttpApiData>(mut self, value: Option<V>) -> Self {
        self.args
            .push(Arg::QueryParam(value.map(|v| v.to_query_param())));
        self
    }

    /// Supplies the values of a repeated query parameter.
    pub fn query_all<V: ToHttpApiData>(mut self, values: impl IntoIterator<Item = V>) -> Self {
        self.args.push(Arg::QueryParams(
            values.into_iter().map(|v| v.to_query_param()).collect(),
        ));
        self
    }

    /// Supplies a query flag.
    pub fn flag(mut self, enabled: bool) -> Self {
        self.args.push(Arg::QueryFlag(enabled));
        self
    }

    /// Supplies the request body.
    pub fn body<B: Serialize + ?Sized>(mut self, body: &B) -> Self {
        self.args.push(Arg::Body(serde_json::to_value(body)));
        self
    }

    /// Supplies the method of a raw endpoint.
    pub fn method(mut self, method: RestMethod) -> Self {
        self.args.push(Arg::Method(method));
        self
    }

    /// Builds the finalized request without sending it.
    ///
    /// ## Errors
    ///
    /// - [`ClientError::InvalidArguments`] if the arguments do not fit
    /// - [`ClientError::EncodingUnavailable`] if no body media type has an encoder
    /// - [`ClientError::EncodeFailure`] if the body cannot be encoded
    pub fn request(self) -> Result<Request, ClientError> {
        let (request, method) = self.build()?;
        Ok(request.finalize(method))
    }

    fn check_args(&self) -> Result<(), ArgumentError> {
        let params = self.endpoint.params();
        if params.len() != self.args.len() {
            return Err(ArgumentError::Count {
                endpoint: self.endpoint.signature().to_string(),
                expected: params.len(),
                supplied: self.args.len(),
            });
        }
        for (position, (param, arg)) in params.iter().zip(&self.args).enumerate() {
            if param.kind() != arg.kind() {
                return Err(ArgumentError::Kind {
                    endpoint: self.endpoint.signature().to_string(),
                    position,
                    expected: param.kind(),
                    supplied: arg.kind(),
                });
            }
        }
        Ok(())
    }

    fn expect_result(&self, requested: &'static str) -> Result<(), ArgumentError> {
        let declared = self.endpoint.result_name();
        if declared == requested {
            Ok(())
        } else {
            Err(ArgumentError::ResultShape {
                endpoint: self.endpoint.signature().to_string(),
                declared,
                requested,
            })
        }
    }

    fn shape_mismatch(&self, requested: &'static str) -> ClientError {
        ArgumentError::ResultShape {
            endpoint: self.endpoint.signature().to_string(),
            declared: self.endpoint.result_name(),
            requested,
        }
        .into()
    }

    /// Applies the arguments to a fresh request.
    fn build(self) -> Result<(Request, RestMethod), ClientError> {
        self.check_args()?;
        let endpoint = self.endpoint;
        let plan = &endpoint.plan;
        let mut args: Vec<Option<Arg>> = self.args.into_iter().map(Some).collect();

        let mut request = Request::new();
        let mut method = None;
        for step in &plan.plan.steps {
            match step {
                Step::Segment(segment) => request.push_segment(segment.clone()),
                Step::Param(index) => {
                    let Some(arg) = args.get_mut(*index).and_then(Option::take) else {
                        continue;
                    };
                    let param = &plan.plan.params[*index];
                    if let Some(m) = apply(param, arg, &mut request, endpoint.codecs())? {
                        method = Some(m);
                    }
                }
            }
        }

        let method = match &plan.leaf {
            Leaf::Verb { verb, .. } => {
                request.set_accept(endpoint.codecs().decodable(&verb.media_types));
                verb.method
            }
            Leaf::Raw => method.unwrap_or(RestMethod::Get),
        };
        Ok((request, method))
    }
}

impl<T: Transport> Call<'_, T> {
    /// Sends the request and returns the undecoded outcome.
    ///
    /// ## Errors
    ///
    /// Any [`ClientError`]; see the typed `send` methods.
    #[instrument(
        name = "api_request",
        skip(self),
        fields(
            endpoint = %self.endpoint.signature(),
            http.method = tracing::field::Empty,
            http.url = tracing::field::Empty,
            http.status_code = tracing::field::Empty,
            otel.kind = "client",
            otel.status_code = tracing::field::Empty,
        )
    )]
    pub async fn execute(self) -> Result<Outcome, ClientError> {
        let endpoint = self.endpoint;
        let (request, method) = self.build()?;
        let transport = endpoint.env.transport();
        let base_url = endpoint.base_url();

        let (verb, accepted) = match &endpoint.plan.leaf {
            Leaf::Raw => {
                let raw =
                    perform_request(transport, method, request, AcceptedStatus::Any, base_url)
                        .await?;
                return Ok(Outcome::Raw(raw));
            }
            Leaf::Verb { verb, accepted } => (verb, *accepted),
        };

        if let ResultShape::Unit = verb.result {
            let statuses = accepted.statuses().unwrap_or(&[204]);
            perform_request_no_body(transport, method, request, statuses, base_url).await?;
            return Ok(Outcome::NoContent);
        }

        let raw = perform_request(transport, method, request, accepted, base_url).await?;
        let headers = match &verb.result {
            ResultShape::ValueWithHeaders(names) => Some(ResponseHeaders::build(names, &raw.headers)),
            _ => None,
        };
        let decoded = decode_response(endpoint.codecs(), verb, raw.status, raw.content_type, raw.body)?;

        Ok(match headers {
            Some(headers) => Outcome::WithHeaders(decoded, headers),
            None => Outcome::Value(decoded),
        })
    }

    /// Sends the request and decodes the body into `R`.
    ///
    /// ## Errors
    ///
    /// - [`ClientError::InvalidArguments`] if the endpoint does not return a value
    /// - [`ClientError::Connection`] if the transport fails
    /// - [`ClientError::UnsuccessfulStatus`] if the status is not accepted
    /// - [`ClientError::DecodeFailure`] if the body does not decode into `R`
    pub async fn send<R: DeserializeOwned>(self) -> Result<R, ClientError> {
        const REQUESTED: &str = "value";
        self.expect_result(REQUESTED)?;
        let mismatch = self.shape_mismatch(REQUESTED);
        match self.execute().await? {
            Outcome::Value(decoded) => decoded.into_typed(),
            _ => Err(mismatch),
        }
    }

    /// Sends the request and decodes the body and declared headers.
    ///
    /// ## Errors
    ///
    /// As [`send`](Self::send).
    pub async fn send_with_headers<R: DeserializeOwned>(
        self,
    ) -> Result<WithHeaders<R>, ClientError> {
        const REQUESTED: &str = "value with headers";
        self.expect_result(REQUESTED)?;
        let mismatch = self.shape_mismatch(REQUESTED);
        match self.execute().await? {
            Outcome::WithHeaders(decoded, headers) => Ok(WithHeaders {
                value: decoded.into_typed()?,
                headers,
            }),
            _ => Err(mismatch),
        }
    }

    /// Sends a request expecting `204 No Content`.
    ///
    /// ## Errors
    ///
    /// As [`send`](Self::send), without the decode step.
    pub async fn send_unit(self) -> Result<(), ClientError> {
        const REQUESTED: &str = "unit";
        self.expect_result(REQUESTED)?;
        let mismatch = self.shape_mismatch(REQUESTED);
        match self.execute().await? {
            Outcome::NoContent => Ok(()),
            _ => Err(mismatch),
        }
    }

    /// Sends a raw request and returns the response whatever its status.
    ///
    /// ## Errors
    ///
    /// - [`ClientError::InvalidArguments`] if the endpoint is not raw
    /// - [`ClientError::Connection`] if the transport fails
    /// - [`ClientError::InvalidContentTypeHeader`] if the content type is malformed
    pub async fn send_raw(self) -> Result<RawResponse, ClientError> {
        self.expect_result(RAW_RESULT)?;
        let mismatch = self.shape_mismatch(RAW_RESULT);
        match self.execute().await? {
            Outcome::Raw(raw) => Ok(raw),
            _ => Err(mismatch),
        }
    }
}

/// Applies one checked argument. Returns the method for raw endpoints.
fn apply(
    param: &Param,
    arg: Arg,
    request: &mut Request,
    codecs: &CodecRegistry,
) -> Result<Option<RestMethod>, ClientError> {
    match (param, arg) {
        (Param::Capture { .. }, Arg::Capture(value)) => request.push_segment(value),
        (Param::Header { name }, Arg::Header(value)) => {
            if let Some(value) = value {
                request.set_header(name.clone(), value);
            }
        }
        (Param::QueryParam { name }, Arg::QueryParam(value)) => {
            if let Some(value) = value {
                request.append_query(name.clone(), Some(value));
            }
        }
        (Param::QueryParams { name }, Arg::QueryParams(values)) => {
            for value in values {
                request.append_query(name.clone(), Some(value));
            }
        }
        (Param::QueryFlag { name }, Arg::QueryFlag(enabled)) => {
            if enabled {
                request.append_query(name.clone(), None);
            }
        }
        (Param::Body { media_types }, Arg::Body(value)) => {
            let (bytes, media_type) = encode_body(codecs, media_types, value)?;
            request.set_body(bytes, media_type);
        }
        (Param::Method, Arg::Method(method)) => return Ok(Some(method)),
        _ => {}
    }
    Ok(None)
}

/// Encodes a body with the first declared media type that has a codec.
fn encode_body(
    codecs: &CodecRegistry,
    media_types: &[Mime],
    value: Result<Value, serde_json::Error>,
) -> Result<(Bytes, Mime), ClientError> {
    let (media_type, codec) = codecs.encoder_for(media_types).ok_or_else(|| {
        ClientError::EncodingUnavailable {
            media_types: media_types.to_vec(),
        }
    })?;

    let value = match value {
        Ok(value) => value,
        Err(e) => {
            return Err(ClientError::EncodeFailure {
                media_type,
                source: CodecError::Json(e),
            })
        }
    };
    match codec.encode(&value) {
        Ok(bytes) => Ok((bytes, media_type)),
        Err(source) => Err(ClientError::EncodeFailure { media_type, source }),
    }
}

/// Decodes an accepted response. An empty `204` decodes as `null`.
fn decode_response(
    codecs: &CodecRegistry,
    verb: &Verb,
    status: u16,
    media_type: Mime,
    body: Bytes,
) -> Result<Decoded, ClientError> {
    if status == 204 && body.is_empty() {
        debug!("empty 204 response decoded as null");
        return Ok(Decoded {
            media_type,
            body,
            value: Value::Null,
        });
    }
    decode_body(codecs, &verb.media_types, media_type, body)
}
