//! Typed HTTP clients derived from declarative API descriptions.
//!
//! An API is described once as a tree of combinators ([`Api`], usually built
//! with [`Route`]). Deriving it yields a [`ClientTree`] of the same shape whose
//! leaves are [`Endpoint`]s: async client functions that take one argument per
//! capture, header, query or body combinator on their path.
//!
//! ## Features
//!
//! - **One description, one tree**: every `Alt` becomes a pair of sub-trees
//! - **Checked argument lists**: arity and kinds are verified before any I/O
//! - **Per-verb status policy**: success statuses depend on method and result
//! - **Pluggable codecs**: JSON, YAML, text and binary, selected by declared
//!   media-type order
//! - **Pluggable transport**: `reqwest` by default, any [`Transport`] in tests
//!
//! ## Example
//!
//! ```rust,ignore
//! use routekit::{client, RestMethod, Route, Verb};
//! use url::Url;
//!
//! #[derive(serde::Deserialize)]
//! struct User { id: u64, name: String }
//!
//! let api = Route::new().path("users").to(
//!     Route::new()
//!         .query_param("sort")
//!         .verb(Verb::json(RestMethod::Get))
//!         .or(Route::new().capture("id").verb(Verb::json(RestMethod::Get))),
//! );
//!
//! let (list_users, get_user) = client(&api, Some(Url::parse("https://api.example.com")?))?
//!     .split()
//!     .unwrap();
//! let list_users = list_users.into_endpoint().unwrap();
//! let get_user = get_user.into_endpoint().unwrap();
//!
//! let users: Vec<User> = list_users.call().query(Some("name")).send().await?;
//! let user: User = get_user.call().capture(7).send().await?;
//! ```

pub mod api;
pub mod client;
pub mod codec;
mod derive;
pub mod error;
pub mod headers;
pub mod method;
pub mod policy;
pub mod render;
pub mod request;
pub mod transport;

// Re-exports for convenience
pub use api::{Api, ResultShape, Route, Verb};
pub use client::{client, Call, ClientEnv, ClientTree, Endpoint, Outcome, Param, ParamKind};
pub use codec::{Codec, CodecRegistry};
pub use error::{
    ApiError, ArgumentError, ClientError, CodecError, DescriptionError, TransportError,
};
pub use headers::{ResponseHeader, ResponseHeaders, WithHeaders};
pub use method::RestMethod;
pub use policy::{AcceptedStatus, Decoded};
pub use render::ToHttpApiData;
pub use request::{Request, RequestBody};
pub use transport::{
    perform_request, perform_request_no_body, HttpResponse, RawResponse, ReqwestTransport,
    ReqwestTransportBuilder, Transport,
};
