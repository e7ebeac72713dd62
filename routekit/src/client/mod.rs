//! Derived client functions.
//!
//! A [`ClientEnv`] pairs a [`Transport`] with a [`CodecRegistry`]. Deriving an
//! [`Api`] against it yields a [`ClientTree`] whose leaves are [`Endpoint`]s,
//! each invoked through a [`Call`] argument builder.
//!
//! ## Examples
//!
//! ```rust,ignore
//! use routekit::{client, Api, RestMethod, Route, Verb};
//! use url::Url;
//!
//! #[derive(serde::Deserialize)]
//! struct User { id: u64, name: String }
//!
//! let api = Route::new()
//!     .path("users")
//!     .capture("id")
//!     .verb(Verb::json(RestMethod::Get));
//!
//! let base_url = Url::parse("https://api.example.com")?;
//! let tree = client(&api, Some(base_url))?;
//! let get_user = tree.into_endpoint().unwrap();
//!
//! let user: User = get_user.call().capture(1).send().await?;
//! ```

mod endpoint;
mod param;
mod tree;

use std::fmt;
use std::sync::Arc;

use url::Url;

use crate::api::Api;
use crate::codec::CodecRegistry;
use crate::derive::derive;
use crate::error::{ApiError, DescriptionError, TransportError};
use crate::transport::{ReqwestTransport, Transport};

pub(crate) use endpoint::{EndpointPlan, Leaf, Plan};
pub use endpoint::{Call, Endpoint, Outcome};
pub use param::{Param, ParamKind};
pub use tree::ClientTree;

/// Transport and codecs shared by every endpoint derived from it.
pub struct ClientEnv<T> {
    transport: Arc<T>,
    codecs: Arc<CodecRegistry>,
}

impl<T> Clone for ClientEnv<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            codecs: Arc::clone(&self.codecs),
        }
    }
}

impl<T> fmt::Debug for ClientEnv<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let media_types: Vec<&str> = self.codecs.media_types().map(|m| m.as_ref()).collect();
        f.debug_struct("ClientEnv")
            .field("transport", &std::any::type_name::<T>())
            .field("codecs", &media_types)
            .finish()
    }
}

impl<T> ClientEnv<T> {
    /// Creates an environment with the default codecs.
    pub fn new(transport: T) -> Self {
        Self {
            transport: Arc::new(transport),
            codecs: Arc::new(CodecRegistry::default()),
        }
    }

    /// Replaces the codec registry.
    pub fn with_codecs(mut self, codecs: CodecRegistry) -> Self {
        self.codecs = Arc::new(codecs);
        self
    }

    /// The shared transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The shared codec registry.
    pub fn codecs(&self) -> &CodecRegistry {
        &self.codecs
    }
}

impl<T: Transport> ClientEnv<T> {
    /// Derives a client tree for `api`.
    ///
    /// Requests go to `base_url`; without one, the transport decides where
    /// they go.
    ///
    /// ## Errors
    ///
    /// Returns a [`DescriptionError`] if the description cannot be derived.
    pub fn client(&self, api: &Api, base_url: Option<Url>) -> Result<ClientTree<T>, DescriptionError> {
        derive(api, Plan::default(), self, &base_url.map(Arc::new))
    }
}

impl ClientEnv<ReqwestTransport> {
    /// Creates an environment over a default [`ReqwestTransport`].
    ///
    /// ## Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn reqwest() -> Result<Self, TransportError> {
        Ok(Self::new(ReqwestTransport::new()?))
    }
}

/// Derives a client tree using a default [`ReqwestTransport`] and codecs.
///
/// ## Errors
///
/// - [`ApiError::Transport`] if the HTTP client cannot be constructed
/// - [`ApiError::Description`] if the description cannot be derived
pub fn client(api: &Api, base_url: Option<Url>) -> Result<ClientTree<ReqwestTransport>, ApiError> {
    Ok(ClientEnv::reqwest()?.client(api, base_url)?)
}
