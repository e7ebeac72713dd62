//! Top-level error for setting up a client.

use thiserror::Error;

use super::{DescriptionError, TransportError};

/// Errors from [`client`](crate::client()), which both builds a transport
/// and derives a description.
///
/// ## Examples
///
/// ```rust,ignore
/// use routekit::ApiError;
///
/// match routekit::client(&api, None) {
///     Ok(tree) => run(tree).await,
///     Err(ApiError::Description(e)) => eprintln!("bad API description: {e}"),
///     Err(ApiError::Transport(e)) => eprintln!("no HTTP client: {e}"),
/// }
/// ```
#[derive(Debug, Error)]
pub enum ApiError {
    /// The description cannot be derived.
    #[error(transparent)]
    Description(#[from] DescriptionError),

    /// The default transport could not be built.
    #[error(transparent)]
    Transport(#[from] TransportError),
}
