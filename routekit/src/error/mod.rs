//! Layered error types for derived clients.
//!
//! The error hierarchy separates the phase in which a failure happens:
//! - [`ApiError`] - Setting up a default client failed
//! - [`DescriptionError`] - An API description cannot be derived into a client
//! - [`ClientError`] - A single invocation of a derived endpoint failed
//! - [`TransportError`] - The HTTP transport could not complete the exchange
//! - [`CodecError`] - A body could not be encoded or decoded
//! - [`ArgumentError`] - Supplied arguments do not fit the endpoint

mod api_error;
mod argument_error;
mod client_error;
mod codec_error;
mod description_error;
mod transport_error;

pub use api_error::ApiError;
pub use argument_error::ArgumentError;
pub use client_error::ClientError;
pub use codec_error::CodecError;
pub use description_error::DescriptionError;
pub use transport_error::TransportError;

/// Renders a media-type list as `a, b, c` for error messages.
pub(crate) fn join_media_types(media_types: &[mime::Mime]) -> String {
    media_types
        .iter()
        .map(|m| m.essence_str())
        .collect::<Vec<_>>()
        .join(", ")
}
