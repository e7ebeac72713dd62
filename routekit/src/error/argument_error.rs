//! Errors for argument lists that do not fit an endpoint.

use thiserror::Error;

use crate::client::ParamKind;

/// A supplied argument list does not match the endpoint's parameter list.
///
/// Derived endpoints check their arguments before any request is built, so
/// these errors never reach the transport.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArgumentError {
    /// Too few or too many arguments.
    #[error("{endpoint} takes {expected} argument(s) but {supplied} were supplied")]
    Count {
        /// The endpoint's signature.
        endpoint: String,
        /// Number of declared parameters.
        expected: usize,
        /// Number of supplied arguments.
        supplied: usize,
    },

    /// An argument of the wrong kind at a position.
    #[error("{endpoint}: argument {position} should be {expected} but was {supplied}")]
    Kind {
        /// The endpoint's signature.
        endpoint: String,
        /// Zero-based argument position.
        position: usize,
        /// Declared parameter kind.
        expected: ParamKind,
        /// Supplied argument kind.
        supplied: ParamKind,
    },

    /// The caller asked for a result the endpoint does not produce.
    #[error("{endpoint} returns {declared}, not {requested}")]
    ResultShape {
        /// The endpoint's signature.
        endpoint: String,
        /// The declared result shape.
        declared: &'static str,
        /// The result shape requested by the caller.
        requested: &'static str,
    },
}
