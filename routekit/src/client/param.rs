//! Endpoint parameters and the arguments supplied for them.

use std::fmt;

use mime::Mime;
use serde_json::Value;
use strum::Display;

use crate::method::RestMethod;

/// One argument slot of a derived endpoint.
///
/// Slots appear in root-to-leaf order of the combinators that introduce them.
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    /// A captured path segment.
    Capture {
        /// Display name of the capture.
        name: String,
    },
    /// An optional request header.
    Header {
        /// Header name.
        name: String,
    },
    /// An optional query parameter.
    QueryParam {
        /// Query key.
        name: String,
    },
    /// A sequence of values for a repeated query key.
    QueryParams {
        /// Query key.
        name: String,
    },
    /// A query flag toggled by a boolean.
    QueryFlag {
        /// Query key.
        name: String,
    },
    /// The request body.
    Body {
        /// Acceptable body media types, in preference order.
        media_types: Vec<Mime>,
    },
    /// The HTTP method of a raw endpoint.
    Method,
}

impl Param {
    /// The kind of argument this slot takes.
    pub fn kind(&self) -> ParamKind {
        match self {
            Self::Capture { .. } => ParamKind::Capture,
            Self::Header { .. } => ParamKind::Header,
            Self::QueryParam { .. } => ParamKind::QueryParam,
            Self::QueryParams { .. } => ParamKind::QueryParams,
            Self::QueryFlag { .. } => ParamKind::QueryFlag,
            Self::Body { .. } => ParamKind::Body,
            Self::Method => ParamKind::Method,
        }
    }

    /// The declared name, for named slots.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Capture { name }
            | Self::Header { name }
            | Self::QueryParam { name }
            | Self::QueryParams { name }
            | Self::QueryFlag { name } => Some(name),
            Self::Body { .. } | Self::Method => None,
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{} {name}", self.kind()),
            None => write!(f, "{}", self.kind()),
        }
    }
}

/// Argument kinds, used to check a supplied argument list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ParamKind {
    /// A path capture.
    #[strum(to_string = "capture")]
    Capture,
    /// An optional header.
    #[strum(to_string = "header")]
    Header,
    /// An optional query value.
    #[strum(to_string = "query param")]
    QueryParam,
    /// A sequence of query values.
    #[strum(to_string = "query params")]
    QueryParams,
    /// A query flag.
    #[strum(to_string = "query flag")]
    QueryFlag,
    /// A request body.
    #[strum(to_string = "body")]
    Body,
    /// A raw endpoint's method.
    #[strum(to_string = "method")]
    Method,
}

/// A rendered argument waiting to be applied to a request.
#[derive(Debug)]
pub(crate) enum Arg {
    Capture(String),
    Header(Option<String>),
    QueryParam(Option<String>),
    QueryParams(Vec<String>),
    QueryFlag(bool),
    Body(Result<Value, serde_json::Error>),
    Method(RestMethod),
}

impl Arg {
    pub(crate) fn kind(&self) -> ParamKind {
        match self {
            Self::Capture(_) => ParamKind::Capture,
            Self::Header(_) => ParamKind::Header,
            Self::QueryParam(_) => ParamKind::QueryParam,
            Self::QueryParams(_) => ParamKind::QueryParams,
            Self::QueryFlag(_) => ParamKind::QueryFlag,
            Self::Body(_) => ParamKind::Body,
            Self::Method(_) => ParamKind::Method,
        }
    }
}
