//! API description errors.

use thiserror::Error;

use crate::method::RestMethod;

/// Errors in an API description that prevent deriving a client.
///
/// These occur while the client tree is being built, before any request is
/// made, and indicate programmer errors in the description itself.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DescriptionError {
    /// A `Verb` node uses a method without a success-status policy.
    #[error("{method} at {route} has no status policy; describe it with a raw endpoint")]
    UnsupportedVerb {
        /// The offending method.
        method: RestMethod,
        /// The route leading to the verb.
        route: String,
    },

    /// A node that negotiates content declares no media types.
    #[error("{node} at {route} declares no media types")]
    EmptyMediaTypes {
        /// The combinator kind (`request body`, `response`).
        node: &'static str,
        /// The route leading to the node.
        route: String,
    },

    /// A literal path segment is empty.
    #[error("Empty path segment after {route}")]
    EmptySegment {
        /// The route leading to the segment.
        route: String,
    },

    /// A capture, query or header combinator has an empty name.
    #[error("{node} at {route} has an empty name")]
    EmptyName {
        /// The combinator kind.
        node: &'static str,
        /// The route leading to the node.
        route: String,
    },

    /// A request header or declared response header is not a valid HTTP
    /// header name.
    #[error("Invalid header name {name:?} at {route}")]
    InvalidHeaderName {
        /// The name as declared.
        name: String,
        /// The route leading to the node.
        route: String,
    },
}

impl DescriptionError {
    /// Creates an empty media type list error.
    pub fn empty_media_types(node: &'static str, route: impl Into<String>) -> Self {
        Self::EmptyMediaTypes {
            node,
            route: route.into(),
        }
    }

    /// Creates an empty name error.
    pub fn empty_name(node: &'static str, route: impl Into<String>) -> Self {
        Self::EmptyName {
            node,
            route: route.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_verb() {
        let err = DescriptionError::UnsupportedVerb {
            method: RestMethod::Head,
            route: "/status".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "HEAD at /status has no status policy; describe it with a raw endpoint"
        );
    }

    #[test]
    fn test_empty_media_types() {
        let err = DescriptionError::empty_media_types("request body", "/users");
        assert_eq!(err.to_string(), "request body at /users declares no media types");
    }

    #[test]
    fn test_invalid_header_name() {
        let err = DescriptionError::InvalidHeaderName {
            name: "bad name".to_string(),
            route: "/users".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid header name \"bad name\" at /users");
    }

    #[test]
    fn test_empty_name() {
        let err = DescriptionError::empty_name("header", "/");
        assert!(err.to_string().contains("empty name"));
    }
}
