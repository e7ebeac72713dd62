//! Declarative API descriptions.
//!
//! An [`Api`] is an immutable tree of combinators. Every node has one child
//! except [`Api::Alt`], which joins two independent descriptions, and the
//! leaves [`Api::Verb`] and [`Api::Raw`], which have none. Descriptions are
//! usually assembled with the prefix-first [`Route`] builder:
//!
//! ```rust
//! use routekit::{Api, ResultShape, RestMethod, Route, Verb};
//!
//! let users = Route::new()
//!     .path("users")
//!     .to(Route::new()
//!         .query_param("sort")
//!         .verb(Verb::json(RestMethod::Get))
//!         .or(Route::new()
//!             .body([mime::APPLICATION_JSON])
//!             .verb(Verb::json(RestMethod::Post))));
//!
//! let user = Route::new()
//!     .path("users")
//!     .capture("id")
//!     .verb(Verb::unit(RestMethod::Delete));
//!
//! let api = users.or(user);
//! assert_eq!(api.leaf_count(), 3);
//! ```

use mime::Mime;

use crate::method::RestMethod;

/// A node of an API description.
#[derive(Debug, Clone, PartialEq)]
pub enum Api {
    /// A literal path segment. Introduces no parameter.
    Path {
        /// The segment text, unescaped.
        segment: String,
        /// The rest of the description.
        sub: Box<Api>,
    },
    /// A path segment supplied by the caller.
    Capture {
        /// Parameter name, used for display only.
        name: String,
        /// The rest of the description.
        sub: Box<Api>,
    },
    /// An optional request header.
    Header {
        /// Header name.
        name: String,
        /// The rest of the description.
        sub: Box<Api>,
    },
    /// An optional single-valued query parameter.
    QueryParam {
        /// Query key.
        name: String,
        /// The rest of the description.
        sub: Box<Api>,
    },
    /// A repeated query parameter taking a sequence of values.
    QueryParams {
        /// Query key, repeated once per value.
        name: String,
        /// The rest of the description.
        sub: Box<Api>,
    },
    /// A value-less query flag.
    QueryFlag {
        /// Query key.
        name: String,
        /// The rest of the description.
        sub: Box<Api>,
    },
    /// A request body encoded with the first available media type.
    ReqBody {
        /// Acceptable body media types, in preference order.
        media_types: Vec<Mime>,
        /// The rest of the description.
        sub: Box<Api>,
    },
    /// A leaf fixing the HTTP method and response contract.
    Verb(Verb),
    /// Two endpoints sharing the description prefix above this node.
    Alt(Box<Api>, Box<Api>),
    /// A leaf taking its HTTP method at call time and accepting any status.
    Raw,
}

impl Api {
    /// Joins two descriptions into an alternative.
    pub fn alt(left: Api, right: Api) -> Self {
        Self::Alt(Box::new(left), Box::new(right))
    }

    /// Joins `self` with another description.
    pub fn or(self, other: Api) -> Self {
        Self::alt(self, other)
    }

    /// Joins a non-empty sequence of descriptions, nesting to the right.
    ///
    /// Returns `None` for an empty sequence.
    pub fn alts(descriptions: impl IntoIterator<Item = Api>) -> Option<Self> {
        let mut items: Vec<Api> = descriptions.into_iter().collect();
        let mut acc = items.pop()?;
        while let Some(prev) = items.pop() {
            acc = Self::alt(prev, acc);
        }
        Some(acc)
    }

    /// Returns the number of leaves (endpoints) in this description.
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Path { sub, .. }
            | Self::Capture { sub, .. }
            | Self::Header { sub, .. }
            | Self::QueryParam { sub, .. }
            | Self::QueryParams { sub, .. }
            | Self::QueryFlag { sub, .. }
            | Self::ReqBody { sub, .. } => sub.leaf_count(),
            Self::Verb(_) | Self::Raw => 1,
            Self::Alt(left, right) => left.leaf_count() + right.leaf_count(),
        }
    }
}

impl From<Verb> for Api {
    fn from(verb: Verb) -> Self {
        Self::Verb(verb)
    }
}

/// The shape of a verb's successful result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultShape {
    /// No body is expected; only 204 succeeds.
    Unit,
    /// A decoded body.
    Value,
    /// A decoded body plus the named response headers.
    ValueWithHeaders(Vec<String>),
}

impl ResultShape {
    /// Short name used in signatures and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Unit => "unit",
            Self::Value => "value",
            Self::ValueWithHeaders(_) => "value with headers",
        }
    }
}

/// A verb leaf: HTTP method, result shape and response media types.
#[derive(Debug, Clone, PartialEq)]
pub struct Verb {
    /// The HTTP method.
    pub method: RestMethod,
    /// What a successful response yields.
    pub result: ResultShape,
    /// Response media types the endpoint can decode, in preference order.
    pub media_types: Vec<Mime>,
}

impl Verb {
    /// Creates a verb with no response media types.
    pub fn new(method: RestMethod, result: ResultShape) -> Self {
        Self {
            method,
            result,
            media_types: Vec::new(),
        }
    }

    /// A verb expecting `204 No Content`.
    pub fn unit(method: RestMethod) -> Self {
        Self::new(method, ResultShape::Unit)
    }

    /// A verb decoding a JSON body.
    pub fn json(method: RestMethod) -> Self {
        Self::new(method, ResultShape::Value).with_media_types([mime::APPLICATION_JSON])
    }

    /// Replaces the response media types.
    pub fn with_media_types(mut self, media_types: impl IntoIterator<Item = Mime>) -> Self {
        self.media_types = media_types.into_iter().collect();
        self
    }

    /// Declares response headers to extract alongside the body.
    pub fn with_headers<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.result = ResultShape::ValueWithHeaders(names.into_iter().map(Into::into).collect());
        self
    }
}

/// One prefix combinator waiting for its sub-description.
#[derive(Debug, Clone, PartialEq)]
enum Prefix {
    Path(String),
    Capture(String),
    Header(String),
    QueryParam(String),
    QueryParams(String),
    QueryFlag(String),
    ReqBody(Vec<Mime>),
}

/// Prefix-first builder for [`Api`] descriptions.
///
/// Combinators are listed in the order a request traverses them and the
/// description is closed with a leaf ([`verb`](Self::verb), [`raw`](Self::raw))
/// or a sub-description ([`to`](Self::to)).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Route {
    prefix: Vec<Prefix>,
}

impl Route {
    /// Creates an empty route.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a literal path segment.
    pub fn path(mut self, segment: impl Into<String>) -> Self {
        self.prefix.push(Prefix::Path(segment.into()));
        self
    }

    /// Appends a captured path segment.
    pub fn capture(mut self, name: impl Into<String>) -> Self {
        self.prefix.push(Prefix::Capture(name.into()));
        self
    }

    /// Appends an optional request header.
    pub fn header(mut self, name: impl Into<String>) -> Self {
        self.prefix.push(Prefix::Header(name.into()));
        self
    }

    /// Appends an optional query parameter.
    pub fn query_param(mut self, name: impl Into<String>) -> Self {
        self.prefix.push(Prefix::QueryParam(name.into()));
        self
    }

    /// Appends a repeated query parameter.
    pub fn query_params(mut self, name: impl Into<String>) -> Self {
        self.prefix.push(Prefix::QueryParams(name.into()));
        self
    }

    /// Appends a query flag.
    pub fn query_flag(mut self, name: impl Into<String>) -> Self {
        self.prefix.push(Prefix::QueryFlag(name.into()));
        self
    }

    /// Appends a request body with its acceptable media types.
    pub fn body(mut self, media_types: impl IntoIterator<Item = Mime>) -> Self {
        self.prefix
            .push(Prefix::ReqBody(media_types.into_iter().collect()));
        self
    }

    /// Closes the route with a verb leaf.
    pub fn verb(self, verb: Verb) -> Api {
        self.to(Api::Verb(verb))
    }

    /// Closes the route with a raw leaf.
    pub fn raw(self) -> Api {
        self.to(Api::Raw)
    }

    /// Closes the route with an arbitrary sub-description.
    pub fn to(self, sub: Api) -> Api {
        self.prefix.into_iter().rev().fold(sub, |sub, prefix| {
            let sub = Box::new(sub);
            match prefix {
                Prefix::Path(segment) => Api::Path { segment, sub },
                Prefix::Capture(name) => Api::Capture { name, sub },
                Prefix::Header(name) => Api::Header { name, sub },
                Prefix::QueryParam(name) => Api::QueryParam { name, sub },
                Prefix::QueryParams(name) => Api::QueryParams { name, sub },
                Prefix::QueryFlag(name) => Api::QueryFlag { name, sub },
                Prefix::ReqBody(media_types) => Api::ReqBody { media_types, sub },
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_nests_in_order() {
        let api = Route::new()
            .path("users")
            .capture("id")
            .verb(Verb::unit(RestMethod::Delete));

        let Api::Path { segment, sub } = api else {
            panic!("expected path node");
        };
        assert_eq!(segment, "users");
        let Api::Capture { name, sub } = *sub else {
            panic!("expected capture node");
        };
        assert_eq!(name, "id");
        assert_eq!(*sub, Api::Verb(Verb::unit(RestMethod::Delete)));
    }

    #[test]
    fn test_empty_route_is_leaf() {
        assert_eq!(Route::new().raw(), Api::Raw);
    }

    #[test]
    fn test_alts_nests_right() {
        let a = Route::new().path("a").raw();
        let b = Route::new().path("b").raw();
        let c = Route::new().path("c").raw();
        let joined = Api::alts([a.clone(), b.clone(), c.clone()]).unwrap();
        assert_eq!(joined, Api::alt(a, Api::alt(b, c)));
        assert_eq!(joined.leaf_count(), 3);
        assert!(Api::alts(Vec::new()).is_none());
    }

    #[test]
    fn test_verb_with_headers() {
        let verb = Verb::json(RestMethod::Get).with_headers(["X-Total-Count"]);
        assert_eq!(
            verb.result,
            ResultShape::ValueWithHeaders(vec!["X-Total-Count".to_string()])
        );
        assert_eq!(verb.media_types, vec![mime::APPLICATION_JSON]);
        assert_eq!(verb.result.name(), "value with headers");
    }
}
