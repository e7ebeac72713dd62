//! Declared response headers extracted alongside a decoded body.

use std::str::FromStr;

use bytes::Bytes;
use reqwest::header::HeaderMap;

/// The state of one declared response header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseHeader {
    /// The header was present and valid visible ASCII.
    Present(String),
    /// The server did not send the header.
    Missing,
    /// The header was present but its value is not valid text.
    Undecodable(Bytes),
}

impl ResponseHeader {
    /// Returns the textual value if the header was present.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Present(value) => Some(value),
            _ => None,
        }
    }
}

/// Record of the response headers an endpoint declared, in declaration order.
///
/// Every declared name has an entry, whether or not the server sent it.
///
/// ## Examples
///
/// ```rust
/// use reqwest::header::HeaderMap;
/// use routekit::{ResponseHeader, ResponseHeaders};
///
/// let mut received = HeaderMap::new();
/// received.insert("x-total-count", "17".parse().unwrap());
///
/// let names = vec!["X-Total-Count".to_string(), "Link".to_string()];
/// let headers = ResponseHeaders::build(&names, &received);
///
/// assert_eq!(headers.parse::<u32>("x-total-count"), Some(Ok(17)));
/// assert_eq!(headers.get("Link"), Some(&ResponseHeader::Missing));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHeaders {
    entries: Vec<(String, ResponseHeader)>,
}

impl ResponseHeaders {
    /// Extracts the declared headers from a received header map.
    ///
    /// When a header occurs more than once, the first occurrence is used.
    pub fn build(names: &[String], received: &HeaderMap) -> Self {
        let entries = names
            .iter()
            .map(|name| {
                let header = match received.get(name.as_str()) {
                    None => ResponseHeader::Missing,
                    Some(value) => match value.to_str() {
                        Ok(text) => ResponseHeader::Present(text.to_string()),
                        Err(_) => ResponseHeader::Undecodable(Bytes::copy_from_slice(
                            value.as_bytes(),
                        )),
                    },
                };
                (name.clone(), header)
            })
            .collect();
        Self { entries }
    }

    /// Looks up a declared header by case-insensitive name.
    pub fn get(&self, name: &str) -> Option<&ResponseHeader> {
        self.entries
            .iter()
            .find(|(declared, _)| declared.eq_ignore_ascii_case(name))
            .map(|(_, header)| header)
    }

    /// Returns the header's text when it was present.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(ResponseHeader::as_str)
    }

    /// Parses a present header into `T`.
    ///
    /// Returns `None` when the header is undeclared, missing or undecodable.
    pub fn parse<T: FromStr>(&self, name: &str) -> Option<Result<T, T::Err>> {
        self.value(name).map(str::parse)
    }

    /// Iterates over declared headers in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ResponseHeader)> {
        self.entries.iter().map(|(name, header)| (name.as_str(), header))
    }

    /// Number of declared headers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no headers were declared.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A decoded value together with its declared response headers.
#[derive(Debug, Clone, PartialEq)]
pub struct WithHeaders<T> {
    /// The decoded body.
    pub value: T,
    /// The declared response headers.
    pub headers: ResponseHeaders,
}
