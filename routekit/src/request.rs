//! The in-progress HTTP request built for each endpoint invocation.

use bytes::Bytes;
use mime::Mime;
use url::Url;

use crate::method::RestMethod;

/// An encoded request body and its content type.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestBody {
    /// The encoded bytes.
    pub bytes: Bytes,
    /// The media type the bytes were encoded as.
    pub content_type: Mime,
}

/// Request accumulator.
///
/// Path segments and query entries only ever grow, in order; headers are
/// last-write-wins by case-insensitive name; the body is overwritten when set
/// again. The method stays unset until [`finalize`](Self::finalize).
///
/// ## Examples
///
/// ```rust
/// use routekit::{Request, RestMethod};
/// use url::Url;
///
/// let mut request = Request::new();
/// request.push_segment("users");
/// request.push_segment("42");
/// request.append_query("verbose", None);
/// let request = request.finalize(RestMethod::Get);
///
/// let base = Url::parse("https://api.example.com/v1").unwrap();
/// assert_eq!(
///     request.url(&base).unwrap().as_str(),
///     "https://api.example.com/v1/users/42?verbose"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Request {
    method: Option<RestMethod>,
    path: Vec<String>,
    query: Vec<(String, Option<String>)>,
    headers: Vec<(String, String)>,
    body: Option<RequestBody>,
    accept: Vec<Mime>,
}

impl Request {
    /// Creates an empty request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a path segment.
    pub fn push_segment(&mut self, segment: impl Into<String>) {
        self.path.push(segment.into());
    }

    /// Appends a query entry. `None` renders as a value-less key.
    pub fn append_query(&mut self, name: impl Into<String>, value: Option<String>) {
        self.query.push((name.into(), value));
    }

    /// Sets a header, replacing any earlier value for the same name.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self
            .headers
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&name))
        {
            Some(slot) => slot.1 = value,
            None => self.headers.push((name, value)),
        }
    }

    /// Sets the body, replacing any earlier body.
    pub fn set_body(&mut self, bytes: Bytes, content_type: Mime) {
        self.body = Some(RequestBody {
            bytes,
            content_type,
        });
    }

    /// Sets the media types the caller can decode, in preference order.
    pub fn set_accept(&mut self, accept: Vec<Mime>) {
        self.accept = accept;
    }

    /// Fixes the HTTP method.
    pub fn finalize(mut self, method: RestMethod) -> Self {
        self.method = Some(method);
        self
    }

    /// The HTTP method, once finalized.
    pub fn method(&self) -> Option<RestMethod> {
        self.method
    }

    /// The resolved path segments, unescaped.
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// The query entries in insertion order.
    pub fn query(&self) -> &[(String, Option<String>)] {
        &self.query
    }

    /// The headers in first-insertion order.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Looks up a header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// The request body, if any.
    pub fn body(&self) -> Option<&RequestBody> {
        self.body.as_ref()
    }

    /// The accepted response media types.
    pub fn accept(&self) -> &[Mime] {
        &self.accept
    }

    /// Returns all values of a query key, in order. Flags yield `None`.
    pub fn query_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = Option<&'a str>> + 'a {
        self.query
            .iter()
            .filter(move |(key, _)| key == name)
            .map(|(_, value)| value.as_deref())
    }

    /// Renders the path as `/a/b`, unescaped, for logs and signatures.
    pub fn path_string(&self) -> String {
        format!("/{}", self.path.join("/"))
    }

    /// Builds the full URL against a base URL.
    ///
    /// The base URL's path is kept as a prefix; segments and query values are
    /// percent-encoded, and value-less query entries render as a bare key.
    ///
    /// ## Errors
    ///
    /// Returns an error if the base URL cannot have path segments
    /// (e.g. `mailto:` URLs).
    pub fn url(&self, base: &Url) -> Result<Url, url::ParseError> {
        let mut url = base.clone();
        if !self.path.is_empty() {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?;
            segments.pop_if_empty().extend(&self.path);
        }

        if !self.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in &self.query {
                match value {
                    Some(value) => pairs.append_pair(name, value),
                    None => pairs.append_key_only(name),
                };
            }
        }

        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("http://localhost:8080/api/").unwrap()
    }

    #[test]
    fn test_header_last_write_wins() {
        let mut request = Request::new();
        request.set_header("X-Token", "first");
        request.set_header("Accept-Language", "en");
        request.set_header("x-token", "second");

        assert_eq!(request.header("X-TOKEN"), Some("second"));
        assert_eq!(request.headers().len(), 2);
        assert_eq!(request.headers()[0].0, "X-Token");
    }

    #[test]
    fn test_query_preserves_duplicates_and_order() {
        let mut request = Request::new();
        request.append_query("tag", Some("b".to_string()));
        request.append_query("tag", Some("a".to_string()));
        request.append_query("all", None);

        let tags: Vec<_> = request.query_values("tag").collect();
        assert_eq!(tags, vec![Some("b"), Some("a")]);
        assert_eq!(request.query_values("all").collect::<Vec<_>>(), vec![None]);
    }

    #[test]
    fn test_body_overwrites() {
        let mut request = Request::new();
        request.set_body(Bytes::from_static(b"one"), mime::TEXT_PLAIN);
        request.set_body(Bytes::from_static(b"{}"), mime::APPLICATION_JSON);

        let body = request.body().unwrap();
        assert_eq!(body.bytes.as_ref(), b"{}");
        assert_eq!(body.content_type, mime::APPLICATION_JSON);
    }

    #[test]
    fn test_url_keeps_base_prefix_and_escapes() {
        let mut request = Request::new();
        request.push_segment("files");
        request.push_segment("a b/c");
        request.append_query("q", Some("x&y".to_string()));
        request.append_query("empty", Some(String::new()));

        let url = request.url(&base()).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/api/files/a%20b%2Fc?q=x%26y&empty="
        );
    }

    #[test]
    fn test_url_without_path_or_query() {
        let url = Request::new().url(&base()).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/");
        assert!(url.query().is_none());
    }

    #[test]
    fn test_finalize_sets_method() {
        let request = Request::new();
        assert_eq!(request.method(), None);
        assert_eq!(request.finalize(RestMethod::Patch).method(), Some(RestMethod::Patch));
    }

    #[test]
    fn test_path_string() {
        let mut request = Request::new();
        assert_eq!(request.path_string(), "/");
        request.push_segment("users");
        request.push_segment("7");
        assert_eq!(request.path_string(), "/users/7");
    }
}
