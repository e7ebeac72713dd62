//! HTTP methods for derived clients.

use strum::{Display, EnumIter, EnumString};

/// An HTTP method as it appears in an API description.
///
/// Only the [declarative](Self::is_declarative) methods may terminate a
/// `Verb` node. Every method can be passed to a `Raw` endpoint at call time.
///
/// ```rust
/// use routekit::RestMethod;
///
/// let parsed: RestMethod = "PATCH".parse().unwrap();
/// assert_eq!(parsed, RestMethod::Patch);
/// assert!(parsed.is_declarative());
/// assert!(!RestMethod::Head.is_declarative());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[strum(serialize_all = "UPPERCASE")]
pub enum RestMethod {
    /// HTTP GET. Value results accept `200`/`203`, plus `204` when headers are declared.
    Get,
    /// HTTP POST. Value results accept `200`/`201`.
    Post,
    /// HTTP PUT. Value results accept `200`/`201`.
    Put,
    /// HTTP PATCH. Value results accept `200`/`201`, plus `204` when headers are declared.
    Patch,
    /// HTTP DELETE. Value results accept `200`/`202`.
    Delete,
    /// HTTP HEAD. Raw endpoints only.
    Head,
    /// HTTP OPTIONS. Raw endpoints only.
    Options,
    /// HTTP TRACE. Raw endpoints only.
    Trace,
}

impl RestMethod {
    /// Whether this method has a success-status policy and may end a `Verb`.
    pub fn is_declarative(&self) -> bool {
        matches!(
            self,
            Self::Get | Self::Post | Self::Put | Self::Patch | Self::Delete
        )
    }

    /// Converts to the equivalent `reqwest::Method`.
    pub fn to_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Patch => reqwest::Method::PATCH,
            Self::Delete => reqwest::Method::DELETE,
            Self::Head => reqwest::Method::HEAD,
            Self::Options => reqwest::Method::OPTIONS,
            Self::Trace => reqwest::Method::TRACE,
        }
    }
}

impl From<RestMethod> for reqwest::Method {
    fn from(method: RestMethod) -> Self {
        method.to_reqwest()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_uppercase_wire_names() {
        let names: Vec<_> = RestMethod::iter().map(|m| m.to_string()).collect();
        assert_eq!(
            names,
            ["GET", "POST", "PUT", "PATCH", "DELETE", "HEAD", "OPTIONS", "TRACE"]
        );
        assert_eq!("DELETE".parse::<RestMethod>().unwrap(), RestMethod::Delete);
        assert!("get".parse::<RestMethod>().is_err());
        assert!("FETCH".parse::<RestMethod>().is_err());
    }

    #[test]
    fn test_only_verbs_with_a_policy_are_declarative() {
        let declarative: Vec<_> = RestMethod::iter().filter(RestMethod::is_declarative).collect();
        assert_eq!(
            declarative,
            vec![
                RestMethod::Get,
                RestMethod::Post,
                RestMethod::Put,
                RestMethod::Patch,
                RestMethod::Delete
            ]
        );
    }

    #[test]
    fn test_converts_to_reqwest() {
        for method in RestMethod::iter() {
            assert_eq!(reqwest::Method::from(method).as_str(), method.to_string());
        }
    }
}
