//! The tree of derived endpoints.

use std::fmt;

use super::Endpoint;

/// Client functions mirroring the shape of an API description.
///
/// Each `Alt` in the description becomes an [`Alt`](Self::Alt) node here, and
/// every leaf becomes an [`Endpoint`]. Pattern-match or use
/// [`split`](Self::split) to take the tree apart.
///
/// ## Examples
///
/// ```rust,ignore
/// let (list_users, get_user) = tree.split().unwrap();
/// let list_users = list_users.into_endpoint().unwrap();
/// ```
pub enum ClientTree<T> {
    /// A single client function.
    Endpoint(Endpoint<T>),
    /// Two independent sub-trees.
    Alt(Box<ClientTree<T>>, Box<ClientTree<T>>),
}

impl<T> Clone for ClientTree<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Endpoint(endpoint) => Self::Endpoint(endpoint.clone()),
            Self::Alt(left, right) => Self::Alt(left.clone(), right.clone()),
        }
    }
}

impl<T> fmt::Debug for ClientTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Endpoint(endpoint) => f.debug_tuple("Endpoint").field(endpoint).finish(),
            Self::Alt(left, right) => f.debug_tuple("Alt").field(left).field(right).finish(),
        }
    }
}

impl<T> ClientTree<T> {
    /// Joins two trees.
    pub fn alt(left: ClientTree<T>, right: ClientTree<T>) -> Self {
        Self::Alt(Box::new(left), Box::new(right))
    }

    /// Returns the endpoint if this tree is a single leaf.
    pub fn as_endpoint(&self) -> Option<&Endpoint<T>> {
        match self {
            Self::Endpoint(endpoint) => Some(endpoint),
            Self::Alt(..) => None,
        }
    }

    /// Consumes a single-leaf tree into its endpoint.
    pub fn into_endpoint(self) -> Option<Endpoint<T>> {
        match self {
            Self::Endpoint(endpoint) => Some(endpoint),
            Self::Alt(..) => None,
        }
    }

    /// Splits an alternative into its two sides.
    pub fn split(self) -> Option<(ClientTree<T>, ClientTree<T>)> {
        match self {
            Self::Alt(left, right) => Some((*left, *right)),
            Self::Endpoint(_) => None,
        }
    }

    /// The left side of an alternative.
    pub fn left(&self) -> Option<&ClientTree<T>> {
        match self {
            Self::Alt(left, _) => Some(left),
            Self::Endpoint(_) => None,
        }
    }

    /// The right side of an alternative.
    pub fn right(&self) -> Option<&ClientTree<T>> {
        match self {
            Self::Alt(_, right) => Some(right),
            Self::Endpoint(_) => None,
        }
    }

    /// All endpoints, left to right.
    pub fn endpoints(&self) -> Vec<&Endpoint<T>> {
        let mut out = Vec::new();
        self.collect_refs(&mut out);
        out
    }

    /// Consumes the tree into its endpoints, left to right.
    pub fn into_endpoints(self) -> Vec<Endpoint<T>> {
        let mut out = Vec::new();
        self.collect_owned(&mut out);
        out
    }

    /// Finds the first endpoint with the given signature (e.g. `GET /users/:id`).
    pub fn find(&self, signature: &str) -> Option<&Endpoint<T>> {
        self.endpoints()
            .into_iter()
            .find(|endpoint| endpoint.signature() == signature)
    }

    /// Number of endpoints in the tree.
    pub fn len(&self) -> usize {
        match self {
            Self::Endpoint(_) => 1,
            Self::Alt(left, right) => left.len() + right.len(),
        }
    }

    /// Always `false`: a tree holds at least one endpoint.
    pub fn is_empty(&self) -> bool {
        false
    }

    fn collect_refs<'a>(&'a self, out: &mut Vec<&'a Endpoint<T>>) {
        match self {
            Self::Endpoint(endpoint) => out.push(endpoint),
            Self::Alt(left, right) => {
                left.collect_refs(out);
                right.collect_refs(out);
            }
        }
    }

    fn collect_owned(self, out: &mut Vec<Endpoint<T>>) {
        match self {
            Self::Endpoint(endpoint) => out.push(endpoint),
            Self::Alt(left, right) => {
                left.collect_owned(out);
                right.collect_owned(out);
            }
        }
    }
}
