//! Textual rendering of captures, query values and header values.

use std::borrow::Cow;

/// Renders a value as text for use in a request.
///
/// Path captures use [`to_url_piece`](Self::to_url_piece), query values use
/// [`to_query_param`](Self::to_query_param) and headers use
/// [`to_header`](Self::to_header). The text is unescaped; escaping happens when
/// the request URL is built.
///
/// ## Examples
///
/// ```rust
/// use routekit::ToHttpApiData;
///
/// assert_eq!(42u32.to_url_piece(), "42");
/// assert_eq!(true.to_query_param(), "true");
/// assert_eq!("abc".to_header(), "abc");
/// ```
pub trait ToHttpApiData {
    /// Renders the value as a path segment.
    fn to_url_piece(&self) -> String;

    /// Renders the value as a query parameter value.
    fn to_query_param(&self) -> String {
        self.to_url_piece()
    }

    /// Renders the value as a header value.
    fn to_header(&self) -> String {
        self.to_url_piece()
    }
}

impl<T: ToHttpApiData + ?Sized> ToHttpApiData for &T {
    fn to_url_piece(&self) -> String {
        (**self).to_url_piece()
    }

    fn to_query_param(&self) -> String {
        (**self).to_query_param()
    }

    fn to_header(&self) -> String {
        (**self).to_header()
    }
}

impl ToHttpApiData for str {
    fn to_url_piece(&self) -> String {
        self.to_string()
    }
}

impl ToHttpApiData for String {
    fn to_url_piece(&self) -> String {
        self.clone()
    }
}

impl ToHttpApiData for Cow<'_, str> {
    fn to_url_piece(&self) -> String {
        self.to_string()
    }
}

impl ToHttpApiData for url::Url {
    fn to_url_piece(&self) -> String {
        self.as_str().to_string()
    }
}

macro_rules! display_http_api_data {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ToHttpApiData for $ty {
                fn to_url_piece(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

display_http_api_data!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
);
