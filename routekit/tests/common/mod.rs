//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::Mutex;

use reqwest::header::{HeaderValue, CONTENT_TYPE};
use routekit::{Api, ClientEnv, ClientTree, HttpResponse, Request, Transport, TransportError};
use url::Url;

/// In-memory transport that records requests and replays one canned response.
#[derive(Debug)]
pub struct MockTransport {
    response: Mutex<Result<HttpResponse, String>>,
    requests: Mutex<Vec<(Request, Option<Url>)>>,
}

impl MockTransport {
    /// Replies to every request with `response`.
    pub fn replying(response: HttpResponse) -> Self {
        Self {
            response: Mutex::new(Ok(response)),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Fails every request with a transport error.
    pub fn failing(message: &str) -> Self {
        Self {
            response: Mutex::new(Err(message.to_string())),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Replaces the canned response.
    pub fn set_response(&self, response: HttpResponse) {
        *self.response.lock().unwrap() = Ok(response);
    }

    /// Requests seen so far, in order.
    pub fn requests(&self) -> Vec<Request> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|(request, _)| request.clone())
            .collect()
    }

    /// The most recent request.
    pub fn last_request(&self) -> Request {
        self.requests().pop().expect("no request was sent")
    }

    /// Number of requests sent.
    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl Transport for MockTransport {
    async fn send(
        &self,
        request: Request,
        base_url: Option<&Url>,
    ) -> Result<HttpResponse, TransportError> {
        self.requests
            .lock()
            .unwrap()
            .push((request, base_url.cloned()));
        self.response
            .lock()
            .unwrap()
            .clone()
            .map_err(TransportError::Other)
    }
}

/// A response with a content type.
pub fn response(status: u16, content_type: &str, body: &str) -> HttpResponse {
    let mut response = HttpResponse::new(status, body.to_string());
    response
        .headers
        .insert(CONTENT_TYPE, HeaderValue::from_str(content_type).unwrap());
    response
}

/// A JSON response.
pub fn json(status: u16, body: &str) -> HttpResponse {
    response(status, "application/json", body)
}

/// An empty response with no content type.
pub fn empty(status: u16) -> HttpResponse {
    HttpResponse::new(status, Vec::<u8>::new())
}

/// Derives `api` against a mock transport replying with `response`.
pub fn derive(api: &Api, response: HttpResponse) -> (ClientEnv<MockTransport>, ClientTree<MockTransport>) {
    let env = ClientEnv::new(MockTransport::replying(response));
    let tree = env
        .client(api, Some(Url::parse("http://api.test/v1").unwrap()))
        .unwrap();
    (env, tree)
}
