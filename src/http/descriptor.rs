//! In-memory description of one HTTP call before it is issued.

use serde_json::Value;
use std::fmt;

/// HTTP verbs understood by the request layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// One intended request: route, verb, query, JSON body and whether to authenticate.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    /// Server-relative route, e.g. `/travel/plans`.
    pub path: String,
    pub method: Method,
    /// Query pairs, encoded in insertion order.
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub requires_auth: bool,
}

impl RequestDescriptor {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method,
            query: Vec::new(),
            body: None,
            requires_auth: true,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::Post, path).with_body(body)
    }

    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::Put, path).with_body(body)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Appends query pairs after any already present.
    pub fn with_query<K, V, I>(mut self, pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.query
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Marks the request as anonymous: no Authorization header is sent even when a
    /// credential is stored.
    pub fn without_auth(mut self) -> Self {
        self.requires_auth = false;
        self
    }

    /// The path followed by the encoded query string, if any.
    pub fn target(&self) -> String {
        let query = encode_query(&self.query);
        if query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, query)
        }
    }
}

/// Encodes pairs as `application/x-www-form-urlencoded`, keeping their order.
pub fn encode_query(pairs: &[(String, String)]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}
