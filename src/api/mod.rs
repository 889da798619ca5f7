//! Typed wrappers for the travel-planner endpoints.
//!
//! Each submodule adds methods to [`RequestClient`](crate::http::RequestClient)
//! for one area of the API. All of them go through the same request pipeline,
//! so failures carry the normalized server message.

mod auth;
mod expense;
mod map;
mod travel;
pub mod types;
mod voice;

pub use types::*;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Decodes a response body into `T`; an absent body is an error.
pub(crate) fn decode<T: DeserializeOwned>(value: Option<Value>, what: &str) -> Result<T> {
    let value = value.with_context(|| format!("Expected {} but the server sent no body", what))?;
    serde_json::from_value(value).with_context(|| format!("Unexpected {} format", what))
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::credential::MemoryCredentialStore;
    use crate::http::{MockTransport, OutgoingRequest, RequestBody, RequestClient, TransportResponse};
    use reqwest::StatusCode;
    use serde_json::Value;
    use std::sync::{Arc, Mutex};

    pub type TestClient = RequestClient<MockTransport, MemoryCredentialStore>;
    pub type Seen = Arc<Mutex<Vec<OutgoingRequest>>>;

    /// Client whose transport replies with `status`/`body` to everything and records requests.
    pub fn client(status: StatusCode, body: &str, token: Option<&str>) -> (TestClient, Seen) {
        let seen: Seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        let body = body.to_string();

        let mut transport = MockTransport::new();
        transport.expect_send().returning(move |request| {
            seen_clone.lock().unwrap().push(request);
            Ok(TransportResponse::new(status, body.clone()))
        });

        let store = match token {
            Some(token) => MemoryCredentialStore::with_token(token),
            None => MemoryCredentialStore::new(),
        };
        let client = RequestClient::new("http://travel.test", transport, store).unwrap();
        (client, seen)
    }

    pub fn json_body(request: &OutgoingRequest) -> Value {
        match &request.body {
            RequestBody::Json(text) => serde_json::from_str(text).unwrap(),
            other => panic!("expected JSON body, got {:?}", other),
        }
    }
}
