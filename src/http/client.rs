//! Request client: credential handling and the uniform request/response pipeline.

use anyhow::{Context, Result, bail};
use log::{debug, warn};
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::{PoisonError, RwLock};

use super::descriptor::{Method, RequestDescriptor};
use super::error::RequestFailed;
use super::form::FormPayload;
use super::transport::{OutgoingRequest, RequestBody, Transport, TransportResponse};
use crate::credential::{CREDENTIAL_KEY, CredentialStore};
use crate::normalize::normalize_error;

/// Client for the travel-planner API.
///
/// Every request goes through [`RequestClient::execute`] (or
/// [`RequestClient::upload`] for multipart), which attaches the stored bearer
/// credential, interprets the status and turns error bodies into a single
/// message via [`normalize_error`]. Requests are never retried.
pub struct RequestClient<T: Transport, S: CredentialStore> {
    base_url: String,
    transport: T,
    store: S,
    credential: RwLock<Option<String>>,
}

impl<T: Transport, S: CredentialStore> RequestClient<T, S> {
    /// Creates a client for `base_url`, loading any credential already in `store`.
    pub fn new(base_url: impl Into<String>, transport: T, store: S) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let credential = store
            .get(CREDENTIAL_KEY)
            .context("Failed to load stored credential")?
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty());

        if let Some(token) = &credential {
            debug!("Loaded stored credential {}", mask_token(token));
        }

        Ok(Self {
            base_url,
            transport,
            store,
            credential: RwLock::new(credential),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The credential requests issued from now on will carry.
    pub fn credential(&self) -> Option<String> {
        self.credential
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.credential().is_some()
    }

    /// Stores `token` durably and uses it for all subsequent requests.
    ///
    /// Surrounding whitespace is trimmed; a blank token clears the credential.
    #[tracing::instrument(skip(self, token))]
    pub fn set_credential(&self, token: impl Into<String>) -> Result<()> {
        let token = token.into().trim().to_string();
        if token.is_empty() {
            return self.clear_credential();
        }
        self.store
            .set(CREDENTIAL_KEY, &token)
            .context("Failed to persist credential")?;
        debug!("Using credential {}", mask_token(&token));
        *self
            .credential
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(token);
        Ok(())
    }

    /// Forgets the credential, both in memory and in durable storage.
    #[tracing::instrument(skip(self))]
    pub fn clear_credential(&self) -> Result<()> {
        self.store
            .remove(CREDENTIAL_KEY)
            .context("Failed to remove stored credential")?;
        *self
            .credential
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
        debug!("Credential cleared");
        Ok(())
    }

    /// JSON content type, plus `Authorization: Bearer <token>` when `include_auth`
    /// is set and a credential is present.
    pub fn build_headers(&self, include_auth: bool) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if include_auth {
            if let Some(token) = self.credential() {
                headers.insert(AUTHORIZATION, bearer_value(&token)?);
            }
        }

        Ok(headers)
    }

    /// Only the Authorization header; the transport sets the multipart content type.
    fn upload_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        if let Some(token) = self.credential() {
            headers.insert(AUTHORIZATION, bearer_value(&token)?);
        }
        Ok(headers)
    }

    fn url_for(&self, descriptor: &RequestDescriptor) -> Result<String> {
        if !descriptor.path.starts_with('/') {
            bail!(
                "Request path must be server-relative (start with '/'): {}",
                descriptor.path
            );
        }
        Ok(format!("{}{}", self.base_url, descriptor.target()))
    }

    /// Issues `descriptor` and interprets the response.
    ///
    /// Resolves to `None` on 204 No Content and to the decoded JSON body on any
    /// other success status. A non-success status fails with [`RequestFailed`]
    /// whose message comes from [`normalize_error`]; an error body that is not
    /// JSON is treated as `{}`.
    #[tracing::instrument(skip(self, descriptor), fields(method = %descriptor.method, path = %descriptor.path))]
    pub async fn execute(&self, descriptor: &RequestDescriptor) -> Result<Option<Value>> {
        let url = self.url_for(descriptor)?;
        let headers = self.build_headers(descriptor.requires_auth)?;
        let body = match &descriptor.body {
            Some(payload) => RequestBody::Json(
                serde_json::to_string(payload).context("Failed to serialize request body")?,
            ),
            None => RequestBody::Empty,
        };

        debug!("{} {}", descriptor.method, url);
        let response = self
            .send(OutgoingRequest {
                method: descriptor.method,
                url,
                headers,
                body,
            })
            .await?;

        if !response.status.is_success() {
            let body = serde_json::from_slice::<Value>(&response.body)
                .unwrap_or_else(|_| Value::Object(Map::new()));
            return Err(failure(response.status, &body));
        }

        if response.status == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let value = serde_json::from_slice(&response.body).context("Failed to parse JSON response")?;
        Ok(Some(value))
    }

    /// GET with `query` encoded in the given order; an empty slice adds no `?`.
    pub async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Option<Value>> {
        let descriptor = RequestDescriptor::get(path).with_query(query.iter().copied());
        self.execute(&descriptor).await
    }

    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Option<Value>> {
        let descriptor = RequestDescriptor::post(path, to_json(body)?);
        self.execute(&descriptor).await
    }

    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Option<Value>> {
        let descriptor = RequestDescriptor::put(path, to_json(body)?);
        self.execute(&descriptor).await
    }

    pub async fn delete(&self, path: &str) -> Result<Option<Value>> {
        self.execute(&RequestDescriptor::delete(path)).await
    }

    /// POSTs a multipart form to `path`.
    ///
    /// Follows the same credential and status rules as [`RequestClient::execute`],
    /// except that an error body which is not valid JSON fails with a parse error
    /// instead of falling back to `{}`.
    #[tracing::instrument(skip(self, form))]
    pub async fn upload(&self, path: &str, form: FormPayload) -> Result<Option<Value>> {
        let url = self.url_for(&RequestDescriptor::new(Method::Post, path))?;
        let headers = self.upload_headers()?;

        debug!("POST {} (multipart, {} parts)", url, form.parts().len());
        let response = self
            .send(OutgoingRequest {
                method: Method::Post,
                url,
                headers,
                body: RequestBody::Multipart(form),
            })
            .await?;

        if !response.status.is_success() {
            let body: Value = serde_json::from_slice(&response.body)
                .context("Failed to parse upload error response")?;
            return Err(failure(response.status, &body));
        }

        if response.status == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let value =
            serde_json::from_slice(&response.body).context("Failed to parse upload response")?;
        Ok(Some(value))
    }

    async fn send(&self, request: OutgoingRequest) -> Result<TransportResponse> {
        let target = format!("{} {}", request.method, request.url);
        match self.transport.send(request).await {
            Ok(response) => {
                debug!("{} -> {}", target, response.status);
                Ok(response)
            }
            Err(e) => {
                warn!("{} failed: {:#}", target, e);
                Err(e)
            }
        }
    }
}

fn failure(status: StatusCode, body: &Value) -> anyhow::Error {
    let message = normalize_error(body, status.as_u16());
    warn!("Request failed ({}): {}", status.as_u16(), message);
    anyhow::Error::from(RequestFailed::new(status, message))
}

fn to_json<B: Serialize + ?Sized>(body: &B) -> Result<Value> {
    serde_json::to_value(body).context("Failed to serialize request body")
}

fn bearer_value(token: &str) -> Result<HeaderValue> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
        .context("Credential contains characters that are not allowed in a header")?;
    value.set_sensitive(true);
    Ok(value)
}

/// First and last few characters only, for logs.
fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 12 {
        return "*********".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}*********{}", head, tail)
}
