//! The network seam: one request in, status and body out.

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode};

use super::descriptor::Method;
use super::form::FormPayload;

/// Body of an outgoing request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    /// JSON text, already serialized.
    Json(String),
    Multipart(FormPayload),
}

/// A fully resolved request, ready for the wire.
#[derive(Debug, Clone)]
pub struct OutgoingRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: RequestBody,
}

/// Raw response as received from the server.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issues the request. Errors here mean the server was never reached or the
    /// connection broke; HTTP error statuses are returned as responses.
    async fn send(&self, request: OutgoingRequest) -> Result<TransportResponse>;
}

/// [`Transport`] backed by a reqwest [`Client`].
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    #[tracing::instrument(skip(self, request))]
    async fn send(&self, request: OutgoingRequest) -> Result<TransportResponse> {
        let OutgoingRequest {
            method,
            url,
            headers,
            body,
        } = request;

        let mut builder = self.client.request(method.into(), &url).headers(headers);
        builder = match body {
            RequestBody::Empty => builder,
            RequestBody::Json(text) => builder.body(text),
            RequestBody::Multipart(payload) => builder.multipart(payload.into_form()?),
        };

        let response = builder
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .context("Failed to read response body")?;

        debug!("{} {} -> {} ({} bytes)", method, url, status, body.len());

        Ok(TransportResponse {
            status,
            body: body.to_vec(),
        })
    }
}
