//! HTTP request layer: descriptors, the transport seam, the client and its failures.

mod client;
mod descriptor;
mod error;
mod form;
mod transport;

pub use client::RequestClient;
pub use descriptor::{Method, RequestDescriptor, encode_query};
pub use error::{FailureKind, RequestFailed, classify_status};
pub use form::{FormPart, FormPayload};
#[cfg(test)]
pub use transport::MockTransport;
pub use transport::{OutgoingRequest, ReqwestTransport, RequestBody, Transport, TransportResponse};
