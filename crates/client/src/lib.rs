//! Typed access to the Regulations.gov v4 REST API.
//!
//! [`RegulationsClient`] composes the parameter normalizer from `regulus-core`
//! with a single GET per call. Responses are classified into [`ApiOutcome`]:
//! 404 and 500 come back as data, every other failure is a [`ClientError`].

pub mod accessors;
pub mod client;
pub mod error;
pub mod models;
pub mod outcome;
pub mod transport;

pub use client::RegulationsClient;
pub use error::ClientError;
pub use models::{
    AttachmentAttributes, DetailEnvelope, FileFormat, ListEnvelope, PageMeta, Resource,
};
pub use outcome::ApiOutcome;
pub use transport::{ApiRequest, RawResponse, ReqwestTransport, Transport};
