//! Client for the Studio photo-processing API.
//!
//! This crate provides:
//! - Authenticated request transport for `/api/public/v{version}/`
//! - Job, profile and photo endpoints
//! - The photo upload workflow (checksum, pre-signed PUT, retry, cleanup)
//! - Webhook signature verification
//!
//! Every operation returns [`StudioResult`]; server-side failures surface as
//! [`StudioError::Server`] with the status and the server's message.

pub mod backoff;
pub mod config;
pub mod error;
mod jobs;
mod photos;
mod profiles;
pub mod transport;
pub mod upload;
pub mod webhook;

pub use backoff::{Backoff, FixedDelay, UploadRetryConfig};
pub use config::StudioConfig;
pub use error::{ErrorDescriptor, StudioError, StudioResult};
pub use transport::{ApiRequest, HttpMethod, StudioClient};
pub use upload::{content_md5, ALLOWED_EXTENSIONS, MAX_FILE_SIZE};
pub use webhook::{sign_payload, verify_signature, WebhookVerifier};

pub use studio_models as models;
