//! Photo records.

use std::collections::HashMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A photo record as returned by the Studio API.
///
/// The record is created before any binary data is uploaded; the upload
/// workflow deletes it again if the transfer fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Photo {
    /// Server-assigned identifier
    pub id: u64,
    /// Original file name
    #[serde(default)]
    pub name: Option<String>,
    /// Owning job, if the photo belongs to a job
    #[serde(default)]
    pub job_id: Option<u64>,
    /// Owning profile, if the photo belongs to a profile
    #[serde(default)]
    pub profile_id: Option<u64>,
    /// Whether the server may serve this photo from its upload cache
    #[serde(default)]
    pub use_cache_upload: Option<bool>,
    /// Remaining fields the client does not interpret
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}
