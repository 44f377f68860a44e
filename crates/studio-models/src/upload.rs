//! Types used by the photo upload workflow.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Photo;

/// Whether an uploaded photo belongs to a job or to a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum OwnerKind {
    Job,
    Profile,
}

impl OwnerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OwnerKind::Job => "job",
            OwnerKind::Profile => "profile",
        }
    }

    /// Name of the owner field in the create-photo body.
    pub fn id_field(&self) -> &'static str {
        match self {
            OwnerKind::Job => "job_id",
            OwnerKind::Profile => "profile_id",
        }
    }
}

impl fmt::Display for OwnerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown owner kind '{0}', expected 'job' or 'profile'")]
pub struct ParseOwnerKindError(pub String);

impl FromStr for OwnerKind {
    type Err = ParseOwnerKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "job" => Ok(OwnerKind::Job),
            "profile" => Ok(OwnerKind::Profile),
            _ => Err(ParseOwnerKindError(s.to_string())),
        }
    }
}

/// Pre-signed upload destination issued by the server.
///
/// Short-lived; used for exactly one upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct UploadTarget {
    pub url: String,
    /// Object key, only returned by the legacy upload flow
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

/// Result of a successful photo upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct UploadOutcome {
    /// The photo record created for the upload
    pub photo: Photo,
    /// HTTP status of the final upload PUT
    pub upload_status: u16,
}
