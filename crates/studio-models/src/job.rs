//! Job records and job request bodies.

use std::collections::HashMap;
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Job type for which uploads are tagged in storage.
pub const JOB_TYPE_REGULAR: &str = "regular";

/// A processing job as returned by the Studio API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Job {
    /// Server-assigned identifier
    pub id: u64,
    /// Job name (unique per account)
    #[serde(default)]
    pub name: Option<String>,
    /// Job type, e.g. "regular"
    #[serde(rename = "type", default)]
    pub job_type: Option<String>,
    /// Current job state as reported by the server
    #[serde(default)]
    pub state: Option<String>,
    /// Profile applied to the job's photos
    #[serde(default)]
    pub profile_id: Option<u64>,
    /// Remaining fields the client does not interpret
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl Job {
    /// Whether uploads for this job should carry storage tagging headers.
    pub fn is_regular(&self) -> bool {
        self.job_type.as_deref() == Some(JOB_TYPE_REGULAR)
    }
}

/// Body for creating a job.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct NewJob {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_id: Option<u64>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub job_type: Option<String>,
}

impl NewJob {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_profile(mut self, profile_id: u64) -> Self {
        self.profile_id = Some(profile_id);
        self
    }

    pub fn with_type(mut self, job_type: impl Into<String>) -> Self {
        self.job_type = Some(job_type.into());
        self
    }
}

/// Body for queueing a job.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct QueueOptions {
    /// URL the server calls back when the job finishes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
}

/// Reference to a job either by id or by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobRef {
    Id(u64),
    Name(String),
}

impl JobRef {
    /// Query parameter pair identifying the job.
    pub fn query_pair(&self) -> (&'static str, String) {
        match self {
            JobRef::Id(id) => ("job_id", id.to_string()),
            JobRef::Name(name) => ("job_name", name.clone()),
        }
    }
}

impl From<u64> for JobRef {
    fn from(id: u64) -> Self {
        JobRef::Id(id)
    }
}

impl From<&str> for JobRef {
    fn from(name: &str) -> Self {
        JobRef::Name(name.to_string())
    }
}

impl fmt::Display for JobRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobRef::Id(id) => write!(f, "{}", id),
            JobRef::Name(name) => write!(f, "{}", name),
        }
    }
}
