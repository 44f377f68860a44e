//! Processing profiles.

use std::collections::HashMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A processing profile as returned by the Studio API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Profile {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    /// Whether the profile extracts the subject from its background
    #[serde(default)]
    pub enable_extract: Option<bool>,
    /// Whether the profile replaces the background
    #[serde(default)]
    pub replace_background: Option<bool>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// Body for creating or updating a profile.
///
/// Profile photos can only be uploaded to profiles that have both
/// `enable_extract` and `replace_background` turned on server-side.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct NewProfile {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_crop: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_color: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_extract: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replace_background: Option<bool>,
}

impl NewProfile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Enable the flags required for uploading profile photos.
    pub fn with_background_replacement(mut self) -> Self {
        self.enable_extract = Some(true);
        self.replace_background = Some(true);
        self
    }
}
