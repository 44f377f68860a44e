//! Profile endpoints.

use serde::Serialize;
use studio_models::Profile;

use crate::error::StudioResult;
use crate::transport::{ApiRequest, StudioClient};

impl StudioClient {
    pub async fn list_profiles(&self) -> StudioResult<Vec<Profile>> {
        self.request(ApiRequest::get("profiles")).await
    }

    /// Create a profile. `payload` is usually a [`studio_models::NewProfile`].
    pub async fn create_profile<P: Serialize + ?Sized>(&self, payload: &P) -> StudioResult<Profile> {
        self.request(ApiRequest::post("profiles").payload(payload)?)
            .await
    }

    pub async fn get_profile(&self, profile_id: u64) -> StudioResult<Profile> {
        self.request(ApiRequest::get(format!("profiles/{}", profile_id)))
            .await
    }

    pub async fn get_profile_by_name(&self, name: &str) -> StudioResult<Profile> {
        self.request(ApiRequest::get("profiles/find_by_name").query("name", name))
            .await
    }

    pub async fn update_profile<P: Serialize + ?Sized>(
        &self,
        profile_id: u64,
        payload: &P,
    ) -> StudioResult<Profile> {
        self.request(ApiRequest::put(format!("profiles/{}", profile_id)).payload(payload)?)
            .await
    }
}
