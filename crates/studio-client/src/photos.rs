//! Photo endpoints.

use serde::Serialize;
use serde_json::Value;
use studio_models::{JobRef, Photo, UploadTarget};

use crate::error::{StudioError, StudioResult};
use crate::transport::{ApiRequest, StudioClient};

impl StudioClient {
    pub async fn list_photos(&self) -> StudioResult<Vec<Photo>> {
        self.request(ApiRequest::get("photos")).await
    }

    pub async fn create_photo<P: Serialize + ?Sized>(&self, payload: &P) -> StudioResult<Photo> {
        self.request(ApiRequest::post("photos").payload(payload)?)
            .await
    }

    pub async fn get_photo(&self, photo_id: u64) -> StudioResult<Photo> {
        self.request(ApiRequest::get(format!("photos/{}", photo_id)))
            .await
    }

    /// List the photos of a job, looked up by id or by name.
    pub async fn get_job_photos(&self, job: impl Into<JobRef>) -> StudioResult<Vec<Photo>> {
        let (key, value) = job.into().query_pair();
        self.request(ApiRequest::get("photos/list_for_job").query(key, value))
            .await
    }

    pub async fn update_photo<P: Serialize + ?Sized>(
        &self,
        photo_id: u64,
        payload: &P,
    ) -> StudioResult<Photo> {
        self.request(ApiRequest::put(format!("photos/{}", photo_id)).payload(payload)?)
            .await
    }

    pub async fn delete_photo(&self, photo_id: u64) -> StudioResult<Value> {
        self.send(ApiRequest::delete(format!("photos/{}", photo_id)))
            .await
    }

    /// Request a pre-signed upload URL for a photo.
    ///
    /// `content_md5` is the base64 MD5 digest of the file; the storage
    /// backend rejects uploads whose bytes do not match it.
    pub async fn get_upload_url(
        &self,
        photo_id: u64,
        content_md5: &str,
        use_cache_upload: bool,
    ) -> StudioResult<UploadTarget> {
        let req = ApiRequest::get("photos/upload_url")
            .query("use_cache_upload", use_cache_upload.to_string())
            .query("photo_id", photo_id.to_string())
            .query("content_md5", content_md5);

        let value = self
            .send(req)
            .await
            .map_err(|e| StudioError::UploadUrlUnavailable(e.to_string()))?;

        parse_upload_target(value)
    }
}

fn parse_upload_target(value: Value) -> StudioResult<UploadTarget> {
    let url = value
        .get("url")
        .and_then(Value::as_str)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| StudioError::UploadUrlUnavailable(format!("no url in response: {}", value)))?;

    let key = value
        .get("key")
        .and_then(Value::as_str)
        .map(str::to_string);

    Ok(UploadTarget {
        url: url.to_string(),
        key,
    })
}
