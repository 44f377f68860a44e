//! Job endpoints.

use serde::Serialize;
use serde_json::Value;
use studio_models::Job;

use crate::error::StudioResult;
use crate::transport::{ApiRequest, StudioClient};

impl StudioClient {
    pub async fn list_jobs(&self) -> StudioResult<Vec<Job>> {
        self.request(ApiRequest::get("jobs")).await
    }

    /// Create a job. `payload` is usually a [`studio_models::NewJob`].
    pub async fn create_job<P: Serialize + ?Sized>(&self, payload: &P) -> StudioResult<Job> {
        self.request(ApiRequest::post("jobs").payload(payload)?).await
    }

    pub async fn get_job(&self, job_id: u64) -> StudioResult<Job> {
        self.request(ApiRequest::get(format!("jobs/{}", job_id))).await
    }

    pub async fn get_job_by_name(&self, name: &str) -> StudioResult<Job> {
        self.request(ApiRequest::get("jobs/find_by_name").query("name", name))
            .await
    }

    pub async fn update_job<P: Serialize + ?Sized>(
        &self,
        job_id: u64,
        payload: &P,
    ) -> StudioResult<Job> {
        self.request(ApiRequest::put(format!("jobs/{}", job_id)).payload(payload)?)
            .await
    }

    /// Update the account-wide job callback URL.
    pub async fn update_job_callback_url<P: Serialize + ?Sized>(
        &self,
        payload: &P,
    ) -> StudioResult<Value> {
        self.send(ApiRequest::patch("jobs/job_callback_url").payload(payload)?)
            .await
    }

    /// Queue a job for processing. `payload` is usually a
    /// [`studio_models::QueueOptions`].
    pub async fn queue_job<P: Serialize + ?Sized>(
        &self,
        job_id: u64,
        payload: &P,
    ) -> StudioResult<Value> {
        self.send(ApiRequest::post(format!("jobs/{}/queue", job_id)).payload(payload)?)
            .await
    }

    /// Number of jobs ahead of this one in the processing queue.
    pub async fn fetch_jobs_in_front(&self, job_id: u64) -> StudioResult<Value> {
        self.send(ApiRequest::get(format!("jobs/{}/jobs_in_front", job_id)))
            .await
    }

    pub async fn process_job(&self, job_id: u64) -> StudioResult<Value> {
        self.send(ApiRequest::post(format!("jobs/{}/process", job_id)))
            .await
    }

    pub async fn cancel_job(&self, job_id: u64) -> StudioResult<Value> {
        self.send(ApiRequest::post(format!("jobs/{}/cancel", job_id)))
            .await
    }

    pub async fn delete_job(&self, job_id: u64) -> StudioResult<Value> {
        self.send(ApiRequest::delete(format!("jobs/{}", job_id))).await
    }
}
