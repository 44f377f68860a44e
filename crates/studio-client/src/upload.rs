//! Photo upload workflow.
//!
//! An upload is a sequence of gated steps:
//! 1. Validate extension and size locally (no network traffic on failure)
//! 2. Compute the base64 MD5 of the file content
//! 3. Create the photo record on the server
//! 4. Obtain a pre-signed upload URL bound to the checksum
//! 5. PUT the bytes to storage, retrying a bounded number of times
//!
//! Once the record exists, any failure deletes it again so the server never
//! keeps a photo without binary data.

use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine};
use bytes::Bytes;
use md5::{Digest, Md5};
use serde_json::{Map, Value};
use studio_models::{OwnerKind, Photo, UploadOutcome};
use tracing::{debug, info_span, warn, Instrument};

use crate::error::{StudioError, StudioResult};
use crate::transport::{ApiRequest, StudioClient};

/// Accepted file extensions, compared case-insensitively.
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

/// Largest accepted photo (27 MiB).
pub const MAX_FILE_SIZE: u64 = 27 * 1024 * 1024;

/// Storage tagging header sent for photos of regular jobs.
pub const TAGGING_HEADER: &str = "X-Amz-Tagging";

/// Tag set applied to photos of regular jobs.
pub const REGULAR_JOB_TAGGING: &str = "job=photo&api=true";

/// Checksum header verified by the storage backend.
pub const CONTENT_MD5_HEADER: &str = "Content-MD5";

/// Check that the file name carries an accepted image extension.
pub fn validate_extension(path: &Path) -> StudioResult<()> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();

    if ALLOWED_EXTENSIONS
        .iter()
        .any(|allowed| extension.eq_ignore_ascii_case(allowed))
    {
        Ok(())
    } else {
        Err(StudioError::InvalidFileType {
            path: path.display().to_string(),
            extension: extension.to_string(),
        })
    }
}

pub fn validate_size(size: u64) -> StudioResult<()> {
    if size > MAX_FILE_SIZE {
        return Err(StudioError::InvalidFileSize {
            size,
            max: MAX_FILE_SIZE,
        });
    }
    Ok(())
}

/// Base64 of the raw MD5 digest (not of its hex form), as used by `Content-MD5`.
pub fn content_md5(data: &[u8]) -> String {
    STANDARD.encode(Md5::digest(data))
}

impl StudioClient {
    /// Upload a photo file for a job or a profile.
    ///
    /// Validation failures return before any request is made. Failures after
    /// the photo record was created delete that record before returning.
    pub async fn upload_photo(
        &self,
        path: impl AsRef<Path>,
        owner_id: u64,
        owner: OwnerKind,
    ) -> StudioResult<UploadOutcome> {
        let path = path.as_ref();
        validate_extension(path)?;

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| StudioError::InvalidFileType {
                path: path.display().to_string(),
                extension: String::new(),
            })?
            .to_string();

        let size = tokio::fs::metadata(path).await?.len();
        validate_size(size)?;

        let data = tokio::fs::read(path).await?;
        self.upload_photo_bytes(&file_name, data, owner_id, owner)
            .await
    }

    /// Upload in-memory image bytes under the given file name.
    pub async fn upload_photo_bytes(
        &self,
        file_name: &str,
        data: impl Into<Bytes>,
        owner_id: u64,
        owner: OwnerKind,
    ) -> StudioResult<UploadOutcome> {
        let data: Bytes = data.into();
        validate_extension(Path::new(file_name))?;
        validate_size(data.len() as u64)?;

        let span = info_span!("photo_upload", owner = %owner, owner_id, file = %file_name);
        self.run_upload(file_name, data, owner_id, owner)
            .instrument(span)
            .await
    }

    async fn run_upload(
        &self,
        file_name: &str,
        data: Bytes,
        owner_id: u64,
        owner: OwnerKind,
    ) -> StudioResult<UploadOutcome> {
        let checksum = content_md5(&data);
        let (photo_id, record) = self.create_photo_record(file_name, owner_id, owner).await?;
        if self.config.debug {
            debug!(photo_id, "Created photo record");
        }

        let result = self
            .transfer(photo_id, record, data, &checksum, owner_id, owner)
            .await;
        if let Err(e) = &result {
            self.discard_photo(photo_id, e).await;
        }
        result
    }

    /// Create the photo record and return its id with the raw response.
    ///
    /// The record only counts as created once the response carries a
    /// numeric `id`; everything after that point is compensated.
    async fn create_photo_record(
        &self,
        file_name: &str,
        owner_id: u64,
        owner: OwnerKind,
    ) -> StudioResult<(u64, Value)> {
        let mut body = Map::new();
        body.insert(owner.id_field().to_string(), Value::from(owner_id));
        body.insert("name".to_string(), Value::from(file_name));
        body.insert("use_cache_upload".to_string(), Value::Bool(false));

        let response = self
            .send(ApiRequest::post("photos").payload(&body)?)
            .await
            .map_err(|e| {
                let descriptor = e.descriptor();
                match descriptor.status {
                    Some(status) => StudioError::record_creation_failed(format!(
                        "{} (status {})",
                        descriptor.message, status
                    )),
                    None => StudioError::record_creation_failed(descriptor.message),
                }
            })?;

        match response.get("id").and_then(Value::as_u64) {
            Some(photo_id) => Ok((photo_id, response)),
            None => Err(StudioError::record_creation_failed(format!(
                "response contained no photo: {}",
                response
            ))),
        }
    }

    /// Steps that run while a photo record exists.
    async fn transfer(
        &self,
        photo_id: u64,
        record: Value,
        data: Bytes,
        checksum: &str,
        owner_id: u64,
        owner: OwnerKind,
    ) -> StudioResult<UploadOutcome> {
        let photo: Photo = serde_json::from_value(record).map_err(|e| {
            StudioError::InvalidResponse(format!("unreadable photo record {}: {}", photo_id, e))
        })?;

        let tagged = match owner {
            OwnerKind::Job => self.get_job(owner_id).await?.is_regular(),
            OwnerKind::Profile => false,
        };

        let target = self.get_upload_url(photo_id, checksum, false).await?;
        if self.config.debug {
            debug!(photo_id, tagged, "Obtained upload url");
        }

        let upload_status = self
            .put_with_retry(&target.url, data, checksum, tagged)
            .await?;
        Ok(UploadOutcome {
            photo,
            upload_status,
        })
    }

    /// PUT the bytes to a pre-signed URL.
    ///
    /// Any non-success status or network failure counts as a failed attempt.
    async fn put_with_retry(
        &self,
        url: &str,
        data: Bytes,
        checksum: &str,
        tagged: bool,
    ) -> StudioResult<u16> {
        let retry = &self.config.upload_retry;
        let mut last_status = None;

        for attempt in 1..=retry.max_attempts {
            if attempt > 1 {
                self.backoff.wait(attempt, retry.delay).await;
            }

            let mut request = self
                .http
                .put(url)
                .header(CONTENT_MD5_HEADER, checksum)
                .body(data.clone());
            if tagged {
                request = request.header(TAGGING_HEADER, REGULAR_JOB_TAGGING);
            }

            match request.send().await {
                Ok(response) if response.status().is_success() => {
                    return Ok(response.status().as_u16());
                }
                Ok(response) => {
                    let status = response.status();
                    last_status = Some(status.as_u16());
                    let body = response.text().await.unwrap_or_default();
                    warn!(
                        attempt,
                        max_attempts = retry.max_attempts,
                        status = status.as_u16(),
                        "Photo upload rejected: {}",
                        body
                    );
                }
                Err(e) => {
                    warn!(
                        attempt,
                        max_attempts = retry.max_attempts,
                        "Photo upload failed: {}",
                        e
                    );
                }
            }
        }

        Err(StudioError::UploadFailedAfterRetries {
            attempts: retry.max_attempts,
            last_status,
        })
    }

    /// Best-effort delete of a photo record whose upload did not complete.
    async fn discard_photo(&self, photo_id: u64, cause: &StudioError) {
        warn!(photo_id, error = %cause, "Upload failed, deleting photo record");

        if let Err(e) = self.delete_photo(photo_id).await {
            warn!(photo_id, error = %e, "Failed to delete orphaned photo record");
        }
    }
}
