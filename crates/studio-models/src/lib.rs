//! Shared data models for the Studio photo-processing API.
//!
//! This crate contains the records returned by the Studio REST API (jobs,
//! profiles, photos), the request bodies sent to it, and the types used by
//! the photo upload workflow.

pub mod job;
pub mod photo;
pub mod profile;
pub mod upload;

pub use job::{Job, JobRef, NewJob, QueueOptions, JOB_TYPE_REGULAR};
pub use photo::Photo;
pub use profile::{NewProfile, Profile};
pub use upload::{OwnerKind, ParseOwnerKindError, UploadOutcome, UploadTarget};
