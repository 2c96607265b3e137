//! Capability submission store - company profile intake and review workflow

pub mod config;
pub mod error;
pub mod models;
pub mod payload;
pub mod store;

pub use config::StoreConfig;
pub use error::{Result, StoreError};
pub use models::{CompanyProfile, StatusCounts, Submission, SubmissionStatus};
pub use payload::Payload;
pub use store::SubmissionStore;
