// lib.rs - Montage client library: submission controller, job service, UI seam
pub mod config;
pub mod controller;
pub mod error;
pub mod request;
pub mod service;
pub mod types;
pub mod ui;

// Re-export the types most callers need
pub use config::ClientConfig;
pub use controller::{SubmissionController, DEFAULT_POLL_INTERVAL};
pub use error::MontageError;
pub use request::{FilePayload, MontageRequest};
pub use service::{HttpJobService, JobService};
pub use types::{CreateTaskResponse, JobStatus, MontageOptions, TaskStatusResponse};
pub use ui::{ConsoleUi, Progress, UiHandle};
