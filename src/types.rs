// types.rs - Wire types for the montage backend JSON contract
use serde::{Deserialize, Serialize};

/// Response from POST /create_montage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTaskResponse {
    pub task_id: Option<String>,
    pub message: Option<String>,
}

/// Response from GET /status/{task_id}
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskStatusResponse {
    pub task_id: Option<String>,
    #[serde(default)]
    pub status: String,
    pub message: Option<String>,
    pub output_file: Option<String>,
}

impl TaskStatusResponse {
    pub fn job_status(&self) -> JobStatus {
        JobStatus::from_wire(&self.status)
    }

    /// Final path segment of `output_file`, used to address the artifact
    /// in the stream and download endpoints
    pub fn artifact_name(&self) -> Option<&str> {
        self.output_file
            .as_deref()
            .and_then(|path| path.rsplit('/').next())
            .filter(|name| !name.is_empty())
    }
}

/// Job lifecycle states reported by the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Queued,
    Processing,
    Completed,
    Error,
    /// Any status value outside the known set; tolerated as a no-op
    /// so newer backends can add states without breaking the client
    Unknown(String),
}

impl JobStatus {
    pub fn from_wire(status: &str) -> Self {
        match status {
            "queued" => JobStatus::Queued,
            "processing" => JobStatus::Processing,
            "completed" => JobStatus::Completed,
            "error" => JobStatus::Error,
            other => JobStatus::Unknown(other.to_string()),
        }
    }

    /// Terminal states end the polling session
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Error)
    }
}

/// Montage generation options sent as plain form fields alongside the video source.
/// Defaults match the backend's own form defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MontageOptions {
    pub resolution: String,
    pub total_duration: f64,
    pub total_scenes: u32,
    pub min_scene_duration: f64,
    pub audio_mode: String,
}

impl Default for MontageOptions {
    fn default() -> Self {
        Self {
            resolution: "1280x720".to_string(),
            total_duration: 0.0,
            total_scenes: 0,
            min_scene_duration: 0.6,
            audio_mode: "replace".to_string(),
        }
    }
}
