// service.rs - HTTP client for the montage backend (JobService seam)
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tracing::{debug, error};

use crate::error::MontageError;
use crate::request::MontageRequest;
use crate::types::{CreateTaskResponse, TaskStatusResponse};

/// Backend operations the submission controller depends on.
///
/// Production code uses [`HttpJobService`]; tests inject scripted fakes.
#[async_trait]
pub trait JobService: Send + Sync + 'static {
    /// Submit a montage job; returns the backend's acceptance payload
    async fn create_montage(
        &self,
        request: &MontageRequest,
    ) -> Result<CreateTaskResponse, MontageError>;

    /// Fetch the current status of a job
    async fn task_status(&self, task_id: &str) -> Result<TaskStatusResponse, MontageError>;

    /// List videos stored on the server for the server-file source
    async fn list_server_videos(&self) -> Result<Vec<String>, MontageError>;

    /// URL serving the output inline, for a preview player
    fn stream_url(&self, task_id: &str, filename: &str) -> String;

    /// URL serving the output as an attachment
    fn download_url(&self, task_id: &str, filename: &str) -> String;
}

#[derive(Debug, Clone)]
pub struct HttpJobService {
    client: Client,
    base_url: String,
}

impl HttpJobService {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn build_form(&self, request: &MontageRequest) -> Result<Form, MontageError> {
        let mut form = Form::new();

        if let Some(url) = request.video_url() {
            form = form.text("input_video_url", url.to_string());
        }
        if let Some(upload) = request.upload() {
            form = form.part(
                "input_video_file",
                Part::bytes(upload.bytes.clone())
                    .file_name(upload.filename.clone())
                    .mime_str("video/*")?,
            );
        }
        if let Some(server_file) = request.server_filename() {
            form = form.text("server_video_filename", server_file.to_string());
        }

        if let Some(labels) = &request.label_file {
            form = form.part(
                "label_file",
                Part::bytes(labels.bytes.clone())
                    .file_name(labels.filename.clone())
                    .mime_str("text/plain")?,
            );
        }
        if let Some(audio) = &request.audio_file {
            form = form.part(
                "audio_file",
                Part::bytes(audio.bytes.clone())
                    .file_name(audio.filename.clone())
                    .mime_str("audio/*")?,
            );
        }

        let options = &request.options;
        form = form
            .text("resolution", options.resolution.clone())
            .text("total_duration", options.total_duration.to_string())
            .text("total_scenes", options.total_scenes.to_string())
            .text("min_scene_duration", options.min_scene_duration.to_string())
            .text("audio_mode", options.audio_mode.clone());

        Ok(form)
    }
}

#[async_trait]
impl JobService for HttpJobService {
    async fn create_montage(
        &self,
        request: &MontageRequest,
    ) -> Result<CreateTaskResponse, MontageError> {
        let form = self.build_form(request)?;

        let response = self
            .client
            .post(format!("{}/create_montage", self.base_url))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = parse_error_body(status.as_u16(), &body);
            error!("Montage submission rejected: {}", message);
            return Err(MontageError::Submission(message));
        }

        let created: CreateTaskResponse = response.json().await?;
        debug!("Montage submission accepted: task_id={:?}", created.task_id);
        Ok(created)
    }

    async fn task_status(&self, task_id: &str) -> Result<TaskStatusResponse, MontageError> {
        let response = self
            .client
            .get(format!("{}/status/{}", self.base_url, task_id))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MontageError::StatusCheck(parse_error_body(
                status.as_u16(),
                &body,
            )));
        }

        Ok(response.json::<TaskStatusResponse>().await?)
    }

    async fn list_server_videos(&self) -> Result<Vec<String>, MontageError> {
        let response = self
            .client
            .get(format!("{}/list_server_videos", self.base_url))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MontageError::StatusCheck(parse_error_body(
                status.as_u16(),
                &body,
            )));
        }

        Ok(response.json::<Vec<String>>().await?)
    }

    fn stream_url(&self, task_id: &str, filename: &str) -> String {
        format!(
            "{}/stream/{}/{}",
            self.base_url,
            task_id,
            urlencoding::encode(filename)
        )
    }

    fn download_url(&self, task_id: &str, filename: &str) -> String {
        format!(
            "{}/download/{}/{}",
            self.base_url,
            task_id,
            urlencoding::encode(filename)
        )
    }
}

/// Extract a user-facing message from an error response body.
///
/// Canonical precedence: JSON `error` field, then JSON `message` field, then
/// the raw body truncated. Submission and status checks share this one rule.
pub fn parse_error_body(http_status: u16, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(error) = value.get("error").and_then(|v| v.as_str()) {
            return error.to_string();
        }
        if let Some(message) = value.get("message").and_then(|v| v.as_str()) {
            return message.to_string();
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("Server error: {}", http_status)
    } else {
        let snippet: String = trimmed.chars().take(300).collect();
        format!("Server error {}: {}", http_status, snippet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_field_takes_precedence() {
        let body = r#"{"error":"disk full","message":"something else"}"#;
        assert_eq!(parse_error_body(500, body), "disk full");
    }

    #[test]
    fn test_message_field_used_when_no_error() {
        let body = r#"{"message":"Task not found."}"#;
        assert_eq!(parse_error_body(404, body), "Task not found.");
    }

    #[test]
    fn test_raw_body_fallback_is_truncated() {
        let body = "x".repeat(500);
        let parsed = parse_error_body(502, &body);
        assert!(parsed.starts_with("Server error 502: "));
        assert_eq!(parsed.len(), "Server error 502: ".len() + 300);
    }

    #[test]
    fn test_empty_body_reports_status_only() {
        assert_eq!(parse_error_body(503, ""), "Server error: 503");
    }

    #[test]
    fn test_artifact_urls() {
        let service = HttpJobService::new("http://localhost:5000/");
        assert_eq!(
            service.stream_url("abc", "out.mp4"),
            "http://localhost:5000/stream/abc/out.mp4"
        );
        assert_eq!(
            service.download_url("abc", "my montage.mp4"),
            "http://localhost:5000/download/abc/my%20montage.mp4"
        );
    }
}
