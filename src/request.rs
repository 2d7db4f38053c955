// request.rs - Montage job request with mutually exclusive video sources
use crate::error::MontageError;
use crate::types::MontageOptions;

/// An in-memory file attached to a request (upload, label file, audio track)
#[derive(Debug, Clone)]
pub struct FilePayload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl FilePayload {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }
}

/// One montage job submission: exactly one video source plus auxiliary
/// form fields passed through to the backend.
///
/// The source fields are kept private so the setters can enforce mutual
/// exclusivity: choosing one source always clears the other two, the same
/// way the form clears its sibling inputs.
#[derive(Debug, Clone, Default)]
pub struct MontageRequest {
    video_url: Option<String>,
    upload: Option<FilePayload>,
    server_filename: Option<String>,
    pub label_file: Option<FilePayload>,
    pub audio_file: Option<FilePayload>,
    pub options: MontageOptions,
}

impl MontageRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a remote video URL as the source; clears any upload or server file
    pub fn set_video_url(&mut self, url: impl Into<String>) {
        let url = url.into();
        if url.trim().is_empty() {
            self.video_url = None;
            return;
        }
        self.video_url = Some(url);
        self.upload = None;
        self.server_filename = None;
    }

    /// Use an uploaded file as the source; clears any URL or server file
    pub fn set_upload(&mut self, file: FilePayload) {
        self.upload = Some(file);
        self.video_url = None;
        self.server_filename = None;
    }

    /// Use a video already on the server as the source; clears URL and upload
    pub fn set_server_file(&mut self, filename: impl Into<String>) {
        let filename = filename.into();
        if filename.trim().is_empty() {
            self.server_filename = None;
            return;
        }
        self.server_filename = Some(filename);
        self.video_url = None;
        self.upload = None;
    }

    pub fn video_url(&self) -> Option<&str> {
        self.video_url.as_deref()
    }

    pub fn upload(&self) -> Option<&FilePayload> {
        self.upload.as_ref()
    }

    pub fn server_filename(&self) -> Option<&str> {
        self.server_filename.as_deref()
    }

    fn source_count(&self) -> usize {
        [
            self.video_url.as_ref().map(|u| !u.trim().is_empty()).unwrap_or(false),
            self.upload.is_some(),
            self.server_filename.as_ref().map(|f| !f.trim().is_empty()).unwrap_or(false),
        ]
        .iter()
        .filter(|populated| **populated)
        .count()
    }

    /// Checked before any network traffic; a bad selection never leaves the client
    pub fn validate(&self) -> Result<(), MontageError> {
        match self.source_count() {
            0 => Err(MontageError::Validation(
                "Please provide a video source (URL, upload, or server file).".to_string(),
            )),
            1 => Ok(()),
            _ => Err(MontageError::Validation(
                "Please use exactly ONE video source (URL, upload, or server file).".to_string(),
            )),
        }
    }
}
