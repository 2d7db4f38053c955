// controller.rs - Submission and status-polling state machine
//
// Owns one polling session at a time: submit a montage request, hold the
// returned task id, poll /status on a fixed interval until the backend
// reports a terminal state, and drive the UI seam along the way. The active
// task id cell is the single source of truth for staleness: any response
// carrying a different id is dropped before it can touch the UI.
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::MontageError;
use crate::request::MontageRequest;
use crate::service::JobService;
use crate::types::{JobStatus, TaskStatusResponse};
use crate::ui::{Progress, UiHandle};

/// Fixed delay between status checks
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Progress gained per `processing` tick
const PROGRESS_STEP: f64 = 2.0;

/// Progress never passes this while the job is still running; only a
/// terminal state moves the bar to 100
const PROGRESS_CEILING: f64 = 95.0;

/// What a single poll tick decided
enum TickOutcome {
    Continue,
    Finished,
}

pub struct SubmissionController<S: JobService, U: UiHandle> {
    service: Arc<S>,
    ui: Arc<U>,
    poll_interval: Duration,
    /// Active session id; `None` means no session. Cancellation signal for
    /// the poll loop and the reference for staleness checks.
    active_task: Arc<Mutex<Option<String>>>,
    poll_handle: Mutex<Option<JoinHandle<()>>>,
}

impl<S: JobService, U: UiHandle> SubmissionController<S, U> {
    pub fn new(service: Arc<S>, ui: Arc<U>) -> Self {
        Self {
            service,
            ui,
            poll_interval: DEFAULT_POLL_INTERVAL,
            active_task: Arc::new(Mutex::new(None)),
            poll_handle: Mutex::new(None),
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Validate and submit a montage request, then start polling its status.
    ///
    /// Returns the backend task id on acceptance. On any failure the
    /// submission UI is re-enabled and no session is left behind; nothing is
    /// retried automatically.
    pub async fn submit(&self, request: MontageRequest) -> Result<String, MontageError> {
        if let Err(error) = request.validate() {
            // Bad selection never reaches the network
            self.ui.set_message(&error.to_string());
            return Err(error);
        }

        self.ui.set_submit_enabled(false);
        self.ui.set_progress(Progress::reset());
        self.ui.clear_result();
        self.ui.set_message("Initializing and uploading...");

        let created = match self.service.create_montage(&request).await {
            Ok(created) => created,
            Err(error) => {
                self.fail_submission(&error);
                return Err(error);
            }
        };

        let task_id = match created.task_id {
            Some(id) if !id.is_empty() => id,
            _ => {
                let error = MontageError::MissingTaskId;
                self.fail_submission(&error);
                return Err(error);
            }
        };

        info!("🎬 Montage task accepted: {}", task_id);
        self.ui.set_message(
            created
                .message
                .as_deref()
                .unwrap_or("Processing started. Please wait..."),
        );

        self.start_polling(task_id.clone()).await;
        Ok(task_id)
    }

    /// Abandon the current session, if any. In-flight responses for the old
    /// id are dropped by the staleness check when they arrive.
    pub async fn cancel(&self) {
        let mut active = self.active_task.lock().await;
        if let Some(task_id) = active.take() {
            info!("Cancelled polling session for task {}", task_id);
        }
        drop(active);

        if let Some(handle) = self.poll_handle.lock().await.take() {
            handle.abort();
        }
    }

    /// Id of the job currently being polled, if a session is active
    pub async fn active_task_id(&self) -> Option<String> {
        self.active_task.lock().await.clone()
    }

    /// Wait for the current polling session to reach a terminal state.
    /// Returns immediately when no session is running.
    pub async fn wait_until_idle(&self) {
        let handle = self.poll_handle.lock().await.take();
        if let Some(handle) = handle {
            // An aborted loop and a finished loop both mean the session ended
            let _ = handle.await;
        }
    }

    fn fail_submission(&self, error: &MontageError) {
        warn!("Montage submission failed: {}", error);
        self.ui.set_message(&error.to_string());
        self.ui.set_progress(Progress::failure());
        self.ui.set_submit_enabled(true);
    }

    /// Open a polling session for `task_id`, superseding any previous one
    async fn start_polling(&self, task_id: String) {
        {
            let mut active = self.active_task.lock().await;
            *active = Some(task_id.clone());
        }

        let mut handle_slot = self.poll_handle.lock().await;
        // Only one timer may exist; replacing the handle prevents
        // overlapping loops when submissions come back to back
        if let Some(previous) = handle_slot.take() {
            previous.abort();
        }

        let service = Arc::clone(&self.service);
        let ui = Arc::clone(&self.ui);
        let active = Arc::clone(&self.active_task);
        let period = self.poll_interval;

        *handle_slot = Some(tokio::spawn(async move {
            poll_loop(service, ui, active, task_id, period).await;
        }));
    }
}

async fn poll_loop<S: JobService, U: UiHandle>(
    service: Arc<S>,
    ui: Arc<U>,
    active: Arc<Mutex<Option<String>>>,
    task_id: String,
    period: Duration,
) {
    let mut ticker = tokio::time::interval(period);
    let mut percent = 0.0_f64;

    loop {
        ticker.tick().await;

        {
            let active = active.lock().await;
            match active.as_deref() {
                Some(current) if current == task_id => {}
                // Cleared or superseded while we slept
                _ => break,
            }
        }

        let response = match service.task_status(&task_id).await {
            Ok(response) => response,
            Err(error) => {
                // A single failed status check is not fatal; the backend may
                // be briefly unavailable. Wait for the next tick. The failure
                // message is only worth showing if this session still owns
                // the UI.
                warn!("Status check for task {} failed: {}", task_id, error);
                if active.lock().await.as_deref() == Some(task_id.as_str()) {
                    ui.set_message(&error.to_string());
                }
                continue;
            }
        };

        let outcome = handle_response(
            service.as_ref(),
            ui.as_ref(),
            &active,
            &task_id,
            &response,
            &mut percent,
        )
        .await;

        match outcome {
            TickOutcome::Continue => {}
            TickOutcome::Finished => {
                let mut active = active.lock().await;
                if active.as_deref() == Some(task_id.as_str()) {
                    *active = None;
                }
                break;
            }
        }
    }
}

/// Staleness gate for one arrived status response.
///
/// The active-id cell is re-read here, after the request has come back:
/// the session may have been superseded while the response was in flight,
/// and aborting the timer cannot stop a response that has already landed.
/// A response that fails either check never touches the UI.
async fn handle_response<S: JobService, U: UiHandle>(
    service: &S,
    ui: &U,
    active: &Mutex<Option<String>>,
    task_id: &str,
    response: &TaskStatusResponse,
    percent: &mut f64,
) -> TickOutcome {
    {
        let active = active.lock().await;
        if active.as_deref() != Some(task_id) {
            debug!(
                "Dropping response for superseded task {} on arrival",
                task_id
            );
            return TickOutcome::Finished;
        }
    }

    if let Some(reported) = response.task_id.as_deref() {
        if reported != task_id {
            warn!(
                "Ignoring status for task {} (polling task {})",
                reported, task_id
            );
            return TickOutcome::Continue;
        }
    }

    apply_status(service, ui, task_id, response, percent)
}

/// Map one status response onto the UI and decide whether the session ends
fn apply_status<S: JobService, U: UiHandle>(
    service: &S,
    ui: &U,
    task_id: &str,
    response: &TaskStatusResponse,
    percent: &mut f64,
) -> TickOutcome {
    if let Some(message) = response.message.as_deref() {
        ui.set_message(message);
    }

    match response.job_status() {
        JobStatus::Queued => TickOutcome::Continue,
        JobStatus::Processing => {
            *percent = advance_progress(*percent);
            ui.set_progress(Progress::working(*percent));
            TickOutcome::Continue
        }
        JobStatus::Completed => {
            info!("✅ Montage task {} completed", task_id);
            ui.set_progress(Progress::complete());
            if let Some(artifact) = response.artifact_name() {
                ui.show_result(
                    &service.stream_url(task_id, artifact),
                    &service.download_url(task_id, artifact),
                );
            }
            ui.set_submit_enabled(true);
            TickOutcome::Finished
        }
        JobStatus::Error => {
            warn!("Montage task {} ended in error", task_id);
            ui.set_progress(Progress::failure());
            ui.clear_result();
            ui.set_submit_enabled(true);
            TickOutcome::Finished
        }
        JobStatus::Unknown(other) => {
            // Forward compatibility: an unrecognized state keeps the loop
            // alive, message text (if any) was already shown
            debug!("Task {} reported unknown status '{}'", task_id, other);
            TickOutcome::Continue
        }
    }
}

/// Bounded step toward the ceiling; never moves backward
fn advance_progress(current: f64) -> f64 {
    (current + PROGRESS_STEP).min(PROGRESS_CEILING)
}
