// ui.rs - Presentation seam between the controller and whatever renders it
use std::io::{self, Write};
use std::sync::Mutex;

/// Progress bar value plus a failure flag for terminal error styling.
/// Within one polling session the percent only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    pub percent: f64,
    pub failed: bool,
}

impl Progress {
    pub fn reset() -> Self {
        Self {
            percent: 0.0,
            failed: false,
        }
    }

    pub fn working(percent: f64) -> Self {
        Self {
            percent,
            failed: false,
        }
    }

    pub fn complete() -> Self {
        Self {
            percent: 100.0,
            failed: false,
        }
    }

    pub fn failure() -> Self {
        Self {
            percent: 100.0,
            failed: true,
        }
    }
}

/// Rendering operations the submission controller drives.
///
/// Implementations must be cheap and non-blocking; the controller calls
/// these from its async tasks.
pub trait UiHandle: Send + Sync + 'static {
    /// Enable or disable the submit control
    fn set_submit_enabled(&self, enabled: bool);

    /// Update the progress indicator
    fn set_progress(&self, progress: Progress);

    /// Show a status message to the user
    fn set_message(&self, message: &str);

    /// Reveal the finished montage: preview player source and download link
    fn show_result(&self, stream_url: &str, download_url: &str);

    /// Hide any previous result (called when a new job starts or one fails)
    fn clear_result(&self);
}

/// Terminal renderer used by the CLI binary
#[derive(Debug, Default)]
pub struct ConsoleUi {
    /// Last message printed; repeats are suppressed so the carriage-return
    /// progress line is not scrolled away on every poll tick
    last_message: Mutex<String>,
}

impl ConsoleUi {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when `message` differs from the previous one (and records it)
    fn should_emit(&self, message: &str) -> bool {
        let mut last = self.last_message.lock().unwrap();
        if *last == message {
            return false;
        }
        *last = message.to_string();
        true
    }
}

impl UiHandle for ConsoleUi {
    fn set_submit_enabled(&self, enabled: bool) {
        tracing::debug!("Submission {}", if enabled { "enabled" } else { "locked" });
    }

    fn set_progress(&self, progress: Progress) {
        let marker = if progress.failed { "❌" } else { "🎬" };
        print!("\r{} Progress: {:>5.1}%", marker, progress.percent);
        let _ = io::stdout().flush();
    }

    fn set_message(&self, message: &str) {
        if !self.should_emit(message) {
            return;
        }
        println!();
        println!("   {}", message);
    }

    fn show_result(&self, stream_url: &str, download_url: &str) {
        println!();
        println!("✅ Montage ready!");
        println!("   Stream:   {}", stream_url);
        println!("   Download: {}", download_url);
    }

    fn clear_result(&self) {
        // Nothing to clear on a scrolling terminal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_messages_are_suppressed() {
        let ui = ConsoleUi::new();
        assert!(ui.should_emit("Rendering scenes..."));
        assert!(!ui.should_emit("Rendering scenes..."));
        assert!(!ui.should_emit("Rendering scenes..."));
        assert!(ui.should_emit("Montage complete."));
        assert!(ui.should_emit("Rendering scenes..."));
    }
}
