use super::{ProgressEvent, ProgressHandler};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

struct CurrentStep {
    name: String,
    started: Instant,
}

/// Fire-and-forget observability sink for one wizard run.
///
/// Tracks the current step so failures and cancellations are attributed to it.
pub struct Telemetry {
    handler: Arc<dyn ProgressHandler>,
    current: Mutex<Option<CurrentStep>>,
    started: Instant,
}

impl Telemetry {
    pub fn new(handler: Arc<dyn ProgressHandler>) -> Self {
        Self {
            handler,
            current: Mutex::new(None),
            started: Instant::now(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<CurrentStep>> {
        self.current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn record_started(&self, folders: usize, target_first: bool) {
        self.handler.on_progress(&ProgressEvent::Started {
            folders,
            target_first,
        });
    }

    /// Closes the current step and opens `name`
    pub fn mark_step(&self, name: &str) {
        let previous = self.lock().replace(CurrentStep {
            name: name.to_string(),
            started: Instant::now(),
        });
        if let Some(previous) = previous {
            self.handler.on_progress(&ProgressEvent::StepComplete {
                step: previous.name,
                duration: previous.started.elapsed(),
            });
        }
        self.handler.on_progress(&ProgressEvent::StepStarted {
            step: name.to_string(),
        });
    }

    pub fn current_step(&self) -> Option<String> {
        self.lock().as_ref().map(|s| s.name.clone())
    }

    pub fn record_fact(&self, key: &str, value: impl Into<String>) {
        self.handler.on_progress(&ProgressEvent::Fact {
            key: key.to_string(),
            value: value.into(),
        });
    }

    pub fn record_failure(&self, step: &str, error: &str) {
        self.handler.on_progress(&ProgressEvent::Failed {
            step: step.to_string(),
            error: error.to_string(),
        });
    }

    pub fn record_cancelled(&self, step: &str) {
        self.handler.on_progress(&ProgressEvent::Cancelled {
            step: step.to_string(),
        });
    }

    pub fn record_completed(&self, pipeline_url: &str) {
        let last = self.lock().take();
        if let Some(last) = last {
            self.handler.on_progress(&ProgressEvent::StepComplete {
                step: last.name,
                duration: last.started.elapsed(),
            });
        }
        self.handler.on_progress(&ProgressEvent::Completed {
            pipeline_url: pipeline_url.to_string(),
            total_time: self.started.elapsed(),
        });
    }
}
