//! Progress handler trait and events

use std::sync::Mutex;
use std::time::Duration;

/// Events emitted while the wizard runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// Run started
    Started { folders: usize, target_first: bool },

    /// A named step became current
    StepStarted { step: String },

    /// The previous step finished
    StepComplete { step: String, duration: Duration },

    /// A fact learned during the run (provider, template, ...)
    Fact { key: String, value: String },

    /// The user dismissed a prompt or discarded the pipeline
    Cancelled { step: String },

    /// Run aborted with an error
    Failed { step: String, error: String },

    /// Pipeline committed and queued
    Completed {
        pipeline_url: String,
        total_time: Duration,
    },
}

/// Trait for handling progress events
pub trait ProgressHandler: Send + Sync {
    fn on_progress(&self, event: &ProgressEvent);
}

/// No-op handler that ignores all events
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpHandler;

impl ProgressHandler for NoOpHandler {
    fn on_progress(&self, _event: &ProgressEvent) {}
}

/// Keeps every event, for inspection after a run
#[derive(Debug, Default)]
pub struct RecordingHandler {
    events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .map(|e| e.clone())
            .unwrap_or_default()
    }

    /// Names of the steps started, in order
    pub fn steps(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ProgressEvent::StepStarted { step } => Some(step),
                _ => None,
            })
            .collect()
    }

    pub fn fact(&self, key: &str) -> Option<String> {
        self.events().into_iter().rev().find_map(|e| match e {
            ProgressEvent::Fact { key: k, value } if k == key => Some(value),
            _ => None,
        })
    }
}

impl ProgressHandler for RecordingHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
