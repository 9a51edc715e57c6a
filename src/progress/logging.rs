//! Logging-based progress handler

use super::{ProgressEvent, ProgressHandler};
use tracing::{debug, info, warn};

/// Handler that logs progress events using tracing
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHandler;

impl ProgressHandler for LoggingHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::Started {
                folders,
                target_first,
            } => {
                info!(folders, target_first, "Starting pipeline configuration");
            }
            ProgressEvent::StepStarted { step } => {
                info!(step = %step, "Starting step");
            }
            ProgressEvent::StepComplete { step, duration } => {
                debug!(
                    step = %step,
                    duration_ms = duration.as_millis(),
                    "Step complete"
                );
            }
            ProgressEvent::Fact { key, value } => {
                debug!(key = %key, value = %value, "Recorded fact");
            }
            ProgressEvent::Cancelled { step } => {
                info!(step = %step, "Pipeline configuration canceled");
            }
            ProgressEvent::Failed { step, error } => {
                warn!(step = %step, error = %error, "Pipeline configuration failed");
            }
            ProgressEvent::Completed {
                pipeline_url,
                total_time,
            } => {
                info!(
                    url = %pipeline_url,
                    total_time_ms = total_time.as_millis(),
                    "Pipeline configured"
                );
            }
        }
    }
}
