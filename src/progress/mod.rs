//! Progress reporting and telemetry for wizard runs

mod handler;
mod logging;
mod telemetry;

pub use handler::{NoOpHandler, ProgressEvent, ProgressHandler, RecordingHandler};
pub use logging::LoggingHandler;
pub use telemetry::Telemetry;
