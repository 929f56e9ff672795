pub mod recording_observer;
pub mod tracing_observer;

pub use recording_observer::RecordingObserver;
pub use tracing_observer::TracingObserver;
