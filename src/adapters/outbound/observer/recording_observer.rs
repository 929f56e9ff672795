use std::sync::Mutex;

use crate::ports::{SyncEvent, SyncObserver};

/// Keeps every event in memory, in arrival order
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<SyncEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events received so far
    pub fn events(&self) -> Vec<SyncEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn uploaded_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .events()
            .into_iter()
            .filter_map(|event| match event {
                SyncEvent::FileUploaded { key, .. } => Some(key),
                _ => None,
            })
            .collect();
        keys.sort();
        keys
    }
}

impl SyncObserver for RecordingObserver {
    fn on_event(&self, event: SyncEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}
