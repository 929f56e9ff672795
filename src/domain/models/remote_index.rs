use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Last-modified timestamps of the objects found directly under one prefix
#[derive(Debug, Clone, Default)]
pub struct RemoteObjectIndex {
    entries: HashMap<String, DateTime<Utc>>,
}

impl RemoteObjectIndex {
    pub fn new(entries: HashMap<String, DateTime<Utc>>) -> Self {
        Self { entries }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn last_modified(&self, key: &str) -> Option<DateTime<Utc>> {
        self.entries.get(key).copied()
    }

    /// A local file is current only when the remote copy exists and the local
    /// modification time is strictly earlier than the remote timestamp.
    pub fn is_current(&self, key: &str, local_modified: DateTime<Utc>) -> bool {
        self.last_modified(key)
            .is_some_and(|remote| local_modified < remote)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, DateTime<Utc>)> for RemoteObjectIndex {
    fn from_iter<I: IntoIterator<Item = (String, DateTime<Utc>)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
