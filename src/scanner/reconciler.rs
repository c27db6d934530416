use std::collections::HashMap;

use crate::models::{FileEvent, VersionChain};

/// Groups file events by path into version chains
///
/// Events are kept in arrival order per path and stable-sorted by timestamp on
/// [`finish`](Self::finish), so equal timestamps keep stream order. Events without
/// a timestamp sort before all timestamped ones. No version is ever dropped.
#[derive(Debug, Default)]
pub struct VersionReconciler {
    groups: HashMap<String, Vec<FileEvent>>,
    events: usize,
}

impl VersionReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: FileEvent) {
        self.events += 1;
        self.groups.entry(event.path.clone()).or_default().push(event);
    }

    /// Number of events pushed so far
    pub fn event_count(&self) -> usize {
        self.events
    }

    /// Sort every group and turn it into a chain; chains come out ordered by path
    pub fn finish(self) -> Vec<VersionChain> {
        let mut chains: Vec<VersionChain> = self
            .groups
            .into_iter()
            .filter_map(|(path, mut versions)| {
                versions.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
                VersionChain::from_sorted(path, versions)
            })
            .collect();
        chains.sort_by(|a, b| a.path().cmp(b.path()));
        chains
    }
}

impl Extend<FileEvent> for VersionReconciler {
    fn extend<T: IntoIterator<Item = FileEvent>>(&mut self, iter: T) {
        for event in iter {
            self.push(event);
        }
    }
}
