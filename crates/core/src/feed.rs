use crate::activity::Activity;

use std::sync::Arc;
use tokio::sync::watch;

/// Immutable view of the feed at one revision
#[derive(Debug, Clone, PartialEq)]
pub struct FeedSnapshot {
    /// Incremented on every append
    pub revision: u64,
    pub activities: Arc<[Activity]>,
}

impl FeedSnapshot {
    pub fn new(revision: u64, activities: Vec<Activity>) -> Self {
        Self { revision, activities: activities.into() }
    }

    pub fn empty() -> Self {
        Self::new(0, Vec::new())
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }
}

impl Default for FeedSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

/// Append-only activity feed
///
/// Subscribers receive the full snapshot on every change; a slow subscriber
/// only ever sees the latest revision.
#[derive(Debug, Clone)]
pub struct ActivityFeed {
    tx: Arc<watch::Sender<FeedSnapshot>>,
}

impl ActivityFeed {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(FeedSnapshot::empty());
        Self { tx: Arc::new(tx) }
    }

    /// Create a feed pre-populated with activities (revision 1 when non-empty)
    pub fn from_activities(activities: Vec<Activity>) -> Self {
        let feed = Self::new();
        feed.extend(activities);
        feed
    }

    /// Append a single activity
    pub fn push(&self, activity: Activity) {
        self.extend(std::iter::once(activity));
    }

    /// Append several activities as one revision
    pub fn extend(&self, activities: impl IntoIterator<Item = Activity>) {
        let mut incoming = activities.into_iter().peekable();
        if incoming.peek().is_none() {
            return;
        }

        self.tx.send_modify(|snapshot| {
            let mut activities = snapshot.activities.to_vec();
            activities.extend(incoming);
            snapshot.activities = activities.into();
            snapshot.revision += 1;
            tracing::trace!(revision = snapshot.revision, len = snapshot.activities.len(), "feed appended");
        });
    }

    /// Current snapshot
    pub fn snapshot(&self) -> FeedSnapshot {
        self.tx.borrow().clone()
    }

    pub fn revision(&self) -> u64 {
        self.tx.borrow().revision
    }

    /// Subscribe to feed revisions
    pub fn subscribe(&self) -> watch::Receiver<FeedSnapshot> {
        self.tx.subscribe()
    }
}

impl Default for ActivityFeed {
    fn default() -> Self {
        Self::new()
    }
}
