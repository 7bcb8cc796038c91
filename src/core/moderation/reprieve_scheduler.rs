// Delayed reprieve jobs, one per violation key.
//
// A job sleeps for the mute duration (+1s) and then runs the check it was
// given. Scheduling a key that already has a pending job aborts the old one.

use super::moderation_models::ViolationKey;
use dashmap::DashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

struct ScheduledJob {
    id: u64,
    handle: JoinHandle<()>,
}

/// Timer service for reprieve checks.
pub struct ReprieveScheduler {
    jobs: DashMap<ViolationKey, ScheduledJob>,
    next_id: AtomicU64,
}

impl ReprieveScheduler {
    pub fn new() -> Self {
        Self {
            jobs: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Run `job` once after `delay`. Returns immediately.
    pub fn schedule<F>(self: &Arc<Self>, key: ViolationKey, delay: Duration, job: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let scheduler = Arc::clone(self);

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Leave the map before running so a reschedule can't abort a check mid-way.
            scheduler.jobs.remove_if(&key, |_, scheduled| scheduled.id == id);
            job.await;
        });

        if let Some(previous) = self.jobs.insert(key, ScheduledJob { id, handle }) {
            tracing::debug!(key = %key, "Replacing pending reprieve check");
            previous.handle.abort();
        }
    }

    /// Abort the pending job for `key`, if any.
    pub fn cancel(&self, key: &ViolationKey) -> bool {
        match self.jobs.remove(key) {
            Some((_, job)) => {
                job.handle.abort();
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self, key: &ViolationKey) -> bool {
        self.jobs.contains_key(key)
    }

    pub fn pending(&self) -> usize {
        self.jobs.len()
    }
}

impl Default for ReprieveScheduler {
    fn default() -> Self {
        Self::new()
    }
}
