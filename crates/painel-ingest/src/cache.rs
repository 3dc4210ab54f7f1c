//! Keyed dataset cache with a scheduled refresh.
//!
//! Entries are keyed by the caller. A dataset is only valid for the schema
//! it was loaded with, so callers that load one source with different
//! schemas must use different keys.
//!
//! Readers take an `Arc<Snapshot>` and keep it for as long as they need;
//! a refresh builds a complete new dataset first and then replaces the
//! map entry under a short write lock. A reader therefore sees either the
//! whole old dataset or the whole new one.

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{NaiveDateTime, NaiveTime, TimeDelta};
use tracing::{debug, info, warn};

use crate::dataset::Dataset;
use crate::error::Result;

/// One cached dataset and the moment it was stored.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub dataset: Arc<Dataset>,
    pub refreshed_at: NaiveDateTime,
}

/// Time-of-day range in which refreshes may run.
///
/// `start` is inclusive and `end` exclusive. A window whose end precedes
/// its start wraps past midnight (22:00 to 02:00). A window whose start
/// equals its end is open all day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl RefreshWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, time: NaiveTime) -> bool {
        if self.start == self.end {
            true
        } else if self.start < self.end {
            self.start <= time && time < self.end
        } else {
            time >= self.start || time < self.end
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshPolicy {
    /// Allowed refresh hours; `None` allows any time.
    pub window: Option<RefreshWindow>,
    /// Minimum age of a snapshot before a tick replaces it.
    pub min_interval: TimeDelta,
}

impl Default for RefreshPolicy {
    fn default() -> Self {
        Self {
            window: None,
            min_interval: TimeDelta::hours(1),
        }
    }
}

impl RefreshPolicy {
    pub fn with_window(mut self, window: RefreshWindow) -> Self {
        self.window = Some(window);
        self
    }

    pub fn with_min_interval(mut self, min_interval: TimeDelta) -> Self {
        self.min_interval = min_interval;
        self
    }

    pub fn allows(&self, now: NaiveDateTime) -> bool {
        self.window.is_none_or(|window| window.contains(now.time()))
    }

    pub fn is_due(&self, last: Option<NaiveDateTime>, now: NaiveDateTime) -> bool {
        last.is_none_or(|last| now - last >= self.min_interval)
    }
}

/// Result of one refresh tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    OutsideWindow,
    NotDue,
    Refreshed { rows: usize },
    /// The reload failed; the previous snapshot, if any, is still served.
    Failed { message: String },
}

/// Latest dataset per key.
#[derive(Debug, Default)]
pub struct DatasetCache {
    policy: RefreshPolicy,
    entries: RwLock<BTreeMap<String, Arc<Snapshot>>>,
}

impl DatasetCache {
    pub fn new(policy: RefreshPolicy) -> Self {
        Self {
            policy,
            entries: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn policy(&self) -> &RefreshPolicy {
        &self.policy
    }

    pub fn snapshot(&self, key: &str) -> Option<Arc<Snapshot>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    pub fn last_refreshed_at(&self, key: &str) -> Option<NaiveDateTime> {
        self.snapshot(key).map(|snapshot| snapshot.refreshed_at)
    }

    /// Stores `dataset` under `key`, replacing any previous one.
    pub fn swap(&self, key: &str, dataset: Dataset, at: NaiveDateTime) -> Arc<Snapshot> {
        self.store(key.to_string(), dataset, at)
    }

    pub fn invalidate(&self, key: &str) -> bool {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key)
            .is_some()
    }

    /// Reloads the entry under `key` when the policy allows it.
    ///
    /// Loading happens without holding the lock; only the final
    /// replacement takes the write lock.
    pub fn on_tick<F>(&self, key: &str, now: NaiveDateTime, load: F) -> TickOutcome
    where
        F: FnOnce() -> Result<Dataset>,
    {
        if !self.policy.allows(now) {
            debug!(key, time = %now.time(), "refresh skipped outside window");
            return TickOutcome::OutsideWindow;
        }
        if !self.policy.is_due(self.last_refreshed_at(key), now) {
            debug!(key, "refresh not due");
            return TickOutcome::NotDue;
        }
        match load() {
            Ok(dataset) => {
                let rows = dataset.height();
                self.store(key.to_string(), dataset, now);
                info!(key, rows, "dataset refreshed");
                TickOutcome::Refreshed { rows }
            }
            Err(error) => {
                warn!(key, error = %error, "refresh failed; keeping previous dataset");
                TickOutcome::Failed {
                    message: error.to_string(),
                }
            }
        }
    }

    /// Returns the cached snapshot, loading it on first access.
    ///
    /// A failed first load caches nothing.
    pub fn get_or_load<F>(&self, key: &str, now: NaiveDateTime, load: F) -> Result<Arc<Snapshot>>
    where
        F: FnOnce() -> Result<Dataset>,
    {
        if let Some(snapshot) = self.snapshot(key) {
            return Ok(snapshot);
        }
        let dataset = load()?;
        Ok(self.store(key.to_string(), dataset, now))
    }

    fn store(&self, key: String, dataset: Dataset, at: NaiveDateTime) -> Arc<Snapshot> {
        let snapshot = Arc::new(Snapshot {
            dataset: Arc::new(dataset),
            refreshed_at: at,
        });
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, Arc::clone(&snapshot));
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn window_without_wrap() {
        let window = RefreshWindow::new(time(6, 0), time(8, 0));
        assert!(window.contains(time(6, 0)));
        assert!(window.contains(time(7, 59)));
        assert!(!window.contains(time(8, 0)));
        assert!(!window.contains(time(5, 59)));
    }

    #[test]
    fn window_wraps_past_midnight() {
        let window = RefreshWindow::new(time(22, 0), time(2, 0));
        assert!(window.contains(time(23, 30)));
        assert!(window.contains(time(0, 15)));
        assert!(!window.contains(time(2, 0)));
        assert!(!window.contains(time(12, 0)));
    }

    #[test]
    fn equal_bounds_keep_window_open() {
        let window = RefreshWindow::new(time(6, 0), time(6, 0));
        assert!(window.contains(time(6, 0)));
        assert!(window.contains(time(5, 59)));
        assert!(window.contains(time(23, 0)));
        let policy = RefreshPolicy::default().with_window(window);
        let now = chrono::NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_time(time(13, 0));
        assert!(policy.allows(now));
    }

    #[test]
    fn first_refresh_is_always_due() {
        let policy = RefreshPolicy::default();
        let now = chrono::NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_time(time(9, 0));
        assert!(policy.is_due(None, now));
        assert!(!policy.is_due(Some(now - TimeDelta::minutes(30)), now));
        assert!(policy.is_due(Some(now - TimeDelta::hours(1)), now));
    }
}
