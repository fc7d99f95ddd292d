use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use futures::lock::Mutex;
use moka::future::Cache;

/// One async mutex per `employee_id:date`, so concurrent punches for the
/// same employee and day run one after another.
pub struct PunchLocks {
    locks: Cache<String, Arc<Mutex<()>>>,
}

impl PunchLocks {
    pub fn new() -> Self {
        Self {
            // No max_capacity: size-based eviction could drop a mutex that
            // is still held and hand the same key a fresh one.
            locks: Cache::builder()
                .time_to_idle(Duration::from_secs(86400)) // a day's locks go stale after 24h
                .build(),
        }
    }

    /// The mutex guarding `employee_id` on `date`, created on first use.
    pub async fn lock_for(&self, employee_id: &str, date: NaiveDate) -> Arc<Mutex<()>> {
        let key = format!("{}:{}", employee_id, date);
        self.locks
            .get_with(key, async { Arc::new(Mutex::new(())) })
            .await
    }
}

impl Default for PunchLocks {
    fn default() -> Self {
        Self::new()
    }
}
