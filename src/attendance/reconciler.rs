use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info};

use super::time::{Clock, ClockTime, WorkedDuration};
use crate::model::attendance::{AttendanceRecord, AttendanceSummary, PunchAction};
use crate::store::{AttendanceStore, StoreError};
use crate::utils::punch_lock::PunchLocks;

/// Punch reconciliation and the read-side queries over one store.
pub struct AttendanceService {
    store: Arc<dyn AttendanceStore>,
    clock: Arc<dyn Clock>,
    locks: PunchLocks,
}

impl AttendanceService {
    pub fn new(store: Arc<dyn AttendanceStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            locks: PunchLocks::new(),
        }
    }

    /// Applies a punch for today.
    ///
    /// `Ok(None)` means the punch doesn't apply: punching in while a record
    /// is still open, or punching out with nothing open. Nothing is written
    /// in that case.
    pub async fn reconcile_punch(
        &self,
        employee_id: &str,
        employee_name: &str,
        action: PunchAction,
    ) -> Result<Option<AttendanceRecord>, StoreError> {
        let now = self.clock.now();
        let today = now.date();
        let stamp = ClockTime::from(now.time()).to_string();

        let lock = self.locks.lock_for(employee_id, today).await;
        let _guard = lock.lock().await;

        let open = self
            .store
            .query_by_employee_and_date(employee_id, today)
            .await?
            .into_iter()
            .find(AttendanceRecord::is_open);

        match (action, open) {
            (PunchAction::In, Some(existing)) => {
                debug!(employee_id, record_id = %existing.id, "Already punched in today");
                Ok(None)
            }
            (PunchAction::In, None) => {
                let record = AttendanceRecord::open(employee_id, employee_name, today, stamp);
                self.store.upsert(record.clone()).await?;
                info!(employee_id, record_id = %record.id, check_in = ?record.check_in, "Punched in");
                Ok(Some(record))
            }
            (PunchAction::Out, None) => {
                debug!(employee_id, "Punch-out without an open record");
                Ok(None)
            }
            (PunchAction::Out, Some(mut record)) => {
                record.close(stamp);
                self.store.upsert(record.clone()).await?;
                info!(
                    employee_id,
                    record_id = %record.id,
                    total_hours = ?record.total_hours,
                    "Punched out"
                );
                Ok(Some(record))
            }
        }
    }

    pub async fn get_all(&self) -> Result<Vec<AttendanceRecord>, StoreError> {
        self.store.all().await
    }

    pub async fn get_for_employee(&self, employee_id: &str) -> Result<Vec<AttendanceRecord>, StoreError> {
        self.store.for_employee(employee_id).await
    }

    /// Today's record for the employee: the open one if any, otherwise the
    /// latest closed one.
    pub async fn get_today_for_employee(
        &self,
        employee_id: &str,
    ) -> Result<Option<AttendanceRecord>, StoreError> {
        let today = self.clock.now().date();
        let mut records = self
            .store
            .query_by_employee_and_date(employee_id, today)
            .await?;

        match records.iter().position(AttendanceRecord::is_open) {
            Some(i) => Ok(Some(records.swap_remove(i))),
            None => Ok(records.pop()),
        }
    }

    /// Totals for one employee between `from` and `to`, both inclusive.
    ///
    /// `Ok(None)` when `from` is after `to`.
    pub async fn summarize(
        &self,
        employee_id: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Option<AttendanceSummary>, StoreError> {
        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                debug!(employee_id, %from, %to, "Inverted summary range");
                return Ok(None);
            }
        }

        let records: Vec<_> = self
            .store
            .for_employee(employee_id)
            .await?
            .into_iter()
            .filter(|r| from.is_none_or(|from| r.date >= from))
            .filter(|r| to.is_none_or(|to| r.date <= to))
            .collect();

        let days_present = records
            .iter()
            .filter(|r| r.check_in.is_some())
            .map(|r| r.date)
            .collect::<BTreeSet<_>>()
            .len();

        let open_sessions = records.iter().filter(|r| r.is_open()).count();

        let durations: Vec<_> = records
            .iter()
            .filter_map(|r| match (&r.check_in, &r.check_out) {
                (Some(check_in), Some(check_out)) => Some((r.date, check_in, check_out)),
                _ => None,
            })
            .collect();
        let completed_sessions = durations.len();

        let total_minutes: i64 = durations
            .into_iter()
            .filter_map(|(date, check_in, check_out)| WorkedDuration::between(date, check_in, check_out))
            .map(|d| d.total_minutes())
            .sum();

        Ok(Some(AttendanceSummary {
            employee_id: employee_id.to_string(),
            from,
            to,
            days_present,
            completed_sessions,
            open_sessions,
            total_minutes,
            total_hours: WorkedDuration::from_minutes(total_minutes).to_string(),
        }))
    }
}
