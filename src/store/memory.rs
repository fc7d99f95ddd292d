use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::NaiveDate;

use super::{AttendanceStore, StoreError};
use crate::model::attendance::AttendanceRecord;

/// Process-lifetime store, nothing survives a restart.
#[derive(Default)]
pub struct MemoryAttendanceStore {
    records: RwLock<Vec<AttendanceRecord>>,
}

impl MemoryAttendanceStore {
    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<AttendanceRecord>>, StoreError> {
        self.records.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<AttendanceRecord>>, StoreError> {
        self.records.write().map_err(|_| StoreError::Poisoned)
    }

    fn filtered<F>(&self, keep: F) -> Result<Vec<AttendanceRecord>, StoreError>
    where
        F: Fn(&AttendanceRecord) -> bool,
    {
        Ok(self.read()?.iter().filter(|r| keep(r)).cloned().collect())
    }
}

#[async_trait]
impl AttendanceStore for MemoryAttendanceStore {
    async fn get(&self, id: &str) -> Result<Option<AttendanceRecord>, StoreError> {
        Ok(self.read()?.iter().find(|r| r.id == id).cloned())
    }

    async fn upsert(&self, record: AttendanceRecord) -> Result<(), StoreError> {
        let mut records = self.write()?;
        match records.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => *existing = record,
            None => records.push(record),
        }
        Ok(())
    }

    async fn query_by_employee_and_date(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, StoreError> {
        self.filtered(|r| r.employee_id == employee_id && r.date == date)
    }

    async fn all(&self) -> Result<Vec<AttendanceRecord>, StoreError> {
        Ok(self.read()?.clone())
    }

    async fn for_employee(&self, employee_id: &str) -> Result<Vec<AttendanceRecord>, StoreError> {
        self.filtered(|r| r.employee_id == employee_id)
    }
}
