use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::model::attendance::AttendanceRecord;

pub mod memory;
pub mod mysql;

pub use memory::MemoryAttendanceStore;
pub use mysql::MySqlAttendanceStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("attendance store lock poisoned")]
    Poisoned,
}

/// Backing storage for attendance records.
///
/// Every read hands back owned copies, callers can't reach into store state.
/// Listings keep insertion order.
#[async_trait]
pub trait AttendanceStore: Send + Sync {
    async fn get(&self, id: &str) -> Result<Option<AttendanceRecord>, StoreError>;

    /// Insert if the id is new, replace otherwise.
    async fn upsert(&self, record: AttendanceRecord) -> Result<(), StoreError>;

    async fn query_by_employee_and_date(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, StoreError>;

    async fn all(&self) -> Result<Vec<AttendanceRecord>, StoreError>;

    async fn for_employee(&self, employee_id: &str) -> Result<Vec<AttendanceRecord>, StoreError>;
}
