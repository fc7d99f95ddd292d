use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::MySqlPool;

use super::{AttendanceStore, StoreError};
use crate::model::attendance::AttendanceRecord;

/// `seq` only exists to keep listings in insertion order.
const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS attendance_records (
        seq BIGINT UNSIGNED NOT NULL AUTO_INCREMENT,
        id CHAR(36) NOT NULL,
        employee_id VARCHAR(64) NOT NULL,
        employee_name VARCHAR(255) NOT NULL,
        date DATE NOT NULL,
        check_in VARCHAR(16) NULL,
        check_out VARCHAR(16) NULL,
        total_hours VARCHAR(32) NULL,
        PRIMARY KEY (seq),
        UNIQUE KEY uq_attendance_id (id),
        KEY idx_attendance_employee_date (employee_id, date)
    )
"#;

pub struct MySqlAttendanceStore {
    pool: MySqlPool,
}

impl MySqlAttendanceStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Creates the attendance table if it isn't there yet.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        tracing::info!("attendance_records table ready");
        Ok(())
    }
}

#[async_trait]
impl AttendanceStore for MySqlAttendanceStore {
    async fn get(&self, id: &str) -> Result<Option<AttendanceRecord>, StoreError> {
        let record = sqlx::query_as::<_, AttendanceRecord>(
            r#"
            SELECT id, employee_id, employee_name, date, check_in, check_out, total_hours
            FROM attendance_records
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn upsert(&self, record: AttendanceRecord) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO attendance_records
            (id, employee_id, employee_name, date, check_in, check_out, total_hours)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE
                employee_id = VALUES(employee_id),
                employee_name = VALUES(employee_name),
                date = VALUES(date),
                check_in = VALUES(check_in),
                check_out = VALUES(check_out),
                total_hours = VALUES(total_hours)
            "#,
        )
        .bind(&record.id)
        .bind(&record.employee_id)
        .bind(&record.employee_name)
        .bind(record.date)
        .bind(&record.check_in)
        .bind(&record.check_out)
        .bind(&record.total_hours)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn query_by_employee_and_date(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, StoreError> {
        let records = sqlx::query_as::<_, AttendanceRecord>(
            r#"
            SELECT id, employee_id, employee_name, date, check_in, check_out, total_hours
            FROM attendance_records
            WHERE employee_id = ? AND date = ?
            ORDER BY seq
            "#,
        )
        .bind(employee_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn all(&self) -> Result<Vec<AttendanceRecord>, StoreError> {
        let records = sqlx::query_as::<_, AttendanceRecord>(
            r#"
            SELECT id, employee_id, employee_name, date, check_in, check_out, total_hours
            FROM attendance_records
            ORDER BY seq
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn for_employee(&self, employee_id: &str) -> Result<Vec<AttendanceRecord>, StoreError> {
        let records = sqlx::query_as::<_, AttendanceRecord>(
            r#"
            SELECT id, employee_id, employee_name, date, check_in, check_out, total_hours
            FROM attendance_records
            WHERE employee_id = ?
            ORDER BY seq
            "#,
        )
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}
