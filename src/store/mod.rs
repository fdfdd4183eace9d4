//! Storage contract shared by the MySQL and SQLite deployments.
//!
//! The rest of the crate only ever sees `Arc<dyn Store>`; picking an adapter
//! happens once, in [`crate::db::init_store`].

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use derive_more::Display;
use sqlx::FromRow;

use crate::model::request::{LeaveRequest, NewRequest, RequestKind};

pub mod mysql;
pub mod sqlite;

pub use mysql::MySqlStore;
pub use sqlite::SqliteStore;

#[derive(Debug, Display)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write.
    #[display(fmt = "duplicate key")]
    Duplicate,
    #[display(fmt = "database error: {}", _0)]
    Database(sqlx::Error),
    /// A stored row could not be mapped back to a record.
    #[display(fmt = "corrupt row {}: {}", _0, _1)]
    Corrupt(i64, String),
}

impl std::error::Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.is_unique_violation() {
                return StoreError::Duplicate;
            }
        }
        StoreError::Database(e)
    }
}

/// Listing filter with the "no filter" sentinels already resolved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestFilter {
    pub name: Option<String>,
    /// 1..=12, matched against the month of `submitted_at`.
    pub month: Option<u32>,
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Creates the tables if they do not exist yet.
    async fn init_schema(&self) -> Result<(), StoreError>;

    /// Writes one request; `submitted_at` is set by the store. Returns the new id.
    async fn insert_request(&self, request: &NewRequest) -> Result<i64, StoreError>;

    /// Newest first.
    async fn list_requests(&self, filter: &RequestFilter) -> Result<Vec<LeaveRequest>, StoreError>;

    /// Deletes whichever of `ids` exist and returns how many rows went away.
    async fn delete_requests(&self, ids: &[i64]) -> Result<u64, StoreError>;

    /// Ascending.
    async fn list_blocked_dates(&self) -> Result<Vec<NaiveDate>, StoreError>;

    /// Fails with [`StoreError::Duplicate`] when the date is already present.
    async fn insert_blocked_date(&self, date: NaiveDate) -> Result<(), StoreError>;

    async fn delete_blocked_date(&self, date: NaiveDate) -> Result<u64, StoreError>;

    async fn close(&self);
}

/// Row shape of `leave_requests`, common to both engines.
#[derive(FromRow)]
pub(crate) struct RequestRow {
    pub id: i64,
    pub request_type: String,
    pub name: String,
    pub email: String,
    pub days: String,
    pub hours: String,
    pub start_time: String,
    pub end_time: String,
    pub motivation: String,
    pub note: String,
    pub status: String,
    pub submitted_at: DateTime<Utc>,
}

impl TryFrom<RequestRow> for LeaveRequest {
    type Error = StoreError;

    fn try_from(row: RequestRow) -> Result<Self, Self::Error> {
        let kind = RequestKind::from_str(&row.request_type)
            .map_err(|_| StoreError::Corrupt(row.id, format!("type {:?}", row.request_type)))?;
        let days: Vec<NaiveDate> = serde_json::from_str(&row.days)
            .map_err(|e| StoreError::Corrupt(row.id, format!("days: {e}")))?;

        Ok(LeaveRequest {
            id: row.id,
            kind,
            name: row.name,
            email: row.email,
            days,
            hours: row.hours,
            start_time: row.start_time,
            end_time: row.end_time,
            motivation: row.motivation,
            note: row.note,
            status: row.status,
            submitted_at: row.submitted_at,
        })
    }
}

pub(crate) const INSERT_REQUEST_SQL: &str = r#"
    INSERT INTO leave_requests
        (request_type, name, email, days, hours, start_time, end_time, motivation, note, status)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
"#;

/// Builds the listing query. `month_expr` is the engine's two-digit month of `submitted_at`.
pub(crate) fn listing_sql(filter: &RequestFilter, month_expr: &str) -> String {
    let mut where_sql = String::from(" WHERE 1=1");

    if filter.name.is_some() {
        where_sql.push_str(" AND name = ?");
    }
    if filter.month.is_some() {
        where_sql.push_str(&format!(" AND {month_expr} = ?"));
    }

    format!(
        r#"
        SELECT id, request_type, name, email, days, hours, start_time, end_time,
               motivation, note, status, submitted_at
        FROM leave_requests
        {where_sql}
        ORDER BY submitted_at DESC, id DESC
        "#
    )
}

/// Month bind value, zero padded to match `%m`.
pub(crate) fn month_param(month: u32) -> String {
    format!("{month:02}")
}

pub(crate) fn delete_requests_sql(count: usize) -> String {
    let placeholders = vec!["?"; count].join(", ");
    format!("DELETE FROM leave_requests WHERE id IN ({placeholders})")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_sql_adds_only_requested_filters() {
        let none = listing_sql(&RequestFilter::default(), "MONTH_OF(x)");
        assert!(!none.contains("name = ?"));
        assert!(!none.contains("MONTH_OF"));

        let both = listing_sql(
            &RequestFilter {
                name: Some("Ana".into()),
                month: Some(3),
            },
            "MONTH_OF(x)",
        );
        let name_at = both.find("name = ?").unwrap();
        let month_at = both.find("MONTH_OF(x) = ?").unwrap();
        assert!(name_at < month_at);
        assert!(both.contains("ORDER BY submitted_at DESC, id DESC"));
    }

    #[test]
    fn delete_sql_has_one_placeholder_per_id() {
        assert_eq!(
            delete_requests_sql(3),
            "DELETE FROM leave_requests WHERE id IN (?, ?, ?)"
        );
        assert_eq!(month_param(3), "03");
        assert_eq!(month_param(11), "11");
    }
}
