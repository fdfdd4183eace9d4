use std::str::FromStr;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::info;

use super::{
    INSERT_REQUEST_SQL, RequestFilter, RequestRow, Store, StoreError, delete_requests_sql,
    listing_sql, month_param,
};
use crate::model::request::{LeaveRequest, NewRequest};

/// Single-file deployment. `submitted_at` is stored as RFC 3339 text in UTC.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        if database_url.contains(":memory:") {
            return Self::in_memory().await;
        }

        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;
        Ok(Self { pool })
    }

    /// A private database that lives as long as the store. Backed by a single
    /// connection that never idles out, since each connection would otherwise
    /// see its own empty database.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl Store for SqliteStore {
    async fn init_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS leave_requests (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                request_type TEXT NOT NULL,
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                days TEXT NOT NULL,
                hours TEXT NOT NULL DEFAULT '',
                start_time TEXT NOT NULL DEFAULT '',
                end_time TEXT NOT NULL DEFAULT '',
                motivation TEXT NOT NULL DEFAULT '',
                note TEXT NOT NULL DEFAULT '',
                status TEXT NOT NULL,
                submitted_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS blocked_dates (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                blocked_date TEXT NOT NULL UNIQUE
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        info!("SQLite schema ready");
        Ok(())
    }

    async fn insert_request(&self, request: &NewRequest) -> Result<i64, StoreError> {
        let result = sqlx::query(INSERT_REQUEST_SQL)
            .bind(request.kind.as_ref())
            .bind(&request.name)
            .bind(&request.email)
            .bind(request.days_json())
            .bind(&request.hours)
            .bind(&request.start_time)
            .bind(&request.end_time)
            .bind(&request.motivation)
            .bind(&request.note)
            .bind(&request.status)
            .execute(&self.pool)
            .await?;

        Ok(result.last_insert_rowid())
    }

    async fn list_requests(&self, filter: &RequestFilter) -> Result<Vec<LeaveRequest>, StoreError> {
        let sql = listing_sql(filter, "strftime('%m', submitted_at)");

        let mut query = sqlx::query_as::<_, RequestRow>(&sql);
        if let Some(name) = &filter.name {
            query = query.bind(name);
        }
        if let Some(month) = filter.month {
            query = query.bind(month_param(month));
        }

        query
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(LeaveRequest::try_from)
            .collect()
    }

    async fn delete_requests(&self, ids: &[i64]) -> Result<u64, StoreError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let sql = delete_requests_sql(ids.len());
        let mut query = sqlx::query(&sql);
        for id in ids {
            query = query.bind(*id);
        }

        Ok(query.execute(&self.pool).await?.rows_affected())
    }

    async fn list_blocked_dates(&self) -> Result<Vec<NaiveDate>, StoreError> {
        let dates = sqlx::query_scalar::<_, NaiveDate>(
            "SELECT blocked_date FROM blocked_dates ORDER BY blocked_date ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(dates)
    }

    async fn insert_blocked_date(&self, date: NaiveDate) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO blocked_dates (blocked_date) VALUES (?)")
            .bind(date)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_blocked_date(&self, date: NaiveDate) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM blocked_dates WHERE blocked_date = ?")
            .bind(date)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
