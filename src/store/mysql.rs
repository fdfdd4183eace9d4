use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::MySqlPool;
use tracing::info;

use super::{
    INSERT_REQUEST_SQL, RequestFilter, RequestRow, Store, StoreError, delete_requests_sql,
    listing_sql, month_param,
};
use crate::model::request::{LeaveRequest, NewRequest};

/// Hosted deployment. The session time zone is pinned to UTC so that
/// `submitted_at` and the month filter agree with the rest of the service.
#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = sqlx::mysql::MySqlPoolOptions::new()
            .after_connect(|conn, _meta| {
                Box::pin(async move {
                    sqlx::query("SET time_zone = '+00:00'")
                        .execute(conn)
                        .await?;
                    Ok(())
                })
            })
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl Store for MySqlStore {
    async fn init_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS leave_requests (
                id BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY,
                request_type VARCHAR(32) NOT NULL,
                name VARCHAR(255) NOT NULL,
                email VARCHAR(255) NOT NULL,
                days TEXT NOT NULL,
                hours VARCHAR(64) NOT NULL DEFAULT '',
                start_time VARCHAR(16) NOT NULL DEFAULT '',
                end_time VARCHAR(16) NOT NULL DEFAULT '',
                motivation TEXT NOT NULL,
                note TEXT NOT NULL,
                status VARCHAR(255) NOT NULL,
                submitted_at TIMESTAMP(3) NOT NULL DEFAULT CURRENT_TIMESTAMP(3),
                INDEX idx_leave_requests_submitted_at (submitted_at)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS blocked_dates (
                id BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY,
                blocked_date DATE NOT NULL,
                UNIQUE KEY uq_blocked_dates_date (blocked_date)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        info!("MySQL schema ready");
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

        Ok(result.last_insert_id() as i64)
    }

    async fn list_requests(&self, filter: &RequestFilter) -> Result<Vec<LeaveRequest>, StoreError> {
        let sql = listing_sql(filter, "DATE_FORMAT(submitted_at, '%m')");

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
