use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, instrument};

use crate::error::{AppError, ConflictError};
use crate::store::{Store, StoreError};

/// Calendar dates on which vacation and permit requests are refused.
#[derive(Clone)]
pub struct BlockedDateRegistry {
    store: Arc<dyn Store>,
}

impl BlockedDateRegistry {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<NaiveDate>, AppError> {
        Ok(self.store.list_blocked_dates().await?)
    }

    pub async fn blocked_set(&self) -> Result<HashSet<NaiveDate>, AppError> {
        Ok(self.list().await?.into_iter().collect())
    }

    /// Uniqueness is left to the store's constraint, so two racing adds of the
    /// same date yield one success and one conflict.
    #[instrument(name = "block_date", skip(self))]
    pub async fn add(&self, date: NaiveDate) -> Result<(), AppError> {
        match self.store.insert_blocked_date(date).await {
            Ok(()) => {
                info!("Date blocked");
                Ok(())
            }
            Err(StoreError::Duplicate) => Err(ConflictError::DateAlreadyBlocked.into()),
            Err(e) => Err(e.into()),
        }
    }

    /// Removing a date that is not blocked is not an error.
    #[instrument(name = "unblock_date", skip(self))]
    pub async fn remove(&self, date: NaiveDate) -> Result<(), AppError> {
        let removed = self.store.delete_blocked_date(date).await?;
        info!(removed, "Date unblocked");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::memory_store;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[actix_web::test]
    async fn second_add_of_same_date_conflicts() {
        let registry = BlockedDateRegistry::new(memory_store().await);
        let date = day(2025, 8, 15);

        registry.add(date).await.unwrap();
        let err = registry.add(date).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Conflict(ConflictError::DateAlreadyBlocked)
        ));

        assert_eq!(registry.list().await.unwrap(), vec![date]);
    }

    #[actix_web::test]
    async fn racing_adds_yield_one_success() {
        let registry = BlockedDateRegistry::new(memory_store().await);
        let date = day(2025, 12, 24);

        let (a, b) = futures::join!(registry.add(date), registry.add(date));
        assert_eq!([a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count(), 1);
        assert_eq!(registry.list().await.unwrap(), vec![date]);
    }

    #[actix_web::test]
    async fn list_is_ascending_and_remove_is_idempotent() {
        let registry = BlockedDateRegistry::new(memory_store().await);
        registry.add(day(2025, 12, 25)).await.unwrap();
        registry.add(day(2025, 1, 1)).await.unwrap();
        registry.add(day(2025, 8, 15)).await.unwrap();

        assert_eq!(
            registry.list().await.unwrap(),
            vec![day(2025, 1, 1), day(2025, 8, 15), day(2025, 12, 25)]
        );

        registry.remove(day(2025, 8, 15)).await.unwrap();
        registry.remove(day(2025, 8, 15)).await.unwrap();
        registry.remove(day(2030, 1, 1)).await.unwrap();

        let set = registry.blocked_set().await.unwrap();
        assert_eq!(set.len(), 2);
        assert!(!set.contains(&day(2025, 8, 15)));
    }
}
