use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, instrument};
use utoipa::{IntoParams, ToSchema};

use crate::error::{AppError, ValidationError};
use crate::model::request::LeaveRequest;
use crate::store::{RequestFilter, Store};

/// Value the admin dashboard sends for "everyone" / "every month".
pub const ALL: &str = "Tutti";

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct AdminFilter {
    /// Exact requester name, or `Tutti` for everyone
    #[schema(example = "Ana")]
    #[serde(alias = "nome")]
    pub name: Option<String>,
    /// Month of submission, `1`-`12` or `01`-`12`, or `Tutti` for every month
    #[schema(example = "01")]
    #[serde(alias = "mese")]
    pub month: Option<String>,
}

impl AdminFilter {
    pub fn resolve(&self) -> Result<RequestFilter, ValidationError> {
        let name = selected(&self.name).map(str::to_string);

        let month = match selected(&self.month) {
            Some(raw) => Some(
                raw.parse::<u32>()
                    .ok()
                    .filter(|m| (1..=12).contains(m))
                    .ok_or_else(|| ValidationError::InvalidMonth(raw.to_string()))?,
            ),
            None => None,
        };

        Ok(RequestFilter { name, month })
    }
}

/// `None` for absent, blank or the "all" sentinel.
fn selected(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && *v != ALL)
}

#[derive(Clone)]
pub struct RequestQuery {
    store: Arc<dyn Store>,
}

impl RequestQuery {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Everything, newest first.
    pub async fn list_for_employee(&self) -> Result<Vec<LeaveRequest>, AppError> {
        Ok(self.store.list_requests(&RequestFilter::default()).await?)
    }

    pub async fn list_for_admin(&self, filter: &AdminFilter) -> Result<Vec<LeaveRequest>, AppError> {
        let filter = filter.resolve()?;
        Ok(self.store.list_requests(&filter).await?)
    }

    /// Ids that do not exist are ignored. Returns the number of deleted records.
    #[instrument(name = "delete_requests", skip(self))]
    pub async fn delete_by_ids(&self, ids: &[i64]) -> Result<u64, AppError> {
        if ids.is_empty() {
            return Err(ValidationError::EmptySelection.into());
        }

        let unique: Vec<i64> = ids.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();
        let deleted = self.store.delete_requests(&unique).await?;

        info!(requested = unique.len(), deleted, "Requests deleted");
        Ok(deleted)
    }
}
