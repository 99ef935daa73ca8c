//! Read-only listing of stored jobs.

use std::sync::Arc;

use crate::error::StoreResult;
use crate::traits::store::{JobPredicate, JobStore, SortOrder};
use crate::types::job::Job;

/// Most jobs returned by one listing.
pub const MAX_PAGE_SIZE: usize = 5000;

#[derive(Clone)]
pub struct JobQuery {
    store: Arc<dyn JobStore>,
}

impl JobQuery {
    pub fn new(store: Arc<dyn JobStore>) -> Self {
        Self { store }
    }

    /// Newest jobs first, optionally for one company (exact match).
    ///
    /// A blank company filter is ignored.
    pub async fn list_jobs(&self, company: Option<&str>) -> StoreResult<Vec<Job>> {
        let predicate = match company.map(str::trim).filter(|c| !c.is_empty()) {
            Some(company) => JobPredicate::for_company(company),
            None => JobPredicate::all(),
        };

        self.store
            .find(&predicate, SortOrder::PostedDateDesc, MAX_PAGE_SIZE)
            .await
    }
}
