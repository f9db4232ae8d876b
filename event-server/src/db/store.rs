//! Storage seams used by the registration and count flows
//!
//! Handlers never talk to the pool directly: they receive an
//! `Arc<dyn RecordStore>` / `Arc<dyn DepartmentLookup>` from [`ServerState`].
//!
//! [`ServerState`]: crate::core::ServerState

use async_trait::async_trait;
use shared::models::{CountFilter, DepartmentTerm, RecordField, Registration, RegistrationCreate};
use sqlx::SqlitePool;

use super::repository::{RepoResult, registration, taxonomy};

/// Persistent record storage
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Create a record; fails with `Duplicate` on a uniqueness violation and
    /// `NotFound` when the record type is not configured
    async fn create(&self, data: RegistrationCreate) -> RepoResult<Registration>;

    /// Records of `record_type` whose `field` equals `value`
    async fn find_by_field(
        &self,
        record_type: &str,
        field: RecordField,
        value: &str,
    ) -> RepoResult<Vec<Registration>>;

    /// Number of records matching the filter
    async fn count(&self, filter: &CountFilter) -> RepoResult<i64>;
}

/// Controlled vocabulary lookup
#[async_trait]
pub trait DepartmentLookup: Send + Sync {
    /// Terms of the vocabulary, ordered by weight then name
    async fn terms(&self, vocabulary: &str) -> RepoResult<Vec<DepartmentTerm>>;

    /// First term whose name equals `candidate`, ignoring case
    async fn resolve(&self, vocabulary: &str, candidate: &str) -> RepoResult<Option<DepartmentTerm>> {
        let terms = self.terms(vocabulary).await?;
        Ok(terms.into_iter().find(|term| term.matches(candidate)))
    }
}

// ========== SQLite implementations ==========

#[derive(Clone, Debug)]
pub struct SqliteRecordStore {
    pool: SqlitePool,
}

impl SqliteRecordStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn create(&self, data: RegistrationCreate) -> RepoResult<Registration> {
        registration::create(&self.pool, data).await
    }

    async fn find_by_field(
        &self,
        record_type: &str,
        field: RecordField,
        value: &str,
    ) -> RepoResult<Vec<Registration>> {
        registration::find_by_field(&self.pool, record_type, field, value).await
    }

    async fn count(&self, filter: &CountFilter) -> RepoResult<i64> {
        registration::count(&self.pool, filter).await
    }
}

#[derive(Clone, Debug)]
pub struct SqliteDepartmentLookup {
    pool: SqlitePool,
}

impl SqliteDepartmentLookup {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DepartmentLookup for SqliteDepartmentLookup {
    async fn terms(&self, vocabulary: &str) -> RepoResult<Vec<DepartmentTerm>> {
        taxonomy::find_by_vocabulary(&self.pool, vocabulary).await
    }
}
