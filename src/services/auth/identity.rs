//! Identity resolution: does the verified subject still exist?
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::repos::{error::RepoError, user_repo};

/// Backing-store view of a principal. Never carries password material.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentityRecord {
    pub id: String,
    pub user_name: String,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl From<user_repo::UserRow> for IdentityRecord {
    fn from(row: user_repo::UserRow) -> Self {
        Self {
            id: row.id.to_string(),
            user_name: row.user_name,
            email: row.email,
            role: row.role,
            created_at: row.created_at,
        }
    }
}

/// Read-only lookup of principals by identifier.
///
/// Implementations must be safe to call from many request tasks at once.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    // Returns the store name (for logging).
    fn backend_name(&self) -> &'static str;

    // `Ok(None)` when no principal has this identifier.
    async fn find_by_id(&self, id: &str) -> Result<Option<IdentityRecord>, RepoError>;
}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("identity not found")]
    NotFound,
    #[error("identity store unavailable")]
    Unavailable(#[source] RepoError),
}

/// Look up the subject of a verified claim.
///
/// Both variants of [`IdentityError`] mean "not authenticated" to the caller.
pub async fn resolve_identity(
    store: &dyn IdentityStore,
    subject: &str,
) -> Result<IdentityRecord, IdentityError> {
    match store.find_by_id(subject).await {
        Ok(Some(record)) => Ok(record),
        Ok(None) => Err(IdentityError::NotFound),
        Err(err) => Err(IdentityError::Unavailable(err)),
    }
}

/// Postgres-backed identity store (`users` table).
#[derive(Clone, Debug)]
pub struct PgIdentityStore {
    db: PgPool,
}

impl PgIdentityStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl IdentityStore for PgIdentityStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<IdentityRecord>, RepoError> {
        // users are keyed by UUID; anything else cannot exist
        let Ok(user_id) = Uuid::parse_str(id) else {
            return Ok(None);
        };

        let row = user_repo::get(&self.db, user_id).await?;

        Ok(row.map(IdentityRecord::from))
    }
}


#[cfg(test)]
mod tests {
    use super::testing::MemoryIdentityStore;
    use super::*;

    #[tokio::test]
    async fn existing_identity_is_returned() {
        let store = MemoryIdentityStore::with_users(&["u-1"]);
        let record = resolve_identity(&store, "u-1").await.unwrap();
        assert_eq!(record.id, "u-1");
    }

    #[tokio::test]
    async fn missing_identity_is_not_found() {
        let store = MemoryIdentityStore::with_users(&["u-1"]);
        assert!(matches!(
            resolve_identity(&store, "deleted").await,
            Err(IdentityError::NotFound)
        ));
    }

    #[tokio::test]
    async fn store_failure_is_reported_as_unavailable() {
        let store = MemoryIdentityStore::failing();
        assert!(matches!(
            resolve_identity(&store, "u-1").await,
            Err(IdentityError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn postgres_store_skips_the_database_for_non_uuid_subjects() {
        // Lazy pool: no connection is attempted unless a query runs.
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://nobody@127.0.0.1:1/none")
            .unwrap();
        let store = PgIdentityStore::new(pool);

        assert_eq!(store.find_by_id("not-a-uuid").await.unwrap(), None);
    }
}
