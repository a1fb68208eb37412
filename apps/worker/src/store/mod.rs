//! User/application store seam.
//!
//! The pipeline depends on this trait only; `PgStore` is the PostgreSQL
//! implementation, and tests use an in-memory mock.

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

pub mod pg;

use crate::models::application::NewApplication;
use crate::models::user::{TokenPair, User};

/// Identity of an already-persisted application, used for dedup against
/// previous runs.
#[derive(Debug, Clone)]
pub struct AppliedKey {
    pub posting_id: String,
    pub title: String,
    pub employer: String,
}

#[async_trait]
pub trait ApplicationStore: Send + Sync {
    /// Loads every user with their criteria and stored credentials.
    /// No filtering, no pagination — the batch sees the whole population.
    async fn load_users(&self) -> Result<Vec<User>>;

    /// Writes back a refreshed token pair for one user.
    async fn update_credentials(&self, user_id: Uuid, tokens: &TokenPair) -> Result<()>;

    /// Keys of all applications already persisted for one user.
    async fn applied_keys(&self, user_id: Uuid) -> Result<Vec<AppliedKey>>;

    /// Inserts one application record. Returns `false` when the store skipped
    /// it as a duplicate (uniqueness conflict), `true` when inserted.
    async fn insert_application(&self, record: &NewApplication) -> Result<bool>;
}
