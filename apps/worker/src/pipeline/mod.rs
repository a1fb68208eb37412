//! The application pipeline: batch dispatcher, per-criterion control loop,
//! resume selection and result commit.
//!
//! All external collaborators are injected as trait objects, so the whole
//! pipeline runs against in-memory fakes in tests. Concurrency model: a
//! bounded pool at the user granularity; criteria within a user and postings
//! within a page fan out without an extra bound.

mod criterion;
pub mod dedup;
pub mod quota;
mod resume;
#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

use anyhow::{Context, Result};
use futures::future;
use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::board::JobBoard;
use crate::llm::assistant::Assistant;
use crate::models::application::NewApplication;
use crate::models::user::User;
use crate::store::ApplicationStore;

/// Width of the user-level worker pool, the only hard bound on concurrency.
const USER_POOL_WIDTH: usize = 10;

/// The application pipeline with its injected collaborators.
pub struct Pipeline {
    board: Arc<dyn JobBoard>,
    assistant: Arc<dyn Assistant>,
    store: Arc<dyn ApplicationStore>,
    /// Region code every search is scoped to.
    area: String,
}

impl Pipeline {
    pub fn new(
        board: Arc<dyn JobBoard>,
        assistant: Arc<dyn Assistant>,
        store: Arc<dyn ApplicationStore>,
        area: String,
    ) -> Self {
        Self {
            board,
            assistant,
            store,
            area,
        }
    }

    /// One full batch: every user, every active criterion. Completes only
    /// when all per-user work has settled; individual outcomes never abort
    /// the batch.
    pub async fn run_batch(&self) -> Result<()> {
        let users = self
            .store
            .load_users()
            .await
            .context("loading users for batch")?;
        info!("batch started: {} users", users.len());

        stream::iter(users)
            .for_each_concurrent(USER_POOL_WIDTH, |user| async move {
                self.process_user(user).await;
            })
            .await;

        info!("batch finished");
        Ok(())
    }

    /// Refreshes credentials best-effort, then runs all of the user's active
    /// criteria concurrently. Never returns an error: every failure inside is
    /// logged and contained.
    pub(crate) async fn process_user(&self, mut user: User) {
        if let Some(tokens) = user.credentials.clone() {
            match self.board.refresh_token(&tokens.refresh_token).await {
                Ok(fresh) => {
                    if let Err(e) = self.store.update_credentials(user.id, &fresh).await {
                        warn!("user {}: persisting refreshed credentials failed: {e:#}", user.id);
                    }
                    user.credentials = Some(fresh);
                }
                Err(e) => {
                    // Keep the prior pair; the user's criteria still run.
                    warn!("user {}: credential refresh failed: {e}", user.id);
                }
            }
        }

        let user = &user;
        let runs = user.active_criteria().map(|criterion| async move {
            match self.run_criterion(user, criterion).await {
                Ok(count) => debug!("criterion {}: {count} applications committed", criterion.id),
                Err(e) => warn!("criterion {}: run aborted: {e:#}", criterion.id),
            }
        });
        future::join_all(runs).await;
    }

    /// Best-effort bulk insert: every record is attempted independently and a
    /// failure on one never blocks the others. Returns the inserted count.
    pub(crate) async fn commit_records(&self, user_id: Uuid, records: Vec<NewApplication>) -> usize {
        let total = records.len();
        let results =
            future::join_all(records.iter().map(|r| self.store.insert_application(r))).await;

        let mut inserted = 0;
        let mut duplicates = 0;
        let mut failed = 0;
        for result in results {
            match result {
                Ok(true) => inserted += 1,
                Ok(false) => duplicates += 1,
                Err(e) => {
                    warn!("user {user_id}: application insert failed: {e:#}");
                    failed += 1;
                }
            }
        }
        info!(
            "user {user_id}: committed {inserted}/{total} applications \
             ({duplicates} duplicates, {failed} failed)"
        );
        inserted
    }
}
