//! The per-(user, criterion) control loop.
//!
//! Flow: quota → derive search term → paginated search (hard page cap) →
//! concurrent per-posting evaluation (dedup, quota, relevance, generation,
//! optional submission) → best-effort commit.
//!
//! Errors never escape a unit: a posting failure is logged and skips that
//! posting; a criterion failure is logged by the dispatcher and skips that
//! criterion; nothing aborts the batch.

use anyhow::{Context, Result};
use futures::future;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::board::{ApplyRequest, SearchQuery};
use crate::models::application::NewApplication;
use crate::models::posting::Posting;
use crate::models::user::{SearchCriterion, User};
use crate::pipeline::dedup::DedupIndex;
use crate::pipeline::{quota, resume, Pipeline};

/// Hard cap on search pages per criterion run.
const PAGE_CAP: u32 = 6;
/// Only postings published within the last N days are considered.
const SEARCH_PERIOD_DAYS: u32 = 2;

/// Shared state of one criterion run, updated by concurrent posting
/// evaluators. The dedup re-check, quota check and record push happen under
/// one lock, so the run can never exceed its quota or double-handle a title.
struct RunState {
    dedup: DedupIndex,
    records: Vec<NewApplication>,
}

impl Pipeline {
    /// Runs one criterion end to end and commits whatever it accumulated.
    /// Returns the number of records inserted.
    pub(crate) async fn run_criterion(
        &self,
        user: &User,
        criterion: &SearchCriterion,
    ) -> Result<usize> {
        let quota = quota::per_criterion(user.active_criteria_count());

        let term = self
            .assistant
            .normalize_term(&criterion.text)
            .await
            .with_context(|| format!("deriving search term for criterion {}", criterion.id))?;
        debug!("criterion {}: term '{}', quota {}", criterion.id, term, quota);

        let mut dedup = DedupIndex::new();
        for key in self
            .store
            .applied_keys(user.id)
            .await
            .context("loading applied keys")?
        {
            dedup.insert_key(&key);
        }

        let state = Mutex::new(RunState {
            dedup,
            records: Vec::new(),
        });

        for page in 1..=PAGE_CAP {
            let query = SearchQuery {
                text: term.clone(),
                page,
                area: self.area.clone(),
                only_with_salary: user.require_salary,
                period_days: SEARCH_PERIOD_DAYS,
            };

            // A failed or empty page never ends the run: the board returns
            // sparse pages, and later pages may still hold matches.
            let postings = match self.board.search(&query).await {
                Ok(result) => {
                    debug!(
                        "criterion {}: page {page}: {} postings ({} found in total)",
                        criterion.id,
                        result.items.len(),
                        result.found
                    );
                    result.items
                }
                Err(e) => {
                    warn!("criterion {}: search page {page} failed: {e}", criterion.id);
                    continue;
                }
            };

            // All postings on the page are evaluated together; join_all waits
            // for every evaluation to settle so one failure cannot cancel or
            // delay its siblings.
            let evaluations = postings
                .into_iter()
                .map(|posting| self.evaluate_posting(user, criterion, &term, quota, &state, posting));
            for result in future::join_all(evaluations).await {
                if let Err(e) = result {
                    warn!("criterion {}: posting evaluation failed: {e:#}", criterion.id);
                }
            }

            if state.lock().await.records.len() >= quota {
                break;
            }
        }

        let records = state.into_inner().records;
        if records.is_empty() {
            debug!("criterion {}: nothing to commit", criterion.id);
            return Ok(0);
        }
        Ok(self.commit_records(user.id, records).await)
    }

    /// Evaluates one posting. Every failure mode resolves to "skip this
    /// posting"; only the happy path pushes a record.
    async fn evaluate_posting(
        &self,
        user: &User,
        criterion: &SearchCriterion,
        term: &str,
        quota: usize,
        state: &Mutex<RunState>,
        posting: Posting,
    ) -> Result<()> {
        {
            let state = state.lock().await;
            if state.dedup.contains(&posting) {
                return Ok(());
            }
            if state.records.len() >= quota {
                return Ok(());
            }
        }

        // Fail-closed: a failed verdict counts as "not suitable".
        let relevant = match self
            .assistant
            .judge_relevance(term, &criterion.text, &posting)
            .await
        {
            Ok(verdict) => verdict,
            Err(e) => {
                debug!("posting {}: relevance check failed, skipping: {e}", posting.id);
                false
            }
        };
        if !relevant {
            return Ok(());
        }

        let linked_tokens = user
            .credentials
            .as_ref()
            .filter(|_| user.board_linked);

        let (cover_letter, auto_submitted) = match linked_tokens {
            Some(tokens) => {
                let selected = match resume::select_resume(
                    self.board.as_ref(),
                    self.assistant.as_ref(),
                    &tokens.access_token,
                    &posting.id,
                )
                .await
                {
                    Ok(Some(selected)) => selected,
                    Ok(None) => {
                        debug!("posting {}: no resume on file, skipping", posting.id);
                        return Ok(());
                    }
                    Err(e) => {
                        warn!("posting {}: resume selection failed, skipping: {e}", posting.id);
                        return Ok(());
                    }
                };

                let letter = match self
                    .assistant
                    .write_cover_letter(&user.full_name, &posting, Some(&selected.text))
                    .await
                {
                    Ok(letter) => letter,
                    Err(e) => {
                        debug!("posting {}: letter generation failed, skipping: {e}", posting.id);
                        return Ok(());
                    }
                };

                // Best-effort submission: a failure is logged and the record
                // is still accumulated for manual follow-up.
                let request = ApplyRequest {
                    posting_id: posting.id.clone(),
                    resume_id: selected.id,
                    message: Some(letter.clone()),
                };
                let submitted = match self
                    .board
                    .submit_application(&request, &tokens.access_token)
                    .await
                {
                    Ok(()) => true,
                    Err(e) => {
                        warn!("posting {}: submission failed: {e}", posting.id);
                        false
                    }
                };
                (letter, submitted)
            }
            None => {
                // Fail-soft: no record without a generated document.
                match self
                    .assistant
                    .write_cover_letter(&user.full_name, &posting, None)
                    .await
                {
                    Ok(letter) => (letter, false),
                    Err(e) => {
                        debug!("posting {}: letter generation failed, skipping: {e}", posting.id);
                        return Ok(());
                    }
                }
            }
        };

        let mut state = state.lock().await;
        if state.dedup.contains(&posting) {
            return Ok(());
        }
        if state.records.len() >= quota {
            return Ok(());
        }
        state.dedup.insert_posting(&posting);
        state
            .records
            .push(NewApplication::from_posting(user.id, &posting, cover_letter, auto_submitted));
        Ok(())
    }
}
