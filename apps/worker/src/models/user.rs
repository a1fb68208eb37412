use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Criterion status value that makes a search criterion eligible for a batch run.
pub const CRITERION_ACTIVE: &str = "active";

/// OAuth token pair stored per user for the linked job-board account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: Option<DateTime<Utc>>,
}

/// One user-defined job-search intent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchCriterion {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Free-text search intent, e.g. "Senior Rust backend engineer 200k+".
    pub text: String,
    /// "active" criteria are processed; anything else is skipped.
    pub status: String,
}

impl SearchCriterion {
    pub fn is_active(&self) -> bool {
        self.status == CRITERION_ACTIVE
    }
}

/// Read-only snapshot of a user, loaded once at batch start.
///
/// The store owns the canonical record; the batch only ever writes back the
/// credential fields (after a successful token refresh).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub full_name: String,
    /// When set, searches are constrained to postings with a disclosed salary.
    pub require_salary: bool,
    /// Whether the user linked an external job-board account. Drives the
    /// resume-selection + auto-submission subflow.
    pub board_linked: bool,
    pub credentials: Option<TokenPair>,
    pub criteria: Vec<SearchCriterion>,
}

impl User {
    /// Number of active criteria — the input to the quota policy.
    pub fn active_criteria_count(&self) -> usize {
        self.criteria.iter().filter(|c| c.is_active()).count()
    }

    pub fn active_criteria(&self) -> impl Iterator<Item = &SearchCriterion> {
        self.criteria.iter().filter(|c| c.is_active())
    }
}
