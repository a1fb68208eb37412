use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Salary range as disclosed by the employer. Any bound may be absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Salary {
    pub from: Option<i64>,
    pub to: Option<i64>,
    pub currency: Option<String>,
}

/// One externally sourced job posting, valid for a single batch run.
///
/// Never persisted verbatim — only projected into a `NewApplication`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Posting {
    pub id: String,
    pub title: String,
    pub employer: String,
    pub salary: Option<Salary>,
    pub logo_url: Option<String>,
    /// Requirements snippet from the search result.
    pub requirement: Option<String>,
    /// Responsibilities snippet from the search result.
    pub responsibility: Option<String>,
    pub address: Option<String>,
    pub url: String,
    pub published_at: Option<DateTime<Utc>>,
}

impl Posting {
    /// Combined requirements/responsibilities text used for relevance checks
    /// and cover-letter grounding.
    pub fn summary(&self) -> String {
        match (self.requirement.as_deref(), self.responsibility.as_deref()) {
            (Some(req), Some(resp)) => format!("{req}\n{resp}"),
            (Some(req), None) => req.to_string(),
            (None, Some(resp)) => resp.to_string(),
            (None, None) => String::new(),
        }
    }
}

/// One page of search results.
#[derive(Debug, Clone)]
pub struct PostingPage {
    pub items: Vec<Posting>,
    pub found: u64,
}

/// Full posting record fetched individually — richer than the search item,
/// used as ranking context for resume selection.
#[derive(Debug, Clone)]
pub struct PostingDetail {
    pub posting: Posting,
    pub key_skills: Vec<String>,
    pub employment: Option<String>,
    pub schedule: Option<String>,
}

/// One of the user's resumes on the linked board account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resume {
    pub id: String,
    pub title: String,
    pub updated_at: Option<DateTime<Utc>>,
    pub skill_set: Vec<String>,
    pub experience: Vec<ExperienceEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub position: String,
    pub company: Option<String>,
    pub description: Option<String>,
}
