use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::posting::Posting;

/// The persisted outcome of a posting that passed relevance filtering and
/// document generation. Created at most once per (user, posting); never
/// updated or deleted by the batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewApplication {
    pub user_id: Uuid,
    pub posting_id: String,
    pub title: String,
    pub employer: String,
    pub salary_from: Option<i64>,
    pub salary_to: Option<i64>,
    pub currency: Option<String>,
    pub logo_url: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub url: String,
    pub cover_letter: String,
    /// True when the application was submitted through the user's linked
    /// board account (as opposed to recorded for manual follow-up).
    pub auto_submitted: bool,
}

impl NewApplication {
    /// Projects a posting into a record owned by `user_id`.
    pub fn from_posting(user_id: Uuid, posting: &Posting, cover_letter: String, auto_submitted: bool) -> Self {
        let summary = posting.summary();
        Self {
            user_id,
            posting_id: posting.id.clone(),
            title: posting.title.clone(),
            employer: posting.employer.clone(),
            salary_from: posting.salary.as_ref().and_then(|s| s.from),
            salary_to: posting.salary.as_ref().and_then(|s| s.to),
            currency: posting.salary.as_ref().and_then(|s| s.currency.clone()),
            logo_url: posting.logo_url.clone(),
            description: if summary.is_empty() { None } else { Some(summary) },
            address: posting.address.clone(),
            url: posting.url.clone(),
            cover_letter,
            auto_submitted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::posting::Salary;

    #[test]
    fn test_from_posting_denormalizes_fields() {
        let posting = Posting {
            id: "42".to_string(),
            title: "Platform Engineer".to_string(),
            employer: "Initech".to_string(),
            salary: Some(Salary {
                from: Some(140_000),
                to: Some(180_000),
                currency: Some("USD".to_string()),
            }),
            logo_url: Some("https://cdn.example/logo.png".to_string()),
            requirement: Some("Rust".to_string()),
            responsibility: None,
            address: Some("Remote".to_string()),
            url: "https://board.example/postings/42".to_string(),
            published_at: None,
        };
        let user_id = Uuid::new_v4();

        let record = NewApplication::from_posting(user_id, &posting, "Dear team".to_string(), true);

        assert_eq!(record.user_id, user_id);
        assert_eq!(record.posting_id, "42");
        assert_eq!(record.employer, "Initech");
        assert_eq!(record.salary_from, Some(140_000));
        assert_eq!(record.currency.as_deref(), Some("USD"));
        assert_eq!(record.description.as_deref(), Some("Rust"));
        assert!(record.auto_submitted);
    }

    #[test]
    fn test_from_posting_empty_summary_maps_to_none() {
        let posting = Posting {
            id: "1".to_string(),
            title: "t".to_string(),
            employer: "e".to_string(),
            salary: None,
            logo_url: None,
            requirement: None,
            responsibility: None,
            address: None,
            url: "u".to_string(),
            published_at: None,
        };
        let record = NewApplication::from_posting(Uuid::new_v4(), &posting, "letter".to_string(), false);
        assert!(record.description.is_none());
        assert!(record.salary_from.is_none());
    }
}
