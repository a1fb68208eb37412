//! Posting dedup for one criterion run.
//!
//! A posting is "already handled" when any of its keys matches: the board
//! posting id, the (title, employer) pair, or the title alone. The index is
//! seeded from the user's persisted applications and grows as the run
//! accumulates new records, so a posting is never evaluated twice within a
//! run and never re-applied across runs.

use std::collections::HashSet;

use crate::models::posting::Posting;
use crate::store::AppliedKey;

#[derive(Debug, Default)]
pub struct DedupIndex {
    posting_ids: HashSet<String>,
    title_employer: HashSet<(String, String)>,
    titles: HashSet<String>,
}

impl DedupIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the index with one persisted application.
    pub fn insert_key(&mut self, key: &AppliedKey) {
        self.insert(&key.posting_id, &key.title, &key.employer);
    }

    /// Records a posting the run has just accumulated.
    pub fn insert_posting(&mut self, posting: &Posting) {
        self.insert(&posting.id, &posting.title, &posting.employer);
    }

    fn insert(&mut self, posting_id: &str, title: &str, employer: &str) {
        self.posting_ids.insert(posting_id.to_string());
        self.title_employer
            .insert((normalize(title), normalize(employer)));
        self.titles.insert(normalize(title));
    }

    /// Whether the posting matches any known key.
    pub fn contains(&self, posting: &Posting) -> bool {
        let title = normalize(&posting.title);
        self.posting_ids.contains(&posting.id)
            || self
                .title_employer
                .contains(&(title.clone(), normalize(&posting.employer)))
            || self.titles.contains(&title)
    }
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}
