//! In-memory collaborators for pipeline tests: a scripted job board, a
//! scripted assistant and a vec-backed store, plus fixture builders.

use std::ops::Deref;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::board::{ApplyRequest, BoardError, JobBoard, SearchQuery};
use crate::llm::assistant::{Assistant, RankCandidate};
use crate::llm::LlmError;
use crate::models::application::NewApplication;
use crate::models::posting::{Posting, PostingDetail, PostingPage, Resume};
use crate::models::user::{SearchCriterion, TokenPair, User, CRITERION_ACTIVE};
use crate::pipeline::Pipeline;
use crate::store::{AppliedKey, ApplicationStore};

fn board_error(message: &str) -> BoardError {
    BoardError::Api {
        status: 500,
        message: message.to_string(),
    }
}

/// Job board scripted with fixed result pages. Counts calls so tests can
/// assert how far the pipeline got.
pub struct MockBoard {
    pages: Vec<Vec<Posting>>,
    pub resumes: Vec<Resume>,
    pub fail_apply: bool,
    pub fail_resumes: bool,
    /// `Some` makes `refresh_token` succeed with this pair, `None` makes it fail.
    pub refresh_result: Option<TokenPair>,
    pub search_calls: AtomicUsize,
    pub apply_calls: AtomicUsize,
    pub last_apply_token: Mutex<Option<String>>,
}

impl MockBoard {
    pub fn with_pages(pages: Vec<Vec<Posting>>) -> Self {
        Self {
            pages,
            resumes: vec![
                resume("r-recent", Duration::days(1)),
                resume("r-stale", Duration::days(90)),
            ],
            fail_apply: false,
            fail_resumes: false,
            refresh_result: None,
            search_calls: AtomicUsize::new(0),
            apply_calls: AtomicUsize::new(0),
            last_apply_token: Mutex::new(None),
        }
    }
}

#[async_trait]
impl JobBoard for MockBoard {
    async fn search(&self, query: &SearchQuery) -> Result<PostingPage, BoardError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        let items = self
            .pages
            .get((query.page - 1) as usize)
            .cloned()
            .unwrap_or_default();
        let found = self.pages.iter().map(|p| p.len() as u64).sum();
        Ok(PostingPage { items, found })
    }

    async fn posting_detail(&self, posting_id: &str) -> Result<PostingDetail, BoardError> {
        let posting = self
            .pages
            .iter()
            .flatten()
            .find(|p| p.id == posting_id)
            .cloned()
            .ok_or_else(|| board_error("unknown posting"))?;
        Ok(PostingDetail {
            posting,
            key_skills: vec!["Rust".to_string()],
            employment: Some("full-time".to_string()),
            schedule: None,
        })
    }

    async fn resumes(&self, _access_token: &str) -> Result<Vec<Resume>, BoardError> {
        if self.fail_resumes {
            return Err(board_error("resume list unavailable"));
        }
        Ok(self.resumes.clone())
    }

    async fn submit_application(
        &self,
        _request: &ApplyRequest,
        access_token: &str,
    ) -> Result<(), BoardError> {
        self.apply_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_apply_token.lock().unwrap() = Some(access_token.to_string());
        if self.fail_apply {
            return Err(board_error("submission rejected"));
        }
        Ok(())
    }

    async fn refresh_token(&self, _refresh_token: &str) -> Result<TokenPair, BoardError> {
        self.refresh_result
            .clone()
            .ok_or_else(|| board_error("refresh rejected"))
    }
}

/// How the scripted assistant answers relevance checks.
#[derive(Debug, Clone, Copy)]
pub enum Verdict {
    Relevant,
    Irrelevant,
    Fails,
}

pub struct MockAssistant {
    pub verdict: Verdict,
    /// `None` makes cover-letter generation fail.
    pub letter: Option<String>,
    pub term_fails: bool,
    pub rank_fails: bool,
    /// Resume id the ranking step names; `None` leaves the caller to its fallback.
    pub ranked_id: Option<String>,
    pub term_calls: AtomicUsize,
    pub judge_calls: AtomicUsize,
}

impl MockAssistant {
    pub fn relevant() -> Self {
        Self::with_verdict(Verdict::Relevant)
    }

    pub fn with_verdict(verdict: Verdict) -> Self {
        Self {
            verdict,
            letter: Some("Dear hiring team, I would like to apply.".to_string()),
            term_fails: false,
            rank_fails: false,
            ranked_id: None,
            term_calls: AtomicUsize::new(0),
            judge_calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Assistant for MockAssistant {
    async fn normalize_term(&self, criterion_text: &str) -> Result<String, LlmError> {
        self.term_calls.fetch_add(1, Ordering::SeqCst);
        if self.term_fails {
            return Err(LlmError::EmptyContent);
        }
        Ok(criterion_text.trim().to_lowercase())
    }

    async fn judge_relevance(
        &self,
        _search_term: &str,
        _criterion_text: &str,
        _posting: &Posting,
    ) -> Result<bool, LlmError> {
        self.judge_calls.fetch_add(1, Ordering::SeqCst);
        match self.verdict {
            Verdict::Relevant => Ok(true),
            Verdict::Irrelevant => Ok(false),
            Verdict::Fails => Err(LlmError::EmptyContent),
        }
    }

    async fn write_cover_letter(
        &self,
        _full_name: &str,
        _posting: &Posting,
        _background: Option<&str>,
    ) -> Result<String, LlmError> {
        self.letter.clone().ok_or(LlmError::EmptyContent)
    }

    async fn rank_resumes(
        &self,
        _detail: &PostingDetail,
        _candidates: &[RankCandidate],
    ) -> Result<Option<String>, LlmError> {
        if self.rank_fails {
            return Err(LlmError::EmptyContent);
        }
        Ok(self.ranked_id.clone())
    }
}

/// Vec-backed store. `insert_application` mirrors the database uniqueness
/// behavior: a repeated (user, posting) pair reports a duplicate skip.
#[derive(Default)]
pub struct MemStore {
    pub users: Vec<User>,
    pub applied: Vec<AppliedKey>,
    /// Records whose title is listed here fail to insert.
    pub fail_inserts_for_titles: Vec<String>,
    pub inserted: Mutex<Vec<NewApplication>>,
    pub credential_updates: Mutex<Vec<(Uuid, TokenPair)>>,
}

#[async_trait]
impl ApplicationStore for MemStore {
    async fn load_users(&self) -> Result<Vec<User>> {
        Ok(self.users.clone())
    }

    async fn update_credentials(&self, user_id: Uuid, tokens: &TokenPair) -> Result<()> {
        self.credential_updates
            .lock()
            .unwrap()
            .push((user_id, tokens.clone()));
        Ok(())
    }

    async fn applied_keys(&self, user_id: Uuid) -> Result<Vec<AppliedKey>> {
        let mut keys = self.applied.clone();
        keys.extend(
            self.inserted
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.user_id == user_id)
                .map(|r| AppliedKey {
                    posting_id: r.posting_id.clone(),
                    title: r.title.clone(),
                    employer: r.employer.clone(),
                }),
        );
        Ok(keys)
    }

    async fn insert_application(&self, record: &NewApplication) -> Result<bool> {
        if self.fail_inserts_for_titles.contains(&record.title) {
            return Err(anyhow!("insert rejected for '{}'", record.title));
        }
        let mut inserted = self.inserted.lock().unwrap();
        let duplicate = inserted
            .iter()
            .any(|r| r.user_id == record.user_id && r.posting_id == record.posting_id);
        if duplicate {
            return Ok(false);
        }
        inserted.push(record.clone());
        Ok(true)
    }
}

/// A pipeline wired to the mocks, keeping typed handles so tests can inspect
/// them after the run. Derefs to the pipeline itself.
pub struct TestPipeline {
    pipeline: Pipeline,
    board: Arc<MockBoard>,
    assistant: Arc<MockAssistant>,
    store: Arc<MemStore>,
}

impl TestPipeline {
    pub fn mock_board(&self) -> &MockBoard {
        &self.board
    }

    pub fn mock_assistant(&self) -> &MockAssistant {
        &self.assistant
    }

    pub fn mem_store(&self) -> &MemStore {
        &self.store
    }
}

impl Deref for TestPipeline {
    type Target = Pipeline;

    fn deref(&self) -> &Pipeline {
        &self.pipeline
    }
}

pub fn pipeline_with(board: MockBoard, assistant: MockAssistant, store: MemStore) -> TestPipeline {
    let board = Arc::new(board);
    let assistant = Arc::new(assistant);
    let store = Arc::new(store);
    TestPipeline {
        pipeline: Pipeline::new(
            board.clone(),
            assistant.clone(),
            store.clone(),
            "113".to_string(),
        ),
        board,
        assistant,
        store,
    }
}

pub fn posting(id: &str, title: &str, employer: &str) -> Posting {
    Posting {
        id: id.to_string(),
        title: title.to_string(),
        employer: employer.to_string(),
        salary: None,
        logo_url: None,
        requirement: Some("Ship reliable services".to_string()),
        responsibility: None,
        address: None,
        url: format!("https://board.example/postings/{id}"),
        published_at: None,
    }
}

pub fn record(user_id: Uuid, id: &str, title: &str, employer: &str) -> NewApplication {
    NewApplication::from_posting(
        user_id,
        &posting(id, title, employer),
        "Dear team".to_string(),
        false,
    )
}

fn resume(id: &str, age: Duration) -> Resume {
    Resume {
        id: id.to_string(),
        title: "Backend Engineer".to_string(),
        updated_at: Some(Utc::now() - age),
        skill_set: vec!["Rust".to_string()],
        experience: vec![],
    }
}

fn user_with(active_criteria: usize, board_linked: bool, credentials: Option<TokenPair>) -> User {
    let id = Uuid::new_v4();
    User {
        id,
        full_name: "Alex Example".to_string(),
        require_salary: false,
        board_linked,
        credentials,
        criteria: (0..active_criteria)
            .map(|i| SearchCriterion {
                id: Uuid::new_v4(),
                user_id: id,
                text: format!("Senior Rust engineer {i}"),
                status: CRITERION_ACTIVE.to_string(),
            })
            .collect(),
    }
}

pub fn unlinked_user(active_criteria: usize) -> User {
    user_with(active_criteria, false, None)
}

pub fn linked_user(active_criteria: usize) -> User {
    user_with(
        active_criteria,
        true,
        Some(TokenPair {
            access_token: "stored-access".to_string(),
            refresh_token: "stored-refresh".to_string(),
            expires_at: Some(Utc::now() + Duration::hours(1)),
        }),
    )
}

pub fn criterion_for(user: &User) -> SearchCriterion {
    user.criteria[0].clone()
}
