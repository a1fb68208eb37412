//! Assistant — the model-backed judgment seam used by the pipeline.
//!
//! The pipeline never builds prompts or parses replies itself; it sees only
//! this trait. `LlmAssistant` is the production implementation on top of
//! `LlmClient`; tests substitute an in-memory mock.

use async_trait::async_trait;

use crate::llm::extract;
use crate::llm::prompts;
use crate::llm::{LlmClient, LlmError};
use crate::models::posting::{Posting, PostingDetail};

/// One resume offered to the ranking step: its board id plus rendered text.
#[derive(Debug, Clone)]
pub struct RankCandidate {
    pub id: String,
    pub text: String,
}

#[async_trait]
pub trait Assistant: Send + Sync {
    /// Derives the normalized search term from a criterion's free text by
    /// stripping seniority/salary qualifiers. Failure aborts the criterion run.
    async fn normalize_term(&self, criterion_text: &str) -> Result<String, LlmError>;

    /// Suitability verdict for one posting. Callers treat `Err` as "not
    /// suitable" (fail-closed).
    async fn judge_relevance(
        &self,
        search_term: &str,
        criterion_text: &str,
        posting: &Posting,
    ) -> Result<bool, LlmError>;

    /// Produces a tailored cover letter, optionally grounded in the selected
    /// resume's text. Callers treat `Err` as "skip this posting" (fail-soft).
    async fn write_cover_letter(
        &self,
        full_name: &str,
        posting: &Posting,
        background: Option<&str>,
    ) -> Result<String, LlmError>;

    /// Picks the best resume id for a posting. `Ok(None)` means the reply
    /// named no candidate; the caller falls back deterministically.
    async fn rank_resumes(
        &self,
        detail: &PostingDetail,
        candidates: &[RankCandidate],
    ) -> Result<Option<String>, LlmError>;
}

/// Production assistant backed by the shared `LlmClient`.
pub struct LlmAssistant {
    llm: LlmClient,
}

impl LlmAssistant {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl Assistant for LlmAssistant {
    async fn normalize_term(&self, criterion_text: &str) -> Result<String, LlmError> {
        let prompt = prompts::TERM_PROMPT_TEMPLATE.replace("{criterion_text}", criterion_text);
        let reply = self.llm.call_text(&prompt, prompts::TERM_SYSTEM).await?;
        extract::first_line(&reply).ok_or(LlmError::FragmentAbsent("search term"))
    }

    async fn judge_relevance(
        &self,
        search_term: &str,
        criterion_text: &str,
        posting: &Posting,
    ) -> Result<bool, LlmError> {
        let prompt = prompts::RELEVANCE_PROMPT_TEMPLATE
            .replace("{search_term}", search_term)
            .replace("{criterion_text}", criterion_text)
            .replace("{posting_title}", &posting.title)
            .replace("{posting_summary}", &posting.summary());
        let reply = self.llm.call_text(&prompt, prompts::RELEVANCE_SYSTEM).await?;
        extract::first_bool(&reply).ok_or(LlmError::FragmentAbsent("boolean verdict"))
    }

    async fn write_cover_letter(
        &self,
        full_name: &str,
        posting: &Posting,
        background: Option<&str>,
    ) -> Result<String, LlmError> {
        let prompt = prompts::LETTER_PROMPT_TEMPLATE
            .replace("{full_name}", full_name)
            .replace("{posting_title}", &posting.title)
            .replace("{employer}", &posting.employer)
            .replace("{posting_summary}", &posting.summary())
            .replace("{background}", background.unwrap_or("(no resume on file)"));
        self.llm.call_text(&prompt, prompts::LETTER_SYSTEM).await
    }

    async fn rank_resumes(
        &self,
        detail: &PostingDetail,
        candidates: &[RankCandidate],
    ) -> Result<Option<String>, LlmError> {
        let resumes = candidates
            .iter()
            .map(|c| format!("id: {}\n{}", c.id, c.text))
            .collect::<Vec<_>>()
            .join("\n\n");
        let salary_band = detail
            .posting
            .salary
            .as_ref()
            .map(|s| {
                format!(
                    "{} - {} {}",
                    s.from.map_or("?".to_string(), |v| v.to_string()),
                    s.to.map_or("?".to_string(), |v| v.to_string()),
                    s.currency.as_deref().unwrap_or("")
                )
            })
            .unwrap_or_else(|| "not disclosed".to_string());

        let prompt = prompts::RESUME_RANK_PROMPT_TEMPLATE
            .replace("{posting_title}", &detail.posting.title)
            .replace("{location}", detail.posting.address.as_deref().unwrap_or("unknown"))
            .replace("{salary_band}", &salary_band)
            .replace("{employment}", detail.employment.as_deref().unwrap_or("unknown"))
            .replace("{schedule}", detail.schedule.as_deref().unwrap_or("unknown"))
            .replace("{key_skills}", &detail.key_skills.join(", "))
            .replace("{resumes}", &resumes);

        let reply = self.llm.call_text(&prompt, prompts::RESUME_RANK_SYSTEM).await?;
        let ids: Vec<&str> = candidates.iter().map(|c| c.id.as_str()).collect();
        Ok(extract::find_candidate_id(&reply, &ids))
    }
}
