//! Resume selection for the linked-account submission subflow.
//!
//! Fetches the user's most recent resumes (top 4), renders each into plain
//! text, and asks the assistant to pick the best match for the posting. An
//! unparsable or failed ranking falls back deterministically to the most
//! recently updated resume; a transport failure surfaces to the caller, which
//! skips the posting.

use tracing::warn;

use crate::board::{BoardError, JobBoard};
use crate::llm::assistant::{Assistant, RankCandidate};
use crate::models::posting::Resume;

/// How many of the user's resumes the ranking step considers.
const CANDIDATE_LIMIT: usize = 4;

/// The resume chosen for one posting: its board id plus rendered text, used
/// both for ranking context and as cover-letter grounding.
#[derive(Debug, Clone)]
pub(crate) struct SelectedResume {
    pub id: String,
    pub text: String,
}

/// Picks a resume for `posting_id`. `Ok(None)` means the user has no resumes.
pub(crate) async fn select_resume(
    board: &dyn JobBoard,
    assistant: &dyn Assistant,
    access_token: &str,
    posting_id: &str,
) -> Result<Option<SelectedResume>, BoardError> {
    let mut resumes = board.resumes(access_token).await?;
    // Most recently updated first; also the deterministic fallback order.
    resumes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    resumes.truncate(CANDIDATE_LIMIT);
    if resumes.is_empty() {
        return Ok(None);
    }

    let detail = board.posting_detail(posting_id).await?;

    let mut candidates: Vec<RankCandidate> = resumes
        .iter()
        .map(|r| RankCandidate {
            id: r.id.clone(),
            text: render_resume(r),
        })
        .collect();

    let ranked = match assistant.rank_resumes(&detail, &candidates).await {
        Ok(choice) => choice,
        Err(e) => {
            warn!("resume ranking failed for posting {posting_id}, falling back: {e}");
            None
        }
    };

    let chosen = match ranked.and_then(|id| candidates.iter().position(|c| c.id == id)) {
        Some(index) => candidates.swap_remove(index),
        // Fallback: the single most recently updated resume.
        None => candidates.swap_remove(0),
    };

    Ok(Some(SelectedResume {
        id: chosen.id,
        text: chosen.text,
    }))
}

/// Renders a structured resume into the plain text handed to the model.
pub(crate) fn render_resume(resume: &Resume) -> String {
    let mut text = resume.title.clone();
    if !resume.skill_set.is_empty() {
        text.push_str("\nSkills: ");
        text.push_str(&resume.skill_set.join(", "));
    }
    for entry in &resume.experience {
        text.push('\n');
        text.push_str(&entry.position);
        if let Some(company) = &entry.company {
            text.push_str(" at ");
            text.push_str(company);
        }
        if let Some(description) = &entry.description {
            text.push_str(": ");
            text.push_str(description);
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::posting::ExperienceEntry;
    use crate::pipeline::testing::{posting, MockAssistant, MockBoard};

    #[tokio::test]
    async fn test_unparsable_ranking_falls_back_to_most_recent_resume() {
        let mut board = MockBoard::with_pages(vec![vec![posting("1", "Rust Engineer", "Acme")]]);
        // Stale resume first: the fallback must pick by updated_at, not by
        // list order.
        board.resumes.reverse();
        let assistant = MockAssistant::relevant(); // names no candidate

        let selected = select_resume(&board, &assistant, "token", "1")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(selected.id, "r-recent");
    }

    #[tokio::test]
    async fn test_failed_ranking_falls_back_to_most_recent_resume() {
        let board = MockBoard::with_pages(vec![vec![posting("1", "Rust Engineer", "Acme")]]);
        let mut assistant = MockAssistant::relevant();
        assistant.rank_fails = true;

        let selected = select_resume(&board, &assistant, "token", "1")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(selected.id, "r-recent");
    }

    #[tokio::test]
    async fn test_ranked_resume_wins_over_fallback() {
        let board = MockBoard::with_pages(vec![vec![posting("1", "Rust Engineer", "Acme")]]);
        let mut assistant = MockAssistant::relevant();
        assistant.ranked_id = Some("r-stale".to_string());

        let selected = select_resume(&board, &assistant, "token", "1")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(selected.id, "r-stale");
    }

    #[tokio::test]
    async fn test_no_resumes_on_file_selects_nothing() {
        let mut board = MockBoard::with_pages(vec![vec![posting("1", "Rust Engineer", "Acme")]]);
        board.resumes = vec![];
        let assistant = MockAssistant::relevant();

        let selected = select_resume(&board, &assistant, "token", "1").await.unwrap();

        assert!(selected.is_none());
    }

    #[test]
    fn test_render_resume_includes_skills_and_experience() {
        let resume = Resume {
            id: "r1".to_string(),
            title: "Backend Engineer".to_string(),
            updated_at: None,
            skill_set: vec!["Rust".to_string(), "PostgreSQL".to_string()],
            experience: vec![ExperienceEntry {
                position: "Engineer".to_string(),
                company: Some("Acme".to_string()),
                description: Some("Built billing".to_string()),
            }],
        };
        let text = render_resume(&resume);
        assert!(text.starts_with("Backend Engineer"));
        assert!(text.contains("Skills: Rust, PostgreSQL"));
        assert!(text.contains("Engineer at Acme: Built billing"));
    }

    #[test]
    fn test_render_resume_title_only() {
        let resume = Resume {
            id: "r1".to_string(),
            title: "Data resume".to_string(),
            updated_at: None,
            skill_set: vec![],
            experience: vec![],
        };
        assert_eq!(render_resume(&resume), "Data resume");
    }
}
