//! Wire types for the job-board API, converted into domain models at the
//! adapter boundary so the pipeline never sees transport shapes.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use crate::models::posting::{ExperienceEntry, Posting, PostingDetail, Resume, Salary};
use crate::models::user::TokenPair;

#[derive(Debug, Deserialize)]
pub struct SearchResponseWire {
    pub items: Vec<PostingWire>,
    #[serde(default)]
    pub found: u64,
}

#[derive(Debug, Deserialize)]
pub struct PostingWire {
    pub id: String,
    pub title: String,
    pub employer: EmployerWire,
    pub salary: Option<SalaryWire>,
    pub snippet: Option<SnippetWire>,
    pub address: Option<String>,
    pub url: String,
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct EmployerWire {
    pub name: String,
    pub logo_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SalaryWire {
    pub from: Option<i64>,
    pub to: Option<i64>,
    pub currency: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SnippetWire {
    pub requirement: Option<String>,
    pub responsibility: Option<String>,
}

impl From<PostingWire> for Posting {
    fn from(wire: PostingWire) -> Self {
        Posting {
            id: wire.id,
            title: wire.title,
            employer: wire.employer.name,
            salary: wire.salary.map(|s| Salary {
                from: s.from,
                to: s.to,
                currency: s.currency,
            }),
            logo_url: wire.employer.logo_url,
            requirement: wire.snippet.as_ref().and_then(|s| s.requirement.clone()),
            responsibility: wire.snippet.and_then(|s| s.responsibility),
            address: wire.address,
            url: wire.url,
            published_at: wire.published_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PostingDetailWire {
    #[serde(flatten)]
    pub posting: PostingWire,
    #[serde(default)]
    pub key_skills: Vec<String>,
    pub employment: Option<String>,
    pub schedule: Option<String>,
}

impl From<PostingDetailWire> for PostingDetail {
    fn from(wire: PostingDetailWire) -> Self {
        PostingDetail {
            posting: wire.posting.into(),
            key_skills: wire.key_skills,
            employment: wire.employment,
            schedule: wire.schedule,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ResumeListWire {
    pub items: Vec<ResumeWire>,
}

#[derive(Debug, Deserialize)]
pub struct ResumeWire {
    pub id: String,
    pub title: String,
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub skill_set: Vec<String>,
    #[serde(default)]
    pub experience: Vec<ExperienceWire>,
}

#[derive(Debug, Deserialize)]
pub struct ExperienceWire {
    pub position: String,
    pub company: Option<String>,
    pub description: Option<String>,
}

impl From<ResumeWire> for Resume {
    fn from(wire: ResumeWire) -> Self {
        Resume {
            id: wire.id,
            title: wire.title,
            updated_at: wire.updated_at,
            skill_set: wire.skill_set,
            experience: wire
                .experience
                .into_iter()
                .map(|e| ExperienceEntry {
                    position: e.position,
                    company: e.company,
                    description: e.description,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TokenResponseWire {
    pub access_token: String,
    pub refresh_token: String,
    /// Lifetime of the access token in seconds.
    pub expires_in: Option<i64>,
}

impl From<TokenResponseWire> for TokenPair {
    fn from(wire: TokenResponseWire) -> Self {
        TokenPair {
            access_token: wire.access_token,
            refresh_token: wire.refresh_token,
            expires_at: wire.expires_in.map(|secs| Utc::now() + Duration::seconds(secs)),
        }
    }
}
