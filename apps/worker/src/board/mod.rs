//! Job-board adapter — search, posting detail, resume list, application
//! submission and OAuth token refresh.
//!
//! The pipeline depends on the `JobBoard` trait only; `HttpJobBoard` is the
//! production implementation. All methods are stateless single calls — the
//! caller decides what a failure means at each call site.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

pub mod models;

use crate::board::models::{
    PostingDetailWire, ResumeListWire, SearchResponseWire, TokenResponseWire,
};
use crate::models::posting::{PostingDetail, PostingPage, Resume};
use crate::models::user::TokenPair;

/// Postings per search page requested from the board.
const PAGE_SIZE: u32 = 20;
/// How many of the user's resumes the selection step considers.
const RESUME_FETCH_LIMIT: u32 = 4;

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("board API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

/// One page request against the board's search endpoint.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub text: String,
    /// 1-based page number.
    pub page: u32,
    /// Region code the search is scoped to.
    pub area: String,
    pub only_with_salary: bool,
    /// Recency window: only postings published within the last N days.
    pub period_days: u32,
}

/// An application submission through the user's linked account.
#[derive(Debug, Clone)]
pub struct ApplyRequest {
    pub posting_id: String,
    pub resume_id: String,
    pub message: Option<String>,
}

#[async_trait]
pub trait JobBoard: Send + Sync {
    /// Fetches one page of postings, newest first.
    async fn search(&self, query: &SearchQuery) -> Result<PostingPage, BoardError>;

    /// Fetches the full posting record (key skills, employment, schedule).
    async fn posting_detail(&self, posting_id: &str) -> Result<PostingDetail, BoardError>;

    /// Lists the user's resumes, most recently updated first.
    async fn resumes(&self, access_token: &str) -> Result<Vec<Resume>, BoardError>;

    /// Submits an application. The caller swallows failures (best-effort).
    async fn submit_application(
        &self,
        request: &ApplyRequest,
        access_token: &str,
    ) -> Result<(), BoardError>;

    /// Exchanges a refresh token for a new token pair.
    async fn refresh_token(&self, refresh_token: &str) -> Result<TokenPair, BoardError>;
}

/// Production board client over the public HTTP API.
pub struct HttpJobBoard {
    http: Client,
    api_url: String,
    token_url: String,
    client_id: String,
    client_secret: String,
}

impl HttpJobBoard {
    pub fn new(api_url: String, token_url: String, client_id: String, client_secret: String) -> Self {
        Self {
            http: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .user_agent(concat!("autoapply-worker/", env!("CARGO_PKG_VERSION")))
                .build()
                .expect("Failed to build HTTP client"),
            api_url,
            token_url,
            client_id,
            client_secret,
        }
    }

    /// Converts a response into `T`, mapping non-2xx statuses to `BoardError::Api`.
    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, BoardError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BoardError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl JobBoard for HttpJobBoard {
    async fn search(&self, query: &SearchQuery) -> Result<PostingPage, BoardError> {
        let response = self
            .http
            .get(format!("{}/postings", self.api_url))
            .query(&[
                ("text", query.text.as_str()),
                ("area", query.area.as_str()),
                ("order_by", "publication_time"),
            ])
            .query(&[("page", query.page), ("per_page", PAGE_SIZE), ("period", query.period_days)])
            .query(&[("only_with_salary", query.only_with_salary)])
            .send()
            .await?;

        let wire: SearchResponseWire = Self::read_json(response).await?;
        debug!(
            "search page {} for '{}': {} items ({} found)",
            query.page,
            query.text,
            wire.items.len(),
            wire.found
        );
        Ok(PostingPage {
            items: wire.items.into_iter().map(Into::into).collect(),
            found: wire.found,
        })
    }

    async fn posting_detail(&self, posting_id: &str) -> Result<PostingDetail, BoardError> {
        let response = self
            .http
            .get(format!("{}/postings/{}", self.api_url, posting_id))
            .send()
            .await?;
        let wire: PostingDetailWire = Self::read_json(response).await?;
        Ok(wire.into())
    }

    async fn resumes(&self, access_token: &str) -> Result<Vec<Resume>, BoardError> {
        let response = self
            .http
            .get(format!("{}/resumes/mine", self.api_url))
            .query(&[("per_page", RESUME_FETCH_LIMIT)])
            .bearer_auth(access_token)
            .send()
            .await?;
        let wire: ResumeListWire = Self::read_json(response).await?;
        Ok(wire.items.into_iter().map(Into::into).collect())
    }

    async fn submit_application(
        &self,
        request: &ApplyRequest,
        access_token: &str,
    ) -> Result<(), BoardError> {
        let mut form = vec![
            ("posting_id", request.posting_id.as_str()),
            ("resume_id", request.resume_id.as_str()),
        ];
        if let Some(message) = request.message.as_deref() {
            form.push(("message", message));
        }

        let response = self
            .http
            .post(format!("{}/applications", self.api_url))
            .bearer_auth(access_token)
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BoardError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(())
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<TokenPair, BoardError> {
        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ])
            .send()
            .await?;
        let wire: TokenResponseWire = Self::read_json(response).await?;
        Ok(wire.into())
    }
}
