use anyhow::{Context, Result};
use chrono_tz::Tz;

/// Worker configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub anthropic_api_key: String,
    pub board_api_url: String,
    pub board_token_url: String,
    pub board_client_id: String,
    pub board_client_secret: String,
    /// Region code every posting search is scoped to.
    pub search_area: String,
    /// Cron expressions, one batch trigger each.
    pub schedules: Vec<String>,
    /// Timezone the cron expressions are evaluated in.
    pub timezone: Tz,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            board_api_url: require_env("BOARD_API_URL")?,
            board_token_url: require_env("BOARD_TOKEN_URL")?,
            board_client_id: require_env("BOARD_CLIENT_ID")?,
            board_client_secret: require_env("BOARD_CLIENT_SECRET")?,
            search_area: require_env("SEARCH_AREA")?,
            schedules: parse_schedules(&require_env("BATCH_SCHEDULES")?),
            timezone: std::env::var("BATCH_TIMEZONE")
                .unwrap_or_else(|_| "UTC".to_string())
                .parse::<Tz>()
                .map_err(|e| anyhow::anyhow!("BATCH_TIMEZONE is not a valid IANA timezone: {e}"))?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Splits `BATCH_SCHEDULES` into individual cron expressions.
fn parse_schedules(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
