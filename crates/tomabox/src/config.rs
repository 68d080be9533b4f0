//! Run configuration.
//!
//! Built once at startup and shared by reference with the minter, the
//! API client, and the campaign runner.

use std::path::PathBuf;
use std::time::Duration;

use rand::seq::SliceRandom;

use crate::error::{BotError, Result};

/// Default API root for the mini-app backend.
pub const DEFAULT_BASE_URL: &str = "https://api-web.tomarket.ai/tomarket-game/v1";

/// Default identity source file name.
pub const DEFAULT_QUERY_FILE: &str = "queries.txt";

const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:125.0) Gecko/20100101 Firefox/125.0",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_4 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Mobile/15E148 Safari/604.1",
    "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Mobile Safari/537.36",
];

/// Immutable configuration for one run.
#[derive(Debug, Clone)]
pub struct Config {
    pub referral_code: String,
    pub base_url: String,
    pub work_dir: PathBuf,
    pub query_file: String,
    pub request_timeout: Duration,
    /// Courtesy delay applied before every individual login call.
    pub mint_delay: Duration,
    pub record_pause: Duration,
    pub pass_pause: Duration,
    pub user_agent: String,
}

impl Config {
    /// Create a configuration with default timings rooted at `work_dir`.
    ///
    /// # Errors
    ///
    /// Returns `BotError::Config` if `referral_code` is blank.
    pub fn new(referral_code: impl Into<String>, work_dir: impl Into<PathBuf>) -> Result<Self> {
        let referral_code = referral_code.into().trim().to_string();
        if referral_code.is_empty() {
            return Err(BotError::Config(
                "Referral Code Is Not Set. Please Provide REFF_CODE".to_string(),
            ));
        }

        Ok(Self {
            referral_code,
            base_url: DEFAULT_BASE_URL.to_string(),
            work_dir: work_dir.into(),
            query_file: DEFAULT_QUERY_FILE.to_string(),
            request_timeout: Duration::from_secs(20),
            mint_delay: Duration::from_secs(3),
            record_pause: Duration::from_secs(1),
            pass_pause: Duration::from_secs(3),
            user_agent: random_user_agent(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_query_file(mut self, query_file: impl Into<String>) -> Self {
        self.query_file = query_file.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Override every pause at once. Tests use `Duration::ZERO`.
    pub fn with_delays(mut self, mint: Duration, record: Duration, pass: Duration) -> Self {
        self.mint_delay = mint;
        self.record_pause = record;
        self.pass_pause = pass;
        self
    }

    /// Full path of the identity source file.
    pub fn query_path(&self) -> PathBuf {
        self.work_dir.join(&self.query_file)
    }
}

fn random_user_agent() -> String {
    USER_AGENTS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(USER_AGENTS[0])
        .to_string()
}
