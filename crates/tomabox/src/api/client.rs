//! reqwest-backed implementation of [`RemoteApi`].

use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::types::{
    parse_envelope, Envelope, InviteCodeRequest, LoginData, LoginRequest, TreasureBoxData,
    TreasureBoxReward,
};
use super::RemoteApi;
use crate::config::Config;
use crate::error::{BotError, Result};

const ORIGIN: &str = "https://mini-app.tomarket.ai";
const REFERER: &str = "https://mini-app.tomarket.ai/";

/// HTTP client for the mini-app backend.
///
/// One client is shared by every call of a run; it carries the browser-like
/// default headers and the per-request timeout from [`Config`].
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    referral_code: String,
}

impl ApiClient {
    /// Build a client from the run configuration.
    ///
    /// # Errors
    ///
    /// Returns `BotError::Config` if the user agent is not a valid header
    /// value or the TLS backend cannot be initialised.
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .default_headers(default_headers(&config.user_agent)?)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| BotError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            referral_code: config.referral_code.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// POST to `path` and parse the response envelope.
    ///
    /// Transport failures and non-2xx statuses become `BotError::Http`;
    /// unparseable bodies become `BotError::InvalidResponse`.
    async fn post<B, T>(&self, path: &str, token: Option<&str>, body: Option<&B>) -> Result<Envelope<T>>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let mut request = self
            .http
            .post(&url)
            .header(header::CONTENT_TYPE, "application/json");

        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, token);
        }
        request = match body {
            Some(body) => request.json(body),
            None => request.header(header::CONTENT_LENGTH, "0"),
        };

        log::debug!("POST {url}");
        let response = request.send().await?.error_for_status()?;
        let text = response.text().await?;
        parse_envelope(&text)
    }
}

#[async_trait]
impl RemoteApi for ApiClient {
    async fn login(&self, query: &str) -> Result<LoginData> {
        let body = LoginRequest {
            init_data: query,
            invite_code: &self.referral_code,
            from: "",
            is_bot: false,
        };
        self.post::<_, LoginData>("user/login", None, Some(&body))
            .await?
            .into_data()
    }

    async fn apply_invite_code(&self, token: &str) -> Result<()> {
        let body = InviteCodeRequest {
            invite_code: &self.referral_code,
        };
        self.post::<_, serde_json::Value>("user/inviteCode", Some(token), Some(&body))
            .await?
            .ensure_success()
    }

    async fn open_treasure_box(&self, token: &str) -> Result<TreasureBoxReward> {
        let data = self
            .post::<(), TreasureBoxData>("invite/openTreasureBox", Some(token), None)
            .await?
            .into_data()?;
        Ok(data.into())
    }
}

fn default_headers(user_agent: &str) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::ACCEPT,
        HeaderValue::from_static("application/json, text/plain, */*"),
    );
    headers.insert(
        header::ACCEPT_LANGUAGE,
        HeaderValue::from_static("en-GB,en-US;q=0.9,en;q=0.8"),
    );
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(header::ORIGIN, HeaderValue::from_static(ORIGIN));
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(header::REFERER, HeaderValue::from_static(REFERER));
    headers.insert("Sec-Fetch-Dest", HeaderValue::from_static("empty"));
    headers.insert("Sec-Fetch-Mode", HeaderValue::from_static("cors"));
    headers.insert("Sec-Fetch-Site", HeaderValue::from_static("same-site"));
    headers.insert(
        header::USER_AGENT,
        HeaderValue::from_str(user_agent)
            .map_err(|e| BotError::Config(format!("invalid user agent: {e}")))?,
    );
    Ok(headers)
}
