//! Wire types for the mini-app backend.
//!
//! Every response is an envelope `{ "status": 0, "message": ..., "data": ... }`
//! where `status == 0` means success. Parsing fails closed: a missing status,
//! a non-zero status, or missing data is an error.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{BotError, Result};

// ── Requests ──────────────────────────────────────────────────────────────────

/// Body of `POST /user/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub init_data: &'a str,
    pub invite_code: &'a str,
    pub from: &'a str,
    pub is_bot: bool,
}

/// Body of `POST /user/inviteCode`.
#[derive(Debug, Clone, Serialize)]
pub struct InviteCodeRequest<'a> {
    pub invite_code: &'a str,
}

// ── Responses ─────────────────────────────────────────────────────────────────

/// Common response wrapper.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub status: i64,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// Check the logical status, ignoring the payload.
    pub fn ensure_success(&self) -> Result<()> {
        if self.status == 0 {
            Ok(())
        } else {
            Err(BotError::Rejected {
                status: self.status,
                message: self
                    .message
                    .clone()
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| format!("status {}", self.status)),
            })
        }
    }

    /// Unwrap the payload of a successful response.
    pub fn into_data(self) -> Result<T> {
        self.ensure_success()?;
        self.data
            .ok_or_else(|| BotError::InvalidResponse("missing 'data' field".to_string()))
    }
}

/// Parse an envelope from a raw body.
pub fn parse_envelope<T: DeserializeOwned>(body: &str) -> Result<Envelope<T>> {
    serde_json::from_str(body).map_err(|e| BotError::InvalidResponse(e.to_string()))
}

/// Payload of a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginData {
    pub access_token: String,
    /// Telegram first name; frequently null.
    #[serde(rename = "fn", default)]
    pub first_name: Option<String>,
}

/// Payload of a successful treasure-box claim.
#[derive(Debug, Clone, Deserialize)]
pub struct TreasureBoxData {
    pub toma_reward: serde_json::Value,
}

/// Amount awarded by the treasure box, kept as the remote rendered it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreasureBoxReward(pub String);

impl From<TreasureBoxData> for TreasureBoxReward {
    fn from(data: TreasureBoxData) -> Self {
        match data.toma_reward {
            serde_json::Value::String(s) => TreasureBoxReward(s),
            other => TreasureBoxReward(other.to_string()),
        }
    }
}

impl std::fmt::Display for TreasureBoxReward {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
