//! In-memory [`RemoteApi`] double for tests.
//!
//! Logins are answered from a script keyed by payload; anything unscripted
//! fails like a network error. Every call is recorded in order.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::api::{LoginData, RemoteApi, TreasureBoxReward};
use crate::error::{BotError, Result};

/// One recorded call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Login(String),
    ApplyInvite(String),
    OpenTreasureBox(String),
}

#[derive(Debug, Clone)]
enum Scripted<T> {
    Ok(T),
    Rejected(i64, String),
    Http(String),
}

impl<T: Clone> Scripted<T> {
    fn answer(&self) -> Result<T> {
        match self {
            Scripted::Ok(v) => Ok(v.clone()),
            Scripted::Rejected(status, message) => Err(BotError::Rejected {
                status: *status,
                message: message.clone(),
            }),
            Scripted::Http(message) => Err(BotError::Http(message.clone())),
        }
    }
}

/// Scripted remote API.
#[derive(Debug, Default)]
pub struct ScriptedApi {
    logins: HashMap<String, LoginData>,
    invites: HashMap<String, Scripted<()>>,
    boxes: HashMap<String, Scripted<TreasureBoxReward>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer a login for `query` with `token` and an optional first name.
    pub fn with_login(mut self, query: &str, token: &str, first_name: Option<&str>) -> Self {
        self.logins.insert(
            query.to_string(),
            LoginData {
                access_token: token.to_string(),
                first_name: first_name.map(str::to_string),
            },
        );
        self
    }

    /// Make the invite call for `token` report a non-zero status.
    pub fn with_invite_rejection(mut self, token: &str, status: i64, message: &str) -> Self {
        self.invites.insert(
            token.to_string(),
            Scripted::Rejected(status, message.to_string()),
        );
        self
    }

    /// Make the invite call for `token` fail at the transport level.
    pub fn with_invite_error(mut self, token: &str, message: &str) -> Self {
        self.invites
            .insert(token.to_string(), Scripted::Http(message.to_string()));
        self
    }

    /// Award `amount` when `token` opens the treasure box.
    pub fn with_reward(mut self, token: &str, amount: &str) -> Self {
        self.boxes.insert(
            token.to_string(),
            Scripted::Ok(TreasureBoxReward(amount.to_string())),
        );
        self
    }

    /// Make the treasure box for `token` report a non-zero status.
    pub fn with_box_rejection(mut self, token: &str, status: i64, message: &str) -> Self {
        self.boxes.insert(
            token.to_string(),
            Scripted::Rejected(status, message.to_string()),
        );
        self
    }

    /// All calls made so far, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn login_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Login(q) => Some(q),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

#[async_trait]
impl RemoteApi for ScriptedApi {
    async fn login(&self, query: &str) -> Result<LoginData> {
        self.record(Call::Login(query.to_string()));
        self.logins
            .get(query)
            .cloned()
            .ok_or_else(|| BotError::Http(format!("no scripted login for {query}")))
    }

    async fn apply_invite_code(&self, token: &str) -> Result<()> {
        self.record(Call::ApplyInvite(token.to_string()));
        match self.invites.get(token) {
            Some(scripted) => scripted.answer(),
            None => Ok(()),
        }
    }

    async fn open_treasure_box(&self, token: &str) -> Result<TreasureBoxReward> {
        self.record(Call::OpenTreasureBox(token.to_string()));
        match self.boxes.get(token) {
            Some(scripted) => scripted.answer(),
            None => Ok(TreasureBoxReward("100".to_string())),
        }
    }
}
