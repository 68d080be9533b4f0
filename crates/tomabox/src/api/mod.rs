//! Remote API surface.
//!
//! - [`types`] — request bodies and response schemas.
//! - [`client`] — the reqwest-backed [`ApiClient`].
//!
//! Components depend on the [`RemoteApi`] trait so tests can script the
//! remote side without a network.

pub mod client;
pub mod types;

use async_trait::async_trait;

use crate::error::Result;

pub use client::ApiClient;
pub use types::{Envelope, LoginData, TreasureBoxReward};

/// The three calls the bot makes against the mini-app backend.
#[async_trait]
pub trait RemoteApi: Send + Sync {
    /// Exchange an opaque init-data payload for an access token.
    async fn login(&self, query: &str) -> Result<LoginData>;

    /// Submit the configured referral code on behalf of `token`.
    async fn apply_invite_code(&self, token: &str) -> Result<()>;

    /// Open the referral treasure box and return the awarded amount.
    async fn open_treasure_box(&self, token: &str) -> Result<TreasureBoxReward>;
}
