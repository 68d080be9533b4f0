//! tomabox — batch token minting and referral treasure-box campaigns for
//! the Tomarket mini-app API.
//!
//! Login payloads are read from a text file, exchanged for access tokens,
//! and filed into capacity-bounded `accounts-N.json` batches. A campaign
//! then walks one batch forever, applying the referral code and opening
//! the treasure box for every account.

pub mod api;
pub mod campaign;
pub mod config;
pub mod console;
pub mod error;
pub mod minter;
pub mod names;
pub mod queries;
pub mod storage;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod time;

// Re-export primary types
pub use api::{ApiClient, RemoteApi, TreasureBoxReward};
pub use campaign::{load_campaign_records, CampaignRunner, PassSummary, RecordOutcome};
pub use config::Config;
pub use console::{Console, Tone};
pub use error::{BotError, Result};
pub use minter::TokenMinter;
pub use queries::read_queries;
pub use storage::{
    AccountFile, AccountFileRef, AccountStore, OverflowPolicy, ReconcileReport, TokenRecord,
};
