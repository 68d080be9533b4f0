//! Campaign runner: drive each loaded account through the referral
//! treasure box, pass after pass.
//!
//! Per record the calls are strictly sequential: the invite code must be
//! accepted before the box is opened. Records are visited one at a time in
//! file order. Remote failures are reported and skip the record; a pass that
//! panics is reported and the next pass starts anyway.

use std::panic::AssertUnwindSafe;
use std::path::Path;
use std::time::Duration;

use futures::FutureExt;

use crate::api::{RemoteApi, TreasureBoxReward};
use crate::config::Config;
use crate::console::{Console, Tone};
use crate::error::BotError;
use crate::storage::{AccountStore, TokenRecord};

/// Result of driving one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    Claimed(TreasureBoxReward),
    /// The invite call failed; the box was not attempted.
    JoinFailed(String),
    /// The invite was accepted but the box could not be opened.
    ClaimFailed(String),
}

/// Tally of one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassSummary {
    pub claimed: usize,
    pub join_failed: usize,
    pub claim_failed: usize,
}

impl PassSummary {
    fn record(&mut self, outcome: &RecordOutcome) {
        match outcome {
            RecordOutcome::Claimed(_) => self.claimed += 1,
            RecordOutcome::JoinFailed(_) => self.join_failed += 1,
            RecordOutcome::ClaimFailed(_) => self.claim_failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.claimed + self.join_failed + self.claim_failed
    }
}

/// Loops passes over a fixed set of records.
pub struct CampaignRunner<A> {
    api: A,
    referral_code: String,
    record_pause: Duration,
    pass_pause: Duration,
    console: Console,
}

impl<A: RemoteApi> CampaignRunner<A> {
    pub fn new(api: A, config: &Config, console: Console) -> Self {
        Self {
            api,
            referral_code: config.referral_code.clone(),
            record_pause: config.record_pause,
            pass_pause: config.pass_pause,
            console,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Apply the referral code for one record, then claim the box.
    pub async fn process(&self, record: &TokenRecord) -> RecordOutcome {
        if let Err(e) = self.api.apply_invite_code(&record.token).await {
            self.console
                .fail(describe("Join Treasure Box", "Failed to Join Treasure Box", &e));
            log::warn!("invite failed for {}: {e}", record.first_name);
            return RecordOutcome::JoinFailed(e.to_string());
        }
        self.console.success(format!(
            "Success Join Treasure Box with Reff Code: {}",
            self.referral_code
        ));

        match self.api.open_treasure_box(&record.token).await {
            Ok(reward) => {
                self.console
                    .success(format!("You've Got {reward} $TOMA From Treasure Box"));
                RecordOutcome::Claimed(reward)
            }
            Err(e) => {
                self.console
                    .fail(describe("Claim Treasure Box", "Failed to Claim Treasure Box", &e));
                log::warn!("claim failed for {}: {e}", record.first_name);
                RecordOutcome::ClaimFailed(e.to_string())
            }
        }
    }

    /// One traversal of `records` in order, pausing after each.
    pub async fn run_pass(&self, records: &[TokenRecord]) -> PassSummary {
        self.console
            .say(Tone::Heading, format!("Total Account {}", records.len()));

        let mut summary = PassSummary::default();
        for record in records {
            self.console
                .segments(&[(Tone::Info, "Home"), (Tone::Heading, record.first_name.as_str())]);
            let outcome = self.process(record).await;
            summary.record(&outcome);
            pause(self.record_pause).await;
        }

        self.console
            .say(Tone::Heading, "Finished Processing All Account");
        summary
    }

    /// Run a pass, turning a panic inside it into a reported error.
    pub async fn guarded_pass(&self, records: &[TokenRecord]) -> Option<PassSummary> {
        match AssertUnwindSafe(self.run_pass(records)).catch_unwind().await {
            Ok(summary) => Some(summary),
            Err(panic) => {
                let message = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "pass aborted".to_string());
                log::error!("campaign pass aborted: {message}");
                self.console.fail(message);
                None
            }
        }
    }

    /// Run `passes` passes, or forever when `None`.
    ///
    /// Each pass is followed by the inter-pass pause and a console clear.
    pub async fn run(&self, records: &[TokenRecord], passes: Option<usize>) -> Vec<PassSummary> {
        let mut summaries = Vec::new();
        let mut completed = 0usize;

        loop {
            if passes.is_some_and(|limit| completed >= limit) {
                return summaries;
            }
            if let Some(summary) = self.guarded_pass(records).await {
                log::info!(
                    "pass {}: {} claimed, {} join failures, {} claim failures",
                    completed + 1,
                    summary.claimed,
                    summary.join_failed,
                    summary.claim_failed
                );
                if passes.is_some() {
                    summaries.push(summary);
                }
            }
            completed += 1;

            pause(self.pass_pause).await;
            self.console.clear();
        }
    }

    /// Loop passes until the process is interrupted.
    pub async fn run_forever(&self, records: &[TokenRecord]) {
        self.run(records, None).await;
    }
}

/// Load the records of one account file for a campaign.
///
/// A malformed or unreadable file is reported and contributes no records.
pub fn load_campaign_records(store: &AccountStore, path: &Path, console: &Console) -> Vec<TokenRecord> {
    match store.load(path) {
        Ok(file) => file.accounts,
        Err(e) => {
            log::error!("failed to load {}: {e}", path.display());
            console.fail(format!("An Error Occurred While Loading JSON: {e}"));
            Vec::new()
        }
    }
}

/// Operator message for a failed call.
fn describe(action: &str, rejected: &str, error: &BotError) -> String {
    match error {
        BotError::Rejected { message, .. } => format!("{rejected}: {message}"),
        BotError::Http(e) => format!("An HTTP Error Occurred While {action}: {e}"),
        other => format!("An Unexpected Error Occurred While {action}: {other}"),
    }
}

async fn pause(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}
