//! Token minting: turn login payloads into `{token, first_name}` records.

use std::time::Duration;

use futures::future::join_all;

use crate::api::RemoteApi;
use crate::config::Config;
use crate::console::{Console, Tone};
use crate::names::display_name_or_fallback;
use crate::storage::TokenRecord;

/// Mints tokens through a [`RemoteApi`], one login call per payload.
pub struct TokenMinter<A> {
    api: A,
    delay: Duration,
    console: Console,
}

impl<A: RemoteApi> TokenMinter<A> {
    pub fn new(api: A, config: &Config, console: Console) -> Self {
        Self {
            api,
            delay: config.mint_delay,
            console,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Log in with one payload.
    ///
    /// Waits the courtesy delay first. Any failure is reported and yields
    /// `None`; the payload is not retried.
    pub async fn mint(&self, query: &str) -> Option<TokenRecord> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        match self.api.login(query).await {
            Ok(data) => Some(TokenRecord {
                token: data.access_token,
                first_name: display_name_or_fallback(data.first_name.as_deref()),
            }),
            Err(e) => {
                log::warn!("login failed: {e}");
                let what = format!("Failed To Process {query}");
                let why = e.to_string();
                self.console
                    .segments(&[(Tone::Warning, what.as_str()), (Tone::Failure, why.as_str())]);
                None
            }
        }
    }

    /// Mint every payload concurrently and keep the successes.
    ///
    /// All calls are in flight at once, each after its own delay; the
    /// returned order follows the input order with failures removed.
    pub async fn mint_all<S: AsRef<str>>(&self, queries: &[S]) -> Vec<TokenRecord> {
        let results = join_all(queries.iter().map(|q| self.mint(q.as_ref()))).await;
        let minted: Vec<TokenRecord> = results.into_iter().flatten().collect();
        log::debug!("minted {}/{} tokens", minted.len(), queries.len());
        minted
    }
}
