//! Reconciling freshly minted tokens with the account batch files.
//!
//! Names are the identity key. A minted name that already lives in a batch
//! file refreshes that record's token in place (first file by suffix wins);
//! an unseen name is appended to the batch currently being filled. Once the
//! existing files have been offered the pool, leftover payloads are minted
//! chunk by chunk into new files with increasing suffixes.

use std::collections::HashMap;
use std::path::PathBuf;

use super::account_file::{AccountFile, AccountStore, TokenRecord};
use crate::api::RemoteApi;
use crate::console::Console;
use crate::error::{BotError, Result};
use crate::minter::TokenMinter;

/// What happens to new records that do not fit into an existing file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OverflowPolicy {
    /// Cut the file back to capacity; records past the end are discarded.
    #[default]
    Truncate,
    /// Move records past the end into new files after the existing ones.
    Spill,
}

/// Outcome of one reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Existing files that were rewritten.
    pub updated: Vec<PathBuf>,
    /// Files created by this run, in suffix order.
    pub created: Vec<PathBuf>,
    /// Records whose token changed in place.
    pub refreshed: usize,
    /// Records cut off by [`OverflowPolicy::Truncate`].
    pub dropped: usize,
}

impl ReconcileReport {
    pub fn is_noop(&self) -> bool {
        self.updated.is_empty() && self.created.is_empty()
    }
}

/// A batch file held in memory for the duration of a reconciliation.
struct LoadedFile {
    number: u64,
    file: AccountFile,
    dirty: bool,
}

impl LoadedFile {
    /// Replace the token stored for `record`'s name. Returns `false` if the
    /// name is not in this file.
    fn refresh(&mut self, record: &TokenRecord, refreshed: &mut usize) -> bool {
        let Some(i) = self.file.position(&record.first_name) else {
            return false;
        };
        let slot = &mut self.file.accounts[i];
        if slot.token != record.token {
            slot.token = record.token.clone();
            self.dirty = true;
            *refreshed += 1;
        }
        true
    }
}

/// Mutable state threaded through every mint round.
struct Ledger {
    files: Vec<LoadedFile>,
    /// Records cut from existing files under `Spill`, waiting for a new file.
    carry: Vec<TokenRecord>,
    /// Known names and the first token seen for each.
    known: HashMap<String, String>,
    report: ReconcileReport,
}

impl Ledger {
    fn new(files: Vec<LoadedFile>) -> Self {
        let mut known = HashMap::new();
        for loaded in &files {
            for account in &loaded.file.accounts {
                known
                    .entry(account.first_name.clone())
                    .or_insert_with(|| account.token.clone());
            }
        }
        Self {
            files,
            carry: Vec::new(),
            known,
            report: ReconcileReport::default(),
        }
    }

    /// Sort minted records into refreshes and new identities. Returns the
    /// new ones, deduplicated by name, in mint order.
    fn absorb(&mut self, minted: Vec<TokenRecord>) -> Vec<TokenRecord> {
        let mut fresh: Vec<TokenRecord> = Vec::new();

        for record in minted {
            if !self.known.contains_key(&record.first_name) {
                self.known
                    .insert(record.first_name.clone(), record.token.clone());
                fresh.push(record);
                continue;
            }

            let refreshed = &mut self.report.refreshed;
            if self.files.iter_mut().any(|f| f.refresh(&record, refreshed)) {
                continue;
            }
            if let Some(staged) = self
                .carry
                .iter_mut()
                .chain(fresh.iter_mut())
                .find(|s| s.first_name == record.first_name)
            {
                staged.token = record.token;
            }
        }

        fresh
    }

    /// Persist every file touched since the last flush.
    fn flush(&mut self, store: &AccountStore) -> Result<()> {
        for loaded in self.files.iter_mut().filter(|f| f.dirty) {
            let path = store.save(loaded.number, &loaded.file)?;
            loaded.dirty = false;
            if !self.report.created.contains(&path) && !self.report.updated.contains(&path) {
                log::debug!("refreshed tokens in {}", path.display());
                self.report.updated.push(path);
            }
        }
        Ok(())
    }

    /// Write `records` as a brand-new file after `last`.
    fn create(
        &mut self,
        store: &AccountStore,
        last: &mut u64,
        records: Vec<TokenRecord>,
        console: &Console,
    ) -> Result<()> {
        *last += 1;
        let file = AccountFile::new(records);
        let path = store.save(*last, &file)?;
        console.success(format!(
            "Successfully Generated Tokens In '{}'",
            AccountStore::file_name(*last)
        ));
        self.report.created.push(path);
        self.files.push(LoadedFile {
            number: *last,
            file,
            dirty: false,
        });
        Ok(())
    }
}

impl AccountStore {
    /// Mint tokens for `queries` and merge them into the batch files.
    ///
    /// Existing files are visited in suffix order. For each, the whole
    /// remaining pool is minted; known names refresh in place, new names are
    /// appended up to `capacity`, and as many payloads as new records are
    /// then removed from the front of the pool. Whatever remains is minted in
    /// `capacity`-sized chunks, each chunk with new names becoming a new file.
    ///
    /// A file is rewritten only when it gained records or a token changed.
    ///
    /// # Errors
    ///
    /// Returns `BotError::Config` if `capacity` is zero,
    /// `BotError::InvalidFileFormat` if an existing file is malformed, or
    /// `BotError::Io` if a file cannot be read or written. Mint failures are
    /// reported by the minter and never surface here.
    pub async fn reconcile<A: RemoteApi>(
        &self,
        queries: &[String],
        capacity: usize,
        policy: OverflowPolicy,
        minter: &TokenMinter<A>,
        console: &Console,
    ) -> Result<ReconcileReport> {
        if capacity == 0 {
            return Err(BotError::Config(
                "The Number Must Be Greater Than Zero.".to_string(),
            ));
        }

        let refs = self.discover()?;
        let mut files = Vec::with_capacity(refs.len());
        for r in &refs {
            files.push(LoadedFile {
                number: r.number,
                file: self.load(&r.path)?,
                dirty: false,
            });
        }
        let existing = files.len();
        let mut ledger = Ledger::new(files);
        let mut pool: Vec<String> = queries.to_vec();

        for idx in 0..existing {
            if pool.is_empty() {
                break;
            }

            let minted = minter.mint_all(&pool).await;
            let fresh = ledger.absorb(minted);
            let added = fresh.len();

            let current = &mut ledger.files[idx];
            current.file.accounts.extend(fresh);
            if added > 0 && current.file.len() > capacity {
                let tail = current.file.accounts.split_off(capacity);
                match policy {
                    OverflowPolicy::Truncate => {
                        log::warn!(
                            "{} records past capacity dropped from {}",
                            tail.len(),
                            AccountStore::file_name(current.number)
                        );
                        ledger.report.dropped += tail.len();
                    }
                    OverflowPolicy::Spill => ledger.carry.extend(tail),
                }
            }
            if added > 0 {
                current.dirty = true;
                console.success(format!(
                    "Updated '{}' With {} New Token And Name",
                    AccountStore::file_name(current.number),
                    added
                ));
            }
            ledger.flush(self)?;

            pool.drain(..added.min(pool.len()));
        }

        let mut last = refs.last().map(|r| r.number).unwrap_or(0);

        let carry = std::mem::take(&mut ledger.carry);
        for part in carry.chunks(capacity) {
            ledger.create(self, &mut last, part.to_vec(), console)?;
        }

        for chunk in pool.chunks(capacity) {
            let minted = minter.mint_all(chunk).await;
            let fresh = ledger.absorb(minted);
            ledger.flush(self)?;
            if !fresh.is_empty() {
                ledger.create(self, &mut last, fresh, console)?;
            }
        }

        Ok(ledger.report)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
