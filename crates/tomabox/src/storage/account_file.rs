//! Account batch files — `accounts-{n}.json`.
//!
//! File format:
//! ```json
//! {
//!     "accounts": [
//!         { "token": "...", "first_name": "..." }
//!     ]
//! }
//! ```
//!
//! Files are discovered by name and ordered by their numeric suffix, so
//! `accounts-10.json` sorts after `accounts-9.json`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{BotError, Result};

const FILE_PREFIX: &str = "accounts-";
const FILE_SUFFIX: &str = ".json";

// ── On-disk structure ─────────────────────────────────────────────────────────

/// One minted identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub token: String,
    pub first_name: String,
}

impl TokenRecord {
    pub fn new(token: impl Into<String>, first_name: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            first_name: first_name.into(),
        }
    }
}

/// Contents of one batch file, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountFile {
    #[serde(default)]
    pub accounts: Vec<TokenRecord>,
}

impl AccountFile {
    pub fn new(accounts: Vec<TokenRecord>) -> Self {
        Self { accounts }
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn position(&self, first_name: &str) -> Option<usize> {
        self.accounts.iter().position(|a| a.first_name == first_name)
    }
}

/// A discovered batch file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountFileRef {
    pub number: u64,
    pub path: PathBuf,
}

impl AccountFileRef {
    /// File name without directory, e.g. `accounts-3.json`.
    pub fn file_name(&self) -> String {
        AccountStore::file_name(self.number)
    }
}

// ── AccountStore ──────────────────────────────────────────────────────────────

/// Filesystem-backed set of numbered account files.
///
/// Single-process use only; one file is written at a time.
#[derive(Debug, Clone)]
pub struct AccountStore {
    base_dir: PathBuf,
}

impl AccountStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Name of the file with suffix `number`.
    pub fn file_name(number: u64) -> String {
        format!("{FILE_PREFIX}{number}{FILE_SUFFIX}")
    }

    pub fn path_for(&self, number: u64) -> PathBuf {
        self.base_dir.join(Self::file_name(number))
    }

    /// List every `accounts-{n}.json` in the directory, ascending by `n`.
    ///
    /// Names that do not carry a numeric suffix are ignored.
    ///
    /// # Errors
    ///
    /// Returns `BotError::Io` if the directory cannot be read.
    pub fn discover(&self) -> Result<Vec<AccountFileRef>> {
        let mut files = Vec::new();

        for entry in std::fs::read_dir(&self.base_dir)? {
            let entry = entry?;
            let name = entry.file_name();
            if let Some(number) = parse_file_number(&name.to_string_lossy()) {
                files.push(AccountFileRef {
                    number,
                    path: entry.path(),
                });
            }
        }

        files.sort_by_key(|f| f.number);
        Ok(files)
    }

    /// Like [`discover`](Self::discover), but an empty result is a
    /// configuration error.
    pub fn discover_required(&self) -> Result<Vec<AccountFileRef>> {
        let files = self.discover()?;
        if files.is_empty() {
            return Err(BotError::Config(
                "No 'accounts-*.json' Files Found In The Directory. Please Generate Tokens First By Selecting Option 1."
                    .to_string(),
            ));
        }
        Ok(files)
    }

    /// Load and parse one account file.
    ///
    /// # Errors
    ///
    /// Returns `BotError::InvalidFileFormat` if the JSON does not match the
    /// expected shape, or `BotError::Io` for filesystem errors.
    pub fn load(&self, path: &Path) -> Result<AccountFile> {
        let bytes = std::fs::read(path)?;
        serde_json::from_slice(&bytes).map_err(|e| {
            BotError::InvalidFileFormat(format!("failed to parse {}: {e}", path.display()))
        })
    }

    /// Write `file` as `accounts-{number}.json`, replacing any existing file.
    pub fn save(&self, number: u64, file: &AccountFile) -> Result<PathBuf> {
        let path = self.path_for(number);
        std::fs::write(&path, to_pretty_json(file)?)?;
        log::debug!("wrote {} records to {}", file.len(), path.display());
        Ok(path)
    }
}

/// Extract `n` from `accounts-{n}.json`.
pub fn parse_file_number(name: &str) -> Option<u64> {
    let digits = name.strip_prefix(FILE_PREFIX)?.strip_suffix(FILE_SUFFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Pretty-print with four-space indentation.
fn to_pretty_json(file: &AccountFile) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
    file.serialize(&mut ser)
        .map_err(|e| BotError::SerializationError(e.to_string()))?;
    Ok(out)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
