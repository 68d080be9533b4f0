//! Account storage: numbered JSON batch files and token reconciliation.
//!
//! # Directory layout
//!
//! Everything lives in the working directory:
//!
//! ```text
//! ./
//! ├── queries.txt
//! ├── accounts-1.json
//! ├── accounts-2.json
//! └── accounts-{n}.json
//! ```
//!
//! # Modules
//!
//! - [`account_file`] — `accounts-N.json` format, discovery, load/save.
//! - [`reconcile`] — merging freshly minted tokens into the batch files.

pub mod account_file;
pub mod reconcile;

pub use account_file::{AccountFile, AccountFileRef, AccountStore, TokenRecord};
pub use reconcile::{OverflowPolicy, ReconcileReport};
