use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ACCOUNTS_FILE: &str = "account_data.json";
pub const TRANSACTIONS_FILE: &str = "transaction_data.json";

/// Where the two store documents live. Passed explicitly to every store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorePaths {
    pub accounts_path: PathBuf,
    pub transactions_path: PathBuf,
}

impl StorePaths {
    pub fn new(accounts_path: impl Into<PathBuf>, transactions_path: impl Into<PathBuf>) -> Self {
        Self {
            accounts_path: accounts_path.into(),
            transactions_path: transactions_path.into(),
        }
    }

    /// The conventional file names inside `dir` (use `.` for the CWD).
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self::new(dir.join(ACCOUNTS_FILE), dir.join(TRANSACTIONS_FILE))
    }
}
