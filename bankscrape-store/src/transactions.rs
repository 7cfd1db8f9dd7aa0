use std::path::{Path, PathBuf};

use bankscrape_core::{Result, Transaction};
use serde::{Deserialize, Serialize};

use crate::persistence::{load_document, save_document, to_json_pretty};

/// On-disk shape: `{"transactions": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionDocument {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

/// Append-only list of transactions, filtered by account on read.
#[derive(Debug, Clone)]
pub struct TransactionStore {
    path: PathBuf,
    doc: TransactionDocument,
}

impl TransactionStore {
    /// Empty store that will be saved to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            doc: TransactionDocument::default(),
        }
    }

    /// Store loaded from `path`; empty when the file is missing or corrupt.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let doc = load_document(&path);
        Self { path, doc }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn add(&mut self, transaction: Transaction) {
        self.doc.transactions.push(transaction);
    }

    pub fn extend(&mut self, transactions: impl IntoIterator<Item = Transaction>) {
        self.doc.transactions.extend(transactions);
    }

    /// Transactions of one account, in insertion order.
    pub fn for_account(&self, account_name: &str) -> Vec<&Transaction> {
        self.doc
            .transactions
            .iter()
            .filter(|t| t.account_name == account_name)
            .collect()
    }

    pub fn all(&self) -> &[Transaction] {
        &self.doc.transactions
    }

    pub fn len(&self) -> usize {
        self.doc.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doc.transactions.is_empty()
    }

    pub fn reset(&mut self) {
        self.doc = TransactionDocument::default();
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        to_json_pretty(&self.doc)
    }

    pub fn save(&self) -> Result<()> {
        save_document(&self.doc, &self.path)
    }
}
