//! bankscrape-store: account and transaction stores backed by JSON files

pub mod accounts;
pub mod paths;
pub mod persistence;
pub mod transactions;

pub use accounts::{AccountDocument, AccountStore};
pub use paths::StorePaths;
pub use transactions::{TransactionDocument, TransactionStore};

/// Open both stores at the configured paths.
pub fn open_stores(paths: &StorePaths) -> (AccountStore, TransactionStore) {
    (
        AccountStore::open(&paths.accounts_path),
        TransactionStore::open(&paths.transactions_path),
    )
}
