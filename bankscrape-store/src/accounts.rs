use std::collections::HashMap;
use std::path::{Path, PathBuf};

use bankscrape_core::{Account, AccountUpdate, Result, ScrapeError, UpdateMode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::TransactionStore;
use crate::persistence::{load_document, save_document, to_json_pretty};

/// On-disk shape: `{"accounts": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountDocument {
    #[serde(default)]
    pub accounts: Vec<Account>,
}

#[derive(Serialize)]
struct AccountsView<'a> {
    accounts: &'a [Account],
}

/// Accounts keyed by name.
///
/// Records stay in insertion order for printing; `index` maps a name to its
/// position. Names are unique: adding an existing name is an error.
#[derive(Debug, Clone)]
pub struct AccountStore {
    path: PathBuf,
    accounts: Vec<Account>,
    index: HashMap<String, usize>,
}

impl AccountStore {
    /// Empty store that will be saved to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            accounts: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Store loaded from `path`; empty when the file is missing or corrupt.
    ///
    /// A file written by an older tool may repeat a name; the first record
    /// wins and the rest are dropped.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let mut store = Self::new(path);
        let doc: AccountDocument = load_document(&store.path);
        for account in doc.accounts {
            let name = account.name.clone();
            if let Err(ScrapeError::DuplicateAccount(_)) = store.add(account) {
                warn!(account = %name, path = %store.path.display(), "dropping duplicate stored account");
            }
        }
        store
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn add(&mut self, account: Account) -> Result<()> {
        if self.index.contains_key(&account.name) {
            return Err(ScrapeError::DuplicateAccount(account.name));
        }
        self.index.insert(account.name.clone(), self.accounts.len());
        self.accounts.push(account);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Account> {
        self.index.get(name).map(|&i| &self.accounts[i])
    }

    /// The named account, or every account when `name` is `None`.
    pub fn select(&self, name: Option<&str>) -> Vec<&Account> {
        match name {
            Some(name) => self.get(name).into_iter().collect(),
            None => self.accounts.iter().collect(),
        }
    }

    pub fn all(&self) -> &[Account] {
        &self.accounts
    }

    pub fn names(&self) -> Vec<String> {
        self.accounts.iter().map(|a| a.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Replace or accumulate one field of the named account in place.
    pub fn update(&mut self, name: &str, update: AccountUpdate, mode: UpdateMode) -> Result<&Account> {
        let i = *self
            .index
            .get(name)
            .ok_or_else(|| ScrapeError::AccountNotFound(name.to_string()))?;
        let field = update.field();
        self.accounts[i].apply(update, mode)?;
        debug!(account = name, %field, ?mode, "updated account");
        Ok(&self.accounts[i])
    }

    /// Rebuild every account's `transactions` view from `transactions`.
    pub fn sync_transactions(&mut self, transactions: &TransactionStore) -> Result<()> {
        for name in self.names() {
            let own = transactions.for_account(&name).into_iter().cloned().collect();
            self.update(&name, AccountUpdate::Transactions(own), UpdateMode::Update)?;
        }
        Ok(())
    }

    pub fn reset(&mut self) {
        self.accounts.clear();
        self.index.clear();
    }

    pub fn document(&self) -> AccountDocument {
        AccountDocument {
            accounts: self.accounts.clone(),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        to_json_pretty(&AccountsView {
            accounts: &self.accounts,
        })
    }

    pub fn save(&self) -> Result<()> {
        save_document(
            &AccountsView {
                accounts: &self.accounts,
            },
            &self.path,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bankscrape_core::{AccountNature, Transaction};

    fn store() -> AccountStore {
        let mut store = AccountStore::new("unused.json");
        store.add(Account::new("a", "RUB", 100)).unwrap();
        store.add(Account::new("b", "USD", 5)).unwrap();
        store.add(Account::new("c", "EUR", 0)).unwrap();
        store
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut store = store();
        let err = store.add(Account::new("b", "RUB", 1)).unwrap_err();
        assert!(matches!(err, ScrapeError::DuplicateAccount(ref n) if n == "b"));
        assert_eq!(store.len(), 3);
        assert_eq!(store.get("b").unwrap().currency, "USD");
    }

    #[test]
    fn select_by_name_or_all() {
        let store = store();
        assert_eq!(store.select(Some("c"))[0].currency, "EUR");
        assert!(store.select(Some("zzz")).is_empty());
        let names: Vec<_> = store.select(None).iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn update_replaces_only_the_target() {
        let mut store = store();
        let before = store.document();
        store
            .update("b", AccountUpdate::Nature(AccountNature::CreditCard), UpdateMode::Update)
            .unwrap();

        assert_eq!(store.get("b").unwrap().nature, AccountNature::CreditCard);
        assert_eq!(store.get("a"), before.accounts.first());
        assert_eq!(store.get("c"), before.accounts.last());
        assert_eq!(store.names(), vec!["a", "b", "c"]);
    }

    #[test]
    fn repeated_add_accumulates() {
        let mut store = store();
        store.update("a", AccountUpdate::Balance(20), UpdateMode::Add).unwrap();
        let acc = store.update("a", AccountUpdate::Balance(3), UpdateMode::Add).unwrap();
        assert_eq!(acc.balance, 123);
    }

    #[test]
    fn update_of_unknown_account_is_not_found() {
        let mut store = store();
        let err = store
            .update("nope", AccountUpdate::Balance(1), UpdateMode::Update)
            .unwrap_err();
        assert!(matches!(err, ScrapeError::AccountNotFound(ref n) if n == "nope"));
    }

    #[test]
    fn sync_rebuilds_transaction_views() {
        let mut store = store();
        let mut txns = TransactionStore::new("unused.json");
        txns.add(Transaction::new("01", 10, "RUB", "a"));
        txns.add(Transaction::new("02", -4, "USD", "b"));
        txns.add(Transaction::new("03", -1, "RUB", "a"));
        txns.add(Transaction::new("04", 9, "RUB", "orphan"));

        store.sync_transactions(&txns).unwrap();
        store.sync_transactions(&txns).unwrap();

        assert_eq!(store.get("a").unwrap().transactions.len(), 2);
        assert_eq!(store.get("b").unwrap().transactions[0].amount, -4);
        assert!(store.get("c").unwrap().transactions.is_empty());
    }

    #[test]
    fn reset_leaves_canonical_empty_shape() {
        let mut store = store();
        store.reset();
        assert!(store.is_empty());
        assert!(!store.contains("a"));
        assert_eq!(store.to_json_pretty().unwrap(), "{\n  \"accounts\": []\n}");
        store.add(Account::new("a", "RUB", 1)).unwrap();
    }
}
