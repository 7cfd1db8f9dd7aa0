//! One scrape run: accounts page → account store, each account's history
//! page → transaction store, then a combined printout and a save.

use anyhow::{Context, Result};
use bankscrape_core::{Account, ScrapeError};
use bankscrape_ingest::portal::ACCOUNT_MARKER;
use bankscrape_ingest::{
    DatePick, HtmlTable, PageSource, Portal, RecordMapper, TaggedRow, classify_history,
    classify_in_page_order, extract,
};
use bankscrape_store::{AccountStore, TransactionStore};
use tracing::{info, warn};

/// How history rows get their direction tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RowOrder {
    /// Deposits block, then withdrawals block
    #[default]
    Grouped,
    /// Tagged one by one, page order kept
    Page,
}

impl RowOrder {
    pub fn classify(self, table: &HtmlTable) -> Vec<TaggedRow> {
        match self {
            RowOrder::Grouped => classify_history(table),
            RowOrder::Page => classify_in_page_order(table),
        }
    }
}

/// Add accounts whose names are not yet stored; returns how many were added.
pub fn add_new_accounts(store: &mut AccountStore, accounts: Vec<Account>) -> Result<usize> {
    let mut added = 0;
    for account in accounts {
        match store.add(account) {
            Ok(()) => added += 1,
            Err(ScrapeError::DuplicateAccount(name)) => {
                warn!(account = %name, "account already stored, keeping existing record");
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok(added)
}

/// Accounts (all, or the named one) as JSON, with their transaction views
/// refreshed from the transaction store.
pub fn account_listing(
    accounts: &mut AccountStore,
    transactions: &TransactionStore,
    name: Option<&str>,
) -> Result<String> {
    accounts.sync_transactions(transactions)?;
    let selected = accounts.select(name);
    if let (Some(name), true) = (name, selected.is_empty()) {
        return Err(ScrapeError::AccountNotFound(name.to_string()).into());
    }
    Ok(serde_json::to_string_pretty(&selected)?)
}

pub struct Session<P: PageSource> {
    source: P,
    portal: Portal,
    mapper: RecordMapper,
    row_order: RowOrder,
    history_from: DatePick,
    accounts: AccountStore,
    transactions: TransactionStore,
}

impl<P: PageSource> Session<P> {
    pub fn new(
        source: P,
        accounts: AccountStore,
        transactions: TransactionStore,
        history_from: DatePick,
    ) -> Self {
        Self {
            source,
            portal: Portal::default(),
            mapper: RecordMapper::default(),
            row_order: RowOrder::default(),
            history_from,
            accounts,
            transactions,
        }
    }

    pub fn with_portal(mut self, portal: Portal) -> Self {
        self.portal = portal;
        self
    }

    pub fn with_mapper(mut self, mapper: RecordMapper) -> Self {
        self.mapper = mapper;
        self
    }

    pub fn with_row_order(mut self, row_order: RowOrder) -> Self {
        self.row_order = row_order;
        self
    }

    pub fn accounts(&self) -> &AccountStore {
        &self.accounts
    }

    pub fn transactions(&self) -> &TransactionStore {
        &self.transactions
    }

    /// Empty both stores before a fresh run.
    pub fn reset(&mut self) {
        self.accounts.reset();
        self.transactions.reset();
    }

    /// Read the accounts page into the account store.
    pub fn fetch_accounts(&mut self) -> Result<usize> {
        let request = self.portal.accounts_page();
        let table = self
            .source
            .fetch(&request)
            .with_context(|| format!("fetching {}", request.url))?;
        let rows = extract(&table, ACCOUNT_MARKER, None);
        let accounts = self
            .mapper
            .accounts(&rows)
            .with_context(|| format!("mapping accounts from {}", request.url))?;

        let added = add_new_accounts(&mut self.accounts, accounts)?;
        info!(added, total = self.accounts.len(), "fetched accounts");
        Ok(added)
    }

    /// Read the history page of the named account, or of every stored
    /// account, into the transaction store.
    pub fn fetch_transactions(&mut self, account: Option<&str>) -> Result<usize> {
        let names: Vec<String> = self
            .accounts
            .select(account)
            .iter()
            .map(|a| a.name.clone())
            .collect();
        if let (Some(name), true) = (account, names.is_empty()) {
            return Err(ScrapeError::AccountNotFound(name.to_string()).into());
        }

        let mut added = 0;
        for name in names {
            let request = self.portal.history_page(&name, self.history_from);
            let table = self
                .source
                .fetch(&request)
                .with_context(|| format!("fetching {}", request.url))?;
            let tagged = self.row_order.classify(&table);
            let txns = self
                .mapper
                .transactions(&tagged, &name)
                .with_context(|| format!("mapping transactions of {name}"))?;

            info!(account = %name, count = txns.len(), "fetched transactions");
            added += txns.len();
            self.transactions.extend(txns);
        }
        Ok(added)
    }

    /// Accounts document with every account's transactions filled in.
    pub fn combined_json(&mut self) -> Result<String> {
        self.accounts.sync_transactions(&self.transactions)?;
        Ok(self.accounts.to_json_pretty()?)
    }

    /// A whole scrape run: accounts, then histories, then save. Both stores
    /// start empty unless `append`, so repeated runs mirror the pages
    /// instead of stacking copies. Returns the combined printout.
    pub fn sync(&mut self, account: Option<&str>, append: bool) -> Result<String> {
        if !append {
            self.reset();
        }
        self.fetch_accounts()?;
        self.fetch_transactions(account)?;
        let json = self.combined_json()?;
        self.save()?;
        info!(
            accounts = self.accounts.len(),
            transactions = self.transactions.len(),
            append,
            "sync complete"
        );
        Ok(json)
    }

    pub fn save(&self) -> Result<()> {
        self.transactions
            .save()
            .with_context(|| format!("saving {}", self.transactions.path().display()))?;
        self.accounts
            .save()
            .with_context(|| format!("saving {}", self.accounts.path().display()))?;
        Ok(())
    }
}
