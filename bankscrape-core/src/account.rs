//! Account records and field-level updates

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Result, ScrapeError, Transaction};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountNature {
    #[default]
    BankAccount,
    CreditCard,
}

impl FromStr for AccountNature {
    type Err = ScrapeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "bank_account" => Ok(AccountNature::BankAccount),
            "credit_card" => Ok(AccountNature::CreditCard),
            other => Err(ScrapeError::InvalidValue {
                field: "nature",
                value: other.to_string(),
            }),
        }
    }
}

/// A named account as shown on the accounts page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique key within a store
    pub name: String,
    pub currency: String,
    pub balance: i64,
    #[serde(default)]
    pub nature: AccountNature,
    /// Denormalized view of the account's transactions, rebuilt on demand
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl Account {
    pub fn new(name: impl Into<String>, currency: impl Into<String>, balance: i64) -> Self {
        Self {
            name: name.into(),
            currency: currency.into(),
            balance,
            nature: AccountNature::default(),
            transactions: Vec::new(),
        }
    }

    pub fn with_nature(mut self, nature: AccountNature) -> Self {
        self.nature = nature;
        self
    }

    pub fn with_transactions(mut self, transactions: Vec<Transaction>) -> Self {
        self.transactions = transactions;
        self
    }

    /// Apply a field update: `Update` replaces the value, `Add` accumulates
    /// it onto the current one.
    pub fn apply(&mut self, update: AccountUpdate, mode: UpdateMode) -> Result<()> {
        match mode {
            UpdateMode::Update => match update {
                AccountUpdate::Currency(v) => self.currency = v,
                AccountUpdate::Balance(v) => self.balance = v,
                AccountUpdate::Nature(v) => self.nature = v,
                AccountUpdate::Transactions(v) => self.transactions = v,
            },
            UpdateMode::Add => match update {
                AccountUpdate::Currency(v) => self.currency.push_str(&v),
                AccountUpdate::Balance(v) => {
                    self.balance = self
                        .balance
                        .checked_add(v)
                        .ok_or(ScrapeError::Overflow { field: "balance" })?;
                }
                AccountUpdate::Nature(_) => {
                    return Err(ScrapeError::UnsupportedAccumulate { field: "nature" });
                }
                AccountUpdate::Transactions(v) => self.transactions.extend(v),
            },
        }
        Ok(())
    }
}

/// How `AccountStore::update` merges a value into an existing field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMode {
    /// Replace the field
    Update,
    /// Accumulate onto the field
    Add,
}

impl FromStr for UpdateMode {
    type Err = ScrapeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "update" => Ok(UpdateMode::Update),
            "add" => Ok(UpdateMode::Add),
            other => Err(ScrapeError::InvalidMode(other.to_string())),
        }
    }
}

/// Updatable account fields. The name is the store key and never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountField {
    Currency,
    Balance,
    Nature,
    Transactions,
}

impl AccountField {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountField::Currency => "currency",
            AccountField::Balance => "balance",
            AccountField::Nature => "nature",
            AccountField::Transactions => "transactions",
        }
    }
}

impl fmt::Display for AccountField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountField {
    type Err = ScrapeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "currency" => Ok(AccountField::Currency),
            "balance" => Ok(AccountField::Balance),
            "nature" => Ok(AccountField::Nature),
            "transactions" => Ok(AccountField::Transactions),
            other => Err(ScrapeError::InvalidField(other.to_string())),
        }
    }
}

/// A typed field/value pair for `AccountStore::update`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountUpdate {
    Currency(String),
    Balance(i64),
    Nature(AccountNature),
    Transactions(Vec<Transaction>),
}

impl AccountUpdate {
    pub fn field(&self) -> AccountField {
        match self {
            AccountUpdate::Currency(_) => AccountField::Currency,
            AccountUpdate::Balance(_) => AccountField::Balance,
            AccountUpdate::Nature(_) => AccountField::Nature,
            AccountUpdate::Transactions(_) => AccountField::Transactions,
        }
    }

    /// Build an update from command-line text.
    pub fn parse(field: AccountField, value: &str) -> Result<Self> {
        match field {
            AccountField::Currency => Ok(AccountUpdate::Currency(value.trim().to_string())),
            AccountField::Balance => value
                .trim()
                .parse()
                .map(AccountUpdate::Balance)
                .map_err(|_| ScrapeError::InvalidValue {
                    field: "balance",
                    value: value.to_string(),
                }),
            AccountField::Nature => value.parse().map(AccountUpdate::Nature),
            // only rebuilt from the transaction store
            AccountField::Transactions => Err(ScrapeError::InvalidValue {
                field: "transactions",
                value: value.to_string(),
            }),
        }
    }
}
