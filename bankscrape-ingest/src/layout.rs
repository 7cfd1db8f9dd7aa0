//! Named column layouts of the bank's tables.
//!
//! Column positions are a contract with the page markup. When the page
//! changes, add or fix a layout here; the mapper never guesses.

use std::fmt;
use std::str::FromStr;

use anyhow::bail;

/// A column position in a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    /// Counted from the start (0-based)
    At(usize),
    /// Counted from the end (`FromEnd(1)` is the last cell)
    FromEnd(usize),
}

impl Column {
    /// Resolve against a row of `width` positions.
    pub fn resolve(self, width: usize) -> Option<usize> {
        match self {
            Column::At(i) if i < width => Some(i),
            Column::FromEnd(n) if n >= 1 && n <= width => Some(width - n),
            _ => None,
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Column::At(i) => write!(f, "{i}"),
            Column::FromEnd(n) => write!(f, "-{n}"),
        }
    }
}

/// Columns of an accounts (contracts) row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountLayout {
    pub name: Column,
    /// The code is the last three characters of this cell
    pub currency: Column,
    pub balance: Column,
}

impl AccountLayout {
    /// `table#contracts-list`, rows marked `cp-item`
    pub const CONTRACTS: Self = Self {
        name: Column::At(1),
        currency: Column::At(2),
        balance: Column::At(4),
    };
}

/// Where a transaction's currency comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrencySource {
    /// A cell holding the code itself
    Column(Column),
    /// The symbol trailing the amount cell, looked up in the currency table
    AmountSymbol,
}

/// Columns of a tagged history row; position 0 is the direction tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionLayout {
    pub name: &'static str,
    pub date: Column,
    pub description: Column,
    pub amount: Column,
    pub currency: CurrencySource,
}

impl TransactionLayout {
    /// `table.cp-tran-with-balance`
    pub const HISTORY: Self = Self {
        name: "history",
        date: Column::At(9),
        description: Column::At(7),
        amount: Column::At(6),
        currency: CurrencySource::Column(Column::At(4)),
    };

    /// Compact statement rows, currency printed as a symbol after the amount
    pub const STATEMENT: Self = Self {
        name: "statement",
        date: Column::FromEnd(3),
        description: Column::At(3),
        amount: Column::FromEnd(2),
        currency: CurrencySource::AmountSymbol,
    };

    pub const ALL: [Self; 2] = [Self::HISTORY, Self::STATEMENT];
}

impl FromStr for TransactionLayout {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match Self::ALL.iter().find(|l| l.name == s.trim()) {
            Some(layout) => Ok(*layout),
            None => bail!("unknown transaction layout `{s}` (expected history or statement)"),
        }
    }
}
