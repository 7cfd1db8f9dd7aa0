//! Currency symbol → short code table

use std::collections::HashMap;

use crate::{Result, ScrapeError};

/// Maps the currency symbols a page prints after amounts to three-letter codes.
#[derive(Debug, Clone)]
pub struct CurrencyTable {
    codes: HashMap<char, String>,
}

impl Default for CurrencyTable {
    fn default() -> Self {
        Self::empty()
            .with_symbol('₽', "RUB")
            .with_symbol('$', "USD")
            .with_symbol('€', "EUR")
    }
}

impl CurrencyTable {
    pub fn empty() -> Self {
        Self {
            codes: HashMap::new(),
        }
    }

    pub fn with_symbol(mut self, symbol: char, code: impl Into<String>) -> Self {
        self.codes.insert(symbol, code.into());
        self
    }

    pub fn code_for(&self, symbol: char) -> Result<&str> {
        self.codes
            .get(&symbol)
            .map(String::as_str)
            .ok_or_else(|| ScrapeError::UnknownCurrency {
                symbol: symbol.to_string(),
            })
    }

    /// Code for the symbol trailing an amount cell such as `"1 500 ₽"`.
    pub fn code_for_amount(&self, cell: &str) -> Result<&str> {
        let symbol = cell
            .trim_end()
            .chars()
            .last()
            .ok_or_else(|| ScrapeError::UnknownCurrency {
                symbol: String::new(),
            })?;
        self.code_for(symbol)
    }
}
