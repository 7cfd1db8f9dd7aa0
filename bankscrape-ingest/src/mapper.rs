//! Map extracted rows onto Account and Transaction records.

use std::sync::LazyLock;

use bankscrape_core::{Account, CurrencyTable, Result, ScrapeError, Transaction};
use regex::Regex;
use tracing::debug;

use crate::classify::TaggedRow;
use crate::layout::{AccountLayout, Column, CurrencySource, TransactionLayout};

// Display amounts are integers possibly followed by decimals or a symbol;
// only the leading integer counts.
static LEADING_INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?\d+").expect("static pattern"));

/// Parse a scraped amount such as `" 1 000 000 "` or `"-1 500,00 ₽"`.
///
/// Whitespace (including no-break spaces used as thousand separators) is
/// removed first. Text with no leading digits is malformed.
pub fn parse_amount(field: &'static str, raw: &str) -> Result<i64> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let malformed = || ScrapeError::MalformedNumber {
        field,
        value: raw.to_string(),
    };
    let digits = LEADING_INTEGER.find(&compact).ok_or_else(malformed)?;
    digits.as_str().parse().map_err(|_| malformed())
}

/// Turns rows of a known layout into records.
#[derive(Debug, Clone)]
pub struct RecordMapper {
    accounts: AccountLayout,
    transactions: TransactionLayout,
    currencies: CurrencyTable,
}

impl Default for RecordMapper {
    fn default() -> Self {
        Self::new(TransactionLayout::HISTORY)
    }
}

impl RecordMapper {
    pub fn new(transactions: TransactionLayout) -> Self {
        Self {
            accounts: AccountLayout::CONTRACTS,
            transactions,
            currencies: CurrencyTable::default(),
        }
    }

    pub fn with_currencies(mut self, currencies: CurrencyTable) -> Self {
        self.currencies = currencies;
        self
    }

    /// One accounts-page row.
    pub fn account(&self, row: &[String]) -> Result<Account> {
        let layout = &self.accounts;
        let name = cell(row, layout.name, "name")?.trim();
        if name.is_empty() {
            return Err(ScrapeError::InvalidValue {
                field: "name",
                value: String::new(),
            });
        }
        let currency = currency_suffix(cell(row, layout.currency, "currency")?)?;
        let balance = parse_amount("balance", cell(row, layout.balance, "balance")?)?;
        Ok(Account::new(name, currency, balance))
    }

    /// One tagged history row belonging to `account_name`.
    pub fn transaction(&self, row: &TaggedRow, account_name: &str) -> Result<Transaction> {
        let layout = &self.transactions;
        let date = tagged_cell(row, layout.date, "date")?.trim();
        let description = tagged_cell(row, layout.description, "description")?.trim();
        let amount_cell = tagged_cell(row, layout.amount, "amount")?;
        let amount = row.direction.signed(parse_amount("amount", amount_cell)?);

        let currency = match layout.currency {
            CurrencySource::Column(column) => {
                let value = tagged_cell(row, column, "currency")?.trim();
                if value.is_empty() {
                    return Err(ScrapeError::MalformedCurrency {
                        field: "currency",
                        value: value.to_string(),
                    });
                }
                value.to_string()
            }
            CurrencySource::AmountSymbol => self.currencies.code_for_amount(amount_cell)?.to_string(),
        };

        Ok(Transaction::new(date, amount, currency, account_name).with_description(description))
    }

    /// Every row, failing on the first bad one with its index.
    pub fn accounts(&self, rows: &[Vec<String>]) -> Result<Vec<Account>> {
        let out = rows
            .iter()
            .enumerate()
            .map(|(i, row)| self.account(row).map_err(|e| e.at_row(i)))
            .collect::<Result<Vec<_>>>()?;
        debug!(count = out.len(), "mapped account rows");
        Ok(out)
    }

    pub fn transactions(&self, rows: &[TaggedRow], account_name: &str) -> Result<Vec<Transaction>> {
        let out = rows
            .iter()
            .enumerate()
            .map(|(i, row)| self.transaction(row, account_name).map_err(|e| e.at_row(i)))
            .collect::<Result<Vec<_>>>()?;
        debug!(
            account = account_name,
            layout = self.transactions.name,
            count = out.len(),
            "mapped transaction rows"
        );
        Ok(out)
    }
}

fn cell<'a>(row: &'a [String], column: Column, field: &'static str) -> Result<&'a str> {
    column
        .resolve(row.len())
        .and_then(|i| row.get(i))
        .map(String::as_str)
        .ok_or_else(|| ScrapeError::MissingColumn {
            field,
            column: column.to_string(),
            width: row.len(),
        })
}

fn tagged_cell<'a>(row: &'a TaggedRow, column: Column, field: &'static str) -> Result<&'a str> {
    column
        .resolve(row.width())
        .and_then(|i| row.position(i))
        .ok_or_else(|| ScrapeError::MissingColumn {
            field,
            column: column.to_string(),
            width: row.width(),
        })
}

/// The currency code is the last three characters of the cell (`"... RUB"`).
fn currency_suffix(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    let chars: Vec<char> = trimmed.chars().collect();
    if chars.len() < 3 {
        return Err(ScrapeError::MalformedCurrency {
            field: "currency",
            value: raw.to_string(),
        });
    }
    let code: String = chars[chars.len() - 3..].iter().collect();
    if !code.chars().all(char::is_alphabetic) {
        return Err(ScrapeError::MalformedCurrency {
            field: "currency",
            value: raw.to_string(),
        });
    }
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bankscrape_core::Direction;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn maps_contracts_row() {
        let row = strings(&["", "40817810200000055320", "... RUB", "", " 1 000 000 "]);
        let acc = RecordMapper::default().account(&row).unwrap();
        assert_eq!(acc.name, "40817810200000055320");
        assert_eq!(acc.currency, "RUB");
        assert_eq!(acc.balance, 1_000_000);
        assert!(acc.transactions.is_empty());
    }

    #[test]
    fn amounts_keep_only_the_leading_integer() {
        assert_eq!(parse_amount("amount", " 500 ").unwrap(), 500);
        assert_eq!(parse_amount("amount", "1\u{a0}234,56 ₽").unwrap(), 1234);
        assert_eq!(parse_amount("amount", "-70.00").unwrap(), -70);
        assert!(matches!(
            parse_amount("amount", "—"),
            Err(ScrapeError::MalformedNumber { field: "amount", .. })
        ));
        assert!(parse_amount("amount", "").is_err());
    }

    #[test]
    fn short_row_is_a_missing_column() {
        let row = strings(&["", "40817810200000055320", "... RUB"]);
        let err = RecordMapper::default().account(&row).unwrap_err();
        match err {
            ScrapeError::MissingColumn { field, column, width } => {
                assert_eq!(field, "balance");
                assert_eq!(column, "4");
                assert_eq!(width, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn currency_cell_without_code_is_rejected() {
        let row = strings(&["", "acc", "₽", "", "10"]);
        assert!(matches!(
            RecordMapper::default().account(&row),
            Err(ScrapeError::MalformedCurrency { .. })
        ));
    }

    #[test]
    fn batch_errors_carry_the_row_index() {
        let rows = vec![
            strings(&["", "a", "RUB", "", "1"]),
            strings(&["", "b", "RUB", "", "n/a"]),
        ];
        let err = RecordMapper::default().accounts(&rows).unwrap_err();
        assert!(matches!(err, ScrapeError::AtRow { row: 1, .. }));
    }

    #[test]
    fn history_withdrawal_is_negative() {
        // tag at 0, currency at 4, amount at 6, description at 7, date at 9
        let row = TaggedRow::new(
            Direction::Withdraw,
            strings(&["", "", "", "RUB", "", " 500 ", "Coffee shop", "", "16.07.2020"]),
        );

        let txn = RecordMapper::default().transaction(&row, "acc-1").unwrap();
        assert_eq!(txn.amount, -500);
        assert_eq!(txn.currency, "RUB");
        assert_eq!(txn.description, "Coffee shop");
        assert_eq!(txn.date, "16.07.2020");
        assert_eq!(txn.account_name, "acc-1");
    }

    #[test]
    fn history_deposit_is_positive() {
        let row = TaggedRow::new(
            Direction::Deposit,
            strings(&["", "", "", "USD", "", "1 200", "", "", "01.07.2020"]),
        );
        let txn = RecordMapper::default().transaction(&row, "acc-1").unwrap();
        assert_eq!(txn.amount, 1200);
        assert_eq!(txn.description, "");
        assert_eq!(txn.currency, "USD");
    }

    #[test]
    fn statement_layout_reads_from_the_end_and_maps_symbols() {
        let mapper = RecordMapper::new(TransactionLayout::STATEMENT);
        // tag, [1] id, [2] kind, [3] description, .., [-3] date, [-2] amount, [-1] balance
        let row = TaggedRow::new(
            Direction::Withdraw,
            strings(&["17", "card", "Grocery", "16.07.2020", "1 500,00 ₽", "98 500,00 ₽"]),
        );
        let txn = mapper.transaction(&row, "acc-2").unwrap();
        assert_eq!(txn.date, "16.07.2020");
        assert_eq!(txn.description, "Grocery");
        assert_eq!(txn.amount, -1500);
        assert_eq!(txn.currency, "RUB");
    }

    #[test]
    fn statement_layout_rejects_unmapped_symbol() {
        let mapper = RecordMapper::new(TransactionLayout::STATEMENT);
        let row = TaggedRow::new(
            Direction::Deposit,
            strings(&["1", "card", "Refund", "16.07.2020", "300 ¥", "0 ¥"]),
        );
        assert!(matches!(
            mapper.transaction(&row, "acc"),
            Err(ScrapeError::UnknownCurrency { ref symbol }) if symbol == "¥"
        ));

        let mapper = mapper.with_currencies(CurrencyTable::default().with_symbol('¥', "JPY"));
        assert_eq!(mapper.transaction(&row, "acc").unwrap().currency, "JPY");
    }

    #[test]
    fn layout_drift_is_structural_not_defaulted() {
        let row = TaggedRow::new(Direction::Deposit, strings(&["only", "three", "cells"]));
        let err = RecordMapper::default().transaction(&row, "acc").unwrap_err();
        assert!(matches!(err, ScrapeError::MissingColumn { field: "date", .. }));
    }
}
