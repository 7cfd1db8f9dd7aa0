//! Transaction records and the direction tag that decides their sign

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ScrapeError;

/// Direction of a movement, taken from the row marker the page put on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Deposit,
    Withdraw,
}

impl Direction {
    /// The literal tag placed in front of a classified row.
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Deposit => "deposit",
            Direction::Withdraw => "withdraw",
        }
    }

    /// Signed amount for a scraped magnitude: deposits stay positive,
    /// withdrawals are negated.
    pub fn signed(&self, magnitude: i64) -> i64 {
        let magnitude = magnitude.saturating_abs();
        match self {
            Direction::Deposit => magnitude,
            Direction::Withdraw => -magnitude,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = ScrapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "deposit" => Ok(Direction::Deposit),
            "withdraw" => Ok(Direction::Withdraw),
            other => Err(ScrapeError::InvalidValue {
                field: "direction",
                value: other.to_string(),
            }),
        }
    }
}

/// A single signed movement attributed to one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Date exactly as the page shows it
    pub date: String,
    #[serde(default)]
    pub description: String,
    /// Negative = withdrawal, positive = deposit
    pub amount: i64,
    pub currency: String,
    /// Name of the owning account; not checked against the account store
    pub account_name: String,
}

impl Transaction {
    pub fn new(
        date: impl Into<String>,
        amount: i64,
        currency: impl Into<String>,
        account_name: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            description: String::new(),
            amount,
            currency: currency.into(),
            account_name: account_name.into(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn is_withdrawal(&self) -> bool {
        self.amount < 0
    }

    pub fn is_deposit(&self) -> bool {
        self.amount > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn withdraw_negates_and_deposit_keeps_positive() {
        assert_eq!(Direction::Withdraw.signed(500), -500);
        assert_eq!(Direction::Deposit.signed(500), 500);
        // a magnitude that already carries a minus sign cannot flip a deposit
        assert_eq!(Direction::Deposit.signed(-70), 70);
        assert_eq!(Direction::Withdraw.signed(-70), -70);
        assert_eq!(Direction::Withdraw.signed(0), 0);
    }

    #[test]
    fn direction_tags_round_trip_through_text() {
        assert_eq!("deposit".parse::<Direction>().unwrap(), Direction::Deposit);
        assert_eq!(Direction::Withdraw.to_string(), "withdraw");
        assert!("refund".parse::<Direction>().is_err());
    }

    #[test]
    fn transaction_serializes_with_flat_keys() {
        let txn = Transaction::new("16.07.2020", -500, "RUB", "40817810200000055320")
            .with_description("Coffee");
        let json = serde_json::to_value(&txn).unwrap();
        assert_eq!(json["account_name"], "40817810200000055320");
        assert_eq!(json["amount"], -500);
        assert!(txn.is_withdrawal());
    }

    #[test]
    fn missing_description_defaults_to_empty() {
        let txn: Transaction = serde_json::from_str(
            r#"{"date":"01.01.2020","amount":10,"currency":"USD","account_name":"A"}"#,
        )
        .unwrap();
        assert_eq!(txn.description, "");
        assert!(txn.is_deposit());
    }
}
