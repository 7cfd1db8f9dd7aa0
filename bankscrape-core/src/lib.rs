//! bankscrape-core: Account/Transaction records, currency codes and the shared error type

pub mod account;
pub mod currency;
pub mod error;
pub mod transaction;

pub use account::{Account, AccountField, AccountNature, AccountUpdate, UpdateMode};
pub use currency::CurrencyTable;
pub use error::{Result, ScrapeError};
pub use transaction::{Direction, Transaction};
