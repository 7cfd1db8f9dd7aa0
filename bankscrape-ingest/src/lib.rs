//! bankscrape-ingest: captured bank pages → typed records.
//!
//! Pipeline: [`table::extract`] pulls marked rows out of a rendered table,
//! [`classify`] tags history rows with a direction, and [`RecordMapper`]
//! reads the columns of a named [`layout`] into Account/Transaction values.

pub mod capture;
pub mod classify;
pub mod layout;
pub mod mapper;
pub mod portal;
pub mod table;

pub use classify::{TaggedRow, classify, classify_history, classify_in_page_order};
pub use layout::{AccountLayout, Column, CurrencySource, TransactionLayout};
pub use mapper::{RecordMapper, parse_amount};
pub use portal::{DatePick, FixtureSource, PageRequest, PageSource, Portal};
pub use table::{HtmlRow, HtmlTable, extract, strip_header_rows};
