//! The online-banking pages, seen from the scraper.
//!
//! A browser driver (login, navigation, the history date picker, waiting for
//! the table to render) sits behind [`PageSource`]. It receives a
//! [`PageRequest`] and hands back the rendered table.

use anyhow::{Context, Result, bail};
use chrono::{Datelike, NaiveDate};
use std::path::PathBuf;
use tracing::debug;

use crate::capture::load_table;
use crate::table::HtmlTable;

pub const DEMO_BASE_URL: &str = "https://demo.bank-on-line.ru/";

/// Class token on account rows of the contracts list.
pub const ACCOUNT_MARKER: &str = "cp-item";

pub const ACCOUNTS_TABLE: &str = "table#contracts-list";
pub const HISTORY_TABLE: &str = "table.cp-tran-with-balance";

/// Selection for the history page's date picker.
///
/// The picker's month list is 0-based, so July is `month_index == 6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatePick {
    pub year: i32,
    pub month_index: u32,
    pub day: u32,
}

impl DatePick {
    /// Accepts `2020-7-16` as well as `2020-07-16`.
    pub fn parse(s: &str) -> Result<Self> {
        let date = NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .with_context(|| format!("invalid date `{s}` (expected YYYY-M-D)"))?;
        Ok(Self::from(date))
    }
}

impl From<NaiveDate> for DatePick {
    fn from(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month_index: date.month0(),
            day: date.day(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    Accounts,
    History { account: String, from: DatePick },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub url: String,
    /// Element to wait for before the table is read
    pub table_locator: &'static str,
    pub page: Page,
}

/// Yields rendered tables. Implemented by a browser driver, or by
/// [`FixtureSource`] for captured pages.
pub trait PageSource {
    fn fetch(&mut self, request: &PageRequest) -> Result<HtmlTable>;
}

#[derive(Debug, Clone)]
pub struct Portal {
    base_url: String,
}

impl Default for Portal {
    fn default() -> Self {
        Self::new(DEMO_BASE_URL)
    }
}

impl Portal {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self { base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn accounts_page(&self) -> PageRequest {
        PageRequest {
            url: format!("{}#Contracts", self.base_url),
            table_locator: ACCOUNTS_TABLE,
            page: Page::Accounts,
        }
    }

    pub fn history_page(&self, account: &str, from: DatePick) -> PageRequest {
        PageRequest {
            url: format!("{}#Contracts/{}/Transactions", self.base_url, account),
            table_locator: HISTORY_TABLE,
            page: Page::History {
                account: account.to_string(),
                from,
            },
        }
    }
}

/// Serves captured tables from a directory:
///
/// ```text
/// <root>/contracts.json            accounts page
/// <root>/transactions/<name>.json  history of account <name>
/// ```
///
/// `.csv` captures are accepted in place of `.json`.
#[derive(Debug, Clone)]
pub struct FixtureSource {
    root: PathBuf,
}

impl FixtureSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn stem(&self, page: &Page) -> PathBuf {
        match page {
            Page::Accounts => self.root.join("contracts"),
            Page::History { account, .. } => self.root.join("transactions").join(account),
        }
    }
}

impl PageSource for FixtureSource {
    fn fetch(&mut self, request: &PageRequest) -> Result<HtmlTable> {
        let stem = self.stem(&request.page);
        for ext in ["json", "csv"] {
            let path = stem.with_extension(ext);
            if path.exists() {
                debug!(url = %request.url, path = %path.display(), "serving captured page");
                return load_table(&path);
            }
        }
        bail!(
            "no capture for {} (looked for {}.json/.csv)",
            request.url,
            stem.display()
        )
    }
}
