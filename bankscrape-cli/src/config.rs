use anyhow::{Context, Result};
use bankscrape_ingest::portal::DEMO_BASE_URL;
use bankscrape_ingest::{DatePick, Portal};
use bankscrape_store::StorePaths;
use bankscrape_store::paths::{ACCOUNTS_FILE, TRANSACTIONS_FILE};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "bankscrape.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageSection,
    #[serde(default)]
    pub portal: PortalSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSection {
    /// Relative paths resolve against the working directory
    pub accounts_path: PathBuf,
    pub transactions_path: PathBuf,
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            accounts_path: PathBuf::from(ACCOUNTS_FILE),
            transactions_path: PathBuf::from(TRANSACTIONS_FILE),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalSection {
    pub base_url: String,
    /// First day of the history window, `YYYY-M-D`
    pub history_from: String,
}

impl Default for PortalSection {
    fn default() -> Self {
        Self {
            base_url: DEMO_BASE_URL.to_string(),
            history_from: "2020-7-16".to_string(),
        }
    }
}

impl Config {
    pub fn store_paths(&self) -> StorePaths {
        StorePaths::new(&self.storage.accounts_path, &self.storage.transactions_path)
    }

    pub fn portal(&self) -> Portal {
        Portal::new(&self.portal.base_url)
    }

    pub fn history_from(&self) -> Result<DatePick> {
        DatePick::parse(&self.portal.history_from).context("portal.history_from")
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

pub fn save_config(path: &Path, cfg: &Config) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        println!("Config already exists: {}", path.display());
        return Ok(());
    }
    save_config(path, &Config::default())?;
    println!("Wrote {}", path.display());
    Ok(())
}
