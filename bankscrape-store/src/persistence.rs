//! JSON documents on disk.
//!
//! Each store is persisted as one pretty-printed document with a single
//! top-level key. Loading never fails: a missing or unreadable file means an
//! empty store (the first run has no file yet). Saving overwrites the file
//! through a sibling `.tmp` file.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use bankscrape_core::{Result, ScrapeError};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

const TMP_SUFFIX: &str = "tmp";

/// Load `path`, or `D::default()` (the canonical empty shape) on any failure.
pub fn load_document<D>(path: &Path) -> D
where
    D: DeserializeOwned + Default,
{
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no stored document, starting empty");
            return D::default();
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "unreadable document, starting empty");
            return D::default();
        }
    };
    match serde_json::from_str(&data) {
        Ok(doc) => doc,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "corrupt document, starting empty");
            D::default()
        }
    }
}

pub fn save_document<D: Serialize>(doc: &D, path: &Path) -> Result<()> {
    let json = to_json_pretty(doc)?;
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let tmp = tmp_path(path);
    write_file(&tmp, &json)?;
    fs::rename(&tmp, path)?;
    debug!(path = %path.display(), bytes = json.len(), "saved document");
    Ok(())
}

pub fn to_json_pretty<D: Serialize>(doc: &D) -> Result<String> {
    serde_json::to_string_pretty(doc).map_err(|err| ScrapeError::Serde(err.to_string()))
}

/// `accounts.json` -> `accounts.json.tmp`
fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".");
    name.push(TMP_SUFFIX);
    path.with_file_name(name)
}

fn write_file(path: &Path, data: &str) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.sync_all()?;
    Ok(())
}
