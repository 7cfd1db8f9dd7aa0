//! Read captured pages from disk.
//!
//! Two capture shapes are supported:
//! - JSON: `{"rows": [{"classes": ["cp-item"], "cells": ["", "4081...", ...]}]}`
//! - CSV: one table row per line, column 0 holds the row's class attribute
//!   (`"cp-transaction cp-income",16.07.2020,...`)
//!
//! A raw matrix (CSV without a class column) is what a plain text dump of
//! the table gives; it carries no markers and still has its header rows.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::table::{HtmlRow, HtmlTable};

pub fn load_table_json(path: impl AsRef<Path>) -> Result<HtmlTable> {
    let path = path.as_ref();
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

pub fn load_table_csv(path: impl AsRef<Path>) -> Result<HtmlTable> {
    let rows = load_matrix_csv(path)?;
    Ok(HtmlTable::new(
        rows.into_iter()
            .filter_map(|mut cells| {
                if cells.is_empty() {
                    return None;
                }
                let classes = cells.remove(0);
                Some(HtmlRow::new(&classes, cells))
            })
            .collect(),
    ))
}

/// Pick the loader from the file extension (`.csv`, anything else is JSON).
pub fn load_table(path: impl AsRef<Path>) -> Result<HtmlTable> {
    let path = path.as_ref();
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("csv") => load_table_csv(path),
        _ => load_table_json(path),
    }
}

pub fn load_matrix_csv(path: impl AsRef<Path>) -> Result<Vec<Vec<String>>> {
    let path = path.as_ref();
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result.with_context(|| format!("reading {}", path.display()))?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn csv_capture_keeps_classes_and_cells() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.csv");
        fs::write(
            &path,
            "head,Date,Amount\n\"cp-transaction cp-income\",16.07.2020,1 000\ncp-transaction,17.07.2020\n",
        )
        .unwrap();

        let table = load_table(&path).unwrap();
        assert_eq!(table.rows.len(), 3);
        assert!(table.rows[1].has_class("cp-income"));
        assert_eq!(table.rows[1].cells, vec!["16.07.2020", "1 000"]);
        assert_eq!(table.rows[2].cells.len(), 1);
    }

    #[test]
    fn json_capture_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("contracts.json");
        let table = HtmlTable::new(vec![HtmlRow::new("cp-item", ["", "acc", "RUB"])]);
        fs::write(&path, serde_json::to_string(&table).unwrap()).unwrap();

        assert_eq!(load_table(&path).unwrap(), table);
    }

    #[test]
    fn missing_capture_names_the_file() {
        let err = load_table_json("/nonexistent/contracts.json").unwrap_err();
        assert!(err.to_string().contains("contracts.json"));
    }
}
