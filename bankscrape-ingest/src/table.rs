//! Rendered table structures and row extraction by class marker.
//!
//! A captured table is a list of rows; each row carries the class tokens of
//! its `<tr>` and the text of its `<td>` cells, in document order:
//!
//! ```text
//! <tr class="cp-item odd">  <td></td> <td>40817810200000055320</td> ...
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HtmlTable {
    #[serde(default)]
    pub rows: Vec<HtmlRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HtmlRow {
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub cells: Vec<String>,
}

impl HtmlRow {
    /// `class_attr` is the raw `class` attribute, e.g. `"cp-transaction cp-income"`.
    pub fn new<I, S>(class_attr: &str, cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            classes: class_attr.split_whitespace().map(str::to_string).collect(),
            cells: cells.into_iter().map(Into::into).collect(),
        }
    }

    /// True when `token` is one of the row's class tokens.
    pub fn has_class(&self, token: &str) -> bool {
        self.classes
            .iter()
            .flat_map(|c| c.split_whitespace())
            .any(|c| c == token)
    }

    /// Row selection: carries `include` and, if given, not `exclude`.
    pub fn matches(&self, include: &str, exclude: Option<&str>) -> bool {
        self.has_class(include) && !exclude.is_some_and(|ex| self.has_class(ex))
    }
}

impl HtmlTable {
    pub fn new(rows: Vec<HtmlRow>) -> Self {
        Self { rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Cell text of every row selected by `include`/`exclude`.
///
/// Rows left with no cells are dropped, which is how header and decoration
/// rows disappear. Row and cell order follow the source.
pub fn extract(table: &HtmlTable, include: &str, exclude: Option<&str>) -> Vec<Vec<String>> {
    let out: Vec<Vec<String>> = table
        .rows
        .iter()
        .filter(|row| row.matches(include, exclude))
        .map(|row| row.cells.clone())
        .filter(|cells| !cells.is_empty())
        .collect();

    debug!(
        include,
        exclude = exclude.unwrap_or(""),
        source_rows = table.rows.len(),
        kept = out.len(),
        "extracted table rows"
    );
    out
}

/// Drop leading header rows from a raw matrix with no class markers.
///
/// Headers hold only labels, so the data starts at the first row with a digit
/// in any cell. A matrix without digits has no data rows.
pub fn strip_header_rows(matrix: Vec<Vec<String>>) -> Vec<Vec<String>> {
    let start = matrix
        .iter()
        .position(|row| row.iter().any(|cell| cell.chars().any(|c| c.is_ascii_digit())))
        .unwrap_or(matrix.len());
    if start > 0 {
        debug!(header_rows = start, "stripped header rows");
    }
    matrix.into_iter().skip(start).collect()
}
