//! Tag extracted history rows with their direction.

use bankscrape_core::Direction;

use crate::table::{HtmlTable, extract};

/// Class token on every history row.
pub const TRANSACTION_MARKER: &str = "cp-transaction";
/// Class token that marks incoming money.
pub const INCOME_MARKER: &str = "cp-income";

/// An extracted row with its direction tag in front.
///
/// Layout positions count the tag as position 0, so `cells[0]` sits at
/// position 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedRow {
    pub direction: Direction,
    pub cells: Vec<String>,
}

impl TaggedRow {
    pub fn new(direction: Direction, cells: Vec<String>) -> Self {
        Self { direction, cells }
    }

    /// Number of positions, tag included.
    pub fn width(&self) -> usize {
        self.cells.len() + 1
    }

    /// Text at a layout position; position 0 is the tag.
    pub fn position(&self, index: usize) -> Option<&str> {
        match index {
            0 => Some(self.direction.as_str()),
            i => self.cells.get(i - 1).map(String::as_str),
        }
    }
}

/// Tag two separately extracted matrices and concatenate them: every deposit
/// row first, then every withdrawal row, each block in extraction order.
pub fn classify(deposits: Vec<Vec<String>>, withdrawals: Vec<Vec<String>>) -> Vec<TaggedRow> {
    deposits
        .into_iter()
        .map(|cells| TaggedRow::new(Direction::Deposit, cells))
        .chain(
            withdrawals
                .into_iter()
                .map(|cells| TaggedRow::new(Direction::Withdraw, cells)),
        )
        .collect()
}

/// Two-pass classification of a history table: `cp-income` rows are
/// deposits, `cp-transaction` rows without `cp-income` are withdrawals.
pub fn classify_history(table: &HtmlTable) -> Vec<TaggedRow> {
    let deposits = extract(table, INCOME_MARKER, None);
    let withdrawals = extract(table, TRANSACTION_MARKER, Some(INCOME_MARKER));
    classify(deposits, withdrawals)
}

/// Single-pass variant: each row is tagged from its own class tokens while
/// walking the table, so rows keep their page order.
pub fn classify_in_page_order(table: &HtmlTable) -> Vec<TaggedRow> {
    table
        .rows
        .iter()
        .filter(|row| !row.cells.is_empty())
        .filter_map(|row| {
            let direction = if row.has_class(INCOME_MARKER) {
                Direction::Deposit
            } else if row.has_class(TRANSACTION_MARKER) {
                Direction::Withdraw
            } else {
                return None;
            };
            Some(TaggedRow::new(direction, row.cells.clone()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::HtmlRow;

    fn rows(values: &[&str]) -> Vec<Vec<String>> {
        values.iter().map(|v| vec![v.to_string()]).collect()
    }

    fn table() -> HtmlTable {
        HtmlTable::new(vec![
            HtmlRow::new("head", ["Date"]),
            HtmlRow::new("cp-transaction", ["w1"]),
            HtmlRow::new("cp-transaction cp-income", ["d1"]),
            HtmlRow::new("cp-transaction", ["w2"]),
            HtmlRow::new("cp-income", ["d2"]),
        ])
    }

    #[test]
    fn deposits_come_before_withdrawals() {
        let tagged = classify(rows(&["d1", "d2"]), rows(&["w1"]));
        let order: Vec<_> = tagged
            .iter()
            .map(|r| (r.direction, r.cells[0].as_str()))
            .collect();
        assert_eq!(
            order,
            vec![
                (Direction::Deposit, "d1"),
                (Direction::Deposit, "d2"),
                (Direction::Withdraw, "w1"),
            ]
        );
    }

    #[test]
    fn position_zero_is_the_tag() {
        let row = TaggedRow::new(Direction::Withdraw, vec!["a".into(), "b".into()]);
        assert_eq!(row.position(0), Some("withdraw"));
        assert_eq!(row.position(2), Some("b"));
        assert_eq!(row.position(3), None);
        assert_eq!(row.width(), 3);
    }

    #[test]
    fn history_table_splits_by_marker() {
        let tagged = classify_history(&table());
        let cells: Vec<_> = tagged.iter().map(|r| r.cells[0].as_str()).collect();
        assert_eq!(cells, vec!["d1", "d2", "w1", "w2"]);
        assert_eq!(tagged[2].direction, Direction::Withdraw);
    }

    #[test]
    fn page_order_variant_tags_the_same_rows() {
        let tagged = classify_in_page_order(&table());
        let cells: Vec<_> = tagged
            .iter()
            .map(|r| (r.direction, r.cells[0].as_str()))
            .collect();
        assert_eq!(
            cells,
            vec![
                (Direction::Withdraw, "w1"),
                (Direction::Deposit, "d1"),
                (Direction::Withdraw, "w2"),
                (Direction::Deposit, "d2"),
            ]
        );

        let mut a = classify_history(&table());
        let mut b = tagged;
        a.sort_by(|x, y| x.cells.cmp(&y.cells));
        b.sort_by(|x, y| x.cells.cmp(&y.cells));
        assert_eq!(a, b);
    }
}
