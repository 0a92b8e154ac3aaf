use std::cmp::Ordering;

use super::record::Record;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn from_ascending(ascending: bool) -> Self {
        if ascending { Self::Ascending } else { Self::Descending }
    }
}

impl Default for SortOrder {
    fn default() -> Self {
        Self::Ascending
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ColumnKind {
    Numeric,
    Text,
}

/// `digits` or `digits.digits`, nothing else.
pub fn is_plain_number(value: &str) -> bool {
    let (whole, fraction) = match value.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (value, None),
    };
    !whole.is_empty()
        && whole.bytes().all(|b| b.is_ascii_digit())
        && fraction.map_or(true, |f| !f.is_empty() && f.bytes().all(|b| b.is_ascii_digit()))
}

/// A column is numeric when it holds at least one value and every
/// non-empty value is a plain number.
pub fn column_kind(records: &[Record], column: &str) -> ColumnKind {
    let mut seen = false;
    for value in records.iter().map(|r| r.get(column).unwrap_or("")) {
        if value.is_empty() {
            continue;
        }
        if !is_plain_number(value) {
            return ColumnKind::Text;
        }
        seen = true;
    }
    if seen { ColumnKind::Numeric } else { ColumnKind::Text }
}

// Whole digits compared by magnitude so arbitrarily long ids never overflow.
fn compare_numbers(a: &str, b: &str) -> Ordering {
    let (a_whole, a_fraction) = a.split_once('.').unwrap_or((a, ""));
    let (b_whole, b_fraction) = b.split_once('.').unwrap_or((b, ""));
    let a_whole = a_whole.trim_start_matches('0');
    let b_whole = b_whole.trim_start_matches('0');
    a_whole.len().cmp(&b_whole.len())
        .then_with(|| a_whole.cmp(b_whole))
        .then_with(|| {
            let a_fraction = a_fraction.trim_end_matches('0');
            let b_fraction = b_fraction.trim_end_matches('0');
            a_fraction.cmp(b_fraction)
        })
}

pub fn compare_values(kind: ColumnKind, a: &str, b: &str) -> Ordering {
    match kind {
        ColumnKind::Text => a.as_bytes().cmp(b.as_bytes()),
        ColumnKind::Numeric => match (a.is_empty(), b.is_empty()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => compare_numbers(a, b),
        },
    }
}

/// Stable sort. Descending inverts the comparison, so ties stay in file
/// order either way.
pub fn sort_records(records: &mut [Record], column: &str, order: SortOrder) {
    let kind = column_kind(records, column);
    records.sort_by(|a, b| {
        let ordering = compare_values(kind, a.get(column).unwrap_or(""), b.get(column).unwrap_or(""));
        match order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::record::{Schema, ROLLNO, NAME};

    fn records(rows: &[[&str; 5]]) -> Vec<Record> {
        let schema = Schema::canonical();
        rows.iter().map(|row| Record::from_row(&schema, row.iter().copied())).collect()
    }

    fn column(records: &[Record], column: &str) -> Vec<String> {
        records.iter().map(|r| r.get(column).unwrap_or("").to_string()).collect()
    }

    #[test]
    fn plain_numbers() {
        assert!(is_plain_number("10"));
        assert!(is_plain_number("007"));
        assert!(is_plain_number("83.33"));
        assert!(!is_plain_number(""));
        assert!(!is_plain_number("1."));
        assert!(!is_plain_number(".5"));
        assert!(!is_plain_number("-3"));
        assert!(!is_plain_number("1e3"));
        assert!(!is_plain_number("A1"));
    }

    #[test]
    fn digit_ids_descend_numerically() {
        let mut set = records(&[
            ["1", "a", "1", "1", "1"],
            ["2", "b", "1", "1", "1"],
            ["10", "c", "1", "1", "1"],
        ]);
        sort_records(&mut set, ROLLNO, SortOrder::Descending);
        assert_eq!(column(&set, ROLLNO), vec!["10", "2", "1"]);
        sort_records(&mut set, ROLLNO, SortOrder::Ascending);
        assert_eq!(column(&set, ROLLNO), vec!["1", "2", "10"]);
    }

    #[test]
    fn mixed_column_falls_back_to_bytes() {
        let mut set = records(&[
            ["10", "a", "1", "1", "1"],
            ["B2", "b", "1", "1", "1"],
            ["2", "c", "1", "1", "1"],
        ]);
        assert_eq!(column_kind(&set, ROLLNO), ColumnKind::Text);
        sort_records(&mut set, ROLLNO, SortOrder::Ascending);
        assert_eq!(column(&set, ROLLNO), vec!["10", "2", "B2"]);
    }

    #[test]
    fn text_is_case_sensitive() {
        let mut set = records(&[
            ["1", "bob", "1", "1", "1"],
            ["2", "Zed", "1", "1", "1"],
            ["3", "Amy", "1", "1", "1"],
        ]);
        sort_records(&mut set, NAME, SortOrder::Ascending);
        assert_eq!(column(&set, NAME), vec!["Amy", "Zed", "bob"]);
    }

    #[test]
    fn ties_keep_file_order_both_ways() {
        let mut set = records(&[
            ["1", "x", "50", "1", "1"],
            ["2", "y", "60", "1", "1"],
            ["3", "z", "50", "1", "1"],
        ]);
        sort_records(&mut set, "english", SortOrder::Ascending);
        assert_eq!(column(&set, ROLLNO), vec!["1", "3", "2"]);

        let mut set = records(&[
            ["1", "x", "50", "1", "1"],
            ["2", "y", "60", "1", "1"],
            ["3", "z", "50", "1", "1"],
        ]);
        sort_records(&mut set, "english", SortOrder::Descending);
        assert_eq!(column(&set, ROLLNO), vec!["2", "1", "3"]);
    }

    #[test]
    fn decimals_and_blanks() {
        assert_eq!(compare_values(ColumnKind::Numeric, "100.0", "80.0"), Ordering::Greater);
        assert_eq!(compare_values(ColumnKind::Numeric, "72.5", "72.50"), Ordering::Equal);
        assert_eq!(compare_values(ColumnKind::Numeric, "72.05", "72.5"), Ordering::Less);
        assert_eq!(compare_values(ColumnKind::Numeric, "", "0"), Ordering::Less);
        assert_eq!(compare_values(ColumnKind::Numeric, "0010", "9"), Ordering::Greater);
    }
}
