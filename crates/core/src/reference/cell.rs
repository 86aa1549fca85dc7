//! Cell references and cell ranges.

use std::fmt;
use std::str::FromStr;

use crate::error::HistoryTokenError;

use super::axis::{ColumnReference, RowReference};

/// A single cell, addressed by zero-based column and row.
///
/// Ordering is column first, then row; save payloads print in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellReference {
    column: ColumnReference,
    row: RowReference,
}

impl CellReference {
    /// The top-left cell, `A1`.
    pub const HOME: CellReference = CellReference {
        column: ColumnReference::FIRST,
        row: RowReference::FIRST,
    };

    /// A cell at the given column and row.
    pub fn new(column: ColumnReference, row: RowReference) -> Self {
        Self { column, row }
    }

    /// A cell from zero-based indices.
    pub fn at(column: u32, row: u32) -> Result<Self, HistoryTokenError> {
        Ok(Self::new(ColumnReference::new(column)?, RowReference::new(row)?))
    }

    /// The column.
    pub fn column(&self) -> ColumnReference {
        self.column
    }

    /// The row.
    pub fn row(&self) -> RowReference {
        self.row
    }

    /// True for text shaped like `<letters><digits>`, whether or not it is in range.
    pub(crate) fn looks_like(text: &str) -> bool {
        let letters = text.bytes().take_while(u8::is_ascii_alphabetic).count();
        let digits = &text[letters..];
        (1..=3).contains(&letters)
            && !digits.is_empty()
            && digits.bytes().all(|b| b.is_ascii_digit())
    }
}

impl FromStr for CellReference {
    type Err = HistoryTokenError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let split = text
            .find(|c: char| !c.is_ascii_alphabetic())
            .ok_or_else(|| HistoryTokenError::invalid("cell reference", format!("{text:?} has no row")))?;
        if split == 0 {
            return Err(HistoryTokenError::invalid(
                "cell reference",
                format!("{text:?} has no column"),
            ));
        }
        let column = text[..split].parse()?;
        let row = text[split..].parse()?;
        Ok(Self::new(column, row))
    }
}

impl fmt::Display for CellReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.column, self.row)
    }
}

/// A rectangular block of cells, normalised so `begin` is the top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellRange {
    begin: CellReference,
    end: CellReference,
}

impl CellRange {
    /// The range spanned by two corner cells, in any order.
    pub fn new(a: CellReference, b: CellReference) -> Self {
        let begin = CellReference::new(a.column.min(b.column), a.row.min(b.row));
        let end = CellReference::new(a.column.max(b.column), a.row.max(b.row));
        Self { begin, end }
    }

    /// The top-left cell.
    pub fn begin(&self) -> CellReference {
        self.begin
    }

    /// The bottom-right cell.
    pub fn end(&self) -> CellReference {
        self.end
    }

    /// True when `cell` lies inside the range.
    pub fn contains(&self, cell: &CellReference) -> bool {
        (self.begin.column..=self.end.column).contains(&cell.column)
            && (self.begin.row..=self.end.row).contains(&cell.row)
    }

    /// True when `other` lies entirely inside the range.
    pub fn contains_range(&self, other: &CellRange) -> bool {
        self.contains(&other.begin) && self.contains(&other.end)
    }

    /// True when the range covers exactly one cell.
    pub fn is_single_cell(&self) -> bool {
        self.begin == self.end
    }
}

impl FromStr for CellRange {
    type Err = HistoryTokenError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let (a, b) = text
            .split_once(':')
            .ok_or_else(|| HistoryTokenError::invalid("cell range", format!("{text:?} has no ':'")))?;
        Ok(Self::new(a.parse()?, b.parse()?))
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.begin, self.end)
    }
}

impl From<CellReference> for CellRange {
    fn from(cell: CellReference) -> Self {
        Self::new(cell, cell)
    }
}
