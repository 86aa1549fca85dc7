//! Column and row references and their ranges.

use std::fmt;
use std::str::FromStr;

use crate::error::HistoryTokenError;

/// Number of columns in a sheet (`A..=XFD`).
pub const MAX_COLUMNS: u32 = 16_384;
/// Number of rows in a sheet.
pub const MAX_ROWS: u32 = 1_048_576;

/// A zero-based column index printed as letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColumnReference(u32);

impl ColumnReference {
    /// Column `A`.
    pub const FIRST: ColumnReference = ColumnReference(0);

    /// A column from its zero-based index.
    pub fn new(index: u32) -> Result<Self, HistoryTokenError> {
        if index >= MAX_COLUMNS {
            return Err(HistoryTokenError::out_of_range("column", index));
        }
        Ok(ColumnReference(index))
    }

    /// Zero-based index.
    pub fn index(&self) -> u32 {
        self.0
    }
}

impl FromStr for ColumnReference {
    type Err = HistoryTokenError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        if text.is_empty() || text.len() > 3 || !text.bytes().all(|b| b.is_ascii_alphabetic()) {
            return Err(HistoryTokenError::invalid(
                "column reference",
                format!("{text:?} is not a column"),
            ));
        }
        let number = text
            .bytes()
            .fold(0u32, |acc, b| acc * 26 + u32::from(b.to_ascii_uppercase() - b'A') + 1);
        ColumnReference::new(number - 1)
    }
}

impl fmt::Display for ColumnReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut letters = [0u8; 3];
        let mut n = self.0 + 1;
        let mut i = letters.len();
        while n > 0 {
            i -= 1;
            let rem = (n - 1) % 26;
            letters[i] = b'A' + rem as u8;
            n = (n - 1) / 26;
        }
        // Only ASCII letters were written.
        f.write_str(std::str::from_utf8(&letters[i..]).map_err(|_| fmt::Error)?)
    }
}

/// A zero-based row index printed one-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowReference(u32);

impl RowReference {
    /// Row `1`.
    pub const FIRST: RowReference = RowReference(0);

    /// A row from its zero-based index.
    pub fn new(index: u32) -> Result<Self, HistoryTokenError> {
        if index >= MAX_ROWS {
            return Err(HistoryTokenError::out_of_range("row", index.saturating_add(1)));
        }
        Ok(RowReference(index))
    }

    /// Zero-based index.
    pub fn index(&self) -> u32 {
        self.0
    }
}

impl FromStr for RowReference {
    type Err = HistoryTokenError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) || text.starts_with('0') {
            return Err(HistoryTokenError::invalid(
                "row reference",
                format!("{text:?} is not a row"),
            ));
        }
        let number: u32 = text
            .parse()
            .map_err(|_| HistoryTokenError::out_of_range("row", text))?;
        RowReference::new(number - 1)
    }
}

impl fmt::Display for RowReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0 + 1)
    }
}

/// Generates an inclusive, normalised range type over an axis reference.
macro_rules! axis_range {
    ($(#[$meta:meta])* $name:ident, $reference:ident, $what:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name {
            begin: $reference,
            end: $reference,
        }

        impl $name {
            /// The range between two ends, in any order.
            pub fn new(a: $reference, b: $reference) -> Self {
                Self {
                    begin: a.min(b),
                    end: a.max(b),
                }
            }

            /// The lower end.
            pub fn begin(&self) -> $reference {
                self.begin
            }

            /// The upper end.
            pub fn end(&self) -> $reference {
                self.end
            }

            /// True when `reference` lies inside the range.
            pub fn contains(&self, reference: $reference) -> bool {
                (self.begin..=self.end).contains(&reference)
            }
        }

        impl FromStr for $name {
            type Err = HistoryTokenError;

            fn from_str(text: &str) -> Result<Self, Self::Err> {
                let (a, b) = text.split_once(':').ok_or_else(|| {
                    HistoryTokenError::invalid($what, format!("{text:?} has no ':'"))
                })?;
                Ok(Self::new(a.parse()?, b.parse()?))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}:{}", self.begin, self.end)
            }
        }
    };
}

axis_range!(
    /// An inclusive block of columns such as `A:C`.
    ColumnRange,
    ColumnReference,
    "column range"
);

axis_range!(
    /// An inclusive block of rows such as `1:3`.
    RowRange,
    RowReference,
    "row range"
);
