//! Spreadsheet identity: id and display name.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::HistoryTokenError;

/// Longest permitted spreadsheet name.
pub const MAX_NAME_LEN: usize = 255;

/// Server-assigned spreadsheet id, printed as lower-case hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpreadsheetId(u64);

impl SpreadsheetId {
    /// Wrap a raw id.
    pub const fn new(value: u64) -> Self {
        SpreadsheetId(value)
    }

    /// The raw id.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl FromStr for SpreadsheetId {
    type Err = HistoryTokenError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        if text.is_empty() || text.len() > 16 || !text.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(HistoryTokenError::invalid(
                "spreadsheet id",
                format!("{text:?} is not hexadecimal"),
            ));
        }
        u64::from_str_radix(text, 16)
            .map(SpreadsheetId)
            .map_err(|e| HistoryTokenError::invalid("spreadsheet id", e.to_string()))
    }
}

impl fmt::Display for SpreadsheetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x}", self.0)
    }
}

/// Display name of a spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SpreadsheetName(String);

impl SpreadsheetName {
    /// Validate and wrap `text`: 1 to 255 characters, no `/`, no control characters.
    pub fn new(text: &str) -> Result<Self, HistoryTokenError> {
        let invalid = |reason: &str| {
            HistoryTokenError::invalid("spreadsheet name", format!("{text:?} {reason}"))
        };
        if text.is_empty() {
            return Err(invalid("is empty"));
        }
        if text.chars().count() > MAX_NAME_LEN {
            return Err(invalid("is too long"));
        }
        if text.chars().any(|c| c == '/' || c.is_control()) {
            return Err(invalid("contains '/' or a control character"));
        }
        Ok(SpreadsheetName(text.to_owned()))
    }

    /// The name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for SpreadsheetName {
    type Err = HistoryTokenError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        SpreadsheetName::new(text)
    }
}

impl fmt::Display for SpreadsheetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
