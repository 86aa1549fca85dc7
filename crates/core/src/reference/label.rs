//! Label names, label mappings and the references a label may stand for.

use std::fmt;
use std::str::FromStr;

use crate::error::HistoryTokenError;

use super::cell::{CellRange, CellReference};

/// Longest permitted label name.
pub const MAX_LABEL_LEN: usize = 255;

/// A named alias for a cell, range or another label.
///
/// Names start with an ASCII letter or `_`, continue with letters, digits,
/// `_` or `.`, and must not look like a cell reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LabelName(String);

impl LabelName {
    /// Validate and wrap `text`.
    pub fn new(text: &str) -> Result<Self, HistoryTokenError> {
        let invalid = |reason: &str| HistoryTokenError::invalid("label", format!("{text:?} {reason}"));
        let mut chars = text.chars();
        match chars.next() {
            None => return Err(invalid("is empty")),
            Some(c) if !(c.is_ascii_alphabetic() || c == '_') => {
                return Err(invalid("must start with a letter or '_'"));
            }
            Some(_) => {}
        }
        if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.') {
            return Err(invalid("contains an invalid character"));
        }
        if text.len() > MAX_LABEL_LEN {
            return Err(invalid("is too long"));
        }
        if CellReference::looks_like(text) {
            return Err(invalid("looks like a cell reference"));
        }
        Ok(LabelName(text.to_owned()))
    }

    /// The name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for LabelName {
    type Err = HistoryTokenError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        LabelName::new(text)
    }
}

impl fmt::Display for LabelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Anything a formula or label may refer to: a cell, a range, or a label.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExpressionReference {
    /// A single cell.
    Cell(CellReference),
    /// A block of cells.
    CellRange(CellRange),
    /// Another label.
    Label(LabelName),
}

impl FromStr for ExpressionReference {
    type Err = HistoryTokenError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        if text.contains(':') {
            return text.parse().map(ExpressionReference::CellRange);
        }
        if CellReference::looks_like(text) {
            return text.parse().map(ExpressionReference::Cell);
        }
        LabelName::new(text).map(ExpressionReference::Label)
    }
}

impl fmt::Display for ExpressionReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpressionReference::Cell(c) => c.fmt(f),
            ExpressionReference::CellRange(r) => r.fmt(f),
            ExpressionReference::Label(l) => l.fmt(f),
        }
    }
}

/// A label and the reference it is being saved as.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LabelMapping {
    label: LabelName,
    target: ExpressionReference,
}

impl LabelMapping {
    /// Pair a label with its target; a label may not target itself.
    pub fn new(label: LabelName, target: ExpressionReference) -> Result<Self, HistoryTokenError> {
        if let ExpressionReference::Label(other) = &target
            && *other == label
        {
            return Err(HistoryTokenError::SelfMapping(label.to_string()));
        }
        Ok(Self { label, target })
    }

    /// The label being mapped.
    pub fn label(&self) -> &LabelName {
        &self.label
    }

    /// What the label resolves to.
    pub fn target(&self) -> &ExpressionReference {
        &self.target
    }
}
