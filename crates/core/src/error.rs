//! Typed error for rejected token construction.

use thiserror::Error;

/// Why a token or one of its values could not be constructed.
///
/// Every variant is an invalid-argument condition: factories reject rather
/// than coerce. Parsing never surfaces this type directly; the parser turns
/// it into a diagnostic and yields no token.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryTokenError {
    /// A textual value failed its own grammar (reference, number, JSON, ...).
    #[error("invalid {what}: {reason}")]
    InvalidValue {
        /// What was being parsed, e.g. `"cell reference"`.
        what: &'static str,
        /// Human-readable reason.
        reason: String,
    },

    /// The selection kind is not permitted for this token family.
    #[error("{token} does not accept a {selection} selection")]
    SelectionKind {
        /// The token family, e.g. `"cell"`.
        token: &'static str,
        /// The rejected selection kind, e.g. `"column-range"`.
        selection: &'static str,
    },

    /// The anchor does not fit the selection.
    #[error("anchor {anchor} is not valid for {selection}")]
    Anchor {
        /// The rejected anchor.
        anchor: String,
        /// The selection it was paired with.
        selection: String,
    },

    /// A number or bound is outside its permitted range.
    #[error("{what} out of range: {value}")]
    OutOfRange {
        /// The field, e.g. `"count"`.
        what: &'static str,
        /// The offending value, as text.
        value: String,
    },

    /// A save payload addresses cells outside the selection.
    #[error("{cell} is outside the selection {selection}")]
    OutsideSelection {
        /// The first offending reference.
        cell: String,
        /// The addressed selection.
        selection: String,
    },

    /// Sort comparators reference columns/rows that do not fit the selection.
    #[error("sort comparators {comparators} are not valid for {selection}")]
    Comparators {
        /// The comparator list as text.
        comparators: String,
        /// The addressed selection.
        selection: String,
    },

    /// The selection cannot be frozen.
    #[error("{selection} cannot be frozen: it must start at the first column and row")]
    Freeze {
        /// The rejected selection.
        selection: String,
    },

    /// A read-only metadata property was given a value.
    #[error("metadata property {0} is read only")]
    ReadOnly(String),

    /// A label mapping that targets its own label.
    #[error("label {0} cannot map to itself")]
    SelfMapping(String),
}

impl HistoryTokenError {
    pub(crate) fn invalid(what: &'static str, reason: impl Into<String>) -> Self {
        HistoryTokenError::InvalidValue {
            what,
            reason: reason.into(),
        }
    }

    pub(crate) fn out_of_range(what: &'static str, value: impl ToString) -> Self {
        HistoryTokenError::OutOfRange {
            what,
            value: value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_values() {
        let e = HistoryTokenError::SelectionKind {
            token: "cell",
            selection: "column",
        };
        assert_eq!(e.to_string(), "cell does not accept a column selection");

        let e = HistoryTokenError::OutsideSelection {
            cell: "B9".into(),
            selection: "A1:A1".into(),
        };
        assert_eq!(e.to_string(), "B9 is outside the selection A1:A1");

        let e = HistoryTokenError::out_of_range("count", -1);
        assert_eq!(e.to_string(), "count out of range: -1");
    }
}
