//! Fragment grammar: URL fragment text to [`HistoryToken`](crate::HistoryToken).
//!
//! The parser is recursive descent over `/`-separated segments. Each level
//! recognises its keywords and delegates deeper; when a deeper level cannot
//! continue, the shallower token already understood is returned with a
//! warning. Malformed embedded values are errors and produce no token.

/// Re-exports from the diagnostics crate.
pub mod diag {
    pub use sheet_history_diagnostics::{Diagnostic, Severity, Span, codes, explain};
}

/// The recursive-descent parser.
pub mod parser;
