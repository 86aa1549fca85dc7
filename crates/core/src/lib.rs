//! Spreadsheet history tokens.
//!
//! Every navigable state of the spreadsheet editor is one immutable
//! [`HistoryToken`] with a canonical URL fragment. The main entry points are
//! [`parse_fragment`] for reading a fragment, the `set_*` methods in
//! [`transition`] for moving between tokens, and [`activate`] for running
//! the side effects of a token that has just become current.

#![warn(missing_docs)]

#[macro_use]
mod keyword;

/// Side effects run when a token becomes current.
pub mod activation;
/// Parser configuration.
pub mod config;
/// Collaborator traits implemented by the host application.
pub mod context;
/// Segment cursor used by the parser.
pub mod cursor;
/// Construction errors.
pub mod error;
/// The URL fragment primitive.
pub mod fragment;
/// Fragment grammar: parser and diagnostics.
pub mod grammar;
/// Memoised fragment parsing.
pub mod history;
/// Values carried by leaf tokens.
pub mod payload;
/// Spreadsheet reference value types.
pub mod reference;
/// The token enum and its families.
pub mod token;
/// Transitions and selection dispatch.
pub mod transition;

// ── Convenience re-exports ──────────────────────────────────────────────────
// Flat imports for the most common entry points. The full module paths
// remain available for less common types.

// Parser
pub use grammar::parser::{ParseResult, parse_fragment, parse_fragment_with, parse_str};

// Tokens
pub use token::{HistoryToken, SpreadsheetIdAndName, TokenSummary};

// Transitions
pub use transition::{Transition, selection_token};

// Activation
pub use activation::activate;
pub use context::{AppContext, Fetcher, OnFailure};

// Diagnostics (re-exported from the diagnostics crate)
pub use grammar::diag::{Diagnostic, Severity, Span, codes};

// Values
pub use error::HistoryTokenError;
pub use fragment::UrlFragment;
pub use history::FragmentMemo;

// Configuration
pub use config::{ConfigError, ParseConfig, load_config_from_str};
