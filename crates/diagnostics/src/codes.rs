//! Diagnostic ID constants.
//!
//! Codes are grouped by hundreds: 10xx for the fragment as a whole, 11xx for
//! grammar recovery and 12xx for embedded values. Each has a [`crate::explain`] entry.

// ── Fragment-level (HIST10xx) ───────────────────────────────────────────

/// Fragment exceeds the configured maximum length.
pub const FRAGMENT_TOO_LONG: &str = "HIST1001";

/// Non-empty fragment does not start with `/`.
pub const MISSING_LEADING_SLASH: &str = "HIST1002";

// ── Grammar recovery (HIST11xx) ─────────────────────────────────────────

/// Unrecognised keyword; the remainder of the fragment was ignored.
pub const UNKNOWN_SEGMENT: &str = "HIST1101";

/// A keyword that requires a following segment was the last segment.
pub const MISSING_VALUE: &str = "HIST1102";

/// Input following a complete token was ignored.
pub const TRAILING_INPUT: &str = "HIST1103";

// ── Embedded values (HIST12xx) ──────────────────────────────────────────

/// An embedded reference, number or JSON value failed to parse.
pub const INVALID_VALUE: &str = "HIST1201";

/// A token factory rejected the parsed values.
pub const INVALID_TOKEN: &str = "HIST1202";

/// Every known code, in numeric order.
pub const ALL: &[&str] = &[
    FRAGMENT_TOO_LONG,
    MISSING_LEADING_SLASH,
    UNKNOWN_SEGMENT,
    MISSING_VALUE,
    TRAILING_INPUT,
    INVALID_VALUE,
    INVALID_TOKEN,
];

/// `(code, explanation)` pairs in the same order as [`ALL`].
pub(crate) const EXPLANATIONS: &[(&str, &str)] = &[
    (
        FRAGMENT_TOO_LONG,
        "The fragment is longer than the configured maximum length. Only the spreadsheet id and \
         name were read; every other segment was refused to bound parse cost.",
    ),
    (
        MISSING_LEADING_SLASH,
        "A non-empty fragment must start with '/'. No token was produced and the application \
         keeps its previous state.",
    ),
    (
        UNKNOWN_SEGMENT,
        "The segment is not a keyword recognised at this position. Parsing stopped and the \
         deepest token read so far was kept; the remainder of the fragment was ignored.",
    ),
    (
        MISSING_VALUE,
        "The keyword requires a following segment (a property name, a count, a clipboard kind) \
         but the fragment ended. The enclosing token was kept.",
    ),
    (
        TRAILING_INPUT,
        "A complete token was read but more segments followed. They were ignored.",
    ),
    (
        INVALID_VALUE,
        "An embedded value such as a cell reference, a number or a JSON payload failed to \
         parse. No token was produced.",
    ),
    (
        INVALID_TOKEN,
        "All values parsed but the token rejected them, for example a column selection under \
         'cell' or saved cells outside the selected range. No token was produced.",
    ),
];
