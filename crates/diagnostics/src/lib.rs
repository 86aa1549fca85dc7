//! Diagnostics for history token parsing.
//!
//! A fragment is never rejected outright: the parser keeps the deepest token
//! it understood and reports what it skipped as a [`Diagnostic`]. Warnings
//! mean part of the fragment was ignored; errors mean no token was produced.
//! Codes live in [`codes`] and each one has an [`explain`] entry.

#![warn(missing_docs)]

/// Diagnostic ID constants.
pub mod codes;

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// How much of the fragment survived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Severity {
    /// No token was produced.
    Error,
    /// A shallower token was produced.
    Warn,
}

impl Severity {
    /// Lower-case name, as serialised.
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warn => "warn",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Half-open byte range `[start, end)` into the fragment text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    /// First byte.
    pub start: usize,
    /// One past the last byte.
    pub end: usize,
}

impl Span {
    /// Panics if `end < start`.
    pub fn new(start: usize, end: usize) -> Self {
        assert!(end >= start, "Span end ({end}) < start ({start})");
        Self { start, end }
    }

    /// Zero-width span, used where a missing segment should have been.
    pub fn empty(pos: usize) -> Self {
        Self::new(pos, pos)
    }

    /// Number of bytes covered.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// True for zero-width spans.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The covered text, or `None` when the span does not fit `fragment`
    /// or splits a character.
    pub fn slice<'a>(&self, fragment: &'a str) -> Option<&'a str> {
        fragment.get(self.start..self.end)
    }
}

/// Why part of a fragment was ignored or rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Stable code such as `HIST1101`.
    pub id: Cow<'static, str>,
    /// Whether a token survived.
    pub severity: Severity,
    /// One-line description naming the offending segment.
    pub message: String,
    /// Where in the fragment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
    /// Structured details (`segment`, `expected`, `rest`, ...), sorted by key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<BTreeMap<String, String>>,
}

impl Diagnostic {
    /// A diagnostic without context.
    pub fn new(
        id: impl Into<Cow<'static, str>>,
        severity: Severity,
        message: impl Into<String>,
        span: Option<Span>,
    ) -> Self {
        Self {
            id: id.into(),
            severity,
            message: message.into(),
            span,
            context: None,
        }
    }

    /// An [`Severity::Error`] diagnostic.
    pub fn error(id: impl Into<Cow<'static, str>>, message: impl Into<String>, span: Option<Span>) -> Self {
        Self::new(id, Severity::Error, message, span)
    }

    /// A [`Severity::Warn`] diagnostic.
    pub fn warn(id: impl Into<Cow<'static, str>>, message: impl Into<String>, span: Option<Span>) -> Self {
        Self::new(id, Severity::Warn, message, span)
    }

    /// Replace the context map.
    pub fn with_context(mut self, ctx: BTreeMap<String, String>) -> Self {
        self.context = Some(ctx);
        self
    }

    /// The explanation for this diagnostic's code.
    pub fn explain(&self) -> Option<&'static str> {
        explain(&self.id)
    }

    /// True when no token was produced.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.id, self.message)
    }
}

/// The explanation for a diagnostic code, if known.
pub fn explain(id: &str) -> Option<&'static str> {
    codes::EXPLANATIONS
        .iter()
        .find(|(code, _)| *code == id)
        .map(|(_, text)| *text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spans() {
        let span = Span::new(3, 7);
        assert_eq!(span.len(), 4);
        assert!(!span.is_empty());
        assert_eq!(span.slice("/ff/Budget"), Some("/Bud"));
        assert_eq!(Span::new(8, 20).slice("/ff/Budget"), None);
        assert!(Span::empty(4).is_empty());
        assert_eq!(Span::empty(4).slice("/ff/"), Some(""));
    }

    #[test]
    #[should_panic(expected = "Span end (1) < start (2)")]
    fn inverted_span_panics() {
        Span::new(2, 1);
    }

    #[test]
    fn severity_names() {
        assert_eq!(Severity::Error.to_string(), "error");
        assert_eq!(Severity::Warn.to_string(), "warn");
        assert_eq!(serde_json::to_string(&Severity::Warn).unwrap(), "\"warn\"");
    }

    #[test]
    fn constructors_set_severity() {
        let error = Diagnostic::error(codes::INVALID_VALUE, "bad cell reference \"A0\"", None);
        assert!(error.is_error());
        assert_eq!(error.id, "HIST1201");

        let warning = Diagnostic::warn(codes::TRAILING_INPUT, "ignored", Some(Span::new(12, 20)));
        assert!(!warning.is_error());
        assert_eq!(warning.to_string(), "warn[HIST1103]: ignored");
    }

    #[test]
    fn every_code_is_explained_once() {
        assert_eq!(codes::EXPLANATIONS.len(), codes::ALL.len());
        for (code, (explained, _)) in codes::ALL.iter().zip(codes::EXPLANATIONS) {
            assert_eq!(code, explained, "explanations must follow code order");
            assert!(explain(code).is_some());
        }
        assert!(Diagnostic::error(codes::INVALID_TOKEN, "x", None).explain().unwrap().contains("rejected"));
        assert_eq!(explain("HIST0000"), None);
    }

    #[test]
    fn json_shape() {
        let bare = Diagnostic::warn(codes::MISSING_VALUE, "'offset' must be followed by a value", None);
        let json = serde_json::to_string(&bare).unwrap();
        assert!(!json.contains("span") && !json.contains("context"), "{json}");

        let full = Diagnostic::error(codes::MISSING_LEADING_SLASH, "no slash", Some(Span::new(0, 4)))
            .with_context(BTreeMap::from([
                ("segment".to_string(), "x".to_string()),
                ("expected".to_string(), "/".to_string()),
            ]));
        let json = serde_json::to_string(&full).unwrap();
        assert!(json.find("expected").unwrap() < json.find("segment").unwrap(), "{json}");
        assert_eq!(serde_json::from_str::<Diagnostic>(&json).unwrap(), full);
    }
}
