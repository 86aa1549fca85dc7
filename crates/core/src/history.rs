//! Memoised fragment parsing.
//!
//! The browser reports the address bar on every navigation event, and
//! most of those repeat the previous fragment. [`FragmentMemo`] keeps the
//! last input and its parse so repeats cost a string comparison.

use crate::config::ParseConfig;
use crate::fragment::UrlFragment;
use crate::grammar::parser::{ParseResult, parse_fragment_with};
use crate::token::HistoryToken;

/// The last fragment seen and what it parsed to.
#[derive(Debug, Clone, Default)]
pub struct FragmentMemo {
    config: ParseConfig,
    last: Option<(String, ParseResult)>,
}

impl FragmentMemo {
    /// An empty memo using `config` for every parse.
    pub fn new(config: ParseConfig) -> Self {
        Self { config, last: None }
    }

    /// Parse `fragment`, reusing the previous result when the text is unchanged.
    pub fn parse(&mut self, fragment: &str) -> &ParseResult {
        if self.last.as_ref().is_some_and(|(text, _)| text != fragment) {
            self.last = None;
        }
        let config = &self.config;
        let (_, result) = self.last.get_or_insert_with(|| {
            let result = parse_fragment_with(&UrlFragment::with(fragment), config);
            (fragment.to_owned(), result)
        });
        result
    }

    /// The token for `fragment`, or `fallback` when it does not parse.
    pub fn token_or(&mut self, fragment: &str, fallback: &HistoryToken) -> HistoryToken {
        match &self.parse(fragment).token {
            Some(token) => token.clone(),
            None => {
                tracing::debug!(fragment, fallback = %fallback, "unparseable fragment");
                fallback.clone()
            }
        }
    }

    /// The fragment parsed most recently.
    pub fn last_fragment(&self) -> Option<&str> {
        self.last.as_ref().map(|(text, _)| text.as_str())
    }

    /// Forget the last parse.
    pub fn clear(&mut self) {
        self.last = None;
    }
}
