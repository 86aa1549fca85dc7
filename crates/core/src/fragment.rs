//! The URL fragment value type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An immutable, `/`-delimited path string as stored in the address-bar hash.
///
/// Content is stored verbatim: no normalisation, no percent-decoding. Callers
/// are responsible for slash placement. Equality and hashing are by content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UrlFragment(String);

impl UrlFragment {
    /// The empty fragment.
    pub const EMPTY: UrlFragment = UrlFragment(String::new());

    /// A fragment holding exactly `text`.
    pub fn with(text: impl Into<String>) -> Self {
        UrlFragment(text.into())
    }

    /// Alias for [`UrlFragment::with`]; fragments read from the address bar.
    pub fn parse(text: &str) -> Self {
        UrlFragment(text.to_owned())
    }

    /// A single `/`.
    pub fn slash() -> Self {
        UrlFragment("/".to_owned())
    }

    /// The fragment text.
    pub fn value(&self) -> &str {
        &self.0
    }

    /// True when the fragment has no characters.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// This fragment followed directly by `other`.
    #[must_use]
    pub fn append(&self, other: &UrlFragment) -> UrlFragment {
        if other.is_empty() {
            return self.clone();
        }
        let mut text = String::with_capacity(self.0.len() + other.0.len());
        text.push_str(&self.0);
        text.push_str(&other.0);
        UrlFragment(text)
    }

    /// This fragment, a `/`, then `other`.
    #[must_use]
    pub fn append_slash_then(&self, other: &UrlFragment) -> UrlFragment {
        let mut text = String::with_capacity(self.0.len() + 1 + other.0.len());
        text.push_str(&self.0);
        text.push('/');
        text.push_str(&other.0);
        UrlFragment(text)
    }

    /// Consume into the owned text.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for UrlFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UrlFragment {
    fn from(text: &str) -> Self {
        UrlFragment::with(text)
    }
}

impl From<String> for UrlFragment {
    fn from(text: String) -> Self {
        UrlFragment(text)
    }
}

impl AsRef<str> for UrlFragment {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Incrementally builds fragment text; used by every token's serialiser.
#[derive(Debug, Default)]
pub(crate) struct FragmentBuilder {
    text: String,
}

impl FragmentBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Push `/` then `segment`.
    pub(crate) fn segment(&mut self, segment: impl fmt::Display) -> &mut Self {
        use fmt::Write;
        self.text.push('/');
        // Writing to a String cannot fail.
        let _ = write!(self.text, "{segment}");
        self
    }

    /// Push `/` followed by each segment in turn.
    pub(crate) fn segments<I, S>(&mut self, segments: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: fmt::Display,
    {
        for s in segments {
            self.segment(s);
        }
        self
    }

    /// Push raw text with no separator.
    pub(crate) fn raw(&mut self, text: &str) -> &mut Self {
        self.text.push_str(text);
        self
    }

    pub(crate) fn build(&mut self) -> UrlFragment {
        if self.text.is_empty() {
            return UrlFragment::slash();
        }
        UrlFragment(std::mem::take(&mut self.text))
    }
}
