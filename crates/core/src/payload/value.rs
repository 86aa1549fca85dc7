//! Value types, locales and currencies.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::HistoryTokenError;

keyword_enum! {
    /// The type a cell value editor is showing.
    pub enum ValueTypeName ("value type") {
        /// `true`/`false`.
        Boolean => "boolean",
        /// A calendar date.
        Date => "date",
        /// A date and time.
        DateTime => "date-time",
        /// A number.
        Number => "number",
        /// Plain text.
        Text => "text",
        /// A time of day.
        Time => "time",
    }
}

impl ValueTypeName {
    /// True when `value` has the JSON shape this type is saved as.
    pub fn accepts(&self, value: &serde_json::Value) -> bool {
        match self {
            ValueTypeName::Boolean => value.is_boolean(),
            ValueTypeName::Number => value.is_number(),
            ValueTypeName::Date
            | ValueTypeName::DateTime
            | ValueTypeName::Text
            | ValueTypeName::Time => value.is_string(),
        }
    }
}

/// A language tag: `en` or `en-AU`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Locale(String);

impl Locale {
    /// The tag.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Locale {
    type Err = HistoryTokenError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let (language, region) = match text.split_once('-') {
            Some((l, r)) => (l, Some(r)),
            None => (text, None),
        };
        let language_ok = (2..=3).contains(&language.len())
            && language.bytes().all(|b| b.is_ascii_lowercase());
        let region_ok = region.is_none_or(|r| {
            (r.len() == 2 && r.bytes().all(|b| b.is_ascii_uppercase()))
                || (r.len() == 3 && r.bytes().all(|b| b.is_ascii_digit()))
        });
        if !(language_ok && region_ok) {
            return Err(HistoryTokenError::invalid(
                "locale",
                format!("{text:?} is not a language tag"),
            ));
        }
        Ok(Locale(text.to_owned()))
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A three letter ISO 4217 currency code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Currency(String);

impl Currency {
    /// The code.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Currency {
    type Err = HistoryTokenError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        if text.len() != 3 || !text.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(HistoryTokenError::invalid(
                "currency",
                format!("{text:?} is not a currency code"),
            ));
        }
        Ok(Currency(text.to_owned()))
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
