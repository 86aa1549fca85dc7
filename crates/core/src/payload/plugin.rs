//! Form and plugin names, and plugin upload payloads.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::HistoryTokenError;

const MAX_NAME_LEN: usize = 255;

fn check_name(what: &'static str, text: &str) -> Result<(), HistoryTokenError> {
    let valid = text.starts_with(|c: char| c.is_ascii_alphabetic())
        && text.len() <= MAX_NAME_LEN
        && text
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b'.');
    if valid {
        Ok(())
    } else {
        Err(HistoryTokenError::invalid(what, format!("{text:?} is not a valid name")))
    }
}

macro_rules! name_type {
    ($(#[$meta:meta])* $name:ident, $what:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Validate and wrap `text`.
            pub fn new(text: &str) -> Result<Self, HistoryTokenError> {
                check_name($what, text)?;
                Ok($name(text.to_owned()))
            }

            /// The name.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = HistoryTokenError;

            fn from_str(text: &str) -> Result<Self, Self::Err> {
                $name::new(text)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let text = String::deserialize(deserializer)?;
                $name::new(&text).map_err(serde::de::Error::custom)
            }
        }
    };
}

name_type!(
    /// Name of a saved form.
    FormName,
    "form name"
);

name_type!(
    /// Name of an installed plugin.
    PluginName,
    "plugin name"
);

/// A plugin archive on its way to the server: `{"name":"...","content":"..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PluginUpload {
    name: PluginName,
    /// Base64 encoded archive.
    content: String,
}

impl PluginUpload {
    /// Pair a plugin name with its encoded archive.
    pub fn new(name: PluginName, content: impl Into<String>) -> Self {
        Self {
            name,
            content: content.into(),
        }
    }

    /// The plugin name.
    pub fn name(&self) -> &PluginName {
        &self.name
    }

    /// The encoded archive.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Compact JSON as written to a fragment.
    pub fn to_json(&self) -> String {
        serde_json::json!({ "name": self.name.as_str(), "content": self.content }).to_string()
    }
}

impl FromStr for PluginUpload {
    type Err = HistoryTokenError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(text).map_err(|e| HistoryTokenError::invalid("plugin upload", e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names() {
        assert!(FormName::new("contact-form").is_ok());
        assert!(PluginName::new("Plugin.v2_beta").is_ok());
        assert!(FormName::new("").is_err());
        assert!(FormName::new("1form").is_err());
        assert!(PluginName::new("a b").is_err());
        assert!(PluginName::new("*").is_err());
    }

    #[test]
    fn upload_json() {
        let upload: PluginUpload = r#"{"name":"TestPlugin","content":"UEsDBA=="}"#.parse().unwrap();
        assert_eq!(upload.name().as_str(), "TestPlugin");
        assert_eq!(upload.to_json(), r#"{"content":"UEsDBA==","name":"TestPlugin"}"#);
        assert!(r#"{"name":"bad name","content":""}"#.parse::<PluginUpload>().is_err());
        assert!("not json".parse::<PluginUpload>().is_err());
    }
}
