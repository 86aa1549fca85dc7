//! WASM bindings for spreadsheet history tokens.
//!
//! Exposes fragment parsing, canonicalisation, clear-action and diagnostic
//! explanations to the browser host via `wasm-bindgen`. Structured results
//! are returned as native JS objects using `serde-wasm-bindgen`.

use wasm_bindgen::prelude::*;

use sheet_history_core::grammar::diag;
use sheet_history_core::{
    FragmentMemo, HistoryToken, ParseConfig, ParseResult, UrlFragment, load_config_from_str,
    parse_fragment_with,
};

// ── Public API ──────────────────────────────────────────────────────────

/// Parse a fragment and return `{ token, diagnostics }`.
///
/// `config_json` is an optional parser configuration such as
/// `{"max_fragment_len": 4096}`.
#[wasm_bindgen]
pub fn parse(fragment: &str, config_json: Option<String>) -> Result<JsValue, JsError> {
    let config = resolve_config(config_json.as_deref()).map_err(|e| JsError::new(&e))?;
    to_js(&parse_with(fragment, &config))
}

/// The canonical form of a fragment, or `null` when it does not parse.
#[wasm_bindgen]
pub fn canonicalize(fragment: &str) -> Option<String> {
    canonical_text(fragment)
}

/// The fragment the editor returns to when the current action is
/// cancelled, or `null` when the input does not parse.
#[wasm_bindgen(js_name = "clearAction")]
pub fn clear_action(fragment: &str) -> Option<String> {
    cleared_text(fragment)
}

/// Explain a diagnostic code (e.g., "HIST1201").
///
/// Returns the explanation string, or `null` if unknown.
#[wasm_bindgen]
pub fn explain(id: &str) -> Option<String> {
    diag::explain(id).map(str::to_string)
}

// ── Fragment cache ──────────────────────────────────────────────────────

/// Remembers the last fragment the address bar reported.
///
/// Hosts call `tokenOr` from every `hashchange` event; repeats of the
/// previous fragment are answered without parsing.
#[wasm_bindgen]
pub struct FragmentCache {
    memo: FragmentMemo,
}

#[wasm_bindgen]
impl FragmentCache {
    /// A cache using the optional JSON parser configuration.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<FragmentCache, JsError> {
        let config = resolve_config(config_json.as_deref()).map_err(|e| JsError::new(&e))?;
        Ok(Self {
            memo: FragmentMemo::new(config),
        })
    }

    /// Parse `fragment` and return `{ token, diagnostics }`.
    pub fn parse(&mut self, fragment: &str) -> Result<JsValue, JsError> {
        to_js(self.memo.parse(fragment))
    }

    /// The canonical fragment for `fragment`, or `fallback` when it does
    /// not parse. `fallback` must itself parse.
    #[wasm_bindgen(js_name = "tokenOr")]
    pub fn token_or(&mut self, fragment: &str, fallback: &str) -> Result<String, JsError> {
        self.canonical_or(fragment, fallback).map_err(|e| JsError::new(&e))
    }

    /// The fragment parsed most recently.
    #[wasm_bindgen(js_name = "lastFragment")]
    pub fn last_fragment(&self) -> Option<String> {
        self.memo.last_fragment().map(str::to_string)
    }

    /// Forget the last parse.
    pub fn clear(&mut self) {
        self.memo.clear();
    }
}

impl FragmentCache {
    fn canonical_or(&mut self, fragment: &str, fallback: &str) -> Result<String, String> {
        let fallback = HistoryToken::parse(&UrlFragment::with(fallback))
            .ok_or_else(|| format!("fallback {fallback:?} is not a valid fragment"))?;
        Ok(self.memo.token_or(fragment, &fallback).to_string())
    }
}

// ── Helpers ─────────────────────────────────────────────────────────────

fn resolve_config(json: Option<&str>) -> Result<ParseConfig, String> {
    match json {
        Some(json) => load_config_from_str(json).map_err(|e| e.to_string()),
        None => Ok(ParseConfig::default()),
    }
}

fn parse_with(fragment: &str, config: &ParseConfig) -> ParseResult {
    parse_fragment_with(&UrlFragment::with(fragment), config)
}

fn canonical_text(fragment: &str) -> Option<String> {
    HistoryToken::parse(&UrlFragment::with(fragment)).map(|token| token.to_string())
}

fn cleared_text(fragment: &str) -> Option<String> {
    HistoryToken::parse(&UrlFragment::with(fragment)).map(|token| token.clear_action().to_string())
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsError> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsError::new(&e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_and_cleared_text() {
        assert_eq!(canonical_text("/1/Untitled/cell/A1:B2").as_deref(), Some("/1/Untitled/cell/A1:B2/top-left"));
        assert_eq!(cleared_text("/1/Untitled/cell/A1/formula").as_deref(), Some("/1/Untitled/cell/A1"));
        assert_eq!(canonical_text("no-slash"), None);
        assert_eq!(cleared_text("no-slash"), None);
    }

    #[test]
    fn config_json_is_validated() {
        assert_eq!(resolve_config(None), Ok(ParseConfig::default()));
        assert_eq!(
            resolve_config(Some(r#"{"max_fragment_len": 16}"#)),
            Ok(ParseConfig::default().with_max_fragment_len(16))
        );
        assert!(resolve_config(Some(r#"{"max_fragment_len": 0}"#)).is_err());
        assert!(resolve_config(Some("{")).is_err());
    }

    #[test]
    fn cache_falls_back_to_a_parsed_fragment() {
        let mut cache = FragmentCache {
            memo: FragmentMemo::default(),
        };
        assert_eq!(cache.canonical_or("/*/count/5/offset/1", "/").as_deref(), Ok("/*/offset/1/count/5"));
        assert_eq!(cache.canonical_or("garbage", "/create").as_deref(), Ok("/create"));
        assert_eq!(cache.last_fragment().as_deref(), Some("garbage"));
        assert!(cache.canonical_or("garbage", "also garbage").is_err());
    }

    #[test]
    fn explanations_cover_known_codes() {
        assert!(explain(diag::codes::INVALID_VALUE).is_some());
        assert_eq!(explain("HIST9999"), None);
    }
}
