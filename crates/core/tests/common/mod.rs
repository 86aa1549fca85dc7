//! Shared test helpers for `sheet_history_core` integration tests.

#![allow(unreachable_pub)]
#![allow(dead_code)]

use std::collections::BTreeMap;

use serde_json::Value;
use sheet_history_core::context::{
    AppContext, Clipboard, ClipboardEntry, DeltaRequest, Fetcher, Focus, FormRequest,
    LabelMappingRequest, MetadataRequest, OnFailure, PluginRequest, ViewportCache,
};
use sheet_history_core::grammar::parser::ParseResult;
use sheet_history_core::reference::{
    AnchoredSpreadsheetSelection, CellRange, CellReference, ExpressionReference, LabelName,
    SpreadsheetId, SpreadsheetName, SpreadsheetSelection, SpreadsheetViewportAnchor,
};
use sheet_history_core::{HistoryToken, parse_str};

// ─── Values ──────────────────────────────────────────────────────────────────

pub fn id() -> SpreadsheetId {
    SpreadsheetId::new(1)
}

pub fn name() -> SpreadsheetName {
    SpreadsheetName::new("Untitled").unwrap()
}

/// A cell, range or label with its default anchor.
pub fn cell(text: &str) -> AnchoredSpreadsheetSelection {
    SpreadsheetSelection::parse_cell(text).unwrap().set_default_anchor()
}

pub fn cell_anchored(text: &str, anchor: SpreadsheetViewportAnchor) -> AnchoredSpreadsheetSelection {
    AnchoredSpreadsheetSelection::new(SpreadsheetSelection::parse_cell(text).unwrap(), anchor).unwrap()
}

pub fn column(text: &str) -> AnchoredSpreadsheetSelection {
    SpreadsheetSelection::parse_column(text).unwrap().set_default_anchor()
}

pub fn row(text: &str) -> AnchoredSpreadsheetSelection {
    SpreadsheetSelection::parse_row(text).unwrap().set_default_anchor()
}

// ─── Parse-result helpers ────────────────────────────────────────────────────

/// Parse and unwrap the token, showing diagnostics on failure.
pub fn token(text: &str) -> HistoryToken {
    let result = parse_str(text);
    match result.token {
        Some(token) => token,
        None => panic!("{text:?} produced no token: {:?}", result.diagnostics),
    }
}

/// Collect diagnostic codes from parser diagnostics.
pub fn extract_diag_codes(result: &ParseResult) -> Vec<String> {
    result.diagnostics.iter().map(|d| d.id.to_string()).collect()
}

// ─── Recording application context ───────────────────────────────────────────

/// A fetcher that remembers every request.
pub struct Recorder<R> {
    pub requests: Vec<(R, OnFailure)>,
}

impl<R> Default for Recorder<R> {
    fn default() -> Self {
        Self { requests: Vec::new() }
    }
}

impl<R> Fetcher<R> for Recorder<R> {
    fn fetch(&mut self, request: R, on_failure: OnFailure) {
        self.requests.push((request, on_failure));
    }
}

/// Loaded cells and labels.
#[derive(Default)]
pub struct MemoryCache {
    pub cells: BTreeMap<CellReference, Value>,
    pub labels: BTreeMap<LabelName, ExpressionReference>,
}

impl ViewportCache for MemoryCache {
    fn cells(&self, range: &CellRange) -> Vec<(CellReference, Value)> {
        self.cells
            .iter()
            .filter(|(cell, _)| range.contains(cell))
            .map(|(cell, value)| (*cell, value.clone()))
            .collect()
    }

    fn label_target(&self, label: &LabelName) -> Option<ExpressionReference> {
        self.labels.get(label).cloned()
    }
}

#[derive(Default)]
pub struct MemoryClipboard(pub Option<ClipboardEntry>);

impl Clipboard for MemoryClipboard {
    fn write(&mut self, entry: ClipboardEntry) {
        self.0 = Some(entry);
    }

    fn read(&self) -> Option<ClipboardEntry> {
        self.0.clone()
    }
}

/// An [`AppContext`] that records everything the hooks do.
pub struct RecordingContext {
    pub current: HistoryToken,
    pub pushed: Vec<HistoryToken>,
    pub focused: Vec<Focus>,
    pub cache: MemoryCache,
    pub clipboard: MemoryClipboard,
    pub delta: Recorder<DeltaRequest>,
    pub metadata: Recorder<MetadataRequest>,
    pub labels: Recorder<LabelMappingRequest>,
    pub forms: Recorder<FormRequest>,
    pub plugins: Recorder<PluginRequest>,
}

impl RecordingContext {
    pub fn showing(current: HistoryToken) -> Self {
        Self {
            current,
            pushed: Vec::new(),
            focused: Vec::new(),
            cache: MemoryCache::default(),
            clipboard: MemoryClipboard::default(),
            delta: Recorder::default(),
            metadata: Recorder::default(),
            labels: Recorder::default(),
            forms: Recorder::default(),
            plugins: Recorder::default(),
        }
    }

    /// Fragments of every pushed token, in order.
    pub fn pushed_fragments(&self) -> Vec<String> {
        self.pushed.iter().map(ToString::to_string).collect()
    }
}

impl AppContext for RecordingContext {
    fn history_token(&self) -> HistoryToken {
        self.current.clone()
    }

    fn push_history_token(&mut self, token: HistoryToken) {
        self.current = token.clone();
        self.pushed.push(token);
    }

    fn viewport_cache(&self) -> &dyn ViewportCache {
        &self.cache
    }

    fn delta_fetcher(&mut self) -> &mut dyn Fetcher<DeltaRequest> {
        &mut self.delta
    }

    fn metadata_fetcher(&mut self) -> &mut dyn Fetcher<MetadataRequest> {
        &mut self.metadata
    }

    fn label_mapping_fetcher(&mut self) -> &mut dyn Fetcher<LabelMappingRequest> {
        &mut self.labels
    }

    fn form_fetcher(&mut self) -> &mut dyn Fetcher<FormRequest> {
        &mut self.forms
    }

    fn plugin_fetcher(&mut self) -> &mut dyn Fetcher<PluginRequest> {
        &mut self.plugins
    }

    fn clipboard(&mut self) -> &mut dyn Clipboard {
        &mut self.clipboard
    }

    fn focus(&mut self, focus: Focus) {
        self.focused.push(focus);
    }
}
