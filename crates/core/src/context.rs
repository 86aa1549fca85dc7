//! Collaborators the activation hooks talk to.
//!
//! The host application implements [`AppContext`]. It owns the current
//! token, a cache of cells in the viewport, the clipboard and one
//! [`Fetcher`] per server endpoint. Fetchers are fire-and-forget: they start
//! a request and return. When a request fails, the host calls
//! [`OnFailure::apply`] with the value that came with the request.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::payload::{
    CellFindQuery, CellSaveValues, ClipboardValueKind, Currency, FormName, Locale,
    MetadataPropertyName, OffsetAndCount, PluginName, PluginUpload, SortComparators,
    TextStylePropertyName, ValueTypeName, ViewportNavigationList,
};
use crate::reference::{
    CellRange, CellReference, ExpressionReference, LabelMapping, LabelName, SpreadsheetId,
    SpreadsheetName, SpreadsheetSelection,
};
use crate::token::{HistoryToken, SpreadsheetIdAndName};

// ── Context ─────────────────────────────────────────────────────────────────

/// The application as seen by activation hooks.
pub trait AppContext {
    /// The token the application currently shows.
    fn history_token(&self) -> HistoryToken;

    /// Make `token` current and write it to the address bar.
    fn push_history_token(&mut self, token: HistoryToken);

    /// Cells and labels already loaded for the viewport.
    fn viewport_cache(&self) -> &dyn ViewportCache;

    /// Cell, column and row changes.
    fn delta_fetcher(&mut self) -> &mut dyn Fetcher<DeltaRequest>;

    /// Spreadsheet list and metadata.
    fn metadata_fetcher(&mut self) -> &mut dyn Fetcher<MetadataRequest>;

    /// Label mappings.
    fn label_mapping_fetcher(&mut self) -> &mut dyn Fetcher<LabelMappingRequest>;

    /// Saved forms.
    fn form_fetcher(&mut self) -> &mut dyn Fetcher<FormRequest>;

    /// Plugins.
    fn plugin_fetcher(&mut self) -> &mut dyn Fetcher<PluginRequest>;

    /// The application clipboard.
    fn clipboard(&mut self) -> &mut dyn Clipboard;

    /// Move keyboard focus. Hosts without focus handling can ignore it.
    fn focus(&mut self, focus: Focus) {
        let _ = focus;
    }
}

/// Cells and labels the host has already loaded.
pub trait ViewportCache {
    /// Cell snapshots (JSON objects) for the loaded cells inside `range`.
    fn cells(&self, range: &CellRange) -> Vec<(CellReference, Value)>;

    /// What a label points at, when loaded.
    fn label_target(&self, label: &LabelName) -> Option<ExpressionReference>;

    /// The cells a selection covers; labels are resolved one level deep.
    fn resolve(&self, selection: &SpreadsheetSelection) -> Option<CellRange> {
        match selection {
            SpreadsheetSelection::Label(label) => match self.label_target(label)? {
                ExpressionReference::Cell(cell) => Some(CellRange::from(cell)),
                ExpressionReference::CellRange(range) => Some(range),
                ExpressionReference::Label(_) => None,
            },
            other => other.cell_range(),
        }
    }
}

/// Starts one kind of server request.
pub trait Fetcher<R> {
    /// Start `request`. Completion is reported to the host, not to the caller.
    fn fetch(&mut self, request: R, on_failure: OnFailure);
}

/// Holds copied or cut values between activations.
pub trait Clipboard {
    /// Replace the clipboard contents.
    fn write(&mut self, entry: ClipboardEntry);

    /// The current contents, if any.
    fn read(&self) -> Option<ClipboardEntry>;
}

/// What was copied: one property of every loaded cell in a range.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipboardEntry {
    /// Which property.
    pub kind: ClipboardValueKind,
    /// The copied range.
    pub range: CellRange,
    /// Property values by cell; `null` where a cell has none.
    pub values: BTreeMap<CellReference, Value>,
}

impl ClipboardEntry {
    /// Collect `kind` from the cache for `range`.
    pub fn collect(cache: &dyn ViewportCache, kind: ClipboardValueKind, range: CellRange) -> Self {
        let values = cache
            .cells(&range)
            .into_iter()
            .map(|(cell, snapshot)| {
                let value = match kind.cell_property() {
                    None => snapshot,
                    Some(property) => snapshot.get(property).cloned().unwrap_or(Value::Null),
                };
                (cell, value)
            })
            .collect();
        Self { kind, range, values }
    }
}

/// Where keyboard focus should go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Focus {
    /// The grid, no selection.
    Viewport,
    /// The grid, on a selection.
    Selection(SpreadsheetSelection),
    /// The context menu of a selection.
    Menu(SpreadsheetSelection),
    /// The formula text box.
    FormulaEditor,
    /// A dialog, named by the token kind that opened it.
    Dialog(&'static str),
}

// ── Failure policy ──────────────────────────────────────────────────────────

/// What to do when a request fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OnFailure {
    /// Nothing; the failure is only reported.
    Ignore,
    /// Push `revert_to`, but only while the application still shows `expected`.
    Revert {
        /// The optimistic token pushed when the request started.
        expected: HistoryToken,
        /// Where to go instead.
        revert_to: HistoryToken,
    },
}

impl OnFailure {
    /// Apply the policy. Returns true when a token was pushed.
    ///
    /// The current token is re-read from `context`; the user may have moved
    /// on while the request was outstanding.
    pub fn apply(self, context: &mut dyn AppContext) -> bool {
        match self {
            OnFailure::Ignore => false,
            OnFailure::Revert { expected, revert_to } => {
                let current = context.history_token();
                if current == expected {
                    tracing::debug!(from = %current, to = %revert_to, "request failed; reverting");
                    context.push_history_token(revert_to);
                    true
                } else {
                    tracing::warn!(
                        current = %current,
                        expected = %expected,
                        "request failed after the application moved on; not reverting"
                    );
                    false
                }
            }
        }
    }
}

// ── Requests ────────────────────────────────────────────────────────────────

/// A property change applied to every cell of a selection.
#[derive(Debug, Clone, PartialEq)]
pub enum CellPatch {
    /// New formula text.
    Formula(String),
    /// One style property; `None` removes it.
    Style(TextStylePropertyName, Option<String>),
    /// Formatter pattern.
    Formatter(Option<String>),
    /// Parser pattern.
    Parser(Option<String>),
    /// Validator selector.
    Validator(Option<String>),
    /// Locale.
    Locale(Option<Locale>),
    /// Currency.
    Currency(Option<Currency>),
    /// Date-time symbols object.
    DateTimeSymbols(Option<Value>),
    /// Decimal number symbols object.
    DecimalNumberSymbols(Option<Value>),
    /// A typed value.
    Value(ValueTypeName, Option<Value>),
}

/// Requests for cell, column and row data.
#[derive(Debug, Clone, PartialEq)]
pub enum DeltaRequest {
    /// Load the cells of a selection.
    Load {
        /// Spreadsheet.
        sheet: SpreadsheetIdAndName,
        /// What to load.
        selection: SpreadsheetSelection,
    },
    /// Delete cells, columns or rows.
    Delete {
        /// Spreadsheet.
        sheet: SpreadsheetIdAndName,
        /// What to delete.
        selection: SpreadsheetSelection,
    },
    /// Clear one property, or everything when `kind` is `None`.
    Clear {
        /// Spreadsheet.
        sheet: SpreadsheetIdAndName,
        /// What to clear.
        selection: SpreadsheetSelection,
        /// Which property.
        kind: Option<ClipboardValueKind>,
    },
    /// Patch a property of every selected cell.
    Patch {
        /// Spreadsheet.
        sheet: SpreadsheetIdAndName,
        /// The selection.
        selection: SpreadsheetSelection,
        /// The change.
        patch: CellPatch,
    },
    /// Save per-cell values.
    Save {
        /// Spreadsheet.
        sheet: SpreadsheetIdAndName,
        /// Values keyed by cell.
        values: CellSaveValues,
    },
    /// Paste clipboard contents at a selection.
    Paste {
        /// Spreadsheet.
        sheet: SpreadsheetIdAndName,
        /// Paste target.
        selection: SpreadsheetSelection,
        /// What was copied.
        entry: ClipboardEntry,
    },
    /// Sort a selection.
    Sort {
        /// Spreadsheet.
        sheet: SpreadsheetIdAndName,
        /// What to sort.
        selection: SpreadsheetSelection,
        /// How.
        comparators: SortComparators,
    },
    /// Insert columns or rows next to a selection.
    Insert {
        /// Spreadsheet.
        sheet: SpreadsheetIdAndName,
        /// The column or row selection.
        selection: SpreadsheetSelection,
        /// Before rather than after.
        before: bool,
        /// How many.
        count: u32,
    },
    /// Hide or show columns or rows.
    Hide {
        /// Spreadsheet.
        sheet: SpreadsheetIdAndName,
        /// The column or row selection.
        selection: SpreadsheetSelection,
        /// Hide when true, show when false.
        hidden: bool,
    },
    /// Find cells.
    Find {
        /// Spreadsheet.
        sheet: SpreadsheetIdAndName,
        /// Where to look.
        selection: SpreadsheetSelection,
        /// What to look for.
        query: CellFindQuery,
    },
    /// Cells whose formulas reference a selection.
    References {
        /// Spreadsheet.
        sheet: SpreadsheetIdAndName,
        /// The referenced selection.
        selection: SpreadsheetSelection,
        /// Page.
        offset_and_count: OffsetAndCount,
    },
}

/// Requests for the spreadsheet list and spreadsheet metadata.
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataRequest {
    /// Load a page of the spreadsheet list.
    List(OffsetAndCount),
    /// Create a spreadsheet.
    Create,
    /// Load one spreadsheet.
    Load(SpreadsheetId),
    /// Rename a spreadsheet.
    Rename(SpreadsheetId, SpreadsheetName),
    /// Delete a spreadsheet.
    Delete(SpreadsheetId),
    /// Set or remove one metadata property.
    Patch {
        /// Spreadsheet.
        sheet: SpreadsheetIdAndName,
        /// Property.
        property: MetadataPropertyName,
        /// New value; `None` removes it.
        value: Option<String>,
    },
    /// Set or remove one default style property.
    PatchStyle {
        /// Spreadsheet.
        sheet: SpreadsheetIdAndName,
        /// Style property.
        property: TextStylePropertyName,
        /// New value; `None` removes it.
        value: Option<String>,
    },
    /// Freeze columns and rows up to a selection.
    Freeze {
        /// Spreadsheet.
        sheet: SpreadsheetIdAndName,
        /// The selection.
        selection: SpreadsheetSelection,
    },
    /// Unfreeze columns and rows.
    Unfreeze {
        /// Spreadsheet.
        sheet: SpreadsheetIdAndName,
        /// The selection.
        selection: SpreadsheetSelection,
    },
    /// Move the viewport.
    Navigate {
        /// Spreadsheet.
        sheet: SpreadsheetIdAndName,
        /// Where the viewport started.
        selection: Option<SpreadsheetSelection>,
        /// The moves.
        navigations: ViewportNavigationList,
    },
}

/// Requests for label mappings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelMappingRequest {
    /// A page of every label.
    List(SpreadsheetIdAndName, OffsetAndCount),
    /// A page of the labels pointing into a selection.
    ListFor(SpreadsheetIdAndName, SpreadsheetSelection, OffsetAndCount),
    /// One label.
    Load(SpreadsheetIdAndName, LabelName),
    /// Save a mapping.
    Save(SpreadsheetIdAndName, LabelMapping),
    /// Delete a label.
    Delete(SpreadsheetIdAndName, LabelName),
}

/// Requests for saved forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormRequest {
    /// A page of forms.
    List(SpreadsheetIdAndName, OffsetAndCount),
    /// One form.
    Load(SpreadsheetIdAndName, FormName),
    /// Save a form definition.
    Save(SpreadsheetIdAndName, FormName, Value),
    /// Delete a form.
    Delete(SpreadsheetIdAndName, FormName),
}

/// Requests for plugins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PluginRequest {
    /// A page of installed plugins.
    List(OffsetAndCount),
    /// One plugin.
    Load(PluginName),
    /// Delete a plugin.
    Delete(PluginName),
    /// The file listing of a plugin archive.
    ListFiles(PluginName),
    /// One file of a plugin archive.
    LoadFile(PluginName, String),
    /// Upload an archive.
    Upload(PluginUpload),
}
