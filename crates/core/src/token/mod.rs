//! The history token: one immutable value per navigable UI state.
//!
//! [`HistoryToken`] is a closed enum. Families that share a spreadsheet id
//! and name embed [`SpreadsheetIdAndName`]; families that share a selection
//! embed an [`AnchoredSpreadsheetSelection`]. Each family struct keeps its
//! fields private and is built through a validating constructor, so every
//! reachable token satisfies its family's invariants.
//!
//! Equality, hashing and `Display` all go through [`HistoryToken::url_fragment`].

mod axis;
mod cell;
mod fragment;
mod label;
mod metadata;
mod plugin;

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::Serialize;

use crate::error::HistoryTokenError;
use crate::fragment::UrlFragment;
use crate::payload::{OffsetAndCount, ViewportNavigationList};
use crate::reference::{AnchoredSpreadsheetSelection, SpreadsheetId, SpreadsheetName};

pub use axis::{ColumnOrRowAction, ColumnOrRowToken};
pub use cell::{CellAction, CellToken};
pub use label::{LabelMappingAction, LabelMappingToken};
pub use metadata::{FormAction, FormToken, MetadataAction, MetadataToken};
pub use plugin::{PluginAction, PluginToken};

// ── Shared parts ────────────────────────────────────────────────────────────

/// The id and name of a loaded spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SpreadsheetIdAndName {
    id: SpreadsheetId,
    name: SpreadsheetName,
}

impl SpreadsheetIdAndName {
    /// Pair an id with its name.
    pub fn new(id: SpreadsheetId, name: SpreadsheetName) -> Self {
        Self { id, name }
    }

    /// The id.
    pub fn id(&self) -> SpreadsheetId {
        self.id
    }

    /// The name.
    pub fn name(&self) -> &SpreadsheetName {
        &self.name
    }
}

// ── Root-level families ─────────────────────────────────────────────────────

/// Tokens shown while no spreadsheet is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpreadsheetListAction {
    /// Browse the spreadsheet list.
    Select(OffsetAndCount),
    /// Refetch the list, then return to [`SpreadsheetListAction::Select`].
    Reload(OffsetAndCount),
    /// Rename dialog for a listed spreadsheet.
    RenameSelect(SpreadsheetId),
    /// Rename a listed spreadsheet.
    RenameSave(SpreadsheetId, SpreadsheetName),
    /// Delete a listed spreadsheet.
    Delete(SpreadsheetId),
}

/// What is happening to an open spreadsheet as a whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpreadsheetAction {
    /// Nothing selected.
    Select,
    /// Rename dialog.
    RenameSelect,
    /// Rename to the given name.
    RenameSave(SpreadsheetName),
    /// Refetch everything.
    Reload,
    /// Delete the spreadsheet.
    Delete,
    /// Move the viewport.
    Navigate(ViewportNavigationList),
}

/// A spreadsheet-wide token.
#[derive(Debug, Clone)]
pub struct SpreadsheetToken {
    sheet: SpreadsheetIdAndName,
    action: SpreadsheetAction,
}

impl SpreadsheetToken {
    pub(crate) fn with_action(&self, action: SpreadsheetAction) -> Self {
        Self {
            sheet: self.sheet.clone(),
            action,
        }
    }

    pub(crate) fn with_sheet(&self, sheet: SpreadsheetIdAndName) -> Self {
        Self { sheet, ..self.clone() }
    }

    /// The spreadsheet.
    pub fn sheet(&self) -> &SpreadsheetIdAndName {
        &self.sheet
    }

    /// What is happening to it.
    pub fn action(&self) -> &SpreadsheetAction {
        &self.action
    }
}

// ── The token ───────────────────────────────────────────────────────────────

/// Where the UI currently is.
#[derive(Debug, Clone)]
pub enum HistoryToken {
    /// Create a new spreadsheet.
    SpreadsheetCreate,
    /// No spreadsheet open; the list and its dialogs.
    SpreadsheetList(SpreadsheetListAction),
    /// Load a spreadsheet whose name is not yet known.
    SpreadsheetLoad(SpreadsheetId),
    /// A spreadsheet with nothing selected, or a spreadsheet-wide action.
    Spreadsheet(SpreadsheetToken),
    /// A cell, cell range or label selection and what is being done to it.
    Cell(CellToken),
    /// A column or row selection and what is being done to it.
    ColumnOrRow(ColumnOrRowToken),
    /// Label mapping list and editor.
    LabelMapping(LabelMappingToken),
    /// Spreadsheet metadata viewer and editor.
    Metadata(MetadataToken),
    /// Saved forms.
    Form(FormToken),
    /// Plugin management.
    Plugin(PluginToken),
}

impl HistoryToken {
    // ── Factories ───────────────────────────────────────────────────────

    /// `/`: the spreadsheet list with no paging.
    pub fn spreadsheet_list_select(offset_and_count: OffsetAndCount) -> Self {
        HistoryToken::SpreadsheetList(SpreadsheetListAction::Select(offset_and_count))
    }

    /// `/*/reload`.
    pub fn spreadsheet_list_reload(offset_and_count: OffsetAndCount) -> Self {
        HistoryToken::SpreadsheetList(SpreadsheetListAction::Reload(offset_and_count))
    }

    /// `/rename/<id>`.
    pub fn spreadsheet_list_rename_select(id: SpreadsheetId) -> Self {
        HistoryToken::SpreadsheetList(SpreadsheetListAction::RenameSelect(id))
    }

    /// `/rename/<id>/<name>`.
    pub fn spreadsheet_list_rename_save(id: SpreadsheetId, name: SpreadsheetName) -> Self {
        HistoryToken::SpreadsheetList(SpreadsheetListAction::RenameSave(id, name))
    }

    /// `/delete/<id>`.
    pub fn spreadsheet_list_delete(id: SpreadsheetId) -> Self {
        HistoryToken::SpreadsheetList(SpreadsheetListAction::Delete(id))
    }

    /// `/create`.
    pub fn spreadsheet_create() -> Self {
        HistoryToken::SpreadsheetCreate
    }

    /// `/<id>`.
    pub fn spreadsheet_load(id: SpreadsheetId) -> Self {
        HistoryToken::SpreadsheetLoad(id)
    }

    /// A spreadsheet-wide token.
    pub fn spreadsheet(id: SpreadsheetId, name: SpreadsheetName, action: SpreadsheetAction) -> Self {
        HistoryToken::Spreadsheet(SpreadsheetToken {
            sheet: SpreadsheetIdAndName::new(id, name),
            action,
        })
    }

    pub(crate) fn with_sheet(sheet: SpreadsheetIdAndName, action: SpreadsheetAction) -> Self {
        HistoryToken::Spreadsheet(SpreadsheetToken { sheet, action })
    }

    /// `/<id>/<name>`.
    pub fn spreadsheet_select(id: SpreadsheetId, name: SpreadsheetName) -> Self {
        Self::spreadsheet(id, name, SpreadsheetAction::Select)
    }

    /// A cell-scoped token. Fails when the selection or action payload does not fit.
    pub fn cell(
        id: SpreadsheetId,
        name: SpreadsheetName,
        selection: AnchoredSpreadsheetSelection,
        action: CellAction,
    ) -> Result<Self, HistoryTokenError> {
        CellToken::new(SpreadsheetIdAndName::new(id, name), selection, action).map(HistoryToken::Cell)
    }

    /// `/<id>/<name>/cell/<selection>`.
    pub fn cell_select(
        id: SpreadsheetId,
        name: SpreadsheetName,
        selection: AnchoredSpreadsheetSelection,
    ) -> Result<Self, HistoryTokenError> {
        Self::cell(id, name, selection, CellAction::Select)
    }

    /// A column- or row-scoped token; the selection decides which.
    pub fn column_or_row(
        id: SpreadsheetId,
        name: SpreadsheetName,
        selection: AnchoredSpreadsheetSelection,
        action: ColumnOrRowAction,
    ) -> Result<Self, HistoryTokenError> {
        ColumnOrRowToken::new(SpreadsheetIdAndName::new(id, name), selection, action)
            .map(HistoryToken::ColumnOrRow)
    }

    /// A column-scoped token; rejects anything but a column or column range.
    pub fn column(
        id: SpreadsheetId,
        name: SpreadsheetName,
        selection: AnchoredSpreadsheetSelection,
        action: ColumnOrRowAction,
    ) -> Result<Self, HistoryTokenError> {
        if !selection.selection().is_column_like() {
            return Err(HistoryTokenError::SelectionKind {
                token: "column",
                selection: selection.selection().kind_name(),
            });
        }
        Self::column_or_row(id, name, selection, action)
    }

    /// A row-scoped token; rejects anything but a row or row range.
    pub fn row(
        id: SpreadsheetId,
        name: SpreadsheetName,
        selection: AnchoredSpreadsheetSelection,
        action: ColumnOrRowAction,
    ) -> Result<Self, HistoryTokenError> {
        if !selection.selection().is_row_like() {
            return Err(HistoryTokenError::SelectionKind {
                token: "row",
                selection: selection.selection().kind_name(),
            });
        }
        Self::column_or_row(id, name, selection, action)
    }

    /// A label mapping token.
    pub fn label_mapping(id: SpreadsheetId, name: SpreadsheetName, action: LabelMappingAction) -> Self {
        HistoryToken::LabelMapping(LabelMappingToken::new(SpreadsheetIdAndName::new(id, name), action))
    }

    /// A metadata token. Fails when saving a read-only property or an invalid value.
    pub fn metadata(
        id: SpreadsheetId,
        name: SpreadsheetName,
        action: MetadataAction,
    ) -> Result<Self, HistoryTokenError> {
        MetadataToken::new(SpreadsheetIdAndName::new(id, name), action).map(HistoryToken::Metadata)
    }

    /// A form token. Fails when a saved form is not a JSON object.
    pub fn form(id: SpreadsheetId, name: SpreadsheetName, action: FormAction) -> Result<Self, HistoryTokenError> {
        FormToken::new(SpreadsheetIdAndName::new(id, name), action).map(HistoryToken::Form)
    }

    /// A plugin token. An empty file path is stored as the archive listing.
    pub fn plugin(action: PluginAction) -> Self {
        HistoryToken::Plugin(PluginToken::new(action))
    }

    // ── Accessors ───────────────────────────────────────────────────────

    /// The spreadsheet id, for every token scoped to one.
    pub fn spreadsheet_id(&self) -> Option<SpreadsheetId> {
        match self {
            HistoryToken::SpreadsheetLoad(id) => Some(*id),
            _ => self.sheet().map(SpreadsheetIdAndName::id),
        }
    }

    /// The spreadsheet name, for tokens that carry one.
    pub fn spreadsheet_name(&self) -> Option<&SpreadsheetName> {
        self.sheet().map(SpreadsheetIdAndName::name)
    }

    /// The id and name, for tokens that carry both.
    pub fn sheet(&self) -> Option<&SpreadsheetIdAndName> {
        match self {
            HistoryToken::Spreadsheet(t) => Some(&t.sheet),
            HistoryToken::Cell(t) => Some(t.sheet()),
            HistoryToken::ColumnOrRow(t) => Some(t.sheet()),
            HistoryToken::LabelMapping(t) => Some(t.sheet()),
            HistoryToken::Metadata(t) => Some(t.sheet()),
            HistoryToken::Form(t) => Some(t.sheet()),
            _ => None,
        }
    }

    /// The anchored selection of cell, column and row tokens.
    pub fn anchored_selection(&self) -> Option<&AnchoredSpreadsheetSelection> {
        match self {
            HistoryToken::Cell(t) => Some(t.selection()),
            HistoryToken::ColumnOrRow(t) => Some(t.selection()),
            _ => None,
        }
    }

    /// The fragment this token is written as.
    pub fn url_fragment(&self) -> UrlFragment {
        fragment::url_fragment(self)
    }

    /// Stable kebab-case name of the variant, e.g. `cell-formula-save`.
    pub fn kind(&self) -> &'static str {
        match self {
            HistoryToken::SpreadsheetCreate => "spreadsheet-create",
            HistoryToken::SpreadsheetList(action) => match action {
                SpreadsheetListAction::Select(_) => "spreadsheet-list-select",
                SpreadsheetListAction::Reload(_) => "spreadsheet-list-reload",
                SpreadsheetListAction::RenameSelect(_) => "spreadsheet-list-rename-select",
                SpreadsheetListAction::RenameSave(..) => "spreadsheet-list-rename-save",
                SpreadsheetListAction::Delete(_) => "spreadsheet-list-delete",
            },
            HistoryToken::SpreadsheetLoad(_) => "spreadsheet-load",
            HistoryToken::Spreadsheet(t) => match t.action {
                SpreadsheetAction::Select => "spreadsheet-select",
                SpreadsheetAction::RenameSelect => "spreadsheet-rename-select",
                SpreadsheetAction::RenameSave(_) => "spreadsheet-rename-save",
                SpreadsheetAction::Reload => "spreadsheet-reload",
                SpreadsheetAction::Delete => "spreadsheet-delete",
                SpreadsheetAction::Navigate(_) => "spreadsheet-navigate",
            },
            HistoryToken::Cell(t) => t.kind(),
            HistoryToken::ColumnOrRow(t) => t.kind(),
            HistoryToken::LabelMapping(t) => t.kind(),
            HistoryToken::Metadata(t) => t.kind(),
            HistoryToken::Form(t) => t.kind(),
            HistoryToken::Plugin(t) => t.kind(),
        }
    }

    /// A serialisable description for tooling.
    pub fn summary(&self) -> TokenSummary {
        let selection = self.anchored_selection();
        TokenSummary {
            kind: self.kind(),
            fragment: self.url_fragment().into_string(),
            spreadsheet_id: self.spreadsheet_id().map(|id| id.to_string()),
            spreadsheet_name: self.spreadsheet_name().map(ToString::to_string),
            selection: selection.map(|s| s.selection().to_string()),
            selection_kind: selection.map(|s| s.selection().kind_name()),
            anchor: selection
                .map(AnchoredSpreadsheetSelection::anchor)
                .filter(|a| *a != crate::reference::SpreadsheetViewportAnchor::None)
                .map(|a| a.as_str()),
        }
    }
}

impl PartialEq for HistoryToken {
    fn eq(&self, other: &Self) -> bool {
        self.url_fragment() == other.url_fragment()
    }
}

impl Eq for HistoryToken {}

impl Hash for HistoryToken {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.url_fragment().hash(state);
    }
}

/// Serialises as its [`TokenSummary`].
impl Serialize for HistoryToken {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.summary().serialize(serializer)
    }
}

impl fmt::Display for HistoryToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.url_fragment().fmt(f)
    }
}

/// Describes a token for JSON output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenSummary {
    /// See [`HistoryToken::kind`].
    pub kind: &'static str,
    /// The canonical fragment.
    pub fragment: String,
    /// Spreadsheet id, in hex.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spreadsheet_id: Option<String>,
    /// Spreadsheet name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spreadsheet_name: Option<String>,
    /// The selection, e.g. `B2:C3`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection: Option<String>,
    /// The selection kind, e.g. `cell-range`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection_kind: Option<&'static str>,
    /// The anchor, when one is printed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor: Option<&'static str>,
}

/// Check that a form or symbol payload is a JSON object.
pub(crate) fn require_object(
    what: &'static str,
    value: &serde_json::Value,
) -> Result<(), HistoryTokenError> {
    if value.is_object() {
        Ok(())
    } else {
        Err(HistoryTokenError::invalid(what, format!("expected an object, got {value}")))
    }
}

