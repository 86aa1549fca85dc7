use crate::error::HistoryTokenError;
use crate::fragment::FragmentBuilder;
use crate::payload::{SortComparators, ViewportNavigationList};
use crate::reference::AnchoredSpreadsheetSelection;

use super::SpreadsheetIdAndName;

/// What is happening to a column or row selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnOrRowAction {
    /// Plain selection.
    Select,
    /// Context menu.
    Menu,
    /// Delete the columns or rows.
    Delete,
    /// Clear every cell in them.
    Clear,
    /// Freeze up to and including the selection.
    Freeze,
    /// Unfreeze.
    Unfreeze,
    /// Hide.
    Hide,
    /// Show again.
    Unhide,
    /// Insert this many before the selection.
    InsertBefore(u32),
    /// Insert this many after the selection.
    InsertAfter(u32),
    /// Sort dialog with the comparator text being edited.
    SortEdit(String),
    /// Sort by comparators.
    SortSave(SortComparators),
    /// Move the viewport from this selection.
    Navigate(ViewportNavigationList),
}

/// A column- or row-scoped token.
///
/// Whether it is a column or a row token follows from the selection.
#[derive(Debug, Clone)]
pub struct ColumnOrRowToken {
    sheet: SpreadsheetIdAndName,
    selection: AnchoredSpreadsheetSelection,
    action: ColumnOrRowAction,
}

impl ColumnOrRowToken {
    pub(crate) fn new(
        sheet: SpreadsheetIdAndName,
        selection: AnchoredSpreadsheetSelection,
        action: ColumnOrRowAction,
    ) -> Result<Self, HistoryTokenError> {
        let s = selection.selection();
        if !(s.is_column_like() || s.is_row_like()) {
            return Err(HistoryTokenError::SelectionKind {
                token: "column or row",
                selection: s.kind_name(),
            });
        }
        match &action {
            ColumnOrRowAction::Freeze | ColumnOrRowAction::Unfreeze if !s.is_freezable() => {
                return Err(HistoryTokenError::Freeze {
                    selection: s.to_string(),
                });
            }
            ColumnOrRowAction::InsertBefore(0) | ColumnOrRowAction::InsertAfter(0) => {
                return Err(HistoryTokenError::out_of_range("insert count", 0));
            }
            ColumnOrRowAction::SortSave(comparators) => comparators.check_selection(s)?,
            _ => {}
        }
        Ok(Self {
            sheet,
            selection,
            action,
        })
    }

    pub(crate) fn with_action(&self, action: ColumnOrRowAction) -> Result<Self, HistoryTokenError> {
        Self::new(self.sheet.clone(), self.selection.clone(), action)
    }

    /// Same sheet and selection; only for actions that need no validation.
    pub(crate) fn with_plain_action(&self, action: ColumnOrRowAction) -> Self {
        Self {
            sheet: self.sheet.clone(),
            selection: self.selection.clone(),
            action,
        }
    }

    pub(crate) fn with_selection(
        &self,
        selection: AnchoredSpreadsheetSelection,
    ) -> Result<Self, HistoryTokenError> {
        Self::new(self.sheet.clone(), selection, self.action.clone())
    }

    pub(crate) fn with_sheet(&self, sheet: SpreadsheetIdAndName) -> Self {
        Self { sheet, ..self.clone() }
    }

    /// The spreadsheet.
    pub fn sheet(&self) -> &SpreadsheetIdAndName {
        &self.sheet
    }

    /// The selection.
    pub fn selection(&self) -> &AnchoredSpreadsheetSelection {
        &self.selection
    }

    /// What is happening to the selection.
    pub fn action(&self) -> &ColumnOrRowAction {
        &self.action
    }

    /// True for column and column-range selections.
    pub fn is_column(&self) -> bool {
        self.selection.selection().is_column_like()
    }

    /// `column` or `row`.
    pub(crate) fn segment(&self) -> &'static str {
        if self.is_column() { "column" } else { "row" }
    }

    pub(crate) fn kind(&self) -> &'static str {
        let (column, row) = match &self.action {
            ColumnOrRowAction::Select => ("column-select", "row-select"),
            ColumnOrRowAction::Menu => ("column-menu", "row-menu"),
            ColumnOrRowAction::Delete => ("column-delete", "row-delete"),
            ColumnOrRowAction::Clear => ("column-clear", "row-clear"),
            ColumnOrRowAction::Freeze => ("column-freeze", "row-freeze"),
            ColumnOrRowAction::Unfreeze => ("column-unfreeze", "row-unfreeze"),
            ColumnOrRowAction::Hide => ("column-hide", "row-hide"),
            ColumnOrRowAction::Unhide => ("column-unhide", "row-unhide"),
            ColumnOrRowAction::InsertBefore(_) => ("column-insert-before", "row-insert-before"),
            ColumnOrRowAction::InsertAfter(_) => ("column-insert-after", "row-insert-after"),
            ColumnOrRowAction::SortEdit(_) => ("column-sort-edit", "row-sort-edit"),
            ColumnOrRowAction::SortSave(_) => ("column-sort-save", "row-sort-save"),
            ColumnOrRowAction::Navigate(_) => ("column-navigate", "row-navigate"),
        };
        if self.is_column() { column } else { row }
    }

    pub(crate) fn write_fragment(&self, b: &mut FragmentBuilder) {
        b.segment(self.segment()).segments(self.selection.segments());
        match &self.action {
            ColumnOrRowAction::Select => {}
            ColumnOrRowAction::Menu => {
                b.segment("menu");
            }
            ColumnOrRowAction::Delete => {
                b.segment("delete");
            }
            ColumnOrRowAction::Clear => {
                b.segment("clear");
            }
            ColumnOrRowAction::Freeze => {
                b.segment("freeze");
            }
            ColumnOrRowAction::Unfreeze => {
                b.segment("unfreeze");
            }
            ColumnOrRowAction::Hide => {
                b.segment("hide");
            }
            ColumnOrRowAction::Unhide => {
                b.segment("unhide");
            }
            ColumnOrRowAction::InsertBefore(count) => {
                b.segment("insert-before").segment(count);
            }
            ColumnOrRowAction::InsertAfter(count) => {
                b.segment("insert-after").segment(count);
            }
            ColumnOrRowAction::SortEdit(text) => {
                b.segments(["sort", "edit"]);
                if !text.is_empty() {
                    b.segment(text);
                }
            }
            ColumnOrRowAction::SortSave(comparators) => {
                b.segments(["sort", "save"]).segment(comparators);
            }
            ColumnOrRowAction::Navigate(list) => {
                b.segment("navigate");
                if !list.is_empty() {
                    b.segment(list);
                }
            }
        }
    }
}
