//! Transitions between tokens.
//!
//! Every `set_*` method is a would-be setter. It returns [`Cow::Borrowed`]
//! when the request does not apply to the token, or applies but changes
//! nothing, and [`Cow::Owned`] holding a new validated token otherwise.
//! Upstream code detects "no change" with `matches!(next, Cow::Borrowed(_))`
//! instead of comparing fragments.
//!
//! Setters whose payload can be rejected return a [`Transition`].

use std::borrow::Cow;
use std::str::FromStr;

use serde_json::Value;

use crate::error::HistoryTokenError;
use crate::payload::{
    CellFindQuery, ClipboardValueKind, MetadataPropertyName, OffsetAndCount, PatternKind,
    SortComparators, TextStylePropertyName, ValueTypeName, ViewportNavigationList,
};
use crate::reference::{
    AnchoredSpreadsheetSelection, LabelMapping, LabelName, SpreadsheetId, SpreadsheetName,
    SpreadsheetViewportAnchor,
};
use crate::token::{
    CellAction, CellToken, ColumnOrRowAction, ColumnOrRowToken, FormAction, FormToken, HistoryToken,
    LabelMappingAction, LabelMappingToken, MetadataAction, MetadataToken, PluginAction,
    SpreadsheetAction, SpreadsheetIdAndName, SpreadsheetListAction,
};

/// Result of a setter whose payload is validated.
pub type Transition<'a> = Result<Cow<'a, HistoryToken>, HistoryTokenError>;

// ── Selection dispatch ──────────────────────────────────────────────────────

/// The part of the current mode that survives a selection change.
#[derive(Debug, Clone, PartialEq)]
enum Carry {
    /// An editor or list that makes sense for any cell selection.
    Cell(CellAction),
    /// The context menu, which exists for every selection kind.
    Menu,
    Nothing,
}

/// Build the token for `selection`: a cell token for cells, ranges and
/// labels, a column or row token otherwise. The result is a plain selection.
pub fn selection_token(
    sheet: SpreadsheetIdAndName,
    selection: AnchoredSpreadsheetSelection,
) -> Result<HistoryToken, HistoryTokenError> {
    dispatch(sheet, selection, Carry::Nothing)
}

fn dispatch(
    sheet: SpreadsheetIdAndName,
    selection: AnchoredSpreadsheetSelection,
    carry: Carry,
) -> Result<HistoryToken, HistoryTokenError> {
    if selection.selection().is_cell_like() {
        let action = match carry {
            Carry::Cell(action) => action,
            Carry::Menu => CellAction::Menu,
            Carry::Nothing => CellAction::Select,
        };
        CellToken::new(sheet, selection, action).map(HistoryToken::Cell)
    } else {
        let action = match carry {
            Carry::Menu => ColumnOrRowAction::Menu,
            Carry::Cell(_) | Carry::Nothing => ColumnOrRowAction::Select,
        };
        ColumnOrRowToken::new(sheet, selection, action).map(HistoryToken::ColumnOrRow)
    }
}

impl HistoryToken {
    /// `/<id>/<name>/<cell|column|row>/<selection>` for any selection kind.
    pub fn selection(
        id: SpreadsheetId,
        name: SpreadsheetName,
        selection: AnchoredSpreadsheetSelection,
    ) -> Result<Self, HistoryTokenError> {
        selection_token(SpreadsheetIdAndName::new(id, name), selection)
    }

    fn carry(&self) -> Carry {
        match self {
            HistoryToken::Cell(t) => match t.action() {
                CellAction::Menu => Carry::Menu,
                action @ (CellAction::FormulaSelect
                | CellAction::StyleSelect(_)
                | CellAction::FormatterSelect(_)
                | CellAction::ParserSelect(_)
                | CellAction::ValidatorSelect
                | CellAction::LocaleSelect
                | CellAction::CurrencySelect
                | CellAction::DateTimeSymbolsSelect
                | CellAction::DecimalNumberSymbolsSelect
                | CellAction::ValueSelect(_)
                | CellAction::Find(_)
                | CellAction::Labels(_)
                | CellAction::References(_)) => Carry::Cell(action.clone()),
                CellAction::LabelsReload(oc) => Carry::Cell(CellAction::Labels(*oc)),
                CellAction::ReferencesReload(oc) => Carry::Cell(CellAction::References(*oc)),
                _ => Carry::Nothing,
            },
            HistoryToken::ColumnOrRow(t) if *t.action() == ColumnOrRowAction::Menu => Carry::Menu,
            _ => Carry::Nothing,
        }
    }

    // ── Plumbing ────────────────────────────────────────────────────────

    fn settle(&self, next: HistoryToken) -> Cow<'_, HistoryToken> {
        if next == *self {
            Cow::Borrowed(self)
        } else {
            Cow::Owned(next)
        }
    }

    fn settle_opt(&self, next: Option<HistoryToken>) -> Cow<'_, HistoryToken> {
        match next {
            Some(next) => self.settle(next),
            None => Cow::Borrowed(self),
        }
    }

    /// Replace a cell action with one that needs no validation.
    fn map_cell(&self, f: impl FnOnce(&CellAction) -> Option<CellAction>) -> Cow<'_, HistoryToken> {
        let next = match self {
            HistoryToken::Cell(t) => f(t.action()).map(|a| HistoryToken::Cell(t.with_plain_action(a))),
            _ => None,
        };
        self.settle_opt(next)
    }

    /// Replace a cell action, validating the result.
    fn try_map_cell(
        &self,
        f: impl FnOnce(&CellAction) -> Result<Option<CellAction>, HistoryTokenError>,
    ) -> Transition<'_> {
        let HistoryToken::Cell(t) = self else {
            return Ok(Cow::Borrowed(self));
        };
        Ok(match f(t.action())? {
            Some(action) => self.settle(HistoryToken::Cell(t.with_action(action)?)),
            None => Cow::Borrowed(self),
        })
    }

    fn map_column_or_row(
        &self,
        f: impl FnOnce(&ColumnOrRowAction) -> Option<ColumnOrRowAction>,
    ) -> Cow<'_, HistoryToken> {
        let next = match self {
            HistoryToken::ColumnOrRow(t) => {
                f(t.action()).map(|a| HistoryToken::ColumnOrRow(t.with_plain_action(a)))
            }
            _ => None,
        };
        self.settle_opt(next)
    }

    fn try_map_column_or_row(
        &self,
        f: impl FnOnce(&ColumnOrRowAction) -> Result<Option<ColumnOrRowAction>, HistoryTokenError>,
    ) -> Transition<'_> {
        let HistoryToken::ColumnOrRow(t) = self else {
            return Ok(Cow::Borrowed(self));
        };
        Ok(match f(t.action())? {
            Some(action) => self.settle(HistoryToken::ColumnOrRow(t.with_action(action)?)),
            None => Cow::Borrowed(self),
        })
    }

    /// Same action for cells, columns and rows.
    fn set_selection_action(
        &self,
        cell: CellAction,
        column_or_row: ColumnOrRowAction,
    ) -> Transition<'_> {
        match self {
            HistoryToken::Cell(_) => self.try_map_cell(|_| Ok(Some(cell))),
            HistoryToken::ColumnOrRow(_) => self.try_map_column_or_row(|_| Ok(Some(column_or_row))),
            _ => Ok(Cow::Borrowed(self)),
        }
    }

    // ── Spreadsheet and selection ───────────────────────────────────────

    /// Move the current state to another spreadsheet.
    ///
    /// A load token becomes the plain spreadsheet token once the name is known.
    pub fn set_id_and_name(&self, id: SpreadsheetId, name: SpreadsheetName) -> Cow<'_, HistoryToken> {
        let sheet = SpreadsheetIdAndName::new(id, name);
        let next = match self {
            HistoryToken::SpreadsheetLoad(_) => {
                Some(HistoryToken::with_sheet(sheet, SpreadsheetAction::Select))
            }
            HistoryToken::Spreadsheet(t) => Some(HistoryToken::Spreadsheet(t.with_sheet(sheet))),
            HistoryToken::Cell(t) => Some(HistoryToken::Cell(t.with_sheet(sheet))),
            HistoryToken::ColumnOrRow(t) => Some(HistoryToken::ColumnOrRow(t.with_sheet(sheet))),
            HistoryToken::LabelMapping(t) => Some(HistoryToken::LabelMapping(t.with_sheet(sheet))),
            HistoryToken::Metadata(t) => Some(HistoryToken::Metadata(t.with_sheet(sheet))),
            HistoryToken::Form(t) => Some(HistoryToken::Form(t.with_sheet(sheet))),
            HistoryToken::SpreadsheetCreate
            | HistoryToken::SpreadsheetList(_)
            | HistoryToken::Plugin(_) => None,
        };
        self.settle_opt(next)
    }

    /// Select something else in the same spreadsheet, or nothing.
    ///
    /// Editors that apply to any cell selection stay open when moving between
    /// cells; the context menu stays open across every kind. Everything else
    /// becomes a plain selection.
    pub fn set_selection(&self, selection: Option<AnchoredSpreadsheetSelection>) -> Transition<'_> {
        let Some(sheet) = self.sheet() else {
            return Ok(Cow::Borrowed(self));
        };
        if selection.as_ref() == self.anchored_selection() {
            return Ok(Cow::Borrowed(self));
        }
        let next = match selection {
            None => HistoryToken::with_sheet(sheet.clone(), SpreadsheetAction::Select),
            Some(selection) => dispatch(sheet.clone(), selection, self.carry())?,
        };
        Ok(self.settle(next))
    }

    /// Change the anchor of the current selection, keeping the action.
    pub fn set_anchor(&self, anchor: SpreadsheetViewportAnchor) -> Transition<'_> {
        match self {
            HistoryToken::Cell(t) => {
                let selection = t.selection().with_anchor(anchor)?;
                Ok(self.settle(HistoryToken::Cell(t.with_selection(selection)?)))
            }
            HistoryToken::ColumnOrRow(t) => {
                let selection = t.selection().with_anchor(anchor)?;
                Ok(self.settle(HistoryToken::ColumnOrRow(t.with_selection(selection)?)))
            }
            _ => Ok(Cow::Borrowed(self)),
        }
    }

    /// Open the rename dialog of the current spreadsheet.
    pub fn set_rename(&self) -> Cow<'_, HistoryToken> {
        let next = self
            .sheet()
            .map(|sheet| HistoryToken::with_sheet(sheet.clone(), SpreadsheetAction::RenameSelect));
        self.settle_opt(next)
    }

    /// Move the viewport: spreadsheet, cell, column and row tokens.
    pub fn set_navigation(&self, navigations: ViewportNavigationList) -> Cow<'_, HistoryToken> {
        match self {
            HistoryToken::Spreadsheet(t) => {
                self.settle(HistoryToken::Spreadsheet(t.with_action(SpreadsheetAction::Navigate(navigations))))
            }
            HistoryToken::Cell(_) => self.map_cell(|_| Some(CellAction::Navigate(navigations))),
            HistoryToken::ColumnOrRow(_) => {
                self.map_column_or_row(|_| Some(ColumnOrRowAction::Navigate(navigations)))
            }
            _ => Cow::Borrowed(self),
        }
    }

    // ── Actions shared by several families ──────────────────────────────

    /// Context menu for the current selection.
    pub fn set_menu(&self) -> Cow<'_, HistoryToken> {
        match self {
            HistoryToken::Cell(_) => self.map_cell(|_| Some(CellAction::Menu)),
            _ => self.map_column_or_row(|_| Some(ColumnOrRowAction::Menu)),
        }
    }

    /// Delete whatever the token points at.
    pub fn set_delete(&self) -> Cow<'_, HistoryToken> {
        let next = match self {
            HistoryToken::SpreadsheetList(
                SpreadsheetListAction::RenameSelect(id) | SpreadsheetListAction::RenameSave(id, _),
            ) => Some(HistoryToken::spreadsheet_list_delete(*id)),
            HistoryToken::Spreadsheet(t) => {
                Some(HistoryToken::Spreadsheet(t.with_action(SpreadsheetAction::Delete)))
            }
            HistoryToken::Cell(_) => return self.map_cell(|_| Some(CellAction::Delete)),
            HistoryToken::ColumnOrRow(_) => {
                return self.map_column_or_row(|_| Some(ColumnOrRowAction::Delete));
            }
            HistoryToken::LabelMapping(t) => t
                .label()
                .map(|label| HistoryToken::LabelMapping(t.with_action(LabelMappingAction::Delete(label.clone())))),
            HistoryToken::Form(t) => t
                .form_name()
                .map(|name| HistoryToken::Form(form_plain(t, FormAction::Delete(name.clone())))),
            HistoryToken::Plugin(t) => match t.action() {
                PluginAction::Select(name) | PluginAction::FileView(name, _) => {
                    Some(HistoryToken::plugin(PluginAction::Delete(name.clone())))
                }
                _ => None,
            },
            _ => None,
        };
        self.settle_opt(next)
    }

    /// Clear the selected cells, columns or rows.
    pub fn set_clear(&self) -> Cow<'_, HistoryToken> {
        match self {
            HistoryToken::Cell(_) => self.map_cell(|_| Some(CellAction::Clear)),
            _ => self.map_column_or_row(|_| Some(ColumnOrRowAction::Clear)),
        }
    }

    /// Freeze up to the selection. Fails unless it starts at the first column or row.
    pub fn set_freeze(&self) -> Transition<'_> {
        self.set_selection_action(CellAction::Freeze, ColumnOrRowAction::Freeze)
    }

    /// Unfreeze. Fails under the same condition as [`HistoryToken::set_freeze`].
    pub fn set_unfreeze(&self) -> Transition<'_> {
        self.set_selection_action(CellAction::Unfreeze, ColumnOrRowAction::Unfreeze)
    }

    /// Refetch: lists keep their window, spreadsheets and cells reload.
    pub fn set_reload(&self) -> Cow<'_, HistoryToken> {
        let next = match self {
            HistoryToken::SpreadsheetList(SpreadsheetListAction::Select(oc)) => {
                Some(HistoryToken::spreadsheet_list_reload(*oc))
            }
            HistoryToken::Plugin(t) => match t.action() {
                PluginAction::ListSelect(oc) => Some(HistoryToken::plugin(PluginAction::ListReload(*oc))),
                _ => None,
            },
            HistoryToken::Spreadsheet(t) => {
                Some(HistoryToken::Spreadsheet(t.with_action(SpreadsheetAction::Reload)))
            }
            HistoryToken::Cell(_) => {
                return self.map_cell(|action| {
                    Some(match action {
                        CellAction::Labels(oc) => CellAction::LabelsReload(*oc),
                        CellAction::References(oc) => CellAction::ReferencesReload(*oc),
                        CellAction::LabelsReload(_) | CellAction::ReferencesReload(_) => return None,
                        _ => CellAction::Reload,
                    })
                });
            }
            HistoryToken::LabelMapping(t) => match t.action() {
                LabelMappingAction::List(oc) => {
                    Some(HistoryToken::LabelMapping(t.with_action(LabelMappingAction::ListReload(*oc))))
                }
                _ => None,
            },
            HistoryToken::Form(t) => match t.action() {
                FormAction::List(oc) => Some(HistoryToken::Form(form_plain(t, FormAction::ListReload(*oc)))),
                _ => None,
            },
            _ => None,
        };
        self.settle_opt(next)
    }

    /// Sort dialog with comparator text being edited.
    pub fn set_sort_edit(&self, text: &str) -> Cow<'_, HistoryToken> {
        match self {
            HistoryToken::Cell(_) => self.map_cell(|_| Some(CellAction::SortEdit(text.to_owned()))),
            _ => self.map_column_or_row(|_| Some(ColumnOrRowAction::SortEdit(text.to_owned()))),
        }
    }

    /// Sort by comparators. Fails when they do not fit the selection.
    pub fn set_sort_save(&self, comparators: SortComparators) -> Transition<'_> {
        self.set_selection_action(
            CellAction::SortSave(comparators.clone()),
            ColumnOrRowAction::SortSave(comparators),
        )
    }

    // ── Column and row ──────────────────────────────────────────────────

    /// Hide the selected columns or rows.
    pub fn set_hide(&self) -> Cow<'_, HistoryToken> {
        self.map_column_or_row(|_| Some(ColumnOrRowAction::Hide))
    }

    /// Show the selected columns or rows again.
    pub fn set_unhide(&self) -> Cow<'_, HistoryToken> {
        self.map_column_or_row(|_| Some(ColumnOrRowAction::Unhide))
    }

    /// Insert `count` columns or rows before the selection. Zero is rejected.
    pub fn set_insert_before(&self, count: u32) -> Transition<'_> {
        self.try_map_column_or_row(|_| Ok(Some(ColumnOrRowAction::InsertBefore(count))))
    }

    /// Insert `count` columns or rows after the selection. Zero is rejected.
    pub fn set_insert_after(&self, count: u32) -> Transition<'_> {
        self.try_map_column_or_row(|_| Ok(Some(ColumnOrRowAction::InsertAfter(count))))
    }

    // ── Cell editors ────────────────────────────────────────────────────

    /// Formula editor.
    pub fn set_formula(&self) -> Cow<'_, HistoryToken> {
        self.map_cell(|_| Some(CellAction::FormulaSelect))
    }

    /// Clear the cell, then open the formula editor.
    pub fn set_clear_and_formula(&self) -> Cow<'_, HistoryToken> {
        self.map_cell(|_| Some(CellAction::ClearAndFormula))
    }

    /// Style editor for one property.
    pub fn set_style(&self, property: TextStylePropertyName) -> Cow<'_, HistoryToken> {
        match self {
            HistoryToken::Metadata(t) => {
                let next = metadata_plain(t, MetadataAction::StyleSelect(property));
                self.settle(HistoryToken::Metadata(next))
            }
            _ => self.map_cell(|_| Some(CellAction::StyleSelect(property))),
        }
    }

    /// Formatter editor.
    pub fn set_formatter(&self) -> Cow<'_, HistoryToken> {
        self.map_cell(|_| Some(CellAction::FormatterSelect(None)))
    }

    /// Parser editor.
    pub fn set_parser(&self) -> Cow<'_, HistoryToken> {
        self.map_cell(|_| Some(CellAction::ParserSelect(None)))
    }

    /// Pick the pattern kind of an open formatter or parser editor.
    ///
    /// Fails when a parse kind is given to the formatter or the other way round.
    pub fn set_pattern_kind(&self, kind: Option<PatternKind>) -> Transition<'_> {
        self.try_map_cell(|action| {
            Ok(match action {
                CellAction::FormatterSelect(_) | CellAction::FormatterSave(_) => {
                    Some(CellAction::FormatterSelect(kind))
                }
                CellAction::ParserSelect(_) | CellAction::ParserSave(_) => {
                    Some(CellAction::ParserSelect(kind))
                }
                _ => None,
            })
        })
    }

    /// Validator editor.
    pub fn set_validator(&self) -> Cow<'_, HistoryToken> {
        self.map_cell(|_| Some(CellAction::ValidatorSelect))
    }

    /// Locale editor.
    pub fn set_locale(&self) -> Cow<'_, HistoryToken> {
        self.map_cell(|_| Some(CellAction::LocaleSelect))
    }

    /// Currency editor.
    pub fn set_currency(&self) -> Cow<'_, HistoryToken> {
        self.map_cell(|_| Some(CellAction::CurrencySelect))
    }

    /// Date-time symbols editor.
    pub fn set_date_time_symbols(&self) -> Cow<'_, HistoryToken> {
        self.map_cell(|_| Some(CellAction::DateTimeSymbolsSelect))
    }

    /// Decimal number symbols editor.
    pub fn set_decimal_number_symbols(&self) -> Cow<'_, HistoryToken> {
        self.map_cell(|_| Some(CellAction::DecimalNumberSymbolsSelect))
    }

    /// Value editor for a value type.
    pub fn set_value_type(&self, value_type: ValueTypeName) -> Cow<'_, HistoryToken> {
        self.map_cell(|_| Some(CellAction::ValueSelect(value_type)))
    }

    /// Copy the selection to the clipboard.
    pub fn set_copy(&self, kind: ClipboardValueKind) -> Cow<'_, HistoryToken> {
        self.map_cell(|_| Some(CellAction::Copy(kind)))
    }

    /// Cut the selection to the clipboard.
    pub fn set_cut(&self, kind: ClipboardValueKind) -> Cow<'_, HistoryToken> {
        self.map_cell(|_| Some(CellAction::Cut(kind)))
    }

    /// Paste the clipboard into the selection.
    pub fn set_paste(&self, kind: ClipboardValueKind) -> Cow<'_, HistoryToken> {
        self.map_cell(|_| Some(CellAction::Paste(kind)))
    }

    /// Find cells within the selection.
    pub fn set_find(&self, query: CellFindQuery) -> Cow<'_, HistoryToken> {
        self.map_cell(|_| Some(CellAction::Find(query)))
    }

    /// Labels pointing at the selection.
    pub fn set_labels(&self, offset_and_count: OffsetAndCount) -> Cow<'_, HistoryToken> {
        self.map_cell(|_| Some(CellAction::Labels(offset_and_count)))
    }

    /// Cells referencing the selection.
    pub fn set_references(&self, offset_and_count: OffsetAndCount) -> Cow<'_, HistoryToken> {
        self.map_cell(|_| Some(CellAction::References(offset_and_count)))
    }

    // ── Labels and metadata ─────────────────────────────────────────────

    /// Open the label editor for `label` in the current spreadsheet.
    pub fn set_label(&self, label: LabelName) -> Cow<'_, HistoryToken> {
        let next = self.sheet().map(|sheet| {
            HistoryToken::LabelMapping(LabelMappingToken::new(
                sheet.clone(),
                LabelMappingAction::Select(label),
            ))
        });
        self.settle_opt(next)
    }

    /// Open one metadata property of the current spreadsheet.
    pub fn set_metadata_property(&self, property: MetadataPropertyName) -> Cow<'_, HistoryToken> {
        let next = self.sheet().map(|sheet| {
            HistoryToken::Metadata(metadata_plain_new(sheet.clone(), MetadataAction::PropertySelect(property)))
        });
        self.settle_opt(next)
    }

    // ── Paging ──────────────────────────────────────────────────────────

    /// The paging window of list tokens.
    pub fn offset_and_count(&self) -> Option<OffsetAndCount> {
        match self {
            HistoryToken::SpreadsheetList(
                SpreadsheetListAction::Select(oc) | SpreadsheetListAction::Reload(oc),
            ) => Some(*oc),
            HistoryToken::Plugin(t) => match t.action() {
                PluginAction::ListSelect(oc) | PluginAction::ListReload(oc) => Some(*oc),
                _ => None,
            },
            HistoryToken::Cell(t) => match t.action() {
                CellAction::Labels(oc)
                | CellAction::References(oc)
                | CellAction::LabelsReload(oc)
                | CellAction::ReferencesReload(oc) => Some(*oc),
                _ => None,
            },
            HistoryToken::LabelMapping(t) => match t.action() {
                LabelMappingAction::List(oc) | LabelMappingAction::ListReload(oc) => Some(*oc),
                _ => None,
            },
            HistoryToken::Form(t) => match t.action() {
                FormAction::List(oc) | FormAction::ListReload(oc) => Some(*oc),
                _ => None,
            },
            _ => None,
        }
    }

    /// Replace the paging window of a list token.
    pub fn set_offset_and_count(&self, oc: OffsetAndCount) -> Cow<'_, HistoryToken> {
        let next = match self {
            HistoryToken::SpreadsheetList(SpreadsheetListAction::Select(_)) => {
                Some(HistoryToken::spreadsheet_list_select(oc))
            }
            HistoryToken::SpreadsheetList(SpreadsheetListAction::Reload(_)) => {
                Some(HistoryToken::spreadsheet_list_reload(oc))
            }
            HistoryToken::Plugin(t) => match t.action() {
                PluginAction::ListSelect(_) => Some(HistoryToken::plugin(PluginAction::ListSelect(oc))),
                PluginAction::ListReload(_) => Some(HistoryToken::plugin(PluginAction::ListReload(oc))),
                _ => None,
            },
            HistoryToken::Cell(_) => {
                return self.map_cell(|action| match action {
                    CellAction::Labels(_) => Some(CellAction::Labels(oc)),
                    CellAction::References(_) => Some(CellAction::References(oc)),
                    CellAction::LabelsReload(_) => Some(CellAction::LabelsReload(oc)),
                    CellAction::ReferencesReload(_) => Some(CellAction::ReferencesReload(oc)),
                    _ => None,
                });
            }
            HistoryToken::LabelMapping(t) => match t.action() {
                LabelMappingAction::List(_) => {
                    Some(HistoryToken::LabelMapping(t.with_action(LabelMappingAction::List(oc))))
                }
                LabelMappingAction::ListReload(_) => {
                    Some(HistoryToken::LabelMapping(t.with_action(LabelMappingAction::ListReload(oc))))
                }
                _ => None,
            },
            HistoryToken::Form(t) => match t.action() {
                FormAction::List(_) => Some(HistoryToken::Form(form_plain(t, FormAction::List(oc)))),
                FormAction::ListReload(_) => Some(HistoryToken::Form(form_plain(t, FormAction::ListReload(oc)))),
                _ => None,
            },
            _ => None,
        };
        self.settle_opt(next)
    }

    /// Replace the page size of a list token or a find query.
    pub fn set_count(&self, count: Option<u32>) -> Cow<'_, HistoryToken> {
        if let HistoryToken::Cell(t) = self
            && let CellAction::Find(query) = t.action()
        {
            let query = query.clone().set_count(count);
            return self.map_cell(|_| Some(CellAction::Find(query)));
        }
        match self.offset_and_count() {
            Some(oc) => self.set_offset_and_count(oc.set_count(count)),
            None => Cow::Borrowed(self),
        }
    }

    // ── Saving ──────────────────────────────────────────────────────────

    /// Attach a value to the open editor, turning it into its save token.
    ///
    /// The text is interpreted as the editor expects: formulas, patterns and
    /// validators verbatim, locales and currencies by their grammar, symbols
    /// and values as JSON, sort comparators, label targets, names. An empty
    /// value clears the property, except for formulas. Tokens without an
    /// editor are returned unchanged.
    pub fn set_save(&self, value: &str) -> Transition<'_> {
        let text = (!value.is_empty()).then(|| value.to_owned());
        match self {
            HistoryToken::Cell(_) => self.try_map_cell(|action| {
                Ok(Some(match action {
                    CellAction::FormulaSelect | CellAction::FormulaSave(_) => {
                        CellAction::FormulaSave(value.to_owned())
                    }
                    CellAction::StyleSelect(p) | CellAction::StyleSave(p, _) => CellAction::StyleSave(*p, text),
                    CellAction::FormatterSelect(_) | CellAction::FormatterSave(_) => {
                        CellAction::FormatterSave(text)
                    }
                    CellAction::ParserSelect(_) | CellAction::ParserSave(_) => CellAction::ParserSave(text),
                    CellAction::ValidatorSelect | CellAction::ValidatorSave(_) => {
                        CellAction::ValidatorSave(text)
                    }
                    CellAction::LocaleSelect | CellAction::LocaleSave(_) => {
                        CellAction::LocaleSave(optional(value)?)
                    }
                    CellAction::CurrencySelect | CellAction::CurrencySave(_) => {
                        CellAction::CurrencySave(optional(value)?)
                    }
                    CellAction::DateTimeSymbolsSelect | CellAction::DateTimeSymbolsSave(_) => {
                        CellAction::DateTimeSymbolsSave(optional_json(value)?)
                    }
                    CellAction::DecimalNumberSymbolsSelect | CellAction::DecimalNumberSymbolsSave(_) => {
                        CellAction::DecimalNumberSymbolsSave(optional_json(value)?)
                    }
                    CellAction::ValueSelect(t) | CellAction::ValueSave(t, _) => {
                        CellAction::ValueSave(*t, optional_json(value)?)
                    }
                    CellAction::SortEdit(_) | CellAction::SortSave(_) => CellAction::SortSave(value.parse()?),
                    _ => return Ok(None),
                }))
            }),
            HistoryToken::ColumnOrRow(_) => self.try_map_column_or_row(|action| {
                Ok(match action {
                    ColumnOrRowAction::SortEdit(_) | ColumnOrRowAction::SortSave(_) => {
                        Some(ColumnOrRowAction::SortSave(value.parse()?))
                    }
                    _ => None,
                })
            }),
            HistoryToken::Metadata(t) => {
                let action = match t.action() {
                    MetadataAction::PropertySelect(p) | MetadataAction::PropertySave(p, _) => {
                        MetadataAction::PropertySave(*p, text)
                    }
                    MetadataAction::StyleSelect(p) | MetadataAction::StyleSave(p, _) => {
                        MetadataAction::StyleSave(*p, text)
                    }
                    MetadataAction::Select => return Ok(Cow::Borrowed(self)),
                };
                Ok(self.settle(HistoryToken::Metadata(t.with_action(action)?)))
            }
            HistoryToken::LabelMapping(t) => match t.action() {
                LabelMappingAction::Select(label) => {
                    let mapping = LabelMapping::new(label.clone(), value.parse()?)?;
                    Ok(self.settle(HistoryToken::LabelMapping(t.with_action(LabelMappingAction::Save(mapping)))))
                }
                LabelMappingAction::Save(mapping) => {
                    let mapping = LabelMapping::new(mapping.label().clone(), value.parse()?)?;
                    Ok(self.settle(HistoryToken::LabelMapping(t.with_action(LabelMappingAction::Save(mapping)))))
                }
                _ => Ok(Cow::Borrowed(self)),
            },
            HistoryToken::Form(t) => match t.action() {
                FormAction::Select(name) | FormAction::Save(name, _) => {
                    let form = json(value)?;
                    Ok(self.settle(HistoryToken::Form(t.with_action(FormAction::Save(name.clone(), form))?)))
                }
                _ => Ok(Cow::Borrowed(self)),
            },
            HistoryToken::Spreadsheet(t) => match t.action() {
                SpreadsheetAction::RenameSelect | SpreadsheetAction::RenameSave(_) => {
                    let name = value.parse()?;
                    Ok(self.settle(HistoryToken::Spreadsheet(t.with_action(SpreadsheetAction::RenameSave(name)))))
                }
                _ => Ok(Cow::Borrowed(self)),
            },
            HistoryToken::SpreadsheetList(
                SpreadsheetListAction::RenameSelect(id) | SpreadsheetListAction::RenameSave(id, _),
            ) => Ok(self.settle(HistoryToken::spreadsheet_list_rename_save(*id, value.parse()?))),
            HistoryToken::Plugin(t)
                if matches!(t.action(), PluginAction::UploadSelect | PluginAction::UploadSave(_)) =>
            {
                Ok(self.settle(HistoryToken::plugin(PluginAction::UploadSave(value.parse()?))))
            }
            _ => Ok(Cow::Borrowed(self)),
        }
    }

    // ── Clearing ────────────────────────────────────────────────────────

    /// The token to show when the user dismisses the current mode.
    ///
    /// Saves return to their editor, other modes to the plain selection and
    /// spreadsheet dialogs to the spreadsheet. Lists, plain selections and
    /// navigation return themselves.
    pub fn clear_action(&self) -> Cow<'_, HistoryToken> {
        let next = match self {
            HistoryToken::SpreadsheetCreate | HistoryToken::SpreadsheetLoad(_) => None,
            HistoryToken::SpreadsheetList(action) => match action {
                SpreadsheetListAction::Select(_) | SpreadsheetListAction::Reload(_) => None,
                SpreadsheetListAction::RenameSelect(_)
                | SpreadsheetListAction::RenameSave(..)
                | SpreadsheetListAction::Delete(_) => {
                    Some(HistoryToken::spreadsheet_list_select(OffsetAndCount::EMPTY))
                }
            },
            HistoryToken::Spreadsheet(t) => match t.action() {
                SpreadsheetAction::Select | SpreadsheetAction::Navigate(_) => None,
                _ => Some(HistoryToken::Spreadsheet(t.with_action(SpreadsheetAction::Select))),
            },
            HistoryToken::Cell(t) => clear_cell(t.action()).map(|a| HistoryToken::Cell(t.with_plain_action(a))),
            HistoryToken::ColumnOrRow(t) => match t.action() {
                ColumnOrRowAction::Select | ColumnOrRowAction::Navigate(_) => None,
                ColumnOrRowAction::SortSave(comparators) => Some(ColumnOrRowAction::SortEdit(comparators.to_string())),
                _ => Some(ColumnOrRowAction::Select),
            }
            .map(|a| HistoryToken::ColumnOrRow(t.with_plain_action(a))),
            HistoryToken::LabelMapping(t) => match t.action() {
                LabelMappingAction::List(_) | LabelMappingAction::ListReload(_) => None,
                LabelMappingAction::Save(mapping) => Some(HistoryToken::LabelMapping(
                    t.with_action(LabelMappingAction::Select(mapping.label().clone())),
                )),
                LabelMappingAction::Create | LabelMappingAction::Select(_) | LabelMappingAction::Delete(_) => {
                    Some(HistoryToken::with_sheet(t.sheet().clone(), SpreadsheetAction::Select))
                }
            },
            HistoryToken::Metadata(t) => match t.action() {
                MetadataAction::Select => {
                    Some(HistoryToken::with_sheet(t.sheet().clone(), SpreadsheetAction::Select))
                }
                MetadataAction::PropertySelect(_) | MetadataAction::StyleSelect(_) => {
                    Some(HistoryToken::Metadata(metadata_plain(t, MetadataAction::Select)))
                }
                MetadataAction::PropertySave(p, _) => {
                    Some(HistoryToken::Metadata(metadata_plain(t, MetadataAction::PropertySelect(*p))))
                }
                MetadataAction::StyleSave(p, _) => {
                    Some(HistoryToken::Metadata(metadata_plain(t, MetadataAction::StyleSelect(*p))))
                }
            },
            HistoryToken::Form(t) => match t.action() {
                FormAction::List(_) | FormAction::ListReload(_) => None,
                FormAction::Select(_) | FormAction::Delete(_) => {
                    Some(HistoryToken::Form(form_plain(t, FormAction::List(OffsetAndCount::EMPTY))))
                }
                FormAction::Save(name, _) => Some(HistoryToken::Form(form_plain(t, FormAction::Select(name.clone())))),
            },
            HistoryToken::Plugin(t) => match t.action() {
                PluginAction::ListSelect(_) | PluginAction::ListReload(_) => None,
                _ => Some(HistoryToken::plugin(PluginAction::ListSelect(OffsetAndCount::EMPTY))),
            },
        };
        self.settle_opt(next)
    }
}

fn clear_cell(action: &CellAction) -> Option<CellAction> {
    Some(match action {
        CellAction::Select | CellAction::Navigate(_) => return None,
        CellAction::FormulaSave(_) => CellAction::FormulaSelect,
        CellAction::StyleSave(p, _) => CellAction::StyleSelect(*p),
        CellAction::FormatterSave(_) => CellAction::FormatterSelect(None),
        CellAction::ParserSave(_) => CellAction::ParserSelect(None),
        CellAction::ValidatorSave(_) => CellAction::ValidatorSelect,
        CellAction::LocaleSave(_) => CellAction::LocaleSelect,
        CellAction::CurrencySave(_) => CellAction::CurrencySelect,
        CellAction::DateTimeSymbolsSave(_) => CellAction::DateTimeSymbolsSelect,
        CellAction::DecimalNumberSymbolsSave(_) => CellAction::DecimalNumberSymbolsSelect,
        CellAction::ValueSave(value_type, _) => CellAction::ValueSelect(*value_type),
        CellAction::SortSave(comparators) => CellAction::SortEdit(comparators.to_string()),
        _ => CellAction::Select,
    })
}

// Metadata and form actions without a payload are always valid.

fn metadata_plain(token: &MetadataToken, action: MetadataAction) -> MetadataToken {
    metadata_plain_new(token.sheet().clone(), action)
}

fn metadata_plain_new(sheet: SpreadsheetIdAndName, action: MetadataAction) -> MetadataToken {
    debug_assert!(!matches!(action, MetadataAction::PropertySave(..)));
    MetadataToken::unchecked(sheet, action)
}

fn form_plain(token: &FormToken, action: FormAction) -> FormToken {
    debug_assert!(!matches!(action, FormAction::Save(..)));
    FormToken::unchecked(token.sheet().clone(), action)
}

fn optional<T>(value: &str) -> Result<Option<T>, HistoryTokenError>
where
    T: FromStr<Err = HistoryTokenError>,
{
    if value.is_empty() {
        Ok(None)
    } else {
        value.parse().map(Some)
    }
}

fn json(value: &str) -> Result<Value, HistoryTokenError> {
    serde_json::from_str(value).map_err(|e| HistoryTokenError::invalid("json", e.to_string()))
}

fn optional_json(value: &str) -> Result<Option<Value>, HistoryTokenError> {
    if value.is_empty() { Ok(None) } else { json(value).map(Some) }
}
