use serde_json::Value;

use crate::error::HistoryTokenError;
use crate::fragment::FragmentBuilder;
use crate::payload::{
    CellFindQuery, CellSaveValues, ClipboardValueKind, Currency, Locale, OffsetAndCount, PatternKind,
    SaveEntity, SortComparators, TextStylePropertyName, ValueTypeName, ViewportNavigationList,
};
use crate::reference::AnchoredSpreadsheetSelection;

use super::{SpreadsheetIdAndName, require_object};

/// What is happening to a cell, cell range or label selection.
///
/// `*Save(None)` clears the property; formulas use the empty string instead.
#[derive(Debug, Clone, PartialEq)]
pub enum CellAction {
    /// Plain selection.
    Select,
    /// Context menu.
    Menu,
    /// Delete the cells.
    Delete,
    /// Clear the cells, keeping them in place.
    Clear,
    /// Freeze the columns and rows up to the selection.
    Freeze,
    /// Unfreeze.
    Unfreeze,
    /// Refetch the cells.
    Reload,
    /// Formula editor.
    FormulaSelect,
    /// Clear the cell then open the formula editor.
    ClearAndFormula,
    /// Save formula text.
    FormulaSave(String),
    /// Style property editor.
    StyleSelect(TextStylePropertyName),
    /// Save a style property.
    StyleSave(TextStylePropertyName, Option<String>),
    /// Formatter editor, optionally for one pattern kind.
    FormatterSelect(Option<PatternKind>),
    /// Save a formatter.
    FormatterSave(Option<String>),
    /// Parser editor, optionally for one pattern kind.
    ParserSelect(Option<PatternKind>),
    /// Save a parser.
    ParserSave(Option<String>),
    /// Validator editor.
    ValidatorSelect,
    /// Save a validator.
    ValidatorSave(Option<String>),
    /// Locale editor.
    LocaleSelect,
    /// Save a locale.
    LocaleSave(Option<Locale>),
    /// Currency editor.
    CurrencySelect,
    /// Save a currency.
    CurrencySave(Option<Currency>),
    /// Date-time symbols editor.
    DateTimeSymbolsSelect,
    /// Save date-time symbols (an object).
    DateTimeSymbolsSave(Option<Value>),
    /// Decimal number symbols editor.
    DecimalNumberSymbolsSelect,
    /// Save decimal number symbols (an object).
    DecimalNumberSymbolsSave(Option<Value>),
    /// Value editor for a type.
    ValueSelect(ValueTypeName),
    /// Save a value of a type.
    ValueSave(ValueTypeName, Option<Value>),
    /// Copy to the clipboard.
    Copy(ClipboardValueKind),
    /// Cut to the clipboard.
    Cut(ClipboardValueKind),
    /// Paste from the clipboard.
    Paste(ClipboardValueKind),
    /// Find cells.
    Find(CellFindQuery),
    /// Labels pointing at the selection.
    Labels(OffsetAndCount),
    /// Cells referencing the selection.
    References(OffsetAndCount),
    /// Refetch the labels, then return to [`CellAction::Labels`].
    LabelsReload(OffsetAndCount),
    /// Refetch the references, then return to [`CellAction::References`].
    ReferencesReload(OffsetAndCount),
    /// Sort dialog; the text is the comparators being edited.
    SortEdit(String),
    /// Sort by comparators.
    SortSave(SortComparators),
    /// Save many cells at once.
    Save(CellSaveValues),
    /// Move the viewport from this selection.
    Navigate(ViewportNavigationList),
}

/// A cell-scoped token: spreadsheet, anchored selection and action.
#[derive(Debug, Clone)]
pub struct CellToken {
    sheet: SpreadsheetIdAndName,
    selection: AnchoredSpreadsheetSelection,
    action: CellAction,
}

impl CellToken {
    /// Validates `action` against the selection. An empty text save is
    /// stored as `None`, the same clear it prints and parses back as.
    pub(crate) fn new(
        sheet: SpreadsheetIdAndName,
        selection: AnchoredSpreadsheetSelection,
        mut action: CellAction,
    ) -> Result<Self, HistoryTokenError> {
        if let CellAction::StyleSave(_, value)
        | CellAction::FormatterSave(value)
        | CellAction::ParserSave(value)
        | CellAction::ValidatorSave(value) = &mut action
        {
            empty_is_none(value);
        }
        let s = selection.selection();
        if !s.is_cell_like() {
            return Err(HistoryTokenError::SelectionKind {
                token: "cell",
                selection: s.kind_name(),
            });
        }
        match &action {
            CellAction::Freeze | CellAction::Unfreeze if !s.is_freezable() => {
                return Err(HistoryTokenError::Freeze {
                    selection: s.to_string(),
                });
            }
            CellAction::FormatterSelect(Some(kind)) if !kind.is_format() => {
                return Err(HistoryTokenError::invalid(
                    "formatter",
                    format!("{kind} is not a format pattern"),
                ));
            }
            CellAction::ParserSelect(Some(kind)) if !kind.is_parse() => {
                return Err(HistoryTokenError::invalid(
                    "parser",
                    format!("{kind} is not a parse pattern"),
                ));
            }
            CellAction::ValueSave(value_type, Some(value)) if !value_type.accepts(value) => {
                return Err(HistoryTokenError::invalid(
                    "value",
                    format!("{value} is not a {value_type}"),
                ));
            }
            CellAction::DateTimeSymbolsSave(Some(value)) => {
                require_object("date-time symbols", value)?;
            }
            CellAction::DecimalNumberSymbolsSave(Some(value)) => {
                require_object("decimal number symbols", value)?;
            }
            CellAction::SortSave(comparators) => comparators.check_selection(s)?,
            CellAction::Save(values) => values.check_selection(s)?,
            _ => {}
        }
        Ok(Self {
            sheet,
            selection,
            action,
        })
    }

    /// Same sheet and selection, validated new action.
    pub(crate) fn with_action(&self, action: CellAction) -> Result<Self, HistoryTokenError> {
        Self::new(self.sheet.clone(), self.selection.clone(), action)
    }

    /// Same sheet and selection; only for actions whose validity does not
    /// depend on the selection or a payload.
    pub(crate) fn with_plain_action(&self, action: CellAction) -> Self {
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
    pub fn action(&self) -> &CellAction {
        &self.action
    }

    pub(crate) fn kind(&self) -> &'static str {
        match &self.action {
            CellAction::Select => "cell-select",
            CellAction::Menu => "cell-menu",
            CellAction::Delete => "cell-delete",
            CellAction::Clear => "cell-clear",
            CellAction::Freeze => "cell-freeze",
            CellAction::Unfreeze => "cell-unfreeze",
            CellAction::Reload => "cell-reload",
            CellAction::FormulaSelect => "cell-formula-select",
            CellAction::ClearAndFormula => "cell-clear-and-formula",
            CellAction::FormulaSave(_) => "cell-formula-save",
            CellAction::StyleSelect(_) => "cell-style-select",
            CellAction::StyleSave(..) => "cell-style-save",
            CellAction::FormatterSelect(_) => "cell-formatter-select",
            CellAction::FormatterSave(_) => "cell-formatter-save",
            CellAction::ParserSelect(_) => "cell-parser-select",
            CellAction::ParserSave(_) => "cell-parser-save",
            CellAction::ValidatorSelect => "cell-validator-select",
            CellAction::ValidatorSave(_) => "cell-validator-save",
            CellAction::LocaleSelect => "cell-locale-select",
            CellAction::LocaleSave(_) => "cell-locale-save",
            CellAction::CurrencySelect => "cell-currency-select",
            CellAction::CurrencySave(_) => "cell-currency-save",
            CellAction::DateTimeSymbolsSelect => "cell-date-time-symbols-select",
            CellAction::DateTimeSymbolsSave(_) => "cell-date-time-symbols-save",
            CellAction::DecimalNumberSymbolsSelect => "cell-decimal-number-symbols-select",
            CellAction::DecimalNumberSymbolsSave(_) => "cell-decimal-number-symbols-save",
            CellAction::ValueSelect(_) => "cell-value-select",
            CellAction::ValueSave(..) => "cell-value-save",
            CellAction::Copy(_) => "cell-copy",
            CellAction::Cut(_) => "cell-cut",
            CellAction::Paste(_) => "cell-paste",
            CellAction::Find(_) => "cell-find",
            CellAction::Labels(_) => "cell-label-list",
            CellAction::References(_) => "cell-reference-list",
            CellAction::LabelsReload(_) => "cell-label-list-reload",
            CellAction::ReferencesReload(_) => "cell-reference-list-reload",
            CellAction::SortEdit(_) => "cell-sort-edit",
            CellAction::SortSave(_) => "cell-sort-save",
            CellAction::Save(values) => match values.entity() {
                SaveEntity::Cell => "cell-save-cell",
                SaveEntity::Formula => "cell-save-formula",
                SaveEntity::Formatter => "cell-save-formatter",
                SaveEntity::Parser => "cell-save-parser",
                SaveEntity::Style => "cell-save-style",
                SaveEntity::Value => "cell-save-value",
                SaveEntity::Validator => "cell-save-validator",
                SaveEntity::Locale => "cell-save-locale",
                SaveEntity::Currency => "cell-save-currency",
                SaveEntity::DateTimeSymbols => "cell-save-date-time-symbols",
                SaveEntity::DecimalNumberSymbols => "cell-save-decimal-number-symbols",
                SaveEntity::ValueType => "cell-save-value-type",
            },
            CellAction::Navigate(_) => "cell-navigate",
        }
    }

    pub(crate) fn write_fragment(&self, b: &mut FragmentBuilder) {
        b.segment("cell").segments(self.selection.segments());
        match &self.action {
            CellAction::Select => {}
            CellAction::Menu => {
                b.segment("menu");
            }
            CellAction::Delete => {
                b.segment("delete");
            }
            CellAction::Clear => {
                b.segment("clear");
            }
            CellAction::Freeze => {
                b.segment("freeze");
            }
            CellAction::Unfreeze => {
                b.segment("unfreeze");
            }
            CellAction::Reload => {
                b.segment("reload");
            }
            CellAction::FormulaSelect => {
                b.segment("formula");
            }
            CellAction::ClearAndFormula => {
                b.segment("clear-and-formula");
            }
            CellAction::FormulaSave(text) => {
                b.segments(["formula", "save", text.as_str()]);
            }
            CellAction::StyleSelect(p) => {
                b.segment("style").segment(p);
            }
            CellAction::StyleSave(p, value) => {
                b.segment("style").segment(p).segment("save").segment(opt(value));
            }
            CellAction::FormatterSelect(kind) => {
                b.segment("formatter");
                if let Some(kind) = kind {
                    b.segment(kind);
                }
            }
            CellAction::FormatterSave(value) => {
                b.segments(["formatter", "save", opt(value)]);
            }
            CellAction::ParserSelect(kind) => {
                b.segment("parser");
                if let Some(kind) = kind {
                    b.segment(kind);
                }
            }
            CellAction::ParserSave(value) => {
                b.segments(["parser", "save", opt(value)]);
            }
            CellAction::ValidatorSelect => {
                b.segment("validator");
            }
            CellAction::ValidatorSave(value) => {
                b.segments(["validator", "save", opt(value)]);
            }
            CellAction::LocaleSelect => {
                b.segment("locale");
            }
            CellAction::LocaleSave(value) => {
                b.segments(["locale", "save"]).segment(display_opt(value));
            }
            CellAction::CurrencySelect => {
                b.segment("currency");
            }
            CellAction::CurrencySave(value) => {
                b.segments(["currency", "save"]).segment(display_opt(value));
            }
            CellAction::DateTimeSymbolsSelect => {
                b.segment("dateTimeSymbols");
            }
            CellAction::DateTimeSymbolsSave(value) => {
                b.segments(["dateTimeSymbols", "save"]).segment(display_opt(value));
            }
            CellAction::DecimalNumberSymbolsSelect => {
                b.segment("decimalNumberSymbols");
            }
            CellAction::DecimalNumberSymbolsSave(value) => {
                b.segments(["decimalNumberSymbols", "save"]).segment(display_opt(value));
            }
            CellAction::ValueSelect(value_type) => {
                b.segment("value").segment(value_type);
            }
            CellAction::ValueSave(value_type, value) => {
                b.segment("value")
                    .segment(value_type)
                    .segment("save")
                    .segment(display_opt(value));
            }
            CellAction::Copy(kind) => {
                b.segment("copy").segment(kind);
            }
            CellAction::Cut(kind) => {
                b.segment("cut").segment(kind);
            }
            CellAction::Paste(kind) => {
                b.segment("paste").segment(kind);
            }
            CellAction::Find(query) => {
                b.segment("find").raw(&query.to_string());
            }
            CellAction::Labels(oc) => {
                b.segment("labels").raw(&oc.to_string());
            }
            CellAction::References(oc) => {
                b.segment("references").raw(&oc.to_string());
            }
            CellAction::LabelsReload(oc) => {
                b.segment("labels").raw(&oc.to_string()).segment("reload");
            }
            CellAction::ReferencesReload(oc) => {
                b.segment("references").raw(&oc.to_string()).segment("reload");
            }
            CellAction::SortEdit(text) => {
                b.segments(["sort", "edit"]);
                if !text.is_empty() {
                    b.segment(text);
                }
            }
            CellAction::SortSave(comparators) => {
                b.segments(["sort", "save"]).segment(comparators);
            }
            CellAction::Save(values) => {
                b.segment("save").segment(values.entity()).segment(values.to_json());
            }
            CellAction::Navigate(list) => {
                b.segment("navigate");
                if !list.is_empty() {
                    b.segment(list);
                }
            }
        }
    }
}

pub(super) fn empty_is_none(value: &mut Option<String>) {
    if value.as_deref() == Some("") {
        *value = None;
    }
}

pub(super) fn opt(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or_default()
}

pub(super) fn display_opt<T: std::fmt::Display>(value: &Option<T>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}
