//! Metadata and form tokens: spreadsheet-scoped, no selection.

use serde_json::Value;

use crate::error::HistoryTokenError;
use crate::fragment::FragmentBuilder;
use crate::payload::{FormName, MetadataPropertyName, OffsetAndCount, TextStylePropertyName};

use super::cell::{empty_is_none, opt};
use super::{SpreadsheetIdAndName, require_object};

/// Metadata viewer and editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataAction {
    /// The metadata panel.
    Select,
    /// One property.
    PropertySelect(MetadataPropertyName),
    /// Save or remove one property.
    PropertySave(MetadataPropertyName, Option<String>),
    /// One default style property.
    StyleSelect(TextStylePropertyName),
    /// Save or remove one default style property.
    StyleSave(TextStylePropertyName, Option<String>),
}

/// A metadata token.
#[derive(Debug, Clone)]
pub struct MetadataToken {
    sheet: SpreadsheetIdAndName,
    action: MetadataAction,
}

impl MetadataToken {
    /// Rejects read-only properties and invalid values; an empty value is a removal.
    pub(crate) fn new(sheet: SpreadsheetIdAndName, mut action: MetadataAction) -> Result<Self, HistoryTokenError> {
        if let MetadataAction::PropertySave(_, value) | MetadataAction::StyleSave(_, value) = &mut action {
            empty_is_none(value);
        }
        if let MetadataAction::PropertySave(property, value) = &action {
            property.check_value(value.as_deref())?;
        }
        Ok(Self { sheet, action })
    }

    /// For actions without a payload to validate.
    pub(crate) fn unchecked(sheet: SpreadsheetIdAndName, action: MetadataAction) -> Self {
        Self { sheet, action }
    }

    pub(crate) fn with_action(&self, action: MetadataAction) -> Result<Self, HistoryTokenError> {
        Self::new(self.sheet.clone(), action)
    }

    pub(crate) fn with_sheet(&self, sheet: SpreadsheetIdAndName) -> Self {
        Self { sheet, ..self.clone() }
    }

    /// The spreadsheet.
    pub fn sheet(&self) -> &SpreadsheetIdAndName {
        &self.sheet
    }

    /// What is happening.
    pub fn action(&self) -> &MetadataAction {
        &self.action
    }

    pub(crate) fn kind(&self) -> &'static str {
        match &self.action {
            MetadataAction::Select => "metadata-select",
            MetadataAction::PropertySelect(_) => "metadata-property-select",
            MetadataAction::PropertySave(..) => "metadata-property-save",
            MetadataAction::StyleSelect(_) => "metadata-property-style-select",
            MetadataAction::StyleSave(..) => "metadata-property-style-save",
        }
    }

    pub(crate) fn write_fragment(&self, b: &mut FragmentBuilder) {
        b.segment("metadata");
        match &self.action {
            MetadataAction::Select => {}
            MetadataAction::PropertySelect(p) => {
                b.segment(p);
            }
            MetadataAction::PropertySave(p, value) => {
                b.segment(p).segments(["save", opt(value)]);
            }
            MetadataAction::StyleSelect(p) => {
                b.segment("style").segment(p);
            }
            MetadataAction::StyleSave(p, value) => {
                b.segment("style").segment(p).segments(["save", opt(value)]);
            }
        }
    }
}

/// Saved forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormAction {
    /// Browse forms.
    List(OffsetAndCount),
    /// Refetch the list, then return to [`FormAction::List`].
    ListReload(OffsetAndCount),
    /// Edit one form.
    Select(FormName),
    /// Save a form definition (an object).
    Save(FormName, Value),
    /// Delete a form.
    Delete(FormName),
}

/// A form token.
#[derive(Debug, Clone)]
pub struct FormToken {
    sheet: SpreadsheetIdAndName,
    action: FormAction,
}

impl FormToken {
    pub(crate) fn new(sheet: SpreadsheetIdAndName, action: FormAction) -> Result<Self, HistoryTokenError> {
        if let FormAction::Save(_, form) = &action {
            require_object("form", form)?;
        }
        Ok(Self { sheet, action })
    }

    /// For actions without a payload to validate.
    pub(crate) fn unchecked(sheet: SpreadsheetIdAndName, action: FormAction) -> Self {
        Self { sheet, action }
    }

    pub(crate) fn with_action(&self, action: FormAction) -> Result<Self, HistoryTokenError> {
        Self::new(self.sheet.clone(), action)
    }

    /// The form list of the same spreadsheet.
    pub(crate) fn with_list(&self, offset_and_count: OffsetAndCount) -> Self {
        Self::unchecked(self.sheet.clone(), FormAction::List(offset_and_count))
    }

    pub(crate) fn with_sheet(&self, sheet: SpreadsheetIdAndName) -> Self {
        Self { sheet, ..self.clone() }
    }

    /// The spreadsheet.
    pub fn sheet(&self) -> &SpreadsheetIdAndName {
        &self.sheet
    }

    /// What is happening.
    pub fn action(&self) -> &FormAction {
        &self.action
    }

    /// The form being selected, saved or deleted.
    pub fn form_name(&self) -> Option<&FormName> {
        match &self.action {
            FormAction::Select(name) | FormAction::Save(name, _) | FormAction::Delete(name) => Some(name),
            FormAction::List(_) | FormAction::ListReload(_) => None,
        }
    }

    pub(crate) fn kind(&self) -> &'static str {
        match &self.action {
            FormAction::List(_) => "form-list",
            FormAction::ListReload(_) => "form-list-reload",
            FormAction::Select(_) => "form-select",
            FormAction::Save(..) => "form-save",
            FormAction::Delete(_) => "form-delete",
        }
    }

    pub(crate) fn write_fragment(&self, b: &mut FragmentBuilder) {
        b.segment("form");
        match &self.action {
            FormAction::List(oc) => {
                b.segment("*").raw(&oc.to_string());
            }
            FormAction::ListReload(oc) => {
                b.segment("*").raw(&oc.to_string()).segment("reload");
            }
            FormAction::Select(name) => {
                b.segment(name);
            }
            FormAction::Save(name, form) => {
                b.segment(name).segment("save").segment(form);
            }
            FormAction::Delete(name) => {
                b.segment(name).segment("delete");
            }
        }
    }
}
