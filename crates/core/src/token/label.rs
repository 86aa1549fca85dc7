use crate::fragment::FragmentBuilder;
use crate::payload::OffsetAndCount;
use crate::reference::{LabelMapping, LabelName};

use super::SpreadsheetIdAndName;

/// The label mapping list and editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelMappingAction {
    /// Browse every label.
    List(OffsetAndCount),
    /// Refetch the list, then return to [`LabelMappingAction::List`].
    ListReload(OffsetAndCount),
    /// Dialog for a new label.
    Create,
    /// Edit one label.
    Select(LabelName),
    /// Save a label and its target.
    Save(LabelMapping),
    /// Delete a label.
    Delete(LabelName),
}

/// A label mapping token.
#[derive(Debug, Clone)]
pub struct LabelMappingToken {
    sheet: SpreadsheetIdAndName,
    action: LabelMappingAction,
}

impl LabelMappingToken {
    pub(crate) fn new(sheet: SpreadsheetIdAndName, action: LabelMappingAction) -> Self {
        Self { sheet, action }
    }

    pub(crate) fn with_action(&self, action: LabelMappingAction) -> Self {
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
    pub fn action(&self) -> &LabelMappingAction {
        &self.action
    }

    /// The label being selected, saved or deleted.
    pub fn label(&self) -> Option<&LabelName> {
        match &self.action {
            LabelMappingAction::Select(label) | LabelMappingAction::Delete(label) => Some(label),
            LabelMappingAction::Save(mapping) => Some(mapping.label()),
            LabelMappingAction::List(_) | LabelMappingAction::ListReload(_) | LabelMappingAction::Create => None,
        }
    }

    pub(crate) fn kind(&self) -> &'static str {
        match &self.action {
            LabelMappingAction::List(_) => "label-mapping-list",
            LabelMappingAction::ListReload(_) => "label-mapping-list-reload",
            LabelMappingAction::Create => "label-mapping-create",
            LabelMappingAction::Select(_) => "label-mapping-select",
            LabelMappingAction::Save(_) => "label-mapping-save",
            LabelMappingAction::Delete(_) => "label-mapping-delete",
        }
    }

    pub(crate) fn write_fragment(&self, b: &mut FragmentBuilder) {
        match &self.action {
            LabelMappingAction::List(oc) => {
                b.segments(["label", "*"]).raw(&oc.to_string());
            }
            LabelMappingAction::ListReload(oc) => {
                b.segments(["label", "*"]).raw(&oc.to_string()).segment("reload");
            }
            LabelMappingAction::Create => {
                b.segment("label-create");
            }
            LabelMappingAction::Select(label) => {
                b.segment("label").segment(label);
            }
            LabelMappingAction::Save(mapping) => {
                b.segment("label")
                    .segment(mapping.label())
                    .segment("save")
                    .segment(mapping.target());
            }
            LabelMappingAction::Delete(label) => {
                b.segment("label").segment(label).segment("delete");
            }
        }
    }
}
