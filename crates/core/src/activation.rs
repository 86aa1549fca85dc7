//! What happens when a token becomes current.
//!
//! [`HistoryToken::on_history_token_change`] runs once each time a token
//! becomes the application's current token. Depending on the variant it
//! moves focus, starts one request through a fetcher, and may push another
//! token straight away: saves and deletes return to where the user came
//! from while the request is in flight, reloads return to their non-reload
//! form. Nothing here blocks or waits for a response.

use crate::context::{
    AppContext, CellPatch, ClipboardEntry, DeltaRequest, Focus, FormRequest, LabelMappingRequest,
    MetadataRequest, OnFailure, PluginRequest,
};
use crate::payload::{ClipboardValueKind, OffsetAndCount};
use crate::reference::SpreadsheetSelection;
use crate::token::{
    CellAction, CellToken, ColumnOrRowAction, ColumnOrRowToken, FormAction, FormToken, HistoryToken,
    LabelMappingAction, LabelMappingToken, MetadataAction, MetadataToken, PluginAction,
    SpreadsheetAction, SpreadsheetListAction, SpreadsheetToken,
};

/// Make `next` current and run its activation hook.
///
/// The token current before the call is passed to the hook as `previous`.
pub fn activate(next: HistoryToken, context: &mut dyn AppContext) {
    let previous = context.history_token();
    tracing::debug!(from = %previous, to = %next, kind = next.kind(), "activating history token");
    if previous != next {
        context.push_history_token(next.clone());
    }
    next.on_history_token_change(Some(&previous), context);
}

impl HistoryToken {
    /// The activation hook.
    ///
    /// Re-activating an equal token repeats its side effect.
    pub fn on_history_token_change(&self, previous: Option<&HistoryToken>, context: &mut dyn AppContext) {
        match self {
            HistoryToken::SpreadsheetCreate => {
                context.metadata_fetcher().fetch(MetadataRequest::Create, OnFailure::Ignore);
            }
            HistoryToken::SpreadsheetList(action) => self.list_changed(action, previous, context),
            HistoryToken::SpreadsheetLoad(id) => {
                context.metadata_fetcher().fetch(MetadataRequest::Load(*id), OnFailure::Ignore);
            }
            HistoryToken::Spreadsheet(t) => self.spreadsheet_changed(t, previous, context),
            HistoryToken::Cell(t) => self.cell_changed(t, previous, context),
            HistoryToken::ColumnOrRow(t) => self.column_or_row_changed(t, previous, context),
            HistoryToken::LabelMapping(t) => self.label_mapping_changed(t, previous, context),
            HistoryToken::Metadata(t) => self.metadata_changed(t, previous, context),
            HistoryToken::Form(t) => self.form_changed(t, previous, context),
            HistoryToken::Plugin(t) => self.plugin_changed(t.action(), previous, context),
        }
    }

    // ── Helpers ─────────────────────────────────────────────────────────

    /// Where to go while a save or delete is in flight: back to the previous
    /// token when it is a different view of the same spreadsheet, otherwise
    /// this token's clear action.
    fn return_to(&self, previous: Option<&HistoryToken>) -> HistoryToken {
        match previous {
            Some(previous)
                if previous != self
                    && previous.spreadsheet_id().is_some()
                    && previous.spreadsheet_id() == self.spreadsheet_id() =>
            {
                previous.clone()
            }
            _ => self.clear_action().into_owned(),
        }
    }

    /// Push the optimistic token and build the policy that undoes it.
    fn push_return(&self, previous: Option<&HistoryToken>, context: &mut dyn AppContext) -> OnFailure {
        let next = self.return_to(previous);
        let revert_to = previous.unwrap_or(self).clear_action().into_owned();
        context.push_history_token(next.clone());
        OnFailure::Revert {
            expected: next,
            revert_to,
        }
    }

    /// Load, then show the same token without its reload flag.
    fn push_after_reload(&self, next: HistoryToken, context: &mut dyn AppContext) {
        tracing::debug!(from = %self, to = %next, "reload started");
        context.push_history_token(next);
    }

    // ── Families ────────────────────────────────────────────────────────

    fn list_changed(
        &self,
        action: &SpreadsheetListAction,
        previous: Option<&HistoryToken>,
        context: &mut dyn AppContext,
    ) {
        match action {
            SpreadsheetListAction::Select(oc) => {
                context.metadata_fetcher().fetch(MetadataRequest::List(*oc), OnFailure::Ignore);
            }
            SpreadsheetListAction::Reload(oc) => {
                context.metadata_fetcher().fetch(MetadataRequest::List(*oc), OnFailure::Ignore);
                self.push_after_reload(HistoryToken::spreadsheet_list_select(*oc), context);
            }
            SpreadsheetListAction::RenameSelect(_) => context.focus(Focus::Dialog(self.kind())),
            SpreadsheetListAction::RenameSave(id, name) => {
                let on_failure = self.push_return(previous, context);
                context
                    .metadata_fetcher()
                    .fetch(MetadataRequest::Rename(*id, name.clone()), on_failure);
            }
            SpreadsheetListAction::Delete(id) => {
                let on_failure = self.push_return(previous, context);
                context.metadata_fetcher().fetch(MetadataRequest::Delete(*id), on_failure);
            }
        }
    }

    fn spreadsheet_changed(
        &self,
        t: &SpreadsheetToken,
        previous: Option<&HistoryToken>,
        context: &mut dyn AppContext,
    ) {
        let sheet = t.sheet();
        match t.action() {
            SpreadsheetAction::Select => context.focus(Focus::Viewport),
            SpreadsheetAction::RenameSelect => context.focus(Focus::Dialog(self.kind())),
            SpreadsheetAction::RenameSave(name) => {
                let on_failure = self.push_return(previous, context);
                context
                    .metadata_fetcher()
                    .fetch(MetadataRequest::Rename(sheet.id(), name.clone()), on_failure);
            }
            SpreadsheetAction::Reload => {
                context
                    .metadata_fetcher()
                    .fetch(MetadataRequest::Load(sheet.id()), OnFailure::Ignore);
                self.push_after_reload(self.clear_action().into_owned(), context);
            }
            SpreadsheetAction::Delete => {
                // Nothing of the deleted spreadsheet can be shown afterwards.
                let next = HistoryToken::spreadsheet_list_select(OffsetAndCount::EMPTY);
                context.push_history_token(next.clone());
                let on_failure = OnFailure::Revert {
                    expected: next,
                    revert_to: HistoryToken::with_sheet(sheet.clone(), SpreadsheetAction::Select),
                };
                context
                    .metadata_fetcher()
                    .fetch(MetadataRequest::Delete(sheet.id()), on_failure);
            }
            SpreadsheetAction::Navigate(navigations) => {
                context.push_history_token(HistoryToken::Spreadsheet(t.with_action(SpreadsheetAction::Select)));
                context.metadata_fetcher().fetch(
                    MetadataRequest::Navigate {
                        sheet: sheet.clone(),
                        selection: None,
                        navigations: navigations.clone(),
                    },
                    OnFailure::Ignore,
                );
            }
        }
    }

    fn cell_changed(&self, t: &CellToken, previous: Option<&HistoryToken>, context: &mut dyn AppContext) {
        let sheet = t.sheet().clone();
        let selection = t.selection().selection().clone();
        let patch = match t.action() {
            CellAction::Select => {
                context.focus(Focus::Selection(selection));
                return;
            }
            CellAction::Menu => {
                context.focus(Focus::Menu(selection));
                return;
            }
            CellAction::FormulaSelect => {
                context.focus(Focus::FormulaEditor);
                return;
            }
            CellAction::StyleSelect(_)
            | CellAction::FormatterSelect(_)
            | CellAction::ParserSelect(_)
            | CellAction::ValidatorSelect
            | CellAction::LocaleSelect
            | CellAction::CurrencySelect
            | CellAction::DateTimeSymbolsSelect
            | CellAction::DecimalNumberSymbolsSelect
            | CellAction::ValueSelect(_)
            | CellAction::SortEdit(_) => {
                context.focus(Focus::Dialog(self.kind()));
                return;
            }
            CellAction::Delete => {
                let on_failure = self.push_return(previous, context);
                context
                    .delta_fetcher()
                    .fetch(DeltaRequest::Delete { sheet, selection }, on_failure);
                return;
            }
            CellAction::Clear => {
                let on_failure = self.push_return(previous, context);
                context.delta_fetcher().fetch(
                    DeltaRequest::Clear {
                        sheet,
                        selection,
                        kind: None,
                    },
                    on_failure,
                );
                return;
            }
            CellAction::ClearAndFormula => {
                let next = HistoryToken::Cell(t.with_plain_action(CellAction::FormulaSelect));
                context.push_history_token(next);
                context.delta_fetcher().fetch(
                    DeltaRequest::Clear {
                        sheet,
                        selection,
                        kind: Some(ClipboardValueKind::Formula),
                    },
                    OnFailure::Ignore,
                );
                return;
            }
            CellAction::Freeze | CellAction::Unfreeze => {
                let on_failure = self.push_return(previous, context);
                let request = if *t.action() == CellAction::Freeze {
                    MetadataRequest::Freeze { sheet, selection }
                } else {
                    MetadataRequest::Unfreeze { sheet, selection }
                };
                context.metadata_fetcher().fetch(request, on_failure);
                return;
            }
            CellAction::Reload => {
                context
                    .delta_fetcher()
                    .fetch(DeltaRequest::Load { sheet, selection }, OnFailure::Ignore);
                self.push_after_reload(self.clear_action().into_owned(), context);
                return;
            }
            CellAction::Copy(kind) | CellAction::Cut(kind) => {
                let entry = context
                    .viewport_cache()
                    .resolve(&selection)
                    .map(|range| ClipboardEntry::collect(context.viewport_cache(), *kind, range));
                match entry {
                    Some(entry) => context.clipboard().write(entry),
                    None => tracing::debug!(selection = %selection, "nothing loaded to copy"),
                }
                context.push_history_token(self.clear_action().into_owned());
                if matches!(t.action(), CellAction::Cut(_)) {
                    context.delta_fetcher().fetch(
                        DeltaRequest::Clear {
                            sheet,
                            selection,
                            kind: Some(*kind),
                        },
                        OnFailure::Ignore,
                    );
                }
                return;
            }
            CellAction::Paste(kind) => {
                context.push_history_token(self.clear_action().into_owned());
                match context.clipboard().read() {
                    Some(entry) if entry.kind == *kind => {
                        context.delta_fetcher().fetch(
                            DeltaRequest::Paste {
                                sheet,
                                selection,
                                entry,
                            },
                            OnFailure::Ignore,
                        );
                    }
                    Some(entry) => {
                        tracing::debug!(clipboard = %entry.kind, wanted = %kind, "clipboard holds another kind")
                    }
                    None => tracing::debug!("clipboard is empty"),
                }
                return;
            }
            CellAction::Find(query) => {
                context.delta_fetcher().fetch(
                    DeltaRequest::Find {
                        sheet,
                        selection,
                        query: query.clone(),
                    },
                    OnFailure::Ignore,
                );
                return;
            }
            CellAction::Labels(oc) => {
                context
                    .label_mapping_fetcher()
                    .fetch(LabelMappingRequest::ListFor(sheet, selection, *oc), OnFailure::Ignore);
                return;
            }
            CellAction::References(oc) => {
                context.delta_fetcher().fetch(
                    DeltaRequest::References {
                        sheet,
                        selection,
                        offset_and_count: *oc,
                    },
                    OnFailure::Ignore,
                );
                return;
            }
            CellAction::LabelsReload(oc) => {
                context
                    .label_mapping_fetcher()
                    .fetch(LabelMappingRequest::ListFor(sheet, selection, *oc), OnFailure::Ignore);
                self.push_after_reload(HistoryToken::Cell(t.with_plain_action(CellAction::Labels(*oc))), context);
                return;
            }
            CellAction::ReferencesReload(oc) => {
                context.delta_fetcher().fetch(
                    DeltaRequest::References {
                        sheet,
                        selection,
                        offset_and_count: *oc,
                    },
                    OnFailure::Ignore,
                );
                self.push_after_reload(
                    HistoryToken::Cell(t.with_plain_action(CellAction::References(*oc))),
                    context,
                );
                return;
            }
            CellAction::SortSave(comparators) => {
                let on_failure = self.push_return(previous, context);
                context.delta_fetcher().fetch(
                    DeltaRequest::Sort {
                        sheet,
                        selection,
                        comparators: comparators.clone(),
                    },
                    on_failure,
                );
                return;
            }
            CellAction::Save(values) => {
                let on_failure = self.push_return(previous, context);
                context.delta_fetcher().fetch(
                    DeltaRequest::Save {
                        sheet,
                        values: values.clone(),
                    },
                    on_failure,
                );
                return;
            }
            CellAction::Navigate(navigations) => {
                context.push_history_token(HistoryToken::Cell(t.with_plain_action(CellAction::Select)));
                context.metadata_fetcher().fetch(
                    MetadataRequest::Navigate {
                        sheet,
                        selection: Some(selection),
                        navigations: navigations.clone(),
                    },
                    OnFailure::Ignore,
                );
                return;
            }
            CellAction::FormulaSave(text) => CellPatch::Formula(text.clone()),
            CellAction::StyleSave(property, value) => CellPatch::Style(*property, value.clone()),
            CellAction::FormatterSave(value) => CellPatch::Formatter(value.clone()),
            CellAction::ParserSave(value) => CellPatch::Parser(value.clone()),
            CellAction::ValidatorSave(value) => CellPatch::Validator(value.clone()),
            CellAction::LocaleSave(value) => CellPatch::Locale(value.clone()),
            CellAction::CurrencySave(value) => CellPatch::Currency(value.clone()),
            CellAction::DateTimeSymbolsSave(value) => CellPatch::DateTimeSymbols(value.clone()),
            CellAction::DecimalNumberSymbolsSave(value) => CellPatch::DecimalNumberSymbols(value.clone()),
            CellAction::ValueSave(value_type, value) => CellPatch::Value(*value_type, value.clone()),
        };
        let on_failure = self.push_return(previous, context);
        context.delta_fetcher().fetch(
            DeltaRequest::Patch {
                sheet,
                selection,
                patch,
            },
            on_failure,
        );
    }

    fn column_or_row_changed(
        &self,
        t: &ColumnOrRowToken,
        previous: Option<&HistoryToken>,
        context: &mut dyn AppContext,
    ) {
        let sheet = t.sheet().clone();
        let selection: SpreadsheetSelection = t.selection().selection().clone();
        let request = match t.action() {
            ColumnOrRowAction::Select => {
                context.focus(Focus::Selection(selection));
                return;
            }
            ColumnOrRowAction::Menu => {
                context.focus(Focus::Menu(selection));
                return;
            }
            ColumnOrRowAction::SortEdit(_) => {
                context.focus(Focus::Dialog(self.kind()));
                return;
            }
            ColumnOrRowAction::Freeze | ColumnOrRowAction::Unfreeze => {
                let on_failure = self.push_return(previous, context);
                let request = if *t.action() == ColumnOrRowAction::Freeze {
                    MetadataRequest::Freeze { sheet, selection }
                } else {
                    MetadataRequest::Unfreeze { sheet, selection }
                };
                context.metadata_fetcher().fetch(request, on_failure);
                return;
            }
            ColumnOrRowAction::Navigate(navigations) => {
                context.push_history_token(HistoryToken::ColumnOrRow(
                    t.with_plain_action(ColumnOrRowAction::Select),
                ));
                context.metadata_fetcher().fetch(
                    MetadataRequest::Navigate {
                        sheet,
                        selection: Some(selection),
                        navigations: navigations.clone(),
                    },
                    OnFailure::Ignore,
                );
                return;
            }
            ColumnOrRowAction::Delete => DeltaRequest::Delete { sheet, selection },
            ColumnOrRowAction::Clear => DeltaRequest::Clear {
                sheet,
                selection,
                kind: None,
            },
            ColumnOrRowAction::Hide | ColumnOrRowAction::Unhide => DeltaRequest::Hide {
                sheet,
                selection,
                hidden: *t.action() == ColumnOrRowAction::Hide,
            },
            ColumnOrRowAction::InsertBefore(count) | ColumnOrRowAction::InsertAfter(count) => {
                DeltaRequest::Insert {
                    sheet,
                    selection,
                    before: matches!(t.action(), ColumnOrRowAction::InsertBefore(_)),
                    count: *count,
                }
            }
            ColumnOrRowAction::SortSave(comparators) => DeltaRequest::Sort {
                sheet,
                selection,
                comparators: comparators.clone(),
            },
        };
        let on_failure = self.push_return(previous, context);
        context.delta_fetcher().fetch(request, on_failure);
    }

    fn label_mapping_changed(
        &self,
        t: &LabelMappingToken,
        previous: Option<&HistoryToken>,
        context: &mut dyn AppContext,
    ) {
        let sheet = t.sheet().clone();
        match t.action() {
            LabelMappingAction::List(oc) => {
                context
                    .label_mapping_fetcher()
                    .fetch(LabelMappingRequest::List(sheet, *oc), OnFailure::Ignore);
            }
            LabelMappingAction::ListReload(oc) => {
                context
                    .label_mapping_fetcher()
                    .fetch(LabelMappingRequest::List(sheet, *oc), OnFailure::Ignore);
                self.push_after_reload(
                    HistoryToken::LabelMapping(t.with_action(LabelMappingAction::List(*oc))),
                    context,
                );
            }
            LabelMappingAction::Create => context.focus(Focus::Dialog(self.kind())),
            LabelMappingAction::Select(label) => {
                context.focus(Focus::Dialog(self.kind()));
                context
                    .label_mapping_fetcher()
                    .fetch(LabelMappingRequest::Load(sheet, label.clone()), OnFailure::Ignore);
            }
            LabelMappingAction::Save(mapping) => {
                let on_failure = self.push_return(previous, context);
                context
                    .label_mapping_fetcher()
                    .fetch(LabelMappingRequest::Save(sheet, mapping.clone()), on_failure);
            }
            LabelMappingAction::Delete(label) => {
                let on_failure = self.push_return(previous, context);
                context
                    .label_mapping_fetcher()
                    .fetch(LabelMappingRequest::Delete(sheet, label.clone()), on_failure);
            }
        }
    }

    fn metadata_changed(
        &self,
        t: &MetadataToken,
        previous: Option<&HistoryToken>,
        context: &mut dyn AppContext,
    ) {
        let sheet = t.sheet().clone();
        let request = match t.action() {
            MetadataAction::Select | MetadataAction::PropertySelect(_) | MetadataAction::StyleSelect(_) => {
                context.focus(Focus::Dialog(self.kind()));
                return;
            }
            MetadataAction::PropertySave(property, value) => MetadataRequest::Patch {
                sheet,
                property: *property,
                value: value.clone(),
            },
            MetadataAction::StyleSave(property, value) => MetadataRequest::PatchStyle {
                sheet,
                property: *property,
                value: value.clone(),
            },
        };
        let on_failure = self.push_return(previous, context);
        context.metadata_fetcher().fetch(request, on_failure);
    }

    fn form_changed(&self, t: &FormToken, previous: Option<&HistoryToken>, context: &mut dyn AppContext) {
        let sheet = t.sheet().clone();
        match t.action() {
            FormAction::List(oc) => {
                context.form_fetcher().fetch(FormRequest::List(sheet, *oc), OnFailure::Ignore);
            }
            FormAction::ListReload(oc) => {
                context.form_fetcher().fetch(FormRequest::List(sheet, *oc), OnFailure::Ignore);
                self.push_after_reload(HistoryToken::Form(t.with_list(*oc)), context);
            }
            FormAction::Select(name) => {
                context.focus(Focus::Dialog(self.kind()));
                context
                    .form_fetcher()
                    .fetch(FormRequest::Load(sheet, name.clone()), OnFailure::Ignore);
            }
            FormAction::Save(name, form) => {
                let on_failure = self.push_return(previous, context);
                context
                    .form_fetcher()
                    .fetch(FormRequest::Save(sheet, name.clone(), form.clone()), on_failure);
            }
            FormAction::Delete(name) => {
                let on_failure = self.push_return(previous, context);
                context
                    .form_fetcher()
                    .fetch(FormRequest::Delete(sheet, name.clone()), on_failure);
            }
        }
    }

    fn plugin_changed(&self, action: &PluginAction, previous: Option<&HistoryToken>, context: &mut dyn AppContext) {
        match action {
            PluginAction::ListSelect(oc) => {
                context.plugin_fetcher().fetch(PluginRequest::List(*oc), OnFailure::Ignore);
            }
            PluginAction::ListReload(oc) => {
                context.plugin_fetcher().fetch(PluginRequest::List(*oc), OnFailure::Ignore);
                self.push_after_reload(HistoryToken::plugin(PluginAction::ListSelect(*oc)), context);
            }
            PluginAction::Select(name) => {
                context
                    .plugin_fetcher()
                    .fetch(PluginRequest::Load(name.clone()), OnFailure::Ignore);
            }
            PluginAction::FileView(name, path) => {
                let request = match path {
                    Some(path) => PluginRequest::LoadFile(name.clone(), path.clone()),
                    None => PluginRequest::ListFiles(name.clone()),
                };
                context.plugin_fetcher().fetch(request, OnFailure::Ignore);
            }
            PluginAction::UploadSelect => context.focus(Focus::Dialog(self.kind())),
            PluginAction::Delete(name) => {
                let on_failure = self.push_return(previous, context);
                context
                    .plugin_fetcher()
                    .fetch(PluginRequest::Delete(name.clone()), on_failure);
            }
            PluginAction::UploadSave(upload) => {
                let on_failure = self.push_return(previous, context);
                context
                    .plugin_fetcher()
                    .fetch(PluginRequest::Upload(upload.clone()), on_failure);
            }
        }
    }
}
