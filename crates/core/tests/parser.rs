//! Parser scenarios: every family of the fragment grammar, the fallback
//! rules and the diagnostics attached to them.
//!
//! Round-trip properties live in `roundtrip.rs`; robustness against
//! arbitrary input in `fuzz_smoke.rs`.

mod common;

use common::{cell, cell_anchored, extract_diag_codes, id, name, token};
use sheet_history_core::grammar::diag::Span;
use sheet_history_core::payload::{ClipboardValueKind, MetadataPropertyName, OffsetAndCount, ValueTypeName};
use sheet_history_core::reference::SpreadsheetViewportAnchor;
use sheet_history_core::token::{
    CellAction, FormAction, LabelMappingAction, MetadataAction, PluginAction,
    SpreadsheetAction,
};
use sheet_history_core::{HistoryToken, ParseConfig, UrlFragment, parse_fragment_with, parse_str};
use sheet_history_diagnostics::{Severity, codes};

fn canonical(text: &str) -> String {
    token(text).to_string()
}

fn cell_action(text: &str) -> CellAction {
    match token(text) {
        HistoryToken::Cell(t) => t.action().clone(),
        other => panic!("{text:?} parsed to {}", other.kind()),
    }
}

// ─── Concrete scenarios ──────────────────────────────────────────────────────

#[test]
fn cell_select_with_default_anchor() {
    let t = token("/1/Untitled/cell/A1");
    assert_eq!(t.kind(), "cell-select");
    assert_eq!(t.spreadsheet_id(), Some(id()));
    assert_eq!(t.spreadsheet_name(), Some(&name()));
    assert_eq!(t.anchored_selection(), Some(&cell("A1")));
    assert_eq!(t.to_string(), "/1/Untitled/cell/A1");
}

#[test]
fn cell_range_formula_with_anchor() {
    let t = token("/1/Untitled/cell/B2:C3/bottom-right/formula");
    assert_eq!(t.kind(), "cell-formula-select");
    assert_eq!(
        t.anchored_selection(),
        Some(&cell_anchored("B2:C3", SpreadsheetViewportAnchor::BottomRight))
    );
}

#[test]
fn cell_labels_with_and_without_paging() {
    let t = token("/1/Untitled/cell/A1/labels/offset/1/count/2");
    assert_eq!(t.kind(), "cell-label-list");
    assert_eq!(t.offset_and_count(), OffsetAndCount::with(Some(1), Some(2)).ok());

    let t = token("/1/Untitled/cell/A1/labels");
    assert_eq!(t.kind(), "cell-label-list");
    assert_eq!(t.offset_and_count(), Some(OffsetAndCount::EMPTY));
}

#[test]
fn too_long_falls_back_to_spreadsheet() {
    let config = ParseConfig::default().with_max_fragment_len(32);
    let text = format!("/1/Untitled/cell/A1/formula/save/={}", "1+".repeat(40));
    let result = parse_fragment_with(&UrlFragment::with(text.as_str()), &config);
    assert_eq!(result.token.as_ref().unwrap().to_string(), "/1/Untitled");
    assert_eq!(extract_diag_codes(&result), [codes::FRAGMENT_TOO_LONG]);
    assert_eq!(result.diagnostics[0].span, Some(Span::new(32, text.len())));
}

#[test]
fn too_long_without_name_has_no_token() {
    let config = ParseConfig::default().with_max_fragment_len(4);
    let result = parse_fragment_with(&UrlFragment::from("/create/more"), &config);
    assert!(result.token.is_none());
    assert_eq!(extract_diag_codes(&result), [codes::FRAGMENT_TOO_LONG]);
}

#[test]
fn unknown_entity_falls_back_to_spreadsheet() {
    let result = parse_str("/1/Untitled/spreadsheet-thing/1/2/3");
    assert_eq!(result.token.as_ref().unwrap().kind(), "spreadsheet-select");
    assert_eq!(extract_diag_codes(&result), [codes::UNKNOWN_SEGMENT]);
    assert_eq!(result.diagnostics[0].severity, Severity::Warn);
}

// ─── Root level ──────────────────────────────────────────────────────────────

#[test]
fn root_tokens() {
    assert_eq!(token("").kind(), "spreadsheet-list-select");
    assert_eq!(token("/").kind(), "spreadsheet-list-select");
    assert_eq!(token("/create").kind(), "spreadsheet-create");
    assert_eq!(token("/a1").kind(), "spreadsheet-load");
    assert_eq!(token("/rename/1").kind(), "spreadsheet-list-rename-select");
    assert_eq!(token("/rename/1/Budget").kind(), "spreadsheet-list-rename-save");
    assert_eq!(token("/delete/1").kind(), "spreadsheet-list-delete");
}

#[test]
fn list_paging() {
    assert_eq!(canonical("/*/offset/10/count/20"), "/*/offset/10/count/20");
    assert_eq!(canonical("/*/count/20/offset/10"), "/*/offset/10/count/20");
    assert_eq!(canonical("/*"), "/");
    assert_eq!(token("/*/reload").kind(), "spreadsheet-list-reload");
}

#[test]
fn list_paging_normalises_bad_values() {
    for text in ["/*/offset/x", "/*/count/-2", "/*/offset/1/offset/2", "/*/count/99999999999"] {
        let result = parse_str(text);
        assert_eq!(result.token.unwrap().offset_and_count(), Some(OffsetAndCount::EMPTY), "{text}");
        assert!(result.diagnostics.is_empty(), "{text}: {:?}", result.diagnostics);
    }
}

#[test]
fn rename_and_delete_without_id_fall_back_to_list() {
    for text in ["/rename", "/delete"] {
        let result = parse_str(text);
        assert_eq!(result.token.as_ref().unwrap().kind(), "spreadsheet-list-select");
        assert_eq!(extract_diag_codes(&result), [codes::MISSING_VALUE]);
    }
}

#[test]
fn invalid_spreadsheet_id_is_error() {
    let result = parse_str("/xyz/Untitled");
    assert!(result.token.is_none());
    assert_eq!(extract_diag_codes(&result), [codes::INVALID_VALUE]);
    assert_eq!(result.diagnostics[0].span, Some(Span::new(0, 4)));
}

#[test]
fn empty_spreadsheet_name_is_error() {
    let result = parse_str("/1/");
    assert!(result.token.is_none());
    assert_eq!(extract_diag_codes(&result), [codes::INVALID_VALUE]);
}

// ─── Spreadsheet ─────────────────────────────────────────────────────────────

#[test]
fn spreadsheet_actions() {
    let action = |text: &str| match token(text) {
        HistoryToken::Spreadsheet(t) => t.action().clone(),
        other => panic!("{text:?} parsed to {}", other.kind()),
    };
    assert_eq!(action("/1/Untitled"), SpreadsheetAction::Select);
    assert_eq!(action("/1/Untitled/rename"), SpreadsheetAction::RenameSelect);
    assert_eq!(
        action("/1/Untitled/rename/save/Budget"),
        SpreadsheetAction::RenameSave("Budget".parse().unwrap())
    );
    assert_eq!(action("/1/Untitled/reload"), SpreadsheetAction::Reload);
    assert_eq!(action("/1/Untitled/delete"), SpreadsheetAction::Delete);
    assert_eq!(canonical("/1/Untitled/navigate/left column,down row"), "/1/Untitled/navigate/left column,down row");
    assert_eq!(canonical("/1/Untitled/navigate"), "/1/Untitled/navigate");
}

#[test]
fn invalid_navigation_is_error() {
    let result = parse_str("/1/Untitled/navigate/sideways column");
    assert!(result.token.is_none());
    assert_eq!(extract_diag_codes(&result), [codes::INVALID_VALUE]);
}

// ─── Cell ────────────────────────────────────────────────────────────────────

#[test]
fn cell_simple_actions() {
    for (tail, kind) in [
        ("menu", "cell-menu"),
        ("delete", "cell-delete"),
        ("clear", "cell-clear"),
        ("freeze", "cell-freeze"),
        ("unfreeze", "cell-unfreeze"),
        ("reload", "cell-reload"),
        ("clear-and-formula", "cell-clear-and-formula"),
        ("formula", "cell-formula-select"),
        ("validator", "cell-validator-select"),
        ("locale", "cell-locale-select"),
        ("currency", "cell-currency-select"),
        ("dateTimeSymbols", "cell-date-time-symbols-select"),
        ("decimalNumberSymbols", "cell-decimal-number-symbols-select"),
        ("find", "cell-find"),
        ("references", "cell-reference-list"),
        ("sort/edit", "cell-sort-edit"),
    ] {
        let text = format!("/1/Untitled/cell/A1/{tail}");
        assert_eq!(token(&text).kind(), kind, "{text}");
        assert_eq!(canonical(&text), text);
    }
}

#[test]
fn freeze_requires_the_first_column_and_row() {
    let result = parse_str("/1/Untitled/cell/B2/freeze");
    assert!(result.token.is_none());
    assert_eq!(extract_diag_codes(&result), [codes::INVALID_TOKEN]);
}

#[test]
fn cell_save_tails() {
    assert_eq!(
        cell_action("/1/Untitled/cell/A1/style/color/save/#123456"),
        CellAction::StyleSave("color".parse().unwrap(), Some("#123456".into()))
    );
    assert_eq!(
        cell_action("/1/Untitled/cell/A1/style/color/save/"),
        CellAction::StyleSave("color".parse().unwrap(), None)
    );
    assert_eq!(
        cell_action("/1/Untitled/cell/A1/locale/save/en-AU"),
        CellAction::LocaleSave(Some("en-AU".parse().unwrap()))
    );
    assert_eq!(cell_action("/1/Untitled/cell/A1/locale/save"), CellAction::LocaleSave(None));
    assert_eq!(
        cell_action("/1/Untitled/cell/A1/validator/save/positive"),
        CellAction::ValidatorSave(Some("positive".into()))
    );
    assert_eq!(
        cell_action("/1/Untitled/cell/A1/value/number/save/12.5"),
        CellAction::ValueSave(ValueTypeName::Number, Some(serde_json::json!(12.5)))
    );
}

#[test]
fn cell_value_of_wrong_type_is_rejected() {
    let result = parse_str(r#"/1/Untitled/cell/A1/value/number/save/"text""#);
    assert!(result.token.is_none());
    assert_eq!(extract_diag_codes(&result), [codes::INVALID_TOKEN]);
}

#[test]
fn cell_symbols_must_be_objects() {
    let ok = parse_str(r#"/1/Untitled/cell/A1/decimalNumberSymbols/save/{"decimalSeparator":"."}"#);
    assert!(ok.token.is_some(), "{:?}", ok.diagnostics);
    let bad = parse_str("/1/Untitled/cell/A1/dateTimeSymbols/save/[1]");
    assert_eq!(extract_diag_codes(&bad), [codes::INVALID_TOKEN]);
    let garbage = parse_str("/1/Untitled/cell/A1/dateTimeSymbols/save/{oops");
    assert_eq!(extract_diag_codes(&garbage), [codes::INVALID_VALUE]);
}

#[test]
fn clipboard_tails() {
    assert_eq!(
        cell_action("/1/Untitled/cell/A1:B2/copy/formula"),
        CellAction::Copy(ClipboardValueKind::Formula)
    );
    assert_eq!(
        cell_action("/1/Untitled/cell/A1/paste/formatted-value"),
        CellAction::Paste(ClipboardValueKind::FormattedValue)
    );
    let result = parse_str("/1/Untitled/cell/A1/cut");
    assert_eq!(result.token.as_ref().unwrap().kind(), "cell-select");
    assert_eq!(extract_diag_codes(&result), [codes::MISSING_VALUE]);
}

#[test]
fn find_query_round_trips() {
    let text = "/1/Untitled/cell/A1:C3/top-left/find/path/lrtd/count/5/query/=A1>0";
    assert_eq!(canonical(text), text);
}

#[test]
fn sort_tails() {
    let text = "/1/Untitled/cell/A1:C3/top-left/sort/save/B=text;C=number DOWN";
    assert_eq!(token(text).kind(), "cell-sort-save");
    assert_eq!(canonical(text), text);
    assert_eq!(
        cell_action("/1/Untitled/cell/A1:C3/sort/edit/B=text"),
        CellAction::SortEdit("B=text".into())
    );
    let outside = parse_str("/1/Untitled/cell/A1:C3/sort/save/D=text");
    assert_eq!(extract_diag_codes(&outside), [codes::INVALID_TOKEN]);
}

#[test]
fn cell_save_maps() {
    let text = r#"/1/Untitled/cell/A1:B2/top-left/save/formula/{"B1":"=2","A2":"=1"}"#;
    let t = token(text);
    assert_eq!(t.kind(), "cell-save-formula");
    // Keys print in column then row order.
    assert_eq!(
        t.to_string(),
        r#"/1/Untitled/cell/A1:B2/top-left/save/formula/{"A2":"=1","B1":"=2"}"#
    );
}

#[test]
fn cell_save_map_shape_errors() {
    let bad_shape = parse_str(r#"/1/Untitled/cell/A1/save/formula/{"A1":1}"#);
    assert_eq!(extract_diag_codes(&bad_shape), [codes::INVALID_VALUE]);
    let bad_key = parse_str(r#"/1/Untitled/cell/A1/save/formula/{"!":"=1"}"#);
    assert_eq!(extract_diag_codes(&bad_key), [codes::INVALID_VALUE]);
    let missing = parse_str("/1/Untitled/cell/A1/save/formula");
    assert_eq!(missing.token.as_ref().unwrap().kind(), "cell-select");
    assert_eq!(extract_diag_codes(&missing), [codes::MISSING_VALUE]);
}

#[test]
fn label_selection_in_cell_family() {
    let t = token("/1/Untitled/cell/Total/formula");
    assert_eq!(t.kind(), "cell-formula-select");
    assert_eq!(t.to_string(), "/1/Untitled/cell/Total/formula");
}

// ─── Column / row ────────────────────────────────────────────────────────────

#[test]
fn column_and_row_actions() {
    assert_eq!(token("/1/Untitled/column/B").kind(), "column-select");
    assert_eq!(token("/1/Untitled/row/3:5/bottom/hide").kind(), "row-hide");
    assert_eq!(token("/1/Untitled/column/A:C/left/freeze").kind(), "column-freeze");
    assert_eq!(token("/1/Untitled/row/2/insert-after/3").kind(), "row-insert-after");
    assert_eq!(canonical("/1/Untitled/column/C/insert-before/2"), "/1/Untitled/column/C/insert-before/2");
    assert_eq!(token("/1/Untitled/row/1/sort/save/A=text").kind(), "row-sort-save");
}

#[test]
fn column_insert_errors() {
    let zero = parse_str("/1/Untitled/column/C/insert-before/0");
    assert_eq!(extract_diag_codes(&zero), [codes::INVALID_TOKEN]);
    let garbage = parse_str("/1/Untitled/column/C/insert-before/many");
    assert_eq!(extract_diag_codes(&garbage), [codes::INVALID_VALUE]);
    let missing = parse_str("/1/Untitled/column/C/insert-before");
    assert_eq!(missing.token.as_ref().unwrap().kind(), "column-select");
    assert_eq!(extract_diag_codes(&missing), [codes::MISSING_VALUE]);
}

#[test]
fn column_sort_must_use_rows() {
    let result = parse_str("/1/Untitled/column/A/sort/save/B=text");
    assert_eq!(extract_diag_codes(&result), [codes::INVALID_TOKEN]);
}

#[test]
fn unknown_column_tail_keeps_the_selection() {
    let result = parse_str("/1/Untitled/column/B/bogus");
    assert_eq!(result.token.as_ref().unwrap().kind(), "column-select");
    assert_eq!(extract_diag_codes(&result), [codes::UNKNOWN_SEGMENT]);
}

// ─── Labels, metadata, forms, plugins ────────────────────────────────────────

#[test]
fn label_tokens() {
    let action = |text: &str| match token(text) {
        HistoryToken::LabelMapping(t) => t.action().clone(),
        other => panic!("{text:?} parsed to {}", other.kind()),
    };
    assert_eq!(action("/1/Untitled/label"), LabelMappingAction::List(OffsetAndCount::EMPTY));
    assert_eq!(
        action("/1/Untitled/label/*/count/5"),
        LabelMappingAction::List(OffsetAndCount::with(None, Some(5)).unwrap())
    );
    assert_eq!(action("/1/Untitled/label-create"), LabelMappingAction::Create);
    assert_eq!(token("/1/Untitled/label/Total").kind(), "label-mapping-select");
    assert_eq!(token("/1/Untitled/label/Total/delete").kind(), "label-mapping-delete");
    assert_eq!(canonical("/1/Untitled/label/Total/save/A1:B2"), "/1/Untitled/label/Total/save/A1:B2");
}

#[test]
fn list_reloads_keep_their_flag() {
    let cases = [
        ("/1/Untitled/label/*/reload", "label-mapping-list-reload"),
        ("/1/Untitled/form/*/reload", "form-list-reload"),
        ("/1/Untitled/cell/A1/labels/reload", "cell-label-list-reload"),
        ("/1/Untitled/cell/A1/references/count/4/reload", "cell-reference-list-reload"),
    ];
    for (fragment, kind) in cases {
        let result = parse_str(fragment);
        assert!(result.diagnostics.is_empty(), "{fragment}: {:?}", result.diagnostics);
        let token = result.token.unwrap();
        assert_eq!(token.kind(), kind, "{fragment}");
        assert_eq!(token.to_string(), fragment);
    }
    assert_eq!(
        cell_action("/1/Untitled/cell/A1/labels/offset/2/reload"),
        CellAction::LabelsReload(OffsetAndCount::with(Some(2), None).unwrap())
    );
}

#[test]
fn empty_file_path_is_the_archive_listing() {
    let files = "Files".parse().unwrap();
    let token = HistoryToken::plugin(PluginAction::FileView(files, Some(String::new())));
    assert_eq!(token.to_string(), "/plugin/Files/file");
    let HistoryToken::Plugin(t) = &token else { panic!("{}", token.kind()) };
    assert_eq!(*t.action(), PluginAction::FileView("Files".parse().unwrap(), None));
    assert_eq!(canonical("/plugin/Files/file/"), "/plugin/Files/file");
}

#[test]
fn label_mapping_to_itself_is_rejected() {
    let result = parse_str("/1/Untitled/label/Total/save/Total");
    assert_eq!(extract_diag_codes(&result), [codes::INVALID_TOKEN]);
}

#[test]
fn metadata_tokens() {
    let action = |text: &str| match token(text) {
        HistoryToken::Metadata(t) => t.action().clone(),
        other => panic!("{text:?} parsed to {}", other.kind()),
    };
    assert_eq!(action("/1/Untitled/metadata"), MetadataAction::Select);
    assert_eq!(
        action("/1/Untitled/metadata/precision"),
        MetadataAction::PropertySelect(MetadataPropertyName::Precision)
    );
    assert_eq!(
        action("/1/Untitled/metadata/precision/save/3"),
        MetadataAction::PropertySave(MetadataPropertyName::Precision, Some("3".into()))
    );
    assert_eq!(
        canonical("/1/Untitled/metadata/style/color/save/red"),
        "/1/Untitled/metadata/style/color/save/red"
    );
}

#[test]
fn read_only_metadata_can_be_viewed_not_saved() {
    assert_eq!(token("/1/Untitled/metadata/creator").kind(), "metadata-property-select");
    let result = parse_str("/1/Untitled/metadata/creator/save/someone");
    assert!(result.token.is_none());
    assert_eq!(extract_diag_codes(&result), [codes::INVALID_TOKEN]);
}

#[test]
fn form_tokens() {
    let action = |text: &str| match token(text) {
        HistoryToken::Form(t) => t.action().clone(),
        other => panic!("{text:?} parsed to {}", other.kind()),
    };
    assert_eq!(action("/1/Untitled/form"), FormAction::List(OffsetAndCount::EMPTY));
    assert_eq!(token("/1/Untitled/form/Contact").kind(), "form-select");
    assert_eq!(token("/1/Untitled/form/Contact/delete").kind(), "form-delete");
    assert_eq!(
        canonical(r#"/1/Untitled/form/Contact/save/{"fields":[]}"#),
        r#"/1/Untitled/form/Contact/save/{"fields":[]}"#
    );
    let not_object = parse_str("/1/Untitled/form/Contact/save/[]");
    assert_eq!(extract_diag_codes(&not_object), [codes::INVALID_TOKEN]);
}

#[test]
fn plugin_tokens() {
    let action = |text: &str| match token(text) {
        HistoryToken::Plugin(t) => t.action().clone(),
        other => panic!("{text:?} parsed to {}", other.kind()),
    };
    assert_eq!(action("/plugin/*/offset/5"), PluginAction::ListSelect(OffsetAndCount::with(Some(5), None).unwrap()));
    assert_eq!(action("/plugin/Files"), PluginAction::Select("Files".parse().unwrap()));
    assert_eq!(action("/plugin/Files/delete"), PluginAction::Delete("Files".parse().unwrap()));
    assert_eq!(action("/plugin/Files/file"), PluginAction::FileView("Files".parse().unwrap(), None));
    assert_eq!(token("/plugin-upload").kind(), "plugin-upload-select");
}

#[test]
fn unknown_plugin_tail_keeps_the_plugin() {
    let result = parse_str("/plugin/Files/bogus");
    assert_eq!(result.token.as_ref().unwrap().kind(), "plugin-select");
    assert_eq!(extract_diag_codes(&result), [codes::UNKNOWN_SEGMENT]);
}

// ─── Diagnostics ─────────────────────────────────────────────────────────────

#[test]
fn every_diagnostic_has_an_explanation() {
    for text in [
        "nope",
        "/1/Untitled/what",
        "/1/Untitled/cell",
        "/1/Untitled/cell/A1/formatter/nonsense",
        "/1/Untitled/cell/!",
        "/1/Untitled/cell/A1/top-left",
    ] {
        for diagnostic in parse_str(text).diagnostics {
            assert!(diagnostic.explain().is_some(), "{text}: {}", diagnostic.id);
        }
    }
}

#[test]
fn warnings_keep_a_token_errors_do_not() {
    for text in ["/1/Untitled/what", "/1/Untitled/cell", "nope", "/1/Untitled/cell/!"] {
        let result = parse_str(text);
        assert_eq!(result.token.is_none(), result.has_errors(), "{text}");
    }
}
