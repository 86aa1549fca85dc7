//! Property tests: every constructed token prints a fragment that parses
//! back, with no diagnostics, to a token holding the same selection and
//! action. Actions are compared by value, not through their fragments.
//!
//! CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use std::borrow::Cow;

use proptest::prelude::*;
use serde_json::{Value, json};
use sheet_history_core::payload::{
    CellFindQuery, CellRangeReferencePath, CellSaveValues, ClipboardValueKind, Currency, FormName, Locale,
    MetadataPropertyName, OffsetAndCount, PatternKind, PluginName, PluginUpload, SaveEntity,
    TextStylePropertyName, ValueTypeName, ViewportNavigationList,
};
use sheet_history_core::reference::{
    AnchoredSpreadsheetSelection, CellRange, CellReference, ExpressionReference, LabelMapping, LabelName,
    SpreadsheetId, SpreadsheetName, SpreadsheetSelection, SpreadsheetViewportAnchor,
};
use sheet_history_core::token::{
    CellAction, ColumnOrRowAction, FormAction, LabelMappingAction, MetadataAction, PluginAction,
};
use sheet_history_core::{HistoryToken, parse_str};

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ─── Generators ──────────────────────────────────────────────────────────────

fn arb_id() -> impl Strategy<Value = SpreadsheetId> {
    any::<u64>().prop_map(SpreadsheetId::new)
}

fn arb_name() -> impl Strategy<Value = SpreadsheetName> {
    "[A-Za-z][A-Za-z0-9_-]{0,12}".prop_map(|text| SpreadsheetName::new(&text).unwrap())
}

fn arb_cell() -> impl Strategy<Value = CellReference> {
    (0u32..800, 0u32..5000).prop_map(|(column, row)| CellReference::at(column, row).unwrap())
}

fn arb_corner() -> impl Strategy<Value = SpreadsheetViewportAnchor> {
    prop_oneof![
        Just(SpreadsheetViewportAnchor::TopLeft),
        Just(SpreadsheetViewportAnchor::TopRight),
        Just(SpreadsheetViewportAnchor::BottomLeft),
        Just(SpreadsheetViewportAnchor::BottomRight),
    ]
}

/// Cells, multi-cell ranges and labels, each with an anchor it accepts.
fn arb_cell_selection() -> impl Strategy<Value = AnchoredSpreadsheetSelection> {
    prop_oneof![
        arb_cell().prop_map(|c| SpreadsheetSelection::Cell(c).set_default_anchor()),
        (arb_cell(), 1u32..20, 1u32..20, arb_corner()).prop_map(|(begin, width, height, anchor)| {
            let end = CellReference::at(
                begin.column().index() + width,
                begin.row().index() + height,
            )
            .unwrap();
            AnchoredSpreadsheetSelection::new(
                SpreadsheetSelection::CellRange(CellRange::new(begin, end)),
                anchor,
            )
            .unwrap()
        }),
        "[A-Z][a-z]{3,8}".prop_map(|text| {
            SpreadsheetSelection::Label(LabelName::new(&text).unwrap()).set_default_anchor()
        }),
    ]
}

/// Columns, rows and their ranges, with default or explicit edge anchors.
fn arb_axis_selection() -> impl Strategy<Value = AnchoredSpreadsheetSelection> {
    prop_oneof![
        (0u32..800).prop_map(|c| {
            SpreadsheetSelection::parse_column(&column_letters(c)).unwrap().set_default_anchor()
        }),
        (1u32..5000).prop_map(|r| SpreadsheetSelection::parse_row(&r.to_string()).unwrap().set_default_anchor()),
        (0u32..800, 1u32..20, any::<bool>()).prop_map(|(c, width, right)| {
            let text = format!("{}:{}", column_letters(c), column_letters(c + width));
            let anchor = if right {
                SpreadsheetViewportAnchor::Right
            } else {
                SpreadsheetViewportAnchor::Left
            };
            AnchoredSpreadsheetSelection::new(SpreadsheetSelection::parse_column(&text).unwrap(), anchor).unwrap()
        }),
        (1u32..5000, 1u32..20, any::<bool>()).prop_map(|(r, height, bottom)| {
            let text = format!("{}:{}", r, r + height);
            let anchor = if bottom {
                SpreadsheetViewportAnchor::Bottom
            } else {
                SpreadsheetViewportAnchor::Top
            };
            AnchoredSpreadsheetSelection::new(SpreadsheetSelection::parse_row(&text).unwrap(), anchor).unwrap()
        }),
    ]
}

fn column_letters(index: u32) -> String {
    CellReference::at(index, 0)
        .unwrap()
        .column()
        .to_string()
}

fn arb_paging() -> impl Strategy<Value = OffsetAndCount> {
    (proptest::option::of(0i64..100_000), proptest::option::of(0i64..1000))
        .prop_map(|(offset, count)| OffsetAndCount::with(offset, count).unwrap())
}

/// Free text for saves: absent, empty, or a short value.
fn arb_text() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some(String::new())),
        "[A-Za-z0-9#.,: ]{1,12}".prop_map(Some),
    ]
}

fn arb_style_property() -> impl Strategy<Value = TextStylePropertyName> {
    prop::sample::select(TextStylePropertyName::ALL.to_vec())
}

fn arb_clipboard_kind() -> impl Strategy<Value = ClipboardValueKind> {
    prop::sample::select(ClipboardValueKind::ALL.to_vec())
}

fn arb_pattern_kind(format: bool) -> impl Strategy<Value = Option<PatternKind>> {
    let kinds: Vec<PatternKind> = PatternKind::ALL
        .iter()
        .copied()
        .filter(|k| if format { k.is_format() } else { k.is_parse() })
        .collect();
    proptest::option::of(prop::sample::select(kinds))
}

fn arb_locale() -> impl Strategy<Value = Option<Locale>> {
    proptest::option::of(prop::sample::select(vec!["en", "en-AU", "fr-CA", "es-419"]))
        .prop_map(|tag| tag.map(|tag| tag.parse().unwrap()))
}

fn arb_currency() -> impl Strategy<Value = Option<Currency>> {
    proptest::option::of(prop::sample::select(vec!["AUD", "EUR", "JPY"]))
        .prop_map(|code| code.map(|code| code.parse().unwrap()))
}

fn arb_symbols() -> impl Strategy<Value = Option<Value>> {
    proptest::option::of("[a-z]{1,6}".prop_map(|text| json!({ "ampms": [text, "PM"], "short": true })))
}

/// A value type with a value of the shape it accepts, or none.
fn arb_typed_value() -> impl Strategy<Value = (ValueTypeName, Option<Value>)> {
    prop_oneof![
        prop::sample::select(ValueTypeName::ALL.to_vec()).prop_map(|t| (t, None)),
        any::<bool>().prop_map(|b| (ValueTypeName::Boolean, Some(json!(b)))),
        (-1000i64..1000).prop_map(|n| (ValueTypeName::Number, Some(json!(n)))),
        "[A-Za-z0-9 /:-]{0,12}".prop_map(|text| (ValueTypeName::Text, Some(json!(text)))),
        Just((ValueTypeName::Date, Some(json!("2024-02-29")))),
    ]
}

fn arb_find_query() -> impl Strategy<Value = CellFindQuery> {
    (
        proptest::option::of(prop::sample::select(CellRangeReferencePath::ALL.to_vec())),
        proptest::option::of(0u32..50),
        proptest::option::of(1u32..50),
        proptest::option::of(prop::sample::select(ValueTypeName::ALL.to_vec())),
        arb_text(),
    )
        .prop_map(|(path, offset, count, value_type, query)| {
            CellFindQuery::EMPTY
                .set_path(path)
                .set_offset(offset)
                .set_count(count)
                .set_value_type(value_type)
                .set_query(query)
        })
}

fn arb_navigation() -> impl Strategy<Value = ViewportNavigationList> {
    prop::sample::select(vec!["left column", "left column,down row", "up row,right column,right column"])
        .prop_map(|text| text.parse().unwrap())
}

/// Cell actions that are valid for any cell, range or label selection.
fn arb_cell_action() -> impl Strategy<Value = CellAction> {
    prop_oneof![
        Just(CellAction::Select),
        Just(CellAction::Menu),
        Just(CellAction::Delete),
        Just(CellAction::Clear),
        Just(CellAction::Reload),
        Just(CellAction::FormulaSelect),
        Just(CellAction::ClearAndFormula),
        "(=[0-9+*]{1,10})?".prop_map(CellAction::FormulaSave),
        arb_style_property().prop_map(CellAction::StyleSelect),
        (arb_style_property(), arb_text()).prop_map(|(p, value)| CellAction::StyleSave(p, value)),
        arb_pattern_kind(true).prop_map(CellAction::FormatterSelect),
        arb_text().prop_map(CellAction::FormatterSave),
        arb_pattern_kind(false).prop_map(CellAction::ParserSelect),
        arb_text().prop_map(CellAction::ParserSave),
        Just(CellAction::ValidatorSelect),
        arb_text().prop_map(CellAction::ValidatorSave),
        Just(CellAction::LocaleSelect),
        arb_locale().prop_map(CellAction::LocaleSave),
        Just(CellAction::CurrencySelect),
        arb_currency().prop_map(CellAction::CurrencySave),
        Just(CellAction::DateTimeSymbolsSelect),
        arb_symbols().prop_map(CellAction::DateTimeSymbolsSave),
        Just(CellAction::DecimalNumberSymbolsSelect),
        arb_symbols().prop_map(CellAction::DecimalNumberSymbolsSave),
        prop::sample::select(ValueTypeName::ALL.to_vec()).prop_map(CellAction::ValueSelect),
        arb_typed_value().prop_map(|(t, value)| CellAction::ValueSave(t, value)),
        arb_clipboard_kind().prop_map(CellAction::Copy),
        arb_clipboard_kind().prop_map(CellAction::Cut),
        arb_clipboard_kind().prop_map(CellAction::Paste),
        arb_find_query().prop_map(CellAction::Find),
        arb_paging().prop_map(CellAction::Labels),
        arb_paging().prop_map(CellAction::References),
        arb_paging().prop_map(CellAction::LabelsReload),
        arb_paging().prop_map(CellAction::ReferencesReload),
        "([A-Z]=[a-z]{0,6})?".prop_map(CellAction::SortEdit),
        arb_navigation().prop_map(CellAction::Navigate),
    ]
}

/// Actions whose payload must fit the selection, each paired with one it fits.
fn arb_bound_cell_token() -> impl Strategy<Value = (AnchoredSpreadsheetSelection, CellAction)> {
    let from_home = prop_oneof![
        Just(SpreadsheetSelection::Cell(CellReference::HOME).set_default_anchor()),
        (1u32..5, 1u32..5).prop_map(|(width, height)| {
            let end = CellReference::at(width, height).unwrap();
            AnchoredSpreadsheetSelection::new(
                SpreadsheetSelection::CellRange(CellRange::new(CellReference::HOME, end)),
                SpreadsheetViewportAnchor::TopLeft,
            )
            .unwrap()
        }),
    ];
    prop_oneof![
        (from_home, any::<bool>()).prop_map(|(selection, freeze)| {
            let action = if freeze { CellAction::Freeze } else { CellAction::Unfreeze };
            (selection, action)
        }),
        (arb_cell(), 0u32..3).prop_map(|(cell, kind)| {
            let action = match kind {
                0 => CellAction::SortSave(format!("{}=text", cell.column()).parse().unwrap()),
                1 => CellAction::Save(
                    CellSaveValues::parse(SaveEntity::Formula, &format!(r#"{{"{cell}":"=1+2"}}"#)).unwrap(),
                ),
                _ => CellAction::Save(
                    CellSaveValues::parse(SaveEntity::Style, &format!(r##"{{"{cell}":{{"color":"#123456"}}}}"##))
                        .unwrap(),
                ),
            };
            (SpreadsheetSelection::Cell(cell).set_default_anchor(), action)
        }),
    ]
}

fn arb_cell_token() -> impl Strategy<Value = (AnchoredSpreadsheetSelection, CellAction)> {
    prop_oneof![
        4 => (arb_cell_selection(), arb_cell_action()),
        1 => arb_bound_cell_token(),
    ]
}

/// Column and row actions, each paired with a selection it fits.
fn arb_axis_token() -> impl Strategy<Value = (AnchoredSpreadsheetSelection, ColumnOrRowAction)> {
    let any_axis = prop_oneof![
        Just(ColumnOrRowAction::Select),
        Just(ColumnOrRowAction::Menu),
        Just(ColumnOrRowAction::Delete),
        Just(ColumnOrRowAction::Clear),
        Just(ColumnOrRowAction::Hide),
        Just(ColumnOrRowAction::Unhide),
        (1u32..100).prop_map(ColumnOrRowAction::InsertBefore),
        (1u32..100).prop_map(ColumnOrRowAction::InsertAfter),
        "([0-9]=[a-z]{0,6})?".prop_map(ColumnOrRowAction::SortEdit),
        arb_navigation().prop_map(ColumnOrRowAction::Navigate),
    ];
    let freezable = prop_oneof![
        Just(SpreadsheetSelection::parse_column("A").unwrap().set_default_anchor()),
        Just(SpreadsheetSelection::parse_column("A:C").unwrap().set_default_anchor()),
        Just(SpreadsheetSelection::parse_row("1").unwrap().set_default_anchor()),
        Just(SpreadsheetSelection::parse_row("1:4").unwrap().set_default_anchor()),
    ];
    prop_oneof![
        4 => (arb_axis_selection(), any_axis),
        1 => (freezable, any::<bool>()).prop_map(|(selection, freeze)| {
            let action = if freeze { ColumnOrRowAction::Freeze } else { ColumnOrRowAction::Unfreeze };
            (selection, action)
        }),
        // Columns sort by rows and rows by columns.
        1 => arb_axis_selection().prop_map(|selection| {
            let comparators = if selection.selection().is_column_like() { "2=text" } else { "B=number DOWN" };
            (selection, ColumnOrRowAction::SortSave(comparators.parse().unwrap()))
        }),
    ]
}

fn arb_metadata_action() -> impl Strategy<Value = MetadataAction> {
    let writable: Vec<MetadataPropertyName> =
        MetadataPropertyName::ALL.iter().copied().filter(|p| !p.is_read_only()).collect();
    prop_oneof![
        Just(MetadataAction::Select),
        prop::sample::select(MetadataPropertyName::ALL.to_vec()).prop_map(MetadataAction::PropertySelect),
        // Absent and empty values both remove the property.
        (prop::sample::select(writable), prop_oneof![Just(None), Just(Some(String::new()))])
            .prop_map(|(p, value)| MetadataAction::PropertySave(p, value)),
        (
            prop::sample::select(vec![
                MetadataPropertyName::CurrencySymbol,
                MetadataPropertyName::DateFormatPattern,
                MetadataPropertyName::NumberFormatPattern,
                MetadataPropertyName::SpreadsheetName,
            ]),
            "[A-Za-z0-9#.,: ]{1,12}",
        )
            .prop_map(|(p, text)| MetadataAction::PropertySave(p, Some(text))),
        prop::sample::select(vec![
            (MetadataPropertyName::CellCharacterWidth, "8"),
            (MetadataPropertyName::DecimalSeparator, ","),
            (MetadataPropertyName::FrozenColumns, "A:B"),
            (MetadataPropertyName::FrozenRows, "1:2"),
            (MetadataPropertyName::Locale, "en-AU"),
            (MetadataPropertyName::Precision, "10"),
            (MetadataPropertyName::RoundingMode, "HALF_UP"),
            (MetadataPropertyName::TwoDigitYear, "20"),
        ])
        .prop_map(|(p, text)| MetadataAction::PropertySave(p, Some(text.to_owned()))),
        arb_style_property().prop_map(MetadataAction::StyleSelect),
        (arb_style_property(), arb_text()).prop_map(|(p, value)| MetadataAction::StyleSave(p, value)),
    ]
}

fn arb_label_name() -> impl Strategy<Value = LabelName> {
    "[A-Z][a-z]{3,8}".prop_map(|text| LabelName::new(&text).unwrap())
}

fn arb_label_action() -> impl Strategy<Value = LabelMappingAction> {
    let target = prop_oneof![
        arb_cell().prop_map(ExpressionReference::Cell),
        (arb_cell(), arb_cell()).prop_map(|(a, b)| ExpressionReference::CellRange(CellRange::new(a, b))),
    ];
    prop_oneof![
        arb_paging().prop_map(LabelMappingAction::List),
        arb_paging().prop_map(LabelMappingAction::ListReload),
        Just(LabelMappingAction::Create),
        arb_label_name().prop_map(LabelMappingAction::Select),
        arb_label_name().prop_map(LabelMappingAction::Delete),
        (arb_label_name(), target)
            .prop_map(|(label, target)| LabelMappingAction::Save(LabelMapping::new(label, target).unwrap())),
    ]
}

fn arb_form_action() -> impl Strategy<Value = FormAction> {
    let form_name = "[a-z][a-z0-9-]{0,10}".prop_map(|text| FormName::new(&text).unwrap());
    prop_oneof![
        arb_paging().prop_map(FormAction::List),
        arb_paging().prop_map(FormAction::ListReload),
        form_name.clone().prop_map(FormAction::Select),
        form_name.clone().prop_map(FormAction::Delete),
        (form_name, "[A-Za-z ]{0,10}").prop_map(|(name, title)| {
            FormAction::Save(name, json!({ "title": title, "fields": [{ "label": "Name" }] }))
        }),
    ]
}

fn arb_plugin_action() -> impl Strategy<Value = PluginAction> {
    let plugin_name = "[A-Za-z][A-Za-z0-9_.-]{0,10}".prop_map(|text| PluginName::new(&text).unwrap());
    let path = prop_oneof![
        Just(None),
        Just(Some(String::new())),
        "[a-z]{1,8}(/[a-z]{1,8}){0,2}".prop_map(Some),
    ];
    prop_oneof![
        arb_paging().prop_map(PluginAction::ListSelect),
        arb_paging().prop_map(PluginAction::ListReload),
        plugin_name.clone().prop_map(PluginAction::Select),
        plugin_name.clone().prop_map(PluginAction::Delete),
        (plugin_name.clone(), path).prop_map(|(name, path)| PluginAction::FileView(name, path)),
        Just(PluginAction::UploadSelect),
        (plugin_name, "[A-Za-z0-9+/]{0,16}={0,2}")
            .prop_map(|(name, content)| PluginAction::UploadSave(PluginUpload::new(name, content))),
    ]
}

// ─── Properties ──────────────────────────────────────────────────────────────

/// An empty text save means the same as no value.
fn blank_is_none(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.is_empty())
}

fn expected_cell_action(action: CellAction) -> CellAction {
    match action {
        CellAction::StyleSave(p, value) => CellAction::StyleSave(p, blank_is_none(value)),
        CellAction::FormatterSave(value) => CellAction::FormatterSave(blank_is_none(value)),
        CellAction::ParserSave(value) => CellAction::ParserSave(blank_is_none(value)),
        CellAction::ValidatorSave(value) => CellAction::ValidatorSave(blank_is_none(value)),
        other => other,
    }
}

fn expected_metadata_action(action: MetadataAction) -> MetadataAction {
    match action {
        MetadataAction::PropertySave(p, value) => MetadataAction::PropertySave(p, blank_is_none(value)),
        MetadataAction::StyleSave(p, value) => MetadataAction::StyleSave(p, blank_is_none(value)),
        other => other,
    }
}

fn expected_plugin_action(action: PluginAction) -> PluginAction {
    match action {
        PluginAction::FileView(name, path) => PluginAction::FileView(name, blank_is_none(path)),
        other => other,
    }
}

/// Print, parse, and check the parsed token prints the same fragment.
fn reparse(token: &HistoryToken) -> Result<HistoryToken, TestCaseError> {
    let fragment = token.to_string();
    let result = parse_str(&fragment);
    prop_assert!(result.diagnostics.is_empty(), "{fragment}: {:?}", result.diagnostics);
    let Some(parsed) = result.token else {
        return Err(TestCaseError::fail(format!("{fragment} produced no token")));
    };
    prop_assert_eq!(parsed.to_string(), fragment);
    prop_assert_eq!(parsed.kind(), token.kind());
    Ok(parsed)
}

fn assert_round_trip(token: &HistoryToken) -> Result<(), TestCaseError> {
    let parsed = reparse(token)?;
    prop_assert_eq!(&parsed, token);
    Ok(())
}

proptest! {
    #![proptest_config(config())]

    #[test]
    fn cell_tokens_round_trip(
        id in arb_id(),
        name in arb_name(),
        (selection, action) in arb_cell_token(),
    ) {
        let expected = expected_cell_action(action.clone());
        let token = HistoryToken::cell(id, name, selection.clone(), action).unwrap();
        let HistoryToken::Cell(built) = &token else {
            return Err(TestCaseError::fail(token.kind()));
        };
        prop_assert_eq!(built.action(), &expected);

        let parsed = reparse(&token)?;
        let HistoryToken::Cell(parsed) = &parsed else {
            return Err(TestCaseError::fail(parsed.kind()));
        };
        prop_assert_eq!(parsed.action(), &expected, "{}", token);
        prop_assert_eq!(parsed.selection(), &selection);
        prop_assert_eq!(parsed.sheet(), built.sheet());
    }

    #[test]
    fn column_and_row_tokens_round_trip(
        id in arb_id(),
        name in arb_name(),
        (selection, action) in arb_axis_token(),
    ) {
        let token = HistoryToken::column_or_row(id, name, selection.clone(), action.clone()).unwrap();
        let parsed = reparse(&token)?;
        let HistoryToken::ColumnOrRow(parsed) = &parsed else {
            return Err(TestCaseError::fail(parsed.kind()));
        };
        prop_assert_eq!(parsed.action(), &action, "{}", token);
        prop_assert_eq!(parsed.selection(), &selection);
    }

    #[test]
    fn metadata_tokens_round_trip(id in arb_id(), name in arb_name(), action in arb_metadata_action()) {
        let expected = expected_metadata_action(action.clone());
        let token = HistoryToken::metadata(id, name, action).unwrap();
        let parsed = reparse(&token)?;
        let HistoryToken::Metadata(parsed) = &parsed else {
            return Err(TestCaseError::fail(parsed.kind()));
        };
        prop_assert_eq!(parsed.action(), &expected, "{}", token);
    }

    #[test]
    fn label_mapping_tokens_round_trip(id in arb_id(), name in arb_name(), action in arb_label_action()) {
        let token = HistoryToken::label_mapping(id, name, action.clone());
        let parsed = reparse(&token)?;
        let HistoryToken::LabelMapping(parsed) = &parsed else {
            return Err(TestCaseError::fail(parsed.kind()));
        };
        prop_assert_eq!(parsed.action(), &action, "{}", token);
    }

    #[test]
    fn form_tokens_round_trip(id in arb_id(), name in arb_name(), action in arb_form_action()) {
        let token = HistoryToken::form(id, name, action.clone()).unwrap();
        let parsed = reparse(&token)?;
        let HistoryToken::Form(parsed) = &parsed else {
            return Err(TestCaseError::fail(parsed.kind()));
        };
        prop_assert_eq!(parsed.action(), &action, "{}", token);
    }

    #[test]
    fn plugin_tokens_round_trip(action in arb_plugin_action()) {
        let expected = expected_plugin_action(action.clone());
        let token = HistoryToken::plugin(action);
        let parsed = reparse(&token)?;
        let HistoryToken::Plugin(parsed) = &parsed else {
            return Err(TestCaseError::fail(parsed.kind()));
        };
        prop_assert_eq!(parsed.action(), &expected, "{}", token);
    }

    #[test]
    fn list_tokens_round_trip(paging in arb_paging()) {
        assert_round_trip(&HistoryToken::spreadsheet_list_select(paging))?;
        assert_round_trip(&HistoryToken::spreadsheet_list_reload(paging))?;
        assert_round_trip(&HistoryToken::plugin(PluginAction::ListSelect(paging)))?;
    }

    #[test]
    fn selection_dispatch_round_trips(
        id in arb_id(),
        name in arb_name(),
        selection in prop_oneof![arb_cell_selection(), arb_axis_selection()],
    ) {
        let token = HistoryToken::selection(id, name, selection.clone()).unwrap();
        prop_assert_eq!(token.anchored_selection(), Some(&selection));
        assert_round_trip(&token)?;
    }

    #[test]
    fn clear_action_settles(
        id in arb_id(),
        name in arb_name(),
        (selection, action) in arb_cell_token(),
    ) {
        let mut token = HistoryToken::cell(id, name, selection, action).unwrap();
        for _ in 0..3 {
            token = token.clear_action().into_owned();
            assert_round_trip(&token)?;
        }
        prop_assert!(matches!(token.clear_action(), Cow::Borrowed(_)), "{}", token);
    }

    #[test]
    fn arbitrary_text_never_panics(text in "(/[A-Za-z0-9:=*,.{}\" -]{0,12}){0,10}") {
        let result = parse_str(&text);
        prop_assert!(result.token.is_some() || result.diagnostics.iter().any(|d| d.is_error()));
    }
}
