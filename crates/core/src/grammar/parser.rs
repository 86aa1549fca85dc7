use std::str::FromStr;

use serde_json::Value;
use sheet_history_diagnostics::{Diagnostic, Span, codes};

use crate::config::ParseConfig;
use crate::cursor::{CursorSavePoint, TextCursor};
use crate::error::HistoryTokenError;
use crate::fragment::UrlFragment;
use crate::payload::{
    CellFindQuery, CellSaveValues, ClipboardValueKind, Currency, FormName, Locale, MetadataPropertyName,
    OffsetAndCount, PatternKind, PluginName, PluginUpload, SaveEntity, SortComparators,
    TextStylePropertyName, ValueTypeName, ViewportNavigationList,
};
use crate::reference::{
    AnchoredSpreadsheetSelection, ExpressionReference, LabelMapping, LabelName, SpreadsheetId,
    SpreadsheetName, SpreadsheetSelection, SpreadsheetViewportAnchor,
};
use crate::token::{
    CellAction, CellToken, ColumnOrRowAction, ColumnOrRowToken, FormAction, FormToken, HistoryToken,
    LabelMappingAction, LabelMappingToken, MetadataAction, MetadataToken, PluginAction,
    SpreadsheetAction, SpreadsheetIdAndName,
};

/// Build a `BTreeMap<String, String>` from key-value pairs for diagnostic context.
macro_rules! ctx {
    ($($k:expr => $v:expr),+ $(,)?) => {
        std::collections::BTreeMap::from([$(($k.into(), $v.into())),+])
    };
}

/// Result of parsing a URL fragment.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ParseResult {
    /// The token, or `None` when the fragment could not be understood at all.
    pub token: Option<HistoryToken>,
    /// Why parts of the fragment were ignored or rejected.
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseResult {
    /// True when any diagnostic is an error. A token is then absent.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// The token, discarding diagnostics.
    pub fn into_token(self) -> Option<HistoryToken> {
        self.token
    }
}

/// Parse a fragment with the default [`ParseConfig`].
pub fn parse_fragment(fragment: &UrlFragment) -> ParseResult {
    parse_fragment_with(fragment, &ParseConfig::default())
}

/// Parse a fragment with an explicit configuration.
///
/// Never panics. Unknown or malformed trailing segments fall back to the
/// deepest token that was understood; malformed embedded values and
/// rejected payloads yield no token.
pub fn parse_fragment_with(fragment: &UrlFragment, config: &ParseConfig) -> ParseResult {
    Parser::new(fragment.value()).run(config)
}

/// Parse fragment text directly.
pub fn parse_str(text: &str) -> ParseResult {
    Parser::new(text).run(&ParseConfig::default())
}

impl HistoryToken {
    /// Parse a fragment, discarding diagnostics.
    pub fn parse(fragment: &UrlFragment) -> Option<HistoryToken> {
        parse_fragment(fragment).token
    }
}

/// A parse step either yields a value or a fatal diagnostic.
type Step<T> = Result<T, Diagnostic>;

enum SortStep {
    Edit(String),
    Save(SortComparators),
}

struct Parser<'a> {
    text: &'a str,
    cursor: TextCursor<'a>,
    diags: Vec<Diagnostic>,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            cursor: TextCursor::new(text),
            diags: Vec::new(),
        }
    }

    // ── Entry ───────────────────────────────────────────────────────────

    fn run(mut self, config: &ParseConfig) -> ParseResult {
        if self.text.is_empty() {
            return self.finish(Some(HistoryToken::spreadsheet_list_select(OffsetAndCount::EMPTY)));
        }
        if !self.text.starts_with('/') {
            self.diags.push(
                Diagnostic::error(
                    codes::MISSING_LEADING_SLASH,
                    "fragment must start with '/'",
                    Some(Span::new(0, self.text.len())),
                )
                .with_context(ctx!("expected" => "/")),
            );
            return self.finish(None);
        }
        if self.text.len() > config.max_fragment_len {
            return self.too_long(config.max_fragment_len);
        }

        let token = match self.root() {
            Ok(token) => {
                if !self.cursor.is_empty() {
                    let rest = self.cursor.rest();
                    self.diags.push(
                        Diagnostic::warn(
                            codes::TRAILING_INPUT,
                            format!("ignored trailing input {rest:?}"),
                            Some(self.cursor.rest_span()),
                        )
                        .with_context(ctx!("rest" => rest)),
                    );
                }
                Some(token)
            }
            Err(diag) => {
                self.diags.push(diag);
                None
            }
        };
        self.finish(token)
    }

    fn finish(self, token: Option<HistoryToken>) -> ParseResult {
        match &token {
            None => tracing::debug!(fragment = self.text, "fragment did not parse"),
            Some(token) if !self.diags.is_empty() => tracing::debug!(
                fragment = self.text,
                token = %token,
                diagnostics = self.diags.len(),
                "fragment partially parsed"
            ),
            Some(_) => {}
        }
        ParseResult {
            token,
            diagnostics: self.diags,
        }
    }

    /// Oversized input: read at most the spreadsheet id and name.
    fn too_long(mut self, max: usize) -> ParseResult {
        let len = self.text.len();
        self.diags.push(
            Diagnostic::warn(
                codes::FRAGMENT_TOO_LONG,
                format!("fragment is {len} bytes, longer than the maximum of {max}"),
                Some(Span::new(max, len)),
            )
            .with_context(ctx!("length" => len.to_string(), "max" => max.to_string())),
        );
        let id = self.cursor.parse_component().and_then(|t| t.parse::<SpreadsheetId>().ok());
        let name = self.cursor.parse_component().and_then(|t| t.parse::<SpreadsheetName>().ok());
        self.cursor.end();
        let token = match (id, name) {
            (Some(id), Some(name)) => Some(HistoryToken::spreadsheet_select(id, name)),
            _ => None,
        };
        self.finish(token)
    }

    // ── Diagnostics ─────────────────────────────────────────────────────

    fn invalid_value(error: HistoryTokenError, span: Span) -> Diagnostic {
        Diagnostic::error(codes::INVALID_VALUE, error.to_string(), Some(span))
    }

    fn invalid_token(&self, error: HistoryTokenError) -> Diagnostic {
        Diagnostic::error(
            codes::INVALID_TOKEN,
            error.to_string(),
            Some(Span::new(0, self.cursor.position())),
        )
    }

    fn missing(&mut self, keyword: &str) {
        let pos = self.cursor.position();
        self.diags.push(
            Diagnostic::warn(
                codes::MISSING_VALUE,
                format!("'{keyword}' must be followed by a value"),
                Some(Span::empty(pos)),
            )
            .with_context(ctx!("keyword" => keyword)),
        );
    }

    /// Record an unrecognised segment and skip the rest of the fragment.
    fn unknown(&mut self, start: CursorSavePoint, segment: &str) {
        self.cursor.end();
        self.diags.push(
            Diagnostic::warn(
                codes::UNKNOWN_SEGMENT,
                format!("unknown segment {segment:?}"),
                Some(self.cursor.span_since(start)),
            )
            .with_context(ctx!("segment" => segment)),
        );
    }

    // ── Primitives ──────────────────────────────────────────────────────

    /// Consume the next component when it equals `keyword`.
    fn keyword(&mut self, keyword: &str) -> bool {
        if self.cursor.peek_component() == Some(keyword) {
            self.cursor.parse_component();
            true
        } else {
            false
        }
    }

    /// Parse the next component, if any.
    fn value<T>(&mut self) -> Step<Option<T>>
    where
        T: FromStr<Err = HistoryTokenError>,
    {
        let start = self.cursor.save();
        match self.cursor.parse_component() {
            None => Ok(None),
            Some(text) => text
                .parse()
                .map(Some)
                .map_err(|e| Self::invalid_value(e, self.cursor.span_since(start))),
        }
    }

    /// `save/<rest>`: outer `None` when there is no `save`, inner `None` when
    /// the value is empty or absent.
    fn save_text(&mut self) -> Option<Option<String>> {
        if !self.keyword("save") {
            return None;
        }
        Some(
            self.cursor
                .parse_all()
                .filter(|t| !t.is_empty())
                .map(str::to_owned),
        )
    }

    fn save_value<T>(&mut self) -> Step<Option<Option<T>>>
    where
        T: FromStr<Err = HistoryTokenError>,
    {
        let start = self.cursor.save();
        match self.save_text() {
            None => Ok(None),
            Some(None) => Ok(Some(None)),
            Some(Some(text)) => text
                .parse()
                .map(|v| Some(Some(v)))
                .map_err(|e| Self::invalid_value(e, self.cursor.span_since(start))),
        }
    }

    fn save_json(&mut self) -> Step<Option<Option<Value>>> {
        let start = self.cursor.save();
        match self.save_text() {
            None => Ok(None),
            Some(None) => Ok(Some(None)),
            Some(Some(text)) => self.json(&text, start).map(|v| Some(Some(v))),
        }
    }

    fn json(&self, text: &str, start: CursorSavePoint) -> Step<Value> {
        serde_json::from_str(text).map_err(|e| {
            Self::invalid_value(
                HistoryTokenError::invalid("json", e.to_string()),
                self.cursor.span_since(start),
            )
        })
    }

    /// `offset/<n>`, `count/<n>` and an optional trailing `reload`.
    ///
    /// Negative, unparseable or repeated values normalise to
    /// [`OffsetAndCount::EMPTY`].
    fn offset_and_count(&mut self) -> (OffsetAndCount, bool) {
        let mut offset: Option<i64> = None;
        let mut count: Option<i64> = None;
        let mut invalid = false;
        let mut reload = false;
        loop {
            let mark = self.cursor.save();
            match self.cursor.parse_component() {
                Some(keyword @ ("offset" | "count")) => {
                    let value = self.cursor.parse_component().and_then(|t| t.parse::<i64>().ok());
                    let slot = if keyword == "offset" { &mut offset } else { &mut count };
                    match value {
                        Some(value) if slot.is_none() => *slot = Some(value),
                        _ => invalid = true,
                    }
                }
                Some("reload") => {
                    reload = true;
                    break;
                }
                _ => {
                    self.cursor.restore(mark);
                    break;
                }
            }
        }
        let oc = if invalid {
            None
        } else {
            OffsetAndCount::with(offset, count).ok()
        };
        let oc = oc.unwrap_or_else(|| {
            tracing::debug!(fragment = self.text, "invalid offset or count ignored");
            OffsetAndCount::EMPTY
        });
        (oc, reload)
    }

    fn navigation(&mut self) -> Step<ViewportNavigationList> {
        let start = self.cursor.save();
        match self.cursor.parse_all() {
            None => Ok(ViewportNavigationList::EMPTY),
            Some(text) => text
                .parse()
                .map_err(|e| Self::invalid_value(e, self.cursor.span_since(start))),
        }
    }

    fn sort(&mut self) -> Step<Option<SortStep>> {
        let start = self.cursor.save();
        match self.cursor.parse_component() {
            Some("edit") => Ok(Some(SortStep::Edit(
                self.cursor.parse_all().unwrap_or_default().to_owned(),
            ))),
            Some("save") => match self.cursor.parse_all().filter(|t| !t.is_empty()) {
                None => {
                    self.missing("sort/save");
                    Ok(None)
                }
                Some(text) => text
                    .parse()
                    .map(|c| Some(SortStep::Save(c)))
                    .map_err(|e| Self::invalid_value(e, self.cursor.span_since(start))),
            },
            Some(other) => {
                self.unknown(start, other);
                Ok(None)
            }
            None => {
                self.missing("sort");
                Ok(None)
            }
        }
    }

    /// A selection followed by an optional anchor keyword.
    ///
    /// `Ok(None)` when the selection segment is absent.
    fn anchored(
        &mut self,
        keyword: &str,
        parse: fn(&str) -> Result<SpreadsheetSelection, HistoryTokenError>,
    ) -> Step<Option<AnchoredSpreadsheetSelection>> {
        let start = self.cursor.save();
        let Some(text) = self.cursor.parse_component() else {
            self.missing(keyword);
            return Ok(None);
        };
        let selection = parse(text).map_err(|e| Self::invalid_value(e, self.cursor.span_since(start)))?;
        let mark = self.cursor.save();
        let anchor = match self
            .cursor
            .parse_component()
            .and_then(SpreadsheetViewportAnchor::parse_suffix)
        {
            Some(anchor) => anchor,
            None => {
                self.cursor.restore(mark);
                selection.default_anchor()
            }
        };
        AnchoredSpreadsheetSelection::new(selection, anchor)
            .map(Some)
            .map_err(|e| self.invalid_token(e))
    }

    // ── Root ────────────────────────────────────────────────────────────

    fn root(&mut self) -> Step<HistoryToken> {
        let start = self.cursor.save();
        let Some(first) = self.cursor.parse_component() else {
            return Ok(HistoryToken::spreadsheet_list_select(OffsetAndCount::EMPTY));
        };
        match first {
            "" => Ok(HistoryToken::spreadsheet_list_select(OffsetAndCount::EMPTY)),
            "*" => {
                let (oc, reload) = self.offset_and_count();
                Ok(if reload {
                    HistoryToken::spreadsheet_list_reload(oc)
                } else {
                    HistoryToken::spreadsheet_list_select(oc)
                })
            }
            "create" => Ok(HistoryToken::spreadsheet_create()),
            "rename" => match self.value::<SpreadsheetId>()? {
                None => {
                    self.missing("rename");
                    Ok(HistoryToken::spreadsheet_list_select(OffsetAndCount::EMPTY))
                }
                Some(id) => Ok(match self.value::<SpreadsheetName>()? {
                    None => HistoryToken::spreadsheet_list_rename_select(id),
                    Some(name) => HistoryToken::spreadsheet_list_rename_save(id, name),
                }),
            },
            "delete" => match self.value::<SpreadsheetId>()? {
                None => {
                    self.missing("delete");
                    Ok(HistoryToken::spreadsheet_list_select(OffsetAndCount::EMPTY))
                }
                Some(id) => Ok(HistoryToken::spreadsheet_list_delete(id)),
            },
            "plugin" => self.plugin(),
            "plugin-upload" => self.plugin_upload(),
            id => {
                let id: SpreadsheetId = id
                    .parse()
                    .map_err(|e| Self::invalid_value(e, self.cursor.span_since(start)))?;
                match self.value::<SpreadsheetName>()? {
                    None => Ok(HistoryToken::spreadsheet_load(id)),
                    Some(name) => self.spreadsheet(SpreadsheetIdAndName::new(id, name)),
                }
            }
        }
    }

    // ── Spreadsheet ─────────────────────────────────────────────────────

    fn spreadsheet(&mut self, sheet: SpreadsheetIdAndName) -> Step<HistoryToken> {
        let start = self.cursor.save();
        let Some(segment) = self.cursor.parse_component() else {
            return Ok(HistoryToken::with_sheet(sheet, SpreadsheetAction::Select));
        };
        let action = match segment {
            "cell" => return self.cell(sheet),
            "column" => return self.column_or_row(sheet, true),
            "row" => return self.column_or_row(sheet, false),
            "label" => return self.label(sheet),
            "label-create" => {
                return Ok(HistoryToken::LabelMapping(LabelMappingToken::new(
                    sheet,
                    LabelMappingAction::Create,
                )));
            }
            "form" => return self.form(sheet),
            "metadata" => return self.metadata(sheet),
            "navigate" => SpreadsheetAction::Navigate(self.navigation()?),
            "rename" => {
                if self.keyword("save") {
                    match self.value::<SpreadsheetName>()? {
                        Some(name) => SpreadsheetAction::RenameSave(name),
                        None => {
                            self.missing("rename/save");
                            SpreadsheetAction::RenameSelect
                        }
                    }
                } else {
                    SpreadsheetAction::RenameSelect
                }
            }
            "reload" => SpreadsheetAction::Reload,
            "delete" => SpreadsheetAction::Delete,
            other => {
                self.unknown(start, other);
                SpreadsheetAction::Select
            }
        };
        Ok(HistoryToken::with_sheet(sheet, action))
    }

    // ── Cell ────────────────────────────────────────────────────────────

    fn cell(&mut self, sheet: SpreadsheetIdAndName) -> Step<HistoryToken> {
        let Some(selection) = self.anchored("cell", SpreadsheetSelection::parse_cell)? else {
            return Ok(HistoryToken::with_sheet(sheet, SpreadsheetAction::Select));
        };
        let action = self.cell_action()?;
        CellToken::new(sheet, selection, action)
            .map(HistoryToken::Cell)
            .map_err(|e| self.invalid_token(e))
    }

    fn cell_action(&mut self) -> Step<CellAction> {
        let start = self.cursor.save();
        let Some(segment) = self.cursor.parse_component() else {
            return Ok(CellAction::Select);
        };
        Ok(match segment {
            "menu" => CellAction::Menu,
            "delete" => CellAction::Delete,
            "clear" => CellAction::Clear,
            "freeze" => CellAction::Freeze,
            "unfreeze" => CellAction::Unfreeze,
            "reload" => CellAction::Reload,
            "clear-and-formula" => CellAction::ClearAndFormula,
            "formula" => match self.save_text() {
                Some(text) => CellAction::FormulaSave(text.unwrap_or_default()),
                None => CellAction::FormulaSelect,
            },
            "style" => match self.value::<TextStylePropertyName>()? {
                None => {
                    self.missing("style");
                    CellAction::Select
                }
                Some(property) => match self.save_text() {
                    Some(value) => CellAction::StyleSave(property, value),
                    None => CellAction::StyleSelect(property),
                },
            },
            "formatter" => self.pattern_action(CellAction::FormatterSelect, CellAction::FormatterSave),
            "parser" => self.pattern_action(CellAction::ParserSelect, CellAction::ParserSave),
            "validator" => match self.save_text() {
                Some(value) => CellAction::ValidatorSave(value),
                None => CellAction::ValidatorSelect,
            },
            "locale" => match self.save_value::<Locale>()? {
                Some(value) => CellAction::LocaleSave(value),
                None => CellAction::LocaleSelect,
            },
            "currency" => match self.save_value::<Currency>()? {
                Some(value) => CellAction::CurrencySave(value),
                None => CellAction::CurrencySelect,
            },
            "dateTimeSymbols" => match self.save_json()? {
                Some(value) => CellAction::DateTimeSymbolsSave(value),
                None => CellAction::DateTimeSymbolsSelect,
            },
            "decimalNumberSymbols" => match self.save_json()? {
                Some(value) => CellAction::DecimalNumberSymbolsSave(value),
                None => CellAction::DecimalNumberSymbolsSelect,
            },
            "value" => match self.value::<ValueTypeName>()? {
                None => {
                    self.missing("value");
                    CellAction::Select
                }
                Some(value_type) => match self.save_json()? {
                    Some(value) => CellAction::ValueSave(value_type, value),
                    None => CellAction::ValueSelect(value_type),
                },
            },
            "copy" | "cut" | "paste" => match self.value::<ClipboardValueKind>()? {
                None => {
                    self.missing(segment);
                    CellAction::Select
                }
                Some(kind) => match segment {
                    "copy" => CellAction::Copy(kind),
                    "cut" => CellAction::Cut(kind),
                    _ => CellAction::Paste(kind),
                },
            },
            "find" => {
                let find_start = self.cursor.save();
                let query = CellFindQuery::parse(&mut self.cursor)
                    .map_err(|e| Self::invalid_value(e, self.cursor.span_since(find_start)))?;
                CellAction::Find(query)
            }
            "labels" => match self.offset_and_count() {
                (oc, true) => CellAction::LabelsReload(oc),
                (oc, false) => CellAction::Labels(oc),
            },
            "references" => match self.offset_and_count() {
                (oc, true) => CellAction::ReferencesReload(oc),
                (oc, false) => CellAction::References(oc),
            },
            "sort" => match self.sort()? {
                Some(SortStep::Edit(text)) => CellAction::SortEdit(text),
                Some(SortStep::Save(comparators)) => CellAction::SortSave(comparators),
                None => CellAction::Select,
            },
            "save" => match self.value::<SaveEntity>()? {
                None => {
                    self.missing("save");
                    CellAction::Select
                }
                Some(entity) => {
                    let json_start = self.cursor.save();
                    match self.cursor.parse_all().filter(|t| !t.is_empty()) {
                        None => {
                            self.missing("save");
                            CellAction::Select
                        }
                        Some(json) => CellSaveValues::parse(entity, json)
                            .map(CellAction::Save)
                            .map_err(|e| Self::invalid_value(e, self.cursor.span_since(json_start)))?,
                    }
                }
            },
            "navigate" => CellAction::Navigate(self.navigation()?),
            other => {
                self.unknown(start, other);
                CellAction::Select
            }
        })
    }

    /// `formatter` and `parser` tails: `save/<pattern>`, a pattern kind, or nothing.
    fn pattern_action(
        &mut self,
        select: fn(Option<PatternKind>) -> CellAction,
        save: fn(Option<String>) -> CellAction,
    ) -> CellAction {
        if let Some(pattern) = self.save_text() {
            return save(pattern);
        }
        let mark = self.cursor.save();
        match self.cursor.parse_component().map(str::parse::<PatternKind>) {
            Some(Ok(kind)) => select(Some(kind)),
            _ => {
                self.cursor.restore(mark);
                select(None)
            }
        }
    }

    // ── Column / row ────────────────────────────────────────────────────

    fn column_or_row(&mut self, sheet: SpreadsheetIdAndName, column: bool) -> Step<HistoryToken> {
        let (keyword, parse): (&str, fn(&str) -> Result<SpreadsheetSelection, HistoryTokenError>) =
            if column {
                ("column", SpreadsheetSelection::parse_column)
            } else {
                ("row", SpreadsheetSelection::parse_row)
            };
        let Some(selection) = self.anchored(keyword, parse)? else {
            return Ok(HistoryToken::with_sheet(sheet, SpreadsheetAction::Select));
        };

        let start = self.cursor.save();
        let action = match self.cursor.parse_component() {
            None => ColumnOrRowAction::Select,
            Some("menu") => ColumnOrRowAction::Menu,
            Some("delete") => ColumnOrRowAction::Delete,
            Some("clear") => ColumnOrRowAction::Clear,
            Some("freeze") => ColumnOrRowAction::Freeze,
            Some("unfreeze") => ColumnOrRowAction::Unfreeze,
            Some("hide") => ColumnOrRowAction::Hide,
            Some("unhide") => ColumnOrRowAction::Unhide,
            Some(insert @ ("insert-before" | "insert-after")) => {
                let count_start = self.cursor.save();
                match self.cursor.parse_component() {
                    None => {
                        self.missing(insert);
                        ColumnOrRowAction::Select
                    }
                    Some(text) => {
                        let count: u32 = text.parse().map_err(|_| {
                            Self::invalid_value(
                                HistoryTokenError::invalid("insert count", format!("{text:?} is not a count")),
                                self.cursor.span_since(count_start),
                            )
                        })?;
                        if insert == "insert-before" {
                            ColumnOrRowAction::InsertBefore(count)
                        } else {
                            ColumnOrRowAction::InsertAfter(count)
                        }
                    }
                }
            }
            Some("sort") => match self.sort()? {
                Some(SortStep::Edit(text)) => ColumnOrRowAction::SortEdit(text),
                Some(SortStep::Save(comparators)) => ColumnOrRowAction::SortSave(comparators),
                None => ColumnOrRowAction::Select,
            },
            Some("navigate") => ColumnOrRowAction::Navigate(self.navigation()?),
            Some(other) => {
                self.unknown(start, other);
                ColumnOrRowAction::Select
            }
        };
        ColumnOrRowToken::new(sheet, selection, action)
            .map(HistoryToken::ColumnOrRow)
            .map_err(|e| self.invalid_token(e))
    }

    // ── Labels, metadata, forms ─────────────────────────────────────────

    fn label(&mut self, sheet: SpreadsheetIdAndName) -> Step<HistoryToken> {
        let start = self.cursor.save();
        let action = match self.cursor.parse_component() {
            None => LabelMappingAction::List(OffsetAndCount::EMPTY),
            Some("*") => match self.offset_and_count() {
                (oc, true) => LabelMappingAction::ListReload(oc),
                (oc, false) => LabelMappingAction::List(oc),
            },
            Some(text) => {
                let label: LabelName = text
                    .parse()
                    .map_err(|e| Self::invalid_value(e, self.cursor.span_since(start)))?;
                let mark = self.cursor.save();
                match self.cursor.parse_component() {
                    None => LabelMappingAction::Select(label),
                    Some("delete") => LabelMappingAction::Delete(label),
                    Some("save") => match self.value::<ExpressionReference>()? {
                        None => {
                            self.missing("save");
                            LabelMappingAction::Select(label)
                        }
                        Some(target) => LabelMappingAction::Save(
                            LabelMapping::new(label, target).map_err(|e| self.invalid_token(e))?,
                        ),
                    },
                    Some(other) => {
                        self.unknown(mark, other);
                        LabelMappingAction::Select(label)
                    }
                }
            }
        };
        Ok(HistoryToken::LabelMapping(LabelMappingToken::new(sheet, action)))
    }

    fn metadata(&mut self, sheet: SpreadsheetIdAndName) -> Step<HistoryToken> {
        let start = self.cursor.save();
        let action = match self.cursor.parse_component() {
            None => MetadataAction::Select,
            Some("style") => match self.value::<TextStylePropertyName>()? {
                None => {
                    self.missing("style");
                    MetadataAction::Select
                }
                Some(property) => match self.save_text() {
                    Some(value) => MetadataAction::StyleSave(property, value),
                    None => MetadataAction::StyleSelect(property),
                },
            },
            Some(text) => {
                let property: MetadataPropertyName = text
                    .parse()
                    .map_err(|e| Self::invalid_value(e, self.cursor.span_since(start)))?;
                match self.save_text() {
                    Some(value) => MetadataAction::PropertySave(property, value),
                    None => MetadataAction::PropertySelect(property),
                }
            }
        };
        MetadataToken::new(sheet, action)
            .map(HistoryToken::Metadata)
            .map_err(|e| self.invalid_token(e))
    }

    fn form(&mut self, sheet: SpreadsheetIdAndName) -> Step<HistoryToken> {
        let start = self.cursor.save();
        let action = match self.cursor.parse_component() {
            None => FormAction::List(OffsetAndCount::EMPTY),
            Some("*") => match self.offset_and_count() {
                (oc, true) => FormAction::ListReload(oc),
                (oc, false) => FormAction::List(oc),
            },
            Some(text) => {
                let name: FormName = text
                    .parse()
                    .map_err(|e| Self::invalid_value(e, self.cursor.span_since(start)))?;
                let mark = self.cursor.save();
                match self.cursor.parse_component() {
                    None => FormAction::Select(name),
                    Some("delete") => FormAction::Delete(name),
                    Some("save") => {
                        let json_start = self.cursor.save();
                        match self.cursor.parse_all().filter(|t| !t.is_empty()) {
                            None => {
                                self.missing("save");
                                FormAction::Select(name)
                            }
                            Some(json) => FormAction::Save(name, self.json(json, json_start)?),
                        }
                    }
                    Some(other) => {
                        self.unknown(mark, other);
                        FormAction::Select(name)
                    }
                }
            }
        };
        FormToken::new(sheet, action)
            .map(HistoryToken::Form)
            .map_err(|e| self.invalid_token(e))
    }

    // ── Plugins ─────────────────────────────────────────────────────────

    fn plugin(&mut self) -> Step<HistoryToken> {
        let start = self.cursor.save();
        let action = match self.cursor.parse_component() {
            None => PluginAction::ListSelect(OffsetAndCount::EMPTY),
            Some("*") => match self.offset_and_count() {
                (oc, true) => PluginAction::ListReload(oc),
                (oc, false) => PluginAction::ListSelect(oc),
            },
            Some(text) => {
                let name: PluginName = text
                    .parse()
                    .map_err(|e| Self::invalid_value(e, self.cursor.span_since(start)))?;
                let mark = self.cursor.save();
                match self.cursor.parse_component() {
                    None => PluginAction::Select(name),
                    Some("delete") => PluginAction::Delete(name),
                    Some("file") => {
                        let path = self
                            .cursor
                            .parse_all()
                            .filter(|p| !p.is_empty())
                            .map(str::to_owned);
                        PluginAction::FileView(name, path)
                    }
                    Some(other) => {
                        self.unknown(mark, other);
                        PluginAction::Select(name)
                    }
                }
            }
        };
        Ok(HistoryToken::plugin(action))
    }

    fn plugin_upload(&mut self) -> Step<HistoryToken> {
        let start = self.cursor.save();
        let action = match self.cursor.parse_component() {
            None => PluginAction::UploadSelect,
            Some("save") => {
                let json_start = self.cursor.save();
                match self.cursor.parse_all().filter(|t| !t.is_empty()) {
                    None => {
                        self.missing("save");
                        PluginAction::UploadSelect
                    }
                    Some(json) => PluginAction::UploadSave(
                        json.parse::<PluginUpload>()
                            .map_err(|e| Self::invalid_value(e, self.cursor.span_since(json_start)))?,
                    ),
                }
            }
            Some(other) => {
                self.unknown(start, other);
                PluginAction::UploadSelect
            }
        };
        Ok(HistoryToken::plugin(action))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheet_history_diagnostics::Severity;

    fn ids(result: &ParseResult) -> Vec<&str> {
        result.diagnostics.iter().map(|d| d.id.as_ref()).collect()
    }

    fn canonical(text: &str) -> String {
        parse_str(text).token.expect("token").to_string()
    }

    #[test]
    fn empty_is_spreadsheet_list() {
        let result = parse_str("");
        assert_eq!(result.token.unwrap().kind(), "spreadsheet-list-select");
        assert!(result.diagnostics.is_empty());
        assert_eq!(canonical("/"), "/");
    }

    #[test]
    fn missing_slash_is_error() {
        let result = parse_str("1/Untitled");
        assert!(result.token.is_none());
        assert_eq!(ids(&result), [codes::MISSING_LEADING_SLASH]);
        assert!(result.has_errors());
    }

    #[test]
    fn unknown_segment_falls_back_to_spreadsheet() {
        let result = parse_str("/1/Untitled/!invalid");
        assert_eq!(result.token.as_ref().unwrap().to_string(), "/1/Untitled");
        assert_eq!(ids(&result), [codes::UNKNOWN_SEGMENT]);
        assert_eq!(result.diagnostics[0].severity, Severity::Warn);
        assert_eq!(result.diagnostics[0].span, Some(Span::new(11, 20)));
    }

    #[test]
    fn missing_selection_falls_back_to_spreadsheet() {
        let result = parse_str("/1/Untitled/cell");
        assert_eq!(result.token.as_ref().unwrap().to_string(), "/1/Untitled");
        assert_eq!(ids(&result), [codes::MISSING_VALUE]);
    }

    #[test]
    fn invalid_selection_is_error() {
        let result = parse_str("/1/Untitled/cell/!!");
        assert!(result.token.is_none());
        assert_eq!(ids(&result), [codes::INVALID_VALUE]);
    }

    #[test]
    fn default_anchor_is_added() {
        assert_eq!(canonical("/1/Untitled/cell/B2:C3"), "/1/Untitled/cell/B2:C3/top-left");
        assert_eq!(canonical("/1/Untitled/column/B:C"), "/1/Untitled/column/B:C/left");
        assert_eq!(canonical("/1/Untitled/row/2:3/bottom"), "/1/Untitled/row/2:3/bottom");
    }

    #[test]
    fn rejected_anchor_is_token_error() {
        let result = parse_str("/1/Untitled/cell/A1/top-left");
        assert!(result.token.is_none());
        assert_eq!(ids(&result), [codes::INVALID_TOKEN]);
    }

    #[test]
    fn formula_save_keeps_slashes() {
        let result = parse_str("/1/Untitled/cell/A1/formula/save/=1/2");
        match result.token.unwrap() {
            HistoryToken::Cell(t) => assert_eq!(t.action(), &CellAction::FormulaSave("=1/2".into())),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn empty_formula_save_is_empty_text() {
        assert_eq!(
            canonical("/1/Untitled/cell/A1/formula/save/"),
            "/1/Untitled/cell/A1/formula/save/"
        );
    }

    #[test]
    fn formatter_kind_and_save() {
        assert_eq!(
            canonical("/1/Untitled/cell/A1/formatter/date-format-pattern"),
            "/1/Untitled/cell/A1/formatter/date-format-pattern"
        );
        let result = parse_str("/1/Untitled/cell/A1/formatter/date-parse-pattern");
        assert_eq!(ids(&result), [codes::INVALID_TOKEN]);
        let result = parse_str("/1/Untitled/cell/A1/formatter/save/dd/mm/yyyy");
        match result.token.unwrap() {
            HistoryToken::Cell(t) => {
                assert_eq!(t.action(), &CellAction::FormatterSave(Some("dd/mm/yyyy".into())))
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn paging_normalises_invalid_values() {
        assert_eq!(canonical("/*/offset/-1/count/5"), "/");
        assert_eq!(canonical("/*/offset/1/offset/2"), "/");
        assert_eq!(canonical("/*/count/5/reload"), "/*/count/5/reload");
    }

    #[test]
    fn trailing_input_is_reported() {
        let result = parse_str("/1/Untitled/cell/A1/formatter/nonsense");
        assert_eq!(result.token.as_ref().unwrap().to_string(), "/1/Untitled/cell/A1/formatter");
        assert_eq!(ids(&result), [codes::TRAILING_INPUT]);
    }

    #[test]
    fn too_long_reads_id_and_name_only() {
        let config = ParseConfig::default().with_max_fragment_len(20);
        let fragment = UrlFragment::from("/1/Untitled/cell/A1/formula/save/=1+2");
        let result = parse_fragment_with(&fragment, &config);
        assert_eq!(result.token.as_ref().unwrap().to_string(), "/1/Untitled");
        assert_eq!(ids(&result), [codes::FRAGMENT_TOO_LONG]);
    }

    #[test]
    fn save_values_reject_outside_cells() {
        let ok = parse_str(r#"/1/Untitled/cell/A1:B2/save/formula/{"A1":"=1"}"#);
        assert!(ok.token.is_some(), "{:?}", ok.diagnostics);
        let outside = parse_str(r#"/1/Untitled/cell/A1:B2/save/formula/{"C3":"=1"}"#);
        assert!(outside.token.is_none());
        assert_eq!(ids(&outside), [codes::INVALID_TOKEN]);
    }

    #[test]
    fn plugin_tokens() {
        assert_eq!(canonical("/plugin"), "/plugin/*");
        assert_eq!(canonical("/plugin/*/reload"), "/plugin/*/reload");
        assert_eq!(canonical("/plugin/Files/file/a/b.txt"), "/plugin/Files/file/a/b.txt");
        assert_eq!(canonical("/plugin-upload"), "/plugin-upload");
    }
}
