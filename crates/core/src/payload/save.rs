//! Multi-cell save payloads: `save/<entity>/<json>`.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::error::HistoryTokenError;
use crate::reference::{CellReference, SpreadsheetSelection};

use super::value::{Currency, Locale, ValueTypeName};

keyword_enum! {
    /// What each value of a save payload holds.
    pub enum SaveEntity ("save entity") {
        /// Whole cell snapshots (objects).
        Cell => "cell",
        /// Formula text.
        Formula => "formula",
        /// Formatter pattern text, or null.
        Formatter => "formatter",
        /// Parser pattern text, or null.
        Parser => "parser",
        /// Style objects.
        Style => "style",
        /// Values of any JSON shape.
        Value => "value",
        /// Validator selector text, or null.
        Validator => "validator",
        /// Locale tags, or null.
        Locale => "locale",
        /// Currency codes, or null.
        Currency => "currency",
        /// Date-time symbol objects, or null.
        DateTimeSymbols => "dateTimeSymbols",
        /// Decimal number symbol objects, or null.
        DecimalNumberSymbols => "decimalNumberSymbols",
        /// Value type names, or null.
        ValueType => "valueType",
    }
}

impl SaveEntity {
    fn check(&self, value: &Value) -> Result<(), HistoryTokenError> {
        let invalid = |expected: &str| {
            HistoryTokenError::invalid("save value", format!("{self} expects {expected}, got {value}"))
        };
        let text_or_null = |parse: fn(&str) -> bool, expected: &str| match value {
            Value::Null => Ok(()),
            Value::String(s) if parse(s) => Ok(()),
            _ => Err(invalid(expected)),
        };
        match self {
            SaveEntity::Cell | SaveEntity::Style => {
                if value.is_object() {
                    Ok(())
                } else {
                    Err(invalid("an object"))
                }
            }
            SaveEntity::Formula => {
                if value.is_string() {
                    Ok(())
                } else {
                    Err(invalid("formula text"))
                }
            }
            SaveEntity::Value => Ok(()),
            SaveEntity::Formatter | SaveEntity::Parser | SaveEntity::Validator => {
                text_or_null(|s| !s.is_empty(), "text or null")
            }
            SaveEntity::Locale => text_or_null(|s| s.parse::<Locale>().is_ok(), "a locale or null"),
            SaveEntity::Currency => {
                text_or_null(|s| s.parse::<Currency>().is_ok(), "a currency or null")
            }
            SaveEntity::ValueType => {
                text_or_null(|s| s.parse::<ValueTypeName>().is_ok(), "a value type or null")
            }
            SaveEntity::DateTimeSymbols | SaveEntity::DecimalNumberSymbols => match value {
                Value::Null | Value::Object(_) => Ok(()),
                _ => Err(invalid("an object or null")),
            },
        }
    }
}

/// Per-cell values being saved, ordered by column then row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellSaveValues {
    entity: SaveEntity,
    values: BTreeMap<CellReference, Value>,
}

impl CellSaveValues {
    /// Validate every value's shape against `entity`.
    pub fn new(
        entity: SaveEntity,
        values: BTreeMap<CellReference, Value>,
    ) -> Result<Self, HistoryTokenError> {
        for value in values.values() {
            entity.check(value)?;
        }
        Ok(Self { entity, values })
    }

    /// Parse a JSON object keyed by cell reference.
    pub fn parse(entity: SaveEntity, json: &str) -> Result<Self, HistoryTokenError> {
        let object: serde_json::Map<String, Value> = serde_json::from_str(json)
            .map_err(|e| HistoryTokenError::invalid("save values", e.to_string()))?;
        let mut values = BTreeMap::new();
        for (key, value) in object {
            let cell: CellReference = key.parse()?;
            if values.insert(cell, value).is_some() {
                return Err(HistoryTokenError::invalid(
                    "save values",
                    format!("{cell} appears more than once"),
                ));
            }
        }
        Self::new(entity, values)
    }

    /// What the values are.
    pub fn entity(&self) -> SaveEntity {
        self.entity
    }

    /// The values keyed by cell.
    pub fn values(&self) -> &BTreeMap<CellReference, Value> {
        &self.values
    }

    /// Reject payloads that address cells outside `selection`. Labels are not checked.
    pub fn check_selection(&self, selection: &SpreadsheetSelection) -> Result<(), HistoryTokenError> {
        let Some(range) = selection.cell_range() else {
            return Ok(());
        };
        match self.values.keys().find(|cell| !range.contains(cell)) {
            Some(cell) => Err(HistoryTokenError::OutsideSelection {
                cell: cell.to_string(),
                selection: selection.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Compact JSON with keys in cell order.
    pub fn to_json(&self) -> String {
        // String keys and JSON values always serialise.
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// A JSON object keyed by cell reference, in cell order rather than text
/// order, so `A2` precedes `A10`.
impl Serialize for CellSaveValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.values.iter().map(|(cell, value)| (cell.to_string(), value)))
    }
}
