//! Spreadsheet metadata property names and their value rules.

use crate::error::HistoryTokenError;
use crate::reference::SpreadsheetSelection;

use super::value::Locale;

keyword_enum! {
    /// A named spreadsheet metadata property.
    pub enum MetadataPropertyName ("metadata property") {
        /// Width of one character in pixels.
        CellCharacterWidth => "cell-character-width",
        /// Who created the spreadsheet.
        Creator => "creator",
        /// When the spreadsheet was created.
        CreateDateTime => "create-date-time",
        /// Symbol printed for the currency.
        CurrencySymbol => "currency-symbol",
        /// Default date format pattern.
        DateFormatPattern => "date-format-pattern",
        /// Default date parse pattern.
        DateParsePattern => "date-parse-pattern",
        /// Decimal separator character.
        DecimalSeparator => "decimal-separator",
        /// Year assumed when a date omits it.
        DefaultYear => "default-year",
        /// Exponent symbol.
        ExponentSymbol => "exponent-symbol",
        /// Frozen leading columns.
        FrozenColumns => "frozen-columns",
        /// Frozen leading rows.
        FrozenRows => "frozen-rows",
        /// Digit grouping separator character.
        GroupingSeparator => "grouping-separator",
        /// Default locale.
        Locale => "locale",
        /// Who last modified the spreadsheet.
        ModifiedBy => "modified-by",
        /// When the spreadsheet was last modified.
        ModifiedDateTime => "modified-date-time",
        /// Negative sign character.
        NegativeSign => "negative-sign",
        /// Number format pattern.
        NumberFormatPattern => "number-format-pattern",
        /// Percent symbol character.
        PercentageSymbol => "percentage-symbol",
        /// Positive sign character.
        PositiveSign => "positive-sign",
        /// Decimal precision.
        Precision => "precision",
        /// Rounding mode.
        RoundingMode => "rounding-mode",
        /// The spreadsheet id.
        SpreadsheetId => "spreadsheet-id",
        /// The spreadsheet name.
        SpreadsheetName => "spreadsheet-name",
        /// Text format pattern.
        TextFormatPattern => "text-format-pattern",
        /// Two digit year pivot.
        TwoDigitYear => "two-digit-year",
        /// Function argument separator character.
        ValueSeparator => "value-separator",
    }
}

const ROUNDING_MODES: &[&str] = &[
    "CEILING",
    "DOWN",
    "FLOOR",
    "HALF_DOWN",
    "HALF_EVEN",
    "HALF_UP",
    "UNNECESSARY",
    "UP",
];

impl MetadataPropertyName {
    /// Properties maintained by the server; they may be viewed but not saved.
    pub fn is_read_only(&self) -> bool {
        matches!(
            self,
            MetadataPropertyName::SpreadsheetId
                | MetadataPropertyName::Creator
                | MetadataPropertyName::CreateDateTime
                | MetadataPropertyName::ModifiedBy
                | MetadataPropertyName::ModifiedDateTime
        )
    }

    /// Check a value about to be saved. `None` removes the property.
    pub fn check_value(&self, value: Option<&str>) -> Result<(), HistoryTokenError> {
        if self.is_read_only() {
            return Err(HistoryTokenError::ReadOnly(self.to_string()));
        }
        let Some(value) = value else {
            return Ok(());
        };
        let invalid = |reason: &str| {
            HistoryTokenError::invalid("metadata value", format!("{self} {value:?} {reason}"))
        };
        match self {
            MetadataPropertyName::CellCharacterWidth => match value.parse::<u32>() {
                Ok(n) if n > 0 => Ok(()),
                _ => Err(invalid("must be a positive integer")),
            },
            MetadataPropertyName::DefaultYear | MetadataPropertyName::Precision => value
                .parse::<u32>()
                .map(drop)
                .map_err(|_| invalid("must be a non-negative integer")),
            MetadataPropertyName::TwoDigitYear => match value.parse::<u32>() {
                Ok(n) if n <= 99 => Ok(()),
                _ => Err(invalid("must be between 0 and 99")),
            },
            MetadataPropertyName::DecimalSeparator
            | MetadataPropertyName::GroupingSeparator
            | MetadataPropertyName::NegativeSign
            | MetadataPropertyName::PercentageSymbol
            | MetadataPropertyName::PositiveSign
            | MetadataPropertyName::ValueSeparator => {
                if value.chars().count() == 1 {
                    Ok(())
                } else {
                    Err(invalid("must be a single character"))
                }
            }
            MetadataPropertyName::FrozenColumns => match SpreadsheetSelection::parse_column(value) {
                Ok(s) if s.is_freezable() => Ok(()),
                _ => Err(invalid("must be columns starting at A")),
            },
            MetadataPropertyName::FrozenRows => match SpreadsheetSelection::parse_row(value) {
                Ok(s) if s.is_freezable() => Ok(()),
                _ => Err(invalid("must be rows starting at 1")),
            },
            MetadataPropertyName::Locale => value.parse::<Locale>().map(drop),
            MetadataPropertyName::RoundingMode => {
                if ROUNDING_MODES.contains(&value) {
                    Ok(())
                } else {
                    Err(invalid("is not a rounding mode"))
                }
            }
            _ if value.is_empty() => Err(invalid("must not be empty")),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_only_properties_reject_saves() {
        for p in MetadataPropertyName::ALL.iter().filter(|p| p.is_read_only()) {
            assert_eq!(
                p.check_value(None),
                Err(HistoryTokenError::ReadOnly(p.to_string()))
            );
        }
        assert_eq!(
            MetadataPropertyName::ALL.iter().filter(|p| p.is_read_only()).count(),
            5
        );
    }

    #[test]
    fn value_rules() {
        use MetadataPropertyName as M;
        assert!(M::FrozenColumns.check_value(Some("A:B")).is_ok());
        assert!(M::FrozenColumns.check_value(Some("B:C")).is_err());
        assert!(M::FrozenRows.check_value(Some("1")).is_ok());
        assert!(M::TwoDigitYear.check_value(Some("100")).is_err());
        assert!(M::DecimalSeparator.check_value(Some(",")).is_ok());
        assert!(M::DecimalSeparator.check_value(Some(",,")).is_err());
        assert!(M::Locale.check_value(Some("en-AU")).is_ok());
        assert!(M::RoundingMode.check_value(Some("HALF_UP")).is_ok());
        assert!(M::CellCharacterWidth.check_value(Some("0")).is_err());
        assert!(M::SpreadsheetName.check_value(Some("Budget")).is_ok());
        assert!(M::SpreadsheetName.check_value(None).is_ok());
    }
}
