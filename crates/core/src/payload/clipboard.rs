keyword_enum! {
    /// What part of a cell a copy, cut or paste transfers.
    pub enum ClipboardValueKind ("clipboard kind") {
        /// The whole cell.
        Cell => "cell",
        /// The formula text.
        Formula => "formula",
        /// The formatter.
        Formatter => "formatter",
        /// The parser.
        Parser => "parser",
        /// The style.
        Style => "style",
        /// The evaluated value.
        Value => "value",
        /// The formatted value.
        FormattedValue => "formatted-value",
        /// The validator.
        Validator => "validator",
        /// The locale.
        Locale => "locale",
        /// The currency.
        Currency => "currency",
        /// Date-time symbols.
        DateTimeSymbols => "date-time-symbols",
        /// Decimal number symbols.
        DecimalNumberSymbols => "decimal-number-symbols",
        /// The value type.
        ValueType => "value-type",
    }
}

impl ClipboardValueKind {
    /// The member of a cell snapshot this kind reads, or `None` for the whole cell.
    pub fn cell_property(&self) -> Option<&'static str> {
        match self {
            ClipboardValueKind::Cell => None,
            ClipboardValueKind::Formula => Some("formula"),
            ClipboardValueKind::Formatter => Some("formatter"),
            ClipboardValueKind::Parser => Some("parser"),
            ClipboardValueKind::Style => Some("style"),
            ClipboardValueKind::Value => Some("value"),
            ClipboardValueKind::FormattedValue => Some("formattedValue"),
            ClipboardValueKind::Validator => Some("validator"),
            ClipboardValueKind::Locale => Some("locale"),
            ClipboardValueKind::Currency => Some("currency"),
            ClipboardValueKind::DateTimeSymbols => Some("dateTimeSymbols"),
            ClipboardValueKind::DecimalNumberSymbols => Some("decimalNumberSymbols"),
            ClipboardValueKind::ValueType => Some("valueType"),
        }
    }
}
