keyword_enum! {
    /// Which format or parse pattern a formatter/parser editor is showing.
    pub enum PatternKind ("pattern kind") {
        /// Date formatting.
        DateFormat => "date-format-pattern",
        /// Date parsing.
        DateParse => "date-parse-pattern",
        /// Date-time formatting.
        DateTimeFormat => "date-time-format-pattern",
        /// Date-time parsing.
        DateTimeParse => "date-time-parse-pattern",
        /// Number formatting.
        NumberFormat => "number-format-pattern",
        /// Number parsing.
        NumberParse => "number-parse-pattern",
        /// Text formatting.
        TextFormat => "text-format-pattern",
        /// Time formatting.
        TimeFormat => "time-format-pattern",
        /// Time parsing.
        TimeParse => "time-parse-pattern",
    }
}

impl PatternKind {
    /// True for kinds a formatter may show.
    pub fn is_format(&self) -> bool {
        self.as_str().ends_with("-format-pattern")
    }

    /// True for kinds a parser may show.
    pub fn is_parse(&self) -> bool {
        self.as_str().ends_with("-parse-pattern")
    }
}
