//! Cell find queries.

use std::fmt;

use serde::Serialize;

use crate::cursor::TextCursor;
use crate::error::HistoryTokenError;

use super::value::ValueTypeName;

keyword_enum! {
    /// The order cells of a range are visited in.
    pub enum CellRangeReferencePath ("range path") {
        /// Left to right, top down.
        Lrtd => "lrtd",
        /// Right to left, top down.
        Rltd => "rltd",
        /// Left to right, bottom up.
        Lrbu => "lrbu",
        /// Right to left, bottom up.
        Rlbu => "rlbu",
        /// Top down, left to right.
        Tdlr => "tdlr",
        /// Top down, right to left.
        Tdrl => "tdrl",
        /// Bottom up, left to right.
        Bulr => "bulr",
        /// Bottom up, right to left.
        Burl => "burl",
    }
}

/// Everything a find dialog may constrain. Every part is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct CellFindQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<CellRangeReferencePath>,
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    value_type: Option<ValueTypeName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    query: Option<String>,
}

impl CellFindQuery {
    /// A query that matches every cell.
    pub const EMPTY: CellFindQuery = CellFindQuery {
        path: None,
        offset: None,
        count: None,
        value_type: None,
        query: None,
    };

    /// The visiting order.
    pub fn path(&self) -> Option<CellRangeReferencePath> {
        self.path
    }

    /// Number of matches to skip.
    pub fn offset(&self) -> Option<u32> {
        self.offset
    }

    /// Maximum matches.
    pub fn count(&self) -> Option<u32> {
        self.count
    }

    /// Only match values of this type.
    pub fn value_type(&self) -> Option<ValueTypeName> {
        self.value_type
    }

    /// The query expression.
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Replace the path.
    #[must_use]
    pub fn set_path(self, path: Option<CellRangeReferencePath>) -> Self {
        Self { path, ..self }
    }

    /// Replace the offset.
    #[must_use]
    pub fn set_offset(self, offset: Option<u32>) -> Self {
        Self { offset, ..self }
    }

    /// Replace the count.
    #[must_use]
    pub fn set_count(self, count: Option<u32>) -> Self {
        Self { count, ..self }
    }

    /// Replace the value type.
    #[must_use]
    pub fn set_value_type(self, value_type: Option<ValueTypeName>) -> Self {
        Self { value_type, ..self }
    }

    /// Replace the query; an empty query clears it.
    #[must_use]
    pub fn set_query(self, query: Option<String>) -> Self {
        Self {
            query: query.filter(|q| !q.is_empty()),
            ..self
        }
    }

    /// Read the optional parts in their fixed order. Stops at the first
    /// segment that is not one of them, leaving it unconsumed.
    pub(crate) fn parse(cursor: &mut TextCursor<'_>) -> Result<Self, HistoryTokenError> {
        fn number(what: &'static str, text: Option<&str>) -> Result<u32, HistoryTokenError> {
            let text = text.unwrap_or_default();
            text.parse()
                .map_err(|_| HistoryTokenError::invalid(what, format!("{text:?} is not a count")))
        }

        let mut query = CellFindQuery::EMPTY;
        let mut stage = 0;
        loop {
            let save = cursor.save();
            let Some(keyword) = cursor.parse_component() else {
                break;
            };
            match (keyword, stage) {
                ("path", 0) => {
                    let text = cursor.parse_component().unwrap_or_default();
                    query.path = Some(text.parse()?);
                    stage = 1;
                }
                ("offset", 0..=1) => {
                    query.offset = Some(number("find offset", cursor.parse_component())?);
                    stage = 2;
                }
                ("count", 0..=2) => {
                    query.count = Some(number("find count", cursor.parse_component())?);
                    stage = 3;
                }
                ("value-type", 0..=3) => {
                    let text = cursor.parse_component().unwrap_or_default();
                    query.value_type = Some(text.parse()?);
                    stage = 4;
                }
                ("query", _) => {
                    query.query = cursor.parse_all().filter(|q| !q.is_empty()).map(str::to_owned);
                    break;
                }
                _ => {
                    cursor.restore(save);
                    break;
                }
            }
        }
        Ok(query)
    }
}

/// Prints the fragment suffix, e.g. `/path/lrtd/count/10/query/=A1>0`.
impl fmt::Display for CellFindQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(path) = self.path {
            write!(f, "/path/{path}")?;
        }
        if let Some(offset) = self.offset {
            write!(f, "/offset/{offset}")?;
        }
        if let Some(count) = self.count {
            write!(f, "/count/{count}")?;
        }
        if let Some(value_type) = self.value_type {
            write!(f, "/value-type/{value_type}")?;
        }
        if let Some(query) = &self.query {
            write!(f, "/query/{query}")?;
        }
        Ok(())
    }
}
