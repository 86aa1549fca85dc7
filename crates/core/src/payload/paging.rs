//! Pagination windows for list tokens.

use std::fmt;

use serde::Serialize;

use crate::error::HistoryTokenError;

/// An optional offset and optional count, both non-negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct OffsetAndCount {
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    count: Option<u32>,
}

impl OffsetAndCount {
    /// No offset and no count.
    pub const EMPTY: OffsetAndCount = OffsetAndCount {
        offset: None,
        count: None,
    };

    /// Build a window, rejecting negative or oversized values.
    pub fn with(offset: Option<i64>, count: Option<i64>) -> Result<Self, HistoryTokenError> {
        let check = |what: &'static str, value: Option<i64>| {
            value
                .map(|v| u32::try_from(v).map_err(|_| HistoryTokenError::out_of_range(what, v)))
                .transpose()
        };
        Ok(OffsetAndCount {
            offset: check("offset", offset)?,
            count: check("count", count)?,
        })
    }

    /// The offset, if any.
    pub fn offset(&self) -> Option<u32> {
        self.offset
    }

    /// The count, if any.
    pub fn count(&self) -> Option<u32> {
        self.count
    }

    /// True when neither value is present.
    pub fn is_empty(&self) -> bool {
        *self == Self::EMPTY
    }

    /// Same offset, different count.
    #[must_use]
    pub fn set_count(self, count: Option<u32>) -> Self {
        Self { count, ..self }
    }

    /// Same count, different offset.
    #[must_use]
    pub fn set_offset(self, offset: Option<u32>) -> Self {
        Self { offset, ..self }
    }
}

/// Prints as fragment segments, `/offset/<n>/count/<n>`, or nothing when empty.
impl fmt::Display for OffsetAndCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(offset) = self.offset {
            write!(f, "/offset/{offset}")?;
        }
        if let Some(count) = self.count {
            write!(f, "/count/{count}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_absent_is_empty() {
        assert_eq!(OffsetAndCount::with(None, None).unwrap(), OffsetAndCount::EMPTY);
        assert!(OffsetAndCount::EMPTY.is_empty());
        assert_eq!(OffsetAndCount::EMPTY.to_string(), "");
    }

    #[test]
    fn negative_rejected() {
        assert!(OffsetAndCount::with(Some(-1), None).is_err());
        assert!(OffsetAndCount::with(None, Some(-5)).is_err());
        assert!(OffsetAndCount::with(Some(i64::MAX), None).is_err());
    }

    #[test]
    fn prints_offset_before_count() {
        let oc = OffsetAndCount::with(Some(1), Some(2)).unwrap();
        assert_eq!(oc.to_string(), "/offset/1/count/2");
        assert_eq!(oc.set_offset(None).to_string(), "/count/2");
        assert_eq!(oc.set_count(None).to_string(), "/offset/1");
    }
}
