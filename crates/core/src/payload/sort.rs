//! Sort comparator lists: `A=text;B=number DOWN,date`.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::HistoryTokenError;
use crate::reference::{ColumnReference, RowReference, SpreadsheetSelection};

/// Direction of one comparator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    /// Ascending; not printed.
    #[default]
    Up,
    /// Descending.
    Down,
}

/// A column or row that comparators are applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ColumnOrRow {
    /// Sort by values in this column.
    Column(ColumnReference),
    /// Sort by values in this row.
    Row(RowReference),
}

impl fmt::Display for ColumnOrRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnOrRow::Column(c) => c.fmt(f),
            ColumnOrRow::Row(r) => r.fmt(f),
        }
    }
}

/// A named comparator and its direction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SortComparator {
    name: String,
    direction: SortDirection,
}

impl SortComparator {
    /// The comparator name, e.g. `text`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Up or down.
    pub fn direction(&self) -> SortDirection {
        self.direction
    }
}

impl FromStr for SortComparator {
    type Err = HistoryTokenError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let (name, direction) = match text.split_once(' ') {
            Some((name, "UP")) => (name, SortDirection::Up),
            Some((name, "DOWN")) => (name, SortDirection::Down),
            Some(_) => {
                return Err(HistoryTokenError::invalid(
                    "sort comparator",
                    format!("{text:?} has an unknown direction"),
                ));
            }
            None => (text, SortDirection::Up),
        };
        let valid = name.starts_with(|c: char| c.is_ascii_lowercase())
            && name.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-');
        if !valid {
            return Err(HistoryTokenError::invalid(
                "sort comparator",
                format!("{name:?} is not a comparator name"),
            ));
        }
        Ok(SortComparator {
            name: name.to_owned(),
            direction,
        })
    }
}

impl fmt::Display for SortComparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if self.direction == SortDirection::Down {
            f.write_str(" DOWN")?;
        }
        Ok(())
    }
}

/// A parsed comparator list. Every entry sorts along the same axis and no
/// column or row repeats.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SortComparators(Vec<(ColumnOrRow, Vec<SortComparator>)>);

impl SortComparators {
    /// The entries in order.
    pub fn entries(&self) -> &[(ColumnOrRow, Vec<SortComparator>)] {
        &self.0
    }

    /// True when the entries name columns.
    pub fn is_columns(&self) -> bool {
        matches!(self.0.first(), Some((ColumnOrRow::Column(_), _)))
    }

    /// Check the comparators make sense for sorting `selection`.
    ///
    /// Cell ranges need every entry inside the range; column selections sort
    /// by rows and row selections by columns. Labels are not checked.
    pub fn check_selection(&self, selection: &SpreadsheetSelection) -> Result<(), HistoryTokenError> {
        let ok = match selection {
            SpreadsheetSelection::Cell(_) | SpreadsheetSelection::CellRange(_) => {
                selection.cell_range().is_some_and(|range| {
                    self.0.iter().all(|(cr, _)| match cr {
                        ColumnOrRow::Column(c) => (range.begin().column()..=range.end().column()).contains(c),
                        ColumnOrRow::Row(r) => (range.begin().row()..=range.end().row()).contains(r),
                    })
                })
            }
            SpreadsheetSelection::Column(_) | SpreadsheetSelection::ColumnRange(_) => !self.is_columns(),
            SpreadsheetSelection::Row(_) | SpreadsheetSelection::RowRange(_) => self.is_columns(),
            SpreadsheetSelection::Label(_) => true,
        };
        if ok {
            Ok(())
        } else {
            Err(HistoryTokenError::Comparators {
                comparators: self.to_string(),
                selection: selection.to_string(),
            })
        }
    }
}

impl FromStr for SortComparators {
    type Err = HistoryTokenError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: String| HistoryTokenError::invalid("sort comparators", reason);
        let mut entries = Vec::new();
        let mut seen = BTreeSet::new();
        for entry in text.split(';') {
            let (target, comparators) = entry
                .split_once('=')
                .ok_or_else(|| invalid(format!("{entry:?} has no '='")))?;
            let target = if target.bytes().all(|b| b.is_ascii_digit()) {
                ColumnOrRow::Row(target.parse()?)
            } else {
                ColumnOrRow::Column(target.parse()?)
            };
            if let Some((first, _)) = entries.first()
                && std::mem::discriminant(first) != std::mem::discriminant(&target)
            {
                return Err(invalid(format!("{text:?} mixes columns and rows")));
            }
            if !seen.insert(target) {
                return Err(invalid(format!("{target} appears more than once")));
            }
            let comparators = comparators
                .split(',')
                .map(str::parse)
                .collect::<Result<Vec<SortComparator>, _>>()?;
            entries.push((target, comparators));
        }
        Ok(SortComparators(entries))
    }
}

impl fmt::Display for SortComparators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (target, comparators)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(";")?;
            }
            write!(f, "{target}=")?;
            for (j, c) in comparators.iter().enumerate() {
                if j > 0 {
                    f.write_str(",")?;
                }
                c.fmt(f)?;
            }
        }
        Ok(())
    }
}
