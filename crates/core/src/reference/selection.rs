//! Selections, viewport anchors and anchored selections.

use std::fmt;

use crate::error::HistoryTokenError;

use super::axis::{ColumnRange, ColumnReference, RowRange, RowReference};
use super::cell::{CellRange, CellReference};
use super::label::{ExpressionReference, LabelName};

/// Any region the user can select.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SpreadsheetSelection {
    /// A single cell.
    Cell(CellReference),
    /// A block of cells.
    CellRange(CellRange),
    /// A whole column.
    Column(ColumnReference),
    /// A block of columns.
    ColumnRange(ColumnRange),
    /// A whole row.
    Row(RowReference),
    /// A block of rows.
    RowRange(RowRange),
    /// A label standing for a cell or range.
    Label(LabelName),
}

impl SpreadsheetSelection {
    /// Parse a cell, cell range or label.
    pub fn parse_cell(text: &str) -> Result<Self, HistoryTokenError> {
        Ok(text.parse::<ExpressionReference>()?.into())
    }

    /// Parse a column or column range.
    pub fn parse_column(text: &str) -> Result<Self, HistoryTokenError> {
        if text.contains(':') {
            text.parse().map(SpreadsheetSelection::ColumnRange)
        } else {
            text.parse().map(SpreadsheetSelection::Column)
        }
    }

    /// Parse a row or row range.
    pub fn parse_row(text: &str) -> Result<Self, HistoryTokenError> {
        if text.contains(':') {
            text.parse().map(SpreadsheetSelection::RowRange)
        } else {
            text.parse().map(SpreadsheetSelection::Row)
        }
    }

    /// Stable kebab-case name of the selection kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            SpreadsheetSelection::Cell(_) => "cell",
            SpreadsheetSelection::CellRange(_) => "cell-range",
            SpreadsheetSelection::Column(_) => "column",
            SpreadsheetSelection::ColumnRange(_) => "column-range",
            SpreadsheetSelection::Row(_) => "row",
            SpreadsheetSelection::RowRange(_) => "row-range",
            SpreadsheetSelection::Label(_) => "label",
        }
    }

    /// Cell, cell range or label.
    pub fn is_cell_like(&self) -> bool {
        matches!(
            self,
            SpreadsheetSelection::Cell(_)
                | SpreadsheetSelection::CellRange(_)
                | SpreadsheetSelection::Label(_)
        )
    }

    /// Column or column range.
    pub fn is_column_like(&self) -> bool {
        matches!(
            self,
            SpreadsheetSelection::Column(_) | SpreadsheetSelection::ColumnRange(_)
        )
    }

    /// Row or row range.
    pub fn is_row_like(&self) -> bool {
        matches!(self, SpreadsheetSelection::Row(_) | SpreadsheetSelection::RowRange(_))
    }

    /// The cells covered, when known without resolving a label.
    pub fn cell_range(&self) -> Option<CellRange> {
        match self {
            SpreadsheetSelection::Cell(c) => Some(CellRange::from(*c)),
            SpreadsheetSelection::CellRange(r) => Some(*r),
            _ => None,
        }
    }

    /// The columns covered by a column selection.
    pub fn column_range(&self) -> Option<ColumnRange> {
        match self {
            SpreadsheetSelection::Column(c) => Some(ColumnRange::new(*c, *c)),
            SpreadsheetSelection::ColumnRange(r) => Some(*r),
            _ => None,
        }
    }

    /// The rows covered by a row selection.
    pub fn row_range(&self) -> Option<RowRange> {
        match self {
            SpreadsheetSelection::Row(r) => Some(RowRange::new(*r, *r)),
            SpreadsheetSelection::RowRange(r) => Some(*r),
            _ => None,
        }
    }

    /// True when freezing would pin the selection: it must start at `A`, `1` or `A1`.
    pub fn is_freezable(&self) -> bool {
        match self {
            SpreadsheetSelection::Cell(_) | SpreadsheetSelection::CellRange(_) => self
                .cell_range()
                .is_some_and(|r| r.begin() == CellReference::HOME),
            SpreadsheetSelection::Column(_) | SpreadsheetSelection::ColumnRange(_) => self
                .column_range()
                .is_some_and(|r| r.begin() == ColumnReference::FIRST),
            SpreadsheetSelection::Row(_) | SpreadsheetSelection::RowRange(_) => self
                .row_range()
                .is_some_and(|r| r.begin() == RowReference::FIRST),
            SpreadsheetSelection::Label(_) => false,
        }
    }

    /// The anchor used when none is given.
    pub fn default_anchor(&self) -> SpreadsheetViewportAnchor {
        match self {
            SpreadsheetSelection::CellRange(_) => SpreadsheetViewportAnchor::TopLeft,
            SpreadsheetSelection::ColumnRange(_) => SpreadsheetViewportAnchor::Left,
            SpreadsheetSelection::RowRange(_) => SpreadsheetViewportAnchor::Top,
            _ => SpreadsheetViewportAnchor::None,
        }
    }

    /// True when `anchor` may be paired with this selection.
    pub fn accepts_anchor(&self, anchor: SpreadsheetViewportAnchor) -> bool {
        use SpreadsheetViewportAnchor as A;
        match self {
            SpreadsheetSelection::Cell(_)
            | SpreadsheetSelection::Column(_)
            | SpreadsheetSelection::Row(_) => anchor == A::None,
            SpreadsheetSelection::CellRange(_) => anchor.is_corner(),
            SpreadsheetSelection::Label(_) => anchor == A::None || anchor.is_corner(),
            SpreadsheetSelection::ColumnRange(_) => matches!(anchor, A::Left | A::Right),
            SpreadsheetSelection::RowRange(_) => matches!(anchor, A::Top | A::Bottom),
        }
    }

    /// Pair with the default anchor.
    pub fn set_default_anchor(self) -> AnchoredSpreadsheetSelection {
        let anchor = self.default_anchor();
        AnchoredSpreadsheetSelection {
            selection: self,
            anchor,
        }
    }
}

impl From<ExpressionReference> for SpreadsheetSelection {
    fn from(reference: ExpressionReference) -> Self {
        match reference {
            ExpressionReference::Cell(c) => SpreadsheetSelection::Cell(c),
            ExpressionReference::CellRange(r) => SpreadsheetSelection::CellRange(r),
            ExpressionReference::Label(l) => SpreadsheetSelection::Label(l),
        }
    }
}

impl fmt::Display for SpreadsheetSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpreadsheetSelection::Cell(c) => c.fmt(f),
            SpreadsheetSelection::CellRange(r) => r.fmt(f),
            SpreadsheetSelection::Column(c) => c.fmt(f),
            SpreadsheetSelection::ColumnRange(r) => r.fmt(f),
            SpreadsheetSelection::Row(r) => r.fmt(f),
            SpreadsheetSelection::RowRange(r) => r.fmt(f),
            SpreadsheetSelection::Label(l) => l.fmt(f),
        }
    }
}

keyword_enum! {
    /// The corner or edge a range grows from when extended.
    pub enum SpreadsheetViewportAnchor ("anchor") {
        /// No anchor; single cells, columns and rows.
        None => "none",
        /// Top-left corner.
        TopLeft => "top-left",
        /// Top-right corner.
        TopRight => "top-right",
        /// Bottom-left corner.
        BottomLeft => "bottom-left",
        /// Bottom-right corner.
        BottomRight => "bottom-right",
        /// Left edge of a column range.
        Left => "left",
        /// Right edge of a column range.
        Right => "right",
        /// Top edge of a row range.
        Top => "top",
        /// Bottom edge of a row range.
        Bottom => "bottom",
    }
}

impl SpreadsheetViewportAnchor {
    /// One of the four corners.
    pub fn is_corner(&self) -> bool {
        matches!(
            self,
            SpreadsheetViewportAnchor::TopLeft
                | SpreadsheetViewportAnchor::TopRight
                | SpreadsheetViewportAnchor::BottomLeft
                | SpreadsheetViewportAnchor::BottomRight
        )
    }

    /// Parse an anchor keyword as it may follow a selection. `none` is never written.
    pub(crate) fn parse_suffix(text: &str) -> Option<Self> {
        text.parse()
            .ok()
            .filter(|a| *a != SpreadsheetViewportAnchor::None)
    }
}

/// A selection paired with a valid anchor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AnchoredSpreadsheetSelection {
    selection: SpreadsheetSelection,
    anchor: SpreadsheetViewportAnchor,
}

impl AnchoredSpreadsheetSelection {
    /// Pair `selection` with `anchor`, rejecting anchors that do not fit.
    pub fn new(
        selection: SpreadsheetSelection,
        anchor: SpreadsheetViewportAnchor,
    ) -> Result<Self, HistoryTokenError> {
        if !selection.accepts_anchor(anchor) {
            return Err(HistoryTokenError::Anchor {
                anchor: anchor.to_string(),
                selection: selection.to_string(),
            });
        }
        Ok(Self { selection, anchor })
    }

    /// The selected region.
    pub fn selection(&self) -> &SpreadsheetSelection {
        &self.selection
    }

    /// The anchor.
    pub fn anchor(&self) -> SpreadsheetViewportAnchor {
        self.anchor
    }

    /// Same selection, different anchor.
    pub fn with_anchor(&self, anchor: SpreadsheetViewportAnchor) -> Result<Self, HistoryTokenError> {
        Self::new(self.selection.clone(), anchor)
    }

    /// Fragment segments: the selection, then the anchor unless it is `None`.
    pub(crate) fn segments(&self) -> impl Iterator<Item = String> + '_ {
        std::iter::once(self.selection.to_string()).chain(
            (self.anchor != SpreadsheetViewportAnchor::None).then(|| self.anchor.to_string()),
        )
    }
}

impl fmt::Display for AnchoredSpreadsheetSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.anchor == SpreadsheetViewportAnchor::None {
            self.selection.fmt(f)
        } else {
            write!(f, "{} {}", self.selection, self.anchor)
        }
    }
}
