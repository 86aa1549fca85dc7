//! Spreadsheet reference value types addressed by history tokens.

pub mod axis;
pub mod cell;
pub mod label;
pub mod selection;
pub mod spreadsheet;

pub use axis::{ColumnRange, ColumnReference, RowRange, RowReference};
pub use cell::{CellRange, CellReference};
pub use label::{ExpressionReference, LabelMapping, LabelName};
pub use selection::{AnchoredSpreadsheetSelection, SpreadsheetSelection, SpreadsheetViewportAnchor};
pub use spreadsheet::{SpreadsheetId, SpreadsheetName};
