//! Viewport navigation lists: `right column,down row,select cell B2`.

use std::fmt;
use std::str::FromStr;

use crate::error::HistoryTokenError;
use crate::reference::{CellReference, ColumnReference, RowReference, SpreadsheetSelection};

/// Which way a navigation moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavigationDirection {
    /// Towards column `A`.
    Left,
    /// Away from column `A`.
    Right,
    /// Towards row `1`.
    Up,
    /// Away from row `1`.
    Down,
}

impl NavigationDirection {
    fn as_str(self) -> &'static str {
        match self {
            NavigationDirection::Left => "left",
            NavigationDirection::Right => "right",
            NavigationDirection::Up => "up",
            NavigationDirection::Down => "down",
        }
    }

    /// `column` for horizontal moves, `row` for vertical.
    fn unit(self) -> &'static str {
        match self {
            NavigationDirection::Left | NavigationDirection::Right => "column",
            NavigationDirection::Up | NavigationDirection::Down => "row",
        }
    }

    fn parse(text: &str) -> Option<Self> {
        Some(match text {
            "left" => NavigationDirection::Left,
            "right" => NavigationDirection::Right,
            "up" => NavigationDirection::Up,
            "down" => NavigationDirection::Down,
            _ => return None,
        })
    }
}

/// One step of viewport navigation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ViewportNavigation {
    /// Move one column or row, optionally extending the selection.
    Move {
        /// Which way.
        direction: NavigationDirection,
        /// Extend instead of moving.
        extend: bool,
    },
    /// Scroll by a number of pixels.
    Pixel {
        /// Which way.
        direction: NavigationDirection,
        /// How far.
        pixels: u32,
    },
    /// Select a cell, column or row.
    Select(SpreadsheetSelection),
    /// Extend the selection to a cell.
    ExtendCell(CellReference),
    /// Extend the selection to a column.
    ExtendColumn(ColumnReference),
    /// Extend the selection to a row.
    ExtendRow(RowReference),
}

impl FromStr for ViewportNavigation {
    type Err = HistoryTokenError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let invalid = || HistoryTokenError::invalid("navigation", format!("{text:?} is not a navigation"));
        let words: Vec<&str> = text.split(' ').collect();
        match words.as_slice() {
            [verb, unit] if verb.starts_with("extend-") && !verb.ends_with("-cell") => {
                match (*verb, *unit) {
                    ("extend-column", reference) => reference.parse().map(ViewportNavigation::ExtendColumn),
                    ("extend-row", reference) => reference.parse().map(ViewportNavigation::ExtendRow),
                    (verb, unit) => {
                        let direction = NavigationDirection::parse(&verb["extend-".len()..])
                            .filter(|d| d.unit() == unit)
                            .ok_or_else(invalid)?;
                        Ok(ViewportNavigation::Move {
                            direction,
                            extend: true,
                        })
                    }
                }
            }
            ["extend-cell", cell] => cell.parse().map(ViewportNavigation::ExtendCell),
            ["select", "cell", reference] => reference
                .parse::<CellReference>()
                .map(|c| ViewportNavigation::Select(SpreadsheetSelection::Cell(c))),
            ["select", "column", reference] => reference
                .parse()
                .map(|c| ViewportNavigation::Select(SpreadsheetSelection::Column(c))),
            ["select", "row", reference] => reference
                .parse()
                .map(|r| ViewportNavigation::Select(SpreadsheetSelection::Row(r))),
            [direction, "pixel", pixels] => {
                let direction = NavigationDirection::parse(direction).ok_or_else(invalid)?;
                let pixels = pixels.parse().map_err(|_| invalid())?;
                Ok(ViewportNavigation::Pixel { direction, pixels })
            }
            [direction, unit] => {
                let direction = NavigationDirection::parse(direction)
                    .filter(|d| d.unit() == *unit)
                    .ok_or_else(invalid)?;
                Ok(ViewportNavigation::Move {
                    direction,
                    extend: false,
                })
            }
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for ViewportNavigation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewportNavigation::Move { direction, extend } => {
                if *extend {
                    f.write_str("extend-")?;
                }
                write!(f, "{} {}", direction.as_str(), direction.unit())
            }
            ViewportNavigation::Pixel { direction, pixels } => {
                write!(f, "{} pixel {pixels}", direction.as_str())
            }
            ViewportNavigation::Select(selection) => {
                write!(f, "select {} {selection}", selection.kind_name())
            }
            ViewportNavigation::ExtendCell(c) => write!(f, "extend-cell {c}"),
            ViewportNavigation::ExtendColumn(c) => write!(f, "extend-column {c}"),
            ViewportNavigation::ExtendRow(r) => write!(f, "extend-row {r}"),
        }
    }
}

/// An ordered, possibly empty, list of navigations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ViewportNavigationList(Vec<ViewportNavigation>);

impl ViewportNavigationList {
    /// The empty list.
    pub const EMPTY: ViewportNavigationList = ViewportNavigationList(Vec::new());

    /// Wrap navigations.
    pub fn new(navigations: Vec<ViewportNavigation>) -> Self {
        Self(navigations)
    }

    /// The navigations.
    pub fn navigations(&self) -> &[ViewportNavigation] {
        &self.0
    }

    /// True when there is nothing to do.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromStr for ViewportNavigationList {
    type Err = HistoryTokenError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        if text.is_empty() {
            return Ok(Self::EMPTY);
        }
        text.split(',')
            .map(str::parse)
            .collect::<Result<Vec<_>, _>>()
            .map(ViewportNavigationList)
    }
}

impl fmt::Display for ViewportNavigationList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, n) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            n.fmt(f)?;
        }
        Ok(())
    }
}
