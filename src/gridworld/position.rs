//! Cell coordinates and the four movement actions

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A cell on the grid, addressed as (column, row) with (0, 0) in the top-left corner.
///
/// Positions are plain values: two positions are the same state exactly when both
/// coordinates match.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Position {
    pub column: usize,
    pub row: usize,
}

impl Position {
    /// The start cell shared by every grid.
    pub const ORIGIN: Position = Position { column: 0, row: 0 };

    pub const fn new(column: usize, row: usize) -> Self {
        Self { column, row }
    }

    /// Whether the position lies on an `size`×`size` grid.
    pub fn within(self, size: usize) -> bool {
        self.column < size && self.row < size
    }

    /// Move one cell in `action`'s direction, clamped to an `size`×`size` grid.
    ///
    /// Coordinates already off the grid are clamped as well, so the result is always
    /// on the grid.
    pub fn step(self, action: Action, size: usize) -> Position {
        let last = size.saturating_sub(1);
        let column = self.column.min(last);
        let row = self.row.min(last);
        match action {
            Action::Up => Position::new(column, row.saturating_sub(1)),
            Action::Down => Position::new(column, (row + 1).min(last)),
            Action::Left => Position::new(column.saturating_sub(1), row),
            Action::Right => Position::new((column + 1).min(last), row),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// One of the four moves available to the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
}

impl Action {
    /// Canonical action order. Legal-action lists and table rows follow it.
    pub const ALL: [Action; 4] = [Action::Up, Action::Down, Action::Left, Action::Right];

    /// Number of actions per state.
    pub const COUNT: usize = 4;

    /// Position of the action in [`Action::ALL`].
    pub const fn index(self) -> usize {
        match self {
            Action::Up => 0,
            Action::Down => 1,
            Action::Left => 2,
            Action::Right => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Action::Up => "up",
            Action::Down => "down",
            Action::Left => "left",
            Action::Right => "right",
        }
    }

    /// Arrow glyph used by the text renderer.
    pub fn arrow(self) -> char {
        match self {
            Action::Up => '^',
            Action::Down => 'v',
            Action::Left => '<',
            Action::Right => '>',
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Action {
    type Err = Error;

    /// Accepts full names, WASD keys and vi keys, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" | "w" | "k" => Ok(Action::Up),
            "down" | "s" | "j" => Ok(Action::Down),
            "left" | "a" | "h" => Ok(Action::Left),
            "right" | "d" | "l" => Ok(Action::Right),
            other => Err(Error::ParseAction {
                input: other.to_string(),
            }),
        }
    }
}
