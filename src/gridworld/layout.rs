//! Hazard layout policies
//!
//! A layout decides which cells are hazards each time a grid is reset. The random
//! policy draws a fresh set of cells on every reset; the fixed policy always yields the
//! same injected set.

use std::collections::BTreeSet;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::position::Position;
use crate::{Error, Result};

/// How hazards are placed on a grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HazardLayout {
    /// Draw a count uniformly from `[min, max]`, then that many cells uniformly over
    /// the grid. Draws landing on the start or the goal are discarded and duplicates
    /// collapse, so the effective count can be lower than the drawn one.
    Random { min: usize, max: usize },
    /// Always use exactly these cells.
    Fixed { cells: BTreeSet<Position> },
}

impl Default for HazardLayout {
    fn default() -> Self {
        HazardLayout::Random { min: 5, max: 8 }
    }
}

impl HazardLayout {
    /// A layout without any hazards.
    pub fn empty() -> Self {
        HazardLayout::Fixed {
            cells: BTreeSet::new(),
        }
    }

    /// A fixed layout from any collection of cells.
    pub fn fixed<I>(cells: I) -> Self
    where
        I: IntoIterator<Item = Position>,
    {
        HazardLayout::Fixed {
            cells: cells.into_iter().collect(),
        }
    }

    /// Check that the layout makes sense on an `size`×`size` grid.
    ///
    /// # Errors
    ///
    /// - `InvalidConfiguration` when `min > max`, or when the largest random draw could
    ///   cover every cell other than start and goal.
    /// - `InvalidHazard` when a fixed cell is off the grid or sits on the start or goal.
    pub fn validate(&self, size: usize) -> Result<()> {
        let start = Position::ORIGIN;
        let goal = goal_for(size);
        match self {
            HazardLayout::Random { min, max } => {
                if min > max {
                    return Err(Error::config(format!(
                        "hazard count range is empty (min {min} > max {max})"
                    )));
                }
                let free_cells = (size * size).saturating_sub(2);
                if *max >= free_cells {
                    return Err(Error::config(format!(
                        "up to {max} hazards could cover all {free_cells} free cells of a {size}x{size} grid"
                    )));
                }
                Ok(())
            }
            HazardLayout::Fixed { cells } => {
                for &cell in cells {
                    let reason = if !cell.within(size) {
                        Some("outside the grid")
                    } else if cell == start {
                        Some("on the start cell")
                    } else if cell == goal {
                        Some("on the goal cell")
                    } else {
                        None
                    };
                    if let Some(reason) = reason {
                        return Err(Error::InvalidHazard {
                            column: cell.column,
                            row: cell.row,
                            reason: reason.to_string(),
                        });
                    }
                }
                Ok(())
            }
        }
    }

    /// Produce the hazard set for one reset.
    ///
    /// Assumes [`HazardLayout::validate`] has passed for `size`.
    pub fn sample<R: Rng>(&self, size: usize, rng: &mut R) -> BTreeSet<Position> {
        match self {
            HazardLayout::Fixed { cells } => cells.clone(),
            HazardLayout::Random { min, max } => {
                let goal = goal_for(size);
                let draws = rng.random_range(*min..=*max);
                (0..draws)
                    .map(|_| Position::new(rng.random_range(0..size), rng.random_range(0..size)))
                    .filter(|&cell| cell != Position::ORIGIN && cell != goal)
                    .collect()
            }
        }
    }
}

/// The goal cell of an `size`×`size` grid.
pub(crate) fn goal_for(size: usize) -> Position {
    let last = size.saturating_sub(1);
    Position::new(last, last)
}
