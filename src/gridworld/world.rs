//! The grid environment the agent learns to cross

use std::{collections::BTreeSet, fmt};

use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    layout::{HazardLayout, goal_for},
    position::{Action, Position},
};
use crate::{Error, Result};

/// What the agent ran into after a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    /// Landed on the goal; the agent was sent back to the start.
    Goal,
    /// Landed on a hazard; the agent was sent back to the start.
    Hazard,
    /// Landed on a free cell.
    Clear,
}

impl Signal {
    /// Whether the move sent the agent back to the start cell.
    pub fn resets_agent(self) -> bool {
        matches!(self, Signal::Goal | Signal::Hazard)
    }
}

/// Record of a single move.
///
/// `landing` is the cell the move reached, even when the world has already put the
/// agent back on the start cell because of a terminal signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub from: Position,
    pub action: Action,
    pub landing: Position,
    pub signal: Signal,
}

/// Square grid with a start cell at (0, 0), a goal in the opposite corner and a set of
/// hazard cells chosen by a [`HazardLayout`].
#[derive(Debug, Clone)]
pub struct GridWorld {
    size: usize,
    agent: Position,
    goal: Position,
    hazards: BTreeSet<Position>,
    layout: HazardLayout,
    rng: StdRng,
    rng_seed: Option<u64>,
}

/// Seeded generator when `seed` is set, otherwise one seeded from the thread RNG.
pub(crate) fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

impl GridWorld {
    /// Create a grid with the default random hazard layout.
    ///
    /// # Errors
    ///
    /// Returns `GridTooSmall` for `size < 2` and a configuration error when the
    /// default layout cannot fit the grid.
    pub fn new(size: usize) -> Result<Self> {
        Self::with_layout(size, HazardLayout::default())
    }

    /// Create a grid whose hazards come from `layout`.
    pub fn with_layout(size: usize, layout: HazardLayout) -> Result<Self> {
        if size < 2 {
            return Err(Error::GridTooSmall { size });
        }
        layout.validate(size)?;

        let mut world = Self {
            size,
            agent: Position::ORIGIN,
            goal: goal_for(size),
            hazards: BTreeSet::new(),
            layout,
            rng: build_rng(None),
            rng_seed: None,
        };
        world.reset();
        Ok(world)
    }

    /// Create a grid with exactly these hazard cells, kept across resets.
    pub fn with_hazards<I>(size: usize, hazards: I) -> Result<Self>
    where
        I: IntoIterator<Item = Position>,
    {
        Self::with_layout(size, HazardLayout::fixed(hazards))
    }

    /// Reseed the layout generator and reset, making hazard draws reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
        self.reset();
        self
    }

    /// Put the agent on the start cell and draw a new hazard layout.
    pub fn reset(&mut self) {
        self.agent = Position::ORIGIN;
        self.hazards = self.layout.sample(self.size, &mut self.rng);
        self.goal = goal_for(self.size);
        debug!(
            size = self.size,
            hazards = self.hazards.len(),
            "grid layout reset"
        );
    }

    /// Put the agent back on the start cell, keeping the current hazards.
    pub fn return_to_start(&mut self) {
        self.agent = Position::ORIGIN;
    }

    /// Actions from `state` that stay on the grid, in [`Action::ALL`] order.
    pub fn legal_actions(&self, state: Position) -> Vec<Action> {
        Action::ALL
            .into_iter()
            .filter(|&action| match action {
                Action::Up => state.row > 0,
                Action::Down => state.row + 1 < self.size,
                Action::Left => state.column > 0,
                Action::Right => state.column + 1 < self.size,
            })
            .collect()
    }

    /// Move the agent one cell.
    ///
    /// Moves off the grid are clamped, leaving the agent where it was. Landing on a
    /// hazard or on the goal sends the agent back to the start; the returned
    /// [`Transition`] still reports the cell that was reached.
    pub fn apply(&mut self, action: Action) -> Transition {
        let from = self.agent;
        let landing = from.step(action, self.size);

        let signal = if self.hazards.contains(&landing) {
            Signal::Hazard
        } else if landing == self.goal {
            Signal::Goal
        } else {
            Signal::Clear
        };

        self.agent = if signal.resets_agent() {
            Position::ORIGIN
        } else {
            landing
        };

        Transition {
            from,
            action,
            landing,
            signal,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Current agent cell.
    pub fn agent(&self) -> Position {
        self.agent
    }

    pub fn goal(&self) -> Position {
        self.goal
    }

    pub fn hazards(&self) -> &BTreeSet<Position> {
        &self.hazards
    }

    pub fn is_hazard(&self, cell: Position) -> bool {
        self.hazards.contains(&cell)
    }

    pub fn rng_seed(&self) -> Option<u64> {
        self.rng_seed
    }

    /// Text grid with the agent drawn at `agent` instead of its current cell.
    ///
    /// `P` marks the agent, `G` the goal, `~` a hazard and `.` a free cell.
    pub fn render_at(&self, agent: Position) -> String {
        let mut grid = String::with_capacity(self.size * (self.size + 1));
        for row in 0..self.size {
            grid.extend((0..self.size).map(|column| {
                let cell = Position::new(column, row);
                if cell == agent {
                    'P'
                } else if cell == self.goal {
                    'G'
                } else if self.hazards.contains(&cell) {
                    '~'
                } else {
                    '.'
                }
            }));
            grid.push('\n');
        }
        grid
    }

    /// Every cell of the grid in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.size)
            .flat_map(move |row| (0..self.size).map(move |column| Position::new(column, row)))
    }
}

impl fmt::Display for GridWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_at(self.agent))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_grid(size: usize) -> GridWorld {
        GridWorld::with_hazards(size, []).unwrap()
    }

    #[test]
    fn test_new_grid_starts_at_origin() {
        let world = GridWorld::new(6).unwrap().with_seed(1);
        assert_eq!(world.agent(), Position::ORIGIN);
        assert_eq!(world.goal(), Position::new(5, 5));
        assert!(!world.hazards().contains(&Position::ORIGIN));
        assert!(!world.hazards().contains(&world.goal()));
    }

    #[test]
    fn test_rejects_degenerate_sizes() {
        assert!(matches!(
            GridWorld::with_hazards(1, []),
            Err(Error::GridTooSmall { size: 1 })
        ));
        assert!(GridWorld::with_hazards(0, []).is_err());
        assert!(GridWorld::with_hazards(2, []).is_ok());
    }

    #[test]
    fn test_legal_actions_at_corners() {
        let world = open_grid(6);
        assert_eq!(
            world.legal_actions(Position::ORIGIN),
            vec![Action::Down, Action::Right]
        );
        assert_eq!(
            world.legal_actions(Position::new(5, 5)),
            vec![Action::Up, Action::Left]
        );
        assert_eq!(
            world.legal_actions(Position::new(4, 5)),
            vec![Action::Up, Action::Left, Action::Right]
        );
        assert_eq!(world.legal_actions(Position::new(2, 3)), Action::ALL.to_vec());
    }

    #[test]
    fn test_apply_clamps_off_grid_moves() {
        let mut world = open_grid(4);
        let transition = world.apply(Action::Left);
        assert_eq!(transition.landing, Position::ORIGIN);
        assert_eq!(transition.signal, Signal::Clear);
        assert_eq!(world.agent(), Position::ORIGIN);
    }

    #[test]
    fn test_hazard_sends_agent_home() {
        let mut world = GridWorld::with_hazards(4, [Position::new(1, 0)]).unwrap();
        let transition = world.apply(Action::Right);
        assert_eq!(transition.signal, Signal::Hazard);
        assert_eq!(transition.landing, Position::new(1, 0));
        assert_eq!(world.agent(), Position::ORIGIN);
    }

    #[test]
    fn test_goal_sends_agent_home() {
        let mut world = open_grid(2);
        assert_eq!(world.apply(Action::Right).signal, Signal::Clear);
        let transition = world.apply(Action::Down);
        assert_eq!(transition.signal, Signal::Goal);
        assert_eq!(transition.from, Position::new(1, 0));
        assert_eq!(transition.landing, Position::new(1, 1));
        assert_eq!(world.agent(), Position::ORIGIN);
    }

    #[test]
    fn test_seeded_layouts_repeat() {
        let a = GridWorld::new(6).unwrap().with_seed(99);
        let b = GridWorld::new(6).unwrap().with_seed(99);
        assert_eq!(a.hazards(), b.hazards());
    }

    #[test]
    fn test_display_marks_cells() {
        let world = GridWorld::with_hazards(3, [Position::new(1, 1)]).unwrap();
        assert_eq!(world.to_string(), "P..\n.~.\n..G\n");
    }

    #[test]
    fn test_render_at_moves_only_the_agent_marker() {
        let world = GridWorld::with_hazards(3, [Position::new(1, 1)]).unwrap();
        assert_eq!(world.render_at(world.agent()), world.to_string());
        assert_eq!(world.render_at(Position::new(2, 0)), "..P\n.~.\n..G\n");
        // Drawn over the goal on the final frame of a rollout.
        assert_eq!(world.render_at(world.goal()), "...\n.~.\n..P\n");
    }

    #[test]
    fn test_build_rng_is_reproducible_when_seeded() {
        use rand::Rng;

        let mut a = build_rng(Some(7));
        let mut b = build_rng(Some(7));
        assert_eq!(a.random::<u64>(), b.random::<u64>());
    }
}
