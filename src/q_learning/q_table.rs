//! Dense action-value table for temporal difference learning

use rand::{Rng, seq::IndexedRandom};

use crate::{
    Error, Result,
    gridworld::{Action, Position},
};

/// Action values for every (cell, action) pair of an `size`×`size` grid.
///
/// Values live in one flat vector indexed by `(row * size + column) * 4 + action`,
/// all starting at 0.0. A cell outside the grid is a lookup error, never a default.
#[derive(Debug, Clone)]
pub struct ActionValueTable {
    size: usize,
    values: Vec<f64>,
}

impl ActionValueTable {
    /// Create a zeroed table for an `size`×`size` grid.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            values: vec![0.0; size * size * Action::COUNT],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Total number of stored (state, action) entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn index(&self, state: Position, action: Action) -> Result<usize> {
        if !state.within(self.size) {
            return Err(Error::StateOutOfBounds {
                column: state.column,
                row: state.row,
                size: self.size,
            });
        }
        Ok((state.row * self.size + state.column) * Action::COUNT + action.index())
    }

    /// Stored value for a state-action pair.
    pub fn value(&self, state: Position, action: Action) -> Result<f64> {
        Ok(self.values[self.index(state, action)?])
    }

    /// Overwrite a single entry.
    pub fn set(&mut self, state: Position, action: Action, value: f64) -> Result<()> {
        let index = self.index(state, action)?;
        self.values[index] = value;
        Ok(())
    }

    /// The four values of a cell in [`Action::ALL`] order.
    pub fn row(&self, state: Position) -> Result<[f64; Action::COUNT]> {
        let start = self.index(state, Action::ALL[0])?;
        let mut row = [0.0; Action::COUNT];
        row.copy_from_slice(&self.values[start..start + Action::COUNT]);
        Ok(row)
    }

    /// Highest value among `candidates`, first candidate winning ties.
    ///
    /// # Errors
    ///
    /// `NoCandidateActions` when `candidates` is empty, `StateOutOfBounds` for cells
    /// off the grid.
    pub fn best_action(&self, state: Position, candidates: &[Action]) -> Result<Action> {
        let (&first, rest) = candidates.split_first().ok_or(Error::NoCandidateActions {
            column: state.column,
            row: state.row,
        })?;

        let mut best = first;
        let mut best_value = self.value(state, first)?;
        for &action in rest {
            let value = self.value(state, action)?;
            if value > best_value {
                best = action;
                best_value = value;
            }
        }
        Ok(best)
    }

    /// Maximum value over `candidates`.
    pub fn max_value(&self, state: Position, candidates: &[Action]) -> Result<f64> {
        let best = self.best_action(state, candidates)?;
        self.value(state, best)
    }

    /// ε-greedy selection restricted to `candidates`.
    ///
    /// With probability `epsilon` (clamped to [0, 1]) a uniformly random candidate is
    /// returned, otherwise [`ActionValueTable::best_action`].
    pub fn select_action<R: Rng>(
        &self,
        state: Position,
        candidates: &[Action],
        epsilon: f64,
        rng: &mut R,
    ) -> Result<Action> {
        let epsilon = if epsilon.is_nan() {
            0.0
        } else {
            epsilon.clamp(0.0, 1.0)
        };

        if rng.random::<f64>() < epsilon {
            candidates
                .choose(rng)
                .copied()
                .ok_or(Error::NoCandidateActions {
                    column: state.column,
                    row: state.row,
                })
        } else {
            self.best_action(state, candidates)
        }
    }

    /// One-step Q-learning target: `reward + gamma * max_a' Q(next, a')`.
    ///
    /// An empty `next_candidates` list contributes nothing beyond the reward.
    pub fn bellman_target(
        &self,
        reward: f64,
        gamma: f64,
        next_state: Position,
        next_candidates: &[Action],
    ) -> Result<f64> {
        if next_candidates.is_empty() {
            return Ok(reward);
        }
        Ok(reward + gamma * self.max_value(next_state, next_candidates)?)
    }

    /// Move an entry toward `target`.
    ///
    /// Q(s,a) ← (1 − α) Q(s,a) + α · target
    ///
    /// Returns the new value.
    pub fn update(
        &mut self,
        state: Position,
        action: Action,
        target: f64,
        alpha: f64,
    ) -> Result<f64> {
        let index = self.index(state, action)?;
        let old = self.values[index];
        let new = (1.0 - alpha) * old + alpha * target;
        self.values[index] = new;
        Ok(new)
    }

    /// Every entry as `(state, action, value)` in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, Action, f64)> + '_ {
        self.values.iter().enumerate().map(move |(i, &value)| {
            let cell = i / Action::COUNT;
            let state = Position::new(cell % self.size, cell / self.size);
            (state, Action::ALL[i % Action::COUNT], value)
        })
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn test_table_initialization() {
        let table = ActionValueTable::new(6);
        assert_eq!(table.len(), 6 * 6 * 4);
        assert!(table.iter().all(|(_, _, value)| value == 0.0));
        assert_eq!(table.value(Position::new(5, 5), Action::Left).unwrap(), 0.0);
    }

    #[test]
    fn test_out_of_grid_lookup_fails() {
        let table = ActionValueTable::new(4);
        assert!(matches!(
            table.value(Position::new(4, 0), Action::Up),
            Err(Error::StateOutOfBounds { column: 4, .. })
        ));
    }

    #[test]
    fn test_set_get() {
        let mut table = ActionValueTable::new(3);
        let state = Position::new(2, 1);
        table.set(state, Action::Down, 1.5).unwrap();
        assert_eq!(table.value(state, Action::Down).unwrap(), 1.5);
        assert_eq!(table.row(state).unwrap(), [0.0, 1.5, 0.0, 0.0]);
    }

    #[test]
    fn test_best_action_breaks_ties_by_candidate_order() {
        let table = ActionValueTable::new(3);
        let state = Position::new(1, 1);
        assert_eq!(
            table
                .best_action(state, &[Action::Right, Action::Up])
                .unwrap(),
            Action::Right
        );
        assert_eq!(
            table
                .best_action(state, &[Action::Up, Action::Right])
                .unwrap(),
            Action::Up
        );
    }

    #[test]
    fn test_best_action_picks_highest() {
        let mut table = ActionValueTable::new(3);
        let state = Position::new(0, 1);
        table.set(state, Action::Up, 0.5).unwrap();
        table.set(state, Action::Down, 1.5).unwrap();
        table.set(state, Action::Right, 0.8).unwrap();

        let candidates = [Action::Up, Action::Down, Action::Right];
        assert_eq!(table.best_action(state, &candidates).unwrap(), Action::Down);
        assert_eq!(table.max_value(state, &candidates).unwrap(), 1.5);
    }

    #[test]
    fn test_empty_candidates_is_an_error() {
        let table = ActionValueTable::new(3);
        let mut rng = StdRng::seed_from_u64(0);
        assert!(table.best_action(Position::ORIGIN, &[]).is_err());
        assert!(
            table
                .select_action(Position::ORIGIN, &[], 1.0, &mut rng)
                .is_err()
        );
    }

    #[test]
    fn test_select_action_stays_within_candidates() {
        let table = ActionValueTable::new(4);
        let mut rng = StdRng::seed_from_u64(17);
        let candidates = [Action::Down, Action::Right];
        for _ in 0..500 {
            let action = table
                .select_action(Position::ORIGIN, &candidates, 1.0, &mut rng)
                .unwrap();
            assert!(candidates.contains(&action));
        }
    }

    #[test]
    fn test_zero_epsilon_is_greedy() {
        let mut table = ActionValueTable::new(4);
        let state = Position::new(1, 1);
        table.set(state, Action::Left, 2.0).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..100 {
            // Out-of-range epsilon is clamped to 0.
            let action = table
                .select_action(state, &Action::ALL, -3.0, &mut rng)
                .unwrap();
            assert_eq!(action, Action::Left);
        }
    }

    #[test]
    fn test_nan_epsilon_is_greedy() {
        let mut table = ActionValueTable::new(4);
        let state = Position::new(2, 1);
        table.set(state, Action::Down, 1.5).unwrap();
        let mut rng = StdRng::seed_from_u64(8);
        for _ in 0..100 {
            let action = table
                .select_action(state, &Action::ALL, f64::NAN, &mut rng)
                .unwrap();
            assert_eq!(action, Action::Down);
        }
    }

    #[test]
    fn test_update_blends_toward_target() {
        let mut table = ActionValueTable::new(3);
        let state = Position::new(1, 0);
        let new = table.update(state, Action::Down, 2.0, 0.5).unwrap();
        assert!((new - 1.0).abs() < 1e-12);
        let new = table.update(state, Action::Down, 2.0, 0.5).unwrap();
        assert!((new - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_repeated_updates_converge_monotonically() {
        let mut table = ActionValueTable::new(2);
        let mut previous = 0.0;
        for _ in 0..50 {
            let value = table.update(Position::ORIGIN, Action::Right, 1.0, 0.3).unwrap();
            assert!(value > previous && value <= 1.0);
            previous = value;
        }
        assert!((previous - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_bellman_target() {
        let mut table = ActionValueTable::new(3);
        let next = Position::new(1, 1);
        table.set(next, Action::Up, 1.0).unwrap();
        table.set(next, Action::Left, 2.0).unwrap();

        let target = table
            .bellman_target(0.5, 0.9, next, &[Action::Up, Action::Left])
            .unwrap();
        assert!((target - (0.5 + 0.9 * 2.0)).abs() < 1e-12);
        assert_eq!(table.bellman_target(0.5, 0.9, next, &[]).unwrap(), 0.5);
    }

    #[test]
    fn test_iter_recovers_coordinates() {
        let mut table = ActionValueTable::new(3);
        table.set(Position::new(2, 1), Action::Right, 4.0).unwrap();
        let (state, action, value) = table
            .iter()
            .find(|&(_, _, value)| value != 0.0)
            .unwrap();
        assert_eq!(state, Position::new(2, 1));
        assert_eq!(action, Action::Right);
        assert_eq!(value, 4.0);
    }
}
