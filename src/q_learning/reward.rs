//! Reward shaping and the per-episode trace it reads

use std::{collections::HashSet, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    Error,
    gridworld::{Position, Signal, Transition},
};

/// How a transition is turned into a scalar reward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RewardShaping {
    /// Goal and hazard rewards, minus `per_step` times the 1-based step index.
    StepPenalty {
        goal: f64,
        hazard: f64,
        per_step: f64,
    },
    /// Goal and hazard rewards only.
    Sparse { goal: f64, hazard: f64 },
    /// Dense shaping that rewards covering new ground.
    ///
    /// Checked in order: goal +5, hazard −10, running out of steps −5, stepping back
    /// onto the cell held two moves earlier −8, first visit to a cell this episode +2,
    /// otherwise 0. The first move of an episode has no cell two moves back.
    Exploration,
}

impl Default for RewardShaping {
    fn default() -> Self {
        RewardShaping::StepPenalty {
            goal: 1.0,
            hazard: -1.0,
            per_step: 0.01,
        }
    }
}

impl RewardShaping {
    pub const NAMES: &'static str = "step-penalty, sparse, exploration";

    /// Unit goal/hazard rewards with no step term.
    pub fn sparse() -> Self {
        RewardShaping::Sparse {
            goal: 1.0,
            hazard: -1.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RewardShaping::StepPenalty { .. } => "step-penalty",
            RewardShaping::Sparse { .. } => "sparse",
            RewardShaping::Exploration => "exploration",
        }
    }

    /// Reward for `transition`, the `step_index`-th (1-based) move of the episode.
    ///
    /// `trace` must not yet contain the transition. `last_step` is set when this move
    /// exhausts the step budget.
    pub fn reward(
        &self,
        transition: &Transition,
        step_index: usize,
        last_step: bool,
        trace: &EpisodeTrace,
    ) -> f64 {
        match *self {
            RewardShaping::StepPenalty {
                goal,
                hazard,
                per_step,
            } => {
                let base = match transition.signal {
                    Signal::Goal => goal,
                    Signal::Hazard => hazard,
                    Signal::Clear => 0.0,
                };
                base - per_step * step_index as f64
            }
            RewardShaping::Sparse { goal, hazard } => match transition.signal {
                Signal::Goal => goal,
                Signal::Hazard => hazard,
                Signal::Clear => 0.0,
            },
            RewardShaping::Exploration => match transition.signal {
                Signal::Goal => 5.0,
                Signal::Hazard => -10.0,
                Signal::Clear if last_step => -5.0,
                Signal::Clear if trace.two_moves_back() == Some(transition.landing) => -8.0,
                Signal::Clear if !trace.has_visited(transition.landing) => 2.0,
                Signal::Clear => 0.0,
            },
        }
    }
}

impl fmt::Display for RewardShaping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RewardShaping {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "step-penalty" | "penalty" => Ok(RewardShaping::default()),
            "sparse" => Ok(RewardShaping::sparse()),
            "exploration" | "explore" => Ok(RewardShaping::Exploration),
            other => Err(Error::ParseRewardShaping {
                input: other.to_string(),
                expected: Self::NAMES.to_string(),
            }),
        }
    }
}

/// Bookkeeping for a single episode, discarded when it ends.
#[derive(Debug, Clone)]
pub struct EpisodeTrace {
    steps: usize,
    hazard_hits: usize,
    total_reward: f64,
    /// Cells occupied after each move, starting with the start cell.
    history: Vec<Position>,
    visited: HashSet<Position>,
}

impl EpisodeTrace {
    pub fn new(start: Position) -> Self {
        Self {
            steps: 0,
            hazard_hits: 0,
            total_reward: 0.0,
            history: vec![start],
            visited: HashSet::from([start]),
        }
    }

    /// Log a finished move. `occupied` is where the agent stands afterwards.
    pub fn record(&mut self, transition: &Transition, occupied: Position, reward: f64) {
        self.steps += 1;
        self.total_reward += reward;
        if transition.signal == Signal::Hazard {
            self.hazard_hits += 1;
        }
        self.visited.insert(transition.landing);
        self.history.push(occupied);
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn hazard_hits(&self) -> usize {
        self.hazard_hits
    }

    pub fn total_reward(&self) -> f64 {
        self.total_reward
    }

    pub fn has_visited(&self, cell: Position) -> bool {
        self.visited.contains(&cell)
    }

    /// Cell the agent held before its previous move.
    pub fn two_moves_back(&self) -> Option<Position> {
        self.history.len().checked_sub(2).map(|i| self.history[i])
    }
}
