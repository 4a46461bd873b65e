//! Greedy evaluation of a learned table

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    Result,
    gridworld::{GridWorld, Position, Signal},
    q_learning::{ActionValueTable, EpisodeOutcome},
};

/// Path the greedy policy takes from the start cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rollout {
    /// Cells visited, starting with the start cell. A hazard landing is recorded
    /// and followed by the start cell the agent was sent back to.
    pub path: Vec<Position>,
    pub outcome: EpisodeOutcome,
    pub steps: usize,
    pub hazard_hits: usize,
}

impl Rollout {
    pub fn reached_goal(&self) -> bool {
        self.outcome == EpisodeOutcome::Goal
    }
}

/// Follow the table greedily (no exploration, no learning) for at most
/// `max_steps` moves. The world keeps its hazard layout.
pub fn greedy_rollout(
    world: &mut GridWorld,
    table: &ActionValueTable,
    max_steps: usize,
) -> Result<Rollout> {
    world.return_to_start();
    let mut path = vec![world.agent()];
    let mut outcome = EpisodeOutcome::StepCap;
    let mut steps = 0;
    let mut hazard_hits = 0;

    while steps < max_steps {
        let state = world.agent();
        let legal = world.legal_actions(state);
        let action = table.best_action(state, &legal)?;
        let transition = world.apply(action);
        steps += 1;
        path.push(transition.landing);

        match transition.signal {
            Signal::Goal => {
                outcome = EpisodeOutcome::Goal;
                break;
            }
            Signal::Hazard => {
                hazard_hits += 1;
                path.push(world.agent());
            }
            Signal::Clear => {}
        }
    }

    debug!(steps, outcome = ?outcome, hazard_hits, "greedy rollout finished");
    Ok(Rollout {
        path,
        outcome,
        steps,
        hazard_hits,
    })
}
