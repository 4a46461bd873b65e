//! Episode loop: ε-greedy acting with one-step Q-learning updates
//!
//! A [`Trainer`] owns everything a training session mutates: the grid, the action
//! value table and the exploration RNG. The outer driver decides ε and α for each
//! episode; the trainer only applies them.

use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::{
    q_table::ActionValueTable,
    reward::{EpisodeTrace, RewardShaping},
};
use crate::{
    Error, Result,
    gridworld::{GridWorld, Signal, Transition, world::build_rng},
};

/// Parameters that stay fixed for a whole training run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainerConfig {
    /// Discount factor γ
    pub gamma: f64,
    /// Step cap per episode
    pub max_steps: usize,
    /// Reward shaping
    pub reward: RewardShaping,
    /// Draw a new hazard layout at the start of every episode instead of keeping
    /// the session's layout
    pub resample_layout: bool,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            gamma: 0.95,
            max_steps: 100,
            reward: RewardShaping::default(),
            resample_layout: false,
        }
    }
}

impl TrainerConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.gamma) {
            return Err(Error::config(format!(
                "discount factor must be in [0, 1], got {}",
                self.gamma
            )));
        }
        if self.max_steps == 0 {
            return Err(Error::config("episode step cap must be at least 1"));
        }
        Ok(())
    }
}

/// How an episode ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EpisodeOutcome {
    /// The agent reached the goal.
    Goal,
    /// The step cap ran out first.
    StepCap,
}

/// Summary of one training episode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpisodeReport {
    pub steps: usize,
    pub outcome: EpisodeOutcome,
    pub hazard_hits: usize,
    pub total_reward: f64,
    pub epsilon: f64,
    pub alpha: f64,
}

/// Everything that happened during one learning step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    /// 1-based step index within the episode
    pub step: usize,
    pub transition: Transition,
    pub reward: f64,
    pub target: f64,
    pub value_before: f64,
    pub value_after: f64,
}

/// Q-learning session over one grid and one table.
#[derive(Debug, Clone)]
pub struct Trainer {
    world: GridWorld,
    table: ActionValueTable,
    config: TrainerConfig,
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl Trainer {
    /// Pair a world with an existing table.
    ///
    /// # Errors
    ///
    /// Fails when the table was built for a different grid size or `config` is
    /// invalid.
    pub fn new(world: GridWorld, table: ActionValueTable, config: TrainerConfig) -> Result<Self> {
        config.validate()?;
        if table.size() != world.size() {
            return Err(Error::config(format!(
                "table covers a {0}x{0} grid but the world is {1}x{1}",
                table.size(),
                world.size()
            )));
        }
        Ok(Self {
            world,
            table,
            config,
            rng: build_rng(None),
            rng_seed: None,
        })
    }

    /// Start from a zeroed table sized for `world`.
    pub fn for_world(world: GridWorld, config: TrainerConfig) -> Result<Self> {
        let table = ActionValueTable::new(world.size());
        Self::new(world, table, config)
    }

    /// Seed the exploration RNG.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
        self
    }

    /// Run one episode with the given exploration and learning rates.
    pub fn run_episode(&mut self, epsilon: f64, alpha: f64) -> Result<EpisodeReport> {
        self.run_episode_with(epsilon, alpha, |_| Ok(()))
    }

    /// Run one episode, handing every step to `on_step` after its update.
    ///
    /// The episode starts from the start cell and ends on reaching the goal or after
    /// `max_steps` moves. Hazards send the agent home but do not end the episode.
    pub fn run_episode_with<F>(
        &mut self,
        epsilon: f64,
        alpha: f64,
        mut on_step: F,
    ) -> Result<EpisodeReport>
    where
        F: FnMut(&StepRecord) -> Result<()>,
    {
        if self.config.resample_layout {
            self.world.reset();
        } else {
            self.world.return_to_start();
        }

        let mut trace = EpisodeTrace::new(self.world.agent());
        let mut outcome = EpisodeOutcome::StepCap;

        while trace.steps() < self.config.max_steps {
            let state = self.world.agent();
            let legal = self.world.legal_actions(state);
            let action = self
                .table
                .select_action(state, &legal, epsilon, &mut self.rng)?;

            let transition = self.world.apply(action);
            let step = trace.steps() + 1;
            let last_step = step == self.config.max_steps;
            let reward = self
                .config
                .reward
                .reward(&transition, step, last_step, &trace);

            // Bootstrap from the cell the move reached, not the start cell the world
            // may already have reset to.
            let next_legal = self.world.legal_actions(transition.landing);
            let target = self.table.bellman_target(
                reward,
                self.config.gamma,
                transition.landing,
                &next_legal,
            )?;
            let value_before = self.table.value(state, action)?;
            let value_after = self.table.update(state, action, target, alpha)?;

            trace.record(&transition, self.world.agent(), reward);
            trace!(
                step,
                from = %transition.from,
                action = %action,
                landing = %transition.landing,
                signal = ?transition.signal,
                reward,
                value_after,
                "q-learning step"
            );

            on_step(&StepRecord {
                step,
                transition,
                reward,
                target,
                value_before,
                value_after,
            })?;

            if transition.signal == Signal::Goal {
                outcome = EpisodeOutcome::Goal;
                break;
            }
        }

        Ok(EpisodeReport {
            steps: trace.steps(),
            outcome,
            hazard_hits: trace.hazard_hits(),
            total_reward: trace.total_reward(),
            epsilon,
            alpha,
        })
    }

    /// Take one ε-greedy action from the agent's current cell without learning.
    pub fn policy_step(&mut self, epsilon: f64) -> Result<Transition> {
        let state = self.world.agent();
        let legal = self.world.legal_actions(state);
        let action = self
            .table
            .select_action(state, &legal, epsilon, &mut self.rng)?;
        Ok(self.world.apply(action))
    }

    pub fn world(&self) -> &GridWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut GridWorld {
        &mut self.world
    }

    pub fn table(&self) -> &ActionValueTable {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut ActionValueTable {
        &mut self.table
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    pub fn rng_seed(&self) -> Option<u64> {
        self.rng_seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gridworld::{Action, Position};

    fn open_trainer(size: usize) -> Trainer {
        let world = GridWorld::with_hazards(size, []).unwrap();
        Trainer::for_world(world, TrainerConfig::default())
            .unwrap()
            .with_seed(7)
    }

    #[test]
    fn test_rejects_mismatched_table() {
        let world = GridWorld::with_hazards(4, []).unwrap();
        let table = ActionValueTable::new(5);
        assert!(Trainer::new(world, table, TrainerConfig::default()).is_err());
    }

    #[test]
    fn test_rejects_bad_gamma() {
        let world = GridWorld::with_hazards(4, []).unwrap();
        let config = TrainerConfig {
            gamma: 1.5,
            ..TrainerConfig::default()
        };
        assert!(Trainer::for_world(world, config).is_err());
    }

    #[test]
    fn test_episode_respects_step_cap() {
        let mut trainer = open_trainer(6);
        let config = TrainerConfig {
            max_steps: 3,
            ..TrainerConfig::default()
        };
        trainer.config = config;
        // Six cells away from the goal, three steps can never reach it.
        let report = trainer.run_episode(1.0, 0.5).unwrap();
        assert_eq!(report.steps, 3);
        assert_eq!(report.outcome, EpisodeOutcome::StepCap);
    }

    #[test]
    fn test_terminal_update_bootstraps_from_landing_cell() {
        let mut trainer = open_trainer(2);
        let landing_value = 0.4;
        // Seed the goal cell so the bootstrap term is visible.
        for action in Action::ALL {
            trainer
                .table_mut()
                .set(Position::new(1, 1), action, landing_value)
                .unwrap();
        }
        // Only Down reaches the goal from (1, 0).
        trainer
            .table_mut()
            .set(Position::new(1, 0), Action::Down, 10.0)
            .unwrap();
        trainer
            .table_mut()
            .set(Position::ORIGIN, Action::Right, 10.0)
            .unwrap();

        let mut records = Vec::new();
        let report = trainer
            .run_episode_with(0.0, 1.0, |record| {
                records.push(*record);
                Ok(())
            })
            .unwrap();

        assert_eq!(report.outcome, EpisodeOutcome::Goal);
        assert_eq!(report.steps, 2);
        let last = records.last().unwrap();
        assert_eq!(last.transition.signal, Signal::Goal);
        let expected = (1.0 - 0.02) + 0.95 * landing_value;
        assert!((last.target - expected).abs() < 1e-12);
        assert_eq!(trainer.world().agent(), Position::ORIGIN);
    }

    #[test]
    fn test_hazard_does_not_end_episode() {
        let world = GridWorld::with_hazards(3, [Position::new(1, 0), Position::new(0, 1)]).unwrap();
        let config = TrainerConfig {
            max_steps: 10,
            ..TrainerConfig::default()
        };
        let mut trainer = Trainer::for_world(world, config).unwrap().with_seed(1);
        // Both moves out of the start cell are hazards.
        let report = trainer.run_episode(0.0, 0.5).unwrap();
        assert_eq!(report.outcome, EpisodeOutcome::StepCap);
        assert_eq!(report.steps, 10);
        assert_eq!(report.hazard_hits, 10);
    }

    #[test]
    fn test_policy_step_does_not_learn() {
        let mut trainer = open_trainer(4);
        let before = trainer.table().clone();
        trainer.policy_step(1.0).unwrap();
        assert!(
            trainer
                .table()
                .iter()
                .zip(before.iter())
                .all(|(a, b)| a == b)
        );
    }
}
