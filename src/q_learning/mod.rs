//! Tabular Q-learning
//!
//! This module implements one-step Q-learning over the grid environment:
//! a dense action-value table, ε-greedy action selection, reward shaping and
//! the per-episode trainer. Exploration and learning-rate schedules live here
//! too, but they are advanced by the training driver in [`crate::pipeline`].
//!
//! ## Update rule
//!
//! ```text
//! target   = r + γ · max_a' Q(s', a')
//! Q(s, a) ← (1 − α) · Q(s, a) + α · target
//! ```
//!
//! `s'` is always the cell a move reached. When that cell is the goal or a hazard,
//! the world puts the agent back on the start cell, but the update still bootstraps
//! from the cell that was reached.
//!
//! ## Usage Example
//!
//! ```
//! use pingouin::gridworld::GridWorld;
//! use pingouin::q_learning::{LearningRateSchedule, ExplorationSchedule, Trainer, TrainerConfig};
//!
//! let world = GridWorld::with_hazards(4, [])?;
//! let mut trainer = Trainer::for_world(world, TrainerConfig::default())?.with_seed(1);
//!
//! let epsilon = ExplorationSchedule::default();
//! let alpha = LearningRateSchedule::new(0.5);
//! for episode in 0..50 {
//!     trainer.run_episode(epsilon.epsilon(episode), alpha.alpha(episode))?;
//! }
//! # Ok::<(), pingouin::Error>(())
//! ```

pub mod q_table;
pub mod reward;
pub mod schedule;
pub mod trainer;

// Public re-exports
pub use q_table::ActionValueTable;
pub use reward::{EpisodeTrace, RewardShaping};
pub use schedule::{ExplorationSchedule, LearningRateSchedule};
pub use trainer::{EpisodeOutcome, EpisodeReport, StepRecord, Trainer, TrainerConfig};
