//! Common test utilities for the pingouin test suite.
//!
//! This module provides small builders for deterministic training sessions.

#![allow(dead_code)]

use pingouin::{
    gridworld::{GridWorld, Position},
    pipeline::{TrainingConfig, TrainingPipeline, TrainingResult},
    q_learning::{ExplorationSchedule, LearningRateSchedule, Trainer, TrainerConfig},
};

/// A hazard-free grid.
pub fn open_world(size: usize) -> GridWorld {
    GridWorld::with_hazards(size, []).unwrap()
}

/// A grid with exactly `hazards`.
pub fn world_with(size: usize, hazards: &[(usize, usize)]) -> GridWorld {
    GridWorld::with_hazards(size, hazards.iter().map(|&(c, r)| Position::new(c, r))).unwrap()
}

/// Trainer with a seeded exploration RNG and default settings.
pub fn seeded_trainer(world: GridWorld, seed: u64) -> Trainer {
    Trainer::for_world(world, TrainerConfig::default())
        .unwrap()
        .with_seed(seed)
}

/// Run `episodes` episodes with the default ε schedule and α starting at `alpha`.
pub fn train(trainer: &mut Trainer, episodes: usize, alpha: f64) -> TrainingResult {
    let config = TrainingConfig {
        episodes,
        exploration: ExplorationSchedule::default(),
        learning_rate: LearningRateSchedule::new(alpha),
    };
    TrainingPipeline::new(config).run(trainer).unwrap()
}
