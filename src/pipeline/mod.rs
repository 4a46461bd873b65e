//! Training and evaluation pipeline abstractions
//!
//! This module provides composable pipelines for:
//! - Training a Q-learning session over many episodes
//! - Following a learned table greedily
//! - Recording observations during training

pub mod evaluation;
pub mod observers;
pub mod training;

pub use evaluation::{Rollout, greedy_rollout};
// Re-export observer implementations (adapters)
pub use observers::{
    EpisodeObservation, JsonlObserver, MetricsObserver, MetricsSummary, ProgressObserver,
    StepObservation,
};
pub use training::{TrainingConfig, TrainingPipeline, TrainingResult};

pub use crate::ports::Observer;
