//! Training driver: advances the schedules and runs episodes

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    Result,
    ports::Observer,
    q_learning::{
        EpisodeOutcome, EpisodeReport, ExplorationSchedule, LearningRateSchedule, Trainer,
    },
};

/// Training configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Number of training episodes
    pub episodes: usize,

    /// ε per episode
    pub exploration: ExplorationSchedule,

    /// α per episode
    pub learning_rate: LearningRateSchedule,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            episodes: 2_000,
            exploration: ExplorationSchedule::default(),
            learning_rate: LearningRateSchedule::default(),
        }
    }
}

/// Result of a training run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingResult {
    /// Total episodes played
    pub episodes: usize,

    /// Episodes that reached the goal
    pub goals: usize,

    /// Episodes cut off by the step cap
    pub step_caps: usize,

    /// Hazard cells entered over the whole run
    pub hazard_hits: usize,

    /// Fraction of episodes that reached the goal
    pub goal_rate: f64,

    /// Mean number of steps per episode
    pub mean_steps: f64,

    /// First episode (0-based) that reached the goal
    pub first_goal: Option<usize>,

    /// ε used for the last episode
    pub final_epsilon: f64,

    /// α used for the last episode
    pub final_alpha: f64,
}

impl TrainingResult {
    /// Aggregate per-episode reports.
    pub fn from_reports(reports: &[EpisodeReport]) -> Self {
        let episodes = reports.len();
        let goals = reports
            .iter()
            .filter(|r| r.outcome == EpisodeOutcome::Goal)
            .count();
        let total_steps: usize = reports.iter().map(|r| r.steps).sum();
        let (goal_rate, mean_steps) = if episodes > 0 {
            (
                goals as f64 / episodes as f64,
                total_steps as f64 / episodes as f64,
            )
        } else {
            (0.0, 0.0)
        };

        Self {
            episodes,
            goals,
            step_caps: episodes - goals,
            hazard_hits: reports.iter().map(|r| r.hazard_hits).sum(),
            goal_rate,
            mean_steps,
            first_goal: reports
                .iter()
                .position(|r| r.outcome == EpisodeOutcome::Goal),
            final_epsilon: reports.last().map_or(0.0, |r| r.epsilon),
            final_alpha: reports.last().map_or(0.0, |r| r.alpha),
        }
    }

    /// Save result to JSON file
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }
}

/// Runs a [`Trainer`] for a number of episodes, choosing ε and α for each one
pub struct TrainingPipeline {
    config: TrainingConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl TrainingPipeline {
    /// Create a new training pipeline
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Train `trainer` for the configured number of episodes.
    pub fn run(&mut self, trainer: &mut Trainer) -> Result<TrainingResult> {
        let total = self.config.episodes;
        info!(
            episodes = total,
            size = trainer.world().size(),
            hazards = trainer.world().hazards().len(),
            gamma = trainer.config().gamma,
            reward = %trainer.config().reward,
            "training started"
        );

        for observer in &mut self.observers {
            observer.on_training_start(total)?;
        }

        let wants_steps = self.observers.iter().any(|o| o.wants_steps());
        let mut reports = Vec::with_capacity(total);

        for episode in 0..total {
            let epsilon = self.config.exploration.epsilon(episode);
            let alpha = self.config.learning_rate.alpha(episode);

            for observer in &mut self.observers {
                observer.on_episode_start(episode, epsilon, alpha)?;
            }

            let observers = &mut self.observers;
            let report = trainer.run_episode_with(epsilon, alpha, |record| {
                if wants_steps {
                    for observer in observers.iter_mut().filter(|o| o.wants_steps()) {
                        observer.on_step(episode, record)?;
                    }
                }
                Ok(())
            })?;

            debug!(
                episode,
                steps = report.steps,
                outcome = ?report.outcome,
                hazard_hits = report.hazard_hits,
                epsilon,
                alpha,
                "episode finished"
            );

            for observer in &mut self.observers {
                observer.on_episode_end(episode, &report)?;
            }
            reports.push(report);
        }

        for observer in &mut self.observers {
            observer.on_training_end()?;
        }

        let result = TrainingResult::from_reports(&reports);
        info!(
            goals = result.goals,
            goal_rate = result.goal_rate,
            mean_steps = result.mean_steps,
            "training finished"
        );
        Ok(result)
    }
}
