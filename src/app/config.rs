//! Configuration for a training session.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    gridworld::{GridWorld, HazardLayout},
    pipeline::TrainingConfig,
    q_learning::{ExplorationSchedule, LearningRateSchedule, RewardShaping, Trainer, TrainerConfig},
};

/// Everything needed to build and train a session.
///
/// This type provides a builder-style API; every field has a default so a JSON
/// file only needs to name what it changes.
///
/// # Examples
///
/// ```
/// use pingouin::app::SessionConfig;
/// use pingouin::gridworld::HazardLayout;
///
/// let config = SessionConfig::default()
///     .with_grid_size(4)
///     .with_hazards(HazardLayout::empty())
///     .with_episodes(200)
///     .with_seed(42);
/// config.validate()?;
/// let mut trainer = config.build_trainer()?;
/// # let _ = &mut trainer;
/// # Ok::<(), pingouin::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Side length of the square grid
    pub grid_size: usize,
    /// Hazard placement policy
    pub hazards: HazardLayout,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
    /// Number of training episodes
    pub episodes: usize,
    /// Step cap per episode
    pub max_steps: usize,
    /// Discount factor
    pub gamma: f64,
    pub reward: RewardShaping,
    pub exploration: ExplorationSchedule,
    pub learning_rate: LearningRateSchedule,
    /// Draw a new hazard layout every episode
    pub resample_layout: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        let trainer = TrainerConfig::default();
        let training = TrainingConfig::default();
        Self {
            grid_size: 6,
            hazards: HazardLayout::default(),
            seed: None,
            episodes: training.episodes,
            max_steps: trainer.max_steps,
            gamma: trainer.gamma,
            reward: trainer.reward,
            exploration: training.exploration,
            learning_rate: training.learning_rate,
            resample_layout: trainer.resample_layout,
        }
    }
}

impl SessionConfig {
    pub fn with_grid_size(mut self, size: usize) -> Self {
        self.grid_size = size;
        self
    }

    pub fn with_hazards(mut self, hazards: HazardLayout) -> Self {
        self.hazards = hazards;
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_episodes(mut self, episodes: usize) -> Self {
        self.episodes = episodes;
        self
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    pub fn with_reward(mut self, reward: RewardShaping) -> Self {
        self.reward = reward;
        self
    }

    pub fn with_exploration(mut self, exploration: ExplorationSchedule) -> Self {
        self.exploration = exploration;
        self
    }

    pub fn with_learning_rate(mut self, learning_rate: LearningRateSchedule) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_resample_layout(mut self, resample: bool) -> Self {
        self.resample_layout = resample;
        self
    }

    /// Check every parameter before any state is built.
    pub fn validate(&self) -> Result<()> {
        if self.grid_size < 2 {
            return Err(Error::GridTooSmall {
                size: self.grid_size,
            });
        }
        self.hazards.validate(self.grid_size)?;
        self.trainer_config().validate()?;
        self.exploration.validate()?;
        self.learning_rate.validate()?;
        Ok(())
    }

    pub fn trainer_config(&self) -> TrainerConfig {
        TrainerConfig {
            gamma: self.gamma,
            max_steps: self.max_steps,
            reward: self.reward,
            resample_layout: self.resample_layout,
        }
    }

    pub fn training_config(&self) -> TrainingConfig {
        TrainingConfig {
            episodes: self.episodes,
            exploration: self.exploration,
            learning_rate: self.learning_rate,
        }
    }

    /// Build the grid, seeded from `seed` when one is set.
    pub fn build_world(&self) -> Result<GridWorld> {
        let world = GridWorld::with_layout(self.grid_size, self.hazards.clone())?;
        Ok(match self.seed {
            Some(seed) => world.with_seed(seed),
            None => world,
        })
    }

    /// Build a trainer over a zeroed table.
    ///
    /// The exploration RNG gets `seed + 1` so it does not replay the layout draws.
    pub fn build_trainer(&self) -> Result<Trainer> {
        self.validate()?;
        let trainer = Trainer::for_world(self.build_world()?, self.trainer_config())?;
        Ok(match self.seed {
            Some(seed) => trainer.with_seed(seed.wrapping_add(1)),
            None => trainer,
        })
    }

    /// Load a configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| Error::Io {
            operation: format!("open config {}", path.display()),
            source,
        })?;
        let config = serde_json::from_reader(file)?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}
