//! Shared configuration flags for CLI commands

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use crate::{
    app::SessionConfig,
    gridworld::HazardLayout,
    q_learning::{ExplorationSchedule, RewardShaping},
};

/// Exploration schedule families selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExplorationKind {
    /// 1.0 falling by 0.001 per episode to 0.1
    Linear,
    /// 0.01 + 0.999 * exp(-0.0001 * episode)
    Exponential,
}

impl From<ExplorationKind> for ExplorationSchedule {
    fn from(kind: ExplorationKind) -> Self {
        match kind {
            ExplorationKind::Linear => ExplorationSchedule::default(),
            ExplorationKind::Exponential => ExplorationSchedule::exponential(),
        }
    }
}

/// Session flags shared by every command that trains
#[derive(Args, Debug, Clone, Default)]
pub struct SessionArgs {
    /// JSON session file; flags given here override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Side length of the square grid
    #[arg(long)]
    pub size: Option<usize>,

    /// Number of training episodes
    #[arg(long, short = 'e')]
    pub episodes: Option<usize>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Initial learning rate (decays by 0.999 per episode to 0.05)
    #[arg(long)]
    pub alpha: Option<f64>,

    /// Discount factor
    #[arg(long)]
    pub gamma: Option<f64>,

    /// Step cap per episode
    #[arg(long)]
    pub max_steps: Option<usize>,

    /// Reward shaping (step-penalty, sparse, exploration)
    #[arg(long)]
    pub reward: Option<String>,

    /// Exploration schedule
    #[arg(long, value_enum)]
    pub exploration: Option<ExplorationKind>,

    /// Train on a grid without hazards
    #[arg(long)]
    pub no_hazards: bool,

    /// Draw a new hazard layout at the start of every episode
    #[arg(long)]
    pub resample_layout: bool,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

impl SessionArgs {
    /// Build the session configuration: file (or defaults) first, then flags.
    pub fn resolve(&self) -> Result<SessionConfig> {
        let mut config = match &self.config {
            Some(path) => SessionConfig::from_json_file(path)
                .with_context(|| format!("failed to load session config {}", path.display()))?,
            None => SessionConfig::default(),
        };

        if let Some(size) = self.size {
            config.grid_size = size;
        }
        if let Some(episodes) = self.episodes {
            config.episodes = episodes;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(alpha) = self.alpha {
            config.learning_rate.initial = alpha;
        }
        if let Some(gamma) = self.gamma {
            config.gamma = gamma;
        }
        if let Some(max_steps) = self.max_steps {
            config.max_steps = max_steps;
        }
        if let Some(reward) = &self.reward {
            config.reward = reward.parse::<RewardShaping>()?;
        }
        if let Some(kind) = self.exploration {
            config.exploration = kind.into();
        }
        if self.no_hazards {
            config.hazards = HazardLayout::empty();
        }
        if self.resample_layout {
            config.resample_layout = true;
        }

        config.validate().context("invalid session configuration")?;
        Ok(config)
    }

    pub fn show_progress(&self) -> bool {
        !self.no_progress
    }
}
