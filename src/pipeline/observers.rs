//! Observer adapters for training pipelines
//!
//! Observers allow composable data collection during training without coupling
//! the episode loop to specific output formats.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use crate::{
    Result,
    gridworld::{Action, Position, Signal},
    ports::Observer,
    q_learning::{EpisodeOutcome, EpisodeReport, StepRecord},
};

/// Observation of a single learning step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepObservation {
    /// Step number within the episode (1-based)
    pub step: usize,
    /// Cell the agent acted from
    pub from: Position,
    /// Action taken
    pub action: Action,
    /// Cell the move reached
    pub landing: Position,
    /// What the agent ran into
    pub signal: Signal,
    /// Shaped reward
    pub reward: f64,
    /// Value of (from, action) after the update
    pub value_after: f64,
}

impl From<&StepRecord> for StepObservation {
    fn from(record: &StepRecord) -> Self {
        Self {
            step: record.step,
            from: record.transition.from,
            action: record.transition.action,
            landing: record.transition.landing,
            signal: record.transition.signal,
            reward: record.reward,
            value_after: record.value_after,
        }
    }
}

/// Complete observation of a training episode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeObservation {
    pub episode: usize,
    pub outcome: EpisodeOutcome,
    pub steps: usize,
    pub hazard_hits: usize,
    pub total_reward: f64,
    pub epsilon: f64,
    pub alpha: f64,
    /// Per-step detail, present only when step recording is enabled
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trajectory: Vec<StepObservation>,
}

/// Progress bar observer - Shows training progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    goals: usize,
    step_caps: usize,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            goals: 0,
            step_caps: 0,
        }
    }

    fn message(&self) -> String {
        format!("goal:{} cap:{}", self.goals, self.step_caps)
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        let pb = ProgressBar::new(total_episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes ({msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_episode_end(&mut self, episode: usize, report: &EpisodeReport) -> Result<()> {
        match report.outcome {
            EpisodeOutcome::Goal => self.goals += 1,
            EpisodeOutcome::StepCap => self.step_caps += 1,
        }

        if let Some(pb) = &self.progress_bar {
            pb.set_position(episode as u64 + 1);
            pb.set_message(self.message());
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.message());
        }
        Ok(())
    }
}

/// Metrics observer - Tracks training metrics
#[derive(Debug, Default)]
pub struct MetricsObserver {
    episodes: usize,
    goals: usize,
    hazard_hits: usize,
    step_counts: Vec<usize>,
    first_goal: Option<usize>,
}

/// Summary of training metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub episodes: usize,
    pub goals: usize,
    pub hazard_hits: usize,
    pub goal_rate: f64,
    pub avg_steps: f64,
    /// Mean steps over the last `window` episodes
    pub recent_avg_steps: f64,
    pub first_goal: Option<usize>,
}

impl MetricsObserver {
    /// Create a new metrics observer
    pub fn new() -> Self {
        Self::default()
    }

    /// Fraction of episodes that reached the goal
    pub fn goal_rate(&self) -> f64 {
        if self.episodes == 0 {
            0.0
        } else {
            self.goals as f64 / self.episodes as f64
        }
    }

    /// Mean episode length
    pub fn avg_steps(&self) -> f64 {
        mean(&self.step_counts)
    }

    /// Mean episode length over the most recent `window` episodes
    pub fn recent_avg_steps(&self, window: usize) -> f64 {
        let start = self.step_counts.len().saturating_sub(window);
        mean(&self.step_counts[start..])
    }

    /// Get metrics summary
    pub fn summary(&self, window: usize) -> MetricsSummary {
        MetricsSummary {
            episodes: self.episodes,
            goals: self.goals,
            hazard_hits: self.hazard_hits,
            goal_rate: self.goal_rate(),
            avg_steps: self.avg_steps(),
            recent_avg_steps: self.recent_avg_steps(window),
            first_goal: self.first_goal,
        }
    }
}

fn mean(values: &[usize]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<usize>() as f64 / values.len() as f64
    }
}

impl Observer for MetricsObserver {
    fn on_episode_end(&mut self, episode: usize, report: &EpisodeReport) -> Result<()> {
        self.episodes += 1;
        self.hazard_hits += report.hazard_hits;
        self.step_counts.push(report.steps);
        if report.outcome == EpisodeOutcome::Goal {
            self.goals += 1;
            self.first_goal.get_or_insert(episode);
        }
        Ok(())
    }
}

/// JSONL observer - Exports one JSON object per episode
pub struct JsonlObserver {
    writer: BufWriter<File>,
    record_steps: bool,
    current_steps: Vec<StepObservation>,
}

impl JsonlObserver {
    /// Create a new JSONL observer
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
            record_steps: false,
            current_steps: Vec::new(),
        })
    }

    /// Also write every step of every episode.
    pub fn with_steps(mut self) -> Self {
        self.record_steps = true;
        self
    }
}

impl Observer for JsonlObserver {
    fn on_episode_start(&mut self, _episode: usize, _epsilon: f64, _alpha: f64) -> Result<()> {
        self.current_steps.clear();
        Ok(())
    }

    fn on_step(&mut self, _episode: usize, record: &StepRecord) -> Result<()> {
        self.current_steps.push(StepObservation::from(record));
        Ok(())
    }

    fn on_episode_end(&mut self, episode: usize, report: &EpisodeReport) -> Result<()> {
        let observation = EpisodeObservation {
            episode,
            outcome: report.outcome,
            steps: report.steps,
            hazard_hits: report.hazard_hits,
            total_reward: report.total_reward,
            epsilon: report.epsilon,
            alpha: report.alpha,
            trajectory: std::mem::take(&mut self.current_steps),
        };

        // Write as JSONL (one JSON object per line)
        serde_json::to_writer(&mut self.writer, &observation)?;
        writeln!(&mut self.writer)?;
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn wants_steps(&self) -> bool {
        self.record_steps
    }
}
