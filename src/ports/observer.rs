//! Observer port - abstraction for training observation and data collection
//!
//! This port defines the interface for observing training events,
//! allowing composable data collection without coupling the training
//! loop to specific output formats or metrics.

use crate::{
    Result,
    q_learning::{EpisodeReport, StepRecord},
};

/// Observer trait for monitoring training
///
/// Observers can be composed to collect different types of data during training:
/// progress bars, JSONL export, aggregate metrics.
///
/// # Event Sequence
///
/// 1. `on_training_start(total_episodes)` - Once at the beginning
/// 2. For each episode:
///    - `on_episode_start(episode, epsilon, alpha)`
///    - `on_step(episode, record)` - After each learning update
///    - `on_episode_end(episode, report)`
/// 3. `on_training_end()` - Once at the end
///
/// # Examples
///
/// ```no_run
/// use pingouin::{
///     ports::Observer,
///     q_learning::{EpisodeOutcome, EpisodeReport},
/// };
///
/// struct GoalCounter {
///     goals: usize,
/// }
///
/// impl Observer for GoalCounter {
///     fn on_episode_end(
///         &mut self,
///         _episode: usize,
///         report: &EpisodeReport,
///     ) -> pingouin::Result<()> {
///         if report.outcome == EpisodeOutcome::Goal {
///             self.goals += 1;
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    /// Called once before the first episode.
    fn on_training_start(&mut self, _total_episodes: usize) -> Result<()> {
        Ok(())
    }

    /// Called when an episode starts, with the rates the driver chose for it.
    fn on_episode_start(&mut self, _episode: usize, _epsilon: f64, _alpha: f64) -> Result<()> {
        Ok(())
    }

    /// Called after every learning step.
    ///
    /// Only invoked when [`Observer::wants_steps`] returns `true`, so observers
    /// that only care about episodes cost nothing per step.
    fn on_step(&mut self, _episode: usize, _record: &StepRecord) -> Result<()> {
        Ok(())
    }

    /// Called when an episode ends.
    fn on_episode_end(&mut self, _episode: usize, _report: &EpisodeReport) -> Result<()> {
        Ok(())
    }

    /// Called once after the last episode.
    ///
    /// Use this to finalize outputs, close files, or display summaries.
    fn on_training_end(&mut self) -> Result<()> {
        Ok(())
    }

    /// Whether this observer wants per-step callbacks.
    fn wants_steps(&self) -> bool {
        false
    }
}
