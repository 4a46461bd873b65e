//! Per-episode exploration and learning-rate schedules
//!
//! Schedules are pure functions of the episode index. The training driver asks for
//! the values once per episode and hands them to the trainer.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Exploration rate ε as a function of the episode index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExplorationSchedule {
    /// ε_i = max(floor, start − slope · i)
    Linear { start: f64, slope: f64, floor: f64 },
    /// ε_i = floor + amplitude · exp(−rate · i)
    Exponential {
        floor: f64,
        amplitude: f64,
        rate: f64,
    },
    /// The same ε for every episode.
    Constant { epsilon: f64 },
}

impl Default for ExplorationSchedule {
    fn default() -> Self {
        ExplorationSchedule::Linear {
            start: 1.0,
            slope: 0.001,
            floor: 0.1,
        }
    }
}

impl ExplorationSchedule {
    /// Slow exponential decay toward 0.01.
    pub fn exponential() -> Self {
        ExplorationSchedule::Exponential {
            floor: 0.01,
            amplitude: 0.999,
            rate: 0.0001,
        }
    }

    /// ε for episode `episode`, always within [0, 1].
    pub fn epsilon(&self, episode: usize) -> f64 {
        let i = episode as f64;
        let raw = match *self {
            ExplorationSchedule::Linear { start, slope, floor } => (start - slope * i).max(floor),
            ExplorationSchedule::Exponential {
                floor,
                amplitude,
                rate,
            } => floor + amplitude * (-rate * i).exp(),
            ExplorationSchedule::Constant { epsilon } => epsilon,
        };
        raw.clamp(0.0, 1.0)
    }

    pub fn validate(&self) -> Result<()> {
        let params: Vec<(&str, f64)> = match *self {
            ExplorationSchedule::Linear { start, slope, floor } => {
                vec![("start", start), ("slope", slope), ("floor", floor)]
            }
            ExplorationSchedule::Exponential {
                floor,
                amplitude,
                rate,
            } => vec![("floor", floor), ("amplitude", amplitude), ("rate", rate)],
            ExplorationSchedule::Constant { epsilon } => vec![("epsilon", epsilon)],
        };
        for (name, value) in params {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::config(format!(
                    "exploration {name} must be finite and non-negative, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Learning rate α decayed geometrically per episode with a floor.
///
/// α_0 = initial, α_i = max(floor, α_{i−1} · factor)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LearningRateSchedule {
    pub initial: f64,
    pub factor: f64,
    pub floor: f64,
}

impl Default for LearningRateSchedule {
    fn default() -> Self {
        Self::new(0.3)
    }
}

impl LearningRateSchedule {
    /// Default decay (×0.999 per episode, floor 0.05) from `initial`.
    pub fn new(initial: f64) -> Self {
        Self {
            initial,
            factor: 0.999,
            floor: 0.05,
        }
    }

    /// α for episode `episode`.
    ///
    /// Equivalent to applying the recurrence `episode` times: with `factor` ≤ 1 the
    /// product is monotone, so the floor can be applied once at the end.
    pub fn alpha(&self, episode: usize) -> f64 {
        if episode == 0 {
            return self.initial;
        }
        let exponent = i32::try_from(episode).unwrap_or(i32::MAX);
        (self.initial * self.factor.powi(exponent)).max(self.floor)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.initial > 0.0 && self.initial <= 1.0) {
            return Err(Error::config(format!(
                "initial learning rate must be in (0, 1], got {}",
                self.initial
            )));
        }
        if !(self.factor > 0.0 && self.factor <= 1.0) {
            return Err(Error::config(format!(
                "learning rate decay factor must be in (0, 1], got {}",
                self.factor
            )));
        }
        if !(self.floor >= 0.0 && self.floor <= 1.0) {
            return Err(Error::config(format!(
                "learning rate floor must be in [0, 1], got {}",
                self.floor
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_schedule() {
        let schedule = ExplorationSchedule::default();
        assert_eq!(schedule.epsilon(0), 1.0);
        assert!((schedule.epsilon(500) - 0.5).abs() < 1e-12);
        assert!((schedule.epsilon(900) - 0.1).abs() < 1e-12);
        assert_eq!(schedule.epsilon(5_000), 0.1);
    }

    #[test]
    fn test_exponential_schedule_is_clamped() {
        let schedule = ExplorationSchedule::exponential();
        // 0.01 + 0.999 slightly exceeds 1 at episode 0.
        assert_eq!(schedule.epsilon(0), 1.0);
        assert!(schedule.epsilon(100_000) < 0.02);
        assert!(schedule.epsilon(10) > schedule.epsilon(20));
    }

    #[test]
    fn test_learning_rate_matches_recurrence() {
        let schedule = LearningRateSchedule::new(0.9);
        let mut alpha = schedule.initial;
        for episode in 0..4_000 {
            assert!((schedule.alpha(episode) - alpha).abs() < 1e-9, "episode {episode}");
            alpha = (alpha * schedule.factor).max(schedule.floor);
        }
        assert_eq!(schedule.alpha(10_000), 0.05);
    }

    #[test]
    fn test_validation() {
        assert!(LearningRateSchedule::new(0.0).validate().is_err());
        assert!(LearningRateSchedule::new(1.5).validate().is_err());
        assert!(LearningRateSchedule::new(0.3).validate().is_ok());
        assert!(
            ExplorationSchedule::Constant { epsilon: f64::NAN }
                .validate()
                .is_err()
        );
        assert!(ExplorationSchedule::default().validate().is_ok());
    }
}
