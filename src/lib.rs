//! Tabular Q-learning on a square grid with hazards
//!
//! This crate provides:
//! - A grid environment with a start cell, a goal corner and hazard cells
//! - A dense action-value table with ε-greedy selection and one-step updates
//! - A per-episode trainer with configurable reward shaping
//! - Training pipelines with pluggable observers
//! - A CLI for training, interactive play and table export

pub mod app;
pub mod cli;
pub mod error;
pub mod export;
pub mod gridworld;
pub mod pipeline;
pub mod ports;
pub mod q_learning;

pub use error::{Error, Result};
pub use gridworld::{Action, GridWorld, Position};
pub use q_learning::{ActionValueTable, Trainer};
