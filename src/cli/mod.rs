//! CLI infrastructure for the grid-world trainer
//!
//! This module provides the command-line interface for training an agent,
//! stepping through the grid by hand, and exporting the learned table.

pub mod commands;
pub mod config;
pub mod output;
