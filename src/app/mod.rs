//! Application layer: assembles a training session from configuration.
//!
//! [`SessionConfig`] is the single place where grid, trainer and schedule settings
//! come together. The CLI fills it from a JSON file and flags, then asks it to build
//! the world and the trainer.

pub mod config;

pub use config::SessionConfig;
