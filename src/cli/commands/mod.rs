//! Subcommands of the `pingouin` binary

pub mod export;
pub mod play;
pub mod train;
