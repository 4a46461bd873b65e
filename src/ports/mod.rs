//! Ports (trait boundaries) for external collaborators.
//!
//! The training loop only knows these traits; progress bars, file exports and
//! metric collectors are adapters in [`crate::pipeline::observers`].

pub mod observer;

pub use observer::Observer;
