//! Grid environment: geometry, hazard layouts and the move model

pub mod layout;
pub mod position;
pub mod world;

pub use layout::HazardLayout;
pub use position::{Action, Position};
pub use world::{GridWorld, Signal, Transition};
