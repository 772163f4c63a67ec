//! World Module
//!
//! Frame pacing for the fixed-timestep simulation and the queue that defers
//! destructive edits until after each physics step.

pub mod queue;
pub mod stepper;

pub use queue::PostStepQueue;
pub use stepper::FixedTimestepper;
