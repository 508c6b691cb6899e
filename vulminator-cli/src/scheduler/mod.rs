//! Scheduler layer for the CLI
//!
//! This layer submits runs to the backend and follows them until they
//! finish. It manages the lifecycle of a run from submission to its
//! terminal status.

pub mod poller;
pub mod submitter;
pub mod tracker;

pub use poller::PollExit;
pub use tracker::RunTracker;
