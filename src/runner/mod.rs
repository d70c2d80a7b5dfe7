//! Task runner module
//!
//! Launches independent move operations in parallel and waits for all of
//! them to finish.

mod engine;

pub use engine::{MoveSpec, TaskRunner};
