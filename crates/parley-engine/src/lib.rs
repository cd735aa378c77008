//! Turn orchestration: the bounded state machine that appends a user
//! message, drives repeated round trips with the model service, interleaves
//! tool execution, and checkpoints every intermediate state so a crash
//! mid-turn leaves a resumable transcript rather than a corrupted one.

pub mod engine;
pub mod error;
pub mod transcript;

pub use engine::{EngineConfig, TurnEngine, TurnOptions, TurnOutcome};
pub use error::TurnError;
