//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `RunState`: the lifecycle of a crawl run and the reason it stopped
//! - `ErrorList`: recovered per-page errors collected during the run

mod errors;
mod run_state;

// Re-export main types
pub use errors::{ErrorKind, ErrorList, ErrorRecord, SOURCE_LABEL};
pub use run_state::{RunState, StopReason};
