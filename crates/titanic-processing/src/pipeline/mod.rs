//! Pipeline module.
//!
//! This module provides the table pipeline, its stage tracking and
//! progress reporting.

mod builder;
pub mod progress;
mod state;

pub use builder::{TablePipeline, TablePipelineBuilder};
pub use progress::{ClosureProgressReporter, PipelineStage, ProgressReporter, ProgressUpdate};
pub use state::{TableStage, TableState};
