//! Background Tasks Module
//!
//! Contains background tasks that run periodically during proxy operation.
//!
//! # Tasks
//! - Stats report: logs cache statistics at a configured interval

mod stats_report;

pub use stats_report::spawn_stats_task;
