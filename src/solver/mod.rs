//! Search strategies over a [`Board`](crate::board::Board), selected
//! through the [`SearchStrategy`] capability.

pub mod backjump;
pub mod backtrack;
pub mod stats;
pub mod strategy;

pub use backjump::{BackjumpingSolver, ConflictTracker};
pub use backtrack::BacktrackingSolver;
pub use stats::{render_report_table, PuzzleReport, SearchStats};
pub use strategy::{strategy_for, Algorithm, SearchStrategy};
