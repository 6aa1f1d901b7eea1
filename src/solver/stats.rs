use prettytable::{Cell, Row, Table};
use serde::Serialize;

use crate::board::PropagationStats;

/// Counters for one `solve()` run.
#[derive(Debug, Default, Clone, Copy, Serialize)]
pub struct SearchStats {
    /// Search levels entered (one per cell visit, including re-visits
    /// after a backjump).
    pub nodes_visited: u64,
    /// Candidates abandoned chronologically.
    pub backtracks: u64,
    /// Conflicts resolved through the tracker.
    pub backjumps: u64,
}

/// Everything the CLI reports about one puzzle: the line it read, the
/// solution it found (if any), and the effort it took.
#[derive(Debug, Clone, Serialize)]
pub struct PuzzleReport {
    pub index: usize,
    pub puzzle: String,
    pub solution: Option<String>,
    pub solved: bool,
    pub stats: SearchStats,
    pub propagation: PropagationStats,
    pub time_spent_micros: u128,
}

pub fn render_report_table(reports: &[PuzzleReport]) -> String {
    let mut table = Table::new();
    table.add_row(Row::new(vec![
        Cell::new("Puzzle"),
        Cell::new("Solved"),
        Cell::new("Nodes"),
        Cell::new("Backtracks"),
        Cell::new("Backjumps"),
        Cell::new("Eliminations"),
        Cell::new("Pair Eliminations"),
        Cell::new("Passes"),
        Cell::new("Total Time (ms)"),
    ]));

    for report in reports {
        table.add_row(Row::new(vec![
            Cell::new(&report.index.to_string()),
            Cell::new(if report.solved { "yes" } else { "no" }),
            Cell::new(&report.stats.nodes_visited.to_string()),
            Cell::new(&report.stats.backtracks.to_string()),
            Cell::new(&report.stats.backjumps.to_string()),
            Cell::new(&report.propagation.eliminations.to_string()),
            Cell::new(&report.propagation.naked_pair_eliminations.to_string()),
            Cell::new(&report.propagation.passes.to_string()),
            Cell::new(&format!("{:.2}", report.time_spent_micros as f64 / 1000.0)),
        ]));
    }

    table.to_string()
}
