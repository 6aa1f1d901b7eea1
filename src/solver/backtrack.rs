//! Chronological backtracking, the comparison baseline.

use crate::{
    board::{Board, Digit},
    solver::{stats::SearchStats, strategy::SearchStrategy},
};

/// Plain depth-first search: first unassigned cell in scan order,
/// candidates in ascending order, one level of unwind per failure. No
/// conflict tracking; a failed candidate is rolled back and the next one
/// tried, so conflicts never cross frames.
#[derive(Debug, Default)]
pub struct BacktrackingSolver;

impl BacktrackingSolver {
    pub fn new() -> Self {
        Self
    }

    fn search(&mut self, board: &mut Board, stats: &mut SearchStats) -> bool {
        let Some(cell) = board.first_unassigned() else {
            return true;
        };
        stats.nodes_visited += 1;
        let candidates: Vec<Digit> = board.variable(cell).domain().iter().copied().collect();

        for value in candidates {
            let checkpoint = board.checkpoint();
            if board.assign_value(cell, value).is_ok() {
                if self.search(board, stats) {
                    return true;
                }
                board.rollback_to(checkpoint);
            }
            stats.backtracks += 1;
        }

        false
    }
}

impl SearchStrategy for BacktrackingSolver {
    fn solve(&mut self, board: &mut Board) -> (bool, SearchStats) {
        let mut stats = SearchStats::default();
        let solved = self.search(board, &mut stats);
        (solved, stats)
    }
}
