//! Conflict-directed backjumping search.
//!
//! Depth-first search over the board's unassigned cells where every reported
//! conflict feeds a tracker mapping each search cell to the cell it most
//! recently collided with. When an assignment fails and the tracker knows a
//! culprit, the failed value is excluded and the search restarts from the
//! scan front instead of unwinding one level chronologically; a conflict
//! raised while excluding crosses to the caller's frame and is resolved
//! there, which is what lets a single collision unwind several levels at
//! once.

use std::collections::HashMap;

use tracing::debug;

use crate::{
    board::{Board, Coord, Digit},
    error::{Conflict, SolverError},
    solver::{stats::SearchStats, strategy::SearchStrategy},
};

/// Maps each search cell to the cell it most recently collided with.
///
/// Owned by one solver and reset at the start of every top-level solve;
/// entries accumulate as conflicts surface during the search.
#[derive(Debug, Default)]
pub struct ConflictTracker {
    targets: HashMap<Coord, Coord>,
}

impl ConflictTracker {
    /// Records both coordinates of `conflict` against `current` (skipping
    /// `current` itself, so the collision partner wins) and returns the
    /// jump target now on record for `current`, if any.
    pub fn resolve(&mut self, current: Coord, conflict: &Conflict) -> Option<Coord> {
        for candidate in [conflict.cell, conflict.with] {
            if candidate != current {
                self.targets.insert(current, candidate);
            }
        }
        self.target_for(current)
    }

    /// The recorded jump target for `cell`. Cells never involved in a
    /// conflict have none, which the search treats as an ordinary
    /// chronological unwind.
    pub fn target_for(&self, cell: Coord) -> Option<Coord> {
        self.targets.get(&cell).copied()
    }

    pub fn clear(&mut self) {
        self.targets.clear();
    }
}

#[derive(Debug, Default)]
pub struct BackjumpingSolver {
    tracker: ConflictTracker,
}

impl BackjumpingSolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// One search level. Visits the first unassigned cell in scan order and
    /// tries its candidates in ascending order.
    ///
    /// `Ok(true)` means the board is fully assigned. `Ok(false)` means the
    /// level exhausted its candidates; the caller unwinds chronologically.
    /// `Err` carries a conflict that hit while excluding a doomed value:
    /// this level cannot absorb it, so it crosses to the caller, whose
    /// tracker decides how far the unwind continues.
    fn search(&mut self, board: &mut Board, stats: &mut SearchStats) -> Result<bool, Conflict> {
        'level: loop {
            let Some(cell) = board.first_unassigned() else {
                return Ok(true);
            };
            stats.nodes_visited += 1;
            let candidates: Vec<Digit> = board.variable(cell).domain().iter().copied().collect();

            for value in candidates {
                let checkpoint = board.checkpoint();
                let conflict = match board.assign_value(cell, value) {
                    Ok(()) => match self.search(board, stats) {
                        Ok(true) => return Ok(true),
                        Ok(false) => {
                            board.rollback_to(checkpoint);
                            stats.backtracks += 1;
                            None
                        }
                        Err(crossed) => {
                            board.rollback_to(checkpoint);
                            Some(crossed)
                        }
                    },
                    Err(SolverError::Violation(conflict)) => Some(conflict),
                    // A stale candidate, pruned since this visit's snapshot.
                    Err(_) => continue,
                };

                if let Some(conflict) = conflict {
                    if let Some(target) = self.tracker.resolve(cell, &conflict) {
                        debug!(from = %cell, to = %target, value, "backjump");
                        stats.backjumps += 1;
                        board.exclude(cell, value)?;
                        continue 'level;
                    }
                    stats.backtracks += 1;
                }

                // The failed value is not offered again at this level; the
                // exclusion is journaled, so an ancestor's rollback
                // re-admits it.
                board.exclude(cell, value)?;
                if board.variable(cell).is_assigned() {
                    continue 'level;
                }
            }

            return Ok(false);
        }
    }
}

impl SearchStrategy for BackjumpingSolver {
    fn solve(&mut self, board: &mut Board) -> (bool, SearchStats) {
        let mut stats = SearchStats::default();
        self.tracker.clear();
        let baseline = board.checkpoint();
        match self.search(board, &mut stats) {
            Ok(true) => (true, stats),
            Ok(false) => {
                board.rollback_to(baseline);
                (false, stats)
            }
            Err(conflict) => {
                debug!(cell = %conflict.cell, with = %conflict.with, "conflict escaped the search");
                board.rollback_to(baseline);
                (false, stats)
            }
        }
    }
}
