//! The 9×9 board: 81 variables, constraint propagation to fixpoint, and the
//! undo journal that makes trial assignments fully reversible.

pub mod variable;

use std::fmt;

use serde::Serialize;
use tracing::{debug, trace};

use crate::error::{Conflict, SolverError};

pub use variable::{full_domain, Coord, Digit, Domain, Variable, BOX_SIZE, GRID_SIZE};

/// A plain 9×9 grid of digits; `0` is a blank.
pub type Grid = [[Digit; GRID_SIZE]; GRID_SIZE];

/// A position in the board's undo journal, taken with [`Board::checkpoint`]
/// and handed back to [`Board::rollback_to`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint(usize);

/// Cumulative propagation effort counters. These track work, not state:
/// rollbacks do not decrement them.
#[derive(Debug, Default, Clone, Copy, Serialize)]
pub struct PropagationStats {
    pub passes: u64,
    pub eliminations: u64,
    pub naked_pair_eliminations: u64,
}

/// The board: a 9×9 array of [`Variable`]s plus a global undo journal.
///
/// Every domain change made through the board pushes the touched variable's
/// outgoing domain onto that variable's own history and appends the
/// coordinate to the journal. Rolling back to a checkpoint replays the
/// journal tail in reverse, popping each history in global LIFO order, so a
/// failed trial assignment leaves no residue anywhere on the grid.
#[derive(Debug)]
pub struct Board {
    cells: [[Variable; GRID_SIZE]; GRID_SIZE],
    journal: Vec<Coord>,
    stats: PropagationStats,
}

impl Board {
    /// Builds a board from a grid of givens (`0` = blank) and propagates to
    /// fixpoint.
    ///
    /// Inconsistent givens fail with a constraint violation naming the two
    /// offending cells; a digit outside `1..=9` fails with a domain error.
    /// The returned board's journal is empty: construction is the baseline
    /// state, and only changes made after it are journaled.
    pub fn from_givens(givens: &Grid) -> Result<Self, SolverError> {
        let mut board = Board {
            cells: std::array::from_fn(|row| {
                std::array::from_fn(|col| Variable::new(Coord::new(row, col)))
            }),
            journal: Vec::new(),
            stats: PropagationStats::default(),
        };
        for (row, values) in givens.iter().enumerate() {
            for (col, &value) in values.iter().enumerate() {
                if value != 0 {
                    board.cells[row][col].assign(value)?;
                }
            }
        }
        board.propagate()?;
        board.journal.clear();
        Ok(board)
    }

    pub fn variable(&self, at: Coord) -> &Variable {
        &self.cells[at.row][at.col]
    }

    /// Coordinates of every unassigned cell, in row-major scan order. The
    /// order is part of the contract: the solver visits cells in it.
    pub fn unassigned_coordinates(&self) -> Vec<Coord> {
        let mut coords = Vec::new();
        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                if !self.cells[row][col].is_assigned() {
                    coords.push(Coord::new(row, col));
                }
            }
        }
        coords
    }

    /// First unassigned cell in scan order, without allocating.
    pub fn first_unassigned(&self) -> Option<Coord> {
        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                if !self.cells[row][col].is_assigned() {
                    return Some(Coord::new(row, col));
                }
            }
        }
        None
    }

    pub fn is_complete(&self) -> bool {
        self.first_unassigned().is_none()
    }

    /// Assigned cells as digits, blanks as `0`.
    pub fn to_grid(&self) -> Grid {
        std::array::from_fn(|row| {
            std::array::from_fn(|col| self.cells[row][col].singleton_value().unwrap_or(0))
        })
    }

    pub fn stats(&self) -> PropagationStats {
        self.stats
    }

    /// Marks the current journal position.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.journal.len())
    }

    /// Undoes every domain change journaled after `checkpoint`, most recent
    /// first. Checkpoints must be used LIFO: rolling back to a position the
    /// journal has already been cut below is a caller bug.
    pub fn rollback_to(&mut self, checkpoint: Checkpoint) {
        for at in self.journal.split_off(checkpoint.0).into_iter().rev() {
            self.cells[at.row][at.col].restore(None);
        }
    }

    /// Trial assignment: collapse the cell to `value`, then propagate to
    /// fixpoint.
    ///
    /// On any failure every change made by the attempt is rolled back
    /// before the error surfaces, so the board never keeps a dead cell or
    /// a half-propagated state from a failed trial.
    pub fn assign_value(&mut self, at: Coord, value: Digit) -> Result<(), SolverError> {
        let checkpoint = self.checkpoint();
        self.cells[at.row][at.col].assign(value)?;
        self.journal.push(at);
        trace!(cell = %at, value, "trial assignment");
        if let Err(conflict) = self.propagate() {
            self.rollback_to(checkpoint);
            return Err(conflict.into());
        }
        Ok(())
    }

    /// Journaled removal of a failed candidate, followed by re-propagation.
    ///
    /// Removing the held value of an assigned cell would empty its domain;
    /// that is a conflict of the cell with itself, and the board is left
    /// untouched. A conflict from re-propagation is returned as-is; the
    /// journal still holds this call's changes, so an enclosing rollback
    /// undoes them together with the rest of the attempt.
    pub fn exclude(&mut self, at: Coord, value: Digit) -> Result<(), Conflict> {
        if self.cells[at.row][at.col].singleton_value() == Some(value) {
            return Err(Conflict { cell: at, with: at });
        }
        self.narrow_cell(at, value);
        self.propagate()
    }

    /// Runs elimination and naked pairs until a full pass changes nothing.
    ///
    /// Per pass: every assigned cell (row-major) eliminates its value from
    /// the unassigned peers of its row and column, then of its box, where
    /// box-mates sharing the source's exact row or column are skipped since
    /// the row/column pass owns them and one physical conflict must not be
    /// raised along two axes in a single call. Naked pairs run once per
    /// pass over all 27 units.
    pub fn propagate(&mut self) -> Result<(), Conflict> {
        loop {
            self.stats.passes += 1;
            let mut changed = false;
            for row in 0..GRID_SIZE {
                for col in 0..GRID_SIZE {
                    let at = Coord::new(row, col);
                    if let Some(value) = self.cells[row][col].singleton_value() {
                        changed |= self.eliminate_from_row_col(at, value)?;
                        changed |= self.eliminate_from_box(at, value)?;
                    }
                }
            }
            changed |= self.apply_naked_pairs();
            if !changed {
                return Ok(());
            }
        }
    }

    fn eliminate_from_row_col(&mut self, at: Coord, value: Digit) -> Result<bool, Conflict> {
        let mut changed = false;
        for i in 0..GRID_SIZE {
            if i != at.col {
                changed |= self.eliminate_at(at, Coord::new(at.row, i), value)?;
            }
            if i != at.row {
                changed |= self.eliminate_at(at, Coord::new(i, at.col), value)?;
            }
        }
        Ok(changed)
    }

    fn eliminate_from_box(&mut self, at: Coord, value: Digit) -> Result<bool, Conflict> {
        let origin = at.box_origin();
        let mut changed = false;
        for row in origin.row..origin.row + BOX_SIZE {
            for col in origin.col..origin.col + BOX_SIZE {
                if row == at.row || col == at.col {
                    continue;
                }
                changed |= self.eliminate_at(at, Coord::new(row, col), value)?;
            }
        }
        Ok(changed)
    }

    /// Eliminates `value` from one peer of `source`. An unassigned peer is
    /// narrowed; a peer already holding the same value is a conflict.
    fn eliminate_at(&mut self, source: Coord, peer: Coord, value: Digit) -> Result<bool, Conflict> {
        match self.cells[peer.row][peer.col].singleton_value() {
            Some(held) if held == value => {
                debug!(cell = %source, with = %peer, value, "constraint violation");
                Err(Conflict {
                    cell: source,
                    with: peer,
                })
            }
            Some(_) => Ok(false),
            None => Ok(self.narrow_cell(peer, value)),
        }
    }

    fn apply_naked_pairs(&mut self) -> bool {
        let mut changed = false;
        for unit in all_units() {
            changed |= self.naked_pairs_in_unit(&unit);
        }
        changed
    }

    /// Two cells of a unit with the identical 2-candidate domain `{a, b}`
    /// claim those digits: every other unassigned cell of the unit whose
    /// domain differs from `{a, b}` loses both.
    fn naked_pairs_in_unit(&mut self, unit: &[Coord; GRID_SIZE]) -> bool {
        let pairs: Vec<(Coord, Domain)> = unit
            .iter()
            .map(|&at| (at, self.cells[at.row][at.col].domain().clone()))
            .filter(|(_, domain)| domain.len() == 2)
            .collect();

        let mut changed = false;
        for (i, (_, domain)) in pairs.iter().enumerate() {
            for (_, other) in &pairs[i + 1..] {
                if domain != other {
                    continue;
                }
                for &at in unit.iter() {
                    let cell = &self.cells[at.row][at.col];
                    if cell.is_assigned() || cell.domain() == domain {
                        continue;
                    }
                    let mut narrowed = cell.domain().clone();
                    for value in domain.iter() {
                        narrowed.remove(value);
                    }
                    if narrowed.len() < cell.domain().len() {
                        self.set_cell_domain(at, narrowed);
                        changed = true;
                    }
                }
            }
        }
        changed
    }

    fn narrow_cell(&mut self, at: Coord, value: Digit) -> bool {
        if self.cells[at.row][at.col].narrow(value) {
            self.journal.push(at);
            self.stats.eliminations += 1;
            true
        } else {
            false
        }
    }

    fn set_cell_domain(&mut self, at: Coord, domain: Domain) {
        let removed = self.cells[at.row][at.col].domain().len() - domain.len();
        self.cells[at.row][at.col].set_domain(domain);
        self.journal.push(at);
        self.stats.naked_pair_eliminations += removed as u64;
    }
}

/// The 27 units: 9 rows, 9 columns, 9 boxes.
fn all_units() -> impl Iterator<Item = [Coord; GRID_SIZE]> {
    let rows = (0..GRID_SIZE).map(|row| std::array::from_fn(|col| Coord::new(row, col)));
    let cols = (0..GRID_SIZE).map(|col| std::array::from_fn(|row| Coord::new(row, col)));
    let boxes = (0..GRID_SIZE).map(|index| {
        let origin = Coord::new(BOX_SIZE * (index / BOX_SIZE), BOX_SIZE * (index % BOX_SIZE));
        std::array::from_fn(|i| Coord::new(origin.row + i / BOX_SIZE, origin.col + i % BOX_SIZE))
    });
    rows.chain(cols).chain(boxes)
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..GRID_SIZE {
            if row % BOX_SIZE == 0 && row != 0 {
                writeln!(f, "- - - + - - - + - - -")?;
            }
            for col in 0..GRID_SIZE {
                if col % BOX_SIZE == 0 && col != 0 {
                    write!(f, "| ")?;
                }
                match self.cells[row][col].singleton_value() {
                    Some(value) => write!(f, "{} ", value)?,
                    None => write!(f, ". ")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt::try_init();
    }

    /// No two assigned cells of any unit may hold the same value.
    fn assert_consistent(board: &Board) {
        for unit in all_units() {
            let mut seen: Vec<(Digit, Coord)> = Vec::new();
            for &at in unit.iter() {
                if let Some(value) = board.variable(at).singleton_value() {
                    if let Some(&(_, earlier)) = seen.iter().find(|(v, _)| *v == value) {
                        panic!("cells {} and {} both hold {}", earlier, at, value);
                    }
                    seen.push((value, at));
                }
            }
        }
    }

    fn all_domains(board: &Board) -> Vec<Domain> {
        let mut domains = Vec::with_capacity(GRID_SIZE * GRID_SIZE);
        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                domains.push(board.variable(Coord::new(row, col)).domain().clone());
            }
        }
        domains
    }

    /// Consistent but unsolvable: column 0 needs three cells out of the
    /// two-candidate set {1, 2}. The box givens 3..8 plus the 9 at (3, 0)
    /// collapse (0,0), (1,0) and (2,0) to {1, 2} during construction, yet
    /// no pairwise collision exists until search begins.
    fn pigeonhole_grid() -> Grid {
        let mut grid: Grid = [[0; GRID_SIZE]; GRID_SIZE];
        grid[0][1] = 3;
        grid[0][2] = 4;
        grid[1][1] = 5;
        grid[1][2] = 6;
        grid[2][1] = 7;
        grid[2][2] = 8;
        grid[3][0] = 9;
        grid
    }

    #[test]
    fn construction_assigns_givens_and_propagates() {
        init_tracing();
        let mut grid: Grid = [[0; GRID_SIZE]; GRID_SIZE];
        grid[0][0] = 5;
        let board = Board::from_givens(&grid).unwrap();

        assert_eq!(board.variable(Coord::new(0, 0)).value().unwrap(), 5);
        assert!(!board.variable(Coord::new(0, 7)).domain().contains(&5));
        assert!(!board.variable(Coord::new(6, 0)).domain().contains(&5));
        assert!(!board.variable(Coord::new(1, 1)).domain().contains(&5));
        assert_consistent(&board);
    }

    #[test]
    fn construction_rejects_an_out_of_range_digit() {
        let mut grid: Grid = [[0; GRID_SIZE]; GRID_SIZE];
        grid[4][4] = 11;
        assert_eq!(
            Board::from_givens(&grid).unwrap_err(),
            SolverError::Domain {
                cell: Coord::new(4, 4),
                value: 11
            }
        );
    }

    #[test]
    fn inconsistent_givens_fail_construction_naming_both_cells() {
        init_tracing();
        let mut grid: Grid = [[0; GRID_SIZE]; GRID_SIZE];
        grid[0][0] = 5;
        grid[0][8] = 5;
        assert_eq!(
            Board::from_givens(&grid).unwrap_err(),
            SolverError::Violation(Conflict {
                cell: Coord::new(0, 0),
                with: Coord::new(0, 8),
            })
        );
    }

    #[test]
    fn a_derived_collision_also_fails_construction() {
        // Row 0 forces (0, 8) to 9 by elimination; the given 9 at (1, 8)
        // then collides with the derived assignment, not a given.
        let mut grid: Grid = [[0; GRID_SIZE]; GRID_SIZE];
        for col in 0..8 {
            grid[0][col] = col as Digit + 1;
        }
        grid[1][8] = 9;
        let err = Board::from_givens(&grid).unwrap_err();
        match err {
            SolverError::Violation(conflict) => {
                let pair = [conflict.cell, conflict.with];
                assert!(pair.contains(&Coord::new(0, 8)));
                assert!(pair.contains(&Coord::new(1, 8)));
            }
            other => panic!("expected a violation, got {other:?}"),
        }
    }

    #[test]
    fn every_box_peer_is_pruned_whichever_pass_owns_it() {
        let mut grid: Grid = [[0; GRID_SIZE]; GRID_SIZE];
        grid[4][4] = 7;
        let board = Board::from_givens(&grid).unwrap();

        // Diagonal box-mate (box pass), same-row and same-column box-mates
        // (row/column pass).
        assert!(!board.variable(Coord::new(3, 3)).domain().contains(&7));
        assert!(!board.variable(Coord::new(4, 3)).domain().contains(&7));
        assert!(!board.variable(Coord::new(3, 4)).domain().contains(&7));
    }

    #[test]
    fn naked_pairs_claim_their_digits_in_a_unit() {
        init_tracing();
        // Row 0 givens leave (0,6), (0,7), (0,8) with {1, 2, 3}; the 3s at
        // (4, 7) and (8, 6) cut two of them to {1, 2}, and the naked pair
        // forces (0, 8) to 3.
        let mut grid: Grid = [[0; GRID_SIZE]; GRID_SIZE];
        for col in 0..6 {
            grid[0][col] = col as Digit + 4;
        }
        grid[4][7] = 3;
        grid[8][6] = 3;
        let board = Board::from_givens(&grid).unwrap();

        assert_eq!(board.variable(Coord::new(0, 8)).value().unwrap(), 3);
        assert_consistent(&board);
    }

    #[test]
    fn naked_pair_completeness_after_fixpoint() {
        let mut grid: Grid = [[0; GRID_SIZE]; GRID_SIZE];
        for col in 0..6 {
            grid[0][col] = col as Digit + 4;
        }
        grid[4][7] = 3;
        grid[8][6] = 3;
        let board = Board::from_givens(&grid).unwrap();

        // For any unit holding two identical 2-candidate domains, no other
        // cell of the unit retains either digit.
        for unit in all_units() {
            let pairs: Vec<(Coord, Domain)> = unit
                .iter()
                .map(|&at| (at, board.variable(at).domain().clone()))
                .filter(|(_, domain)| domain.len() == 2)
                .collect();
            for (i, (first, domain)) in pairs.iter().enumerate() {
                for (second, other) in &pairs[i + 1..] {
                    if domain != other {
                        continue;
                    }
                    for &at in unit.iter() {
                        if at == *first || at == *second {
                            continue;
                        }
                        let cell = board.variable(at).domain();
                        if cell == domain {
                            continue;
                        }
                        for value in domain.iter() {
                            assert!(
                                !cell.contains(value),
                                "cell {} kept {} despite a naked pair",
                                at,
                                value
                            );
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn failed_trial_assignment_leaves_no_residue() {
        init_tracing();
        let mut board = Board::from_givens(&pigeonhole_grid()).unwrap();
        let before = all_domains(&board);

        // 1 at (0, 0) collapses (1, 0) and (2, 0) to {2} apiece, and the
        // pass then finds them colliding.
        let err = board.assign_value(Coord::new(0, 0), 1).unwrap_err();
        assert_eq!(
            err,
            SolverError::Violation(Conflict {
                cell: Coord::new(1, 0),
                with: Coord::new(2, 0),
            })
        );
        assert_eq!(all_domains(&board), before);
    }

    #[test]
    fn rollback_restores_every_touched_cell() {
        let mut board = Board::from_givens(&[[0; GRID_SIZE]; GRID_SIZE]).unwrap();
        let before = all_domains(&board);

        let checkpoint = board.checkpoint();
        board.assign_value(Coord::new(0, 0), 5).unwrap();
        board.assign_value(Coord::new(4, 4), 5).unwrap();
        assert_ne!(all_domains(&board), before);

        board.rollback_to(checkpoint);
        assert_eq!(all_domains(&board), before);
    }

    #[test]
    fn exclude_narrows_and_repropagates() {
        let mut board = Board::from_givens(&pigeonhole_grid()).unwrap();
        let checkpoint = board.checkpoint();

        // Dropping 1 from (0, 0) leaves {2}; propagation then collapses
        // the column triple into a collision that crosses to the caller.
        let err = board.exclude(Coord::new(0, 0), 1).unwrap_err();
        let pair = [err.cell, err.with];
        assert!(pair.contains(&Coord::new(1, 0)) || pair.contains(&Coord::new(2, 0)));

        board.rollback_to(checkpoint);
        assert!(board.variable(Coord::new(0, 0)).domain().contains(&1));
    }

    #[test]
    fn excluding_an_assigned_cells_value_is_a_conflict() {
        let mut grid: Grid = [[0; GRID_SIZE]; GRID_SIZE];
        grid[0][0] = 5;
        let mut board = Board::from_givens(&grid).unwrap();

        let err = board.exclude(Coord::new(0, 0), 5).unwrap_err();
        assert_eq!(
            err,
            Conflict {
                cell: Coord::new(0, 0),
                with: Coord::new(0, 0),
            }
        );
        // The domain still holds the assignment rather than going empty.
        assert_eq!(board.variable(Coord::new(0, 0)).value().unwrap(), 5);

        // A value the cell does not hold is absent already: a no-op.
        board.exclude(Coord::new(0, 0), 3).unwrap();
        assert_eq!(board.variable(Coord::new(0, 0)).value().unwrap(), 5);
    }

    #[test]
    fn scan_order_is_row_major() {
        let mut grid: Grid = [[0; GRID_SIZE]; GRID_SIZE];
        grid[0][0] = 5;
        let board = Board::from_givens(&grid).unwrap();

        let coords = board.unassigned_coordinates();
        assert_eq!(coords[0], Coord::new(0, 1));
        assert_eq!(coords[7], Coord::new(0, 8));
        assert_eq!(coords[8], Coord::new(1, 0));
        assert_eq!(board.first_unassigned(), Some(Coord::new(0, 1)));
        assert!(!coords.contains(&Coord::new(0, 0)));
    }

    #[test]
    fn to_grid_round_trips_givens() {
        let mut grid: Grid = [[0; GRID_SIZE]; GRID_SIZE];
        grid[2][3] = 8;
        grid[7][1] = 4;
        let board = Board::from_givens(&grid).unwrap();
        let out = board.to_grid();
        assert_eq!(out[2][3], 8);
        assert_eq!(out[7][1], 4);
    }
}
