use std::backtrace::Backtrace;

use crate::board::{Coord, Digit};

pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Two cells in one unit (row, column, or box) holding the same value.
///
/// Propagation returns this as the `Err` arm of its `Result`; during search
/// it is the value the conflict tracker consumes to pick a jump target, and
/// at the top level it means the puzzle (or its givens) is unsolvable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("cell {cell} collides with cell {with}")]
pub struct Conflict {
    pub cell: Coord,
    pub with: Coord,
}

/// Errors raised while mutating or searching a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SolverError {
    /// The value is not in the cell's current candidate set. Recoverable:
    /// the solver moves on to the next candidate.
    #[error("value {value} is not a candidate of cell {cell}")]
    Domain { cell: Coord, value: Digit },

    /// A constraint violation found by propagation.
    #[error(transparent)]
    Violation(#[from] Conflict),

    /// Reading the value of a cell that has more than one candidate left.
    #[error("cell {cell} has no assigned value")]
    Unassigned { cell: Coord },
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Inner: {inner}\n{backtrace}")]
    Inner {
        inner: Box<SolverError>,
        backtrace: Box<Backtrace>,
    },

    #[error("puzzle line must be 81 characters, got {0}")]
    PuzzleLength(usize),

    #[error("invalid puzzle character {found:?} at position {position}")]
    PuzzleCharacter { found: char, position: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl From<SolverError> for Error {
    fn from(inner: SolverError) -> Self {
        Error::Inner {
            inner: Box::new(inner),
            backtrace: Box::new(std::backtrace::Backtrace::capture()),
        }
    }
}

impl From<Conflict> for Error {
    fn from(conflict: Conflict) -> Self {
        SolverError::from(conflict).into()
    }
}
