use clap::ValueEnum;

use crate::{
    board::Board,
    solver::{backjump::BackjumpingSolver, backtrack::BacktrackingSolver, stats::SearchStats},
};

pub trait SearchStrategy {
    /// Searches for an assignment that completes the board.
    ///
    /// Returns `true` and leaves the board fully assigned when a
    /// solution exists. Returns `false` and restores the board to the
    /// state it was in when `solve` was called otherwise.
    fn solve(&mut self, board: &mut Board) -> (bool, SearchStats);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Algorithm {
    /// Conflict-directed backjumping.
    Backjumping,
    /// Chronological backtracking.
    Backtracking,
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Algorithm::Backjumping => write!(f, "backjumping"),
            Algorithm::Backtracking => write!(f, "backtracking"),
        }
    }
}

pub fn strategy_for(algorithm: Algorithm) -> Box<dyn SearchStrategy> {
    match algorithm {
        Algorithm::Backjumping => Box::new(BackjumpingSolver::new()),
        Algorithm::Backtracking => Box::new(BacktrackingSolver::new()),
    }
}
