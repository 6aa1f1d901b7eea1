//! Nonet is a 9×9 Sudoku solver built as a small constraint satisfaction
//! problem (CSP) engine.
//!
//! The board holds 81 variables, one per cell, each carrying the set of
//! digits it may still take. Assigning a cell propagates the row, column,
//! box, and naked-pair constraints to fixpoint, and a collision surfaces as
//! a typed conflict naming the two offending cells. Search is depth-first
//! with conflict-directed backjumping: conflicts feed a tracker that lets
//! the solver unwind straight to the cell responsible instead of one level
//! at a time.
//!
//! # Core Concepts
//!
//! - **[`Variable`](board::Variable)**: one cell's candidate domain plus an
//!   undo history of every domain it previously held.
//! - **[`Board`](board::Board)**: the 9×9 grid of variables, the propagation
//!   fixpoint, and a journal that makes every trial assignment fully
//!   reversible.
//! - **[`SearchStrategy`](solver::SearchStrategy)**: the capability a solver
//!   implements. [`BackjumpingSolver`](solver::BackjumpingSolver) is the
//!   primary strategy; [`BacktrackingSolver`](solver::BacktrackingSolver) is
//!   the chronological baseline.
//!
//! # Example: solving a puzzle line
//!
//! ```
//! use nonet::board::Board;
//! use nonet::puzzle::{self, is_valid_solution};
//! use nonet::solver::{BackjumpingSolver, SearchStrategy};
//!
//! let line = "530070000600195000098000060800060003400803001700020006060000280000419005000080079";
//! let givens = puzzle::parse_line(line)?;
//! let mut board = Board::from_givens(&givens)?;
//!
//! let (solved, _stats) = BackjumpingSolver::new().solve(&mut board);
//! assert!(solved);
//! assert!(is_valid_solution(&board.to_grid()));
//! # Ok::<(), nonet::error::Error>(())
//! ```

pub mod board;
pub mod error;
pub mod puzzle;
pub mod solver;
