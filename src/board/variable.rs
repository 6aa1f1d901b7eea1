//! Cell-level domain state: candidate sets with undo history.

use std::fmt;

use im::OrdSet;

use crate::error::SolverError;

/// Side length of the grid.
pub const GRID_SIZE: usize = 9;
/// Side length of one box.
pub const BOX_SIZE: usize = 3;

/// A candidate value, `1..=9`. `0` marks a blank in input and output grids.
pub type Digit = u8;

/// A set of candidate digits.
///
/// `im::OrdSet` gives ascending iteration (the order candidates are tried
/// in) and structurally-shared clones, so pushing a snapshot onto a
/// variable's history is cheap.
pub type Domain = OrdSet<Digit>;

/// The full candidate set `{1..9}`.
pub fn full_domain() -> Domain {
    (1..=GRID_SIZE as Digit).collect()
}

/// A cell position, row-major. Both coordinates are `0..9`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub fn new(row: usize, col: usize) -> Self {
        Coord { row, col }
    }

    /// Top-left cell of the box containing this cell.
    pub fn box_origin(&self) -> Coord {
        Coord {
            row: BOX_SIZE * (self.row / BOX_SIZE),
            col: BOX_SIZE * (self.col / BOX_SIZE),
        }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// One cell of the board: its current candidate domain plus a stack of the
/// domains it held before each mutation.
///
/// Every mutating operation (`assign`, `narrow`, `set_domain`) pushes the
/// outgoing domain onto the history first; `restore` pops one entry back.
/// The board's undo journal records which variables were pushed and in what
/// order, so a rollback replays the pops LIFO across the whole grid.
///
/// A stored domain is never empty: `1..=2` candidates always survive every
/// operation the board performs. Callers mutating variables directly must
/// keep that invariant (do not `narrow` the last candidate).
#[derive(Debug, Clone)]
pub struct Variable {
    location: Coord,
    domain: Domain,
    history: Vec<Domain>,
}

impl Variable {
    /// A fresh variable holding the full candidate set.
    pub fn new(location: Coord) -> Self {
        Variable {
            location,
            domain: full_domain(),
            history: Vec::new(),
        }
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    /// A variable is assigned exactly when one candidate remains.
    pub fn is_assigned(&self) -> bool {
        self.domain.len() == 1
    }

    /// The assigned digit, if this variable has collapsed to one candidate.
    pub fn singleton_value(&self) -> Option<Digit> {
        if self.domain.len() == 1 {
            self.domain.get_min().copied()
        } else {
            None
        }
    }

    /// The assigned digit, or `SolverError::Unassigned`.
    pub fn value(&self) -> Result<Digit, SolverError> {
        self.singleton_value().ok_or(SolverError::Unassigned {
            cell: self.location,
        })
    }

    /// Collapses the domain to `{value}`, pushing the outgoing domain onto
    /// history. Fails with a domain error, leaving the variable untouched,
    /// if `value` is not currently a candidate.
    pub fn assign(&mut self, value: Digit) -> Result<(), SolverError> {
        if !self.domain.contains(&value) {
            return Err(SolverError::Domain {
                cell: self.location,
                value,
            });
        }
        self.history.push(self.domain.clone());
        self.domain = OrdSet::unit(value);
        Ok(())
    }

    /// Removes a single candidate, pushing the outgoing domain onto history
    /// first. Returns whether the domain changed; an absent value is a
    /// no-op with no history push.
    pub fn narrow(&mut self, value: Digit) -> bool {
        if !self.domain.contains(&value) {
            return false;
        }
        self.history.push(self.domain.clone());
        self.domain.remove(&value);
        true
    }

    /// Replaces the domain wholesale, pushing the outgoing one onto
    /// history. Used by propagation when several candidates fall at once.
    pub fn set_domain(&mut self, domain: Domain) {
        self.history.push(std::mem::replace(&mut self.domain, domain));
    }

    /// Pops the most recent history entry back into the domain. If
    /// `excluded` names a digit, it is dropped from the restored domain as
    /// part of the restore (no extra history push).
    ///
    /// With an empty history the variable instead resets to the full
    /// candidate set, seeding history with the domain it held before the
    /// reset.
    pub fn restore(&mut self, excluded: Option<Digit>) {
        match self.history.pop() {
            Some(previous) => {
                self.domain = previous;
                if let Some(value) = excluded {
                    self.domain.remove(&value);
                }
            }
            None => {
                self.history.push(self.domain.clone());
                self.domain = full_domain();
            }
        }
    }
}
