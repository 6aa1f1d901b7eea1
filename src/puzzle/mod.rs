//! The puzzle surface: the 81-character line codec, the independent
//! solution validator, and the random board generator.
//!
//! Everything here works on plain [`Grid`]s and knows nothing about
//! domains or search; the validator in particular re-checks a solved grid
//! from scratch so a solver bug cannot vouch for itself.

pub mod generate;

use crate::{
    board::{Digit, Grid, BOX_SIZE, GRID_SIZE},
    error::{Error, Result},
};

pub use generate::{BoardGenerator, Difficulty};

/// Parses an 81-character puzzle line, row-major. Digits `1..=9` are
/// givens; `0` or `.` is a blank.
pub fn parse_line(line: &str) -> Result<Grid> {
    let length = line.chars().count();
    if length != GRID_SIZE * GRID_SIZE {
        return Err(Error::PuzzleLength(length));
    }
    let mut grid: Grid = [[0; GRID_SIZE]; GRID_SIZE];
    for (position, found) in line.chars().enumerate() {
        let value = match found {
            '.' | '0' => 0,
            '1'..='9' => found as u8 - b'0',
            _ => return Err(Error::PuzzleCharacter { found, position }),
        };
        grid[position / GRID_SIZE][position % GRID_SIZE] = value;
    }
    Ok(grid)
}

/// Renders a grid as an 81-character line, `0` for blanks.
pub fn format_line(grid: &Grid) -> String {
    let mut line = String::with_capacity(GRID_SIZE * GRID_SIZE);
    for row in grid {
        for &value in row {
            line.push((b'0' + value) as char);
        }
    }
    line
}

/// Whether every row, column, and box holds each of `1..=9` exactly once.
/// A grid with any blank left is not a valid solution.
pub fn is_valid_solution(grid: &Grid) -> bool {
    for row in 0..GRID_SIZE {
        if !unit_complete((0..GRID_SIZE).map(|col| grid[row][col])) {
            return false;
        }
    }
    for col in 0..GRID_SIZE {
        if !unit_complete((0..GRID_SIZE).map(|row| grid[row][col])) {
            return false;
        }
    }
    for band in (0..GRID_SIZE).step_by(BOX_SIZE) {
        for stack in (0..GRID_SIZE).step_by(BOX_SIZE) {
            let unit = (0..GRID_SIZE).map(|i| grid[band + i / BOX_SIZE][stack + i % BOX_SIZE]);
            if !unit_complete(unit) {
                return false;
            }
        }
    }
    true
}

fn unit_complete(cells: impl Iterator<Item = Digit>) -> bool {
    let mut seen = [false; GRID_SIZE + 1];
    for value in cells {
        if value == 0 || usize::from(value) > GRID_SIZE || seen[usize::from(value)] {
            return false;
        }
        seen[usize::from(value)] = true;
    }
    true
}

/// Whether `solution` preserves every given of `puzzle`.
pub fn extends(puzzle: &Grid, solution: &Grid) -> bool {
    for row in 0..GRID_SIZE {
        for col in 0..GRID_SIZE {
            if puzzle[row][col] != 0 && puzzle[row][col] != solution[row][col] {
                return false;
            }
        }
    }
    true
}
