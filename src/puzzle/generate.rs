//! Random candidate-board generation by difficulty preset.

use clap::ValueEnum;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::board::{Digit, Grid, BOX_SIZE, GRID_SIZE};

/// Difficulty presets, each mapping to a band of given ("hint") counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Difficulty {
    /// 55 to 65 hints.
    VeryEasy,
    /// 35 to 54 hints.
    Easy,
    /// 24 to 34 hints.
    Medium,
    /// 18 to 24 hints.
    Hard,
    /// Exactly 17 hints.
    Extreme,
}

impl Difficulty {
    fn hint_bounds(self) -> (usize, usize) {
        match self {
            Difficulty::VeryEasy => (55, 65),
            Difficulty::Easy => (35, 54),
            Difficulty::Medium => (24, 34),
            Difficulty::Hard => (18, 24),
            Difficulty::Extreme => (17, 17),
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Difficulty::VeryEasy => write!(f, "very-easy"),
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
            Difficulty::Extreme => write!(f, "extreme"),
        }
    }
}

/// Shuffle steps applied to the reference solution per generated board.
const SHUFFLE_STEPS: usize = 48;

/// The reference solution the generator shuffles. Any complete valid grid
/// works; relabeling digits and swapping rows or columns within a band
/// preserves validity, so every shuffled variant is again a solution.
const REFERENCE_SOLUTION: Grid = [
    [5, 3, 4, 6, 7, 8, 9, 1, 2],
    [6, 7, 2, 1, 9, 5, 3, 4, 8],
    [1, 9, 8, 3, 4, 2, 5, 6, 7],
    [8, 5, 9, 7, 6, 1, 4, 2, 3],
    [4, 2, 6, 8, 5, 3, 7, 9, 1],
    [7, 1, 3, 9, 2, 4, 8, 5, 6],
    [9, 6, 1, 5, 3, 7, 2, 8, 4],
    [2, 8, 7, 4, 1, 9, 6, 3, 5],
    [3, 4, 5, 2, 8, 6, 1, 7, 9],
];

pub struct BoardGenerator {
    difficulty: Difficulty,
    rng: ChaCha8Rng,
}

impl BoardGenerator {
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// A fixed seed reproduces the exact generation sequence.
    pub fn with_seed(difficulty: Difficulty, seed: u64) -> Self {
        Self {
            difficulty,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Produces a puzzle grid with a hint count drawn from the difficulty
    /// band.
    ///
    /// Hint positions are sampled uniformly without replacement and their
    /// digits read off a freshly shuffled solution, so the givens are
    /// mutually consistent and the board they build always admits at least
    /// one completion.
    pub fn generate(&mut self) -> Grid {
        let (low, high) = self.difficulty.hint_bounds();
        let hints = self.rng.gen_range(low..=high);
        let solution = self.shuffled_solution();

        let mut grid: Grid = [[0; GRID_SIZE]; GRID_SIZE];
        for index in rand::seq::index::sample(&mut self.rng, GRID_SIZE * GRID_SIZE, hints) {
            let (row, col) = (index / GRID_SIZE, index % GRID_SIZE);
            grid[row][col] = solution[row][col];
        }
        debug!(difficulty = %self.difficulty, hints, "generated a board");
        grid
    }

    /// A random complete solution: the reference grid after a run of
    /// validity-preserving shuffles (digit relabelings, row swaps within a
    /// band, column swaps within a stack).
    fn shuffled_solution(&mut self) -> Grid {
        let mut solution = REFERENCE_SOLUTION;
        for _ in 0..SHUFFLE_STEPS {
            match self.rng.gen_range(0..3) {
                0 => {
                    let a: Digit = self.rng.gen_range(1..=9);
                    let offset: Digit = self.rng.gen_range(1..9);
                    relabel(&mut solution, a, (a - 1 + offset) % 9 + 1);
                }
                1 => {
                    let band = self.rng.gen_range(0..BOX_SIZE);
                    let (first, second) = self.distinct_pair();
                    solution.swap(band * BOX_SIZE + first, band * BOX_SIZE + second);
                }
                _ => {
                    let stack = self.rng.gen_range(0..BOX_SIZE);
                    let (first, second) = self.distinct_pair();
                    for row in solution.iter_mut() {
                        row.swap(stack * BOX_SIZE + first, stack * BOX_SIZE + second);
                    }
                }
            }
        }
        solution
    }

    /// Two distinct offsets in `0..BOX_SIZE`.
    fn distinct_pair(&mut self) -> (usize, usize) {
        let first = self.rng.gen_range(0..BOX_SIZE);
        let second = (first + self.rng.gen_range(1..BOX_SIZE)) % BOX_SIZE;
        (first, second)
    }
}

fn relabel(solution: &mut Grid, a: Digit, b: Digit) {
    for row in solution.iter_mut() {
        for cell in row.iter_mut() {
            if *cell == a {
                *cell = b;
            } else if *cell == b {
                *cell = a;
            }
        }
    }
}
