use std::{
    fs::File,
    io::{BufRead, BufReader, Write},
    path::PathBuf,
    time::Instant,
};

use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use nonet::{
    board::{Board, PropagationStats},
    error::Result,
    puzzle::{self, BoardGenerator, Difficulty},
    solver::{render_report_table, strategy_for, Algorithm, PuzzleReport, SearchStats},
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Raise log verbosity (-v debug, -vv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Solve puzzles read as 81-character lines from a file.
    Solve {
        /// One puzzle per line; digits 1-9, `0` or `.` for blanks.
        #[arg(long)]
        input: PathBuf,

        /// Write solution lines here instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = Algorithm::Backjumping)]
        algorithm: Algorithm,

        /// Print a per-puzzle statistics table.
        #[arg(long)]
        stats: bool,

        /// Emit one JSON report per puzzle instead of plain lines.
        #[arg(long)]
        json: bool,
    },
    /// Generate candidate boards and try to solve them.
    Generate {
        #[arg(long, default_value_t = 1)]
        count: usize,

        #[arg(long, value_enum, default_value_t = Difficulty::Medium)]
        difficulty: Difficulty,

        /// Seed for reproducible generation.
        #[arg(long)]
        seed: Option<u64>,

        /// Write the generated puzzles here.
        #[arg(long)]
        boards: PathBuf,

        /// Write solutions of the solvable boards here.
        #[arg(long)]
        solutions: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = Algorithm::Backjumping)]
        algorithm: Algorithm,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    match args.command {
        Command::Solve {
            input,
            output,
            algorithm,
            stats,
            json,
        } => solve(input, output, algorithm, stats, json),
        Command::Generate {
            count,
            difficulty,
            seed,
            boards,
            solutions,
            algorithm,
        } => generate(count, difficulty, seed, boards, solutions, algorithm),
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn solve(
    input: PathBuf,
    output: Option<PathBuf>,
    algorithm: Algorithm,
    stats: bool,
    json: bool,
) -> Result<()> {
    let reader = BufReader::new(File::open(&input)?);
    let mut strategy = strategy_for(algorithm);
    let mut reports: Vec<PuzzleReport> = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let givens = puzzle::parse_line(line)?;
        let started = Instant::now();
        let report = match Board::from_givens(&givens) {
            Ok(mut board) => {
                let (solved, search) = strategy.solve(&mut board);
                PuzzleReport {
                    index: index + 1,
                    puzzle: line.to_string(),
                    solution: solved.then(|| puzzle::format_line(&board.to_grid())),
                    solved,
                    stats: search,
                    propagation: board.stats(),
                    time_spent_micros: started.elapsed().as_micros(),
                }
            }
            // Inconsistent givens fail this puzzle, not the whole run.
            Err(error) => {
                debug!(%error, line, "rejected while building the board");
                PuzzleReport {
                    index: index + 1,
                    puzzle: line.to_string(),
                    solution: None,
                    solved: false,
                    stats: SearchStats::default(),
                    propagation: PropagationStats::default(),
                    time_spent_micros: started.elapsed().as_micros(),
                }
            }
        };
        reports.push(report);
    }

    let mut sink: Box<dyn Write> = match output {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(std::io::stdout()),
    };
    if json {
        for report in &reports {
            serde_json::to_writer(&mut sink, report)?;
            writeln!(sink)?;
        }
    } else {
        for report in &reports {
            match &report.solution {
                Some(solution) => writeln!(sink, "{solution}")?,
                None => writeln!(sink, "unsolved: {}", report.puzzle)?,
            }
        }
    }

    if stats {
        print!("{}", render_report_table(&reports));
    }

    let solved = reports.iter().filter(|report| report.solved).count();
    println!("solved {solved} of {} puzzles", reports.len());
    Ok(())
}

fn generate(
    count: usize,
    difficulty: Difficulty,
    seed: Option<u64>,
    boards: PathBuf,
    solutions: Option<PathBuf>,
    algorithm: Algorithm,
) -> Result<()> {
    let mut generator = match seed {
        Some(seed) => BoardGenerator::with_seed(difficulty, seed),
        None => BoardGenerator::new(difficulty),
    };
    let mut strategy = strategy_for(algorithm);

    let mut board_sink = File::create(&boards)?;
    let mut solution_sink = match solutions {
        Some(path) => Some(File::create(path)?),
        None => None,
    };

    let mut solved_count = 0;
    for index in 0..count {
        let grid = generator.generate();
        writeln!(board_sink, "{}", puzzle::format_line(&grid))?;

        let mut board = Board::from_givens(&grid)?;
        let (solved, search) = strategy.solve(&mut board);
        if solved {
            solved_count += 1;
            if let Some(sink) = solution_sink.as_mut() {
                writeln!(sink, "{}", puzzle::format_line(&board.to_grid()))?;
            }
        }
        debug!(
            index,
            %difficulty,
            solved,
            nodes = search.nodes_visited,
            "attempted a generated board"
        );
    }

    println!("solved {solved_count} of {count} generated boards");
    Ok(())
}
