//! Command-line interface definitions.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use halo::engine::elapsed::DEFAULT_ELAPSED_LOG;
use halo::prelude::{Domain, RunError};

/// Distributed one-dimensional cellular automaton
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Number of cells in the domain
    #[arg(short = 'n', long, required_unless_present_any = ["interactive", "domain"])]
    pub cells: Option<usize>,

    /// Wolfram rule number (0-255)
    #[arg(short, long, required_unless_present = "interactive")]
    pub rule: Option<u32>,

    /// Number of generations to advance
    #[arg(short, long, required_unless_present = "interactive")]
    pub generations: Option<u64>,

    /// Wrap the domain edges instead of reading 0 outside
    #[arg(short, long)]
    pub periodic: bool,

    /// Total ranks including the coordinator (default: available parallelism)
    #[arg(long)]
    pub ranks: Option<usize>,

    /// Initial state when no explicit domain is given
    #[arg(long, value_enum, default_value_t = Init::Center)]
    pub init: Init,

    /// Seed for `--init random`
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Explicit initial state as a string of 0/1 characters
    #[arg(long)]
    pub domain: Option<String>,

    /// File the elapsed time is appended to
    #[arg(long, default_value = DEFAULT_ELAPSED_LOG, value_hint = clap::ValueHint::FilePath)]
    pub log: PathBuf,

    /// Prompt for cells, rule, generations, and boundary on stdin
    #[arg(short, long)]
    pub interactive: bool,
}

/// Generated initial states.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Init {
    /// Single live cell at N / 2
    Center,
    /// Seeded pseudo-random cells
    Random,
    /// All cells dead
    Zeros,
}

impl Init {
    /// Build an initial domain of `cells` cells.
    pub fn build(self, cells: usize, seed: u64) -> Result<Domain, RunError> {
        match self {
            Self::Center => Domain::single_center(cells),
            Self::Random => Domain::random(cells, seed),
            Self::Zeros => Domain::zeros(cells),
        }
    }
}
