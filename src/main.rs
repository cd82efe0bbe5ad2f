//! Seat Plan CLI
//!
//! Reads a TOML roster file, searches for a seating that honours fixed
//! positions, blocked seats and separation pairs, and prints the chart.

use std::path::{Path, PathBuf};
use std::process;

use clap::{Args, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use seatplan::{
    Adjacency, PlacementEngine, RosterFile, Seat, SeatOverlay, SeatingError, SeatingRequest,
};

/// Randomized classroom seat planner.
#[derive(Parser)]
#[command(name = "seatplan")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search for a seating and print the chart.
    Arrange(ArrangeArgs),
    /// Validate a roster file without searching.
    Check {
        /// Roster file (TOML)
        file: PathBuf,
    },
}

#[derive(Args)]
struct ArrangeArgs {
    /// Roster file (TOML)
    file: PathBuf,

    /// Random seed (overrides the file)
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum number of randomized trials (overrides the file)
    #[arg(long)]
    max_attempts: Option<usize>,

    /// Only treat edge-sharing seats as neighbours
    #[arg(long)]
    orthogonal: bool,

    /// Toggle a seat's blocked marker after placement, as ROW,COL
    #[arg(long, value_parser = parse_seat)]
    toggle: Vec<Seat>,
}

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if cli.verbose { "debug" } else { "info" })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Command::Arrange(args) => run_arrange(args),
        Command::Check { file } => run_check(&file),
    };

    if let Err(message) = result {
        eprintln!("Error: {}", message);
        process::exit(1);
    }
}

/// Loads a roster file into a request.
fn load_request(path: &Path) -> Result<SeatingRequest, String> {
    RosterFile::from_file(path)
        .and_then(RosterFile::into_request)
        .map_err(|e| format!("{}: {}", path.display(), e))
}

/// Solves the roster and prints the chart.
fn run_arrange(args: ArrangeArgs) -> Result<(), String> {
    let mut request = load_request(&args.file)?;

    let mut config = *request.config();
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    if let Some(max_attempts) = args.max_attempts {
        config = config.with_max_attempts(max_attempts);
    }
    if args.orthogonal {
        config = config.with_adjacency(Adjacency::Orthogonal);
    }
    request = request.with_config(config);

    let chart = arrange(&request, &args.toggle).map_err(|e| match e {
        SeatingError::PlacementUnsatisfiable { .. } => {
            format!("{e} (try a larger --max-attempts or another --seed)")
        }
        other => other.to_string(),
    })?;

    print!("{}", chart);
    Ok(())
}

/// Solves `request`, applies overlay toggles and renders the chart.
fn arrange(request: &SeatingRequest, toggles: &[Seat]) -> Result<String, SeatingError> {
    let (roster, constraints) = request.validate()?;
    let engine = PlacementEngine::new(request.config())?;
    let plan = match request.config().seed {
        Some(seed) => engine.place(&roster, &constraints, &mut StdRng::seed_from_u64(seed)),
        None => engine.place(&roster, &constraints, &mut rand::rng()),
    }?;
    info!(
        rows = plan.grid().rows(),
        columns = plan.grid().columns(),
        attempts = plan.attempts(),
        "seating found"
    );

    let mut overlay = SeatOverlay::from_constraints(&constraints);
    for &seat in toggles {
        overlay.toggle_blocked(seat);
    }

    Ok(overlay.render(&plan))
}

/// Validates the roster and prints a short summary.
fn run_check(path: &Path) -> Result<(), String> {
    let request = load_request(path)?;
    let (roster, constraints) = request.validate().map_err(|e| e.to_string())?;

    let grid = constraints.grid();
    let unfixed = roster
        .iter()
        .filter(|name| !constraints.fixed().contains(name))
        .count();
    let open = constraints.open_seat_count();

    println!("grid: {} rows x {} columns", grid.rows(), grid.columns());
    println!("items: {} ({} unfixed)", roster.len(), unfixed);
    println!("open seats: {}", open);
    println!("separation pairs: {}", constraints.separations().len());

    if open < unfixed {
        return Err(SeatingError::InsufficientSeats {
            available: open,
            needed: unfixed,
        }
        .to_string());
    }
    Ok(())
}

/// Parses `ROW,COL` into a seat.
fn parse_seat(value: &str) -> Result<Seat, String> {
    let (row, column) = value
        .split_once(',')
        .ok_or_else(|| format!("expected ROW,COL, got '{value}'"))?;
    let row = row
        .trim()
        .parse::<usize>()
        .map_err(|e| format!("bad row '{row}': {e}"))?;
    let column = column
        .trim()
        .parse::<usize>()
        .map_err(|e| format!("bad column '{column}': {e}"))?;
    Ok(Seat::new(row, column))
}
