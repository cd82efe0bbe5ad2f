//! Seat Plan Library
//!
//! Assigns named items (students) to seats in a rectangular grid under fixed
//! positions, blocked seats and pairwise separation constraints, using a
//! bounded-retry randomized search.
//!
//! # Example
//!
//! ```rust
//! use seatplan::{SeatingRequest, SeparationPairs, SolverConfig};
//!
//! let mut pairs = SeparationPairs::new();
//! pairs.add("A", "E").unwrap();
//!
//! let plan = SeatingRequest::new(["A", "B", "C", "D", "E"], 5)
//!     .with_separations(pairs)
//!     .with_config(SolverConfig::new().with_seed(7))
//!     .solve()
//!     .unwrap();
//!
//! let a = plan.assignment().seat_of("A").unwrap();
//! let e = plan.assignment().seat_of("E").unwrap();
//! assert!(a.column.abs_diff(e.column) >= 2);
//! assert_eq!(plan.grid().rows(), 1);
//! ```

pub mod config;
pub mod constraints;
pub mod engine;
pub mod error;
pub mod grid;
pub mod overlay;
pub mod roster;

pub use config::{ConfigError, RosterFile, SolverConfig, DEFAULT_MAX_ATTEMPTS};
pub use constraints::{
    BlockedSeats, ConstraintSet, FixedPositions, SeparationPair, SeparationPairs,
};
pub use engine::{Assignment, PlacementEngine, SeatingPlan};
pub use error::{Occupant, SeatingError};
pub use grid::{is_adjacent, seats, Adjacency, Grid, Seat};
pub use overlay::{Cell, SeatOverlay};
pub use roster::Roster;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Everything one placement run needs, collected builder-style.
#[derive(Debug, Clone)]
pub struct SeatingRequest {
    names: Vec<String>,
    expected_count: Option<usize>,
    columns: usize,
    blocked: BlockedSeats,
    fixed: FixedPositions,
    separations: SeparationPairs,
    config: SolverConfig,
}

impl SeatingRequest {
    /// Create a request for `names` laid out over `columns` columns
    pub fn new<I, S>(names: I, columns: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            expected_count: None,
            columns,
            blocked: BlockedSeats::new(),
            fixed: FixedPositions::new(),
            separations: SeparationPairs::new(),
            config: SolverConfig::default(),
        }
    }

    /// Require the name list to have exactly `count` entries
    pub fn with_expected_count(mut self, count: usize) -> Self {
        self.expected_count = Some(count);
        self
    }

    pub fn with_blocked(mut self, blocked: BlockedSeats) -> Self {
        self.blocked = blocked;
        self
    }

    pub fn with_fixed(mut self, fixed: FixedPositions) -> Self {
        self.fixed = fixed;
        self
    }

    pub fn with_separations(mut self, separations: SeparationPairs) -> Self {
        self.separations = separations;
        self
    }

    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Runs every construction-time check without searching.
    ///
    /// Returns the roster and the validated constraints (with the grid
    /// already expanded for fixed positions).
    pub fn validate(&self) -> Result<(Roster, ConstraintSet), SeatingError> {
        self.config.validate()?;
        let roster = match self.expected_count {
            Some(count) => Roster::with_expected_count(self.names.iter().cloned(), count)?,
            None => Roster::new(self.names.iter().cloned())?,
        };
        let grid = Grid::for_items(roster.len(), self.columns)?;
        let constraints = ConstraintSet::new(
            grid,
            self.blocked.clone(),
            self.fixed.clone(),
            self.separations.clone(),
        )?;
        Ok((roster, constraints))
    }

    /// Solves with the configured seed, or fresh entropy if none is set.
    pub fn solve(&self) -> Result<SeatingPlan, SeatingError> {
        match self.config.seed {
            Some(seed) => self.solve_with_rng(&mut StdRng::seed_from_u64(seed)),
            None => self.solve_with_rng(&mut rand::rng()),
        }
    }

    /// Solves using the given random source.
    pub fn solve_with_rng<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<SeatingPlan, SeatingError> {
        let (roster, constraints) = self.validate()?;
        PlacementEngine::new(&self.config)?.place(&roster, &constraints, rng)
    }
}
