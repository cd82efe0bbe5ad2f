//! Solver configuration and the TOML roster file.
//!
//! A roster file carries everything one placement run needs:
//!
//! ```toml
//! columns = 5
//! students = ["Ana", "Ben", "Cy"]
//! blocked = [[1, 1]]
//! separate = [["Ana", "Ben"]]
//! groups = [["Cy", "Dee", "Eve"]]
//!
//! [fixed]
//! Cy = [2, 3]
//!
//! [solver]
//! max_attempts = 1000
//! adjacency = "surrounding"
//! seed = 42
//! ```

use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;
use thiserror::Error;

use crate::constraints::{BlockedSeats, FixedPositions, SeparationPairs};
use crate::error::SeatingError;
use crate::grid::{Adjacency, Seat};
use crate::SeatingRequest;

/// Number of randomized trials before giving up.
pub const DEFAULT_MAX_ATTEMPTS: usize = 1000;

/// Errors that can occur when loading a roster file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read roster file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse roster TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Invalid roster: {0}")]
    Seating(#[from] SeatingError),
}

/// Knobs for the placement search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverConfig {
    /// Upper bound on randomized trials
    pub max_attempts: usize,
    /// Neighbour rule for separation pairs
    pub adjacency: Adjacency,
    /// Fixed seed for reproducible runs (None draws fresh entropy)
    pub seed: Option<u64>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            adjacency: Adjacency::default(),
            seed: None,
        }
    }
}

impl SolverConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the attempt budget
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set the adjacency rule
    pub fn with_adjacency(mut self, adjacency: Adjacency) -> Self {
        self.adjacency = adjacency;
        self
    }

    /// Set a fixed random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), SeatingError> {
        if self.max_attempts == 0 {
            return Err(SeatingError::malformed("max_attempts must be at least 1"));
        }
        Ok(())
    }
}

/// A roster file as written on disk.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RosterFile {
    /// Seats per row
    pub columns: usize,
    /// Item names in seating order
    #[serde(default)]
    pub students: Vec<String>,
    /// Declared item count, checked against `students`
    #[serde(default)]
    pub count: Option<usize>,
    #[serde(default)]
    pub blocked: Vec<Seat>,
    /// Fixed seats, checked in file order
    #[serde(default)]
    pub fixed: IndexMap<String, Seat>,
    /// Pairs that must not sit next to each other
    #[serde(default)]
    pub separate: Vec<(String, String)>,
    /// Groups whose members are pairwise separated
    #[serde(default)]
    pub groups: Vec<Vec<String>>,
    #[serde(default)]
    pub solver: SolverConfig,
}

impl RosterFile {
    /// Load a roster from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load a roster from a TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Turns the file contents into a placement request.
    pub fn into_request(self) -> Result<SeatingRequest, ConfigError> {
        let mut separations = SeparationPairs::new();
        for (a, b) in self.separate {
            separations.add(a, b)?;
        }
        for group in &self.groups {
            separations.add_group(group);
        }

        let mut request = SeatingRequest::new(self.students, self.columns)
            .with_blocked(self.blocked.into_iter().collect::<BlockedSeats>())
            .with_fixed(self.fixed.into_iter().collect::<FixedPositions>())
            .with_separations(separations)
            .with_config(self.solver);
        if let Some(count) = self.count {
            request = request.with_expected_count(count);
        }
        Ok(request)
    }
}
