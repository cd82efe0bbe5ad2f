//! Error types for seat chart construction and placement.

use std::fmt;

use thiserror::Error;

use crate::grid::Seat;

/// What already holds a seat that a fixed position wants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Occupant {
    /// The seat is in the blocked set.
    Blocked,
    /// Another item is fixed to the same seat.
    Item(String),
}

impl fmt::Display for Occupant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Occupant::Blocked => f.write_str("a blocked seat"),
            Occupant::Item(name) => write!(f, "fixed item '{}'", name),
        }
    }
}

/// Errors surfaced while validating inputs or searching for a seating plan.
///
/// Every variant is recoverable: the caller decides whether to retry with a
/// larger attempt budget, relax constraints, or report the problem.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeatingError {
    /// A fixed position points outside the grid
    #[error("fixed seat {seat} for '{item}' lies outside the {rows}x{columns} grid")]
    SeatOutOfRange {
        item: String,
        seat: Seat,
        rows: usize,
        columns: usize,
    },

    /// A fixed position collides with a blocked seat or another fixed item
    #[error("fixed seat {seat} for '{item}' collides with {other}")]
    SeatConflict {
        item: String,
        seat: Seat,
        other: Occupant,
    },

    /// Not enough open seats for the items without a fixed position
    #[error("only {available} open seats for {needed} unfixed items")]
    InsufficientSeats { available: usize, needed: usize },

    /// Every randomized trial violated a separation pair.
    ///
    /// This is search exhaustion, not a proof that no arrangement exists.
    #[error("no arrangement satisfied all separation pairs after {attempts} attempts")]
    PlacementUnsatisfiable { attempts: usize },

    /// Structurally invalid input (counts, names, dimensions)
    #[error("malformed input: {reason}")]
    MalformedInput { reason: String },
}

impl SeatingError {
    /// Create a malformed input error
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            reason: reason.into(),
        }
    }

    /// Whether retrying with another random source or a larger budget may help.
    pub fn is_search_exhaustion(&self) -> bool {
        matches!(self, Self::PlacementUnsatisfiable { .. })
    }
}
