//! Post-hoc seat blocking on a finished plan.
//!
//! The overlay is a display copy of blocked-seat state. Toggling a seat never
//! moves or evicts whoever sits there and never re-runs the search.

use rustc_hash::FxHashSet;

use crate::constraints::ConstraintSet;
use crate::engine::{SeatingPlan, EMPTY_SEAT};
use crate::grid::{format_chart, Seat};

/// Marker for a blocked, unoccupied seat in rendered charts.
pub const BLOCKED_SEAT: &str = "#";

/// Display state of one seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell<'a> {
    pub seat: Seat,
    pub occupant: Option<&'a str>,
    pub blocked: bool,
}

impl<'a> Cell<'a> {
    /// Text shown for this cell: the occupant wins over the blocked marker.
    pub fn label(&self) -> &'a str {
        match (self.occupant, self.blocked) {
            (Some(name), _) => name,
            (None, true) => BLOCKED_SEAT,
            (None, false) => EMPTY_SEAT,
        }
    }
}

/// Mutable blocked-seat overlay owned by one caller session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeatOverlay {
    blocked: FxHashSet<Seat>,
}

impl SeatOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from the blocked seats the plan was computed with.
    pub fn from_constraints(constraints: &ConstraintSet) -> Self {
        Self {
            blocked: constraints.blocked().iter().collect(),
        }
    }

    /// Flips `seat` between blocked and open. Returns the new blocked state.
    pub fn toggle_blocked(&mut self, seat: Seat) -> bool {
        if self.blocked.remove(&seat) {
            false
        } else {
            self.blocked.insert(seat);
            true
        }
    }

    pub fn is_blocked(&self, seat: Seat) -> bool {
        self.blocked.contains(&seat)
    }

    /// Blocked seats in row-major order.
    pub fn blocked_seats(&self) -> Vec<Seat> {
        let mut seats: Vec<Seat> = self.blocked.iter().copied().collect();
        seats.sort_unstable();
        seats
    }

    /// Row-major display cells for `plan` under this overlay.
    pub fn cells<'a>(&self, plan: &'a SeatingPlan) -> Vec<Vec<Cell<'a>>> {
        let grid = plan.grid();
        (1..=grid.rows())
            .map(|row| {
                (1..=grid.columns())
                    .map(|column| {
                        let seat = Seat::new(row, column);
                        Cell {
                            seat,
                            occupant: plan.assignment().occupant(seat),
                            blocked: self.is_blocked(seat),
                        }
                    })
                    .collect()
            })
            .collect()
    }

    /// Text chart of `plan` with blocked empty seats marked `#`.
    pub fn render(&self, plan: &SeatingPlan) -> String {
        let labels: Vec<Vec<&str>> = self
            .cells(plan)
            .iter()
            .map(|row| row.iter().map(Cell::label).collect())
            .collect();
        format_chart(&labels)
    }
}
