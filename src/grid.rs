//! Grid representation and seat adjacency.
//!
//! Seats are addressed 1-based as (row, column). A grid of `rows x columns`
//! seats is enumerated in row-major order, which is also the fixed order the
//! placement engine hands seats out in.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single seat, addressed by 1-based row and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "(usize, usize)", into = "(usize, usize)")]
pub struct Seat {
    pub row: usize,
    pub column: usize,
}

impl Seat {
    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

impl From<(usize, usize)> for Seat {
    fn from((row, column): (usize, usize)) -> Self {
        Self { row, column }
    }
}

impl From<Seat> for (usize, usize) {
    fn from(seat: Seat) -> Self {
        (seat.row, seat.column)
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// Returns every seat of an `rows x columns` grid in row-major order.
pub fn seats(rows: usize, columns: usize) -> Vec<Seat> {
    (1..=rows)
        .flat_map(|row| (1..=columns).map(move |column| Seat::new(row, column)))
        .collect()
}

/// Whether two seats touch, diagonals included.
///
/// A seat is adjacent to itself by this definition.
#[inline]
pub fn is_adjacent(a: Seat, b: Seat) -> bool {
    a.row.abs_diff(b.row) <= 1 && a.column.abs_diff(b.column) <= 1
}

/// Neighbour rule used when checking separation pairs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Adjacency {
    /// All eight surrounding seats, diagonals included.
    #[default]
    Surrounding,
    /// Only the seats sharing an edge (same row or same column, distance 1).
    Orthogonal,
}

impl Adjacency {
    /// Applies this rule to a pair of seats.
    #[inline]
    pub fn is_adjacent(self, a: Seat, b: Seat) -> bool {
        match self {
            Adjacency::Surrounding => is_adjacent(a, b),
            Adjacency::Orthogonal => a.row.abs_diff(b.row) + a.column.abs_diff(b.column) <= 1,
        }
    }
}

/// Rectangular seat grid.
///
/// Rows may grow (when a fixed position references a row past the end) but
/// never shrink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    columns: usize,
}

impl Grid {
    /// Creates a grid with explicit dimensions; both must be at least 1.
    pub fn new(rows: usize, columns: usize) -> Result<Self, crate::SeatingError> {
        if rows == 0 || columns == 0 {
            return Err(crate::SeatingError::malformed(format!(
                "grid must have at least one row and one column, got {rows}x{columns}"
            )));
        }
        Ok(Self { rows, columns })
    }

    /// Sizes a grid for `item_count` items spread over `columns` columns.
    ///
    /// Rows are `ceil(item_count / columns)`, with a minimum of one row so an
    /// empty roster still yields a grid.
    pub fn for_items(item_count: usize, columns: usize) -> Result<Self, crate::SeatingError> {
        if columns == 0 {
            return Err(crate::SeatingError::malformed(
                "column count must be at least 1",
            ));
        }
        Self::new(item_count.div_ceil(columns).max(1), columns)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Whether `seat` lies inside the grid bounds.
    pub fn contains(&self, seat: Seat) -> bool {
        (1..=self.rows).contains(&seat.row) && (1..=self.columns).contains(&seat.column)
    }

    /// Grows the grid so that `row` exists. Returns true if rows were added.
    pub fn expand_to_row(&mut self, row: usize) -> bool {
        if row > self.rows {
            self.rows = row;
            true
        } else {
            false
        }
    }

    /// Iterates all seats in row-major order.
    pub fn seats(&self) -> impl Iterator<Item = Seat> + '_ {
        let columns = self.columns;
        (1..=self.rows).flat_map(move |row| (1..=columns).map(move |column| Seat::new(row, column)))
    }
}

/// Formats row-major cell text as an aligned table.
///
/// Each column is padded to its widest cell, cells are separated by two
/// spaces and trailing whitespace is dropped.
pub fn format_chart<S: AsRef<str>>(rows: &[Vec<S>]) -> String {
    let column_count = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut widths = vec![0usize; column_count];
    for row in rows {
        for (column, cell) in row.iter().enumerate() {
            widths[column] = widths[column].max(cell.as_ref().chars().count());
        }
    }

    let mut output = String::new();
    for row in rows {
        let mut line = String::new();
        for (column, cell) in row.iter().enumerate() {
            if column > 0 {
                line.push_str("  ");
            }
            line.push_str(&format!("{:<width$}", cell.as_ref(), width = widths[column]));
        }
        output.push_str(line.trim_end());
        output.push('\n');
    }

    output
}
