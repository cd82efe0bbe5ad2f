//! Placement constraints: blocked seats, fixed positions and separation pairs.
//!
//! `ConstraintSet::new` is the single validation point. Anything it accepts is
//! internally consistent, so the engine only has to deal with the randomized
//! search itself.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use crate::error::{Occupant, SeatingError};
use crate::grid::{Grid, Seat};

/// Seats excluded from assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockedSeats {
    seats: FxHashSet<Seat>,
}

impl BlockedSeats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a seat. Returns false if it was already blocked.
    pub fn insert(&mut self, seat: Seat) -> bool {
        self.seats.insert(seat)
    }

    pub fn contains(&self, seat: Seat) -> bool {
        self.seats.contains(&seat)
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Seat> + '_ {
        self.seats.iter().copied()
    }
}

impl FromIterator<Seat> for BlockedSeats {
    fn from_iter<I: IntoIterator<Item = Seat>>(iter: I) -> Self {
        Self {
            seats: iter.into_iter().collect(),
        }
    }
}

/// Mandatory item-to-seat pairings, kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixedPositions {
    entries: Vec<(String, Seat)>,
}

impl FixedPositions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pins `name` to `seat`, replacing any earlier seat for the same name.
    pub fn insert(&mut self, name: impl Into<String>, seat: Seat) -> Option<Seat> {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => Some(std::mem::replace(existing, seat)),
            None => {
                self.entries.push((name, seat));
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<Seat> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|&(_, seat)| seat)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Seat)> {
        self.entries.iter().map(|(name, seat)| (name.as_str(), *seat))
    }
}

impl<S: Into<String>> FromIterator<(S, Seat)> for FixedPositions {
    fn from_iter<I: IntoIterator<Item = (S, Seat)>>(iter: I) -> Self {
        let mut fixed = Self::new();
        for (name, seat) in iter {
            fixed.insert(name, seat);
        }
        fixed
    }
}

/// Two distinct items that must not end up next to each other.
///
/// Unordered: the names are stored sorted so `{A, B} == {B, A}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeparationPair {
    first: String,
    second: String,
}

impl SeparationPair {
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Result<Self, SeatingError> {
        let (a, b) = (a.into(), b.into());
        if a == b {
            return Err(SeatingError::malformed(format!(
                "'{a}' cannot be separated from itself"
            )));
        }
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        Ok(Self { first, second })
    }

    pub fn first(&self) -> &str {
        &self.first
    }

    pub fn second(&self) -> &str {
        &self.second
    }
}

/// De-duplicated set of separation pairs, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeparationPairs {
    pairs: Vec<SeparationPair>,
}

impl SeparationPairs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a pair. Returns false if it was already present.
    pub fn insert(&mut self, pair: SeparationPair) -> bool {
        if self.pairs.contains(&pair) {
            false
        } else {
            self.pairs.push(pair);
            true
        }
    }

    /// Adds the pair `{a, b}`.
    pub fn add(&mut self, a: impl Into<String>, b: impl Into<String>) -> Result<bool, SeatingError> {
        Ok(self.insert(SeparationPair::new(a, b)?))
    }

    /// Separates every member of `group` from every other member.
    ///
    /// Repeated names inside the group are ignored. Returns the number of
    /// new pairs added.
    pub fn add_group<S: AsRef<str>>(&mut self, group: &[S]) -> usize {
        let mut members: Vec<&str> = Vec::with_capacity(group.len());
        for name in group {
            if !members.contains(&name.as_ref()) {
                members.push(name.as_ref());
            }
        }

        let mut added = 0;
        for (i, a) in members.iter().enumerate() {
            for b in &members[i + 1..] {
                // members are distinct, so the pair is always valid
                if let Ok(pair) = SeparationPair::new(*a, *b) {
                    if self.insert(pair) {
                        added += 1;
                    }
                }
            }
        }
        added
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SeparationPair> {
        self.pairs.iter()
    }
}

impl FromIterator<SeparationPair> for SeparationPairs {
    fn from_iter<I: IntoIterator<Item = SeparationPair>>(iter: I) -> Self {
        let mut pairs = Self::new();
        for pair in iter {
            pairs.insert(pair);
        }
        pairs
    }
}

/// Validated constraints together with the grid they apply to.
///
/// The grid stored here may have more rows than the one passed in: fixed
/// positions beyond the last row expand it.
#[derive(Debug, Clone)]
pub struct ConstraintSet {
    grid: Grid,
    blocked: BlockedSeats,
    fixed: FixedPositions,
    separations: SeparationPairs,
}

impl ConstraintSet {
    /// Validates the constraints against `grid`, expanding rows as needed.
    ///
    /// Fails with `SeatOutOfRange` for a fixed seat with a zero row, a zero
    /// column or a column past the grid width, and with `SeatConflict` when a
    /// fixed seat is blocked or already taken by another fixed item.
    pub fn new(
        mut grid: Grid,
        blocked: BlockedSeats,
        fixed: FixedPositions,
        separations: SeparationPairs,
    ) -> Result<Self, SeatingError> {
        for (item, seat) in fixed.iter() {
            if seat.row == 0 || seat.column == 0 || seat.column > grid.columns() {
                return Err(SeatingError::SeatOutOfRange {
                    item: item.to_string(),
                    seat,
                    rows: grid.rows(),
                    columns: grid.columns(),
                });
            }
            if grid.expand_to_row(seat.row) {
                debug!(item, row = seat.row, "expanded grid for fixed position");
            }
        }

        check_conflicts(&blocked, &fixed)?;

        Ok(Self {
            grid,
            blocked,
            fixed,
            separations,
        })
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn blocked(&self) -> &BlockedSeats {
        &self.blocked
    }

    pub fn fixed(&self) -> &FixedPositions {
        &self.fixed
    }

    pub fn separations(&self) -> &SeparationPairs {
        &self.separations
    }

    /// Seats open to unfixed items, in row-major order.
    ///
    /// Lazy: callers take only as many seats as they need, so a grid stretched
    /// by a far-away fixed row is never materialised.
    pub fn available_seats(&self) -> impl Iterator<Item = Seat> + '_ {
        let claimed: FxHashSet<Seat> = self.fixed.iter().map(|(_, seat)| seat).collect();
        self.grid
            .seats()
            .filter(move |seat| !self.blocked.contains(*seat) && !claimed.contains(seat))
    }

    /// Number of seats `available_seats` yields, without walking the grid.
    ///
    /// Fixed seats are distinct, unblocked and inside the grid once `new` has
    /// accepted them. Saturates instead of overflowing on huge grids.
    pub fn open_seat_count(&self) -> usize {
        let blocked_inside = self.blocked.iter().filter(|&seat| self.grid.contains(seat)).count();
        self.grid
            .rows()
            .saturating_mul(self.grid.columns())
            .saturating_sub(blocked_inside + self.fixed.len())
    }
}

/// Rejects fixed seats that are blocked or shared with another fixed item.
fn check_conflicts(blocked: &BlockedSeats, fixed: &FixedPositions) -> Result<(), SeatingError> {
    let mut claimed: FxHashMap<Seat, &str> = FxHashMap::default();
    for (item, seat) in fixed.iter() {
        if blocked.contains(seat) {
            return Err(SeatingError::SeatConflict {
                item: item.to_string(),
                seat,
                other: Occupant::Blocked,
            });
        }
        if let Some(holder) = claimed.insert(seat, item) {
            return Err(SeatingError::SeatConflict {
                item: item.to_string(),
                seat,
                other: Occupant::Item(holder.to_string()),
            });
        }
    }
    Ok(())
}
