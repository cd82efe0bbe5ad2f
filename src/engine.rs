//! Bounded-retry randomized placement.
//!
//! How a search runs:
//! - Fixed items are seeded first and never move
//! - Open seats are listed once, row-major, and keep that order for the whole run
//! - Each trial shuffles only the unfixed items and zips them onto the open seats
//! - A trial is rejected at the first separation pair seated adjacently
//!
//! Names are resolved to roster indices up front so the hot loop works on
//! plain `usize`/`Seat` slices.

use rand::seq::SliceRandom;
use rand::Rng;
use rustc_hash::FxHashMap;
use tracing::{debug, trace, warn};

use crate::config::SolverConfig;
use crate::constraints::ConstraintSet;
use crate::error::SeatingError;
use crate::grid::{format_chart, Adjacency, Grid, Seat};
use crate::roster::Roster;

/// Marker used for empty seats in text charts.
pub const EMPTY_SEAT: &str = ".";

/// Item-to-seat mapping; no two items share a seat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    /// Entries in roster order.
    entries: Vec<(String, Seat)>,
    /// Seat to index into `entries`.
    by_seat: FxHashMap<Seat, usize>,
}

impl Assignment {
    fn from_entries(entries: Vec<(String, Seat)>) -> Self {
        let by_seat = entries
            .iter()
            .enumerate()
            .map(|(index, &(_, seat))| (seat, index))
            .collect();
        Self { entries, by_seat }
    }

    /// Seat given to `name`, if it was placed.
    pub fn seat_of(&self, name: &str) -> Option<Seat> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|&(_, seat)| seat)
    }

    /// Item sitting at `seat`, if any.
    pub fn occupant(&self, seat: Seat) -> Option<&str> {
        self.by_seat
            .get(&seat)
            .map(|&index| self.entries[index].0.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates (name, seat) in roster order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Seat)> {
        self.entries.iter().map(|(name, seat)| (name.as_str(), *seat))
    }
}

/// Outcome of a successful placement run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatingPlan {
    assignment: Assignment,
    grid: Grid,
    attempts: usize,
}

impl SeatingPlan {
    pub fn assignment(&self) -> &Assignment {
        &self.assignment
    }

    /// Final grid, including rows added for fixed positions.
    pub fn grid(&self) -> Grid {
        self.grid
    }

    /// Number of trials it took to find this plan.
    pub fn attempts(&self) -> usize {
        self.attempts
    }

    /// Row-major cell values: the occupant's name or `empty_marker`.
    pub fn rows(&self, empty_marker: &str) -> Vec<Vec<String>> {
        (1..=self.grid.rows())
            .map(|row| {
                (1..=self.grid.columns())
                    .map(|column| {
                        self.assignment
                            .occupant(Seat::new(row, column))
                            .unwrap_or(empty_marker)
                            .to_string()
                    })
                    .collect()
            })
            .collect()
    }

    /// Formats the plan as an aligned text chart, `.` for empty seats.
    pub fn chart(&self) -> String {
        format_chart(&self.rows(EMPTY_SEAT))
    }
}

/// Randomized seat assignment with a bounded number of trials.
#[derive(Debug, Clone, Copy)]
pub struct PlacementEngine {
    max_attempts: usize,
    adjacency: Adjacency,
}

impl PlacementEngine {
    pub fn new(config: &SolverConfig) -> Result<Self, SeatingError> {
        config.validate()?;
        Ok(Self {
            max_attempts: config.max_attempts,
            adjacency: config.adjacency,
        })
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Searches for a seating of every roster item.
    ///
    /// Fails with `InsufficientSeats` before any trial when the open seats
    /// cannot hold the unfixed items, and with `PlacementUnsatisfiable` when
    /// every trial seats some separation pair adjacently.
    pub fn place<R: Rng + ?Sized>(
        &self,
        roster: &Roster,
        constraints: &ConstraintSet,
        rng: &mut R,
    ) -> Result<SeatingPlan, SeatingError> {
        let fixed = constraints.fixed();

        let mut seats: Vec<Option<Seat>> = roster.iter().map(|name| fixed.get(name)).collect();
        let mut unfixed: Vec<usize> = (0..roster.len()).filter(|&i| seats[i].is_none()).collect();

        let open = constraints.open_seat_count();
        if open < unfixed.len() {
            return Err(SeatingError::InsufficientSeats {
                available: open,
                needed: unfixed.len(),
            });
        }

        // trials only ever fill the first |unfixed| open seats
        let open_seats: Vec<Seat> = constraints.available_seats().take(unfixed.len()).collect();

        // pairs naming an item outside the roster can never conflict
        let index: FxHashMap<&str, usize> =
            roster.iter().enumerate().map(|(i, name)| (name, i)).collect();
        let pairs: Vec<(usize, usize)> = constraints
            .separations()
            .iter()
            .filter_map(|pair| Some((*index.get(pair.first())?, *index.get(pair.second())?)))
            .collect();

        // nothing to shuffle means every trial would be identical
        let budget = if unfixed.is_empty() { 1 } else { self.max_attempts };

        debug!(
            items = roster.len(),
            unfixed = unfixed.len(),
            open_seats = open,
            pairs = pairs.len(),
            budget,
            "starting placement search"
        );

        for attempt in 1..=budget {
            if unfixed.len() > 1 {
                unfixed.shuffle(rng);
            }
            for (&item, &seat) in unfixed.iter().zip(&open_seats) {
                seats[item] = Some(seat);
            }

            match self.first_conflict(&seats, &pairs) {
                Some((a, b)) => {
                    trace!(
                        attempt,
                        first = %roster.names()[a],
                        second = %roster.names()[b],
                        "separation conflict"
                    );
                }
                None => {
                    debug!(attempt, "placement found");
                    let entries = roster
                        .names()
                        .iter()
                        .zip(&seats)
                        .filter_map(|(name, seat)| seat.map(|seat| (name.clone(), seat)))
                        .collect();
                    return Ok(SeatingPlan {
                        assignment: Assignment::from_entries(entries),
                        grid: constraints.grid(),
                        attempts: attempt,
                    });
                }
            }
        }

        warn!(attempts = budget, "placement search exhausted");
        Err(SeatingError::PlacementUnsatisfiable { attempts: budget })
    }

    /// First active pair whose seats are adjacent under this engine's rule.
    #[inline]
    fn first_conflict(
        &self,
        seats: &[Option<Seat>],
        pairs: &[(usize, usize)],
    ) -> Option<(usize, usize)> {
        pairs.iter().copied().find(|&(a, b)| match (seats[a], seats[b]) {
            (Some(seat_a), Some(seat_b)) => self.adjacency.is_adjacent(seat_a, seat_b),
            _ => false,
        })
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::constraints::{BlockedSeats, FixedPositions, SeparationPairs};
    use crate::grid::is_adjacent;

    fn engine() -> PlacementEngine {
        PlacementEngine::new(&SolverConfig::default()).unwrap()
    }

    fn constraints(
        grid: Grid,
        blocked: &[Seat],
        fixed: &[(&str, Seat)],
        pairs: &[(&str, &str)],
    ) -> ConstraintSet {
        let mut separations = SeparationPairs::new();
        for &(a, b) in pairs {
            separations.add(a, b).unwrap();
        }
        ConstraintSet::new(
            grid,
            blocked.iter().copied().collect::<BlockedSeats>(),
            fixed.iter().copied().collect::<FixedPositions>(),
            separations,
        )
        .unwrap()
    }

    fn assert_bijective(plan: &SeatingPlan, roster: &Roster, set: &ConstraintSet) {
        assert_eq!(plan.assignment().len(), roster.len());
        let mut used = std::collections::HashSet::new();
        for (name, seat) in plan.assignment().iter() {
            assert!(roster.contains(name));
            assert!(plan.grid().contains(seat), "{name} at {seat} is off the grid");
            assert!(!set.blocked().contains(seat), "{name} sits on blocked {seat}");
            assert!(used.insert(seat), "seat {seat} used twice");
        }
    }

    #[test]
    fn test_fully_adjacent_grid_is_unsatisfiable() {
        // every seat of a 2x2 grid touches every other seat
        let roster = Roster::new(["A", "B", "C", "D"]).unwrap();
        let set = constraints(Grid::for_items(4, 2).unwrap(), &[], &[], &[("A", "B")]);
        let mut rng = StdRng::seed_from_u64(1);

        let err = engine().place(&roster, &set, &mut rng).unwrap_err();
        assert_eq!(err, SeatingError::PlacementUnsatisfiable { attempts: 1000 });
    }

    #[test]
    fn test_row_of_five_separates_ends() {
        let roster = Roster::new(["A", "B", "C", "D", "E"]).unwrap();
        let set = constraints(Grid::for_items(5, 5).unwrap(), &[], &[], &[("A", "E")]);
        let mut rng = StdRng::seed_from_u64(42);

        let plan = engine().place(&roster, &set, &mut rng).unwrap();
        assert_bijective(&plan, &roster, &set);
        let a = plan.assignment().seat_of("A").unwrap();
        let e = plan.assignment().seat_of("E").unwrap();
        assert_eq!(plan.grid().rows(), 1);
        assert!(a.column.abs_diff(e.column) >= 2);
    }

    #[test]
    fn test_no_pairs_succeeds_first_attempt() {
        let roster = Roster::new((1..=30).map(|i| format!("s{i}"))).unwrap();
        let set = constraints(Grid::for_items(30, 6).unwrap(), &[], &[], &[]);
        let mut rng = StdRng::seed_from_u64(3);

        let plan = engine().place(&roster, &set, &mut rng).unwrap();
        assert_eq!(plan.attempts(), 1);
        assert_bijective(&plan, &roster, &set);
    }

    #[test]
    fn test_all_fixed_needs_no_randomness() {
        let roster = Roster::new(["A", "B"]).unwrap();
        let set = constraints(
            Grid::for_items(2, 3).unwrap(),
            &[],
            &[("A", Seat::new(1, 1)), ("B", Seat::new(1, 3))],
            &[("A", "B")],
        );
        let mut rng = StdRng::seed_from_u64(0);

        let plan = engine().place(&roster, &set, &mut rng).unwrap();
        assert_eq!(plan.attempts(), 1);
        assert_eq!(plan.assignment().seat_of("A"), Some(Seat::new(1, 1)));
        assert_eq!(plan.assignment().seat_of("B"), Some(Seat::new(1, 3)));
    }

    #[test]
    fn test_adjacent_fixed_pair_fails_after_one_attempt() {
        let roster = Roster::new(["A", "B"]).unwrap();
        let set = constraints(
            Grid::for_items(2, 2).unwrap(),
            &[],
            &[("A", Seat::new(1, 1)), ("B", Seat::new(1, 2))],
            &[("A", "B")],
        );
        let mut rng = StdRng::seed_from_u64(0);

        let err = engine().place(&roster, &set, &mut rng).unwrap_err();
        assert_eq!(err, SeatingError::PlacementUnsatisfiable { attempts: 1 });
    }

    #[test]
    fn test_fixed_positions_are_honoured() {
        let roster = Roster::new(["A", "B", "C", "D", "E", "F"]).unwrap();
        let set = constraints(
            Grid::for_items(6, 3).unwrap(),
            &[Seat::new(1, 2)],
            &[("C", Seat::new(2, 2)), ("F", Seat::new(4, 1))],
            &[("A", "B")],
        );

        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let plan = engine().place(&roster, &set, &mut rng).unwrap();
            assert_bijective(&plan, &roster, &set);
            assert_eq!(plan.grid().rows(), 4);
            assert_eq!(plan.assignment().seat_of("C"), Some(Seat::new(2, 2)));
            assert_eq!(plan.assignment().seat_of("F"), Some(Seat::new(4, 1)));
            let a = plan.assignment().seat_of("A").unwrap();
            let b = plan.assignment().seat_of("B").unwrap();
            assert!(!is_adjacent(a, b));
        }
    }

    #[test]
    fn test_insufficient_seats_before_search() {
        let roster = Roster::new(["A", "B", "C", "D"]).unwrap();
        let set = constraints(
            Grid::for_items(4, 2).unwrap(),
            &[Seat::new(2, 2)],
            &[("A", Seat::new(1, 1))],
            &[],
        );
        let mut rng = StdRng::seed_from_u64(0);

        let err = engine().place(&roster, &set, &mut rng).unwrap_err();
        assert_eq!(
            err,
            SeatingError::InsufficientSeats {
                available: 2,
                needed: 3
            }
        );
    }

    #[test]
    fn test_zero_slack_with_forced_adjacency() {
        // two seats side by side, both needed, pair must split them
        let roster = Roster::new(["A", "B"]).unwrap();
        let set = constraints(Grid::for_items(2, 2).unwrap(), &[], &[], &[("A", "B")]);
        let engine = PlacementEngine::new(&SolverConfig::new().with_max_attempts(25)).unwrap();
        let mut rng = StdRng::seed_from_u64(9);

        let err = engine.place(&roster, &set, &mut rng).unwrap_err();
        assert_eq!(err, SeatingError::PlacementUnsatisfiable { attempts: 25 });
    }

    #[test]
    fn test_orthogonal_rule_allows_diagonals() {
        // 2x2 with two blocked seats on one diagonal leaves the other diagonal
        let roster = Roster::new(["A", "B"]).unwrap();
        let set = constraints(
            Grid::for_items(4, 2).unwrap(),
            &[Seat::new(1, 2), Seat::new(2, 1)],
            &[],
            &[("A", "B")],
        );
        let mut rng = StdRng::seed_from_u64(5);

        let surrounding = engine().place(&roster, &set, &mut rng);
        assert!(matches!(
            surrounding,
            Err(SeatingError::PlacementUnsatisfiable { .. })
        ));

        let orthogonal = PlacementEngine::new(
            &SolverConfig::new().with_adjacency(Adjacency::Orthogonal),
        )
        .unwrap();
        let plan = orthogonal.place(&roster, &set, &mut rng).unwrap();
        assert_eq!(plan.attempts(), 1);
    }

    #[test]
    fn test_names_outside_roster_are_ignored() {
        let roster = Roster::new(["A", "B", "C"]).unwrap();
        let set = constraints(
            Grid::for_items(3, 3).unwrap(),
            &[],
            &[("Ghost", Seat::new(2, 2))],
            &[("A", "Ghost"), ("B", "Nobody")],
        );
        let mut rng = StdRng::seed_from_u64(11);

        let plan = engine().place(&roster, &set, &mut rng).unwrap();
        assert_eq!(plan.attempts(), 1);
        assert_eq!(plan.assignment().seat_of("Ghost"), None);
        assert_eq!(plan.assignment().occupant(Seat::new(2, 2)), None);
        assert_eq!(plan.grid().rows(), 2);
    }

    #[test]
    fn test_far_fixed_row_does_not_slow_search() {
        let roster = Roster::new(["A", "B"]).unwrap();
        let set = constraints(
            Grid::for_items(2, 1).unwrap(),
            &[],
            &[("Ghost", Seat::new(30_000_000, 1))],
            &[],
        );
        let mut rng = StdRng::seed_from_u64(4);

        let plan = engine().place(&roster, &set, &mut rng).unwrap();
        assert_eq!(plan.grid().rows(), 30_000_000);
        let mut used: Vec<Seat> = plan.assignment().iter().map(|(_, seat)| seat).collect();
        used.sort_unstable();
        assert_eq!(used, vec![Seat::new(1, 1), Seat::new(2, 1)]);
    }

    #[test]
    fn test_same_seed_same_plan() {
        let roster = Roster::new((1..=12).map(|i| format!("s{i}"))).unwrap();
        let set = constraints(
            Grid::for_items(12, 4).unwrap(),
            &[],
            &[],
            &[("s1", "s2"), ("s3", "s4"), ("s1", "s5")],
        );

        let first = engine().place(&roster, &set, &mut StdRng::seed_from_u64(77)).unwrap();
        let second = engine().place(&roster, &set, &mut StdRng::seed_from_u64(77)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_roster_yields_empty_plan() {
        let roster = Roster::new(Vec::<String>::new()).unwrap();
        let set = constraints(Grid::for_items(0, 4).unwrap(), &[], &[], &[]);
        let mut rng = StdRng::seed_from_u64(0);

        let plan = engine().place(&roster, &set, &mut rng).unwrap();
        assert!(plan.assignment().is_empty());
        assert_eq!(plan.attempts(), 1);
        assert_eq!(plan.rows("-"), vec![vec!["-"; 4]]);
    }

    #[test]
    fn test_chart_of_fixed_plan() {
        let roster = Roster::new(["Ana", "Ben", "Cy"]).unwrap();
        let set = constraints(
            Grid::for_items(3, 2).unwrap(),
            &[],
            &[
                ("Ana", Seat::new(1, 1)),
                ("Ben", Seat::new(2, 2)),
                ("Cy", Seat::new(3, 1)),
            ],
            &[],
        );
        let mut rng = StdRng::seed_from_u64(0);

        let plan = engine().place(&roster, &set, &mut rng).unwrap();
        insta::assert_snapshot!(plan.chart(), @r"
        Ana  .
        .    Ben
        Cy   .
        ");
    }
}
