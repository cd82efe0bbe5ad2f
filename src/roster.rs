//! The ordered list of items (students) to seat.

use rustc_hash::FxHashSet;

use crate::error::SeatingError;

/// Validated, ordered item names.
///
/// Names are unique and non-empty; caller order is preserved because the
/// engine derives its unfixed-item list from it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    names: Vec<String>,
}

impl Roster {
    /// Builds a roster, rejecting blank and duplicate names.
    pub fn new<I, S>(names: I) -> Result<Self, SeatingError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let mut seen: FxHashSet<&str> = FxHashSet::default();

        for name in &names {
            if name.trim().is_empty() {
                return Err(SeatingError::malformed("item names must not be blank"));
            }
            if !seen.insert(name.as_str()) {
                return Err(SeatingError::malformed(format!(
                    "item '{name}' appears more than once"
                )));
            }
        }

        Ok(Self { names })
    }

    /// Builds a roster and checks it against a separately declared count.
    pub fn with_expected_count<I, S>(names: I, expected: usize) -> Result<Self, SeatingError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let roster = Self::new(names)?;
        if roster.len() != expected {
            return Err(SeatingError::malformed(format!(
                "declared {expected} items but {} names were given",
                roster.len()
            )));
        }
        Ok(roster)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}
