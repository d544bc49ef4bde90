//! Interest compatibility table
//!
//! Static mapping from a primary interest to the secondary interests that may
//! accompany it. Used both to offer choices and to validate a submitted pair.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::{Error, Result};

/// Built-in table, in presentation order
const DEFAULT_ENTRIES: &[(&str, &[&str])] = &[
    ("Maths", &["Physics", "Computer", "Chemistry", "Biology", "Finance"]),
    ("Physics", &["Chemistry", "Biology", "Computer", "Finance", "Space"]),
    ("Chemistry", &["Biology", "Computer", "Finance", "Space"]),
    ("Computer", &["Finance", "Space"]),
    ("Kannada", &["History"]),
];

/// Ordered (primary, secondary) pair of user-chosen interests
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InterestPair {
    pub primary: String,
    pub secondary: String,
}

impl InterestPair {
    pub fn new(primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            secondary: secondary.into(),
        }
    }
}

/// Primary interest → allowed secondary interests
#[derive(Debug, Clone)]
pub struct CompatibilityTable {
    entries: Vec<(String, Vec<String>)>,
}

impl Default for CompatibilityTable {
    fn default() -> Self {
        Self::from_entries(DEFAULT_ENTRIES.iter().map(|(primary, secondaries)| {
            (primary.to_string(), secondaries.iter().map(|s| s.to_string()).collect())
        }))
    }
}

impl CompatibilityTable {
    /// Build a table from explicit entries (later duplicates of a primary are ignored)
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, Vec<String>)>,
    {
        let mut table: Vec<(String, Vec<String>)> = Vec::new();
        for (primary, secondaries) in entries {
            if table.iter().any(|(p, _)| *p == primary) {
                continue;
            }
            table.push((primary, secondaries));
        }
        Self { entries: table }
    }

    /// Primary interests in table order
    pub fn primaries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(p, _)| p.as_str())
    }

    /// Allowed secondary interests for `primary`; empty for an unknown primary
    pub fn allowed(&self, primary: &str) -> &[String] {
        self.entries
            .iter()
            .find(|(p, _)| p == primary)
            .map(|(_, s)| s.as_slice())
            .unwrap_or(&[])
    }

    pub fn contains_primary(&self, primary: &str) -> bool {
        self.entries.iter().any(|(p, _)| p == primary)
    }

    pub fn is_allowed(&self, primary: &str, secondary: &str) -> bool {
        self.allowed(primary).iter().any(|s| s == secondary)
    }

    /// Check a pair against the table
    pub fn validate(&self, pair: &InterestPair) -> Result<()> {
        if self.is_allowed(&pair.primary, &pair.secondary) {
            Ok(())
        } else {
            Err(Error::InvalidInterestPair {
                primary: pair.primary.clone(),
                secondary: pair.secondary.clone(),
            })
        }
    }

    /// Allowed secondaries for display, in a fresh random order on each call
    pub fn shuffled_candidates<R: Rng + ?Sized>(&self, primary: &str, rng: &mut R) -> Vec<String> {
        let mut candidates = self.allowed(primary).to_vec();
        candidates.shuffle(rng);
        candidates
    }

    /// Every (primary, secondary) combination the table permits
    pub fn pairs(&self) -> impl Iterator<Item = InterestPair> + '_ {
        self.entries.iter().flat_map(|(primary, secondaries)| {
            secondaries
                .iter()
                .map(move |secondary| InterestPair::new(primary.clone(), secondary.clone()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_every_primary_has_candidates() {
        let table = CompatibilityTable::default();
        let mut rng = StdRng::seed_from_u64(7);
        for primary in table.primaries() {
            let candidates = table.shuffled_candidates(primary, &mut rng);
            assert!(!candidates.is_empty(), "{} has no candidates", primary);
            for c in &candidates {
                assert!(table.is_allowed(primary, c));
            }
            assert_eq!(candidates.len(), table.allowed(primary).len());
        }
    }

    #[test]
    fn test_unknown_primary_is_empty() {
        let table = CompatibilityTable::default();
        assert!(table.allowed("Unknown").is_empty());
        assert!(!table.contains_primary("Unknown"));
    }

    #[test]
    fn test_validate() {
        let table = CompatibilityTable::default();
        assert!(table.validate(&InterestPair::new("Maths", "Physics")).is_ok());
        assert!(matches!(
            table.validate(&InterestPair::new("Maths", "History")),
            Err(Error::InvalidInterestPair { .. })
        ));
        assert!(matches!(
            table.validate(&InterestPair::new("Unknown", "Physics")),
            Err(Error::InvalidInterestPair { .. })
        ));
    }

    #[test]
    fn test_duplicate_primary_keeps_first() {
        let table = CompatibilityTable::from_entries(vec![
            ("A".to_string(), vec!["B".to_string()]),
            ("A".to_string(), vec!["C".to_string()]),
        ]);
        assert_eq!(table.allowed("A"), &["B".to_string()]);
        assert_eq!(table.pairs().count(), 1);
    }
}
