//! Categorical label encoding
//!
//! Each categorical column owns an independent [`Vocabulary`] mapping its
//! training-time labels to dense indices. Indices are tagged with their column
//! type, so an index from the primary-interest vocabulary cannot be passed
//! where a secondary-interest index is expected.
//!
//! The same literal string may map to different indices in different
//! columns, because each vocabulary is fit on its own column.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

use crate::{Error, Result};

/// Marker for a categorical column
pub trait Column:
    fmt::Debug + Clone + Copy + PartialEq + Eq + Hash + PartialOrd + Ord + Default + Send + Sync + 'static
{
    /// Column name, as it appears in the training CSV header
    const NAME: &'static str;
}

macro_rules! column {
    ($(#[$meta:meta])* $ty:ident => $name:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        pub struct $ty;

        impl Column for $ty {
            const NAME: &'static str = $name;
        }
    };
}

column!(
    /// First (primary) interest input
    PrimaryInterest => "interest_1"
);
column!(
    /// Second (secondary) interest input
    SecondaryInterest => "interest_2"
);
column!(
    /// Suggested field of study output
    Field => "suggested_field"
);
column!(
    /// Degree options output
    Degree => "degree_options"
);
column!(
    /// Career paths output
    Career => "career_paths"
);

/// Dense index into the vocabulary of column `C`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LabelIndex<C: Column> {
    raw: usize,
    _column: PhantomData<C>,
}

impl<C: Column> LabelIndex<C> {
    /// Wrap a raw index without bounds checking; [`Vocabulary::decode`] checks it
    pub fn from_raw(raw: usize) -> Self {
        Self {
            raw,
            _column: PhantomData,
        }
    }

    pub fn get(self) -> usize {
        self.raw
    }
}

impl<C: Column> fmt::Display for LabelIndex<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", C::NAME, self.raw)
    }
}

/// Bijection between one column's labels and `0..len`
///
/// Labels are stored in ascending byte order; a label's index is its rank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary<C: Column> {
    labels: Vec<String>,
    index: HashMap<String, usize>,
    _column: PhantomData<C>,
}

impl<C: Column> Vocabulary<C> {
    /// Fit a vocabulary on every value observed in a column
    pub fn fit<I, S>(observed: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut labels: Vec<String> = observed.into_iter().map(|s| s.as_ref().to_string()).collect();
        labels.sort();
        labels.dedup();
        Self::from_sorted_labels(labels)
            .map_err(|e| Error::Training(format!("cannot fit {}: {}", C::NAME, e)))
    }

    fn from_sorted_labels(labels: Vec<String>) -> std::result::Result<Self, String> {
        if labels.is_empty() {
            return Err("vocabulary is empty".to_string());
        }
        if labels.windows(2).any(|w| w[0] >= w[1]) {
            return Err("labels are not strictly ascending".to_string());
        }
        let index = labels
            .iter()
            .enumerate()
            .map(|(i, label)| (label.clone(), i))
            .collect();
        Ok(Self {
            labels,
            index,
            _column: PhantomData,
        })
    }

    /// Index of `label`; labels unseen at training time are rejected
    pub fn encode(&self, label: &str) -> Result<LabelIndex<C>> {
        self.index
            .get(label)
            .map(|&i| LabelIndex::from_raw(i))
            .ok_or_else(|| Error::UnknownLabel {
                column: C::NAME,
                label: label.to_string(),
            })
    }

    /// Label at `index`
    pub fn decode(&self, index: LabelIndex<C>) -> Result<&str> {
        self.labels
            .get(index.get())
            .map(String::as_str)
            .ok_or(Error::IndexOutOfRange {
                column: C::NAME,
                index: index.get(),
                size: self.labels.len(),
            })
    }

    pub fn contains(&self, label: &str) -> bool {
        self.index.contains_key(label)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Always false for a constructed vocabulary
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

#[derive(Serialize)]
struct VocabularyRef<'a> {
    column: &'a str,
    labels: &'a [String],
}

#[derive(Deserialize)]
struct VocabularyOwned {
    column: String,
    labels: Vec<String>,
}

impl<C: Column> Serialize for Vocabulary<C> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        VocabularyRef {
            column: C::NAME,
            labels: &self.labels,
        }
        .serialize(serializer)
    }
}

impl<'de, C: Column> Deserialize<'de> for Vocabulary<C> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let owned = VocabularyOwned::deserialize(deserializer)?;
        if owned.column != C::NAME {
            return Err(D::Error::custom(format!(
                "vocabulary is for column {}, expected {}",
                owned.column,
                C::NAME
            )));
        }
        Self::from_sorted_labels(owned.labels).map_err(D::Error::custom)
    }
}
