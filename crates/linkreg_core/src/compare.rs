//! Key comparison strategies.
//!
//! Every ordered store takes its comparator at construction time and uses it
//! for insertion, lookup and deletion alike, so a store never mixes orders.

use std::cmp::Ordering;

/// A total order over string keys.
pub trait KeyComparator {
    /// Compares two keys.
    fn compare(&self, a: &str, b: &str) -> Ordering;

    /// Returns true if the keys are equal under this order.
    fn equals(&self, a: &str, b: &str) -> bool {
        self.compare(a, b) == Ordering::Equal
    }
}

/// Byte-exact ordering, used for content hashes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bytewise;

impl KeyComparator for Bytewise {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        a.as_bytes().cmp(b.as_bytes())
    }
}

/// Case-insensitive ordering, used for human names.
///
/// Both sides are lowercased character by character during the comparison;
/// the inputs are never modified and nothing is allocated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaseInsensitive;

impl KeyComparator for CaseInsensitive {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        a.chars()
            .flat_map(char::to_lowercase)
            .cmp(b.chars().flat_map(char::to_lowercase))
    }
}

/// Comparator selection for a store.
#[derive(Debug, Clone, Copy, Default)]
pub enum KeyOrder {
    /// See [`Bytewise`].
    #[default]
    Bytewise,
    /// See [`CaseInsensitive`].
    CaseInsensitive,
    /// A caller-supplied total order.
    Custom(fn(&str, &str) -> Ordering),
}

impl KeyComparator for KeyOrder {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        match self {
            Self::Bytewise => Bytewise.compare(a, b),
            Self::CaseInsensitive => CaseInsensitive.compare(a, b),
            Self::Custom(compare) => compare(a, b),
        }
    }
}
