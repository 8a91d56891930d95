//! Per-owner reference lists.
//!
//! A reference is the canonical key of an asset, copied at attach time. It
//! never owns the asset and is resolved through the asset store on use, so
//! dropping a reference list can never drop an asset.

/// Ordered, duplicate-free references held by one owner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefList {
    keys: Vec<String>,
}

impl RefList {
    /// Creates an empty reference list.
    #[must_use]
    pub const fn new() -> Self {
        Self { keys: Vec::new() }
    }

    /// Appends `key` unless it is already present.
    ///
    /// Returns false for a duplicate.
    pub fn attach(&mut self, key: impl Into<String>) -> bool {
        let key = key.into();
        if self.contains(&key) {
            return false;
        }
        self.keys.push(key);
        true
    }

    /// Removes `key`, keeping the order of the rest.
    ///
    /// Returns false if `key` was not present.
    pub fn detach(&mut self, key: &str) -> bool {
        match self.keys.iter().position(|held| held == key) {
            Some(index) => {
                self.keys.remove(index);
                true
            }
            None => false,
        }
    }

    /// Checks whether `key` is held.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.keys.iter().any(|held| held == key)
    }

    /// Drops every reference and returns how many there were.
    pub fn clear(&mut self) -> usize {
        let count = self.keys.len();
        self.keys.clear();
        count
    }

    /// Iterates over keys in attachment order.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.keys.iter().map(String::as_str)
    }

    /// Returns the number of references.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if nothing is referenced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
