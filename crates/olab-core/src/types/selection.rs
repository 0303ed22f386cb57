//! Ephemeral selection sets used to scope queries and bulk actions.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// An ordered set of selected ids.
///
/// Selections live only as long as the page that owns them and are never
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection<T: Ord>(BTreeSet<T>);

impl<T: Ord> Default for Selection<T> {
    fn default() -> Self {
        Self(BTreeSet::new())
    }
}

impl<T: Ord + Copy> Selection<T> {
    /// Create an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selection with the given ids.
    pub fn set(&mut self, ids: impl IntoIterator<Item = T>) {
        self.0 = ids.into_iter().collect();
    }

    /// Clear the selection.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Whether the id is selected.
    pub fn contains(&self, id: &T) -> bool {
        self.0.contains(id)
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of selected ids.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate the selected ids in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.0.iter().copied()
    }

    /// Collect the selected ids into a vector.
    pub fn to_vec(&self) -> Vec<T> {
        self.0.iter().copied().collect()
    }
}

impl<T: Ord> FromIterator<T> for Selection<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_replaces() {
        let mut sel: Selection<i64> = [1, 2, 3].into_iter().collect();
        sel.set([5, 4]);
        assert_eq!(sel.to_vec(), vec![4, 5]);
        assert!(!sel.contains(&1));
    }

    #[test]
    fn test_clear() {
        let mut sel: Selection<i64> = [1].into_iter().collect();
        assert_eq!(sel.len(), 1);
        sel.clear();
        assert!(sel.is_empty());
    }
}
