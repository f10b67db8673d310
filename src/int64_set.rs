use core::fmt::Debug;

use crate::int64_map;
use crate::int64_map::Int64Map;

/// A set of `i64` values backed by an [`Int64Map<()>`](Int64Map).
///
/// Inherits the map's probing, growth and removal behavior, including the
/// bounded removal repair described on [`Int64Map`].
///
/// # Examples
///
/// ```rust
/// use clustermap::Int64Set;
///
/// let mut live_rows = Int64Set::with_capacity(64);
/// assert!(live_rows.insert(100));
/// assert!(!live_rows.insert(100));
/// assert!(live_rows.contains(100));
/// assert!(live_rows.remove(100));
/// assert!(live_rows.is_empty());
/// ```
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Int64Set {
    map: Int64Map<()>,
}

impl Debug for Int64Set {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl Int64Set {
    /// Creates an unallocated set.
    pub fn new() -> Self {
        Self {
            map: Int64Map::new(),
        }
    }

    /// Creates a set sized for `capacity` values, like
    /// [`Int64Map::with_capacity`].
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: Int64Map::with_capacity(capacity),
        }
    }

    /// Returns the number of values in the set.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the set contains no values.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns the number of values the set holds before it grows.
    pub fn capacity(&self) -> usize {
        self.map.capacity()
    }

    /// Removes every value, keeping the allocated buckets.
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Reserves room for at least `additional` more values.
    pub fn reserve(&mut self, additional: usize) {
        self.map.reserve(additional);
    }

    /// Shrinks the set to the smallest size that holds its values.
    pub fn shrink_to_fit(&mut self) {
        self.map.shrink_to_fit();
    }

    /// Rebuilds the set at its current size. See [`Int64Map::rehash`].
    pub fn rehash(&mut self) {
        self.map.rehash();
    }

    /// Adds `value`, returning `true` if it was not present.
    pub fn insert(&mut self, value: i64) -> bool {
        self.map.insert_if_absent(value, ()).1
    }

    /// Returns `true` if the set contains `value`.
    pub fn contains(&self, value: i64) -> bool {
        self.map.contains_key(value)
    }

    /// Removes `value`, returning `true` if it was present.
    pub fn remove(&mut self, value: i64) -> bool {
        self.map.remove(value).is_some()
    }

    /// Returns an iterator over the values: `0` first if present, then
    /// bucket order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.map.keys(),
        }
    }

    /// Removes every value and yields it, keeping the allocated buckets.
    pub fn drain(&mut self) -> Drain<'_> {
        Drain {
            inner: self.map.drain(),
        }
    }
}

/// An iterator over the values of an [`Int64Set`].
pub struct Iter<'a> {
    inner: int64_map::Keys<'a, ()>,
}

impl Iterator for Iter<'_> {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}

/// A draining iterator over the values of an [`Int64Set`].
pub struct Drain<'a> {
    inner: int64_map::Drain<'a, ()>,
}

impl Iterator for Drain<'_> {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        self.inner.next().map(|(value, ())| value)
    }
}

/// An owning iterator over the values of an [`Int64Set`].
pub struct IntoIter {
    inner: int64_map::IntoIter<()>,
}

impl Iterator for IntoIter {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        self.inner.next().map(|(value, ())| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl IntoIterator for Int64Set {
    type IntoIter = IntoIter;
    type Item = i64;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.map.into_iter(),
        }
    }
}

impl<'a> IntoIterator for &'a Int64Set {
    type IntoIter = Iter<'a>;
    type Item = i64;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<i64> for Int64Set {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut set = Int64Set::with_capacity(iter.size_hint().0);
        set.extend(iter);
        set
    }
}

impl Extend<i64> for Int64Set {
    fn extend<I: IntoIterator<Item = i64>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;

    #[test]
    fn insert_contains_remove() {
        let mut set = Int64Set::new();
        assert!(!set.contains(1));
        assert!(set.insert(1));
        assert!(!set.insert(1));
        assert!(set.insert(0));
        assert!(set.insert(-1));
        assert_eq!(set.len(), 3);

        assert!(set.remove(0));
        assert!(!set.remove(0));
        assert!(!set.remove(42));
        assert_eq!(set.len(), 2);
        assert!(set.contains(-1));
    }

    #[test]
    fn collect_and_iterate() {
        let set: Int64Set = (0..500).collect();
        assert_eq!(set.len(), 500);
        assert_eq!(set.iter().next(), Some(0));

        let mut values: Vec<i64> = set.iter().collect();
        values.sort_unstable();
        assert_eq!(values, (0..500).collect::<Vec<_>>());

        let mut owned: Vec<i64> = set.clone().into_iter().collect();
        owned.sort_unstable();
        assert_eq!(owned, values);
        assert_eq!((&set).into_iter().count(), 500);
    }

    #[test]
    fn equality_ignores_layout() {
        let forward: Int64Set = (1..=100).collect();
        let backward: Int64Set = (1..=100).rev().collect();
        assert_eq!(forward, backward);

        let mut other = forward.clone();
        other.insert(101);
        assert_ne!(forward, other);
    }

    #[test]
    fn equality_holds_after_removal_strands_a_value() {
        let mut set = Int64Set::with_capacity(8);
        set.extend([1, 2, 3, 12]);
        set.remove(2);
        assert!(!set.contains(12));

        let copy = set.clone();
        assert_eq!(copy, set);

        let mut rebuilt = set.clone();
        rebuilt.rehash();
        assert!(rebuilt.contains(12));
        assert_eq!(rebuilt, set);
    }

    #[test]
    fn drain_clear_and_sizing() {
        let mut set = Int64Set::with_capacity(8);
        set.extend([3, 1, 4, 1, 5, 9, 2, 6]);
        assert_eq!(set.len(), 7);

        let mut drained: Vec<i64> = set.drain().collect();
        drained.sort_unstable();
        assert_eq!(drained, [1, 2, 3, 4, 5, 6, 9]);
        assert!(set.is_empty());

        set.reserve(100);
        assert!(set.capacity() >= 100);
        set.insert(7);
        set.shrink_to_fit();
        assert!(set.contains(7));
        set.rehash();
        assert!(set.contains(7));

        set.clear();
        assert!(set.is_empty());
        assert!(!set.contains(7));
    }
}
