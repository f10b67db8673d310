use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt::Debug;
use core::iter::FusedIterator;
use core::mem::MaybeUninit;

use crate::probe::EMPTY_KEY;
use crate::probe::ProbeSeq;
use crate::probe::REPAIR_HORIZON;
use crate::probe::buckets_for_capacity;
use crate::probe::buckets_to_hold;
use crate::probe::grown_buckets;
use crate::probe::growth_threshold;
use crate::probe::is_between;
use crate::probe::prefetch;
use crate::probe::primary_index;

/// One bucket of the slot array. `value` is initialized iff `key !=
/// EMPTY_KEY`.
pub(crate) struct Slot<V> {
    pub(crate) key: i64,
    value: MaybeUninit<V>,
}

impl<V> Slot<V> {
    #[inline]
    fn vacant() -> Self {
        Self {
            key: EMPTY_KEY,
            value: MaybeUninit::uninit(),
        }
    }

    #[inline(always)]
    pub(crate) fn is_vacant(&self) -> bool {
        self.key == EMPTY_KEY
    }
}

enum Probe {
    Occupied(usize),
    Vacant(usize),
    Exhausted,
}

/// An open-addressing hash map from `i64` keys to values of type `V`, tuned
/// for clustered keys such as sequential row ids or timestamps.
///
/// Keys are placed with double hashing: a primary mixer picks the first
/// bucket and a second, independent mixer picks an odd step for a quadratic
/// probe sequence. Consecutive keys therefore follow different trajectories
/// instead of piling into one run. Key `0` marks a vacant bucket and is kept
/// in a dedicated cell outside the slot array.
///
/// Removal clears the bucket and then runs a bounded chain repair over the
/// next [`REPAIR_HORIZON`] buckets. The repair is not exhaustive: under
/// delete-heavy workloads an entry whose probe sequence crossed the freed
/// bucket can become unreachable. It stays counted in [`len`] and is
/// reachable again after the next growth or an explicit [`rehash`].
/// Iteration and equality see every stored entry, reachable or not.
///
/// [`len`]: Int64Map::len
/// [`rehash`]: Int64Map::rehash
///
/// ## Performance Characteristics
///
/// - **Memory**: 8 bytes per bucket plus the size of `V`, at a maximum load
///   factor of 75%.
/// - Lookups, inserts and removals are O(1) expected. Growth is O(buckets).
///
/// ## Example
///
/// ```rust
/// use clustermap::Int64Map;
///
/// let mut rows: Int64Map<&str> = Int64Map::with_capacity(16);
/// rows.insert(1, "alice");
/// rows.insert(2, "bob");
/// rows.insert(0, "root");
///
/// assert_eq!(rows.get(2), Some(&"bob"));
/// assert_eq!(rows.len(), 3);
///
/// assert_eq!(rows.remove(1), Some("alice"));
/// assert!(!rows.contains_key(1));
/// ```
pub struct Int64Map<V> {
    slots: Box<[Slot<V>]>,
    mask: usize,
    /// Live array entries plus one for the zero key.
    populated: usize,
    grow_at: usize,
    zero: Option<V>,
}

impl<V> Default for Int64Map<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Debug for Int64Map<V>
where
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<V> Clone for Int64Map<V>
where
    V: Clone,
{
    fn clone(&self) -> Self {
        let slots = self
            .slots
            .iter()
            .map(|slot| {
                if slot.is_vacant() {
                    Slot::vacant()
                } else {
                    // SAFETY: occupied slots hold an initialized value.
                    let value = unsafe { slot.value.assume_init_ref() }.clone();
                    Slot {
                        key: slot.key,
                        value: MaybeUninit::new(value),
                    }
                }
            })
            .collect::<Vec<_>>()
            .into_boxed_slice();

        Self {
            slots,
            mask: self.mask,
            populated: self.populated,
            grow_at: self.grow_at,
            zero: self.zero.clone(),
        }
    }
}

impl<V> PartialEq for Int64Map<V>
where
    V: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.iter()
            .all(|(key, value)| other.contains_entry(key, value))
    }
}

impl<V> Eq for Int64Map<V> where V: Eq {}

impl<V> Int64Map<V>
where
    V: PartialEq,
{
    /// Looks for `(key, value)` along the whole probe sequence of `key`,
    /// including buckets past a vacant one, so entries that lookups can no
    /// longer reach still match.
    fn contains_entry(&self, key: i64, value: &V) -> bool {
        if key == EMPTY_KEY {
            return self.zero.as_ref() == Some(value);
        }
        if self.slots.is_empty() {
            return false;
        }

        ProbeSeq::new(key, self.mask).any(|index| {
            let slot = &self.slots[index];
            // SAFETY: occupied slots hold an initialized value.
            slot.key == key && unsafe { slot.value.assume_init_ref() } == value
        })
    }
}

impl<V> Drop for Int64Map<V> {
    fn drop(&mut self) {
        if core::mem::needs_drop::<V>() && self.array_len() > 0 {
            for slot in self.slots.iter_mut() {
                if !slot.is_vacant() {
                    slot.key = EMPTY_KEY;
                    // SAFETY: the slot was occupied, so its value is
                    // initialized, and it is marked vacant before dropping.
                    unsafe { slot.value.assume_init_drop() };
                }
            }
        }
    }
}

impl<V> Int64Map<V> {
    /// Creates an unallocated map.
    ///
    /// Lookups and removals on an unallocated map behave as on an empty one.
    /// The first insertion of a non-zero key allocates the minimum table.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use clustermap::Int64Map;
    ///
    /// let mut map: Int64Map<u32> = Int64Map::new();
    /// assert_eq!(map.capacity(), 0);
    /// assert_eq!(map.get(7), None);
    /// assert_eq!(map.remove(7), None);
    ///
    /// map.insert(7, 1);
    /// assert_eq!(map.buckets(), 8);
    /// ```
    pub fn new() -> Self {
        Self {
            slots: Box::default(),
            mask: 0,
            populated: 0,
            grow_at: 0,
            zero: None,
        }
    }

    /// Creates a map sized for `capacity` entries.
    ///
    /// Hints above 8 get the smallest power-of-two bucket count whose 75%
    /// threshold fits `capacity`. Smaller hints get the minimum 8 buckets.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use clustermap::Int64Map;
    ///
    /// let map: Int64Map<String> = Int64Map::with_capacity(100);
    /// assert!(map.capacity() >= 100);
    /// assert_eq!(map.buckets(), 256);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        let buckets = buckets_for_capacity(capacity);
        Self {
            slots: Self::vacant_slots(buckets),
            mask: buckets - 1,
            populated: 0,
            grow_at: growth_threshold(buckets),
            zero: None,
        }
    }

    fn vacant_slots(buckets: usize) -> Box<[Slot<V>]> {
        (0..buckets).map(|_| Slot::vacant()).collect()
    }

    /// Returns the number of entries in the map, counting key `0`.
    pub fn len(&self) -> usize {
        self.populated
    }

    /// Returns `true` if the map contains no entries.
    pub fn is_empty(&self) -> bool {
        self.populated == 0
    }

    /// Returns the number of entries the map holds before the next insert of
    /// a non-zero key grows it. Key `0` counts towards this even though it is
    /// stored out of band.
    pub fn capacity(&self) -> usize {
        self.grow_at
    }

    /// Returns the length of the slot array.
    pub fn buckets(&self) -> usize {
        self.slots.len()
    }

    #[inline(always)]
    fn array_len(&self) -> usize {
        self.populated - usize::from(self.zero.is_some())
    }

    #[inline]
    fn probe(&self, key: i64) -> Probe {
        debug_assert_ne!(key, EMPTY_KEY);
        if self.slots.is_empty() {
            return Probe::Exhausted;
        }

        for index in ProbeSeq::new(key, self.mask) {
            let slot_key = self.slots[index].key;
            if slot_key == key {
                return Probe::Occupied(index);
            }
            if slot_key == EMPTY_KEY {
                return Probe::Vacant(index);
            }
        }

        Probe::Exhausted
    }

    /// Returns `true` if the map contains `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use clustermap::Int64Map;
    ///
    /// let mut map = Int64Map::with_capacity(8);
    /// map.insert(0, ());
    /// map.insert(42, ());
    /// assert!(map.contains_key(0));
    /// assert!(map.contains_key(42));
    /// assert!(!map.contains_key(43));
    /// ```
    #[inline]
    pub fn contains_key(&self, key: i64) -> bool {
        if key == EMPTY_KEY {
            return self.zero.is_some();
        }
        matches!(self.probe(key), Probe::Occupied(_))
    }

    /// Returns a reference to the value stored for `key`.
    #[inline]
    pub fn get(&self, key: i64) -> Option<&V> {
        if key == EMPTY_KEY {
            return self.zero.as_ref();
        }
        match self.probe(key) {
            // SAFETY: occupied slots hold an initialized value.
            Probe::Occupied(index) => Some(unsafe { self.slots[index].value.assume_init_ref() }),
            Probe::Vacant(_) | Probe::Exhausted => None,
        }
    }

    /// Returns a mutable reference to the value stored for `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use clustermap::Int64Map;
    ///
    /// let mut counters = Int64Map::with_capacity(8);
    /// counters.insert(9, 1u32);
    /// if let Some(count) = counters.get_mut(9) {
    ///     *count += 1;
    /// }
    /// assert_eq!(counters.get(9), Some(&2));
    /// ```
    #[inline]
    pub fn get_mut(&mut self, key: i64) -> Option<&mut V> {
        if key == EMPTY_KEY {
            return self.zero.as_mut();
        }
        match self.probe(key) {
            // SAFETY: occupied slots hold an initialized value.
            Probe::Occupied(index) => {
                Some(unsafe { self.slots[index].value.assume_init_mut() })
            }
            Probe::Vacant(_) | Probe::Exhausted => None,
        }
    }

    #[inline]
    fn maybe_grow(&mut self) {
        if self.populated >= self.grow_at {
            self.grow();
        }
    }

    #[cold]
    fn grow(&mut self) {
        self.resize(grown_buckets(self.slots.len()));
    }

    /// Inserts `value` for `key`, returning the value it replaced.
    ///
    /// Overwriting an existing key leaves [`len`](Int64Map::len) unchanged.
    /// The growth check runs before the key is located, so one call grows the
    /// table at most once unless its probe sequence is exhausted.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use clustermap::Int64Map;
    ///
    /// let mut map = Int64Map::new();
    /// assert_eq!(map.insert(37, "a"), None);
    /// assert_eq!(map.insert(37, "b"), Some("a"));
    /// assert_eq!(map.get(37), Some(&"b"));
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn insert(&mut self, key: i64, value: V) -> Option<V> {
        if key == EMPTY_KEY {
            let previous = self.zero.replace(value);
            if previous.is_none() {
                self.populated += 1;
            }
            return previous;
        }

        self.maybe_grow();
        loop {
            match self.probe(key) {
                Probe::Occupied(index) => {
                    // SAFETY: occupied slots hold an initialized value.
                    let current = unsafe { self.slots[index].value.assume_init_mut() };
                    return Some(core::mem::replace(current, value));
                }
                Probe::Vacant(index) => {
                    self.occupy(index, key, value);
                    return None;
                }
                Probe::Exhausted => self.grow_exhausted(key),
            }
        }
    }

    /// Inserts `value` only if `key` is absent.
    ///
    /// Returns the value now stored for `key` and whether this call inserted
    /// it. An existing entry is left untouched and `value` is dropped.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use clustermap::Int64Map;
    ///
    /// let mut map = Int64Map::new();
    /// assert_eq!(map.insert_if_absent(5, 10), (&mut 10, true));
    /// assert_eq!(map.insert_if_absent(5, 20), (&mut 10, false));
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn insert_if_absent(&mut self, key: i64, value: V) -> (&mut V, bool) {
        if key == EMPTY_KEY {
            let inserted = self.zero.is_none();
            if inserted {
                self.populated += 1;
            }
            return (self.zero.get_or_insert(value), inserted);
        }

        self.maybe_grow();
        let (index, inserted) = loop {
            match self.probe(key) {
                Probe::Occupied(index) => break (index, false),
                Probe::Vacant(index) => {
                    self.occupy(index, key, value);
                    break (index, true);
                }
                Probe::Exhausted => self.grow_exhausted(key),
            }
        };

        // SAFETY: `index` was either occupied or has just been filled.
        (unsafe { self.slots[index].value.assume_init_mut() }, inserted)
    }

    #[cold]
    fn grow_exhausted(&mut self, key: i64) {
        log::warn!(
            "probe sequence for key {key} exhausted at {} buckets, forcing growth",
            self.slots.len()
        );
        self.grow();
    }

    #[inline]
    fn occupy(&mut self, index: usize, key: i64, value: V) {
        let slot = &mut self.slots[index];
        debug_assert!(slot.is_vacant());
        slot.key = key;
        slot.value.write(value);
        self.populated += 1;
    }

    /// Moves the value out of an occupied slot and marks it vacant. Does not
    /// touch `populated`.
    #[inline]
    fn vacate(&mut self, index: usize) -> V {
        let slot = &mut self.slots[index];
        debug_assert!(!slot.is_vacant());
        slot.key = EMPTY_KEY;
        // SAFETY: the slot was occupied and is now marked vacant, so the value
        // is read exactly once.
        unsafe { slot.value.assume_init_read() }
    }

    /// Writes `key` into the first vacant bucket of its probe sequence
    /// without checking for an existing copy. Does not touch `populated`.
    fn place(&mut self, key: i64, value: V) {
        for index in ProbeSeq::new(key, self.mask) {
            let slot = &mut self.slots[index];
            if slot.is_vacant() {
                slot.key = key;
                slot.value.write(value);
                return;
            }
        }

        unreachable!("probe sequence visits every bucket and a vacant one exists");
    }

    /// Removes `key`, returning its value if it was present.
    ///
    /// After clearing the bucket, entries in the following
    /// [`REPAIR_HORIZON`] buckets whose home lies at or before the freed one
    /// are re-placed. See the type-level documentation for the limits of this
    /// repair.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use clustermap::Int64Map;
    ///
    /// let mut map = Int64Map::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.remove(1), Some("a"));
    /// assert_eq!(map.remove(1), None);
    /// assert!(map.is_empty());
    /// ```
    pub fn remove(&mut self, key: i64) -> Option<V> {
        if key == EMPTY_KEY {
            let value = self.zero.take();
            if value.is_some() {
                self.populated -= 1;
            }
            return value;
        }

        match self.probe(key) {
            Probe::Occupied(index) => {
                let value = self.vacate(index);
                self.populated -= 1;
                self.repair_chain(index);
                Some(value)
            }
            Probe::Vacant(_) | Probe::Exhausted => None,
        }
    }

    fn repair_chain(&mut self, hole: usize) {
        let mut displaced = Vec::new();

        for distance in 1..=REPAIR_HORIZON {
            let index = (hole + distance) & self.mask;
            let key = self.slots[index].key;
            if key == EMPTY_KEY {
                break;
            }

            if is_between(primary_index(key, self.mask), hole, index) {
                displaced.push((key, self.vacate(index)));
            }
        }

        if displaced.is_empty() {
            return;
        }

        log::trace!(
            "re-placing {} entries after freeing bucket {hole}",
            displaced.len()
        );
        for (key, value) in displaced {
            self.place(key, value);
        }
    }

    /// Removes every entry, keeping the allocated buckets.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use clustermap::Int64Map;
    ///
    /// let mut map = Int64Map::with_capacity(100);
    /// map.insert(1, 1);
    /// map.insert(0, 0);
    /// map.clear();
    /// assert!(map.is_empty());
    /// assert!(!map.contains_key(1));
    /// assert!(map.capacity() >= 100);
    /// ```
    pub fn clear(&mut self) {
        let array_len = self.array_len();
        self.zero = None;

        if array_len > 0 {
            for slot in self.slots.iter_mut() {
                if !slot.is_vacant() {
                    slot.key = EMPTY_KEY;
                    // SAFETY: the slot was occupied and is marked vacant
                    // before its value is dropped.
                    unsafe { slot.value.assume_init_drop() };
                }
            }
        }

        self.populated = 0;
    }

    /// Reserves room for at least `additional` more entries without growing.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use clustermap::Int64Map;
    ///
    /// let mut map: Int64Map<u8> = Int64Map::with_capacity(8);
    /// map.reserve(500);
    /// assert!(map.capacity() >= 500);
    /// ```
    pub fn reserve(&mut self, additional: usize) {
        let required = self.array_len().saturating_add(additional);
        if required > self.grow_at {
            self.resize(buckets_to_hold(required));
        }
    }

    /// Shrinks the slot array to the smallest size that holds the current
    /// entries. An empty map is returned to the unallocated state.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use clustermap::Int64Map;
    ///
    /// let mut map = Int64Map::with_capacity(1000);
    /// map.insert(1, 'a');
    /// map.insert(2, 'b');
    /// map.shrink_to_fit();
    /// assert_eq!(map.buckets(), 8);
    /// assert_eq!(map.get(2), Some(&'b'));
    /// ```
    pub fn shrink_to_fit(&mut self) {
        let array_len = self.array_len();
        if array_len == 0 {
            self.slots = Box::default();
            self.mask = 0;
            self.grow_at = 0;
            return;
        }

        let buckets = buckets_to_hold(array_len);
        if buckets < self.slots.len() {
            self.resize(buckets);
        }
    }

    /// Rebuilds the slot array at its current size.
    ///
    /// Every entry is placed again from its home bucket, which makes entries
    /// stranded by removal repair reachable again.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use clustermap::Int64Map;
    ///
    /// let mut map = Int64Map::with_capacity(8);
    /// for key in [1, 2, 3, 12] {
    ///     map.insert(key, key);
    /// }
    /// map.remove(2);
    /// map.rehash();
    /// assert_eq!(map.get(12), Some(&12));
    /// ```
    pub fn rehash(&mut self) {
        if !self.slots.is_empty() {
            self.resize(self.slots.len());
        }
    }

    /// Replaces the slot array with `buckets` vacant buckets and re-places
    /// every array entry. The zero key is detached for the duration and
    /// restored last.
    fn resize(&mut self, buckets: usize) {
        debug_assert!(buckets.is_power_of_two());
        debug_assert!(growth_threshold(buckets) >= self.array_len() || self.array_len() == 0);

        log::debug!(
            "rebuilding int64 map: {} -> {buckets} buckets, {} entries",
            self.slots.len(),
            self.populated
        );

        let old = core::mem::replace(&mut self.slots, Self::vacant_slots(buckets));
        self.mask = buckets - 1;
        self.grow_at = growth_threshold(buckets);

        let zero = self.zero.take();
        self.populated = 0;

        let mut old = old.into_vec();
        for i in 0..old.len() {
            if let Some(next) = old.get(i + 1)
                && !next.is_vacant()
            {
                prefetch(&self.slots[primary_index(next.key, self.mask)]);
            }

            let slot = &mut old[i];
            if slot.is_vacant() {
                continue;
            }
            let key = core::mem::replace(&mut slot.key, EMPTY_KEY);
            // SAFETY: the slot was occupied and is marked vacant, so ownership
            // of the value moves out exactly once. `Slot` has no drop glue for
            // the value, so dropping `old` afterwards only frees memory.
            let value = unsafe { slot.value.assume_init_read() };
            self.place(key, value);
            self.populated += 1;
        }

        if let Some(value) = zero {
            self.zero = Some(value);
            self.populated += 1;
        }
    }

    /// Visits every entry until `visitor` returns `false`.
    ///
    /// Key `0` is visited first, then the array entries in bucket order.
    /// Returns `true` if every entry was visited.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use clustermap::Int64Map;
    ///
    /// let map: Int64Map<i64> = (1..=10).map(|k| (k, k * 10)).collect();
    ///
    /// let mut seen = 0;
    /// let finished = map.for_each_while(|_, _| {
    ///     seen += 1;
    ///     seen < 3
    /// });
    /// assert!(!finished);
    /// assert_eq!(seen, 3);
    /// ```
    pub fn for_each_while(&self, mut visitor: impl FnMut(i64, &V) -> bool) -> bool {
        self.iter().all(|(key, value)| visitor(key, value))
    }

    /// Returns an iterator over `(key, &value)` pairs.
    ///
    /// Key `0` comes first; the remaining order is the bucket order and is
    /// otherwise unspecified.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use clustermap::Int64Map;
    ///
    /// let mut map = Int64Map::new();
    /// map.insert(3, "c");
    /// map.insert(0, "zero");
    ///
    /// let mut entries = map.iter();
    /// assert_eq!(entries.next(), Some((0, &"zero")));
    /// assert_eq!(entries.next(), Some((3, &"c")));
    /// assert_eq!(entries.next(), None);
    /// ```
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            zero: self.zero.as_ref(),
            slots: self.slots.iter(),
            remaining: self.populated,
        }
    }

    /// Returns an iterator over `(key, &mut value)` pairs.
    pub fn iter_mut(&mut self) -> IterMut<'_, V> {
        IterMut {
            zero: self.zero.as_mut(),
            slots: self.slots.iter_mut(),
            remaining: self.populated,
        }
    }

    /// Returns an iterator over the keys, in [`iter`](Int64Map::iter) order.
    pub fn keys(&self) -> Keys<'_, V> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over the values, in [`iter`](Int64Map::iter) order.
    pub fn values(&self) -> Values<'_, V> {
        Values { inner: self.iter() }
    }

    /// Removes every entry and yields it, keeping the allocated buckets.
    ///
    /// Entries not consumed are dropped when the iterator is dropped.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use clustermap::Int64Map;
    ///
    /// let mut map = Int64Map::new();
    /// map.insert(1, 10);
    /// map.insert(2, 20);
    ///
    /// let mut drained: Vec<_> = map.drain().collect();
    /// drained.sort();
    /// assert_eq!(drained, vec![(1, 10), (2, 20)]);
    /// assert!(map.is_empty());
    /// ```
    pub fn drain(&mut self) -> Drain<'_, V> {
        Drain {
            map: self,
            index: 0,
        }
    }

    #[cfg(any(test, feature = "stats"))]
    pub(crate) fn raw_slots(&self) -> &[Slot<V>] {
        &self.slots
    }

    #[cfg(any(test, feature = "stats"))]
    pub(crate) fn mask(&self) -> usize {
        self.mask
    }
}

impl<V> Extend<(i64, V)> for Int64Map<V> {
    fn extend<I: IntoIterator<Item = (i64, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<V> FromIterator<(i64, V)> for Int64Map<V> {
    fn from_iter<I: IntoIterator<Item = (i64, V)>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut map = Self::with_capacity(iter.size_hint().0);
        map.extend(iter);
        map
    }
}

impl<'a, V> IntoIterator for &'a Int64Map<V> {
    type IntoIter = Iter<'a, V>;
    type Item = (i64, &'a V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, V> IntoIterator for &'a mut Int64Map<V> {
    type IntoIter = IterMut<'a, V>;
    type Item = (i64, &'a mut V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<V> IntoIterator for Int64Map<V> {
    type IntoIter = IntoIter<V>;
    type Item = (i64, V);

    fn into_iter(mut self) -> Self::IntoIter {
        let remaining = self.populated;
        let zero = self.zero.take();
        let slots = core::mem::take(&mut self.slots).into_vec();
        self.populated = 0;

        IntoIter {
            zero,
            slots: slots.into_iter(),
            remaining,
        }
    }
}

/// An iterator over the entries of an [`Int64Map`].
///
/// Created by [`Int64Map::iter`].
pub struct Iter<'a, V> {
    zero: Option<&'a V>,
    slots: core::slice::Iter<'a, Slot<V>>,
    remaining: usize,
}

impl<V> Clone for Iter<'_, V> {
    fn clone(&self) -> Self {
        Self {
            zero: self.zero,
            slots: self.slots.clone(),
            remaining: self.remaining,
        }
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (i64, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(value) = self.zero.take() {
            self.remaining -= 1;
            return Some((EMPTY_KEY, value));
        }

        if self.remaining == 0 {
            return None;
        }

        for slot in self.slots.by_ref() {
            if !slot.is_vacant() {
                self.remaining -= 1;
                // SAFETY: occupied slots hold an initialized value.
                return Some((slot.key, unsafe { slot.value.assume_init_ref() }));
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

impl<V> FusedIterator for Iter<'_, V> {}

/// A mutable iterator over the entries of an [`Int64Map`].
///
/// Created by [`Int64Map::iter_mut`].
pub struct IterMut<'a, V> {
    zero: Option<&'a mut V>,
    slots: core::slice::IterMut<'a, Slot<V>>,
    remaining: usize,
}

impl<'a, V> Iterator for IterMut<'a, V> {
    type Item = (i64, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(value) = self.zero.take() {
            self.remaining -= 1;
            return Some((EMPTY_KEY, value));
        }

        if self.remaining == 0 {
            return None;
        }

        for slot in self.slots.by_ref() {
            if !slot.is_vacant() {
                self.remaining -= 1;
                // SAFETY: occupied slots hold an initialized value, and each
                // slot is yielded at most once.
                return Some((slot.key, unsafe { slot.value.assume_init_mut() }));
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for IterMut<'_, V> {}

impl<V> FusedIterator for IterMut<'_, V> {}

/// An iterator over the keys of an [`Int64Map`].
pub struct Keys<'a, V> {
    inner: Iter<'a, V>,
}

impl<V> Iterator for Keys<'_, V> {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        self.inner.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for Keys<'_, V> {}

/// An iterator over the values of an [`Int64Map`].
pub struct Values<'a, V> {
    inner: Iter<'a, V>,
}

impl<'a, V> Iterator for Values<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for Values<'_, V> {}

/// A draining iterator over the entries of an [`Int64Map`].
///
/// Created by [`Int64Map::drain`].
pub struct Drain<'a, V> {
    map: &'a mut Int64Map<V>,
    index: usize,
}

impl<V> Iterator for Drain<'_, V> {
    type Item = (i64, V);

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(value) = self.map.zero.take() {
            self.map.populated -= 1;
            return Some((EMPTY_KEY, value));
        }

        while self.map.populated > 0 && self.index < self.map.slots.len() {
            let index = self.index;
            self.index += 1;

            let key = self.map.slots[index].key;
            if key != EMPTY_KEY {
                self.map.populated -= 1;
                return Some((key, self.map.vacate(index)));
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.map.populated, Some(self.map.populated))
    }
}

impl<V> ExactSizeIterator for Drain<'_, V> {}

impl<V> Drop for Drain<'_, V> {
    fn drop(&mut self) {
        for _ in &mut *self {}
    }
}

/// An owning iterator over the entries of an [`Int64Map`].
pub struct IntoIter<V> {
    zero: Option<V>,
    slots: alloc::vec::IntoIter<Slot<V>>,
    remaining: usize,
}

impl<V> Iterator for IntoIter<V> {
    type Item = (i64, V);

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(value) = self.zero.take() {
            self.remaining -= 1;
            return Some((EMPTY_KEY, value));
        }

        if self.remaining == 0 {
            return None;
        }

        for slot in self.slots.by_ref() {
            if !slot.is_vacant() {
                self.remaining -= 1;
                // SAFETY: the slot was occupied and has been moved out of the
                // buffer, so its value is read exactly once.
                return Some((slot.key, unsafe { slot.value.assume_init_read() }));
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for IntoIter<V> {}

impl<V> Drop for IntoIter<V> {
    fn drop(&mut self) {
        for _ in &mut *self {}
    }
}
