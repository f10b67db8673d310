//! Slot addressing for [`Int64Map`](crate::Int64Map).
//!
//! Keys are mapped to a primary bucket with one multiplicative mixer and to
//! an odd step with a second one. Collisions then walk the sequence
//! `idx(n + 1) = (idx(n) + n * step) & mask`, so the offset from the primary
//! bucket after `n` probes is `step * n(n + 1) / 2`. Triangular numbers are a
//! permutation of the residues modulo a power of two and an odd step is a
//! unit, which means `buckets` probes after the primary one visit every
//! bucket exactly once.

/// Key value that marks a vacant slot. The map stores this key out of band.
pub(crate) const EMPTY_KEY: i64 = 0;

/// Smallest slot array ever allocated.
pub const MIN_BUCKETS: usize = 8;

/// Tables at or above this many buckets grow by 1.5x instead of 2x before
/// being rounded up to a power of two.
pub const LARGE_TABLE_BUCKETS: usize = 1 << 20;

/// Number of slots following a freed slot that chain repair inspects.
pub const REPAIR_HORIZON: usize = 16;

const PRIMARY_MULTIPLIER: i64 = 0x9E37_79B9;
const SECONDARY_MULTIPLIER: i64 = 0x85EB_CA77;

#[inline(always)]
pub(crate) fn primary_index(key: i64, mask: usize) -> usize {
    let h = key.wrapping_mul(PRIMARY_MULTIPLIER);
    (h ^ (h >> 16)) as usize & mask
}

/// Always odd, hence coprime with every power-of-two bucket count.
#[inline(always)]
pub(crate) fn secondary_step(key: i64) -> usize {
    let h = key.wrapping_mul(SECONDARY_MULTIPLIER);
    (h ^ (h >> 13)) as usize | 1
}

/// Returns `true` when `home` lies outside the circular arc `(empty,
/// current]`.
///
/// An entry sitting at `current` whose home bucket is at or before the freed
/// slot `empty` (walking forward) may have been placed past `empty` while it
/// was occupied, so chain repair relocates it.
///
/// The name reads as "home within the arc", but the test is the complement of
/// `(empty, current]`. Relocation depends on exactly this form; do not invert
/// it.
#[inline]
pub(crate) fn is_between(home: usize, empty: usize, current: usize) -> bool {
    if empty <= current {
        home <= empty || home > current
    } else {
        home <= empty && home > current
    }
}

/// Bucket count for a table constructed with a capacity hint.
///
/// Hints of [`MIN_BUCKETS`] or fewer get the minimum table, whose threshold
/// is 6. Larger hints are scaled by the inverse load factor and rounded up
/// to a power of two.
pub(crate) fn buckets_for_capacity(capacity: usize) -> usize {
    if capacity <= MIN_BUCKETS {
        return MIN_BUCKETS;
    }
    buckets_to_hold(capacity)
}

/// Smallest bucket count whose growth threshold holds `entries`.
pub(crate) fn buckets_to_hold(entries: usize) -> usize {
    (entries.saturating_mul(4) / 3)
        .max(MIN_BUCKETS)
        .checked_next_power_of_two()
        .unwrap_or_else(|| capacity_overflow())
}

/// Bucket count that follows `buckets` on growth.
pub(crate) fn grown_buckets(buckets: usize) -> usize {
    if buckets == 0 {
        return MIN_BUCKETS;
    }

    let grown = if buckets < LARGE_TABLE_BUCKETS {
        buckets.checked_mul(2)
    } else {
        buckets.checked_add(buckets / 2)
    };

    grown
        .and_then(usize::checked_next_power_of_two)
        .unwrap_or_else(|| capacity_overflow())
}

/// Number of array entries a table of `buckets` slots holds before growing
/// (3/4 load factor).
#[inline]
pub(crate) fn growth_threshold(buckets: usize) -> usize {
    buckets - buckets / 4
}

#[cold]
#[inline(never)]
fn capacity_overflow() -> ! {
    panic!("capacity overflow")
}

cfg_if::cfg_if! {
    if #[cfg(all(target_arch = "x86_64", target_feature = "sse2"))] {
        #[inline(always)]
        pub(crate) fn prefetch<T>(ptr: *const T) {
            // SAFETY: prefetching is a hint and never dereferences `ptr`.
            unsafe {
                use core::arch::x86_64::_MM_HINT_T0;
                use core::arch::x86_64::_mm_prefetch;
                _mm_prefetch(ptr as *const i8, _MM_HINT_T0);
            }
        }
    } else {
        #[inline(always)]
        pub(crate) fn prefetch<T>(_ptr: *const T) {}
    }
}

/// The bucket indices probed for one key: the primary bucket followed by
/// `buckets` quadratic steps.
///
/// The step is computed lazily because most lookups resolve at the primary
/// bucket.
pub(crate) struct ProbeSeq {
    key: i64,
    index: usize,
    mask: usize,
    step: Option<usize>,
    distance: usize,
    remaining: usize,
}

impl ProbeSeq {
    /// `mask` must be `buckets - 1` for a non-empty power-of-two table.
    #[inline]
    pub(crate) fn new(key: i64, mask: usize) -> Self {
        Self {
            key,
            index: primary_index(key, mask),
            mask,
            step: None,
            distance: 0,
            remaining: mask.wrapping_add(1).saturating_add(1),
        }
    }
}

impl Iterator for ProbeSeq {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        if self.distance == 0 {
            self.distance = 1;
            return Some(self.index);
        }

        let key = self.key;
        let step = *self.step.get_or_insert_with(|| secondary_step(key));
        self.index = self
            .index
            .wrapping_add(self.distance.wrapping_mul(step))
            & self.mask;
        self.distance += 1;

        Some(self.index)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for ProbeSeq {}
