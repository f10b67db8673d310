use alloc::vec;
use alloc::vec::Vec;

use crate::Int64Map;
use crate::probe::ProbeSeq;
use crate::probe::REPAIR_HORIZON;

/// Probe-length and reachability statistics for an [`Int64Map`].
///
/// Requires the `stats` feature.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeStats {
    /// Number of entries, counting key `0`
    pub populated: usize,
    /// Length of the slot array
    pub buckets: usize,
    /// Number of buckets holding an entry
    pub occupied_slots: usize,
    /// Longest probe distance of a reachable entry
    pub max_probe_length: usize,
    /// Reachable entries by probe distance. Bins `0..REPAIR_HORIZON` count
    /// exact distances, the last bin counts everything longer.
    pub histogram: Vec<usize>,
    /// Entries whose own probe sequence no longer reaches their bucket
    pub stranded: usize,
    /// occupied_slots / buckets
    pub load_factor: f64,
}

impl<V> Int64Map<V> {
    /// Walks every occupied bucket and reports how far each entry sits from
    /// its home bucket along its probe sequence.
    ///
    /// An entry is *stranded* when a lookup for its key stops at a vacant
    /// bucket (or at another copy of the key) before reaching it. Only
    /// removal repair can produce stranded entries, and any rebuild clears
    /// them.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use clustermap::Int64Map;
    ///
    /// let map: Int64Map<()> = (1..=100).map(|k| (k, ())).collect();
    /// let stats = map.probe_stats();
    /// assert_eq!(stats.occupied_slots, 100);
    /// assert_eq!(stats.stranded, 0);
    /// assert_eq!(stats.histogram.iter().sum::<usize>(), 100);
    /// ```
    pub fn probe_stats(&self) -> ProbeStats {
        let slots = self.raw_slots();
        let mut histogram = vec![0usize; REPAIR_HORIZON + 1];
        let mut occupied_slots = 0;
        let mut max_probe_length = 0;
        let mut stranded = 0;

        for (index, slot) in slots.iter().enumerate() {
            if slot.is_vacant() {
                continue;
            }
            occupied_slots += 1;

            let mut distance = None;
            for (probe, candidate) in ProbeSeq::new(slot.key, self.mask()).enumerate() {
                if candidate == index {
                    distance = Some(probe);
                    break;
                }
                let other = &slots[candidate];
                if other.is_vacant() || other.key == slot.key {
                    break;
                }
            }

            match distance {
                Some(distance) => {
                    max_probe_length = max_probe_length.max(distance);
                    histogram[distance.min(REPAIR_HORIZON)] += 1;
                }
                None => stranded += 1,
            }
        }

        ProbeStats {
            populated: self.len(),
            buckets: slots.len(),
            occupied_slots,
            max_probe_length,
            histogram,
            stranded,
            load_factor: if slots.is_empty() {
                0.0
            } else {
                occupied_slots as f64 / slots.len() as f64
            },
        }
    }
}

impl ProbeStats {
    /// Pretty-prints the statistics and a horizontal probe-length histogram.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Int64Map Probe Statistics ===");
        println!(
            "Population: {} entries in {}/{} buckets ({:.2}% load factor)",
            self.populated,
            self.occupied_slots,
            self.buckets,
            self.load_factor * 100.0
        );
        println!("Longest probe: {}", self.max_probe_length);
        println!("Stranded entries: {}", self.stranded);

        let max = self.histogram.iter().copied().max().unwrap_or(0);
        if max == 0 {
            println!("probe histogram: empty");
            return;
        }

        let max_bar = 60usize;
        for (distance, &count) in self.histogram.iter().enumerate() {
            let label = if distance == REPAIR_HORIZON {
                alloc::format!("{REPAIR_HORIZON}+")
            } else {
                alloc::format!("{distance:>2}")
            };
            let width = (count * max_bar).div_ceil(max);
            println!("{label:>3} | {} ({count})", "█".repeat(width));
        }
    }
}
