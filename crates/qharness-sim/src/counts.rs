//! Measurement outcome histograms.

use std::collections::BTreeMap;

use serde::Serialize;

/// Histogram of measured bitstrings.
///
/// Character `i` of every bitstring is the outcome of qubit `i`. Keys are
/// kept sorted so that reports and comparisons are deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutcomeCounts {
    num_qubits: u32,
    requested_shots: u64,
    counts: BTreeMap<String, u64>,
}

impl OutcomeCounts {
    /// Create an empty histogram for `num_qubits`-wide outcomes.
    pub fn new(num_qubits: u32, requested_shots: u64) -> Self {
        Self {
            num_qubits,
            requested_shots,
            counts: BTreeMap::new(),
        }
    }

    /// Add `count` observations of `bitstring`.
    ///
    /// # Panics
    ///
    /// Panics if the bitstring width does not match `num_qubits`.
    pub fn insert(&mut self, bitstring: impl Into<String>, count: u64) {
        let bitstring = bitstring.into();
        assert_eq!(
            bitstring.len(),
            self.num_qubits as usize,
            "bitstring '{bitstring}' does not match width {}",
            self.num_qubits
        );
        if count > 0 {
            *self.counts.entry(bitstring).or_insert(0) += count;
        }
    }

    /// Record a single shot from its per-qubit bits.
    pub fn record(&mut self, bits: &[bool]) {
        let bitstring: String = bits.iter().map(|&b| if b { '1' } else { '0' }).collect();
        self.insert(bitstring, 1);
    }

    /// Fold another histogram of the same width into this one.
    pub fn merge(&mut self, other: OutcomeCounts) {
        for (bitstring, count) in other.counts {
            self.insert(bitstring, count);
        }
    }

    /// Count for a bitstring (0 if never observed).
    pub fn get(&self, bitstring: &str) -> u64 {
        self.counts.get(bitstring).copied().unwrap_or(0)
    }

    /// Total number of shots recorded.
    pub fn total_shots(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Shots the caller asked for.
    pub fn requested_shots(&self) -> u64 {
        self.requested_shots
    }

    /// True when every requested shot was recorded.
    pub fn is_complete(&self) -> bool {
        self.total_shots() == self.requested_shots
    }

    /// Width of the recorded bitstrings.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Number of distinct outcomes.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// True if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterate over `(bitstring, count)` in bitstring order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(b, &c)| (b.as_str(), c))
    }

    /// Outcomes sorted by descending count, ties broken by bitstring.
    pub fn sorted(&self) -> Vec<(&str, u64)> {
        let mut v: Vec<_> = self.iter().collect();
        v.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        v
    }

    /// Observed frequency of a bitstring, `None` if no shots were recorded.
    pub fn probability(&self, bitstring: &str) -> Option<f64> {
        let total = self.total_shots();
        (total > 0).then(|| self.get(bitstring) as f64 / total as f64)
    }

    /// Borrow the underlying map.
    pub fn as_map(&self) -> &BTreeMap<String, u64> {
        &self.counts
    }
}
