//! Bounded needs-review sample.
//!
//! A min-heap keyed by rank holds at most `capacity` entries. Rank orders by
//! confidence, then by reversed file path, so the heap top is always the entry
//! to evict: lowest confidence, and among equals the largest path.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::model::Record;

#[derive(Debug, Clone, PartialEq)]
pub struct ReviewEntry {
    pub file: String,
    pub confidence: f64,
    pub types: String,
    pub reasons: String,
}

impl ReviewEntry {
    pub fn from_record(record: &Record) -> Self {
        Self {
            file: record.file.clone(),
            confidence: record.confidence,
            types: record.types_text(),
            reasons: record.reasons_text(),
        }
    }
}

impl Eq for ReviewEntry {}

impl Ord for ReviewEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.confidence
            .total_cmp(&other.confidence)
            .then_with(|| other.file.cmp(&self.file))
    }
}

impl PartialOrd for ReviewEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Clone)]
pub struct ReviewSample {
    capacity: usize,
    heap: BinaryHeap<Reverse<ReviewEntry>>,
}

impl ReviewSample {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            heap: BinaryHeap::with_capacity(capacity.saturating_add(1).min(1024)),
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Insert an entry, evicting the lowest-ranked one when over capacity.
    /// Returns the evicted entry, if any.
    pub fn offer(&mut self, entry: ReviewEntry) -> Option<ReviewEntry> {
        self.heap.push(Reverse(entry));
        if self.heap.len() > self.capacity {
            self.heap.pop().map(|Reverse(evicted)| evicted)
        } else {
            None
        }
    }

    /// Entries by descending confidence, then ascending path.
    pub fn sorted(&self) -> Vec<ReviewEntry> {
        self.clone().drain_sorted()
    }

    pub fn drain_sorted(self) -> Vec<ReviewEntry> {
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|Reverse(entry)| entry)
            .collect()
    }
}
