//! Compensation benchmarks: which roles the calculator can price.

use std::collections::HashMap;

/// Lookup keyed by job title. A posting whose title has an entry gets the
/// salary section and the calculator seeded from that entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BenchmarkTable {
    entries: HashMap<String, BenchmarkEntry>,
}

impl BenchmarkTable {
    pub fn new(entries: HashMap<String, BenchmarkEntry>) -> Self {
        Self { entries }
    }

    pub fn entry(&self, job_title: &str) -> Option<&BenchmarkEntry> {
        self.entries.get(job_title)
    }

    pub fn contains(&self, job_title: &str) -> bool {
        self.entries.contains_key(job_title)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Benchmark figure for one role.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BenchmarkEntry {
    /// Market-rate base (in whole currency units) the calculator seeds from.
    pub location_base: u64,
}
