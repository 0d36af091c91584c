//! Realtime replication status and rolling throughput history

use std::collections::{BTreeMap, VecDeque};

use serde::{Deserialize, Serialize};

/// Number of throughput samples kept for the detail view.
pub const DEFAULT_HISTORY_LEN: usize = 20;

/// Read/write counters reported by the replication process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntryCounts {
    pub read_count: u64,
    pub write_count: u64,
    pub read_ops: f64,
    pub write_ops: f64,
}

/// Status document proxied from the running process' status port.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RealtimeStatus {
    pub start_time: Option<String>,
    pub consistent: Option<bool>,
    pub total_entries_count: EntryCounts,
    /// Keyed by command name; ordered for stable rendering.
    pub per_cmd_entries_count: BTreeMap<String, EntryCounts>,
}

impl RealtimeStatus {
    /// Commands sorted by descending read count.
    pub fn top_commands(&self, limit: usize) -> Vec<(&str, u64)> {
        let mut commands: Vec<(&str, u64)> = self
            .per_cmd_entries_count
            .iter()
            .map(|(name, counts)| (name.as_str(), counts.read_count))
            .collect();
        commands.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        commands.truncate(limit);
        commands
    }

    pub fn sample(&self) -> OpsSample {
        OpsSample {
            read_ops: self.total_entries_count.read_ops,
            write_ops: self.total_entries_count.write_ops,
        }
    }
}

/// One point of the throughput chart.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OpsSample {
    pub read_ops: f64,
    pub write_ops: f64,
}

// ── RingBuffer<T> ────────────────────────────────────────────────────────────

/// A fixed-capacity circular buffer that overwrites the oldest entries
/// when full.
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    buf: VecDeque<T>,
    capacity: usize,
}

impl<T> RingBuffer<T> {
    /// Create a new ring buffer; a zero capacity is bumped to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            buf: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a value, evicting the oldest if at capacity.
    pub fn push(&mut self, value: T) {
        if self.buf.len() == self.capacity {
            self.buf.pop_front();
        }
        self.buf.push_back(value);
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterate over items from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.buf.iter()
    }

    pub fn latest(&self) -> Option<&T> {
        self.buf.back()
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }
}

/// Rolling window of throughput samples for one task.
pub type OpsHistory = RingBuffer<OpsSample>;
