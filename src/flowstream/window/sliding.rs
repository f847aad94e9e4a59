//! Two-level windowed categorical histogram.
//!
//! A [`SlidingWindow`] tracks the most frequent values seen in the last
//! `N` observations of a stream. The window is split into `N / b`
//! sub-windows that form a ring; the oldest sub-window is evicted
//! wholesale when the ring rolls over, which bounds both memory and the
//! cost of eviction. A running aggregate histogram over all sub-windows
//! answers top-k queries without rescanning the ring.
//!
//! The summary is approximate under capacity pressure: evicting a
//! sub-window forgets `b` observations at a time, not one.

use crate::flowstream::error::{EngineError, Result};
use std::cmp::Reverse;
use std::collections::HashMap;
use std::hash::Hash;

/// Windowed top-k frequency tracker over values of type `V`
#[derive(Debug, Clone)]
pub struct SlidingWindow<V> {
    /// Observations per sub-window
    sub_size: usize,
    /// Maximum number of keys reported on query
    top_k: usize,
    /// Ring of per-sub-window histograms
    sub_windows: Vec<HashMap<V, u64>>,
    /// Index of the sub-window currently being filled
    current: usize,
    /// Observations in the current sub-window
    current_len: usize,
    /// Union histogram over all sub-windows
    aggregate: HashMap<V, u64>,
    /// Sum of counts in the aggregate
    total: u64,
}

impl<V> SlidingWindow<V>
where
    V: Eq + Hash + Ord + Clone,
{
    /// Validate window parameters without constructing a window
    ///
    /// Requires `N > 0`, `b > 0`, `k > 0`, `b <= N` and `b` dividing `N`
    /// exactly.
    pub fn check_parameters(capacity: usize, sub_size: usize, top_k: usize) -> Result<()> {
        if capacity == 0 {
            return Err(EngineError::config("window capacity N must be positive"));
        }
        if sub_size == 0 {
            return Err(EngineError::config("sub-window size b must be positive"));
        }
        if top_k == 0 {
            return Err(EngineError::config("top-k cap must be positive"));
        }
        if sub_size > capacity {
            return Err(EngineError::config(format!(
                "sub-window size {} exceeds window capacity {}",
                sub_size, capacity
            )));
        }
        if capacity % sub_size != 0 {
            return Err(EngineError::config(format!(
                "sub-window size {} does not divide window capacity {}",
                sub_size, capacity
            )));
        }
        Ok(())
    }

    /// Create an empty window with parameters `(N, b, k)`
    pub fn new(capacity: usize, sub_size: usize, top_k: usize) -> Result<Self> {
        Self::check_parameters(capacity, sub_size, top_k)?;
        let ring_len = capacity / sub_size;
        Ok(SlidingWindow {
            sub_size,
            top_k,
            sub_windows: vec![HashMap::new(); ring_len],
            current: 0,
            current_len: 0,
            aggregate: HashMap::new(),
            total: 0,
        })
    }

    /// Record one observation
    ///
    /// When the current sub-window is full the ring advances first,
    /// subtracting the evicted sub-window's counts from the aggregate
    /// before the new value is inserted.
    pub fn add(&mut self, value: V) {
        if self.current_len >= self.sub_size {
            self.current = (self.current + 1) % self.sub_windows.len();
            self.current_len = 0;
            let evicted = std::mem::take(&mut self.sub_windows[self.current]);
            for (key, count) in evicted {
                self.total -= count;
                if let Some(aggregate_count) = self.aggregate.get_mut(&key) {
                    *aggregate_count -= count;
                    if *aggregate_count == 0 {
                        self.aggregate.remove(&key);
                    }
                }
            }
        }

        *self.sub_windows[self.current].entry(value.clone()).or_insert(0) += 1;
        *self.aggregate.entry(value).or_insert(0) += 1;
        self.current_len += 1;
        self.total += 1;
    }

    /// Keys of the aggregate, most frequent first, truncated to `k`
    ///
    /// Ties are broken by the ascending natural order of `V`, so repeated
    /// queries over the same state return the same ranking.
    pub fn top_keys(&self) -> Vec<V> {
        self.ranked().into_iter().map(|(key, _)| key).collect()
    }

    /// Relative frequencies positionally aligned with [`top_keys`]
    ///
    /// Each entry is the key's count divided by the total observation
    /// count currently held. Empty iff no values have been added.
    ///
    /// [`top_keys`]: SlidingWindow::top_keys
    pub fn frequencies(&self) -> Vec<f64> {
        if self.total == 0 {
            return Vec::new();
        }
        let total = self.total as f64;
        self.ranked()
            .into_iter()
            .map(|(_, count)| count as f64 / total)
            .collect()
    }

    /// Number of observations currently held (at most `N`)
    pub fn len(&self) -> usize {
        self.total as usize
    }

    /// True iff no values have been observed yet
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    // Aggregate entries sorted by descending count then ascending key,
    // truncated to the top-k cap.
    fn ranked(&self) -> Vec<(V, u64)> {
        let mut entries: Vec<(V, u64)> = self
            .aggregate
            .iter()
            .map(|(key, count)| (key.clone(), *count))
            .collect();
        entries.sort_by(|a, b| (Reverse(a.1), &a.0).cmp(&(Reverse(b.1), &b.0)));
        entries.truncate(self.top_k);
        entries
    }
}
