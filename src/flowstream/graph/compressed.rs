//! Concurrent time-windowed directed multigraph.
//!
//! [`CompressedSparse`] indexes edges projected from flow records by their
//! source vertex. The structure is a fixed-capacity hash table of buckets;
//! each bucket owns an ordered list of the edges whose source hashes to
//! that slot, guarded by its own mutex. Inserts into distinct buckets
//! never contend, and there is no global lock and no rehashing.
//!
//! Edge reclamation is amortised onto insertion: every `add_edge` first
//! walks its bucket and drops edges older than the retention window,
//! relative to the maximum time that bucket has observed. Each pass
//! reports its cost in work units, one per edge touched, so callers can
//! see how much reclamation rides on each insert.

use crate::flowstream::error::{EngineError, Result};
use crate::flowstream::projection::FieldProjector;
use crate::flowstream::record::{FieldValue, FlowRecord};
use log::debug;
use std::collections::hash_map::RandomState;
use std::hash::BuildHasher;
use std::sync::Mutex;

/// Configuration for a [`CompressedSparse`] graph
#[derive(Debug, Clone)]
pub struct GraphConfig {
    /// Number of buckets in the source-side table
    pub capacity: usize,
    /// Maximum age of a retained edge, in time-field units
    pub window: f64,
    /// Field projected as the source vertex
    pub source_field: usize,
    /// Field projected as the target vertex
    pub target_field: usize,
    /// Numeric field projected as the edge time
    pub time_field: usize,
    /// Optional numeric field projected as the edge duration
    pub duration_field: Option<usize>,
    /// Declared arity of consumed records
    pub arity: usize,
}

/// A directed edge projected from one flow record
#[derive(Debug, Clone)]
pub struct TemporalEdge {
    id: u64,
    source: FieldValue,
    target: FieldValue,
    time: f64,
    duration: f64,
}

impl TemporalEdge {
    /// Identifier of the record the edge was projected from
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Target vertex value
    pub fn target(&self) -> &FieldValue {
        &self.target
    }

    /// Observation time in time-field units
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Edge duration; zero when no duration field is configured
    pub fn duration(&self) -> f64 {
        self.duration
    }
}

impl PartialEq for TemporalEdge {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.source == other.source
            && self.target == other.target
            && self.time.to_bits() == other.time.to_bits()
    }
}

impl Eq for TemporalEdge {}

#[derive(Debug)]
struct Bucket {
    edges: Vec<TemporalEdge>,
    /// Maximum time observed in this bucket so far
    now: f64,
}

impl Default for Bucket {
    fn default() -> Self {
        Bucket {
            edges: Vec::new(),
            now: f64::NEG_INFINITY,
        }
    }
}

/// Concurrent temporal edge table keyed by source vertex
///
/// Generic over the hasher used to place source vertices, defaulting to
/// the standard library's [`RandomState`]. A capacity smaller than the
/// number of distinct source vertices is valid; it only lengthens the
/// per-bucket chains.
pub struct CompressedSparse<S: BuildHasher = RandomState> {
    buckets: Vec<Mutex<Bucket>>,
    window: f64,
    source_projector: FieldProjector,
    target_projector: FieldProjector,
    time_projector: FieldProjector,
    duration_projector: Option<FieldProjector>,
    hasher: S,
}

impl CompressedSparse<RandomState> {
    /// Create a graph with the default hasher
    pub fn new(config: GraphConfig) -> Result<Self> {
        Self::with_hasher(config, RandomState::new())
    }
}

impl<S: BuildHasher> CompressedSparse<S> {
    /// Create a graph placing source vertices with the given hasher
    pub fn with_hasher(config: GraphConfig, hasher: S) -> Result<Self> {
        if config.capacity == 0 {
            return Err(EngineError::config("graph capacity must be positive"));
        }
        if !config.window.is_finite() || config.window < 0.0 {
            return Err(EngineError::config(format!(
                "retention window {} is not a non-negative duration",
                config.window
            )));
        }

        let source_projector = FieldProjector::new(config.source_field);
        source_projector.validate(config.arity)?;
        let target_projector = FieldProjector::new(config.target_field);
        target_projector.validate(config.arity)?;
        let time_projector = FieldProjector::new(config.time_field);
        time_projector.validate(config.arity)?;
        let duration_projector = match config.duration_field {
            Some(index) => {
                let projector = FieldProjector::new(index);
                projector.validate(config.arity)?;
                Some(projector)
            }
            None => None,
        };

        debug!(
            "compressed sparse graph: {} buckets, retention window {}",
            config.capacity, config.window
        );

        let mut buckets = Vec::with_capacity(config.capacity);
        buckets.resize_with(config.capacity, || Mutex::new(Bucket::default()));

        Ok(CompressedSparse {
            buckets,
            window: config.window,
            source_projector,
            target_projector,
            time_projector,
            duration_projector,
            hasher,
        })
    }

    /// Insert the edge projected from a record, reclaiming expired edges
    ///
    /// Walks the target bucket under its lock, dropping every edge whose
    /// time has fallen outside the retention window relative to the
    /// bucket's maximum observed time (including this record's), then
    /// appends the new edge. Returns the work performed: one unit per
    /// edge touched during cleanup, kept or dropped, plus one for the
    /// insertion itself.
    pub fn add_edge(&self, record: &FlowRecord) -> Result<u64> {
        let source = self.source_projector.project(record)?.clone();
        let target = self.target_projector.project(record)?.clone();
        let time = self.time_projector.project_numeric(record)?;
        let duration = match &self.duration_projector {
            Some(projector) => projector.project_numeric(record)?,
            None => 0.0,
        };

        let slot = self.slot(&source);
        let mut work: u64 = 0;

        let mut bucket = self.buckets[slot].lock().unwrap();
        if time > bucket.now {
            bucket.now = time;
        }

        let Bucket { edges, now } = &mut *bucket;
        let window = self.window;
        edges.retain(|edge| {
            work += 1;
            edge.time + window >= *now
        });

        edges.push(TemporalEdge {
            id: record.id(),
            source,
            target,
            time,
            duration,
        });
        work += 1;

        Ok(work)
    }

    /// Exact number of edges currently retained
    ///
    /// Acquires each bucket lock in turn; the result is a consistent
    /// per-bucket sum, not a global snapshot.
    pub fn count_edges(&self) -> usize {
        self.buckets
            .iter()
            .map(|bucket| bucket.lock().unwrap().edges.len())
            .sum()
    }

    /// Retained edges for one source vertex, in bucket insertion order
    pub fn edges_from(&self, source: &FieldValue) -> Vec<TemporalEdge> {
        let bucket = self.buckets[self.slot(source)].lock().unwrap();
        bucket
            .edges
            .iter()
            .filter(|edge| &edge.source == source)
            .cloned()
            .collect()
    }

    /// Number of buckets in the table
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// The configured retention window
    pub fn window(&self) -> f64 {
        self.window
    }

    fn slot(&self, source: &FieldValue) -> usize {
        (self.hasher.hash_one(source) % self.buckets.len() as u64) as usize
    }
}
