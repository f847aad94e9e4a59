//! Streaming analytics engine core for network-flow tuples.
//!
//! This library maintains online summaries over unbounded, concurrent
//! streams of immutable flow records: per-group top-k frequency tracking
//! backed by two-level sliding windows, and a concurrent time-windowed
//! edge graph with insertion-amortised eviction.

pub mod flowstream;

// Re-export main API
pub use flowstream::{
    ChannelSubscriber, CompressedSparse, EngineError, FeatureMap, FieldProjector, FieldValue,
    FlowRecord, GraphConfig, KeyProjector, Result, SlidingWindow, Subscriber, SubscriberBus,
    TemporalEdge, TopK, TopKConfig, TopKFeature,
};

/// Crate version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
