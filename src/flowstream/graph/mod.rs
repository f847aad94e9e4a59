//! Temporal graph structures over flow records.

pub mod compressed;

pub use compressed::{CompressedSparse, GraphConfig, TemporalEdge};
