//! Streaming analytics core for network-flow tuples.
//!
//! Records enter the engine from arbitrary producer threads and feed two
//! families of online summaries over a temporal sliding window:
//!
//! - [`operators::TopK`] tracks, per group key, the most frequent values
//!   of a target field together with their relative frequencies, backed
//!   by one [`window::SlidingWindow`] per group.
//! - [`graph::CompressedSparse`] indexes edges by source vertex in a
//!   fixed table of per-bucket locked chains, evicting edges that age
//!   out of the retention window as new ones arrive.
//!
//! Summaries are published through the shared [`features::FeatureMap`]
//! and fanned out as scalar updates on the [`bus::SubscriberBus`].

pub mod bus;
pub mod error;
pub mod features;
pub mod generators;
pub mod graph;
pub mod operators;
pub mod projection;
pub mod record;
pub mod window;

// Re-export main API
pub use bus::{ChannelSubscriber, Subscriber, SubscriberBus};
pub use error::{EngineError, Result};
pub use features::{FeatureMap, TopKFeature};
pub use graph::{CompressedSparse, GraphConfig, TemporalEdge};
pub use operators::{TopK, TopKConfig};
pub use projection::{FieldProjector, KeyProjector, GROUP_KEY_SEPARATOR};
pub use record::{FieldValue, FlowRecord};
pub use window::SlidingWindow;
