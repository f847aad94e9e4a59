//! Streaming operators over flow records.

pub mod topk;

pub use topk::{TopK, TopKConfig};
