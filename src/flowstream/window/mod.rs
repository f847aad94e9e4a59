//! Windowed stream summaries.

pub mod sliding;

pub use sliding::SlidingWindow;
