//! Data ingestion and normalization for the promotion analysis pipeline.
//!
//! This crate handles:
//! - Required-column resolution for raw tabular input
//! - Timestamp parsing
//! - Line cleaning (missing fields, non-positive values, outlier cap)
//! - Pre/Post period segmentation

pub mod frame;
pub mod timestamp;
pub mod cleaner;
pub mod segmenter;

pub use frame::RawFrame;
pub use timestamp::parse_timestamp;
pub use cleaner::{CleanedLines, Cleaner, CleaningStats};
pub use segmenter::{PeriodSegmenter, Segments};
