//! Aggregation of collapsed stack text into stack records.
//!
//! This module turns collapsed stack files into:
//! - Typed stack records (samples and weight per stack)
//! - Frame titles with their `FrameType`, derived from annotations
//! - Merged records, one per unique stack

pub mod stack_builder;

// Re-export main types and functions
pub use stack_builder::{
    merge_stacks, parse_collapsed, parse_frame_annotation, read_collapsed, CollapsedStack,
};
