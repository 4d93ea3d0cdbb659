//! Flamegraph building and rendering.
//!
//! This module converts collapsed stacks into wire flamegraphs (regular and
//! differential) and renders decoded flamegraphs as SVG or terminal text.

pub mod builder;
pub mod diff_builder;
pub mod summary;
pub mod svg;

// Re-export main types
pub use builder::{
    build_flamegraph, build_graph_data, encode_graph_data, FlamegraphBuilder, StackNode,
    WeightKind,
};
pub use diff_builder::{build_diff_flamegraph, build_diff_graph_data};
pub use summary::{generate_text_summary, hot_frames, render_frame_tree};
pub use svg::{get_truncated_name, render_svg, FlamegraphConfig};
