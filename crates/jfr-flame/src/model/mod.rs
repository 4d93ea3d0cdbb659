//! In-memory flamegraph entities produced by the decoder.
//!
//! All values are immutable, request-scoped results: they are built fresh
//! per decode and carry no links back to the wire payload.

pub mod flamegraph;
pub mod frame;
pub mod timeseries;
pub mod tree;

// Re-export main types
pub use flamegraph::{FlamegraphData, GraphData, Level};
pub use frame::{DiffDetails, Frame, FramePosition, FrameSampleTypes, FrameType};
pub use timeseries::{Serie, TimeseriesData};
pub use tree::{FrameTree, NodeId, TreeNode};
