//! JFR Flame
//!
//! Decoder for the protobuf flamegraph payloads served by JFR analysis
//! backends, the color resolver used to paint their frames, and builders
//! that produce the same payloads from collapsed stacks.
//!
//! # Architecture
//!
//! - `proto`: wire messages
//! - `decode`: wire messages to the typed model
//! - `model`: decoded graph, frame and tree types
//! - `color`: per-type and differential frame colors
//! - `aggregator`: collapsed stack parsing
//! - `flamegraph`: payload building, SVG and terminal rendering
//! - `source`: file and HTTP payload sources
//! - `output`: JSON, SVG and wire writers
//! - `commands`: CLI command implementations

pub mod aggregator;
pub mod color;
pub mod commands;
pub mod decode;
pub mod flamegraph;
pub mod model;
pub mod output;
pub mod proto;
pub mod source;
pub mod utils;

// Re-export commonly used types
pub use color::{frame_color, resolve_by_type, resolve_diff_color};
pub use decode::{decode_graph_data, DecodeOptions};
pub use model::{FlamegraphData, Frame, FrameType, GraphData};
pub use source::{load_graph, GraphSource};
