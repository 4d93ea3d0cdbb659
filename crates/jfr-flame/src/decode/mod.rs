//! Decoding of the flamegraph wire format.
//!
//! This module handles:
//! - Resolving title indices against the payload's title pool
//! - Converting wire frames (64-bit integers, optional sub-messages)
//! - Assembling frames into levels, in server order
//! - Pairing the flamegraph with its timeseries
//!
//! # Example
//! ```ignore
//! use jfr_flame::decode::{decode_graph_data, DecodeOptions};
//!
//! let graph = decode_graph_data(&bytes, &DecodeOptions::default())?;
//! println!("{} levels", graph.flamegraph.levels.len());
//! ```

mod frame;
mod graph;
mod levels;
mod options;
mod title_pool;

// Public API exports
pub use frame::decode_frame;
pub use graph::{decode_graph_data, decode_graph_message, decode_timeseries};
pub use levels::{assemble_levels, decode_flamegraph};
pub use options::{load_options, DecodeOptions, IntegerPolicy, TitleIndexPolicy};
pub use title_pool::{FrameLocation, TitlePool};
