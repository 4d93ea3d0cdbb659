//! Protocol Buffers messages of the flamegraph wire format.
//!
//! Titles are not inlined into frames: every frame carries a `title_index`
//! into `FlamegraphData::title_pool`, so each distinct method name travels
//! only once per payload.

mod messages;

pub use messages::{
    DiffDetails, FlamegraphData, Frame, FramePosition, FrameSampleTypes, FrameType, GraphData,
    Level, TimeseriesData, TimeseriesPoint, TimeseriesSeries,
};
