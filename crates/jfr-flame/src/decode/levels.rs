//! Assembly of decoded frames into per-depth levels.

use super::frame::decode_frame;
use super::options::DecodeOptions;
use super::title_pool::{FrameLocation, TitlePool};
use crate::model::{FlamegraphData, Level};
use crate::proto;
use crate::utils::error::DecodeError;
use log::debug;

/// Decode every level, keeping the server-provided order
///
/// No containment check is made between levels: the geometric parent/child
/// relation is a rendering-time assumption (see `FrameTree` for an explicit
/// check).
pub fn assemble_levels(
    wire_levels: &[proto::Level],
    pool: &TitlePool<'_>,
    options: &DecodeOptions,
) -> Result<Vec<Level>, DecodeError> {
    wire_levels
        .iter()
        .enumerate()
        .map(|(level, wire_level)| {
            let frames = wire_level
                .frames
                .iter()
                .enumerate()
                .map(|(frame, wire_frame)| {
                    decode_frame(wire_frame, pool, FrameLocation { level, frame }, options)
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Level::new(frames))
        })
        .collect()
}

/// Decode a complete flamegraph message
pub fn decode_flamegraph(
    wire: &proto::FlamegraphData,
    options: &DecodeOptions,
) -> Result<FlamegraphData, DecodeError> {
    let depth = u32::try_from(wire.depth).map_err(|_| DecodeError::NegativeValue {
        field: "depth",
        value: i64::from(wire.depth),
    })?;

    let pool = TitlePool::new(&wire.title_pool, options.title_index);
    let levels = assemble_levels(&wire.levels, &pool, options)?;

    debug!(
        "Decoded flamegraph: depth {}, {} levels, {} titles",
        depth,
        levels.len(),
        pool.len()
    );

    Ok(FlamegraphData::new(depth, levels))
}
