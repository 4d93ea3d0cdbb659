//! Levels, flamegraph data and the decoded graph aggregate.

use super::frame::Frame;
use super::timeseries::TimeseriesData;
use serde::{Deserialize, Serialize};

/// Frames at one tree depth, in positional order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Level {
    pub frames: Vec<Frame>,
}

impl Level {
    pub fn new(frames: Vec<Frame>) -> Self {
        Self { frames }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Frame> {
        self.frames.iter()
    }
}

/// A decoded flamegraph: frames grouped by depth
///
/// Parent/child relations are implicit: a child sits one level deeper and its
/// `[left, left + total)` range falls within the parent's range.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FlamegraphData {
    /// Rendering height bound (not necessarily equal to `levels.len()`)
    pub depth: u32,

    pub levels: Vec<Level>,
}

impl FlamegraphData {
    pub fn new(depth: u32, levels: Vec<Level>) -> Self {
        Self { depth, levels }
    }

    pub fn is_empty(&self) -> bool {
        self.levels.iter().all(Level::is_empty)
    }

    /// Total number of frames over all levels
    pub fn frame_count(&self) -> usize {
        self.levels.iter().map(Level::len).sum()
    }

    /// Frame at the given level and position, if present
    pub fn frame(&self, level: usize, index: usize) -> Option<&Frame> {
        self.levels.get(level)?.frames.get(index)
    }

    /// Sum of the totals on the top level (samples or weight), saturating
    pub fn root_total(&self, use_weight: bool) -> u64 {
        self.levels
            .first()
            .map(|level| {
                level
                    .iter()
                    .fold(0_u64, |acc, f| acc.saturating_add(f.total(use_weight)))
            })
            .unwrap_or(0)
    }

    /// Whether any frame carries differential details
    pub fn is_differential(&self) -> bool {
        self.levels
            .iter()
            .flat_map(Level::iter)
            .any(Frame::is_diff)
    }
}

/// Top-level decode result: a flamegraph and its timeseries
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphData {
    pub flamegraph: FlamegraphData,
    pub timeseries: TimeseriesData,
}

impl GraphData {
    pub fn new(flamegraph: FlamegraphData, timeseries: TimeseriesData) -> Self {
        Self {
            flamegraph,
            timeseries,
        }
    }
}
