//! Building wire flamegraphs from collapsed stacks.
//!
//! Stacks are merged into a [`StackNode`] tree, which is then flattened
//! level by level into `proto::FlamegraphData`. Siblings are ordered by
//! title, and each frame's left offset is the running sum of the totals of
//! the siblings before it.

use crate::aggregator::stack_builder::CollapsedStack;
use crate::model::{FrameSampleTypes, FrameType};
use crate::proto;
use crate::utils::config::MAX_LEVEL;
use crate::utils::error::FlamegraphError;
use crate::utils::format::{format_bytes, format_nanos};
use log::{debug, info};
use prost::Message;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// What the weight of a stack measures
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum WeightKind {
    /// Plain sample counts, no weight
    #[default]
    Samples,
    /// Allocated bytes
    Allocation,
    /// Nanoseconds spent blocked
    Blocking,
    /// Nanoseconds of latency
    Latency,
}

impl WeightKind {
    pub fn is_weighted(self) -> bool {
        self != WeightKind::Samples
    }

    /// Human-readable weight, e.g. `"1.50 KiB Allocated"`
    pub fn format_weight(self, weight: u64) -> Option<String> {
        match self {
            WeightKind::Samples => None,
            WeightKind::Allocation => Some(format!("{} Allocated", format_bytes(weight))),
            WeightKind::Blocking => Some(format!("{} Blocked", format_nanos(weight))),
            WeightKind::Latency => Some(format!("{} Latency", format_nanos(weight))),
        }
    }

    /// Title of the synthetic root frame
    pub fn root_title(self, samples: u64, weight: u64) -> String {
        match self.format_weight(weight) {
            Some(weight) => format!("{} Event(s), {}", samples, weight),
            None => format!("{} Event(s)", samples),
        }
    }
}

/// Node of the merged stack tree
#[derive(Debug, Clone, PartialEq)]
pub struct StackNode {
    pub frame_type: FrameType,
    pub total_samples: u64,
    pub total_weight: u64,
    pub self_samples: u64,
    /// Samples split by execution mode, for JVM frames
    pub sample_types: FrameSampleTypes,
    pub children: BTreeMap<String, StackNode>,
}

impl StackNode {
    pub fn new(frame_type: FrameType) -> Self {
        Self {
            frame_type,
            total_samples: 0,
            total_weight: 0,
            self_samples: 0,
            sample_types: FrameSampleTypes::default(),
            children: BTreeMap::new(),
        }
    }

    /// Merge stacks into a tree under an `UNKNOWN` root
    pub fn from_stacks(stacks: &[CollapsedStack]) -> Self {
        let mut root = StackNode::new(FrameType::Unknown);
        for stack in stacks {
            let frames: Vec<(&str, FrameType)> = stack.frames().collect();
            root.insert(&frames, stack.samples, stack.weight);
        }
        root
    }

    fn insert(&mut self, stack: &[(&str, FrameType)], samples: u64, weight: u64) {
        self.total_samples = self.total_samples.saturating_add(samples);
        self.total_weight = self.total_weight.saturating_add(weight);

        match stack.split_first() {
            Some(((title, frame_type), tail)) => {
                let child = self
                    .children
                    .entry(title.to_string())
                    .or_insert_with(|| StackNode::new(*frame_type));
                child.count_sample_type(*frame_type, samples);
                child.insert(tail, samples, weight);
            }
            None => self.self_samples = self.self_samples.saturating_add(samples),
        }
    }

    fn count_sample_type(&mut self, frame_type: FrameType, samples: u64) {
        let counter = match frame_type {
            FrameType::Inlined => &mut self.sample_types.inlined,
            FrameType::C1Compiled => &mut self.sample_types.c1,
            FrameType::Interpreted => &mut self.sample_types.interpret,
            FrameType::JitCompiled => &mut self.sample_types.jit,
            _ => return,
        };
        *counter = counter.saturating_add(samples);
    }

    /// Number of levels of this subtree, this node included
    pub fn depth(&self) -> usize {
        1 + self
            .children
            .values()
            .map(StackNode::depth)
            .max()
            .unwrap_or(0)
    }
}

/// Title pool under construction, deduplicating titles
#[derive(Debug, Default)]
pub(crate) struct TitlePoolBuilder {
    titles: Vec<String>,
    index: HashMap<String, i32>,
}

impl TitlePoolBuilder {
    pub(crate) fn index_of(&mut self, title: &str) -> Result<i32, FlamegraphError> {
        if let Some(&index) = self.index.get(title) {
            return Ok(index);
        }
        let index = i32::try_from(self.titles.len())
            .map_err(|_| FlamegraphError::ValueTooLarge(self.titles.len() as u64))?;
        self.titles.push(title.to_string());
        self.index.insert(title.to_string(), index);
        Ok(index)
    }

    pub(crate) fn into_titles(self) -> Vec<String> {
        self.titles
    }
}

/// Convert a count to a wire integer
pub(crate) fn wire_int(value: u64) -> Result<i64, FlamegraphError> {
    i64::try_from(value).map_err(|_| FlamegraphError::ValueTooLarge(value))
}

/// Add an empty level for `level` if needed
pub(crate) fn ensure_level(levels: &mut Vec<proto::Level>, level: usize) {
    while levels.len() <= level {
        levels.push(proto::Level::default());
    }
}

/// Finish a flamegraph message from its levels and title pool
pub(crate) fn finish_flamegraph(
    levels: Vec<proto::Level>,
    titles: TitlePoolBuilder,
) -> Result<proto::FlamegraphData, FlamegraphError> {
    let depth = i32::try_from(levels.len())
        .map_err(|_| FlamegraphError::ValueTooLarge(levels.len() as u64))?;
    Ok(proto::FlamegraphData {
        depth,
        levels,
        title_pool: titles.into_titles(),
    })
}

/// Flattens a [`StackNode`] tree into wire levels
///
/// **Public** - used by the `build` command
#[derive(Debug)]
pub struct FlamegraphBuilder {
    kind: WeightKind,
    titles: TitlePoolBuilder,
    levels: Vec<proto::Level>,
}

impl FlamegraphBuilder {
    pub fn new(kind: WeightKind) -> Self {
        Self {
            kind,
            titles: TitlePoolBuilder::default(),
            levels: Vec::new(),
        }
    }

    /// Consume the builder and produce the flamegraph of `root`
    pub fn build(mut self, root: &StackNode) -> Result<proto::FlamegraphData, FlamegraphError> {
        let title = self.kind.root_title(root.total_samples, root.total_weight);
        self.build_frame(&title, root, 0, 0, 0)?;
        finish_flamegraph(self.levels, self.titles)
    }

    fn build_frame(
        &mut self,
        title: &str,
        node: &StackNode,
        level: usize,
        mut left_samples: u64,
        mut left_weight: u64,
    ) -> Result<(), FlamegraphError> {
        ensure_level(&mut self.levels, level);

        let mut frame = proto::Frame {
            left_samples: wire_int(left_samples)?,
            total_samples: wire_int(node.total_samples)?,
            title_index: self.titles.index_of(title)?,
            r#type: node.frame_type.to_wire() as i32,
            ..Default::default()
        };

        if self.kind.is_weighted() {
            frame.left_weight = wire_int(left_weight)?;
            frame.total_weight = wire_int(node.total_weight)?;
        }
        if node.self_samples > 0 {
            frame.self_samples = wire_int(node.self_samples)?;
        }
        if node.sample_types != FrameSampleTypes::default() {
            let st = &node.sample_types;
            frame.sample_types = Some(proto::FrameSampleTypes {
                inlined: wire_int(st.inlined)?,
                c1: wire_int(st.c1)?,
                interpret: wire_int(st.interpret)?,
                jit: wire_int(st.jit)?,
            });
        }
        self.levels[level].frames.push(frame);

        for (child_title, child) in &node.children {
            if level + 1 < MAX_LEVEL {
                self.build_frame(child_title, child, level + 1, left_samples, left_weight)?;
            }
            left_samples = left_samples.saturating_add(child.total_samples);
            left_weight = left_weight.saturating_add(child.total_weight);
        }
        Ok(())
    }
}

/// Build a flamegraph message from collapsed stacks
///
/// **Public** - main entry point for graph building
///
/// # Errors
/// * `FlamegraphError::EmptyStacks` - no stacks given
/// * `FlamegraphError::ValueTooLarge` - a total does not fit into `int64`
pub fn build_flamegraph(
    stacks: &[CollapsedStack],
    kind: WeightKind,
) -> Result<proto::FlamegraphData, FlamegraphError> {
    if stacks.is_empty() {
        return Err(FlamegraphError::EmptyStacks);
    }

    info!("Building {:?} flamegraph from {} stacks", kind, stacks.len());
    let root = StackNode::from_stacks(stacks);
    let data = FlamegraphBuilder::new(kind).build(&root)?;

    debug!(
        "Built flamegraph: depth {}, {} titles",
        data.depth,
        data.title_pool.len()
    );
    Ok(data)
}

/// Wrap a flamegraph into a `GraphData` message without timeseries
pub fn build_graph_data(
    stacks: &[CollapsedStack],
    kind: WeightKind,
) -> Result<proto::GraphData, FlamegraphError> {
    Ok(proto::GraphData {
        flamegraph: Some(build_flamegraph(stacks, kind)?),
        timeseries: None,
    })
}

/// Serialize a `GraphData` message to wire bytes
pub fn encode_graph_data(data: &proto::GraphData) -> Vec<u8> {
    data.encode_to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn stacks() -> Vec<CollapsedStack> {
        vec![
            CollapsedStack::new("main;b_[j]", 3, 300),
            CollapsedStack::new("main;a_[j];x", 4, 400),
            CollapsedStack::new("main", 1, 100),
            CollapsedStack::new("main;a_[i]", 2, 200),
        ]
    }

    #[test]
    fn test_root_titles() {
        assert_eq!(WeightKind::Samples.root_title(10, 0), "10 Event(s)");
        assert_eq!(
            WeightKind::Allocation.root_title(2, 1536),
            "2 Event(s), 1.50 KiB Allocated"
        );
        assert_eq!(
            WeightKind::Blocking.root_title(1, 2_000_000),
            "1 Event(s), 2.00 ms Blocked"
        );
    }

    #[test]
    fn test_stack_tree() {
        let root = StackNode::from_stacks(&stacks());
        assert_eq!(root.total_samples, 10);
        assert_eq!(root.depth(), 4);

        let main = &root.children["main"];
        assert_eq!(main.self_samples, 1);
        let a = &main.children["a"];
        assert_eq!(a.total_samples, 6);
        assert_eq!(a.frame_type, FrameType::JitCompiled);
        assert_eq!(a.sample_types.jit, 4);
        assert_eq!(a.sample_types.inlined, 2);
        assert_eq!(a.self_samples, 2);
    }

    #[test]
    fn test_levels_and_offsets() {
        let data = build_flamegraph(&stacks(), WeightKind::Samples).unwrap();
        assert_eq!(data.depth, 4);
        assert_eq!(data.levels.len(), 4);

        let title = |f: &proto::Frame| data.title_pool[f.title_index as usize].as_str();

        let level2: Vec<(&str, i64, i64)> = data.levels[2]
            .frames
            .iter()
            .map(|f| (title(f), f.left_samples, f.total_samples))
            .collect();
        assert_eq!(level2, vec![("a", 0, 6), ("b", 6, 3)]);

        // Unweighted graphs leave weight unset
        assert!(data.levels[2].frames.iter().all(|f| f.total_weight == 0));
        assert_eq!(title(&data.levels[0].frames[0]), "10 Event(s)");
    }

    #[test]
    fn test_weighted_graph() {
        let data = build_flamegraph(&stacks(), WeightKind::Allocation).unwrap();
        let b = &data.levels[2].frames[1];
        assert_eq!(b.left_weight, 600);
        assert_eq!(b.total_weight, 300);
    }

    #[test]
    fn test_titles_are_deduplicated() {
        let stacks = vec![
            CollapsedStack::new("run;work", 1, 0),
            CollapsedStack::new("other;work", 1, 0),
        ];
        let data = build_flamegraph(&stacks, WeightKind::Samples).unwrap();
        let count = data.title_pool.iter().filter(|t| *t == "work").count();
        assert_eq!(count, 1);
        assert_eq!(
            data.levels[2].frames[0].title_index,
            data.levels[2].frames[1].title_index
        );
    }

    #[test]
    fn test_empty_stacks() {
        assert!(matches!(
            build_flamegraph(&[], WeightKind::Samples),
            Err(FlamegraphError::EmptyStacks)
        ));
    }
}
