//! Explicit arena tree over a decoded flamegraph.
//!
//! The wire format encodes the hierarchy geometrically. Renderers that walk
//! the tree directly can build a [`FrameTree`] once per decode: every node
//! gets a parent index into the previous level and a contiguous child range
//! into the next one.

use super::flamegraph::FlamegraphData;
use super::frame::Frame;
use crate::utils::error::TreeError;
use log::debug;
use std::ops::Range;

/// Position of a frame: level (depth) and index within the level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    pub level: usize,
    pub index: usize,
}

impl NodeId {
    pub fn new(level: usize, index: usize) -> Self {
        Self { level, index }
    }
}

/// Tree links of a single frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    /// Index of the parent in the previous level
    pub parent: Option<usize>,

    /// Indices of the children in the next level
    pub children: Range<usize>,
}

/// Arena of tree links, parallel to `FlamegraphData::levels`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FrameTree {
    levels: Vec<Vec<TreeNode>>,
}

impl FrameTree {
    /// Build the tree by sweeping each pair of adjacent levels
    ///
    /// Both levels must be in positional order (as the server sends them).
    ///
    /// # Errors
    /// * `TreeError::OrphanFrame` - a frame fits into no frame of the level above
    pub fn build(data: &FlamegraphData) -> Result<Self, TreeError> {
        let mut levels: Vec<Vec<TreeNode>> = data
            .levels
            .iter()
            .map(|level| {
                vec![
                    TreeNode {
                        parent: None,
                        children: 0..0,
                    };
                    level.len()
                ]
            })
            .collect();

        for depth in 1..data.levels.len() {
            let parents = &data.levels[depth - 1].frames;
            let children = &data.levels[depth].frames;

            let mut p = 0;
            for (c, child) in children.iter().enumerate() {
                while p < parents.len()
                    && !contains(&parents[p], child)
                    && parents[p].right_samples() <= child.left_samples
                {
                    p += 1;
                }

                if p == parents.len() || !contains(&parents[p], child) {
                    return Err(TreeError::OrphanFrame {
                        level: depth,
                        index: c,
                    });
                }

                levels[depth][c].parent = Some(p);
                let range = &mut levels[depth - 1][p].children;
                if range.is_empty() {
                    *range = c..c + 1;
                } else {
                    range.end = c + 1;
                }
            }
        }

        debug!(
            "Built frame tree with {} levels and {} nodes",
            levels.len(),
            levels.iter().map(Vec::len).sum::<usize>()
        );

        Ok(Self { levels })
    }

    /// Number of levels
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    /// Number of nodes over all levels
    pub fn len(&self) -> usize {
        self.levels.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn node(&self, id: NodeId) -> Option<&TreeNode> {
        self.levels.get(id.level)?.get(id.index)
    }

    /// Frames on the top level
    pub fn roots(&self) -> impl Iterator<Item = NodeId> + '_ {
        let count = self.levels.first().map(Vec::len).unwrap_or(0);
        (0..count).map(|index| NodeId::new(0, index))
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.node(id)?.parent?;
        Some(NodeId::new(id.level - 1, parent))
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let range = self
            .node(id)
            .map(|node| node.children.clone())
            .unwrap_or(0..0);
        range.map(move |index| NodeId::new(id.level + 1, index))
    }

    /// Samples of a frame not covered by its children
    ///
    /// Uses the explicit `self_samples` when the frame carries it.
    pub fn self_samples(&self, data: &FlamegraphData, id: NodeId) -> u64 {
        let Some(frame) = data.frame(id.level, id.index) else {
            return 0;
        };
        if let Some(explicit) = frame.self_samples {
            return explicit;
        }
        frame
            .total_samples
            .saturating_sub(self.children_samples(data, id))
    }

    /// Frames whose children add up to more samples than the frame itself
    pub fn overflowing_frames(&self, data: &FlamegraphData) -> Vec<NodeId> {
        let mut out = Vec::new();
        for (level, nodes) in self.levels.iter().enumerate() {
            for index in 0..nodes.len() {
                let id = NodeId::new(level, index);
                let Some(frame) = data.frame(level, index) else {
                    continue;
                };
                if self.children_samples(data, id) > frame.total_samples {
                    out.push(id);
                }
            }
        }
        out
    }

    fn children_samples(&self, data: &FlamegraphData, id: NodeId) -> u64 {
        self.children(id)
            .filter_map(|child| data.frame(child.level, child.index))
            .fold(0, |acc, f| acc.saturating_add(f.total_samples))
    }
}

fn contains(parent: &Frame, child: &Frame) -> bool {
    parent.left_samples <= child.left_samples && child.right_samples() <= parent.right_samples()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FrameType, Level};

    fn frame(left: u64, total: u64, title: &str) -> Frame {
        Frame::new(left, total, title, FrameType::JitCompiled)
    }

    fn sample_graph() -> FlamegraphData {
        FlamegraphData::new(
            3,
            vec![
                Level::new(vec![frame(0, 10, "root")]),
                Level::new(vec![frame(0, 6, "a"), frame(6, 3, "b")]),
                Level::new(vec![frame(0, 2, "a1"), frame(2, 4, "a2"), frame(6, 3, "b1")]),
            ],
        )
    }

    #[test]
    fn test_parent_child_assignment() {
        let data = sample_graph();
        let tree = FrameTree::build(&data).unwrap();

        assert_eq!(tree.depth(), 3);
        assert_eq!(tree.len(), 6);

        let root = NodeId::new(0, 0);
        let children: Vec<NodeId> = tree.children(root).collect();
        assert_eq!(children, vec![NodeId::new(1, 0), NodeId::new(1, 1)]);

        let a_children: Vec<NodeId> = tree.children(NodeId::new(1, 0)).collect();
        assert_eq!(a_children, vec![NodeId::new(2, 0), NodeId::new(2, 1)]);

        assert_eq!(tree.parent(NodeId::new(2, 2)), Some(NodeId::new(1, 1)));
        assert_eq!(tree.parent(root), None);
    }

    #[test]
    fn test_self_samples_computed() {
        let data = sample_graph();
        let tree = FrameTree::build(&data).unwrap();

        // root: 10 - (6 + 3)
        assert_eq!(tree.self_samples(&data, NodeId::new(0, 0)), 1);
        assert_eq!(tree.self_samples(&data, NodeId::new(1, 0)), 0);
        assert_eq!(tree.self_samples(&data, NodeId::new(2, 1)), 4);
    }

    #[test]
    fn test_orphan_frame_detected() {
        let data = FlamegraphData::new(
            2,
            vec![
                Level::new(vec![frame(0, 10, "root")]),
                Level::new(vec![frame(8, 5, "sticks-out")]),
            ],
        );

        assert_eq!(
            FrameTree::build(&data),
            Err(TreeError::OrphanFrame { level: 1, index: 0 })
        );
    }

    #[test]
    fn test_overflowing_frames() {
        let data = FlamegraphData::new(
            2,
            vec![
                Level::new(vec![frame(0, 4, "root")]),
                Level::new(vec![frame(0, 2, "a"), frame(2, 2, "b")]),
            ],
        );
        let tree = FrameTree::build(&data).unwrap();
        assert!(tree.overflowing_frames(&data).is_empty());

        let mut broken = data.clone();
        broken.levels[0].frames[0].total_samples = 3;
        broken.levels[1].frames[1].left_samples = 1;
        broken.levels[1].frames[1].total_samples = 2;
        let tree = FrameTree::build(&broken).unwrap();
        assert_eq!(tree.overflowing_frames(&broken), vec![NodeId::new(0, 0)]);
    }

    #[test]
    fn test_children_sum_saturates() {
        let half = u64::MAX / 2 + 1;
        let data = FlamegraphData::new(
            2,
            vec![
                Level::new(vec![frame(0, u64::MAX, "root")]),
                Level::new(vec![frame(0, half, "a"), frame(half, half, "b")]),
            ],
        );
        let tree = FrameTree::build(&data).unwrap();

        assert_eq!(tree.self_samples(&data, NodeId::new(0, 0)), 0);
        assert!(tree.overflowing_frames(&data).is_empty());
    }
}
