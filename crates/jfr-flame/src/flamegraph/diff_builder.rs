//! Differential flamegraph building for comparing two profiles.
//!
//! Both stack sets are merged into one tree. Each emitted frame carries
//! `diff_details` with the primary-minus-secondary change:
//! - Shared frames: totals of both sides, signed difference
//! - Added frames (primary only): positive, 100 %
//! - Removed frames (secondary only): negative, 100 %

use super::builder::{ensure_level, finish_flamegraph, wire_int, StackNode, TitlePoolBuilder};
use crate::aggregator::stack_builder::CollapsedStack;
use crate::proto;
use crate::utils::config::{DIFF_ROOT_TITLE, MAX_LEVEL, MIN_SAMPLES_IN_PCT};
use crate::utils::error::FlamegraphError;
use log::{debug, info};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Added,
    Removed,
}

/// Relative change in percent, rounded to two decimals
fn percent(primary: u64, secondary: u64) -> f32 {
    let total = primary.saturating_add(secondary);
    if total == 0 {
        return 0.0;
    }
    let pct = primary.abs_diff(secondary) as f64 / total as f64 * 100.0;
    ((pct * 100.0).round() / 100.0) as f32
}

struct DiffBuilder {
    titles: TitlePoolBuilder,
    levels: Vec<proto::Level>,
    /// Children with at most this many samples are not emitted
    min_samples: u64,
}

impl DiffBuilder {
    fn new(total_samples: u64) -> Self {
        Self {
            titles: TitlePoolBuilder::default(),
            levels: Vec::new(),
            min_samples: (total_samples as f64 * MIN_SAMPLES_IN_PCT / 100.0) as u64,
        }
    }

    fn shared(
        &mut self,
        title: &str,
        primary: &StackNode,
        secondary: &StackNode,
        level: usize,
        mut left_samples: u64,
        mut left_weight: u64,
    ) -> Result<(), FlamegraphError> {
        ensure_level(&mut self.levels, level);

        let total_samples = primary.total_samples.saturating_add(secondary.total_samples);
        let total_weight = primary.total_weight.saturating_add(secondary.total_weight);

        let frame = proto::Frame {
            left_samples: wire_int(left_samples)?,
            left_weight: wire_int(left_weight)?,
            total_samples: wire_int(total_samples)?,
            total_weight: wire_int(total_weight)?,
            title_index: self.titles.index_of(title)?,
            r#type: primary.frame_type.to_wire() as i32,
            diff_details: Some(proto::DiffDetails {
                samples: wire_int(primary.total_samples)? - wire_int(secondary.total_samples)?,
                weight: wire_int(primary.total_weight)? - wire_int(secondary.total_weight)?,
                percent_samples: percent(primary.total_samples, secondary.total_samples),
                percent_weight: percent(primary.total_weight, secondary.total_weight),
            }),
            ..Default::default()
        };
        self.levels[level].frames.push(frame);

        let titles: BTreeSet<&String> = primary
            .children
            .keys()
            .chain(secondary.children.keys())
            .collect();

        for child_title in titles {
            let (samples, weight) = match (
                primary.children.get(child_title),
                secondary.children.get(child_title),
            ) {
                (Some(p), Some(s)) => {
                    if self.emits(p.total_samples.saturating_add(s.total_samples), level) {
                        self.shared(child_title, p, s, level + 1, left_samples, left_weight)?;
                    }
                    (
                        p.total_samples.saturating_add(s.total_samples),
                        p.total_weight.saturating_add(s.total_weight),
                    )
                }
                (Some(p), None) => {
                    if self.emits(p.total_samples, level) {
                        self.one_sided(
                            child_title,
                            p,
                            Side::Added,
                            level + 1,
                            left_samples,
                            left_weight,
                        )?;
                    }
                    (p.total_samples, p.total_weight)
                }
                (None, Some(s)) => {
                    if self.emits(s.total_samples, level) {
                        self.one_sided(
                            child_title,
                            s,
                            Side::Removed,
                            level + 1,
                            left_samples,
                            left_weight,
                        )?;
                    }
                    (s.total_samples, s.total_weight)
                }
                (None, None) => (0, 0),
            };
            left_samples = left_samples.saturating_add(samples);
            left_weight = left_weight.saturating_add(weight);
        }
        Ok(())
    }

    fn one_sided(
        &mut self,
        title: &str,
        node: &StackNode,
        side: Side,
        level: usize,
        mut left_samples: u64,
        mut left_weight: u64,
    ) -> Result<(), FlamegraphError> {
        ensure_level(&mut self.levels, level);

        let samples = wire_int(node.total_samples)?;
        let weight = wire_int(node.total_weight)?;
        let (samples_diff, weight_diff) = match side {
            Side::Added => (samples, weight),
            Side::Removed => (-samples, -weight),
        };

        let mut frame = proto::Frame {
            left_samples: wire_int(left_samples)?,
            left_weight: wire_int(left_weight)?,
            total_samples: samples,
            total_weight: weight,
            title_index: self.titles.index_of(title)?,
            r#type: node.frame_type.to_wire() as i32,
            diff_details: Some(proto::DiffDetails {
                samples: samples_diff,
                weight: weight_diff,
                percent_samples: 100.0,
                percent_weight: 100.0,
            }),
            ..Default::default()
        };
        if node.self_samples > 0 {
            frame.self_samples = wire_int(node.self_samples)?;
        }
        self.levels[level].frames.push(frame);

        for (child_title, child) in &node.children {
            if self.emits(child.total_samples, level) {
                self.one_sided(child_title, child, side, level + 1, left_samples, left_weight)?;
            }
            left_samples = left_samples.saturating_add(child.total_samples);
            left_weight = left_weight.saturating_add(child.total_weight);
        }
        Ok(())
    }

    /// Whether a child of a frame at `level` with `samples` is emitted
    fn emits(&self, samples: u64, level: usize) -> bool {
        samples > self.min_samples && level + 1 < MAX_LEVEL
    }
}

/// Build a differential flamegraph message
///
/// **Public** - main entry point for diff building
///
/// # Arguments
/// * `primary` - Stacks of the profile being inspected
/// * `secondary` - Stacks of the baseline profile
///
/// # Errors
/// * `FlamegraphError::EmptyStacks` - both stack sets are empty
/// * `FlamegraphError::ValueTooLarge` - a total does not fit into `int64`
pub fn build_diff_flamegraph(
    primary: &[CollapsedStack],
    secondary: &[CollapsedStack],
) -> Result<proto::FlamegraphData, FlamegraphError> {
    if primary.is_empty() && secondary.is_empty() {
        return Err(FlamegraphError::EmptyStacks);
    }

    info!(
        "Building diff flamegraph (P:{} stacks, S:{} stacks)",
        primary.len(),
        secondary.len()
    );

    let primary = StackNode::from_stacks(primary);
    let secondary = StackNode::from_stacks(secondary);

    let mut builder =
        DiffBuilder::new(primary.total_samples.saturating_add(secondary.total_samples));
    debug!("Pruning diff frames with <= {} samples", builder.min_samples);

    builder.shared(DIFF_ROOT_TITLE, &primary, &secondary, 0, 0, 0)?;
    finish_flamegraph(builder.levels, builder.titles)
}

/// Wrap a differential flamegraph into a `GraphData` message
pub fn build_diff_graph_data(
    primary: &[CollapsedStack],
    secondary: &[CollapsedStack],
) -> Result<proto::GraphData, FlamegraphError> {
    Ok(proto::GraphData {
        flamegraph: Some(build_diff_flamegraph(primary, secondary)?),
        timeseries: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn title<'a>(data: &'a proto::FlamegraphData, frame: &proto::Frame) -> &'a str {
        &data.title_pool[frame.title_index as usize]
    }

    #[test]
    fn test_percent_rounding() {
        assert_eq!(percent(100, 50), 33.33);
        assert_eq!(percent(0, 0), 0.0);
        assert_eq!(percent(7, 0), 100.0);
    }

    #[test]
    fn test_shared_added_removed() {
        let primary = vec![
            CollapsedStack::new("main;hot", 80, 0),
            CollapsedStack::new("main;new", 20, 0),
        ];
        let secondary = vec![
            CollapsedStack::new("main;hot", 40, 0),
            CollapsedStack::new("main;old", 60, 0),
        ];

        let data = build_diff_flamegraph(&primary, &secondary).unwrap();
        let root = &data.levels[0].frames[0];
        assert_eq!(title(&data, root), "all");
        assert_eq!(root.total_samples, 200);
        assert_eq!(root.diff_details.unwrap().samples, 0);

        let frames: Vec<(&str, i64, i64, i64)> = data.levels[2]
            .frames
            .iter()
            .map(|f| {
                (
                    title(&data, f),
                    f.left_samples,
                    f.total_samples,
                    f.diff_details.unwrap().samples,
                )
            })
            .collect();
        assert_eq!(
            frames,
            vec![("hot", 0, 120, 40), ("new", 120, 20, 20), ("old", 140, 60, -60)]
        );

        let old = data.levels[2].frames[2].diff_details.unwrap();
        assert_eq!(old.percent_samples, 100.0);
    }

    #[test]
    fn test_small_children_pruned() {
        let primary = vec![
            CollapsedStack::new("main;big", 5000, 0),
            CollapsedStack::new("main;tiny", 1, 0),
            CollapsedStack::new("main;zzz", 10, 0),
        ];
        let secondary = vec![CollapsedStack::new("main;big", 5000, 0)];

        // min samples = 10011 * 0.1 / 100 = 10
        let data = build_diff_flamegraph(&primary, &secondary).unwrap();
        let titles: Vec<&str> = data.levels[2]
            .frames
            .iter()
            .map(|f| title(&data, f))
            .collect();
        assert_eq!(titles, vec!["big"]);

        let primary = vec![
            CollapsedStack::new("main;big", 5000, 0),
            CollapsedStack::new("main;tiny", 1, 0),
            CollapsedStack::new("main;zzz", 50, 0),
        ];
        let data = build_diff_flamegraph(&primary, &secondary).unwrap();
        let zzz = &data.levels[2].frames[1];
        assert_eq!(title(&data, zzz), "zzz");
        // offset still counts the pruned "tiny"
        assert_eq!(zzz.left_samples, 10_001);
    }
}
