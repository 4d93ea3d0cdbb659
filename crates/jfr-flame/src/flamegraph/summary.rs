//! Terminal summaries of decoded flamegraphs.

use crate::color::{frame_color, hex_rgb, type_color};
use crate::model::{FlamegraphData, Frame, FrameTree, FrameType, NodeId};
use colored::*;
use log::warn;
use std::collections::HashMap;

const TITLE_COLUMN: usize = 48;

/// Self samples per frame title, hottest first
///
/// Self samples come from the frame itself when present, otherwise they are
/// derived from the explicit tree. A graph whose geometry does not form a
/// tree only counts explicit values.
pub fn hot_frames(data: &FlamegraphData) -> Vec<(String, FrameType, u64)> {
    let tree = match FrameTree::build(data) {
        Ok(tree) => Some(tree),
        Err(e) => {
            warn!("Flamegraph geometry is not a tree ({}); using explicit self samples", e);
            None
        }
    };

    let mut by_title: HashMap<&str, (FrameType, u64)> = HashMap::new();
    for (level, frames) in data.levels.iter().enumerate() {
        for (index, frame) in frames.iter().enumerate() {
            let self_samples = match &tree {
                Some(tree) => tree.self_samples(data, NodeId::new(level, index)),
                None => frame.self_samples.unwrap_or(0),
            };
            if self_samples == 0 {
                continue;
            }
            let entry = by_title
                .entry(frame.title.as_str())
                .or_insert((frame.frame_type, 0));
            entry.1 = entry.1.saturating_add(self_samples);
        }
    }

    let mut hot: Vec<(String, FrameType, u64)> = by_title
        .into_iter()
        .map(|(title, (frame_type, samples))| (title.to_string(), frame_type, samples))
        .collect();
    hot.sort_by(|a, b| b.2.cmp(&a.2).then_with(|| a.0.cmp(&b.0)));
    hot
}

/// Create a text summary with the hottest frames, plus the biggest changes
/// for differential graphs
pub fn generate_text_summary(data: &FlamegraphData, max_lines: usize) -> String {
    let total = data.root_total(false);
    let hot = hot_frames(data);
    let mut lines = Vec::new();

    lines.push(format!("  {}", "HOTTEST FRAMES (self samples)".bold()));
    lines.push(format!("  {}", "─".repeat(TITLE_COLUMN + 26)));
    lines.push(format!(
        "  {:<width$} {:>12} {:>8}",
        "Frame",
        "Samples",
        "%",
        width = TITLE_COLUMN + 4
    ));
    lines.push(format!("  {}", "─".repeat(TITLE_COLUMN + 26)));

    for (title, frame_type, samples) in hot.iter().take(max_lines) {
        lines.push(format!(
            "  {} {} {:>12} {:>7.2}%",
            swatch(type_color(*frame_type)),
            paint(&truncate_title(title, TITLE_COLUMN), *frame_type),
            samples,
            percentage(*samples, total)
        ));
    }

    if hot.len() > max_lines {
        lines.push(String::new());
        lines.push(format!(
            "   (Showing top {} of {} frames)",
            max_lines,
            hot.len()
        ));
    }

    if data.is_differential() {
        lines.push(String::new());
        lines.extend(render_changes(data, max_lines));
    }

    lines.join("\n")
}

/// Frames with the largest absolute change in samples
fn render_changes(data: &FlamegraphData, max_lines: usize) -> Vec<String> {
    let mut changed: Vec<&Frame> = data
        .levels
        .iter()
        .skip(1)
        .flat_map(|level| level.iter())
        .filter(|f| f.diff_details.is_some_and(|d| d.samples != 0))
        .collect();
    changed.sort_by_key(|f| {
        std::cmp::Reverse(f.diff_details.map(|d| d.samples.unsigned_abs()).unwrap_or(0))
    });

    let mut lines = vec![format!("  {}", "BIGGEST CHANGES (primary vs secondary)".bold())];
    lines.push(format!("  {}", "─".repeat(TITLE_COLUMN + 26)));

    for frame in changed.iter().take(max_lines) {
        let Some(details) = frame.diff_details else {
            continue;
        };
        let change = format!("{:+}", details.samples);
        let change = if details.samples > 0 {
            change.red()
        } else {
            change.green()
        };
        lines.push(format!(
            "  {} {:<width$} {:>12} {:>7.2}%",
            swatch(frame_color(frame, false)),
            truncate_title(&frame.title, TITLE_COLUMN),
            change,
            details.percent_samples,
            width = TITLE_COLUMN
        ));
    }
    lines
}

/// Indented text rendering of the frame tree
///
/// Descends at most `max_depth` levels; falls back to a flat listing when the
/// geometry does not form a tree.
pub fn render_frame_tree(data: &FlamegraphData, max_depth: usize) -> String {
    let total = data.root_total(false);
    let mut lines = Vec::new();

    match FrameTree::build(data) {
        Ok(tree) => {
            let mut stack: Vec<NodeId> = tree.roots().collect();
            stack.reverse();
            while let Some(id) = stack.pop() {
                let Some(frame) = data.frame(id.level, id.index) else {
                    continue;
                };
                lines.push(tree_line(frame, id.level, total));
                if id.level + 1 < max_depth {
                    let mut children: Vec<NodeId> = tree.children(id).collect();
                    children.reverse();
                    stack.extend(children);
                }
            }
        }
        Err(e) => {
            warn!("Cannot render tree: {}", e);
            for (level, frames) in data.levels.iter().enumerate().take(max_depth) {
                for frame in frames.iter() {
                    lines.push(tree_line(frame, level, total));
                }
            }
        }
    }

    lines.join("\n")
}

fn tree_line(frame: &Frame, level: usize, total: u64) -> String {
    format!(
        "{}{} {} ({:.2}%)",
        "  ".repeat(level),
        paint(&frame.title, frame.frame_type),
        frame.total_samples,
        percentage(frame.total_samples, total)
    )
}

fn swatch(color: &str) -> ColoredString {
    match hex_rgb(color) {
        Some((r, g, b)) => "██".truecolor(r, g, b),
        None => "██".normal(),
    }
}

fn paint(title: &str, frame_type: FrameType) -> ColoredString {
    match frame_type {
        FrameType::Native | FrameType::Cpp | FrameType::Kernel => title.yellow(),
        FrameType::JitCompiled | FrameType::C1Compiled | FrameType::Inlined => title.green(),
        FrameType::Interpreted => title.cyan(),
        FrameType::HighlightedWarning => title.red().bold(),
        _ => title.normal(),
    }
}

fn percentage(value: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        value as f64 / total as f64 * 100.0
    }
}

/// Truncate from the left, keeping the method name visible
fn truncate_title(title: &str, max_len: usize) -> String {
    let count = title.chars().count();
    if count > max_len {
        let tail: String = title.chars().skip(count - (max_len - 3)).collect();
        format!("...{}", tail)
    } else {
        format!("{:<width$}", title, width = max_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DiffDetails, Level};

    fn graph() -> FlamegraphData {
        FlamegraphData::new(
            3,
            vec![
                Level::new(vec![Frame::new(0, 10, "all", FrameType::Unknown)]),
                Level::new(vec![
                    Frame::new(0, 7, "Main.run", FrameType::JitCompiled),
                    Frame::new(7, 3, "Gc.work", FrameType::Cpp),
                ]),
                Level::new(vec![Frame::new(0, 5, "Main.hot", FrameType::Inlined)]),
            ],
        )
    }

    #[test]
    fn test_hot_frames_by_self_samples() {
        let hot = hot_frames(&graph());
        let titles: Vec<(&str, u64)> = hot.iter().map(|(t, _, s)| (t.as_str(), *s)).collect();
        assert_eq!(titles, vec![("Main.hot", 5), ("Gc.work", 3), ("Main.run", 2)]);
    }

    #[test]
    fn test_summary_lists_frames() {
        let summary = generate_text_summary(&graph(), 2);
        assert!(summary.contains("Main.hot"));
        assert!(summary.contains("Gc.work"));
        assert!(summary.contains("Showing top 2 of 3 frames"));
        assert!(!summary.contains("BIGGEST CHANGES"));
    }

    #[test]
    fn test_summary_shows_changes() {
        let mut data = graph();
        data.levels[1].frames[1].diff_details = Some(DiffDetails {
            samples: -3,
            weight: 0,
            percent_samples: 100.0,
            percent_weight: 100.0,
        });
        let summary = generate_text_summary(&data, 10);
        assert!(summary.contains("BIGGEST CHANGES"));
        assert!(summary.contains("-3"));
    }

    #[test]
    fn test_tree_rendering() {
        let tree = render_frame_tree(&graph(), 10);
        let lines: Vec<&str> = tree.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with("  "));
        assert!(lines[2].contains("Main.hot"));
        assert!(lines[3].contains("Gc.work"));

        let shallow = render_frame_tree(&graph(), 2);
        assert_eq!(shallow.lines().count(), 3);
    }

    #[test]
    fn test_truncate_title() {
        assert_eq!(truncate_title("abcdef", 5), "...ef");
        assert_eq!(truncate_title("abc", 5), "abc  ");
    }

    #[test]
    fn test_summary_of_saturated_roots() {
        let big = i64::MAX as u64;
        let data = FlamegraphData::new(
            1,
            vec![Level::new(vec![
                Frame::new(0, big, "a", FrameType::Native),
                Frame::new(big, big, "b", FrameType::Native),
                Frame::new(big.saturating_mul(2), big, "c", FrameType::Native),
            ])],
        );
        let summary = generate_text_summary(&data, 5);
        assert!(summary.contains(&big.to_string()));
        assert!(render_frame_tree(&data, 2).contains('c'));
    }
}
