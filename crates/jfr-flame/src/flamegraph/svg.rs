//! SVG rendering of decoded flamegraphs.
//!
//! Frames are laid out straight from the wire geometry: `left / root_total`
//! gives the x position and `total / root_total` the width. Colors come from
//! [`frame_color`], so regular graphs are colored by frame type and
//! differential graphs by their change bands.

use crate::color::{
    frame_color, type_color, BEFORE_MARKER_COLOR, GREEN_COLORS, NEUTRAL_COLOR, RED_COLORS,
};
use crate::model::{FlamegraphData, Frame, FrameType};
use crate::utils::error::FlamegraphError;
use log::info;
use std::collections::BTreeSet;
use std::fmt::Write as _;

const LINE_HEIGHT: usize = 20;
const HEADER_HEIGHT: usize = 40;
const LEGEND_ROW_HEIGHT: usize = 24;
const LEGEND_ITEM_WIDTH: usize = 200;

/// Flamegraph rendering configuration
#[derive(Debug, Clone)]
pub struct FlamegraphConfig {
    pub title: String,
    pub width: usize,
    /// Lay out and color by weight instead of samples
    pub use_weight: bool,
}

impl Default for FlamegraphConfig {
    fn default() -> Self {
        Self {
            title: "Flame Graph".to_string(),
            width: 1200,
            use_weight: false,
        }
    }
}

impl FlamegraphConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    pub fn with_weight(mut self, use_weight: bool) -> Self {
        self.use_weight = use_weight;
        self
    }
}

/// Render a decoded flamegraph to an SVG document
///
/// **Public** - used by the `decode` and `diff` commands
///
/// # Errors
/// * `FlamegraphError::EmptyStacks` - the graph has no frames
pub fn render_svg(
    data: &FlamegraphData,
    config: &FlamegraphConfig,
) -> Result<String, FlamegraphError> {
    if data.is_empty() {
        return Err(FlamegraphError::EmptyStacks);
    }

    let root_total = data.root_total(config.use_weight);
    let width = config.width as f64;
    let rows = data.levels.len();
    let graph_height = rows * LINE_HEIGHT;

    let legend = legend_items(data);
    let legend_rows = legend.len().div_ceil(legend_columns(config.width));
    let total_height = HEADER_HEIGHT + graph_height + 20 + legend_rows * LEGEND_ROW_HEIGHT + 20;

    info!(
        "Rendering SVG flamegraph: {} levels, {} frames",
        rows,
        data.frame_count()
    );

    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
        config.width, total_height, config.width, total_height
    );
    svg.push_str(
        r#"<style>.func { font: 12px sans-serif; } .func:hover { stroke: black; stroke-width: 1; cursor: pointer; opacity: 0.9; }</style>"#,
    );
    let _ = write!(
        svg,
        r#"<text x="{}" y="24" font-size="16" text-anchor="middle" font-weight="bold">{}</text>"#,
        config.width / 2,
        escape_xml(&config.title)
    );

    // Root at the bottom
    for (level, frames) in data.levels.iter().enumerate() {
        let y = (HEADER_HEIGHT + graph_height - (level + 1) * LINE_HEIGHT) as f64;
        for frame in frames.iter() {
            let (x, w) = if root_total == 0 {
                (0.0, 0.0)
            } else {
                (
                    frame.left(config.use_weight) as f64 / root_total as f64 * width,
                    frame.total(config.use_weight) as f64 / root_total as f64 * width,
                )
            };
            if w < 0.5 {
                continue;
            }
            render_frame(&mut svg, frame, x, y, w, root_total, config.use_weight);
        }
    }

    render_legend(&mut svg, &legend, HEADER_HEIGHT + graph_height + 20, config.width);
    svg.push_str("</svg>");

    info!("Flamegraph rendered successfully ({} bytes)", svg.len());
    Ok(svg)
}

fn render_frame(
    out: &mut String,
    frame: &Frame,
    x: f64,
    y: f64,
    w: f64,
    root_total: u64,
    use_weight: bool,
) {
    let color = frame_color(frame, use_weight);
    let tooltip = format_tooltip(frame, root_total, use_weight);

    let _ = write!(
        out,
        r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{}" fill="{}" stroke="white" stroke-width="0.5" class="func"><title>{}</title></rect>"#,
        x,
        y,
        w,
        LINE_HEIGHT,
        color,
        escape_xml(&tooltip)
    );

    if let Some(label) = get_truncated_name(&frame.title, w) {
        let _ = write!(
            out,
            r#"<text x="{:.2}" y="{:.2}" dx="4" dy="14" font-size="12" fill="black" pointer-events="none">{}</text>"#,
            x,
            y,
            escape_xml(&label)
        );
    }
}

fn format_tooltip(frame: &Frame, root_total: u64, use_weight: bool) -> String {
    let unit = if use_weight { "weight" } else { "samples" };
    let value = frame.total(use_weight);
    let share = if root_total == 0 {
        0.0
    } else {
        value as f64 / root_total as f64 * 100.0
    };

    let mut tooltip = format!(
        "{} [{}]: {} {} ({:.2}%)",
        frame.title, frame.frame_type, value, unit, share
    );

    if let Some(details) = &frame.diff_details {
        let (diff, pct) = if use_weight {
            (details.weight, details.percent_weight)
        } else {
            (details.samples, details.percent_samples)
        };
        let _ = write!(tooltip, " | change {:+} ({:.2}%)", diff, pct);
    }
    if let Some(position) = &frame.position {
        let _ = write!(tooltip, " | line {}, bci {}", position.line, position.bci);
    }
    tooltip
}

/// Truncate a label to the width available for it
///
/// Returns `None` when the frame is too narrow for any text.
pub fn get_truncated_name(name: &str, width: f64) -> Option<String> {
    const MIN_LABEL_WIDTH: f64 = 35.0;
    const CHAR_WIDTH: f64 = 7.0;

    if width <= MIN_LABEL_WIDTH || name.is_empty() {
        return None;
    }

    let max_chars = (width / CHAR_WIDTH) as usize;
    let char_count = name.chars().count();
    if char_count > max_chars && max_chars > 3 {
        let kept: String = name.chars().take(max_chars - 3).collect();
        Some(format!("{}...", kept))
    } else {
        Some(name.to_string())
    }
}

/// Escape text for use in SVG content and attributes
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Legend entries: the diff ramps, or the palette of the types in use
fn legend_items(data: &FlamegraphData) -> Vec<(String, &'static str)> {
    if data.is_differential() {
        let mut items: Vec<(String, &'static str)> = GREEN_COLORS[..5]
            .iter()
            .rev()
            .enumerate()
            .map(|(i, color)| (format!("Decrease (band {})", 4 - i), *color))
            .collect();
        items.push(("No change".to_string(), NEUTRAL_COLOR));
        items.extend(
            RED_COLORS[..5]
                .iter()
                .enumerate()
                .map(|(i, color)| (format!("Increase (band {})", i), *color)),
        );
        return items;
    }

    let types: BTreeSet<FrameType> = data
        .levels
        .iter()
        .flat_map(|level| level.iter())
        .map(|frame| frame.frame_type)
        .collect();
    let mut items: Vec<(String, &'static str)> = types
        .into_iter()
        .map(|t| (t.to_string(), type_color(t)))
        .collect();

    let has_marker = data
        .levels
        .iter()
        .flat_map(|level| level.iter())
        .any(|frame| frame.before_marker);
    if has_marker {
        items.push(("Before marker".to_string(), BEFORE_MARKER_COLOR));
    }
    items
}

fn legend_columns(width: usize) -> usize {
    (width.saturating_sub(20) / LEGEND_ITEM_WIDTH).max(1)
}

fn render_legend(out: &mut String, items: &[(String, &'static str)], top: usize, width: usize) {
    let columns = legend_columns(width);

    for (i, (label, color)) in items.iter().enumerate() {
        let x = 10 + (i % columns) * LEGEND_ITEM_WIDTH;
        let y = top + (i / columns) * LEGEND_ROW_HEIGHT + 12;
        let _ = write!(
            out,
            r##"<rect x="{}" y="{}" width="15" height="15" fill="{}" stroke="#999999" rx="2"/>"##,
            x,
            y - 12,
            color
        );
        let _ = write!(
            out,
            r#"<text x="{}" y="{}" font-size="12">{}</text>"#,
            x + 20,
            y,
            escape_xml(label)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DiffDetails, Level};

    fn graph() -> FlamegraphData {
        FlamegraphData::new(
            2,
            vec![
                Level::new(vec![Frame::new(0, 10, "all", FrameType::Unknown)]),
                Level::new(vec![
                    Frame::new(0, 6, "Foo.<init>", FrameType::JitCompiled),
                    Frame::new(6, 4, "Bar.run", FrameType::Inlined),
                ]),
            ],
        )
    }

    #[test]
    fn test_truncated_name() {
        assert_eq!(get_truncated_name("short", 20.0), None);
        assert_eq!(get_truncated_name("", 500.0), None);
        assert_eq!(get_truncated_name("main", 100.0), Some("main".to_string()));
        assert_eq!(
            get_truncated_name("java.lang.Thread.run", 70.0),
            Some("java.la...".to_string())
        );
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("Foo.<init> & \"x\""), "Foo.&lt;init&gt; &amp; &quot;x&quot;");
    }

    #[test]
    fn test_render_regular_graph() {
        let svg = render_svg(&graph(), &FlamegraphConfig::default()).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains(type_color(FrameType::JitCompiled)));
        assert!(svg.contains("Foo.&lt;init&gt;"));
        assert!(svg.contains("JIT_COMPILED"));
        assert!(!svg.contains("No change"));
    }

    #[test]
    fn test_render_diff_graph_has_ramp_legend() {
        let mut data = graph();
        for level in &mut data.levels {
            for frame in &mut level.frames {
                frame.diff_details = Some(DiffDetails {
                    samples: 0,
                    weight: 0,
                    percent_samples: 0.0,
                    percent_weight: 0.0,
                });
            }
        }
        let svg = render_svg(&data, &FlamegraphConfig::default()).unwrap();
        assert!(svg.contains("No change"));
        assert!(svg.contains(NEUTRAL_COLOR));
        assert!(svg.contains(RED_COLORS[4]));
        assert!(!svg.contains(RED_COLORS[5]));
        assert!(!svg.contains(GREEN_COLORS[5]));
    }

    #[test]
    fn test_render_saturated_totals() {
        let big = i64::MAX as u64;
        let data = FlamegraphData::new(
            1,
            vec![Level::new(vec![
                Frame::new(0, big, "a", FrameType::Native),
                Frame::new(big, big, "b", FrameType::Native),
                Frame::new(big.saturating_mul(2), big, "c", FrameType::Native),
            ])],
        );
        assert_eq!(data.root_total(false), u64::MAX);
        let svg = render_svg(&data, &FlamegraphConfig::default()).unwrap();
        assert!(svg.ends_with("</svg>"));
    }

    #[test]
    fn test_empty_graph_fails() {
        let result = render_svg(&FlamegraphData::default(), &FlamegraphConfig::default());
        assert!(matches!(result, Err(FlamegraphError::EmptyStacks)));
    }
}
