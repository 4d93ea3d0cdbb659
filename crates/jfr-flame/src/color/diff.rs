//! Banded two-ramp coloring of differential frames.
//!
//! The relative change `|primary - secondary| / (primary + secondary)` picks
//! an intensity band; its sign picks the ramp. Changes at or below
//! [`NOISE_THRESHOLD`] are drawn neutral.

use super::palette::type_color;
use crate::model::FrameType;

/// Ramp for frames that shrank from secondary to primary, lightest first
pub const GREEN_COLORS: [&str; 6] = [
    "#E5FFCC", "#E5FFBB", "#CCFF99", "#B2FF66", "#99FF33", "#66CC00",
];

/// Ramp for frames that grew from secondary to primary, lightest first
pub const RED_COLORS: [&str; 6] = [
    "#FFEEEE", "#FFDDDD", "#FFCCCC", "#FFAAAA", "#FF8888", "#FF3333",
];

pub const NEUTRAL_COLOR: &str = "#E6E6E6";

/// Relative changes up to this value are considered noise
pub const NOISE_THRESHOLD: f64 = 0.02;

/// Upper bound (inclusive) of each band; anything above the last is band 4
pub const BAND_THRESHOLDS: [f64; 4] = [0.05, 0.10, 0.40, 0.80];

/// Outcome of comparing a primary and a secondary magnitude
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffClass {
    Neutral,
    /// Primary is larger; carries the band index
    Increased(usize),
    /// Primary is smaller; carries the band index
    Decreased(usize),
}

impl DiffClass {
    /// Display color of this class
    pub fn color(self) -> &'static str {
        match self {
            DiffClass::Neutral => NEUTRAL_COLOR,
            DiffClass::Increased(band) => RED_COLORS[band],
            DiffClass::Decreased(band) => GREEN_COLORS[band],
        }
    }

    pub fn band(self) -> Option<usize> {
        match self {
            DiffClass::Neutral => None,
            DiffClass::Increased(band) | DiffClass::Decreased(band) => Some(band),
        }
    }
}

/// Band index for a relative change above the noise threshold
fn band_index(pct: f64) -> usize {
    BAND_THRESHOLDS
        .iter()
        .position(|&upper| pct <= upper)
        .unwrap_or(BAND_THRESHOLDS.len())
}

/// Classify the change between two magnitudes
///
/// Degenerate totals (zero, negative or not finite) are neutral.
pub fn classify_diff(primary: f64, secondary: f64) -> DiffClass {
    let total = primary + secondary;
    if !total.is_finite() || total <= 0.0 {
        return DiffClass::Neutral;
    }

    let pct = (primary - secondary).abs() / total;
    if pct.is_nan() || pct <= NOISE_THRESHOLD {
        return DiffClass::Neutral;
    }

    let band = band_index(pct);
    if primary < secondary {
        DiffClass::Decreased(band)
    } else {
        DiffClass::Increased(band)
    }
}

/// Color of a differential frame
///
/// Lambda frames keep their palette color.
///
/// # Example
/// ```ignore
/// assert_eq!(resolve_diff_color(100.0, 50.0, FrameType::JitCompiled), "#FFCCCC");
/// ```
pub fn resolve_diff_color(primary: f64, secondary: f64, frame_type: FrameType) -> &'static str {
    if frame_type == FrameType::LambdaSynthetic {
        return type_color(frame_type);
    }
    classify_diff(primary, secondary).color()
}
