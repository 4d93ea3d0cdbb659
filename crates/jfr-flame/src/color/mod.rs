//! Frame color resolution.
//!
//! Regular graphs color frames by type; differential graphs color them by the
//! relative change between the primary and secondary profile.

pub mod diff;
pub mod palette;

pub use diff::{
    classify_diff, resolve_diff_color, DiffClass, GREEN_COLORS, NEUTRAL_COLOR, RED_COLORS,
};
pub use palette::{
    hex_rgb, resolve_by_type, resolve_by_type_name, type_color, BEFORE_MARKER_COLOR,
    UNMAPPED_COLOR,
};

use crate::model::Frame;

/// Color of a decoded frame
///
/// For differential frames the two sides are recovered from the merged total
/// and the signed difference: `primary = (total + diff) / 2` and
/// `secondary = (total - diff) / 2`. A frame present on one side only lands
/// in the outermost band of its ramp.
pub fn frame_color(frame: &Frame, use_weight: bool) -> &'static str {
    let Some(details) = &frame.diff_details else {
        return resolve_by_type(frame.frame_type, frame.before_marker);
    };

    let total = frame.total(use_weight) as f64;
    let diff = if use_weight {
        details.weight as f64
    } else {
        details.samples as f64
    };

    resolve_diff_color((total + diff) / 2.0, (total - diff) / 2.0, frame.frame_type)
}
