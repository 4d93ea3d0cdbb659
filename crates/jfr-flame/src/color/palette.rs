//! Fixed per-type palette for non-differential graphs.

use crate::model::FrameType;

/// Color of frames recorded before the marker, regardless of type
pub const BEFORE_MARKER_COLOR: &str = "#D1D1D1";

/// Returned for type names outside the known set
pub const UNMAPPED_COLOR: &str = "#000000";

/// Palette entry of a frame type
///
/// Never returns [`UNMAPPED_COLOR`]; black is reserved for names that do not
/// denote a frame type at all.
pub fn type_color(frame_type: FrameType) -> &'static str {
    match frame_type {
        FrameType::Unknown => "#f2f2f2",
        FrameType::C1Compiled => "#cce880",
        FrameType::Native => "#e15a5a",
        FrameType::Cpp => "#c8c83c",
        FrameType::Interpreted => "#b2e1b2",
        FrameType::JitCompiled => "#50e150",
        FrameType::Inlined => "#50cccc",
        FrameType::Kernel => "#e17d00",
        FrameType::ThreadNameSynthetic => "#e17e5a",
        FrameType::AllocatedObjectSynthetic => "#50a0e1",
        FrameType::AllocatedObjectInNewTlabSynthetic => "#7db9ea",
        FrameType::AllocatedObjectOutsideTlabSynthetic => "#e1a050",
        FrameType::BlockingObjectSynthetic => "#d2a26e",
        FrameType::LambdaSynthetic => "#b8b8e1",
        FrameType::HighlightedWarning => "#ffcc00",
    }
}

/// Color of a non-differential frame
pub fn resolve_by_type(frame_type: FrameType, before_marker: bool) -> &'static str {
    if before_marker {
        BEFORE_MARKER_COLOR
    } else {
        type_color(frame_type)
    }
}

/// Same as [`resolve_by_type`], keyed by the type's wire name
///
/// Unknown names resolve to [`UNMAPPED_COLOR`] (or the before-marker grey
/// when the flag is set).
pub fn resolve_by_type_name(name: &str, before_marker: bool) -> &'static str {
    if before_marker {
        return BEFORE_MARKER_COLOR;
    }
    match FrameType::from_name(name) {
        Some(frame_type) => type_color(frame_type),
        None => UNMAPPED_COLOR,
    }
}

/// Parse a `#rrggbb` color into its components
pub fn hex_rgb(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}
