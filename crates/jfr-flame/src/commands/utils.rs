use super::models::ColorArgs;
use crate::color::{
    classify_diff, hex_rgb, resolve_by_type, resolve_by_type_name, resolve_diff_color,
    BEFORE_MARKER_COLOR, GREEN_COLORS, NEUTRAL_COLOR, RED_COLORS, UNMAPPED_COLOR,
};
use crate::model::FrameType;
use anyhow::Result;
use colored::*;
use log::warn;

/// Resolve the color described by the arguments
///
/// With both magnitudes set the differential ramp is used, otherwise the
/// per-type palette.
pub fn resolve_color(args: &ColorArgs) -> Result<&'static str> {
    match (args.primary, args.secondary) {
        (Some(primary), Some(secondary)) => {
            if primary < 0.0 || secondary < 0.0 {
                anyhow::bail!("Magnitudes must not be negative");
            }
            let frame_type = FrameType::from_name(&args.frame_type).unwrap_or(FrameType::Unknown);
            Ok(resolve_diff_color(primary, secondary, frame_type))
        }
        (None, None) => Ok(resolve_by_type_name(&args.frame_type, args.before_marker)),
        _ => anyhow::bail!("--primary and --secondary must be given together"),
    }
}

/// Execute the color command
pub fn execute_color(args: ColorArgs) -> Result<()> {
    let color = resolve_color(&args)?;

    if color == UNMAPPED_COLOR {
        warn!("'{}' is not a known frame type", args.frame_type);
    }

    if let (Some(primary), Some(secondary)) = (args.primary, args.secondary) {
        println!(
            "{} {}  ({:?})",
            swatch(color),
            color,
            classify_diff(primary, secondary)
        );
    } else {
        println!("{} {}", swatch(color), color);
    }
    Ok(())
}

/// Print the full palette with swatches
pub fn display_palette() {
    println!("{}", "Frame types".bold());
    for frame_type in FrameType::ALL {
        let color = resolve_by_type(frame_type, false);
        println!("  {} {}  {}", swatch(color), color, frame_type.as_str());
    }
    println!(
        "  {} {}  before marker",
        swatch(BEFORE_MARKER_COLOR),
        BEFORE_MARKER_COLOR
    );

    println!();
    println!("{}", "Differential".bold());
    println!("  {} {}  unchanged", swatch(NEUTRAL_COLOR), NEUTRAL_COLOR);
    print_ramp("decreased", &GREEN_COLORS);
    print_ramp("increased", &RED_COLORS);
}

fn print_ramp(label: &str, colors: &[&str]) {
    let ramp: Vec<String> = colors.iter().map(|c| swatch(c).to_string()).collect();
    println!("  {}  {}", ramp.join(""), label);
}

/// Two-cell block painted in `color`
fn swatch(color: &str) -> ColoredString {
    match hex_rgb(color) {
        Some((r, g, b)) => "  ".on_truecolor(r, g, b),
        None => "??".normal(),
    }
}

/// Display version information
pub fn display_version() {
    println!("JFR Flame v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Decoding, coloring and building of JFR flamegraph wire data.");
}
