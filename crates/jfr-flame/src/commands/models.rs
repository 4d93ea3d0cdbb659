use crate::flamegraph::WeightKind;
use crate::utils::config::{DEFAULT_SUMMARY_ROWS, DEFAULT_TREE_DEPTH};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Arguments for the decode command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct DecodeArgs {
    /// Wire payload file to decode
    pub input: Option<PathBuf>,

    /// Endpoint to fetch the payload from (instead of `input`)
    pub url: Option<String>,

    /// JSON request body; switches the request to POST
    pub body: Option<String>,

    /// Decode options file (TOML)
    pub config: Option<PathBuf>,

    /// Resolve out-of-range title indices to "" instead of failing
    pub lenient_titles: bool,

    /// Reject integers a double cannot represent exactly
    pub js_safe: bool,

    /// Path to write the decoded graph as JSON
    pub output_json: Option<PathBuf>,

    /// Path to write the rendered SVG flamegraph
    pub output_svg: Option<PathBuf>,

    /// SVG title (defaults to the source description)
    pub title: Option<String>,

    /// SVG width in pixels
    pub width: usize,

    /// Lay out and color by weight instead of samples
    pub use_weight: bool,

    /// Print the hottest frames
    pub print_summary: bool,

    /// Number of summary rows
    pub top: usize,

    /// Print the frame tree
    pub print_tree: bool,

    /// Maximum depth of the printed tree
    pub tree_depth: usize,
}

impl Default for DecodeArgs {
    fn default() -> Self {
        Self {
            input: None,
            url: None,
            body: None,
            config: None,
            lenient_titles: false,
            js_safe: false,
            output_json: None,
            output_svg: None,
            title: None,
            width: 1200,
            use_weight: false,
            print_summary: false,
            top: DEFAULT_SUMMARY_ROWS,
            print_tree: false,
            tree_depth: DEFAULT_TREE_DEPTH,
        }
    }
}

/// Arguments for the build command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildArgs {
    /// Collapsed stack file
    pub input: PathBuf,

    /// Path to write the wire payload
    pub output: PathBuf,

    /// What the stack weights measure
    pub kind: WeightKind,
}

impl Default for BuildArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            output: PathBuf::from("flamegraph.pb"),
            kind: WeightKind::Samples,
        }
    }
}

/// Arguments for the diff command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffArgs {
    /// Collapsed stacks of the profile being inspected
    pub primary: PathBuf,

    /// Collapsed stacks of the baseline profile
    pub secondary: PathBuf,

    /// Path to write the differential wire payload
    pub output: PathBuf,

    /// Path to write the visual diff flamegraph SVG
    pub output_svg: Option<PathBuf>,

    /// Print a human-readable summary to the terminal
    pub summary: bool,
}

impl Default for DiffArgs {
    fn default() -> Self {
        Self {
            primary: PathBuf::new(),
            secondary: PathBuf::new(),
            output: PathBuf::from("diffgraph.pb"),
            output_svg: None,
            summary: false,
        }
    }
}

/// Arguments for the color command
#[derive(Debug, Clone, Default)]
pub struct ColorArgs {
    /// Frame type name, e.g. `JIT_COMPILED`
    pub frame_type: String,

    pub before_marker: bool,

    /// Primary magnitude; with `secondary`, selects differential coloring
    pub primary: Option<f64>,

    pub secondary: Option<f64>,
}
