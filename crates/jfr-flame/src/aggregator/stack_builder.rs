//! Parse collapsed stack text into stack records.
//!
//! Collapsed stacks are the input format for graph building.
//! Format: "root;parent;child samples [weight]"
//!
//! Example: "java.lang.Thread.run_[j];Main.loop_[i] 120 4096"
//! This means: 120 samples (4096 units of weight) were taken with
//! `Main.loop` (inlined) on top of `java.lang.Thread.run` (JIT compiled).

use crate::model::FrameType;
use crate::utils::error::FlamegraphError;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// A single collapsed stack entry
///
/// **Public** - used by the graph builders
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollapsedStack {
    /// Stack trace as semicolon-separated string, outermost frame first
    pub stack: String,

    /// Number of samples taken with this stack
    pub samples: u64,

    /// Weight (bytes allocated, nanos blocked, ...) of this stack
    pub weight: u64,
}

impl CollapsedStack {
    /// Create a new collapsed stack
    ///
    /// **Public** - constructor
    pub fn new(stack: impl Into<String>, samples: u64, weight: u64) -> Self {
        Self {
            stack: stack.into(),
            samples,
            weight,
        }
    }

    /// Frames of the stack with their types, outermost first
    pub fn frames(&self) -> impl Iterator<Item = (&str, FrameType)> + '_ {
        self.stack
            .split(';')
            .filter(|frame| !frame.is_empty())
            .map(parse_frame_annotation)
    }
}

/// Split a frame into its title and type
///
/// Suffixes follow the async-profiler convention:
/// `_[j]` JIT compiled, `_[i]` inlined, `_[k]` kernel, `_[1]` C1 compiled,
/// `_[0]` interpreted. Frames without a suffix are `UNKNOWN`, or `CPP` when
/// they look like a C++ symbol.
pub fn parse_frame_annotation(frame: &str) -> (&str, FrameType) {
    const ANNOTATIONS: [(&str, FrameType); 5] = [
        ("_[j]", FrameType::JitCompiled),
        ("_[i]", FrameType::Inlined),
        ("_[k]", FrameType::Kernel),
        ("_[1]", FrameType::C1Compiled),
        ("_[0]", FrameType::Interpreted),
    ];

    for (suffix, frame_type) in ANNOTATIONS {
        if let Some(title) = frame.strip_suffix(suffix) {
            return (title, frame_type);
        }
    }

    if frame.contains("::") {
        (frame, FrameType::Cpp)
    } else {
        (frame, FrameType::Unknown)
    }
}

/// Parse collapsed stacks from text
///
/// **Public** - main entry point for stack parsing
///
/// # Arguments
/// * `text` - One stack per line; blank lines and `#` comments are skipped
///
/// # Returns
/// Stacks in input order (duplicates are kept, see [`merge_stacks`])
///
/// # Errors
/// * `FlamegraphError::InvalidStackLine` - missing or non-numeric counts
pub fn parse_collapsed(text: &str) -> Result<Vec<CollapsedStack>, FlamegraphError> {
    let mut stacks = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        stacks.push(parse_line(line, index + 1)?);
    }

    debug!("Parsed {} collapsed stacks", stacks.len());
    Ok(stacks)
}

fn parse_line(line: &str, line_no: usize) -> Result<CollapsedStack, FlamegraphError> {
    let invalid = |reason: &str| FlamegraphError::InvalidStackLine {
        line: line_no,
        reason: reason.to_string(),
    };

    let (head, last) = line
        .rsplit_once(char::is_whitespace)
        .ok_or_else(|| invalid("missing sample count"))?;
    let last: u64 = last
        .parse()
        .map_err(|_| invalid(&format!("'{}' is not a count", last)))?;

    // Two trailing numbers mean "samples weight"
    let head = head.trim_end();
    let (stack, samples, weight) = match head.rsplit_once(char::is_whitespace) {
        Some((stack, samples)) => match samples.parse::<u64>() {
            Ok(samples) => (stack.trim_end(), samples, last),
            Err(_) => (head, last, 0),
        },
        None => (head, last, 0),
    };

    if stack.is_empty() {
        return Err(invalid("empty stack"));
    }

    Ok(CollapsedStack::new(stack, samples, weight))
}

/// Read and parse a collapsed stack file
pub fn read_collapsed(path: impl AsRef<Path>) -> Result<Vec<CollapsedStack>, FlamegraphError> {
    let path = path.as_ref();
    debug!("Reading collapsed stacks from {}", path.display());
    let text = fs::read_to_string(path)?;
    parse_collapsed(&text)
}

/// Sum samples and weight of identical stacks
///
/// Output is sorted by samples (descending), then by stack.
pub fn merge_stacks(stacks: &[CollapsedStack]) -> Vec<CollapsedStack> {
    let mut stack_map: HashMap<&str, (u64, u64)> = HashMap::new();

    for stack in stacks {
        let entry = stack_map.entry(stack.stack.as_str()).or_insert((0, 0));
        entry.0 = entry.0.saturating_add(stack.samples);
        entry.1 = entry.1.saturating_add(stack.weight);
    }

    let mut merged: Vec<CollapsedStack> = stack_map
        .into_iter()
        .map(|(stack, (samples, weight))| CollapsedStack::new(stack, samples, weight))
        .collect();

    merged.sort_by(|a, b| b.samples.cmp(&a.samples).then_with(|| a.stack.cmp(&b.stack)));
    debug!("Merged {} stacks into {}", stacks.len(), merged.len());

    merged
}
