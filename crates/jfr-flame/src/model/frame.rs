//! Decoded flamegraph frame and its optional details.

use crate::proto;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of a call-stack frame
///
/// Closed set mirroring the wire enumeration. Wire values outside the set
/// decode to [`FrameType::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FrameType {
    Unknown,
    C1Compiled,
    Native,
    Cpp,
    Interpreted,
    JitCompiled,
    Inlined,
    Kernel,
    ThreadNameSynthetic,
    AllocatedObjectSynthetic,
    AllocatedObjectInNewTlabSynthetic,
    AllocatedObjectOutsideTlabSynthetic,
    BlockingObjectSynthetic,
    LambdaSynthetic,
    HighlightedWarning,
}

impl FrameType {
    /// Every frame type, in wire order
    pub const ALL: [FrameType; 15] = [
        FrameType::Unknown,
        FrameType::C1Compiled,
        FrameType::Native,
        FrameType::Cpp,
        FrameType::Interpreted,
        FrameType::JitCompiled,
        FrameType::Inlined,
        FrameType::Kernel,
        FrameType::ThreadNameSynthetic,
        FrameType::AllocatedObjectSynthetic,
        FrameType::AllocatedObjectInNewTlabSynthetic,
        FrameType::AllocatedObjectOutsideTlabSynthetic,
        FrameType::BlockingObjectSynthetic,
        FrameType::LambdaSynthetic,
        FrameType::HighlightedWarning,
    ];

    /// Decode a raw wire value, falling back to `Unknown` for values this
    /// version does not know about
    pub fn from_wire(value: i32) -> Self {
        match proto::FrameType::try_from(value) {
            Ok(wire) => wire.into(),
            Err(_) => {
                log::debug!("Unrecognized frame type {}, decoding as UNKNOWN", value);
                FrameType::Unknown
            }
        }
    }

    /// Wire representation of this frame type
    pub fn to_wire(self) -> proto::FrameType {
        match self {
            FrameType::Unknown => proto::FrameType::Unknown,
            FrameType::C1Compiled => proto::FrameType::C1Compiled,
            FrameType::Native => proto::FrameType::Native,
            FrameType::Cpp => proto::FrameType::Cpp,
            FrameType::Interpreted => proto::FrameType::Interpreted,
            FrameType::JitCompiled => proto::FrameType::JitCompiled,
            FrameType::Inlined => proto::FrameType::Inlined,
            FrameType::Kernel => proto::FrameType::Kernel,
            FrameType::ThreadNameSynthetic => proto::FrameType::ThreadNameSynthetic,
            FrameType::AllocatedObjectSynthetic => proto::FrameType::AllocatedObjectSynthetic,
            FrameType::AllocatedObjectInNewTlabSynthetic => {
                proto::FrameType::AllocatedObjectInNewTlabSynthetic
            }
            FrameType::AllocatedObjectOutsideTlabSynthetic => {
                proto::FrameType::AllocatedObjectOutsideTlabSynthetic
            }
            FrameType::BlockingObjectSynthetic => proto::FrameType::BlockingObjectSynthetic,
            FrameType::LambdaSynthetic => proto::FrameType::LambdaSynthetic,
            FrameType::HighlightedWarning => proto::FrameType::HighlightedWarning,
        }
    }

    /// Canonical name, e.g. `JIT_COMPILED`
    pub fn as_str(self) -> &'static str {
        match self {
            FrameType::Unknown => "UNKNOWN",
            FrameType::C1Compiled => "C1_COMPILED",
            FrameType::Native => "NATIVE",
            FrameType::Cpp => "CPP",
            FrameType::Interpreted => "INTERPRETED",
            FrameType::JitCompiled => "JIT_COMPILED",
            FrameType::Inlined => "INLINED",
            FrameType::Kernel => "KERNEL",
            FrameType::ThreadNameSynthetic => "THREAD_NAME_SYNTHETIC",
            FrameType::AllocatedObjectSynthetic => "ALLOCATED_OBJECT_SYNTHETIC",
            FrameType::AllocatedObjectInNewTlabSynthetic => {
                "ALLOCATED_OBJECT_IN_NEW_TLAB_SYNTHETIC"
            }
            FrameType::AllocatedObjectOutsideTlabSynthetic => {
                "ALLOCATED_OBJECT_OUTSIDE_TLAB_SYNTHETIC"
            }
            FrameType::BlockingObjectSynthetic => "BLOCKING_OBJECT_SYNTHETIC",
            FrameType::LambdaSynthetic => "LAMBDA_SYNTHETIC",
            FrameType::HighlightedWarning => "HIGHLIGHTED_WARNING",
        }
    }

    /// Look up a frame type by its canonical name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        FrameType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(name))
    }
}

impl From<proto::FrameType> for FrameType {
    fn from(wire: proto::FrameType) -> Self {
        match wire {
            proto::FrameType::Unknown => FrameType::Unknown,
            proto::FrameType::C1Compiled => FrameType::C1Compiled,
            proto::FrameType::Native => FrameType::Native,
            proto::FrameType::Cpp => FrameType::Cpp,
            proto::FrameType::Interpreted => FrameType::Interpreted,
            proto::FrameType::JitCompiled => FrameType::JitCompiled,
            proto::FrameType::Inlined => FrameType::Inlined,
            proto::FrameType::Kernel => FrameType::Kernel,
            proto::FrameType::ThreadNameSynthetic => FrameType::ThreadNameSynthetic,
            proto::FrameType::AllocatedObjectSynthetic => FrameType::AllocatedObjectSynthetic,
            proto::FrameType::AllocatedObjectInNewTlabSynthetic => {
                FrameType::AllocatedObjectInNewTlabSynthetic
            }
            proto::FrameType::AllocatedObjectOutsideTlabSynthetic => {
                FrameType::AllocatedObjectOutsideTlabSynthetic
            }
            proto::FrameType::BlockingObjectSynthetic => FrameType::BlockingObjectSynthetic,
            proto::FrameType::LambdaSynthetic => FrameType::LambdaSynthetic,
            proto::FrameType::HighlightedWarning => FrameType::HighlightedWarning,
        }
    }
}

impl fmt::Display for FrameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FrameType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FrameType::from_name(s).ok_or_else(|| format!("unknown frame type '{}'", s))
    }
}

/// Bytecode index and source line of a Java frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FramePosition {
    pub bci: i32,
    pub line: i32,
}

/// How the samples of a frame were compiled or executed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FrameSampleTypes {
    pub inlined: u64,
    pub c1: u64,
    pub interpret: u64,
    pub jit: u64,
}

/// Primary-minus-secondary details of a differential frame
///
/// Positive values mean the frame gained samples (or weight) in the primary
/// profile, negative values mean it lost them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffDetails {
    pub samples: i64,
    pub weight: i64,
    pub percent_samples: f64,
    pub percent_weight: f64,
}

/// One call-stack node at one tree depth
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    /// Offset among the frames of this level, in sample units
    pub left_samples: u64,

    /// Samples of this frame and all of its descendants
    pub total_samples: u64,

    pub title: String,

    #[serde(rename = "type")]
    pub frame_type: FrameType,

    #[serde(default, skip_serializing_if = "is_zero")]
    pub left_weight: u64,

    #[serde(default, skip_serializing_if = "is_zero")]
    pub total_weight: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_samples: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<FramePosition>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_types: Option<FrameSampleTypes>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff_details: Option<DiffDetails>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub before_marker: bool,
}

impl Frame {
    /// Create a frame with only the mandatory fields set
    pub fn new(
        left_samples: u64,
        total_samples: u64,
        title: impl Into<String>,
        frame_type: FrameType,
    ) -> Self {
        Self {
            left_samples,
            total_samples,
            title: title.into(),
            frame_type,
            left_weight: 0,
            total_weight: 0,
            self_samples: None,
            position: None,
            sample_types: None,
            diff_details: None,
            before_marker: false,
        }
    }

    /// End of the frame on the sample axis (exclusive)
    pub fn right_samples(&self) -> u64 {
        self.left_samples.saturating_add(self.total_samples)
    }

    /// Whether the frame belongs to a differential graph
    pub fn is_diff(&self) -> bool {
        self.diff_details.is_some()
    }

    /// Offset on the axis selected by `use_weight`
    pub fn left(&self, use_weight: bool) -> u64 {
        if use_weight {
            self.left_weight
        } else {
            self.left_samples
        }
    }

    /// Total on the axis selected by `use_weight`
    pub fn total(&self, use_weight: bool) -> u64 {
        if use_weight {
            self.total_weight
        } else {
            self.total_samples
        }
    }
}

fn is_zero(value: &u64) -> bool {
    *value == 0
}
