#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GraphData {
    #[prost(message, optional, tag = "1")]
    pub flamegraph: Option<FlamegraphData>,
    #[prost(message, optional, tag = "2")]
    pub timeseries: Option<TimeseriesData>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FlamegraphData {
    #[prost(int32, tag = "1")]
    pub depth: i32,
    #[prost(message, repeated, tag = "2")]
    pub levels: Vec<Level>,
    #[prost(string, repeated, tag = "3")]
    pub title_pool: Vec<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TimeseriesData {
    #[prost(message, repeated, tag = "1")]
    pub series: Vec<TimeseriesSeries>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TimeseriesSeries {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(message, repeated, tag = "2")]
    pub data: Vec<TimeseriesPoint>,
}

#[derive(Copy, Clone, PartialEq, ::prost::Message)]
pub struct TimeseriesPoint {
    #[prost(int64, tag = "1")]
    pub timestamp: i64,
    #[prost(int64, tag = "2")]
    pub value: i64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Level {
    #[prost(message, repeated, tag = "1")]
    pub frames: Vec<Frame>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Frame {
    #[prost(int64, tag = "1")]
    pub left_samples: i64,
    #[prost(int64, tag = "2")]
    pub total_samples: i64,
    #[prost(int32, tag = "3")]
    pub title_index: i32, // Index into title pool
    #[prost(enumeration = "FrameType", tag = "4")]
    pub r#type: i32,
    #[prost(int64, tag = "5")]
    pub left_weight: i64,
    #[prost(int64, tag = "6")]
    pub total_weight: i64,
    #[prost(int64, tag = "7")]
    pub self_samples: i64,
    #[prost(message, optional, tag = "8")]
    pub position: Option<FramePosition>,
    #[prost(message, optional, tag = "9")]
    pub sample_types: Option<FrameSampleTypes>,
    #[prost(message, optional, tag = "10")]
    pub diff_details: Option<DiffDetails>,
    #[prost(bool, tag = "11")]
    pub before_marker: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct FramePosition {
    #[prost(int32, tag = "1")]
    pub bci: i32,
    #[prost(int32, tag = "2")]
    pub line: i32,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct FrameSampleTypes {
    #[prost(int64, tag = "1")]
    pub inlined: i64,
    #[prost(int64, tag = "2")]
    pub c1: i64,
    #[prost(int64, tag = "3")]
    pub interpret: i64,
    #[prost(int64, tag = "4")]
    pub jit: i64,
}

#[derive(Copy, Clone, PartialEq, ::prost::Message)]
pub struct DiffDetails {
    #[prost(int64, tag = "1")]
    pub samples: i64,
    #[prost(int64, tag = "2")]
    pub weight: i64,
    #[prost(float, tag = "3")]
    pub percent_samples: f32,
    #[prost(float, tag = "4")]
    pub percent_weight: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum FrameType {
    Unknown = 0,
    C1Compiled = 1,
    Native = 2,
    Cpp = 3,
    Interpreted = 4,
    JitCompiled = 5,
    Inlined = 6,
    Kernel = 7,
    ThreadNameSynthetic = 8,
    AllocatedObjectSynthetic = 9,
    AllocatedObjectInNewTlabSynthetic = 10,
    AllocatedObjectOutsideTlabSynthetic = 11,
    BlockingObjectSynthetic = 12,
    LambdaSynthetic = 13,
    HighlightedWarning = 14,
}
