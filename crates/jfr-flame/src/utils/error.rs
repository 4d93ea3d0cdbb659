//! Error types for the entire library.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in commands and the CLI.

use thiserror::Error;

/// Errors that can occur while decoding the flamegraph wire format
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Malformed protobuf payload: {0}")]
    Wire(#[from] prost::DecodeError),

    #[error(
        "Title index {index} out of range (pool size {pool_len}) at level {level}, frame {frame}"
    )]
    TitleIndexOutOfRange {
        index: i32,
        pool_len: usize,
        level: usize,
        frame: usize,
    },

    #[error("Negative value {value} in field '{field}'")]
    NegativeValue { field: &'static str, value: i64 },

    #[error("Value {value} in field '{field}' exceeds the safe integer range")]
    IntegerOutOfRange { field: &'static str, value: i64 },
}

/// Errors that can occur while building an explicit frame tree
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TreeError {
    #[error("Frame {index} at level {level} is not contained by any parent frame")]
    OrphanFrame { level: usize, index: usize },
}

/// Errors that can occur while fetching raw graph bytes
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Errors that can occur while fetching and decoding a graph in one step
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Failed to fetch graph data: {0}")]
    Source(#[from] SourceError),

    #[error("Failed to decode graph data: {0}")]
    Decode(#[from] DecodeError),
}

/// Errors that can occur during flamegraph building and rendering
#[derive(Error, Debug)]
pub enum FlamegraphError {
    #[error("Empty stack data")]
    EmptyStacks,

    #[error("Invalid stack on line {line}: {reason}")]
    InvalidStackLine { line: usize, reason: String },

    #[error("Value {0} does not fit into the wire format")]
    ValueTooLarge(u64),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}

/// Errors that can occur while loading configuration files
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Options TOML parse error: {0}")]
    ParseFailed(#[from] toml::de::Error),
}
