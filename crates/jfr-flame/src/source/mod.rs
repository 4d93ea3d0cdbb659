//! Sources of raw graph payloads.
//!
//! Decoding never performs I/O itself; a [`GraphSource`] delivers the bytes
//! and [`load_graph`] pairs it with the decoder.

pub mod http;
pub mod latest;

// Re-export main types
pub use http::HttpSource;
pub use latest::{LatestResponse, RequestToken};

use crate::decode::{decode_graph_data, DecodeOptions};
use crate::model::GraphData;
use crate::utils::error::{FetchError, SourceError};
use log::{debug, info};
use std::fs;
use std::path::PathBuf;

/// Anything that can deliver an encoded `GraphData` payload
pub trait GraphSource {
    fn fetch(&self) -> Result<Vec<u8>, SourceError>;

    /// Short description for logs and messages
    fn describe(&self) -> String;
}

/// Reads a payload from a file on every fetch
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl GraphSource for FileSource {
    fn fetch(&self) -> Result<Vec<u8>, SourceError> {
        debug!("Reading graph data from: {}", self.path.display());
        Ok(fs::read(&self.path)?)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Replays one previously fetched payload
#[derive(Debug, Clone)]
pub struct StaticSource {
    payload: Vec<u8>,
}

impl StaticSource {
    pub fn new(payload: Vec<u8>) -> Self {
        Self { payload }
    }
}

impl GraphSource for StaticSource {
    fn fetch(&self) -> Result<Vec<u8>, SourceError> {
        Ok(self.payload.clone())
    }

    fn describe(&self) -> String {
        format!("static payload ({} bytes)", self.payload.len())
    }
}

/// Fetch a payload and decode it
///
/// **Public** - main entry point for loading graphs
///
/// # Errors
/// * `FetchError::Source` - the source failed to deliver bytes
/// * `FetchError::Decode` - the payload is malformed
pub fn load_graph(
    source: &dyn GraphSource,
    options: &DecodeOptions,
) -> Result<GraphData, FetchError> {
    info!("Loading graph from {}", source.describe());
    let bytes = source.fetch()?;
    Ok(decode_graph_data(&bytes, options)?)
}

/// Load a graph on behalf of a request tracked by `latest`
///
/// Returns whether the decoded graph was accepted, i.e. no newer request was
/// issued while this one was loading.
pub fn load_latest(
    latest: &LatestResponse<GraphData>,
    source: &dyn GraphSource,
    options: &DecodeOptions,
) -> Result<bool, FetchError> {
    let token = latest.begin();
    let graph = load_graph(source, options)?;
    Ok(latest.complete(token, graph))
}
