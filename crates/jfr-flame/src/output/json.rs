//! JSON export of decoded graphs.
//!
//! Keys are camelCase, matching what browser renderers expect of a decoded
//! payload.

use crate::model::GraphData;
use crate::utils::error::OutputError;
use log::{debug, info};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Write a decoded graph to a JSON file
///
/// **Public** - main entry point for JSON output
///
/// # Arguments
/// * `graph` - Decoded graph to write
/// * `output_path` - Path to output JSON file
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
///
/// # Example
/// ```ignore
/// let graph = decode_graph_data(&bytes, &DecodeOptions::default())?;
/// write_graph_json(&graph, "graph.json")?;
/// ```
pub fn write_graph_json(
    graph: &GraphData,
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing graph JSON to: {}", output_path.display());
    super::prepare_output(output_path)?;

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, graph).map_err(OutputError::SerializationFailed)?;
    writer.flush().map_err(OutputError::WriteFailed)?;

    info!(
        "Graph JSON written successfully ({} bytes)",
        calculate_file_size(output_path)
    );
    Ok(())
}

/// Serialize a decoded graph to a compact JSON string
pub fn graph_to_string(graph: &GraphData) -> Result<String, OutputError> {
    serde_json::to_string(graph).map_err(OutputError::SerializationFailed)
}

fn calculate_file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

/// Read a decoded graph back from a JSON file
///
/// # Errors
/// * `OutputError::WriteFailed` - File read error (reusing WriteFailed for I/O)
/// * `OutputError::SerializationFailed` - JSON parse error
pub fn read_graph_json(input_path: impl AsRef<Path>) -> Result<GraphData, OutputError> {
    let input_path = input_path.as_ref();
    debug!("Reading graph JSON from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::WriteFailed)?;
    let graph: GraphData =
        serde_json::from_reader(BufReader::new(file)).map_err(OutputError::SerializationFailed)?;

    debug!(
        "Graph loaded: {} levels, {} series",
        graph.flamegraph.levels.len(),
        graph.timeseries.series.len()
    );
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Frame, FrameType, Level};

    #[test]
    fn test_json_keys_are_camel_case() {
        let mut graph = GraphData::default();
        let mut frame = Frame::new(0, 5, "Main.run", FrameType::JitCompiled);
        frame.self_samples = Some(5);
        graph.flamegraph.levels.push(Level::new(vec![frame]));

        let json = graph_to_string(&graph).unwrap();
        assert!(json.contains("\"leftSamples\":0"));
        assert!(json.contains("\"totalSamples\":5"));
        assert!(json.contains("\"selfSamples\":5"));
        assert!(json.contains("\"type\":\"JIT_COMPILED\""));
        assert!(!json.contains("diffDetails"));
        assert!(!json.contains("beforeMarker"));
    }
}
