//! Raw file writers: encoded wire payloads and rendered SVG.

use crate::flamegraph::encode_graph_data;
use crate::proto;
use crate::utils::error::OutputError;
use log::info;
use std::fs;
use std::path::Path;

/// Encode a `GraphData` message and write it to a file
pub fn write_wire(
    graph: &proto::GraphData,
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    write_file(&encode_graph_data(graph), output_path.as_ref(), "wire payload")
}

/// Write SVG content to a file
///
/// # Errors
/// * `OutputError::InvalidPath` - empty path, a directory, or an uncreatable parent
/// * `OutputError::WriteFailed` - I/O error during write
///
/// # Example
/// ```ignore
/// let svg = render_svg(&graph.flamegraph, &FlamegraphConfig::default())?;
/// write_svg(&svg, "flamegraph.svg")?;
/// ```
pub fn write_svg(svg_content: &str, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    write_file(svg_content.as_bytes(), output_path.as_ref(), "SVG")
}

fn write_file(contents: &[u8], path: &Path, what: &str) -> Result<(), OutputError> {
    info!("Writing {} to: {}", what, path.display());
    super::prepare_output(path)?;

    fs::write(path, contents).map_err(OutputError::WriteFailed)?;

    info!(
        "{} written ({} bytes, {:.2} KB)",
        what,
        contents.len(),
        contents.len() as f64 / 1024.0
    );
    Ok(())
}
