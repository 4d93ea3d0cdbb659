//! Decoding of the top-level graph payload.

use super::levels::decode_flamegraph;
use super::options::DecodeOptions;
use crate::model::{GraphData, Serie, TimeseriesData};
use crate::proto;
use crate::utils::error::DecodeError;
use log::{debug, info};
use prost::Message;

/// Decode raw wire bytes into a [`GraphData`]
///
/// **Public** - main entry point for decoding
///
/// A missing flamegraph or timeseries message decodes to an empty default;
/// any malformed content fails the whole decode.
///
/// # Errors
/// * `DecodeError::Wire` - bytes are not a valid `GraphData` message
/// * any error of [`decode_graph_message`]
pub fn decode_graph_data(
    bytes: &[u8],
    options: &DecodeOptions,
) -> Result<GraphData, DecodeError> {
    debug!("Decoding graph payload ({} bytes)", bytes.len());
    let wire = proto::GraphData::decode(bytes)?;
    decode_graph_message(&wire, options)
}

/// Convert an already parsed wire message into a [`GraphData`]
pub fn decode_graph_message(
    wire: &proto::GraphData,
    options: &DecodeOptions,
) -> Result<GraphData, DecodeError> {
    let flamegraph = match &wire.flamegraph {
        Some(fg) => decode_flamegraph(fg, options)?,
        None => {
            debug!("Payload carries no flamegraph");
            Default::default()
        }
    };

    let timeseries = match &wire.timeseries {
        Some(ts) => decode_timeseries(ts, options)?,
        None => {
            debug!("Payload carries no timeseries");
            TimeseriesData::default()
        }
    };

    info!(
        "Decoded graph: {} frames, {} series",
        flamegraph.frame_count(),
        timeseries.series.len()
    );

    Ok(GraphData::new(flamegraph, timeseries))
}

/// Decode the timeseries message
pub fn decode_timeseries(
    wire: &proto::TimeseriesData,
    options: &DecodeOptions,
) -> Result<TimeseriesData, DecodeError> {
    let ints = options.integers;
    let series = wire
        .series
        .iter()
        .map(|serie| {
            let data = serie
                .data
                .iter()
                .map(|point| {
                    Ok((
                        ints.signed("timeseries.timestamp", point.timestamp)?,
                        ints.signed("timeseries.value", point.value)?,
                    ))
                })
                .collect::<Result<Vec<_>, DecodeError>>()?;
            Ok(Serie::new(serie.name.clone(), data))
        })
        .collect::<Result<Vec<_>, DecodeError>>()?;

    Ok(TimeseriesData::new(series))
}
