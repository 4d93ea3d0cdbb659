//! Decode command implementation.
//!
//! The decode command:
//! 1. Resolves the decode options (file, then CLI overrides)
//! 2. Fetches the payload from a file or an HTTP endpoint
//! 3. Decodes it into a `GraphData`
//! 4. Writes the requested outputs
//! 5. Prints the overview, summary and tree

use crate::commands::models::DecodeArgs;
use crate::decode::{load_options, DecodeOptions, IntegerPolicy, TitleIndexPolicy};
use crate::flamegraph::{generate_text_summary, render_frame_tree, render_svg, FlamegraphConfig};
use crate::model::{FrameTree, GraphData, TimeseriesData};
use crate::output::{write_graph_json, write_svg};
use crate::source::{load_graph, FileSource, GraphSource, HttpSource};
use anyhow::{Context, Result};
use chrono::DateTime;
use colored::*;
use log::{debug, info, warn};
use std::time::Instant;

/// Execute the decode command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Unreadable options file
/// * Source failures (missing file, HTTP errors)
/// * Malformed payloads
/// * File write errors
///
/// # Example
/// ```ignore
/// let args = DecodeArgs {
///     input: Some(PathBuf::from("graph.pb")),
///     output_svg: Some(PathBuf::from("graph.svg")),
///     print_summary: true,
///     ..Default::default()
/// };
///
/// execute_decode(args)?;
/// ```
pub fn execute_decode(args: DecodeArgs) -> Result<()> {
    let start_time = Instant::now();

    let options = resolve_options(&args)?;
    debug!("Decode options: {:?}", options);

    let source = create_source(&args)?;
    let graph = load_graph(source.as_ref(), &options)
        .with_context(|| format!("Failed to load graph from {}", source.describe()))?;

    info!(
        "Decoded {} levels, {} frames, {} series",
        graph.flamegraph.levels.len(),
        graph.flamegraph.frame_count(),
        graph.timeseries.series.len()
    );

    let title = args
        .title
        .clone()
        .unwrap_or_else(|| source.describe());
    write_outputs(&args, &graph, &title)?;

    print_overview(&title, &graph);

    if args.print_summary {
        println!("{}", generate_text_summary(&graph.flamegraph, args.top));
    }

    if args.print_tree {
        println!("{}", render_frame_tree(&graph.flamegraph, args.tree_depth));
    }

    info!(
        "Decode completed in {:.2}s",
        start_time.elapsed().as_secs_f64()
    );
    Ok(())
}

/// Options file first, then the CLI switches on top
///
/// **Private** - internal helper for execute_decode
fn resolve_options(args: &DecodeArgs) -> Result<DecodeOptions> {
    let mut options = match &args.config {
        Some(path) => load_options(path)
            .with_context(|| format!("Failed to load decode options: {}", path.display()))?,
        None => DecodeOptions::default(),
    };

    if args.lenient_titles {
        options = options.with_title_index(TitleIndexPolicy::Lenient);
    }
    if args.js_safe {
        options = options.with_integers(IntegerPolicy::JsSafe);
    }
    Ok(options)
}

/// Pick the payload source named by the arguments
///
/// **Private** - internal helper for execute_decode
fn create_source(args: &DecodeArgs) -> Result<Box<dyn GraphSource>> {
    if let Some(url) = &args.url {
        let mut source = HttpSource::new(url.as_str()).context("Failed to create HTTP client")?;
        if let Some(body) = &args.body {
            let body: serde_json::Value =
                serde_json::from_str(body).context("Request body is not valid JSON")?;
            source = source.with_body(body);
        }
        return Ok(Box::new(source));
    }

    match &args.input {
        Some(path) => Ok(Box::new(FileSource::new(path))),
        None => anyhow::bail!("Either an input file or a URL is required"),
    }
}

/// Write JSON and SVG outputs when requested
///
/// **Private** - internal helper for execute_decode
fn write_outputs(args: &DecodeArgs, graph: &GraphData, title: &str) -> Result<()> {
    if let Some(json_path) = &args.output_json {
        write_graph_json(graph, json_path).context("Failed to write graph JSON")?;
        info!("✓ Graph JSON written to: {}", json_path.display());
    }

    if let Some(svg_path) = &args.output_svg {
        if graph.flamegraph.is_empty() {
            warn!("Flamegraph is empty, skipping SVG output");
            return Ok(());
        }

        let config = FlamegraphConfig::new()
            .with_title(title)
            .with_width(args.width)
            .with_weight(args.use_weight);
        let svg = render_svg(&graph.flamegraph, &config).context("Failed to render flamegraph")?;
        write_svg(&svg, svg_path).context("Failed to write flamegraph SVG")?;
        info!("✓ Flamegraph written to: {}", svg_path.display());
    }

    Ok(())
}

/// Print a short description of the decoded graph
///
/// **Private** - internal helper for execute_decode
fn print_overview(title: &str, graph: &GraphData) {
    let flamegraph = &graph.flamegraph;

    println!();
    println!("  {} {}", "Graph:".bold(), title);
    println!(
        "  Kind:    {}",
        if flamegraph.is_differential() {
            "differential"
        } else {
            "regular"
        }
    );
    println!("  Depth:   {}", flamegraph.depth);
    println!("  Frames:  {}", flamegraph.frame_count());
    println!("  Samples: {}", flamegraph.root_total(false));

    match FrameTree::build(flamegraph) {
        Ok(tree) => {
            let overflowing = tree.overflowing_frames(flamegraph);
            if !overflowing.is_empty() {
                warn!(
                    "{} frames have children exceeding their own samples",
                    overflowing.len()
                );
            }
        }
        Err(e) => warn!("Frames do not nest: {}", e),
    }

    print_timeseries(&graph.timeseries);
    println!();
}

/// Print one line per series with its time range
///
/// **Private** - internal helper for print_overview
fn print_timeseries(timeseries: &TimeseriesData) {
    if timeseries.is_empty() {
        return;
    }

    println!("  {}", "Timeseries:".bold());
    for serie in &timeseries.series {
        match serie.time_range() {
            Some((first, last)) => println!(
                "    {:<20} {:>6} points  {} .. {}  total {}",
                serie.name,
                serie.data.len(),
                format_timestamp(first),
                format_timestamp(last),
                serie.total()
            ),
            None => println!("    {:<20} (empty)", serie.name),
        }
    }
}

/// Render epoch milliseconds as UTC, falling back to the raw value
pub fn format_timestamp(millis: i64) -> String {
    DateTime::from_timestamp_millis(millis)
        .map(|ts| ts.format("%Y-%m-%d %H:%M:%S%.3f").to_string())
        .unwrap_or_else(|| millis.to_string())
}

/// Validate decode arguments
///
/// **Public** - can be called before execute_decode for early validation
pub fn validate_args(args: &DecodeArgs) -> Result<()> {
    match (&args.input, &args.url) {
        (None, None) => anyhow::bail!("Either --input or --url must be given"),
        (Some(_), Some(_)) => anyhow::bail!("--input and --url are mutually exclusive"),
        _ => {}
    }

    if let Some(url) = &args.url {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            anyhow::bail!("URL must start with http:// or https://");
        }
    }

    if args.body.is_some() && args.url.is_none() {
        anyhow::bail!("A request body requires --url");
    }

    if args.top == 0 {
        anyhow::bail!("top must be greater than 0");
    }

    if args.top > 1000 {
        anyhow::bail!("top is too large (max 1000)");
    }

    if args.width == 0 {
        anyhow::bail!("width must be greater than 0");
    }

    Ok(())
}
