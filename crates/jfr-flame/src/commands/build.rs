//! Build and diff command implementations.
//! Turn collapsed stack files into wire payloads.

use super::models::{BuildArgs, DiffArgs};
use crate::aggregator::{merge_stacks, read_collapsed, CollapsedStack};
use crate::decode::{decode_graph_message, DecodeOptions};
use crate::flamegraph::{
    build_diff_graph_data, build_graph_data, generate_text_summary, render_svg, FlamegraphConfig,
};
use crate::output::{write_svg, write_wire};
use crate::utils::config::DEFAULT_SUMMARY_ROWS;
use anyhow::{Context, Result};
use colored::*;
use log::{debug, info};
use std::path::Path;

/// Execute the build command
///
/// **Public** - main entry point called from main.rs
pub fn execute_build(args: BuildArgs) -> Result<()> {
    // Step 1: Read stacks
    let stacks = read_stacks(&args.input, "stacks")?;

    // Step 2: Build the payload
    let graph = build_graph_data(&stacks, args.kind).context("Failed to build flamegraph")?;

    // Step 3: Write it
    write_wire(&graph, &args.output).context("Failed to write wire payload")?;
    println!(
        "🔥 Flamegraph written to {}",
        args.output.display().to_string().cyan()
    );

    Ok(())
}

/// Execute the diff command
///
/// **Public** - main entry point called from main.rs
pub fn execute_diff(args: DiffArgs) -> Result<()> {
    // Step 1: Load both profiles
    let primary = read_stacks(&args.primary, "primary stacks")?;
    let secondary = read_stacks(&args.secondary, "secondary stacks")?;

    // Step 2: Build and write the differential payload
    let graph =
        build_diff_graph_data(&primary, &secondary).context("Failed to build diff flamegraph")?;
    write_wire(&graph, &args.output).context("Failed to write wire payload")?;
    println!(
        "📊 Diff flamegraph written to {}",
        args.output.display().to_string().cyan()
    );

    if args.output_svg.is_none() && !args.summary {
        return Ok(());
    }

    // Step 3: Decode our own payload for rendering
    let decoded = decode_graph_message(&graph, &DecodeOptions::default())
        .context("Failed to decode diff flamegraph")?;

    if let Some(svg_path) = &args.output_svg {
        info!("Rendering diff flamegraph...");
        let config = FlamegraphConfig::new().with_title("Differential Flame Graph");
        let svg = render_svg(&decoded.flamegraph, &config).context("Failed to render SVG")?;
        write_svg(&svg, svg_path).context("Failed to write diff SVG")?;
        println!(
            "🔥 Diff SVG written to {}",
            svg_path.display().to_string().cyan()
        );
    }

    // Step 4: Terminal summary
    if args.summary {
        println!(
            "{}",
            generate_text_summary(&decoded.flamegraph, DEFAULT_SUMMARY_ROWS)
        );
    }

    Ok(())
}

/// Read a collapsed stack file with identical stacks merged
fn read_stacks(path: &Path, what: &str) -> Result<Vec<CollapsedStack>> {
    let stacks = read_collapsed(path)
        .with_context(|| format!("Failed to read {}: {}", what, path.display()))?;
    let merged = merge_stacks(&stacks);
    debug!("Read {} {} ({} unique)", stacks.len(), what, merged.len());
    Ok(merged)
}

/// Validate diff arguments
pub fn validate_diff_args(args: &DiffArgs) -> Result<()> {
    if args.primary == args.secondary {
        anyhow::bail!("Primary and secondary stacks must be different files");
    }
    if args.output.as_os_str().is_empty() {
        anyhow::bail!("Output path cannot be empty");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_same_input_twice_is_rejected() {
        let args = DiffArgs {
            primary: PathBuf::from("a.collapsed"),
            secondary: PathBuf::from("a.collapsed"),
            ..Default::default()
        };
        assert!(validate_diff_args(&args).is_err());

        let args = DiffArgs {
            secondary: PathBuf::from("b.collapsed"),
            ..args
        };
        assert!(validate_diff_args(&args).is_ok());
    }

    #[test]
    fn test_read_stacks_merges_duplicates() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("dup.collapsed");
        std::fs::write(&path, "main;a 1 10\nmain;b 4\nmain;a 2 20\n").unwrap();

        let stacks = read_stacks(&path, "stacks").unwrap();
        assert_eq!(
            stacks,
            vec![
                CollapsedStack::new("main;b", 4, 0),
                CollapsedStack::new("main;a", 3, 30),
            ]
        );
    }

    #[test]
    fn test_missing_input_fails() {
        let args = BuildArgs {
            input: PathBuf::from("/nonexistent/stacks.collapsed"),
            ..Default::default()
        };
        assert!(execute_build(args).is_err());
    }
}
