//! JFR Flame CLI
//!
//! Decodes flamegraph payloads served by JFR analysis backends, renders them
//! and builds new payloads from collapsed stacks.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use jfr_flame::commands::{
    display_palette, display_version, execute_build, execute_color, execute_decode, execute_diff,
    validate_args, validate_diff_args, BuildArgs, ColorArgs, DecodeArgs, DiffArgs,
};
use jfr_flame::flamegraph::WeightKind;
use jfr_flame::utils::config::{DEFAULT_SUMMARY_ROWS, DEFAULT_TREE_DEPTH};

/// JFR Flame - flamegraph wire decoding and coloring
#[derive(Parser, Debug)]
#[command(name = "jfr-flame")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode a flamegraph payload from a file or an HTTP endpoint
    Decode {
        /// Wire payload file
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Endpoint serving the payload
        #[arg(short, long)]
        url: Option<String>,

        /// JSON body to POST to the endpoint
        #[arg(long)]
        body: Option<String>,

        /// Decode options file (TOML)
        #[arg(short, long, env = "JFR_FLAME_CONFIG")]
        config: Option<PathBuf>,

        /// Resolve out-of-range title indices to an empty title
        #[arg(long)]
        lenient_titles: bool,

        /// Reject integers above 2^53 - 1
        #[arg(long)]
        js_safe: bool,

        /// Write the decoded graph as JSON
        #[arg(long)]
        json: Option<PathBuf>,

        /// Write an SVG flamegraph
        #[arg(long)]
        svg: Option<PathBuf>,

        /// Flamegraph title
        #[arg(long)]
        title: Option<String>,

        /// Flamegraph width in pixels
        #[arg(long, default_value = "1200")]
        width: usize,

        /// Lay out frames by weight instead of samples
        #[arg(long)]
        weight: bool,

        /// Print the hottest frames
        #[arg(long)]
        summary: bool,

        /// Number of summary rows
        #[arg(long, default_value_t = DEFAULT_SUMMARY_ROWS)]
        top: usize,

        /// Print the frame tree
        #[arg(long)]
        tree: bool,

        /// Depth of the printed tree
        #[arg(long, default_value_t = DEFAULT_TREE_DEPTH)]
        tree_depth: usize,
    },

    /// Build a flamegraph payload from collapsed stacks
    Build {
        /// Collapsed stack file
        #[arg(short, long)]
        input: PathBuf,

        /// Output wire payload
        #[arg(short, long, default_value = "flamegraph.pb")]
        output: PathBuf,

        /// What the stack weights measure
        #[arg(short, long, value_enum, default_value_t = WeightKind::Samples)]
        kind: WeightKind,
    },

    /// Build a differential payload from two collapsed stack files
    Diff {
        /// Stacks of the profile being inspected
        #[arg(short, long)]
        primary: PathBuf,

        /// Stacks of the baseline profile
        #[arg(short, long)]
        secondary: PathBuf,

        /// Output wire payload
        #[arg(short, long, default_value = "diffgraph.pb")]
        output: PathBuf,

        /// Write an SVG of the differential flamegraph
        #[arg(long)]
        svg: Option<PathBuf>,

        /// Print the biggest changes
        #[arg(long)]
        summary: bool,
    },

    /// Resolve the color of a frame
    Color {
        /// Frame type name, e.g. JIT_COMPILED
        #[arg(short = 't', long = "type")]
        frame_type: String,

        /// Frame was recorded before the marker
        #[arg(long)]
        before_marker: bool,

        /// Primary magnitude (differential coloring)
        #[arg(long, requires = "secondary")]
        primary: Option<f64>,

        /// Secondary magnitude (differential coloring)
        #[arg(long, requires = "primary")]
        secondary: Option<f64>,
    },

    /// Display the color palette
    Palette,

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Decode {
            input,
            url,
            body,
            config,
            lenient_titles,
            js_safe,
            json,
            svg,
            title,
            width,
            weight,
            summary,
            top,
            tree,
            tree_depth,
        } => {
            let args = DecodeArgs {
                input,
                url,
                body,
                config,
                lenient_titles,
                js_safe,
                output_json: json,
                output_svg: svg,
                title,
                width,
                use_weight: weight,
                print_summary: summary,
                top,
                print_tree: tree,
                tree_depth,
            };

            // Validate args first
            validate_args(&args)?;

            execute_decode(args)?;
        }

        Commands::Build {
            input,
            output,
            kind,
        } => {
            execute_build(BuildArgs {
                input,
                output,
                kind,
            })?;
        }

        Commands::Diff {
            primary,
            secondary,
            output,
            svg,
            summary,
        } => {
            let args = DiffArgs {
                primary,
                secondary,
                output,
                output_svg: svg,
                summary,
            };
            validate_diff_args(&args)?;
            execute_diff(args)?;
        }

        Commands::Color {
            frame_type,
            before_marker,
            primary,
            secondary,
        } => {
            execute_color(ColorArgs {
                frame_type,
                before_marker,
                primary,
                secondary,
            })?;
        }

        Commands::Palette => {
            display_palette();
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
