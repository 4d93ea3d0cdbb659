//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod build;
pub mod decode;
pub mod models;
pub mod utils;

// Re-export main command functions
pub use build::{execute_build, execute_diff, validate_diff_args};
pub use decode::{execute_decode, validate_args};
pub use models::{BuildArgs, ColorArgs, DecodeArgs, DiffArgs};
pub use utils::{display_palette, display_version, execute_color, resolve_color};
