//! Decode policies and their TOML loader.
//!
//! Two behaviours of the decoder are configurable: what happens to a title
//! index outside the pool, and how 64-bit wire integers are checked.
//!
//! ```toml
//! title_index = "lenient"
//! integers = "js-safe"
//! ```

use crate::utils::config::MAX_SAFE_INTEGER;
use crate::utils::error::{ConfigError, DecodeError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Handling of title indices outside `[0, pool_len)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TitleIndexPolicy {
    /// Fail the whole decode
    #[default]
    Strict,
    /// Resolve to an empty title and keep going
    Lenient,
}

/// Range checks applied to 64-bit wire integers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IntegerPolicy {
    /// Full `i64`/`u64` range; counts must not be negative
    #[default]
    Native,
    /// Like `Native`, and magnitudes must stay within 2^53 - 1
    JsSafe,
}

impl IntegerPolicy {
    /// Convert a wire value that counts something (samples, weight)
    pub fn count(self, field: &'static str, value: i64) -> Result<u64, DecodeError> {
        if value < 0 {
            return Err(DecodeError::NegativeValue { field, value });
        }
        self.check_magnitude(field, value)?;
        Ok(value as u64)
    }

    /// Convert a signed wire value (diffs, timestamps)
    pub fn signed(self, field: &'static str, value: i64) -> Result<i64, DecodeError> {
        self.check_magnitude(field, value)?;
        Ok(value)
    }

    fn check_magnitude(self, field: &'static str, value: i64) -> Result<(), DecodeError> {
        match self {
            IntegerPolicy::Native => Ok(()),
            IntegerPolicy::JsSafe if value.unsigned_abs() > MAX_SAFE_INTEGER as u64 => {
                Err(DecodeError::IntegerOutOfRange { field, value })
            }
            IntegerPolicy::JsSafe => Ok(()),
        }
    }
}

/// Complete decoder configuration
///
/// Missing keys take their default; unknown keys are an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DecodeOptions {
    pub title_index: TitleIndexPolicy,
    pub integers: IntegerPolicy,
}

impl DecodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title_index(mut self, policy: TitleIndexPolicy) -> Self {
        self.title_index = policy;
        self
    }

    pub fn with_integers(mut self, policy: IntegerPolicy) -> Self {
        self.integers = policy;
        self
    }
}

/// Load decode options from a TOML file
///
/// # Errors
/// * `ConfigError::IoError` - If file cannot be read
/// * `ConfigError::ParseFailed` - If TOML is invalid
pub fn load_options(path: impl AsRef<Path>) -> Result<DecodeOptions, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let options: DecodeOptions = toml::from_str(&contents)?;
    Ok(options)
}
