//! Resolution of title indices against the per-payload title pool.

use super::options::TitleIndexPolicy;
use crate::utils::error::DecodeError;
use log::warn;

/// Where a frame sits in the payload, for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameLocation {
    pub level: usize,
    pub frame: usize,
}

/// Shared method/class names of one payload
#[derive(Debug, Clone, Copy)]
pub struct TitlePool<'a> {
    titles: &'a [String],
    policy: TitleIndexPolicy,
}

impl<'a> TitlePool<'a> {
    pub fn new(titles: &'a [String], policy: TitleIndexPolicy) -> Self {
        Self { titles, policy }
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    /// Title at `index`
    ///
    /// # Errors
    /// * `DecodeError::TitleIndexOutOfRange` - index outside the pool under
    ///   `TitleIndexPolicy::Strict`
    pub fn resolve(&self, index: i32, location: FrameLocation) -> Result<&'a str, DecodeError> {
        let found = usize::try_from(index)
            .ok()
            .and_then(|i| self.titles.get(i));

        match (found, self.policy) {
            (Some(title), _) => Ok(title.as_str()),
            // Index 0 is the unset default; a payload without titles resolves it to ""
            (None, _) if index == 0 && self.titles.is_empty() => Ok(""),
            (None, TitleIndexPolicy::Lenient) => {
                warn!(
                    "Title index {} out of range (pool size {}) at level {}, frame {}; using empty title",
                    index,
                    self.titles.len(),
                    location.level,
                    location.frame
                );
                Ok("")
            }
            (None, TitleIndexPolicy::Strict) => Err(DecodeError::TitleIndexOutOfRange {
                index,
                pool_len: self.titles.len(),
                level: location.level,
                frame: location.frame,
            }),
        }
    }
}
