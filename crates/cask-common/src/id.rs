//! Container identifiers and names.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CaskError, CaskResult};

/// A container ID.
///
/// IDs are positive integers handed out by a registry in increasing order.
/// They are never reused within one registry, so ordering by ID is the same
/// as ordering by creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContainerId(u32);

impl ContainerId {
    /// The first ID a fresh registry assigns.
    pub const FIRST: Self = Self(1);

    /// Wrap a raw ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// The ID following this one.
    ///
    /// # Errors
    ///
    /// Returns an error if the ID space is exhausted.
    pub fn next(self) -> CaskResult<Self> {
        self.0
            .checked_add(1)
            .map(Self)
            .ok_or_else(|| CaskError::Internal {
                message: "container ID space exhausted".to_string(),
            })
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for ContainerId {
    type Error = CaskError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u32::try_from(value)
            .ok()
            .filter(|v| *v > 0)
            .map(Self)
            .ok_or_else(|| CaskError::InvalidContainerId {
                value: value.to_string(),
            })
    }
}

/// A container name, bounded to [`ContainerName::MAX_LENGTH`] bytes.
///
/// Longer input is truncated rather than rejected. Names are labels only;
/// two containers may share one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContainerName(String);

impl ContainerName {
    /// Maximum length of a name in bytes.
    pub const MAX_LENGTH: usize = 49;

    /// Create a name, truncating to [`Self::MAX_LENGTH`] bytes.
    ///
    /// Truncation never splits a UTF-8 character.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let mut name = name.into();
        if name.len() > Self::MAX_LENGTH {
            let mut end = Self::MAX_LENGTH;
            while !name.is_char_boundary(end) {
                end -= 1;
            }
            tracing::debug!(original_len = name.len(), kept = end, "Truncating container name");
            name.truncate(end);
        }
        Self(name)
    }

    /// Get the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContainerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ContainerName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
