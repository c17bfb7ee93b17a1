//! Declared resource limits.
//!
//! Limits are recorded with each container and shown by `list`. They are
//! descriptive metadata: nothing applies them to the backing process.

use std::fmt;

use serde::{Deserialize, Serialize};

/// CPU and memory limits declared at creation time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLimits {
    /// Declared CPU limit.
    pub cpu: i64,
    /// Declared memory limit.
    pub memory: i64,
}

impl ResourceLimits {
    /// Create a new set of limits.
    #[must_use]
    pub const fn new(cpu: i64, memory: i64) -> Self {
        Self { cpu, memory }
    }
}

impl fmt::Display for ResourceLimits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cpu={} memory={}", self.cpu, self.memory)
    }
}
