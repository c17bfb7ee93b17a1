//! Container status values.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a managed container.
///
/// There is no deleted status: deleting a container removes it from the
/// registry entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerStatus {
    /// The backing process is executing.
    Running,
    /// The backing process is suspended but still alive.
    Stopped,
}

impl ContainerStatus {
    /// Returns true if the container can be stopped.
    #[must_use]
    pub const fn can_stop(&self) -> bool {
        matches!(self, Self::Running)
    }

    /// Returns true if the container can be started.
    #[must_use]
    pub const fn can_start(&self) -> bool {
        matches!(self, Self::Stopped)
    }

    /// Returns true if the container is running.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }
}

impl std::fmt::Display for ContainerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Running => write!(f, "Running"),
            Self::Stopped => write!(f, "Stopped"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitions() {
        assert!(ContainerStatus::Running.can_stop());
        assert!(!ContainerStatus::Running.can_start());
        assert!(ContainerStatus::Stopped.can_start());
        assert!(!ContainerStatus::Stopped.can_stop());
    }

    #[test]
    fn status_serialization() {
        let json = serde_json::to_string(&ContainerStatus::Stopped).unwrap();
        assert_eq!(json, "\"stopped\"");
    }

    #[test]
    fn status_display() {
        assert_eq!(ContainerStatus::Running.to_string(), "Running");
        assert_eq!(ContainerStatus::Stopped.to_string(), "Stopped");
    }
}
