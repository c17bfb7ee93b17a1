//! Runtime configuration.

use crate::exec::WorkloadSpec;

/// Default number of containers a registry may hold.
pub const DEFAULT_CAPACITY: usize = 5;

/// Which containers [`ContainerRegistry::shutdown_all`] terminates.
///
/// [`ContainerRegistry::shutdown_all`]: super::ContainerRegistry::shutdown_all
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ShutdownPolicy {
    /// Terminate running containers only. Stopped containers keep their
    /// suspended backing process after the supervisor exits.
    #[default]
    RunningOnly,
    /// Terminate every container, running or stopped.
    All,
}

/// Runtime configuration options.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Maximum number of registered containers.
    pub capacity: usize,
    /// Workload run by each backing process.
    pub workload: WorkloadSpec,
    /// Shutdown cleanup behavior.
    pub shutdown_policy: ShutdownPolicy,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            workload: WorkloadSpec::default(),
            shutdown_policy: ShutdownPolicy::default(),
        }
    }
}

impl RuntimeConfig {
    /// Set the capacity.
    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set the workload.
    #[must_use]
    pub fn with_workload(mut self, workload: WorkloadSpec) -> Self {
        self.workload = workload;
        self
    }

    /// Set the shutdown policy.
    #[must_use]
    pub fn with_shutdown_policy(mut self, policy: ShutdownPolicy) -> Self {
        self.shutdown_policy = policy;
        self
    }
}
