//! Bounded container registry.
//!
//! The registry is the only owner of containers and their process handles.
//! Every signal a backing process receives goes through one of its methods.

use std::collections::BTreeMap;

use cask_common::{CaskError, CaskResult, ContainerId, ContainerName, ResourceLimits};
use tokio::sync::broadcast;

use super::config::{RuntimeConfig, ShutdownPolicy};
use super::container::{Container, ContainerSnapshot, Transition};
use super::events::{self, EventBus, RuntimeEvent};
use crate::exec::{Launcher, ProcessLauncher};

/// Outcome of [`ContainerRegistry::shutdown_all`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShutdownReport {
    /// Containers whose process was killed, reaped and removed.
    pub terminated: Vec<ContainerId>,
    /// Stopped containers left untouched by [`ShutdownPolicy::RunningOnly`].
    /// Their suspended processes outlive the supervisor.
    pub left_stopped: Vec<ContainerId>,
    /// Containers whose termination failed. They remain registered.
    pub failed: Vec<ContainerId>,
}

/// Owns the managed containers and drives their lifecycle.
///
/// Containers are keyed by ID. IDs only ever increase, so key order is
/// creation order, and removing an entry leaves no gap and renumbers nothing.
#[derive(Debug)]
pub struct ContainerRegistry {
    config: RuntimeConfig,
    launcher: Box<dyn Launcher>,
    containers: BTreeMap<ContainerId, Container>,
    next_id: ContainerId,
    events: EventBus,
}

impl ContainerRegistry {
    /// Create an empty registry that spawns the configured workload.
    pub fn new(config: RuntimeConfig) -> Self {
        let launcher = ProcessLauncher::new(config.workload.clone());
        Self::with_launcher(config, launcher)
    }

    /// Create an empty registry with a custom launcher.
    pub fn with_launcher(config: RuntimeConfig, launcher: impl Launcher + 'static) -> Self {
        Self {
            config,
            launcher: Box::new(launcher),
            containers: BTreeMap::new(),
            next_id: ContainerId::FIRST,
            events: EventBus::new(),
        }
    }

    /// Subscribe to lifecycle events.
    pub fn subscribe(&self) -> broadcast::Receiver<RuntimeEvent> {
        self.events.subscribe()
    }

    /// Get the runtime configuration.
    pub const fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Maximum number of containers.
    pub const fn capacity(&self) -> usize {
        self.config.capacity
    }

    /// Number of registered containers.
    pub fn len(&self) -> usize {
        self.containers.len()
    }

    /// Returns true if no containers are registered.
    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }

    /// Returns true if another container cannot be created.
    pub fn is_full(&self) -> bool {
        self.containers.len() >= self.config.capacity
    }

    /// Create a container and spawn its backing process.
    ///
    /// Capacity is checked before spawning, so a full registry never leaves
    /// an unregistered process behind. If the spawn fails the registry is
    /// unchanged.
    pub async fn create(&mut self, name: &str, limits: ResourceLimits) -> CaskResult<ContainerId> {
        if self.is_full() {
            tracing::warn!(capacity = self.config.capacity, "Container capacity exceeded");
            return Err(CaskError::CapacityExceeded {
                capacity: self.config.capacity,
            });
        }

        let id = self.next_id;
        let next_id = id.next()?;

        let process = self.launcher.spawn().await?;
        let pid = process.pid();

        let container = Container::new(id, ContainerName::new(name), limits, process);

        tracing::info!(
            container_id = %id,
            name = %container.name(),
            pid,
            %limits,
            "Created container"
        );

        self.containers.insert(id, container);
        self.next_id = next_id;

        self.events.publish(RuntimeEvent::ContainerCreated {
            id,
            pid,
            timestamp: events::now(),
        });

        Ok(id)
    }

    /// Get a snapshot of one container.
    pub fn inspect(&self, id: ContainerId) -> CaskResult<ContainerSnapshot> {
        self.get(id).map(Container::snapshot)
    }

    /// Snapshot every container in creation order.
    pub fn list(&self) -> Vec<ContainerSnapshot> {
        self.containers.values().map(Container::snapshot).collect()
    }

    /// Suspend a running container.
    ///
    /// Stopping a stopped container is a successful no-op reported as
    /// [`Transition::Unchanged`].
    pub fn stop(&mut self, id: ContainerId) -> CaskResult<Transition> {
        let transition = self.get_mut(id)?.stop()?;
        if transition.is_applied() {
            self.events.publish(RuntimeEvent::ContainerStopped {
                id,
                timestamp: events::now(),
            });
        }
        Ok(transition)
    }

    /// Resume a stopped container.
    ///
    /// Starting a running container is a successful no-op reported as
    /// [`Transition::Unchanged`].
    pub fn start(&mut self, id: ContainerId) -> CaskResult<Transition> {
        let transition = self.get_mut(id)?.start()?;
        if transition.is_applied() {
            self.events.publish(RuntimeEvent::ContainerStarted {
                id,
                timestamp: events::now(),
            });
        }
        Ok(transition)
    }

    /// Kill a container's process, wait for it to be reaped, then remove it.
    ///
    /// Applies to running and stopped containers alike. The container stays
    /// registered if termination fails.
    pub async fn delete(&mut self, id: ContainerId) -> CaskResult<()> {
        self.terminate(id).await?;
        self.containers.remove(&id);

        tracing::info!(container_id = %id, "Deleted container");
        self.events.publish(RuntimeEvent::ContainerDeleted {
            id,
            timestamp: events::now(),
        });

        Ok(())
    }

    /// Terminate containers at supervisor teardown.
    ///
    /// Which containers are terminated depends on the configured
    /// [`ShutdownPolicy`]. Errors are logged and recorded in the report rather
    /// than returned. Calling this again only revisits what is left.
    pub async fn shutdown_all(&mut self) -> ShutdownReport {
        let mut report = ShutdownReport::default();
        let policy = self.config.shutdown_policy;

        let targets: Vec<ContainerId> = self
            .containers
            .values()
            .filter(|c| {
                if c.status().is_running() || policy == ShutdownPolicy::All {
                    return true;
                }
                tracing::warn!(
                    container_id = %c.id(),
                    pid = c.pid(),
                    "Leaving stopped container's process alive"
                );
                report.left_stopped.push(c.id());
                false
            })
            .map(Container::id)
            .collect();

        for id in targets {
            match self.terminate(id).await {
                Ok(()) => {
                    self.containers.remove(&id);
                    report.terminated.push(id);
                }
                Err(e) => {
                    tracing::warn!(container_id = %id, error = %e, "Failed to terminate container");
                    report.failed.push(id);
                }
            }
        }

        tracing::debug!(
            terminated = report.terminated.len(),
            left_stopped = report.left_stopped.len(),
            failed = report.failed.len(),
            "Shutdown complete"
        );

        report
    }

    /// Whether the kernel reports a container's process as stopped.
    ///
    /// Stop and start update the status optimistically; this checks what the
    /// process is actually doing.
    pub fn is_suspended(&self, id: ContainerId) -> CaskResult<bool> {
        self.get(id)?.is_suspended()
    }

    fn get(&self, id: ContainerId) -> CaskResult<&Container> {
        self.containers.get(&id).ok_or(CaskError::NotFound { id })
    }

    fn get_mut(&mut self, id: ContainerId) -> CaskResult<&mut Container> {
        self.containers
            .get_mut(&id)
            .ok_or(CaskError::NotFound { id })
    }

    async fn terminate(&mut self, id: ContainerId) -> CaskResult<()> {
        let container = self.get_mut(id)?;
        let pid = container.pid();
        let status = container.terminate().await?;

        self.events.publish(RuntimeEvent::ContainerReaped {
            id,
            pid,
            exit_code: status.code(),
            timestamp: events::now(),
        });

        Ok(())
    }
}
