//! Managed container type and operations.

use std::process::ExitStatus;

use cask_common::{CaskResult, ContainerId, ContainerName, ContainerStatus, ResourceLimits};
use serde::{Deserialize, Serialize};

use crate::exec::{ProcessHandle, ProcessSignal};

/// Result of a stop or start request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The signal was sent and the status changed.
    Applied,
    /// The container was already in the requested status. Nothing was sent.
    Unchanged,
}

impl Transition {
    /// Returns true if the status changed.
    #[must_use]
    pub const fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// A supervised container: metadata plus its backing process.
///
/// Only the status changes after creation. The ID, name, limits and process
/// handle are fixed for the container's lifetime.
#[derive(Debug)]
pub struct Container {
    id: ContainerId,
    name: ContainerName,
    status: ContainerStatus,
    limits: ResourceLimits,
    process: ProcessHandle,
}

/// Read-only view of a container at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerSnapshot {
    /// Container ID.
    pub id: ContainerId,
    /// Container name.
    pub name: ContainerName,
    /// Status when the snapshot was taken.
    pub status: ContainerStatus,
    /// Declared limits.
    pub limits: ResourceLimits,
    /// Backing process ID.
    pub pid: u32,
}

impl Container {
    /// Wrap a freshly spawned process. New containers start out running.
    pub(crate) fn new(
        id: ContainerId,
        name: ContainerName,
        limits: ResourceLimits,
        process: ProcessHandle,
    ) -> Self {
        Self {
            id,
            name,
            status: ContainerStatus::Running,
            limits,
            process,
        }
    }

    /// Get the container ID.
    pub const fn id(&self) -> ContainerId {
        self.id
    }

    /// Get the container name.
    pub const fn name(&self) -> &ContainerName {
        &self.name
    }

    /// Get the current status.
    pub const fn status(&self) -> ContainerStatus {
        self.status
    }

    /// Get the backing process ID.
    pub const fn pid(&self) -> u32 {
        self.process.pid()
    }

    /// Take a snapshot of the container.
    pub fn snapshot(&self) -> ContainerSnapshot {
        ContainerSnapshot {
            id: self.id,
            name: self.name.clone(),
            status: self.status,
            limits: self.limits,
            pid: self.pid(),
        }
    }

    /// Suspend the backing process.
    ///
    /// The status flips as soon as the signal is accepted; the process may
    /// still be running for a moment afterwards.
    pub(crate) fn stop(&mut self) -> CaskResult<Transition> {
        if !self.status.can_stop() {
            return Ok(Transition::Unchanged);
        }

        self.process.signal(ProcessSignal::Stop)?;
        self.status = ContainerStatus::Stopped;

        tracing::info!(container_id = %self.id, pid = self.pid(), "Container stopped");
        Ok(Transition::Applied)
    }

    /// Resume the backing process.
    pub(crate) fn start(&mut self) -> CaskResult<Transition> {
        if !self.status.can_start() {
            return Ok(Transition::Unchanged);
        }

        self.process.signal(ProcessSignal::Continue)?;
        self.status = ContainerStatus::Running;

        tracing::info!(container_id = %self.id, pid = self.pid(), "Container started");
        Ok(Transition::Applied)
    }

    /// Kill the backing process and wait until it is reaped.
    ///
    /// Works in either status: `SIGKILL` also ends a suspended process.
    pub(crate) async fn terminate(&mut self) -> CaskResult<ExitStatus> {
        tracing::debug!(
            container_id = %self.id,
            pid = self.pid(),
            status = %self.status,
            "Terminating container"
        );
        self.process.terminate().await
    }

    /// Whether the kernel currently reports the backing process as stopped.
    pub fn is_suspended(&self) -> CaskResult<bool> {
        self.process.is_suspended()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::{Launcher, ProcessLauncher};

    async fn container(name: &str) -> Container {
        let process = ProcessLauncher::default().spawn().await.unwrap();
        Container::new(
            ContainerId::FIRST,
            ContainerName::new(name),
            ResourceLimits::new(2, 512),
            process,
        )
    }

    #[tokio::test]
    async fn new_container_is_running() {
        let mut container = container("web").await;
        assert_eq!(container.status(), ContainerStatus::Running);
        assert_eq!(container.name().as_str(), "web");

        let snapshot = container.snapshot();
        assert_eq!(snapshot.id, ContainerId::FIRST);
        assert_eq!(snapshot.pid, container.pid());
        assert_eq!(snapshot.limits, ResourceLimits::new(2, 512));

        container.terminate().await.unwrap();
    }

    #[tokio::test]
    async fn stop_start_round_trip() {
        let mut container = container("web").await;
        let before = container.snapshot();

        assert_eq!(container.stop().unwrap(), Transition::Applied);
        assert_eq!(container.stop().unwrap(), Transition::Unchanged);
        assert_eq!(container.status(), ContainerStatus::Stopped);

        assert_eq!(container.start().unwrap(), Transition::Applied);
        assert_eq!(container.start().unwrap(), Transition::Unchanged);

        assert_eq!(container.snapshot(), before);
        container.terminate().await.unwrap();
    }

    #[tokio::test]
    async fn terminate_stopped_container() {
        let mut container = container("db").await;
        container.stop().unwrap();

        let status = container.terminate().await.unwrap();
        assert!(!status.success());
    }
}
