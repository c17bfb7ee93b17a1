#![allow(unsafe_code)]
//! Backing process spawning and control.

use std::process::{ExitStatus, Stdio};

use async_trait::async_trait;
use cask_common::{CaskError, CaskResult};
use tokio::process::{Child, Command};

/// The placeholder workload run by every backing process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkloadSpec {
    /// Program to execute, resolved through `PATH`.
    pub program: String,
    /// Arguments passed to the program.
    pub args: Vec<String>,
}

impl Default for WorkloadSpec {
    fn default() -> Self {
        Self {
            program: "sleep".to_string(),
            args: vec!["infinity".to_string()],
        }
    }
}

impl WorkloadSpec {
    /// Create a workload spec.
    pub fn new(
        program: impl Into<String>,
        args: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

/// Process-control signals the supervisor sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessSignal {
    /// Terminate unconditionally (`SIGKILL`). Also kills suspended processes.
    Kill,
    /// Suspend execution (`SIGSTOP`).
    Stop,
    /// Resume a suspended process (`SIGCONT`).
    Continue,
}

impl ProcessSignal {
    /// The raw signal number.
    #[must_use]
    pub const fn as_raw(self) -> libc::c_int {
        match self {
            Self::Kill => libc::SIGKILL,
            Self::Stop => libc::SIGSTOP,
            Self::Continue => libc::SIGCONT,
        }
    }

    /// The conventional signal name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Kill => "SIGKILL",
            Self::Stop => "SIGSTOP",
            Self::Continue => "SIGCONT",
        }
    }
}

/// Owned handle to a backing process.
///
/// The handle owns the child, so its pid cannot be recycled by the OS until
/// [`ProcessHandle::reap`] collects it. Once reaped, every further signal is
/// refused instead of reaching whatever process inherits the pid.
#[derive(Debug)]
pub struct ProcessHandle {
    child: Child,
    pid: u32,
}

impl ProcessHandle {
    fn from_child(child: Child) -> CaskResult<Self> {
        let pid = child.id().ok_or_else(|| CaskError::Internal {
            message: "spawned child has no pid".to_string(),
        })?;
        Ok(Self { child, pid })
    }

    /// Process ID assigned at spawn time.
    #[must_use]
    pub const fn pid(&self) -> u32 {
        self.pid
    }

    /// Returns true once the process has been reaped.
    #[must_use]
    pub fn is_reaped(&self) -> bool {
        self.child.id().is_none()
    }

    /// Send a signal to the process.
    ///
    /// Delivery is asynchronous: this returns as soon as the OS accepts the
    /// signal, without waiting for the target to act on it.
    pub fn signal(&mut self, signal: ProcessSignal) -> CaskResult<()> {
        let spawned_pid = self.pid;
        let signal_error = move |source: std::io::Error| CaskError::Signal {
            pid: spawned_pid,
            signal: signal.name(),
            source,
        };

        let Some(pid) = self.child.id() else {
            return Err(signal_error(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "process already reaped",
            )));
        };

        tracing::debug!(pid, signal = signal.name(), "Sending signal to process");

        if signal == ProcessSignal::Kill {
            return self.child.start_kill().map_err(signal_error);
        }

        let raw_pid = libc::pid_t::try_from(pid).map_err(|_| {
            signal_error(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "pid out of range",
            ))
        })?;

        // SAFETY: kill(2) has no memory-safety preconditions, and the pid
        // belongs to our unreaped child.
        if unsafe { libc::kill(raw_pid, signal.as_raw()) } != 0 {
            return Err(signal_error(std::io::Error::last_os_error()));
        }

        Ok(())
    }

    /// Wait for the process to exit and collect its status.
    ///
    /// Blocks until the OS reports the exit; there is no timeout. Calling
    /// this on a process that was never told to exit waits for the workload
    /// to finish on its own.
    pub async fn reap(&mut self) -> CaskResult<ExitStatus> {
        let status = self.child.wait().await?;
        tracing::debug!(pid = self.pid, %status, "Reaped process");
        Ok(status)
    }

    /// Kill the process and reap it.
    pub async fn terminate(&mut self) -> CaskResult<ExitStatus> {
        self.signal(ProcessSignal::Kill)?;
        self.reap().await
    }

    /// Check whether the kernel reports the process as stopped.
    ///
    /// Reads the state field of `/proc/<pid>/stat`. Signals are delivered
    /// asynchronously, so this may lag a [`ProcessSignal::Stop`] briefly.
    pub fn is_suspended(&self) -> CaskResult<bool> {
        let stat = std::fs::read_to_string(format!("/proc/{}/stat", self.pid))?;
        // The command name is parenthesised and may itself contain spaces.
        let state = stat
            .rsplit_once(')')
            .and_then(|(_, rest)| rest.split_whitespace().next())
            .ok_or_else(|| CaskError::Internal {
                message: format!("malformed /proc/{}/stat", self.pid),
            })?;
        Ok(matches!(state, "T" | "t"))
    }
}

/// Creates backing processes.
#[async_trait]
pub trait Launcher: Send + Sync + std::fmt::Debug {
    /// Spawn one backing process.
    ///
    /// On success the returned handle refers to a live process distinct from
    /// the caller.
    async fn spawn(&self) -> CaskResult<ProcessHandle>;
}

/// Launches the configured placeholder workload as a child process.
#[derive(Debug, Clone, Default)]
pub struct ProcessLauncher {
    workload: WorkloadSpec,
}

impl ProcessLauncher {
    /// Create a launcher for the given workload.
    #[must_use]
    pub fn new(workload: WorkloadSpec) -> Self {
        Self { workload }
    }
}

#[async_trait]
impl Launcher for ProcessLauncher {
    async fn spawn(&self) -> CaskResult<ProcessHandle> {
        tracing::debug!(
            program = %self.workload.program,
            args = ?self.workload.args,
            "Spawning process"
        );

        // A failed exec is reported back to us and the forked child exits;
        // it never keeps running as a copy of the supervisor.
        let child = Command::new(&self.workload.program)
            .args(&self.workload.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| CaskError::SpawnFailed {
                program: self.workload.program.clone(),
                source,
            })?;

        let handle = ProcessHandle::from_child(child)?;
        tracing::debug!(pid = handle.pid(), "Process spawned");
        Ok(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn spawn_and_terminate() {
        let launcher = ProcessLauncher::default();
        let mut handle = launcher.spawn().await.unwrap();
        assert_ne!(handle.pid(), std::process::id());
        assert!(!handle.is_reaped());

        let status = handle.terminate().await.unwrap();
        assert!(!status.success());
        assert!(handle.is_reaped());
    }

    #[tokio::test]
    async fn spawn_failure_is_reported() {
        let launcher = ProcessLauncher::new(WorkloadSpec::new(
            "/nonexistent/cask-workload",
            Vec::<String>::new(),
        ));
        let err = launcher.spawn().await.unwrap_err();
        assert!(matches!(err, CaskError::SpawnFailed { .. }));
    }

    #[tokio::test]
    async fn reaped_process_refuses_signals() {
        let mut handle = ProcessLauncher::default().spawn().await.unwrap();
        handle.terminate().await.unwrap();

        let err = handle.signal(ProcessSignal::Continue).unwrap_err();
        assert!(matches!(err, CaskError::Signal { signal: "SIGCONT", .. }));
        assert!(handle.signal(ProcessSignal::Kill).is_err());
    }

    #[tokio::test]
    async fn stop_and_continue() {
        let mut handle = ProcessLauncher::default().spawn().await.unwrap();

        handle.signal(ProcessSignal::Stop).unwrap();
        let mut suspended = false;
        for _ in 0..50 {
            if handle.is_suspended().unwrap() {
                suspended = true;
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        assert!(suspended);

        handle.signal(ProcessSignal::Continue).unwrap();
        handle.terminate().await.unwrap();
    }

    #[test]
    fn signal_names() {
        assert_eq!(ProcessSignal::Kill.name(), "SIGKILL");
        assert_eq!(ProcessSignal::Stop.as_raw(), libc::SIGSTOP);
        assert_eq!(ProcessSignal::Continue.as_raw(), libc::SIGCONT);
    }
}
