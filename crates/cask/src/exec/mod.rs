//! Backing process execution.

pub mod process;

pub use process::{Launcher, ProcessHandle, ProcessLauncher, ProcessSignal, WorkloadSpec};
