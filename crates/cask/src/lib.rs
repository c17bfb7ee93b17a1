//! # cask
//!
//! A minimal process supervisor that emulates container lifecycle
//! operations over a bounded set of child processes.
//!
//! Each container is backed by a real OS process running a placeholder
//! workload. Stopping a container suspends its process with `SIGSTOP`,
//! starting resumes it with `SIGCONT`, and deleting kills and reaps it.
//! Declared CPU and memory limits are recorded but never enforced.
//!
//! ## Usage
//!
//! ```no_run
//! use cask::runtime::{ContainerRegistry, RuntimeConfig};
//! use cask_common::ResourceLimits;
//!
//! # async fn example() -> cask_common::CaskResult<()> {
//! let mut registry = ContainerRegistry::new(RuntimeConfig::default());
//!
//! let id = registry.create("web", ResourceLimits::new(2, 512)).await?;
//! registry.stop(id)?;
//! registry.start(id)?;
//! registry.delete(id).await?;
//!
//! registry.shutdown_all().await;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod cli;
pub mod exec;
pub mod runtime;

pub use runtime::{ContainerRegistry, RuntimeConfig};
