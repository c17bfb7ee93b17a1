//! # cask-common
//!
//! Shared types for the cask process supervisor.
//!
//! This crate provides the vocabulary used by the runtime and the CLI:
//! - Container identifiers and bounded names
//! - Container status values
//! - Declared (unenforced) resource limits
//! - Common error types

#![warn(missing_docs)]

pub mod error;
pub mod id;
pub mod resource;
pub mod state;

pub use error::{CaskError, CaskResult};
pub use id::{ContainerId, ContainerName};
pub use resource::ResourceLimits;
pub use state::ContainerStatus;
