//! Container runtime core.
//!
//! This module provides the container registry and lifecycle management.

mod config;
mod container;
pub mod events;
mod registry;

pub use config::{DEFAULT_CAPACITY, RuntimeConfig, ShutdownPolicy};
pub use container::{Container, ContainerSnapshot, Transition};
pub use events::{EVENT_BUFFER, EventBus, RuntimeEvent};
pub use registry::{ContainerRegistry, ShutdownReport};
