//! Infrastructure adapters for config, logging, host selection state, and OS processes.

pub mod config;
pub mod logging;
pub mod platform;
pub mod process;
pub mod snapshot;
