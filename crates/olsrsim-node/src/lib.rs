//! Simulator orchestration for the olsrsim mesh network.
//!
//! This crate ties the protocol engine to a runtime: CLI and
//! node-configuration parsing, per-node log sinks, the async shell that
//! drives one engine per task, and the controller fabric that routes
//! transmissions over the time-indexed topology.

pub mod config;
pub mod controller;
pub mod error;
pub mod logging;
pub mod node_task;
pub mod sinks;

pub use config::{read_node_configs, NodeConfig};
pub use controller::{Controller, ShutdownHandle};
pub use error::SimError;
