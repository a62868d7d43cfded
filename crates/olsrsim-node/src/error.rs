//! Error types for the simulator orchestrator.

use olsrsim_core::TopologyError;

/// Errors that abort simulator startup.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("topology error: {0}")]
    Topology(#[from] TopologyError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
